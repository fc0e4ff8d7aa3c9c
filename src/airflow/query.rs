use crate::filter::DagFilters;
use crate::params::QueryParams;

/// Arguments of one `GET /api/v2/dags` call, derived from a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DagQuery {
    /// The location this query was built from; echoed back with the result.
    pub location: QueryParams,
    pub limit: usize,
    pub offset: usize,
    pub order_by: Option<String>,
    pub tags: Vec<String>,
    pub paused: Option<bool>,
    /// Passed through unvalidated.
    pub last_dag_run_state: Option<String>,
    pub dag_display_name_pattern: Option<String>,
}

impl DagQuery {
    pub fn from_params(params: &QueryParams, filters: &DagFilters) -> Self {
        let state = filters.state(params);
        let table = filters.table_state(params);
        Self {
            location: params.clone(),
            limit: table.pagination.page_size,
            offset: table.offset(),
            order_by: table.order_by(),
            tags: state.tags().iter().cloned().collect(),
            paused: state.paused_query(),
            last_dag_run_state: state.run_state_param().map(str::to_owned),
            dag_display_name_pattern: params
                .get(&filters.keys().name_pattern)
                .filter(|p| !p.is_empty())
                .map(str::to_owned),
        }
    }

    /// Query pairs in the form the REST API expects.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(order_by) = &self.order_by {
            pairs.push(("order_by", order_by.clone()));
        }
        for tag in &self.tags {
            pairs.push(("tags", tag.clone()));
        }
        if let Some(paused) = self.paused {
            pairs.push(("paused", paused.to_string()));
        }
        if let Some(state) = &self.last_dag_run_state {
            pairs.push(("last_dag_run_state", state.clone()));
        }
        if let Some(pattern) = &self.dag_display_name_pattern {
            pairs.push(("dag_display_name_pattern", pattern.clone()));
        }
        pairs
    }
}
