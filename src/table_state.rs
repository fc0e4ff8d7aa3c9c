use crate::config::types::SearchParamKeys;
use crate::params::QueryParams;

/// One sort criterion; serialized as `column` or `-column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub id: String,
    pub desc: bool,
}

impl SortSpec {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('-') {
            Some(id) => Self {
                id: id.to_owned(),
                desc: true,
            },
            None => Self {
                id: raw.to_owned(),
                desc: false,
            },
        }
    }

    pub fn to_param(&self) -> String {
        if self.desc {
            format!("-{}", self.id)
        } else {
            self.id.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

/// Pagination and sort state of the DAG table, stored in the same query
/// string as the filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableViewState {
    pub pagination: Pagination,
    pub sorting: Vec<SortSpec>,
}

impl TableViewState {
    pub fn new(default_page_size: usize) -> Self {
        Self {
            pagination: Pagination {
                page_index: 0,
                page_size: default_page_size.max(1),
            },
            sorting: Vec::new(),
        }
    }

    /// Decode from query parameters. Unparseable or zero `limit`/`offset`
    /// values are ignored in favour of the defaults.
    pub fn from_params(
        params: &QueryParams,
        keys: &SearchParamKeys,
        default_page_size: usize,
    ) -> Self {
        let mut state = Self::new(default_page_size);

        if let Some(size) = params
            .get(&keys.limit)
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            state.pagination.page_size = size;
        }

        if let Some(offset) = params
            .get(&keys.offset)
            .and_then(|v| v.parse::<usize>().ok())
        {
            // Keep `page_index * page_size` within usize.
            let size = state.pagination.page_size;
            state.pagination.page_index = offset.div_ceil(size).min(usize::MAX / size);
        }

        state.sorting = params
            .get_all(&keys.sort)
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(SortSpec::parse)
            .collect();

        state
    }

    /// Write the state back, leaving unrelated parameters untouched.
    pub fn write_to(&self, params: &mut QueryParams, keys: &SearchParamKeys, default_page_size: usize) {
        if self.pagination.page_size == default_page_size {
            params.delete(&keys.limit);
        } else {
            params.set(&keys.limit, self.pagination.page_size.to_string());
        }

        if self.pagination.page_index == 0 {
            params.delete(&keys.offset);
        } else {
            params.set(&keys.offset, self.offset().to_string());
        }

        let sort: Vec<String> = self.sorting.iter().map(SortSpec::to_param).collect();
        if params.get_all(&keys.sort) != sort {
            params.delete(&keys.sort);
            for s in sort {
                params.append(&keys.sort, s);
            }
        }
    }

    /// Same sort order, back on the first page.
    pub fn first_page(&self) -> Self {
        Self {
            pagination: Pagination {
                page_index: 0,
                ..self.pagination
            },
            sorting: self.sorting.clone(),
        }
    }

    pub fn offset(&self) -> usize {
        self.pagination
            .page_index
            .saturating_mul(self.pagination.page_size)
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.pagination.page_size).max(1)
    }

    /// Advance one page unless already on the last one.
    pub fn next_page(&self, total: usize) -> Self {
        let mut next = self.clone();
        if self.pagination.page_index.saturating_add(1) < self.page_count(total) {
            next.pagination.page_index += 1;
        }
        next
    }

    pub fn prev_page(&self) -> Self {
        let mut prev = self.clone();
        prev.pagination.page_index = self.pagination.page_index.saturating_sub(1);
        prev
    }

    /// Cycle `column` through ascending and descending, replacing any other
    /// sort criteria. Sorting changes always return to the first page.
    pub fn toggle_sort(&self, column: &str) -> Self {
        let desc = match self.sorting.as_slice() {
            [only] if only.id == column => !only.desc,
            _ => false,
        };
        Self {
            pagination: Pagination {
                page_index: 0,
                ..self.pagination
            },
            sorting: vec![SortSpec {
                id: column.to_owned(),
                desc,
            }],
        }
    }

    /// `order_by` value for the REST API (first criterion only).
    pub fn order_by(&self) -> Option<String> {
        self.sorting.first().map(SortSpec::to_param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SearchParamKeys {
        SearchParamKeys::default()
    }

    #[test]
    fn defaults_when_params_absent() {
        let state = TableViewState::from_params(&QueryParams::new(), &keys(), 50);
        assert_eq!(state.pagination.page_index, 0);
        assert_eq!(state.pagination.page_size, 50);
        assert!(state.sorting.is_empty());
    }

    #[test]
    fn offset_rounds_up_to_page_index() {
        let p = QueryParams::parse("offset=60&limit=25");
        let state = TableViewState::from_params(&p, &keys(), 50);
        assert_eq!(state.pagination.page_size, 25);
        assert_eq!(state.pagination.page_index, 3);
    }

    #[test]
    fn garbage_limit_and_offset_are_ignored() {
        let p = QueryParams::parse("offset=abc&limit=0");
        let state = TableViewState::from_params(&p, &keys(), 50);
        assert_eq!(state.pagination.page_size, 50);
        assert_eq!(state.pagination.page_index, 0);
    }

    #[test]
    fn sort_prefix_means_descending() {
        let p = QueryParams::parse("sort=-dag_id&sort=owners");
        let state = TableViewState::from_params(&p, &keys(), 50);
        assert_eq!(
            state.sorting,
            vec![
                SortSpec {
                    id: "dag_id".to_owned(),
                    desc: true
                },
                SortSpec {
                    id: "owners".to_owned(),
                    desc: false
                },
            ]
        );
        assert_eq!(state.order_by().as_deref(), Some("-dag_id"));
    }

    #[test]
    fn write_omits_defaults() {
        let mut p = QueryParams::parse("tags=etl&offset=100&limit=50");
        let state = TableViewState::new(50);
        state.write_to(&mut p, &keys(), 50);
        assert_eq!(p.to_query_string(), "tags=etl");
    }

    #[test]
    fn write_sets_offset_and_custom_limit() {
        let mut p = QueryParams::new();
        let mut state = TableViewState::new(50);
        state.pagination = Pagination {
            page_index: 2,
            page_size: 20,
        };
        state.sorting = vec![SortSpec::parse("-dag_display_name")];
        state.write_to(&mut p, &keys(), 50);
        assert_eq!(p.get("limit"), Some("20"));
        assert_eq!(p.get("offset"), Some("40"));
        assert_eq!(p.get_all("sort"), vec!["-dag_display_name"]);
    }

    #[test]
    fn first_page_keeps_sorting() {
        let p = QueryParams::parse("offset=100&sort=-dag_id");
        let state = TableViewState::from_params(&p, &keys(), 50).first_page();
        assert_eq!(state.pagination.page_index, 0);
        assert_eq!(state.sorting, vec![SortSpec::parse("-dag_id")]);
    }

    #[test]
    fn next_page_stops_at_last_page() {
        let state = TableViewState::new(50);
        let second = state.next_page(120);
        assert_eq!(second.pagination.page_index, 1);
        let third = second.next_page(120);
        assert_eq!(third.pagination.page_index, 2);
        assert_eq!(third.next_page(120).pagination.page_index, 2);
        assert_eq!(state.prev_page().pagination.page_index, 0);
    }

    #[test]
    fn toggle_sort_cycles_direction() {
        let state = TableViewState::new(50);
        let asc = state.toggle_sort("dag_display_name");
        assert_eq!(asc.order_by().as_deref(), Some("dag_display_name"));
        let desc = asc.toggle_sort("dag_display_name");
        assert_eq!(desc.order_by().as_deref(), Some("-dag_display_name"));
        let other = desc.toggle_sort("dag_id");
        assert_eq!(other.order_by().as_deref(), Some("dag_id"));
    }

    #[test]
    fn huge_offset_does_not_overflow() {
        let p = QueryParams::parse("offset=18446744073709551615&limit=10");
        let state = TableViewState::from_params(&p, &keys(), 50);
        assert_eq!(state.pagination.page_index, usize::MAX / 10);
        assert_eq!(state.offset(), usize::MAX / 10 * 10);
        assert_eq!(state.next_page(120), state);

        let p = QueryParams::parse("offset=18446744073709551615&limit=1");
        let state = TableViewState::from_params(&p, &keys(), 50);
        assert_eq!(state.offset(), usize::MAX);
        assert_eq!(state.next_page(usize::MAX), state);
    }

    #[test]
    fn page_count_is_at_least_one() {
        let state = TableViewState::new(50);
        assert_eq!(state.page_count(0), 1);
        assert_eq!(state.page_count(50), 1);
        assert_eq!(state.page_count(51), 2);
    }
}
