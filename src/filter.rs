//! DAG list filters bound to the query string.
//!
//! Three controls share the address bar: the run-state quick filters, the
//! enabled/disabled dropdown and the tag multi-select. [`FilterState`] is the
//! decoded, immutable view of those parameters; [`DagFilters`] owns the
//! handlers that turn a user interaction into the next query string.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use thiserror::Error;

use crate::config::types::SearchParamKeys;
use crate::params::QueryParams;
use crate::table_state::TableViewState;

/// Empty-state text of the tag dropdown.
pub const NO_TAGS_MESSAGE: &str = "No tags found";
/// Shown in the tag control while nothing is selected.
pub const TAG_PLACEHOLDER: &str = "Filter by tag";
/// Title of the tag control.
pub const TAG_FILTER_TITLE: &str = "Filter Dags by tag";

// ---------------------------------------------------------------------------
// Run state quick filter
// ---------------------------------------------------------------------------

/// Quick filter on the state of each DAG's most recent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStateFilter {
    All,
    Failed,
    Running,
    Success,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown run state \"{0}\"")]
pub struct UnknownRunState(pub String);

impl RunStateFilter {
    /// Button order in the filter bar.
    pub const BUTTONS: [RunStateFilter; 4] = [
        RunStateFilter::All,
        RunStateFilter::Failed,
        RunStateFilter::Running,
        RunStateFilter::Success,
    ];

    /// Value carried by the button. `"all"` is never written to the URL.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Failed => "failed",
            Self::Running => "running",
            Self::Success => "success",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Failed => "Failed",
            Self::Running => "Running",
            Self::Success => "Success",
        }
    }
}

impl FromStr for RunStateFilter {
    type Err = UnknownRunState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::BUTTONS
            .into_iter()
            .find(|f| f.as_param() == s)
            .ok_or_else(|| UnknownRunState(s.to_owned()))
    }
}

impl fmt::Display for RunStateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Which quick-filter button is highlighted.
///
/// For the four known parameter states exactly one flag is set. An
/// unrecognised value leaves every flag cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuickFilterFlags {
    pub is_all: bool,
    pub is_running: bool,
    pub is_failed: bool,
    pub is_success: bool,
}

impl QuickFilterFlags {
    pub fn from_param(state: Option<&str>) -> Self {
        Self {
            is_all: state.is_none(),
            is_running: state == Some("running"),
            is_failed: state == Some("failed"),
            is_success: state == Some("success"),
        }
    }

    pub fn is_active(&self, filter: RunStateFilter) -> bool {
        match filter {
            RunStateFilter::All => self.is_all,
            RunStateFilter::Failed => self.is_failed,
            RunStateFilter::Running => self.is_running,
            RunStateFilter::Success => self.is_success,
        }
    }
}

// ---------------------------------------------------------------------------
// Paused dropdown
// ---------------------------------------------------------------------------

/// Options of the enabled/disabled dropdown.
///
/// The stored value is the DAG's *paused* flag, so "Enabled" stores `"false"`
/// and "Disabled" stores `"true"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PausedFilter {
    All,
    Enabled,
    Disabled,
}

impl PausedFilter {
    pub const OPTIONS: [PausedFilter; 3] = [
        PausedFilter::All,
        PausedFilter::Enabled,
        PausedFilter::Disabled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
        }
    }

    /// Option value as handed to the change handler.
    pub fn value(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Enabled => "false",
            Self::Disabled => "true",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::OPTIONS.into_iter().find(|o| o.value() == value)
    }

    /// Next option in dropdown order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Enabled,
            Self::Enabled => Self::Disabled,
            Self::Disabled => Self::All,
        }
    }
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// An entry of the tag multi-select. Label and value are always the tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagOption {
    pub label: String,
    pub value: String,
}

impl TagOption {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            label: tag.clone(),
            value: tag,
        }
    }
}

/// Known tags as delivered by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagList {
    /// Request sent, no answer yet.
    #[default]
    Pending,
    Ready(Vec<String>),
    /// The backend answered with no tags, or the fetch failed.
    Empty,
}

impl TagList {
    pub fn from_fetched(tags: Vec<String>) -> Self {
        if tags.is_empty() {
            Self::Empty
        } else {
            Self::Ready(tags)
        }
    }

    /// Dropdown options; nothing while pending or empty.
    pub fn options(&self) -> Vec<TagOption> {
        match self {
            Self::Ready(tags) => tags.iter().cloned().map(TagOption::new).collect(),
            Self::Pending | Self::Empty => Vec::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

// ---------------------------------------------------------------------------
// FilterState
// ---------------------------------------------------------------------------

/// Filter values decoded from the query string.
///
/// Raw parameter values are kept as-is so that unknown values survive a
/// round trip through the handlers untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    run_state: Option<String>,
    paused: Option<String>,
    tags: IndexSet<String>,
}

impl FilterState {
    pub fn from_params(params: &QueryParams, keys: &SearchParamKeys) -> Self {
        Self {
            run_state: params.get(&keys.last_dag_run_state).map(str::to_owned),
            paused: params.get(&keys.paused).map(str::to_owned),
            tags: params
                .get_all(&keys.tags)
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Raw run-state parameter.
    pub fn run_state_param(&self) -> Option<&str> {
        self.run_state.as_deref()
    }

    /// Active quick filter, or `None` when the parameter holds an unknown value.
    pub fn run_state(&self) -> Option<RunStateFilter> {
        match self.run_state.as_deref() {
            None => Some(RunStateFilter::All),
            Some(raw) => raw.parse().ok(),
        }
    }

    pub fn quick_filter_flags(&self) -> QuickFilterFlags {
        QuickFilterFlags::from_param(self.run_state.as_deref())
    }

    /// Raw paused parameter.
    pub fn paused_param(&self) -> Option<&str> {
        self.paused.as_deref()
    }

    /// Value selected in the dropdown: `"All"` when absent, raw otherwise.
    pub fn paused_value(&self) -> &str {
        self.paused.as_deref().unwrap_or(PausedFilter::All.value())
    }

    /// Dropdown text. Unknown values are shown verbatim.
    pub fn paused_label(&self) -> &str {
        let value = self.paused_value();
        match PausedFilter::from_value(value) {
            Some(option) => option.label(),
            None => value,
        }
    }

    pub fn paused_filter(&self) -> Option<PausedFilter> {
        PausedFilter::from_value(self.paused_value())
    }

    /// `paused` argument of the DAG list request.
    pub fn paused_query(&self) -> Option<bool> {
        self.paused.as_deref().map(|v| v == "true")
    }

    pub fn tags(&self) -> &IndexSet<String> {
        &self.tags
    }

    /// Options the tag control shows as selected, in parameter order.
    pub fn selected_tag_options(&self) -> Vec<TagOption> {
        self.tags.iter().cloned().map(TagOption::new).collect()
    }

    pub fn with_run_state(&self, value: RunStateFilter) -> Self {
        Self {
            run_state: match value {
                RunStateFilter::All => None,
                other => Some(other.as_param().to_owned()),
            },
            ..self.clone()
        }
    }

    /// Apply a single-select change; only the first value counts.
    pub fn with_paused_selection(&self, values: &[&str]) -> Self {
        let paused = match values.first() {
            None => None,
            Some(&v) if v == PausedFilter::All.value() => None,
            Some(&v) => Some(v.to_owned()),
        };
        Self {
            paused,
            ..self.clone()
        }
    }

    pub fn with_tags<I, S>(&self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    /// Selection after clicking `tag`: removed when selected, appended otherwise.
    pub fn with_tag_toggled(&self, tag: &str) -> Self {
        let mut tags = self.tags.clone();
        if !tags.shift_remove(tag) {
            tags.insert(tag.to_owned());
        }
        Self {
            tags,
            ..self.clone()
        }
    }

    fn write_run_state(&self, params: &mut QueryParams, keys: &SearchParamKeys) {
        match &self.run_state {
            Some(v) => params.set(&keys.last_dag_run_state, v.clone()),
            None => params.delete(&keys.last_dag_run_state),
        }
    }

    fn write_paused(&self, params: &mut QueryParams, keys: &SearchParamKeys) {
        match &self.paused {
            Some(v) => params.set(&keys.paused, v.clone()),
            None => params.delete(&keys.paused),
        }
    }

    fn write_tags(&self, params: &mut QueryParams, keys: &SearchParamKeys) {
        params.delete(&keys.tags);
        for tag in &self.tags {
            params.append(&keys.tags, tag.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// The filter bar's change handlers.
///
/// Every handler is a pure function from the current query string to the
/// next one; the caller pushes the result to its [`QueryParamStore`].
///
/// [`QueryParamStore`]: crate::navigation::QueryParamStore
#[derive(Debug, Clone)]
pub struct DagFilters {
    keys: SearchParamKeys,
    default_page_size: usize,
}

impl DagFilters {
    /// A zero page size is treated as 1.
    pub fn new(keys: SearchParamKeys, default_page_size: usize) -> Self {
        Self {
            keys,
            default_page_size: default_page_size.max(1),
        }
    }

    pub fn keys(&self) -> &SearchParamKeys {
        &self.keys
    }

    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    pub fn state(&self, params: &QueryParams) -> FilterState {
        FilterState::from_params(params, &self.keys)
    }

    pub fn table_state(&self, params: &QueryParams) -> TableViewState {
        TableViewState::from_params(params, &self.keys, self.default_page_size)
    }

    /// Quick-filter click. Returns to the first page.
    pub fn set_run_state(&self, params: &QueryParams, value: RunStateFilter) -> QueryParams {
        let next = self.state(params).with_run_state(value);
        let mut out = params.clone();
        next.write_run_state(&mut out, &self.keys);
        self.reset_pagination(&mut out);
        tracing::debug!(state = %value, query = %out, "run state filter changed");
        out
    }

    /// Enabled/disabled dropdown change. Returns to the first page.
    pub fn set_paused_filter(&self, params: &QueryParams, values: &[&str]) -> QueryParams {
        let next = self.state(params).with_paused_selection(values);
        let mut out = params.clone();
        next.write_paused(&mut out, &self.keys);
        self.reset_pagination(&mut out);
        tracing::debug!(query = %out, "paused filter changed");
        out
    }

    /// Tag multi-select change with the complete new selection.
    ///
    /// One `tags` entry is written per distinct tag, in selection order; a
    /// tag listed twice is written once. Pagination is left alone.
    pub fn set_tag_filter<I, S>(&self, params: &QueryParams, tags: I) -> QueryParams
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next = self.state(params).with_tags(tags);
        let mut out = params.clone();
        next.write_tags(&mut out, &self.keys);
        tracing::debug!(query = %out, "tag filter changed");
        out
    }

    /// Name search submit. An empty pattern removes the parameter. Returns to
    /// the first page.
    pub fn set_name_pattern(&self, params: &QueryParams, pattern: &str) -> QueryParams {
        let mut out = params.clone();
        let pattern = pattern.trim();
        if pattern.is_empty() {
            out.delete(&self.keys.name_pattern);
        } else {
            out.set(&self.keys.name_pattern, pattern);
        }
        self.reset_pagination(&mut out);
        out
    }

    /// Page or sort change.
    pub fn set_table_state(&self, params: &QueryParams, table: &TableViewState) -> QueryParams {
        let mut out = params.clone();
        table.write_to(&mut out, &self.keys, self.default_page_size);
        out
    }

    fn reset_pagination(&self, params: &mut QueryParams) {
        let table = self.table_state(params).first_page();
        table.write_to(params, &self.keys, self.default_page_size);
    }
}
