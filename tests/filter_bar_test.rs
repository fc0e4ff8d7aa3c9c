use dag_board::color::ColorDepth;
use dag_board::components::filter_bar::RenderedFilterBar;
use dag_board::components::tag_select::RenderedTagSelect;
use dag_board::config::types::{SearchParamKeys, Theme};
use dag_board::filter::{
    DagFilters, NO_TAGS_MESSAGE, PausedFilter, RunStateFilter, TAG_PLACEHOLDER, TagList, TagOption,
};
use dag_board::navigation::{NavigationHistory, QueryParamStore};
use dag_board::params::QueryParams;
use dag_board::theme::{Background, ResolvedTheme};
use indexmap::IndexSet;

fn filters() -> DagFilters {
    DagFilters::new(SearchParamKeys::default(), 50)
}

fn theme() -> ResolvedTheme {
    ResolvedTheme::resolve(&Theme::default(), Background::Dark)
}

fn active_buttons(query: &str) -> Vec<String> {
    let state = filters().state(&QueryParams::parse(query));
    RenderedFilterBar::build(&state, &theme(), ColorDepth::TrueColor)
        .buttons
        .into_iter()
        .filter(|b| b.is_active)
        .map(|b| b.label)
        .collect()
}

#[test]
fn exactly_one_quick_filter_is_active() {
    assert_eq!(active_buttons(""), vec!["1 All"]);
    assert_eq!(active_buttons("last_dag_run_state=failed"), vec!["2 Failed"]);
    assert_eq!(active_buttons("last_dag_run_state=running"), vec!["3 Running"]);
    assert_eq!(active_buttons("last_dag_run_state=success"), vec!["4 Success"]);
}

#[test]
fn unknown_run_state_highlights_nothing() {
    assert!(active_buttons("last_dag_run_state=queued").is_empty());
}

#[test]
fn all_removes_run_state_and_is_idempotent() {
    let f = filters();
    let p = QueryParams::parse("last_dag_run_state=failed&tags=etl");
    let cleared = f.set_run_state(&p, RunStateFilter::All);
    assert_eq!(cleared.to_query_string(), "tags=etl");
    assert_eq!(f.set_run_state(&cleared, RunStateFilter::All), cleared);
}

#[test]
fn paused_dropdown_values_are_inverted() {
    let f = filters();
    let empty = QueryParams::new();
    let enabled = f.set_paused_filter(&empty, &[PausedFilter::Enabled.value()]);
    assert_eq!(enabled.get("paused"), Some("false"));
    let disabled = f.set_paused_filter(&empty, &[PausedFilter::Disabled.value()]);
    assert_eq!(disabled.get("paused"), Some("true"));
    let all = f.set_paused_filter(&disabled, &[PausedFilter::All.value()]);
    assert!(!all.has("paused"));
    assert!(!f.set_paused_filter(&disabled, &[]).has("paused"));
}

#[test]
fn paused_label_follows_parameter() {
    let label = |q: &str| filters().state(&QueryParams::parse(q)).paused_label().to_owned();
    assert_eq!(label(""), "All");
    assert_eq!(label("paused=false"), "Enabled");
    assert_eq!(label("paused=true"), "Disabled");
    assert_eq!(label("paused=maybe"), "maybe");
}

#[test]
fn state_and_paused_changes_reset_page_but_keep_sort() {
    let f = filters();
    let p = QueryParams::parse("sort=-dag_display_name&offset=100");

    let after_state = f.set_run_state(&p, RunStateFilter::Running);
    assert!(!after_state.has("offset"));
    assert_eq!(after_state.get_all("sort"), vec!["-dag_display_name"]);

    let after_paused = f.set_paused_filter(&p, &["true"]);
    assert!(!after_paused.has("offset"));
    assert_eq!(after_paused.get_all("sort"), vec!["-dag_display_name"]);
}

#[test]
fn tag_selection_replaces_previous_entries() {
    let f = filters();
    let ab = f.set_tag_filter(&QueryParams::new(), ["a", "b"]);
    assert_eq!(ab.get_all("tags"), vec!["a", "b"]);
    let b = f.set_tag_filter(&ab, ["b"]);
    assert_eq!(b.get_all("tags"), vec!["b"]);
}

#[test]
fn tag_selection_keeps_page() {
    let p = QueryParams::parse("offset=50");
    let next = filters().set_tag_filter(&p, ["etl"]);
    assert_eq!(next.get("offset"), Some("50"));
}

#[test]
fn selected_tag_options_follow_parameter() {
    let state = filters().state(&QueryParams::parse("tags=ml"));
    assert_eq!(state.selected_tag_options(), vec![TagOption::new("ml")]);

    let selected: IndexSet<String> = state.tags().clone();
    let overlay = RenderedTagSelect::build(
        &TagList::from_fetched(vec!["etl".into(), "ml".into()]),
        &selected,
        "",
        0,
        &theme(),
        ColorDepth::TrueColor,
    );
    let picked: Vec<_> = overlay
        .items
        .iter()
        .filter(|i| i.is_selected)
        .map(|i| i.label.as_str())
        .collect();
    assert_eq!(picked, vec!["ml"]);
}

#[test]
fn no_tag_data_shows_empty_message() {
    let overlay = RenderedTagSelect::build(
        &TagList::Empty,
        &IndexSet::new(),
        "",
        0,
        &theme(),
        ColorDepth::TrueColor,
    );
    assert!(overlay.items.is_empty());
    assert_eq!(overlay.empty_message.as_deref(), Some(NO_TAGS_MESSAGE));
}

#[test]
fn tag_control_shows_placeholder_until_something_is_picked() {
    let bar = |q: &str| {
        RenderedFilterBar::build(
            &filters().state(&QueryParams::parse(q)),
            &theme(),
            ColorDepth::TrueColor,
        )
    };
    let empty = bar("");
    assert!(empty.tags_placeholder);
    assert_eq!(empty.tags_text, TAG_PLACEHOLDER);
    assert_eq!(bar("tags=etl&tags=ml").tags_text, "etl, ml");
}

#[test]
fn repeated_clicks_do_not_grow_history() {
    let f = filters();
    let mut history = NavigationHistory::new(QueryParams::new(), 100);
    let failed = f.set_run_state(history.search_params(), RunStateFilter::Failed);
    assert!(history.set_search_params(failed));
    let again = f.set_run_state(history.search_params(), RunStateFilter::Failed);
    assert!(!history.set_search_params(again));
    assert_eq!(history.depth(), 2);
    assert!(history.back());
    assert!(history.current().is_empty());
}

#[test]
fn custom_parameter_names_are_honoured() {
    let keys = SearchParamKeys {
        last_dag_run_state: "state".into(),
        paused: "is_paused".into(),
        ..SearchParamKeys::default()
    };
    let f = DagFilters::new(keys, 50);
    let p = f.set_run_state(&QueryParams::new(), RunStateFilter::Success);
    let p = f.set_paused_filter(&p, &["false"]);
    assert_eq!(p.to_query_string(), "state=success&is_paused=false");
}
