use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use iocraft::prelude::*;

use crate::airflow::DagQuery;
use crate::color::ColorDepth;
use crate::components::filter_bar::{FilterBar, RenderedFilterBar};
use crate::components::footer::{self, Footer, RenderedFooter};
use crate::components::table::{
    Cell, Column, RenderedTable, Row, ScrollableTable, TableBuildConfig,
};
use crate::components::tag_select::{self, RenderedTagSelect, TagSelect};
use crate::components::text_input::{RenderedTextInput, TextInput};
use crate::config::types::AppConfig;
use crate::engine::{EngineHandle, Event, Request};
use crate::filter::{DagFilters, PausedFilter, RunStateFilter, TagList};
use crate::navigation::{NavigationHistory, QueryParamStore};
use crate::params::QueryParams;
use crate::theme::ResolvedTheme;
use crate::types::Dag;
use crate::util;

use super::default_theme;

/// Column the `s` key sorts by.
const SORT_COLUMN: &str = "dag_display_name";

// ---------------------------------------------------------------------------
// Columns and rows
// ---------------------------------------------------------------------------

fn dag_columns() -> Vec<Column> {
    vec![
        Column {
            id: "name",
            header: "DAG",
            width_pct: 0.28,
            align: TextAlign::Left,
        },
        Column {
            id: "tags",
            header: "Tags",
            width_pct: 0.18,
            align: TextAlign::Left,
        },
        Column {
            id: "owners",
            header: "Owner",
            width_pct: 0.14,
            align: TextAlign::Left,
        },
        Column {
            id: "schedule",
            header: "Schedule",
            width_pct: 0.14,
            align: TextAlign::Left,
        },
        Column {
            id: "next_run",
            header: "Next run",
            width_pct: 0.14,
            align: TextAlign::Right,
        },
        Column {
            id: "paused",
            header: "State",
            width_pct: 0.12,
            align: TextAlign::Right,
        },
    ]
}

pub(crate) fn dag_to_row(dag: &Dag, theme: &ResolvedTheme, date_format: &str) -> Row {
    let name_color = if dag.is_paused {
        theme.text_faint
    } else {
        theme.text_primary
    };
    let mut row = Row::new();
    row.insert("name", Cell::colored(dag.name(), name_color).bold());
    row.insert(
        "tags",
        Cell::colored(dag.tag_names().collect::<Vec<_>>().join(", "), theme.text_accent),
    );
    row.insert("owners", Cell::colored(dag.owners.join(", "), theme.text_secondary));
    row.insert(
        "schedule",
        Cell::colored(
            dag.timetable_summary.as_deref().unwrap_or("None"),
            theme.text_secondary,
        ),
    );
    row.insert(
        "next_run",
        Cell::colored(
            dag.next_dagrun_run_after
                .map(|dt| util::format_date(&dt, date_format))
                .unwrap_or_default(),
            theme.text_secondary,
        ),
    );
    row.insert(
        "paused",
        if dag.is_paused {
            Cell::colored("paused", theme.text_warning)
        } else {
            Cell::colored("active", theme.text_success)
        },
    );
    row
}

// ---------------------------------------------------------------------------
// Key handling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Search,
    TagSelect,
}

/// What a key press in normal mode asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NormalAction {
    Navigate(QueryParams),
    Back,
    Forward,
    Refresh,
    OpenSearch,
    OpenTagSelect,
    CursorDown,
    CursorUp,
    Quit,
    Ignore,
}

pub(crate) fn quick_filter_for_key(c: char) -> Option<RunStateFilter> {
    match c {
        '1' => Some(RunStateFilter::All),
        '2' => Some(RunStateFilter::Failed),
        '3' => Some(RunStateFilter::Running),
        '4' => Some(RunStateFilter::Success),
        _ => None,
    }
}

pub(crate) fn normal_key_action(
    code: KeyCode,
    params: &QueryParams,
    filters: &DagFilters,
    total_entries: usize,
) -> NormalAction {
    if let KeyCode::Char(c) = code
        && let Some(filter) = quick_filter_for_key(c)
    {
        return NormalAction::Navigate(filters.set_run_state(params, filter));
    }
    match code {
        KeyCode::Char('p') => {
            let next = filters
                .state(params)
                .paused_filter()
                .unwrap_or(PausedFilter::All)
                .next();
            NormalAction::Navigate(filters.set_paused_filter(params, &[next.value()]))
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let table = filters.table_state(params).next_page(total_entries);
            NormalAction::Navigate(filters.set_table_state(params, &table))
        }
        KeyCode::Left | KeyCode::Char('h') => {
            let table = filters.table_state(params).prev_page();
            NormalAction::Navigate(filters.set_table_state(params, &table))
        }
        KeyCode::Char('s') => {
            let table = filters.table_state(params).toggle_sort(SORT_COLUMN);
            NormalAction::Navigate(filters.set_table_state(params, &table))
        }
        KeyCode::Char('t') => NormalAction::OpenTagSelect,
        KeyCode::Char('/') => NormalAction::OpenSearch,
        KeyCode::Char('[') => NormalAction::Back,
        KeyCode::Char(']') => NormalAction::Forward,
        KeyCode::Char('r' | 'R') => NormalAction::Refresh,
        KeyCode::Char('j') | KeyCode::Down => NormalAction::CursorDown,
        KeyCode::Char('k') | KeyCode::Up => NormalAction::CursorUp,
        KeyCode::Char('q') | KeyCode::Esc => NormalAction::Quit,
        _ => NormalAction::Ignore,
    }
}

/// Push `next` to the history; a no-op when nothing changed.
fn navigate(mut history: State<NavigationHistory>, mut cursor: State<usize>, next: QueryParams) {
    let mut h = history.read().clone();
    if h.set_search_params(next) {
        history.set(h);
        cursor.set(0);
    }
}

/// An error for a page the user has navigated away from.
fn is_stale(current: &QueryParams, location: Option<&QueryParams>) -> bool {
    location.is_some_and(|loc| loc != current)
}

fn step_history(
    mut history: State<NavigationHistory>,
    mut cursor: State<usize>,
    step: fn(&mut NavigationHistory) -> bool,
) {
    let mut h = history.read().clone();
    if step(&mut h) {
        history.set(h);
        cursor.set(0);
    }
}

// ---------------------------------------------------------------------------
// Page data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct PageData {
    dags: Vec<Dag>,
    total_entries: usize,
    loading: bool,
    error: Option<String>,
    updated: Option<Instant>,
}

fn status_text(page: &PageData) -> (String, bool) {
    if let Some(err) = &page.error {
        return (err.clone(), true);
    }
    if page.loading {
        return ("Loading\u{2026}".to_owned(), false);
    }
    let text = page.updated.map_or_else(String::new, |t| {
        let secs = t.elapsed().as_secs();
        if secs < 60 {
            format!("Updated ~{secs}s ago")
        } else {
            format!("Updated ~{}m ago", secs / 60)
        }
    });
    (text, false)
}

// ---------------------------------------------------------------------------
// DagsView component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct DagsViewProps<'a> {
    pub engine: Option<&'a EngineHandle>,
    pub config: Option<&'a AppConfig>,
    pub theme: Option<&'a ResolvedTheme>,
    pub color_depth: ColorDepth,
    pub width: u16,
    pub height: u16,
    /// Location the view opens on.
    pub initial_location: Option<QueryParams>,
    pub should_exit: Option<State<bool>>,
}

#[component]
#[allow(clippy::too_many_lines)]
pub fn DagsView<'a>(props: &DagsViewProps<'a>, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let theme = props.theme.cloned().unwrap_or_else(default_theme);
    let depth = props.color_depth;
    let config = props.config.cloned().unwrap_or_default();
    let filters = DagFilters::new(config.search_params.clone(), config.defaults.page_size);
    let date_format = config.defaults.date_format.clone();
    let history_limit = config.defaults.history_limit;
    let mut should_exit = props.should_exit;

    let initial = props.initial_location.clone().unwrap_or_default();
    let history = hooks.use_state(move || NavigationHistory::new(initial, history_limit));
    let mut tag_list = hooks.use_state(TagList::default);
    let mut page = hooks.use_state(PageData::default);
    // Location of the last page request; a mismatch with the current
    // location triggers a fetch.
    let mut requested = hooks.use_state(|| Option::<QueryParams>::None);
    let mut force_refresh = hooks.use_state(|| false);
    let mut tags_requested = hooks.use_state(|| false);
    let mut cursor = hooks.use_state(|| 0usize);
    let mut input_mode = hooks.use_state(|| InputMode::Normal);
    let mut input_buffer = hooks.use_state(String::new);
    let mut tag_cursor = hooks.use_state(|| 0usize);

    // Event channel: engine pushes events back to UI.
    let event_channel = hooks.use_state(|| {
        let (tx, rx) = std::sync::mpsc::channel::<Event>();
        (tx, Arc::new(Mutex::new(rx)))
    });
    let (event_tx, event_rx) = event_channel.read().clone();
    let engine: Option<EngineHandle> = props.engine.cloned();

    if !tags_requested.get()
        && let Some(ref eng) = engine
    {
        // Read before the page request below clears it.
        eng.send(Request::FetchDagTags {
            order_by: "name".to_owned(),
            force: force_refresh.get(),
            reply_tx: event_tx.clone(),
        });
        tags_requested.set(true);
    }

    let current = history.read().current().clone();
    if requested.read().as_ref() != Some(&current)
        && let Some(ref eng) = engine
    {
        let force = force_refresh.get();
        if force {
            force_refresh.set(false);
        }
        tracing::debug!(location = %current, force, "requesting DAG page");
        eng.send(Request::FetchDags {
            query: DagQuery::from_params(&current, &filters),
            force,
            reply_tx: event_tx.clone(),
        });
        requested.set(Some(current.clone()));
        let mut p = page.read().clone();
        p.loading = true;
        p.error = None;
        page.set(p);
    }

    // Event polling: drain events from engine reply channel.
    hooks.use_future(async move {
        loop {
            smol::Timer::after(Duration::from_millis(100)).await;
            let events: Vec<Event> = match event_rx.lock() {
                Ok(rx) => rx.try_iter().collect(),
                Err(_) => Vec::new(),
            };
            for evt in events {
                match evt {
                    Event::DagTagsFetched { tags } => {
                        tracing::debug!(count = tags.len(), "tags received");
                        tag_list.set(TagList::from_fetched(tags));
                    }
                    Event::DagsFetched {
                        location,
                        dags,
                        total_entries,
                    } => {
                        if *history.read().current() != location {
                            tracing::debug!(%location, "dropping stale DAG page");
                            continue;
                        }
                        page.set(PageData {
                            dags,
                            total_entries,
                            loading: false,
                            error: None,
                            updated: Some(Instant::now()),
                        });
                    }
                    Event::FetchError {
                        context,
                        location,
                        message,
                    } => {
                        if is_stale(history.read().current(), location.as_ref()) {
                            tracing::debug!(%context, "dropping stale fetch error");
                        } else if context == "FetchDagTags" {
                            tracing::warn!("tag fetch failed: {message}");
                            tag_list.set(TagList::Empty);
                        } else {
                            tracing::warn!("{context} failed: {message}");
                            let mut p = page.read().clone();
                            p.loading = false;
                            p.error = Some(message);
                            page.set(p);
                        }
                    }
                }
            }
        }
    });

    // Keyboard handling.
    let filters_kb = filters.clone();
    hooks.use_terminal_events(move |event| match event {
        TerminalEvent::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) if kind != KeyEventKind::Release => {
            let current = history.read().current().clone();
            match input_mode.get() {
                InputMode::Normal => {
                    let total = page.read().total_entries;
                    let row_count = page.read().dags.len();
                    match normal_key_action(code, &current, &filters_kb, total) {
                        NormalAction::Navigate(next) => navigate(history, cursor, next),
                        NormalAction::Back => step_history(history, cursor, NavigationHistory::back),
                        NormalAction::Forward => {
                            step_history(history, cursor, NavigationHistory::forward);
                        }
                        NormalAction::Refresh => {
                            force_refresh.set(true);
                            requested.set(None);
                            tags_requested.set(false);
                        }
                        NormalAction::OpenSearch => {
                            let pattern = current
                                .get(&filters_kb.keys().name_pattern)
                                .unwrap_or_default()
                                .to_owned();
                            input_buffer.set(pattern);
                            input_mode.set(InputMode::Search);
                        }
                        NormalAction::OpenTagSelect => {
                            input_buffer.set(String::new());
                            tag_cursor.set(0);
                            input_mode.set(InputMode::TagSelect);
                        }
                        NormalAction::CursorDown => {
                            if cursor.get() + 1 < row_count {
                                cursor.set(cursor.get() + 1);
                            }
                        }
                        NormalAction::CursorUp => {
                            cursor.set(cursor.get().saturating_sub(1));
                        }
                        NormalAction::Quit => {
                            if let Some(ref mut exit) = should_exit {
                                exit.set(true);
                            }
                        }
                        NormalAction::Ignore => {}
                    }
                }
                InputMode::Search => match code {
                    KeyCode::Esc => input_mode.set(InputMode::Normal),
                    KeyCode::Enter => {
                        let next = filters_kb.set_name_pattern(&current, &input_buffer.read());
                        navigate(history, cursor, next);
                        input_mode.set(InputMode::Normal);
                    }
                    KeyCode::Backspace => {
                        let mut q = input_buffer.read().clone();
                        q.pop();
                        input_buffer.set(q);
                    }
                    KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                        let mut q = input_buffer.read().clone();
                        q.push(ch);
                        input_buffer.set(q);
                    }
                    _ => {}
                },
                InputMode::TagSelect => {
                    let options =
                        tag_select::filter_tag_options(&tag_list.read().options(), &input_buffer.read());
                    match code {
                        KeyCode::Esc => input_mode.set(InputMode::Normal),
                        KeyCode::Down => {
                            if tag_cursor.get() + 1 < options.len() {
                                tag_cursor.set(tag_cursor.get() + 1);
                            }
                        }
                        KeyCode::Up => tag_cursor.set(tag_cursor.get().saturating_sub(1)),
                        KeyCode::Char('x') if modifiers.contains(KeyModifiers::CONTROL) => {
                            let next = filters_kb.set_tag_filter(&current, Vec::<String>::new());
                            navigate(history, cursor, next);
                        }
                        KeyCode::Char(' ') | KeyCode::Enter => {
                            if let Some(opt) = options.get(tag_cursor.get()) {
                                let toggled = filters_kb.state(&current).with_tag_toggled(&opt.value);
                                let next =
                                    filters_kb.set_tag_filter(&current, toggled.tags().iter().cloned());
                                navigate(history, cursor, next);
                            }
                        }
                        KeyCode::Backspace => {
                            let mut q = input_buffer.read().clone();
                            q.pop();
                            input_buffer.set(q);
                            tag_cursor.set(0);
                        }
                        KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                            let mut q = input_buffer.read().clone();
                            q.push(ch);
                            input_buffer.set(q);
                            tag_cursor.set(0);
                        }
                        _ => {}
                    }
                }
            }
        }
        _ => {}
    });

    // --- Render ---

    let filter_state = filters.state(&current);
    let filter_bar = RenderedFilterBar::build(&filter_state, &theme, depth);

    let page_ref = page.read();
    let rows: Vec<Row> = page_ref
        .dags
        .iter()
        .map(|d| dag_to_row(d, &theme, &date_format))
        .collect();
    let cursor_pos = cursor.get().min(rows.len().saturating_sub(1));
    let mode = input_mode.get();
    let chrome = if mode == InputMode::Search { 8 } else { 6 };
    let visible_rows = usize::from(props.height.saturating_sub(chrome)).max(1);
    let columns = dag_columns();
    let empty_message = if page_ref.loading {
        "Loading DAGs\u{2026}"
    } else {
        "No DAGs match the current filters"
    };
    let table = RenderedTable::build(&TableBuildConfig {
        columns: &columns,
        rows: &rows,
        cursor: cursor_pos,
        visible_rows,
        total_width: props.width.saturating_sub(2),
        depth,
        selected_bg: theme.bg_selected,
        header_color: theme.text_primary,
        border_color: theme.border_faint,
        faint_color: theme.text_faint,
        empty_message: Some(empty_message),
    });

    let table_state = filters.table_state(&current);
    let page_text = format!(
        "{}  \u{2022}  page {}/{}",
        footer::format_page_position(table_state.offset(), rows.len(), page_ref.total_entries),
        table_state.pagination.page_index.saturating_add(1),
        table_state.page_count(page_ref.total_entries),
    );
    let (status, is_error) = status_text(&page_ref);
    let footer = RenderedFooter::build(current.to_string(), page_text, status, is_error, &theme, depth);
    drop(page_ref);

    let search_input = (mode == InputMode::Search).then(|| {
        RenderedTextInput::build(
            "Search DAGs:",
            &input_buffer.read(),
            "Enter apply  Esc cancel",
            &theme,
            depth,
        )
    });
    let tag_overlay = (mode == InputMode::TagSelect).then(|| {
        RenderedTagSelect::build(
            &tag_list.read(),
            filter_state.tags(),
            &input_buffer.read(),
            tag_cursor.get(),
            &theme,
            depth,
        )
    });

    let width = props.width;
    let height = props.height;

    element! {
        View(
            width: u32::from(width),
            height: u32::from(height),
            flex_direction: FlexDirection::Column,
        ) {
            FilterBar(filter_bar: Some(filter_bar))
            View(flex_grow: 1.0, padding_left: 1, overflow: Overflow::Hidden) {
                ScrollableTable(table: Some(table))
            }
            #(search_input.map(|input| element! {
                TextInput(input: Some(input))
            }))
            Footer(footer: Some(footer))
            #(tag_overlay.map(|overlay| element! {
                TagSelect(overlay: Some(overlay), width, height)
            }))
        }
    }
}
