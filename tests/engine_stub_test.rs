use std::sync::mpsc::Receiver;
use std::time::Duration;

use dag_board::airflow::DagQuery;
use dag_board::config::types::SearchParamKeys;
use dag_board::engine::{Engine, EngineHandle, Event, Request, StubEngine};
use dag_board::filter::{DagFilters, RunStateFilter};
use dag_board::params::QueryParams;
use dag_board::types::Dag;

fn filters() -> DagFilters {
    DagFilters::new(SearchParamKeys::default(), 50)
}

fn recv(rx: &Receiver<Event>) -> Event {
    rx.recv_timeout(Duration::from_secs(2))
        .expect("engine should reply within 2 seconds")
}

fn fetch_page(handle: &EngineHandle, params: &QueryParams) -> (QueryParams, Vec<Dag>, usize) {
    let (tx, rx) = std::sync::mpsc::channel::<Event>();
    handle.send(Request::FetchDags {
        query: DagQuery::from_params(params, &filters()),
        force: false,
        reply_tx: tx,
    });
    match recv(&rx) {
        Event::DagsFetched {
            location,
            dags,
            total_entries,
        } => (location, dags, total_entries),
        _other => panic!("expected DagsFetched, got a different event variant"),
    }
}

fn ids(dags: &[Dag]) -> Vec<&str> {
    dags.iter().map(|d| d.dag_id.as_str()).collect()
}

#[test]
fn demo_fixture_loads() {
    let stub = StubEngine::demo();
    assert_eq!(stub.dags.len(), 12);
    assert_eq!(stub.tags.len(), 10);
}

#[test]
fn unfiltered_page_echoes_location() {
    let handle = StubEngine::demo().start();
    let params = QueryParams::new();
    let (location, dags, total) = fetch_page(&handle, &params);
    assert_eq!(location, params);
    assert_eq!(dags.len(), 12);
    assert_eq!(total, 12);
}

#[test]
fn failed_and_enabled_filters_combine() {
    let handle = StubEngine::demo().start();
    let f = filters();
    let params = f.set_run_state(&QueryParams::new(), RunStateFilter::Failed);
    let params = f.set_paused_filter(&params, &["false"]);
    assert_eq!(params.to_query_string(), "last_dag_run_state=failed&paused=false");

    let (_, dags, total) = fetch_page(&handle, &params);
    assert_eq!(total, 2);
    assert_eq!(ids(&dags), vec!["ml_train_ranker", "cleanup_tmp_tables"]);
}

#[test]
fn tags_match_any_selected_tag() {
    let handle = StubEngine::demo().start();
    let params = filters().set_tag_filter(&QueryParams::new(), ["etl", "ml"]);
    let (_, _, total) = fetch_page(&handle, &params);
    assert_eq!(total, 7);
}

#[test]
fn unknown_run_state_matches_nothing() {
    let handle = StubEngine::demo().start();
    let (_, dags, total) = fetch_page(&handle, &QueryParams::parse("last_dag_run_state=bogus"));
    assert!(dags.is_empty());
    assert_eq!(total, 0);
}

#[test]
fn paging_and_sorting() {
    let handle = StubEngine::demo().start();

    let (_, dags, total) = fetch_page(&handle, &QueryParams::parse("limit=5&offset=10"));
    assert_eq!(total, 12);
    assert_eq!(dags.len(), 2);

    let (_, asc, _) = fetch_page(&handle, &QueryParams::parse("sort=dag_display_name&limit=1"));
    assert_eq!(ids(&asc), vec!["ml_score_batch"]);

    let (_, desc, _) = fetch_page(&handle, &QueryParams::parse("sort=-dag_display_name&limit=1"));
    assert_eq!(ids(&desc), vec!["example_python_operator"]);
}

#[test]
fn tags_are_sorted() {
    let stub = StubEngine {
        tags: vec!["zeta".into(), "alpha".into()],
        ..StubEngine::default()
    };
    let handle = stub.start();
    let (tx, rx) = std::sync::mpsc::channel::<Event>();
    handle.send(Request::FetchDagTags {
        order_by: "name".into(),
        force: false,
        reply_tx: tx,
    });
    match recv(&rx) {
        Event::DagTagsFetched { tags } => assert_eq!(tags, vec!["alpha", "zeta"]),
        _other => panic!("expected DagTagsFetched"),
    }
}

#[test]
fn tag_failure_is_reported() {
    let stub = StubEngine {
        tag_error: Some("boom".into()),
        ..StubEngine::default()
    };
    let handle = stub.start();
    let (tx, rx) = std::sync::mpsc::channel::<Event>();
    handle.send(Request::FetchDagTags {
        order_by: "name".into(),
        force: false,
        reply_tx: tx,
    });
    match recv(&rx) {
        Event::FetchError {
            context,
            location,
            message,
        } => {
            assert_eq!(context, "FetchDagTags");
            assert!(location.is_none());
            assert_eq!(message, "boom");
        }
        _other => panic!("expected FetchError"),
    }
}
