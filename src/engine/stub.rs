use std::cmp::Ordering;

use serde::Deserialize;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::airflow::DagQuery;
use crate::types::Dag;

use super::interface::{Engine, EngineHandle, Event, Request};

/// A stub engine that serves pre-loaded fixture data without any network calls.
///
/// Filtering, sorting and paging are applied locally, the way the server
/// would. Used by integration tests and `dag-board demo`.
#[derive(Debug, Clone, Default)]
pub struct StubEngine {
    pub dags: Vec<Dag>,
    pub tags: Vec<String>,
    /// When set, tag requests fail with this message.
    pub tag_error: Option<String>,
}

#[derive(Deserialize)]
struct DemoData {
    tags: Vec<String>,
    dags: Vec<Dag>,
}

impl StubEngine {
    /// Fixture data bundled with the binary.
    pub fn demo() -> Self {
        let data: DemoData = serde_json::from_str(include_str!("../../assets/demo_dags.json"))
            .unwrap_or(DemoData {
                tags: Vec::new(),
                dags: Vec::new(),
            });
        Self {
            dags: data.dags,
            tags: data.tags,
            tag_error: None,
        }
    }

    /// Apply `query` to the fixture list. Returns the page and the total
    /// number of matches.
    pub fn select(&self, query: &DagQuery) -> (Vec<Dag>, usize) {
        let pattern = query
            .dag_display_name_pattern
            .as_deref()
            .map(str::to_lowercase);

        let mut matched: Vec<&Dag> = self
            .dags
            .iter()
            .filter(|d| query.paused.is_none_or(|p| d.is_paused == p))
            .filter(|d| {
                query.tags.is_empty() || d.tag_names().any(|t| query.tags.iter().any(|q| q == t))
            })
            .filter(|d| {
                query.last_dag_run_state.as_deref().is_none_or(|state| {
                    d.last_run_state.is_some_and(|s| s.as_str() == state)
                })
            })
            .filter(|d| {
                pattern
                    .as_deref()
                    .is_none_or(|p| d.name().to_lowercase().contains(p))
            })
            .collect();

        if let Some(order_by) = &query.order_by {
            let (field, desc) = match order_by.strip_prefix('-') {
                Some(f) => (f, true),
                None => (order_by.as_str(), false),
            };
            matched.sort_by(|a, b| {
                let ord = compare_by(a, b, field);
                if desc { ord.reverse() } else { ord }
            });
        }

        let total = matched.len();
        let page = matched
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect();
        (page, total)
    }
}

fn compare_by(a: &Dag, b: &Dag, field: &str) -> Ordering {
    match field {
        "dag_display_name" => a.name().cmp(b.name()),
        "next_dagrun_run_after" => a.next_dagrun_run_after.cmp(&b.next_dagrun_run_after),
        _ => a.dag_id.cmp(&b.dag_id),
    }
}

impl Engine for StubEngine {
    fn start(self) -> EngineHandle {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Request>();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("stub tokio runtime");
            rt.block_on(self.run_loop(rx));
        });
        EngineHandle::new(tx)
    }
}

impl StubEngine {
    async fn run_loop(self, mut rx: UnboundedReceiver<Request>) {
        while let Some(req) = rx.recv().await {
            match req {
                Request::FetchDagTags { reply_tx, .. } => {
                    let event = match &self.tag_error {
                        Some(message) => Event::FetchError {
                            context: "FetchDagTags".into(),
                            location: None,
                            message: message.clone(),
                        },
                        None => {
                            let mut tags = self.tags.clone();
                            tags.sort();
                            Event::DagTagsFetched { tags }
                        }
                    };
                    let _ = reply_tx.send(event);
                }
                Request::FetchDags {
                    query, reply_tx, ..
                } => {
                    let (dags, total_entries) = self.select(&query);
                    let _ = reply_tx.send(Event::DagsFetched {
                        location: query.location,
                        dags,
                        total_entries,
                    });
                }
            }
        }
    }
}
