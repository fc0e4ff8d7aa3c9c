use std::sync::mpsc::Sender;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::airflow::AirflowClient;
use crate::config::types::AppConfig;
use crate::params::QueryParams;

use super::interface::{Engine, EngineHandle, Event, Request};

/// The real Airflow backend engine.
pub struct AirflowEngine {
    config: AppConfig,
}

impl AirflowEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

impl Engine for AirflowEngine {
    fn start(self) -> EngineHandle {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Request>();
        let handle = EngineHandle::new(tx);
        let _ = std::thread::Builder::new()
            .name("airflow-engine".to_owned())
            .spawn(move || {
                let rt = tokio::runtime::Runtime::new().expect("tokio runtime init");
                rt.block_on(self.run_loop(rx));
            });
        handle
    }
}

impl AirflowEngine {
    async fn run_loop(self, mut rx: UnboundedReceiver<Request>) {
        let mut client = match AirflowClient::new(&self.config.airflow) {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!("engine: cannot build Airflow client: {e}");
                None
            }
        };

        while let Some(req) = rx.recv().await {
            match client.as_mut() {
                Some(c) => handle_request(req, c).await,
                None => reply_unavailable(req, &self.config.airflow.base_url),
            }
        }
        tracing::debug!("engine: shutting down");
    }
}

// ---------------------------------------------------------------------------
// Request dispatch
// ---------------------------------------------------------------------------

async fn handle_request(req: Request, client: &mut AirflowClient) {
    match req {
        Request::FetchDagTags {
            order_by,
            force,
            reply_tx,
        } => {
            match client.dag_tags(&order_by, force).await {
                Ok(collection) => {
                    tracing::debug!(
                        "engine: sending DagTagsFetched count={}",
                        collection.tags.len()
                    );
                    let _ = reply_tx.send(Event::DagTagsFetched {
                        tags: collection.tags,
                    });
                }
                Err(e) => send_error(&reply_tx, "FetchDagTags", None, &e),
            }
        }

        Request::FetchDags {
            query,
            force,
            reply_tx,
        } => match client.dags(&query, force).await {
            Ok(collection) => {
                tracing::debug!(
                    "engine: sending DagsFetched{} count={} total={}",
                    query.location,
                    collection.dags.len(),
                    collection.total_entries
                );
                let _ = reply_tx.send(Event::DagsFetched {
                    location: query.location,
                    dags: collection.dags,
                    total_entries: collection.total_entries,
                });
            }
            Err(e) => send_error(&reply_tx, "FetchDags", Some(query.location), &e),
        },
    }
}

fn reply_unavailable(req: Request, base_url: &str) {
    let (context, location, reply_tx) = match req {
        Request::FetchDagTags { reply_tx, .. } => ("FetchDagTags", None, reply_tx),
        Request::FetchDags {
            query, reply_tx, ..
        } => ("FetchDags", Some(query.location), reply_tx),
    };
    let _ = reply_tx.send(Event::FetchError {
        context: context.to_owned(),
        location,
        message: format!("no usable Airflow client for \"{base_url}\""),
    });
}

fn send_error(
    reply_tx: &Sender<Event>,
    context: &str,
    location: Option<QueryParams>,
    err: &dyn std::error::Error,
) {
    tracing::debug!("engine: {context} error: {err}");
    let _ = reply_tx.send(Event::FetchError {
        context: context.to_owned(),
        location,
        message: err.to_string(),
    });
}
