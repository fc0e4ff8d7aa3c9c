use std::sync::mpsc::Sender;

use crate::airflow::DagQuery;
use crate::params::QueryParams;
use crate::types::Dag;

/// Handle to the backend engine held by the UI layer.
///
/// Cheaply cloneable. When the last handle is dropped the sender channel
/// closes, signalling the engine to shut down.
#[derive(Clone)]
pub struct EngineHandle {
    tx: tokio::sync::mpsc::UnboundedSender<Request>,
}

impl EngineHandle {
    pub(super) fn new(tx: tokio::sync::mpsc::UnboundedSender<Request>) -> Self {
        Self { tx }
    }

    /// Send a request to the engine. Non-blocking.
    pub fn send(&self, req: Request) {
        // Ignore errors: if the receiver is gone the engine has already shut down.
        let _ = self.tx.send(req);
    }
}

/// Trait implemented by both `AirflowEngine` and `StubEngine`.
pub trait Engine: Send + 'static {
    fn start(self) -> EngineHandle;
}

/// All operations the UI layer can send to the engine.
pub enum Request {
    /// List every known DAG tag.
    FetchDagTags {
        order_by: String,
        /// Skip the response cache.
        force: bool,
        reply_tx: Sender<Event>,
    },
    /// Fetch one page of the DAG list.
    FetchDags {
        query: DagQuery,
        /// Skip the response cache.
        force: bool,
        reply_tx: Sender<Event>,
    },
}

/// All events the engine can push back to the UI.
pub enum Event {
    DagTagsFetched {
        tags: Vec<String>,
    },
    DagsFetched {
        /// Location the page was requested for.
        location: QueryParams,
        dags: Vec<Dag>,
        total_entries: usize,
    },
    /// Unified error event for all fetch failures.
    FetchError {
        context: String,
        /// Location of the failed `FetchDags` request; `None` for tags.
        location: Option<QueryParams>,
        message: String,
    },
}
