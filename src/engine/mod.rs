// Backend engine: Airflow REST and fixture stub

pub mod airflow;
mod interface;
pub mod stub;

pub use airflow::AirflowEngine;
pub use interface::{Engine, EngineHandle, Event, Request};
pub use stub::StubEngine;
