pub mod auth;
pub mod client;
pub mod query;

pub use client::{AirflowClient, ApiError};
pub use query::DagQuery;
