use std::io;

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate key {id} in collection {collection}")]
    DuplicateKey { collection: String, id: String },

    #[error("field {field} can not be updated")]
    ImmutableField { field: &'static str },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    pub fn duplicate_key(collection: &str, id: &Value) -> Self {
        Self::DuplicateKey { collection: collection.to_string(), id: id.to_string() }
    }

    pub fn unavailable<S: ToString>(str: S) -> Self {
        Self::Unavailable { reason: str.to_string() }
    }
}

/// Failures that stop the server from starting or serving.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("address must be set")]
    MissingAddress,

    #[error("app must be set")]
    MissingApp,

    #[error("invalid route: {0}")]
    Route(#[from] matchit::InsertError),

    #[error("failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },

    #[error("failed to install log subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}
