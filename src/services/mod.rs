pub mod chat;
pub mod prediction;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure taxonomy for backend calls. Transport means the request never
/// completed; Server covers non-2xx replies, an `error` field in the body,
/// and bodies that do not decode.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("could not reach backend: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("backend error: {detail}")]
    Server {
        status: Option<StatusCode>,
        detail: String,
    },
}

impl ServiceError {
    pub(crate) fn server(status: Option<StatusCode>, detail: impl Into<String>) -> Self {
        ServiceError::Server {
            status,
            detail: detail.into(),
        }
    }
}
