use crate::dashboard::View;
use thiserror::Error;

/// Failure talking to one of the hosted services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success response; `message` is what the service said
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    /// Rejected locally before any request was made
    #[error("{0}")]
    Invalid(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ServiceError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

/// Errors surfaced by the admin dashboard
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{0}")]
    Authentication(#[source] ServiceError),
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("Session expired, please sign in again")]
    SessionExpired,
    #[error("Error fetching properties: {0}")]
    Fetch(#[source] ServiceError),
    #[error("{0}")]
    Mutation(#[source] ServiceError),
    #[error("{0}")]
    Upload(#[source] ServiceError),
    #[error("{0}")]
    Validation(String),
    #[error("Property {0} not found")]
    UnknownProperty(String),
    #[error("Cannot {action} from the {from} view")]
    InvalidTransition { from: View, action: &'static str },
}
