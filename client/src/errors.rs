use std::fmt::{Display, Formatter};

use reqwest::StatusCode;

use crate::encoding::EncodeError;

/// Coarse origin of an [`AmsClientError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The failure was reported by, or happened while talking to, the AMS.
    External,
    /// The failure happened locally before anything reached the AMS.
    Local,
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::External => write!(f, "AMS"),
            ErrorCategory::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("http transport error: {0}")]
    Transport(reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected http status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode response (http status {status}): {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("graphql error: {}", join_messages(.0))]
    GraphQl(Vec<cynic::GraphQlError>),

    #[error("response contained no data")]
    NoData,

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("server reported another page but did not move past cursor '{0}'")]
    StalledCursor(String),

    #[error(transparent)]
    Encoding(#[from] EncodeError),

    #[error("failed to serialize request: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::Transport(_)
            | ErrorKind::Timeout
            | ErrorKind::Status { .. }
            | ErrorKind::Decode { .. }
            | ErrorKind::GraphQl(_)
            | ErrorKind::NoData
            | ErrorKind::NotFound(_)
            | ErrorKind::StalledCursor(_) => ErrorCategory::External,
            ErrorKind::Encoding(_)
            | ErrorKind::Serialization(_)
            | ErrorKind::InvalidHeader(_)
            | ErrorKind::Config(_) => ErrorCategory::Local,
        }
    }
}

impl From<reqwest::Error> for ErrorKind {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            ErrorKind::Timeout
        } else {
            ErrorKind::Transport(value)
        }
    }
}

fn join_messages(errors: &[cynic::GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error returned by every [`AmsClient`](crate::AmsClient) operation.
///
/// The category is fixed when the error is created, so callers can tell AMS failures
/// apart from local bugs without inspecting the message.
#[derive(Debug, thiserror::Error)]
#[error("{category} error: {kind}")]
pub struct AmsClientError {
    category: ErrorCategory,
    #[source]
    kind: ErrorKind,
}

impl AmsClientError {
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Convenience check for the batch resolvers' missing-record failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }
}

impl From<ErrorKind> for AmsClientError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            category: kind.category(),
            kind,
        }
    }
}

impl From<reqwest::Error> for AmsClientError {
    fn from(value: reqwest::Error) -> Self {
        ErrorKind::from(value).into()
    }
}

impl From<serde_json::Error> for AmsClientError {
    fn from(value: serde_json::Error) -> Self {
        ErrorKind::from(value).into()
    }
}

impl From<EncodeError> for AmsClientError {
    fn from(value: EncodeError) -> Self {
        ErrorKind::from(value).into()
    }
}

pub type Result<T> = std::result::Result<T, AmsClientError>;
