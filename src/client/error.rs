use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a client call. Views handle every variant at the call site.
#[derive(Debug, Error)]
pub enum ClientError {
    /// 401: bad credentials, or a missing or expired token.
    #[error("{0}")]
    Auth(String),
    /// 403: signed in but not allowed.
    #[error("{0}")]
    Forbidden(String),
    /// 400, 409 or 422: malformed or duplicate input.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    /// Persisting or loading the session token failed.
    #[error("session storage error: {0}")]
    Storage(String),
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Maps a non-success status and its `detail` message onto the taxonomy.
    #[must_use]
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Auth(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::Validation(message)
            }
            StatusCode::NOT_FOUND => Self::NotFound(message),
            other => Self::Server {
                status: other.as_u16(),
                message,
            },
        }
    }

    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// The server's `detail` message, when the failure came with one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Auth(message)
            | Self::Forbidden(message)
            | Self::Validation(message)
            | Self::NotFound(message)
            | Self::Server { message, .. } => Some(message),
            Self::Network(_) | Self::Storage(_) | Self::InvalidUrl(_) => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
