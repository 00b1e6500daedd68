use crate::browser::OpenError;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use std::fmt;

/// Why a request did not open anything
#[derive(Debug)]
pub enum RequestError {
    MissingQueryUrl,
    MissingBodyUrl,
    UrlNotString,
    InvalidJson,
    Open(OpenError),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::Open(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MissingQueryUrl => write!(f, "Missing 'url' parameter"),
            RequestError::MissingBodyUrl => write!(f, "Missing 'url' in JSON body"),
            RequestError::UrlNotString => write!(f, "'url' in JSON body must be a string"),
            RequestError::InvalidJson => write!(f, "Invalid JSON"),
            RequestError::Open(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Open(e) => Some(e),
            _ => None,
        }
    }
}

impl From<OpenError> for RequestError {
    fn from(e: OpenError) -> Self {
        RequestError::Open(e)
    }
}

// Plain text body, no JSON on error paths
impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
