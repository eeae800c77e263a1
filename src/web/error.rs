//! Page error handling for the foyer web UI.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::web::pages;
use crate::FoyerError;

/// Error rendered as an HTML status page.
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    message: String,
}

impl PageError {
    /// Create a new page error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create a bad request (400) error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a not found (404) error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Create an internal server error (500).
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// The HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let body = pages::error_page(self.status, &self.message);
        (self.status, Html(body)).into_response()
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for PageError {}

impl From<FoyerError> for PageError {
    fn from(err: FoyerError) -> Self {
        match &err {
            FoyerError::Validation(msg) => PageError::bad_request(msg.clone()),
            FoyerError::NotFound(msg) => PageError::not_found(format!("{msg} not found")),
            _ => {
                tracing::error!("Internal error: {}", err);
                PageError::internal("An internal error occurred")
            }
        }
    }
}
