//! HTTP error responses for the web adapter.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::any::Any;

use crate::domain::error::FeedError;
use crate::domain::protocol::{ErrorBody, HistoryResponse};

/// Which JSON shape the error is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorShape {
    /// `{ "error": message }`
    Plain,
    /// `{ "s": "error", "errmsg": message }`
    Udf,
}

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
    pub shape: ErrorShape,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            shape: ErrorShape::Plain,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Render as a UDF history outcome instead of a plain error body.
    pub fn udf(mut self) -> Self {
        self.shape = ErrorShape::Udf;
        self
    }
}

impl From<FeedError> for WebError {
    fn from(err: FeedError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        } else {
            tracing::debug!(status = %self.status, "{}", self.message);
        }
        match self.shape {
            ErrorShape::Plain => (
                self.status,
                Json(ErrorBody {
                    error: self.message,
                }),
            )
                .into_response(),
            ErrorShape::Udf => (
                self.status,
                Json(HistoryResponse::Error {
                    errmsg: self.message,
                }),
            )
                .into_response(),
        }
    }
}

pub fn status_from_error(err: &FeedError) -> StatusCode {
    match err {
        FeedError::MissingParameter { .. } | FeedError::InvalidParameter { .. } => {
            StatusCode::BAD_REQUEST
        }
        FeedError::Upstream { .. }
        | FeedError::Rejected { .. }
        | FeedError::Transport { .. }
        | FeedError::Protocol { .. }
        | FeedError::ConfigParse { .. }
        | FeedError::ConfigInvalid { .. }
        | FeedError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Response for a panicking handler: a UDF error outcome carrying the panic message.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let cause = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    let err = FeedError::Upstream { reason: cause };
    WebError::from(err).udf().into_response()
}
