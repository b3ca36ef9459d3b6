//! HTTP error response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use testbed_core::error::Error;

/// Maps a store [`Error`] to an HTTP response.
///
/// A missing entity becomes 404 with an empty body. Anything else becomes 500,
/// with an empty body unless a text context was attached.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Failed {
        source: Error,
        context: Option<&'static str>,
    },
}

impl ApiError {
    /// Report a failure as `"{context}: {error}"` text instead of an empty body.
    #[must_use]
    pub fn context(self, context: &'static str) -> Self {
        match self {
            Self::Failed { source, .. } => Self::Failed {
                source,
                context: Some(context),
            },
            Self::NotFound => Self::NotFound,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(_) => Self::NotFound,
            source => Self::Failed {
                source,
                context: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::Failed { source, context } => {
                tracing::error!(kind = source.kind(), error = %source, "store operation failed");
                match context {
                    Some(context) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("{context}: {source}"),
                    )
                        .into_response(),
                    None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                }
            }
        }
    }
}
