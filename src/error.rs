use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::web::models::{ChatReply, ErrorBody};

pub const UNAVAILABLE_REPLY: &str = "Alpha Soil is currently unavailable. Please try again later.";

/// Failures that reach the caller of `/chat`. Upstream trouble never ends up
/// here; the relay turns it into a fallback reply.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message is required")]
    InvalidInput,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            ChatError::InvalidInput => StatusCode::BAD_REQUEST,
            ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ChatError::InvalidInput => HttpResponse::build(self.status_code()).json(ErrorBody {
                error: self.to_string(),
            }),
            // Details stay in the log.
            ChatError::Internal(_) => HttpResponse::build(self.status_code()).json(ChatReply {
                reply: UNAVAILABLE_REPLY.to_string(),
            }),
        }
    }
}
