use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest {
        message: String,
        available: Option<u64>,
    },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            available: None,
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) => AppError::bad_request(msg),
            DomainError::InsufficientStock { available } => AppError::BadRequest {
                message: e.to_string(),
                available: Some(available),
            },
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<u64>,
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest { message, available } => {
                HttpResponse::BadRequest().json(ErrorBody {
                    message,
                    available: *available,
                })
            }
            AppError::Unauthorized => HttpResponse::Unauthorized().json(ErrorBody {
                message: "Unauthorized",
                available: None,
            }),
            AppError::Internal(detail) => {
                log::error!("request failed: {}", detail);
                HttpResponse::InternalServerError().json(ErrorBody {
                    message: "Internal server error",
                    available: None,
                })
            }
        }
    }
}
