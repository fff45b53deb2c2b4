use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("No spins left")]
    NoSpinsLeft,

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        // The mini-app client only distinguishes "auth" and "no spins";
        // auth rejections deliberately share one opaque body so callers
        // cannot probe which check failed.
        match self {
            AppError::AuthError(msg) => {
                log::warn!("Rejected init data: {msg}");
                HttpResponse::Unauthorized().json(json!({ "error": "auth" }))
            }
            AppError::NoSpinsLeft => {
                HttpResponse::Forbidden().json(json!({ "error": "no spins" }))
            }
            AppError::ConfigError(msg) => {
                log::error!("Catalog configuration error: {msg}");
                HttpResponse::InternalServerError().json(json!({ "error": "internal" }))
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                HttpResponse::InternalServerError().json(json!({ "error": "internal" }))
            }
            _ => {
                log::error!("Internal error: {self}");
                HttpResponse::InternalServerError().json(json!({ "error": "internal" }))
            }
        }
    }
}
