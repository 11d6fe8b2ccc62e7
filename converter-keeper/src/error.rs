//! Error types for the converter keeper

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeeperError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid public key: {0}")]
    InvalidPubkey(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Too many targets: at most {max} per quote")]
    TooManyTargets { max: usize },

    /// A conversion or share computation the programs would reject
    #[error("Quote rejected: {0}")]
    Rejected(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl KeeperError {
    pub fn code(&self) -> &'static str {
        match self {
            KeeperError::BadRequest(_) => "BAD_REQUEST",
            KeeperError::InvalidPubkey(_) => "INVALID_PUBKEY",
            KeeperError::InvalidAmount(_) => "INVALID_AMOUNT",
            KeeperError::TooManyTargets { .. } => "TOO_MANY_TARGETS",
            KeeperError::Rejected(_) => "QUOTE_REJECTED",
            KeeperError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for KeeperError {
    fn into_response(self) -> Response {
        let status = match &self {
            KeeperError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}

/// Program errors surface under their error name, e.g. `NoRouteToBaseAsset`
impl From<anchor_lang::error::Error> for KeeperError {
    fn from(err: anchor_lang::error::Error) -> Self {
        match err {
            anchor_lang::error::Error::AnchorError(e) => KeeperError::Rejected(e.error_name),
            anchor_lang::error::Error::ProgramError(e) => KeeperError::Rejected(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for KeeperError {
    fn from(err: anyhow::Error) -> Self {
        KeeperError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KeeperError>;
