//! Mapeamento de erros do store para respostas HTTP.
//!
//! Toda resposta 4xx/5xx carrega `message`; o cliente exibe esse texto.

use crate::services::user_store::StoreError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    #[schema(example = "not_found")]
    pub code: String,
    #[schema(example = "User not found")]
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("User not found")]
    NotFound,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound => "not_found",
            ApiError::Internal(_) => "store_unavailable",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(msg) => ApiError::Validation(msg),
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Unavailable(msg) => {
                log::error!("❌ Store error: {}", msg);
                ApiError::Internal(format!("Database error: {}", msg))
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            code: self.code().to_string(),
            message: self.to_string(),
        })
    }
}

/// Handler do `JsonConfig`: body malformado vira 400 com `message`.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    log::warn!("⚠️ Rejected request body: {}", err);
    ApiError::Validation(format!("Invalid request body: {}", err)).into()
}

/// Handler do `FormConfig`: formulário inválido também vira 400 com `message`.
pub fn form_error_handler(
    err: actix_web::error::UrlencodedError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    log::warn!("⚠️ Rejected form body: {}", err);
    ApiError::Validation(format!("Invalid request body: {}", err)).into()
}
