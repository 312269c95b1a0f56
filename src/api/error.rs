//! Translation of failures into the error envelope.

use std::any::Any;
use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{
        Request, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use validator::ValidationErrors;

use crate::domain::DomainError;
use crate::models::ErrorResponse;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const VALIDATION_ERROR_MESSAGE: &str = "Request validation failed";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Conflict(String),
    MethodNotAllowed,
    Validation {
        message: String,
        detail: Option<Value>,
    },
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn validation(detail: impl Into<Value>) -> Self {
        ApiError::Validation {
            message: VALIDATION_ERROR_MESSAGE.to_string(),
            detail: Some(detail.into()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::Duplicate(msg) => ApiError::Conflict(msg),
            DomainError::Validation(msg) => ApiError::Validation {
                message: msg,
                detail: None,
            },
            DomainError::Database(_) | DomainError::Internal(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let fields: BTreeMap<String, Vec<String>> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        ApiError::validation(serde_json::to_value(fields).unwrap_or(Value::Null))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::NotFound(msg) | ApiError::Conflict(msg) => ErrorResponse::new(msg, None),
            ApiError::MethodNotAllowed => ErrorResponse::new(METHOD_NOT_ALLOWED_MESSAGE, None),
            ApiError::Validation { message, detail } => ErrorResponse::new(message, detail),
            ApiError::Internal(msg) => {
                tracing::error!("{}", msg);
                // Stripped again by `mask_internal_errors` unless debug is on
                ErrorResponse::new(INTERNAL_ERROR_MESSAGE, Some(Value::String(msg)))
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Whether 500 responses may carry internal detail (debug configurations only)
#[derive(Debug, Clone, Copy)]
pub struct ExposeInternalErrors(pub bool);

/// Replace the body of every 500 with the bare envelope unless detail may be exposed.
pub async fn mask_internal_errors(
    State(ExposeInternalErrors(expose)): State<ExposeInternalErrors>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if response.status() == StatusCode::INTERNAL_SERVER_ERROR && !expose {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE, None)),
        )
            .into_response();
    }

    response
}

/// Give the router's bare 405 the error envelope, keeping its `Allow` header.
pub async fn envelope_method_not_allowed(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if response.status() != StatusCode::METHOD_NOT_ALLOWED
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let mut enveloped = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = response.headers().get(header::ALLOW) {
        enveloped.headers_mut().insert(header::ALLOW, allow.clone());
    }
    enveloped
}

/// Panic handler for `CatchPanicLayer`
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let msg = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal(format!("Handler panicked: {}", msg)).into_response()
}

/// Fallback for unknown routes
pub async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
