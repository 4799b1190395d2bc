//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors from the storage,
//! rendering and patching crates convert into [`AppError`] here, so every failure reaches the
//! client with the same JSON shape.

use acuda_core::{AppError, ErrorMetadata, LogLevel};
use acuda_processing::{PatchError, RenderError};
use acuda_storage::StorageError;
use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use utoipa::ToSchema;

pub const FILE_NOT_FOUND: &str = "Archivo no encontrado";
pub const FILE_ACCESS_DENIED: &str = "Acceso denegado al archivo";
pub const BODY_TOO_LARGE: &str = "El cuerpo de la petición supera el tamaño máximo permitido";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper so `IntoResponse` can be implemented for the core error type
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return HttpAppError(AppError::PayloadTooLarge(BODY_TOO_LARGE.to_string()));
        }
        HttpAppError(AppError::InvalidInput(format!(
            "Cuerpo de la petición inválido: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that answers malformed bodies with an `ErrorResponse` 400.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Set once from `Config` when routes are built; production hides error details.
static EXPOSE_DETAILS: AtomicBool = AtomicBool::new(false);

pub fn expose_error_details(expose: bool) {
    EXPOSE_DETAILS.store(expose, Ordering::Relaxed);
}

fn error_body(app_error: &AppError, expose_details: bool) -> ErrorResponse {
    let show_details = expose_details && !app_error.is_sensitive();
    ErrorResponse {
        error: app_error.client_message(),
        details: show_details.then(|| app_error.detailed_message()),
        error_type: show_details.then(|| app_error.error_type().to_string()),
        code: app_error.error_code().to_string(),
        recoverable: app_error.is_recoverable(),
        suggested_action: app_error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = error_body(app_error, EXPOSE_DETAILS.load(Ordering::Relaxed));
        (status, Json(body)).into_response()
    }
}

// Domain errors into HttpAppError (orphan rule: implemented for the local wrapper)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(_) => AppError::NotFound(FILE_NOT_FOUND.to_string()),
            StorageError::AccessDenied(name) => {
                tracing::warn!(requested = %name, "Path outside user folder refused");
                AppError::Forbidden(FILE_ACCESS_DENIED.to_string())
            }
            StorageError::InvalidRoot(msg) => {
                tracing::warn!(reason = %msg, "Account has an unusable folder");
                AppError::Forbidden(FILE_ACCESS_DENIED.to_string())
            }
            StorageError::WriteFailed(msg) | StorageError::ReadFailed(msg) => {
                AppError::Storage(msg)
            }
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

impl From<RenderError> for HttpAppError {
    fn from(err: RenderError) -> Self {
        HttpAppError(AppError::Render(format!("Error al generar el PDF: {}", err)))
    }
}

impl From<PatchError> for HttpAppError {
    fn from(err: PatchError) -> Self {
        HttpAppError(AppError::Patch(format!(
            "Error al generar el documento Word: {}",
            err
        )))
    }
}
