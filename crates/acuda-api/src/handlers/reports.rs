//! Alarm response reports ("parte de respuesta de alarma")

use super::documents::{attachment_response, PDF_CONTENT_TYPE};
use crate::auth::AuthenticatedUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DocumentState;
use crate::utils::upload::FormPayload;
use acuda_core::models::ReportRecord;
use acuda_core::AppError;
use axum::{extract::State, response::IntoResponse};

const EXAMPLE_FILE_NAME: &str = "parte_alarma_ejemplo.pdf";

/// Render the report, store it in the caller's folder and send it back.
///
/// Accepts the record as a JSON body or as multipart with a `datos` JSON field and up to
/// `MAX_IMAGES` files under `imagenes`. Nothing is written when the record is empty.
#[utoipa::path(
    post,
    path = "/documentos/pdf/parte-alarma",
    tag = "documentos",
    request_body(
        content = ReportRecord,
        description = "Report form as JSON, or multipart with `datos` and `imagenes`"
    ),
    responses(
        (status = 200, description = "Generated report", content_type = "application/pdf"),
        (status = 400, description = "Empty or malformed form", body = ErrorResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 500, description = "Rendering or storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, identity, payload), fields(user_id = identity.user_id()))]
pub async fn generate_report(
    State(state): State<DocumentState>,
    identity: AuthenticatedUser,
    payload: FormPayload,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = payload.into_report(state.max_images).await?;
    if !record.has_content() {
        return Err(AppError::InvalidInput(
            "No se proporcionaron datos: debe enviar al menos un campo del formulario".to_string(),
        )
        .into());
    }

    let pdf = state.renderer.render_report(record).await?;
    let stored = state.store.write_report(identity.ruta(), &pdf).await?;

    tracing::info!(
        file = %stored.name,
        path = %stored.path.display(),
        size_bytes = pdf.len(),
        "Report stored"
    );

    attachment_response(pdf, PDF_CONTENT_TYPE, &stored.name)
}

/// Report filled with fixed sample data. Not stored.
#[utoipa::path(
    get,
    path = "/documentos/pdf/parte-alarma/ejemplo",
    tag = "documentos",
    responses(
        (status = 200, description = "Sample report", content_type = "application/pdf"),
        (status = 500, description = "Rendering failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn example_report(
    State(state): State<DocumentState>,
) -> Result<impl IntoResponse, HttpAppError> {
    let pdf = state.renderer.render_report(ReportRecord::sample()).await?;
    attachment_response(pdf, PDF_CONTENT_TYPE, EXAMPLE_FILE_NAME)
}
