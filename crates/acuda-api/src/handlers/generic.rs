//! Generic "Documento Personalizado" endpoints. Output is returned, never stored.

use super::documents::{attachment_response, PDF_CONTENT_TYPE};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DocumentState;
use crate::utils::upload::FormPayload;
use acuda_core::models::GenericRecord;
use axum::{extract::State, response::IntoResponse};

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[utoipa::path(
    post,
    path = "/documentos/pdf",
    tag = "documentos",
    request_body(
        content = GenericRecord,
        description = "Fields as JSON, or multipart text fields (or `datos`) plus `imagenes`"
    ),
    responses(
        (status = 200, description = "Generated document", content_type = "application/pdf"),
        (status = 400, description = "Malformed form", body = ErrorResponse),
        (status = 500, description = "Rendering failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, payload))]
pub async fn generate_pdf(
    State(state): State<DocumentState>,
    payload: FormPayload,
) -> Result<impl IntoResponse, HttpAppError> {
    let (record, images) = payload.into_generic(state.max_images).await?;
    let pdf = state.renderer.render_document(&record, &images).await?;
    attachment_response(pdf, PDF_CONTENT_TYPE, "documento.pdf")
}

#[utoipa::path(
    get,
    path = "/documentos/pdf/ejemplo",
    tag = "documentos",
    responses(
        (status = 200, description = "Sample document", content_type = "application/pdf"),
        (status = 500, description = "Rendering failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn example_pdf(
    State(state): State<DocumentState>,
) -> Result<impl IntoResponse, HttpAppError> {
    let pdf = state
        .renderer
        .render_document(&GenericRecord::sample(), &[])
        .await?;
    attachment_response(pdf, PDF_CONTENT_TYPE, "documento_ejemplo.pdf")
}

#[utoipa::path(
    post,
    path = "/documentos/word",
    tag = "documentos",
    request_body(
        content = GenericRecord,
        description = "Placeholder values as JSON, or multipart text fields (or `datos`) plus `imagenes`"
    ),
    responses(
        (status = 200, description = "Patched Word document", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        (status = 400, description = "Malformed form", body = ErrorResponse),
        (status = 500, description = "Template or packaging failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, payload))]
pub async fn generate_word(
    State(state): State<DocumentState>,
    payload: FormPayload,
) -> Result<impl IntoResponse, HttpAppError> {
    let (record, images) = payload.into_generic(state.max_images).await?;
    let docx = state.patcher.patch(record, images).await?;
    attachment_response(docx, DOCX_CONTENT_TYPE, "documento.docx")
}
