use crate::auth::AuthenticatedUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DocumentState;
use acuda_core::models::FilePage;
use acuda_core::AppError;
use acuda_storage::listing::file_query;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use futures::StreamExt;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

pub(crate) const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Disposition {
    Inline,
    Attachment,
}

/// `Content-Disposition` value. Names that are not plain ASCII also get an RFC 5987
/// `filename*` so the header stays valid.
pub(crate) fn content_disposition(disposition: Disposition, name: &str) -> String {
    if disposition == Disposition::Inline {
        return "inline".to_string();
    }

    let plain = name
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\');
    if plain {
        return format!("attachment; filename=\"{}\"", name);
    }

    let fallback: String = name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        utf8_percent_encode(name, NON_ALPHANUMERIC)
    )
}

/// A generated document sent back in full as a download.
pub(crate) fn attachment_response(
    bytes: Bytes,
    content_type: &str,
    name: &str,
) -> Result<Response<Body>, HttpAppError> {
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(Disposition::Attachment, name),
        )
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;
    Ok(response)
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number, 1-based (default 1)
    pub pagina: Option<String>,
    /// Page size (default 10)
    pub limite: Option<String>,
    /// Case-insensitive substring of the file name
    pub busqueda: Option<String>,
}

#[utoipa::path(
    get,
    path = "/documentos/lista",
    tag = "documentos",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of the caller's documents, newest first", body = FilePage),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 403, description = "Unusable user folder", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, identity, query), fields(user_id = identity.user_id()))]
pub async fn list_documents(
    State(state): State<DocumentState>,
    identity: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let query = file_query(
        query.pagina.as_deref(),
        query.limite.as_deref(),
        query.busqueda.as_deref(),
    );
    let page = state.store.list_files(identity.ruta(), &query).await?;

    tracing::debug!(
        total = page.total,
        pagina = page.pagina,
        returned = page.documentos.len(),
        "Documents listed"
    );
    Ok(Json(page))
}

async fn stream_document(
    state: &DocumentState,
    identity: &AuthenticatedUser,
    name: &str,
    disposition: Disposition,
) -> Result<Response<Body>, HttpAppError> {
    let file = state.store.open(identity.ruta(), name).await?;

    tracing::debug!(
        file = %file.name,
        size_bytes = file.size,
        disposition = ?disposition,
        "Streaming document"
    );

    let body_stream = file.stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(disposition, &file.name),
        )
        .header(header::CONTENT_LENGTH, file.size)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

#[utoipa::path(
    get,
    path = "/documentos/visualizar/{nombreArchivo}",
    tag = "documentos",
    params(
        ("nombreArchivo" = String, Path, description = "File name inside the caller's folder")
    ),
    responses(
        (status = 200, description = "File contents, inline"),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 403, description = "Path outside the caller's folder", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, identity), fields(user_id = identity.user_id()))]
pub async fn view_document(
    State(state): State<DocumentState>,
    identity: AuthenticatedUser,
    Path(nombre_archivo): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    stream_document(&state, &identity, &nombre_archivo, Disposition::Inline).await
}

#[utoipa::path(
    get,
    path = "/documentos/descargar/{nombreArchivo}",
    tag = "documentos",
    params(
        ("nombreArchivo" = String, Path, description = "File name inside the caller's folder")
    ),
    responses(
        (status = 200, description = "File contents, as attachment"),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 403, description = "Path outside the caller's folder", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, identity), fields(user_id = identity.user_id()))]
pub async fn download_document(
    State(state): State<DocumentState>,
    identity: AuthenticatedUser,
    Path(nombre_archivo): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    stream_document(&state, &identity, &nombre_archivo, Disposition::Attachment).await
}
