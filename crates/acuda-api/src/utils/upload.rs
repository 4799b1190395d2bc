//! Form payloads for the document endpoints
//!
//! Every generating endpoint takes either a JSON body or `multipart/form-data`. Multipart
//! callers send the record as a `datos` JSON text field (or as loose text fields) plus up to
//! `max_images` files under `imagenes`. Files that are not `image/*` are dropped.

use crate::error::{HttpAppError, ValidatedJson, BODY_TOO_LARGE};
use acuda_core::models::{GenericRecord, ImageAttachment, ReportRecord};
use acuda_core::AppError;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const DATA_FIELD: &str = "datos";
const IMAGES_FIELD: &str = "imagenes";

/// Request body of a generating endpoint, chosen by `Content-Type`.
pub enum FormPayload {
    Json(Value),
    Multipart(Multipart),
}

impl<S> FromRequest<S> for FormPayload
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                AppError::InvalidInput(format!("Formulario multipart inválido: {}", e.body_text()))
            })?;
            Ok(FormPayload::Multipart(multipart))
        } else {
            let ValidatedJson(value) = ValidatedJson::<Value>::from_request(req, state).await?;
            Ok(FormPayload::Json(value))
        }
    }
}

impl FormPayload {
    /// Report record with multipart images appended to `imagenes` as data URIs.
    pub async fn into_report(self, max_images: usize) -> Result<ReportRecord, AppError> {
        let mut record: ReportRecord = match self {
            FormPayload::Json(value) => parse_record(value)?,
            FormPayload::Multipart(multipart) => {
                let form = MultipartForm::read(multipart, max_images).await?;
                let mut record: ReportRecord = form.record_value(coerce_flag).and_then(parse_record)?;
                record
                    .imagenes
                    .extend(form.images.iter().map(ImageAttachment::to_data_uri));
                record
            }
        };

        record.imagenes.retain(|uri| !uri.trim().is_empty());
        check_image_count(record.imagenes.len(), max_images)?;
        for (i, uri) in record.imagenes.iter().enumerate() {
            ImageAttachment::from_data_uri(uri, format!("imagen{}", i + 1))?;
        }
        Ok(record)
    }

    /// Generic record plus its images. JSON callers may pass `imagenes` as data URIs.
    pub async fn into_generic(
        self,
        max_images: usize,
    ) -> Result<(GenericRecord, Vec<ImageAttachment>), AppError> {
        match self {
            FormPayload::Json(value) => generic_from_json(value, max_images),
            FormPayload::Multipart(multipart) => {
                let form = MultipartForm::read(multipart, max_images).await?;
                let record = form.record_value(Value::String).and_then(parse_record)?;
                Ok((record, form.images))
            }
        }
    }
}

/// Fields collected from one multipart body.
#[derive(Debug, Default)]
struct MultipartForm {
    datos: Option<String>,
    fields: Map<String, Value>,
    images: Vec<ImageAttachment>,
}

impl MultipartForm {
    async fn read(mut multipart: Multipart, max_images: usize) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_failure("Failed to read multipart", e))?
        {
            let name = field.name().map(|s| s.to_string()).unwrap_or_default();
            let filename = field.file_name().map(|s| s.to_string());
            let content_type = field.content_type().map(|s| s.to_string());

            if name == IMAGES_FIELD {
                let content_type = content_type.unwrap_or_default();
                if !ImageAttachment::is_image_type(&content_type) {
                    tracing::debug!(content_type = %content_type, "Skipping non-image part");
                    continue;
                }
                check_image_count(form.images.len() + 1, max_images)?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_failure("Failed to read image data", e))?;
                form.images.push(ImageAttachment::new(
                    data,
                    content_type,
                    filename.unwrap_or_default(),
                ));
                continue;
            }

            // Stray files under other names carry nothing the records can use
            if filename.is_some() {
                continue;
            }

            let text = field
                .text()
                .await
                .map_err(|e| multipart_failure(&format!("Failed to read field {}", name), e))?;
            if name == DATA_FIELD {
                form.datos = Some(text);
            } else if !name.is_empty() {
                form.fields.insert(name, Value::String(text));
            }
        }

        tracing::debug!(
            has_datos = form.datos.is_some(),
            field_count = form.fields.len(),
            image_count = form.images.len(),
            "Multipart form read"
        );
        Ok(form)
    }

    /// The record as JSON: the `datos` field when sent, otherwise the loose text fields.
    fn record_value(&self, coerce: fn(String) -> Value) -> Result<Value, AppError> {
        match &self.datos {
            Some(datos) => serde_json::from_str(datos).map_err(|e| {
                AppError::InvalidInput(format!("El campo datos no contiene JSON válido: {}", e))
            }),
            None => Ok(Value::Object(
                self.fields
                    .iter()
                    .map(|(k, v)| {
                        let text = v.as_str().unwrap_or_default().to_string();
                        (k.clone(), coerce(text))
                    })
                    .collect(),
            )),
        }
    }
}

/// Bodies cut off by the request size limit are 413, anything else is a bad form.
fn multipart_failure(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(BODY_TOO_LARGE.to_string());
    }
    AppError::InvalidInput(format!("{}: {}", context, err.body_text()))
}

/// Text fields of the report form: checkbox values become booleans.
fn coerce_flag(text: String) -> Value {
    match text.trim() {
        "true" | "on" => Value::Bool(true),
        "false" | "off" => Value::Bool(false),
        _ => Value::String(text),
    }
}

fn parse_record<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    if !value.is_object() {
        return Err(AppError::InvalidInput(
            "Los datos deben ser un objeto JSON".to_string(),
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| AppError::InvalidInput(format!("Datos del formulario inválidos: {}", e)))
}

fn check_image_count(count: usize, max_images: usize) -> Result<(), AppError> {
    if count > max_images {
        return Err(AppError::InvalidInput(format!(
            "Se permiten como máximo {} imágenes",
            max_images
        )));
    }
    Ok(())
}

fn generic_from_json(
    mut value: Value,
    max_images: usize,
) -> Result<(GenericRecord, Vec<ImageAttachment>), AppError> {
    let uris = value
        .as_object_mut()
        .and_then(|obj| obj.remove(IMAGES_FIELD))
        .unwrap_or(Value::Null);

    let images = match uris {
        Value::Null => Vec::new(),
        Value::Array(items) => {
            check_image_count(items.len(), max_images)?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let uri = item.as_str().ok_or_else(|| {
                        AppError::InvalidInput("imagenes debe ser una lista de data URIs".to_string())
                    })?;
                    ImageAttachment::from_data_uri(uri, format!("imagen{}", i + 1))
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        _ => {
            return Err(AppError::InvalidInput(
                "imagenes debe ser una lista de data URIs".to_string(),
            ))
        }
    };

    Ok((parse_record(value)?, images))
}
