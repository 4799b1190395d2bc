use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;

use crate::AppError;

/// An uploaded image kept in memory for the duration of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    pub data: Bytes,
    pub content_type: String,
    pub filename: String,
}

impl ImageAttachment {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            filename: filename.into(),
        }
    }

    /// Only `image/*` MIME types are accepted as attachments.
    pub fn is_image_type(content_type: &str) -> bool {
        content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    /// `data:<mime>;base64,<payload>` for embedding in HTML.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.data))
    }

    /// File extension derived from the MIME subtype: lowercased, parameters and `+suffix` dropped.
    ///
    /// `image/svg+xml` gives `svg`, `image/JPEG` gives `jpeg`.
    pub fn extension(&self) -> String {
        let subtype = self
            .content_type
            .split_once('/')
            .map(|(_, sub)| sub)
            .unwrap_or("bin");
        let subtype = subtype.split(';').next().unwrap_or(subtype);
        let subtype = subtype.split('+').next().unwrap_or(subtype);
        let ext = subtype.trim().to_ascii_lowercase();
        if ext.is_empty() {
            "bin".to_string()
        } else {
            ext
        }
    }

    /// Parse a `data:image/<subtype>;base64,...` URI.
    pub fn from_data_uri(uri: &str, filename: impl Into<String>) -> Result<Self, AppError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| AppError::InvalidInput("La imagen debe ser un data URI".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| AppError::InvalidInput("Data URI de imagen mal formado".to_string()))?;
        let content_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| AppError::InvalidInput("La imagen debe estar codificada en base64".to_string()))?;
        if !Self::is_image_type(content_type) {
            return Err(AppError::InvalidInput(format!(
                "Tipo de imagen no permitido: {}",
                content_type
            )));
        }
        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| AppError::InvalidInput(format!("Imagen base64 inválida: {}", e)))?;
        Ok(Self::new(data, content_type, filename))
    }
}
