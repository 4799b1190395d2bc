use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A file in a user's folder, built from filesystem metadata on every listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredFileEntry {
    pub nombre: String,
    /// Absolute path on the server
    pub ruta: String,
    /// Birth time, or modification time when the filesystem has none
    pub fecha_creacion: DateTime<Utc>,
    pub tamano: u64,
}

/// One page of a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilePage {
    pub documentos: Vec<StoredFileEntry>,
    pub total: usize,
    pub pagina: usize,
    pub total_paginas: usize,
}

/// Normalized listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileQuery {
    pub page: usize,
    pub page_size: usize,
    pub search: String,
}

impl Default for FileQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            search: String::new(),
        }
    }
}
