//! Core traits for document rendering

use crate::error::RenderError;
use async_trait::async_trait;
use bytes::Bytes;

/// HTML to PDF conversion.
///
/// Page size and margins come from the document's own `@page` rule. Implementations must
/// return bytes starting with `%PDF-` or an error, and must release every process and scratch
/// file they acquired before returning.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str) -> Result<Bytes, RenderError>;
}
