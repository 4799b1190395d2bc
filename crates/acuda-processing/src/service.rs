//! Document rendering service
//!
//! Glues the view models to a [`PdfRenderer`]. Handlers hold a cheap clone of
//! [`DocumentRenderer`] in their state.

use crate::error::RenderError;
use crate::templates::{DocumentTemplate, ReportTemplate};
use crate::traits::PdfRenderer;
use acuda_core::models::{GenericRecord, ImageAttachment, ReportRecord};
use askama::Template;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct DocumentRenderer {
    renderer: Arc<dyn PdfRenderer>,
}

impl DocumentRenderer {
    pub fn new(renderer: Arc<dyn PdfRenderer>) -> Self {
        Self { renderer }
    }

    /// HTML for an alarm report; the date defaults to today.
    pub fn report_html(record: ReportRecord) -> Result<String, RenderError> {
        let record = record.with_default_date();
        Ok(ReportTemplate::from_record(&record).render()?)
    }

    /// HTML for the generic document.
    pub fn document_html(
        record: &GenericRecord,
        images: &[ImageAttachment],
    ) -> Result<String, RenderError> {
        let template =
            DocumentTemplate::from_record(record, images, acuda_core::locale::now_es());
        Ok(template.render()?)
    }

    #[tracing::instrument(skip(self, record))]
    pub async fn render_report(&self, record: ReportRecord) -> Result<Bytes, RenderError> {
        let images = record.imagenes.len();
        let html = Self::report_html(record)?;
        self.print(&html, "report", images).await
    }

    #[tracing::instrument(skip(self, record, images))]
    pub async fn render_document(
        &self,
        record: &GenericRecord,
        images: &[ImageAttachment],
    ) -> Result<Bytes, RenderError> {
        let html = Self::document_html(record, images)?;
        self.print(&html, "document", images.len()).await
    }

    async fn print(&self, html: &str, kind: &str, images: usize) -> Result<Bytes, RenderError> {
        let start = Instant::now();
        match self.renderer.render_pdf(html).await {
            Ok(pdf) => {
                tracing::info!(
                    kind = kind,
                    images = images,
                    size_bytes = pdf.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "PDF rendered"
                );
                Ok(pdf)
            }
            Err(e) => {
                tracing::error!(
                    kind = kind,
                    error = %e,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "PDF rendering failed"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the HTML it was asked to print.
    #[derive(Default)]
    struct CapturingRenderer {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PdfRenderer for CapturingRenderer {
        async fn render_pdf(&self, html: &str) -> Result<Bytes, RenderError> {
            self.seen.lock().unwrap().push(html.to_string());
            Ok(Bytes::from_static(b"%PDF-1.4 test"))
        }
    }

    struct FailingRenderer;

    #[async_trait]
    impl PdfRenderer for FailingRenderer {
        async fn render_pdf(&self, _html: &str) -> Result<Bytes, RenderError> {
            Err(RenderError::Timeout(30))
        }
    }

    #[tokio::test]
    async fn test_render_report_fills_date() {
        let capture = Arc::new(CapturingRenderer::default());
        let service = DocumentRenderer::new(capture.clone());

        let pdf = service.render_report(ReportRecord::default()).await.unwrap();
        assert!(pdf.starts_with(b"%PDF-"));

        let seen = capture.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains(&acuda_core::locale::today_es()));
    }

    #[tokio::test]
    async fn test_render_document_passes_images() {
        let capture = Arc::new(CapturingRenderer::default());
        let service = DocumentRenderer::new(capture.clone());
        let record = GenericRecord {
            nombre: Some("Ana".to_string()),
            ..Default::default()
        };
        let images = [ImageAttachment::new(vec![0u8; 4], "image/gif", "a.gif")];

        service.render_document(&record, &images).await.unwrap();

        let seen = capture.seen.lock().unwrap();
        assert!(seen[0].contains("data:image/gif;base64,AAAAAA=="));
        assert!(seen[0].contains("Ana"));
    }

    #[tokio::test]
    async fn test_renderer_error_propagates() {
        let service = DocumentRenderer::new(Arc::new(FailingRenderer));
        let err = service.render_report(ReportRecord::sample()).await.unwrap_err();
        assert!(matches!(err, RenderError::Timeout(30)));
    }
}
