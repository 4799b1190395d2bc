//! Acuda Document Processing Library
//!
//! Turns form data into documents:
//!
//! - HTML templates (askama) printed to PDF by a headless browser behind [`PdfRenderer`]
//! - Word packages patched in memory by [`DocxPatcher`]

pub mod docx;
pub mod error;
pub mod renderer;
pub mod service;
pub mod templates;
pub mod traits;

// Re-export commonly used types
pub use docx::DocxPatcher;
pub use error::{PatchError, RenderError};
pub use renderer::ChromiumRenderer;
pub use service::DocumentRenderer;
pub use traits::PdfRenderer;
