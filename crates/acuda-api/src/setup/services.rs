//! Service initialization and application state setup

use crate::auth::JwtService;
use crate::state::{AppState, AuthState, DocumentState};
use acuda_core::Config;
use acuda_db::{CredentialStore, UserRepository};
use acuda_processing::{ChromiumRenderer, DocumentRenderer, DocxPatcher, PdfRenderer};
use acuda_storage::FileStore;
use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Build the application state from its already initialized parts.
pub fn build_state(
    config: &Config,
    credentials: Arc<dyn CredentialStore>,
    store: Arc<dyn FileStore>,
    pdf: Arc<dyn PdfRenderer>,
) -> Arc<AppState> {
    let patcher = DocxPatcher::new(
        config.word_template_path().clone(),
        config.docx_escape_values(),
    );

    Arc::new(AppState {
        auth: AuthState {
            jwt: JwtService::new(config.jwt_secret(), config.jwt_expiry_hours()),
            credentials,
        },
        documents: DocumentState {
            store,
            renderer: DocumentRenderer::new(pdf),
            patcher: Arc::new(patcher),
            max_images: config.max_images(),
        },
    })
}

/// Initialize the production services: Postgres accounts and the Chromium renderer.
pub async fn initialize_services(
    config: &Config,
    pool: PgPool,
    store: Arc<dyn FileStore>,
) -> Result<Arc<AppState>> {
    let renderer = ChromiumRenderer::new(
        config.chromium_path(),
        Duration::from_secs(config.render_timeout_secs()),
    )
    .context("Failed to configure the PDF renderer")?;

    tracing::info!(
        chromium_path = %config.chromium_path(),
        render_timeout_secs = config.render_timeout_secs(),
        word_template = %config.word_template_path().display(),
        docx_escape_values = config.docx_escape_values(),
        "Document services initialized"
    );

    Ok(build_state(
        config,
        Arc::new(UserRepository::new(pool)),
        store,
        Arc::new(renderer),
    ))
}
