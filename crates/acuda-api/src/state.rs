//! Application state and sub-state extractors.
//!
//! AppState is split into sub-states so handlers extract only what they need via Axum's
//! `FromRef`.

use crate::auth::JwtService;
use acuda_db::CredentialStore;
use acuda_processing::{DocumentRenderer, DocxPatcher};
use acuda_storage::FileStore;
use std::sync::Arc;

/// Token service and account storage.
#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtService,
    pub credentials: Arc<dyn CredentialStore>,
}

/// Everything the document endpoints touch.
#[derive(Clone)]
pub struct DocumentState {
    pub store: Arc<dyn FileStore>,
    pub renderer: DocumentRenderer,
    pub patcher: Arc<DocxPatcher>,
    pub max_images: usize,
}

pub struct AppState {
    pub auth: AuthState,
    pub documents: DocumentState,
}

impl axum::extract::FromRef<Arc<AppState>> for AuthState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.auth.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for DocumentState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.documents.clone()
    }
}

#[allow(dead_code)]
fn _assert_app_state_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AppState>();
}
