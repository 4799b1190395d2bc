//! Test helpers: build AppState and router for integration tests.
//!
//! Accounts live in memory, documents in a temp directory, and PDFs come from a fake renderer
//! that records the HTML it was given. No database or browser is needed.
//!
//! Run from workspace root: `cargo test -p acuda-api`.

#![allow(dead_code)]

use acuda_api::setup::{routes, services};
use acuda_core::{BaseConfig, Config, DocumentServiceConfig};
use acuda_db::{CredentialStore, InMemoryCredentialStore, PasswordHasher};
use acuda_processing::{PdfRenderer, RenderError};
use acuda_storage::LocalFileStore;
use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const FAKE_PDF: &[u8] = b"%PDF-1.4 fake";
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const ANA: &str = "ana";
pub const ANA_PASSWORD: &str = "secret123";
pub const ANA_RUTA: &str = "usuarios/ana";

/// Returns a fixed PDF and keeps every HTML document it was asked to print.
#[derive(Default)]
pub struct FakePdfRenderer {
    pub rendered: Mutex<Vec<String>>,
}

impl FakePdfRenderer {
    pub fn calls(&self) -> usize {
        self.rendered.lock().unwrap().len()
    }

    pub fn last_html(&self) -> String {
        self.rendered.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl PdfRenderer for FakePdfRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Bytes, RenderError> {
        self.rendered.lock().unwrap().push(html.to_string());
        Ok(Bytes::from_static(FAKE_PDF))
    }
}

/// Test application: server plus the resources it owns.
pub struct TestApp {
    pub server: TestServer,
    pub renderer: Arc<FakePdfRenderer>,
    pub credentials: Arc<InMemoryCredentialStore>,
    pub storage_root: PathBuf,
    pub template_path: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Folder of the seeded account.
    pub fn ana_folder(&self) -> PathBuf {
        self.storage_root.join(ANA_RUTA)
    }

    /// Regular files currently in the seeded account's folder.
    pub fn ana_files(&self) -> Vec<String> {
        match std::fs::read_dir(self.ana_folder()) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_file())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Log in as the seeded account and return its token.
    pub async fn login_ana(&self) -> String {
        let response = self
            .server
            .post("/auth/login")
            .json(&json!({ "nombre": ANA, "contraseña": ANA_PASSWORD }))
            .await;
        assert_eq!(response.status_code(), 200, "{}", response.text());
        let body: Value = response.json();
        body["token"].as_str().expect("token in login response").to_string()
    }
}

fn test_config(storage_root: PathBuf, template_path: PathBuf) -> Config {
    Config(Box::new(DocumentServiceConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 1,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_expiry_hours: 24,
            environment: "test".to_string(),
        },
        database_url: "postgres://unused/acuda".to_string(),
        storage_root,
        word_template_path: template_path,
        chromium_path: "chromium".to_string(),
        render_timeout_secs: 30,
        max_upload_size_bytes: 10 * 1024 * 1024,
        max_images: 10,
        docx_escape_values: false,
        http_concurrency_limit: 64,
    }))
}

/// Setup test app with in-memory accounts (one seeded user) and temp-dir storage.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage_root = temp_dir.path().join("storage");
    let template_path = temp_dir.path().join("plantillas").join("plantilla1.docx");
    let config = test_config(storage_root.clone(), template_path.clone());

    let credentials = Arc::new(InMemoryCredentialStore::new(PasswordHasher::with_cost(4)));
    credentials
        .create(ANA, ANA_RUTA, "García", ANA_PASSWORD)
        .await
        .expect("Failed to seed user");

    let store = LocalFileStore::new(&storage_root)
        .await
        .expect("Failed to create file store");
    let renderer = Arc::new(FakePdfRenderer::default());

    let state = services::build_state(
        &config,
        credentials.clone(),
        Arc::new(store),
        renderer.clone(),
    );
    let router = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        renderer,
        credentials,
        storage_root,
        template_path,
        _temp_dir: temp_dir,
    }
}

/// Smallest valid PNG (1x1, transparent).
pub fn minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}
