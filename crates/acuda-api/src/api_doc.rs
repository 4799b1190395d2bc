//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::models;
use crate::error;
use crate::handlers;
use acuda_core::models as core_models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Acuda API",
        version = "0.1.0",
        description = "Generates alarm response reports (PDF) and Word documents, and keeps each user's generated reports in a private folder."
    ),
    modifiers(&BearerAuth),
    paths(
        handlers::health::api_working,
        // Auth
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::verify,
        // Reports
        handlers::reports::generate_report,
        handlers::reports::example_report,
        // User documents
        handlers::documents::list_documents,
        handlers::documents::view_document,
        handlers::documents::download_document,
        // Generic documents
        handlers::generic::generate_pdf,
        handlers::generic::example_pdf,
        handlers::generic::generate_word,
    ),
    components(
        schemas(
            core_models::User,
            core_models::ReportRecord,
            core_models::AlarmConfirmation,
            core_models::GenericRecord,
            core_models::StoredFileEntry,
            core_models::FilePage,
            models::LoginRequest,
            models::RegisterRequest,
            models::AuthResponse,
            models::VerifyResponse,
            handlers::health::ApiStatus,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Login, registration and token checks"),
        (name = "documentos", description = "Report generation and the caller's document folder"),
        (name = "status", description = "Service status")
    )
)]
pub struct ApiDoc;
