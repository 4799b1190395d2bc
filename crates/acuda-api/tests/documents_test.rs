//! Listing, viewing and downloading a user's documents.
//!
//! Run with: `cargo test -p acuda-api --test documents_test`

mod helpers;

use helpers::setup_test_app;
use serde_json::{json, Value};
use std::time::Duration;

fn write_file(dir: &std::path::Path, name: &str, contents: &[u8]) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), contents).unwrap();
}

#[tokio::test]
async fn test_login_then_empty_listing() {
    let app = setup_test_app().await;
    let token = app.login_ana().await;

    let response = app
        .client()
        .get("/documentos/lista")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>(),
        json!({ "documentos": [], "total": 0, "pagina": 1, "totalPaginas": 0 })
    );
    assert!(app.ana_folder().is_dir());
}

#[tokio::test]
async fn test_listing_requires_token() {
    let app = setup_test_app().await;
    let response = app.client().get("/documentos/lista").await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(response.json::<Value>()["error"], "Token inválido");
}

#[tokio::test]
async fn test_listing_search_and_pages() {
    let app = setup_test_app().await;
    let token = app.login_ana().await;
    let folder = app.ana_folder();

    for name in ["parte_a.pdf", "parte_b.pdf", "Informe.PDF", "notas.txt"] {
        write_file(&folder, name, b"%PDF-1.4");
        // Distinct timestamps so the order is deterministic
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    std::fs::create_dir_all(folder.join("subcarpeta")).unwrap();

    let all: Value = app
        .client()
        .get("/documentos/lista")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(all["total"], 4);
    assert_eq!(all["documentos"][0]["nombre"], "notas.txt");

    let search: Value = app
        .client()
        .get("/documentos/lista")
        .add_query_param("busqueda", "pdf")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(search["total"], 3);

    let page: Value = app
        .client()
        .get("/documentos/lista")
        .add_query_param("pagina", "2")
        .add_query_param("limite", "3")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(page["pagina"], 2);
    assert_eq!(page["totalPaginas"], 2);
    assert_eq!(page["documentos"].as_array().unwrap().len(), 1);
    assert_eq!(page["documentos"][0]["nombre"], "parte_a.pdf");

    let fallback: Value = app
        .client()
        .get("/documentos/lista")
        .add_query_param("pagina", "abc")
        .add_query_param("limite", "-5")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(fallback["pagina"], 1);
    assert_eq!(fallback["documentos"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_view_document_inline() {
    let app = setup_test_app().await;
    let token = app.login_ana().await;
    write_file(&app.ana_folder(), "parte.pdf", b"%PDF-1.4 contenido");

    let response = app
        .client()
        .get("/documentos/visualizar/parte.pdf")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "application/pdf");
    assert_eq!(response.header("content-disposition"), "inline");
    assert_eq!(response.header("cache-control"), "no-cache");
    assert_eq!(response.header("content-length"), "18");
    assert_eq!(response.as_bytes().as_ref(), b"%PDF-1.4 contenido");
}

#[tokio::test]
async fn test_download_document_attachment() {
    let app = setup_test_app().await;
    let token = app.login_ana().await;
    write_file(&app.ana_folder(), "notas.txt", b"hola");

    let response = app
        .client()
        .get("/documentos/descargar/notas.txt")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "text/plain");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"notas.txt\""
    );
    assert_eq!(response.header("cache-control"), "no-cache");
    assert_eq!(response.text(), "hola");
}

#[tokio::test]
async fn test_missing_document_not_found() {
    let app = setup_test_app().await;
    let token = app.login_ana().await;

    for path in [
        "/documentos/visualizar/no-existe.pdf",
        "/documentos/descargar/no-existe.pdf",
    ] {
        let response = app.client().get(path).authorization_bearer(&token).await;
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.json::<Value>()["error"], "Archivo no encontrado");
    }
}

#[tokio::test]
async fn test_traversal_never_returns_content() {
    let app = setup_test_app().await;
    let token = app.login_ana().await;
    write_file(&app.storage_root, "secreto.txt", b"no leer");
    std::fs::create_dir_all(app.ana_folder()).unwrap();

    for path in [
        "/documentos/visualizar/..%2F..%2Fetc%2Fpasswd",
        "/documentos/descargar/..%2F..%2Fetc%2Fpasswd",
    ] {
        let response = app.client().get(path).authorization_bearer(&token).await;
        let status = response.status_code().as_u16();
        assert!(status == 403 || status == 404, "{} gave {}", path, status);
    }

    // Exists, but outside the user's folder
    for path in [
        "/documentos/visualizar/..%2F..%2Fsecreto.txt",
        "/documentos/descargar/..%2F..%2Fsecreto.txt",
    ] {
        let response = app.client().get(path).authorization_bearer(&token).await;
        assert_eq!(response.status_code(), 403);
        assert_eq!(response.json::<Value>()["error"], "Acceso denegado al archivo");
    }
}

#[tokio::test]
async fn test_documents_of_other_users_are_invisible() {
    let app = setup_test_app().await;
    let token = app.login_ana().await;
    write_file(&app.storage_root.join("usuarios/luis"), "suyo.pdf", b"%PDF-1.4");

    let listing: Value = app
        .client()
        .get("/documentos/lista")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(listing["total"], 0);

    let response = app
        .client()
        .get("/documentos/descargar/suyo.pdf")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), 404);
}
