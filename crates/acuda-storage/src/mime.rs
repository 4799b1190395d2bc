//! Content types for served files, chosen by extension.

const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Content type for `name`; unknown extensions are `application/octet-stream`.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" | "docx" => DOCX,
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
