//! `[Content_Types].xml` edits

use crate::error::PatchError;
use regex::Regex;
use std::sync::LazyLock;

pub const PART: &str = "[Content_Types].xml";

static DEFAULT_EXTENSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<Default\b[^>]*\bExtension="([^"]*)""#).expect("default extension regex is valid")
});

/// Declare each `(extension, content_type)` default not yet present and one override per
/// `(part_name, content_type)`. Existing declarations are never duplicated.
pub fn register(
    xml: &str,
    defaults: &[(String, String)],
    overrides: &[(String, String)],
) -> Result<String, PatchError> {
    let close = xml
        .rfind("</Types>")
        .ok_or_else(|| PatchError::malformed(PART, "missing </Types>"))?;

    let mut declared: Vec<String> = DEFAULT_EXTENSION_REGEX
        .captures_iter(xml)
        .map(|c| c[1].to_ascii_lowercase())
        .collect();

    let mut additions = String::new();
    for (extension, content_type) in defaults {
        let ext = extension.to_ascii_lowercase();
        if declared.contains(&ext) {
            continue;
        }
        additions.push_str(&format!(
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            ext, content_type
        ));
        declared.push(ext);
    }

    for (part_name, content_type) in overrides {
        let part_name = format!("/{}", part_name.trim_start_matches('/'));
        if xml.contains(&format!(r#"PartName="{}""#, part_name)) {
            continue;
        }
        additions.push_str(&format!(
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            part_name, content_type
        ));
    }

    let mut out = String::with_capacity(xml.len() + additions.len());
    out.push_str(&xml[..close]);
    out.push_str(&additions);
    out.push_str(&xml[close..]);
    Ok(out)
}
