//! `word/_rels/document.xml.rels` edits

use crate::error::PatchError;
use regex::Regex;
use std::sync::LazyLock;

pub const PART: &str = "word/_rels/document.xml.rels";

const IMAGE_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

static RELATIONSHIP_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Id="rId(\d+)""#).expect("relationship id regex is valid"));

/// Highest numeric `rId` in the part, 0 when there is none.
pub fn max_id(xml: &str) -> u32 {
    RELATIONSHIP_ID_REGEX
        .captures_iter(xml)
        .filter_map(|c| c[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

/// Append one image relationship per media target, numbered from max+1 in order.
/// Returns the patched XML and the assigned ids.
pub fn add_images(xml: &str, targets: &[String]) -> Result<(String, Vec<String>), PatchError> {
    let close = xml
        .rfind("</Relationships>")
        .ok_or_else(|| PatchError::malformed(PART, "missing </Relationships>"))?;

    let mut next = max_id(xml) + 1;
    let mut ids = Vec::with_capacity(targets.len());
    let mut additions = String::new();
    for target in targets {
        let id = format!("rId{}", next);
        additions.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id, IMAGE_TYPE, target
        ));
        ids.push(id);
        next += 1;
    }

    let mut out = String::with_capacity(xml.len() + additions.len());
    out.push_str(&xml[..close]);
    out.push_str(&additions);
    out.push_str(&xml[close..]);
    Ok((out, ids))
}
