//! Inline picture markup for `word/document.xml`

use crate::error::PatchError;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::sync::LazyLock;

pub const PART: &str = "word/document.xml";

/// Picture size in EMU (12.7 x 8.47 cm)
const IMAGE_CX: u64 = 4_572_000;
const IMAGE_CY: u64 = 3_048_000;

/// Prefixes the picture markup uses, with their namespace URIs
pub const NAMESPACES: [(&str, &str); 5] = [
    (
        "wp",
        "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing",
    ),
    ("a", "http://schemas.openxmlformats.org/drawingml/2006/main"),
    ("pic", "http://schemas.openxmlformats.org/drawingml/2006/picture"),
    ("a14", "http://schemas.microsoft.com/office/drawing/2010/main"),
    (
        "r",
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships",
    ),
];

static DOCUMENT_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w:document\b[^>]*>").expect("document tag regex is valid"));

static DRAWING_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(?:wp:docPr|pic:cNvPr)\b[^>]*\bid="(\d+)""#).expect("drawing id regex is valid")
});

/// Add any missing `xmlns:<prefix>` declaration to the `<w:document>` start tag.
pub fn ensure_namespaces(xml: &str) -> Result<String, PatchError> {
    let tag = DOCUMENT_TAG_REGEX
        .find(xml)
        .ok_or_else(|| PatchError::malformed(PART, "missing <w:document> root"))?;

    let open = tag.as_str();
    let missing: String = NAMESPACES
        .iter()
        .filter(|(prefix, _)| !open.contains(&format!("xmlns:{}=", prefix)))
        .map(|(prefix, uri)| format!(r#" xmlns:{}="{}""#, prefix, uri))
        .collect();

    if missing.is_empty() {
        return Ok(xml.to_string());
    }

    // Keep a self-closing slash, if any, after the new attributes
    let insert_at = if open.ends_with("/>") {
        tag.end() - 2
    } else {
        tag.end() - 1
    };

    let mut out = String::with_capacity(xml.len() + missing.len());
    out.push_str(&xml[..insert_at]);
    out.push_str(&missing);
    out.push_str(&xml[insert_at..]);
    Ok(out)
}

/// First drawing-object id not already used by a `wp:docPr` or `pic:cNvPr`.
pub fn next_drawing_id(xml: &str) -> u32 {
    DRAWING_ID_REGEX
        .captures_iter(xml)
        .filter_map(|c| c[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

/// One paragraph holding one inline picture. `number` is the 1-based caption index.
pub fn image_paragraph(rel_id: &str, drawing_id: u32, number: usize) -> String {
    format!(
        concat!(
            r#"<w:p><w:pPr><w:spacing w:after="240"/></w:pPr><w:r><w:drawing>"#,
            r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#,
            r#"<wp:docPr id="{id}" name="Imagen {n}"/>"#,
            r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="Imagen {n}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}"><a:extLst>"#,
            r#"<a:ext uri="{{28A0092B-C50C-407E-A947-70E740481C1C}}"><a14:useLocalDpi val="0"/></a:ext>"#,
            r#"</a:extLst></a:blip><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#
        ),
        cx = IMAGE_CX,
        cy = IMAGE_CY,
        id = drawing_id,
        n = number,
        rel = rel_id,
    )
}

/// Insert `fragment` at the end of the body.
///
/// Body-level section properties must stay the last child of `<w:body>`, so when the body
/// ends with `<w:sectPr>` the fragment goes right before it. Without a `</w:body>` the
/// fragment is appended to the part.
pub fn insert_into_body(xml: &str, fragment: &str) -> String {
    let Some(close) = xml.rfind("</w:body>") else {
        return format!("{}{}", xml, fragment);
    };

    let at = trailing_section_start(&xml[..close]).unwrap_or(close);

    let mut out = String::with_capacity(xml.len() + fragment.len());
    out.push_str(&xml[..at]);
    out.push_str(fragment);
    out.push_str(&xml[at..]);
    out
}

/// Offset of a `<w:sectPr>` that is the last child of `<w:body>` in `head`, which must be
/// the document up to (not including) `</w:body>`.
fn trailing_section_start(head: &str) -> Option<usize> {
    let mut reader = Reader::from_str(head);
    let mut depth = 0usize;
    let mut body_depth = None;
    let mut last_child: Option<(usize, bool)> = None;

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if body_depth == Some(depth) {
                    last_child = Some((pos, e.name().as_ref() == b"w:sectPr"));
                }
                depth += 1;
                if body_depth.is_none() && e.name().as_ref() == b"w:body" {
                    body_depth = Some(depth);
                }
            }
            Ok(Event::Empty(e)) => {
                if body_depth == Some(depth) {
                    last_child = Some((pos, e.name().as_ref() == b"w:sectPr"));
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            // The head is cut before </w:body>, so a complaint about open tags at the end is expected
            Err(_) if reader.buffer_position() as usize >= head.len() => break,
            Err(_) => return None,
        }
    }

    match last_child {
        Some((pos, true)) => Some(pos),
        _ => None,
    }
}
