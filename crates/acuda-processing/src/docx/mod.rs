//! Word document patching
//!
//! Fills `{key}` placeholders in a `.docx` template and appends uploaded images as inline
//! pictures. All edits are plain string operations on the part XML; the template on disk is
//! only ever read (or created once when missing).

mod content_types;
mod drawing;
mod package;
mod relationships;
mod template;

pub use package::OoxmlPackage;
pub use template::basic_template;

use crate::error::PatchError;
use acuda_core::models::{GenericRecord, ImageAttachment};
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

const MEDIA_DIR: &str = "word/media/";

#[derive(Debug, Clone)]
pub struct DocxPatcher {
    template_path: PathBuf,
    escape_values: bool,
}

impl DocxPatcher {
    /// `escape_values` XML-escapes substituted text. Off by default to keep existing templates
    /// that rely on raw markup in values working.
    pub fn new(template_path: impl Into<PathBuf>, escape_values: bool) -> Self {
        Self {
            template_path: template_path.into(),
            escape_values,
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Patch the template with `record` and `images` and return the new package.
    #[tracing::instrument(skip(self, record, images), fields(images = images.len()))]
    pub async fn patch(
        &self,
        record: GenericRecord,
        images: Vec<ImageAttachment>,
    ) -> Result<Bytes, PatchError> {
        let start = Instant::now();
        let template = self.load_template().await?;
        let values = record.with_default_date().placeholder_values();
        let escape = self.escape_values;

        let output = tokio::task::spawn_blocking(move || {
            patch_package(&template, &values, &images, escape)
        })
        .await
        .map_err(|e| PatchError::Task(e.to_string()))??;

        tracing::info!(
            template = %self.template_path.display(),
            size_bytes = output.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Word document patched"
        );

        Ok(Bytes::from(output))
    }

    /// Read the template, synthesizing and persisting a basic one when the file is missing.
    async fn load_template(&self) -> Result<Vec<u8>, PatchError> {
        match tokio::fs::read(&self.template_path).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
            Err(_) => {}
        }

        tracing::warn!(
            path = %self.template_path.display(),
            "Word template not found, creating a basic one"
        );

        let bytes = basic_template(chrono::Utc::now()).to_bytes()?;
        let path = self.template_path.clone();
        let persisted = bytes.clone();
        tokio::task::spawn_blocking(move || persist_atomically(&path, &persisted))
            .await
            .map_err(|e| PatchError::Task(e.to_string()))??;

        Ok(bytes)
    }
}

/// Write via a sibling temp file and rename, so concurrent first requests never observe a
/// half-written template.
fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<(), PatchError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| PatchError::Io(e.error))?;
    Ok(())
}

fn substitute(xml: &str, values: &[(String, String)], escape: bool) -> String {
    let mut out = xml.to_string();
    for (key, value) in values {
        let placeholder = format!("{{{}}}", key);
        if !out.contains(&placeholder) {
            continue;
        }
        out = if escape {
            out.replace(&placeholder, &quick_xml::escape::escape(value.as_str()))
        } else {
            out.replace(&placeholder, value)
        };
    }
    out
}

/// Lowest-numbered `image<N>.<ext>` not already present under `word/media/`.
fn free_media_name(package: &OoxmlPackage, taken: &[String], ext: &str) -> String {
    let used: Vec<&str> = package
        .part_names()
        .filter_map(|name| name.strip_prefix(MEDIA_DIR))
        .chain(taken.iter().map(String::as_str))
        .collect();

    let is_used = |n: u32| {
        let stem = format!("image{}.", n);
        used.iter().any(|name| name.starts_with(&stem))
    };

    let mut n = 1;
    while is_used(n) {
        n += 1;
    }
    format!("image{}.{}", n, ext)
}

/// Pure, synchronous core of [`DocxPatcher::patch`].
pub fn patch_package(
    template: &[u8],
    values: &[(String, String)],
    images: &[ImageAttachment],
    escape: bool,
) -> Result<Vec<u8>, PatchError> {
    let mut package = OoxmlPackage::from_bytes(template)?;
    let mut document = substitute(&package.part_text(drawing::PART)?, values, escape);

    if !images.is_empty() {
        document = drawing::ensure_namespaces(&document)?;

        let mut media_names = Vec::with_capacity(images.len());
        let mut defaults = Vec::new();
        let mut overrides = Vec::with_capacity(images.len());
        for image in images {
            let ext = image.extension();
            let name = free_media_name(&package, &media_names, &ext);
            let content_type = image.content_type.trim().to_ascii_lowercase();

            defaults.push((ext, content_type.clone()));
            overrides.push((format!("{}{}", MEDIA_DIR, name), content_type));
            media_names.push(name);
        }

        let types = content_types::register(
            &package.part_text(content_types::PART)?,
            &defaults,
            &overrides,
        )?;

        let targets: Vec<String> = media_names.iter().map(|n| format!("media/{}", n)).collect();
        let (rels, rel_ids) =
            relationships::add_images(&package.part_text(relationships::PART)?, &targets)?;

        let mut drawing_id = drawing::next_drawing_id(&document);
        let mut fragments = String::new();
        for (index, rel_id) in rel_ids.iter().enumerate() {
            fragments.push_str(&drawing::image_paragraph(rel_id, drawing_id, index + 1));
            drawing_id += 1;
        }
        document = drawing::insert_into_body(&document, &fragments);

        for (name, image) in media_names.iter().zip(images) {
            package.set_part(&format!("{}{}", MEDIA_DIR, name), image.data.to_vec());
        }
        package.set_part(content_types::PART, types);
        package.set_part(relationships::PART, rels);
    }

    package.set_part(drawing::PART, document);
    package.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    fn values(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn basic_bytes() -> Vec<u8> {
        basic_template(chrono::Utc::now()).to_bytes().unwrap()
    }

    fn png(n: u8) -> ImageAttachment {
        ImageAttachment::new(vec![0x89, b'P', b'N', b'G', n], "image/png", format!("{}.png", n))
    }

    fn assert_well_formed(xml: &str) {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("malformed XML at {}: {}", reader.buffer_position(), e),
            }
        }
    }

    #[test]
    fn test_placeholders_replaced_globally() {
        let out = substitute(
            "<w:t>{nombre} y {nombre} - {cargo} - {otro}</w:t>",
            &values(&[("nombre", "Ana"), ("cargo", "Jefa")]),
            false,
        );
        assert_eq!(out, "<w:t>Ana y Ana - Jefa - {otro}</w:t>");
    }

    #[test]
    fn test_placeholders_are_case_sensitive() {
        let out = substitute("{Nombre} {nombre}", &values(&[("nombre", "Ana")]), false);
        assert_eq!(out, "{Nombre} Ana");
    }

    #[test]
    fn test_default_mode_does_not_escape() {
        let out = substitute("<w:t>{empresa}</w:t>", &values(&[("empresa", "A & B <C>")]), false);
        assert_eq!(out, "<w:t>A & B <C></w:t>");
    }

    #[test]
    fn test_escape_mode_escapes_markup() {
        let out = substitute("<w:t>{empresa}</w:t>", &values(&[("empresa", "A & B <C>")]), true);
        assert_eq!(out, "<w:t>A &amp; B &lt;C&gt;</w:t>");
    }

    #[test]
    fn test_patch_without_images_only_substitutes() {
        let out = patch_package(&basic_bytes(), &values(&[("nombre", "Ana")]), &[], false).unwrap();
        let package = OoxmlPackage::from_bytes(&out).unwrap();
        let document = package.part_text("word/document.xml").unwrap();
        assert!(document.contains("Nombre: Ana"));
        assert!(document.contains("Apellidos: {apellidos}"));
        assert!(!package.part_names().any(|n| n.starts_with(MEDIA_DIR)));
        assert_well_formed(&document);
    }

    #[test]
    fn test_patch_embeds_each_image_once() {
        let images = vec![
            png(1),
            png(2),
            ImageAttachment::new(vec![0xFF, 0xD8], "image/jpeg", "c.jpg"),
        ];
        let out = patch_package(&basic_bytes(), &[], &images, false).unwrap();
        let package = OoxmlPackage::from_bytes(&out).unwrap();

        assert_eq!(package.part("word/media/image1.png"), Some(&images[0].data[..]));
        assert!(package.has_part("word/media/image2.png"));
        assert!(package.has_part("word/media/image3.jpeg"));

        let rels = package.part_text(relationships::PART).unwrap();
        for id in ["rId2", "rId3", "rId4"] {
            assert_eq!(rels.matches(&format!(r#"Id="{}""#, id)).count(), 1);
        }

        let types = package.part_text(content_types::PART).unwrap();
        assert_eq!(types.matches(r#"Extension="png""#).count(), 1);
        assert_eq!(types.matches(r#"Extension="jpeg""#).count(), 1);
        assert!(types.contains(r#"PartName="/word/media/image3.jpeg""#));

        let document = package.part_text(drawing::PART).unwrap();
        assert_eq!(document.matches("<w:drawing>").count(), 3);
        for id in ["rId2", "rId3", "rId4"] {
            assert!(document.contains(&format!(r#"r:embed="{}""#, id)));
        }
        assert!(document.contains(r#"<wp:docPr id="1" name="Imagen 1"/>"#));
        assert!(document.contains(r#"<wp:docPr id="3" name="Imagen 3"/>"#));
        assert!(document.ends_with("</w:body></w:document>"));
        assert_well_formed(&document);
        assert_well_formed(&types);
        assert_well_formed(&rels);
    }

    #[test]
    fn test_existing_media_is_not_overwritten() {
        let mut template = basic_template(chrono::Utc::now());
        template.set_part("word/media/image1.png", vec![1, 2, 3]);
        let bytes = template.to_bytes().unwrap();

        let out = patch_package(&bytes, &[], &[png(9)], false).unwrap();
        let package = OoxmlPackage::from_bytes(&out).unwrap();
        assert_eq!(package.part("word/media/image1.png"), Some(&[1u8, 2, 3][..]));
        assert!(package.has_part("word/media/image2.png"));
        assert!(package
            .part_text(relationships::PART)
            .unwrap()
            .contains(r#"Target="media/image2.png""#));
    }

    #[test]
    fn test_malformed_relationships_part_fails() {
        let mut template = basic_template(chrono::Utc::now());
        template.set_part(relationships::PART, "<Relationships>");
        let bytes = template.to_bytes().unwrap();

        let result = patch_package(&bytes, &[], &[png(1)], false);
        assert!(matches!(result, Err(PatchError::Malformed { .. })));
    }

    #[test]
    fn test_missing_document_part_fails() {
        let mut package = OoxmlPackage::new();
        package.set_part("[Content_Types].xml", "<Types></Types>");
        let bytes = package.to_bytes().unwrap();
        let result = patch_package(&bytes, &[], &[], false);
        assert!(matches!(result, Err(PatchError::MissingPart(_))));
    }

    #[test]
    fn test_corrupt_template_fails() {
        let result = patch_package(b"PK\x03\x04 garbage", &[], &[], false);
        assert!(matches!(result, Err(PatchError::Zip(_))));
    }

    #[tokio::test]
    async fn test_missing_template_is_synthesized_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Documentos").join("plantilla1.docx");
        let patcher = DocxPatcher::new(&path, false);

        let record = GenericRecord {
            nombre: Some("Ana".to_string()),
            ..Default::default()
        };
        let out = patcher.patch(record, vec![png(1)]).await.unwrap();

        assert!(path.exists());
        let package = OoxmlPackage::from_bytes(&out).unwrap();
        let document = package.part_text(drawing::PART).unwrap();
        assert!(document.contains("Nombre: Ana"));
        assert!(!document.contains("{fecha}"));

        // The persisted template is left untouched by the patch
        let on_disk = OoxmlPackage::from_bytes(&std::fs::read(&path).unwrap()).unwrap();
        assert!(on_disk
            .part_text(drawing::PART)
            .unwrap()
            .contains("Nombre: {nombre}"));
        assert!(!on_disk.has_part("word/media/image1.png"));
    }
}
