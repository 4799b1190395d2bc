//! In-memory OOXML package
//!
//! A `.docx` is a ZIP of named parts. The package keeps every part in archive order so a
//! round trip leaves untouched parts where they were; `[Content_Types].xml` stays first.

use crate::error::PatchError;
use std::io::{Cursor, Read, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

#[derive(Debug, Clone, Default)]
pub struct OoxmlPackage {
    parts: Vec<(String, Vec<u8>)>,
}

impl OoxmlPackage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PatchError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.push((name, data));
        }

        Ok(Self { parts })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PatchError> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(0o644);

            for (name, data) in &self.parts {
                zip.start_file(name.as_str(), options)?;
                zip.write_all(data)?;
            }

            zip.finish()?;
        }
        Ok(buffer)
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.parts.iter().any(|(n, _)| n == name)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    /// A required XML part as UTF-8 text.
    pub fn part_text(&self, name: &str) -> Result<String, PatchError> {
        let data = self
            .part(name)
            .ok_or_else(|| PatchError::MissingPart(name.to_string()))?;
        String::from_utf8(data.to_vec()).map_err(|_| PatchError::malformed(name, "not valid UTF-8"))
    }

    /// Replace a part in place, or append it when new.
    pub fn set_part(&mut self, name: &str, data: impl Into<Vec<u8>>) {
        let data = data.into();
        match self.parts.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = data,
            None => self.parts.push((name.to_string(), data)),
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(n, _)| n.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_survive_serialization_in_order() {
        let mut package = OoxmlPackage::new();
        package.set_part("[Content_Types].xml", "<Types/>");
        package.set_part("word/document.xml", "<w:document/>");
        package.set_part("word/media/image1.png", vec![0x89, b'P', b'N', b'G']);

        let bytes = package.to_bytes().unwrap();
        let reread = OoxmlPackage::from_bytes(&bytes).unwrap();

        let names: Vec<_> = reread.part_names().collect();
        assert_eq!(
            names,
            vec!["[Content_Types].xml", "word/document.xml", "word/media/image1.png"]
        );
        assert_eq!(reread.part("word/media/image1.png"), Some(&[0x89, b'P', b'N', b'G'][..]));
    }

    #[test]
    fn test_set_part_replaces_existing() {
        let mut package = OoxmlPackage::new();
        package.set_part("a.xml", "one");
        package.set_part("a.xml", "two");
        assert_eq!(package.part_names().count(), 1);
        assert_eq!(package.part_text("a.xml").unwrap(), "two");
    }

    #[test]
    fn test_missing_part_is_reported() {
        let package = OoxmlPackage::new();
        assert!(matches!(
            package.part_text("word/document.xml"),
            Err(PatchError::MissingPart(_))
        ));
    }

    #[test]
    fn test_corrupt_archive_rejected() {
        let result = OoxmlPackage::from_bytes(b"definitely not a zip file");
        assert!(matches!(result, Err(PatchError::Zip(_))));
    }
}
