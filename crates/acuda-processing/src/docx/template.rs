//! Minimal Word template, synthesized when none is configured on disk

use super::package::OoxmlPackage;
use chrono::{DateTime, SecondsFormat, Utc};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault>
      <w:rPr>
        <w:rFonts w:ascii="Calibri" w:eastAsia="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/>
        <w:sz w:val="22"/>
        <w:szCs w:val="22"/>
      </w:rPr>
    </w:rPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:pPr><w:spacing w:after="200"/></w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Title">
    <w:name w:val="Title"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:spacing w:after="300"/><w:jc w:val="center"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr>
  </w:style>
</w:styles>"#;

const APP_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <Application>Generated Document</Application>
</Properties>"#;

/// Labelled placeholders, one paragraph each
const FIELDS: [(&str, &str); 8] = [
    ("Nombre", "nombre"),
    ("Apellidos", "apellidos"),
    ("Email", "email"),
    ("Teléfono", "telefono"),
    ("Dirección", "direccion"),
    ("Empresa", "empresa"),
    ("Cargo", "cargo"),
    ("Fecha", "fecha"),
];

fn document_xml() -> String {
    let mut body = String::from(
        r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Documento Personalizado</w:t></w:r></w:p>"#,
    );
    for (label, key) in FIELDS {
        body.push_str(&format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}: {{{}}}</w:t></w:r></w:p>"#,
            label, key
        ));
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#,
            r#" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing""#,
            r#" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#,
            r#" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#,
            r#" xmlns:a14="http://schemas.microsoft.com/office/drawing/2010/main""#,
            r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            "<w:body>{}</w:body></w:document>"
        ),
        body
    )
}

fn core_props(now: DateTime<Utc>) -> String {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:creator>Acuda</dc:creator>
  <cp:lastModifiedBy>Acuda</cp:lastModifiedBy>
  <dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>
  <dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>
</cp:coreProperties>"#
    )
}

/// Smallest package Word opens: a title and one `{key}` placeholder per known field.
pub fn basic_template(now: DateTime<Utc>) -> OoxmlPackage {
    let mut package = OoxmlPackage::new();
    package.set_part("[Content_Types].xml", CONTENT_TYPES);
    package.set_part("_rels/.rels", PACKAGE_RELS);
    package.set_part("word/document.xml", document_xml());
    package.set_part("word/_rels/document.xml.rels", DOCUMENT_RELS);
    package.set_part("word/styles.xml", STYLES);
    package.set_part("docProps/app.xml", APP_PROPS);
    package.set_part("docProps/core.xml", core_props(now));
    package
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_basic_template_parts() {
        let package = basic_template(Utc::now());
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/_rels/document.xml.rels",
            "word/styles.xml",
            "docProps/app.xml",
            "docProps/core.xml",
        ] {
            assert!(package.has_part(part), "missing {}", part);
        }
    }

    #[test]
    fn test_basic_template_placeholders() {
        let document = basic_template(Utc::now()).part_text("word/document.xml").unwrap();
        assert!(document.contains("Documento Personalizado"));
        assert!(document.contains("Nombre: {nombre}"));
        assert!(document.contains("Teléfono: {telefono}"));
        assert!(document.contains("Fecha: {fecha}"));
        assert!(document.contains("xmlns:wp="));
    }

    #[test]
    fn test_core_props_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let core = basic_template(now).part_text("docProps/core.xml").unwrap();
        assert!(core.contains("2026-10-19T08:30:00Z"));
    }
}
