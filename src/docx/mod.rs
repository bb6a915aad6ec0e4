//! DOCX ingestion and HTML conversion
//!
//! A .docx file is an OPC zip archive; the text lives in
//! `word/document.xml` as WordprocessingML. The loader here extracts that
//! part and flattens it into a plain paragraph/run model, which
//! `convert::DocxConverter` turns into a styled HTML fragment.
//!
//! Excluded on purpose: images, links, tables. Only basic run formatting
//! (font, size, color, italic/bold/underline) and paragraph alignment are
//! carried through.

pub mod convert;

pub use convert::{DocxConverter, StyleDefaults};

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, thiserror::Error)]
pub enum DocxError {
    #[error("Not a valid document archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Archive has no word/document.xml part")]
    MissingDocumentPart,

    #[error("Failed to read document part: {0}")]
    Io(#[from] std::io::Error),
}

/// Paragraph alignment as recognized by the converter.
///
/// WordprocessingML knows more justification values (both, distribute, ...);
/// anything beyond these three is treated as unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// A contiguous span of text sharing one formatting set.
#[derive(Debug, Clone, Default)]
pub struct RunSource {
    pub text: String,
    /// Font family name, if the run declares one.
    pub font: Option<String>,
    /// Raw font size in internal units (20 units per point).
    pub size: Option<i64>,
    /// RGB hex digits without the leading `#`, if the run declares a color.
    pub color: Option<String>,
    pub italic: bool,
    pub bold: bool,
    pub underline: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ParagraphSource {
    pub alignment: Option<Alignment>,
    pub runs: Vec<RunSource>,
}

/// Ordered paragraphs of a loaded document. Read-only input for the
/// converter; nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct DocumentSource {
    pub paragraphs: Vec<ParagraphSource>,
}

/// Internal size units per typographic point (WordprocessingML stores
/// `w:sz` in half-points; we normalize to a 20-per-point scale).
pub const SIZE_UNITS_PER_POINT: i64 = 20;

const HALF_POINT_TO_UNITS: i64 = SIZE_UNITS_PER_POINT / 2;

/// Load a document from the raw bytes of a .docx file.
pub fn load_docx(bytes: &[u8]) -> Result<DocumentSource, DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| match e {
            zip::result::ZipError::FileNotFound => DocxError::MissingDocumentPart,
            other => DocxError::Archive(other),
        })?
        .read_to_string(&mut xml)?;
    parse_document_xml(&xml)
}

/// Flatten the WordprocessingML body into paragraphs and runs.
///
/// Run properties (`w:rPr`) are only honored inside an open `w:r`, so the
/// paragraph-mark properties nested under `w:pPr` never bleed into runs.
pub fn parse_document_xml(xml: &str) -> Result<DocumentSource, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut document = DocumentSource::default();
    let mut paragraph: Option<ParagraphSource> = None;
    let mut run: Option<RunSource> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"p" => paragraph = Some(ParagraphSource::default()),
                b"r" => {
                    if paragraph.is_some() {
                        run = Some(RunSource::default());
                    }
                }
                b"t" => in_text = run.is_some(),
                other => apply_property(other, e, &mut paragraph, &mut run)?,
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                // Self-closing <w:p/> and <w:r/> never see an End event,
                // so they are recorded here directly.
                b"p" => document.paragraphs.push(ParagraphSource::default()),
                b"r" => {
                    if let Some(par) = paragraph.as_mut() {
                        par.runs.push(RunSource::default());
                    }
                }
                other => apply_property(other, e, &mut paragraph, &mut run)?,
            },
            Event::Text(e) => {
                if in_text {
                    if let Some(run) = run.as_mut() {
                        run.text.push_str(&e.unescape()?);
                    }
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => {
                    if let (Some(par), Some(done)) = (paragraph.as_mut(), run.take()) {
                        par.runs.push(done);
                    }
                }
                b"p" => {
                    if let Some(done) = paragraph.take() {
                        document.paragraphs.push(done);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(document)
}

fn apply_property(
    local: &[u8],
    e: &BytesStart,
    paragraph: &mut Option<ParagraphSource>,
    run: &mut Option<RunSource>,
) -> Result<(), DocxError> {
    match local {
        b"jc" => {
            if let Some(par) = paragraph.as_mut() {
                par.alignment = attr_value(e, b"w:val")?.as_deref().and_then(parse_alignment);
            }
        }
        b"rFonts" => {
            if let Some(run) = run.as_mut() {
                run.font = attr_value(e, b"w:ascii")?;
            }
        }
        b"sz" => {
            if let Some(run) = run.as_mut() {
                run.size = attr_value(e, b"w:val")?
                    .and_then(|v| v.parse::<i64>().ok())
                    .map(|half_points| half_points * HALF_POINT_TO_UNITS);
            }
        }
        b"color" => {
            if let Some(run) = run.as_mut() {
                // "auto" means "no explicit color", same as an absent element
                run.color = attr_value(e, b"w:val")?.filter(|v| v != "auto");
            }
        }
        b"i" => {
            if let Some(run) = run.as_mut() {
                run.italic = on_off(e)?;
            }
        }
        b"b" => {
            if let Some(run) = run.as_mut() {
                run.bold = on_off(e)?;
            }
        }
        b"u" => {
            if let Some(run) = run.as_mut() {
                run.underline = underline_on(e)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn attr_value(e: &BytesStart, name: &[u8]) -> Result<Option<String>, DocxError> {
    match e.try_get_attribute(name).map_err(quick_xml::Error::from)? {
        Some(attr) => {
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

fn parse_alignment(value: &str) -> Option<Alignment> {
    match value {
        "left" | "start" => Some(Alignment::Left),
        "center" => Some(Alignment::Center),
        "right" | "end" => Some(Alignment::Right),
        _ => None,
    }
}

/// Toggle properties like `<w:b/>` are on unless `w:val` says otherwise.
fn on_off(e: &BytesStart) -> Result<bool, DocxError> {
    Ok(match attr_value(e, b"w:val")? {
        Some(v) => !matches!(v.as_str(), "false" | "0" | "none"),
        None => true,
    })
}

/// `w:u` carries an underline style rather than a plain toggle.
fn underline_on(e: &BytesStart) -> Result<bool, DocxError> {
    Ok(match attr_value(e, b"w:val")? {
        Some(v) => v != "none",
        None => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOC_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr>
        <w:jc w:val="center"/>
        <w:rPr><w:sz w:val="48"/></w:rPr>
      </w:pPr>
      <w:r>
        <w:rPr>
          <w:rFonts w:ascii="Arial"/>
          <w:sz w:val="24"/>
          <w:color w:val="FF0000"/>
          <w:b/>
        </w:rPr>
        <w:t>Hello</w:t>
      </w:r>
      <w:r>
        <w:rPr><w:i/><w:u w:val="single"/></w:rPr>
        <w:t xml:space="preserve"> world</w:t>
      </w:r>
    </w:p>
    <w:p>
      <w:r>
        <w:rPr><w:b w:val="false"/><w:color w:val="auto"/></w:rPr>
        <w:t>plain</w:t>
      </w:r>
    </w:p>
    <w:p/>
  </w:body>
</w:document>"#;

    #[test]
    fn parses_paragraphs_runs_and_properties() {
        let doc = parse_document_xml(DOC_XML).unwrap();
        assert_eq!(doc.paragraphs.len(), 3);

        let first = &doc.paragraphs[0];
        assert_eq!(first.alignment, Some(Alignment::Center));
        assert_eq!(first.runs.len(), 2);

        let hello = &first.runs[0];
        assert_eq!(hello.text, "Hello");
        assert_eq!(hello.font.as_deref(), Some("Arial"));
        assert_eq!(hello.size, Some(240)); // 24 half-points = 12pt = 240 units
        assert_eq!(hello.color.as_deref(), Some("FF0000"));
        assert!(hello.bold && !hello.italic && !hello.underline);

        let world = &first.runs[1];
        assert_eq!(world.text, " world");
        assert!(world.italic && world.underline && !world.bold);
    }

    #[test]
    fn paragraph_mark_properties_do_not_bleed_into_runs() {
        let doc = parse_document_xml(DOC_XML).unwrap();
        // The pPr declares sz=48, but the first run declares its own 24
        // and the second run declares none at all.
        assert_eq!(doc.paragraphs[0].runs[1].size, None);
    }

    #[test]
    fn explicit_off_toggles_and_auto_color() {
        let doc = parse_document_xml(DOC_XML).unwrap();
        let plain = &doc.paragraphs[1].runs[0];
        assert!(!plain.bold);
        assert_eq!(plain.color, None);
    }

    #[test]
    fn empty_paragraph_has_no_runs() {
        let doc = parse_document_xml(DOC_XML).unwrap();
        assert!(doc.paragraphs[2].runs.is_empty());
    }

    #[test]
    fn self_closing_paragraphs_and_runs_are_kept() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p/>
    <w:p><w:r/><w:r><w:t>text</w:t></w:r></w:p>
    <w:p/>
  </w:body>
</w:document>"#;
        let doc = parse_document_xml(xml).unwrap();
        assert_eq!(doc.paragraphs.len(), 3);
        assert!(doc.paragraphs[0].runs.is_empty());
        assert!(doc.paragraphs[2].runs.is_empty());

        // The empty run survives in order and carries no text
        let middle = &doc.paragraphs[1];
        assert_eq!(middle.runs.len(), 2);
        assert_eq!(middle.runs[0].text, "");
        assert_eq!(middle.runs[1].text, "text");
    }

    #[test]
    fn self_closing_paragraph_converts_to_default_styled_line_break() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body><w:p/></w:body>
</w:document>"#;
        let doc = parse_document_xml(xml).unwrap();
        let html = DocxConverter::default().content_html(&doc);
        assert_eq!(
            html,
            "<p style='font-family: calibri;font-size: 22px;text-align: left;'><br></p>\n"
        );
    }

    #[test]
    fn loads_from_zip_archive() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(DOC_XML.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        let doc = load_docx(cursor.get_ref()).unwrap();
        assert_eq!(doc.paragraphs.len(), 3);
    }

    #[test]
    fn missing_document_part_is_reported() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("word/other.xml", options).unwrap();
            writer.write_all(b"<x/>").unwrap();
            writer.finish().unwrap();
        }
        let err = load_docx(cursor.get_ref()).unwrap_err();
        assert!(matches!(err, DocxError::MissingDocumentPart));
    }
}
