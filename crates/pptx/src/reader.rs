//! Text extraction from uploaded documents.
//!
//! Plain text and Markdown are read as-is. DOCX and PPTX are ZIP archives of
//! XML; their paragraph text is pulled out in reading order so it can be fed
//! to the segmenter like any other script.

use crate::xml::local_name;
use deck_core::{Error, Result};
use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Kinds of input documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// UTF-8 text, including Markdown.
    PlainText,
    /// Word (Office Open XML).
    Docx,
    /// PowerPoint (Office Open XML).
    Pptx,
}

impl DocumentFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" | "md" | "markdown" | "text" => Some(Self::PlainText),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Detect format from file contents.
    ///
    /// ZIP archives are told apart by their main part; anything that is valid
    /// UTF-8 is plain text.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            let archive = ZipArchive::new(Cursor::new(bytes)).ok()?;
            let names: Vec<&str> = archive.file_names().collect();
            if names.contains(&"word/document.xml") {
                return Some(Self::Docx);
            }
            if names.contains(&"ppt/presentation.xml") {
                return Some(Self::Pptx);
            }
            return None;
        }

        std::str::from_utf8(bytes).ok().map(|_| Self::PlainText)
    }
}

/// Reads supported documents into plain text.
#[derive(Debug, Clone, Default)]
pub struct DocumentReader;

impl DocumentReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a document from disk, detecting its format.
    pub fn read_path(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;
        let format = DocumentFormat::from_bytes(&bytes)
            .or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .and_then(DocumentFormat::from_extension)
            })
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;

        debug!("Reading {} as {:?}", path.display(), format);
        self.read_bytes(&bytes, format)
    }

    /// Read a document already in memory.
    pub fn read_bytes(&self, bytes: &[u8], format: DocumentFormat) -> Result<String> {
        match format {
            DocumentFormat::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
            DocumentFormat::Docx => self.read_docx(Cursor::new(bytes)),
            DocumentFormat::Pptx => self.read_pptx(Cursor::new(bytes)),
        }
    }

    /// Paragraph text of `word/document.xml`. Paragraphs styled as headings
    /// get a trailing colon so the segmenter treats them as section titles.
    pub fn read_docx<R: Read + Seek>(&self, reader: R) -> Result<String> {
        let mut archive = open_archive(reader)?;
        let xml = read_file_from_archive(&mut archive, "word/document.xml")?;
        let paragraphs = extract_paragraphs(&xml, b"p", b"t")?;

        let lines: Vec<String> = paragraphs
            .into_iter()
            .filter(|p| !p.text.trim().is_empty())
            .map(|p| {
                let text = p.text.trim().to_string();
                if p.is_heading && !text.contains(':') {
                    format!("{text}:")
                } else {
                    text
                }
            })
            .collect();

        Ok(lines.join("\n"))
    }

    /// Shape text of every slide, in slide order, one paragraph per line.
    /// The first text block of each slide (its title) is turned into a
    /// heading.
    pub fn read_pptx<R: Read + Seek>(&self, reader: R) -> Result<String> {
        let mut archive = open_archive(reader)?;
        let slide_paths = slide_order(&archive);

        let mut blocks = Vec::new();
        for path in slide_paths {
            let xml = match read_file_from_archive(&mut archive, &path) {
                Ok(xml) => xml,
                Err(e) => {
                    warn!("Skipping {path}: {e}");
                    continue;
                }
            };

            let lines: Vec<String> = extract_paragraphs(&xml, b"p", b"t")?
                .into_iter()
                .map(|p| p.text.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();

            if let Some((first, rest)) = lines.split_first() {
                let mut block = if first.contains(':') {
                    first.clone()
                } else {
                    format!("{first}:")
                };
                for line in rest {
                    block.push('\n');
                    block.push_str(line);
                }
                blocks.push(block);
            }
        }

        Ok(blocks.join("\n"))
    }
}

fn open_archive<R: Read + Seek>(reader: R) -> Result<ZipArchive<R>> {
    ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {e}")))
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{path}': {e}")))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{path}': {e}")))?;

    Ok(content)
}

/// Slide part names sorted by their number.
fn slide_order<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<String> {
    let mut slides: Vec<(usize, String)> = archive
        .file_names()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .filter_map(|name| extract_slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort();
    slides.into_iter().map(|(_, name)| name).collect()
}

/// Extract a slide number from a string like "ppt/slides/slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let stem = s.trim_end_matches(".xml");
    let digits_start = stem
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|i| i + 1)
        .unwrap_or(0);
    stem[digits_start..].parse().ok()
}

/// One paragraph of extracted text.
#[derive(Debug, Default, PartialEq, Eq)]
struct ExtractedParagraph {
    text: String,
    is_heading: bool,
}

/// Whether a `pStyle`/`outlineLvl` element marks a heading paragraph.
fn marks_heading(e: &BytesStart<'_>) -> bool {
    match local_name(e.name().as_ref()) {
        b"outlineLvl" => true,
        b"pStyle" => e.attributes().flatten().any(|attr| {
            local_name(attr.key.as_ref()) == b"val" && {
                let value = String::from_utf8_lossy(&attr.value).to_lowercase();
                value.starts_with("heading") || value == "title"
            }
        }),
        _ => false,
    }
}

/// Collect paragraph text from WordprocessingML or DrawingML.
///
/// `para` and `text` are local element names (`p` and `t` in both
/// vocabularies). Tabs and breaks become spaces.
fn extract_paragraphs(xml: &str, para: &[u8], text: &[u8]) -> Result<Vec<ExtractedParagraph>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current: Option<ExtractedParagraph> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if local == para {
                    current = Some(ExtractedParagraph::default());
                } else if local == text {
                    in_text = true;
                } else if let Some(ref mut p) = current {
                    p.is_heading |= marks_heading(e);
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if let Some(ref mut p) = current {
                    match local {
                        b"tab" | b"br" => p.text.push(' '),
                        _ => p.is_heading |= marks_heading(e),
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(ref mut p) = current {
                        let decoded = e.unescape().unwrap_or_default();
                        p.text.push_str(&decoded);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if local == text {
                    in_text = false;
                } else if local == para {
                    if let Some(p) = current.take() {
                        paragraphs.push(p);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}
