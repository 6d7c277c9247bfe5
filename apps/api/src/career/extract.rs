//! Plain-text extraction from uploaded resumes (PDF, DOCX, text).
//!
//! All functions are blocking; callers run them on the blocking pool.

use std::io::{Cursor, Read};

use thiserror::Error;

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document type; upload a PDF, DOCX or plain-text file")]
    Unsupported,

    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("failed to read DOCX: {0}")]
    Docx(String),

    #[error("text file is not valid UTF-8")]
    Encoding,

    #[error("no text could be extracted from the document")]
    Empty,
}

impl DocumentKind {
    /// Detects the kind from magic bytes, then file extension and content type.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>, bytes: &[u8]) -> Option<Self> {
        let extension = file_name
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());
        let content_type = content_type.map(|c| c.to_ascii_lowercase());

        if bytes.starts_with(PDF_MAGIC) {
            return Some(DocumentKind::Pdf);
        }
        if bytes.starts_with(ZIP_MAGIC) {
            let is_docx =
                extension.as_deref() == Some("docx") || content_type.as_deref() == Some(DOCX_MIME);
            return is_docx.then_some(DocumentKind::Docx);
        }

        let is_text = matches!(extension.as_deref(), Some("txt" | "md" | "text"))
            || content_type
                .as_deref()
                .is_some_and(|c| c.starts_with("text/plain") || c.starts_with("text/markdown"));
        is_text.then_some(DocumentKind::PlainText)
    }
}

/// Extracts text and rejects documents with no visible text.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractError> {
    let text = match kind {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?
        }
        DocumentKind::Docx => docx_text(bytes)?,
        DocumentKind::PlainText => {
            String::from_utf8(bytes.to_vec()).map_err(|_| ExtractError::Encoding)?
        }
    };

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(text)
}

fn docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx_err = |e: &dyn std::fmt::Display| ExtractError::Docx(e.to_string());

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| docx_err(&e))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| docx_err(&e))?
        .read_to_string(&mut xml)
        .map_err(|e| docx_err(&e))?;

    Ok(document_xml_text(&xml))
}

/// Collects `<w:t>` runs from WordprocessingML, one line per paragraph.
pub fn document_xml_text(xml: &str) -> String {
    let mut out = String::new();
    let mut in_text = false;
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        if in_text {
            out.push_str(&unescape_xml(&rest[..open]));
        }
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let self_closing = tag.ends_with('/');
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("");

        match (tag.starts_with('/'), name) {
            (false, "w:t") => in_text = !self_closing,
            (true, "w:t") => in_text = false,
            (true, "w:p") => out.push('\n'),
            (false, "w:tab") => out.push('\t'),
            (false, "w:br") | (false, "w:cr") => out.push('\n'),
            _ => {}
        }
    }

    out
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Trims each line and collapses runs of blank lines.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Rust &amp; Go </w:t></w:r><w:r><w:t>engineer</w:t></w:r></w:p>
<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Skills</w:t></w:r><w:r><w:tab/><w:t>SQL</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
</w:body></w:document>"#;

    fn docx_bytes(xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_document_xml_runs_and_paragraphs() {
        let text = document_xml_text(DOCUMENT_XML);
        assert_eq!(text, "Jane Doe\nRust & Go engineer\nSkills\tSQL\n");
    }

    #[test]
    fn test_docx_archive_extracts_text() {
        let text = extract_text(DocumentKind::Docx, &docx_bytes(DOCUMENT_XML)).unwrap();
        assert!(text.starts_with("Jane Doe\nRust & Go engineer"));
    }

    #[test]
    fn test_zip_without_document_is_a_docx_error() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.txt", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(b"hi").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        assert!(matches!(
            extract_text(DocumentKind::Docx, &bytes),
            Err(ExtractError::Docx(_))
        ));
    }

    #[test]
    fn test_detect_by_magic_bytes() {
        assert_eq!(
            DocumentKind::detect(Some("resume.bin"), None, b"%PDF-1.7 ..."),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::detect(Some("Resume.DOCX"), None, b"PK\x03\x04rest"),
            Some(DocumentKind::Docx)
        );
    }

    #[test]
    fn test_detect_docx_by_content_type() {
        assert_eq!(
            DocumentKind::detect(None, Some(DOCX_MIME), b"PK\x03\x04rest"),
            Some(DocumentKind::Docx)
        );
    }

    #[test]
    fn test_detect_plain_text() {
        assert_eq!(
            DocumentKind::detect(Some("cv.txt"), None, b"Jane"),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(
            DocumentKind::detect(None, Some("text/plain; charset=utf-8"), b"Jane"),
            Some(DocumentKind::PlainText)
        );
    }

    #[test]
    fn test_unknown_types_are_unsupported() {
        assert_eq!(DocumentKind::detect(Some("photo.png"), Some("image/png"), b"\x89PNG"), None);
        assert_eq!(DocumentKind::detect(Some("archive.zip"), None, b"PK\x03\x04"), None);
    }

    #[test]
    fn test_plain_text_is_normalized() {
        let text = extract_text(DocumentKind::PlainText, b"  Jane  \n\n\n\nEngineer \n").unwrap();
        assert_eq!(text, "Jane\n\nEngineer");
    }

    #[test]
    fn test_blank_text_is_empty_error() {
        assert!(matches!(
            extract_text(DocumentKind::PlainText, b" \n \n"),
            Err(ExtractError::Empty)
        ));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        assert!(matches!(
            extract_text(DocumentKind::PlainText, &[0xff, 0xfe, 0x00]),
            Err(ExtractError::Encoding)
        ));
    }
}
