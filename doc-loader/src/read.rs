//! Raw text extraction per file format.

use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::warn;

use crate::error::{LoaderError, LoaderResult};

/// Cap on the decompressed size of `word/document.xml`.
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Supported file kinds, picked by case-insensitive extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Docx,
    LegacyDoc,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "md" => Some(Self::Text),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::LegacyDoc),
            _ => None,
        }
    }
}

pub fn read_document(path: &Path, kind: FileKind) -> LoaderResult<String> {
    match kind {
        FileKind::Text => read_text(path),
        FileKind::Docx => {
            let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            extract_docx(&bytes)
        }
        FileKind::LegacyDoc => {
            warn!(path = %path.display(), "legacy .doc file, content not extracted");
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(format!(
                "[Document content from {name} - please convert to .txt or .docx format]"
            ))
        }
    }
}

/// UTF-8, falling back to Latin-1 (every byte maps to one char).
pub fn read_text(path: &Path) -> LoaderResult<String> {
    let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_text(bytes))
}

pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

/// Paragraph text of a `.docx`: one line per non-blank `w:p`.
pub fn extract_docx(bytes: &[u8]) -> LoaderResult<String> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| LoaderError::Docx(e.to_string()))?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| LoaderError::Docx(e.to_string()))?;
    let mut xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut xml)
        .map_err(|e| LoaderError::Docx(e.to_string()))?;
    if xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(LoaderError::Docx("word/document.xml exceeds size limit".into()));
    }
    paragraphs_from_xml(&xml)
}

fn paragraphs_from_xml(xml: &[u8]) -> LoaderResult<String> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut lines: Vec<String> = Vec::new();
    let mut para = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => para.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"tab" {
                    para.push('\t');
                }
            }
            Ok(Event::Text(te)) if in_text => {
                let text = te.unescape().map_err(|e| LoaderError::Docx(e.to_string()))?;
                para.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if !para.trim().is_empty() {
                        lines.push(std::mem::take(&mut para));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(LoaderError::Docx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_bytes(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut w = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        w.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        w.write_all(xml.as_bytes()).unwrap();
        w.finish().unwrap().into_inner()
    }

    #[test]
    fn docx_paragraphs_become_lines() {
        let bytes = docx_bytes(
            "<w:p><w:r><w:t>Webhook </w:t></w:r><w:r><w:t>setup</w:t></w:r></w:p>\
             <w:p><w:r><w:t>   </w:t></w:r></w:p>\
             <w:p><w:r><w:t>Step 1 &amp; 2</w:t></w:r></w:p>",
        );
        assert_eq!(extract_docx(&bytes).unwrap(), "Webhook setup\nStep 1 & 2");
    }

    #[test]
    fn invalid_zip_is_docx_error() {
        assert!(matches!(extract_docx(b"not a zip"), Err(LoaderError::Docx(_))));
    }

    #[test]
    fn latin1_fallback() {
        assert_eq!(decode_text(vec![b'c', b'a', b'f', 0xE9]), "café");
        assert_eq!(decode_text("plain".as_bytes().to_vec()), "plain");
    }

    #[test]
    fn kinds_by_extension() {
        assert_eq!(FileKind::from_path(Path::new("a/Guide.MD")), Some(FileKind::Text));
        assert_eq!(FileKind::from_path(Path::new("x.docx")), Some(FileKind::Docx));
        assert_eq!(FileKind::from_path(Path::new("x.DOC")), Some(FileKind::LegacyDoc));
        assert_eq!(FileKind::from_path(Path::new("x.pdf")), None);
        assert_eq!(FileKind::from_path(Path::new("README")), None);
    }
}
