//! Integration document loader.
//!
//! Reads `.txt`, `.md`, `.docx` (and flags legacy `.doc`) files from one folder
//! and tags each with a heuristic type, complexity and integration level.
//! Files that fail to read are logged and skipped; the load carries on.

mod classify;
mod error;
mod read;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub use classify::{Complexity, DocType, IntegrationLevel, complexity, doc_type, integration_level, title_from_stem};
pub use error::{LoaderError, LoaderResult};
pub use read::{FileKind, extract_docx, read_document};

/// Documents shorter than this (after trimming) are dropped.
const MIN_CONTENT_CHARS: usize = 10;

#[derive(Clone, Debug, Serialize)]
pub struct IntegrationDocument {
    pub content: String,
    pub title: String,
    pub doc_type: DocType,
    pub complexity: Complexity,
    pub integration_level: IntegrationLevel,
    pub filename: String,
    /// Character count of `content`.
    pub file_size: usize,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct LoadSummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_complexity: BTreeMap<String, usize>,
}

#[derive(Debug, Default, Serialize)]
pub struct LoadReport {
    pub documents: Vec<IntegrationDocument>,
    /// Files that were recognised but unreadable or too short.
    pub skipped: Vec<PathBuf>,
    pub summary: LoadSummary,
}

/// Loads every supported file directly inside `folder` (no recursion), in name order.
pub fn load_documents_from_folder(folder: &Path) -> LoaderResult<LoadReport> {
    if !folder.is_dir() {
        return Err(LoaderError::FolderNotFound(folder.to_path_buf()));
    }

    let mut report = LoadReport::default();
    let walker = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file());

    for entry in walker {
        let path = entry.path();
        let Some(kind) = FileKind::from_path(path) else {
            debug!(path = %path.display(), "unsupported extension, ignored");
            continue;
        };
        match load_document(path, kind) {
            Ok(Some(doc)) => {
                debug!(file = %doc.filename, doc_type = doc.doc_type.as_str(), "loaded");
                report.documents.push(doc);
            }
            Ok(None) => {
                debug!(path = %path.display(), "content too short, skipped");
                report.skipped.push(path.to_path_buf());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read document");
                report.skipped.push(path.to_path_buf());
            }
        }
    }

    report.summary = summarize(&report.documents);
    info!(
        folder = %folder.display(),
        loaded = report.documents.len(),
        skipped = report.skipped.len(),
        "documents loaded"
    );
    Ok(report)
}

/// Reads and classifies one file. `Ok(None)` when the content is too short to keep.
pub fn load_document(path: &Path, kind: FileKind) -> LoaderResult<Option<IntegrationDocument>> {
    let raw = read_document(path, kind)?;
    let content = raw.trim();
    if content.chars().count() < MIN_CONTENT_CHARS {
        return Ok(None);
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Some(IntegrationDocument {
        title: title_from_stem(&stem),
        doc_type: doc_type(&filename, content),
        complexity: complexity(content),
        integration_level: integration_level(content),
        file_size: content.chars().count(),
        content: content.to_string(),
        filename,
    }))
}

pub fn summarize(docs: &[IntegrationDocument]) -> LoadSummary {
    let mut summary = LoadSummary {
        total: docs.len(),
        ..Default::default()
    };
    for d in docs {
        *summary.by_type.entry(d.doc_type.as_str().to_string()).or_default() += 1;
        *summary
            .by_complexity
            .entry(d.complexity.as_str().to_string())
            .or_default() += 1;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            load_documents_from_folder(&missing),
            Err(LoaderError::FolderNotFound(_))
        ));
    }

    #[test]
    fn loads_supported_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path();
        fs::write(p.join("b_webhook_guide.md"), "Step 1: register the webhook URL.").unwrap();
        fs::write(p.join("a_glossary.txt"), "Signatory refers to a person who signs.").unwrap();
        fs::write(p.join("tiny.txt"), "  short  ").unwrap();
        fs::write(p.join("image.png"), [0u8, 1, 2]).unwrap();
        fs::write(p.join("legacy_notes.doc"), [0xD0u8, 0xCF]).unwrap();
        fs::create_dir(p.join("nested")).unwrap();
        fs::write(p.join("nested").join("deep.txt"), "never read because nested").unwrap();

        let report = load_documents_from_folder(p).unwrap();
        let names: Vec<_> = report.documents.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, ["a_glossary.txt", "b_webhook_guide.md", "legacy_notes.doc"]);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].ends_with("tiny.txt"));

        let glossary = &report.documents[0];
        assert_eq!(glossary.doc_type, DocType::Glossary);
        assert_eq!(glossary.title, "A Glossary");
        assert_eq!(glossary.file_size, glossary.content.chars().count());

        assert_eq!(report.documents[1].doc_type, DocType::Tutorial);
        assert!(report.documents[2].content.starts_with("[Document content from legacy_notes.doc"));

        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.by_type.get("glossary"), Some(&1));
        assert_eq!(report.summary.by_complexity.get("low"), Some(&3));
    }

    #[test]
    fn content_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm_sync.txt");
        fs::write(&path, "\n\n  Sync contacts from the CRM nightly.  \n").unwrap();
        let doc = load_document(&path, FileKind::Text).unwrap().unwrap();
        assert_eq!(doc.content, "Sync contacts from the CRM nightly.");
        assert_eq!(doc.integration_level, IntegrationLevel::Application);
        assert_eq!(doc.title, "Crm Sync");
    }

    #[test]
    fn serializes_with_snake_case_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renewal_scenario.txt");
        fs::write(&path, "Renewal reminders for partner contracts.").unwrap();
        let doc = load_document(&path, FileKind::Text).unwrap().unwrap();
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["doc_type"], "use_case");
        assert_eq!(v["integration_level"], "partner");
        assert_eq!(v["complexity"], "low");
    }
}
