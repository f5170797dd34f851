use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("folder not found: {0}")]
    FolderNotFound(PathBuf),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Broken `.docx` container or XML.
    #[error("docx error: {0}")]
    Docx(String),
}

pub type LoaderResult<T> = Result<T, LoaderError>;
