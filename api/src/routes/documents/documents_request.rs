use std::collections::BTreeMap;
use std::path::PathBuf;

use doc_loader::LoadSummary;
use feasibility::{IngestDocument, IngestReport};
use serde::{Deserialize, Serialize};

/// Request payload for `POST /documents`.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub documents: Vec<IngestDocument>,
}

/// Request payload for `POST /documents/load_folder`. Send `{}` to use the
/// configured folder.
#[derive(Debug, Default, Deserialize)]
pub struct LoadFolderRequest {
    #[serde(default)]
    pub folder: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub ingest: IngestReport,
    pub collection_stats: BTreeMap<String, u64>,
}

#[derive(Debug, Serialize)]
pub struct LoadFolderResponse {
    pub folder: PathBuf,
    pub summary: LoadSummary,
    pub skipped: Vec<PathBuf>,
    pub ingest: IngestReport,
    pub collection_stats: BTreeMap<String, u64>,
}
