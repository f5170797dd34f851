//! On-disk cache: raw specification text and the derived knowledge base.

use std::path::Path;
use std::time::{Duration, SystemTime};

use tokio::fs;
use tracing::{debug, warn};

use crate::errors::KnowledgeResult;
use crate::model::KnowledgeBase;

/// `true` when `path` is missing, unreadable or older than `max_age`.
pub async fn is_stale(path: &Path, max_age: Duration) -> bool {
    let meta = match fs::metadata(path).await {
        Ok(m) => m,
        Err(_) => return true,
    };
    let Ok(modified) = meta.modified() else {
        return true;
    };
    match SystemTime::now().duration_since(modified) {
        Ok(age) => age > max_age,
        // mtime in the future
        Err(_) => false,
    }
}

/// Reads a cached knowledge base. A file that fails to parse is removed and
/// reported as a miss.
pub async fn load_knowledge_base(path: &Path) -> Option<KnowledgeBase> {
    let bytes = fs::read(path).await.ok()?;
    match serde_json::from_slice::<KnowledgeBase>(&bytes) {
        Ok(kb) => {
            debug!(path = %path.display(), endpoints = kb.endpoints.len(), "cached knowledge base loaded");
            Some(kb)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt knowledge base cache, deleting");
            remove_if_exists(path).await;
            None
        }
    }
}

pub async fn save_knowledge_base(path: &Path, kb: &KnowledgeBase) -> KnowledgeResult<()> {
    ensure_parent(path).await?;
    let body = serde_json::to_vec_pretty(kb)?;
    fs::write(path, body).await?;
    Ok(())
}

pub async fn read_spec(path: &Path) -> KnowledgeResult<String> {
    Ok(fs::read_to_string(path).await?)
}

pub async fn write_spec(path: &Path, text: &str) -> KnowledgeResult<()> {
    ensure_parent(path).await?;
    fs::write(path, text).await?;
    Ok(())
}

pub async fn remove_if_exists(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "cache file removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove cache file"),
    }
}

async fn ensure_parent(path: &Path) -> KnowledgeResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).await?;
    }
    Ok(())
}
