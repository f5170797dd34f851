//! Download of the remote specification document.

use std::{future::Future, pin::Pin, time::Duration};

use tracing::{debug, info};

use crate::errors::{KnowledgeError, KnowledgeResult};

/// Source of the raw specification text.
///
/// Implement this to substitute a local file or an in-memory document.
pub trait SpecFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = KnowledgeResult<String>> + Send + 'a>>;
}

/// Plain GET with a request timeout; any non-2xx status is an error.
#[derive(Clone, Debug)]
pub struct HttpSpecFetcher {
    client: reqwest::Client,
}

impl HttpSpecFetcher {
    pub fn new(timeout: Duration) -> KnowledgeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(KnowledgeError::Download)?;
        Ok(Self { client })
    }
}

impl SpecFetcher for HttpSpecFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = KnowledgeResult<String>> + Send + 'a>> {
        Box::pin(async move {
            debug!(%url, "downloading specification");
            let resp = self.client.get(url).send().await?.error_for_status()?;
            let text = resp.text().await?;
            info!(%url, bytes = text.len(), "specification downloaded");
            Ok(text)
        })
    }
}
