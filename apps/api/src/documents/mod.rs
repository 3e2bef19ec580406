//! Document text extraction: fetches a stored resume and turns it into plain text.
//!
//! An empty or absent location yields an empty string rather than an error;
//! callers treat `""` as "no resume available".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

pub mod source;

pub use source::RemoteDocumentSource;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("request for {location} failed: {message}")]
    Transport { location: String, message: String },

    #[error("fetching {location} timed out after {timeout:?}")]
    Timeout { location: String, timeout: Duration },

    #[error("HTTP {status} for {location}")]
    Status { status: u16, location: String },

    #[error("storage error for {location}: {message}")]
    Storage { location: String, message: String },

    #[error("unsupported resume location '{0}'")]
    UnsupportedLocation(String),

    #[error("could not decode document from {location}: {message}")]
    Decode { location: String, message: String },
}

/// Where document bytes come from. Production: `RemoteDocumentSource`.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Bytes, DocumentError>;
}

#[derive(Clone)]
pub struct DocumentTextExtractor {
    source: Arc<dyn DocumentSource>,
}

impl DocumentTextExtractor {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self { source }
    }

    /// Fetches the document at `location` and returns the trimmed text of all pages.
    pub async fn extract_text(&self, location: &str) -> Result<String, DocumentError> {
        let location = location.trim();
        if location.is_empty() {
            warn!("Resume location is empty; treating as no resume");
            return Ok(String::new());
        }

        let bytes = self.source.fetch(location).await.map_err(|e| {
            warn!("Failed to fetch resume from {location}: {e}");
            e
        })?;

        if bytes.is_empty() {
            return Ok(String::new());
        }

        let owned_location = location.to_string();
        let text = tokio::task::spawn_blocking(move || pdf_to_text(&bytes, &owned_location))
            .await
            .map_err(|e| DocumentError::Decode {
                location: location.to_string(),
                message: format!("extraction task failed: {e}"),
            })??;

        debug!("Extracted {} chars of resume text from {location}", text.len());
        Ok(text)
    }
}

/// Decodes a PDF page by page and joins the page texts.
fn pdf_to_text(bytes: &[u8], location: &str) -> Result<String, DocumentError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
        DocumentError::Decode {
            location: location.to_string(),
            message: e.to_string(),
        }
    })?;
    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    pages.concat().trim().to_string()
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Serves canned bytes per location; unknown locations answer HTTP 404.
    #[derive(Default)]
    pub struct StaticSource {
        documents: HashMap<String, Bytes>,
        /// Locations that fail this many times before serving.
        flaky: Mutex<HashMap<String, usize>>,
        fetches: AtomicUsize,
    }

    impl StaticSource {
        pub fn with(mut self, location: &str, bytes: &'static [u8]) -> Self {
            self.documents
                .insert(location.to_string(), Bytes::from_static(bytes));
            self
        }

        pub fn failing_first(self, location: &str, times: usize) -> Self {
            self.flaky.lock().unwrap().insert(location.to_string(), times);
            self
        }

        pub fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentSource for StaticSource {
        async fn fetch(&self, location: &str) -> Result<Bytes, DocumentError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(remaining) = self.flaky.lock().unwrap().get_mut(location) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(DocumentError::Timeout {
                        location: location.to_string(),
                        timeout: Duration::from_secs(30),
                    });
                }
            }
            self.documents
                .get(location)
                .cloned()
                .ok_or_else(|| DocumentError::Status {
                    status: 404,
                    location: location.to_string(),
                })
        }
    }
}
