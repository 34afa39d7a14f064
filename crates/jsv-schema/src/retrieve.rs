//! # Local `$ref` Retrieval
//!
//! Replaces the `jsonschema` crate's default retriever so that external
//! references never trigger network requests.
//!
//! Two URI forms are resolved:
//!
//! - `file:///abs/path.json` — read from the given absolute path.
//! - `json-schema:///rel/path.json` — the form the validator gives to a
//!   relative `$ref` when the root schema has no `$id`. Resolved against
//!   the directory containing the schema file.
//!
//! Everything else (`http`, `https`, `urn`, ...) is refused.

use std::path::PathBuf;

use jsonschema::{Retrieve, Uri};
use serde_json::Value;
use url::Url;

use crate::document::load_document;

const FILE_SCHEME: &str = "file://";
const DEFAULT_BASE_URI: &str = "json-schema:///";

/// Retriever that loads referenced schemas from the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileRetriever {
    /// Directory that relative references are resolved against.
    base_dir: PathBuf,
}

impl LocalFileRetriever {
    /// Create a retriever resolving relative references against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Map a reference URI to a local path, or `None` if the scheme is
    /// not one we serve.
    ///
    /// Percent-encoded characters in the path (`my%20defs.json`) are
    /// decoded, so references to files with spaces or reserved
    /// characters in their names resolve to the file on disk.
    pub fn resolve_path(&self, uri: &str) -> Option<PathBuf> {
        let uri = uri.split('#').next().unwrap_or(uri);

        if let Some(rest) = uri.strip_prefix(DEFAULT_BASE_URI) {
            let base = Url::from_directory_path(self.absolute_base_dir()?).ok()?;
            return base.join(rest).ok()?.to_file_path().ok();
        }

        // to_file_path accepts an empty host or `localhost` and rejects
        // any other host.
        if !uri.starts_with(FILE_SCHEME) {
            return None;
        }
        Url::parse(uri).ok()?.to_file_path().ok()
    }

    fn absolute_base_dir(&self) -> Option<PathBuf> {
        if self.base_dir.is_absolute() {
            Some(self.base_dir.clone())
        } else {
            std::env::current_dir().ok().map(|cwd| cwd.join(&self.base_dir))
        }
    }
}

impl Retrieve for LocalFileRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        let Some(path) = self.resolve_path(uri_str) else {
            tracing::warn!(uri = uri_str, "refusing to retrieve non-local $ref");
            return Err(format!(
                "cannot retrieve '{uri_str}': only local file references are resolved"
            )
            .into());
        };

        tracing::debug!(uri = uri_str, path = %path.display(), "resolving $ref locally");
        Ok(load_document(&path)?)
    }
}
