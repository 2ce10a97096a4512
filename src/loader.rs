//! Catalog loading
//!
//! A manifest lists tag definition files, one path per line. Each file is a
//! YAML document stream; the last document becomes the tree stored under the
//! file's stem.

use std::time::Duration;

use serde::Deserialize;

use crate::catalog::{TagCatalog, TagNode};
use crate::error::{TagPickError, TagPickResult};
use crate::source::TagSource;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Upper bound for every single fetch
    pub fetch_timeout: Duration,
    /// Skip failing entries instead of aborting the load
    pub skip_broken_files: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            skip_broken_files: false,
        }
    }
}

/// Outcome of a load: the catalog plus any entries that were skipped.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub catalog: TagCatalog,
    pub failures: Vec<TagPickError>,
}

pub struct CatalogLoader {
    source: Box<dyn TagSource>,
    options: LoaderOptions,
}

impl CatalogLoader {
    pub fn new(source: Box<dyn TagSource>, options: LoaderOptions) -> Self {
        Self { source, options }
    }

    /// Build a fresh catalog from the manifest at `manifest_path`.
    pub async fn load(&self, manifest_path: &str) -> TagPickResult<LoadReport> {
        let manifest = self.fetch(manifest_path).await?;
        let mut report = LoadReport::default();
        if manifest.trim().is_empty() {
            tracing::info!(manifest = manifest_path, "manifest is empty");
            return Ok(report);
        }

        for path in manifest_entries(&manifest) {
            match self.load_entry(path).await {
                Ok(Some(node)) => {
                    let key = catalog_key(path);
                    if key.is_empty() {
                        tracing::warn!(path, "manifest entry has an empty catalog name");
                    }
                    report.catalog.insert(key, node);
                }
                Ok(None) => tracing::debug!(path, "file holds no documents"),
                Err(e) if self.options.skip_broken_files => {
                    tracing::warn!(path, error = %e, "skipping tag file");
                    report.failures.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            source = %self.source.describe(),
            catalogs = report.catalog.len(),
            skipped = report.failures.len(),
            "catalog loaded"
        );
        Ok(report)
    }

    async fn load_entry(&self, path: &str) -> TagPickResult<Option<TagNode>> {
        let text = self.fetch(path).await?;
        parse_last_document(&text).map_err(|e| TagPickError::catalog_load(path, e))
    }

    async fn fetch(&self, path: &str) -> TagPickResult<String> {
        match tokio::time::timeout(self.options.fetch_timeout, self.source.read_text(path)).await {
            Ok(result) => result,
            Err(_) => Err(TagPickError::catalog_load(
                path,
                format!("timed out after {:?}", self.options.fetch_timeout),
            )),
        }
    }
}

/// Non-blank, non-comment manifest lines, trimmed.
pub fn manifest_entries(manifest: &str) -> impl Iterator<Item = &str> {
    manifest
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Catalog name for a path: the base name cut at its first dot.
pub fn catalog_key(path: &str) -> &str {
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    base.split('.').next().unwrap_or(base)
}

/// Parse a YAML stream and keep the last document.
pub fn parse_last_document(text: &str) -> Result<Option<TagNode>, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let mut last = None;
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = serde_yaml::Value::deserialize(document)?;
        last = Some(value);
    }
    Ok(last.map(TagNode::from_yaml))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn manifest_splits_on_any_line_ending() {
        let entries: Vec<_> = manifest_entries("a.yml\r\nb/c.yml\n\n  d.yaml  \n# note\n").collect();
        assert_eq!(entries, vec!["a.yml", "b/c.yml", "d.yaml"]);
    }

    #[test]
    fn key_is_base_name_before_first_dot() {
        assert_eq!(catalog_key("tags/hair.yml"), "hair");
        assert_eq!(catalog_key("tags/hair.v2.yml"), "hair");
        assert_eq!(catalog_key("C:\\tags\\eyes.yaml"), "eyes");
        assert_eq!(catalog_key("plain"), "plain");
    }

    #[test]
    fn dotfiles_and_directories_give_empty_key() {
        assert_eq!(catalog_key(".hidden.yml"), "");
        assert_eq!(catalog_key("tags/"), "");
    }

    #[test]
    fn last_document_wins() {
        let node = parse_last_document("first: 1\n---\nsecond: 2\n").unwrap().unwrap();
        assert!(node.child("second").is_some());
        assert!(node.child("first").is_none());
    }

    #[test]
    fn empty_stream_has_no_document() {
        assert_eq!(parse_last_document("").unwrap(), None);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(parse_last_document("a: [unclosed").is_err());
    }
}
