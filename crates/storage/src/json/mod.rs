use std::path::{Path, PathBuf};

use async_trait::async_trait;
use geo_core::model::CategoryId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::repository::{CatalogSource, CategoryRecord, StorageError};

/// File name of the category index inside a catalog directory.
pub const MANIFEST_FILE: &str = "catalog.json";

/// One line of the category index: display name and the file holding its record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: CategoryId,
    pub file: PathBuf,
}

/// Category index of a catalog directory. Entry order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogManifest {
    #[serde(default)]
    pub categories: Vec<ManifestEntry>,
}

/// Catalog source backed by a directory of JSON files.
///
/// ```text
/// data/
///   catalog.json         { "categories": [ { "name": "Flüsse", "file": "fluesse.json" } ] }
///   fluesse.json         { "data": [...], "coords": { ... } }
/// ```
#[derive(Debug, Clone)]
pub struct JsonCatalogSource {
    root: PathBuf,
    manifest: CatalogManifest,
}

impl JsonCatalogSource {
    /// Open a catalog directory and read its manifest.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the manifest cannot be read and
    /// `StorageError::Serialization` if it is not valid JSON.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        let manifest: CatalogManifest = read_json(&root.join(MANIFEST_FILE)).await?;
        debug!(
            root = %root.display(),
            categories = manifest.categories.len(),
            "catalog manifest loaded"
        );
        Ok(Self { root, manifest })
    }
}

#[async_trait]
impl CatalogSource for JsonCatalogSource {
    async fn list_categories(&self) -> Result<Vec<CategoryId>, StorageError> {
        Ok(self
            .manifest
            .categories
            .iter()
            .map(|entry| entry.name.clone())
            .collect())
    }

    async fn load_category(&self, id: &CategoryId) -> Result<CategoryRecord, StorageError> {
        let entry = self
            .manifest
            .categories
            .iter()
            .find(|entry| &entry.name == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        read_json(&self.root.join(&entry.file)).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| StorageError::Serialization(format!("{}: {e}", path.display())))
}
