use async_trait::async_trait;
use geo_core::model::{CategoryId, FeatureId, Geometry, GeometryError, LatLon};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by catalog sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid geometry for {feature} in {category}: {source}")]
    InvalidGeometry {
        category: CategoryId,
        feature: FeatureId,
        #[source]
        source: GeometryError,
    },

    #[error("connection error: {0}")]
    Connection(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    #[default]
    Point,
    Line,
    Polygon,
}

/// On-disk coordinate entry for a feature.
///
/// Either `{ "type": "...", "points": [[lat, lon], ...] }` (type defaults to
/// `point`) or the older `{ "lat": .., "lon": .. }` form for single points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordRecord {
    Shaped {
        #[serde(rename = "type", default)]
        kind: GeometryKind,
        points: Vec<[f64; 2]>,
    },
    Legacy {
        lat: f64,
        lon: f64,
    },
}

impl CoordRecord {
    /// Convert into a validated domain geometry.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError` when a shape has fewer points than it needs.
    pub fn into_geometry(self) -> Result<Geometry, GeometryError> {
        match self {
            CoordRecord::Legacy { lat, lon } => Ok(Geometry::point(lat, lon)),
            CoordRecord::Shaped { kind, points } => {
                let points: Vec<LatLon> = points.into_iter().map(LatLon::from).collect();
                match kind {
                    // A point uses its first entry; extra entries are ignored.
                    GeometryKind::Point => points
                        .first()
                        .copied()
                        .map(Geometry::Point)
                        .ok_or(GeometryError::PointMissing),
                    GeometryKind::Line => Geometry::line(points),
                    GeometryKind::Polygon => Geometry::polygon(points),
                }
            }
        }
    }
}

/// Persisted shape of one category: ordered feature names plus their coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(default)]
    pub data: Vec<FeatureId>,
    #[serde(default)]
    pub coords: BTreeMap<FeatureId, CoordRecord>,
}

impl CategoryRecord {
    /// Resolve every coordinate entry into a geometry.
    ///
    /// Entries in `coords` for names not listed in `data` are kept; the catalog
    /// simply never asks for them.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidGeometry` for the first malformed entry.
    pub fn into_parts(
        self,
        category: &CategoryId,
    ) -> Result<(Vec<FeatureId>, Vec<(FeatureId, Geometry)>), StorageError> {
        let mut geometries = Vec::with_capacity(self.coords.len());
        for (feature, coord) in self.coords {
            let geometry =
                coord
                    .into_geometry()
                    .map_err(|source| StorageError::InvalidGeometry {
                        category: category.clone(),
                        feature: feature.clone(),
                        source,
                    })?;
            geometries.push((feature, geometry));
        }
        Ok((self.data, geometries))
    }
}

//
// ─── SOURCE CONTRACT ───────────────────────────────────────────────────────────
//

/// Read-only access to the stored feature catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Category ids in display order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the category index cannot be read.
    async fn list_categories(&self) -> Result<Vec<CategoryId>, StorageError>;

    /// Load one category's record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn load_category(&self, id: &CategoryId) -> Result<CategoryRecord, StorageError>;
}

/// Simple in-memory source for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryCatalogSource {
    categories: Arc<Mutex<Vec<(CategoryId, CategoryRecord)>>>,
}

impl InMemoryCatalogSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a category, keeping the original position on replace.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn upsert_category(
        &self,
        id: CategoryId,
        record: CategoryRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .categories
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = record,
            None => guard.push((id, record)),
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalogSource {
    async fn list_categories(&self) -> Result<Vec<CategoryId>, StorageError> {
        let guard = self
            .categories
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().map(|(id, _)| id.clone()).collect())
    }

    async fn load_category(&self, id: &CategoryId) -> Result<CategoryRecord, StorageError> {
        let guard = self
            .categories
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, record)| record.clone())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
