use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::warn;

use crate::model::geometry::Geometry;
use crate::model::ids::{CategoryId, CategorySelection, FeatureId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("unknown category: {0}")]
    UnknownCategory(CategoryId),

    #[error("category listed twice: {0}")]
    DuplicateCategory(CategoryId),
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
struct CategoryEntry {
    id: CategoryId,
    features: Vec<FeatureId>,
}

/// A feature that appears in more than one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateFeature {
    pub feature: FeatureId,
    pub categories: Vec<CategoryId>,
}

/// A feature listed in a category without any recorded coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingGeometry {
    pub category: CategoryId,
    pub feature: FeatureId,
}

/// Immutable lookup of categories, their ordered features and each feature's geometry.
///
/// Built once at startup and shared read-only between sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCatalog {
    categories: Vec<CategoryEntry>,
    geometries: HashMap<FeatureId, Geometry>,
}

impl FeatureCatalog {
    #[must_use]
    pub fn builder() -> FeatureCatalogBuilder {
        FeatureCatalogBuilder::default()
    }

    /// Category ids in load order.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryId> {
        self.categories.iter().map(|entry| &entry.id)
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn contains_category(&self, category: &CategoryId) -> bool {
        self.entry(category).is_some()
    }

    /// Ordered feature names of a stored category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownCategory` if the category was never loaded.
    pub fn features_of(&self, category: &CategoryId) -> Result<&[FeatureId], CatalogError> {
        self.entry(category)
            .map(|entry| entry.features.as_slice())
            .ok_or_else(|| CatalogError::UnknownCategory(category.clone()))
    }

    /// Full feature pool for a quiz selection.
    ///
    /// The `All` pool concatenates every category in load order, keeping only the
    /// first occurrence of a name that appears in several categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownCategory` for a category that was never loaded.
    pub fn pool(&self, selection: &CategorySelection) -> Result<Vec<FeatureId>, CatalogError> {
        match selection {
            CategorySelection::Category(id) => Ok(self.features_of(id)?.to_vec()),
            CategorySelection::All => {
                let mut seen = HashSet::new();
                Ok(self
                    .categories
                    .iter()
                    .flat_map(|entry| entry.features.iter())
                    .filter(|feature| seen.insert(*feature))
                    .cloned()
                    .collect())
            }
        }
    }

    /// Geometry for a feature, or the placeholder point when none was recorded.
    #[must_use]
    pub fn geometry_of(&self, feature: &FeatureId) -> Geometry {
        self.try_geometry_of(feature)
            .cloned()
            .unwrap_or_else(Geometry::placeholder)
    }

    #[must_use]
    pub fn try_geometry_of(&self, feature: &FeatureId) -> Option<&Geometry> {
        self.geometries.get(feature)
    }

    /// Features listed under a category but lacking coordinates.
    #[must_use]
    pub fn missing_geometry(&self) -> Vec<MissingGeometry> {
        self.categories
            .iter()
            .flat_map(|entry| {
                entry
                    .features
                    .iter()
                    .filter(|feature| !self.geometries.contains_key(*feature))
                    .map(|feature| MissingGeometry {
                        category: entry.id.clone(),
                        feature: feature.clone(),
                    })
            })
            .collect()
    }

    /// Feature names shared between categories, in first-seen order.
    #[must_use]
    pub fn duplicate_features(&self) -> Vec<DuplicateFeature> {
        let mut order: Vec<&FeatureId> = Vec::new();
        let mut owners: HashMap<&FeatureId, Vec<CategoryId>> = HashMap::new();
        for entry in &self.categories {
            for feature in &entry.features {
                let slot = owners.entry(feature).or_default();
                if slot.is_empty() {
                    order.push(feature);
                }
                slot.push(entry.id.clone());
            }
        }

        order
            .into_iter()
            .filter_map(|feature| {
                let categories = owners.remove(feature)?;
                (categories.len() > 1).then(|| DuplicateFeature {
                    feature: feature.clone(),
                    categories,
                })
            })
            .collect()
    }

    fn entry(&self, category: &CategoryId) -> Option<&CategoryEntry> {
        self.categories.iter().find(|entry| &entry.id == category)
    }
}

//
// ─── BUILDER ───────────────────────────────────────────────────────────────────
//

/// Accumulates categories in order before freezing them into a `FeatureCatalog`.
#[derive(Debug, Default)]
pub struct FeatureCatalogBuilder {
    categories: Vec<CategoryEntry>,
    geometries: HashMap<FeatureId, Geometry>,
}

impl FeatureCatalogBuilder {
    /// Add a category with its ordered feature names and the coordinates known for them.
    ///
    /// Repeated names inside the category are dropped. When two categories record
    /// geometry for the same name, the first one wins.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateCategory` if the category was already added.
    pub fn category(
        mut self,
        id: CategoryId,
        features: impl IntoIterator<Item = FeatureId>,
        geometries: impl IntoIterator<Item = (FeatureId, Geometry)>,
    ) -> Result<Self, CatalogError> {
        if self.categories.iter().any(|entry| entry.id == id) {
            return Err(CatalogError::DuplicateCategory(id));
        }

        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for feature in features {
            if seen.insert(feature.clone()) {
                ordered.push(feature);
            } else {
                warn!(category = %id, feature = %feature, "feature listed twice in category; keeping first");
            }
        }

        for (feature, geometry) in geometries {
            self.geometries.entry(feature).or_insert(geometry);
        }

        for feature in &ordered {
            if !self.geometries.contains_key(feature) {
                warn!(category = %id, feature = %feature, "feature has no geometry; using placeholder");
            }
        }

        self.categories.push(CategoryEntry {
            id,
            features: ordered,
        });
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> FeatureCatalog {
        FeatureCatalog {
            categories: self.categories,
            geometries: self.geometries,
        }
    }
}
