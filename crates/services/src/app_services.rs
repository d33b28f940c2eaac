use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use geo_core::model::FeatureCatalog;
use storage::{CatalogSource, JsonCatalogSource};

use crate::Clock;
use crate::error::AppServicesError;
use crate::learning::LearningService;
use crate::quiz::QuizService;
use crate::validation::{CatalogValidator, ValidationReport};

/// Assembles app-facing services around one loaded catalog.
#[derive(Debug, Clone)]
pub struct AppServices {
    catalog: Arc<FeatureCatalog>,
    quiz: Arc<QuizService>,
    learning: Arc<LearningService>,
}

impl AppServices {
    /// Build services backed by a directory of JSON catalog files.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog cannot be read or is malformed.
    pub async fn from_json_dir(
        root: impl Into<PathBuf>,
        clock: Clock,
        seed: Option<u64>,
    ) -> Result<Self, AppServicesError> {
        let source = JsonCatalogSource::open(root).await?;
        Self::from_source(&source, clock, seed).await
    }

    /// Build services from any catalog source.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog cannot be read or is malformed.
    pub async fn from_source(
        source: &dyn CatalogSource,
        clock: Clock,
        seed: Option<u64>,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(load_catalog(source).await?);
        Ok(Self::from_catalog(catalog, clock, seed))
    }

    #[must_use]
    pub fn from_catalog(catalog: Arc<FeatureCatalog>, clock: Clock, seed: Option<u64>) -> Self {
        let quiz = Arc::new(QuizService::new(clock, Arc::clone(&catalog)).with_seed(seed));
        let learning = Arc::new(LearningService::new(Arc::clone(&catalog)));
        Self {
            catalog,
            quiz,
            learning,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<FeatureCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn learning(&self) -> Arc<LearningService> {
        Arc::clone(&self.learning)
    }

    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        CatalogValidator::validate(&self.catalog)
    }
}

/// Read every category from `source` into an immutable catalog.
///
/// # Errors
///
/// Returns `AppServicesError::Storage` for unreadable or malformed records and
/// `AppServicesError::Domain` if the source lists a category twice.
pub async fn load_catalog(source: &dyn CatalogSource) -> Result<FeatureCatalog, AppServicesError> {
    let mut builder = FeatureCatalog::builder();
    for category in source.list_categories().await? {
        let record = source.load_category(&category).await?;
        let (features, geometries) = record.into_parts(&category)?;
        builder = builder
            .category(category, features, geometries)
            .map_err(geo_core::Error::from)?;
    }
    let catalog = builder.build();
    info!(
        categories = catalog.category_count(),
        "feature catalog loaded"
    );
    Ok(catalog)
}
