use chrono::{DateTime, Utc};
use std::sync::Arc;

use geo_core::FeatureDraw;
use geo_core::model::{CategorySelection, FeatureCatalog, QuizSession};

use super::controller::QuizController;
use crate::Clock;
use crate::error::QuizServiceError;

/// Starts quiz sessions against a shared catalog.
///
/// This service owns:
/// - the time source (`Clock`)
/// - the random seed, if draws should be reproducible
#[derive(Debug, Clone)]
pub struct QuizService {
    clock: Clock,
    catalog: Arc<FeatureCatalog>,
    seed: Option<u64>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<FeatureCatalog>) -> Self {
        Self {
            clock,
            catalog,
            seed: None,
        }
    }

    /// Draw features from a fixed seed instead of OS entropy.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<FeatureCatalog> {
        &self.catalog
    }

    /// Selections offered in quiz mode: the `All` aggregate first, then every category.
    #[must_use]
    pub fn selections(&self) -> Vec<CategorySelection> {
        std::iter::once(CategorySelection::All)
            .chain(
                self.catalog
                    .categories()
                    .cloned()
                    .map(CategorySelection::Category),
            )
            .collect()
    }

    /// Start a new session for the given selection.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Quiz` if the category is unknown.
    pub fn start_session(
        &self,
        selection: CategorySelection,
    ) -> Result<QuizSession, QuizServiceError> {
        self.start_session_at(selection, self.clock.now())
    }

    pub(crate) fn start_session_at(
        &self,
        selection: CategorySelection,
        now: DateTime<Utc>,
    ) -> Result<QuizSession, QuizServiceError> {
        let draw = FeatureDraw::from_seed_option(self.seed);
        Ok(QuizSession::start(&self.catalog, selection, now, draw)?)
    }

    /// A fresh controller with no category selected.
    #[must_use]
    pub fn controller(&self) -> QuizController {
        QuizController::new(self.clone())
    }
}
