use chrono::{DateTime, Utc};
use serde::Serialize;

use geo_core::model::{FeatureCatalog, FeatureId, Geometry, Notice, QuizSession};
use geo_core::time::format_elapsed;

/// Everything a presenter needs to render one quiz state.
///
/// Built fresh after every command; the presenter never reads the session directly.
/// Serializes with camelCase keys so an out-of-process presenter can consume it as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Selected category label, `None` on the menu.
    pub category: Option<String>,
    /// Dropdown options: the remaining features in pool order.
    pub candidate_list: Vec<FeatureId>,
    pub current_feature: Option<FeatureId>,
    /// Geometry to highlight for `current_feature`.
    pub highlight: Option<Geometry>,
    pub notice: Notice,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub done_list: Vec<FeatureId>,
    pub remaining_list: Vec<FeatureId>,
    pub elapsed_label: String,
}

impl SessionSnapshot {
    /// Snapshot shown when no quiz is running.
    #[must_use]
    pub fn idle(notice: Notice) -> Self {
        Self {
            category: None,
            candidate_list: Vec::new(),
            current_feature: None,
            highlight: None,
            notice,
            correct_count: 0,
            wrong_count: 0,
            done_list: Vec::new(),
            remaining_list: Vec::new(),
            elapsed_label: format_elapsed(chrono::Duration::zero()),
        }
    }

    #[must_use]
    pub fn from_session(
        session: &QuizSession,
        catalog: &FeatureCatalog,
        notice: Notice,
        now: DateTime<Utc>,
    ) -> Self {
        let current_feature = session.current().cloned();
        let highlight = current_feature
            .as_ref()
            .map(|feature| catalog.geometry_of(feature));
        Self {
            category: Some(session.selection().to_string()),
            candidate_list: session.remaining().to_vec(),
            current_feature,
            highlight,
            notice,
            correct_count: session.correct_count(),
            wrong_count: session.wrong_count(),
            done_list: session.done().to_vec(),
            remaining_list: session.remaining().to_vec(),
            elapsed_label: session.elapsed_label(now),
        }
    }

    /// True once every feature of the pool has been guessed on.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.category.is_some() && self.current_feature.is_none()
    }
}
