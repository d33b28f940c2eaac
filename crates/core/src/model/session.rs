use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::draw::FeatureDraw;
use crate::model::catalog::{CatalogError, FeatureCatalog};
use crate::model::ids::{CategorySelection, FeatureId};
use crate::model::notice::Notice;
use crate::time::format_elapsed;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Lifecycle of a started quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// A feature is highlighted and waiting for a guess.
    InProgress,
    /// Every feature of the pool has been guessed on.
    Exhausted,
}

/// One run of the quiz over a category's feature pool.
///
/// Invariants after every transition:
/// - `remaining` and `done` are disjoint and together equal the pool
/// - `current` is a member of `remaining` until the guess that resolves it
/// - `remaining` keeps pool order so candidate lists render stably
#[derive(Debug, Clone)]
pub struct QuizSession {
    selection: CategorySelection,
    pool: Vec<FeatureId>,
    remaining: Vec<FeatureId>,
    done: Vec<FeatureId>,
    current: Option<FeatureId>,
    correct: u32,
    wrong: u32,
    started_at: Option<DateTime<Utc>>,
    draw: FeatureDraw,
}

impl QuizSession {
    /// Start a quiz over the pool of `selection`.
    ///
    /// `now` should come from the services layer clock to keep time deterministic.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Catalog` if the category is not in the catalog.
    pub fn start(
        catalog: &FeatureCatalog,
        selection: CategorySelection,
        now: DateTime<Utc>,
        draw: FeatureDraw,
    ) -> Result<Self, QuizError> {
        let pool = catalog.pool(&selection)?;
        let mut session = Self {
            selection,
            pool,
            remaining: Vec::new(),
            done: Vec::new(),
            current: None,
            correct: 0,
            wrong: 0,
            started_at: None,
            draw,
        };
        session.reinitialize(now);
        info!(
            category = %session.selection,
            pool = session.pool.len(),
            "quiz started"
        );
        Ok(session)
    }

    /// Start over with the same pool, discarding all progress.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Notice {
        self.reinitialize(now);
        info!(category = %self.selection, "quiz restarted");
        Notice::Restarted
    }

    /// Resolve the highlighted feature with the player's guess.
    ///
    /// Rejected guesses (nothing highlighted, nothing chosen) leave the session untouched.
    pub fn guess(&mut self, candidate: Option<&FeatureId>, now: DateTime<Utc>) -> Notice {
        let Some(current) = self.current.clone() else {
            return Notice::NoActiveTarget;
        };
        let Some(candidate) = candidate.filter(|c| !c.as_str().is_empty()) else {
            return Notice::EmptyGuess;
        };

        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        let is_correct = *candidate == current;
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        } else {
            self.wrong = self.wrong.saturating_add(1);
        }
        debug!(
            target_feature = %current,
            guess = %candidate,
            correct = is_correct,
            "guess resolved"
        );

        self.remaining.retain(|feature| feature != &current);
        if !self.done.contains(&current) {
            self.done.push(current.clone());
        }
        self.current = self.draw_next();

        let session_complete = self.current.is_none();
        if session_complete {
            info!(
                category = %self.selection,
                correct = self.correct,
                wrong = self.wrong,
                "quiz complete"
            );
        }

        if is_correct {
            Notice::Correct { session_complete }
        } else {
            Notice::Incorrect {
                answer: current,
                session_complete,
            }
        }
    }

    #[must_use]
    pub fn selection(&self) -> &CategorySelection {
        &self.selection
    }

    /// Every feature this quiz covers, in catalog order.
    #[must_use]
    pub fn pool(&self) -> &[FeatureId] {
        &self.pool
    }

    /// Features not yet resolved, in pool order.
    #[must_use]
    pub fn remaining(&self) -> &[FeatureId] {
        &self.remaining
    }

    /// Resolved features in the order they were guessed on.
    #[must_use]
    pub fn done(&self) -> &[FeatureId] {
        &self.done
    }

    #[must_use]
    pub fn current(&self) -> Option<&FeatureId> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn wrong_count(&self) -> u32 {
        self.wrong
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.current.is_some() {
            SessionState::InProgress
        } else {
            SessionState::Exhausted
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state() == SessionState::Exhausted
    }

    /// Time since the quiz (re)started; zero if it never did or the clock went backwards.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        self.started_at
            .map(|started| now - started)
            .filter(|delta| *delta > Duration::zero())
            .unwrap_or_else(Duration::zero)
    }

    #[must_use]
    pub fn elapsed_label(&self, now: DateTime<Utc>) -> String {
        format_elapsed(self.elapsed(now))
    }

    fn reinitialize(&mut self, now: DateTime<Utc>) {
        self.remaining = self.pool.clone();
        self.done.clear();
        self.correct = 0;
        self.wrong = 0;
        self.started_at = Some(now);
        self.current = self.draw_next();
    }

    fn draw_next(&mut self) -> Option<FeatureId> {
        let index = self.draw.pick_index(self.remaining.len())?;
        self.remaining.get(index).cloned()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::model::geometry::Geometry;
    use crate::model::ids::CategoryId;
    use crate::time::fixed_now;

    fn rivers() -> FeatureCatalog {
        let names = ["Rhine", "Danube", "Elbe"];
        FeatureCatalog::builder()
            .category(
                CategoryId::new("Flüsse"),
                names.iter().map(|n| FeatureId::from(*n)),
                names
                    .iter()
                    .map(|n| (FeatureId::from(*n), Geometry::point(50.0, 10.0))),
            )
            .unwrap()
            .category(
                CategoryId::new("Inseln"),
                [FeatureId::new("Sylt")],
                [(FeatureId::new("Sylt"), Geometry::point(54.9, 8.3))],
            )
            .unwrap()
            .category(CategoryId::new("Leer"), Vec::new(), Vec::new())
            .unwrap()
            .build()
    }

    fn start(category: &str, seed: u64) -> QuizSession {
        QuizSession::start(
            &rivers(),
            CategorySelection::Category(CategoryId::new(category)),
            fixed_now(),
            FeatureDraw::seeded(seed),
        )
        .unwrap()
    }

    fn assert_partition(session: &QuizSession) {
        let remaining: HashSet<_> = session.remaining().iter().collect();
        let done: HashSet<_> = session.done().iter().collect();
        assert!(remaining.is_disjoint(&done));
        let union: HashSet<_> = remaining.union(&done).copied().collect();
        let pool: HashSet<_> = session.pool().iter().collect();
        assert_eq!(union, pool);
        assert_eq!(done.len(), session.done().len(), "done holds duplicates");
        if let Some(current) = session.current() {
            assert!(session.remaining().contains(current));
        }
    }

    #[test]
    fn start_draws_from_full_pool() {
        let session = start("Flüsse", 1);
        assert_eq!(session.remaining().len(), 3);
        assert!(session.done().is_empty());
        assert!(session.remaining().contains(session.current().unwrap()));
        assert_eq!((session.correct_count(), session.wrong_count()), (0, 0));
        assert_eq!(session.started_at(), Some(fixed_now()));
        assert_eq!(session.state(), SessionState::InProgress);
    }

    #[test]
    fn start_rejects_unknown_category() {
        let err = QuizSession::start(
            &rivers(),
            CategorySelection::Category(CategoryId::new("Wüsten")),
            fixed_now(),
            FeatureDraw::seeded(1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuizError::Catalog(CatalogError::UnknownCategory(CategoryId::new("Wüsten")))
        );
    }

    #[test]
    fn empty_pool_starts_exhausted() {
        let session = start("Leer", 1);
        assert!(session.current().is_none());
        assert!(session.is_exhausted());
    }

    #[test]
    fn wrong_guess_reveals_answer_and_advances() {
        let mut session = start("Flüsse", 3);
        let target = session.current().cloned().unwrap();
        let other = session
            .pool()
            .iter()
            .find(|f| **f != target)
            .cloned()
            .unwrap();

        let notice = session.guess(Some(&other), fixed_now());

        assert_eq!(
            notice,
            Notice::Incorrect {
                answer: target.clone(),
                session_complete: false
            }
        );
        assert!(notice.to_string().contains(target.as_str()));
        assert_eq!(session.wrong_count(), 1);
        assert_eq!(session.done(), &[target.clone()]);
        assert_eq!(session.remaining().len(), 2);
        assert_ne!(session.current(), Some(&target));
        assert_partition(&session);
    }

    #[test]
    fn single_feature_pool_completes_on_first_guess() {
        let mut session = start("Inseln", 9);
        let target = FeatureId::new("Sylt");
        assert_eq!(session.current(), Some(&target));

        let notice = session.guess(Some(&target), fixed_now());

        assert_eq!(notice, Notice::Correct { session_complete: true });
        assert!(notice.to_string().contains("Quiz complete!"));
        assert_eq!(session.correct_count(), 1);
        assert!(session.remaining().is_empty());
        assert!(session.current().is_none());
    }

    #[test]
    fn n_guesses_exhaust_pool_of_n() {
        let mut session = start("Flüsse", 11);
        let mut resolved = 0;
        while let Some(current) = session.current().cloned() {
            let before = session.remaining().len();
            let guess = if resolved % 2 == 0 {
                current
            } else {
                FeatureId::new("nope")
            };
            session.guess(Some(&guess), fixed_now());
            resolved += 1;
            assert_eq!(session.remaining().len(), before - 1);
            assert_eq!(session.done().len(), resolved);
            assert_eq!(
                (session.correct_count() + session.wrong_count()) as usize,
                resolved
            );
            assert_partition(&session);
        }
        assert_eq!(resolved, 3);
        assert!(session.is_exhausted());
        assert_eq!(session.done().len(), 3);
    }

    #[test]
    fn rejected_guesses_change_nothing() {
        let mut session = start("Flüsse", 5);
        let before = (
            session.remaining().to_vec(),
            session.done().to_vec(),
            session.current().cloned(),
        );

        assert_eq!(session.guess(None, fixed_now()), Notice::EmptyGuess);
        assert_eq!(
            session.guess(Some(&FeatureId::new("")), fixed_now()),
            Notice::EmptyGuess
        );
        assert_eq!(
            (
                session.remaining().to_vec(),
                session.done().to_vec(),
                session.current().cloned()
            ),
            before
        );
        assert_eq!((session.correct_count(), session.wrong_count()), (0, 0));
    }

    #[test]
    fn guess_after_exhaustion_is_rejected() {
        let mut session = start("Inseln", 2);
        session.guess(Some(&FeatureId::new("Sylt")), fixed_now());

        let notice = session.guess(Some(&FeatureId::new("Sylt")), fixed_now());

        assert_eq!(notice, Notice::NoActiveTarget);
        assert_eq!(session.correct_count(), 1);
        assert_eq!(session.done().len(), 1);
    }

    #[test]
    fn reset_clears_progress_and_restamps_start() {
        let mut session = start("Flüsse", 4);
        let target = session.current().cloned().unwrap();
        session.guess(Some(&target), fixed_now());

        let later = fixed_now() + Duration::seconds(30);
        let notice = session.reset(later);

        assert_eq!(notice, Notice::Restarted);
        assert_eq!((session.correct_count(), session.wrong_count()), (0, 0));
        assert!(session.done().is_empty());
        assert_eq!(session.remaining().len(), 3);
        assert!(session.current().is_some());
        assert_eq!(session.started_at(), Some(later));
    }

    #[test]
    fn elapsed_label_tracks_start() {
        let session = start("Flüsse", 1);
        assert_eq!(session.elapsed_label(fixed_now() + Duration::seconds(42)), "42 s");
        assert_eq!(
            session.elapsed_label(fixed_now() + Duration::seconds(125)),
            "2 min 5 s"
        );
        assert_eq!(session.elapsed_label(fixed_now() - Duration::seconds(5)), "0 s");
    }

    #[test]
    fn all_selection_spans_every_category() {
        let session = QuizSession::start(
            &rivers(),
            CategorySelection::All,
            fixed_now(),
            FeatureDraw::seeded(8),
        )
        .unwrap();
        assert_eq!(session.remaining().len(), 4);
    }
}
