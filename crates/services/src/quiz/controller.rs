use tracing::debug;

use geo_core::model::{CategorySelection, FeatureId, Notice, QuizSession};

use super::service::QuizService;
use super::view::SessionSnapshot;
use crate::Clock;
use crate::error::QuizServiceError;

/// Events the UI shell can send to a running quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizCommand {
    SelectCategory(CategorySelection),
    Reset,
    /// `None` when the player submits without picking a feature.
    SubmitGuess(Option<FeatureId>),
    /// Discards the session and the selected category.
    ReturnToMenu,
}

/// Owns at most one quiz session and applies commands to it one at a time.
///
/// Each call to [`QuizController::handle`] fully processes one command and returns
/// the resulting snapshot; no partially-updated state is ever observable.
#[derive(Debug)]
pub struct QuizController {
    service: QuizService,
    clock: Clock,
    session: Option<QuizSession>,
}

impl QuizController {
    #[must_use]
    pub fn new(service: QuizService) -> Self {
        let clock = service.clock();
        Self {
            service,
            clock,
            session: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn selection(&self) -> Option<&CategorySelection> {
        self.session.as_ref().map(QuizSession::selection)
    }

    /// Mutable access to the time source, e.g. to advance a fixed clock in tests.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// Apply one command and render the resulting state.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError` when a selected category is unknown. The previous
    /// session, if any, is left untouched in that case.
    pub fn handle(&mut self, command: QuizCommand) -> Result<SessionSnapshot, QuizServiceError> {
        debug!(?command, "quiz command");
        let notice = match command {
            QuizCommand::SelectCategory(selection) => self.select(selection)?,
            QuizCommand::Reset => match self.session.as_mut() {
                Some(session) => session.reset(self.clock.now()),
                None => Notice::None,
            },
            QuizCommand::SubmitGuess(candidate) => match self.session.as_mut() {
                Some(session) => session.guess(candidate.as_ref(), self.clock.now()),
                None => Notice::NoActiveTarget,
            },
            QuizCommand::ReturnToMenu => {
                self.session = None;
                Notice::None
            }
        };
        Ok(self.snapshot(notice))
    }

    /// Render the current state without changing it.
    #[must_use]
    pub fn snapshot(&self, notice: Notice) -> SessionSnapshot {
        match &self.session {
            Some(session) => SessionSnapshot::from_session(
                session,
                self.service.catalog(),
                notice,
                self.clock.now(),
            ),
            None => SessionSnapshot::idle(notice),
        }
    }

    // Re-selecting the running category keeps progress unless the pool is used up.
    fn select(&mut self, selection: CategorySelection) -> Result<Notice, QuizServiceError> {
        if let Some(session) = &self.session {
            if *session.selection() == selection && !session.is_exhausted() {
                return Ok(Notice::None);
            }
        }
        let session = self.service.start_session_at(selection, self.clock.now())?;
        self.session = Some(session);
        Ok(Notice::None)
    }
}
