mod controller;
mod service;
mod view;

// Public API of the quiz subsystem.
pub use crate::error::QuizServiceError;
pub use controller::{QuizCommand, QuizController};
pub use service::QuizService;
pub use view::SessionSnapshot;
