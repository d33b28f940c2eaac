#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod learning;
pub mod quiz;
pub mod validation;

pub use geo_core::Clock;

pub use app_services::{AppServices, load_catalog};
pub use error::{AppServicesError, QuizServiceError};
pub use learning::{LearningFeature, LearningOverview, LearningService};
pub use quiz::{QuizCommand, QuizController, QuizService, SessionSnapshot};
pub use validation::{CatalogValidator, Finding, Severity, ValidationReport};
