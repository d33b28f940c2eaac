use thiserror::Error;

use crate::model::{CatalogError, GeometryError, QuizError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
