mod catalog;
mod geometry;
mod ids;
mod notice;
mod session;

pub use catalog::{
    CatalogError, DuplicateFeature, FeatureCatalog, FeatureCatalogBuilder, MissingGeometry,
};
pub use geometry::{Geometry, GeometryError, LatLon};
pub use ids::{CategoryId, CategorySelection, FeatureId};
pub use notice::Notice;
pub use session::{QuizError, QuizSession, SessionState};
