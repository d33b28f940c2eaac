#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::{CatalogManifest, JsonCatalogSource, ManifestEntry};
pub use repository::{
    CatalogSource, CategoryRecord, CoordRecord, GeometryKind, InMemoryCatalogSource, StorageError,
};
