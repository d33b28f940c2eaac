use std::path::PathBuf;

use geo_core::model::{CategoryId, FeatureId, Geometry};
use storage::{CatalogSource, JsonCatalogSource, StorageError};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[tokio::test]
async fn lists_categories_in_manifest_order() {
    let source = JsonCatalogSource::open(fixture("catalog")).await.expect("open");

    let categories = source.list_categories().await.unwrap();

    assert_eq!(
        categories,
        vec![CategoryId::new("Flüsse"), CategoryId::new("Gebirge")]
    );
}

#[tokio::test]
async fn loads_category_with_mixed_coordinate_forms() {
    let source = JsonCatalogSource::open(fixture("catalog")).await.expect("open");

    let record = source
        .load_category(&CategoryId::new("Gebirge"))
        .await
        .expect("load");
    let (features, geometries) = record.into_parts(&CategoryId::new("Gebirge")).unwrap();

    assert_eq!(features, vec![FeatureId::new("Alpen"), FeatureId::new("Harz")]);
    let harz = geometries
        .iter()
        .find(|(feature, _)| feature.as_str() == "Harz")
        .map(|(_, geometry)| geometry.clone());
    assert_eq!(harz, Some(Geometry::point(51.75, 10.6)));
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let source = JsonCatalogSource::open(fixture("catalog")).await.expect("open");

    let err = source
        .load_category(&CategoryId::new("Wüsten"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn malformed_and_missing_files_are_reported() {
    let source = JsonCatalogSource::open(fixture("broken")).await.expect("open");

    let malformed = source
        .load_category(&CategoryId::new("Kaputt"))
        .await
        .unwrap_err();
    assert!(matches!(malformed, StorageError::Serialization(_)));

    let missing = source
        .load_category(&CategoryId::new("Fehlt"))
        .await
        .unwrap_err();
    assert!(matches!(missing, StorageError::Io(_)));
}

#[tokio::test]
async fn missing_manifest_fails_to_open() {
    let err = JsonCatalogSource::open(fixture("nowhere")).await.unwrap_err();
    assert!(matches!(err, StorageError::Io(_)));
}
