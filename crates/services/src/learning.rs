use std::sync::Arc;

use serde::Serialize;

use geo_core::model::{CategoryId, FeatureCatalog, FeatureId, Geometry, LatLon};

use crate::error::QuizServiceError;

/// One labelled feature on the study map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningFeature {
    pub feature: FeatureId,
    pub geometry: Geometry,
    /// Points to draw; polygons are closed.
    pub outline: Vec<LatLon>,
    pub label_anchor: LatLon,
}

/// Every feature of one category, laid out for study.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningOverview {
    pub category: CategoryId,
    pub features: Vec<LearningFeature>,
}

impl LearningOverview {
    /// Comma-separated feature list shown under the map.
    #[must_use]
    pub fn list_label(&self) -> String {
        let names: Vec<&str> = self.features.iter().map(|f| f.feature.as_str()).collect();
        format!("Features: {}", names.join(", "))
    }
}

/// Learning mode: shows all features of a category at once. Only concrete
/// categories are offered; the `All` aggregate is quiz-only.
#[derive(Debug, Clone)]
pub struct LearningService {
    catalog: Arc<FeatureCatalog>,
}

impl LearningService {
    #[must_use]
    pub fn new(catalog: Arc<FeatureCatalog>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn categories(&self) -> Vec<CategoryId> {
        self.catalog.categories().cloned().collect()
    }

    /// # Errors
    ///
    /// Returns `QuizServiceError::Catalog` if the category is unknown.
    pub fn overview(&self, category: &CategoryId) -> Result<LearningOverview, QuizServiceError> {
        let features = self
            .catalog
            .features_of(category)?
            .iter()
            .map(|feature| {
                let geometry = self.catalog.geometry_of(feature);
                LearningFeature {
                    feature: feature.clone(),
                    outline: geometry.outline(),
                    label_anchor: geometry.label_anchor(),
                    geometry,
                }
            })
            .collect();

        Ok(LearningOverview {
            category: category.clone(),
            features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_core::model::CatalogError;

    fn service() -> LearningService {
        let catalog = FeatureCatalog::builder()
            .category(
                CategoryId::new("Gebirge"),
                [FeatureId::new("Harz"), FeatureId::new("Alpen")],
                [
                    (FeatureId::new("Harz"), Geometry::point(51.75, 10.6)),
                    (
                        FeatureId::new("Alpen"),
                        Geometry::polygon(vec![
                            LatLon::new(44.0, 7.0),
                            LatLon::new(48.0, 11.0),
                            LatLon::new(47.0, 16.0),
                        ])
                        .unwrap(),
                    ),
                ],
            )
            .unwrap()
            .build();
        LearningService::new(Arc::new(catalog))
    }

    #[test]
    fn overview_keeps_catalog_order_and_lists_names() {
        let overview = service().overview(&CategoryId::new("Gebirge")).unwrap();
        assert_eq!(overview.features.len(), 2);
        assert_eq!(overview.features[0].feature, FeatureId::new("Harz"));
        assert_eq!(overview.list_label(), "Features: Harz, Alpen");
    }

    #[test]
    fn polygon_outline_is_closed_for_drawing() {
        let overview = service().overview(&CategoryId::new("Gebirge")).unwrap();
        let alps = &overview.features[1];
        assert_eq!(alps.outline.len(), 4);
        assert_eq!(alps.outline.first(), alps.outline.last());
    }

    #[test]
    fn unknown_category_is_reported() {
        let err = service().overview(&CategoryId::new("Wüsten")).unwrap_err();
        assert!(matches!(
            err,
            QuizServiceError::Catalog(CatalogError::UnknownCategory(_))
        ));
    }
}
