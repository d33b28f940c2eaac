use std::fmt;

use serde::Serialize;
use tracing::warn;

use geo_core::model::{CategoryId, FeatureCatalog, FeatureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A data-quality problem found in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Finding {
    /// Drawn as a placeholder point during play.
    MissingGeometry {
        category: CategoryId,
        feature: FeatureId,
    },
    /// Guesses are matched by name, so a shared name is ambiguous.
    DuplicateFeature {
        feature: FeatureId,
        categories: Vec<CategoryId>,
    },
    EmptyCategory { category: CategoryId },
}

impl Finding {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Finding::DuplicateFeature { .. } => Severity::Error,
            Finding::MissingGeometry { .. } | Finding::EmptyCategory { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::MissingGeometry { category, feature } => {
                write!(f, "{category}: {feature} has no coordinates")
            }
            Finding::DuplicateFeature {
                feature,
                categories,
            } => {
                let names: Vec<&str> = categories.iter().map(CategoryId::as_str).collect();
                write!(f, "{feature} appears in several categories: {}", names.join(", "))
            }
            Finding::EmptyCategory { category } => write!(f, "{category}: no features"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// No error-level findings. Warnings are allowed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity() == Severity::Warning)
    }
}

/// Offline integrity checks over a loaded catalog.
pub struct CatalogValidator;

impl CatalogValidator {
    #[must_use]
    pub fn validate(catalog: &FeatureCatalog) -> ValidationReport {
        let mut findings = Vec::new();

        for category in catalog.categories() {
            let empty = catalog
                .features_of(category)
                .map(<[FeatureId]>::is_empty)
                .unwrap_or(true);
            if empty {
                findings.push(Finding::EmptyCategory {
                    category: category.clone(),
                });
            }
        }

        findings.extend(catalog.missing_geometry().into_iter().map(|missing| {
            Finding::MissingGeometry {
                category: missing.category,
                feature: missing.feature,
            }
        }));

        findings.extend(catalog.duplicate_features().into_iter().map(|dup| {
            Finding::DuplicateFeature {
                feature: dup.feature,
                categories: dup.categories,
            }
        }));

        for finding in &findings {
            warn!(severity = %finding.severity(), "{finding}");
        }

        ValidationReport { findings }
    }
}
