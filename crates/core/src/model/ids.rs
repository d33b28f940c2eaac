use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of a feature category (e.g. "Flüsse").
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Creates a new `CategoryId`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the category name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name of a geographic feature. Names are matched literally when guessing.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    /// Creates a new `FeatureId`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the feature name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_id_impls {
    ($name:ident) => {
        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id_impls!(CategoryId);
string_id_impls!(FeatureId);

/// What a quiz draws from: one category, or every category combined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategorySelection {
    All,
    Category(CategoryId),
}

impl CategorySelection {
    /// Literal that selects the aggregate of every category.
    pub const ALL_LABEL: &'static str = "ALL";
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL_LABEL),
            Self::Category(id) => fmt::Display::fmt(id, f),
        }
    }
}

impl From<CategoryId> for CategorySelection {
    fn from(value: CategoryId) -> Self {
        Self::Category(value)
    }
}

impl FromStr for CategorySelection {
    type Err = std::convert::Infallible;

    /// `ALL` (any case) and `Alle` select the aggregate; anything else names a category.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(Self::ALL_LABEL) || trimmed == "Alle" {
            Ok(Self::All)
        } else {
            Ok(Self::Category(CategoryId::new(trimmed)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_parses_aggregate_labels() {
        assert_eq!("ALL".parse::<CategorySelection>().unwrap(), CategorySelection::All);
        assert_eq!("all".parse::<CategorySelection>().unwrap(), CategorySelection::All);
        assert_eq!("Alle".parse::<CategorySelection>().unwrap(), CategorySelection::All);
    }

    #[test]
    fn selection_parses_category_names_verbatim() {
        let parsed: CategorySelection = " Flüsse ".parse().unwrap();
        assert_eq!(parsed, CategorySelection::Category(CategoryId::new("Flüsse")));
        assert_eq!(parsed.to_string(), "Flüsse");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&FeatureId::new("Rhine")).unwrap();
        assert_eq!(json, "\"Rhine\"");
    }
}
