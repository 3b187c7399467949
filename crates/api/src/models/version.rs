use crate::error::{ApiError, ApiResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version keyword resolved to the newest catalog entry of an edition.
pub const LATEST: &str = "latest";

/// Edition keyword that disables edition filtering.
pub const ALL_EDITIONS: &str = "all";

/// Known game versions per edition, newest first.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct VersionCatalog {
    editions: IndexMap<String, Vec<String>>,
}

impl VersionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edition<I, S>(mut self, edition: impl Into<String>, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.editions
            .insert(edition.into(), versions.into_iter().map(Into::into).collect());
        self
    }

    pub fn editions(&self) -> impl Iterator<Item = &str> {
        self.editions.keys().map(|k| k.as_str())
    }

    pub fn get(&self, edition: &str) -> Option<&[String]> {
        self.editions.get(edition).map(|v| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.editions.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn insert(&mut self, edition: impl Into<String>, versions: Vec<String>) {
        self.editions.insert(edition.into(), versions);
    }

    /// Versions of an edition; an unknown edition is an inconsistency the caller must see.
    pub fn versions(&self, edition: &str) -> ApiResult<&[String]> {
        self.get(edition).ok_or_else(|| {
            ApiError::InconsistentState(format!(
                "edition '{}' is not in the version catalog (valid editions: {})",
                edition,
                self.editions().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Newest version of an edition.
    pub fn latest(&self, edition: &str) -> ApiResult<&str> {
        self.versions(edition)?
            .first()
            .map(|v| v.as_str())
            .ok_or_else(|| {
                ApiError::InconsistentState(format!(
                    "edition '{}' has no registered versions",
                    edition
                ))
            })
    }

    /// Substitutes [`LATEST`] with the newest version of `edition`, passes anything else through.
    pub fn resolve<'a>(&'a self, edition: &str, version: &'a str) -> ApiResult<&'a str> {
        if version == LATEST {
            self.latest(edition)
        } else {
            Ok(version)
        }
    }

    pub fn contains(&self, edition: &str, version: &str) -> bool {
        self.get(edition)
            .map(|versions| versions.iter().any(|v| v == version))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditionFilter {
    All,
    Only(String),
}

impl EditionFilter {
    pub fn matches(&self, edition: &str) -> bool {
        match self {
            EditionFilter::All => true,
            EditionFilter::Only(e) => e == edition,
        }
    }
}

impl From<&str> for EditionFilter {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case(ALL_EDITIONS) {
            EditionFilter::All
        } else {
            EditionFilter::Only(s.to_string())
        }
    }
}

impl FromStr for EditionFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EditionFilter::from(s))
    }
}

impl fmt::Display for EditionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditionFilter::All => f.write_str(ALL_EDITIONS),
            EditionFilter::Only(e) => f.write_str(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> VersionCatalog {
        VersionCatalog::new()
            .with_edition("java", ["1.21", "1.20", "1.19"])
            .with_edition("bedrock", ["1.21.0"])
    }

    #[test]
    fn test_latest() {
        let catalog = catalog();
        assert_eq!(catalog.latest("java").unwrap(), "1.21");
        assert_eq!(catalog.resolve("java", LATEST).unwrap(), "1.21");
        assert_eq!(catalog.resolve("java", "1.19").unwrap(), "1.19");
    }

    #[test]
    fn test_unknown_edition_lists_valid_editions() {
        let err = catalog().latest("console").unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ApiError::InconsistentState(_)));
        assert!(msg.contains("java"));
        assert!(msg.contains("bedrock"));
    }

    #[test]
    fn test_empty_edition_has_no_latest() {
        let catalog = VersionCatalog::new().with_edition("java", Vec::<String>::new());
        assert!(matches!(
            catalog.latest("java"),
            Err(ApiError::InconsistentState(_))
        ));
    }

    #[test]
    fn test_edition_filter() {
        assert_eq!(EditionFilter::from("ALL"), EditionFilter::All);
        let java = EditionFilter::from("java");
        assert!(java.matches("java"));
        assert!(!java.matches("bedrock"));
        assert!(EditionFilter::All.matches("bedrock"));
    }

    #[test]
    fn test_catalog_json_shape() {
        let catalog: VersionCatalog =
            serde_json::from_str(r#"{"java":["1.21","1.20"],"bedrock":[]}"#).unwrap();
        assert_eq!(catalog.editions().collect::<Vec<_>>(), vec!["java", "bedrock"]);
        assert!(catalog.contains("java", "1.20"));
    }
}
