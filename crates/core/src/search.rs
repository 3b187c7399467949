//! Resolution of user-supplied asset identifiers and name fragments.
//!
//! Exact (case-insensitive) name matches win over substring matches so that a
//! short common name like "stone" does not drag in every "stone_*" asset. A
//! leading or trailing `_` asks for a substring search explicitly.

use indexmap::IndexMap;
use pigment_api::{ApiError, ApiResult, Asset, Collection, Predicate, TypedId};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Marks a name fragment as a substring search.
pub const WILDCARD: char = '_';

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetQuery {
    All,
    Id(String),
    Name(String),
}

impl AssetQuery {
    pub fn parse(raw: Option<&str>) -> ApiResult<Self> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(AssetQuery::All);
        };

        let digits = raw.strip_prefix('-').unwrap_or(raw);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if raw.starts_with('-') {
                return Err(ApiError::Validation(format!(
                    "asset id must be a non-negative integer, got '{}'",
                    raw
                )));
            }
            let id: u64 = raw.parse().map_err(|_| {
                ApiError::Validation(format!("asset id '{}' is out of range", raw))
            })?;
            return Ok(AssetQuery::Id(id.to_string()));
        }

        if raw.parse::<TypedId>().is_ok() {
            return Ok(AssetQuery::Id(raw.to_string()));
        }

        Ok(AssetQuery::Name(raw.to_string()))
    }

    pub fn from_number(id: i64) -> ApiResult<Self> {
        if id < 0 {
            return Err(ApiError::Validation(format!(
                "asset id must be a non-negative integer, got {}",
                id
            )));
        }
        Ok(AssetQuery::Id(id.to_string()))
    }
}

/// A direct id lookup yields one asset, everything else a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Single(Asset),
    Many(Vec<Asset>),
}

impl Resolution {
    pub fn into_vec(self) -> Vec<Asset> {
        match self {
            Resolution::Single(asset) => vec![asset],
            Resolution::Many(assets) => assets,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Resolution::Single(_) => 1,
            Resolution::Many(assets) => assets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct NameSearchResolver {
    assets: Arc<dyn Collection<Asset>>,
    min_partial_len: usize,
}

impl NameSearchResolver {
    pub fn new(assets: Arc<dyn Collection<Asset>>, min_partial_len: usize) -> Self {
        Self {
            assets,
            min_partial_len,
        }
    }

    pub async fn resolve(
        &self,
        query: &AssetQuery,
        tag: Option<&str>,
        force_partial: bool,
    ) -> ApiResult<Resolution> {
        match query {
            AssetQuery::All => {
                let assets = match tag {
                    Some(tag) => {
                        self.assets
                            .search(&[Predicate::array_contains("tags", tag)])
                            .await?
                    }
                    None => self.assets.read_all().await?.into_values().collect(),
                };
                Ok(Resolution::Many(assets))
            }
            AssetQuery::Id(id) => {
                let asset = self.assets.get(id).await?;
                match tag {
                    Some(tag) if !asset.has_tag(tag) => Ok(Resolution::Many(Vec::new())),
                    _ => Ok(Resolution::Single(asset)),
                }
            }
            AssetQuery::Name(name) => {
                let name = name.trim();
                let wildcard = name.starts_with(WILDCARD) || name.ends_with(WILDCARD);
                if force_partial || wildcard {
                    return self.partial(name, tag).await.map(Resolution::Many);
                }

                let exact = self.exact(name, tag).await?;
                if !exact.is_empty() || name.chars().count() < self.min_partial_len {
                    return Ok(Resolution::Many(exact));
                }

                debug!("No exact match for '{}', falling back to substring search", name);
                self.partial(name, tag).await.map(Resolution::Many)
            }
        }
    }

    /// Parses `raw` and resolves it.
    pub async fn resolve_str(
        &self,
        raw: Option<&str>,
        tag: Option<&str>,
        force_partial: bool,
    ) -> ApiResult<Resolution> {
        self.resolve(&AssetQuery::parse(raw)?, tag, force_partial)
            .await
    }

    async fn exact(&self, name: &str, tag: Option<&str>) -> ApiResult<Vec<Asset>> {
        let mut predicates = vec![Predicate::eq("name", name).ignore_case()];
        predicates.extend(tag.map(|t| Predicate::array_contains("tags", t)));
        self.assets.search(&predicates).await
    }

    async fn partial(&self, name: &str, tag: Option<&str>) -> ApiResult<Vec<Asset>> {
        let needle = name.trim_matches(WILDCARD);
        let mut predicates = vec![Predicate::includes("name", needle).ignore_case()];
        predicates.extend(tag.map(|t| Predicate::array_contains("tags", t)));
        self.assets.search(&predicates).await
    }

    /// Every tag used by at least one asset.
    pub async fn tags(&self) -> ApiResult<Vec<String>> {
        let values = self.assets.values("tags", true).await?;
        let mut tags: Vec<String> = values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect();
        tags.sort();
        Ok(tags)
    }

    /// Asset names keyed by id, in store order.
    pub async fn names(&self) -> ApiResult<IndexMap<String, String>> {
        let projection = self.assets.select(&["name"]).await?;
        Ok(projection
            .into_iter()
            .filter_map(|(id, p)| p.get_str("name").map(|n| (id, n.to_string())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCollection;

    fn resolver() -> NameSearchResolver {
        let assets = MemoryCollection::with_records(vec![
            Asset::new("0", "Stone").with_tags(["block"]),
            Asset::new("1", "Stone Bricks").with_tags(["block"]),
            Asset::new("2", "Diamond Sword").with_tags(["item", "tool"]),
            Asset::new("3", "Ox").with_tags(["entity"]),
            Asset::new("sprite:grass_top", "Grass Top").with_tags(["block"]),
        ]);
        NameSearchResolver::new(Arc::new(assets), 3)
    }

    fn names(res: Resolution) -> Vec<String> {
        res.into_vec().into_iter().map(|a| a.name).collect()
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(AssetQuery::parse(None).unwrap(), AssetQuery::All);
        assert_eq!(AssetQuery::parse(Some("  ")).unwrap(), AssetQuery::All);
        assert_eq!(
            AssetQuery::parse(Some("42")).unwrap(),
            AssetQuery::Id("42".to_string())
        );
        assert_eq!(
            AssetQuery::parse(Some("sprite:grass_top")).unwrap(),
            AssetQuery::Id("sprite:grass_top".to_string())
        );
        assert_eq!(
            AssetQuery::parse(Some("stone")).unwrap(),
            AssetQuery::Name("stone".to_string())
        );
        assert!(matches!(
            AssetQuery::parse(Some("-3")),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            AssetQuery::from_number(-1),
            Err(ApiError::Validation(_))
        ));
        assert_eq!(
            AssetQuery::from_number(7).unwrap(),
            AssetQuery::Id("7".to_string())
        );
    }

    #[tokio::test]
    async fn test_exact_match_wins() {
        let r = resolver();
        let res = r.resolve_str(Some("stone"), None, false).await.unwrap();
        assert_eq!(names(res), vec!["Stone"]);
    }

    #[tokio::test]
    async fn test_wildcard_forces_substring() {
        let r = resolver();
        let res = r.resolve_str(Some("_stone_"), None, false).await.unwrap();
        assert_eq!(names(res), vec!["Stone", "Stone Bricks"]);

        let res = r.resolve_str(Some("stone_"), None, false).await.unwrap();
        assert_eq!(res.len(), 2);
    }

    #[tokio::test]
    async fn test_force_partial() {
        let r = resolver();
        let res = r.resolve_str(Some("stone"), None, true).await.unwrap();
        assert_eq!(res.len(), 2);
    }

    #[tokio::test]
    async fn test_fallback_requires_three_chars() {
        let r = resolver();
        // "st" would match two assets as a substring, but is too short to fall back
        let res = r.resolve_str(Some("st"), None, false).await.unwrap();
        assert!(res.is_empty());

        // Exact two-character names still match
        let res = r.resolve_str(Some("ox"), None, false).await.unwrap();
        assert_eq!(names(res), vec!["Ox"]);

        let res = r.resolve_str(Some("sword"), None, false).await.unwrap();
        assert_eq!(names(res), vec!["Diamond Sword"]);
    }

    #[tokio::test]
    async fn test_tag_filter() {
        let r = resolver();
        let res = r
            .resolve_str(Some("_stone_"), Some("item"), false)
            .await
            .unwrap();
        assert!(res.is_empty());

        let res = r.resolve_str(None, Some("block"), false).await.unwrap();
        assert_eq!(res.len(), 3);

        let res = r.resolve_str(None, None, false).await.unwrap();
        assert_eq!(res.len(), 5);
    }

    #[tokio::test]
    async fn test_id_lookup() {
        let r = resolver();
        let res = r.resolve_str(Some("2"), None, false).await.unwrap();
        assert!(matches!(res, Resolution::Single(ref a) if a.name == "Diamond Sword"));

        let res = r.resolve_str(Some("2"), Some("block"), false).await.unwrap();
        assert!(res.is_empty());

        let res = r
            .resolve_str(Some("sprite:grass_top"), None, false)
            .await
            .unwrap();
        assert_eq!(res.len(), 1);

        let err = r.resolve_str(Some("99"), None, false).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_tags_and_names() {
        let r = resolver();
        assert_eq!(
            r.tags().await.unwrap(),
            vec!["block", "entity", "item", "tool"]
        );
        let names = r.names().await.unwrap();
        assert_eq!(names.get("3").map(String::as_str), Some("Ox"));
        assert_eq!(names.len(), 5);
    }
}
