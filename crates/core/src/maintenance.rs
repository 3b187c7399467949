//! Registering, renaming and retiring game versions.
//!
//! Path edits go through one `edit_field_bulk` per operation and are applied before the
//! catalog is rewritten, so a rejected edit leaves the catalog as it was.

use crate::resolver::UseJoinResolver;
use crate::version::{Version, sort_ascending, sort_newest_first};
use pigment_api::{
    ApiError, ApiResult, Collection, FieldEdit, Predicate, TexturePath, VersionCatalogSource,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Paths touched by a maintenance operation.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PathUpdate {
    pub edited: Vec<String>,
    /// Paths left alone because the edit would have emptied their version list.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

pub struct VersionMaintenance {
    uses: UseJoinResolver,
    paths: Arc<dyn Collection<TexturePath>>,
    versions: Arc<dyn VersionCatalogSource>,
}

impl VersionMaintenance {
    pub fn new(
        uses: UseJoinResolver,
        paths: Arc<dyn Collection<TexturePath>>,
        versions: Arc<dyn VersionCatalogSource>,
    ) -> Self {
        Self {
            uses,
            paths,
            versions,
        }
    }

    /// Id the next use of `asset_id` should get.
    pub async fn next_use_id(&self, asset_id: &str) -> ApiResult<String> {
        self.uses.next_use_id(asset_id).await
    }

    /// Paths of `edition` whose versions contain `version`.
    async fn edition_paths_with(
        &self,
        edition: &str,
        version: &str,
    ) -> ApiResult<Vec<TexturePath>> {
        let uses = self.uses.uses_in_edition(edition).await?;
        if uses.is_empty() {
            return Ok(Vec::new());
        }
        self.paths
            .search(&[
                Predicate::is_in("use", uses.into_iter().map(|u| u.id)),
                Predicate::array_contains("versions", version),
            ])
            .await
    }

    async fn set_versions(&self, edits: Vec<(String, Vec<String>)>) -> ApiResult<Vec<String>> {
        let ids: Vec<String> = edits.iter().map(|(id, _)| id.clone()).collect();
        if !edits.is_empty() {
            let edits = edits
                .into_iter()
                .map(|(id, versions)| FieldEdit::set(id, "versions", Value::from(versions)))
                .collect();
            self.paths.edit_field_bulk(edits).await?;
        }
        Ok(ids)
    }

    /// Adds `version` to `edition`. With a `template`, every path of the edition valid
    /// at the template becomes valid at the new version too.
    pub async fn add_version(
        &self,
        edition: &str,
        version: &str,
        template: Option<&str>,
    ) -> ApiResult<PathUpdate> {
        Version::parse(version)?;
        let catalog = self.versions.read().await?;
        let existing = catalog.versions(edition)?;
        if existing.iter().any(|v| v == version) {
            return Err(ApiError::Validation(format!(
                "version {} is already registered for {}",
                version, edition
            )));
        }
        if let Some(template) = template {
            if !catalog.contains(edition, template) {
                return Err(ApiError::InconsistentState(format!(
                    "template version {} is not registered for {} (known: {})",
                    template,
                    edition,
                    existing.join(", ")
                )));
            }
        }

        let mut update = PathUpdate::default();
        if let Some(template) = template {
            let mut edits = Vec::new();
            for path in self.edition_paths_with(edition, template).await? {
                let mut versions = path.versions;
                versions.push(version.to_string());
                sort_ascending(&mut versions)?;
                edits.push((path.id, versions));
            }
            update.edited = self.set_versions(edits).await?;
        }

        let mut list = existing.to_vec();
        list.push(version.to_string());
        sort_newest_first(&mut list)?;
        self.versions.write(edition, list).await?;

        info!(
            "Added version {} to {} ({} paths extended)",
            version,
            edition,
            update.edited.len()
        );
        Ok(update)
    }

    /// Replaces `old` with `new` in every edition and every path that carries it.
    pub async fn rename_version(&self, old: &str, new: &str) -> ApiResult<PathUpdate> {
        Version::parse(new)?;
        let catalog = self.versions.read().await?;

        let mut lists = Vec::new();
        for (edition, versions) in catalog.iter() {
            if !versions.iter().any(|v| v == old) {
                continue;
            }
            if versions.iter().any(|v| v == new) {
                return Err(ApiError::Validation(format!(
                    "version {} is already registered for {}",
                    new, edition
                )));
            }
            let mut renamed: Vec<String> = versions
                .iter()
                .map(|v| if v == old { new.to_string() } else { v.clone() })
                .collect();
            sort_newest_first(&mut renamed)?;
            lists.push((edition.to_string(), renamed));
        }
        if lists.is_empty() {
            return Err(ApiError::InconsistentState(format!(
                "version {} is not registered for any edition",
                old
            )));
        }

        let mut edits = Vec::new();
        for path in self
            .paths
            .search(&[Predicate::array_contains("versions", old)])
            .await?
        {
            let mut versions: Vec<String> = Vec::with_capacity(path.versions.len());
            for v in path.versions {
                let v = if v == old { new.to_string() } else { v };
                if !versions.contains(&v) {
                    versions.push(v);
                }
            }
            sort_ascending(&mut versions)?;
            edits.push((path.id, versions));
        }
        let update = PathUpdate {
            edited: self.set_versions(edits).await?,
            skipped: Vec::new(),
        };

        for (edition, list) in lists {
            self.versions.write(&edition, list).await?;
        }
        info!(
            "Renamed version {} to {} ({} paths)",
            old,
            new,
            update.edited.len()
        );
        Ok(update)
    }

    /// Drops `version` from `edition` and from the paths of that edition.
    ///
    /// A path whose only version is `version` keeps it and is reported as skipped.
    pub async fn remove_version(&self, edition: &str, version: &str) -> ApiResult<PathUpdate> {
        let catalog = self.versions.read().await?;
        let existing = catalog.versions(edition)?;
        if !existing.iter().any(|v| v == version) {
            return Err(ApiError::InconsistentState(format!(
                "version {} is not registered for {} (known: {})",
                version,
                edition,
                existing.join(", ")
            )));
        }

        let mut update = PathUpdate::default();
        let mut edits = Vec::new();
        for path in self.edition_paths_with(edition, version).await? {
            if path.versions.len() == 1 {
                update.skipped.push(path.id);
                continue;
            }
            if let Some(index) = path.versions.iter().position(|v| v == version) {
                update.edited.push(path.id.clone());
                edits.push(FieldEdit::splice(path.id, "versions", index, 1, Vec::new()));
            }
        }
        if !edits.is_empty() {
            self.paths.edit_field_bulk(edits).await?;
        }

        let list: Vec<String> = existing.iter().filter(|v| *v != version).cloned().collect();
        self.versions.write(edition, list).await?;

        if !update.skipped.is_empty() {
            warn!(
                "Version {} is the only version of paths {:?}; they were left unchanged",
                version, update.skipped
            );
        }
        info!(
            "Removed version {} from {} ({} paths edited)",
            version,
            edition,
            update.edited.len()
        );
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryCollection, MemoryVersionCatalog};
    use pigment_api::{Use, VersionCatalog};

    struct Fixture {
        paths: Arc<MemoryCollection<TexturePath>>,
        versions: Arc<MemoryVersionCatalog>,
        maintenance: VersionMaintenance,
    }

    fn fixture() -> Fixture {
        let uses = Arc::new(MemoryCollection::with_records(vec![
            Use::new("1a", "1", "java"),
            Use::new("1b", "1", "bedrock"),
            Use::new("2a", "2", "java"),
        ]));
        let paths = Arc::new(MemoryCollection::with_records(vec![
            TexturePath::new("p1", "1a", "stone.png", ["1.19", "1.20"]),
            TexturePath::new("p2", "2a", "dirt.png", ["1.20"]),
            TexturePath::new("p3", "1b", "stone.png", ["1.20.80"]),
            TexturePath::new("p4", "2a", "old_dirt.png", ["1.8", "1.19"]),
        ]));
        let versions = Arc::new(MemoryVersionCatalog::new(
            VersionCatalog::new()
                .with_edition("java", ["1.20", "1.19", "1.8"])
                .with_edition("bedrock", ["1.20.80"]),
        ));
        let maintenance = VersionMaintenance::new(
            UseJoinResolver::new(uses),
            paths.clone(),
            versions.clone(),
        );
        Fixture {
            paths,
            versions,
            maintenance,
        }
    }

    #[tokio::test]
    async fn test_add_version_from_template() {
        let f = fixture();
        let update = f
            .maintenance
            .add_version("java", "1.20.1", Some("1.20"))
            .await
            .unwrap();
        assert_eq!(update.edited, vec!["p1", "p2"]);

        let catalog = f.versions.read().await.unwrap();
        assert_eq!(
            catalog.get("java").unwrap(),
            ["1.20.1", "1.20", "1.19", "1.8"]
        );
        assert_eq!(
            f.paths.get("p1").await.unwrap().versions,
            vec!["1.19", "1.20", "1.20.1"]
        );
        assert_eq!(f.paths.get("p3").await.unwrap().versions, vec!["1.20.80"]);
    }

    #[tokio::test]
    async fn test_add_version_sorts_numerically() {
        let f = fixture();
        f.maintenance.add_version("java", "1.9", None).await.unwrap();
        let catalog = f.versions.read().await.unwrap();
        assert_eq!(catalog.get("java").unwrap(), ["1.20", "1.19", "1.9", "1.8"]);
    }

    #[tokio::test]
    async fn test_add_version_rejections() {
        let f = fixture();
        assert!(matches!(
            f.maintenance.add_version("java", "1.20", None).await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            f.maintenance.add_version("java", "1.x", None).await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            f.maintenance.add_version("java", "1.21", Some("1.17")).await,
            Err(ApiError::InconsistentState(_))
        ));
        let err = f
            .maintenance
            .add_version("console", "1.0", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("bedrock"));
    }

    #[tokio::test]
    async fn test_rename_version() {
        let f = fixture();
        let update = f.maintenance.rename_version("1.19", "1.19.4").await.unwrap();
        assert_eq!(update.edited, vec!["p1", "p4"]);

        let catalog = f.versions.read().await.unwrap();
        assert_eq!(catalog.get("java").unwrap(), ["1.20", "1.19.4", "1.8"]);
        assert_eq!(
            f.paths.get("p1").await.unwrap().versions,
            vec!["1.19.4", "1.20"]
        );

        assert!(matches!(
            f.maintenance.rename_version("1.2", "1.3").await,
            Err(ApiError::InconsistentState(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_version_keeps_paths_non_empty() {
        let f = fixture();
        let update = f.maintenance.remove_version("java", "1.20").await.unwrap();
        assert_eq!(update.edited, vec!["p1"]);
        assert_eq!(update.skipped, vec!["p2"]);

        assert_eq!(f.paths.get("p1").await.unwrap().versions, vec!["1.19"]);
        assert_eq!(f.paths.get("p2").await.unwrap().versions, vec!["1.20"]);
        let catalog = f.versions.read().await.unwrap();
        assert_eq!(catalog.get("java").unwrap(), ["1.19", "1.8"]);
    }

    #[tokio::test]
    async fn test_next_use_id() {
        let f = fixture();
        assert_eq!(f.maintenance.next_use_id("1").await.unwrap(), "1c");
    }
}
