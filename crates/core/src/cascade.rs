//! Deleting an asset together with everything that hangs off it.
//!
//! The deletes are independent store calls issued together. There is no transaction:
//! if some of them fail the others still take effect, and the report says which
//! parts need to be retried. Deleting an already-absent record is not an error, so a
//! retry of the failed part is safe.

use crate::resolver::{PathJoinResolver, UseJoinResolver};
use pigment_api::{ApiResult, CatalogStore, Predicate};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CascadeTarget {
    Asset,
    Uses,
    Paths,
    Contributions,
}

impl fmt::Display for CascadeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CascadeTarget::Asset => "asset",
            CascadeTarget::Uses => "uses",
            CascadeTarget::Paths => "paths",
            CascadeTarget::Contributions => "contributions",
        };
        f.write_str(name)
    }
}

/// Result of one delete in the batch.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub target: CascadeTarget,
    pub ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationOutcome {
    fn from_result(target: CascadeTarget, ids: Vec<String>, result: ApiResult<()>) -> Self {
        Self {
            target,
            ids,
            error: result.err().map(|e| e.to_string()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CascadeReport {
    pub asset: String,
    pub outcomes: Vec<OperationOutcome>,
}

impl CascadeReport {
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(OperationOutcome::succeeded)
    }

    /// Sub-operations to retry.
    pub fn failed(&self) -> impl Iterator<Item = &OperationOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn outcome(&self, target: CascadeTarget) -> Option<&OperationOutcome> {
        self.outcomes.iter().find(|o| o.target == target)
    }
}

pub struct CascadeDelete {
    store: CatalogStore,
    uses: UseJoinResolver,
    paths: PathJoinResolver,
}

impl CascadeDelete {
    pub fn new(store: CatalogStore, uses: UseJoinResolver, paths: PathJoinResolver) -> Self {
        Self { store, uses, paths }
    }

    pub async fn delete_asset(&self, asset_id: &str) -> ApiResult<CascadeReport> {
        // Lookups, in dependency order
        let asset = self.store.assets.get(asset_id).await?;
        let use_ids: Vec<String> = self
            .uses
            .uses_of(&asset.id)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        let path_ids: Vec<String> = self
            .paths
            .paths_of_uses(&use_ids)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        let contribution_ids: Vec<String> = self
            .store
            .contributions
            .search(&[Predicate::array_contains("assets", asset.id.as_str())])
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        info!(
            "Deleting asset {} with {} uses, {} paths, {} contributions",
            asset.id,
            use_ids.len(),
            path_ids.len(),
            contribution_ids.len()
        );

        // Deletes, all at once
        let (paths, uses, contributions, asset_result) = tokio::join!(
            self.store.paths.remove_bulk(&path_ids),
            self.store.uses.remove_bulk(&use_ids),
            self.store.contributions.remove_bulk(&contribution_ids),
            self.store.assets.remove(&asset.id),
        );

        let report = CascadeReport {
            asset: asset.id.clone(),
            outcomes: vec![
                OperationOutcome::from_result(CascadeTarget::Paths, path_ids, paths),
                OperationOutcome::from_result(CascadeTarget::Uses, use_ids, uses),
                OperationOutcome::from_result(
                    CascadeTarget::Contributions,
                    contribution_ids,
                    contributions,
                ),
                OperationOutcome::from_result(
                    CascadeTarget::Asset,
                    vec![asset.id.clone()],
                    asset_result,
                ),
            ],
        };

        for failed in report.failed() {
            warn!(
                "Cascade delete of {}: {} failed ({})",
                report.asset,
                failed.target,
                failed.error.as_deref().unwrap_or("unknown error")
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryCatalog, MemoryCollection};
    use async_trait::async_trait;
    use indexmap::IndexMap;
    use pigment_api::{
        ApiError, Asset, Collection, Contribution, FieldEdit, Projection, TexturePath, Use,
        VersionCatalog, VersionCatalogSource,
    };
    use serde_json::Value;
    use std::sync::Arc;

    /// Path collection whose bulk removal always fails.
    struct BrokenPaths(MemoryCollection<TexturePath>);

    #[async_trait]
    impl Collection<TexturePath> for BrokenPaths {
        async fn get(&self, id: &str) -> ApiResult<TexturePath> {
            self.0.get(id).await
        }
        async fn search(&self, predicates: &[Predicate]) -> ApiResult<Vec<TexturePath>> {
            self.0.search(predicates).await
        }
        async fn read_all(&self) -> ApiResult<IndexMap<String, TexturePath>> {
            self.0.read_all().await
        }
        async fn select(&self, fields: &[&str]) -> ApiResult<IndexMap<String, Projection>> {
            self.0.select(fields).await
        }
        async fn values(&self, field: &str, flatten: bool) -> ApiResult<Vec<Value>> {
            self.0.values(field, flatten).await
        }
        async fn add(&self, record: TexturePath) -> ApiResult<String> {
            self.0.add(record).await
        }
        async fn add_bulk(&self, records: Vec<TexturePath>) -> ApiResult<Vec<String>> {
            self.0.add_bulk(records).await
        }
        async fn set(&self, id: &str, record: TexturePath) -> ApiResult<()> {
            self.0.set(id, record).await
        }
        async fn set_bulk(&self, ids: &[String], records: Vec<TexturePath>) -> ApiResult<()> {
            self.0.set_bulk(ids, records).await
        }
        async fn remove(&self, id: &str) -> ApiResult<()> {
            self.0.remove(id).await
        }
        async fn remove_bulk(&self, _ids: &[String]) -> ApiResult<()> {
            Err(ApiError::Store("connection reset".to_string()))
        }
        async fn edit_field_bulk(&self, edits: Vec<FieldEdit>) -> ApiResult<()> {
            self.0.edit_field_bulk(edits).await
        }
    }

    fn contribution(id: &str, assets: &[&str]) -> Contribution {
        Contribution {
            id: id.to_string(),
            assets: assets.iter().map(|a| a.to_string()).collect(),
            pack: "faithful".to_string(),
            authors: vec!["someone".to_string()],
            date: 0,
        }
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog {
            assets: Arc::new(MemoryCollection::with_records(vec![
                Asset::new("1", "Stone"),
                Asset::new("2", "Dirt"),
            ])),
            uses: Arc::new(MemoryCollection::with_records(vec![
                Use::new("1a", "1", "java"),
                Use::new("1b", "1", "bedrock"),
                Use::new("2a", "2", "java"),
            ])),
            paths: Arc::new(MemoryCollection::with_records(vec![
                TexturePath::new("p1", "1a", "stone.png", ["1.20"]),
                TexturePath::new("p2", "1b", "stone.png", ["1.20.80"]),
                TexturePath::new("p3", "2a", "dirt.png", ["1.20"]),
            ])),
            contributions: Arc::new(MemoryCollection::with_records(vec![
                contribution("c1", &["1", "2"]),
                contribution("c2", &["2"]),
            ])),
            ..MemoryCatalog::default()
        }
    }

    fn cascade(store: CatalogStore, versions: Arc<dyn VersionCatalogSource>) -> CascadeDelete {
        let uses = UseJoinResolver::new(store.uses.clone());
        let paths = PathJoinResolver::new(store.paths.clone(), versions);
        CascadeDelete::new(store, uses, paths)
    }

    #[tokio::test]
    async fn test_delete_removes_dependents() {
        let catalog = catalog();
        let report = cascade(catalog.store(), catalog.version_source())
            .delete_asset("1")
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(
            report.outcome(CascadeTarget::Paths).unwrap().ids,
            vec!["p1", "p2"]
        );
        assert_eq!(report.outcome(CascadeTarget::Contributions).unwrap().ids, vec!["c1"]);

        assert!(catalog.assets.get("1").await.unwrap_err().is_not_found());
        assert_eq!(catalog.uses.len(), 1);
        assert_eq!(catalog.paths.len(), 1);
        assert_eq!(catalog.contributions.len(), 1);
        assert_eq!(catalog.assets.get("2").await.unwrap().name, "Dirt");
    }

    #[tokio::test]
    async fn test_unknown_asset_is_not_found() {
        let catalog = catalog();
        let err = cascade(catalog.store(), catalog.version_source())
            .delete_asset("42")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(catalog.uses.len(), 3);
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported() {
        let catalog = catalog();
        let paths = catalog.paths.read_all().await.unwrap();
        let mut store = catalog.store();
        store.paths = Arc::new(BrokenPaths(MemoryCollection::with_records(
            paths.into_values(),
        )));

        let versions = Arc::new(crate::store::MemoryVersionCatalog::new(VersionCatalog::new()));
        let report = cascade(store, versions).delete_asset("1").await.unwrap();

        assert!(!report.is_complete());
        let failed: Vec<_> = report.failed().map(|o| o.target).collect();
        assert_eq!(failed, vec![CascadeTarget::Paths]);
        assert!(
            report
                .failed()
                .all(|o| o.error.as_deref() == Some("Store error: connection reset"))
        );

        // The other deletes went through.
        assert!(catalog.assets.get("1").await.unwrap_err().is_not_found());
        assert_eq!(catalog.uses.len(), 1);
    }
}
