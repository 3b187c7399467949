use indexmap::{IndexMap, IndexSet};
use pigment_api::{
    ApiResult, Collection, LATEST, Predicate, TexturePath, Use, VersionCatalogSource,
};
use std::sync::Arc;
use tracing::debug;

/// Maps uses to the concrete file path valid at a game version.
pub struct PathJoinResolver {
    paths: Arc<dyn Collection<TexturePath>>,
    versions: Arc<dyn VersionCatalogSource>,
}

impl PathJoinResolver {
    pub fn new(
        paths: Arc<dyn Collection<TexturePath>>,
        versions: Arc<dyn VersionCatalogSource>,
    ) -> Self {
        Self { paths, versions }
    }

    /// Versions a path must carry to match `version` for this batch of uses.
    ///
    /// `latest` becomes the newest catalog entry of every edition present in the batch,
    /// evaluated once for the whole batch rather than per use.
    async fn wanted_versions(&self, uses: &[Use], version: &str) -> ApiResult<Vec<String>> {
        if version != LATEST {
            return Ok(vec![version.to_string()]);
        }

        let catalog = self.versions.read().await?;
        let editions: IndexSet<&str> = uses.iter().map(|u| u.edition.as_str()).collect();
        let mut wanted: IndexSet<String> = IndexSet::new();
        for edition in editions {
            wanted.insert(catalog.latest(edition)?.to_string());
        }
        Ok(wanted.into_iter().collect())
    }

    /// At most one path per use: the first in store order covering the version.
    ///
    /// Uses without a matching path are left out of the map. The map follows the order of `uses`.
    pub async fn paths_for_uses(
        &self,
        uses: &[Use],
        version: &str,
    ) -> ApiResult<IndexMap<String, TexturePath>> {
        if uses.is_empty() {
            return Ok(IndexMap::new());
        }

        let wanted = self.wanted_versions(uses, version).await?;
        debug!("Resolving {} uses at {:?}", uses.len(), wanted);

        let found = self
            .paths
            .search(&[
                Predicate::is_in("use", uses.iter().map(|u| u.id.clone())),
                Predicate::array_contains_any("versions", wanted),
            ])
            .await?;

        let mut first: IndexMap<String, TexturePath> = IndexMap::new();
        for path in found {
            first.entry(path.use_id.clone()).or_insert(path);
        }

        Ok(uses
            .iter()
            .filter_map(|u| first.swap_remove(&u.id).map(|p| (u.id.clone(), p)))
            .collect())
    }

    /// Every path of the given uses regardless of version.
    pub async fn paths_of_uses(&self, use_ids: &[String]) -> ApiResult<Vec<TexturePath>> {
        if use_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.paths
            .search(&[Predicate::is_in("use", use_ids.iter().cloned())])
            .await
    }
}
