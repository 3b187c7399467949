//! Gallery search: the full asset → use → path → URL join.
//!
//! Stages run strictly one after another and each one narrows the ids the next
//! stage asks for. Assets are the smallest set, so the join starts there and walks
//! down to paths, then drops every asset or use that lost its chain on the way.

use crate::animation::AnimationAggregator;
use crate::config::GalleryConfig;
use crate::resolver::{PathJoinResolver, UseJoinResolver};
use crate::search::{NameSearchResolver, Resolution};
use crate::url::UrlBuilder;
use indexmap::IndexMap;
use pigment_api::{
    ApiResult, CatalogStore, EditionFilter, GalleryEntry, GalleryQuery, LATEST, PackRepository,
    Use, VersionCatalog, VersionCatalogSource,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct GalleryEngine {
    names: NameSearchResolver,
    uses: UseJoinResolver,
    paths: PathJoinResolver,
    animations: AnimationAggregator,
    urls: UrlBuilder,
    packs: Arc<dyn PackRepository>,
    versions: Arc<dyn VersionCatalogSource>,
}

impl GalleryEngine {
    pub fn new(
        names: NameSearchResolver,
        uses: UseJoinResolver,
        paths: PathJoinResolver,
        animations: AnimationAggregator,
        urls: UrlBuilder,
        packs: Arc<dyn PackRepository>,
        versions: Arc<dyn VersionCatalogSource>,
    ) -> Self {
        Self {
            names,
            uses,
            paths,
            animations,
            urls,
            packs,
            versions,
        }
    }

    /// Wires every stage to the same store handle.
    pub fn from_store(
        store: &CatalogStore,
        packs: Arc<dyn PackRepository>,
        versions: Arc<dyn VersionCatalogSource>,
        config: &GalleryConfig,
    ) -> Self {
        Self::new(
            NameSearchResolver::new(store.assets.clone(), config.partial_search_min_len),
            UseJoinResolver::new(store.uses.clone()),
            PathJoinResolver::new(store.paths.clone(), versions.clone()),
            AnimationAggregator::new(store.animations.clone(), config.max_concurrent_reads),
            UrlBuilder::new(config.raw_host.clone()),
            packs,
            versions,
        )
    }

    pub fn names(&self) -> &NameSearchResolver {
        &self.names
    }

    pub fn paths(&self) -> &PathJoinResolver {
        &self.paths
    }

    /// Unknown editions are an error naming the known ones. Every other miss (no
    /// candidate, no use, no path at the version) is an empty result.
    pub async fn search(&self, query: &GalleryQuery) -> ApiResult<Vec<GalleryEntry>> {
        let edition = EditionFilter::from(query.edition.as_str());
        let catalog = self.catalog_for(&edition, &query.version).await?;

        // Stage 1: candidate assets
        let candidates = match self
            .names
            .resolve_str(query.search.as_deref(), query.tag.as_deref(), true)
            .await
        {
            Ok(resolution) => resolution,
            Err(e) if e.is_not_found() => Resolution::Many(Vec::new()),
            Err(e) => return Err(e),
        }
        .into_vec();
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // Stage 2: uses of those assets in the edition
        let asset_ids: Vec<String> = candidates.iter().map(|a| a.id.clone()).collect();
        let uses = self.uses.uses_for_assets(&asset_ids, &edition).await?;
        if uses.is_empty() {
            return Ok(Vec::new());
        }

        // Stage 3: paths valid at the version
        let paths = self.paths.paths_for_uses(&uses, &query.version).await?;
        if paths.is_empty() {
            return Ok(Vec::new());
        }
        debug!(
            "Gallery {} / {} / {}: {} assets, {} uses, {} paths",
            query.pack,
            query.edition,
            query.version,
            candidates.len(),
            uses.len(),
            paths.len()
        );

        // Stage 4: walk back up, one use (the first with a path) per asset
        let mut chosen: IndexMap<String, Use> = IndexMap::new();
        for u in uses {
            if paths.contains_key(&u.id) && !chosen.contains_key(&u.asset) {
                chosen.insert(u.asset.clone(), u);
            }
        }
        let surviving: IndexMap<String, _> = chosen
            .values()
            .filter_map(|u| paths.get(&u.id).map(|p| (u.id.clone(), p.clone())))
            .collect();

        // Stages 5 and 6 are independent: animation metadata and the pack
        let (animations, pack) = tokio::try_join!(
            self.animations.for_paths(&surviving),
            self.packs.get_by_id(&query.pack),
        )?;

        let mut entries = Vec::with_capacity(chosen.len());
        for asset in candidates {
            let Some(u) = chosen.get(&asset.id) else {
                continue;
            };
            let Some(path) = surviving.get(&u.id) else {
                continue;
            };
            let version = catalog.resolve(&u.edition, &query.version)?;
            entries.push(GalleryEntry {
                asset_id: asset.id,
                use_id: u.id.clone(),
                path_id: path.id.clone(),
                name: asset.name,
                tags: asset.tags,
                animation: animations.get(&u.id).cloned(),
                url: self.urls.for_pack(&pack, &u.edition, version, &path.name),
            });
        }

        info!(
            "Gallery {} / {} / {} returned {} entries",
            query.pack,
            query.edition,
            query.version,
            entries.len()
        );
        Ok(entries)
    }

    /// Reads the catalog when the edition has to be checked or `latest` substituted.
    async fn catalog_for(
        &self,
        edition: &EditionFilter,
        version: &str,
    ) -> ApiResult<VersionCatalog> {
        if *edition == EditionFilter::All && version != LATEST {
            return Ok(VersionCatalog::new());
        }
        let catalog = self.versions.read().await?;
        if let EditionFilter::Only(edition) = edition {
            catalog.versions(edition)?;
        }
        Ok(catalog)
    }
}
