//! JSON dump of a whole catalog, loadable into a [`MemoryCatalog`].

use super::memory::{MemoryCatalog, MemoryCollection, MemoryVersionCatalog};
use crate::error::Result;
use pigment_api::{
    Animation, Asset, Collection, Contribution, Pack, TexturePath, Use, VersionCatalog,
    VersionCatalogSource,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub uses: Vec<Use>,
    #[serde(default)]
    pub paths: Vec<TexturePath>,
    #[serde(default)]
    pub packs: Vec<Pack>,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
    #[serde(default)]
    pub animations: Vec<Animation>,
    #[serde(default)]
    pub versions: VersionCatalog,
}

impl CatalogSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&content)?;
        debug!(
            "Loaded snapshot {}: {} assets, {} uses, {} paths, {} packs",
            path.display(),
            snapshot.assets.len(),
            snapshot.uses.len(),
            snapshot.paths.len(),
            snapshot.packs.len()
        );
        Ok(snapshot)
    }

    /// Current contents of `catalog`, in store order.
    pub async fn capture(catalog: &MemoryCatalog) -> Result<Self> {
        Ok(Self {
            assets: catalog.assets.read_all().await?.into_values().collect(),
            uses: catalog.uses.read_all().await?.into_values().collect(),
            paths: catalog.paths.read_all().await?.into_values().collect(),
            packs: catalog.packs.read_all().await?.into_values().collect(),
            contributions: catalog.contributions.read_all().await?.into_values().collect(),
            animations: catalog.animations.read_all().await?.into_values().collect(),
            versions: catalog.versions.read().await?,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        debug!("Saved snapshot {}", path.display());
        Ok(())
    }

    pub fn into_catalog(self) -> MemoryCatalog {
        MemoryCatalog {
            assets: Arc::new(MemoryCollection::with_records(self.assets)),
            uses: Arc::new(MemoryCollection::with_records(self.uses)),
            paths: Arc::new(MemoryCollection::with_records(self.paths)),
            packs: Arc::new(MemoryCollection::with_records(self.packs)),
            contributions: Arc::new(MemoryCollection::with_records(self.contributions)),
            animations: Arc::new(MemoryCollection::with_records(self.animations)),
            versions: Arc::new(MemoryVersionCatalog::new(self.versions)),
        }
    }
}
