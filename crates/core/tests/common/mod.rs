#![allow(dead_code)]

use pigment_api::{Animation, Asset, Pack, TexturePath, Use, VersionCatalog};
use pigment_core::store::CatalogSnapshot;
use pigment_core::{GalleryConfig, GalleryEngine, MemoryCatalog};

pub const RAW_HOST: &str = "https://raw.githubusercontent.com";

/// Builds an in-memory catalog record by record.
#[derive(Default)]
pub struct CatalogBuilder {
    snapshot: CatalogSnapshot,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asset(mut self, id: &str, name: &str, tags: &[&str]) -> Self {
        self.snapshot
            .assets
            .push(Asset::new(id, name).with_tags(tags.iter().copied()));
        self
    }

    pub fn use_of(mut self, id: &str, asset: &str, edition: &str) -> Self {
        self.snapshot.uses.push(Use::new(id, asset, edition));
        self
    }

    pub fn path(mut self, id: &str, use_id: &str, name: &str, versions: &[&str]) -> Self {
        self.snapshot
            .paths
            .push(TexturePath::new(id, use_id, name, versions.iter().copied()));
        self
    }

    pub fn animated_path(
        mut self,
        id: &str,
        use_id: &str,
        name: &str,
        versions: &[&str],
    ) -> Self {
        let path = TexturePath::new(id, use_id, name, versions.iter().copied()).animated();
        self.snapshot.paths.push(path);
        self
    }

    pub fn animation(mut self, path_id: &str, frametime: u32) -> Self {
        self.snapshot.animations.push(Animation {
            id: path_id.to_string(),
            frametime: Some(frametime),
            interpolate: None,
            frames: None,
        });
        self
    }

    pub fn pack(mut self, pack: Pack) -> Self {
        self.snapshot.packs.push(pack);
        self
    }

    pub fn versions(mut self, catalog: VersionCatalog) -> Self {
        self.snapshot.versions = catalog;
        self
    }

    pub fn build(self) -> MemoryCatalog {
        self.snapshot.into_catalog()
    }
}

pub fn faithful() -> Pack {
    Pack::new("faithful", "Faithful 32x").with_repository("java", "faithfulteam", "faithful-32x")
}

/// The single stone asset with one java path valid at 1.16.5 and 1.17.
pub fn stone_catalog() -> CatalogBuilder {
    CatalogBuilder::new()
        .asset("42", "stone", &["block"])
        .use_of("42a", "42", "java")
        .path("p1", "42a", "textures/block/stone.png", &["1.16.5", "1.17"])
        .pack(faithful())
        .versions(VersionCatalog::new().with_edition("java", ["1.17", "1.16.5"]))
}

pub fn engine(catalog: &MemoryCatalog) -> GalleryEngine {
    GalleryEngine::from_store(
        &catalog.store(),
        catalog.pack_repository(),
        catalog.version_source(),
        &GalleryConfig::default(),
    )
}
