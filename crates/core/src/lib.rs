//! Catalog resolution for texture packs: name search, the asset → use → path join,
//! gallery assembly and the maintenance operations that keep the catalog consistent.

pub mod error;
pub mod logging;

pub mod animation;
pub mod atlas;
pub mod cascade;
pub mod config;
pub mod gallery;
pub mod maintenance;
pub mod resolver;
pub mod search;
pub mod store;
pub mod url;
pub mod version;

pub use animation::AnimationAggregator;
pub use atlas::{AtlasAddressing, PixelRect};
pub use cascade::{CascadeDelete, CascadeReport, CascadeTarget, OperationOutcome};
pub use config::GalleryConfig;
pub use error::{PigmentError, Result};
pub use gallery::GalleryEngine;
pub use maintenance::{PathUpdate, VersionMaintenance};
pub use resolver::{PathJoinResolver, UseJoinResolver};
pub use search::{AssetQuery, NameSearchResolver, Resolution};
pub use store::{CatalogSnapshot, MemoryCatalog, MemoryCollection, MemoryVersionCatalog};
pub use url::UrlBuilder;
pub use version::Version;
