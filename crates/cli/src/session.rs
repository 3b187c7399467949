use pigment_core::store::CatalogSnapshot;
use pigment_core::{GalleryConfig, MemoryCatalog, PigmentError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Global options shared by every command.
pub struct Session {
    catalog: Option<PathBuf>,
    config: Option<PathBuf>,
    json: bool,
}

impl Session {
    pub fn new(catalog: Option<PathBuf>, config: Option<PathBuf>, json: bool) -> Self {
        Self {
            catalog,
            config,
            json,
        }
    }

    pub fn config(&self) -> pigment_core::Result<GalleryConfig> {
        GalleryConfig::load(self.config.as_deref())
    }

    fn catalog_path(&self) -> pigment_core::Result<&Path> {
        self.catalog.as_deref().ok_or_else(|| {
            PigmentError::Config("no catalog given, pass --catalog <FILE>".to_string())
        })
    }

    pub fn load_catalog(&self) -> pigment_core::Result<MemoryCatalog> {
        Ok(CatalogSnapshot::load(self.catalog_path()?)?.into_catalog())
    }

    /// Writes the catalog back to the file it was loaded from.
    pub async fn save_catalog(&self, catalog: &MemoryCatalog) -> pigment_core::Result<()> {
        CatalogSnapshot::capture(catalog)
            .await?
            .save(self.catalog_path()?)
    }

    /// Prints `value` as JSON with `--json`, else `rows` as a table.
    pub fn emit<T, R>(&self, value: &T, rows: Vec<R>) -> Result<(), Box<dyn std::error::Error>>
    where
        T: Serialize + ?Sized,
        R: Tabled,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else if rows.is_empty() {
            println!("No results.");
        } else {
            println!("{}", Table::new(rows).with(Style::psql()).to_string());
        }
        Ok(())
    }
}
