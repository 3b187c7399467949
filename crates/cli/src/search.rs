use crate::session::Session;
use crate::view::EntryRow;
use pigment_api::GalleryQuery;
use pigment_core::GalleryEngine;
use tracing::info;

pub async fn run(
    session: &Session,
    pack: String,
    search: Option<String>,
    edition: String,
    version: String,
    tag: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = session.config()?;
    let catalog = session.load_catalog()?;
    let engine = GalleryEngine::from_store(
        &catalog.store(),
        catalog.pack_repository(),
        catalog.version_source(),
        &config,
    );

    let query = GalleryQuery {
        pack,
        edition,
        version,
        tag,
        search,
    };
    let entries = engine.search(&query).await?;
    info!("search {:?}: {} entries", query, entries.len());

    let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
    session.emit(&entries, rows)
}
