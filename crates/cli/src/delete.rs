use crate::session::Session;
use crate::view::outcome_rows;
use pigment_core::{CascadeDelete, PathJoinResolver, UseJoinResolver};
use tracing::{info, warn};

pub async fn run(session: &Session, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = session.load_catalog()?;
    let store = catalog.store();
    let cascade = CascadeDelete::new(
        store.clone(),
        UseJoinResolver::new(store.uses.clone()),
        PathJoinResolver::new(store.paths.clone(), catalog.version_source()),
    );

    let report = cascade.delete_asset(id).await?;
    session.save_catalog(&catalog).await?;
    if report.is_complete() {
        info!("Asset {} deleted", id);
    } else {
        warn!("Asset {} only partially deleted", id);
    }

    session.emit(&report, outcome_rows(&report))
}
