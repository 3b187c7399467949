use crate::session::Session;
use crate::view::AssetRow;
use pigment_core::NameSearchResolver;

pub async fn run(
    session: &Session,
    query: Option<String>,
    tag: Option<String>,
    partial: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = session.config()?;
    let catalog = session.load_catalog()?;
    let names = NameSearchResolver::new(catalog.store().assets, config.partial_search_min_len);

    let assets = names
        .resolve_str(query.as_deref(), tag.as_deref(), partial)
        .await?
        .into_vec();

    let rows: Vec<AssetRow> = assets.iter().map(AssetRow::from).collect();
    session.emit(&assets, rows)
}
