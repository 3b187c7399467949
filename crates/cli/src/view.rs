use pigment_api::{Asset, GalleryEntry};
use pigment_core::{CascadeReport, OperationOutcome};
use tabled::Tabled;

#[derive(Tabled)]
pub struct EntryRow {
    #[tabled(rename = "Asset")]
    pub asset: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Use")]
    pub use_id: String,
    #[tabled(rename = "Anim")]
    pub animated: String,
    #[tabled(rename = "URL")]
    pub url: String,
}

impl From<&GalleryEntry> for EntryRow {
    fn from(entry: &GalleryEntry) -> Self {
        Self {
            asset: entry.asset_id.clone(),
            name: entry.name.clone(),
            use_id: entry.use_id.clone(),
            animated: if entry.animation.is_some() { "yes" } else { "" }.to_string(),
            url: if entry.url.is_empty() {
                "-".to_string()
            } else {
                entry.url.clone()
            },
        }
    }
}

#[derive(Tabled)]
pub struct AssetRow {
    #[tabled(rename = "Id")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Tags")]
    pub tags: String,
}

impl From<&Asset> for AssetRow {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            name: asset.name.clone(),
            tags: asset.tags.join(", "),
        }
    }
}

#[derive(Tabled)]
pub struct OutcomeRow {
    #[tabled(rename = "Target")]
    pub target: String,
    #[tabled(rename = "Count")]
    pub count: usize,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&OperationOutcome> for OutcomeRow {
    fn from(outcome: &OperationOutcome) -> Self {
        Self {
            target: outcome.target.to_string(),
            count: outcome.ids.len(),
            status: outcome
                .error
                .clone()
                .unwrap_or_else(|| "deleted".to_string()),
        }
    }
}

pub fn outcome_rows(report: &CascadeReport) -> Vec<OutcomeRow> {
    report.outcomes.iter().map(OutcomeRow::from).collect()
}
