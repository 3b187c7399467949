use clap::ValueEnum;
use pigment_api::{GalleryEntry, GalleryQuery};
use schemars::schema_for;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SchemaTarget {
    /// One gallery search result
    Entry,
    /// Gallery search parameters
    Query,
}

pub fn run(target: SchemaTarget) -> Result<(), Box<dyn std::error::Error>> {
    let schema = match target {
        SchemaTarget::Entry => schema_for!(GalleryEntry),
        SchemaTarget::Query => schema_for!(GalleryQuery),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
