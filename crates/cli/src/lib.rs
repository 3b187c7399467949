mod delete;
mod resolve;
mod schema;
mod search;
mod session;
mod version;
mod view;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pigment",
    version,
    about = "Texture pack catalog lookups",
    long_about = "Pigment resolves texture pack assets to the file that represents them in a given \
                  edition and game version, and builds raw download URLs for a pack's repositories."
)]
pub struct Cli {
    /// Catalog snapshot (JSON) to operate on
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Config file. Defaults to ~/.pigment/config.json
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Gallery search: one resolved texture per matching asset
    Search {
        /// Pack id
        pack: String,
        /// Asset id or name fragment
        query: Option<String>,
        /// Edition, or "all"
        #[arg(long, default_value = "java")]
        edition: String,
        /// Game version, or "latest"
        #[arg(long, default_value = "latest")]
        version: String,
        /// Only assets carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Resolve an asset id or name to catalog assets
    #[command(
        long_about = "Looks an asset up by id, or by name. Exact name matches win; a leading or \
                      trailing '_' (or --partial) asks for a substring search."
    )]
    Resolve {
        /// Asset id or name; omit to list every asset
        query: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        /// Always match by substring
        #[arg(long)]
        partial: bool,
    },
    /// Compare two game versions
    Compare { a: String, b: String },
    /// Newest registered version of an edition
    Latest { edition: String },
    /// Delete an asset with its uses, paths and contributions
    DeleteAsset { id: String },
    /// Print the JSON schema of a gallery type
    Schema {
        #[arg(value_enum, default_value = "entry")]
        target: schema::SchemaTarget,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = pigment_core::logging::init_logging("cli", cli.verbose);

    let rt = tokio::runtime::Runtime::new()?;
    let session = session::Session::new(cli.catalog, cli.config, cli.json);

    match cli.command {
        Commands::Search {
            pack,
            query,
            edition,
            version,
            tag,
        } => rt.block_on(search::run(&session, pack, query, edition, version, tag)),
        Commands::Resolve {
            query,
            tag,
            partial,
        } => rt.block_on(resolve::run(&session, query, tag, partial)),
        Commands::Compare { a, b } => version::compare(&a, &b),
        Commands::Latest { edition } => rt.block_on(version::latest(&session, &edition)),
        Commands::DeleteAsset { id } => rt.block_on(delete::run(&session, &id)),
        Commands::Schema { target } => schema::run(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_defaults() {
        let cli = Cli::try_parse_from(["pigment", "search", "faithful", "stone"]).unwrap();
        match cli.command {
            Commands::Search {
                pack,
                query,
                edition,
                version,
                tag,
            } => {
                assert_eq!(pack, "faithful");
                assert_eq!(query.as_deref(), Some("stone"));
                assert_eq!(edition, "java");
                assert_eq!(version, "latest");
                assert!(tag.is_none());
            }
            _ => panic!("expected search"),
        }
    }
}
