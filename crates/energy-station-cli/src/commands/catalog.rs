use clap::Subcommand;
use energy_station_core::{Catalog, ContentKind};

use super::print_json;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List practice content as JSON
    List {
        /// Only this kind (meditation, breathing, mindfulness, whitenoise)
        #[arg(long)]
        kind: Option<String>,
    },
    /// Show one item
    Show {
        /// Content id
        id: String,
    },
    /// Print the detail-screen route for an id
    Route {
        /// Content id
        id: String,
    },
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::builtin();
    match action {
        CatalogAction::List { kind } => {
            let items: Vec<_> = match kind {
                Some(kind) => {
                    let kind: ContentKind = kind.parse()?;
                    catalog.of_kind(kind).collect()
                }
                None => catalog.items().iter().collect(),
            };
            print_json(&items)?;
        }
        CatalogAction::Show { id } => {
            let item = catalog.lookup(&id)?;
            println!("{}", serde_json::to_string_pretty(item)?);
        }
        CatalogAction::Route { id } => {
            let item = catalog.lookup(&id)?;
            println!("{}", item.route());
        }
    }
    Ok(())
}
