use clap::Subcommand;
use erpcal_core::registry::{OfflineSet, QueryRegistry};
use erpcal_core::Config;
use serde::Serialize;

use crate::catalog::JsonFileCatalog;
use crate::input::print_json;

#[derive(Subcommand)]
pub enum QueriesAction {
    /// List every known query
    List {
        /// Print full entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one query by id
    Show {
        /// Query id
        id: String,
    },
}

#[derive(Serialize)]
struct Summary<'a> {
    id: &'a str,
    name: &'a str,
    offline: bool,
}

pub async fn run(action: QueriesAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let catalog = JsonFileCatalog::new(config.registry.catalog_path.map(Into::into));
    let registry = QueryRegistry::new(OfflineSet::bundled()?, catalog);

    match action {
        QueriesAction::List { json } => {
            let all = registry.list_all().await;
            if json {
                return print_json(&all);
            }
            let rows: Vec<Summary<'_>> = all
                .iter()
                .map(|e| Summary {
                    id: &e.id,
                    name: e.display_name(),
                    offline: e.is_offline,
                })
                .collect();
            print_json(&rows)
        }
        QueriesAction::Show { id } => print_json(&registry.load_by_id(&id).await?),
    }
}
