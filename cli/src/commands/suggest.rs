use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};
use tracing::warn;

use barkeep_core::models::RecipeSummary;
use barkeep_core::persist::FilterStore;

use super::helpers::{json_error, truncate};
use crate::api::BarApiClient;
use crate::config::Config;
use crate::store::FileStore;

pub(crate) async fn cmd_suggest(client: &BarApiClient, config: &Config, json: bool) -> Result<()> {
    let store = FilterStore::open(
        Box::new(FileStore::new(config.filter_state_path.clone())),
        None,
    );
    let query = store.query();

    let recipes = match client.suggestions_async(&query).await {
        Ok(recipes) => recipes,
        Err(err) => {
            warn!(%err, "suggestion query failed, showing empty");
            Vec::new()
        }
    };

    if recipes.is_empty() {
        if json {
            println!("{}", json_error("No matching recipes"));
        } else {
            eprintln!("No matching recipes. Adjust filters with `barkeep filters`.");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }

    print_recipe_table(&recipes);
    Ok(())
}

fn print_recipe_table(recipes: &[RecipeSummary]) {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Have")]
        available: String,
        #[tabled(rename = "Missing")]
        missing: String,
        #[tabled(rename = "Type")]
        alcoholic: String,
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .map(|r| RecipeRow {
            id: r.id.map_or("-".into(), |id| id.to_string()),
            name: truncate(&r.name, 35),
            available: r.available_count.map_or("-".into(), |v| v.to_string()),
            missing: r.missing_count.map_or("-".into(), |v| v.to_string()),
            alcoholic: r.alcoholic.clone().unwrap_or_default(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}
