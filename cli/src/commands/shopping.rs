use anyhow::{Context, Result};
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use barkeep_core::aggregate::{aggregate_with_units, group_by_recipe};
use barkeep_core::models::{OTHER_RECIPE_KEY, ShoppingListLine};
use barkeep_core::synonyms::{SynonymTable, canonicalize, display_hint};

use super::helpers::{format_quantity, json_error, parse_times, truncate};
use crate::api::BarApiClient;

pub(crate) async fn cmd_shopping(
    client: &BarApiClient,
    times: &[String],
    by_recipe: bool,
    json: bool,
) -> Result<()> {
    let multipliers = parse_times(times)?;

    let lines = client
        .shopping_list_async()
        .await
        .context("Failed to fetch shopping list")?;

    // Missing synonym tables degrade to pass-through naming, not a dead list.
    let synonyms = super::fetch_table(client.synonyms_async().await, "ingredient synonyms");
    let units = super::fetch_table(client.unit_synonyms_async().await, "unit synonyms");

    if lines.is_empty() {
        if json {
            println!("{}", json_error("Shopping list is empty"));
        } else {
            eprintln!("Shopping list is empty");
        }
        process::exit(2);
    }

    if by_recipe {
        print_by_recipe(&lines, &synonyms);
        return Ok(());
    }

    let aggregated = aggregate_with_units(&lines, &synonyms, Some(&units), &multipliers);

    if json {
        println!("{}", serde_json::to_string_pretty(&aggregated)?);
        return Ok(());
    }

    #[derive(Tabled)]
    struct ShoppingRow {
        #[tabled(rename = "Ingredient")]
        ingredient: String,
        #[tabled(rename = "Qty")]
        quantity: String,
        #[tabled(rename = "Units")]
        units: String,
    }

    let rows: Vec<ShoppingRow> = aggregated
        .iter()
        .map(|line| ShoppingRow {
            ingredient: truncate(&line.display_name, 35),
            quantity: format_quantity(line.total_quantity),
            units: line
                .units
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..2)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}

fn print_by_recipe(lines: &[ShoppingListLine], synonyms: &SynonymTable) {
    let groups = group_by_recipe(lines);

    let mut keys: Vec<&String> = groups.keys().collect();
    keys.sort_by(|a, b| {
        // Loose lines last, recipes in key order.
        let a_other = a.as_str() == OTHER_RECIPE_KEY;
        let b_other = b.as_str() == OTHER_RECIPE_KEY;
        a_other.cmp(&b_other).then_with(|| a.cmp(b))
    });

    for key in keys {
        let group = &groups[key];
        let heading = group
            .first()
            .and_then(|line| line.recipe.as_ref())
            .map_or_else(|| "Other".to_string(), |r| r.name.clone());
        println!("{heading}:");

        for line in group {
            let raw = line
                .ingredient
                .as_ref()
                .map_or_else(|| line.ingredient_id.to_string(), |i| i.name.clone());
            let name = canonicalize(synonyms, &raw);
            let qty = format_quantity(line.quantity);
            let measure = match line.unit.as_deref() {
                Some(unit) => format!("{qty} {unit}"),
                None => qty,
            };
            if display_hint(synonyms, &raw).is_some() {
                println!("  {measure} {name} (listed as '{}')", raw.trim());
            } else {
                println!("  {measure} {name}");
            }
        }
        println!();
    }
}
