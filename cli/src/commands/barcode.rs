use anyhow::{Context, Result};
use std::process;
use tracing::warn;

use barkeep_core::synonyms::match_ingredient;

use super::helpers::json_error;
use crate::api::BarApiClient;

pub(crate) async fn cmd_barcode(client: &BarApiClient, code: &str, json: bool) -> Result<()> {
    let product = client
        .lookup_barcode_async(code)
        .await
        .context("Barcode lookup failed")?;

    let Some(product) = product else {
        if json {
            println!("{}", json_error(&format!("No product found for barcode {code}")));
        } else {
            eprintln!("No product found for barcode {code}");
        }
        process::exit(2);
    };

    let synonyms = super::fetch_table(client.synonyms_async().await, "ingredient synonyms");
    let ingredients = match client.ingredients_async().await {
        Ok(ingredients) => ingredients,
        Err(err) => {
            warn!(%err, "failed to fetch ingredients, matching against empty list");
            Vec::new()
        }
    };

    let matched = match_ingredient(&synonyms, &product.keywords(), &ingredients);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "product": product,
                "matched": matched,
            }))?
        );
        return Ok(());
    }

    let name = product.name.as_deref().unwrap_or("(unnamed product)");
    match product.brand.as_deref() {
        Some(brand) => println!("Product: {name} ({brand})"),
        None => println!("Product: {name}"),
    }
    match matched {
        Some(ingredient) => println!("Matched ingredient: {} (id {})", ingredient.name, ingredient.id),
        None => println!("No matching ingredient in your bar"),
    }

    Ok(())
}
