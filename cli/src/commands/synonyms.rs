use std::collections::HashMap;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use tabled::{Table, Tabled, settings::Style};

use barkeep_core::synonyms::SynonymTable;

use super::helpers::json_error;
use crate::api::BarApiClient;

pub(crate) async fn cmd_synonyms_list(client: &BarApiClient, json: bool) -> Result<()> {
    let entries = client
        .synonyms_async()
        .await
        .context("Failed to fetch synonyms")?;
    let table = SynonymTable::from_entries(&entries);

    if table.is_empty() {
        if json {
            println!("{}", json_error("No synonyms defined"));
        } else {
            eprintln!("No synonyms defined. Add one with `barkeep synonyms add`.");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&table.entries())?);
        return Ok(());
    }

    #[derive(Tabled)]
    struct SynonymRow {
        #[tabled(rename = "Alias")]
        alias: String,
        #[tabled(rename = "Canonical")]
        canonical: String,
    }

    let rows: Vec<SynonymRow> = table
        .entries()
        .into_iter()
        .map(|s| SynonymRow {
            alias: s.alias,
            canonical: s.canonical,
        })
        .collect();

    let out = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{out}");
    Ok(())
}

pub(crate) async fn cmd_synonyms_add(
    client: &BarApiClient,
    alias: &str,
    canonical: &str,
) -> Result<()> {
    let saved = client.add_synonym_async(alias, canonical).await?;
    println!("Added synonym '{}' → '{}'", saved.alias, saved.canonical);
    Ok(())
}

pub(crate) async fn cmd_synonyms_delete(client: &BarApiClient, alias: &str) -> Result<()> {
    client.delete_synonym_async(alias).await?;
    println!("Deleted synonym '{alias}'");
    Ok(())
}

/// Bulk import from a JSON file of `{"alias": "canonical"}` pairs. The whole
/// payload is parsed before anything is sent; a malformed file changes
/// nothing.
pub(crate) async fn cmd_synonyms_import(client: &BarApiClient, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let mapping: HashMap<String, String> = serde_json::from_str(&raw)
        .context("Synonym import must be a JSON object mapping alias to canonical name")?;

    client.import_synonyms_async(&mapping).await?;
    println!("Imported {} synonyms", mapping.len());
    Ok(())
}
