mod api;
mod commands;
mod config;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::EnvFilter;

use crate::api::BarApiClient;
use crate::commands::{
    cmd_barcode, cmd_filters_macro, cmd_filters_macro_mode, cmd_filters_max_missing,
    cmd_filters_mode, cmd_filters_move, cmd_filters_reset, cmd_filters_show,
    cmd_filters_show_ingredients, cmd_filters_toggle, cmd_shopping, cmd_suggest, cmd_synonyms_add,
    cmd_synonyms_delete, cmd_synonyms_import, cmd_synonyms_list,
};
use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "barkeep",
    version,
    about = "A home-bar inventory and cocktail suggestion CLI",
    long_about = "\n\n  ██████╗  █████╗ ██████╗ ██╗  ██╗███████╗███████╗██████╗
  ██╔══██╗██╔══██╗██╔══██╗██║ ██╔╝██╔════╝██╔════╝██╔══██╗
  ██████╔╝███████║██████╔╝█████╔╝ █████╗  █████╗  ██████╔╝
  ██╔══██╗██╔══██║██╔══██╗██╔═██╗ ██╔══╝  ██╔══╝  ██╔═══╝
  ██████╔╝██║  ██║██║  ██║██║  ██╗███████╗███████╗██║
  ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝  ╚═╝╚══════╝╚══════╝╚═╝
        know what you're mixing.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the aggregated shopping list
    Shopping {
        /// Make a recipe N times: RECIPE_ID=N (repeatable; use 'other' for loose items)
        #[arg(long = "times", value_name = "RECIPE_ID=N")]
        times: Vec<String>,
        /// Group lines by recipe instead of aggregating
        #[arg(long)]
        by_recipe: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest cocktails matching the current filters
    Suggest {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect and change the persisted suggestion filters
    Filters {
        #[command(subcommand)]
        command: FilterCommands,
    },
    /// Manage ingredient synonyms
    Synonyms {
        #[command(subcommand)]
        command: SynonymCommands,
    },
    /// Look up a product by barcode and match it to a bar ingredient
    Barcode {
        /// Barcode number (EAN/UPC)
        code: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum FilterCommands {
    /// Show the current filter state
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reset all filters to defaults
    Reset,
    /// Toggle an ingredient selection by id
    Toggle {
        /// Ingredient id
        id: i64,
    },
    /// Set the ingredient combination mode: and, or, not
    Mode {
        /// One of: and, or, not
        mode: String,
    },
    /// Set the macro combination mode: and, or, not
    MacroMode {
        /// One of: and, or, not
        mode: String,
    },
    /// Set the max missing ingredients (0-2, or 3 for unlimited)
    MaxMissing {
        /// Allowed missing count
        value: u8,
    },
    /// Toggle a macro filter (e.g. sour, tiki)
    Macro {
        /// Macro name
        name: String,
    },
    /// Move a selected ingredient to another's position
    Move {
        /// Ingredient id to move
        id: i64,
        /// Ingredient id to take the position of
        target: i64,
    },
    /// Toggle the per-recipe ingredient panel
    ShowIngredients,
}

#[derive(Subcommand)]
enum SynonymCommands {
    /// List all synonyms
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a synonym mapping an alias to a canonical ingredient name
    Add {
        /// Alias (e.g. "white rum")
        alias: String,
        /// Canonical name (e.g. "Rum")
        canonical: String,
    },
    /// Delete a synonym by alias
    Delete {
        /// Alias to delete
        alias: String,
    },
    /// Import synonyms from a JSON file of {"alias": "canonical"} pairs
    Import {
        /// Path to the JSON file
        file: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let client = BarApiClient::new(&config.api_base);

    match cli.command {
        Commands::Shopping {
            times,
            by_recipe,
            json,
        } => cmd_shopping(&client, &times, by_recipe, json).await,
        Commands::Suggest { json } => cmd_suggest(&client, &config, json).await,
        Commands::Filters { command } => match command {
            FilterCommands::Show { json } => cmd_filters_show(&config, json),
            FilterCommands::Reset => cmd_filters_reset(&config),
            FilterCommands::Toggle { id } => cmd_filters_toggle(&config, id),
            FilterCommands::Mode { mode } => cmd_filters_mode(&config, &mode),
            FilterCommands::MacroMode { mode } => cmd_filters_macro_mode(&config, &mode),
            FilterCommands::MaxMissing { value } => cmd_filters_max_missing(&config, value),
            FilterCommands::Macro { name } => cmd_filters_macro(&config, &name),
            FilterCommands::Move { id, target } => cmd_filters_move(&config, id, target),
            FilterCommands::ShowIngredients => cmd_filters_show_ingredients(&config),
        },
        Commands::Synonyms { command } => match command {
            SynonymCommands::List { json } => cmd_synonyms_list(&client, json).await,
            SynonymCommands::Add { alias, canonical } => {
                cmd_synonyms_add(&client, &alias, &canonical).await
            }
            SynonymCommands::Delete { alias } => cmd_synonyms_delete(&client, &alias).await,
            SynonymCommands::Import { file } => cmd_synonyms_import(&client, &file).await,
        },
        Commands::Barcode { code, json } => cmd_barcode(&client, &code, json).await,
    }
}
