use anyhow::{Result, bail};

use barkeep_core::filter::{FilterAction, FilterState, MAX_MISSING_UNLIMITED, Mode};
use barkeep_core::persist::FilterStore;

use crate::config::Config;
use crate::store::FileStore;

fn open_store(config: &Config) -> FilterStore {
    FilterStore::open(
        Box::new(FileStore::new(config.filter_state_path.clone())),
        None,
    )
}

fn print_state(state: &FilterState) {
    let selected = if state.selected_ingredients.is_empty() {
        "none".to_string()
    } else {
        state
            .selected_ingredients
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let macros = if state.selected_macros.is_empty() {
        "none".to_string()
    } else {
        state.selected_macros.join(", ")
    };
    let max_missing = if state.max_missing == MAX_MISSING_UNLIMITED {
        "unlimited".to_string()
    } else {
        state.max_missing.to_string()
    };

    println!("Mode: {}  Macro mode: {}", state.mode, state.macro_mode);
    println!("Max missing: {max_missing}");
    println!("Selected ingredients: {selected}");
    println!("Macros: {macros}");
    println!(
        "Show ingredients: {}",
        if state.show_ingredients { "yes" } else { "no" }
    );
}

pub(crate) fn cmd_filters_show(config: &Config, json: bool) -> Result<()> {
    let store = open_store(config);
    if json {
        println!("{}", serde_json::to_string_pretty(store.state())?);
    } else {
        print_state(store.state());
    }
    Ok(())
}

pub(crate) fn cmd_filters_reset(config: &Config) -> Result<()> {
    let mut store = open_store(config);
    store.dispatch(&FilterAction::ResetFilters);
    println!("Filters reset to defaults");
    print_state(store.state());
    Ok(())
}

pub(crate) fn cmd_filters_toggle(config: &Config, id: i64) -> Result<()> {
    let mut store = open_store(config);
    let state = store.dispatch(&FilterAction::ToggleIngredient(id));
    if state.selected_ingredients.contains(&id) {
        println!("Selected ingredient {id}");
    } else {
        println!("Deselected ingredient {id}");
    }
    print_state(store.state());
    Ok(())
}

pub(crate) fn cmd_filters_mode(config: &Config, mode: &str) -> Result<()> {
    let mode: Mode = mode.parse()?;
    let mut store = open_store(config);
    store.dispatch(&FilterAction::SetMode(mode));
    println!("Ingredient mode set to {mode}");
    Ok(())
}

pub(crate) fn cmd_filters_macro_mode(config: &Config, mode: &str) -> Result<()> {
    let mode: Mode = mode.parse()?;
    let mut store = open_store(config);
    store.dispatch(&FilterAction::SetMacroMode(mode));
    println!("Macro mode set to {mode}");
    Ok(())
}

/// Values above the slider's top stop collapse to "unlimited"; the reducer
/// itself does not clamp.
pub(crate) fn cmd_filters_max_missing(config: &Config, value: u8) -> Result<()> {
    let value = value.min(MAX_MISSING_UNLIMITED);
    let mut store = open_store(config);
    store.dispatch(&FilterAction::SetMaxMissing(value));
    if value == MAX_MISSING_UNLIMITED {
        println!("Max missing ingredients: unlimited");
    } else {
        println!("Max missing ingredients: {value}");
    }
    Ok(())
}

pub(crate) fn cmd_filters_macro(config: &Config, name: &str) -> Result<()> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        bail!("Macro name must not be empty");
    }
    let mut store = open_store(config);
    let state = store.dispatch(&FilterAction::ToggleMacro(name.clone()));
    if state.selected_macros.contains(&name) {
        println!("Enabled macro '{name}'");
    } else {
        println!("Disabled macro '{name}'");
    }
    Ok(())
}

pub(crate) fn cmd_filters_move(config: &Config, id: i64, target: i64) -> Result<()> {
    let mut store = open_store(config);
    if !store.reorder(id, target) {
        bail!("Both ingredient ids must be in the current selection (and distinct)");
    }
    print_state(store.state());
    Ok(())
}

pub(crate) fn cmd_filters_show_ingredients(config: &Config) -> Result<()> {
    let mut store = open_store(config);
    let state = store.dispatch(&FilterAction::ToggleIngredientsVisibility);
    println!(
        "Ingredient panel: {}",
        if state.show_ingredients {
            "shown"
        } else {
            "hidden"
        }
    );
    Ok(())
}
