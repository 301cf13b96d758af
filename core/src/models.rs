use std::collections::{BTreeSet, HashMap};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub alias: String,
    pub canonical: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRef {
    pub id: i64,
    pub name: String,
}

/// One line of the server-side shopping list. Read-only from this crate's
/// perspective; lines are created and cleared by the external service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListLine {
    pub id: i64,
    pub ingredient_id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ingredient: Option<Ingredient>,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub recipe: Option<RecipeRef>,
}

/// Derived shopping-list row: all lines resolving to the same canonical
/// ingredient, summed. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedLine {
    pub canonical_key: String,
    pub display_name: String,
    pub total_quantity: f64,
    pub units: BTreeSet<String>,
}

/// Grouping key for shopping-list lines that carry no recipe.
pub const OTHER_RECIPE_KEY: &str = "other";

#[must_use]
pub fn recipe_key(recipe: Option<&RecipeRef>) -> String {
    match recipe {
        Some(r) => r.id.to_string(),
        None => OTHER_RECIPE_KEY.to_string(),
    }
}

/// Per-recipe "make this N times" factors, keyed the same way
/// [`recipe_key`] keys groups. Client-memory only; unset recipes default to 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeMultipliers {
    factors: HashMap<String, u32>,
}

impl RecipeMultipliers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, times: u32) -> Result<()> {
        if times == 0 {
            bail!("Recipe multiplier must be at least 1");
        }
        self.factors.insert(key.to_string(), times);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> u32 {
        self.factors.get(key).copied().unwrap_or(1)
    }

    pub fn clear(&mut self) {
        self.factors.clear();
    }
}

/// Recipe summary returned by the suggestion query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thumb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alcoholic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub available_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub missing_count: Option<i64>,
}

/// Product data from a barcode lookup. The name/brand fields double as
/// ranked keywords for ingredient matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeProduct {
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_url: Option<String>,
}

impl BarcodeProduct {
    /// Candidate ingredient names in relevance order: product name first,
    /// brand second. Blank entries are dropped.
    #[must_use]
    pub fn keywords(&self) -> Vec<String> {
        [self.name.as_deref(), self.brand.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
