use std::collections::{BTreeSet, HashMap};

use crate::models::{AggregatedLine, RecipeMultipliers, ShoppingListLine, recipe_key};
use crate::synonyms::{SynonymTable, canonical_unit, canonicalize};

/// Partition shopping-list lines by recipe. Lines without a recipe land
/// under the literal key `"other"`. Input order is preserved within groups.
#[must_use]
pub fn group_by_recipe(lines: &[ShoppingListLine]) -> HashMap<String, Vec<&ShoppingListLine>> {
    let mut groups: HashMap<String, Vec<&ShoppingListLine>> = HashMap::new();
    for line in lines {
        groups
            .entry(recipe_key(line.recipe.as_ref()))
            .or_default()
            .push(line);
    }
    groups
}

/// Flatten shopping-list lines into one unit-aware total per canonical
/// ingredient. See [`aggregate_with_units`] for the full contract.
#[must_use]
pub fn aggregate(
    lines: &[ShoppingListLine],
    synonyms: &SynonymTable,
    multipliers: &RecipeMultipliers,
) -> Vec<AggregatedLine> {
    aggregate_with_units(lines, synonyms, None, multipliers)
}

/// Like [`aggregate`], additionally collapsing unit spellings through a
/// unit-synonym table so "ounces" and "oz" become one set member.
///
/// Each line contributes `quantity × multiplier(recipe-or-"other")`.
/// Output order is the first-seen order of canonical keys, not alphabetical,
/// so the list roughly tracks the order items were added. Totals are never
/// rounded and zero-quantity lines are kept; filtering zero totals is a
/// display decision left to callers. A line with no usable ingredient name
/// is keyed by its stringified ingredient id.
#[must_use]
pub fn aggregate_with_units(
    lines: &[ShoppingListLine],
    synonyms: &SynonymTable,
    units: Option<&SynonymTable>,
    multipliers: &RecipeMultipliers,
) -> Vec<AggregatedLine> {
    let mut out: Vec<AggregatedLine> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in lines {
        let factor = f64::from(multipliers.get(&recipe_key(line.recipe.as_ref())));
        let effective = line.quantity * factor;

        let display_name = match line.ingredient.as_ref() {
            Some(ingredient) if !ingredient.name.trim().is_empty() => {
                canonicalize(synonyms, &ingredient.name)
            }
            _ => line.ingredient_id.to_string(),
        };
        let canonical_key = display_name.to_lowercase();

        let slot = match index.get(&canonical_key) {
            Some(&i) => i,
            None => {
                out.push(AggregatedLine {
                    canonical_key: canonical_key.clone(),
                    display_name,
                    total_quantity: 0.0,
                    units: BTreeSet::new(),
                });
                index.insert(canonical_key, out.len() - 1);
                out.len() - 1
            }
        };
        out[slot].total_quantity += effective;

        if let Some(unit) = line.unit.as_deref() {
            let unit = match units {
                Some(table) => canonical_unit(table, unit),
                None => unit.trim().to_string(),
            };
            if !unit.is_empty() {
                out[slot].units.insert(unit);
            }
        }
    }

    out
}
