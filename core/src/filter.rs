use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Ingredient/macro combination mode for the suggestion query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    And,
    Or,
    Not,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::And => "and",
            Mode::Or => "or",
            Mode::Not => "not",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" => Ok(Mode::And),
            "or" => Ok(Mode::Or),
            "not" => Ok(Mode::Not),
            _ => bail!("Invalid mode '{s}'. Must be one of: and, or, not"),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentinel `max_missing` value meaning "unlimited", the UI slider's top
/// stop. Mapped to an absent field on the wire.
pub const MAX_MISSING_UNLIMITED: u8 = 3;

/// The user's suggestion-query selections. Mutated only through [`reduce`];
/// persisted across sessions by the filter store. Field names serialize in
/// the historical camelCase shape so previously stored state keeps loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Ordered and duplicate-free; the order drives chip display order.
    pub selected_ingredients: Vec<i64>,
    pub mode: Mode,
    pub macro_mode: Mode,
    pub max_missing: u8,
    /// Set semantics: toggling keeps entries unique.
    pub selected_macros: Vec<String>,
    pub show_ingredients: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selected_ingredients: Vec::new(),
            mode: Mode::And,
            macro_mode: Mode::Or,
            max_missing: MAX_MISSING_UNLIMITED,
            selected_macros: Vec::new(),
            show_ingredients: false,
        }
    }
}

/// All-optional mirror of [`FilterState`], used for load-time merging,
/// validation, and migration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialFilterState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_ingredients: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macro_mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_missing: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_macros: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_ingredients: Option<bool>,
}

impl PartialFilterState {
    /// Shallow-merge: present fields replace `base`'s, absent fields keep it.
    #[must_use]
    pub fn apply_over(&self, base: &FilterState) -> FilterState {
        FilterState {
            selected_ingredients: self
                .selected_ingredients
                .clone()
                .unwrap_or_else(|| base.selected_ingredients.clone()),
            mode: self.mode.unwrap_or(base.mode),
            macro_mode: self.macro_mode.unwrap_or(base.macro_mode),
            max_missing: self.max_missing.unwrap_or(base.max_missing),
            selected_macros: self
                .selected_macros
                .clone()
                .unwrap_or_else(|| base.selected_macros.clone()),
            show_ingredients: self.show_ingredients.unwrap_or(base.show_ingredients),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    /// Append if absent, remove (order of the rest preserved) if present.
    ToggleIngredient(i64),
    SetMode(Mode),
    SetMacroMode(Mode),
    /// No clamping here: the reducer stays total, callers clamp to the UI
    /// range and load-time validation bounds stored values.
    SetMaxMissing(u8),
    ToggleMacro(String),
    ToggleIngredientsVisibility,
    /// Wholesale replacement. Callers must supply a permutation of the
    /// current id set; the reducer does not verify (see the reorder module,
    /// which derives payloads from current state and cannot violate this).
    ReorderIngredients(Vec<i64>),
    ResetFilters,
    /// Shallow-merge of a stored partial state; used at load time only.
    LoadState(PartialFilterState),
}

/// Pure transition function: same state + same action → same result, and the
/// input state is never mutated.
#[must_use]
pub fn reduce(state: &FilterState, action: &FilterAction) -> FilterState {
    match action {
        FilterAction::ToggleIngredient(id) => {
            let mut next = state.clone();
            if let Some(pos) = next.selected_ingredients.iter().position(|&i| i == *id) {
                next.selected_ingredients.remove(pos);
            } else {
                next.selected_ingredients.push(*id);
            }
            next
        }
        FilterAction::SetMode(mode) => FilterState {
            mode: *mode,
            ..state.clone()
        },
        FilterAction::SetMacroMode(mode) => FilterState {
            macro_mode: *mode,
            ..state.clone()
        },
        FilterAction::SetMaxMissing(value) => FilterState {
            max_missing: *value,
            ..state.clone()
        },
        FilterAction::ToggleMacro(name) => {
            let mut next = state.clone();
            if let Some(pos) = next.selected_macros.iter().position(|m| m == name) {
                next.selected_macros.remove(pos);
            } else {
                next.selected_macros.push(name.clone());
            }
            next
        }
        FilterAction::ToggleIngredientsVisibility => FilterState {
            show_ingredients: !state.show_ingredients,
            ..state.clone()
        },
        FilterAction::ReorderIngredients(order) => FilterState {
            selected_ingredients: order.clone(),
            ..state.clone()
        },
        FilterAction::ResetFilters => FilterState::default(),
        FilterAction::LoadState(partial) => partial.apply_over(state),
    }
}

/// The outbound suggestion-query payload derived from a [`FilterState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionQuery {
    pub ingredients: Vec<i64>,
    pub mode: Mode,
    pub macros: Vec<String>,
    pub macro_mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_missing: Option<u8>,
}

impl SuggestionQuery {
    #[must_use]
    pub fn from_state(state: &FilterState) -> Self {
        Self {
            ingredients: state.selected_ingredients.clone(),
            mode: state.mode,
            macros: state.selected_macros.clone(),
            macro_mode: state.macro_mode,
            max_missing: if state.max_missing == MAX_MISSING_UNLIMITED {
                None
            } else {
                Some(state.max_missing)
            },
        }
    }
}
