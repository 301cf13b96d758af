use std::sync::Mutex;

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use crate::filter::{
    FilterAction, FilterState, PartialFilterState, SuggestionQuery, reduce,
};
use crate::reorder::move_item;

/// Storage slot for the serialized filter state. Implementations are
/// injected so the store can run against a file, a settings service, or an
/// in-memory fake in tests.
pub trait StateStore {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, raw: &str) -> Result<()>;
}

/// In-memory slot, mainly for tests and embedding without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: &str) -> Self {
        Self {
            slot: Mutex::new(Some(raw.to_string())),
        }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().expect("memory store poisoned").clone())
    }

    fn save(&self, raw: &str) -> Result<()> {
        *self.slot.lock().expect("memory store poisoned") = Some(raw.to_string());
        Ok(())
    }
}

/// Outcome of shape-checking a stored value. Carries the reason on failure
/// so migration can be logged with it.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid(PartialFilterState),
    Invalid(String),
}

const VALID_MODES: &[&str] = &["and", "or", "not"];

/// Stored `maxMissing` values are accepted up to 10 even though the UI only
/// produces 0..=3, to tolerate future range extensions without a migration.
const MAX_MISSING_STORED_LIMIT: u64 = 10;

/// Check every present field's type and domain against the current shape.
/// Absent or null fields are fine (the state is a partial); unknown fields
/// are ignored.
#[must_use]
pub fn validate_state(raw: &Value) -> Validation {
    let Some(obj) = raw.as_object() else {
        return Validation::Invalid("stored state is not an object".to_string());
    };

    if let Some(v) = present(obj.get("selectedIngredients")) {
        let ok = v
            .as_array()
            .is_some_and(|ids| ids.iter().all(|id| id.as_i64().is_some()));
        if !ok {
            return Validation::Invalid(
                "selectedIngredients must be an array of integers".to_string(),
            );
        }
    }

    for field in ["mode", "macroMode"] {
        if let Some(v) = present(obj.get(field)) {
            let ok = v
                .as_str()
                .is_some_and(|s| VALID_MODES.contains(&s));
            if !ok {
                return Validation::Invalid(format!("{field} must be one of and/or/not"));
            }
        }
    }

    if let Some(v) = present(obj.get("maxMissing")) {
        let ok = v
            .as_u64()
            .is_some_and(|n| n <= MAX_MISSING_STORED_LIMIT);
        if !ok {
            return Validation::Invalid("maxMissing must be an integer in 0..=10".to_string());
        }
    }

    if let Some(v) = present(obj.get("selectedMacros")) {
        let ok = v
            .as_array()
            .is_some_and(|names| names.iter().all(Value::is_string));
        if !ok {
            return Validation::Invalid("selectedMacros must be an array of strings".to_string());
        }
    }

    if let Some(v) = present(obj.get("showIngredients")) {
        if !v.is_boolean() {
            return Validation::Invalid("showIngredients must be a boolean".to_string());
        }
    }

    match serde_json::from_value::<PartialFilterState>(raw.clone()) {
        Ok(partial) => Validation::Valid(partial),
        Err(err) => Validation::Invalid(err.to_string()),
    }
}

fn present(v: Option<&Value>) -> Option<&Value> {
    v.filter(|v| !v.is_null())
}

/// Best-effort salvage of a stored value that failed validation: copy each
/// individually valid field, drop the rest. Total: junk in, empty out.
#[must_use]
pub fn migrate_state(raw: &Value) -> PartialFilterState {
    let mut out = PartialFilterState::default();
    let Some(obj) = raw.as_object() else {
        return out;
    };

    if let Some(ids) = obj.get("selectedIngredients").and_then(Value::as_array) {
        out.selected_ingredients = Some(ids.iter().filter_map(Value::as_i64).collect());
    }
    if let Some(mode) = obj
        .get("mode")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
    {
        out.mode = Some(mode);
    }
    if let Some(mode) = obj
        .get("macroMode")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
    {
        out.macro_mode = Some(mode);
    }
    if let Some(n) = obj
        .get("maxMissing")
        .and_then(Value::as_u64)
        .filter(|&n| n <= MAX_MISSING_STORED_LIMIT)
    {
        out.max_missing = Some(n as u8);
    }
    if let Some(names) = obj.get("selectedMacros").and_then(Value::as_array) {
        out.selected_macros = Some(
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        );
    }
    if let Some(b) = obj.get("showIngredients").and_then(Value::as_bool) {
        out.show_ingredients = Some(b);
    }

    out
}

/// The filter state machine wrapped with persistence: loads (validating,
/// then migrating, then defaulting) at open, and writes the serialized
/// state back after every dispatch. Persistence is best-effort: a failed
/// save is logged and the in-memory session carries on.
pub struct FilterStore {
    state: FilterState,
    store: Box<dyn StateStore>,
}

impl FilterStore {
    /// Precedence: defaults ← stored (validated or migrated) ← `overrides`.
    pub fn open(store: Box<dyn StateStore>, overrides: Option<PartialFilterState>) -> Self {
        let salvaged = match store.load() {
            Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(value) => match validate_state(&value) {
                    Validation::Valid(partial) => partial,
                    Validation::Invalid(reason) => {
                        let migrated = migrate_state(&value);
                        info!(%reason, "stored filter state failed validation, migrated");
                        migrated
                    }
                },
                Err(err) => {
                    warn!(%err, "stored filter state is not valid JSON, using defaults");
                    PartialFilterState::default()
                }
            },
            Ok(None) => PartialFilterState::default(),
            Err(err) => {
                warn!(%err, "failed to load filter state, using defaults");
                PartialFilterState::default()
            }
        };

        let mut state = salvaged.apply_over(&FilterState::default());
        if let Some(overrides) = overrides {
            state = overrides.apply_over(&state);
        }

        let this = Self {
            state,
            store,
        };
        this.persist();
        this
    }

    #[must_use]
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn dispatch(&mut self, action: &FilterAction) -> &FilterState {
        self.state = reduce(&self.state, action);
        self.persist();
        &self.state
    }

    /// Apply a "move A to the position of B" event from the drag UI.
    /// Unknown ids and self-moves are no-ops. Returns whether the order
    /// changed. The dispatched payload is derived from the current state,
    /// so it is a permutation by construction.
    pub fn reorder(&mut self, moved_id: i64, target_id: i64) -> bool {
        match move_item(&self.state.selected_ingredients, moved_id, target_id) {
            Some(order) => {
                self.dispatch(&FilterAction::ReorderIngredients(order));
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn query(&self) -> SuggestionQuery {
        SuggestionQuery::from_state(&self.state)
    }

    fn persist(&self) {
        match serde_json::to_string(&self.state) {
            Ok(raw) => {
                if let Err(err) = self.store.save(&raw) {
                    warn!(%err, "failed to persist filter state");
                }
            }
            Err(err) => warn!(%err, "failed to serialize filter state"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Mode;
    use serde_json::json;

    #[test]
    fn test_validate_accepts_full_state() {
        let raw = json!({
            "selectedIngredients": [1, 2, 3],
            "mode": "and",
            "macroMode": "not",
            "maxMissing": 2,
            "selectedMacros": ["sour", "tiki"],
            "showIngredients": true,
        });
        let Validation::Valid(partial) = validate_state(&raw) else {
            panic!("expected valid");
        };
        assert_eq!(partial.selected_ingredients, Some(vec![1, 2, 3]));
        assert_eq!(partial.macro_mode, Some(Mode::Not));
        assert_eq!(partial.max_missing, Some(2));
    }

    #[test]
    fn test_validate_accepts_partial_and_unknown_fields() {
        let raw = json!({"mode": "or", "somethingElse": 42});
        assert!(matches!(validate_state(&raw), Validation::Valid(_)));
    }

    #[test]
    fn test_validate_accepts_loose_max_missing_range() {
        // The UI only produces 0..=3, but stored values up to 10 pass.
        let raw = json!({"maxMissing": 10});
        assert!(matches!(validate_state(&raw), Validation::Valid(_)));
        let raw = json!({"maxMissing": 11});
        assert!(matches!(validate_state(&raw), Validation::Invalid(_)));
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        for raw in [
            json!([1, 2]),
            json!({"mode": "xor"}),
            json!({"macroMode": 3}),
            json!({"selectedIngredients": [1, "two"]}),
            json!({"selectedMacros": ["sour", 7]}),
            json!({"showIngredients": "yes"}),
            json!({"maxMissing": -1}),
        ] {
            assert!(
                matches!(validate_state(&raw), Validation::Invalid(_)),
                "should reject {raw}"
            );
        }
    }

    #[test]
    fn test_validate_treats_null_as_absent() {
        let raw = json!({"mode": null, "maxMissing": 1});
        assert!(matches!(validate_state(&raw), Validation::Valid(_)));
    }

    #[test]
    fn test_migrate_salvages_valid_fields() {
        let raw = json!({
            "selectedIngredients": [1, "junk", 2],
            "mode": "broken",
            "macroMode": "and",
            "maxMissing": 99,
            "selectedMacros": ["sour", 7],
            "showIngredients": true,
        });
        let partial = migrate_state(&raw);
        assert_eq!(partial.selected_ingredients, Some(vec![1, 2]));
        assert_eq!(partial.mode, None);
        assert_eq!(partial.macro_mode, Some(Mode::And));
        assert_eq!(partial.max_missing, None);
        assert_eq!(partial.selected_macros, Some(vec!["sour".to_string()]));
        assert_eq!(partial.show_ingredients, Some(true));
    }

    #[test]
    fn test_migrate_total_on_junk() {
        for raw in [json!(null), json!("garbage"), json!(17), json!([1, 2, 3])] {
            assert!(migrate_state(&raw).is_empty());
        }
    }

    #[test]
    fn test_open_without_stored_state_uses_defaults() {
        let store = FilterStore::open(Box::new(MemoryStore::new()), None);
        assert_eq!(store.state(), &FilterState::default());
    }

    #[test]
    fn test_open_with_valid_stored_state() {
        let raw = r#"{"selectedIngredients":[5],"mode":"or","maxMissing":1}"#;
        let store = FilterStore::open(Box::new(MemoryStore::with_raw(raw)), None);
        assert_eq!(store.state().selected_ingredients, vec![5]);
        assert_eq!(store.state().mode, Mode::Or);
        assert_eq!(store.state().max_missing, 1);
        // Unspecified fields fall back to defaults.
        assert_eq!(store.state().macro_mode, Mode::Or);
    }

    #[test]
    fn test_open_migrates_invalid_stored_state() {
        let raw = r#"{"mode":"broken","maxMissing":2}"#;
        let store = FilterStore::open(Box::new(MemoryStore::with_raw(raw)), None);
        assert_eq!(store.state().mode, Mode::And);
        assert_eq!(store.state().max_missing, 2);
    }

    #[test]
    fn test_open_with_corrupt_json_uses_defaults() {
        let store = FilterStore::open(Box::new(MemoryStore::with_raw("{not json")), None);
        assert_eq!(store.state(), &FilterState::default());
    }

    #[test]
    fn test_overrides_win_over_stored() {
        let raw = r#"{"mode":"or"}"#;
        let overrides = PartialFilterState {
            mode: Some(Mode::Not),
            ..PartialFilterState::default()
        };
        let store = FilterStore::open(Box::new(MemoryStore::with_raw(raw)), Some(overrides));
        assert_eq!(store.state().mode, Mode::Not);
    }

    #[test]
    fn test_dispatch_persists_round_trip() {
        let mut store = FilterStore::open(Box::new(MemoryStore::new()), None);
        store.dispatch(&FilterAction::ToggleIngredient(9));
        store.dispatch(&FilterAction::SetMode(Mode::Not));
        let expected = store.state().clone();

        // A raw copy of the backing slot survives a reopen unchanged.
        let raw = serde_json::to_string(&expected).unwrap();
        let reopened = FilterStore::open(Box::new(MemoryStore::with_raw(&raw)), None);
        assert_eq!(reopened.state(), &expected);
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        struct FailingStore;
        impl StateStore for FailingStore {
            fn load(&self) -> Result<Option<String>> {
                Ok(None)
            }
            fn save(&self, _raw: &str) -> Result<()> {
                anyhow::bail!("quota exceeded")
            }
        }

        let mut store = FilterStore::open(Box::new(FailingStore), None);
        store.dispatch(&FilterAction::ToggleIngredient(1));
        assert_eq!(store.state().selected_ingredients, vec![1]);
    }

    #[test]
    fn test_reorder_moves_and_persists() {
        let mut store = FilterStore::open(Box::new(MemoryStore::new()), None);
        for id in [1, 2, 3] {
            store.dispatch(&FilterAction::ToggleIngredient(id));
        }
        assert!(store.reorder(3, 1));
        assert_eq!(store.state().selected_ingredients, vec![3, 1, 2]);
        assert!(!store.reorder(3, 3));
        assert!(!store.reorder(99, 1));
    }
}
