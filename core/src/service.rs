use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::warn;

use crate::aggregate::aggregate_with_units;
use crate::cache::TtlCache;
use crate::debounce::Debouncer;
use crate::filter::{FilterAction, FilterState, PartialFilterState, SuggestionQuery};
use crate::models::{
    AggregatedLine, BarcodeProduct, Ingredient, RecipeMultipliers, RecipeSummary,
    ShoppingListLine, Synonym,
};
use crate::persist::{FilterStore, StateStore};
use crate::synonyms::{SynonymTable, match_ingredient};

/// The external REST collaborator, shape-only. The CLI implements this with
/// reqwest; tests use an in-memory fake.
pub trait BarApi {
    fn fetch_synonyms(&self) -> Result<Vec<Synonym>>;
    fn fetch_unit_synonyms(&self) -> Result<Vec<Synonym>>;
    fn fetch_shopping_list(&self) -> Result<Vec<ShoppingListLine>>;
    fn fetch_ingredients(&self) -> Result<Vec<Ingredient>>;
    fn fetch_suggestions(&self, query: &SuggestionQuery) -> Result<Vec<RecipeSummary>>;
    /// Bulk import of a flat `{alias: canonical}` map.
    fn import_synonyms(&self, mapping: &HashMap<String, String>) -> Result<()>;
    fn lookup_barcode(&self, code: &str) -> Result<Option<BarcodeProduct>>;
}

const BARCODE_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Single-threaded facade over the whole core: read-only snapshots of the
/// server data, the persisted filter store, recipe multipliers, and the
/// debounced suggestion pipeline. Hosts (CLI, server handler, UI loop) call
/// refresh explicitly; there is no lifecycle hook magic.
pub struct BarService {
    provider: Box<dyn BarApi>,
    synonyms: SynonymTable,
    unit_synonyms: SynonymTable,
    ingredients: Vec<Ingredient>,
    lines: Vec<ShoppingListLine>,
    multipliers: RecipeMultipliers,
    filters: FilterStore,
    debouncer: Debouncer<SuggestionQuery>,
    barcode_cache: TtlCache<String, Option<BarcodeProduct>>,
}

impl BarService {
    pub fn new(
        provider: Box<dyn BarApi>,
        store: Box<dyn StateStore>,
        overrides: Option<PartialFilterState>,
    ) -> Self {
        Self {
            provider,
            synonyms: SynonymTable::new(),
            unit_synonyms: SynonymTable::new(),
            ingredients: Vec::new(),
            lines: Vec::new(),
            multipliers: RecipeMultipliers::new(),
            filters: FilterStore::open(store, overrides),
            debouncer: Debouncer::default(),
            barcode_cache: TtlCache::new(BARCODE_CACHE_TTL),
        }
    }

    // --- Snapshot refresh (wholesale, degrade-to-empty on failure) ---

    pub fn refresh_synonyms(&mut self) {
        self.synonyms = match self.provider.fetch_synonyms() {
            Ok(entries) => SynonymTable::from_entries(&entries),
            Err(err) => {
                warn!(%err, "failed to fetch ingredient synonyms, continuing without");
                SynonymTable::new()
            }
        };
    }

    pub fn refresh_unit_synonyms(&mut self) {
        self.unit_synonyms = match self.provider.fetch_unit_synonyms() {
            Ok(entries) => SynonymTable::from_entries(&entries),
            Err(err) => {
                warn!(%err, "failed to fetch unit synonyms, continuing without");
                SynonymTable::new()
            }
        };
    }

    pub fn refresh_shopping_list(&mut self) {
        self.lines = match self.provider.fetch_shopping_list() {
            Ok(lines) => lines,
            Err(err) => {
                warn!(%err, "failed to fetch shopping list, showing empty");
                Vec::new()
            }
        };
    }

    pub fn refresh_ingredients(&mut self) {
        self.ingredients = match self.provider.fetch_ingredients() {
            Ok(ingredients) => ingredients,
            Err(err) => {
                warn!(%err, "failed to fetch ingredients, showing empty");
                Vec::new()
            }
        };
    }

    pub fn refresh_all(&mut self) {
        self.refresh_synonyms();
        self.refresh_unit_synonyms();
        self.refresh_shopping_list();
        self.refresh_ingredients();
    }

    #[must_use]
    pub fn synonym_table(&self) -> &SynonymTable {
        &self.synonyms
    }

    #[must_use]
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    #[must_use]
    pub fn shopping_lines(&self) -> &[ShoppingListLine] {
        &self.lines
    }

    // --- Shopping list ---

    #[must_use]
    pub fn shopping_list(&self) -> Vec<AggregatedLine> {
        aggregate_with_units(
            &self.lines,
            &self.synonyms,
            Some(&self.unit_synonyms),
            &self.multipliers,
        )
    }

    pub fn set_multiplier(&mut self, recipe_key: &str, times: u32) -> Result<()> {
        self.multipliers.set(recipe_key, times)
    }

    #[must_use]
    pub fn multipliers(&self) -> &RecipeMultipliers {
        &self.multipliers
    }

    // --- Filters & suggestions ---

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        self.filters.state()
    }

    /// Route a filter mutation through the reducer, persist it, and arm the
    /// debouncer with the freshly derived query.
    pub fn dispatch_filter(&mut self, action: &FilterAction, now: Instant) {
        self.filters.dispatch(action);
        self.debouncer.update(self.filters.query(), now);
    }

    /// Apply a drag-reorder event. Arms the debouncer only when the order
    /// actually changed.
    pub fn reorder_selection(&mut self, moved_id: i64, target_id: i64, now: Instant) -> bool {
        let changed = self.filters.reorder(moved_id, target_id);
        if changed {
            self.debouncer.update(self.filters.query(), now);
        }
        changed
    }

    /// Fire the suggestion query if the debounce window has elapsed.
    /// `None` means nothing was due; a provider failure degrades to an
    /// empty result list.
    pub fn poll_suggestions(&mut self, now: Instant) -> Option<Vec<RecipeSummary>> {
        let query = self.debouncer.poll(now)?;
        Some(self.run_query(&query))
    }

    /// One-shot query from the current filter state, bypassing the
    /// debouncer (and cancelling anything it holds).
    pub fn suggest_now(&mut self) -> Vec<RecipeSummary> {
        self.debouncer.cancel();
        let query = self.filters.query();
        self.run_query(&query)
    }

    fn run_query(&self, query: &SuggestionQuery) -> Vec<RecipeSummary> {
        match self.provider.fetch_suggestions(query) {
            Ok(recipes) => recipes,
            Err(err) => {
                warn!(%err, "suggestion query failed, showing no results");
                Vec::new()
            }
        }
    }

    // --- Synonym administration ---

    /// Parse and submit a bulk synonym import. A malformed payload is
    /// rejected wholesale; nothing is applied partially.
    pub fn import_synonyms_json(&mut self, raw: &str) -> Result<usize> {
        let mapping: HashMap<String, String> = serde_json::from_str(raw)
            .context("Invalid synonym import payload. Expected a flat {\"alias\": \"canonical\"} object")?;
        self.provider.import_synonyms(&mapping)?;
        for (alias, canonical) in &mapping {
            self.synonyms.insert(alias, canonical);
        }
        Ok(mapping.len())
    }

    // --- Barcode ---

    /// Look up a barcode (through the TTL cache) and match its product
    /// keywords against the known ingredients, first hit wins.
    pub fn match_barcode(&mut self, code: &str) -> Result<Option<Ingredient>> {
        let product = match self.barcode_cache.get(&code.to_string()) {
            Some(cached) => cached,
            None => {
                let fetched = self.provider.lookup_barcode(code)?;
                self.barcode_cache.insert(code.to_string(), fetched.clone());
                fetched
            }
        };
        let Some(product) = product else {
            return Ok(None);
        };
        Ok(match_ingredient(&self.synonyms, &product.keywords(), &self.ingredients).cloned())
    }
}
