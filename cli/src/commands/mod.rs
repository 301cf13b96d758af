mod barcode;
mod filters;
mod helpers;
mod shopping;
mod suggest;
mod synonyms;

use anyhow::Result;
use tracing::warn;

use barkeep_core::models::Synonym;
use barkeep_core::synonyms::SynonymTable;

pub(crate) use barcode::cmd_barcode;
pub(crate) use filters::{
    cmd_filters_macro, cmd_filters_macro_mode, cmd_filters_max_missing, cmd_filters_mode,
    cmd_filters_move, cmd_filters_reset, cmd_filters_show, cmd_filters_show_ingredients,
    cmd_filters_toggle,
};
pub(crate) use shopping::cmd_shopping;
pub(crate) use suggest::cmd_suggest;
pub(crate) use synonyms::{
    cmd_synonyms_add, cmd_synonyms_delete, cmd_synonyms_import, cmd_synonyms_list,
};

/// Build a synonym table from a fetch result, degrading to an empty table so
/// the command can still render with raw names.
pub(super) fn fetch_table(fetched: Result<Vec<Synonym>>, what: &str) -> SynonymTable {
    match fetched {
        Ok(entries) => SynonymTable::from_entries(&entries),
        Err(err) => {
            warn!(%err, "failed to fetch {what}, continuing without");
            SynonymTable::new()
        }
    }
}
