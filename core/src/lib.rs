//! Core engine for barkeep: ingredient-synonym canonicalization,
//! shopping-list quantity aggregation, and the persisted filter state that
//! drives cocktail suggestion queries. Everything here is synchronous and
//! I/O-free; hosts inject a [`persist::StateStore`] and a
//! [`service::BarApi`] provider.

pub mod aggregate;
pub mod cache;
pub mod debounce;
pub mod filter;
pub mod models;
pub mod persist;
pub mod reorder;
pub mod service;
pub mod synonyms;
