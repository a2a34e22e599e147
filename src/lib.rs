//! Typeahead search-suggestion engine for a provider directory.
//!
//! The engine debounces input, keeps at most one suggestion request in
//! flight, merges the four categorized buckets (providers, services,
//! categories, locations) into one navigable list and drives keyboard and
//! pointer selection. See [`engine::SearchSession`].

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod source;

pub use engine::{DropdownState, EngineConfig, NavKey, PointerTarget, SearchSession};
pub use error::{SuggestError, SuggestResult};
pub use model::{CategorizedResults, NavEntry, Section, SelectedSuggestion, Suggestion, SuggestionId, SuggestionKind};
pub use source::{HttpSourceConfig, HttpSuggestionSource, SuggestionSource};
