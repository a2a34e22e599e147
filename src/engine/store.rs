use crate::model::CategorizedResults;

/// Every write bumps `revision`, so callers can observe whether anything
/// touched the store.
#[derive(Debug, Default)]
pub struct SuggestionStore {
    results: CategorizedResults,
    committed_for: Option<String>,
    loading: bool,
    revision: u64,
}

impl SuggestionStore {
    pub fn results(&self) -> &CategorizedResults {
        &self.results
    }

    /// Query the current results were committed for; `None` after a clear.
    pub fn committed_for(&self) -> Option<&str> {
        self.committed_for.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn commit(&mut self, query: impl Into<String>, results: CategorizedResults) {
        self.results = results;
        self.committed_for = Some(query.into());
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        self.results = CategorizedResults::empty();
        self.committed_for = None;
        self.revision += 1;
    }

    pub fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.revision += 1;
        }
    }
}
