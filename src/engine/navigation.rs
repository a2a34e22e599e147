use crate::model::{CategorizedResults, NavEntry, Section, SuggestionId};

/// Flattened list derived from the result set plus the selection cursor.
///
/// `cursor == None` is "no selection". The list is always rebuilt from the
/// result set, never edited in place.
#[derive(Debug, Default)]
pub struct NavigationIndex {
    entries: Vec<NavEntry>,
    cursor: Option<usize>,
}

impl NavigationIndex {
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&NavEntry> {
        self.cursor.and_then(|index| self.entries.get(index))
    }

    /// Recomputes the flattened list and clamps the cursor into range.
    pub fn rebuild(&mut self, results: &CategorizedResults) {
        self.entries = results.flatten();
        self.cursor = match self.cursor {
            Some(_) if self.entries.is_empty() => None,
            Some(index) => Some(index.min(self.entries.len() - 1)),
            None => None,
        };
    }

    pub fn move_down(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.cursor = match self.cursor {
            Some(index) if index + 1 < self.entries.len() => Some(index + 1),
            _ => Some(0),
        };
    }

    pub fn move_up(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.cursor = match self.cursor {
            Some(index) if index > 0 => Some(index - 1),
            _ => Some(self.entries.len() - 1),
        };
    }

    pub fn reset(&mut self) {
        self.cursor = None;
    }

    pub fn position_of(&self, section: Section, id: &SuggestionId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.matches(section, id))
    }

    /// Points the cursor at the entry keyed by `(section, id)`.
    /// Returns false and leaves the cursor alone when no entry matches.
    pub fn hover(&mut self, section: Section, id: &SuggestionId) -> bool {
        match self.position_of(section, id) {
            Some(index) => {
                self.cursor = Some(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Suggestion, SuggestionKind};

    fn results(providers: &[i64], services: &[i64]) -> CategorizedResults {
        let mut results = CategorizedResults::empty();
        for id in providers {
            results.providers.push(Suggestion::new(
                *id,
                SuggestionKind::Provider,
                format!("provider {id}"),
            ));
        }
        for id in services {
            results.services.push(Suggestion::new(
                *id,
                SuggestionKind::Service,
                format!("service {id}"),
            ));
        }
        results
    }

    fn index_for(results: &CategorizedResults) -> NavigationIndex {
        let mut index = NavigationIndex::default();
        index.rebuild(results);
        index
    }

    #[test]
    fn arrow_down_starts_at_zero_and_wraps() {
        let mut index = index_for(&results(&[1, 2, 3], &[]));
        index.move_down();
        assert_eq!(index.cursor(), Some(0));
        index.move_down();
        index.move_down();
        assert_eq!(index.cursor(), Some(2));
        index.move_down();
        assert_eq!(index.cursor(), Some(0));
    }

    #[test]
    fn arrow_up_starts_at_last_and_wraps() {
        let mut index = index_for(&results(&[1, 2, 3], &[]));
        index.move_up();
        assert_eq!(index.cursor(), Some(2));
        index.move_up();
        index.move_up();
        assert_eq!(index.cursor(), Some(0));
        index.move_up();
        assert_eq!(index.cursor(), Some(2));
    }

    #[test]
    fn arrows_are_noops_on_empty_list() {
        let mut index = index_for(&CategorizedResults::empty());
        index.move_down();
        assert_eq!(index.cursor(), None);
        index.move_up();
        assert_eq!(index.cursor(), None);
    }

    #[test]
    fn rebuild_clamps_cursor_when_list_shrinks() {
        let mut index = index_for(&results(&[1, 2, 3], &[4]));
        index.move_up();
        assert_eq!(index.cursor(), Some(3));

        index.rebuild(&results(&[1], &[]));
        assert_eq!(index.cursor(), Some(0));

        index.rebuild(&CategorizedResults::empty());
        assert_eq!(index.cursor(), None);
    }

    #[test]
    fn hover_matches_section_and_id_not_id_alone() {
        let mut index = index_for(&results(&[7, 8], &[7]));
        assert!(index.hover(Section::Services, &SuggestionId::Number(7)));
        assert_eq!(index.cursor(), Some(2));
        assert_eq!(index.current().unwrap().section, Section::Services);

        assert!(index.hover(Section::Providers, &SuggestionId::Number(7)));
        assert_eq!(index.cursor(), Some(0));
    }

    #[test]
    fn hover_on_unknown_entry_keeps_cursor() {
        let mut index = index_for(&results(&[1, 2], &[]));
        index.move_down();
        assert!(!index.hover(Section::Locations, &SuggestionId::Number(1)));
        assert_eq!(index.cursor(), Some(0));
    }
}
