pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct QueryStore {
    text: String,
    open: bool,
    focused: bool,
}

impl QueryStore {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Length is counted in chars so multi-byte input triggers like ASCII.
    pub fn is_searchable(&self) -> bool {
        is_searchable(&self.text)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }
}

pub fn is_searchable(text: &str) -> bool {
    text.chars().count() >= MIN_QUERY_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_length_counts_chars() {
        assert!(!is_searchable(""));
        assert!(!is_searchable("p"));
        assert!(!is_searchable("é"));
        assert!(is_searchable("pl"));
        assert!(is_searchable("éa"));
    }
}
