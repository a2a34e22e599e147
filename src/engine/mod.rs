//! Typeahead suggestion engine.
//!
//! A [`SearchSession`] owns every piece of per-box state: the query, the
//! debounce timer, the in-flight request, the result store, the navigation
//! cursor and the dismissal watcher. Timers and requests run as spawned tasks
//! that report back over the session's event channel; the session applies
//! those events one at a time, so all mutation happens on the session's side.
//!
//! Superseded timers and requests are cancelled when replaced, when the
//! dropdown closes and on teardown. Their late messages are classified and
//! dropped without touching the store.

mod debounce;
mod dismissal;
mod navigation;
mod query;
mod request;
mod store;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::SuggestResult;
use crate::model::{CategorizedResults, NavEntry, Section, SelectedSuggestion, SuggestionId};
use crate::source::SuggestionSource;

pub use debounce::{DEFAULT_DEBOUNCE, DebounceScheduler};
pub use dismissal::{DismissalWatcher, PointerTarget};
pub use navigation::NavigationIndex;
pub use query::{MIN_QUERY_CHARS, QueryStore, is_searchable};
pub use request::{RequestCoordinator, RequestEpoch, Settlement};
pub use store::SuggestionStore;

#[derive(Debug)]
pub enum SessionEvent {
    DebounceElapsed {
        generation: u64,
    },
    FetchSettled {
        epoch: RequestEpoch,
        outcome: SuggestResult<CategorizedResults>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownState {
    Closed,
    OpenEmpty,
    OpenLoading,
    OpenResults,
    OpenNoResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub debounce: Duration,
    pub placeholder: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            placeholder: "Search providers, services, categories, or locations".to_string(),
        }
    }
}

type SelectCallback = Box<dyn FnMut(SelectedSuggestion) + Send>;

pub struct SearchSession {
    config: EngineConfig,
    query: QueryStore,
    store: SuggestionStore,
    navigation: NavigationIndex,
    dismissal: DismissalWatcher,
    debounce: DebounceScheduler,
    requests: RequestCoordinator,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    on_select: SelectCallback,
    torn_down: bool,
}

impl SearchSession {
    /// Must be called from within a tokio runtime; timers and requests are
    /// spawned onto it.
    pub fn new<F>(config: EngineConfig, source: Arc<dyn SuggestionSource>, on_select: F) -> Self
    where
        F: FnMut(SelectedSuggestion) + Send + 'static,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            debounce: DebounceScheduler::new(config.debounce),
            config,
            query: QueryStore::default(),
            store: SuggestionStore::default(),
            navigation: NavigationIndex::default(),
            dismissal: DismissalWatcher::default(),
            requests: RequestCoordinator::new(source),
            events_tx,
            events_rx,
            on_select: Box::new(on_select),
            torn_down: false,
        }
    }
}

impl SearchSession {
    pub fn query_text(&self) -> &str {
        self.query.text()
    }

    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    pub fn is_open(&self) -> bool {
        self.query.is_open()
    }

    pub fn is_focused(&self) -> bool {
        self.query.is_focused()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn results(&self) -> &CategorizedResults {
        self.store.results()
    }

    pub fn entries(&self) -> &[NavEntry] {
        self.navigation.entries()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.navigation.cursor()
    }

    pub fn selected_entry(&self) -> Option<&NavEntry> {
        self.navigation.current()
    }

    /// Number of writes the suggestion store has seen.
    pub fn store_revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// True while a timer or request may still produce an event.
    pub fn has_pending_work(&self) -> bool {
        !self.torn_down && (self.debounce.is_pending() || self.requests.is_in_flight())
    }

    pub fn dropdown_state(&self) -> DropdownState {
        if !self.query.is_open() {
            return DropdownState::Closed;
        }
        if !self.query.is_searchable() {
            return DropdownState::OpenEmpty;
        }
        if self.store.is_loading() || self.debounce.is_pending() {
            return DropdownState::OpenLoading;
        }
        if self.navigation.is_empty() {
            DropdownState::OpenNoResults
        } else {
            DropdownState::OpenResults
        }
    }
}

impl SearchSession {
    pub fn focus(&mut self) {
        if self.torn_down {
            return;
        }
        self.query.focus();
        if self.query.is_open() {
            return;
        }
        self.open_dropdown();
        let stale = self.store.committed_for() != Some(self.query.text());
        if self.query.is_searchable() && stale {
            self.on_query_changed();
        }
    }

    pub fn input_changed(&mut self, text: impl Into<String>) {
        if self.torn_down {
            return;
        }
        self.query.set_text(text);
        self.query.focus();
        self.open_dropdown();
        self.on_query_changed();
    }

    pub fn key(&mut self, key: NavKey) {
        if self.torn_down {
            return;
        }
        match key {
            NavKey::ArrowDown if self.query.is_open() => self.navigation.move_down(),
            NavKey::ArrowUp if self.query.is_open() => self.navigation.move_up(),
            NavKey::Enter if self.query.is_open() => {
                if let Some(entry) = self.navigation.current().cloned() {
                    self.select(entry);
                }
            }
            NavKey::Escape => {
                self.close_dropdown();
                self.query.blur();
            }
            _ => {}
        }
    }

    /// Moves the cursor to the hovered entry, keyed by `(section, id)`.
    pub fn hover(&mut self, section: Section, id: &SuggestionId) {
        if self.torn_down || !self.query.is_open() {
            return;
        }
        self.navigation.hover(section, id);
    }

    pub fn pointer_down(&mut self, target: PointerTarget) {
        if self.torn_down {
            return;
        }
        if self.dismissal.observe(target) {
            tracing::debug!("dropdown dismissed by outside interaction");
            self.close_dropdown();
        }
    }

    /// Commits `entry`: shows its name, closes the dropdown and hands the
    /// suggestion to the selection callback.
    pub fn select(&mut self, entry: NavEntry) {
        if self.torn_down {
            return;
        }
        self.query.set_text(entry.suggestion.name.clone());
        self.close_dropdown();
        tracing::debug!(section = %entry.section, id = %entry.suggestion.id, "suggestion selected");
        (self.on_select)(SelectedSuggestion::from(entry));
    }

    fn on_query_changed(&mut self) {
        if !self.query.is_searchable() {
            self.debounce.cancel();
            self.requests.cancel();
            self.store.clear();
            self.store.set_loading(false);
            self.navigation.rebuild(self.store.results());
            return;
        }
        self.debounce.schedule(&self.events_tx);
    }

    fn open_dropdown(&mut self) {
        self.query.open();
        self.dismissal.arm();
    }

    fn close_dropdown(&mut self) {
        self.query.close();
        self.navigation.reset();
        self.dismissal.disarm();
        self.debounce.cancel();
        self.requests.cancel();
        self.store.set_loading(false);
    }
}

impl SearchSession {
    /// Waits for the next background event and applies it.
    ///
    /// Returns `None` once the session is torn down. Cancel-safe: an event is
    /// only applied after it has been received.
    pub async fn process_next(&mut self) -> Option<()> {
        if self.torn_down {
            return None;
        }
        let event = self.events_rx.recv().await?;
        self.handle_event(event);
        Some(())
    }

    /// Processes events until no timer or request is outstanding.
    pub async fn run_until_idle(&mut self) {
        while self.has_pending_work() {
            if self.process_next().await.is_none() {
                break;
            }
        }
    }

    pub fn handle_event(&mut self, event: SessionEvent) {
        if self.torn_down {
            return;
        }
        match event {
            SessionEvent::DebounceElapsed { generation } => {
                if !self.debounce.accept(generation) {
                    tracing::trace!(generation, "stale debounce timer ignored");
                    return;
                }
                if !self.query.is_searchable() {
                    return;
                }
                let query = self.query.text().to_string();
                self.store.set_loading(true);
                self.requests.issue(query, &self.events_tx);
            }
            SessionEvent::FetchSettled { epoch, outcome } => {
                match self.requests.settle(epoch, outcome) {
                    Settlement::Cancelled => {
                        tracing::trace!(epoch = epoch.get(), "cancelled request settled");
                    }
                    Settlement::Accepted { query, results } => {
                        tracing::debug!(query = %query, count = results.len(), "suggestions accepted");
                        self.store.commit(query, results);
                        self.store.set_loading(false);
                        self.navigation.rebuild(self.store.results());
                    }
                    Settlement::Failed { query, error } => {
                        tracing::warn!(query = %query, error = %error, "suggestion request failed");
                        self.store.commit(query, CategorizedResults::empty());
                        self.store.set_loading(false);
                        self.navigation.rebuild(self.store.results());
                    }
                }
            }
        }
    }

    /// Cancels the timer and request and stops accepting events. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.debounce.cancel();
        self.requests.cancel();
        self.dismissal.disarm();
        self.events_rx.close();
        self.torn_down = true;
        tracing::debug!("search session torn down");
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
