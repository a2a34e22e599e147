use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::SessionEvent;
use crate::error::{SuggestError, SuggestResult};
use crate::model::CategorizedResults;
use crate::source::SuggestionSource;

/// Identifies one issued fetch. Only the most recent epoch is ever live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestEpoch(u64);

impl RequestEpoch {
    pub const fn get(self) -> u64 {
        self.0
    }
}

struct LiveRequest {
    epoch: RequestEpoch,
    query: String,
    cancel: CancellationToken,
}

/// How a settled fetch must be applied to the session.
#[derive(Debug)]
pub enum Settlement {
    Accepted {
        query: String,
        results: CategorizedResults,
    },
    Failed {
        query: String,
        error: SuggestError,
    },
    /// Superseded or torn down; apply nothing.
    Cancelled,
}

pub struct RequestCoordinator {
    source: Arc<dyn SuggestionSource>,
    next_epoch: u64,
    live: Option<LiveRequest>,
}

impl RequestCoordinator {
    pub fn new(source: Arc<dyn SuggestionSource>) -> Self {
        Self {
            source,
            next_epoch: 0,
            live: None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.live.is_some()
    }

    pub fn live_epoch(&self) -> Option<RequestEpoch> {
        self.live.as_ref().map(|live| live.epoch)
    }

    /// Cancels the previous request, then spawns a fetch for `query`.
    pub fn issue(
        &mut self,
        query: String,
        events: &mpsc::UnboundedSender<SessionEvent>,
    ) -> RequestEpoch {
        self.cancel();

        self.next_epoch = self.next_epoch.wrapping_add(1);
        let epoch = RequestEpoch(self.next_epoch);
        let cancel = CancellationToken::new();

        let source = Arc::clone(&self.source);
        let token = cancel.clone();
        let events = events.clone();
        let task_query = query.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => Err(SuggestError::Cancelled),
                result = source.fetch(&task_query) => result,
            };
            let _ = events.send(SessionEvent::FetchSettled { epoch, outcome });
        });

        tracing::debug!(epoch = epoch.get(), query = %query, "suggestion request issued");
        self.live = Some(LiveRequest {
            epoch,
            query,
            cancel,
        });
        epoch
    }

    pub fn cancel(&mut self) {
        if let Some(live) = self.live.take() {
            live.cancel.cancel();
            tracing::trace!(epoch = live.epoch.get(), query = %live.query, "suggestion request cancelled");
        }
    }

    /// Classifies a completion. Only the live epoch can be accepted or fail;
    /// anything else is `Cancelled`. A cancellation error reported for the
    /// live epoch came from the source itself and counts as a failure.
    pub fn settle(
        &mut self,
        epoch: RequestEpoch,
        outcome: SuggestResult<CategorizedResults>,
    ) -> Settlement {
        if self.live_epoch() != Some(epoch) {
            return Settlement::Cancelled;
        }
        let Some(live) = self.live.take() else {
            return Settlement::Cancelled;
        };

        match outcome {
            Ok(results) => Settlement::Accepted {
                query: live.query,
                results,
            },
            Err(error) => Settlement::Failed {
                query: live.query,
                error,
            },
        }
    }
}

impl Drop for RequestCoordinator {
    fn drop(&mut self) {
        self.cancel();
    }
}
