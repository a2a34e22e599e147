use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::SessionEvent;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

struct PendingTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Restartable quiescence timer.
///
/// Each schedule aborts the previous timer task and bumps the generation, so
/// an elapsed message from a superseded timer is rejected by `accept` even if
/// it was already queued.
pub struct DebounceScheduler {
    delay: Duration,
    generation: u64,
    pending: Option<PendingTimer>,
}

impl DebounceScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn schedule(&mut self, events: &mpsc::UnboundedSender<SessionEvent>) -> u64 {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let delay = self.delay;
        let events = events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(SessionEvent::DebounceElapsed { generation });
        });
        self.pending = Some(PendingTimer { generation, handle });
        generation
    }

    pub fn cancel(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.handle.abort();
            tracing::trace!(generation = timer.generation, "debounce timer cancelled");
        }
    }

    /// Consumes the pending timer if `generation` is the live one.
    pub fn accept(&mut self, generation: u64) -> bool {
        match &self.pending {
            Some(timer) if timer.generation == generation => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_quiescence() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = DebounceScheduler::new(Duration::from_millis(300));

        scheduler.schedule(&tx);
        tokio::time::advance(Duration::from_millis(200)).await;
        let last = scheduler.schedule(&tx);
        tokio::time::advance(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err(), "timer must not fire before quiescence");

        match rx.recv().await {
            Some(SessionEvent::DebounceElapsed { generation }) => {
                assert_eq!(generation, last);
                assert!(scheduler.accept(generation));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(!scheduler.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = DebounceScheduler::new(Duration::from_millis(300));

        scheduler.schedule(&tx);
        scheduler.cancel();
        tokio::time::advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn stale_generation_is_rejected() {
        let mut scheduler = DebounceScheduler::new(DEFAULT_DEBOUNCE);
        assert!(!scheduler.accept(1));
    }
}
