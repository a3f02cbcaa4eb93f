//! Debounced request coordinator
//!
//! Turns a stream of raw text-change events into at most one in-flight
//! translation per settled input. Every keystroke supersedes the pending
//! debounce timer; a fired timer re-reads the live text, tags the request
//! with a strictly increasing id, and the result is delivered only if that
//! id is still the latest issued one. In-flight network calls are never
//! aborted; abandoned answers are computed to completion and dropped here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use crate::core::gateway::{TranslateBackend, TranslationGateway, TranslationResult};

/// Delay after the last input change before a translation is issued.
pub const QUIET_PERIOD: Duration = Duration::from_millis(400);

/// A coordinator result, tagged with the request it answers.
#[derive(Debug, Clone, Serialize)]
pub struct Delivery {
    pub request_id: u64,
    pub result: TranslationResult,
}

/// Receives coordinator output. Implemented by the popup shell (event
/// emission) and by tests (recording).
pub trait ResultSink: Send + Sync + 'static {
    /// The input settled on empty text; any shown result should be cleared.
    fn on_cleared(&self);

    /// An authoritative result for the latest issued request.
    fn on_delivery(&self, delivery: Delivery);
}

pub struct TranslateCoordinator<B: TranslateBackend + 'static, S: ResultSink> {
    inner: Arc<Inner<B, S>>,
}

impl<B: TranslateBackend + 'static, S: ResultSink> Clone for TranslateCoordinator<B, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<B: TranslateBackend, S: ResultSink> {
    gateway: TranslationGateway<B>,
    sink: S,
    quiet_period: Duration,
    live_text: Mutex<String>,
    // Bumped on every text-change event; a pending timer whose generation no
    // longer matches was superseded and must not fire.
    change_gen: AtomicU64,
    request_seq: AtomicU64,
    latest_issued: AtomicU64,
}

impl<B: TranslateBackend + 'static, S: ResultSink> TranslateCoordinator<B, S> {
    pub fn new(gateway: TranslationGateway<B>, sink: S) -> Self {
        Self::with_quiet_period(gateway, sink, QUIET_PERIOD)
    }

    pub fn with_quiet_period(gateway: TranslationGateway<B>, sink: S, quiet_period: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                sink,
                quiet_period,
                live_text: Mutex::new(String::new()),
                change_gen: AtomicU64::new(0),
                request_seq: AtomicU64::new(0),
                latest_issued: AtomicU64::new(0),
            }),
        }
    }

    /// Feed one raw text-change event carrying the full input field content.
    ///
    /// Must be called from within the async runtime; the debounce timer is a
    /// spawned task, not a thread.
    pub fn text_changed(&self, text: &str) {
        *self
            .inner
            .live_text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = text.to_string();
        let generation = self.inner.change_gen.fetch_add(1, Ordering::SeqCst) + 1;

        if text.trim().is_empty() {
            self.inner.sink.on_cleared();
            return;
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.quiet_period).await;
            if inner.change_gen.load(Ordering::SeqCst) != generation {
                // A newer event re-armed the timer.
                return;
            }

            // Fire with the live text, not the value captured when the timer
            // was armed.
            let text = inner
                .live_text
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .trim()
                .to_string();
            if text.is_empty() {
                return;
            }

            let request_id = inner.request_seq.fetch_add(1, Ordering::SeqCst) + 1;
            inner.latest_issued.store(request_id, Ordering::SeqCst);

            let result = inner.gateway.translate(&text).await;

            if inner.latest_issued.load(Ordering::SeqCst) != request_id {
                println!("[Coordinator] Dropping stale result for request {}", request_id);
                return;
            }
            inner.sink.on_delivery(Delivery { request_id, result });
        });
    }

    /// Translate `text` right away, skipping the quiet period. Bound to
    /// Enter in the popup. Supersedes any pending timer; the result still
    /// carries a request id and passes the same staleness filter.
    pub fn translate_now(&self, text: &str) {
        *self
            .inner
            .live_text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = text.to_string();
        self.inner.change_gen.fetch_add(1, Ordering::SeqCst);

        let trimmed = text.trim().to_string();
        if trimmed.is_empty() {
            self.inner.sink.on_cleared();
            return;
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let request_id = inner.request_seq.fetch_add(1, Ordering::SeqCst) + 1;
            inner.latest_issued.store(request_id, Ordering::SeqCst);

            let result = inner.gateway.translate(&trimmed).await;

            if inner.latest_issued.load(Ordering::SeqCst) != request_id {
                println!("[Coordinator] Dropping stale result for request {}", request_id);
                return;
            }
            inner.sink.on_delivery(Delivery { request_id, result });
        });
    }

    /// Invalidate pending timers and anything still in flight, so results
    /// from a previous popup session never surface after a re-show.
    pub fn reset(&self) {
        self.inner.change_gen.fetch_add(1, Ordering::SeqCst);
        let sentinel = self.inner.request_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.latest_issued.store(sentinel, Ordering::SeqCst);
        self.inner
            .live_text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::AppResult;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Backend whose translate latency is scripted per input text.
    struct DelayBackend {
        delays: Vec<(&'static str, Duration)>,
        translate_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TranslateBackend for DelayBackend {
        async fn detect(&self, _text: &str) -> AppResult<Option<String>> {
            Ok(Some("en".to_string()))
        }

        async fn translate(&self, text: &str, _source: &str, target: &str) -> AppResult<String> {
            self.translate_calls.fetch_add(1, Ordering::SeqCst);
            if let Some((_, delay)) = self.delays.iter().find(|(t, _)| *t == text) {
                tokio::time::sleep(*delay).await;
            }
            Ok(format!("{}:{}", target, text))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        cleared: Arc<AtomicUsize>,
        deliveries: Arc<Mutex<Vec<Delivery>>>,
    }

    impl ResultSink for RecordingSink {
        fn on_cleared(&self) {
            self.cleared.fetch_add(1, Ordering::SeqCst);
        }

        fn on_delivery(&self, delivery: Delivery) {
            self.deliveries.lock().unwrap().push(delivery);
        }
    }

    fn coordinator(
        delays: Vec<(&'static str, Duration)>,
    ) -> (
        TranslateCoordinator<DelayBackend, RecordingSink>,
        RecordingSink,
        Arc<AtomicUsize>,
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = DelayBackend {
            delays,
            translate_calls: Arc::clone(&calls),
        };
        let sink = RecordingSink::default();
        let gateway = TranslationGateway::new(backend, "tr");
        (
            TranslateCoordinator::new(gateway, sink.clone()),
            sink,
            calls,
        )
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_coalesce_into_one_call() {
        let (coordinator, sink, calls) = coordinator(Vec::new());

        // t=0 "h", t=50 "he", t=450 "hel" — each within the quiet period of
        // the previous event, so only the last timer survives.
        coordinator.text_changed("h");
        advance(50).await;
        coordinator.text_changed("he");
        advance(400).await;
        coordinator.text_changed("hel");
        advance(1000).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let deliveries = sink.deliveries.lock().unwrap();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].result.translated, "tr:hel");
    }

    #[tokio::test(start_paused = true)]
    async fn stale_slow_result_is_dropped() {
        let (coordinator, sink, _calls) = coordinator(vec![
            ("slow", Duration::from_millis(1600)),
            ("fast", Duration::from_millis(200)),
        ]);

        // R1 issued at t=400, completes at t=2000. R2 issued at t=900,
        // completes at t=1100. Only R2 may be displayed.
        coordinator.text_changed("slow");
        advance(500).await;
        coordinator.text_changed("fast");
        advance(3000).await;

        let deliveries = sink.deliveries.lock().unwrap();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].result.translated, "tr:fast");
        assert_eq!(deliveries[0].request_id, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn results_arrive_with_increasing_request_ids() {
        let (coordinator, sink, _calls) = coordinator(Vec::new());

        coordinator.text_changed("one");
        advance(1000).await;
        coordinator.text_changed("two");
        advance(1000).await;

        let deliveries = sink.deliveries.lock().unwrap();
        assert_eq!(deliveries.len(), 2);
        assert!(deliveries[0].request_id < deliveries[1].request_id);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_clears_and_cancels_the_pending_timer() {
        let (coordinator, sink, calls) = coordinator(Vec::new());

        coordinator.text_changed("hi");
        advance(100).await;
        coordinator.text_changed("");
        advance(1000).await;

        assert_eq!(sink.cleared.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(sink.deliveries.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn whitespace_only_text_counts_as_empty() {
        let (coordinator, sink, calls) = coordinator(Vec::new());

        coordinator.text_changed("   \t");
        advance(1000).await;

        assert_eq!(sink.cleared.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_results_are_delivered_like_successes() {
        let mut backend = crate::core::gateway::tests::MockBackend::detecting("en");
        backend.translate_fails = true;
        let sink = RecordingSink::default();
        let gateway = TranslationGateway::new(backend, "tr");
        let coordinator = TranslateCoordinator::new(gateway, sink.clone());

        coordinator.text_changed("hello");
        advance(1000).await;

        let deliveries = sink.deliveries.lock().unwrap();
        assert_eq!(deliveries.len(), 1);
        assert!(!deliveries[0].result.success);
        assert!(deliveries[0].result.error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn enter_translates_immediately_and_cancels_the_pending_timer() {
        let (coordinator, sink, calls) = coordinator(Vec::new());

        // "hel" arms a timer for t=450; Enter at t=50 fires right away and
        // must supersede it.
        coordinator.text_changed("hel");
        advance(50).await;
        coordinator.translate_now("hello");
        advance(1).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        {
            let deliveries = sink.deliveries.lock().unwrap();
            assert_eq!(deliveries.len(), 1);
            assert_eq!(deliveries[0].result.translated, "tr:hello");
        }

        // The superseded timer never fires.
        advance(2000).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_result_is_dropped_when_superseded() {
        let (coordinator, sink, _calls) = coordinator(vec![
            ("slow", Duration::from_millis(1600)),
            ("fast", Duration::from_millis(200)),
        ]);

        // Enter fires "slow" at t=0 (completes t=1600); typing continues and
        // "fast" is issued at t=500 (completes t=700). Only "fast" surfaces.
        coordinator.translate_now("slow");
        advance(100).await;
        coordinator.text_changed("fast");
        advance(3000).await;

        let deliveries = sink.deliveries.lock().unwrap();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].result.translated, "tr:fast");
    }

    #[tokio::test(start_paused = true)]
    async fn enter_on_empty_text_only_clears() {
        let (coordinator, sink, calls) = coordinator(Vec::new());

        coordinator.translate_now("   ");
        advance(1000).await;

        assert_eq!(sink.cleared.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_drops_results_issued_before_it() {
        let (coordinator, sink, _calls) = coordinator(vec![("slow", Duration::from_millis(1600))]);

        coordinator.text_changed("slow");
        advance(600).await; // issued at t=400, now in flight
        coordinator.reset();
        advance(3000).await;

        assert!(sink.deliveries.lock().unwrap().is_empty());
    }
}
