//! Shared test fixtures: an in-process cascade backend that records every
//! request, and a listener that records apply/clear notifications.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use sluice::{
    BaseOptions, CascadeBackend, CascadeOption, CascadeParams, CascadeResolver, Config,
    FilterCategory, FilterSessionController, OptionSets, Result, SluiceError,
};

/// Backend double: returns a canned response after an optional delay,
/// counting calls and recording the parameters of each request.
pub struct RecordingBackend {
    pub response: Mutex<OptionSets>,
    pub base: BaseOptions,
    pub delay: Duration,
    pub fail: AtomicBool,
    calls: AtomicUsize,
    seen: Mutex<Vec<CascadeParams>>,
}

impl RecordingBackend {
    pub fn new(response: OptionSets) -> Self {
        Self {
            response: Mutex::new(response),
            base: BaseOptions::default(),
            delay: Duration::ZERO,
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<CascadeParams> {
        self.seen.lock().last().copied()
    }
}

#[async_trait]
impl CascadeBackend for RecordingBackend {
    async fn cascade_options(&self, params: &CascadeParams) -> Result<OptionSets> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(*params);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(SluiceError::Api("backend unavailable".to_string()));
        }
        Ok(self.response.lock().clone())
    }

    async fn base_options(&self) -> Result<BaseOptions> {
        Ok(self.base.clone())
    }
}

/// A response carrying plausible lists for several categories.
pub fn sample_response() -> OptionSets {
    OptionSets {
        branches: vec![CascadeOption::new(7, "Pune"), CascadeOption::new(9, "Mumbai")],
        team_leads: vec![CascadeOption::new(41, "Asha"), CascadeOption::new(42, "Ravi")],
        rms: vec![CascadeOption::new(61, "Kiran")],
        dealers: vec![CascadeOption::new(3, "Apex Auto")],
        lenders: vec![CascadeOption::new(5, "Crestline")],
        ..Default::default()
    }
}

/// Build a controller over `backend`, with the name cache pre-seeded from
/// `sample_response` so selections resolve to IDs without a seed round-trip.
pub fn session_over(
    backend: Arc<RecordingBackend>,
    config: &Config,
) -> (Arc<CascadeResolver>, FilterSessionController) {
    let resolver = Arc::new(CascadeResolver::new(backend, config.cache_ttl()));
    for category in sluice::CASCADING_CATEGORIES {
        resolver
            .names()
            .merge(*category, sample_response().get(*category));
    }
    let session = FilterSessionController::new(Arc::clone(&resolver), config);
    (resolver, session)
}

pub type Notifications = Arc<Mutex<Vec<(FilterCategory, Vec<String>)>>>;

/// Listener that appends every notification to a shared log.
pub fn recording_listener() -> (
    Notifications,
    impl Fn(FilterCategory, &[String]) + Send + Sync + 'static,
) {
    let log: Notifications = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let listener = move |category: FilterCategory, values: &[String]| {
        sink.lock().push((category, values.to_vec()));
    };
    (log, listener)
}

/// Let spawned debounce tasks run to completion under the paused clock.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
