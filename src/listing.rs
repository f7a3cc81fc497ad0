//! Listing view state: the current filter, the last page, and the error banner.
//!
//! Loads are sequenced: every `load` takes a ticket and its response is only
//! applied while that ticket is still the newest one, so a slow response for
//! an old filter can never overwrite fresher results.

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::FetchError;
use crate::models::{Page, Property};
use crate::source::{Filter, PropertySource};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingState {
    pub filter: Filter,
    /// Last successfully loaded page, kept while a later load fails
    pub page: Option<Page<Property>>,
    /// Dismissable error banner message
    pub error: Option<String>,
    pub loading: bool,
}

#[derive(Debug, PartialEq)]
pub enum LoadOutcome {
    Applied,
    Failed(FetchError),
    /// Superseded by a newer load; the response was dropped
    Stale,
}

pub struct Listing<S> {
    source: Arc<S>,
    state: Mutex<ListingState>,
    sequence: AtomicU64,
}

impl<S: PropertySource + 'static> Listing<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            state: Mutex::new(ListingState::default()),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn snapshot(&self) -> ListingState {
        self.lock_state().clone()
    }

    /// Fetch with `filter` and apply the result unless a newer load started meanwhile
    pub async fn load(&self, filter: Filter) -> LoadOutcome {
        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock_state();
            state.filter = filter.clone();
            state.loading = true;
        }
        debug!("Load #{} from {} source", ticket, self.source.source_name());

        let result = self.source.fetch_properties(&filter).await;

        let mut state = self.lock_state();
        if self.sequence.load(Ordering::SeqCst) != ticket {
            debug!("Dropping stale response for load #{}", ticket);
            return LoadOutcome::Stale;
        }
        state.loading = false;

        match result {
            Ok(page) => {
                info!("Showing {} of {} properties", page.properties.len(), page.total_count);
                state.page = Some(page);
                state.error = None;
                LoadOutcome::Applied
            }
            Err(err) => {
                warn!("Load #{} failed: {}", ticket, err);
                state.error = Some(err.to_string());
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Re-issue the current filter
    pub async fn retry(&self) -> LoadOutcome {
        let filter = self.lock_state().filter.clone();
        self.load(filter).await
    }

    pub fn dismiss_error(&self) {
        self.lock_state().error = None;
    }

    /// Detail view fetch; does not touch listing state
    pub async fn detail(&self, id: &str) -> Result<Property, FetchError> {
        self.source.fetch_property(id).await
    }

    /// Filter-change handler: changes inside the configured debounce window
    /// collapse into one load
    pub fn debounced(self: &Arc<Self>, config: &Config) -> Debouncer<Filter> {
        let listing = Arc::clone(self);
        Debouncer::new(config.debounce, move |filter: Filter| {
            let listing = Arc::clone(&listing);
            tokio::spawn(async move {
                listing.load(filter).await;
            });
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, ListingState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SampleSource;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    /// Answers after a delay taken from the filter's `page_size` (ms),
    /// echoing the filter name as the single property's name
    struct ScriptedSource {
        calls: Mutex<Vec<Filter>>,
        fail: AtomicBool,
    }

    impl ScriptedSource {
        fn new(fail: bool) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: AtomicBool::new(fail),
            }
        }

        fn set_failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl PropertySource for ScriptedSource {
        async fn fetch_properties(&self, filter: &Filter) -> Result<Page<Property>, FetchError> {
            self.calls.lock().unwrap().push(filter.clone());
            let delay = filter.page_size.unwrap_or(0) as u64;
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if self.fail.load(Ordering::SeqCst) {
                return Err(FetchError::Status {
                    status: 500,
                    message: "Error 500: Internal Server Error".to_string(),
                });
            }
            let mut property = SampleSource::new().properties()[0].clone();
            property.name = filter.name.clone().unwrap_or_default();
            Ok(Page::from_all(vec![property]))
        }

        async fn fetch_property(&self, id: &str) -> Result<Property, FetchError> {
            Err(FetchError::Rejected(format!("Property {} not found", id)))
        }

        fn source_name(&self) -> &'static str {
            "Scripted"
        }
    }

    fn filter(name: &str, delay_ms: u32) -> Filter {
        Filter {
            name: Some(name.to_string()),
            page_size: Some(delay_ms),
            ..Default::default()
        }
    }

    fn shown_name(listing: &Listing<ScriptedSource>) -> Option<String> {
        listing
            .snapshot()
            .page
            .and_then(|p| p.properties.first().map(|p| p.name.clone()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_dropped() {
        let listing = Listing::new(ScriptedSource::new(false));

        let (slow, fast) = tokio::join!(listing.load(filter("old", 300)), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            listing.load(filter("new", 50)).await
        });

        assert_eq!(slow, LoadOutcome::Stale);
        assert_eq!(fast, LoadOutcome::Applied);
        assert_eq!(shown_name(&listing).as_deref(), Some("new"));
        assert!(!listing.snapshot().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_page_and_can_be_dismissed() {
        let listing = Listing::new(ScriptedSource::new(false));
        assert_eq!(listing.load(filter("casa", 1)).await, LoadOutcome::Applied);
        assert!(listing.snapshot().error.is_none());

        listing.source().set_failing(true);
        let outcome = listing.load(filter("lote", 1)).await;
        assert!(matches!(outcome, LoadOutcome::Failed(FetchError::Status { status: 500, .. })));

        let state = listing.snapshot();
        assert_eq!(state.error.as_deref(), Some("Error 500: Internal Server Error"));
        assert!(!state.loading);
        assert_eq!(state.filter.name.as_deref(), Some("lote"));
        assert_eq!(shown_name(&listing).as_deref(), Some("casa"));

        listing.dismiss_error();
        let state = listing.snapshot();
        assert!(state.error.is_none());
        assert!(state.page.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_filter_keeps_sample_page() {
        let listing = Listing::new(SampleSource::new());
        assert_eq!(listing.load(Filter::default()).await, LoadOutcome::Applied);

        let outcome = listing
            .load(Filter {
                page: Some(0),
                ..Default::default()
            })
            .await;
        assert!(matches!(outcome, LoadOutcome::Failed(FetchError::InvalidFilter(_))));

        let state = listing.snapshot();
        assert!(state.error.is_some());
        assert_eq!(state.page.map(|p| p.total_count), Some(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_reissues_current_filter() {
        let listing = Listing::new(ScriptedSource::new(false));
        listing.load(filter("lote", 1)).await;
        listing.retry().await;

        let calls = listing.source().calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_filter_changes_issue_one_load() {
        let listing = Arc::new(Listing::new(ScriptedSource::new(false)));
        let on_change = listing.debounced(&Config::default());

        on_change.call(filter("c", 1));
        on_change.call(filter("ca", 1));
        on_change.call(filter("cas", 1));

        tokio::time::sleep(Duration::from_millis(600)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        let calls = listing.source().calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name.as_deref(), Some("cas"));
        assert_eq!(shown_name(&listing).as_deref(), Some("cas"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_window_comes_from_config() {
        let config = Config::from_lookup(|key| {
            (key == "FILTER_DEBOUNCE_MS").then(|| "100".to_string())
        })
        .unwrap();
        let listing = Arc::new(Listing::new(ScriptedSource::new(false)));
        let on_change = listing.debounced(&config);

        on_change.call(filter("finca", 1));
        tokio::time::sleep(Duration::from_millis(150)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        assert_eq!(listing.source().calls.lock().unwrap().len(), 1);
        assert_eq!(shown_name(&listing).as_deref(), Some("finca"));
    }
}
