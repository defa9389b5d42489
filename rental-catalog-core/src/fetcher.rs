//! Sequence-numbered list fetch state
//!
//! Each issued request takes a [`FetchTicket`]. Only the ticket of the most
//! recently issued request may move the state out of `Loading`; older
//! responses are dropped on arrival. After [`ResourceFetcher::dispose`]
//! nothing is applied at all.

use std::sync::{Mutex, PoisonError};

use rental_catalog_api::{ApiResult, PageResult};

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Success(PageResult<T>),
    /// Display reason, including the status code when the service answered.
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Proof of having issued a request; consumed by [`ResourceFetcher::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Inner<T> {
    state: FetchState<T>,
    latest: u64,
    disposed: bool,
}

#[derive(Debug)]
pub struct ResourceFetcher<T> {
    name: &'static str,
    inner: Mutex<Inner<T>>,
}

impl<T: Clone> ResourceFetcher<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(Inner {
                state: FetchState::Idle,
                latest: 0,
                disposed: false,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a new request: enter `Loading` and supersede every earlier ticket.
    pub fn begin(&self) -> FetchTicket {
        let mut inner = self.lock();
        inner.latest += 1;
        inner.state = FetchState::Loading;
        FetchTicket(inner.latest)
    }

    /// Apply a response. Returns `false` when it was stale or the fetcher is disposed.
    pub fn complete(&self, ticket: FetchTicket, result: ApiResult<PageResult<T>>) -> bool {
        let mut inner = self.lock();
        if inner.disposed {
            log::debug!("[{}] dropping response #{} after dispose", self.name, ticket.0);
            return false;
        }
        if ticket.0 != inner.latest {
            log::debug!(
                "[{}] dropping stale response #{} (latest #{})",
                self.name,
                ticket.0,
                inner.latest
            );
            return false;
        }

        inner.state = match result {
            Ok(page) => FetchState::Success(page),
            Err(e) => {
                if e.is_expected() {
                    log::warn!("[{}] list fetch failed: {e}", self.name);
                } else {
                    log::error!("[{}] list fetch failed: {e}", self.name);
                }
                FetchState::Failed(e.to_string())
            }
        };
        true
    }

    pub fn state(&self) -> FetchState<T> {
        self.lock().state.clone()
    }

    /// Total count of the last successful page, if the current state is a success.
    pub fn total_count(&self) -> Option<u32> {
        match &self.lock().state {
            FetchState::Success(page) => Some(page.total_count),
            _ => None,
        }
    }

    pub fn latest_ticket(&self) -> FetchTicket {
        FetchTicket(self.lock().latest)
    }

    /// Stop applying results. In-flight responses are discarded on arrival.
    pub fn dispose(&self) {
        self.lock().disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rental_catalog_api::ApiError;

    fn page(items: &[&str], total: u32) -> PageResult<String> {
        PageResult::new(items.iter().map(ToString::to_string).collect(), total)
    }

    #[test]
    fn starts_idle_and_enters_loading_on_begin() {
        let fetcher = ResourceFetcher::<String>::new("films");
        assert_eq!(fetcher.state(), FetchState::Idle);
        fetcher.begin();
        assert!(fetcher.state().is_loading());
    }

    #[test]
    fn out_of_order_response_is_discarded() {
        let fetcher = ResourceFetcher::new("films");
        let a = fetcher.begin();
        let b = fetcher.begin();

        assert!(fetcher.complete(b, Ok(page(&["B"], 1))));
        assert!(!fetcher.complete(a, Ok(page(&["A"], 1))));

        assert_eq!(fetcher.state(), FetchState::Success(page(&["B"], 1)));
    }

    #[test]
    fn older_response_cannot_leave_loading() {
        let fetcher = ResourceFetcher::<String>::new("films");
        let a = fetcher.begin();
        let _b = fetcher.begin();

        assert!(!fetcher.complete(a, Ok(page(&["A"], 1))));
        assert!(fetcher.state().is_loading());
    }

    #[test]
    fn failure_reason_carries_status() {
        let fetcher = ResourceFetcher::<String>::new("customers");
        let t = fetcher.begin();
        fetcher.complete(
            t,
            Err(ApiError::Rejected {
                status: 500,
                message: "boom".into(),
            }),
        );
        assert_eq!(fetcher.state(), FetchState::Failed("HTTP 500: boom".into()));
        assert_eq!(fetcher.total_count(), None);
    }

    #[test]
    fn nothing_applies_after_dispose() {
        let fetcher = ResourceFetcher::<String>::new("actors");
        let t = fetcher.begin();
        fetcher.dispose();
        assert!(!fetcher.complete(t, Ok(page(&["late"], 1))));
        assert!(fetcher.state().is_loading());
        assert!(fetcher.is_disposed());
    }
}
