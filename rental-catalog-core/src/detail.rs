//! Selection-keyed detail fetch
//!
//! At most one detail fetch is current: every `select`/`reload` supersedes
//! the previous one, and a response for a superseded request is discarded.

use std::sync::{Mutex, PoisonError};

use futures::future::BoxFuture;
use rental_catalog_api::ApiResult;

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState<T> {
    None,
    Loading(u32),
    Loaded(T),
    /// Selected id and display reason.
    Failed(u32, String),
}

impl<T> DetailState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(detail) => Some(detail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    id: u32,
    seq: u64,
}

impl DetailTicket {
    pub fn id(self) -> u32 {
        self.id
    }
}

#[derive(Debug)]
struct Inner<T> {
    selected: Option<u32>,
    state: DetailState<T>,
    seq: u64,
    disposed: bool,
}

#[derive(Debug)]
pub struct DetailCache<T> {
    name: &'static str,
    inner: Mutex<Inner<T>>,
}

impl<T: Clone> DetailCache<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(Inner {
                selected: None,
                state: DetailState::None,
                seq: 0,
                disposed: false,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change the selection.
    ///
    /// `Some(id)` drops the previous detail, enters `Loading(id)` and returns
    /// the ticket the caller fetches under. `None` clears without a request.
    pub fn select(&self, id: Option<u32>) -> Option<DetailTicket> {
        let mut inner = self.lock();
        inner.seq += 1;
        inner.selected = id;
        match id {
            Some(id) => {
                inner.state = DetailState::Loading(id);
                Some(DetailTicket { id, seq: inner.seq })
            }
            None => {
                inner.state = DetailState::None;
                None
            }
        }
    }

    /// Re-fetch the current selection, if any.
    pub fn reload(&self) -> Option<DetailTicket> {
        let id = self.lock().selected?;
        self.select(Some(id))
    }

    /// Apply a response. Returns `false` when the selection moved on.
    pub fn complete(&self, ticket: DetailTicket, result: ApiResult<T>) -> bool {
        let mut inner = self.lock();
        if inner.disposed || ticket.seq != inner.seq {
            log::debug!(
                "[{}] dropping detail #{} for id {}",
                self.name,
                ticket.seq,
                ticket.id
            );
            return false;
        }

        inner.state = match result {
            Ok(detail) => DetailState::Loaded(detail),
            Err(e) => {
                let err = CoreError::from(e);
                log::warn!("[{}] detail {} failed: {err}", self.name, ticket.id);
                DetailState::Failed(ticket.id, err.to_string())
            }
        };
        true
    }

    /// Select `id` and run `load` for it, applying the result if still current.
    pub async fn select_and_load<'a, F>(&self, id: Option<u32>, load: F) -> bool
    where
        F: FnOnce(u32) -> BoxFuture<'a, ApiResult<T>>,
    {
        let Some(ticket) = self.select(id) else {
            return false;
        };
        let result = load(ticket.id).await;
        self.complete(ticket, result)
    }

    pub fn selected(&self) -> Option<u32> {
        self.lock().selected
    }

    pub fn state(&self) -> DetailState<T> {
        self.lock().state.clone()
    }

    pub fn dispose(&self) {
        self.lock().disposed = true;
    }
}
