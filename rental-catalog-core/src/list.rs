//! 列表控制器：搜索防抖 + 分页 + 防过期加载
//!
//! One controller drives one resource list. Search input goes through the
//! debouncer; pagination controls and refreshes fetch immediately. Every
//! fetch goes through the [`ResourceFetcher`], so only the latest request
//! ever reaches the visible state.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use async_trait::async_trait;
use rental_catalog_api::{ListParams, RentalApi};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::debounce::Debouncer;
use crate::fetcher::{FetchState, ResourceFetcher};
use crate::paginator::{PageNav, Paginator, total_pages};
use crate::query::{Query, QueryState};
use crate::resource::Resource;
use crate::traits::Refresh;

/// What the list area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView<T> {
    /// Nothing requested yet.
    Idle,
    Loading,
    /// No rows on this page: the query matched nothing, or the page
    /// lies past the end of the result.
    Empty,
    Rows(Vec<T>),
    Error(String),
}

/// Point-in-time copy of a list for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<T> {
    /// Text as typed, possibly not yet applied.
    pub search_input: String,
    pub query: Query,
    pub view: ListView<T>,
    pub total_count: u32,
    pub total_pages: u32,
    pub can_prev: bool,
    pub can_next: bool,
}

struct Inner {
    query: QueryState,
    search_input: String,
    debouncer: Debouncer<String>,
    pump: Option<JoinHandle<()>>,
}

pub struct ListController<R: Resource> {
    api: Arc<dyn RentalApi>,
    page_size: u32,
    fetcher: ResourceFetcher<R::Summary>,
    inner: Mutex<Inner>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ListController<R> {
    /// Create the controller and its debounce pump. Must be called within a tokio runtime.
    pub fn start(
        api: Arc<dyn RentalApi>,
        page_size: u32,
        debounce: std::time::Duration,
    ) -> Arc<Self> {
        let (debouncer, rx) = Debouncer::new(debounce);
        let this = Arc::new(Self {
            api,
            page_size: page_size.max(1),
            fetcher: ResourceFetcher::new(R::NAME),
            inner: Mutex::new(Inner {
                query: QueryState::new(),
                search_input: String::new(),
                debouncer,
                pump: None,
            }),
            _resource: PhantomData,
        });

        let pump = tokio::spawn(Self::pump(Arc::downgrade(&this), rx));
        this.lock().pump = Some(pump);
        this
    }

    /// Apply settled search text until the controller is gone or disposed.
    async fn pump(this: Weak<Self>, mut rx: mpsc::UnboundedReceiver<String>) {
        while let Some(text) = rx.recv().await {
            let Some(this) = this.upgrade() else {
                break;
            };
            this.apply_search(text).await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn query(&self) -> Query {
        self.lock().query.current().clone()
    }

    /// Record typed text; it is applied once input has been quiet for the debounce window.
    pub fn on_search_input(&self, text: impl Into<String>) {
        let text = text.into();
        let mut inner = self.lock();
        inner.search_input.clone_from(&text);
        inner.debouncer.push(text);
    }

    /// Apply search text now (page resets to 1). Returns `false` when nothing changed.
    pub async fn apply_search(&self, text: impl Into<String>) -> bool {
        if self.fetcher.is_disposed() {
            return false;
        }
        let text = text.into();
        let next = {
            let mut inner = self.lock();
            inner.search_input.clone_from(&text);
            inner.query.set_text(text)
        };
        match next {
            Some(query) => {
                self.load(query).await;
                true
            }
            None => false,
        }
    }

    /// Follow a pagination control. Boundary no-ops return `false` and fetch nothing.
    pub async fn go_to(&self, nav: PageNav) -> bool {
        let next = {
            let mut inner = self.lock();
            let paginator =
                Paginator::with_total_pages(inner.query.current().page, inner.query.total_pages());
            paginator
                .target(nav)
                .and_then(|page| inner.query.set_page(page))
        };
        match next {
            Some(query) => {
                self.load(query).await;
                true
            }
            None => {
                log::debug!("[{}] {nav:?} is a no-op", R::NAME);
                false
            }
        }
    }

    /// Fetch `query`; if the result shows the page is past the end, load the new last page.
    async fn load(&self, mut query: Query) {
        loop {
            let ticket = self.fetcher.begin();
            let params = ListParams {
                query: query.text.clone(),
                page: query.page,
                limit: self.page_size,
            };
            log::debug!("[{}] fetching page {} for {:?}", R::NAME, query.page, query.text);

            let result = R::list(self.api.as_ref(), &params).await;
            let outcome = result
                .as_ref()
                .ok()
                .map(|page| (page.total_count, page.items.is_empty()));
            if !self.fetcher.complete(ticket, result) {
                return;
            }
            let Some((total, empty)) = outcome else {
                return;
            };

            let clamped = {
                let mut inner = self.lock();
                let pages = total_pages(total, self.page_size);
                inner.query.set_total_pages(pages);
                if empty && query.page > pages && inner.query.current() == &query {
                    inner.query.set_page(pages)
                } else {
                    None
                }
            };
            match clamped {
                Some(next) => {
                    log::info!(
                        "[{}] page {} no longer exists, loading page {}",
                        R::NAME,
                        query.page,
                        next.page
                    );
                    query = next;
                }
                None => return,
            }
        }
    }

    /// Re-fetch the current query.
    pub async fn reload(&self) {
        if self.fetcher.is_disposed() {
            return;
        }
        let query = self.query();
        self.load(query).await;
    }

    pub fn state(&self) -> FetchState<R::Summary> {
        self.fetcher.state()
    }

    /// Row with `id` on the current page, if loaded.
    pub fn find(&self, id: u32) -> Option<R::Summary> {
        match self.fetcher.state() {
            FetchState::Success(page) => page.items.into_iter().find(|item| R::id_of(item) == id),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> ListSnapshot<R::Summary> {
        let (search_input, query, pages) = {
            let inner = self.lock();
            (
                inner.search_input.clone(),
                inner.query.current().clone(),
                inner.query.total_pages(),
            )
        };
        let paginator = Paginator::with_total_pages(query.page, pages);

        let (view, total_count) = match self.fetcher.state() {
            FetchState::Idle => (ListView::Idle, 0),
            FetchState::Loading => (ListView::Loading, 0),
            FetchState::Failed(reason) => (ListView::Error(reason), 0),
            FetchState::Success(page) if page.items.is_empty() => {
                (ListView::Empty, page.total_count)
            }
            FetchState::Success(page) => (ListView::Rows(page.items), page.total_count),
        };

        ListSnapshot {
            search_input,
            query,
            view,
            total_count,
            total_pages: paginator.total_pages(),
            can_prev: paginator.can_prev(),
            can_next: paginator.can_next(),
        }
    }

    /// Tear down: cancel the debounce timer and pump, and ignore in-flight results.
    pub fn dispose(&self) {
        self.fetcher.dispose();
        let mut inner = self.lock();
        inner.debouncer.cancel();
        if let Some(pump) = inner.pump.take() {
            pump.abort();
        }
    }
}

#[async_trait]
impl<R: Resource> Refresh for ListController<R> {
    async fn refresh(&self) {
        self.reload().await;
    }
}
