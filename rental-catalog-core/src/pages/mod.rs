//! 页面层
//!
//! Each page owns its list, detail and modal state and tears them down when
//! dropped. Pages never share data; they only share the service handle and
//! the notice slot held by the [`PageContext`].

mod actors;
mod customers;
mod films;

pub use actors::{ActorsPage, ActorsSnapshot};
pub use customers::{CustomersPage, CustomersSnapshot};
pub use films::{FilmsPage, FilmsSnapshot};

use std::sync::Arc;

use rental_catalog_api::RentalApi;

use crate::config::ClientConfig;
use crate::detail::DetailCache;
use crate::list::ListController;
use crate::notice::Notice;
use crate::resource::Resource;

/// 页面上下文 - 持有所有页面共享的依赖
pub struct PageContext {
    /// 远程服务
    pub api: Arc<dyn RentalApi>,
    /// 客户端配置
    pub config: ClientConfig,
    /// 全局提示消息
    pub notice: Notice,
}

impl PageContext {
    #[must_use]
    pub fn new(api: Arc<dyn RentalApi>, config: ClientConfig) -> Self {
        let notice = Notice::new(config.notice_ttl());
        Self {
            api,
            config,
            notice,
        }
    }

    /// Start a list controller for `R` with the configured paging and debounce.
    fn list<R: Resource>(&self) -> Arc<ListController<R>> {
        ListController::start(
            self.api.clone(),
            self.config.page_size,
            self.config.search_debounce(),
        )
    }
}

/// Select `id` in `cache` and fetch its detail record.
async fn load_detail<R: Resource>(
    api: &dyn RentalApi,
    cache: &DetailCache<R::Detail>,
    id: Option<u32>,
) -> bool {
    cache.select_and_load(id, |id| R::detail(api, id)).await
}
