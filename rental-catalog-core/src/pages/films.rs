//! 影片页面：列表 + 详情 + 租借

use std::sync::Arc;

use rental_catalog_api::{FilmDetail, FilmSummary, RentalApi};

use crate::actions::{ActionOrchestrator, ActionResult};
use crate::detail::{DetailCache, DetailState};
use crate::forms::RentForm;
use crate::list::{ListController, ListSnapshot};
use crate::modal::{ModalKind, ModalWorkflow};
use crate::notice::Notice;
use crate::resource::{Films, Resource};

use super::{PageContext, load_detail};

#[derive(Debug, Clone, PartialEq)]
pub struct FilmsSnapshot {
    pub list: ListSnapshot<FilmSummary>,
    pub modal: ModalKind,
    pub detail: DetailState<FilmDetail>,
    pub rent: RentForm,
    pub notice: Option<String>,
}

pub struct FilmsPage {
    api: Arc<dyn RentalApi>,
    list: Arc<ListController<Films>>,
    detail: DetailCache<FilmDetail>,
    modal: ModalWorkflow<()>,
    rent: RentForm,
    actions: ActionOrchestrator,
    notice: Notice,
}

impl FilmsPage {
    /// Must be called within a tokio runtime.
    pub fn new(ctx: &PageContext) -> Self {
        let list = ctx.list::<Films>();
        let actions = ActionOrchestrator::new(ctx.api.clone(), list.clone(), ctx.notice.clone());
        Self {
            api: ctx.api.clone(),
            list,
            detail: DetailCache::new(Films::NAME),
            modal: ModalWorkflow::new(),
            rent: RentForm::default(),
            actions,
            notice: ctx.notice.clone(),
        }
    }

    pub fn list(&self) -> &ListController<Films> {
        &self.list
    }

    /// Fetch the current page.
    pub async fn load(&self) {
        self.list.reload().await;
    }

    /// Open the detail view of `film_id` and fetch the full record.
    pub async fn show(&mut self, film_id: u32) {
        self.modal.open_view(film_id);
        self.rent.reset();
        load_detail::<Films>(self.api.as_ref(), &self.detail, Some(film_id)).await;
    }

    pub fn close(&mut self) {
        self.modal.close();
        self.rent.reset();
        self.detail.select(None);
    }

    pub fn set_customer_id(&mut self, text: &str) {
        self.rent.customer_id = text.trim().to_string();
    }

    /// Rent the shown film to the customer id typed so far.
    pub async fn rent(&mut self) -> ActionResult {
        self.actions.rent_film(&self.modal, &mut self.rent).await
    }

    pub fn snapshot(&self) -> FilmsSnapshot {
        FilmsSnapshot {
            list: self.list.snapshot(),
            modal: self.modal.kind(),
            detail: self.detail.state(),
            rent: self.rent.clone(),
            notice: self.notice.current(),
        }
    }
}

impl Drop for FilmsPage {
    fn drop(&mut self) {
        self.list.dispose();
        self.detail.dispose();
    }
}
