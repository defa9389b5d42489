//! 演员页面：列表 + 详情（含热门影片）

use std::sync::Arc;

use rental_catalog_api::{ActorDetail, ActorSummary, RentalApi};

use crate::detail::{DetailCache, DetailState};
use crate::list::{ListController, ListSnapshot};
use crate::modal::{ModalKind, ModalWorkflow};
use crate::resource::{Actors, Resource};

use super::{PageContext, load_detail};

#[derive(Debug, Clone, PartialEq)]
pub struct ActorsSnapshot {
    pub list: ListSnapshot<ActorSummary>,
    pub modal: ModalKind,
    pub detail: DetailState<ActorDetail>,
}

pub struct ActorsPage {
    api: Arc<dyn RentalApi>,
    list: Arc<ListController<Actors>>,
    detail: DetailCache<ActorDetail>,
    modal: ModalWorkflow<()>,
}

impl ActorsPage {
    pub fn new(ctx: &PageContext) -> Self {
        Self {
            api: ctx.api.clone(),
            list: ctx.list::<Actors>(),
            detail: DetailCache::new(Actors::NAME),
            modal: ModalWorkflow::new(),
        }
    }

    pub fn list(&self) -> &ListController<Actors> {
        &self.list
    }

    pub async fn load(&self) {
        self.list.reload().await;
    }

    pub async fn show(&mut self, actor_id: u32) {
        self.modal.open_view(actor_id);
        load_detail::<Actors>(self.api.as_ref(), &self.detail, Some(actor_id)).await;
    }

    pub fn close(&mut self) {
        self.modal.close();
        self.detail.select(None);
    }

    pub fn snapshot(&self) -> ActorsSnapshot {
        ActorsSnapshot {
            list: self.list.snapshot(),
            modal: self.modal.kind(),
            detail: self.detail.state(),
        }
    }
}

impl Drop for ActorsPage {
    fn drop(&mut self) {
        self.list.dispose();
        self.detail.dispose();
    }
}
