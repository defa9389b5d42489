//! 客户页面：列表 + 详情 + 创建 / 编辑 / 删除

use std::sync::Arc;

use rental_catalog_api::{Customer, CustomerDetails, RentalApi};

use crate::actions::{ActionOrchestrator, ActionResult};
use crate::detail::{DetailCache, DetailState};
use crate::error::{CoreError, CoreResult};
use crate::forms::CustomerDraft;
use crate::list::{ListController, ListSnapshot};
use crate::modal::{ModalKind, ModalWorkflow};
use crate::notice::Notice;
use crate::resource::{Customers, Resource};

use super::{PageContext, load_detail};

#[derive(Debug, Clone, PartialEq)]
pub struct CustomersSnapshot {
    pub list: ListSnapshot<Customer>,
    pub modal: ModalKind,
    /// Customer the open modal acts on.
    pub target: Option<u32>,
    pub draft: Option<CustomerDraft>,
    /// Error shown inside the open modal.
    pub error: Option<String>,
    pub detail: DetailState<CustomerDetails>,
    pub notice: Option<String>,
}

pub struct CustomersPage {
    api: Arc<dyn RentalApi>,
    list: Arc<ListController<Customers>>,
    detail: DetailCache<CustomerDetails>,
    modal: ModalWorkflow<CustomerDraft>,
    actions: ActionOrchestrator,
    notice: Notice,
}

impl CustomersPage {
    pub fn new(ctx: &PageContext) -> Self {
        let list = ctx.list::<Customers>();
        let actions = ActionOrchestrator::new(ctx.api.clone(), list.clone(), ctx.notice.clone());
        Self {
            api: ctx.api.clone(),
            list,
            detail: DetailCache::new(Customers::NAME),
            modal: ModalWorkflow::new(),
            actions,
            notice: ctx.notice.clone(),
        }
    }

    pub fn list(&self) -> &ListController<Customers> {
        &self.list
    }

    pub async fn load(&self) {
        self.list.reload().await;
    }

    /// Open the detail view with the customer's rental history.
    pub async fn show(&mut self, customer_id: u32) {
        self.modal.open_view(customer_id);
        load_detail::<Customers>(self.api.as_ref(), &self.detail, Some(customer_id)).await;
    }

    pub fn begin_create(&mut self) {
        self.detail.select(None);
        self.modal.open_create(CustomerDraft::blank());
    }

    /// Open the Edit modal seeded from the visible row, or from the service
    /// when the customer is not on the current page.
    pub async fn begin_edit(&mut self, customer_id: u32) -> CoreResult<()> {
        let customer = match self.list.find(customer_id) {
            Some(customer) => customer,
            None => {
                self.api
                    .get_customer_details(customer_id)
                    .await
                    .map_err(CoreError::from)?
                    .customer
            }
        };
        self.detail.select(None);
        self.modal.open_edit(customer_id, CustomerDraft::from(&customer));
        Ok(())
    }

    pub fn begin_delete(&mut self, customer_id: u32) {
        self.detail.select(None);
        self.modal.open_delete(customer_id);
    }

    /// Change one field of the open Create/Edit draft.
    pub fn set_field(&mut self, field: &str, value: &str) -> CoreResult<()> {
        let draft = self
            .modal
            .draft_mut()
            .ok_or_else(|| CoreError::NotPermitted("no form is open".into()))?;
        draft.set(field, value)?;
        self.modal.clear_error();
        Ok(())
    }

    /// Submit whatever the open modal is for.
    pub async fn confirm(&mut self) -> ActionResult {
        match self.modal.kind() {
            ModalKind::Create => self.actions.create_customer(&mut self.modal).await,
            ModalKind::Edit => self.actions.edit_customer(&mut self.modal).await,
            ModalKind::Delete => self.actions.delete_customer(&mut self.modal).await,
            ModalKind::None | ModalKind::ViewDetails => {
                ActionResult::from(&CoreError::NotPermitted("nothing to confirm".into()))
            }
        }
    }

    pub fn close(&mut self) {
        self.modal.close();
        self.detail.select(None);
    }

    pub fn snapshot(&self) -> CustomersSnapshot {
        CustomersSnapshot {
            list: self.list.snapshot(),
            modal: self.modal.kind(),
            target: self.modal.target_id(),
            draft: self.modal.draft().cloned(),
            error: self.modal.error().map(ToString::to_string),
            detail: self.detail.state(),
            notice: self.notice.current(),
        }
    }
}

impl Drop for CustomersPage {
    fn drop(&mut self) {
        self.list.dispose();
        self.detail.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::CUSTOMER_CREATED;
    use crate::config::ClientConfig;
    use crate::list::ListView;
    use crate::test_utils::{MockRentalApi, customer};
    use rental_catalog_api::ApiError;

    async fn page(customers: Vec<Customer>) -> (Arc<MockRentalApi>, CustomersPage) {
        let api = Arc::new(MockRentalApi::with_customers(customers));
        let ctx = PageContext::new(api.clone(), ClientConfig::default());
        let page = CustomersPage::new(&ctx);
        page.load().await;
        (api, page)
    }

    fn rows(snap: &CustomersSnapshot) -> Vec<u32> {
        match &snap.list.view {
            ListView::Rows(rows) => rows.iter().map(|c| c.customer_id).collect(),
            _ => Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_appears_after_refetch() {
        let (api, mut page) = page(vec![customer(1, "a@example.test")]).await;
        page.begin_create();
        page.set_field("first_name", "Ada").unwrap();
        page.set_field("last_name", "Lovelace").unwrap();
        page.set_field("email", "ada@example.test").unwrap();

        assert_eq!(page.confirm().await, ActionResult::Ok);
        let snap = page.snapshot();
        assert_eq!(snap.modal, ModalKind::None);
        assert_eq!(snap.notice.as_deref(), Some(CUSTOMER_CREATED));
        assert_eq!(rows(&snap), vec![1, 2]);
        assert_eq!(api.calls("list_customers").await, 2);
    }

    #[tokio::test]
    async fn create_missing_field_stays_open() {
        let (api, mut page) = page(Vec::new()).await;
        page.begin_create();
        page.set_field("first_name", "Ada").unwrap();

        let result = page.confirm().await;
        assert!(!result.is_ok());
        let snap = page.snapshot();
        assert_eq!(snap.modal, ModalKind::Create);
        assert_eq!(snap.error.as_deref(), Some("last_name is required"));
        assert_eq!(api.calls("create_customer").await, 0);
    }

    #[tokio::test]
    async fn editing_a_field_clears_modal_error() {
        let (_api, mut page) = page(Vec::new()).await;
        page.begin_create();
        page.confirm().await;
        assert!(page.snapshot().error.is_some());

        page.set_field("first_name", "Ada").unwrap();
        assert_eq!(page.snapshot().error, None);
    }

    #[tokio::test]
    async fn edit_from_visible_row_sends_changes_only() {
        let (api, mut page) = page(vec![customer(1, "a@example.test")]).await;
        page.begin_edit(1).await.unwrap();
        assert_eq!(api.calls("get_customer_details").await, 0);

        page.set_field("first_name", "MARY").unwrap();
        assert_eq!(page.confirm().await, ActionResult::Ok);
        let updated = api.customer(1).await.unwrap();
        assert_eq!(updated.first_name, "MARY");
        assert_eq!(updated.last_name, "LAST1");
        assert_eq!(page.snapshot().modal, ModalKind::None);
    }

    #[tokio::test]
    async fn edit_off_page_fetches_customer() {
        let customers = (1..=12).map(|i| customer(i, &format!("c{i}@example.test"))).collect();
        let (api, mut page) = page(customers).await;

        page.begin_edit(12).await.unwrap();
        assert_eq!(api.calls("get_customer_details").await, 1);
        let snap = page.snapshot();
        assert_eq!(snap.target, Some(12));
        assert_eq!(
            snap.draft.map(|d| d.email),
            Some("c12@example.test".to_string())
        );
    }

    #[tokio::test]
    async fn edit_unknown_customer_is_not_found() {
        let (_api, mut page) = page(Vec::new()).await;
        let err = page.begin_edit(9).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
        assert_eq!(page.snapshot().modal, ModalKind::None);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let (api, mut page) = page(vec![
            customer(1, "a@example.test"),
            customer(2, "b@example.test"),
        ])
        .await;
        page.begin_delete(1);
        assert_eq!(page.confirm().await, ActionResult::Ok);

        assert_eq!(rows(&page.snapshot()), vec![2]);
        assert!(api.customer(1).await.is_none());
    }

    #[tokio::test]
    async fn delete_failure_keeps_modal_and_rows() {
        let (api, mut page) = page(vec![customer(1, "a@example.test")]).await;
        api.fail(
            "delete_customer",
            ApiError::NetworkError {
                detail: "connection reset".into(),
            },
        )
        .await;
        page.begin_delete(1);

        assert!(!page.confirm().await.is_ok());
        let snap = page.snapshot();
        assert_eq!(snap.modal, ModalKind::Delete);
        assert!(snap.error.is_some());
        assert_eq!(rows(&snap), vec![1]);

        api.recover("delete_customer").await;
        assert_eq!(page.confirm().await, ActionResult::Ok);
        assert!(rows(&page.snapshot()).is_empty());
    }

    #[tokio::test]
    async fn confirm_without_modal_is_rejected() {
        let (api, mut page) = page(vec![customer(1, "a@example.test")]).await;
        page.show(1).await;

        assert!(!page.confirm().await.is_ok());
        assert_eq!(api.calls("delete_customer").await, 0);
        assert!(page.set_field("email", "x@example.test").is_err());
    }

    #[tokio::test]
    async fn details_include_rentals() {
        let (_api, mut page) = page(vec![customer(3, "c@example.test")]).await;
        page.show(3).await;

        let snap = page.snapshot();
        assert_eq!(snap.modal, ModalKind::ViewDetails);
        let detail = snap.detail.loaded().unwrap();
        assert_eq!(detail.customer.customer_id, 3);
        assert!(detail.rentals.is_empty());
    }
}
