//! 操作编排：创建 / 编辑 / 删除客户，租借影片
//!
//! Every action checks its modal precondition first; a failed precondition
//! returns [`ActionResult::Rejected`] without touching the network. After an
//! acknowledged mutation the list is re-fetched; nothing is patched locally.

use std::sync::Arc;

use rental_catalog_api::{RentFilmRequest, RentalApi};

use crate::error::CoreError;
use crate::forms::{CustomerDraft, RentForm};
use crate::modal::{ActionKind, ModalMode, ModalWorkflow};
use crate::notice::Notice;
use crate::traits::Refresh;

pub const CUSTOMER_CREATED: &str = "Customer created successfully";
pub const FILM_RENTED: &str = "Film rented successfully";

/// Outcome of a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Ok,
    /// Shown to the user; list and modal state are left as they were.
    Rejected {
        message: String,
        /// Form field the message belongs to, when known.
        field: Option<String>,
    },
}

impl ActionResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<&CoreError> for ActionResult {
    fn from(err: &CoreError) -> Self {
        Self::Rejected {
            message: err.to_string(),
            field: err.field().map(str::to_string),
        }
    }
}

/// Runs mutations for one page and refreshes that page's list afterwards.
pub struct ActionOrchestrator {
    api: Arc<dyn RentalApi>,
    list: Arc<dyn Refresh>,
    notice: Notice,
}

impl ActionOrchestrator {
    pub fn new(api: Arc<dyn RentalApi>, list: Arc<dyn Refresh>, notice: Notice) -> Self {
        Self { api, list, notice }
    }

    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    /// `POST` the Create modal's draft.
    pub async fn create_customer(&self, modal: &mut ModalWorkflow<CustomerDraft>) -> ActionResult {
        let request = match modal
            .ensure(ActionKind::Create)
            .and_then(|()| draft_of(modal)?.to_create_request())
        {
            Ok(request) => request,
            Err(e) => return reject_in_modal(modal, e),
        };

        match self.api.create_customer(&request).await {
            Ok(()) => {
                modal.close();
                self.notice.show(CUSTOMER_CREATED);
                self.list.refresh().await;
                ActionResult::Ok
            }
            Err(e) => reject_in_modal(modal, e.into()),
        }
    }

    /// `PATCH` the fields the Edit modal changed. No change closes the modal without a request.
    pub async fn edit_customer(&self, modal: &mut ModalWorkflow<CustomerDraft>) -> ActionResult {
        if let Err(e) = modal.ensure(ActionKind::Edit) {
            return reject_in_modal(modal, e);
        }
        let ModalMode::Edit {
            id,
            original,
            draft,
        } = modal.mode()
        else {
            return ActionResult::Rejected {
                message: "Edit modal is not open".to_string(),
                field: None,
            };
        };
        let id = *id;
        if let Some(field) = draft.missing_required() {
            let err = CoreError::Validation {
                field: field.to_string(),
            };
            return reject_in_modal(modal, err);
        }

        let update = draft.changes_from(original);
        if update.is_empty() {
            log::debug!("customer {id}: nothing changed, closing edit");
            modal.close();
            return ActionResult::Ok;
        }

        match self.api.update_customer(id, &update).await {
            Ok(()) => {
                modal.close();
                self.list.refresh().await;
                ActionResult::Ok
            }
            Err(e) => reject_in_modal(modal, e.into()),
        }
    }

    /// `DELETE` the Delete modal's target.
    pub async fn delete_customer(&self, modal: &mut ModalWorkflow<CustomerDraft>) -> ActionResult {
        if let Err(e) = modal.ensure(ActionKind::Delete) {
            return reject_in_modal(modal, e);
        }
        let Some(id) = modal.target_id() else {
            return reject_in_modal(modal, CoreError::NotPermitted("no delete target".into()));
        };

        match self.api.delete_customer(id).await {
            Ok(()) => {
                modal.close();
                self.list.refresh().await;
                ActionResult::Ok
            }
            Err(e) => reject_in_modal(modal, e.into()),
        }
    }

    /// Rent the film shown in the detail view to the customer typed into `form`.
    ///
    /// The detail view stays open either way; failures land in `form.error`.
    pub async fn rent_film<D>(&self, modal: &ModalWorkflow<D>, form: &mut RentForm) -> ActionResult {
        let request = match modal
            .ensure(ActionKind::Rent)
            .and_then(|()| {
                let film_id = modal
                    .target_id()
                    .ok_or_else(|| CoreError::NotPermitted("no film selected".into()))?;
                Ok((film_id, form.customer_id()?))
            }) {
            Ok((film_id, customer_id)) => RentFilmRequest {
                film_id,
                customer_id,
            },
            Err(e) => return reject_in_form(form, &e),
        };

        match self.api.rent_film(&request).await {
            Ok(receipt) => {
                log::info!(
                    "film {} rented to customer {} (rental {:?})",
                    request.film_id,
                    request.customer_id,
                    receipt.rental_id
                );
                self.notice
                    .show(receipt.message.unwrap_or_else(|| FILM_RENTED.to_string()));
                form.reset();
                self.list.refresh().await;
                ActionResult::Ok
            }
            Err(e) => reject_in_form(form, &e.into()),
        }
    }
}

fn draft_of(modal: &ModalWorkflow<CustomerDraft>) -> Result<&CustomerDraft, CoreError> {
    modal
        .draft()
        .ok_or_else(|| CoreError::NotPermitted("no draft open".into()))
}

fn log_rejection(err: &CoreError) {
    if err.is_expected() {
        log::warn!("action rejected: {err}");
    } else {
        log::error!("action failed: {err}");
    }
}

/// Keep the modal open with the error; a closed modal has nowhere to show it.
fn reject_in_modal<D>(modal: &mut ModalWorkflow<D>, err: CoreError) -> ActionResult {
    log_rejection(&err);
    let result = ActionResult::from(&err);
    if modal.is_open() {
        modal.set_error(err);
    }
    result
}

fn reject_in_form(form: &mut RentForm, err: &CoreError) -> ActionResult {
    log_rejection(err);
    form.error = Some(err.to_string());
    ActionResult::from(err)
}
