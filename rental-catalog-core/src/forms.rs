//! Form data edited inside modals.

use rental_catalog_api::{CreateCustomerRequest, Customer, UpdateCustomerRequest};

use crate::error::{CoreError, CoreResult};

/// Editable customer fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub store_id: Option<u32>,
    pub active: bool,
}

impl CustomerDraft {
    /// Names accepted by [`CustomerDraft::set`].
    pub const FIELDS: [&'static str; 5] = ["first_name", "last_name", "email", "store_id", "active"];

    /// Blank draft for the Create modal.
    pub fn blank() -> Self {
        Self {
            active: true,
            ..Self::default()
        }
    }

    /// Assign a field from text input.
    pub fn set(&mut self, field: &str, value: &str) -> CoreResult<()> {
        match field {
            "first_name" => self.first_name = value.to_string(),
            "last_name" => self.last_name = value.to_string(),
            "email" => self.email = value.to_string(),
            "store_id" => {
                self.store_id = if value.trim().is_empty() {
                    None
                } else {
                    Some(parse_id("store_id", value)?)
                };
            }
            "active" => {
                self.active = match value.trim() {
                    "1" | "true" | "yes" => true,
                    "0" | "false" | "no" => false,
                    _ => return Err(invalid("active", "active must be true or false")),
                }
            }
            other => return Err(invalid(other, &format!("unknown field `{other}`"))),
        }
        Ok(())
    }

    /// First required field that is blank, if any.
    pub fn missing_required(&self) -> Option<&'static str> {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    pub fn to_create_request(&self) -> CoreResult<CreateCustomerRequest> {
        if let Some(field) = self.missing_required() {
            return Err(CoreError::Validation {
                field: field.to_string(),
            });
        }
        Ok(CreateCustomerRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            store_id: self.store_id,
        })
    }

    /// Fields of `self` that differ from `original`.
    pub fn changes_from(&self, original: &Self) -> UpdateCustomerRequest {
        fn changed(new: &str, old: &str) -> Option<String> {
            let new = new.trim();
            (new != old.trim()).then(|| new.to_string())
        }

        UpdateCustomerRequest {
            first_name: changed(&self.first_name, &original.first_name),
            last_name: changed(&self.last_name, &original.last_name),
            email: changed(&self.email, &original.email),
            store_id: self.store_id.filter(|_| self.store_id != original.store_id),
            active: (self.active != original.active).then_some(self.active),
        }
    }
}

impl From<&Customer> for CustomerDraft {
    fn from(customer: &Customer) -> Self {
        Self {
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone().unwrap_or_default(),
            store_id: customer.store_id,
            active: customer.active,
        }
    }
}

/// Customer-id input of the film detail view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RentForm {
    pub customer_id: String,
    /// Last rent failure, shown under the input.
    pub error: Option<String>,
}

impl RentForm {
    pub fn customer_id(&self) -> CoreResult<u32> {
        if self.customer_id.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "customer_id".to_string(),
            });
        }
        parse_id("customer_id", &self.customer_id)
    }

    pub fn reset(&mut self) {
        self.customer_id.clear();
        self.error = None;
    }
}

fn parse_id(field: &str, value: &str) -> CoreResult<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(field, &format!("{field} must be a number")))
}

fn invalid(field: &str, message: &str) -> CoreError {
    CoreError::ValidationRejection {
        field: Some(field.to_string()),
        message: message.to_string(),
    }
}
