use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============ Pagination ============

/// Query parameters for list operations: free-text search plus page-based pagination.
///
/// Pages are 1-indexed.
///
/// # Default
///
/// The default is `query = "", page = 1, limit = 10`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// Search text; an empty string lists everything.
    pub query: String,
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub limit: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            limit: 10,
        }
    }
}

impl ListParams {
    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `limit` is clamped to `1..=max_limit`
    #[must_use]
    pub fn validated(&self, max_limit: u32) -> Self {
        Self {
            query: self.query.clone(),
            page: self.page.max(1),
            limit: self.limit.clamp(1, max_limit),
        }
    }
}

/// One page of a list result.
///
/// `items.len()` never exceeds the requested page size; `total_count` is the
/// number of matches across all pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// Items in the current page, in server order.
    pub items: Vec<T>,
    /// Total number of matching items across all pages.
    pub total_count: u32,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total_count: u32) -> Self {
        Self { items, total_count }
    }

    /// An empty result with zero matches.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0 && self.items.is_empty()
    }
}

/// Wire shape of list responses.
///
/// The paginated endpoints answer `{ "results": [...], "total": n }`, while the
/// "top N" endpoints answer with a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Bare(Vec<T>),
    Paged {
        #[serde(default = "Vec::new")]
        results: Vec<T>,
        #[serde(default)]
        total: Option<u32>,
    },
}

impl<T> ListEnvelope<T> {
    pub(crate) fn into_page(self) -> PageResult<T> {
        match self {
            Self::Bare(items) => {
                let total = len_as_u32(&items);
                PageResult::new(items, total)
            }
            Self::Paged { results, total } => {
                let total = total.unwrap_or_else(|| len_as_u32(&results));
                PageResult::new(results, total)
            }
        }
    }
}

fn len_as_u32<T>(items: &[T]) -> u32 {
    u32::try_from(items.len()).unwrap_or(u32::MAX)
}

/// Error body returned by the service on failure: `{ "error": "..." }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .filter(|m| !m.trim().is_empty())
    }
}

// ============ Films ============

/// A film row in the catalog list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmSummary {
    pub film_id: u32,
    pub title: String,
    /// Genre, as joined by the list endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

/// Full film record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmDetail {
    pub film_id: u32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub release_year: Option<u16>,
    /// Rental duration in days.
    #[serde(default)]
    pub rental_duration: Option<u32>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub rental_rate: Option<f64>,
    /// Length in minutes.
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub replacement_cost: Option<f64>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "lenient_features")]
    pub special_features: Option<String>,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
}

// ============ Actors ============

/// An actor row, optionally with the number of films they appear in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSummary {
    pub actor_id: u32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub film_count: Option<u32>,
}

impl ActorSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Minimal film reference used inside other records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmRef {
    pub film_id: u32,
    pub title: String,
}

/// Actor detail: the actor plus their most rented films.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDetail {
    pub actor: ActorSummary,
    #[serde(rename = "topFilms", default)]
    pub top_films: Vec<FilmRef>,
}

// ============ Customers ============

/// A customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<u32>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// The service stores this flag as `0`/`1`; both that and JSON booleans are accepted.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub active: bool,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One rental in a customer's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalRecord {
    pub rental_id: u32,
    #[serde(default)]
    pub film_id: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rental_date: Option<DateTime<Utc>>,
    /// `None` while the film is still out.
    #[serde(default)]
    pub return_date: Option<DateTime<Utc>>,
}

/// Customer detail view: the record plus rental history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub customer: Customer,
    #[serde(default)]
    pub rentals: Vec<RentalRecord>,
}

/// Request body for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<u32>,
}

/// Partial update of a customer; only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl UpdateCustomerRequest {
    /// `true` when no field would be sent.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.store_id.is_none()
            && self.active.is_none()
    }
}

// ============ Rentals ============

/// Request body for `POST /rent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentFilmRequest {
    pub film_id: u32,
    pub customer_id: u32,
}

/// Acknowledgement returned by a successful rental.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "rentalId")]
    pub rental_id: Option<u32>,
}

// ============ Lenient decoders ============

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
        Flag::Text(s) => matches!(s.as_str(), "1" | "true" | "TRUE" | "True"),
    })
}

/// MySQL `DECIMAL` columns arrive as strings (`"4.99"`); plain numbers are accepted too.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    match Option::<Decimal>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Decimal::Number(n)) => Ok(Some(n)),
        Some(Decimal::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// `SET` columns may be delivered either as `"Trailers,Deleted Scenes"` or as an array.
fn lenient_features<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Features {
        Joined(String),
        List(Vec<String>),
    }

    Ok(
        Option::<Features>::deserialize(deserializer)?.map(|f| match f {
            Features::Joined(s) => s,
            Features::List(items) => items.join(","),
        }),
    )
}
