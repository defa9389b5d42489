//! # rental-catalog-api
//!
//! Typed async client for the rental catalog service: films, actors,
//! customers, and rentals.
//!
//! ## Endpoints
//!
//! | Operation | Route |
//! |-----------|-------|
//! | list films | `GET /films?query&page&limit` |
//! | film detail | `GET /api/films/{id}` |
//! | list actors | `GET /api/actors?query&page&limit` |
//! | actor detail | `GET /api/actors/{id}` |
//! | list customers | `GET /api/customers?search&page&limit` |
//! | customer details | `GET /api/customers/{id}/details` |
//! | create customer | `POST /api/customers` |
//! | edit customer | `PATCH /api/customers/{id}` |
//! | delete customer | `DELETE /api/customers/{id}` |
//! | rent a film | `POST /rent` |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* - Use the platform's native TLS implementation.
//! - **`rustls`** - Use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rental_catalog_api::{HttpRentalApi, ListParams, RentalApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpRentalApi::builder("http://localhost:5000").build()?;
//!
//!     let params = ListParams {
//!         query: "dinosaur".to_string(),
//!         ..ListParams::default()
//!     };
//!     let films = api.list_films(&params).await?;
//!     for film in &films.items {
//!         println!("{} {}", film.film_id, film.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`ApiResult<T>`](ApiResult). Transient failures
//! (`NetworkError`, `Timeout`, `RateLimited`) are retried with exponential
//! backoff on reads; mutations are sent exactly once. Non-success statuses
//! carry the service's `error` message verbatim.

mod client;
mod error;
mod http_client;
mod traits;
mod types;
mod utils;

pub use client::{DEFAULT_BASE_URL, HttpRentalApi, HttpRentalApiBuilder, MAX_PAGE_SIZE};
pub use error::{ApiError, ApiResult};
pub use traits::RentalApi;
pub use types::{
    ActorDetail, ActorSummary, CreateCustomerRequest, Customer, CustomerDetails, FilmDetail,
    FilmRef, FilmSummary, ListParams, PageResult, RentFilmRequest, RentalReceipt, RentalRecord,
    UpdateCustomerRequest,
};
