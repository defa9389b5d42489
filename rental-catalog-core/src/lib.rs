//! Rental Catalog Core Library
//!
//! Client-side state for browsing and managing a film rental catalog:
//! - Debounced search and bounded pagination per resource list
//! - Stale-safe list and detail fetches (only the latest request lands)
//! - Modal workflows for customer create / edit / delete and film rental
//!
//! The remote service is reached only through [`rental_catalog_api::RentalApi`],
//! so every page can be driven against an in-memory implementation.

pub mod actions;
pub mod config;
pub mod debounce;
pub mod detail;
pub mod error;
pub mod fetcher;
pub mod forms;
pub mod list;
pub mod modal;
pub mod notice;
pub mod pages;
pub mod paginator;
pub mod query;
pub mod resource;
pub mod traits;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use actions::{ActionOrchestrator, ActionResult};
pub use config::ClientConfig;
pub use detail::{DetailCache, DetailState};
pub use error::{CoreError, CoreResult};
pub use fetcher::{FetchState, ResourceFetcher};
pub use forms::{CustomerDraft, RentForm};
pub use list::{ListController, ListSnapshot, ListView};
pub use modal::{ActionKind, ModalKind, ModalMode, ModalWorkflow};
pub use notice::Notice;
pub use pages::{
    ActorsPage, ActorsSnapshot, CustomersPage, CustomersSnapshot, FilmsPage, FilmsSnapshot,
    PageContext,
};
pub use paginator::{PageNav, Paginator};
pub use query::{Query, QueryState};
pub use resource::{Actors, Customers, Films, Resource};
pub use traits::Refresh;
