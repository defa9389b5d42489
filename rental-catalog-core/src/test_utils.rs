//! 测试辅助模块
//!
//! 提供内存版 `RentalApi` 和便捷的测试数据工厂。

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use rental_catalog_api::{
    ActorDetail, ActorSummary, ApiError, ApiResult, CreateCustomerRequest, Customer,
    CustomerDetails, FilmDetail, FilmRef, FilmSummary, ListParams, PageResult, RentFilmRequest,
    RentalApi, RentalReceipt, RentalRecord, UpdateCustomerRequest,
};
use tokio::sync::{RwLock, oneshot};

// ===== 测试数据 =====

pub fn film(id: u32, title: &str) -> FilmSummary {
    FilmSummary {
        film_id: id,
        title: title.to_string(),
        category_name: Some("Documentary".to_string()),
    }
}

pub fn actor(id: u32, first: &str, last: &str) -> ActorSummary {
    ActorSummary {
        actor_id: id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        film_count: None,
    }
}

pub fn customer(id: u32, email: &str) -> Customer {
    Customer {
        customer_id: id,
        store_id: Some(1),
        first_name: format!("FIRST{id}"),
        last_name: format!("LAST{id}"),
        email: Some(email.to_string()),
        active: true,
    }
}

// ===== MockRentalApi =====

#[derive(Default)]
struct Store {
    films: Vec<FilmSummary>,
    actors: Vec<ActorSummary>,
    customers: Vec<Customer>,
    /// (customer id, rental)
    rentals: Vec<(u32, RentalRecord)>,
}

/// In-memory service.
///
/// Records every call, can fail chosen operations, and can hold list
/// responses back until released to simulate out-of-order arrival.
#[derive(Default)]
pub struct MockRentalApi {
    store: RwLock<Store>,
    calls: RwLock<Vec<(&'static str, Option<ListParams>)>>,
    failures: RwLock<HashMap<&'static str, ApiError>>,
    held: RwLock<VecDeque<oneshot::Receiver<()>>>,
}

impl MockRentalApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_store(store: Store) -> Self {
        Self {
            store: RwLock::new(store),
            ..Self::default()
        }
    }

    /// Seed films alongside existing data.
    pub async fn add_films(&self, films: Vec<FilmSummary>) {
        self.store.write().await.films.extend(films);
    }

    pub fn with_films(films: Vec<FilmSummary>) -> Self {
        Self::with_store(Store {
            films,
            ..Store::default()
        })
    }

    pub fn with_actors(actors: Vec<ActorSummary>) -> Self {
        Self::with_store(Store {
            actors,
            ..Store::default()
        })
    }

    pub fn with_customers(customers: Vec<Customer>) -> Self {
        Self::with_store(Store {
            customers,
            ..Store::default()
        })
    }

    /// Make every call to `op` fail with `err` until [`MockRentalApi::recover`].
    pub async fn fail(&self, op: &'static str, err: ApiError) {
        self.failures.write().await.insert(op, err);
    }

    pub async fn recover(&self, op: &'static str) {
        self.failures.write().await.remove(op);
    }

    /// Hold the next list response until the returned sender fires.
    pub async fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.held.write().await.push_back(rx);
        tx
    }

    /// Number of calls to `op` so far.
    pub async fn calls(&self, op: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|(name, _)| *name == op)
            .count()
    }

    /// Parameters of every list call to `op`, oldest first.
    pub async fn list_calls(&self, op: &str) -> Vec<ListParams> {
        self.calls
            .read()
            .await
            .iter()
            .filter(|(name, _)| *name == op)
            .filter_map(|(_, params)| params.clone())
            .collect()
    }

    /// Yield until `op` has been called at least `n` times.
    pub async fn wait_for_calls(&self, op: &str, n: usize) {
        while self.calls(op).await < n {
            tokio::task::yield_now().await;
        }
    }

    pub async fn remove_customer(&self, id: u32) {
        self.store
            .write()
            .await
            .customers
            .retain(|c| c.customer_id != id);
    }

    pub async fn customer(&self, id: u32) -> Option<Customer> {
        self.store
            .read()
            .await
            .customers
            .iter()
            .find(|c| c.customer_id == id)
            .cloned()
    }

    pub async fn rentals_of(&self, customer_id: u32) -> Vec<RentalRecord> {
        self.store
            .read()
            .await
            .rentals
            .iter()
            .filter(|(owner, _)| *owner == customer_id)
            .map(|(_, rental)| rental.clone())
            .collect()
    }

    async fn record(&self, op: &'static str, params: Option<&ListParams>) -> ApiResult<()> {
        self.calls.write().await.push((op, params.cloned()));
        match self.failures.read().await.get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn release_gate(&self) {
        let gate = self.held.write().await.pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    async fn page_of<T: Clone>(
        &self,
        items: Vec<T>,
        params: &ListParams,
    ) -> ApiResult<PageResult<T>> {
        let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let skip = ((params.page.max(1) - 1) * params.limit) as usize;
        let page = items
            .into_iter()
            .skip(skip)
            .take(params.limit as usize)
            .collect();
        self.release_gate().await;
        Ok(PageResult::new(page, total))
    }
}

fn contains_ci(haystack: &str, query: &str) -> bool {
    haystack.to_lowercase().contains(&query.to_lowercase())
}

#[async_trait]
impl RentalApi for MockRentalApi {
    async fn list_films(&self, params: &ListParams) -> ApiResult<PageResult<FilmSummary>> {
        self.record("list_films", Some(params)).await?;
        let items: Vec<_> = self
            .store
            .read()
            .await
            .films
            .iter()
            .filter(|f| contains_ci(&f.title, &params.query))
            .cloned()
            .collect();
        self.page_of(items, params).await
    }

    async fn get_film(&self, film_id: u32) -> ApiResult<FilmDetail> {
        self.record("get_film", None).await?;
        let store = self.store.read().await;
        let film = store
            .films
            .iter()
            .find(|f| f.film_id == film_id)
            .ok_or_else(|| ApiError::NotFound {
                resource: "film".into(),
                id: film_id.to_string(),
                raw_message: None,
            })?;
        Ok(FilmDetail {
            film_id,
            title: film.title.clone(),
            description: Some(format!("A film called {}", film.title)),
            release_year: Some(2006),
            rental_duration: Some(3),
            rental_rate: Some(2.99),
            length: Some(90),
            replacement_cost: Some(19.99),
            rating: Some("PG".into()),
            special_features: None,
            last_update: None,
        })
    }

    async fn list_actors(&self, params: &ListParams) -> ApiResult<PageResult<ActorSummary>> {
        self.record("list_actors", Some(params)).await?;
        let items: Vec<_> = self
            .store
            .read()
            .await
            .actors
            .iter()
            .filter(|a| contains_ci(&a.full_name(), &params.query))
            .cloned()
            .collect();
        self.page_of(items, params).await
    }

    async fn get_actor(&self, actor_id: u32) -> ApiResult<ActorDetail> {
        self.record("get_actor", None).await?;
        let store = self.store.read().await;
        let actor = store
            .actors
            .iter()
            .find(|a| a.actor_id == actor_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: "actor".into(),
                id: actor_id.to_string(),
                raw_message: None,
            })?;
        let top_films = store
            .films
            .iter()
            .take(5)
            .map(|f| FilmRef {
                film_id: f.film_id,
                title: f.title.clone(),
            })
            .collect();
        Ok(ActorDetail { actor, top_films })
    }

    async fn list_customers(&self, params: &ListParams) -> ApiResult<PageResult<Customer>> {
        self.record("list_customers", Some(params)).await?;
        let items: Vec<_> = self
            .store
            .read()
            .await
            .customers
            .iter()
            .filter(|c| {
                contains_ci(&c.full_name(), &params.query)
                    || contains_ci(c.email.as_deref().unwrap_or_default(), &params.query)
            })
            .cloned()
            .collect();
        self.page_of(items, params).await
    }

    async fn get_customer_details(&self, customer_id: u32) -> ApiResult<CustomerDetails> {
        self.record("get_customer_details", None).await?;
        let store = self.store.read().await;
        let customer = store
            .customers
            .iter()
            .find(|c| c.customer_id == customer_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: "customer".into(),
                id: customer_id.to_string(),
                raw_message: None,
            })?;
        let rentals = store
            .rentals
            .iter()
            .filter(|(owner, _)| *owner == customer_id)
            .map(|(_, rental)| rental.clone())
            .collect();
        Ok(CustomerDetails { customer, rentals })
    }

    async fn create_customer(&self, req: &CreateCustomerRequest) -> ApiResult<()> {
        self.record("create_customer", None).await?;
        let mut store = self.store.write().await;
        if store
            .customers
            .iter()
            .any(|c| c.email.as_deref() == Some(req.email.as_str()))
        {
            return Err(ApiError::Conflict {
                status: 409,
                field: Some("email".into()),
                message: "Email already exists".into(),
            });
        }
        let id = store.customers.iter().map(|c| c.customer_id).max().unwrap_or(0) + 1;
        store.customers.push(Customer {
            customer_id: id,
            store_id: req.store_id,
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            email: Some(req.email.clone()),
            active: true,
        });
        Ok(())
    }

    async fn update_customer(
        &self,
        customer_id: u32,
        req: &UpdateCustomerRequest,
    ) -> ApiResult<()> {
        self.record("update_customer", None).await?;
        let mut store = self.store.write().await;
        let customer = store
            .customers
            .iter_mut()
            .find(|c| c.customer_id == customer_id)
            .ok_or_else(|| ApiError::NotFound {
                resource: "customer".into(),
                id: customer_id.to_string(),
                raw_message: None,
            })?;
        if let Some(v) = &req.first_name {
            customer.first_name.clone_from(v);
        }
        if let Some(v) = &req.last_name {
            customer.last_name.clone_from(v);
        }
        if let Some(v) = &req.email {
            customer.email = Some(v.clone());
        }
        if let Some(v) = req.store_id {
            customer.store_id = Some(v);
        }
        if let Some(v) = req.active {
            customer.active = v;
        }
        Ok(())
    }

    async fn delete_customer(&self, customer_id: u32) -> ApiResult<()> {
        self.record("delete_customer", None).await?;
        let mut store = self.store.write().await;
        let before = store.customers.len();
        store.customers.retain(|c| c.customer_id != customer_id);
        if store.customers.len() == before {
            return Err(ApiError::NotFound {
                resource: "customer".into(),
                id: customer_id.to_string(),
                raw_message: Some("Customer not found".into()),
            });
        }
        Ok(())
    }

    async fn rent_film(&self, req: &RentFilmRequest) -> ApiResult<RentalReceipt> {
        self.record("rent_film", None).await?;
        let mut store = self.store.write().await;
        let title = store
            .films
            .iter()
            .find(|f| f.film_id == req.film_id)
            .map(|f| f.title.clone());
        if !store.customers.iter().any(|c| c.customer_id == req.customer_id) {
            return Err(ApiError::Rejected {
                status: 400,
                message: "Customer not found".into(),
            });
        }
        let Some(title) = title else {
            return Err(ApiError::Rejected {
                status: 400,
                message: "Film not available".into(),
            });
        };
        let rental_id = u32::try_from(store.rentals.len()).unwrap_or(0) + 1;
        store.rentals.push((
            req.customer_id,
            RentalRecord {
                rental_id,
                film_id: Some(req.film_id),
                title: Some(title),
                rental_date: None,
                return_date: None,
            },
        ));
        Ok(RentalReceipt {
            message: Some("Film rented successfully".into()),
            rental_id: Some(rental_id),
        })
    }
}
