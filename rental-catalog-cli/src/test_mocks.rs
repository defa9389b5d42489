use async_trait::async_trait;
use rental_catalog_api::{
    ActorDetail, ActorSummary, ApiError, ApiResult, CreateCustomerRequest, Customer,
    CustomerDetails, FilmDetail, FilmSummary, ListParams, PageResult, RentFilmRequest,
    RentalApi, RentalReceipt, UpdateCustomerRequest,
};
use tokio::sync::Mutex;

/// Test-only service with a fixed film catalog and a mutable customer table.
pub struct StubRentalApi {
    films: Vec<FilmSummary>,
    customers: Mutex<Vec<Customer>>,
    rents: Mutex<Vec<RentFilmRequest>>,
}

impl StubRentalApi {
    pub fn seeded(films: u32, customers: u32) -> Self {
        Self {
            films: (1..=films)
                .map(|id| FilmSummary {
                    film_id: id,
                    title: format!("FILM {id:02}"),
                    category_name: None,
                })
                .collect(),
            customers: Mutex::new(
                (1..=customers)
                    .map(|id| Customer {
                        customer_id: id,
                        store_id: Some(1),
                        first_name: format!("FIRST{id}"),
                        last_name: format!("LAST{id}"),
                        email: Some(format!("c{id}@example.test")),
                        active: true,
                    })
                    .collect(),
            ),
            rents: Mutex::new(Vec::new()),
        }
    }

    pub async fn customer_count(&self) -> usize {
        self.customers.lock().await.len()
    }

    pub async fn rent_count(&self) -> usize {
        self.rents.lock().await.len()
    }
}

fn page_of<T: Clone>(items: &[T], params: &ListParams) -> PageResult<T> {
    let total = u32::try_from(items.len()).unwrap();
    let skip = ((params.page.max(1) - 1) * params.limit) as usize;
    PageResult::new(
        items.iter().skip(skip).take(params.limit as usize).cloned().collect(),
        total,
    )
}

fn not_found(resource: &str, id: u32) -> ApiError {
    ApiError::NotFound {
        resource: resource.into(),
        id: id.to_string(),
        raw_message: None,
    }
}

#[async_trait]
impl RentalApi for StubRentalApi {
    async fn list_films(&self, params: &ListParams) -> ApiResult<PageResult<FilmSummary>> {
        let query = params.query.to_lowercase();
        let matching: Vec<_> = self
            .films
            .iter()
            .filter(|f| f.title.to_lowercase().contains(&query))
            .cloned()
            .collect();
        Ok(page_of(&matching, params))
    }

    async fn get_film(&self, film_id: u32) -> ApiResult<FilmDetail> {
        let film = self
            .films
            .iter()
            .find(|f| f.film_id == film_id)
            .ok_or_else(|| not_found("film", film_id))?;
        Ok(FilmDetail {
            film_id,
            title: film.title.clone(),
            description: None,
            release_year: None,
            rental_duration: None,
            rental_rate: None,
            length: None,
            replacement_cost: None,
            rating: None,
            special_features: None,
            last_update: None,
        })
    }

    async fn list_actors(&self, _params: &ListParams) -> ApiResult<PageResult<ActorSummary>> {
        Ok(PageResult::empty())
    }

    async fn get_actor(&self, actor_id: u32) -> ApiResult<ActorDetail> {
        Err(not_found("actor", actor_id))
    }

    async fn list_customers(&self, params: &ListParams) -> ApiResult<PageResult<Customer>> {
        let customers = self.customers.lock().await;
        Ok(page_of(customers.as_slice(), params))
    }

    async fn get_customer_details(&self, customer_id: u32) -> ApiResult<CustomerDetails> {
        let customers = self.customers.lock().await;
        let customer = customers
            .iter()
            .find(|c| c.customer_id == customer_id)
            .cloned()
            .ok_or_else(|| not_found("customer", customer_id))?;
        Ok(CustomerDetails {
            customer,
            rentals: Vec::new(),
        })
    }

    async fn create_customer(&self, req: &CreateCustomerRequest) -> ApiResult<()> {
        let mut customers = self.customers.lock().await;
        let id = customers.iter().map(|c| c.customer_id).max().unwrap_or(0) + 1;
        customers.push(Customer {
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
        _customer_id: u32,
        _req: &UpdateCustomerRequest,
    ) -> ApiResult<()> {
        Ok(())
    }

    async fn delete_customer(&self, customer_id: u32) -> ApiResult<()> {
        self.customers
            .lock()
            .await
            .retain(|c| c.customer_id != customer_id);
        Ok(())
    }

    async fn rent_film(&self, req: &RentFilmRequest) -> ApiResult<RentalReceipt> {
        self.rents.lock().await.push(*req);
        Ok(RentalReceipt {
            message: Some("Film rented successfully".into()),
            rental_id: Some(1),
        })
    }
}
