//! 资源类型绑定：把影片 / 演员 / 客户映射到各自的列表与详情接口

use async_trait::async_trait;
use rental_catalog_api::{
    ActorDetail, ActorSummary, ApiResult, Customer, CustomerDetails, FilmDetail, FilmSummary,
    ListParams, PageResult, RentalApi,
};

/// A listable, selectable kind of entity.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Row type of the list.
    type Summary: Clone + Send + Sync + 'static;
    /// Record shown when a row is selected.
    type Detail: Clone + Send + Sync + 'static;

    /// Short name used in logs and messages.
    const NAME: &'static str;

    async fn list(api: &dyn RentalApi, params: &ListParams) -> ApiResult<PageResult<Self::Summary>>;

    async fn detail(api: &dyn RentalApi, id: u32) -> ApiResult<Self::Detail>;

    fn id_of(item: &Self::Summary) -> u32;
}

pub struct Films;

pub struct Actors;

pub struct Customers;

#[async_trait]
impl Resource for Films {
    type Summary = FilmSummary;
    type Detail = FilmDetail;

    const NAME: &'static str = "films";

    async fn list(api: &dyn RentalApi, params: &ListParams) -> ApiResult<PageResult<FilmSummary>> {
        api.list_films(params).await
    }

    async fn detail(api: &dyn RentalApi, id: u32) -> ApiResult<FilmDetail> {
        api.get_film(id).await
    }

    fn id_of(item: &FilmSummary) -> u32 {
        item.film_id
    }
}

#[async_trait]
impl Resource for Actors {
    type Summary = ActorSummary;
    type Detail = ActorDetail;

    const NAME: &'static str = "actors";

    async fn list(api: &dyn RentalApi, params: &ListParams) -> ApiResult<PageResult<ActorSummary>> {
        api.list_actors(params).await
    }

    async fn detail(api: &dyn RentalApi, id: u32) -> ApiResult<ActorDetail> {
        api.get_actor(id).await
    }

    fn id_of(item: &ActorSummary) -> u32 {
        item.actor_id
    }
}

#[async_trait]
impl Resource for Customers {
    type Summary = Customer;
    type Detail = CustomerDetails;

    const NAME: &'static str = "customers";

    async fn list(api: &dyn RentalApi, params: &ListParams) -> ApiResult<PageResult<Customer>> {
        api.list_customers(params).await
    }

    async fn detail(api: &dyn RentalApi, id: u32) -> ApiResult<CustomerDetails> {
        api.get_customer_details(id).await
    }

    fn id_of(item: &Customer) -> u32 {
        item.customer_id
    }
}
