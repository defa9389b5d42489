use async_trait::async_trait;

use crate::error::ApiResult;
use crate::types::{
    ActorDetail, ActorSummary, CreateCustomerRequest, Customer, CustomerDetails, FilmDetail,
    FilmSummary, ListParams, PageResult, RentFilmRequest, RentalReceipt, UpdateCustomerRequest,
};

/// 租赁目录服务 Trait
///
/// Every operation the client needs from the remote service. The HTTP
/// implementation is [`HttpRentalApi`](crate::HttpRentalApi); tests substitute
/// in-memory implementations.
#[async_trait]
pub trait RentalApi: Send + Sync {
    /// 影片列表 (分页 + 搜索)
    async fn list_films(&self, params: &ListParams) -> ApiResult<PageResult<FilmSummary>>;

    /// 影片详情
    async fn get_film(&self, film_id: u32) -> ApiResult<FilmDetail>;

    /// 演员列表 (分页 + 搜索)
    async fn list_actors(&self, params: &ListParams) -> ApiResult<PageResult<ActorSummary>>;

    /// 演员详情（含热门影片）
    async fn get_actor(&self, actor_id: u32) -> ApiResult<ActorDetail>;

    /// 客户列表 (分页 + 搜索)
    async fn list_customers(&self, params: &ListParams) -> ApiResult<PageResult<Customer>>;

    /// 客户详情（含租赁记录）
    async fn get_customer_details(&self, customer_id: u32) -> ApiResult<CustomerDetails>;

    /// 创建客户
    ///
    /// The created record is not returned: callers re-fetch the list instead.
    async fn create_customer(&self, req: &CreateCustomerRequest) -> ApiResult<()>;

    /// 更新客户（仅发送变更字段）
    async fn update_customer(
        &self,
        customer_id: u32,
        req: &UpdateCustomerRequest,
    ) -> ApiResult<()>;

    /// 删除客户
    async fn delete_customer(&self, customer_id: u32) -> ApiResult<()>;

    /// 租借影片给客户
    async fn rent_film(&self, req: &RentFilmRequest) -> ApiResult<RentalReceipt>;
}
