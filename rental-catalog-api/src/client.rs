//! reqwest 实现的租赁目录服务客户端

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};
use crate::http_client::{ErrorContext, HttpUtils};
use crate::traits::RentalApi;
use crate::types::{
    ActorDetail, ActorSummary, CreateCustomerRequest, Customer, CustomerDetails, ErrorBody,
    FilmDetail, FilmSummary, ListEnvelope, ListParams, PageResult, RentFilmRequest, RentalReceipt,
    UpdateCustomerRequest,
};

/// Default service address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Largest page size the client will ever request.
pub const MAX_PAGE_SIZE: u32 = 100;

const FILMS_PATH: &str = "/films";
const FILM_DETAIL_PATH: &str = "/api/films";
const ACTORS_PATH: &str = "/api/actors";
const CUSTOMERS_PATH: &str = "/api/customers";
const RENT_PATH: &str = "/rent";

/// HTTP implementation of [`RentalApi`].
///
/// Read requests are retried on transient failures; mutations are sent once.
#[derive(Debug, Clone)]
pub struct HttpRentalApi {
    client: Client,
    base_url: String,
    max_retries: u32,
}

/// Builder for [`HttpRentalApi`].
#[derive(Debug, Clone)]
pub struct HttpRentalApiBuilder {
    base_url: String,
    max_retries: u32,
    timeout: Option<Duration>,
}

impl HttpRentalApiBuilder {
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Overall per-request timeout. Without one, the transport default applies.
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> ApiResult<HttpRentalApi> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ApiError::NetworkError {
            detail: format!("Failed to build HTTP client: {e}"),
        })?;

        Ok(HttpRentalApi {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            max_retries: self.max_retries,
        })
    }
}

impl HttpRentalApi {
    /// Start configuring a client for the service at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> HttpRentalApiBuilder {
        HttpRentalApiBuilder {
            base_url: base_url.into(),
            max_retries: 2,
            timeout: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET` a paginated (or bare-array) list.
    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        search_param: &str,
        params: &ListParams,
        resource: &str,
    ) -> ApiResult<PageResult<T>> {
        let params = params.validated(MAX_PAGE_SIZE);
        let url = self.url(path);
        let request = self.client.get(&url).query(&[
            ("page", params.page.to_string()),
            ("limit", params.limit.to_string()),
            (search_param, params.query.clone()),
        ]);

        let raw = HttpUtils::send_with_retry(request, "GET", &url, self.max_retries).await?;
        let body = HttpUtils::ensure_success(raw, ErrorContext::resource(resource))?;
        let envelope: ListEnvelope<T> = HttpUtils::decode(&body)?;
        Ok(envelope.into_page())
    }

    /// `GET` a single record.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, ctx: ErrorContext<'_>) -> ApiResult<T> {
        let url = self.url(path);
        let request = self.client.get(&url);
        let raw = HttpUtils::send_with_retry(request, "GET", &url, self.max_retries).await?;
        let body = HttpUtils::ensure_success(raw, ctx)?;
        HttpUtils::decode(&body)
    }

    /// Send a mutation once and return the raw success body.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        ctx: ErrorContext<'_>,
    ) -> ApiResult<String> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            let json = serde_json::to_string(body).map_err(|e| ApiError::SerializationError {
                detail: e.to_string(),
            })?;
            log::debug!("Request Body: {json}");
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(json);
        }

        let raw = HttpUtils::send_once(request, method.as_str(), &url).await?;
        HttpUtils::ensure_success(raw, ctx)
    }
}

#[async_trait]
impl RentalApi for HttpRentalApi {
    async fn list_films(&self, params: &ListParams) -> ApiResult<PageResult<FilmSummary>> {
        self.get_page(FILMS_PATH, "query", params, "film").await
    }

    async fn get_film(&self, film_id: u32) -> ApiResult<FilmDetail> {
        self.get_json(
            &format!("{FILM_DETAIL_PATH}/{film_id}"),
            ErrorContext::entity("film", film_id),
        )
        .await
    }

    async fn list_actors(&self, params: &ListParams) -> ApiResult<PageResult<ActorSummary>> {
        self.get_page(ACTORS_PATH, "query", params, "actor").await
    }

    async fn get_actor(&self, actor_id: u32) -> ApiResult<ActorDetail> {
        self.get_json(
            &format!("{ACTORS_PATH}/{actor_id}"),
            ErrorContext::entity("actor", actor_id),
        )
        .await
    }

    async fn list_customers(&self, params: &ListParams) -> ApiResult<PageResult<Customer>> {
        self.get_page(CUSTOMERS_PATH, "search", params, "customer")
            .await
    }

    async fn get_customer_details(&self, customer_id: u32) -> ApiResult<CustomerDetails> {
        self.get_json(
            &format!("{CUSTOMERS_PATH}/{customer_id}/details"),
            ErrorContext::entity("customer", customer_id),
        )
        .await
    }

    async fn create_customer(&self, req: &CreateCustomerRequest) -> ApiResult<()> {
        self.send(
            Method::POST,
            CUSTOMERS_PATH,
            Some(req),
            ErrorContext::resource("customer"),
        )
        .await
        .map(|_| ())
    }

    async fn update_customer(
        &self,
        customer_id: u32,
        req: &UpdateCustomerRequest,
    ) -> ApiResult<()> {
        self.send(
            Method::PATCH,
            &format!("{CUSTOMERS_PATH}/{customer_id}"),
            Some(req),
            ErrorContext::entity("customer", customer_id),
        )
        .await
        .map(|_| ())
    }

    async fn delete_customer(&self, customer_id: u32) -> ApiResult<()> {
        self.send::<()>(
            Method::DELETE,
            &format!("{CUSTOMERS_PATH}/{customer_id}"),
            None,
            ErrorContext::entity("customer", customer_id),
        )
        .await
        .map(|_| ())
    }

    async fn rent_film(&self, req: &RentFilmRequest) -> ApiResult<RentalReceipt> {
        let body = self
            .send(
                Method::POST,
                RENT_PATH,
                Some(req),
                ErrorContext::entity("film", req.film_id),
            )
            .await?;
        parse_rent_receipt(&body)
    }
}

/// A 2xx body may still carry `{ "error": ... }`; an empty or non-JSON body is a bare acknowledgement.
fn parse_rent_receipt(body: &str) -> ApiResult<RentalReceipt> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(RentalReceipt::default());
    }
    if let Ok(ErrorBody {
        error: Some(message),
        ..
    }) = serde_json::from_str::<ErrorBody>(trimmed)
    {
        if !message.trim().is_empty() {
            log::warn!("Rent rejected in success response: {message}");
            return Err(ApiError::Refused { message });
        }
    }
    Ok(serde_json::from_str(trimmed).unwrap_or_else(|_| RentalReceipt {
        message: Some(trimmed.to_string()),
        rental_id: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_strips_trailing_slash() {
        let api = HttpRentalApi::builder("http://localhost:5000/")
            .max_retries(0)
            .build()
            .unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(api.url("/films"), "http://localhost:5000/films");
    }

    #[test]
    fn rent_receipt_from_message() {
        let receipt = parse_rent_receipt(r#"{"message":"Film rented successfully"}"#).unwrap();
        assert_eq!(receipt.message.as_deref(), Some("Film rented successfully"));
    }

    #[test]
    fn rent_receipt_empty_body() {
        assert_eq!(parse_rent_receipt("").unwrap(), RentalReceipt::default());
    }

    #[test]
    fn rent_receipt_plain_text() {
        let receipt = parse_rent_receipt("OK").unwrap();
        assert_eq!(receipt.message.as_deref(), Some("OK"));
    }

    #[test]
    fn rent_error_in_success_body_is_rejected() {
        let err = parse_rent_receipt(r#"{"error":"Customer not found"}"#).unwrap_err();
        assert_eq!(
            err,
            ApiError::Refused {
                message: "Customer not found".into(),
            }
        );
    }
}
