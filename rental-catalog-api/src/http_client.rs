//! Request plumbing shared by every endpoint of [`HttpRentalApi`](crate::HttpRentalApi)
//!
//! Endpoints build their own `RequestBuilder`; this module sends it, maps the
//! status to an [`ApiError`] and retries transient failures.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ApiError;
use crate::types::ErrorBody;
use crate::utils::log_sanitizer::truncate_for_log;

/// What a failed request was about, used to build precise errors.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ErrorContext<'a> {
    /// Entity kind, e.g. `"film"`.
    pub resource: Option<&'a str>,
    /// Entity id, for detail/mutation requests.
    pub id: Option<u32>,
}

impl<'a> ErrorContext<'a> {
    pub fn entity(resource: &'a str, id: u32) -> Self {
        Self {
            resource: Some(resource),
            id: Some(id),
        }
    }

    pub fn resource(resource: &'a str) -> Self {
        Self {
            resource: Some(resource),
            id: None,
        }
    }
}

/// Status line and body text of one exchange.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

const BASE_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(10);
const MAX_RETRY_AFTER_SECS: u64 = 30;

pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Send once and read the body.
    ///
    /// 429 becomes [`ApiError::RateLimited`] and 502..=504 becomes
    /// [`ApiError::NetworkError`] so the retry loop can see them. Every other
    /// status is returned as-is for [`HttpUtils::ensure_success`].
    pub async fn send_once(
        request: RequestBuilder,
        method: &str,
        url: &str,
    ) -> Result<RawResponse, ApiError> {
        log::debug!("{method} {url}");

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        // headers must be read before the body consumes the response
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::NetworkError {
                detail: format!("{method} {url}: body unreadable: {e}"),
            })?;
        log::debug!("{method} {url} -> {status}: {}", truncate_for_log(&body));

        match status {
            429 => {
                log::warn!("{method} {url} rate limited, retry-after {retry_after:?}");
                Err(ApiError::RateLimited {
                    retry_after,
                    raw_message: Some(body).filter(|b| !b.trim().is_empty()),
                })
            }
            502..=504 => Err(ApiError::NetworkError {
                detail: format!("HTTP {status}: {}", truncate_for_log(&body)),
            }),
            _ => Ok(RawResponse { status, body }),
        }
    }

    /// Turn a non-2xx status into the matching [`ApiError`]; pass 2xx bodies through.
    ///
    /// The display message is the body's `error` (or `message`) field when the
    /// body is JSON, otherwise the raw text, otherwise the status line.
    pub fn ensure_success(raw: RawResponse, ctx: ErrorContext<'_>) -> Result<String, ApiError> {
        let RawResponse { status, body } = raw;
        if (200..300).contains(&status) {
            return Ok(body);
        }

        let extracted = extract_message(&body);
        let message = extracted
            .clone()
            .unwrap_or_else(|| format!("HTTP {status}"));

        let err = match status {
            404 => ApiError::NotFound {
                resource: ctx.resource.unwrap_or("resource").to_string(),
                id: ctx.id.map(|id| id.to_string()).unwrap_or_default(),
                raw_message: extracted,
            },
            409 => ApiError::Conflict {
                status,
                field: conflicting_field(&message),
                message,
            },
            400 | 422 if looks_like_conflict(&message) => ApiError::Conflict {
                status,
                field: conflicting_field(&message),
                message,
            },
            _ => ApiError::Rejected { status, message },
        };

        if err.is_expected() {
            log::warn!("Request rejected: {err}");
        } else {
            log::error!("Request failed: {err}");
        }
        Err(err)
    }

    /// Deserialize a 2xx body.
    pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| {
            log::error!("Unexpected response shape ({e}): {}", truncate_for_log(body));
            ApiError::ParseError {
                detail: e.to_string(),
            }
        })
    }

    /// [`HttpUtils::send_once`], repeated while the error is transient.
    ///
    /// Waits `Retry-After` (at most 30 s) after a 429, otherwise backs off
    /// exponentially from 100 ms up to 10 s. Statuses the service answered
    /// with are never retried. Only use this for idempotent requests.
    pub async fn send_with_retry(
        request: RequestBuilder,
        method: &str,
        url: &str,
        max_retries: u32,
    ) -> Result<RawResponse, ApiError> {
        let mut attempt = 0;
        loop {
            let Some(this_try) = request.try_clone() else {
                log::warn!("{method} {url}: request is not cloneable, sending once");
                return Self::send_once(request, method, url).await;
            };
            match Self::send_once(this_try, method, url).await {
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let wait = retry_delay(&e, attempt);
                    attempt += 1;
                    log::warn!(
                        "{method} {url}: {e}; retry {attempt}/{max_retries} in {} ms",
                        wait.as_millis()
                    );
                    tokio::time::sleep(wait).await;
                }
                outcome => return outcome,
            }
        }
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout {
            detail: e.to_string(),
        }
    } else {
        ApiError::NetworkError {
            detail: e.to_string(),
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(parsed) => parsed.into_message(),
        Err(_) => Some(trimmed.to_string()),
    }
}

/// 400/422 responses that report a uniqueness violation rather than a malformed request.
fn looks_like_conflict(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["already", "exists", "duplicate", "in use", "taken"]
        .iter()
        .any(|needle| lower.contains(needle))
}

fn conflicting_field(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    if lower.contains("email") || lower.contains("e-mail") {
        Some("email".to_string())
    } else {
        None
    }
}

fn retry_delay(error: &ApiError, attempt: u32) -> Duration {
    match error {
        ApiError::RateLimited {
            retry_after: Some(secs),
            ..
        } => Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS)),
        _ => BASE_BACKOFF
            .saturating_mul(2_u32.saturating_pow(attempt))
            .min(MAX_BACKOFF),
    }
}
