use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all rental catalog service calls.
///
/// Every network call made through [`RentalApi`](crate::RentalApi) is converted into one of
/// these variants; transport exceptions never escape as anything else.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError) - network connectivity issues, HTTP 502/503/504
/// - [`Timeout`](Self::Timeout) - request timed out
/// - [`RateLimited`](Self::RateLimited) - HTTP 429
///
/// The built-in HTTP client retries these with exponential backoff on read requests.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ApiError {
    /// A network-level error occurred (connection refused, DNS failure, gateway errors, etc.).
    #[error("Network error: {detail}")]
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("Request timed out: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The service rate limit has been exceeded (HTTP 429).
    #[error("Rate limited (HTTP 429){}", .raw_message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    RateLimited {
        /// Suggested wait time in seconds before retrying, if provided.
        retry_after: Option<u64>,
        /// Original body, if any.
        raw_message: Option<String>,
    },

    /// The requested entity does not exist (HTTP 404).
    #[error("{resource} {id} not found")]
    NotFound {
        /// Kind of entity, e.g. `"customer"`.
        resource: String,
        /// Id that was requested.
        id: String,
        /// Original error message from the service, if available.
        raw_message: Option<String>,
    },

    /// The service refused the request because it conflicts with existing data
    /// (e.g. a customer with the same email already exists).
    #[error("HTTP {status}: {message}")]
    Conflict {
        /// HTTP status code.
        status: u16,
        /// Form field the conflict refers to, when it can be identified.
        field: Option<String>,
        /// Message reported by the service, verbatim.
        message: String,
    },

    /// Any other non-success status.
    #[error("HTTP {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message reported by the service (the `error` field, or the raw body).
        message: String,
    },

    /// A success response whose body carries an `error` message instead of a result.
    #[error("{message}")]
    Refused {
        /// Message reported by the service, verbatim.
        message: String,
    },

    /// Failed to parse a response body.
    #[error("Failed to parse response: {detail}")]
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    #[error("Failed to serialize request: {detail}")]
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },
}

impl ApiError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Conflict { .. } | Self::Refused { .. } => true,
            Self::Rejected { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// Whether the failure is transient and the request may be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// HTTP status code carried by the error, when the service responded at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { status, .. } | Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for service calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
