//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use rental_catalog_api::ApiError;

/// Core layer error type
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Service unreachable, timed out, unparseable response, or a failure
    /// status the service gave no usable message for.
    #[error("{0}")]
    Transport(String),

    /// The service refused the request with a message (conflict or other 4xx).
    #[error("{message}")]
    ValidationRejection {
        /// Form field the message refers to, when known.
        field: Option<String>,
        message: String,
    },

    /// Requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A required form field is missing or malformed.
    #[error("{field} is required")]
    Validation { field: String },

    /// The action is not allowed in the current modal mode.
    #[error("Action not permitted: {0}")]
    NotPermitted(String),

    /// Configuration file could not be read or parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CoreError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        !matches!(self, Self::Transport(_) | Self::Config(_))
    }

    /// Form field the error is attached to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationRejection { field, .. } => field.as_deref(),
            Self::Validation { field } => Some(field),
            _ => None,
        }
    }
}

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound {
                raw_message: Some(ref message),
                ..
            } if !message.trim().is_empty() => Self::NotFound(message.clone()),
            ApiError::NotFound { .. } => Self::NotFound(err.to_string()),
            ApiError::Conflict { field, message, .. } => {
                Self::ValidationRejection { field, message }
            }
            ApiError::Rejected { status, message } if (400..500).contains(&status) => {
                Self::ValidationRejection {
                    field: None,
                    message,
                }
            }
            ApiError::Refused { message } => Self::ValidationRejection {
                field: None,
                message,
            },
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
