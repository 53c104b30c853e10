//! Generation provider boundary.
//!
//! The core treats text generation as an opaque capability: a prompt pair
//! goes in, raw model text comes out. The two concrete REST adapters live
//! in `kamishibai-interaction`.

use crate::error::DeckError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Identifies which provider produced a raw response.
///
/// Normalization uses this to pick provider-specific default text (e.g. the
/// deck subtitle) when the model omitted a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderTag {
    OpenAi,
    Gemini,
}

impl ProviderTag {
    /// Default deck subtitle used when the model response has none.
    pub fn default_subtitle(&self) -> &'static str {
        match self {
            ProviderTag::OpenAi => "OpenAI GPTで生成されたプレゼンテーション",
            ProviderTag::Gemini => "Gemini 2.5 Proで生成されたプレゼンテーション",
        }
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderTag::OpenAi => write!(f, "openai"),
            ProviderTag::Gemini => write!(f, "gemini"),
        }
    }
}

/// Errors surfaced by a generation provider adapter.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The adapter could not carry out the request at all
    /// (missing configuration, unusable payload, ...).
    #[error("Provider execution failed: {0}")]
    ExecutionFailed(String),

    /// The remote API answered with an error or the transport failed.
    #[error("Provider request failed (status: {status_code:?}): {message}")]
    Http {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// Anything else (malformed response body, etc.).
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Whether the caller may retry the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http { is_retryable: true, .. })
    }

    /// Server-suggested retry delay, when one was provided.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Http { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<ProviderError> for DeckError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err.to_string())
    }
}

/// An abstract "prompt in, raw text out" generation capability.
///
/// Both concrete providers are behaviorally identical from the core's
/// perspective; only their default text differs (see [`ProviderTag`]).
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// The tag used for provider-specific normalization defaults.
    fn tag(&self) -> ProviderTag;

    /// Sends the prompt pair and returns the raw model text.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
    -> Result<String, ProviderError>;
}
