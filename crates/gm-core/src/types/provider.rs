//! Backend provider tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A model backend provider.
///
/// Serialized in lower case. Parsing is case-insensitive.
///
/// # Examples
///
/// ```
/// use gm_core::Provider;
///
/// let provider: Provider = "GCP".parse().unwrap();
/// assert_eq!(provider, Provider::Gcp);
/// assert_eq!(provider.to_string(), "gcp");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google AI and Vertex AI.
    Gcp,
    /// Amazon Bedrock.
    Aws,
    /// OpenAI.
    OpenAi,
    /// Anthropic's first-party API.
    Anthropic,
    /// Locally served Ollama models.
    Ollama,
    /// Azure OpenAI.
    Azure,
    /// No known provider matched.
    #[default]
    Unknown,
}

impl Provider {
    /// Every provider, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Gcp,
        Self::Aws,
        Self::OpenAi,
        Self::Anthropic,
        Self::Ollama,
        Self::Azure,
        Self::Unknown,
    ];

    /// Returns the lower-case tag for this provider.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gcp => "gcp",
            Self::Aws => "aws",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
            Self::Azure => "azure",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for every provider except [`Provider::Unknown`].
    #[inline]
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Human-readable name used in reports.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Gcp => "Google Cloud (Google AI / Vertex AI)",
            Self::Aws => "AWS (Bedrock)",
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Ollama => "Ollama",
            Self::Azure => "Azure OpenAI",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider '{0}' (expected one of gcp, aws, openai, anthropic, ollama, azure)")]
pub struct ProviderParseError(pub String);

impl FromStr for Provider {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ProviderParseError(s.to_owned()))
    }
}
