//! Provider classification from model identifiers.
//!
//! Model identifiers carry their provider in a prefix (`googleai/`,
//! `openai/`) or, for Bedrock, in a vendor-dotted id (`anthropic.claude-...`,
//! `amazon.nova-...`). Looser fragments such as `gpt-` are tried last so a
//! Bedrock id naming a Claude model is still attributed to AWS.

use gm_core::Provider;

/// Ordered substring table. The first marker contained in the identifier wins.
pub const PROVIDER_MARKERS: &[(&str, Provider)] = &[
    ("googleai/", Provider::Gcp),
    ("vertexai/", Provider::Gcp),
    ("openai/", Provider::OpenAi),
    ("anthropic/", Provider::Anthropic),
    ("ollama/", Provider::Ollama),
    ("bedrock/", Provider::Aws),
    ("amazon.", Provider::Aws),
    ("anthropic.", Provider::Aws),
    ("gpt-", Provider::OpenAi),
    ("claude-", Provider::Anthropic),
];

/// Infers the provider of a model identifier.
///
/// Matching is case-insensitive. Identifiers matching no marker are
/// [`Provider::Unknown`].
///
/// # Examples
///
/// ```
/// use gm_core::Provider;
/// use gm_go_parser::classify_model;
///
/// assert_eq!(classify_model("googleai/gemini-1.5-pro"), Provider::Gcp);
/// assert_eq!(classify_model("openai/gpt-4"), Provider::OpenAi);
/// assert_eq!(classify_model("anthropic/claude-3"), Provider::Anthropic);
/// assert_eq!(classify_model("unknown-model"), Provider::Unknown);
/// ```
#[must_use]
pub fn classify_model(name: &str) -> Provider {
    let lowered = name.to_ascii_lowercase();
    PROVIDER_MARKERS
        .iter()
        .find(|(marker, _)| lowered.contains(marker))
        .map_or(Provider::Unknown, |&(_, provider)| provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_identifiers() {
        assert_eq!(classify_model("vertexai/gemini-pro"), Provider::Gcp);
        assert_eq!(classify_model("ollama/llama3"), Provider::Ollama);
        assert_eq!(classify_model("bedrock/titan"), Provider::Aws);
    }

    #[test]
    fn test_bedrock_ids_are_aws() {
        assert_eq!(
            classify_model("anthropic.claude-3-sonnet-20240229-v1:0"),
            Provider::Aws
        );
        assert_eq!(classify_model("amazon.nova-pro-v1:0"), Provider::Aws);
    }

    #[test]
    fn test_loose_fragments() {
        assert_eq!(classify_model("gpt-4o-mini"), Provider::OpenAi);
        assert_eq!(classify_model("claude-3-haiku"), Provider::Anthropic);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify_model("GoogleAI/Gemini-1.5-Flash"), Provider::Gcp);
        assert_eq!(classify_model("OPENAI/GPT-4O"), Provider::OpenAi);
        assert_eq!(classify_model("Claude-3-Opus"), Provider::Anthropic);
        assert_eq!(classify_model("Ollama/Llama3"), Provider::Ollama);
    }

    #[test]
    fn test_bedrock_vendor_id_wins_over_model_family() {
        // The Bedrock vendor prefix is checked before the Claude family
        // fragment, whatever the casing.
        for id in [
            "anthropic.claude-3-sonnet-20240229-v1:0",
            "Anthropic.Claude-3-Haiku-20240307-v1:0",
            "ANTHROPIC.CLAUDE-V2",
        ] {
            assert_eq!(classify_model(id), Provider::Aws, "{id}");
        }
        let position = |marker: &str| {
            PROVIDER_MARKERS
                .iter()
                .position(|(m, _)| *m == marker)
                .expect("marker listed")
        };
        assert!(position("anthropic.") < position("claude-"));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify_model(""), Provider::Unknown);
        assert_eq!(classify_model("mistral-large"), Provider::Unknown);
    }
}
