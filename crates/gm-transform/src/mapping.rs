//! Model equivalences between providers.

use std::collections::BTreeMap;

use gm_core::Provider;

/// Google model identifiers and their Bedrock counterparts.
const GCP_TO_AWS: &[(&str, &str)] = &[
    ("googleai/gemini-1.5-flash", "anthropic.claude-3-haiku-20240307-v1:0"),
    ("googleai/gemini-1.5-pro", "anthropic.claude-3-sonnet-20240229-v1:0"),
    ("googleai/gemini-2.0-flash", "anthropic.claude-3-5-sonnet-20241022-v2:0"),
    ("vertexai/gemini-pro", "anthropic.claude-3-sonnet-20240229-v1:0"),
    ("vertexai/gemini-1.5-pro", "anthropic.claude-3-sonnet-20240229-v1:0"),
    ("vertexai/gemini-1.5-flash", "anthropic.claude-3-haiku-20240307-v1:0"),
    ("googleai/gemini-1.5-flash-8b", "amazon.nova-lite-v1:0"),
    ("googleai/text-bison", "amazon.nova-micro-v1:0"),
];

/// Ordered old-name to new-name lookup for one provider pair.
///
/// # Examples
///
/// ```
/// use gm_core::Provider;
/// use gm_transform::model_mappings;
///
/// let map = model_mappings(Provider::Gcp, Provider::Aws);
/// assert_eq!(
///     map.get("googleai/gemini-1.5-pro"),
///     Some("anthropic.claude-3-sonnet-20240229-v1:0")
/// );
/// assert!(model_mappings(Provider::OpenAi, Provider::Aws).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelMap {
    entries: BTreeMap<&'static str, &'static str>,
}

impl ModelMap {
    /// Exact-match lookup.
    #[must_use]
    pub fn get(&self, model: &str) -> Option<&'static str> {
        self.entries.get(model).copied()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().map(|(old, new)| (*old, *new))
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pair has no known equivalences.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns the model equivalences from `source` to `target`.
///
/// Only Google to AWS is populated; every other pair yields an empty map.
#[must_use]
pub fn model_mappings(source: Provider, target: Provider) -> ModelMap {
    let table: &[(&str, &str)] = match (source, target) {
        (Provider::Gcp, Provider::Aws) => GCP_TO_AWS,
        _ => &[],
    };
    ModelMap {
        entries: table.iter().copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcp_to_aws_is_complete() {
        let map = model_mappings(Provider::Gcp, Provider::Aws);
        assert_eq!(map.len(), GCP_TO_AWS.len());
        assert_eq!(map.get("googleai/text-bison"), Some("amazon.nova-micro-v1:0"));
        assert_eq!(
            map.get("vertexai/gemini-1.5-flash"),
            Some("anthropic.claude-3-haiku-20240307-v1:0")
        );
    }

    #[test]
    fn test_lookup_is_exact() {
        let map = model_mappings(Provider::Gcp, Provider::Aws);
        assert_eq!(map.get("googleai/gemini-1.5-pro-latest"), None);
        assert_eq!(map.get("GOOGLEAI/GEMINI-1.5-PRO"), None);
        assert_eq!(map.get("gemini-1.5-pro"), None);
    }

    #[test]
    fn test_other_pairs_are_empty() {
        for source in Provider::ALL {
            for target in Provider::ALL {
                if (source, target) != (Provider::Gcp, Provider::Aws) {
                    assert!(model_mappings(source, target).is_empty());
                }
            }
        }
    }

    #[test]
    fn test_iteration_is_sorted() {
        let map = model_mappings(Provider::Gcp, Provider::Aws);
        let names: Vec<_> = map.iter().map(|(old, _)| old).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
