//! Project-level facts that don't come from Go source: configuration files
//! at the root and the dominant model provider.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use gm_core::{Model, Provider};
use rustc_hash::FxHashMap;

/// Configuration files looked for at the project root.
pub const CONFIG_FILES: &[&str] = &["config.yaml", "config.json", ".env", "app.yaml"];

/// Returns the [`CONFIG_FILES`] present at `root`, name to absolute path.
#[must_use]
pub fn probe_config_files(root: &Utf8Path) -> BTreeMap<String, Utf8PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| ((*name).to_owned(), root.join(name)))
        .filter(|(_, path)| path.is_file())
        .collect()
}

/// Picks a project's source provider from the models it references.
///
/// The most frequent known provider wins; ties go to the one seen first.
/// Models of unknown provenance don't vote.
///
/// # Examples
///
/// ```
/// use gm_core::{Model, Provider, SourceLocation};
/// use gm_scanner::ProviderDetector;
///
/// let at = SourceLocation::default();
/// let models = [
///     Model::new("openai/gpt-4", Provider::OpenAi, at.clone()),
///     Model::new("googleai/gemini-1.5-pro", Provider::Gcp, at.clone()),
///     Model::new("googleai/gemini-1.5-flash", Provider::Gcp, at),
/// ];
/// assert_eq!(ProviderDetector::detect(&models), Some(Provider::Gcp));
/// ```
#[derive(Debug, Default)]
pub struct ProviderDetector {
    counts: FxHashMap<Provider, usize>,
    first_seen: Vec<Provider>,
}

impl ProviderDetector {
    /// Creates an empty detector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one model's provider.
    pub fn observe(&mut self, provider: Provider) {
        if !provider.is_known() {
            return;
        }
        let count = self.counts.entry(provider).or_insert(0);
        if *count == 0 {
            self.first_seen.push(provider);
        }
        *count += 1;
    }

    /// The dominant provider so far, if any known provider was observed.
    #[must_use]
    pub fn dominant(&self) -> Option<Provider> {
        let mut best: Option<(Provider, usize)> = None;
        for provider in &self.first_seen {
            let count = self.counts.get(provider).copied().unwrap_or_default();
            // Strictly greater keeps the earlier provider on a tie
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((*provider, count));
            }
        }
        best.map(|(provider, _)| provider)
    }

    /// Convenience over [`observe`](Self::observe) and
    /// [`dominant`](Self::dominant).
    #[must_use]
    pub fn detect(models: &[Model]) -> Option<Provider> {
        let mut detector = Self::new();
        for model in models {
            detector.observe(model.provider);
        }
        detector.dominant()
    }
}
