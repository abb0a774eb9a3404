//! Recommendation records and their localized projection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::lang::DEFAULT_LANG;

/// A value keyed by language tag (e.g. `"en"`, `"hi"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localized<T>(HashMap<String, T>);

impl<T> Default for Localized<T> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<T> Localized<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, lang: impl Into<String>, value: T) -> Self {
        self.0.insert(lang.into(), value);
        self
    }

    pub fn get(&self, lang: &str) -> Option<&T> {
        self.0.get(lang)
    }

    pub fn contains(&self, lang: &str) -> bool {
        self.0.contains_key(lang)
    }

    /// Language tags present, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.0.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Clone + Default> Localized<T> {
    /// Value for `lang`, then for [`DEFAULT_LANG`], then the zero value.
    pub fn resolve(&self, lang: &str) -> T {
        self.0
            .get(lang)
            .or_else(|| self.0.get(DEFAULT_LANG))
            .cloned()
            .unwrap_or_default()
    }
}

impl<T> FromIterator<(String, T)> for Localized<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Composite natural key of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupKey {
    pub product_id: String,
    pub moisture: String,
    pub intended_use: String,
}

impl LookupKey {
    pub fn new(
        product_id: impl Into<String>,
        moisture: impl Into<String>,
        intended_use: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            moisture: moisture.into(),
            intended_use: intended_use.into(),
        }
    }
}

impl std::fmt::Display for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.product_id, self.moisture, self.intended_use
        )
    }
}

/// One stored recommendation document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    pub product_id: String,
    pub moisture: String,
    pub intended_use: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub process: Localized<Vec<String>>,
    #[serde(default)]
    pub final_output: Localized<String>,
    #[serde(default)]
    pub benefits: Localized<String>,
    #[serde(default)]
    pub notes: Localized<String>,
}

impl RecommendationRecord {
    pub fn key(&self) -> LookupKey {
        LookupKey::new(&self.product_id, &self.moisture, &self.intended_use)
    }

    /// The language used for every localized field of this record.
    ///
    /// Decided once from the `process` map: the requested tag if present
    /// there, otherwise [`DEFAULT_LANG`].
    pub fn effective_language<'a>(&self, requested: &'a str) -> &'a str {
        if self.process.contains(requested) {
            requested
        } else {
            DEFAULT_LANG
        }
    }

    /// Project this record onto a single language.
    ///
    /// Fields lacking the effective language fall back to [`DEFAULT_LANG`],
    /// and to an empty value when that is missing too.
    pub fn localize(&self, requested: &str) -> LocalizedView {
        let lang = self.effective_language(requested);
        LocalizedView {
            process: self.process.resolve(lang),
            final_output: self.final_output.resolve(lang),
            benefits: self.benefits.resolve(lang),
            notes: self.notes.resolve(lang),
        }
    }
}

/// The four-field projection returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedView {
    pub process: Vec<String>,
    pub final_output: String,
    pub benefits: String,
    pub notes: String,
}
