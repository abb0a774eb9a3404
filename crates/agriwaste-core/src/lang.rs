//! Language tags used as keys of localized record fields.

/// Fallback language. Every record is expected to carry it.
pub const DEFAULT_LANG: &str = "en";

/// Normalize a requested language tag.
///
/// Absent, empty, or whitespace-only input becomes [`DEFAULT_LANG`].
/// Anything else is trimmed and kept as-is: stored keys are matched exactly.
pub fn normalize(requested: Option<&str>) -> &str {
    match requested.map(str::trim) {
        Some(tag) if !tag.is_empty() => tag,
        _ => DEFAULT_LANG,
    }
}
