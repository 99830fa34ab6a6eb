//! Request-scoped number formatting driven by `Accept-Language`.
//!
//! Each request builds its own [`NumberFormatter`] from the caller's
//! language preferences. Nothing here touches process-wide locale state,
//! so concurrent requests with different preferences never observe each
//! other's formatting.

use num_format::{Locale, ToFormattedString};
use tracing::debug;

/// Splits an `Accept-Language` header into language tags.
///
/// Quality weights after `;` are stripped and the header order is kept;
/// weights are not used for re-sorting. Empty entries and the `*`
/// wildcard are dropped.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    header
        .split(',')
        .filter_map(|entry| entry.split(';').next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != "*")
        .map(String::from)
        .collect()
}

/// Normalizes a language tag and looks up a matching formatting locale.
///
/// POSIX spellings such as `de_DE.UTF-8@euro` are accepted. The full tag
/// is tried first, then its bare language subtag. Returns `None` for
/// unknown or malformed tags.
pub fn locale_for_tag(tag: &str) -> Option<Locale> {
    let subtags = canonical_subtags(tag)?;

    let full = subtags.join("-");
    if let Ok(locale) = Locale::from_name(&full) {
        return Some(locale);
    }
    if subtags.len() > 1 {
        return Locale::from_name(&subtags[0]).ok();
    }
    None
}

/// Returns the locale of the first preference that can be activated,
/// or `fallback` when none can.
///
/// Unusable candidates are skipped; resolution never fails.
pub fn resolve_locale<I, S>(preferences: I, fallback: Locale) -> Locale
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for preference in preferences {
        let tag = preference.as_ref();
        match locale_for_tag(tag) {
            Some(locale) => {
                debug!(tag, locale = locale.name(), "activated formatting locale");
                return locale;
            }
            None => debug!(tag, "skipping unsupported language tag"),
        }
    }
    fallback
}

/// Splits a tag into BCP 47 style subtags with canonical casing.
fn canonical_subtags(tag: &str) -> Option<Vec<String>> {
    // Drop POSIX codeset and modifier suffixes.
    let tag = tag.trim().split(['.', '@']).next()?;
    if tag.is_empty() {
        return None;
    }

    let mut subtags = Vec::new();
    for (i, part) in tag.split(['-', '_']).enumerate() {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        let canonical = match (i, part.len()) {
            (0, 2..=3) if part.chars().all(|c| c.is_ascii_alphabetic()) => {
                part.to_ascii_lowercase()
            }
            (0, _) => return None,
            (_, 2) if part.chars().all(|c| c.is_ascii_alphabetic()) => part.to_ascii_uppercase(),
            (_, 4) if part.chars().all(|c| c.is_ascii_alphabetic()) => {
                let mut chars = part.chars();
                let first = chars.next()?.to_ascii_uppercase();
                std::iter::once(first)
                    .chain(chars.map(|c| c.to_ascii_lowercase()))
                    .collect()
            }
            _ => part.to_ascii_lowercase(),
        };
        subtags.push(canonical);
    }
    Some(subtags)
}

/// Formats integers with the grouping rules of one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormatter {
    locale: Locale,
}

impl NumberFormatter {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Builds a formatter from ordered language preferences.
    #[must_use]
    pub fn from_preferences<I, S>(preferences: I, fallback: Locale) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(resolve_locale(preferences, fallback))
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Formats `value` with the locale's thousands separator.
    pub fn format(&self, value: u64) -> String {
        value.to_formatted_string(&self.locale)
    }
}

impl Default for NumberFormatter {
    fn default() -> Self {
        Self::new(Locale::en)
    }
}
