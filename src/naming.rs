//! Identifier normalization for JSON keys.
//!
//! | JSON key | [`field_name`] | [`type_name`] |
//! |----------|----------------|---------------|
//! | `address_line` | `addressLine` | `AddressLine` |
//! | `Name` | `name` | `Name` |
//! | `ID` | `id` | `ID` |
//! | `first-name` | `firstName` | `FirstName` |
//! | `1st` | `_1st` | `_1st` |
//! | `日本` | `日本` | `日本` |
//!
//! Letters and digits of any script are kept; everything else separates words.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_IDENT: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)] // constant pattern
    Regex::new(r"[^\p{L}\p{N}_]").unwrap()
});

/// Member name for a JSON key: camel case with a lower-case first letter.
pub fn field_name(key: &str) -> String {
    to_camel_case(key, false)
}

/// Candidate nested-type name for a JSON key: camel case, capitalized.
pub fn type_name(key: &str) -> String {
    to_camel_case(key, true)
}

/// Collapse underscore-separated (or otherwise delimited) tokens into one
/// camel-case identifier.
pub fn to_camel_case(key: &str, upper_first: bool) -> String {
    let cleaned = NON_IDENT.replace_all(key, "_");
    let mut words = cleaned.split('_').filter(|w| !w.is_empty());

    let mut out = match words.next() {
        None => return "_".to_string(),
        Some(first) if upper_first => capitalize(first),
        Some(first) => decapitalize(first),
    };
    for w in words {
        out.push_str(&capitalize(w));
    }
    if out.starts_with(|c: char| c.is_numeric()) {
        out.insert(0, '_');
    }
    out
}

/// Capitalize the first letter of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

// `ID` → `id`, `Name` → `name`, `nAME` → `nAME`
fn decapitalize(s: &str) -> String {
    let shouting = s.chars().any(|c| c.is_ascii_alphabetic())
        && !s.chars().any(|c| c.is_lowercase());
    if shouting {
        return s.to_lowercase();
    }
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}
