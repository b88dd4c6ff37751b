//! Catalog resource identity helpers.
//!
//! A catalog entity is identified by its canonical resource URL, e.g.
//! `https://swapi.info/api/people/1`. Detail routes and generated-asset
//! lookups use the short numeric identifier at the end of that URL.

use std::sync::LazyLock;

use regex::Regex;

static TRAILING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)/?$").expect("valid regex"));

/// Extract the trailing numeric identifier from a resource URL.
///
/// Returns the digit run of a final `/<digits>` or `/<digits>/` segment, or
/// an empty string when the URL has no such segment.
///
/// # Examples
///
/// ```
/// use holonet_core::ids::extract_id_from_url;
///
/// assert_eq!(extract_id_from_url("https://swapi.info/api/people/1/"), "1");
/// assert_eq!(extract_id_from_url("https://swapi.info/api/starships/5"), "5");
/// assert_eq!(extract_id_from_url("https://swapi.info/api/people"), "");
/// ```
pub fn extract_id_from_url(url: &str) -> &str {
    TRAILING_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

/// Returns `true` if the input is already an absolute `http(s)` URL and
/// must be requested verbatim rather than resolved against a base URL.
pub fn is_absolute_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
