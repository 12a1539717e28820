use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

/// Find the first http(s) URL in free-form text.
///
/// The match is returned exactly as it appears in the text; trailing
/// punctuation glued to the URL is not stripped.
pub fn extract(text: &str) -> Option<&str> {
    URL_RE.find(text).map(|m| m.as_str())
}
