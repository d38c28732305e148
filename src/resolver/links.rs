// Link extraction from shared text
//
// Share sheets wrap the actual link in arbitrary text: titles, hashtags,
// emoji, "copy this link" instructions. Only http(s) links are returned, and
// a link ends at the first character outside the RFC 3986 URL set.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL_RE: Regex = Regex::new(
        r"https?://[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=%]+"
    )
    .unwrap();
}

/// Characters that close a sentence rather than a URL
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '\''];

/// Extract links in order of appearance, deduplicated by first occurrence
pub fn extract_links(text: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();

    for m in URL_RE.find_iter(text) {
        let candidate = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        if !has_host(candidate) {
            continue;
        }
        if !links.iter().any(|l| l == candidate) {
            links.push(candidate.to_string());
        }
    }

    links
}

/// First link in the text, if any
pub fn first_link(text: &str) -> Option<String> {
    extract_links(text).into_iter().next()
}

fn has_host(candidate: &str) -> bool {
    candidate
        .split_once("://")
        .map_or(false, |(_, rest)| !rest.is_empty())
}
