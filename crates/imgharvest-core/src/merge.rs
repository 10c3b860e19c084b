//! Positional merge of rendered and decoded URLs, then order-preserving dedup.

use std::collections::HashSet;

/// Walks the rendered slots in order. Real sources are kept; each placeholder
/// takes the next unused decoded URL (if any). Decoded URLs left over at the
/// end are appended. Placeholders with nothing left to fill them disappear.
pub fn merge_positional(rendered: &[Option<String>], decoded: Vec<String>) -> Vec<String> {
    let mut decoded = decoded.into_iter();
    let mut merged = Vec::with_capacity(rendered.len());
    for slot in rendered {
        match slot {
            Some(src) => merged.push(src.clone()),
            None => {
                if let Some(url) = decoded.next() {
                    merged.push(url);
                }
            }
        }
    }
    merged.extend(decoded);
    merged
}

/// Drops empty strings and repeats; the first occurrence of each URL wins.
pub fn dedupe_preserving_order<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| !url.is_empty() && seen.insert(url.clone()))
        .collect()
}

/// [`merge_positional`] followed by [`dedupe_preserving_order`].
pub fn merge_and_dedupe(rendered: &[Option<String>], decoded: Vec<String>) -> Vec<String> {
    dedupe_preserving_order(merge_positional(rendered, decoded))
}
