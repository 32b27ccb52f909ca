use std::sync::LazyLock;

use regex::{NoExpand, Regex};

#[allow(clippy::expect_used)]
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_]+").expect("valid mention regex"));

/// Replace every `@mention` in `raw` with `default_tag`.
///
/// Empty input, or a result that no longer carries the tag, collapses to the
/// tag alone.
pub fn normalize_caption(raw: &str, default_tag: &str) -> String {
    if raw.is_empty() {
        return default_tag.to_string();
    }
    let replaced = MENTION_RE.replace_all(raw, NoExpand(default_tag));
    if !replaced.contains(default_tag) {
        return default_tag.to_string();
    }
    replaced.into_owned()
}
