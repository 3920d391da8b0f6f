//! Programme title normalization
//!
//! Guide providers decorate titles with "new episode" markers in every style
//! imaginable (`(NEW)`, ` - New`, `ᴺᵉʷ`). The normalized form strips those and
//! canonicalizes whitespace so the same show always maps to one cache key.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Trailing "new" marker: an optional run of whitespace/hyphens/en-dashes,
/// optional parentheses, anchored to the end.
static NEW_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\s\-–]*\(?(?P<word>new)\)?$").expect("valid new-marker regex")
});

static MULTI_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

/// Canonicalize a raw programme title into its cache key.
///
/// Idempotent, infallible; empty input yields empty output.
pub fn normalize_title(raw: &str) -> String {
    let mut title: String = raw.nfkd().collect();

    loop {
        let trimmed_len = title.trim_end().len();
        title.truncate(trimmed_len);

        match new_marker_start(&title) {
            Some(start) => title.truncate(start),
            None => break,
        }
    }

    let title = title.replace('\n', " ");
    MULTI_WHITESPACE
        .replace_all(title.trim(), " ")
        .into_owned()
}

/// Byte offset where a trailing "new" marker begins, if there is one.
///
/// A bare `new` glued to the preceding word ("Renew") is part of the title,
/// not a marker.
fn new_marker_start(title: &str) -> Option<usize> {
    let caps = NEW_MARKER.captures(title)?;
    let whole = caps.get(0)?;
    let word = caps.name("word")?;

    let separated = whole.start() < word.start()
        || title[..whole.start()]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());

    separated.then_some(whole.start())
}
