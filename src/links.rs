//! Wikilink recognition and rewriting.
//!
//! A reference is a double-bracket occurrence like `[[some-page]]` or
//! `[[some-page|My Label]]`. References are resolved here, before the text
//! ever reaches the markdown renderer: [`extract`] rewrites each occurrence
//! into the renderer's native inline-link syntax and collects the outbound
//! reference set, while [`retarget`] rewrites references to one specific name
//! during a rename, preserving labels.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeSet;

/// Matches `[[target]]` and `[[target|label]]`.
///
/// Capture 1 is the target, capture 2 the optional label. Degenerate forms
/// like `[[]]` or `[[|label]]` do not match at all and are left as literal
/// text.
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").unwrap());

/// Rewrite every wikilink in `raw` to inline-link syntax `[label](target)`
/// and return the rewritten text together with the deduplicated set of
/// referenced names.
///
/// Targets are trimmed of surrounding whitespace. A target that trims to
/// empty is malformed: the occurrence is left untouched and contributes no
/// reference.
pub fn extract(raw: &str) -> (String, BTreeSet<String>) {
    let mut links = BTreeSet::new();
    let rewritten = LINK_RE.replace_all(raw, |caps: &Captures<'_>| {
        let target = caps[1].trim();
        if target.is_empty() {
            return caps[0].to_string();
        }
        links.insert(target.to_string());
        let label = caps
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|label| !label.is_empty())
            .unwrap_or(target);
        format!("[{label}]({target})")
    });
    (rewritten.into_owned(), links)
}

/// Rewrite every reference to `old` so it targets `new` instead, preserving
/// each occurrence's label text exactly. References to other names and all
/// surrounding text pass through verbatim.
pub fn retarget(raw: &str, old: &str, new: &str) -> String {
    LINK_RE
        .replace_all(raw, |caps: &Captures<'_>| {
            if caps[1].trim() != old {
                return caps[0].to_string();
            }
            match caps.get(2) {
                Some(label) => format!("[[{new}|{}]]", label.as_str()),
                None => format!("[[{new}]]"),
            }
        })
        .into_owned()
}
