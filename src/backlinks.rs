//! Backlink computation over the full document set.
//!
//! Backlinks are always recomputed globally in one pass: any document's
//! outbound reference set can affect any other document's backlinks, so the
//! store never patches them incrementally.

use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap},
};

use crate::document::Document;

/// Name of the reserved document that collects a backlink from every page.
pub const SEARCH_DOC: &str = "search";

/// Recompute `backlinks` for every document in place.
///
/// A referrer edge exists when the target document is present in the map;
/// dangling references contribute nothing. Every document additionally
/// produces an implicit edge to [`SEARCH_DOC`], including `search` itself,
/// so after a build the search page's backlinks enumerate the whole graph.
pub fn build(docs: &mut HashMap<String, Document>) {
    let mut referrers: HashMap<String, BTreeSet<String>> = docs
        .keys()
        .map(|name| (name.clone(), BTreeSet::new()))
        .collect();

    for (linker, doc) in docs.iter() {
        for target in &doc.links {
            // Accumulators exist only for resolvable names, so dangling
            // references fall through here.
            if let Some(acc) = referrers.get_mut(target.as_str()) {
                acc.insert(linker.clone());
            }
        }
        // Every document implicitly references the search page.
        if let Some(acc) = referrers.get_mut(SEARCH_DOC) {
            acc.insert(linker.clone());
        }
    }

    for (name, acc) in referrers {
        if let Some(doc) = docs.get_mut(&name) {
            let mut backlinks: Vec<String> = acc.into_iter().collect();
            backlinks.sort_unstable_by(|a, b| backlink_order(a, b));
            doc.backlinks = backlinks;
        }
    }
}

/// Total order for backlink lists: names not starting with an ASCII digit
/// sort first in ascending order, digit-leading names follow in descending
/// order. Date-stamped diary pages therefore list newest-first, after the
/// alphabetic pages.
pub fn backlink_order(a: &str, b: &str) -> Ordering {
    let a_digit = a.as_bytes().first().is_some_and(|c| c.is_ascii_digit());
    let b_digit = b.as_bytes().first().is_some_and(|c| c.is_ascii_digit());
    match (a_digit, b_digit) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => a.cmp(b),
        (true, true) => b.cmp(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_map(specs: &[(&str, &str)]) -> HashMap<String, Document> {
        specs
            .iter()
            .map(|(name, raw)| {
                (
                    name.to_string(),
                    Document::parse(name.to_string(), raw.to_string()).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn alphabetic_ascending_then_digit_leading_descending() {
        let mut names = vec!["2024-01-01", "apple", "2023-05-05", "banana"];
        names.sort_unstable_by(|a, b| backlink_order(a, b));
        assert_eq!(names, ["apple", "banana", "2024-01-01", "2023-05-05"]);
    }

    #[test]
    fn order_is_antisymmetric_and_transitive() {
        let names = ["", "a", "zebra", "0", "9list", "2024-01-01", "Apple", "_x"];
        for a in names {
            for b in names {
                assert_eq!(
                    backlink_order(a, b),
                    backlink_order(b, a).reverse(),
                    "antisymmetry violated for ({a:?}, {b:?})"
                );
                for c in names {
                    if backlink_order(a, b) != Ordering::Greater
                        && backlink_order(b, c) != Ordering::Greater
                    {
                        assert_ne!(
                            backlink_order(a, c),
                            Ordering::Greater,
                            "transitivity violated for ({a:?}, {b:?}, {c:?})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn backlink_edges_require_existing_target() {
        let mut docs = doc_map(&[
            ("a", "see [[b]] and [[ghost]]\n"),
            ("b", "plain\n"),
            ("search", "# Search\n"),
        ]);
        build(&mut docs);
        assert_eq!(docs["b"].backlinks, ["a"]);
        // The dangling target produced no accumulator at all.
        assert!(!docs.contains_key("ghost"));
    }

    #[test]
    fn search_collects_every_document_including_itself() {
        let mut docs = doc_map(&[
            ("a", "x\n"),
            ("b", "y\n"),
            ("search", "# Search\n"),
        ]);
        build(&mut docs);
        assert_eq!(docs["search"].backlinks, ["a", "b", "search"]);
    }

    #[test]
    fn self_reference_appears_in_own_backlinks() {
        let mut docs = doc_map(&[("loop", "me: [[loop]]\n"), ("search", "# Search\n")]);
        build(&mut docs);
        assert_eq!(docs["loop"].backlinks, ["loop"]);
    }

    #[test]
    fn rebuild_replaces_stale_backlinks() {
        let mut docs = doc_map(&[
            ("a", "see [[b]]\n"),
            ("b", "plain\n"),
            ("search", "# Search\n"),
        ]);
        build(&mut docs);
        assert_eq!(docs["b"].backlinks, ["a"]);

        let replacement = Document::parse("a", "no links anymore\n").unwrap();
        docs.insert("a".to_string(), replacement);
        build(&mut docs);
        assert!(docs["b"].backlinks.is_empty());
    }
}
