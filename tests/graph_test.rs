//! Integration tests for the graph store: scanning, backlink derivation,
//! single-document reloads, and failure behavior.

mod common;

use common::{create_test_wiki, init_logging, write_doc};
use tempfile::TempDir;
use wikigraph::{graph::WikiGraph, WikiError};

#[tokio::test]
async fn full_reload_builds_the_graph() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let wiki = create_test_wiki(&temp);

    let graph = WikiGraph::open(&wiki).await.unwrap();

    let names = graph.names().await;
    assert_eq!(
        names,
        ["2024-01-01", "alpha", "beta", "index", "search"],
        "scan should find every file plus the synthesized search page"
    );

    let alpha = graph.get("alpha").await.unwrap();
    assert_eq!(alpha.title, "Alpha");
    assert!(alpha.links.contains("beta"));
    assert!(alpha.links.contains("ghost"), "dangling links are kept");
    assert!(alpha.rendered.as_str().contains("<a href=\"ghost\">ghost</a>"));
}

#[tokio::test]
async fn backlink_correctness() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let wiki = create_test_wiki(&temp);
    let graph = WikiGraph::open(&wiki).await.unwrap();

    // For all documents A, B: B in A.links and B exists => A in B.backlinks.
    let docs = graph.snapshot().await;
    for (a_name, a) in &docs {
        for target in &a.links {
            if let Some(b) = docs.get(target) {
                assert!(
                    b.backlinks.contains(a_name),
                    "{target} should have a backlink from {a_name}"
                );
            }
        }
    }

    let beta = &docs["beta"];
    assert_eq!(beta.backlinks, ["alpha", "index"]);
    assert!(!docs.contains_key("ghost"), "dangling target stays absent");
}

#[tokio::test]
async fn search_backlinks_enumerate_the_whole_graph() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let wiki = create_test_wiki(&temp);
    let graph = WikiGraph::open(&wiki).await.unwrap();

    let search = graph.get("search").await.unwrap();
    // Every page, search itself included, alphabetic first then diary pages
    // newest-first.
    assert_eq!(
        search.backlinks,
        ["alpha", "beta", "index", "search", "2024-01-01"]
    );
}

#[tokio::test]
async fn backlinks_order_digit_leading_names_descending() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let wiki = temp.path().join("wiki");
    std::fs::create_dir(&wiki).unwrap();
    write_doc(&wiki, "target", "# Target\n");
    for name in ["2024-01-01", "apple", "2023-05-05", "banana"] {
        write_doc(&wiki, name, &format!("# {name}\n\nlink [[target]]\n"));
    }

    let graph = WikiGraph::open(&wiki).await.unwrap();
    let target = graph.get("target").await.unwrap();
    assert_eq!(
        target.backlinks,
        ["apple", "banana", "2024-01-01", "2023-05-05"]
    );
}

#[tokio::test]
async fn full_reload_is_idempotent() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let wiki = create_test_wiki(&temp);
    let graph = WikiGraph::open(&wiki).await.unwrap();

    let before = graph.snapshot().await;
    graph.full_reload().await.unwrap();
    let after = graph.snapshot().await;

    assert_eq!(before.len(), after.len());
    for (name, doc) in &before {
        let reloaded = &after[name];
        assert_eq!(doc.title, reloaded.title);
        assert_eq!(doc.links, reloaded.links);
        assert_eq!(doc.backlinks, reloaded.backlinks);
    }
}

#[tokio::test]
async fn reload_one_recomputes_backlinks_globally() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let wiki = create_test_wiki(&temp);
    let graph = WikiGraph::open(&wiki).await.unwrap();

    assert!(graph.get("beta").await.unwrap().backlinks.contains(&"alpha".to_string()));

    // Drop alpha's link to beta on disk, reload only alpha.
    write_doc(&wiki, "alpha", "# Alpha\n\nNo more links.\n");
    graph.reload_one("alpha").await.unwrap();

    let beta = graph.get("beta").await.unwrap();
    assert_eq!(
        beta.backlinks,
        ["index"],
        "beta's backlinks must reflect alpha's new reference set"
    );
}

#[tokio::test]
async fn write_document_persists_without_touching_memory() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let wiki = create_test_wiki(&temp);
    let graph = WikiGraph::open(&wiki).await.unwrap();

    graph
        .write_document("beta", "# Beta\n\nEdited body.\n")
        .await
        .unwrap();

    let in_memory = graph.get("beta").await.unwrap();
    assert!(!in_memory.raw.contains("Edited body"));

    let on_disk = std::fs::read_to_string(wiki.join("beta.md")).unwrap();
    assert!(on_disk.contains("Edited body"));

    graph.reload_one("beta").await.unwrap();
    assert!(graph.get("beta").await.unwrap().raw.contains("Edited body"));
}

#[tokio::test]
async fn write_document_rejects_invalid_names() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let wiki = create_test_wiki(&temp);
    let graph = WikiGraph::open(&wiki).await.unwrap();

    let err = graph
        .write_document("../escape", "nope")
        .await
        .unwrap_err();
    assert!(matches!(err, WikiError::InvalidName(_)));
    assert!(!temp.path().join("escape.md").exists());
}

#[tokio::test]
async fn failed_reload_preserves_prior_state() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let wiki = create_test_wiki(&temp);
    let graph = WikiGraph::open(&wiki).await.unwrap();
    let before = graph.names().await;

    std::fs::remove_dir_all(&wiki).unwrap();
    let result = graph.full_reload().await;
    assert!(result.is_err(), "reload of a missing directory must fail");
    assert_eq!(
        graph.names().await,
        before,
        "prior state must remain installed after a failed reload"
    );
}

#[tokio::test]
async fn self_reference_appears_in_own_backlinks() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let wiki = temp.path().join("wiki");
    std::fs::create_dir(&wiki).unwrap();
    write_doc(&wiki, "loop", "# Loop\n\nlink to [[loop]]\n");

    let graph = WikiGraph::open(&wiki).await.unwrap();
    let doc = graph.get("loop").await.unwrap();
    assert_eq!(doc.backlinks, ["loop"]);
}

#[tokio::test]
async fn existing_search_file_is_not_replaced() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let wiki = temp.path().join("wiki");
    std::fs::create_dir(&wiki).unwrap();
    write_doc(&wiki, "search", "# Finding things\n\nCustom search page.\n");
    write_doc(&wiki, "a", "# A\n");

    let graph = WikiGraph::open(&wiki).await.unwrap();
    let search = graph.get("search").await.unwrap();
    assert_eq!(search.title, "Finding things");
    assert_eq!(search.backlinks, ["a", "search"]);
}
