//! # wikigraph
//!
//! An in-memory, cross-linked document graph over a directory of markdown
//! files, with a small wiki server on top.
//!
//! Documents declare references to each other with double-bracket wikilinks
//! (`[[some-page]]`, `[[some-page|My Label]]`). The engine parses every
//! document, rewrites references into plain inline links for rendering, and
//! derives for each document the ordered set of documents that reference it
//! (its backlinks). The graph stays consistent under concurrent reads and
//! structural edits, and a document can be renamed with every reference to it
//! rewritten across the corpus.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use wikigraph::graph::WikiGraph;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), wikigraph::WikiError> {
//!     // Scan a directory of .md files into a graph.
//!     let graph = WikiGraph::open("./wiki").await?;
//!
//!     // Snapshot reads; clones are detached from later mutations.
//!     if let Some(doc) = graph.get("index").await {
//!         println!("{}: {} backlinks", doc.title, doc.backlinks.len());
//!     }
//!
//!     // Rename a page and rewrite every reference to it.
//!     graph.rename("old-name", "new-name").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Structure
//!
//! - [`links`]: wikilink extraction and rewriting (pure text functions)
//! - [`render`]: the markdown renderer boundary and the [`render::Markup`]
//!   trusted-HTML newtype
//! - [`document`]: [`document::Document`] values, single loads, and the
//!   all-or-nothing concurrent batch load
//! - [`backlinks`]: global backlink recomputation and its total order
//! - [`graph`]: [`graph::WikiGraph`], the concurrency-safe store
//! - [`watch`], [`server`], [`config`] (feature `service`): debounced file
//!   watching, the HTTP view/edit surface, and optional TOML settings
//!
//! The reserved `search` document always exists and receives an implicit
//! backlink from every page, so its backlink list enumerates the graph.
//!
//! ## Features
//!
//! - **default**: the graph engine only
//! - **service**: file watching and the axum HTTP surface
//! - **bin**: the `wikigraph` server binary

pub mod backlinks;
#[cfg(feature = "service")]
pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod links;
pub mod render;
#[cfg(feature = "service")]
pub mod server;
#[cfg(feature = "service")]
pub mod watch;

pub use error::*;
