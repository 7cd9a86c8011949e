//! The graph store: authoritative owner of the document map.
//!
//! A single reader/writer lock guards the map. Every mutating operation
//! (`full_reload`, `reload_one`, `write_document`, `rename`) holds the write
//! half for its entire duration, nested loads and the backlink rebuild
//! included, so concurrent readers never observe a half-updated graph and
//! mutators are fully serialized. The lock is tokio's because those write
//! guards are held across awaits.

use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use tokio::sync::RwLock;

use crate::{
    backlinks::{self, SEARCH_DOC},
    document::{self, Document, DOC_EXTENSION},
    error::WikiError,
    links,
};

/// Identifier grammar for document names. Anything else is rejected before
/// the name can reach the filesystem.
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_+-]+$").unwrap());

pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// An in-memory cross-linked document graph backed by a wiki directory.
pub struct WikiGraph {
    docs: RwLock<HashMap<String, Document>>,
    root: PathBuf,
}

impl WikiGraph {
    /// Create an empty graph over `root`. No documents are loaded until
    /// [`WikiGraph::full_reload`] runs; see [`WikiGraph::open`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        WikiGraph {
            docs: RwLock::new(HashMap::new()),
            root: root.into(),
        }
    }

    /// Create a graph and run the initial scan.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, WikiError> {
        let graph = WikiGraph::new(root);
        graph.full_reload().await?;
        Ok(graph)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Backing file for a named document.
    pub fn doc_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{DOC_EXTENSION}"))
    }

    /// Re-scan the wiki directory and atomically replace the whole document
    /// map. On any load failure the prior state is left untouched.
    pub async fn full_reload(&self) -> Result<(), WikiError> {
        let mut docs = self.docs.write().await;
        let mut fresh = document::load_all(&self.root).await?;
        synthesize_search(&mut fresh)?;
        backlinks::build(&mut fresh);
        tracing::debug!("Full reload complete: {} documents", fresh.len());
        *docs = fresh;
        Ok(())
    }

    /// Re-read and re-parse one document from storage, then rebuild
    /// backlinks across the entire set. Cheaper than a full reload only
    /// because it skips the directory walk and the other files' parses; the
    /// backlink pass is still global.
    pub async fn reload_one(&self, name: &str) -> Result<(), WikiError> {
        let mut docs = self.docs.write().await;
        let doc = Document::load(&self.doc_path(name)).await?;
        docs.insert(doc.name.clone(), doc);
        backlinks::build(&mut docs);
        Ok(())
    }

    /// Persist `content` as the named document's raw content. In-memory
    /// state is not updated; callers typically follow with
    /// [`WikiGraph::reload_one`].
    pub async fn write_document(&self, name: &str, content: &str) -> Result<(), WikiError> {
        if !is_valid_name(name) {
            return Err(WikiError::InvalidName(name.to_string()));
        }
        let _docs = self.docs.write().await;
        tokio::fs::write(self.doc_path(name), content).await?;
        Ok(())
    }

    /// Rename a document and rewrite every reference to it across the graph.
    ///
    /// Steps: validate both names, rename the backing file, move the map
    /// entry, rewrite and reload each document that referenced the old name
    /// (labels preserved), then rebuild backlinks once.
    ///
    /// Not atomic across files: if rewriting one referencing document fails,
    /// documents processed earlier stay updated and later ones keep pointing
    /// at the old name. The error is reported, the partial effects are not
    /// rolled back.
    pub async fn rename(&self, old: &str, new: &str) -> Result<(), WikiError> {
        if !is_valid_name(old) {
            return Err(WikiError::InvalidName(old.to_string()));
        }
        if !is_valid_name(new) {
            return Err(WikiError::InvalidName(new.to_string()));
        }

        let mut docs = self.docs.write().await;
        let Some(mut doc) = docs.remove(old) else {
            return Err(WikiError::NotFound(format!(
                "document '{old}' is not in the graph"
            )));
        };
        if let Err(e) = tokio::fs::rename(self.doc_path(old), self.doc_path(new)).await {
            docs.insert(old.to_string(), doc);
            return Err(e.into());
        }
        doc.name = new.to_string();
        let referrers = doc.backlinks.clone();
        docs.insert(new.to_string(), doc);

        for referrer in referrers {
            // A self-reference is listed under the old key; resolve it under
            // the new one so the document rewrites itself.
            let referrer = if referrer == old {
                new.to_string()
            } else {
                referrer
            };
            let Some(referring) = docs.get(&referrer) else {
                continue;
            };
            let rewritten = links::retarget(&referring.raw, old, new);
            tokio::fs::write(self.doc_path(&referrer), &rewritten).await?;
            let reloaded = Document::load(&self.doc_path(&referrer)).await?;
            docs.insert(referrer, reloaded);
        }

        backlinks::build(&mut docs);
        tracing::info!("Renamed '{old}' to '{new}'");
        Ok(())
    }

    /// Snapshot of one document. The clone is detached: later mutations of
    /// the store do not show through it.
    pub async fn get(&self, name: &str) -> Option<Document> {
        self.docs.read().await.get(name).cloned()
    }

    /// Sorted list of all document names currently in the graph.
    pub async fn names(&self) -> Vec<String> {
        let docs = self.docs.read().await;
        let mut names: Vec<String> = docs.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Snapshot of the whole map, for callers that need a consistent view
    /// across multiple documents.
    pub async fn snapshot(&self) -> HashMap<String, Document> {
        self.docs.read().await.clone()
    }
}

/// Ensure the reserved search document exists after a scan.
fn synthesize_search(docs: &mut HashMap<String, Document>) -> Result<(), WikiError> {
    if !docs.contains_key(SEARCH_DOC) {
        docs.insert(
            SEARCH_DOC.to_string(),
            Document::parse(SEARCH_DOC, "# Search\n")?,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_grammar() {
        for ok in ["a", "Page_1", "2024-01-01", "c+d", "A-b_c+9"] {
            assert!(is_valid_name(ok), "{ok:?} should be valid");
        }
        for bad in ["", "a b", "a/b", "../a", "a.md", "päge", "a|b"] {
            assert!(!is_valid_name(bad), "{bad:?} should be invalid");
        }
    }
}
