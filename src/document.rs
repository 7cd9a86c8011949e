//! Document values and loading.
//!
//! A [`Document`] is one parsed markdown file: raw text (the authoritative
//! source of truth), a derived title, rendered markup with wikilinks resolved
//! to inline links, the outbound reference set, and the backlinks computed
//! later by [`crate::backlinks::build`].

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeSet, HashMap},
    path::Path,
};
use tokio::task::JoinSet;
use walkdir::WalkDir;

use crate::{error::WikiError, links, render, render::Markup};

/// File extension recognized by the loader and the change watcher.
pub const DOC_EXTENSION: &str = "md";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// File stem relative to the wiki directory, used as the map key.
    pub name: String,
    /// Raw markdown, mutated only by explicit edit and rename operations.
    pub raw: String,
    /// From the first `# ` heading, else `name`.
    pub title: String,
    /// Derived cache: `raw` with references resolved, run through the renderer.
    pub rendered: Markup,
    /// Deduplicated outbound reference names. May contain dangling names.
    pub links: BTreeSet<String>,
    /// Ordered inbound referrer names, recomputed globally on every change.
    pub backlinks: Vec<String>,
}

impl Document {
    /// Parse raw markdown into a document. `backlinks` is left empty; the
    /// backlink builder fills it once the whole document set is known.
    pub fn parse(
        name: impl Into<String>,
        raw: impl Into<String>,
    ) -> Result<Document, WikiError> {
        let name = name.into();
        let raw = raw.into();
        let title = derive_title(&name, &raw);
        let (processed, links) = links::extract(&raw);
        let rendered = render::render(&processed)?;
        Ok(Document {
            name,
            raw,
            title,
            rendered,
            links,
            backlinks: Vec::new(),
        })
    }

    /// Load and parse a single document file. The name is the file stem.
    pub async fn load(path: &Path) -> Result<Document, WikiError> {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| {
                WikiError::InvalidName(format!("no usable file stem in {path:?}"))
            })?
            .to_string();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::error!("Failed to read {:?}: {e}", path);
            WikiError::from(e)
        })?;
        Document::parse(name, raw)
    }
}

/// Recursively enumerate `dir` for document files and load them all
/// concurrently, one task per file with no ordering guarantee.
///
/// All-or-nothing: the first observed failure fails the whole batch and
/// already-loaded documents are discarded (dropping the task set aborts any
/// stragglers). Dot files and non-`.md` files are skipped.
pub async fn load_all(dir: &Path) -> Result<HashMap<String, Document>, WikiError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if file_name.starts_with('.') {
            continue;
        }
        if entry.path().extension().is_some_and(|ext| ext == DOC_EXTENSION) {
            paths.push(entry.into_path());
        }
    }

    let mut tasks = JoinSet::new();
    for path in paths {
        tasks.spawn(async move { Document::load(&path).await });
    }

    let mut docs = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        let doc = joined??;
        docs.insert(doc.name.clone(), doc);
    }
    tracing::debug!("Loaded {} documents from {:?}", docs.len(), dir);
    Ok(docs)
}

/// Title rule: when the raw text starts with `# ` and a line break follows,
/// the title is the trimmed text in between; otherwise the document name.
fn derive_title(name: &str, raw: &str) -> String {
    if let Some(rest) = raw.strip_prefix("# ") {
        if let Some(end) = rest.find('\n') {
            let title = rest[..end].trim();
            if !title.is_empty() {
                return title.to_string();
            }
        }
    }
    name.to_string()
}
