//! File watching: debounced directory notifications driving full reloads.
//!
//! [`WatchService`] observes the wiki directory, coalesces bursts of change
//! events within the debounce window, and triggers exactly one
//! [`WikiGraph::full_reload`] per coalesced burst. Dot files and non-document
//! extensions are filtered out before a burst counts as relevant.

use notify_debouncer_full::{
    new_debouncer,
    notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher},
    DebounceEventResult, Debouncer, FileIdMap,
};
use parking_lot::Mutex;
use std::{path::Path, sync::Arc, time::Duration};
use tokio::runtime::Handle;

use crate::{document::DOC_EXTENSION, error::WikiError, graph::WikiGraph};

/// A file system watcher with debouncing for the wiki directory.
type DirWatcher = Debouncer<RecommendedWatcher, FileIdMap>;

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

pub struct WatchService {
    graph: Arc<WikiGraph>,
    runtime: Handle,
    debounce: Duration,
    watcher: Mutex<Option<DirWatcher>>,
}

impl WatchService {
    /// Create a service over `graph`. Reloads run on `runtime`; watching
    /// starts with [`WatchService::enable`].
    pub fn new(graph: Arc<WikiGraph>, runtime: Handle) -> Self {
        Self::with_debounce(graph, runtime, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(graph: Arc<WikiGraph>, runtime: Handle, debounce: Duration) -> Self {
        WatchService {
            graph,
            runtime,
            debounce,
            watcher: Mutex::new(None),
        }
    }

    /// Start watching the graph's root directory recursively.
    pub fn enable(&self) -> Result<(), WikiError> {
        let mut slot = self.watcher.lock();
        if slot.is_some() {
            return Err(WikiError::Service(format!(
                "already watching {:?}",
                self.graph.root()
            )));
        }

        let graph = self.graph.clone();
        let runtime = self.runtime.clone();
        let mut debouncer = new_debouncer(
            self.debounce,
            None,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    let relevant = events.iter().any(|event| {
                        matches!(
                            event.event.kind,
                            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                        ) && event.paths.iter().any(|p| is_doc_path(p))
                    });
                    if relevant {
                        tracing::info!("[Debouncer] document change burst, scheduling reload");
                        let graph = graph.clone();
                        runtime.spawn(async move {
                            if let Err(e) = graph.full_reload().await {
                                tracing::error!("Reload after file change failed: {e}");
                            }
                        });
                    }
                }
                Err(errors) => {
                    tracing::error!("Notify debouncer returned errors: {:?}", errors);
                }
            },
        )?;
        debouncer
            .watcher()
            .watch(self.graph.root(), RecursiveMode::Recursive)?;

        *slot = Some(debouncer);
        tracing::debug!("Watching {:?} for changes", self.graph.root());
        Ok(())
    }

    /// Stop watching. A no-op when watching was never enabled.
    pub fn disable(&self) -> Result<(), WikiError> {
        let mut slot = self.watcher.lock();
        if let Some(mut debouncer) = slot.take() {
            let unwatch_res = debouncer.watcher().unwatch(self.graph.root());
            tracing::debug!(
                "Unwatch_res(path: {:?}) = {:?}",
                self.graph.root(),
                unwatch_res
            );
            unwatch_res?;
        }
        Ok(())
    }
}

fn is_doc_path(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(true);
    !hidden && path.extension().is_some_and(|ext| ext == DOC_EXTENSION)
}
