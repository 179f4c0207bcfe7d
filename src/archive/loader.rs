//! Fire-and-forget loaders for the archive documents.
//!
//! Every loader degrades to an empty value on failure and always signals
//! completion, so the readiness join is never starved.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::archive::model::{
    CurrentPick, CurrentStatus, ManifestDocument, ManifestEntry, TagIndex, TagsDocument,
};
use crate::archive::readiness::Source;
use crate::archive::source::ArchiveSource;
use crate::error::{AppError, Result};
use crate::event::Event;

/// Site-relative locations of the JSON documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub manifest: String,
    pub tags: String,
    pub current: String,
    pub status: String,
}

/// A finished document load.
#[derive(Debug)]
pub enum Loaded {
    Manifest(Vec<ManifestEntry>),
    Tags(TagIndex),
    CurrentPick(Option<CurrentPick>),
}

impl Loaded {
    pub fn source(&self) -> Source {
        match self {
            Loaded::Manifest(_) => Source::Manifest,
            Loaded::Tags(_) => Source::Tags,
            Loaded::CurrentPick(_) => Source::CurrentPick,
        }
    }
}

/// Response to a single content request.
#[derive(Debug)]
pub struct ContentResponse {
    /// Generation of the request this answers.
    pub request: u64,
    pub path: String,
    pub result: Result<String>,
}

/// Run `fut`, failing with `AppError::Timeout` once `limit` elapses.
pub async fn bounded<T, F>(what: &str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(what.to_string())),
    }
}

fn log_failure(what: &str, err: &AppError) {
    match err {
        AppError::Timeout(_) => warn!(path = %what, "Gave up waiting: {}", err),
        _ => error!(path = %what, "Failed to load: {}", err),
    }
}

pub async fn load_manifest(source: &ArchiveSource, path: &str, limit: Duration) -> Vec<ManifestEntry> {
    match bounded(path, limit, source.fetch_json::<ManifestDocument>(path)).await {
        Ok(doc) => {
            info!(path = %path, items = doc.items.len(), "Loaded manifest");
            doc.items
        }
        Err(e) => {
            log_failure(path, &e);
            Vec::new()
        }
    }
}

pub async fn load_tags(source: &ArchiveSource, path: &str, limit: Duration) -> TagIndex {
    match bounded(path, limit, source.fetch_json::<TagsDocument>(path)).await {
        Ok(doc) => {
            let index = TagIndex::from(doc);
            info!(path = %path, tags = index.len(), "Loaded tags");
            index
        }
        Err(e) => {
            log_failure(path, &e);
            TagIndex::default()
        }
    }
}

/// Resolve the current pick: the pointer document, then exactly one haiku page.
pub async fn load_current_pick(
    source: &ArchiveSource,
    path: &str,
    limit: Duration,
) -> Option<CurrentPick> {
    let result = bounded(path, limit, async {
        let status: CurrentStatus = source.fetch_json(path).await?;
        let path_html = status
            .path_html()
            .ok_or_else(|| AppError::InvalidPath("current_haiku.path_html missing".into()))?
            .to_string();
        let html = source.fetch_text(&path_html).await?;
        Ok::<_, AppError>(CurrentPick {
            path_html,
            count: status.count(),
            html,
        })
    })
    .await;

    match result {
        Ok(pick) => {
            info!(path = %pick.path_html, "Loaded current pick");
            Some(pick)
        }
        Err(e) => {
            log_failure(path, &e);
            None
        }
    }
}

/// Spawn one task per document; each posts `Event::Loaded` when done.
pub fn spawn_all(
    source: &ArchiveSource,
    paths: &SourcePaths,
    limit: Duration,
    tx: &mpsc::UnboundedSender<Event>,
) {
    let (src, path, sender) = (source.clone(), paths.manifest.clone(), tx.clone());
    tokio::spawn(async move {
        let items = load_manifest(&src, &path, limit).await;
        let _ = sender.send(Event::Loaded(Loaded::Manifest(items)));
    });

    let (src, path, sender) = (source.clone(), paths.tags.clone(), tx.clone());
    tokio::spawn(async move {
        let tags = load_tags(&src, &path, limit).await;
        let _ = sender.send(Event::Loaded(Loaded::Tags(tags)));
    });

    let (src, path, sender) = (source.clone(), paths.current.clone(), tx.clone());
    tokio::spawn(async move {
        let pick = load_current_pick(&src, &path, limit).await;
        let _ = sender.send(Event::Loaded(Loaded::CurrentPick(pick)));
    });
}

/// Fetch one haiku page for the content pane.
pub fn spawn_content(
    source: &ArchiveSource,
    path: &str,
    request: u64,
    limit: Duration,
    tx: &mpsc::UnboundedSender<Event>,
) {
    let (src, path, sender) = (source.clone(), path.to_string(), tx.clone());
    tokio::spawn(async move {
        debug!(path = %path, request, "Fetching content");
        let result = bounded(&path, limit, src.fetch_text(&path)).await;
        let _ = sender.send(Event::Content(ContentResponse {
            request,
            path,
            result,
        }));
    });
}
