pub mod content;
pub mod loader;
pub mod model;
pub mod readiness;
pub mod source;
pub mod summary;

use crate::archive::model::{CurrentPick, ManifestEntry, TagIndex};

/// Everything loaded from the archive, owned by the application.
#[derive(Debug, Default)]
pub struct ArchiveContext {
    pub manifest: Vec<ManifestEntry>,
    pub tags: TagIndex,
    pub current: Option<CurrentPick>,
}
