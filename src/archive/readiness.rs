/// The three documents the explorer waits for before initializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Manifest,
    Tags,
    CurrentPick,
}

/// Join over the three one-shot load signals.
///
/// `mark` returns `true` exactly once per join: on the call that makes all
/// three flags true. Repeated or late signals never re-trigger initialization
/// until `reset` starts a new join.
#[derive(Debug, Default)]
pub struct Readiness {
    manifest: bool,
    tags: bool,
    current: bool,
    initialized: bool,
}

impl Readiness {
    pub fn mark(&mut self, source: Source) -> bool {
        match source {
            Source::Manifest => self.manifest = true,
            Source::Tags => self.tags = true,
            Source::CurrentPick => self.current = true,
        }
        if self.is_ready() && !self.initialized {
            self.initialized = true;
            return true;
        }
        false
    }

    pub fn is_ready(&self) -> bool {
        self.manifest && self.tags && self.current
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of signals received so far, for the status line.
    pub fn received(&self) -> usize {
        [self.manifest, self.tags, self.current]
            .iter()
            .filter(|f| **f)
            .count()
    }

    /// Start a new join, e.g. before reloading every document.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
