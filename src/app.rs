use std::time::{Duration, Instant};

use ratatui::layout::{Position, Rect};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::archive::content::render_document;
use crate::archive::loader::{self, ContentResponse, Loaded, SourcePaths};
use crate::archive::readiness::Readiness;
use crate::archive::source::ArchiveSource;
use crate::archive::summary::count_line;
use crate::archive::ArchiveContext;
use crate::config::{AppConfig, DEFAULT_DEBOUNCE_MS, DEFAULT_TIMEOUT_MS};
use crate::event::Event;
use crate::explore::debounce::Debouncer;
use crate::explore::filter::{FilterState, TagMatchRule};
use crate::explore::highlight::{apply_highlight, HighlightSummary, Mark};
use crate::explore::view::DEFAULT_OPEN_DEPTH;
use crate::explore::Explorer;
use crate::theme::{self, ThemeColors};

/// Application mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    /// Typing into the query bar.
    Query,
    Help,
}

/// Which explorer is shown in the left panel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum View {
    #[default]
    Structure,
    Tags,
}

/// Focused list inside the tags view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TagFocus {
    #[default]
    Tags,
    Files,
}

/// The content pane.
#[derive(Debug, Default)]
pub struct ContentState {
    /// Path of the page on display.
    pub path: Option<String>,
    pub lines: Vec<String>,
    pub scroll_offset: usize,
    /// Generation of the latest request; responses to older ones are dropped.
    pub generation: u64,
    /// Path of the request in flight, if any.
    pub pending: Option<String>,
}

impl ContentState {
    fn show(&mut self, path: &str, lines: Vec<String>) {
        self.path = Some(path.to_string());
        self.lines = lines;
        self.scroll_offset = 0;
        self.pending = None;
    }

    fn clear(&mut self) {
        self.path = None;
        self.lines.clear();
        self.scroll_offset = 0;
        self.pending = None;
    }

    pub fn scroll_down(&mut self, n: usize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + n).min(max);
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }
}

/// Selection and scroll for a plain list panel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListState {
    pub selected_index: usize,
    pub scroll_offset: usize,
}

impl ListState {
    /// Update the scroll offset to ensure the selected item is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    fn clamp(&mut self, len: usize) {
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
        self.scroll_offset = self.scroll_offset.min(self.selected_index);
    }
}

/// Inner panel areas from the last draw, for mouse hit-testing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HitAreas {
    pub tree: Rect,
    pub tags: Rect,
    pub files: Rect,
    pub content: Rect,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub open_depth: usize,
    pub tag_match: TagMatchRule,
    pub debounce: Duration,
    pub timeout: Duration,
    pub use_icons: bool,
    pub theme: ThemeColors,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            open_depth: config.open_depth(),
            tag_match: config.tag_match(),
            debounce: config.debounce(),
            timeout: config.timeout(),
            use_icons: config.use_icons(),
            theme: theme::resolve_theme(&config.theme),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            open_depth: DEFAULT_OPEN_DEPTH,
            tag_match: TagMatchRule::default(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            use_icons: true,
            theme: theme::dark_theme(),
        }
    }
}

/// Main application state.
pub struct App {
    pub should_quit: bool,
    pub mode: AppMode,
    pub view: View,
    pub tag_focus: TagFocus,
    pub archive: ArchiveContext,
    pub readiness: Readiness,
    /// Built once all three documents have arrived.
    pub explorer: Option<Explorer>,
    pub filter: FilterState,
    pub tag_list: ListState,
    pub file_list: ListState,
    pub query: String,
    pub highlight: HighlightSummary,
    pub content: ContentState,
    pub help_scroll: usize,
    pub status_message: Option<(String, Instant)>,
    pub areas: HitAreas,
    pub settings: Settings,
    debouncer: Debouncer,
    source: ArchiveSource,
    paths: SourcePaths,
    tx: mpsc::UnboundedSender<Event>,
}

impl App {
    pub fn new(
        source: ArchiveSource,
        paths: SourcePaths,
        settings: Settings,
        tx: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            should_quit: false,
            mode: AppMode::Normal,
            view: View::Structure,
            tag_focus: TagFocus::Tags,
            archive: ArchiveContext::default(),
            readiness: Readiness::default(),
            explorer: None,
            filter: FilterState::default(),
            tag_list: ListState::default(),
            file_list: ListState::default(),
            query: String::new(),
            highlight: HighlightSummary::default(),
            content: ContentState::default(),
            help_scroll: 0,
            status_message: None,
            areas: HitAreas::default(),
            debouncer: Debouncer::new(settings.debounce),
            settings,
            source,
            paths,
            tx,
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Whether the explorer has been initialized.
    pub fn is_ready(&self) -> bool {
        self.explorer.is_some()
    }

    // ── Loading ─────────────────────────────────────────────────────────────

    /// Start a new readiness join and fire the three document loads.
    pub fn start_loading(&mut self) {
        self.readiness.reset();
        info!(root = %self.source.describe(), "Loading archive");
        loader::spawn_all(&self.source, &self.paths, self.settings.timeout, &self.tx);
    }

    /// Refetch every document and rebuild the explorer once they are in.
    pub fn reload(&mut self) {
        if !self.readiness.is_initialized() {
            self.set_status_message("Still loading".to_string());
            return;
        }
        self.start_loading();
        self.set_status_message("Reloading archive".to_string());
    }

    pub fn handle_loaded(&mut self, loaded: Loaded) {
        let source = loaded.source();
        match loaded {
            Loaded::Manifest(items) => self.archive.manifest = items,
            Loaded::Tags(tags) => self.archive.tags = tags,
            Loaded::CurrentPick(pick) => self.archive.current = pick,
        }
        debug!(?source, received = self.readiness.received() + 1, "Document arrived");
        if self.readiness.mark(source) {
            self.initialize();
        }
    }

    fn initialize(&mut self) {
        let explorer = Explorer::build(&self.archive.manifest, self.settings.open_depth);
        info!(
            entries = self.archive.manifest.len(),
            rows = explorer.view.rows.len(),
            tags = self.archive.tags.len(),
            tag_match = self.settings.tag_match.label(),
            "Archive ready"
        );
        if explorer.index.is_empty() {
            warn!("Manifest has no usable entries");
        }
        self.explorer = Some(explorer);
        self.filter.clear();
        self.tag_list = ListState::default();
        self.file_list = ListState::default();
        self.apply_query();
        self.show_current_pick();
    }

    fn show_current_pick(&mut self) {
        // Supersedes any request still in flight.
        self.content.generation += 1;
        match &self.archive.current {
            Some(pick) => {
                let lines = render_document(&pick.html, true);
                self.content.show(&pick.path_html, lines);
            }
            None => self.content.clear(),
        }
    }

    /// "{n} haiku in the hall", once the current pick carries a count.
    pub fn count_line(&self) -> Option<String> {
        self.archive
            .current
            .as_ref()
            .and_then(|c| c.count)
            .map(count_line)
    }

    // ── Content ─────────────────────────────────────────────────────────────

    /// Fetch a page into the content pane.
    pub fn request_content(&mut self, path: &str) {
        self.content.generation += 1;
        self.content.pending = Some(path.to_string());
        loader::spawn_content(
            &self.source,
            path,
            self.content.generation,
            self.settings.timeout,
            &self.tx,
        );
    }

    pub fn handle_content(&mut self, response: ContentResponse) {
        if response.request != self.content.generation {
            debug!(path = %response.path, request = response.request, "Dropping stale content");
            return;
        }
        self.content.pending = None;
        match response.result {
            Ok(html) => {
                // The pane hosts the page, so it always renders embedded.
                let lines = render_document(&html, true);
                self.content.show(&response.path, lines);
            }
            Err(e) => warn!(path = %response.path, "Failed to load content: {}", e),
        }
    }

    fn clear_content(&mut self) {
        self.content.generation += 1;
        self.content.clear();
    }

    // ── Query ───────────────────────────────────────────────────────────────

    pub fn enter_query_mode(&mut self) {
        self.mode = AppMode::Query;
    }

    pub fn query_push(&mut self, c: char) {
        self.query.push(c);
        self.debouncer.poke(Instant::now());
    }

    pub fn query_pop(&mut self) {
        if self.query.pop().is_some() {
            self.debouncer.poke(Instant::now());
        }
    }

    /// Clear the query and its marks immediately.
    pub fn query_clear(&mut self) {
        self.query.clear();
        self.debouncer.cancel();
        self.apply_query();
    }

    /// Apply the query now and leave query mode.
    pub fn commit_query(&mut self) {
        self.debouncer.cancel();
        self.apply_query();
        self.mode = AppMode::Normal;
    }

    pub fn cancel_query(&mut self) {
        self.query_clear();
        self.mode = AppMode::Normal;
    }

    /// Recompute highlight marks and the tag list for the current query.
    pub fn apply_query(&mut self) {
        if let Some(explorer) = &mut self.explorer {
            self.highlight = apply_highlight(&self.query, &explorer.index, &mut explorer.view.rows);
        }
        let tags = self.visible_tags().len();
        self.tag_list.clamp(tags);
        debug!(
            query = %self.query,
            exact = self.highlight.exact,
            ancestors = self.highlight.ancestors,
            "Applied query"
        );
    }

    /// Periodic housekeeping: fire the debounced query and expire messages.
    pub fn tick(&mut self, now: Instant) {
        if self.debouncer.due(now) {
            self.apply_query();
        }
        self.clear_expired_status();
    }

    /// Move the selection to the next or previous exact match, expanding
    /// its ancestors so it becomes visible.
    pub fn jump_to_match(&mut self, forward: bool) {
        let target = self.explorer.as_ref().and_then(|ex| {
            ex.view
                .next_marked(ex.view.selected_row(), Mark::Exact, forward)
        });
        match target {
            Some(row) => {
                if let Some(explorer) = self.explorer.as_mut() {
                    explorer.view.reveal(row);
                }
            }
            None => self.set_status_message("No matches".to_string()),
        }
    }

    // ── Tags ────────────────────────────────────────────────────────────────

    /// Tags whose label contains the query.
    pub fn visible_tags(&self) -> Vec<&str> {
        self.archive.tags.matching(&self.query)
    }

    /// Filter by the highlighted tag in the tag list.
    pub fn choose_selected_tag(&mut self) {
        let tag = self
            .visible_tags()
            .get(self.tag_list.selected_index)
            .map(|t| t.to_string());
        if let Some(tag) = tag {
            self.select_tag(&tag);
        }
    }

    /// Replace the filtered set with `tag`'s files and load the first one.
    /// A tag without files clears the content pane.
    pub fn select_tag(&mut self, tag: &str) {
        if !self.archive.tags.contains(tag) {
            debug!(tag, "Unknown tag");
        }
        let first = self
            .filter
            .select_tag(
                &self.archive.manifest,
                &self.archive.tags,
                tag,
                self.settings.tag_match,
            )
            .and_then(|e| e.path())
            .map(str::to_string);
        info!(tag, files = self.filter.files.len(), "Selected tag");
        self.file_list = ListState::default();
        match first {
            Some(path) => {
                self.tag_focus = TagFocus::Files;
                self.request_content(&path);
            }
            None => self.clear_content(),
        }
    }

    pub fn next_file(&mut self) {
        let path = self.filter.next().and_then(|e| e.path()).map(str::to_string);
        if let Some(path) = path {
            self.request_content(&path);
        }
    }

    pub fn previous_file(&mut self) {
        let path = self
            .filter
            .previous()
            .and_then(|e| e.path())
            .map(str::to_string);
        if let Some(path) = path {
            self.request_content(&path);
        }
    }

    fn select_file(&mut self, index: usize) {
        let path = self
            .filter
            .select_index(index)
            .and_then(|e| e.path())
            .map(str::to_string);
        if let Some(path) = path {
            self.request_content(&path);
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Structure => View::Tags,
            View::Tags => View::Structure,
        };
    }

    pub fn move_down(&mut self) {
        match (self.view, self.tag_focus) {
            (View::Structure, _) => {
                if let Some(explorer) = &mut self.explorer {
                    explorer.view.select_next();
                }
            }
            (View::Tags, TagFocus::Tags) => {
                let len = self.visible_tags().len();
                if len > 0 && self.tag_list.selected_index < len - 1 {
                    self.tag_list.selected_index += 1;
                }
            }
            (View::Tags, TagFocus::Files) => self.next_file(),
        }
    }

    pub fn move_up(&mut self) {
        match (self.view, self.tag_focus) {
            (View::Structure, _) => {
                if let Some(explorer) = &mut self.explorer {
                    explorer.view.select_previous();
                }
            }
            (View::Tags, TagFocus::Tags) => {
                self.tag_list.selected_index = self.tag_list.selected_index.saturating_sub(1);
            }
            (View::Tags, TagFocus::Files) => self.previous_file(),
        }
    }

    pub fn move_first(&mut self) {
        match (self.view, self.tag_focus) {
            (View::Structure, _) => {
                if let Some(explorer) = &mut self.explorer {
                    explorer.view.select_first();
                }
            }
            (View::Tags, TagFocus::Tags) => self.tag_list.selected_index = 0,
            (View::Tags, TagFocus::Files) => self.select_file(0),
        }
    }

    pub fn move_last(&mut self) {
        match (self.view, self.tag_focus) {
            (View::Structure, _) => {
                if let Some(explorer) = &mut self.explorer {
                    explorer.view.select_last();
                }
            }
            (View::Tags, TagFocus::Tags) => {
                self.tag_list.selected_index = self.visible_tags().len().saturating_sub(1);
            }
            (View::Tags, TagFocus::Files) => {
                let last = self.filter.files.len().saturating_sub(1);
                self.select_file(last);
            }
        }
    }

    /// Enter: toggle a directory, open a file, or choose a tag.
    pub fn activate(&mut self) {
        match (self.view, self.tag_focus) {
            (View::Structure, _) => self.activate_row(),
            (View::Tags, TagFocus::Tags) => self.choose_selected_tag(),
            (View::Tags, TagFocus::Files) => {
                if let Some(i) = self.filter.current_index {
                    self.select_file(i);
                }
            }
        }
    }

    fn activate_row(&mut self) {
        let Some(explorer) = &mut self.explorer else {
            return;
        };
        let Some(row) = explorer.view.selected_row() else {
            return;
        };
        if explorer.view.toggle(row) {
            return;
        }
        let Some(r) = explorer.view.selected() else {
            return;
        };
        if let Some(id) = r.entry.as_ref().and_then(|e| e.id.as_ref()) {
            debug!(%id, path = %r.path, "Opening entry");
        }
        let path = r
            .entry
            .as_ref()
            .and_then(|e| e.path())
            .unwrap_or(&r.path)
            .to_string();
        self.request_content(&path);
    }

    /// Right / `l`: expand in the tree, move into the file list in tags view.
    pub fn expand(&mut self) {
        match self.view {
            View::Structure => {
                if let Some(explorer) = &mut self.explorer {
                    explorer.view.expand_selected();
                }
            }
            View::Tags => {
                if !self.filter.files.is_empty() {
                    self.tag_focus = TagFocus::Files;
                }
            }
        }
    }

    /// Left / `h`: collapse in the tree, back to the tag list in tags view.
    pub fn collapse(&mut self) {
        match self.view {
            View::Structure => {
                if let Some(explorer) = &mut self.explorer {
                    explorer.view.collapse_selected();
                }
            }
            View::Tags => self.tag_focus = TagFocus::Tags,
        }
    }

    /// Restore default collapse state, drop the query and its marks, clear
    /// the tag filter, and show the current pick again.
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.query.clear();
        if let Some(explorer) = &mut self.explorer {
            explorer.view.reset();
        }
        self.highlight = HighlightSummary::default();
        self.filter.clear();
        self.tag_list = ListState::default();
        self.file_list = ListState::default();
        self.tag_focus = TagFocus::Tags;
        self.show_current_pick();
        info!("Explorer reset");
    }

    // ── Mouse ───────────────────────────────────────────────────────────────

    /// Left click at a screen cell.
    pub fn click(&mut self, column: u16, row: u16) {
        let pos = Position::new(column, row);
        match self.view {
            View::Structure if self.areas.tree.contains(pos) => {
                let offset = (row - self.areas.tree.y) as usize;
                let Some(explorer) = &mut self.explorer else {
                    return;
                };
                let n = explorer.view.scroll_offset + offset;
                if explorer.view.select_visible(n) {
                    self.activate_row();
                }
            }
            View::Tags if self.areas.tags.contains(pos) => {
                let n = self.tag_list.scroll_offset + (row - self.areas.tags.y) as usize;
                self.tag_focus = TagFocus::Tags;
                if n < self.visible_tags().len() {
                    self.tag_list.selected_index = n;
                    self.choose_selected_tag();
                }
            }
            View::Tags if self.areas.files.contains(pos) => {
                let n = self.file_list.scroll_offset + (row - self.areas.files.y) as usize;
                if n < self.filter.files.len() {
                    self.tag_focus = TagFocus::Files;
                    self.select_file(n);
                }
            }
            _ => {}
        }
    }

    /// Mouse wheel: scroll the content pane under the pointer, otherwise move.
    pub fn scroll(&mut self, column: u16, row: u16, down: bool) {
        if self.areas.content.contains(Position::new(column, row)) {
            if down {
                self.content.scroll_down(3);
            } else {
                self.content.scroll_up(3);
            }
        } else if down {
            self.move_down();
        } else {
            self.move_up();
        }
    }

    // ── Status ──────────────────────────────────────────────────────────────

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Left side of the status bar: what the content pane is showing.
    pub fn status_path(&self) -> String {
        if let Some(pending) = &self.content.pending {
            return format!("{} …", pending);
        }
        self.content
            .path
            .clone()
            .unwrap_or_else(|| self.source.describe())
    }

    /// Middle of the status bar.
    pub fn status_info(&self) -> String {
        if !self.is_ready() {
            return format!("loading {}/3", self.readiness.received());
        }
        if self.view == View::Tags && self.filter.current_tag.is_some() {
            return self.filter.status_line();
        }
        if !self.query.trim().is_empty() {
            return match self.highlight.exact {
                1 => "1 match".to_string(),
                n => format!("{} matches", n),
            };
        }
        self.count_line().unwrap_or_default()
    }
}
