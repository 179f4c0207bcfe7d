use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::ListState;
use crate::explore::filter::FilterState;
use crate::theme::ThemeColors;

fn message_line<'a>(msg: &'a str, theme: &ThemeColors) -> Line<'a> {
    Line::from(Span::styled(
        msg,
        Style::default()
            .fg(theme.dim_fg)
            .add_modifier(Modifier::ITALIC),
    ))
}

fn render_block<'a>(block: Option<Block<'a>>, area: Rect, buf: &mut Buffer) -> Rect {
    match block {
        Some(block) => {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        }
        None => area,
    }
}

/// List of tag labels, narrowed by the current query.
pub struct TagListWidget<'a> {
    tags: &'a [&'a str],
    state: &'a ListState,
    active_tag: Option<&'a str>,
    focused: bool,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> TagListWidget<'a> {
    pub fn new(tags: &'a [&'a str], state: &'a ListState, theme: &'a ThemeColors) -> Self {
        Self {
            tags,
            state,
            active_tag: None,
            focused: false,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Tag whose files are currently listed.
    pub fn active_tag(mut self, tag: Option<&'a str>) -> Self {
        self.active_tag = tag;
        self
    }
}

impl<'a> Widget for TagListWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = render_block(self.block, area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.tags.is_empty() {
            buf.set_line(
                inner.x,
                inner.y,
                &message_line("No tags", self.theme),
                inner.width,
            );
            return;
        }

        for (i, (pos, tag)) in self
            .tags
            .iter()
            .enumerate()
            .skip(self.state.scroll_offset)
            .take(inner.height as usize)
            .enumerate()
        {
            let y = inner.y + i as u16;
            let style = if self.focused && pos == self.state.selected_index {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if Some(*tag) == self.active_tag {
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.tree_fg)
            };
            let marker = if pos == self.state.selected_index { "▸ " } else { "  " };
            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(self.theme.accent_fg)),
                Span::styled(*tag, style),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

/// Files matching the selected tag, with the current one highlighted.
pub struct FilteredFilesWidget<'a> {
    filter: &'a FilterState,
    state: &'a ListState,
    focused: bool,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> FilteredFilesWidget<'a> {
    pub fn new(filter: &'a FilterState, state: &'a ListState, theme: &'a ThemeColors) -> Self {
        Self {
            filter,
            state,
            focused: false,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl<'a> Widget for FilteredFilesWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = render_block(self.block, area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let Some(tag) = self.filter.current_tag.as_deref() else {
            buf.set_line(
                inner.x,
                inner.y,
                &message_line("Pick a tag", self.theme),
                inner.width,
            );
            return;
        };

        if self.filter.is_no_results() {
            let msg = format!("No results for \"{}\"", tag);
            let line = Line::from(Span::styled(
                msg,
                Style::default().fg(self.theme.warning_fg),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        for (i, (pos, entry)) in self
            .filter
            .files
            .iter()
            .enumerate()
            .skip(self.state.scroll_offset)
            .take(inner.height as usize)
            .enumerate()
        {
            let y = inner.y + i as u16;
            let current = self.filter.current_index == Some(pos);
            let style = match (current, self.focused) {
                (true, true) => Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD),
                (true, false) => Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
                _ => Style::default().fg(self.theme.tree_file_fg),
            };
            let line = Line::from(Span::styled(entry.path().unwrap_or(""), style));
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
