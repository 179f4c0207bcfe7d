use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::ContentState;
use crate::theme::ThemeColors;

/// Content widget that renders the loaded haiku in the right-hand pane.
pub struct ContentWidget<'a> {
    state: &'a ContentState,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> ContentWidget<'a> {
    pub fn new(state: &'a ContentState, theme: &'a ThemeColors) -> Self {
        Self {
            state,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }
}

impl<'a> Widget for ContentWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.state.lines.is_empty() {
            let msg = if self.state.pending.is_some() {
                "Loading…"
            } else {
                "Select a haiku"
            };
            let line = Line::from(Span::styled(
                msg,
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::ITALIC),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let style = Style::default()
            .fg(self.theme.content_fg)
            .bg(self.theme.content_bg);
        let start = self.state.scroll_offset.min(self.state.lines.len());
        for (i, text) in self.state.lines[start..]
            .iter()
            .take(inner.height as usize)
            .enumerate()
        {
            let y = inner.y + i as u16;
            let line = Line::from(Span::styled(text.as_str(), style));
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
