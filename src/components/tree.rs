use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::explore::highlight::Mark;
use crate::explore::view::{Row, TreeView};
use crate::theme::ThemeColors;

/// Tree widget that renders the archive rows with box-drawing characters.
pub struct TreeWidget<'a> {
    view: &'a TreeView,
    theme: &'a ThemeColors,
    use_icons: bool,
    empty_message: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(view: &'a TreeView, theme: &'a ThemeColors, use_icons: bool) -> Self {
        Self {
            view,
            theme,
            use_icons,
            empty_message: "Archive is empty",
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    pub fn empty_message(mut self, msg: &'a str) -> Self {
        self.empty_message = msg;
        self
    }

    /// Indentation for one row: a continuation column per enclosing
    /// directory, then this row's own connector.
    fn build_prefix(row: &Row) -> String {
        let mut prefix: String = row
            .guides
            .iter()
            .map(|&continues| if continues { "│  " } else { "   " })
            .collect();
        prefix.push_str(if row.is_last_sibling { "└─ " } else { "├─ " });
        prefix
    }

    /// Get the directory/file indicator.
    fn item_indicator(&self, row: &Row) -> &'static str {
        match (self.use_icons, row.is_dir(), row.collapsed) {
            (true, true, true) => "\u{f07b} ",
            (true, true, false) => "\u{f07c} ",
            (true, false, _) => "\u{f15c} ",
            (false, true, true) => "+ ",
            (false, true, false) => "- ",
            (false, false, _) => "",
        }
    }

    fn row_style(&self, row: &Row, is_selected: bool) -> Style {
        if is_selected {
            return Style::default()
                .bg(self.theme.tree_selected_bg)
                .fg(self.theme.tree_selected_fg)
                .add_modifier(Modifier::BOLD);
        }
        match row.mark {
            Some(Mark::Exact) => Style::default()
                .fg(self.theme.highlight_exact_fg)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            Some(Mark::Ancestor) => Style::default().fg(self.theme.highlight_ancestor_fg),
            None if row.is_dir() => Style::default()
                .fg(self.theme.tree_dir_fg)
                .add_modifier(Modifier::BOLD),
            None => Style::default().fg(self.theme.tree_file_fg),
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if inner_area.width == 0 || visible_height == 0 {
            return;
        }

        let visible = self.view.visible();
        if visible.is_empty() {
            let line = Line::from(Span::styled(
                self.empty_message,
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
            return;
        }

        let rows = visible
            .iter()
            .enumerate()
            .skip(self.view.scroll_offset)
            .take(visible_height);

        for (i, (pos, &row_index)) in rows.enumerate() {
            let y = inner_area.y + i as u16;
            let row = &self.view.rows[row_index];

            let prefix = Self::build_prefix(row);
            let indicator = self.item_indicator(row);
            let style = self.row_style(row, pos == self.view.selected_index);

            let line = Line::from(vec![
                Span::styled(prefix, Style::default().fg(self.theme.border_fg)),
                Span::styled(format!("{}{}", indicator, row.name), style),
            ]);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
