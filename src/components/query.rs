use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const PLACEHOLDER: &str = "locate in archive…";

/// One-row query input. The cursor sits at the end of the text while editing.
pub struct QueryBarWidget<'a> {
    query: &'a str,
    active: bool,
    summary: Option<&'a str>,
    theme: &'a ThemeColors,
}

impl<'a> QueryBarWidget<'a> {
    pub fn new(query: &'a str, active: bool, theme: &'a ThemeColors) -> Self {
        Self {
            query,
            active,
            summary: None,
            theme,
        }
    }

    /// Right-aligned text, such as the match count.
    pub fn summary(mut self, summary: &'a str) -> Self {
        self.summary = Some(summary);
        self
    }
}

impl<'a> Widget for QueryBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let prompt_style = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let input_style = Style::default().fg(self.theme.tree_fg);
        let cursor_style = Style::default()
            .bg(self.theme.tree_fg)
            .fg(self.theme.tree_bg)
            .add_modifier(Modifier::BOLD);

        let mut spans = vec![Span::styled("/ ", prompt_style)];
        if self.query.is_empty() && !self.active {
            spans.push(Span::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::ITALIC),
            ));
        } else {
            spans.push(Span::styled(self.query, input_style));
            if self.active {
                spans.push(Span::styled(" ", cursor_style));
            }
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        if let Some(summary) = self.summary.filter(|s| !s.is_empty()) {
            let span = Span::styled(summary, Style::default().fg(self.theme.dim_fg));
            let width = span.width() as u16;
            if width < area.width {
                buf.set_span(area.x + area.width - width, area.y, &span, width);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn row(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn idle_bar_shows_placeholder() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        QueryBarWidget::new("", false, &tc).render(area, &mut buf);
        assert!(row(&buf, 40).starts_with("/ locate in archive"));
    }

    #[test]
    fn active_bar_draws_cursor_after_text() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        QueryBarWidget::new("frog", true, &tc).render(area, &mut buf);
        assert!(row(&buf, 40).starts_with("/ frog"));
        assert_eq!(buf.cell((6, 0)).unwrap().bg, tc.tree_fg);
    }

    #[test]
    fn summary_is_right_aligned() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        QueryBarWidget::new("frog", false, &tc)
            .summary("3 matches")
            .render(area, &mut buf);
        assert!(row(&buf, 40).ends_with("3 matches"));
    }

    #[test]
    fn zero_area_no_panic() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        QueryBarWidget::new("frog", true, &tc).render(area, &mut buf);
    }
}
