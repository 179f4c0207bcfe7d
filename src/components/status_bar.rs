use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " /:find  Tab:view  ?:help ";

/// Keep the last `budget` characters, marking the cut with `...`.
fn truncate_left(s: &str, budget: usize) -> String {
    let len = s.chars().count();
    if len <= budget {
        return s.to_string();
    }
    if budget > 3 {
        let tail: String = s.chars().skip(len - (budget - 3)).collect();
        format!("...{}", tail)
    } else {
        s.chars().take(budget).collect()
    }
}

/// Status bar widget: content path, load/match info, and key hints, or a
/// transient status message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            info,
            theme,
            status_message: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str) -> Self {
        self.status_message = Some(msg);
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        let bar_style = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        buf.set_style(area, bar_style);

        if let Some(msg) = self.status_message {
            let style = Style::default()
                .bg(self.theme.status_bg)
                .fg(self.theme.warning_fg)
                .add_modifier(Modifier::BOLD);
            let display: String = msg.chars().take(width).collect();
            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let hints_len = KEY_HINTS.chars().count();
        let remaining = width.saturating_sub(hints_len);

        let info_len = self.info.chars().count().min(remaining);
        let info_display: String = self.info.chars().take(info_len).collect();
        let path_budget = remaining.saturating_sub(info_len).saturating_sub(1);
        let path_display = truncate_left(self.path_str, path_budget);

        let gap = remaining
            .saturating_sub(path_display.chars().count())
            .saturating_sub(info_len);

        let spans = vec![
            Span::styled(path_display, Style::default().fg(self.theme.status_fg)),
            Span::raw(" ".repeat(gap)),
            Span::styled(info_display, Style::default().fg(self.theme.accent_fg)),
            Span::styled(
                KEY_HINTS,
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::DIM),
            ),
        ];

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
