use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::theme::ThemeColors;

/// A single keybinding entry for display.
struct KeyEntry {
    key: &'static str,
    description: &'static str,
}

/// A category of keybindings.
struct KeyCategory {
    name: &'static str,
    entries: &'static [KeyEntry],
}

const NAVIGATION_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "j / ↓",
        description: "Move down",
    },
    KeyEntry {
        key: "k / ↑",
        description: "Move up",
    },
    KeyEntry {
        key: "g / Home",
        description: "Jump to first row",
    },
    KeyEntry {
        key: "G / End",
        description: "Jump to last row",
    },
    KeyEntry {
        key: "Enter / Space",
        description: "Toggle directory / open haiku",
    },
    KeyEntry {
        key: "l / →",
        description: "Expand directory",
    },
    KeyEntry {
        key: "h / ←",
        description: "Collapse / go to parent",
    },
    KeyEntry {
        key: "Tab",
        description: "Switch structure / tags view",
    },
    KeyEntry {
        key: "r",
        description: "Reset tree to the current pick",
    },
];

const QUERY_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "/",
        description: "Start locating",
    },
    KeyEntry {
        key: "Enter",
        description: "Apply query now",
    },
    KeyEntry {
        key: "Esc",
        description: "Cancel / clear query",
    },
    KeyEntry {
        key: "Ctrl+U",
        description: "Clear typed text",
    },
    KeyEntry {
        key: "]",
        description: "Next exact match",
    },
    KeyEntry {
        key: "[",
        description: "Previous exact match",
    },
];

const TAG_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "Enter",
        description: "Filter by selected tag",
    },
    KeyEntry {
        key: "n",
        description: "Next file for the tag",
    },
    KeyEntry {
        key: "p",
        description: "Previous file for the tag",
    },
];

const CONTENT_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "PgDn / Ctrl+D",
        description: "Scroll content down",
    },
    KeyEntry {
        key: "PgUp / Ctrl+U",
        description: "Scroll content up",
    },
    KeyEntry {
        key: "Scroll wheel",
        description: "Scroll the pane under the mouse",
    },
];

const GENERAL_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "?",
        description: "Toggle this help overlay",
    },
    KeyEntry {
        key: "q",
        description: "Quit",
    },
    KeyEntry {
        key: "Ctrl+C",
        description: "Quit",
    },
    KeyEntry {
        key: "Ctrl+R",
        description: "Reload archive data",
    },
];

const CATEGORIES: &[KeyCategory] = &[
    KeyCategory {
        name: "Navigation",
        entries: NAVIGATION_KEYS,
    },
    KeyCategory {
        name: "Locate",
        entries: QUERY_KEYS,
    },
    KeyCategory {
        name: "Tags View",
        entries: TAG_KEYS,
    },
    KeyCategory {
        name: "Content Pane",
        entries: CONTENT_KEYS,
    },
    KeyCategory {
        name: "General",
        entries: GENERAL_KEYS,
    },
];

/// Help overlay widget showing all keybindings.
pub struct HelpOverlay<'a> {
    theme: &'a ThemeColors,
    scroll_offset: usize,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a ThemeColors, scroll_offset: usize) -> Self {
        Self {
            theme,
            scroll_offset,
        }
    }

    /// Build all the lines for the help content.
    fn build_content_lines(&self) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        // Title
        lines.push(Line::from(vec![Span::styled(
            " Keybinding Reference ",
            Style::default()
                .fg(self.theme.accent_fg)
                .add_modifier(Modifier::BOLD),
        )]));
        lines.push(Line::from(""));

        for category in CATEGORIES {
            // Category header
            lines.push(Line::from(vec![
                Span::styled(
                    format!("── {} ", category.name),
                    Style::default()
                        .fg(self.theme.accent_fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("─".repeat(40), Style::default().fg(self.theme.dim_fg)),
            ]));

            for entry in category.entries {
                let key_width = 24;
                let key_padded = format!("  {:<width$}", entry.key, width = key_width);
                lines.push(Line::from(vec![
                    Span::styled(
                        key_padded,
                        Style::default()
                            .fg(self.theme.warning_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        entry.description.to_string(),
                        Style::default().fg(self.theme.tree_file_fg),
                    ),
                ]));
            }

            lines.push(Line::from(""));
        }

        // Footer
        lines.push(Line::from(vec![Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(self.theme.dim_fg),
        )]));

        lines
    }

    /// Get total number of content lines (for scroll bounds).
    pub fn total_lines() -> usize {
        let mut count = 2; // title + blank
        for category in CATEGORIES {
            count += 1; // header
            count += category.entries.len();
            count += 1; // blank separator
        }
        count += 1; // footer
        count
    }
}

impl<'a> Widget for HelpOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Centered at 70% width, 80% height
        let overlay_width = (area.width as f32 * 0.70).min(80.0) as u16;
        let overlay_height = (area.height as f32 * 0.80).min(50.0) as u16;

        let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
        let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

        // Clear the background
        Clear.render(overlay_area, buf);

        // Draw the block
        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg));

        let inner = block.inner(overlay_area);
        block.render(overlay_area, buf);

        // Build and render content lines
        let content_lines = self.build_content_lines();
        let visible_height = inner.height as usize;

        let scroll = self.scroll_offset;

        for (i, line) in content_lines
            .iter()
            .skip(scroll)
            .take(visible_height)
            .enumerate()
        {
            let line_y = inner.y + i as u16;
            if line_y >= inner.y + inner.height {
                break;
            }
            buf.set_line(inner.x + 1, line_y, line, inner.width.saturating_sub(2));
        }

        // Draw scroll indicator if content overflows
        if content_lines.len() > visible_height {
            let total = content_lines.len();
            let indicator = format!(" {}/{} ", (scroll + 1).min(total), total);
            let ind_span = Span::styled(indicator, Style::default().fg(self.theme.dim_fg));
            let ind_x = overlay_area.x
                + overlay_area
                    .width
                    .saturating_sub(ind_span.width() as u16 + 1);
            let ind_y = overlay_area.y + overlay_area.height - 1;
            buf.set_span(ind_x, ind_y, &ind_span, ind_span.width() as u16);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_lines_is_nonzero() {
        assert!(HelpOverlay::total_lines() > 0);
    }

    #[test]
    fn all_categories_have_entries() {
        for cat in CATEGORIES {
            assert!(
                !cat.entries.is_empty(),
                "Category '{}' has no entries",
                cat.name
            );
        }
    }

    #[test]
    fn every_bound_key_is_listed() {
        let keys: Vec<&str> = CATEGORIES
            .iter()
            .flat_map(|c| c.entries.iter().map(|e| e.key))
            .collect();
        for key in ["/", "]", "[", "n", "p", "Tab", "Ctrl+R"] {
            assert!(keys.contains(&key), "missing {}", key);
        }
    }

    #[test]
    fn renders_title_inside_overlay() {
        let theme = crate::theme::dark_theme();
        let area = Rect::new(0, 0, 100, 60);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(&theme, 0).render(area, &mut buf);
        let text: String = (0..60)
            .flat_map(|y| (0..100).map(move |x| (x, y)))
            .map(|p| buf.cell(p).unwrap().symbol().to_string())
            .collect();
        assert!(text.contains("Keybinding Reference"));
        assert!(text.contains("Reload archive data"));
    }

    #[test]
    fn content_lines_match_total() {
        let theme = crate::theme::dark_theme();
        let overlay = HelpOverlay::new(&theme, 0);
        let lines = overlay.build_content_lines();
        assert_eq!(lines.len(), HelpOverlay::total_lines());
    }
}
