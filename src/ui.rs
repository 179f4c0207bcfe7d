use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode, TagFocus, View};
use crate::components::content::ContentWidget;
use crate::components::help::HelpOverlay;
use crate::components::query::QueryBarWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tags::{FilteredFilesWidget, TagListWidget};
use crate::components::tree::TreeWidget;
use crate::explore::view::TreeView;
use crate::theme::ThemeColors;

fn panel<'a>(title: String, focused: bool, theme: &ThemeColors) -> Block<'a> {
    let border = if focused {
        theme.border_focused_fg
    } else {
        theme.border_fg
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    render_query_bar(app, frame, rows[0]);
    match app.view {
        View::Structure => render_structure(app, frame, columns[0]),
        View::Tags => render_tags(app, frame, columns[0]),
    }
    render_content(app, frame, columns[1]);
    render_status_bar(app, frame, rows[2]);

    if app.mode == AppMode::Help {
        frame.render_widget(HelpOverlay::new(&app.settings.theme, app.help_scroll), area);
    }
}

fn render_query_bar(app: &App, frame: &mut Frame, area: Rect) {
    let summary = if app.query.trim().is_empty() {
        String::new()
    } else {
        match app.highlight.exact {
            1 => "1 match ".to_string(),
            n => format!("{} matches ", n),
        }
    };
    let widget = QueryBarWidget::new(
        &app.query,
        app.mode == AppMode::Query,
        &app.settings.theme,
    )
    .summary(&summary);
    frame.render_widget(widget, area);
}

fn render_structure(app: &mut App, frame: &mut Frame, area: Rect) {
    let theme = &app.settings.theme;
    let block = panel(" Archive ".to_string(), true, theme);
    let inner = block.inner(area);
    app.areas.tree = inner;
    app.areas.tags = Rect::default();
    app.areas.files = Rect::default();

    match &mut app.explorer {
        Some(explorer) => {
            explorer.view.update_scroll(inner.height as usize);
            let widget = TreeWidget::new(&explorer.view, theme, app.settings.use_icons).block(block);
            frame.render_widget(widget, area);
        }
        None => {
            let empty = TreeView::default();
            let widget = TreeWidget::new(&empty, theme, app.settings.use_icons)
                .empty_message("Loading archive…")
                .block(block);
            frame.render_widget(widget, area);
        }
    }
}

fn render_tags(app: &mut App, frame: &mut Frame, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let tags_focused = app.tag_focus == TagFocus::Tags;
    let theme = &app.settings.theme;
    let all_tags = &app.archive.tags;
    let tags_title = if all_tags.is_empty() || app.query.trim().is_empty() {
        " Tags ".to_string()
    } else {
        format!(
            " Tags · {}/{} ",
            app.visible_tags().len(),
            all_tags.tags().len()
        )
    };
    let tags_block = panel(tags_title, tags_focused, theme);
    let files_title = match app.filter.current_tag.as_deref() {
        Some(tag) => format!(" Files · {} ", tag),
        None => " Files ".to_string(),
    };
    let files_block = panel(files_title, !tags_focused, theme);

    app.areas.tree = Rect::default();
    app.areas.tags = tags_block.inner(halves[0]);
    app.areas.files = files_block.inner(halves[1]);

    let tag_count = app.visible_tags().len();
    if tag_count > 0 && app.tag_list.selected_index >= tag_count {
        app.tag_list.selected_index = tag_count - 1;
    }
    app.tag_list.update_scroll(app.areas.tags.height as usize);
    app.file_list.selected_index = app.filter.current_index.unwrap_or(0);
    app.file_list.update_scroll(app.areas.files.height as usize);

    let tags = app.visible_tags();
    let theme = &app.settings.theme;
    let tag_widget = TagListWidget::new(&tags, &app.tag_list, theme)
        .active_tag(app.filter.current_tag.as_deref())
        .focused(tags_focused)
        .block(tags_block);
    frame.render_widget(tag_widget, halves[0]);

    let files_widget = FilteredFilesWidget::new(&app.filter, &app.file_list, theme)
        .focused(!tags_focused)
        .block(files_block);
    frame.render_widget(files_widget, halves[1]);
}

fn render_content(app: &mut App, frame: &mut Frame, area: Rect) {
    let title = match app.content.path.as_deref() {
        Some(path) => format!(" {} ", path),
        None => " Haiku ".to_string(),
    };
    let block = panel(title, false, &app.settings.theme);
    app.areas.content = block.inner(area);

    let widget = ContentWidget::new(&app.content, &app.settings.theme).block(block);
    frame.render_widget(widget, area);
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let path = app.status_path();
    let info = app.status_info();
    let mut widget = StatusBarWidget::new(&path, &info, &app.settings.theme);
    if let Some((msg, _)) = &app.status_message {
        widget = widget.status_message(msg);
    }
    frame.render_widget(widget, area);
}
