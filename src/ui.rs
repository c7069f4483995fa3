use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use crate::app::{App, Stage};
use crate::domain::{CatalogItem, to_display_strings};
use crate::widgets::SelectList;

#[derive(Debug, Clone, Copy)]
pub struct UiRects {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

pub fn compute_ui_rects(root: Rect) -> UiRects {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(root);

    UiRects {
        header: rows[0],
        body: rows[1],
        footer: rows[2],
    }
}

pub fn list_body_rows(rects: &UiRects) -> usize {
    rects.body.height.saturating_sub(2) as usize
}

pub fn render(frame: &mut Frame<'_>, app: &App, rects: &UiRects) {
    render_header(frame, rects.header, app);
    match app.stage {
        Stage::SelectType => render_list(frame, rects.body, "Commit Type", &app.type_list),
        Stage::SelectScope => render_list(frame, rects.body, "Commit Scope", &app.scope_list),
        Stage::EnterTitle => render_title_input(frame, rects.body, app),
        Stage::Confirm => render_confirmation(frame, rects.body, app),
        Stage::Done => {}
    }
    render_footer(frame, rects.footer, app);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let title = Line::from(format!("gitcz | {}", app.stage.title()))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let text = Text::from(vec![title, Line::from(app.status_line.clone())]);
    frame.render_widget(Paragraph::new(text), area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let keys = match app.stage {
        Stage::SelectType | Stage::SelectScope => {
            "up/down move | type to filter | Backspace edit filter | Enter select | Esc cancel"
        }
        Stage::EnterTitle => "Enter continue (title may be empty) | Esc cancel",
        Stage::Confirm => "y/Enter commit | n/Esc cancel",
        Stage::Done => "",
    };
    let line = Paragraph::new(keys).block(Block::default().borders(Borders::TOP));
    frame.render_widget(line, area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, title: &str, list: &SelectList) {
    let items: Vec<ListItem<'_>> = if list.visible_len() == 0 {
        vec![ListItem::new("(no matching entries)")]
    } else {
        to_display_strings(list.visible_items())
            .into_iter()
            .map(ListItem::new)
            .collect()
    };

    let mut state = ListState::default();
    if list.visible_len() > 0 {
        *state.offset_mut() = list.offset();
        state.select(Some(list.cursor()));
    }

    let filter_line = if list.filter().is_empty() {
        " type to filter ".to_string()
    } else {
        format!(" filter: {} ", list.filter())
    };
    let widget = List::new(items)
        .block(
            panel_block(title)
                .title_bottom(Line::from(filter_line).style(Style::default().fg(Color::DarkGray))),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(widget, area, &mut state);
}

fn render_title_input(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let modal = centered_rect(70, 30, area);
    frame.render_widget(Clear, modal);

    let text = Text::from(vec![
        Line::from("Title of the commit (may be left empty):"),
        Line::from(""),
        Line::from(format!("> {}", app.title_input.value())),
        Line::from(""),
        Line::from("Enter to continue, Esc to cancel."),
    ]);
    let widget = Paragraph::new(text).block(
        Block::default()
            .title("Commit Title")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(widget, modal);

    let cursor_x = modal
        .x
        .saturating_add(3)
        .saturating_add(app.title_input.cursor_chars() as u16);
    let cursor_y = modal.y.saturating_add(3);
    if cursor_x < modal.x.saturating_add(modal.width) {
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn render_confirmation(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let modal = centered_rect(70, 40, area);
    frame.render_widget(Clear, modal);

    let title = app.title.as_deref().unwrap_or("");
    let text = Text::from(vec![
        Line::from(format!("Type of change  : {}", summary_entry(&app.selected_type))),
        Line::from(format!("Scope of change : {}", summary_entry(&app.selected_scope))),
        Line::from(format!(
            "Title of commit : {}",
            if title.is_empty() { "(empty)" } else { title }
        )),
        Line::from(""),
        Line::from(format!("Command: git commit -m \"{}\"", app.assembled_message()))
            .style(Style::default().fg(Color::DarkGray)),
        Line::from(""),
        Line::from("Press y/Enter to commit, n/Esc to cancel."),
    ]);
    let widget = Paragraph::new(text).block(
        Block::default()
            .title("Confirm Commit")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(widget, modal);
}

fn summary_entry(item: &Option<CatalogItem>) -> String {
    match item {
        Some(item) => format!("{} ({})", item.label, item.code),
        None => "(none)".to_string(),
    }
}

fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightCyan))
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
