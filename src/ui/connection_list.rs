use chrono::{DateTime, Local, Utc};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::config::manager::Connection;

fn format_last_used(last_used: Option<DateTime<Utc>>) -> String {
    match last_used {
        Some(ts) => ts
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => "never".to_string(),
    }
}

/// Draw the connection picker: a synthetic "Local" row followed by the
/// stored SSH connections.
pub fn draw_connection_list(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    connections: &[Connection],
    selected: usize,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(1),    // list
            Constraint::Length(3), // footer
        ])
        .split(area);

    let header = Paragraph::new(" sshpick: choose a machine to browse ")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    let mut items: Vec<ListItem> = Vec::with_capacity(connections.len() + 1);
    items.push(ListItem::new(Line::from(vec![
        Span::styled("Local", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("  browse this machine", Style::default().fg(Color::Gray)),
    ])));
    for conn in connections {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(
                conn.display_name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}@{}", conn.username, conn.host_port()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                format!("  last used: {}", format_last_used(conn.last_used)),
                Style::default().fg(Color::DarkGray),
            ),
        ])));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Connections "),
        )
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, layout[1], &mut state);

    let footer = Paragraph::new(Line::from(Span::styled(
        "↑↓/jk: Move | Enter: Open | Tab: Back to files | Esc/q: Cancel",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, layout[2]);
}
