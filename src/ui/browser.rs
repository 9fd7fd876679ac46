use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::session::{ContextSnapshot, FileRef, SelectionMode};

fn mode_label(mode: SelectionMode) -> &'static str {
    match mode {
        SelectionMode::SingleFile => "single file",
        SelectionMode::MultipleFiles => "multiple files",
        SelectionMode::Directory => "directories",
        SelectionMode::Any => "any",
        SelectionMode::All => "all",
    }
}

/// Draw the file browser for the current context plus the accumulated
/// selection bar at the bottom.
pub fn draw_browser(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    snapshot: Option<&ContextSnapshot>,
    accumulated: &[FileRef],
    selected: usize,
    mode: SelectionMode,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(1),    // listing
            Constraint::Length(3), // selection bar
            Constraint::Length(3), // footer
        ])
        .split(area);

    let Some(snapshot) = snapshot else {
        let placeholder = Paragraph::new(" No connection open. Press Tab to pick one ")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, layout[0]);
        draw_selection_bar(frame, layout[2], accumulated);
        draw_footer(frame, layout[3], mode);
        return;
    };

    let header = Paragraph::new(format!(
        " {} | {} ",
        snapshot.connection_name, snapshot.current_path
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    let items: Vec<ListItem> = snapshot
        .entries
        .iter()
        .map(|entry| {
            let picked = snapshot.is_selected(&entry.path);
            let marker = if picked { "* " } else { "  " };
            let name_style = if entry.kind.is_dir() {
                Style::default().fg(Color::LightBlue)
            } else {
                Style::default().fg(Color::White)
            };
            let name_style = if picked {
                name_style.add_modifier(Modifier::BOLD)
            } else {
                name_style
            };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(entry.name.clone(), name_style),
            ];
            if let Some(size) = entry.size {
                spans.push(Span::styled(
                    format!("  {size} B"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Files "))
        .highlight_style(Style::default().bg(Color::Cyan).fg(Color::Black));
    let mut state = ListState::default();
    if !snapshot.entries.is_empty() {
        state.select(Some(selected.min(snapshot.entries.len() - 1)));
    }
    frame.render_stateful_widget(list, layout[1], &mut state);

    draw_selection_bar(frame, layout[2], accumulated);
    draw_footer(frame, layout[3], mode);
}

fn draw_selection_bar(frame: &mut ratatui::Frame<'_>, area: Rect, accumulated: &[FileRef]) {
    let line = if accumulated.is_empty() {
        Line::from(Span::styled(
            "nothing selected",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut spans = Vec::new();
        for (i, entry) in accumulated.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Style::default()));
            }
            spans.push(Span::styled(
                entry.path.clone(),
                Style::default().fg(Color::Yellow),
            ));
        }
        Line::from(spans)
    };

    let bar = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Selection ({}) ", accumulated.len())),
    );
    frame.render_widget(bar, area);
}

fn draw_footer(frame: &mut ratatui::Frame<'_>, area: Rect, mode: SelectionMode) {
    let footer = Paragraph::new(Line::from(Span::styled(
        format!(
            "↑↓/jk: Move | Enter: Open dir | Space: Pick ({}) | h: Up | b: Back | r: Refresh | Tab: Connections | c: Confirm | Esc/q: Cancel",
            mode_label(mode)
        ),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
