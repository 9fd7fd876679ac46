use std::io::Write;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::prelude::Backend;

use crate::app::{App, AppMode};

pub enum KeyFlow {
    Continue,
    Quit,
}

pub async fn handle_key_event<B: Backend + Write>(app: &mut App<B>, key: KeyEvent) -> KeyFlow {
    if key.kind != KeyEventKind::Press {
        return KeyFlow::Continue;
    }

    // Error and info popups swallow everything until dismissed
    if app.error.is_some() || app.info.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.clear_error();
        }
        return KeyFlow::Continue;
    }

    match app.mode {
        AppMode::ConnectionList { .. } => handle_connection_list_key(app, key).await,
        AppMode::Browsing { .. } => handle_browser_key(app, key).await,
    }
}

async fn handle_connection_list_key<B: Backend + Write>(
    app: &mut App<B>,
    key: KeyEvent,
) -> KeyFlow {
    let len = app.connection_rows();
    match key.code {
        KeyCode::Char('k') | KeyCode::Up => {
            if let AppMode::ConnectionList { selected } = &mut app.mode {
                *selected = if *selected == 0 { len - 1 } else { *selected - 1 };
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if let AppMode::ConnectionList { selected } = &mut app.mode {
                *selected = (*selected + 1) % len;
            }
        }
        KeyCode::Enter => {
            app.open_selected().await;
        }
        KeyCode::Tab => {
            if app.has_context() {
                app.go_to_browsing();
            }
        }
        KeyCode::Esc | KeyCode::Char('q') => {
            return KeyFlow::Quit;
        }
        _ => {}
    }
    KeyFlow::Continue
}

async fn handle_browser_key<B: Backend + Write>(app: &mut App<B>, key: KeyEvent) -> KeyFlow {
    let len = app.entry_count();
    match key.code {
        KeyCode::Char('k') | KeyCode::Up => {
            if len > 0
                && let AppMode::Browsing { selected } = &mut app.mode
            {
                *selected = if *selected == 0 { len - 1 } else { *selected - 1 };
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if len > 0
                && let AppMode::Browsing { selected } = &mut app.mode
            {
                *selected = (*selected + 1) % len;
            }
        }
        KeyCode::Enter => {
            // Enter descends into directories and picks plain files
            let AppMode::Browsing { selected } = app.mode else {
                return KeyFlow::Continue;
            };
            let target = app
                .snapshot()
                .and_then(|s| s.entries.get(selected))
                .map(|e| (e.name.clone(), e.kind.is_dir()));
            match target {
                Some((name, true)) => {
                    app.session().enter(&name).await;
                    app.mode = AppMode::Browsing { selected: 0 };
                }
                Some((_, false)) => {
                    app.toggle_entry(selected).await;
                }
                None => {}
            }
        }
        KeyCode::Char(' ') => {
            if let AppMode::Browsing { selected } = app.mode {
                app.toggle_entry(selected).await;
            }
        }
        KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
            app.session().ascend().await;
            app.mode = AppMode::Browsing { selected: 0 };
        }
        KeyCode::Char('b') => {
            app.session().back().await;
            app.mode = AppMode::Browsing { selected: 0 };
        }
        KeyCode::Char('r') => {
            app.session().refresh().await;
        }
        KeyCode::Char('c') => {
            app.session().finish().await;
        }
        KeyCode::Tab => {
            app.go_to_connection_list();
        }
        KeyCode::Esc | KeyCode::Char('q') => {
            return KeyFlow::Quit;
        }
        _ => {}
    }
    KeyFlow::Continue
}
