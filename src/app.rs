use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use ratatui::Terminal;
use ratatui::prelude::Backend;
use tokio::sync::mpsc;

use crate::config::manager::ConfigManager;
use crate::error::{AppError, Result};
use crate::events::AppEvent;
use crate::session::{BusyFlag, ChooserSession, ContextSnapshot, ErrorSink, FileRef};
use crate::store::{FileSystemStore, LocalStore, SshStore};
use crate::ui::{
    draw_browser, draw_connecting_popup, draw_connection_list, draw_error_popup, draw_info_popup,
};

#[derive(Clone, Debug)]
pub enum AppMode {
    ConnectionList { selected: usize },
    Browsing { selected: usize },
}

/// Error sink that logs and forwards failures into the app event channel so
/// they surface as popups.
pub struct EventSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink {
    pub fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl ErrorSink for EventSink {
    fn report(&self, error: &AppError, expected: bool) {
        if expected {
            tracing::warn!("Session error: {}", error);
        } else {
            tracing::error!("Unexpected session error: {}", error);
        }
        let _ = self.tx.try_send(AppEvent::SessionError {
            message: error.to_string(),
            expected,
        });
    }
}

/// App is the main application
pub struct App<B: Backend + Write> {
    pub mode: AppMode,
    pub error: Option<String>,
    pub info: Option<String>,
    pub config: ConfigManager,
    session: Arc<ChooserSession>,
    busy: BusyFlag,
    opening_name: Option<String>,
    start_path: Option<String>,
    snapshot: Option<ContextSnapshot>,
    accumulated: Vec<FileRef>,
    terminal: Terminal<B>,
    needs_redraw: bool, // Track if UI needs redrawing
}

impl<B: Backend + Write> Drop for App<B> {
    fn drop(&mut self) {
        use crossterm::execute;
        use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};

        disable_raw_mode().ok();
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).ok();
    }
}

impl<B: Backend + Write> App<B> {
    pub fn new(
        terminal: Terminal<B>,
        config: ConfigManager,
        session: Arc<ChooserSession>,
        start_path: Option<String>,
    ) -> Self {
        Self {
            mode: AppMode::ConnectionList { selected: 0 },
            error: None,
            info: None,
            config,
            session,
            busy: BusyFlag::new(),
            opening_name: None,
            start_path,
            snapshot: None,
            accumulated: Vec::new(),
            terminal,
            needs_redraw: true, // Initial redraw needed
        }
    }

    pub fn init_terminal(&mut self) -> Result<()> {
        use crossterm::ExecutableCommand;
        use crossterm::terminal::{EnterAlternateScreen, enable_raw_mode};

        enable_raw_mode().inspect_err(|e| tracing::error!("Error enabling raw mode: {}", e))?;
        self.terminal
            .backend_mut()
            .execute(EnterAlternateScreen)
            .inspect_err(|e| {
                tracing::error!(
                    "Error executing EnterAlternateScreen terminal command: {}",
                    e
                )
            })?;
        Ok(())
    }

    pub fn session(&self) -> &Arc<ChooserSession> {
        &self.session
    }

    pub fn snapshot(&self) -> Option<&ContextSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn has_context(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Rows of the connection picker: "Local" plus the stored connections.
    pub fn connection_rows(&self) -> usize {
        self.config.connections().len() + 1
    }

    pub fn entry_count(&self) -> usize {
        self.snapshot
            .as_ref()
            .map(|s| s.entries.len())
            .unwrap_or(0)
    }

    pub fn go_to_browsing(&mut self) {
        self.mode = AppMode::Browsing { selected: 0 };
        self.needs_redraw = true; // Mode change requires redraw
    }

    pub fn go_to_connection_list(&mut self) {
        self.mode = AppMode::ConnectionList { selected: 0 };
        self.needs_redraw = true; // Mode change requires redraw
    }

    /// Open the connection under the cursor through the chooser session.
    pub async fn open_selected(&mut self) {
        let AppMode::ConnectionList { selected } = self.mode else {
            return;
        };

        let (store, name, initial_path): (Arc<dyn FileSystemStore>, String, Option<String>) =
            if selected == 0 {
                let path = self
                    .start_path
                    .clone()
                    .unwrap_or_else(LocalStore::start_dir);
                let store: Arc<dyn FileSystemStore> = Arc::new(LocalStore::new());
                (store, "Local".to_string(), Some(path))
            } else {
                let Some(conn) = self.config.connections().get(selected - 1) else {
                    return;
                };
                let timeout = Duration::from_secs(self.config.settings().connection_timeout);
                let name = conn.display_name.clone();
                let id = conn.id.clone();
                let store: Arc<dyn FileSystemStore> = Arc::new(SshStore::new(conn.clone(), timeout));
                let _ = self.config.touch_last_used(&id);
                (store, name, self.start_path.clone())
            };

        self.opening_name = Some(name);
        self.session
            .open(store, initial_path, Some(self.busy.clone()))
            .await;
        self.needs_redraw = true;
    }

    /// Toggle the listed entry in the current context's selection.
    pub async fn toggle_entry(&mut self, index: usize) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let Some(entry) = snapshot.entries.get(index) else {
            return;
        };

        let mut selection = snapshot.selection.clone();
        if let Some(pos) = selection.iter().position(|e| e.path == entry.path) {
            selection.remove(pos);
        } else {
            selection.push(FileRef::new(
                snapshot.connection_id.clone(),
                entry.path.clone(),
                entry.kind,
            ));
        }
        self.session.record_selection(selection).await;
        self.needs_redraw = true;
    }

    /// Mark that UI needs redrawing
    pub fn mark_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Check if redraw is needed and mark as drawn
    pub fn should_redraw(&mut self) -> bool {
        let should = self.needs_redraw;
        self.needs_redraw = false;
        should
    }

    /// Set error and mark for redraw
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
        self.needs_redraw = true;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.info = None;
        self.needs_redraw = true;
    }

    /// Set info and mark for redraw
    #[allow(dead_code)]
    pub fn set_info(&mut self, info: String) {
        self.info = Some(info);
        self.needs_redraw = true;
    }

    fn draw(&mut self) -> Result<()> {
        let mode_policy = self.session.mode();
        self.terminal.draw(|f| {
            let size = f.area();
            match &self.mode {
                AppMode::ConnectionList { selected } => {
                    draw_connection_list(f, size, self.config.connections(), *selected);
                }
                AppMode::Browsing { selected } => {
                    draw_browser(
                        f,
                        size,
                        self.snapshot.as_ref(),
                        &self.accumulated,
                        *selected,
                        mode_policy,
                    );
                }
            }

            // Overlay connecting popup while a handshake is in flight
            if self.busy.is_busy()
                && let Some(name) = &self.opening_name
            {
                let message = format!("Connecting to {name}...");
                draw_connecting_popup(size, &message, f);
            }

            // Overlay info popup if any
            if let Some(msg) = &self.info {
                draw_info_popup(size, msg, f);
            }

            // Overlay error popup if any (always on top)
            if let Some(err) = &self.error {
                draw_error_popup(size, err, f);
            }
        })?;
        Ok(())
    }

    pub async fn run(&mut self, rx: &mut mpsc::Receiver<AppEvent>) -> Result<()> {
        loop {
            // Refresh the render snapshot before deciding what to draw; the
            // session owns the state, the app only observes it.
            self.snapshot = self.session.snapshot().await;
            self.accumulated = self.session.accumulated().await;

            if self.session.is_finished().await {
                break;
            }

            if self.should_redraw() || self.busy.is_busy() {
                self.draw()?;
            }

            // wait for an event (asynchronous)
            let ev = match rx.recv().await {
                Some(e) => e,
                None => {
                    tracing::warn!("App event channel closed");
                    break; // exit if channel is closed
                }
            };

            match ev {
                AppEvent::Tick => {
                    // An open just completed: drop the popup text and jump
                    // into the freshly installed context.
                    if self.opening_name.is_some() && !self.busy.is_busy() {
                        self.opening_name = None;
                        if self.snapshot.is_some() {
                            self.go_to_browsing();
                        }
                        self.mark_redraw();
                    }
                }
                AppEvent::Input(ev) => {
                    use crossterm::event::Event;

                    self.mark_redraw(); // Input events typically need redraw
                    match ev {
                        Event::Key(key) => {
                            match crate::key_event::handle_key_event(self, key).await {
                                crate::key_event::KeyFlow::Continue => {}
                                crate::key_event::KeyFlow::Quit => break,
                            }
                        }
                        Event::Resize(_, _) => {}
                        _ => {}
                    }
                }
                AppEvent::SessionError { message, .. } => {
                    self.set_error(message);
                }
            }
        }

        // The completion contract must resolve no matter how the loop ends;
        // this is a no-op when the session already finished.
        self.session.cancel().await;
        Ok(())
    }
}
