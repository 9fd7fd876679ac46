mod config;
mod error;
mod session;
mod store;

// Presentation layer
mod app;
mod events;
mod key_event;
mod ui;
mod utils;

// Re-export commonly used types
pub use app::{App, AppMode, EventSink};
pub use config::manager::{AppSettings, AuthMethod, ConfigManager, Connection};
pub use error::{AppError, Result};
pub use events::AppEvent;
pub use session::{
    BrowsingContext, BusyFlag, ChooserOutcome, ChooserSession, ContextSnapshot, ErrorSink,
    FileRef, LogSink, SelectionAccumulator, SelectionMode,
};
pub use store::{EntryKind, FileEntry, FileSystemStore, FileSystemView, LocalStore, SshStore};
pub use utils::{init_panic_hook, init_tracing};
