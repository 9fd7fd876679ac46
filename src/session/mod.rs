//! The chooser session core: orchestrator, browsing context, selection.

mod chooser;
mod context;
mod selection;

pub use chooser::{BusyFlag, ChooserOutcome, ChooserSession, ErrorSink, LogSink};
pub use context::{BrowsingContext, ContextSnapshot};
pub use selection::{FileRef, SelectionAccumulator, SelectionMode};
