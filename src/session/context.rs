//! Live state for exactly one opened connection.

use tracing::{debug, warn};

use super::selection::FileRef;
use crate::error::{AppError, Result};
use crate::store::{FileEntry, FileSystemView};

/// The chooser session's record of the one currently open file-system view:
/// where it is, how it got there, and what has been picked inside it.
///
/// Exactly one instance is current at any time; switching connections
/// destroys the previous instance after the replacement is published.
pub struct BrowsingContext {
    connection_id: String,
    connection_name: String,
    view: Box<dyn FileSystemView>,
    current_path: String,
    history: Vec<String>,
    entries: Vec<FileEntry>,
    local_selection: Vec<FileRef>,
}

/// Immutable render snapshot of a browsing context.
#[derive(Clone, Debug)]
pub struct ContextSnapshot {
    pub connection_id: String,
    pub connection_name: String,
    pub current_path: String,
    pub entries: Vec<FileEntry>,
    pub selection: Vec<FileRef>,
}

impl ContextSnapshot {
    pub fn is_selected(&self, path: &str) -> bool {
        self.selection.iter().any(|e| e.path == path)
    }
}

impl BrowsingContext {
    /// Build a context from a freshly opened view.
    ///
    /// Canonicalizes the starting path and loads the first listing. On
    /// failure the view is closed before the error is returned, so a failed
    /// construction never leaks the connection.
    pub async fn new(
        connection_id: String,
        connection_name: String,
        mut view: Box<dyn FileSystemView>,
        initial_path: Option<String>,
    ) -> Result<Self> {
        let start = initial_path.unwrap_or_else(|| ".".to_string());
        match Self::load(&*view, &start).await {
            Ok((current_path, entries)) => Ok(Self {
                connection_id,
                connection_name,
                view,
                current_path,
                history: Vec::new(),
                entries,
                local_selection: Vec::new(),
            }),
            Err(e) => {
                if let Err(close_err) = view.close().await {
                    warn!(
                        "Closing view after failed context setup also failed: {}",
                        close_err
                    );
                }
                Err(e)
            }
        }
    }

    async fn load(view: &dyn FileSystemView, path: &str) -> Result<(String, Vec<FileEntry>)> {
        let resolved = view.canonicalize(path).await?;
        let entries = view.read_dir(&resolved).await?;
        Ok((resolved, entries))
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    pub fn connection_name(&self) -> &str {
        &self.connection_name
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn local_selection(&self) -> &[FileRef] {
        &self.local_selection
    }

    pub fn set_local_selection(&mut self, entries: Vec<FileRef>) {
        self.local_selection = entries;
    }

    /// Descend into a directory entry of the current listing.
    pub async fn enter(&mut self, name: &str) -> Result<()> {
        let target = self
            .entries
            .iter()
            .find(|e| e.name == name && e.kind.is_dir())
            .map(|e| e.path.clone())
            .ok_or_else(|| {
                AppError::ValidationError(format!("'{name}' is not a directory here"))
            })?;

        let (resolved, entries) = Self::load(&*self.view, &target).await?;
        self.history.push(std::mem::replace(&mut self.current_path, resolved));
        self.entries = entries;
        Ok(())
    }

    /// Move to the parent directory; no-op at the root.
    pub async fn ascend(&mut self) -> Result<()> {
        let Some(parent) = self.view.parent(&self.current_path) else {
            return Ok(());
        };
        let (resolved, entries) = Self::load(&*self.view, &parent).await?;
        self.history.push(std::mem::replace(&mut self.current_path, resolved));
        self.entries = entries;
        Ok(())
    }

    /// Return to the previously visited directory; no-op without history.
    pub async fn back(&mut self) -> Result<()> {
        let Some(previous) = self.history.pop() else {
            return Ok(());
        };
        match Self::load(&*self.view, &previous).await {
            Ok((resolved, entries)) => {
                self.current_path = resolved;
                self.entries = entries;
                Ok(())
            }
            Err(e) => {
                // The directory may have vanished; keep the popped entry out
                // of the history and stay where we are.
                Err(e)
            }
        }
    }

    /// Re-read the current directory.
    pub async fn refresh(&mut self) -> Result<()> {
        self.entries = self.view.read_dir(&self.current_path).await?;
        Ok(())
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            connection_id: self.connection_id.clone(),
            connection_name: self.connection_name.clone(),
            current_path: self.current_path.clone(),
            entries: self.entries.clone(),
            selection: self.local_selection.clone(),
        }
    }

    /// Release the underlying connection resource unconditionally.
    ///
    /// Close failures are logged, never propagated.
    pub async fn close(mut self) {
        debug!("Closing browsing context for '{}'", self.connection_name);
        if let Err(e) = self.view.close().await {
            warn!(
                "Failed to close view for '{}': {}",
                self.connection_name, e
            );
        }
    }
}
