//! Local filesystem endpoint.

use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use tracing::debug;

use super::{EntryKind, FileEntry, FileSystemStore, FileSystemView, sort_entries};
use crate::error::{AppError, Result};

/// The local machine as a browsable endpoint. Always usable.
pub struct LocalStore {
    id: String,
    name: String,
}

impl LocalStore {
    pub fn new() -> Self {
        Self {
            id: "local".to_string(),
            name: "Local".to_string(),
        }
    }

    /// Starting directory for local browsing.
    ///
    /// Use current directory as it's more reliable than HOME which might be
    /// on a slow network mount.
    pub fn start_dir() -> String {
        std::env::current_dir()
            .map(|p| p.to_string_lossy().to_string())
            .ok()
            .or_else(|| dirs::home_dir().map(|p| p.to_string_lossy().to_string()))
            .unwrap_or_else(|| "/tmp".to_string())
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemStore for LocalStore {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn is_usable(&self) -> bool {
        true
    }

    fn open(&self) -> BoxFuture<'_, Result<Box<dyn FileSystemView>>> {
        Box::pin(async move { Ok(Box::new(LocalView) as Box<dyn FileSystemView>) })
    }
}

/// File-system view over the local disk.
pub struct LocalView;

impl FileSystemView for LocalView {
    fn read_dir<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<FileEntry>>> {
        Box::pin(async move {
            debug!("local read_dir: {}", path);
            let mut entries = Vec::new();

            let mut read_dir = tokio::fs::read_dir(path).await?;
            while let Some(entry) = read_dir.next_entry().await? {
                let filename = entry.file_name().to_string_lossy().to_string();
                let is_hidden = filename.starts_with('.');
                let full_path = entry.path();
                let file_type = entry.file_type().await?;

                // For symlinks, follow the link to decide whether the target
                // is a directory; a broken link counts as a file.
                let is_dir = if file_type.is_symlink() {
                    match tokio::fs::metadata(&full_path).await {
                        Ok(target) => target.is_dir(),
                        Err(_) => false,
                    }
                } else {
                    file_type.is_dir()
                };

                let metadata = entry.metadata().await.ok();
                let size = if is_dir {
                    None
                } else {
                    metadata.as_ref().map(|m| m.len())
                };
                let modified = metadata.and_then(|m| m.modified().ok());

                entries.push(FileEntry {
                    name: if is_dir {
                        format!("{filename}/")
                    } else {
                        filename
                    },
                    path: full_path.to_string_lossy().to_string(),
                    kind: if is_dir {
                        EntryKind::Directory
                    } else {
                        EntryKind::File
                    },
                    is_hidden,
                    size,
                    modified,
                });
            }

            sort_entries(&mut entries);
            Ok(entries)
        })
    }

    fn canonicalize<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let resolved = tokio::fs::canonicalize(path).await.map_err(|e| {
                AppError::ValidationError(format!("Failed to resolve path '{path}': {e}"))
            })?;
            Ok(resolved.to_string_lossy().to_string())
        })
    }

    fn parent(&self, path: &str) -> Option<String> {
        Path::new(path)
            .parent()
            .map(|p| {
                if p.as_os_str().is_empty() {
                    PathBuf::from("/")
                } else {
                    p.to_path_buf()
                }
            })
            .map(|p| p.to_string_lossy().to_string())
    }

    fn close<'a>(&'a mut self) -> BoxFuture<'a, Result<()>> {
        // Nothing to release for the local disk.
        Box::pin(async move { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_dir_lists_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.txt"), b"hello").unwrap();
        std::fs::write(dir.path().join(".hidden"), b"").unwrap();

        let view = LocalView;
        let entries = view
            .read_dir(dir.path().to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "sub/");
        assert!(entries[0].kind.is_dir());
        let hidden = entries.iter().find(|e| e.name == ".hidden").unwrap();
        assert!(hidden.is_hidden);
        let file = entries.iter().find(|e| e.name == "b.txt").unwrap();
        assert_eq!(file.size, Some(5));
    }

    #[tokio::test]
    async fn test_canonicalize_missing_path_fails() {
        let view = LocalView;
        assert!(view.canonicalize("/definitely/not/a/path").await.is_err());
    }

    #[test]
    fn test_parent_of_root() {
        let view = LocalView;
        assert_eq!(view.parent("/"), None);
        assert_eq!(view.parent("/etc"), Some("/".to_string()));
    }
}
