//! Storage endpoints and the file-system views they produce.

mod local;
mod sftp;

pub use local::LocalStore;
pub use sftp::SshStore;

use std::time::SystemTime;

use futures::future::BoxFuture;

use crate::error::Result;

/// Kind of a directory entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

/// A single entry of a directory listing.
#[derive(Clone, Debug)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub is_hidden: bool,
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
}

/// A live, navigable representation of an endpoint's directory tree.
///
/// Produced by [`FileSystemStore::open`]; owned by at most one browsing
/// context at a time. `close` must release the underlying connection
/// resource; callers treat close failures as log-only.
pub trait FileSystemView: Send + Sync {
    fn read_dir<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<FileEntry>>>;

    fn canonicalize<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<String>>;

    /// Parent of `path`, or `None` at the root. Pure path math, no IO.
    fn parent(&self, path: &str) -> Option<String>;

    fn close<'a>(&'a mut self) -> BoxFuture<'a, Result<()>>;
}

/// An endpoint capable of producing a file-system view.
///
/// This is the capability seam: anything a chooser session can browse
/// implements it, whether the bytes live on this machine or behind an SSH
/// handshake. `open` may block on network or process IO for an unbounded
/// time, so sessions always drive it from a background task.
pub trait FileSystemStore: Send + Sync {
    /// Stable identity, used for open de-duplication and selection entries.
    fn id(&self) -> &str;

    fn display_name(&self) -> &str;

    /// Whether the endpoint is currently considered usable by its registry.
    fn is_usable(&self) -> bool;

    fn open(&self) -> BoxFuture<'_, Result<Box<dyn FileSystemView>>>;
}

/// Sort a listing in place: directories first, then alphabetically.
pub(crate) fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| match (a.kind.is_dir(), b.kind.is_dir()) {
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });
}

/// Parent of a slash-separated remote path, or `None` at the root.
pub(crate) fn slash_parent(path: &str) -> Option<String> {
    if path == "/" {
        return None;
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "/" {
        return None;
    }

    trimmed.rsplit_once('/').map(|(parent, _)| {
        if parent.is_empty() {
            "/".to_string()
        } else {
            parent.to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: EntryKind) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: format!("/{name}"),
            kind,
            is_hidden: false,
            size: None,
            modified: None,
        }
    }

    #[test]
    fn test_sort_directories_first() {
        let mut entries = vec![
            entry("zeta", EntryKind::File),
            entry("alpha", EntryKind::File),
            entry("home/", EntryKind::Directory),
            entry("bin/", EntryKind::Directory),
        ];
        sort_entries(&mut entries);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["bin/", "home/", "alpha", "zeta"]);
    }

    #[test]
    fn test_slash_parent() {
        assert_eq!(slash_parent("/"), None);
        assert_eq!(slash_parent(""), None);
        assert_eq!(slash_parent("/etc"), Some("/".to_string()));
        assert_eq!(slash_parent("/etc/"), Some("/".to_string()));
        assert_eq!(slash_parent("/home/user/src"), Some("/home/user".to_string()));
    }
}
