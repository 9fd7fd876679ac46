//! Selection policy and the accumulator it feeds.

use crate::store::EntryKind;

/// Policy controlling how many and what kind of entries a chooser session's
/// final result may contain. Fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    SingleFile,
    MultipleFiles,
    Directory,
    Any,
    All,
}

impl SelectionMode {
    /// Apply the mode's entry filter to a freshly recorded set.
    ///
    /// Directory mode drops non-directories silently; SingleFile keeps the
    /// first entry only. Other modes accept the set unchanged.
    pub fn accept(&self, entries: Vec<FileRef>) -> Vec<FileRef> {
        match self {
            SelectionMode::Directory => entries
                .into_iter()
                .filter(|e| e.kind.is_dir())
                .collect(),
            SelectionMode::SingleFile => entries.into_iter().take(1).collect(),
            _ => entries,
        }
    }
}

/// A selected entry, resolvable after the context that produced it is gone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRef {
    pub connection_id: String,
    pub path: String,
    pub kind: EntryKind,
}

impl FileRef {
    pub fn new(connection_id: impl Into<String>, path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            connection_id: connection_id.into(),
            path: path.into(),
            kind,
        }
    }
}

/// Ordered, de-duplicated record of everything selected during a session.
///
/// Entries keep insertion order; duplicates on `(connection_id, path)` are
/// suppressed. Each context's contribution can be replaced wholesale while
/// entries recorded under other (possibly closed) contexts survive.
#[derive(Debug, Default)]
pub struct SelectionAccumulator {
    entries: Vec<FileRef>,
}

impl SelectionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[FileRef] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace `context_id`'s contribution with `entries`.
    ///
    /// An empty set clears the context's contribution. Entries already
    /// present keep their position; new ones append in the given order.
    pub fn record(&mut self, mode: SelectionMode, context_id: &str, entries: Vec<FileRef>) {
        match mode {
            SelectionMode::SingleFile => {
                if let Some(first) = entries.into_iter().next() {
                    // The accumulator holds at most one entry in this mode.
                    self.entries.clear();
                    self.entries.push(first);
                } else {
                    self.entries.retain(|e| e.connection_id != context_id);
                }
            }
            _ => {
                self.entries.retain(|e| {
                    e.connection_id != context_id || entries.iter().any(|n| n == e)
                });
                for entry in entries {
                    if !self.contains(&entry) {
                        self.entries.push(entry);
                    }
                }
            }
        }
    }

    fn contains(&self, entry: &FileRef) -> bool {
        self.entries
            .iter()
            .any(|e| e.connection_id == entry.connection_id && e.path == entry.path)
    }

    /// Resolve the final result list for `mode`.
    pub fn resolve(&self, mode: SelectionMode) -> Vec<FileRef> {
        match mode {
            SelectionMode::SingleFile => self.entries.iter().take(1).cloned().collect(),
            SelectionMode::Directory => self
                .entries
                .iter()
                .filter(|e| e.kind.is_dir())
                .cloned()
                .collect(),
            _ => self.entries.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(conn: &str, path: &str) -> FileRef {
        FileRef::new(conn, path, EntryKind::File)
    }

    fn dir(conn: &str, path: &str) -> FileRef {
        FileRef::new(conn, path, EntryKind::Directory)
    }

    #[test]
    fn test_single_file_replaces() {
        let mut acc = SelectionAccumulator::new();
        acc.record(SelectionMode::SingleFile, "a", vec![file("a", "/one")]);
        acc.record(SelectionMode::SingleFile, "a", vec![file("a", "/two")]);
        assert_eq!(acc.entries(), &[file("a", "/two")]);
    }

    #[test]
    fn test_multiple_appends_and_dedups() {
        let mut acc = SelectionAccumulator::new();
        acc.record(
            SelectionMode::MultipleFiles,
            "a",
            vec![file("a", "/one"), file("a", "/two")],
        );
        acc.record(
            SelectionMode::MultipleFiles,
            "a",
            vec![file("a", "/one"), file("a", "/two"), file("a", "/three")],
        );
        let paths: Vec<_> = acc.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/one", "/two", "/three"]);
    }

    #[test]
    fn test_empty_record_clears_only_that_context() {
        let mut acc = SelectionAccumulator::new();
        acc.record(SelectionMode::MultipleFiles, "a", vec![file("a", "/one")]);
        acc.record(SelectionMode::MultipleFiles, "b", vec![file("b", "/two")]);
        acc.record(SelectionMode::MultipleFiles, "b", vec![]);
        assert_eq!(acc.entries(), &[file("a", "/one")]);
    }

    #[test]
    fn test_directory_mode_accept_rejects_files() {
        let accepted = SelectionMode::Directory.accept(vec![
            dir("a", "/etc"),
            file("a", "/etc/hosts"),
        ]);
        assert_eq!(accepted, vec![dir("a", "/etc")]);
    }

    #[test]
    fn test_resolve_single_file_takes_first() {
        let mut acc = SelectionAccumulator::new();
        acc.record(
            SelectionMode::MultipleFiles,
            "a",
            vec![file("a", "/one"), file("a", "/two")],
        );
        assert_eq!(
            acc.resolve(SelectionMode::SingleFile),
            vec![file("a", "/one")]
        );
        assert_eq!(
            acc.resolve(SelectionMode::MultipleFiles),
            vec![file("a", "/one"), file("a", "/two")]
        );
    }

    #[test]
    fn test_resolve_directory_filters_kind() {
        let mut acc = SelectionAccumulator::new();
        acc.record(
            SelectionMode::Any,
            "a",
            vec![dir("a", "/etc"), file("a", "/etc/hosts")],
        );
        assert_eq!(acc.resolve(SelectionMode::Directory), vec![dir("a", "/etc")]);
    }

    #[test]
    fn test_selection_survives_other_context_replacement() {
        let mut acc = SelectionAccumulator::new();
        acc.record(SelectionMode::Any, "a", vec![file("a", "/from-a")]);
        acc.record(SelectionMode::Any, "b", vec![file("b", "/from-b")]);
        // Re-recording context b must not disturb a's entry or the order.
        acc.record(
            SelectionMode::Any,
            "b",
            vec![file("b", "/from-b"), file("b", "/more-b")],
        );
        let paths: Vec<_> = acc.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/from-a", "/from-b", "/more-b"]);
    }
}
