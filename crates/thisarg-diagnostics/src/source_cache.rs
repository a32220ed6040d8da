//! Source text storage used to resolve spans for rendering.

use crate::span::{FileId, Location, Span};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One compilation unit's text plus its line table.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: FileId,
    pub path: PathBuf,
    pub source: String,
    /// Byte offset of the first character of every line
    line_starts: Vec<u32>,
}

impl SourceFile {
    fn new(id: FileId, path: PathBuf, source: String) -> Self {
        let line_starts = compute_line_starts(&source);
        Self {
            id,
            path,
            source,
            line_starts,
        }
    }

    /// 1-based line and column of a byte offset. Columns count characters,
    /// not bytes, so non-ASCII identifiers underline correctly.
    pub fn line_column(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.source.len() as u32);

        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };

        let line_start = self.line_starts[line_idx] as usize;
        let prefix = self
            .source
            .get(line_start..offset as usize)
            .unwrap_or_default();
        let column = prefix.chars().count() as u32 + 1;

        ((line_idx + 1) as u32, column)
    }

    /// Text of a 1-based line without its terminator.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        if line == 0 {
            return None;
        }

        let idx = (line - 1) as usize;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&e| e as usize)
            .unwrap_or(self.source.len());

        Some(
            self.source[start..end]
                .trim_end_matches('\n')
                .trim_end_matches('\r'),
        )
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn slice(&self, start: u32, end: u32) -> Option<&str> {
        let end = (end as usize).min(self.source.len());
        self.source.get(start as usize..end)
    }
}

fn compute_line_starts(source: &str) -> Vec<u32> {
    std::iter::once(0)
        .chain(
            source
                .match_indices('\n')
                .map(|(i, _)| (i + 1) as u32),
        )
        .collect()
}

/// All compilation units seen by one run, keyed by [`FileId`].
#[derive(Debug, Default)]
pub struct SourceCache {
    files: HashMap<FileId, SourceFile>,
    path_to_id: HashMap<PathBuf, FileId>,
    next_id: u32,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit. Adding the same path twice returns the first id and
    /// keeps the original text.
    pub fn add_file(&mut self, path: impl AsRef<Path>, source: String) -> FileId {
        let path = path.as_ref().to_path_buf();

        if let Some(&id) = self.path_to_id.get(&path) {
            return id;
        }

        let id = FileId(self.next_id);
        self.next_id += 1;

        self.files
            .insert(id, SourceFile::new(id, path.clone(), source));
        self.path_to_id.insert(path, id);

        id
    }

    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(&id)
    }

    pub fn get_id(&self, path: impl AsRef<Path>) -> Option<FileId> {
        self.path_to_id.get(path.as_ref()).copied()
    }

    pub fn location(&self, span: Span) -> Option<Location> {
        if span.is_dummy() {
            return None;
        }

        let file = self.files.get(&span.file_id)?;
        let (line, column) = file.line_column(span.start);

        Some(Location {
            file: file.path.to_string_lossy().into_owned(),
            line,
            column,
        })
    }

    pub fn source_text(&self, span: Span) -> Option<&str> {
        if span.is_dummy() {
            return None;
        }

        self.files.get(&span.file_id)?.slice(span.start, span.end)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_starts() {
        assert_eq!(compute_line_starts("a\nbc\n\nd"), vec![0, 2, 5, 6]);
    }

    #[test]
    fn test_line_column_counts_characters() {
        let mut cache = SourceCache::new();
        let id = cache.add_file("u.js", "let é = 1;\nthis.x".to_string());
        let file = cache.get_file(id).unwrap();

        assert_eq!(file.line_column(0), (1, 1));
        // `=` sits after a two-byte character
        assert_eq!(file.line_column(7), (1, 7));
        assert_eq!(file.line_column(12), (2, 1));
    }

    #[test]
    fn test_line_text() {
        let mut cache = SourceCache::new();
        let id = cache.add_file("u.js", "one\r\ntwo\nthree".to_string());
        let file = cache.get_file(id).unwrap();

        assert_eq!(file.line_text(1), Some("one"));
        assert_eq!(file.line_text(3), Some("three"));
        assert_eq!(file.line_text(4), None);
        assert_eq!(file.line_text(0), None);
    }

    #[test]
    fn test_location_and_text() {
        let mut cache = SourceCache::new();
        let id = cache.add_file("a.js", "function f(this user) {}".to_string());
        let span = Span::new(id, 11, 15);

        let loc = cache.location(span).unwrap();
        assert_eq!(loc.to_string(), "a.js:1:12");
        assert_eq!(cache.source_text(span), Some("this"));
        assert_eq!(cache.location(Span::DUMMY), None);
    }

    #[test]
    fn test_same_path_keeps_first_id() {
        let mut cache = SourceCache::new();
        let a = cache.add_file("x.js", "1".to_string());
        let b = cache.add_file("x.js", "2".to_string());
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_id("x.js"), Some(a));
    }
}
