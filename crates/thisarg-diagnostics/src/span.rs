//! Byte-offset spans and resolved source locations.

use serde::{Deserialize, Serialize};

/// Identifies one compilation unit inside a [`SourceCache`](crate::SourceCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl FileId {
    /// Placeholder for synthesized nodes that have no source file.
    pub const DUMMY: FileId = FileId(u32::MAX);
}

/// A half-open `[start, end)` byte range in one file.
///
/// Spans order by file first and then by start offset, which is the order
/// diagnostics are reported in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Span {
    pub file_id: FileId,
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span used for nodes the lowering pass synthesizes.
    pub const DUMMY: Span = Span {
        file_id: FileId::DUMMY,
        start: 0,
        end: 0,
    };

    pub fn new(file_id: FileId, start: u32, end: u32) -> Self {
        Self { file_id, start, end }
    }

    pub fn is_dummy(&self) -> bool {
        self.file_id == FileId::DUMMY
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        debug_assert!(
            self.file_id == other.file_id || self.is_dummy() || other.is_dummy(),
            "cannot join spans from different files"
        );

        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return self;
        }

        Span {
            file_id: self.file_id,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Empty span at the start of `self`.
    pub fn shrink_to_lo(self) -> Span {
        Span {
            end: self.start,
            ..self
        }
    }

    /// True if `offset` lies inside the span.
    pub fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::DUMMY
    }
}

/// A span resolved to `file:line:column` (both 1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// An extra highlighted span attached to a diagnostic.
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub style: LabelStyle,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    Primary,
    Secondary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_ignores_dummy() {
        let a = Span::new(FileId(0), 4, 9);
        assert_eq!(a.to(Span::DUMMY), a);
        assert_eq!(Span::DUMMY.to(a), a);
        assert_eq!(a.to(Span::new(FileId(0), 1, 5)), Span::new(FileId(0), 1, 9));
    }

    #[test]
    fn test_spans_order_by_start() {
        let mut spans = vec![
            Span::new(FileId(0), 30, 31),
            Span::new(FileId(0), 2, 8),
            Span::new(FileId(0), 12, 13),
        ];
        spans.sort();
        let starts: Vec<u32> = spans.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![2, 12, 30]);
    }
}
