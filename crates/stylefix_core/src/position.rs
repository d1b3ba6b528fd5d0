//! Offset to line/column resolution.
//!
//! Rules see the line-break normalized text, while reported positions must
//! refer to the text the caller handed in. [`PositionIndex`] bridges the two:
//! it is built from the original text and resolves offsets into the
//! normalized text.

use stylefix_ast::Position;

/// Sorted, contiguous segments `[bounds[i], bounds[i + 1])`.
///
/// Segments may be empty; an offset always resolves to the last segment
/// starting at or before it, which skips empty ones.
#[derive(Debug, Clone)]
struct SegmentIndex {
    bounds: Vec<usize>,
}

impl SegmentIndex {
    fn new(bounds: Vec<usize>) -> Self {
        debug_assert!(bounds.len() >= 2);
        debug_assert!(bounds.windows(2).all(|w| w[0] <= w[1]));
        Self { bounds }
    }

    fn start(&self, segment: usize) -> usize {
        self.bounds[segment]
    }

    fn index_of(&self, offset: usize) -> Option<usize> {
        let idx = self.bounds.partition_point(|&bound| bound <= offset);
        if idx == 0 || idx == self.bounds.len() {
            return None;
        }
        Some(idx - 1)
    }
}

/// Resolves offsets in normalized text to positions in the original text.
///
/// Lines are separated by `\n` only; a lone `\r` in the original text does
/// not start a new line. Columns count characters, so a multi-byte
/// character advances the column by one.
#[derive(Debug, Clone)]
pub struct PositionIndex<'a> {
    source: &'a str,
    lines: SegmentIndex,
    crlf: Option<SegmentIndex>,
}

impl<'a> PositionIndex<'a> {
    /// Builds an index over the original, non-normalized text.
    pub fn new(source: &'a str) -> Self {
        let lines = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .chain(std::iter::once(source.len() + 1))
            .collect();

        // The k-th "\r\n" at original offset p lands at p - k once the
        // preceding k carriage returns are gone.
        let crlf_starts: Vec<usize> = source
            .match_indices("\r\n")
            .enumerate()
            .map(|(k, (p, _))| p - k)
            .collect();
        let crlf = (!crlf_starts.is_empty()).then(|| {
            let normalized_len = source.len() - crlf_starts.len();
            let bounds = std::iter::once(0)
                .chain(crlf_starts)
                .chain(std::iter::once(normalized_len + 1))
                .collect();
            SegmentIndex::new(bounds)
        });

        Self {
            source,
            lines: SegmentIndex::new(lines),
            crlf,
        }
    }

    /// Number of `\r\n` pairs that precede `offset` once mapped back to the
    /// original text.
    pub fn line_break_correction(&self, offset: usize) -> Option<usize> {
        match &self.crlf {
            None => Some(0),
            Some(segments) => segments.index_of(offset),
        }
    }

    /// Maps a normalized offset to the matching original offset.
    pub fn original_offset(&self, offset: usize) -> Option<usize> {
        self.line_break_correction(offset)
            .map(|correction| offset + correction)
    }

    /// Resolves a normalized offset to a 1-based position.
    ///
    /// The end-of-text offset resolves to the position just past the last
    /// character. Returns `None` for offsets beyond that.
    pub fn resolve(&self, offset: usize) -> Option<Position> {
        let original = self.original_offset(offset)?;
        let line = self.lines.index_of(original)?;
        let start = self.lines.start(line);
        let column = self
            .source
            .get(start..original)
            .map_or(original - start, |prefix| prefix.chars().count());
        Some(Position::new(line + 1, column + 1))
    }
}
