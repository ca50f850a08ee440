//! Line-start table over a normalized code-unit buffer.
//!
//! Built once in a single forward pass. Line lookups are a binary search;
//! column lookups are O(1) unless the line holds a tab or a supplementary
//! character, in which case the line is walked from its start.

/// Sorted offsets of every line start, plus one flag per line that marks
/// lines needing an explicit column walk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
    /// `offsets[0] == 0` for non-empty input; `offsets[i]` is the offset just
    /// past the `i`-th `\n`. A trailing `\n` does not open a new entry.
    offsets: Vec<u32>,
    /// `walk[i]` is set when line `i` contains `\t` or a high surrogate.
    walk: Vec<bool>,
}

impl LineIndex {
    /// Scan `units` once, recording line starts and lines that need walking.
    ///
    /// Empty input produces an empty table.
    pub fn build(units: &[u16]) -> Self {
        let mut offsets = Vec::new();
        let mut walk = Vec::new();
        if units.is_empty() {
            return LineIndex { offsets, walk };
        }
        offsets.push(0);
        walk.push(false);
        let last = units.len() - 1;
        for (i, &unit) in units.iter().enumerate() {
            if unit == u16::from(b'\t') || is_high_surrogate(unit) {
                if let Some(flag) = walk.last_mut() {
                    *flag = true;
                }
            }
            if unit == u16::from(b'\n') && i != last {
                offsets.push(offset(i + 1));
                walk.push(false);
            }
        }
        LineIndex { offsets, walk }
    }

    /// Number of lines. Empty input has none.
    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }

    /// Offset at which the zero-based line `index` starts.
    pub fn line_start(&self, index: usize) -> Option<u32> {
        self.offsets.get(index).copied()
    }

    /// Half-open offset range covered by the zero-based line `index`,
    /// including its terminating `\n`.
    pub fn line_range(&self, index: usize, len: u32) -> Option<std::ops::Range<u32>> {
        let start = self.line_start(index)?;
        let end = self.line_start(index + 1).unwrap_or(len);
        Some(start..end)
    }

    /// Whether the zero-based line `index` needs an explicit column walk.
    pub fn needs_walk(&self, index: usize) -> bool {
        self.walk.get(index).copied().unwrap_or(false)
    }

    /// Zero-based line holding `pos`, for `pos` inside the buffer.
    fn index_of(&self, pos: u32) -> usize {
        match self.offsets.binary_search(&pos) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        }
    }

    /// Line number of `pos`, counted from `starting_line`.
    ///
    /// An offset at or past the end belongs to the last line, or to the
    /// line opened by a final `\n`.
    pub fn line_from_offset(&self, units: &[u16], pos: u32, starting_line: u32) -> u32 {
        let count = offset(self.offsets.len());
        if pos as usize >= units.len() {
            return match units.last() {
                None => starting_line,
                Some(&last) if last == u16::from(b'\n') => starting_line + count,
                Some(_) => starting_line + count - 1,
            };
        }
        (starting_line + offset(self.index_of(pos))).max(1)
    }

    /// One-based column of `pos`.
    ///
    /// The first line starts at `starting_column`, every other line at 1.
    /// Tabs advance to the next multiple of `tab_size`; a surrogate pair is
    /// one column, and an offset inside a pair reports the pair's column.
    pub fn column_from_offset(
        &self,
        units: &[u16],
        pos: u32,
        starting_column: u32,
        tab_size: u32,
    ) -> u32 {
        if pos as usize >= units.len() {
            return 1;
        }
        if pos == 0 {
            return starting_column;
        }
        let line = self.index_of(pos);
        let line_start = self.offsets[line];
        let adjustment = if line > 0 { 1 } else { starting_column };
        if !self.needs_walk(line) {
            return pos - line_start + adjustment;
        }
        let mut end = pos as usize;
        if is_low_surrogate(units[end]) {
            end -= 1;
        }
        let tab_size = tab_size.max(1);
        let mut column = adjustment;
        let mut i = line_start as usize;
        while i < end {
            let unit = units[i];
            if unit == u16::from(b'\t') {
                column += tab_size - column.saturating_sub(1) % tab_size;
            } else if is_high_surrogate(unit) {
                column += 1;
                i += 1;
            } else {
                column += 1;
            }
            i += 1;
        }
        column
    }
}

#[inline]
pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

#[inline]
pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Buffer lengths are checked against `u32::MAX` when the source is built.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn offset(i: usize) -> u32 {
    i as u32
}

#[cfg(test)]
mod tests;
