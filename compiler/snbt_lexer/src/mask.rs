//! Line masking for preprocessor-style inclusion and exclusion.
//!
//! Masked lines are marked ignored offset by offset. Line numbers here are
//! one-based positions in the buffer and do not follow the configured
//! starting line.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::lexer::Lexer;

impl Lexer {
    /// Ignore every line that is not in `lines`.
    pub fn set_parsed_lines(&mut self, lines: impl IntoIterator<Item = u32>) {
        let lines: FxHashSet<u32> = lines.into_iter().collect();
        self.mask_lines(&lines, false);
    }

    /// Ignore every line in `lines`.
    pub fn set_unparsed_lines(&mut self, lines: impl IntoIterator<Item = u32>) {
        let lines: FxHashSet<u32> = lines.into_iter().collect();
        self.mask_lines(&lines, true);
    }

    fn mask_lines(&mut self, lines: &FxHashSet<u32>, listed_are_masked: bool) {
        let len = self.source().len();
        let ranges: Vec<_> = (0..self.source().lines().line_count())
            .filter(|&index| {
                let line = u32::try_from(index + 1).unwrap_or(u32::MAX);
                lines.contains(&line) == listed_are_masked
            })
            .filter_map(|index| self.source().lines().line_range(index, len))
            .collect();
        debug!(masked = ranges.len(), "masking lines");
        for range in ranges {
            for offset in range {
                self.table_mut().mark_ignored(offset);
            }
        }
    }
}

#[cfg(test)]
mod tests;
