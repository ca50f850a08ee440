#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn units(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

// === Construction ===

#[test]
fn empty_input_has_no_lines() {
    let index = LineIndex::build(&[]);
    assert_eq!(index.line_count(), 0);
    assert_eq!(index.line_from_offset(&[], 0, 1), 1);
}

#[test]
fn trailing_newline_opens_no_entry() {
    let src = units("ab\ncd\n");
    let index = LineIndex::build(&src);
    assert_eq!(index.line_count(), 2);
    assert_eq!(index.line_start(0), Some(0));
    assert_eq!(index.line_start(1), Some(3));
    assert_eq!(index.line_start(2), None);
}

#[test]
fn line_ranges_cover_newlines() {
    let src = units("ab\ncd");
    let index = LineIndex::build(&src);
    assert_eq!(index.line_range(0, 5), Some(0..3));
    assert_eq!(index.line_range(1, 5), Some(3..5));
    assert_eq!(index.line_range(2, 5), None);
}

#[test]
fn walk_flags_follow_tabs_and_surrogates() {
    let src = units("a\n\tb\nc\u{1F600}\nd");
    let index = LineIndex::build(&src);
    assert!(!index.needs_walk(0));
    assert!(index.needs_walk(1));
    assert!(index.needs_walk(2));
    assert!(!index.needs_walk(3));
}

// === Lines ===

#[test]
fn lines_from_offsets() {
    let src = units("ab\ncd\n");
    let index = LineIndex::build(&src);
    assert_eq!(index.line_from_offset(&src, 0, 1), 1);
    assert_eq!(index.line_from_offset(&src, 2, 1), 1);
    assert_eq!(index.line_from_offset(&src, 3, 1), 2);
    assert_eq!(index.line_from_offset(&src, 5, 1), 2);
}

#[test]
fn end_offset_after_final_newline_is_next_line() {
    let src = units("ab\ncd\n");
    let index = LineIndex::build(&src);
    assert_eq!(index.line_from_offset(&src, 6, 1), 3);
}

#[test]
fn end_offset_without_final_newline_is_last_line() {
    let src = units("ab\ncd");
    let index = LineIndex::build(&src);
    assert_eq!(index.line_from_offset(&src, 5, 1), 2);
    assert_eq!(index.line_from_offset(&src, 99, 1), 2);
}

#[test]
fn starting_line_shifts_numbers() {
    let src = units("a\nb");
    let index = LineIndex::build(&src);
    assert_eq!(index.line_from_offset(&src, 2, 10), 11);
}

// === Columns ===

#[test]
fn plain_columns() {
    let src = units("ab\ncd");
    let index = LineIndex::build(&src);
    assert_eq!(index.column_from_offset(&src, 0, 1, 1), 1);
    assert_eq!(index.column_from_offset(&src, 1, 1, 1), 2);
    assert_eq!(index.column_from_offset(&src, 3, 1, 1), 1);
    assert_eq!(index.column_from_offset(&src, 4, 1, 1), 2);
}

#[test]
fn column_past_end_is_one() {
    let src = units("abc");
    let index = LineIndex::build(&src);
    assert_eq!(index.column_from_offset(&src, 3, 7, 1), 1);
}

#[test]
fn starting_column_applies_to_first_line_only() {
    let src = units("ab\ncd");
    let index = LineIndex::build(&src);
    assert_eq!(index.column_from_offset(&src, 0, 5, 1), 5);
    assert_eq!(index.column_from_offset(&src, 1, 5, 1), 6);
    assert_eq!(index.column_from_offset(&src, 4, 5, 1), 2);
}

#[test]
fn tab_advances_to_next_stop() {
    let src = units("\tx\na\tx");
    let index = LineIndex::build(&src);
    assert_eq!(index.column_from_offset(&src, 1, 1, 4), 5);
    assert_eq!(index.column_from_offset(&src, 5, 1, 4), 5);
}

#[test]
fn default_tab_width_counts_one_column() {
    let src = units("\tx");
    let index = LineIndex::build(&src);
    assert_eq!(index.column_from_offset(&src, 1, 1, 1), 2);
}

#[test]
fn surrogate_pair_is_one_column() {
    let src = units("\u{1F600}x");
    let index = LineIndex::build(&src);
    // Offset 1 is the low half of the pair.
    assert_eq!(index.column_from_offset(&src, 1, 1, 1), 1);
    assert_eq!(index.column_from_offset(&src, 2, 1, 1), 2);
}

// === Properties ===

proptest! {
    #[test]
    fn lines_never_decrease(text in "[a-c\\n\\t]{0,40}") {
        let src = units(&text);
        let index = LineIndex::build(&src);
        let mut last = 0;
        for pos in 0..=src.len() as u32 {
            let line = index.line_from_offset(&src, pos, 1);
            prop_assert!(line >= last);
            last = line;
        }
    }

    #[test]
    fn columns_reset_at_line_starts(text in "[a-c\\n\\t\u{1F600}]{1,40}") {
        let src = units(&text);
        let index = LineIndex::build(&src);
        for line in 1..index.line_count() {
            let start = index.line_start(line).unwrap();
            if (start as usize) < src.len() {
                prop_assert_eq!(index.column_from_offset(&src, start, 3, 4), 1);
            }
        }
    }
}
