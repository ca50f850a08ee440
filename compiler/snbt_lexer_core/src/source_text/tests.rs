#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

fn units(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

fn norm(s: &str, flags: NormalizeFlags, tab_size: u32) -> String {
    String::from_utf16_lossy(&normalize(&units(s), flags, tab_size))
}

// === Line Endings ===

#[test]
fn default_folds_crlf_and_cr() {
    assert_eq!(norm("a\r\nb\rc\n", NormalizeFlags::default(), 1), "a\nb\nc\n");
}

#[test]
fn preserve_lines_keeps_cr() {
    let flags = NormalizeFlags::PRESERVE_TABS | NormalizeFlags::PRESERVE_LINES;
    assert_eq!(norm("a\r\nb", flags, 1), "a\r\nb");
}

// === Tabs ===

#[test]
fn default_keeps_tabs() {
    assert_eq!(norm("\ta", NormalizeFlags::default(), 4), "\ta");
}

#[test]
fn tabs_expand_to_next_stop() {
    assert_eq!(norm("\ta\n ab\tc", NormalizeFlags::empty(), 4), "    a\n ab c");
}

#[test]
fn surrogate_pair_counts_one_column_for_tab_stops() {
    assert_eq!(
        norm("\u{1F600}\tx", NormalizeFlags::empty(), 4),
        "\u{1F600}   x"
    );
}

// === Unicode Escapes ===

#[test]
fn unicode_escape_expands() {
    let flags = NormalizeFlags::default() | NormalizeFlags::UNICODE_ESCAPES;
    assert_eq!(norm("a\\u0041b", flags, 1), "aAb");
}

#[test]
fn repeated_u_is_accepted() {
    let flags = NormalizeFlags::default() | NormalizeFlags::UNICODE_ESCAPES;
    assert_eq!(norm("\\uuu0042", flags, 1), "B");
}

#[test]
fn escaped_backslash_is_not_an_escape() {
    let flags = NormalizeFlags::default() | NormalizeFlags::UNICODE_ESCAPES;
    assert_eq!(norm("\\\\u0041", flags, 1), "\\\\u0041");
}

#[test]
fn malformed_escape_stays_verbatim() {
    let flags = NormalizeFlags::default() | NormalizeFlags::UNICODE_ESCAPES;
    assert_eq!(norm("\\u00G1", flags, 1), "\\u00G1");
    assert_eq!(norm("x\\u12", flags, 1), "x\\u12");
}

#[test]
fn escapes_ignored_when_disabled() {
    assert_eq!(norm("\\u0041", NormalizeFlags::default(), 1), "\\u0041");
}

// === Final Newline ===

#[test]
fn final_newline_appended_once() {
    let flags = NormalizeFlags::default() | NormalizeFlags::FINAL_NEWLINE;
    assert_eq!(norm("a", flags, 1), "a\n");
    assert_eq!(norm("a\n", flags, 1), "a\n");
    assert_eq!(norm("", flags, 1), "\n");
}

#[test]
fn final_newline_on_fast_path() {
    let flags = NormalizeFlags::all() - NormalizeFlags::UNICODE_ESCAPES;
    assert_eq!(norm("a\r", flags, 1), "a\r");
    assert_eq!(norm("a", flags, 1), "a\n");
}

// === SourceText ===

#[test]
fn source_text_positions() {
    let text = SourceText::from_text("{a:1}\n[2]", &SourceOptions::default()).unwrap();
    assert_eq!(text.len(), 9);
    assert_eq!(text.line_from_offset(6), 2);
    assert_eq!(text.column_from_offset(7), 2);
    assert_eq!(text.slice(6, 9), "[2]");
}

#[test]
fn source_text_from_bytes_sniffs_bom() {
    let text =
        SourceText::from_bytes(&[0xFF, 0xFE, b'1', 0, b'b', 0], None, &SourceOptions::default())
            .unwrap();
    assert_eq!(text.units(), units("1b").as_slice());
}

#[test]
fn embedded_fragment_reports_outer_position() {
    let text = SourceText::from_text("ab\ncd", &SourceOptions::at(10, 5)).unwrap();
    assert_eq!(text.line_from_offset(0), 10);
    assert_eq!(text.column_from_offset(0), 5);
    assert_eq!(text.column_from_offset(1), 6);
    assert_eq!(text.line_from_offset(3), 11);
    assert_eq!(text.column_from_offset(3), 1);
}

#[test]
fn tab_size_can_change_after_construction() {
    let mut text = SourceText::from_text("\tx", &SourceOptions::default()).unwrap();
    assert_eq!(text.column_from_offset(1), 2);
    text.set_tab_size(8);
    assert_eq!(text.column_from_offset(1), 9);
}

#[test]
fn char_at_joins_surrogate_pairs() {
    let text = SourceText::from_text("\u{1F600}a", &SourceOptions::default()).unwrap();
    assert_eq!(text.char_at(0), Some(('\u{1F600}', 2)));
    assert_eq!(text.char_at(1), Some((char::REPLACEMENT_CHARACTER, 1)));
    assert_eq!(text.char_at(2), Some(('a', 1)));
    assert_eq!(text.char_at(3), None);
}

// === Display Helpers ===

#[test]
fn display_chars() {
    assert_eq!(display_char('a'), "'a'");
    assert_eq!(display_char('\n'), "'\\n'");
    assert_eq!(display_char(' '), "' '");
    assert_eq!(display_char('\u{1}'), "1");
    assert_eq!(display_char('\u{e9}'), "0xe9");
}

#[test]
fn escape_text_escapes_quotes_and_controls() {
    assert_eq!(escape_text("a\"b\n"), "a\\\"b\\n");
    assert_eq!(escape_text("\u{1}"), "\\u0001");
}
