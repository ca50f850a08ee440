#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

fn utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

// === BOM Sniffing ===

#[test]
fn no_bom_reads_utf8() {
    assert_eq!(decode(b"{a:1}", None), utf16("{a:1}"));
}

#[test]
fn utf8_bom_is_stripped() {
    assert_eq!(decode(&[0xEF, 0xBB, 0xBF, b'a'], None), utf16("a"));
}

#[test]
fn utf16be_bom() {
    assert_eq!(decode(&[0xFE, 0xFF, 0x00, b'{', 0x00, b'}'], None), utf16("{}"));
}

#[test]
fn utf16le_bom() {
    assert_eq!(decode(&[0xFF, 0xFE, b'{', 0x00, b'}', 0x00], None), utf16("{}"));
}

#[test]
fn utf32be_bom() {
    let bytes = [0x00, 0x00, 0xFE, 0xFF, 0x00, 0x00, 0x00, b'x'];
    assert_eq!(decode(&bytes, None), utf16("x"));
}

#[test]
fn utf32le_bom_wins_over_utf16le() {
    let bytes = [0xFF, 0xFE, 0x00, 0x00, b'x', 0x00, 0x00, 0x00];
    assert_eq!(Charset::sniff(&bytes), Some((Charset::Utf32Le, 4)));
    assert_eq!(decode(&bytes, None), utf16("x"));
}

#[test]
fn explicit_charset_keeps_bom_bytes() {
    // An explicit charset decodes the mark as U+FEFF instead of stripping it.
    let decoded = decode(&[0xEF, 0xBB, 0xBF, b'a'], Some(Charset::Utf8));
    assert_eq!(decoded, vec![0xFEFF, u16::from(b'a')]);
}

#[test]
fn empty_input() {
    assert!(decode(&[], None).is_empty());
}

// === Malformed Input ===

#[test]
fn one_replacement_per_malformed_utf8_byte() {
    let decoded = decode(&[b'a', 0xFF, 0xFE, b'b'], Some(Charset::Utf8));
    assert_eq!(decoded, vec![u16::from(b'a'), 0xFFFD, 0xFFFD, u16::from(b'b')]);
}

#[test]
fn truncated_utf8_sequence_is_replaced() {
    // 0xE2 0x82 starts a three-byte sequence that never finishes.
    let decoded = decode(&[b'x', 0xE2, 0x82], None);
    assert_eq!(decoded[0], u16::from(b'x'));
    assert!(decoded[1..].iter().all(|&u| u == 0xFFFD));
    assert!(!decoded[1..].is_empty());
}

#[test]
fn lone_utf16_surrogate_is_replaced() {
    let decoded = decode(&[0xD8, 0x00, 0x00, b'a'], Some(Charset::Utf16Be));
    assert_eq!(decoded, vec![0xFFFD, u16::from(b'a')]);
}

#[test]
fn odd_trailing_utf16_byte_is_replaced() {
    let decoded = decode(&[0x00, b'a', 0x00], Some(Charset::Utf16Be));
    assert_eq!(decoded, vec![u16::from(b'a'), 0xFFFD]);
}

#[test]
fn out_of_range_utf32_value_is_replaced() {
    let decoded = decode(&[0x00, 0x11, 0x00, 0x00], Some(Charset::Utf32Be));
    assert_eq!(decoded, vec![0xFFFD]);
}

#[test]
fn supplementary_utf32_becomes_surrogate_pair() {
    let decoded = decode(&[0x00, 0x01, 0xF6, 0x00], Some(Charset::Utf32Be));
    assert_eq!(decoded, utf16("\u{1F600}"));
}

// === Labels ===

#[test]
fn labels_resolve_case_insensitively() {
    assert_eq!(Charset::for_label("UTF-8").unwrap(), Charset::Utf8);
    assert_eq!(Charset::for_label("utf16le").unwrap(), Charset::Utf16Le);
    assert_eq!(Charset::for_label("UTF_32").unwrap(), Charset::Utf32Be);
}

#[test]
fn unknown_label_is_fatal() {
    let err = Charset::for_label("latin1").unwrap_err();
    assert_eq!(
        err,
        SourceError::UnsupportedCharset {
            label: "latin1".to_owned()
        }
    );
    assert_eq!(err.to_string(), "unsupported charset `latin1`");
}

#[test]
fn label_round_trips() {
    for cs in [
        Charset::Utf8,
        Charset::Utf16Be,
        Charset::Utf16Le,
        Charset::Utf32Be,
        Charset::Utf32Le,
    ] {
        assert_eq!(Charset::for_label(cs.label()).unwrap(), cs);
    }
}
