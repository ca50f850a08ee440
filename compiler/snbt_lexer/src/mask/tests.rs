#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use snbt_lexer_core::TokenKind;

fn images(lexer: &mut Lexer) -> Vec<String> {
    lexer
        .tokenize()
        .into_iter()
        .map(|t| lexer.image(t))
        .collect()
}

#[test]
fn unparsed_line_is_skipped() {
    let mut lexer = Lexer::new("{a:1}\n@@@\n[2]").unwrap();
    lexer.set_unparsed_lines([2]);
    assert_eq!(
        images(&mut lexer),
        vec!["{", "a", ":", "1", "}", "[", "2", "]", ""]
    );
}

#[test]
fn other_lines_lex_as_before() {
    let mut plain = Lexer::new("{a:1}\nx:2\n[3]").unwrap();
    let mut masked = Lexer::new("{a:1}\nx:2\n[3]").unwrap();
    masked.set_unparsed_lines([2]);

    let all = plain.tokenize();
    let expected: Vec<String> = all
        .into_iter()
        .filter(|&t| plain.begin_line(t) != 2)
        .map(|t| plain.image(t))
        .collect();
    assert_eq!(images(&mut masked), expected);
}

#[test]
fn parsed_lines_keep_only_listed_lines() {
    let mut unparsed = Lexer::new("a\nb\nc").unwrap();
    unparsed.set_unparsed_lines([2]);
    let mut parsed = Lexer::new("a\nb\nc").unwrap();
    parsed.set_parsed_lines([1, 3]);
    let kept = images(&mut parsed);
    assert_eq!(kept, images(&mut unparsed));
    assert_eq!(kept, vec!["a", "c", ""]);
}

#[test]
fn masking_drops_cached_tokens() {
    let mut lexer = Lexer::new("a\nb\nc").unwrap();
    let all = lexer.tokenize();
    lexer.set_unparsed_lines([2]);
    assert_eq!(
        lexer.following_tokens(all[0]).collect::<Vec<_>>(),
        vec![all[2], all[3]]
    );
}

#[test]
fn text_leaves_out_masked_lines() {
    let mut lexer = Lexer::new("{a:1}\n@@@\n[2]").unwrap();
    lexer.set_unparsed_lines([2]);
    assert_eq!(lexer.text(0, 13), "{a:1}\n[2]");
}

#[test]
fn masked_last_line_reaches_eof() {
    let mut lexer = Lexer::new("1\n@").unwrap();
    lexer.set_unparsed_lines([2]);
    let all = lexer.tokenize();
    assert_eq!(all.len(), 2);
    assert_eq!(lexer.kind(all[0]), TokenKind::Integer);
    assert_eq!(lexer.kind(all[1]), TokenKind::Eof);
}

#[test]
fn lines_past_the_end_are_ignored() {
    let mut lexer = Lexer::new("a").unwrap();
    lexer.set_unparsed_lines([7]);
    assert_eq!(images(&mut lexer), vec!["a", ""]);
}
