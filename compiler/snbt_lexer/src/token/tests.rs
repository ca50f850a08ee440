#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::config::LexerConfig;
use snbt_lexer_core::TokenClasses;
use pretty_assertions::assert_eq;

fn lex_all(text: &str) -> (Lexer, Vec<NodeId>) {
    let mut lexer = Lexer::new(text).unwrap();
    let all = lexer.tokenize();
    (lexer, all)
}

fn images(lexer: &Lexer, ids: impl IntoIterator<Item = NodeId>) -> Vec<String> {
    ids.into_iter().map(|t| lexer.image(t)).collect()
}

// === Navigation ===

#[test]
fn cached_neighbours() {
    let (lexer, all) = lex_all("[1, 2]");
    assert_eq!(lexer.next_cached_token(all[0]), Some(all[1]));
    assert_eq!(lexer.previous_cached_token(all[1]), Some(all[0]));
    assert_eq!(lexer.previous_cached_token(all[0]), None);
    assert_eq!(lexer.next_cached_token(all[5]), None);
}

#[test]
fn following_and_preceding_tokens() {
    let (lexer, all) = lex_all("{a:1}");
    assert_eq!(
        lexer.following_tokens(all[1]).collect::<Vec<_>>(),
        all[2..].to_vec()
    );
    assert_eq!(
        lexer.preceding_tokens(all[3]).collect::<Vec<_>>(),
        vec![all[2], all[1], all[0]]
    );
}

#[test]
fn parsed_navigation_skips_unparsed_tokens() {
    let mut lexer = Lexer::with_config("a  b", LexerConfig::retaining_whitespace()).unwrap();
    let all = lexer.tokenize();
    assert_eq!(all.len(), 4);
    assert!(lexer.arena().is_unparsed(all[1]));

    let (a, ws, b) = (all[0], all[1], all[2]);
    assert_eq!(lexer.next_cached_token(a), Some(ws));
    assert_eq!(lexer.next_parsed_token(a), Some(b));
    assert_eq!(lexer.previous_parsed_token(b), Some(a));
    assert_eq!(lexer.preceding_unparsed_tokens(b), vec![ws]);
    assert_eq!(lexer.preceding_unparsed_tokens(a), Vec::<NodeId>::new());
}

#[test]
fn preceding_unparsed_tokens_are_in_input_order() {
    let mut classes = TokenClasses::retaining_whitespace();
    classes.unparsed.insert(TokenKind::Comma);
    let mut lexer = Lexer::with_config("a ,b", LexerConfig::with_classes(classes)).unwrap();
    let all = lexer.tokenize();
    let b = all[3];
    assert_eq!(lexer.preceding_unparsed_tokens(b), vec![all[1], all[2]]);
    assert_eq!(lexer.next_parsed_token(all[0]), Some(b));
}

// === Synthetic Tokens ===

#[test]
fn new_token_has_explicit_image() {
    let mut lexer = Lexer::new("").unwrap();
    let id = lexer.new_token(TokenKind::Comma, ",");
    assert!(lexer.token(id).is_scanned());
    assert!(!lexer.token(id).is_inserted());
    assert_eq!(lexer.image(id), ",");
    assert_eq!(lexer.normalized_text(id), ",");
}

#[test]
fn pre_insert_splices_before_token() {
    let (mut lexer, all) = lex_all("a,b");
    let (a, comma, b, eof) = (all[0], all[1], all[2], all[3]);
    let inserted = lexer.new_token(TokenKind::Comma, ",");
    lexer.pre_insert(b, inserted);

    let token = lexer.token(inserted);
    assert!(token.is_inserted());
    assert_eq!((token.begin(), token.end()), (2, 2));
    assert_eq!(token.prepended(), Some(comma));
    assert_eq!(token.appended(), Some(b));

    assert_eq!(
        lexer.following_tokens(a).collect::<Vec<_>>(),
        vec![comma, inserted, b, eof]
    );
    assert_eq!(
        lexer.preceding_tokens(b).collect::<Vec<_>>(),
        vec![inserted, comma, a]
    );
    assert_eq!(
        images(&lexer, lexer.following_tokens(a)),
        vec![",", ",", "b", ""]
    );
}

#[test]
fn pre_insert_twice_is_a_no_op() {
    let (mut lexer, all) = lex_all("a b");
    let inserted = lexer.new_token(TokenKind::Colon, ":");
    lexer.pre_insert(all[1], inserted);
    lexer.pre_insert(all[1], inserted);
    assert_eq!(
        lexer.following_tokens(all[0]).collect::<Vec<_>>(),
        vec![inserted, all[1], all[2]]
    );
}

#[test]
fn pre_insert_before_first_token() {
    let (mut lexer, all) = lex_all("a");
    let inserted = lexer.new_token(TokenKind::OpenBrace, "{");
    lexer.pre_insert(all[0], inserted);
    assert_eq!(lexer.token(inserted).prepended(), None);
    assert_eq!(lexer.previous_cached_token(all[0]), Some(inserted));
    assert_eq!(lexer.previous_cached_token(inserted), None);
}

#[test]
fn unscanned_token_borrows_chain_source() {
    let (mut lexer, all) = lex_all("a b");
    let unscanned = lexer.arena_mut().new_token(TokenKind::Comma, ",");
    assert_eq!(lexer.arena().token_source(unscanned), None);
    assert_eq!(lexer.next_cached_token(unscanned), None);

    lexer.pre_insert(all[1], unscanned);
    assert_eq!(lexer.arena().token_source(unscanned), Some(all[0]));
    assert_eq!(lexer.next_cached_token(unscanned), Some(all[1]));
    assert_eq!(lexer.image(unscanned), ",");
}

// === Kind Replacement ===

#[test]
fn replace_type_takes_over_cache_slot() {
    let (mut lexer, all) = lex_all("{a:1}");
    let replaced = lexer.replace_type(all[3], TokenKind::Long);
    assert_ne!(replaced, all[3]);
    assert_eq!(lexer.kind(replaced), TokenKind::Long);
    assert_eq!(lexer.image(replaced), "1");
    assert_eq!(lexer.next_cached_token(all[2]), Some(replaced));
    assert_eq!(lexer.next_cached_token(replaced), Some(all[4]));
}

#[test]
fn replace_type_relinks_spliced_neighbours() {
    let (mut lexer, all) = lex_all("a,b");
    let inserted = lexer.new_token(TokenKind::Comma, ",");
    lexer.pre_insert(all[2], inserted);
    let replaced = lexer.replace_type(all[2], TokenKind::Integer);
    assert_eq!(lexer.token(inserted).appended(), Some(replaced));
    assert_eq!(
        lexer.following_tokens(all[0]).collect::<Vec<_>>(),
        vec![all[1], inserted, replaced, all[3]]
    );
}

#[test]
fn replace_type_of_inserted_token_stays_out_of_cache() {
    let (mut lexer, all) = lex_all("a b");
    let inserted = lexer.new_token(TokenKind::Comma, ",");
    lexer.pre_insert(all[1], inserted);
    let replaced = lexer.replace_type(inserted, TokenKind::Colon);
    assert!(lexer.token(replaced).is_inserted());
    assert_eq!(lexer.image(replaced), ",");
    assert_eq!(lexer.next_cached_token(all[0]), Some(replaced));
    assert_eq!(lexer.previous_cached_token(all[1]), Some(replaced));
}

#[test]
fn replace_type_takes_unparsed_from_class() {
    let mut lexer = Lexer::with_config("a b", LexerConfig::retaining_whitespace()).unwrap();
    let all = lexer.tokenize();
    let replaced = lexer.replace_type(all[0], TokenKind::Whitespace);
    assert!(lexer.arena().is_unparsed(replaced));
    let back = lexer.replace_type(all[1], TokenKind::Comma);
    assert!(!lexer.arena().is_unparsed(back));
}
