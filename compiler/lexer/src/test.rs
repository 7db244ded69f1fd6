use crate::{BareToken::*, Token};
use diagnostics::{
    error::{Health, Outcome},
    Reporter,
};
use span::{span, FileName, SourceMap, Spanned};

fn lex(source: &str) -> Outcome<Vec<Token>> {
    let mut map = SourceMap::default();
    let file = map.add_str(FileName::Anonymous, source);
    super::lex(&map[file], &Reporter::silent())
}

#[track_caller]
fn assert_lex_eq(source: &str, expected: Vec<Token>) {
    let actual = lex(source);
    assert_eq!(actual.health, Health::Untainted);
    assert_eq!(actual.bare, expected);
}

#[test]
fn keywords_and_words() {
    assert_lex_eq(
        "class Foo",
        vec![
            Spanned::new(span(1, 6), Class),
            Spanned::new(span(7, 10), Word("Foo".into())),
            Spanned::new(span(10, 10), EndOfInput),
        ],
    );
}

#[test]
fn function_declaration() {
    assert_lex_eq(
        "fun foo() = 0",
        vec![
            Spanned::new(span(1, 4), Fun),
            Spanned::new(span(5, 8), Word("foo".into())),
            Spanned::new(span(8, 9), OpeningRoundBracket),
            Spanned::new(span(9, 10), ClosingRoundBracket),
            Spanned::new(span(11, 12), Equals),
            Spanned::new(span(13, 14), NumberLiteral("0".into())),
            Spanned::new(span(14, 14), EndOfInput),
        ],
    );
}

#[test]
fn line_comments_are_skipped() {
    assert_lex_eq(
        "// hello\nval x",
        vec![
            Spanned::new(span(10, 13), Val),
            Spanned::new(span(14, 15), Word("x".into())),
            Spanned::new(span(15, 15), EndOfInput),
        ],
    );
}

#[test]
fn type_test_arrow() {
    assert_lex_eq(
        "is Foo -> x",
        vec![
            Spanned::new(span(1, 3), Is),
            Spanned::new(span(4, 7), Word("Foo".into())),
            Spanned::new(span(8, 10), Arrow),
            Spanned::new(span(11, 12), Word("x".into())),
            Spanned::new(span(12, 12), EndOfInput),
        ],
    );
}

#[test]
fn text_literal() {
    assert_lex_eq(
        "val s = \"hi\"",
        vec![
            Spanned::new(span(1, 4), Val),
            Spanned::new(span(5, 6), Word("s".into())),
            Spanned::new(span(7, 8), Equals),
            Spanned::new(span(9, 13), TextLiteral("hi".into())),
            Spanned::new(span(13, 13), EndOfInput),
        ],
    );
}

#[test]
fn unterminated_text_literal_taints() {
    let outcome = lex("\"oops");

    assert!(outcome.health.is_tainted());
    assert_eq!(
        outcome.bare,
        vec![
            Spanned::new(span(1, 6), TextLiteral("oops".into())),
            Spanned::new(span(6, 6), EndOfInput),
        ],
    );
}

#[test]
fn illegal_character_taints() {
    let outcome = lex("val @");

    assert!(outcome.health.is_tainted());
    assert_eq!(
        outcome.bare,
        vec![
            Spanned::new(span(1, 4), Val),
            Spanned::new(span(5, 6), Illegal('@')),
            Spanned::new(span(6, 6), EndOfInput),
        ],
    );
}
