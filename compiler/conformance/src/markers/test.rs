use diagnostics::ErrorCode;
use span::{span, FileName, LocalByteIndex, LocalSpan, SourceMap};

fn extract(source: &str) -> Result<(String, Vec<(ErrorCode, LocalSpan)>), crate::Error> {
    let mut map = SourceMap::default();
    let file = map.add_str(FileName::Anonymous, source);
    super::extract(&map[file])
}

fn local(start: u32, end: u32) -> LocalSpan {
    LocalSpan::new(LocalByteIndex::new(start), LocalByteIndex::new(end))
}

#[test]
fn source_without_markers_is_untouched() {
    let (stripped, expectations) = extract("class EmptyClass {}\n").unwrap();
    assert_eq!(stripped, "class EmptyClass {}\n");
    assert_eq!(expectations, []);
}

#[test]
fn a_marker_is_stripped_and_its_span_rebased() {
    let (stripped, expectations) = extract("val <!TYPE_MISMATCH!>x<!> = 0").unwrap();
    assert_eq!(stripped, "val x = 0");
    assert_eq!(expectations, [(ErrorCode::TypeMismatch, local(4, 5))]);
}

#[test]
fn comma_separated_kinds_share_the_span() {
    let (stripped, expectations) =
        extract("<!TYPE_MISMATCH,UNRESOLVED_REFERENCE!>foo<!>").unwrap();
    assert_eq!(stripped, "foo");
    assert_eq!(
        expectations,
        [
            (ErrorCode::TypeMismatch, local(0, 3)),
            (ErrorCode::UnresolvedReference, local(0, 3)),
        ]
    );
}

#[test]
fn markers_nest() {
    let (stripped, expectations) =
        extract("a <!SYNTAX_ERROR!>b <!TYPE_MISMATCH!>c<!> d<!> e").unwrap();
    assert_eq!(stripped, "a b c d e");
    assert_eq!(
        expectations,
        [
            (ErrorCode::TypeMismatch, local(4, 5)),
            (ErrorCode::SyntaxError, local(2, 7)),
        ]
    );
}

#[test]
fn an_unknown_kind_is_an_error() {
    let error = extract("<!BOGUS!>x<!>").unwrap_err();
    assert_eq!(error.message, "‘BOGUS’ is not a valid diagnostic kind");
    assert_eq!(error.span, Some(span(1, 10)));
}

#[test]
fn an_unterminated_marker_is_an_error() {
    let error = extract("foo <!").unwrap_err();
    assert_eq!(error.message, "this expectation marker is unterminated");
    assert_eq!(error.span, Some(span(5, 7)));
}

#[test]
fn an_unclosed_marker_is_an_error() {
    let error = extract("<!TYPE_MISMATCH!>x").unwrap_err();
    assert_eq!(error.message, "this expectation marker is never closed");
    assert_eq!(error.span, Some(span(1, 3)));
}

#[test]
fn a_stray_closing_marker_is_an_error() {
    let error = extract("x <!>").unwrap_err();
    assert_eq!(
        error.message,
        "this closing marker has no matching opening marker"
    );
    assert_eq!(error.span, Some(span(3, 6)));
}
