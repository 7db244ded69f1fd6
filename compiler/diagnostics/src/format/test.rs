use crate::{Diagnostic, ErrorCode, UnboxedUntaggedDiagnostic};
use span::{span, FileName::Anonymous, SourceMap};

#[track_caller]
fn assert_format(diagnostic: &UnboxedUntaggedDiagnostic, map: Option<&SourceMap>, expected: &str) {
    let actual = super::format(diagnostic, map);

    assert!(
        actual == expected,
        "the output differs:\nexpected:\n{expected}\nactual:\n{actual}"
    );
}

#[test]
fn format_no_highlights() {
    let diagnostic = Diagnostic::error()
        .code(ErrorCode::TypeMismatch)
        .message("summary");

    assert_format(&diagnostic, None, "error[TYPE_MISMATCH]: summary");
}

#[test]
fn format_single_line_primary_highlight() {
    let mut map = SourceMap::default();
    map.add_str(Anonymous, "alpha\nbeta\ngamma\n");

    let diagnostic = Diagnostic::error()
        .message("message")
        .unlabeled_span(span(8, 11));

    assert_format(
        &diagnostic,
        Some(&map),
        "\
error: message
  ┌─ ⟨anonymous⟩:2:2
  │
2 │ beta
  │  ═══",
    );
}

#[test]
fn format_two_line_primary_highlight() {
    let mut map = SourceMap::default();
    map.add_str(Anonymous, "alpha\nbeta\n");

    let diagnostic = Diagnostic::error().unlabeled_span(span(1, 9));

    assert_format(
        &diagnostic,
        Some(&map),
        "\
error
  ┌─ ⟨anonymous⟩:1:1
  │
1 │   alpha
  │ ╔═╝
2 │ ║ beta
  │ ╚══╝",
    );
}

#[test]
fn format_multi_line_primary_highlight() {
    let mut map = SourceMap::default();
    map.add_str(Anonymous, "alpha\nbeta\ngamma\ndelta\nepsilon");

    let diagnostic = Diagnostic::error()
        .code(ErrorCode::AbstractMemberNotImplemented)
        .message("explanation")
        .unlabeled_span(span(9, 23));

    assert_format(
        &diagnostic,
        Some(&map),
        "\
error[ABSTRACT_MEMBER_NOT_IMPLEMENTED]: explanation
  ┌─ ⟨anonymous⟩:2:3
  │
2 │   beta
  · ╔═══╝
4 │ ║ delta
  │ ╚═════╝",
    );
}

#[test]
fn format_labeled_highlight_and_note() {
    let mut map = SourceMap::default();
    map.add_str(Anonymous, "class Alpha {}");

    let diagnostic = Diagnostic::error()
        .code(ErrorCode::AbstractMemberNotImplemented)
        .message("message")
        .span(span(7, 12), "not implemented")
        .note("a note");

    assert_format(
        &diagnostic,
        Some(&map),
        "\
error[ABSTRACT_MEMBER_NOT_IMPLEMENTED]: message
  ┌─ ⟨anonymous⟩:1:7
  │
1 │ class Alpha {}
  │       ═════ not implemented
  │
 note: a note",
    );
}

#[test]
fn format_warning() {
    let diagnostic = Diagnostic::warning().message("strange but permitted");

    assert_format(&diagnostic, None, "warning: strange but permitted");
}
