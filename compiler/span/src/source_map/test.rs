use super::{FileName, Highlight, LineWithHighlight, SourceMap};
use crate::{span, Spanning};

#[test]
fn files_are_padded_at_the_start() {
    let mut map = SourceMap::default();
    let first = map.add_str(FileName::Anonymous, "abc");
    let second = map.add_str(FileName::Anonymous, "defgh");

    assert_eq!(map[first].span(), span(1, 4));
    assert_eq!(map[second].span(), span(5, 10));
}

#[test]
fn snippet_resolves_to_content() {
    let mut map = SourceMap::default();
    map.add_str(FileName::Anonymous, "class Alpha {}");

    assert_eq!(map.snippet(span(7, 12)), "Alpha");
}

#[test]
fn lines_with_highlight_single_line() {
    let mut map = SourceMap::default();
    map.add_str(FileName::Anonymous, "alpha\nbeta gamma\ndelta\n");

    // “gamma” on line 2.
    let lines = map.lines_with_highlight(span(12, 17));

    assert_eq!(
        lines.first,
        LineWithHighlight {
            number: 2,
            content: "beta gamma",
            highlight: Highlight {
                start: 6,
                end: 11,
                width: 5,
                prefix_width: 5,
            },
        },
    );
    assert_eq!(lines.last, None);
}

#[test]
fn lines_with_highlight_across_lines() {
    let mut map = SourceMap::default();
    map.add_str(FileName::Anonymous, "one\ntwo\nthree\n");

    // “two\nthree”.
    let lines = map.lines_with_highlight(span(5, 14));

    assert_eq!(lines.first.number, 2);
    assert_eq!(lines.first.content, "two");
    assert_eq!(lines.last.as_ref().map(|line| line.number), Some(3));
}

#[test]
fn lines_with_highlight_no_trailing_line_break() {
    let mut map = SourceMap::default();
    map.add_str(FileName::Anonymous, "solitary");

    let lines = map.lines_with_highlight(span(1, 9));

    assert_eq!(lines.first.number, 1);
    assert_eq!(lines.first.content, "solitary");
    assert_eq!(lines.first.highlight.start, 1);
    assert_eq!(lines.first.highlight.end, 9);
}
