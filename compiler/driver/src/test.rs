use diagnostics::{reporter::Buffer, ErrorCode, Reporter};
use session::{Features, Session};
use span::{FileName, SourceMap};

fn analyze(source: &str) -> (diagnostics::error::Result, Vec<Option<ErrorCode>>) {
    let buffer = Buffer::default();
    let reporter = Reporter::buffer(buffer.clone());
    let mut map = SourceMap::default();
    let index = map.add_str(FileName::Anonymous, source);
    let session = Session::new(Features::default(), &reporter);
    let result = super::analyze(&map, index, &session);

    let codes = buffer
        .lock()
        .unwrap()
        .iter()
        .map(|diagnostic| diagnostic.code)
        .collect();
    (result, codes)
}

#[test]
fn a_clean_file_analyzes_without_findings() {
    let (result, codes) = analyze("class EmptyClass {}\nfun f(x: Int): Int = x");
    assert_eq!(result, Ok(()));
    assert!(codes.is_empty());
}

#[test]
fn a_syntax_error_aborts_the_file() {
    let (result, codes) = analyze("class {");
    assert!(result.is_err());
    assert_eq!(codes, [Some(ErrorCode::SyntaxError)]);
}

#[test]
fn resolution_findings_taint_the_analysis() {
    let (result, codes) = analyze("class C : Missing() {}");
    assert!(result.is_err());
    assert_eq!(codes, [Some(ErrorCode::UnresolvedReference)]);
}

#[test]
fn checker_findings_taint_the_analysis() {
    let (result, codes) = analyze(
        "abstract class Base { abstract fun foo() }\n\
         class C : Base() {}",
    );
    assert!(result.is_err());
    assert_eq!(codes, [Some(ErrorCode::AbstractMemberNotImplemented)]);
}
