use crate::{Configuration, Error, Verdict};
use diagnostics::ErrorCode;
use span::{FileName, SourceMap};

fn run(source: &str) -> Result<Verdict, Error> {
    let mut map = SourceMap::default();
    let file = map.add_str(FileName::Anonymous, source);
    let configuration = Configuration::parse(&map[file])?;
    crate::run_test(&mut map, file, &configuration)
}

#[test]
fn a_matching_expectation_passes() {
    let verdict = run(
        "\
abstract class Base { abstract fun foo() }
class <!ABSTRACT_MEMBER_NOT_IMPLEMENTED!>C<!>() : Base() {}
",
    )
    .unwrap();

    assert_eq!(verdict, Verdict::Pass);
}

#[test]
fn a_missing_diagnostic_fails() {
    let verdict = run("val <!TYPE_MISMATCH!>x<!> = 0\n").unwrap();

    let Verdict::Fail {
        missing,
        unexpected,
    } = verdict
    else {
        panic!("expected a failing verdict");
    };

    assert_eq!(
        missing.iter().map(|it| it.code).collect::<Vec<_>>(),
        [ErrorCode::TypeMismatch]
    );
    assert_eq!(unexpected, []);
}

#[test]
fn an_unexpected_diagnostic_fails() {
    let verdict = run(
        "\
abstract class Base { abstract fun foo() }
class C() : Base() {}
",
    )
    .unwrap();

    let Verdict::Fail {
        missing,
        unexpected,
    } = verdict
    else {
        panic!("expected a failing verdict");
    };

    assert_eq!(missing, []);
    assert_eq!(
        unexpected.iter().map(|it| it.code).collect::<Vec<_>>(),
        [ErrorCode::AbstractMemberNotImplemented]
    );
}

#[test]
fn a_mismatched_kind_is_both_missing_and_unexpected() {
    let verdict = run(
        "\
abstract class Base { abstract fun foo() }
class <!TYPE_MISMATCH!>C<!>() : Base() {}
",
    )
    .unwrap();

    let Verdict::Fail {
        missing,
        unexpected,
    } = verdict
    else {
        panic!("expected a failing verdict");
    };

    assert_eq!(
        missing.iter().map(|it| it.code).collect::<Vec<_>>(),
        [ErrorCode::TypeMismatch]
    );
    assert_eq!(
        unexpected.iter().map(|it| it.code).collect::<Vec<_>>(),
        [ErrorCode::AbstractMemberNotImplemented]
    );
    // both point at the same snippet
    assert_eq!(missing[0].span, unexpected[0].span);
}

#[test]
fn suppressed_diagnostics_are_not_unexpected() {
    let verdict = run(
        "\
// DIAGNOSTICS: -ABSTRACT_MEMBER_NOT_IMPLEMENTED
abstract class Base { abstract fun foo() }
class C() : Base() {}
",
    )
    .unwrap();

    assert_eq!(verdict, Verdict::Pass);
}

#[test]
fn a_language_directive_changes_the_verdict() {
    let body = "\
abstract class Base { abstract fun foo() }
interface Default { fun foo() { return } }
class <!ABSTRACT_MEMBER_NOT_IMPLEMENTED!>C<!>() : Base(), Default {}
";
    let flag = "// LANGUAGE: +ProhibitInvisibleAbstractMethodsInSuperclasses\n";

    // the interface default discharges the obligation by default
    assert!(matches!(
        run(body).unwrap(),
        Verdict::Fail { missing, .. } if missing.len() == 1
    ));

    let verdict = run(&format!("{flag}{body}")).unwrap();
    assert_eq!(verdict, Verdict::Pass);
}

#[test]
fn a_malformed_marker_is_an_error() {
    let error = run("class C {} <!\n").unwrap_err();
    assert_eq!(error.message, "this expectation marker is unterminated");
}
