use diagnostics::{reporter::Buffer, ErrorCode, Reporter};
use session::{Feature, Features, Session};
use span::{span, FileName, SourceMap, Span};

fn analyze(source: &str, features: Features) -> Vec<(Option<ErrorCode>, Option<Span>)> {
    let buffer = Buffer::default();
    let reporter = Reporter::buffer(buffer.clone());
    let mut map = SourceMap::default();
    let index = map.add_str(FileName::Anonymous, source);
    let tokens = lexer::lex(&map[index], &reporter).bare;
    let file = parser::parse(tokens, index, &reporter).unwrap();
    let session = Session::new(features, &reporter);
    let bindings = resolver::resolve(&file, &session).bare;
    let _ = super::check(&file, &bindings, &session);

    let diagnostics = buffer
        .lock()
        .unwrap()
        .iter()
        .map(|diagnostic| (diagnostic.code, diagnostic.primary_span()))
        .collect();
    diagnostics
}

fn flagged() -> Features {
    let mut features = Features::default();
    features.apply(Feature::ProhibitInvisibleAbstractMethodsInSuperclasses, true);
    features
}

#[test]
fn interface_default_does_not_discharge_superclass_obligation_under_the_flag() {
    let source = "abstract class BaseCase1 { abstract fun foo() }\n\
                  interface InterfaceCase1 { fun foo() { return } }\n\
                  class Case1() : BaseCase1(), InterfaceCase1 {}";

    // `Case1` on line 3, columns 7 through 12
    assert_eq!(
        analyze(source, flagged()),
        [(
            Some(ErrorCode::AbstractMemberNotImplemented),
            Some(span(105, 110))
        )]
    );
}

#[test]
fn interface_default_discharges_superclass_obligation_without_the_flag() {
    let source = "abstract class BaseCase1 { abstract fun foo() }\n\
                  interface InterfaceCase1 { fun foo() { return } }\n\
                  class Case1() : BaseCase1(), InterfaceCase1 {}";

    assert_eq!(analyze(source, Features::default()), []);
}

#[test]
fn one_diagnostic_per_undischarged_member_in_declaration_order() {
    let source = "abstract class BaseCase1 { abstract fun foo() abstract val a: Int }\n\
                  interface InterfaceCase1 { fun foo() { return } val a: Int = 0 }\n\
                  class Case1() : BaseCase1(), InterfaceCase1 {}";

    let diagnostics = analyze(source, flagged());
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics
        .iter()
        .all(|&(code, _)| code == Some(ErrorCode::AbstractMemberNotImplemented)));
    // both anchored at `Case1`
    assert_eq!(diagnostics[0].1, diagnostics[1].1);
}

#[test]
fn own_implementation_discharges_the_obligation() {
    let source = "abstract class BaseCase1 { abstract fun foo() }\n\
                  class Case1() : BaseCase1() { override fun foo() { return } }";

    assert_eq!(analyze(source, flagged()), []);
}

#[test]
fn inner_class_obligations_resolve_through_the_outer_scope() {
    let source = "abstract class Case2Outer { \
                  abstract class Case2Base { abstract fun foo() } \
                  inner class A : Case2Base() {} }";

    // `A` at columns 90 through 90
    assert_eq!(
        analyze(source, Features::default()),
        [(
            Some(ErrorCode::AbstractMemberNotImplemented),
            Some(span(89, 90))
        )]
    );
}

#[test]
fn anonymous_objects_are_anchored_at_the_object_keyword() {
    let source = "abstract class Base { abstract fun foo() }\n\
                  val o = object : Base() {}";

    // `object` on line 2, columns 9 through 14
    assert_eq!(
        analyze(source, Features::default()),
        [(
            Some(ErrorCode::AbstractMemberNotImplemented),
            Some(span(52, 58))
        )]
    );
}

#[test]
fn conflicting_interface_defaults_are_ambiguous() {
    let source = "interface Base { fun foo() }\n\
                  interface Left : Base { fun foo() { return } }\n\
                  interface Right : Base { fun foo() { return } }\n\
                  class C : Left, Right {}";

    let diagnostics = analyze(source, Features::default());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].0, Some(ErrorCode::AmbiguousOverride));
}

#[test]
fn an_overriding_interface_default_is_not_ambiguous() {
    let source = "interface Base { fun foo() }\n\
                  interface Left : Base { fun foo() { return } }\n\
                  interface Deep : Left { fun foo() { return } }\n\
                  class C : Deep {}";

    assert_eq!(analyze(source, Features::default()), []);
}

#[test]
fn an_own_override_disambiguates_conflicting_defaults() {
    let source = "interface Base { fun foo() }\n\
                  interface Left : Base { fun foo() { return } }\n\
                  interface Right : Base { fun foo() { return } }\n\
                  class C : Left, Right { override fun foo() { return } }";

    assert_eq!(analyze(source, Features::default()), []);
}

#[test]
fn a_type_as_an_equality_condition_is_a_mismatch() {
    let source = "class EmptyClass {}\n\
                  fun f(value_1: Int): String = when (value_1) { EmptyClass -> return \"\" }";

    // `EmptyClass` on line 2, columns 48 through 57
    assert_eq!(
        analyze(source, Features::default()),
        [(Some(ErrorCode::TypeMismatch), Some(span(68, 78)))]
    );
}

#[test]
fn a_companion_object_makes_the_classifier_a_value() {
    let source = "class EmptyClass { companion object {} }\n\
                  fun f(value_1: Int): Int = when (value_1) { EmptyClass -> 0 else -> 1 }";

    assert_eq!(analyze(source, Features::default()), []);
}

#[test]
fn any_and_nothing_never_denote_values() {
    let source = "fun f(value_1: Int): Int = when (value_1) { Any -> 0 Nothing -> 1 else -> 2 }";

    let diagnostics = analyze(source, Features::default());
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics
        .iter()
        .all(|&(code, _)| code == Some(ErrorCode::TypeMismatch)));
}

#[test]
fn enum_entries_and_type_tests_are_valid_conditions() {
    let source = "enum class Direction { North, South }\n\
                  class EmptyClass {}\n\
                  fun f(value_1: Int): Int = when (value_1) { \
                  Direction.North -> 0 is EmptyClass -> 1 else -> 2 }";

    assert_eq!(analyze(source, Features::default()), []);
}

#[test]
fn the_flag_never_removes_diagnostics() {
    for source in [
        "abstract class BaseCase1 { abstract fun foo() }\n\
         interface InterfaceCase1 { fun foo() { return } }\n\
         class Case1() : BaseCase1(), InterfaceCase1 {}",
        "abstract class Base { abstract fun foo() }\n\
         class C : Base() { override fun foo() { return } }",
    ] {
        let without = analyze(source, Features::default());
        let with = analyze(source, flagged());
        assert!(with.len() >= without.len());
    }
}

#[test]
fn analysis_is_deterministic() {
    let source = "abstract class BaseCase1 { abstract fun foo() abstract val a: Int }\n\
                  interface InterfaceCase1 { fun foo() { return } val a: Int = 0 }\n\
                  class Case1() : BaseCase1(), InterfaceCase1 {}";

    assert_eq!(analyze(source, flagged()), analyze(source, flagged()));
}
