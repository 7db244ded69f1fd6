use super::{Bindings, Builtin, DeclarationIndex, DeclarationKind};
use diagnostics::{reporter::Buffer, ErrorCode, Reporter};
use session::{Features, Session};
use span::{span, FileName, SourceMap};
use utility::Atom;

fn analyze(source: &str) -> (Bindings, Vec<Option<ErrorCode>>) {
    let buffer = Buffer::default();
    let reporter = Reporter::buffer(buffer.clone());
    let mut map = SourceMap::default();
    let index = map.add_str(FileName::Anonymous, source);
    let tokens = lexer::lex(&map[index], &reporter).bare;
    let file = parser::parse(tokens, index, &reporter).unwrap();
    let session = Session::new(Features::default(), &reporter);
    let bindings = super::resolve(&file, &session).bare;

    let codes = buffer
        .lock()
        .unwrap()
        .iter()
        .map(|diagnostic| diagnostic.code)
        .collect();
    (bindings, codes)
}

fn find(bindings: &Bindings, name: &str) -> DeclarationIndex {
    let name = Atom::from(name);
    bindings
        .top_level()
        .iter()
        .copied()
        .find(|&index| bindings[index].name == Some(name))
        .unwrap()
}

#[test]
fn linearization_visits_class_supertypes_before_interfaces() {
    let (bindings, codes) = analyze(
        "interface InterfaceCase1 {}
        abstract class BaseCase1 : InterfaceCase1 {}
        class Case1() : InterfaceCase1, BaseCase1() {}",
    );
    assert!(codes.is_empty());

    let chain: Vec<_> = bindings
        .linearize(find(&bindings, "Case1"))
        .into_iter()
        .map(|index| bindings[index].name.unwrap().to_str())
        .collect();

    assert_eq!(chain, ["BaseCase1", "InterfaceCase1"]);
}

#[test]
fn repeated_ancestors_are_linearized_once() {
    let (bindings, codes) = analyze(
        "interface A {}
        interface B : A {}
        interface C : A {}
        class D : B, C {}",
    );
    assert!(codes.is_empty());

    let chain: Vec<_> = bindings
        .linearize(find(&bindings, "D"))
        .into_iter()
        .map(|index| bindings[index].name.unwrap().to_str())
        .collect();

    assert_eq!(chain, ["B", "A", "C"]);
}

#[test]
fn inner_class_resolves_supertypes_in_the_outer_scope() {
    let (bindings, codes) = analyze(
        "abstract class Case2Outer {
            abstract class Case2Base {}
            inner class A : Case2Base() {}
        }",
    );
    assert!(codes.is_empty());

    let outer = find(&bindings, "Case2Outer");
    let inner = bindings[outer]
        .members
        .iter()
        .copied()
        .find(|&member| bindings[member].name == Some(Atom::from("A")))
        .unwrap();

    assert_eq!(bindings[inner].supertypes.len(), 1);
    assert_eq!(
        bindings[bindings[inner].supertypes[0]].name,
        Some(Atom::from("Case2Base"))
    );
}

#[test]
fn conflicting_declarations_are_reported_keeping_the_first() {
    let (bindings, codes) = analyze("class Duplicate {}\nclass Duplicate {}");
    assert_eq!(codes, [Some(ErrorCode::ConflictingDeclarations)]);

    // the first declaration stays resolvable
    let index = find(&bindings, "Duplicate");
    assert!(matches!(bindings[index].kind, DeclarationKind::Class(_)));
}

#[test]
fn unresolved_supertype_is_reported_and_skipped() {
    let (bindings, codes) = analyze("class C : Missing() {}");
    assert_eq!(codes, [Some(ErrorCode::UnresolvedReference)]);
    assert!(bindings[find(&bindings, "C")].supertypes.is_empty());
}

#[test]
fn unresolved_when_condition_operand_is_reported() {
    let (_, codes) = analyze(
        "fun f(x: Int): Int = when (x) {
            Missing -> 0
            else -> 1
        }",
    );
    assert_eq!(codes, [Some(ErrorCode::UnresolvedReference)]);
}

#[test]
fn type_annotations_fall_back_to_the_builtins() {
    let (bindings, codes) = analyze("fun f(x: Int): Int = x");
    assert!(codes.is_empty());

    let parameter_type = bindings.reference(span(10, 13)).unwrap();
    assert_eq!(
        bindings[parameter_type].kind,
        DeclarationKind::Builtin(Builtin::Int)
    );

    let body = bindings.reference(span(22, 23)).unwrap();
    assert_eq!(bindings[body].kind, DeclarationKind::Parameter);
}

#[test]
fn companion_members_are_reachable_through_the_classifier() {
    let source = "class A { companion object { val a = 0 } }\nfun f(): Int = A.a";
    let (bindings, codes) = analyze(source);
    assert!(codes.is_empty());

    assert!(bindings.companion(find(&bindings, "A")).is_some());

    // `A.a`, the last three bytes of the source
    let length = source.len() as u32;
    let target = bindings.reference(span(length - 2, length + 1)).unwrap();
    assert_eq!(bindings[target].kind, DeclarationKind::Property);
}

#[test]
fn missing_member_of_a_dotted_path_is_reported() {
    let (_, codes) = analyze("class A { companion object { val a = 0 } }\nfun f(): Int = A.b");
    assert_eq!(codes, [Some(ErrorCode::UnresolvedReference)]);
}

#[test]
fn interface_members_without_a_body_are_abstract() {
    let (bindings, codes) = analyze(
        "interface InterfaceCase1 {
            fun foo() { return }
            val a: Int
        }",
    );
    assert!(codes.is_empty());

    let interface = find(&bindings, "InterfaceCase1");
    let members = &bindings[interface].members;

    assert!(!bindings[members[0]].is_abstract);
    assert!(bindings[members[1]].is_abstract);
}

#[test]
fn anonymous_objects_are_anchored_at_the_object_keyword() {
    let (bindings, codes) = analyze("abstract class Base {}\nval o = object : Base() {}");
    assert!(codes.is_empty());

    let object = bindings
        .indices()
        .find(|&index| {
            matches!(
                bindings[index].kind,
                DeclarationKind::Object { is_companion: false }
            ) && bindings[index].name.is_none()
        })
        .unwrap();

    // `object` on line 2, columns 9 through 14
    assert_eq!(bindings[object].anchor, span(32, 38));
    assert_eq!(bindings[object].supertypes.len(), 1);
}
