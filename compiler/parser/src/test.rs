use ast::{BareDecl, BareExpr, BareWhenCondition, ClassKind, File};
use diagnostics::{error::Result, Reporter};
use span::{FileName, SourceMap};

fn parse(source: &str) -> Result<File> {
    let mut map = SourceMap::default();
    let index = map.add_str(FileName::Anonymous, source);
    let tokens = lexer::lex(&map[index], &Reporter::silent()).bare;
    super::parse(tokens, index, &Reporter::silent())
}

#[test]
fn class_with_members() {
    let file = parse(
        "abstract class BaseCase1 {
            abstract fun foo()
            abstract val a: Int
        }",
    )
    .unwrap();

    assert_eq!(file.decls.len(), 1);

    let BareDecl::Class(class) = &file.decls[0].bare else {
        panic!("expected a class");
    };

    assert_eq!(class.kind, ClassKind::Class);
    assert_eq!(class.name.to_str(), "BaseCase1");
    assert!(class.modifiers.is_abstract());
    assert_eq!(class.members.len(), 2);

    let BareDecl::Function(function) = &class.members[0].bare else {
        panic!("expected a function");
    };
    assert_eq!(function.name.to_str(), "foo");
    assert!(function.modifiers.is_abstract());
    assert!(function.body.is_none());

    let BareDecl::Property(property) = &class.members[1].bare else {
        panic!("expected a property");
    };
    assert_eq!(property.name.to_str(), "a");
    assert!(!property.mutable);
}

#[test]
fn class_with_supertypes() {
    let file = parse("class Case1() : BaseCase1(), InterfaceCase1 {}").unwrap();

    let BareDecl::Class(class) = &file.decls[0].bare else {
        panic!("expected a class");
    };

    assert_eq!(class.supertypes.len(), 2);
    assert_eq!(class.supertypes[0].name.to_str(), "BaseCase1");
    assert!(class.supertypes[0].has_constructor_call);
    assert_eq!(class.supertypes[1].name.to_str(), "InterfaceCase1");
    assert!(!class.supertypes[1].has_constructor_call);
}

#[test]
fn interface_with_default_implementation() {
    let file = parse(
        "interface InterfaceCase1 {
            fun foo() { return }
            val a: Int
        }",
    )
    .unwrap();

    let BareDecl::Class(interface) = &file.decls[0].bare else {
        panic!("expected an interface");
    };

    assert_eq!(interface.kind, ClassKind::Interface);

    let BareDecl::Function(function) = &interface.members[0].bare else {
        panic!("expected a function");
    };
    assert!(function.body.is_some());

    let BareDecl::Property(property) = &interface.members[1].bare else {
        panic!("expected a property");
    };
    assert!(property.initializer.is_none());
}

#[test]
fn when_expression_branch_conditions() {
    let file = parse(
        "fun f(value_1: Int): Int = when (value_1) {
            EmptyClass -> 0
            is EmptyClass -> 1
            else -> 2
        }",
    )
    .unwrap();

    let BareDecl::Function(function) = &file.decls[0].bare else {
        panic!("expected a function");
    };
    let Some(body) = &function.body else {
        panic!("expected a body");
    };
    let BareExpr::When(when) = &body.bare else {
        panic!("expected a when expression");
    };

    assert_eq!(when.branches.len(), 3);
    assert!(matches!(
        when.branches[0].condition.bare,
        BareWhenCondition::Equality(_)
    ));
    assert!(matches!(
        when.branches[1].condition.bare,
        BareWhenCondition::TypeTest(_)
    ));
    assert!(matches!(
        when.branches[2].condition.bare,
        BareWhenCondition::Else
    ));
}

#[test]
fn enum_class_entries() {
    let file = parse("enum class Direction { North, South, West, East }").unwrap();

    let BareDecl::Class(class) = &file.decls[0].bare else {
        panic!("expected a class");
    };

    assert_eq!(class.kind, ClassKind::Enum);
    assert_eq!(class.members.len(), 4);
    assert!(class
        .members
        .iter()
        .all(|member| matches!(member.bare, BareDecl::EnumEntry(_))));
}

#[test]
fn anonymous_object_expression() {
    let file = parse("val o = object : Base() {}").unwrap();

    let BareDecl::Property(property) = &file.decls[0].bare else {
        panic!("expected a property");
    };
    let Some(initializer) = &property.initializer else {
        panic!("expected an initializer");
    };
    let BareExpr::Object(object) = &initializer.bare else {
        panic!("expected an object expression");
    };

    assert!(object.name.is_none());
    assert_eq!(object.supertypes.len(), 1);
    assert!(object.supertypes[0].has_constructor_call);
}

#[test]
fn companion_object() {
    let file = parse("class EmptyClass { companion object {} }").unwrap();

    let BareDecl::Class(class) = &file.decls[0].bare else {
        panic!("expected a class");
    };
    let BareDecl::Object(object) = &class.members[0].bare else {
        panic!("expected an object");
    };

    assert!(object.is_companion);
    assert!(object.name.is_none());
}

#[test]
fn syntax_error_aborts_the_file() {
    assert!(parse("class {").is_err());
}

#[test]
fn dotted_path_condition() {
    let file = parse(
        "fun f(x: Int): Int = when (x) {
            Direction.North -> 0
            else -> 1
        }",
    )
    .unwrap();

    let BareDecl::Function(function) = &file.decls[0].bare else {
        panic!("expected a function");
    };
    let Some(body) = &function.body else {
        panic!("expected a body");
    };
    let BareExpr::When(when) = &body.bare else {
        panic!("expected a when expression");
    };
    let BareWhenCondition::Equality(operand) = &when.branches[0].condition.bare else {
        panic!("expected an equality condition");
    };
    let BareExpr::Path(path) = &operand.bare else {
        panic!("expected a path");
    };

    assert_eq!(path.segments.len(), 2);
}
