//! The declarations of the AST.

use crate::{Expr, Identifier};
use span::{Span, Spanned};

pub type Decl = Spanned<BareDecl>;

#[derive(Debug)]
pub enum BareDecl {
    Class(Box<Class>),
    Object(Box<Object>),
    Function(Box<Function>),
    Property(Box<Property>),
    EnumEntry(Box<EnumEntry>),
}

/// A class, interface or enum class declaration.
#[derive(Debug)]
pub struct Class {
    pub kind: ClassKind,
    pub name: Identifier,
    pub modifiers: Modifiers,
    pub supertypes: Vec<SupertypeRef>,
    pub members: Vec<Decl>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
}

/// A named object, companion object or anonymous object expression body.
#[derive(Debug)]
pub struct Object {
    /// `None` for anonymous object expressions and unnamed companion objects.
    pub name: Option<Identifier>,
    /// The span of the `object` keyword, the diagnostic anchor for
    /// anonymous object expressions.
    pub keyword_span: Span,
    pub is_companion: bool,
    pub supertypes: Vec<SupertypeRef>,
    pub members: Vec<Decl>,
}

#[derive(Debug)]
pub struct Function {
    pub name: Identifier,
    pub modifiers: Modifiers,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<Identifier>,
    /// `None` for abstract and interface-abstract members.
    pub body: Option<Expr>,
}

#[derive(Debug)]
pub struct Parameter {
    pub name: Identifier,
    pub type_: Identifier,
}

/// A `val` or `var` declaration.
#[derive(Debug)]
pub struct Property {
    pub name: Identifier,
    pub modifiers: Modifiers,
    pub mutable: bool,
    pub type_: Option<Identifier>,
    pub initializer: Option<Expr>,
}

#[derive(Debug)]
pub struct EnumEntry {
    pub name: Identifier,
}

/// A reference to a supertype in a class header.
#[derive(Debug)]
pub struct SupertypeRef {
    pub name: Identifier,
    /// `Base()` (class supertype with constructor call) vs `Interface`.
    pub has_constructor_call: bool,
}

/// The modifiers of a declaration with the spans they were written at.
#[derive(Debug, Default)]
pub struct Modifiers {
    pub abstract_: Option<Span>,
    pub open: Option<Span>,
    pub sealed: Option<Span>,
    pub inner: Option<Span>,
    pub override_: Option<Span>,
}

impl Modifiers {
    pub fn is_abstract(&self) -> bool {
        self.abstract_.is_some()
    }
}
