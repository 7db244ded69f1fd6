//! The expressions of the AST.

use crate::{Identifier, Object, Property};
use span::Spanned;
use utility::Atom;

pub type Expr = Spanned<BareExpr>;

#[derive(Debug)]
pub enum BareExpr {
    /// A possibly dotted reference like `value` or `Outer.Inner`.
    Path(Box<Path>),
    Number(Atom),
    Text(Atom),
    Call(Box<Call>),
    When(Box<When>),
    /// An anonymous object expression, `object : Base() {}`.
    Object(Box<Object>),
    Return(Box<Option<Expr>>),
    Block(Box<Block>),
}

#[derive(Debug)]
pub struct Path {
    pub segments: Vec<Identifier>,
}

#[derive(Debug)]
pub struct Call {
    pub callee: Expr,
    pub arguments: Vec<Expr>,
}

#[derive(Debug)]
pub struct When {
    pub subject: Expr,
    pub branches: Vec<WhenBranch>,
}

#[derive(Debug)]
pub struct WhenBranch {
    pub condition: WhenCondition,
    pub body: Expr,
}

pub type WhenCondition = Spanned<BareWhenCondition>;

#[derive(Debug)]
pub enum BareWhenCondition {
    /// `is Type`.
    TypeTest(Identifier),
    /// A plain equality operand.
    Equality(Expr),
    /// `else`.
    Else,
}

#[derive(Debug)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Debug)]
pub enum Statement {
    /// A local `val` or `var`.
    Property(Box<Property>),
    Expression(Expr),
}
