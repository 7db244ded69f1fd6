//! The abstract syntax tree (AST).

use span::{SourceFileIndex, Span, Spanned, Spanning};
use std::fmt;
use utility::Atom;

pub use decl::*;
pub use expr::*;

mod decl;
mod expr;

/// The syntax tree of a single source file.
pub struct File {
    pub index: SourceFileIndex,
    pub decls: Vec<Decl>,
}

/// A name given by the user together with its source location.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier(Spanned<Atom>);

impl Identifier {
    pub const fn new(span: Span, atom: Atom) -> Self {
        Self(Spanned::new(span, atom))
    }

    pub const fn bare(self) -> Atom {
        self.0.bare
    }

    pub fn to_str(self) -> &'static str {
        self.0.bare.to_str()
    }
}

impl Spanning for Identifier {
    fn span(&self) -> Span {
        self.0.span
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.bare.fmt(f)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.0.bare, self.0.span)
    }
}
