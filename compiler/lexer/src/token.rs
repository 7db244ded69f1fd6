//! The tokens emitted by the lexer.

use span::Spanned;
use std::fmt;
use utility::Atom;
use BareToken::*;

pub type Token = Spanned<BareToken>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BareToken {
    //
    // Keywords
    //
    Abstract,
    Class,
    Companion,
    Else,
    Enum,
    Fun,
    Inner,
    Interface,
    Is,
    Object,
    Open,
    Override,
    Return,
    Sealed,
    Val,
    Var,
    When,
    //
    // Reserved Symbols
    //
    /// `->`
    Arrow,
    Colon,
    Comma,
    Dot,
    Equals,
    //
    // Brackets
    //
    ClosingCurlyBracket,
    ClosingRoundBracket,
    OpeningCurlyBracket,
    OpeningRoundBracket,
    //
    // Other Tokens
    //
    EndOfInput,
    Illegal(char),
    NumberLiteral(Atom),
    TextLiteral(Atom),
    Word(Atom),
}

impl fmt::Display for BareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Illegal(character) => return write!(f, "invalid character U+{:04X}", *character as u32),
            _ => {}
        }

        f.write_str(match self {
            //
            // Keywords
            //
            Abstract => "‘abstract’",
            Class => "‘class’",
            Companion => "‘companion’",
            Else => "‘else’",
            Enum => "‘enum’",
            Fun => "‘fun’",
            Inner => "‘inner’",
            Interface => "‘interface’",
            Is => "‘is’",
            Object => "‘object’",
            Open => "‘open’",
            Override => "‘override’",
            Return => "‘return’",
            Sealed => "‘sealed’",
            Val => "‘val’",
            Var => "‘var’",
            When => "‘when’",
            //
            // Reserved Symbols
            //
            Arrow => "‘->’",
            Colon => "‘:’",
            Comma => "‘,’",
            Dot => "‘.’",
            Equals => "‘=’",
            //
            // Brackets
            //
            ClosingCurlyBracket => "‘}’",
            ClosingRoundBracket => "‘)’",
            OpeningCurlyBracket => "‘{’",
            OpeningRoundBracket => "‘(’",
            //
            // Other Tokens
            //
            EndOfInput => "end of input",
            Illegal(_) => unreachable!(),
            NumberLiteral(_) => "number literal",
            TextLiteral(_) => "text literal",
            Word(_) => "identifier",
        })
    }
}

pub(crate) fn parse_keyword(source: &str) -> Option<BareToken> {
    Some(match source {
        "abstract" => Abstract,
        "class" => Class,
        "companion" => Companion,
        "else" => Else,
        "enum" => Enum,
        "fun" => Fun,
        "inner" => Inner,
        "interface" => Interface,
        "is" => Is,
        "object" => Object,
        "open" => Open,
        "override" => Override,
        "return" => Return,
        "sealed" => Sealed,
        "val" => Val,
        "var" => Var,
        "when" => When,
        _ => return None,
    })
}
