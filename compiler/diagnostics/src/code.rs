//! Diagnostic codes: the stable kinds diagnostics are matched by.

use std::{fmt, str::FromStr};

/// The kind of a diagnostic.
///
/// The names are part of the conformance-test surface: expected-diagnostic
/// markers and suppression lists reference these kinds by name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ErrorCode {
    SyntaxError,
    UnresolvedReference,
    ConflictingDeclarations,
    TypeMismatch,
    AbstractMemberNotImplemented,
    AmbiguousOverride,
}

impl ErrorCode {
    pub const fn name(self) -> &'static str {
        match self {
            Self::SyntaxError => "SYNTAX_ERROR",
            Self::UnresolvedReference => "UNRESOLVED_REFERENCE",
            Self::ConflictingDeclarations => "CONFLICTING_DECLARATIONS",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::AbstractMemberNotImplemented => "ABSTRACT_MEMBER_NOT_IMPLEMENTED",
            Self::AmbiguousOverride => "AMBIGUOUS_OVERRIDE",
        }
    }

    /// A longer explanation of the class of errors.
    pub const fn explanation(self) -> Option<&'static str> {
        match self {
            Self::AbstractMemberNotImplemented => Some(
                "a concrete class has to provide or inherit an implementation \
                 for every abstract member found in its supertype chain",
            ),
            Self::AmbiguousOverride => Some(
                "several unrelated supertypes provide an implementation for the \
                 same abstract member and none of them takes precedence",
            ),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        match source {
            "SYNTAX_ERROR" => Ok(Self::SyntaxError),
            "UNRESOLVED_REFERENCE" => Ok(Self::UnresolvedReference),
            "CONFLICTING_DECLARATIONS" => Ok(Self::ConflictingDeclarations),
            "TYPE_MISMATCH" => Ok(Self::TypeMismatch),
            "ABSTRACT_MEMBER_NOT_IMPLEMENTED" => Ok(Self::AbstractMemberNotImplemented),
            "AMBIGUOUS_OVERRIDE" => Ok(Self::AmbiguousOverride),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::ErrorCode;

    #[test]
    fn name_round_trip() {
        for code in [
            ErrorCode::SyntaxError,
            ErrorCode::UnresolvedReference,
            ErrorCode::ConflictingDeclarations,
            ErrorCode::TypeMismatch,
            ErrorCode::AbstractMemberNotImplemented,
            ErrorCode::AmbiguousOverride,
        ] {
            assert_eq!(code.name().parse(), Ok(code));
        }
    }
}
