//! The diagnostics system.

use reporter::ErasedReportedError;
use span::{Span, Spanning};
use std::{collections::BTreeSet, fmt, path::PathBuf};
use utility::Str;

pub use code::ErrorCode;
pub use reporter::Reporter;

mod code;
mod format;

pub mod error;
pub mod reporter;

/// A complex diagnostic message, optionally with source locations.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
#[must_use]
pub struct Diagnostic {
    untagged: UntaggedDiagnostic,
}

impl Diagnostic {
    fn new(severity: Severity) -> Self {
        Self {
            untagged: Box::new(UnboxedUntaggedDiagnostic::new(severity)),
        }
    }

    /// Create a diagnostic for an internal error.
    pub fn bug() -> Self {
        Self::new(Severity::Bug)
    }

    /// Create a diagnostic for a user error.
    pub fn error() -> Self {
        Self::new(Severity::Error)
    }

    /// Create a diagnostic for a warning.
    pub fn warning() -> Self {
        Self::new(Severity::Warning)
    }

    pub fn code(mut self, code: ErrorCode) -> Self {
        self.untagged.code = Some(code);
        self
    }

    /// Add a text message describing the issue.
    ///
    /// The message should be a single line, start lower case and not end in a
    /// punctuation mark. Surround source code snippets with directional single
    /// quotation marks, i.e. `‘` to the left and `’` to the right.
    pub fn message(mut self, message: impl Into<Str>) -> Self {
        self.untagged.message = Some(message.into());
        self
    }

    fn highlight(mut self, spanning: impl Spanning, label: Option<Str>, role: Role) -> Self {
        self.untagged.highlights.insert(Highlight {
            span: spanning.span(),
            label,
            role,
        });
        self
    }

    /// Reference and label a code snippet as one of the focal points of the diagnostic.
    pub fn span(self, spanning: impl Spanning, label: impl Into<Str>) -> Self {
        self.highlight(spanning, Some(label.into()), Role::Primary)
    }

    /// Reference a code snippet as one of the focal points of the diagnostic.
    pub fn unlabeled_span(self, spanning: impl Spanning) -> Self {
        self.highlight(spanning, None, Role::Primary)
    }

    /// Reference and label a code snippet as auxiliary information for the diagnostic.
    pub fn label(self, spanning: impl Spanning, label: impl Into<Str>) -> Self {
        self.highlight(spanning, Some(label.into()), Role::Secondary)
    }

    fn subdiagnostic(mut self, severity: Subseverity, message: Str) -> Self {
        self.untagged
            .subdiagnostics
            .push(Subdiagnostic { severity, message });
        self
    }

    /// Add further clarifying information.
    pub fn note(self, message: impl Into<Str>) -> Self {
        self.subdiagnostic(Subseverity::Note, message.into())
    }

    /// Add steps or tips to solve the diagnosed issue.
    pub fn help(self, message: impl Into<Str>) -> Self {
        self.subdiagnostic(Subseverity::Help, message.into())
    }

    /// Reference a path in the diagnostic.
    ///
    /// Useful if the given path is not registered in the source map.
    pub fn path(mut self, path: PathBuf) -> Self {
        self.untagged.path = Some(path);
        self
    }

    pub fn with(self, builder: impl FnOnce(Self) -> Self) -> Self {
        builder(self)
    }

    /// Report the diagnostic.
    pub fn report(self, reporter: &Reporter) -> ErasedReportedError {
        reporter.report(self.untagged)
    }
}

impl std::ops::Deref for Diagnostic {
    type Target = UnboxedUntaggedDiagnostic;

    fn deref(&self) -> &Self::Target {
        &self.untagged
    }
}

pub type UntaggedDiagnostic = Box<UnboxedUntaggedDiagnostic>;

#[derive(PartialEq, Eq, PartialOrd, Ord)]
pub struct UnboxedUntaggedDiagnostic {
    // Highlights come first so that buffered diagnostics are ordered by
    // source location.
    pub highlights: BTreeSet<Highlight>,
    pub subdiagnostics: Vec<Subdiagnostic>,
    pub code: Option<ErrorCode>,
    pub message: Option<Str>,
    pub severity: Severity,
    pub path: Option<PathBuf>,
}

impl UnboxedUntaggedDiagnostic {
    fn new(severity: Severity) -> Self {
        Self {
            highlights: BTreeSet::new(),
            subdiagnostics: Vec::new(),
            code: None,
            message: None,
            severity,
            path: None,
        }
    }

    /// The span of the first primary highlight.
    pub fn primary_span(&self) -> Option<Span> {
        self.highlights
            .iter()
            .find(|highlight| highlight.role == Role::Primary)
            .map(|highlight| highlight.span)
    }

    pub fn format(&self, map: Option<&span::SourceMap>) -> String {
        format::format(self, map)
    }
}

/// A highlighted code snippet.
#[derive(PartialEq, Eq, Debug, Clone, PartialOrd, Ord)]
pub struct Highlight {
    pub span: Span,
    pub role: Role,
    pub label: Option<Str>,
}

/// The role of a highlighted code snippet — focal point or auxiliary note.
#[derive(PartialEq, Eq, Debug, Clone, Copy, PartialOrd, Ord)]
pub enum Role {
    /// A focal point of the diagnostic.
    Primary,
    /// An auxiliary note of the diagnostic.
    Secondary,
}

/// Part of a [complex error message](Diagnostic) providing extra text messages.
#[derive(PartialEq, Eq, Clone, PartialOrd, Ord)]
pub struct Subdiagnostic {
    pub severity: Subseverity,
    pub message: Str,
}

/// Level of severity of a diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub enum Severity {
    /// An internal error.
    Bug,
    /// A user error.
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bug => "internal error",
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub enum Subseverity {
    /// An auxiliary note.
    Note,
    /// A message containing steps to solve an issue.
    Help,
}

impl fmt::Display for Subseverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Note => "note",
            Self::Help => "help",
        })
    }
}
