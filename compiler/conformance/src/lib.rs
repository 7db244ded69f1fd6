//! The specification-conformance harness.
//!
//! A conformance test is a source file with a leading directive block (see
//! [`Configuration`]) and inline expected-diagnostic markers (see
//! [`markers`]). The harness strips the markers, runs the analysis pipeline
//! over the stripped source and compares the produced diagnostics against
//! the expectations by kind and span.
//!
//! Mismatches are never recovered from silently: every missing and every
//! unexpected diagnostic is part of the [`Verdict`].

use diagnostics::{reporter::Buffer, ErrorCode, Reporter};
use session::Session;
use span::{SourceFileIndex, SourceMap, Span};
use utility::Str;

pub use configuration::{Citation, Configuration};
pub use runner::{run_suite, Options};

mod configuration;
mod markers;
mod runner;
mod summary;

#[cfg(test)]
mod test;

/// An expected or produced diagnostic, compared by kind and span.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Expectation {
    pub code: ErrorCode,
    pub span: Span,
}

/// The outcome of a single conformance test.
#[derive(Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail {
        /// Expected diagnostics no produced diagnostic matched.
        missing: Vec<Expectation>,
        /// Produced diagnostics that were neither expected nor suppressed.
        unexpected: Vec<Expectation>,
    },
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Run a single conformance test whose raw source was already added to the map.
///
/// The marker-stripped source is added to the map as a further file; the
/// diagnostic spans of the verdict point into that file.
pub fn run_test(
    map: &mut SourceMap,
    file: SourceFileIndex,
    configuration: &Configuration,
) -> Result<Verdict, Error> {
    let (stripped, expectations) = markers::extract(&map[file])?;
    let name = map[file].name().clone();
    let analyzed = map.add(name, stripped);

    let expected: Vec<_> = expectations
        .into_iter()
        .map(|(code, span)| Expectation {
            code,
            span: span.global(&map[analyzed]),
        })
        .collect();

    let buffer = Buffer::default();
    let reporter = Reporter::buffer(buffer.clone());
    let session = Session::new(configuration.features, &reporter);
    // mismatches surface through the comparison below, not the exit status
    let _ = driver::analyze(map, analyzed, &session);

    let actual = buffer
        .lock()
        .unwrap()
        .iter()
        .filter_map(|diagnostic| {
            Some(Expectation {
                code: diagnostic.code?,
                span: diagnostic.primary_span()?,
            })
        })
        .collect();

    Ok(compare(&expected, actual, &configuration.suppressions))
}

/// Match expected and produced diagnostics 1:1 by kind and span.
fn compare(
    expected: &[Expectation],
    mut actual: Vec<Expectation>,
    suppressions: &[ErrorCode],
) -> Verdict {
    let mut missing = Vec::new();

    for &expectation in expected {
        match actual.iter().position(|&finding| finding == expectation) {
            Some(index) => {
                actual.remove(index);
            }
            None => missing.push(expectation),
        }
    }

    let unexpected: Vec<_> = actual
        .into_iter()
        .filter(|finding| !suppressions.contains(&finding.code))
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        Verdict::Pass
    } else {
        Verdict::Fail {
            missing,
            unexpected,
        }
    }
}

/// A malformed conformance test: an invalid directive or marker.
#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct Error {
    pub message: Str,
    pub span: Option<Span>,
}

impl Error {
    fn spanned(message: impl Into<Str>, span: Span) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
        }
    }
}
