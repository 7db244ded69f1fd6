//! The diagnostic reporter.

use super::UntaggedDiagnostic;
use span::SourceMap;
use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, RwLock, RwLockReadGuard},
};

/// A diagnostic reporter.
pub struct Reporter {
    kind: ReporterKind,
    map: Option<Arc<RwLock<SourceMap>>>,
}

impl Reporter {
    fn new(kind: ReporterKind) -> Self {
        Self { kind, map: None }
    }

    /// A reporter that swallows every diagnostic.
    pub fn silent() -> Self {
        Self::new(ReporterKind::Silent)
    }

    /// A reporter that collects diagnostics into the given shared buffer.
    pub fn buffer(diagnostics: Buffer) -> Self {
        Self::new(ReporterKind::Buffer(diagnostics))
    }

    /// A reporter that immediately prints diagnostics to the standard error stream.
    pub fn stderr() -> Self {
        Self::new(ReporterKind::Stderr)
    }

    #[must_use]
    pub fn with_map(mut self, map: Arc<RwLock<SourceMap>>) -> Self {
        self.map = Some(map);
        self
    }

    fn map(&self) -> Option<RwLockReadGuard<'_, SourceMap>> {
        self.map.as_ref().map(|map| map.read().unwrap())
    }

    pub(super) fn report(&self, diagnostic: UntaggedDiagnostic) -> ErasedReportedError {
        match &self.kind {
            ReporterKind::Silent => {}
            ReporterKind::Buffer(diagnostics) => {
                diagnostics.lock().unwrap().insert(diagnostic);
            }
            ReporterKind::Stderr => {
                eprintln!("{}", diagnostic.format(self.map().as_deref()));
                eprintln!();
            }
        }

        ErasedReportedError::new()
    }
}

enum ReporterKind {
    Silent,
    Buffer(Buffer),
    Stderr,
}

pub type Buffer = Arc<Mutex<BTreeSet<UntaggedDiagnostic>>>;

/// A witness to a [reported](super::Diagnostic::report) error.
///
/// A value of this type is a proof that an error was reported (neglecting
/// buffering and silent reporters). Using this as an error type instead of
/// let's say `()` makes it harder to accidentally return an error without
/// reporting anything since such a witness can only be constructed by
/// [`Diagnostic::report`](super::Diagnostic::report) or by
/// [`Self::new_unchecked`].
///
/// Values of this type are isomorphic to the zero-sized type `()` and thus
/// memory-wise incredibly cheap. The word _erased_ in the name alludes to the
/// fact that a costly error [`Diagnostic`](super::Diagnostic) has been turned
/// into "nothing in size" (simplifying).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErasedReportedError(());

impl ErasedReportedError {
    const fn new() -> Self {
        Self(())
    }

    pub const fn new_unchecked() -> Self {
        Self::new()
    }
}
