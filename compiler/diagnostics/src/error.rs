//! Error handling mechanisms.
//!
//! Checker-level findings are never errors in the Rust sense: they are
//! reported as [diagnostics](crate::Diagnostic) and analysis continues.
//! [`Result`] only ever transports the witness that something was already
//! reported.

use crate::reporter::ErasedReportedError;

pub type Result<T = (), E = ErasedReportedError> = std::result::Result<T, E>;

/// A value that may have been produced in the presence of reported errors.
#[derive(Debug)]
#[must_use]
pub struct Outcome<T> {
    pub bare: T,
    pub health: Health,
}

impl<T> Outcome<T> {
    pub const fn new(bare: T, health: Health) -> Self {
        Self { bare, health }
    }

    pub const fn untainted(bare: T) -> Self {
        Self::new(bare, Health::Untainted)
    }

    pub const fn tainted(bare: T, error: ErasedReportedError) -> Self {
        Self::new(bare, Health::Tainted(error))
    }
}

pub trait Stain<T> {
    fn stain(self, health: &mut Health) -> T;
}

impl<T> Stain<T> for Outcome<T> {
    fn stain(self, health: &mut Health) -> T {
        *health = health.and(self.health);
        self.bare
    }
}

impl Stain<()> for Result {
    fn stain(self, health: &mut Health) {
        if let Err(error) = self {
            health.taint(error);
        }
    }
}

impl<T> From<Outcome<T>> for Result<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome.health {
            Health::Untainted => Ok(outcome.bare),
            Health::Tainted(error) => Err(error),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[must_use]
pub enum Health {
    #[default]
    Untainted,
    Tainted(ErasedReportedError),
}

impl Health {
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Untainted, Self::Untainted) => Self::Untainted,
            (Self::Tainted(error), _) | (_, Self::Tainted(error)) => Self::Tainted(error),
        }
    }

    pub fn taint(&mut self, error: ErasedReportedError) {
        if *self == Self::Untainted {
            *self = Self::Tainted(error);
        }
    }

    pub fn is_tainted(self) -> bool {
        matches!(self, Self::Tainted(_))
    }
}

impl From<Result> for Health {
    fn from(result: Result) -> Self {
        match result {
            Ok(()) => Self::Untainted,
            Err(error) => Self::Tainted(error),
        }
    }
}

impl From<Health> for Result {
    fn from(health: Health) -> Self {
        match health {
            Health::Untainted => Ok(()),
            Health::Tainted(error) => Err(error),
        }
    }
}
