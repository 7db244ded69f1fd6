//! Utility functionality and definitions.

use std::{ffi::OsStr, fmt, path::Path};

pub use atom::Atom;
pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
pub use smallvec::smallvec;

pub mod atom;
pub mod index_map;
pub mod paint;

pub const FILE_EXTENSION: &str = "arden";

pub type Str = std::borrow::Cow<'static, str>;

pub type SmallVec<T, const N: usize> = smallvec::SmallVec<[T; N]>;

pub fn has_file_extension(path: &Path, required_extension: &str) -> bool {
    path.extension().and_then(OsStr::to_str) == Some(required_extension)
}

pub fn default<T: Default>() -> T {
    T::default()
}

/// Map a value onto `Some(_)` if it matches the pattern.
#[macro_export]
macro_rules! obtain {
    ($expr:expr, $pat:pat $( if $guard:expr )? $(,)? => $mapping:expr $(,)?) => {
        match $expr {
            $pat $( if $guard )? => Some($mapping),
            _ => None,
        }
    };
}

/// Use the singular or the plural form of the given word depending on the given amount.
#[macro_export]
macro_rules! pluralize {
    ($amount:expr, $singular:expr, $plural:expr $(,)?) => {
        match $amount {
            1 => std::borrow::Cow::<'_, str>::from($singular),
            _ => $plural.into(),
        }
    };
    ($amount:expr, $singular:literal $(,)?) => {
        match $amount {
            1 => $singular,
            _ => concat!($singular, "s"),
        }
    };
}

pub trait QuoteExt {
    fn quote(self) -> String;
}

impl<D: fmt::Display> QuoteExt for D {
    fn quote(self) -> String {
        format!("‘{self}’")
    }
}
