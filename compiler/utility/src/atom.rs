//! Interned strings.

use crate::{
    index_map::{Index, IndexMap},
    HashMap,
};
use std::{
    fmt,
    sync::{LazyLock, Mutex},
};

/// An interned string.
///
/// Comparison by index is fast but string-order comparisons need to go
/// through [`Self::to_str`] explicitly.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atom(u32);

impl Atom {
    pub fn to_str(self) -> &'static str {
        Interner::the().lock().unwrap().get(self)
    }
}

impl From<&str> for Atom {
    fn from(value: &str) -> Self {
        Interner::the().lock().unwrap().intern_borrowed(value)
    }
}

impl From<String> for Atom {
    fn from(value: String) -> Self {
        Interner::the().lock().unwrap().intern_owned(value)
    }
}

impl Index for Atom {
    fn new(index: usize) -> Self {
        Self(index.try_into().unwrap())
    }

    fn value(self) -> usize {
        self.0 as _
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

struct Interner {
    atoms: HashMap<&'static str, Atom>,
    strings: IndexMap<Atom, &'static str>,
}

impl Interner {
    fn the() -> &'static Mutex<Self> {
        static SELF: LazyLock<Mutex<Interner>> = LazyLock::new(|| {
            Mutex::new(Interner {
                atoms: HashMap::default(),
                strings: IndexMap::new(),
            })
        });

        &SELF
    }

    fn intern_borrowed(&mut self, value: &str) -> Atom {
        if let Some(&atom) = self.atoms.get(value) {
            return atom;
        }

        self.insert(Box::leak(Box::from(value)))
    }

    fn intern_owned(&mut self, value: String) -> Atom {
        if let Some(&atom) = self.atoms.get(&*value) {
            return atom;
        }

        self.insert(String::leak(value))
    }

    fn insert(&mut self, value: &'static str) -> Atom {
        let atom = self.strings.insert(value);
        self.atoms.insert(value, atom);
        atom
    }

    fn get(&self, atom: Atom) -> &'static str {
        self.strings[atom]
    }
}

#[cfg(test)]
mod test {
    use super::Atom;

    #[test]
    fn interning_is_idempotent() {
        assert_eq!(Atom::from("frobnicate"), Atom::from("frobnicate"));
    }

    #[test]
    fn distinct_strings_intern_distinctly() {
        assert_ne!(Atom::from("alpha-test"), Atom::from("beta-test"));
    }

    #[test]
    fn round_trip() {
        assert_eq!(Atom::from("Case1").to_str(), "Case1");
    }
}
