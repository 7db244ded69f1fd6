//! The state shared by the analysis passes of a single run.

use diagnostics::Reporter;
use std::{fmt, str::FromStr};
use utility::Atom;

/// The session of a single analysis run.
///
/// Each file is analyzed under its own session, nothing is shared across
/// files.
pub struct Session<'a> {
    pub features: Features,
    pub reporter: &'a Reporter,
    /// Best-effort symbol search index, only consumed by presentation
    /// adapters. The analysis passes never read it.
    pub index: Option<&'a dyn SymbolSearchIndex>,
}

impl<'a> Session<'a> {
    pub fn new(features: Features, reporter: &'a Reporter) -> Self {
        Self {
            features,
            reporter,
            index: None,
        }
    }
}

/// A language-version feature flag.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Feature {
    /// Interface default implementations do not discharge abstract
    /// obligations that originate in a class supertype the interface does
    /// not itself extend.
    ProhibitInvisibleAbstractMethodsInSuperclasses,
}

impl Feature {
    pub const fn name(self) -> &'static str {
        match self {
            Self::ProhibitInvisibleAbstractMethodsInSuperclasses => {
                "ProhibitInvisibleAbstractMethodsInSuperclasses"
            }
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = ();

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        match source {
            "ProhibitInvisibleAbstractMethodsInSuperclasses" => {
                Ok(Self::ProhibitInvisibleAbstractMethodsInSuperclasses)
            }
            _ => Err(()),
        }
    }
}

/// The set of enabled language-version features.
///
/// Every feature is disabled by default and enabled through the directive
/// block of a conformance test or a caller of the driver.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Features {
    pub prohibit_invisible_abstract_methods_in_superclasses: bool,
}

impl Features {
    pub fn apply(&mut self, feature: Feature, enabled: bool) {
        match feature {
            Feature::ProhibitInvisibleAbstractMethodsInSuperclasses => {
                self.prohibit_invisible_abstract_methods_in_superclasses = enabled;
            }
        }
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::ProhibitInvisibleAbstractMethodsInSuperclasses => {
                self.prohibit_invisible_abstract_methods_in_superclasses
            }
        }
    }
}

/// Read-only access to a project-wide symbol search index.
///
/// The counts are backed by an external project index and may be stale or
/// unavailable. Consumers are presentation adapters only.
pub trait SymbolSearchIndex: Sync {
    fn count_references(&self, name: Atom) -> Option<usize>;

    fn count_overriding_members(&self, name: Atom) -> Option<usize>;
}

#[cfg(test)]
mod test {
    use super::{Feature, Features};

    #[test]
    fn feature_name_round_trip() {
        let feature = Feature::ProhibitInvisibleAbstractMethodsInSuperclasses;
        assert_eq!(feature.name().parse(), Ok(feature));
    }

    #[test]
    fn features_default_to_disabled() {
        let features = Features::default();
        assert!(!features.is_enabled(Feature::ProhibitInvisibleAbstractMethodsInSuperclasses));
    }

    #[test]
    fn applying_a_feature_enables_it() {
        let mut features = Features::default();
        features.apply(Feature::ProhibitInvisibleAbstractMethodsInSuperclasses, true);
        assert!(features.is_enabled(Feature::ProhibitInvisibleAbstractMethodsInSuperclasses));
    }
}
