use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    astromol_errors::AstromolError,
    constants::{AtomCount, Mass},
};

/// Chemical elements present in the census.
///
/// The declaration order is the reporting order used by element-grouped tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    H,
    He,
    C,
    N,
    O,
    F,
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    Ar,
    K,
    Ca,
    Ti,
    V,
    Fe,
}

impl Element {
    pub const ALL: [Element; 19] = [
        Element::H,
        Element::He,
        Element::C,
        Element::N,
        Element::O,
        Element::F,
        Element::Na,
        Element::Mg,
        Element::Al,
        Element::Si,
        Element::P,
        Element::S,
        Element::Cl,
        Element::Ar,
        Element::K,
        Element::Ca,
        Element::Ti,
        Element::V,
        Element::Fe,
    ];

    /// Elements whose presence makes the degree of unsaturation undefined.
    pub const EXOTIC: [Element; 12] = [
        Element::Si,
        Element::Mg,
        Element::Na,
        Element::Al,
        Element::K,
        Element::Fe,
        Element::Ti,
        Element::Ar,
        Element::P,
        Element::He,
        Element::V,
        Element::Ca,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::He => "He",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::Al => "Al",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Ar => "Ar",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Ti => "Ti",
            Element::V => "V",
            Element::Fe => "Fe",
        }
    }

    /// Integer nominal mass of the most abundant isotope (amu).
    ///
    /// Ar uses 36 rather than 40: the only argon-bearing species in the census is ³⁶ArH⁺.
    pub fn nominal_mass(&self) -> Mass {
        match self {
            Element::H => 1,
            Element::He => 4,
            Element::C => 12,
            Element::N => 14,
            Element::O => 16,
            Element::F => 19,
            Element::Na => 23,
            Element::Mg => 24,
            Element::Al => 27,
            Element::Si => 28,
            Element::P => 31,
            Element::S => 32,
            Element::Cl => 35,
            Element::Ar => 36,
            Element::K => 39,
            Element::Ca => 40,
            Element::Ti => 48,
            Element::V => 51,
            Element::Fe => 56,
        }
    }

    pub fn is_exotic(&self) -> bool {
        Element::EXOTIC.contains(self)
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Element {
    type Err = AstromolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim();
        Element::ALL
            .iter()
            .find(|e| e.symbol() == symbol)
            .copied()
            .ok_or_else(|| AstromolError::UnknownElement(symbol.to_string()))
    }
}

/// Elemental composition of a molecule: element → number of atoms.
///
/// Elements with a zero count are never stored, so two compositions describing the same
/// formula compare equal regardless of how they were built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Composition {
    counts: std::collections::BTreeMap<Element, AtomCount>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` atoms of `element`. The per-element count saturates at `AtomCount::MAX`;
    /// use [`Composition::try_from_counts`] to reject overflow instead.
    pub fn with(mut self, element: Element, count: AtomCount) -> Self {
        if count > 0 {
            let slot = self.counts.entry(element).or_insert(0);
            *slot = slot.saturating_add(count);
        }
        self
    }

    /// Build a composition from signed counts, as found in untyped fixture data.
    ///
    /// Arguments
    /// -----------------
    /// * `counts`: `(element, count)` pairs; the same element may appear several times.
    ///
    /// Return
    /// ----------
    /// * The composition, or [`AstromolError::NegativeElementCount`] on the first negative count.
    ///   Negative counts are never clamped to zero.
    /// * [`AstromolError::ElementCountOverflow`] when an element's total exceeds `AtomCount::MAX`.
    pub fn try_from_counts<I>(counts: I) -> Result<Self, AstromolError>
    where
        I: IntoIterator<Item = (Element, i64)>,
    {
        let mut composition = Composition::new();
        for (element, count) in counts {
            let count = AtomCount::try_from(count).map_err(|_| {
                AstromolError::NegativeElementCount {
                    element: element.symbol().to_string(),
                    count,
                }
            })?;
            if composition.count(element).checked_add(count).is_none() {
                return Err(AstromolError::ElementCountOverflow(element.symbol().to_string()));
            }
            composition = composition.with(element, count);
        }
        Ok(composition)
    }

    pub fn count(&self, element: Element) -> AtomCount {
        self.counts.get(&element).copied().unwrap_or(0)
    }

    pub fn contains(&self, element: Element) -> bool {
        self.count(element) > 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, AtomCount)> + '_ {
        self.counts.iter().map(|(e, n)| (*e, *n))
    }

    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.counts.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod element_test {
    use super::*;

    #[test]
    fn test_parse_symbol() {
        assert_eq!("Cl".parse::<Element>(), Ok(Element::Cl));
        assert_eq!(" He ".parse::<Element>(), Ok(Element::He));
        assert_eq!(
            "Xx".parse::<Element>(),
            Err(AstromolError::UnknownElement("Xx".into()))
        );
    }

    #[test]
    fn test_composition_ignores_zero_counts() {
        let a = Composition::new().with(Element::C, 1).with(Element::N, 0);
        let b = Composition::new().with(Element::C, 1);
        assert_eq!(a, b);
        assert!(!a.contains(Element::N));
    }

    #[test]
    fn test_composition_accumulates_repeated_elements() {
        let ethanol = Composition::new()
            .with(Element::C, 1)
            .with(Element::H, 3)
            .with(Element::C, 1)
            .with(Element::H, 2)
            .with(Element::O, 1)
            .with(Element::H, 1);
        assert_eq!(ethanol.count(Element::C), 2);
        assert_eq!(ethanol.count(Element::H), 6);
    }

    #[test]
    fn test_count_overflow() {
        let saturated = Composition::new()
            .with(Element::Fe, AtomCount::MAX)
            .with(Element::Fe, 2);
        assert_eq!(saturated.count(Element::Fe), AtomCount::MAX);

        let max = i64::from(AtomCount::MAX);
        assert_eq!(
            Composition::try_from_counts([(Element::Fe, max), (Element::Fe, 1)]),
            Err(AstromolError::ElementCountOverflow("Fe".into()))
        );
        assert_eq!(
            Composition::try_from_counts([(Element::Fe, max + 1)]),
            Err(AstromolError::ElementCountOverflow("Fe".into()))
        );
    }

    #[test]
    fn test_negative_count_fails_fast() {
        let err = Composition::try_from_counts([(Element::C, 2), (Element::H, -1)]).unwrap_err();
        assert_eq!(
            err,
            AstromolError::NegativeElementCount {
                element: "H".into(),
                count: -1
            }
        );
    }
}
