#![allow(dead_code)]

use approx::assert_relative_eq;
use astromol::catalog::{Catalog, CatalogBuilder};
use astromol::constants::{AtomCount, SourceId, TelescopeId, Year};
use astromol::molecules::{Composition, Element, MoleculeRecord};
use astromol::sources::{Source, SourceType};
use astromol::telescopes::{ActiveWindow, Telescope, TelescopeType};

pub fn composition(pairs: &[(Element, AtomCount)]) -> Composition {
    pairs
        .iter()
        .fold(Composition::new(), |acc, (e, n)| acc.with(*e, *n))
}

pub fn molecule(formula: &str, year: Year, pairs: &[(Element, AtomCount)]) -> MoleculeRecord {
    MoleculeRecord::new(formula, formula, year, composition(pairs))
}

pub fn add_source(builder: &mut CatalogBuilder, name: &str, source_type: SourceType) -> SourceId {
    builder
        .add_source(Source::new(name, source_type))
        .expect("unique source name")
}

pub fn add_telescope(
    builder: &mut CatalogBuilder,
    name: &str,
    built: Year,
    decommissioned: Option<Year>,
) -> TelescopeId {
    let window = ActiveWindow::new(built, decommissioned).expect("valid window");
    builder
        .add_telescope(Telescope::new(name, TelescopeType::SingleDish, window))
        .expect("unique telescope name")
}

/// Three molecules over one dark cloud (S1) and one star-forming region (S2):
/// M1 = CH4 in S1, M2 = C2H2N in S1 and S2, M3 = SiC in S2.
pub fn three_molecule_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    let s1 = add_source(&mut b, "S1", SourceType::DarkCloud);
    let s2 = add_source(&mut b, "S2", SourceType::Sfr);

    b.add_molecule(molecule("CH4", 1993, &[(Element::C, 1), (Element::H, 4)]).with_sources([s1]))
        .expect("M1");
    b.add_molecule(
        molecule(
            "C2H2N",
            1988,
            &[(Element::C, 2), (Element::H, 2), (Element::N, 1)],
        )
        .with_sources([s1, s2]),
    )
    .expect("M2");
    b.add_molecule(molecule("SiC", 1989, &[(Element::Si, 1), (Element::C, 1)]).with_sources([s2]))
        .expect("M3");
    b.build()
}

pub fn assert_values_close(actual: &[f64], expected: &[f64], epsilon: f64) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert_relative_eq!(*a, *e, epsilon = epsilon);
    }
}
