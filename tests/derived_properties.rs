use approx::assert_relative_eq;
use astromol::catalog::CatalogBuilder;
use astromol::molecules::{Element, Molecule, RotationalConstants};

mod common;
use common::molecule;

fn census() -> Vec<Molecule> {
    let mut b = CatalogBuilder::new();
    let rows: &[(&str, &[(Element, u32)])] = &[
        ("CH3OH", &[(Element::C, 1), (Element::H, 4), (Element::O, 1)]),
        ("HC11N", &[(Element::H, 1), (Element::C, 11), (Element::N, 1)]),
        ("CH2Cl2", &[(Element::C, 1), (Element::H, 2), (Element::Cl, 2)]),
        ("C60", &[(Element::C, 60)]),
        ("SiC2", &[(Element::Si, 1), (Element::C, 2)]),
        ("MgNC", &[(Element::Mg, 1), (Element::N, 1), (Element::C, 1)]),
        ("FeCN", &[(Element::Fe, 1), (Element::C, 1), (Element::N, 1)]),
        ("H2O", &[(Element::H, 2), (Element::O, 1)]),
    ];
    for (formula, pairs) in rows {
        b.add_molecule(molecule(formula, 2000, pairs)).unwrap();
    }
    b.build().molecules().to_vec()
}

#[test]
fn test_natoms_is_sum_of_counts() {
    for m in census() {
        let sum: u32 = m.composition().iter().map(|(_, n)| n).sum();
        assert_eq!(m.natoms(), sum, "{}", m.formula());
    }
}

#[test]
fn test_du_defined_for_plain_carbon_species() {
    for m in census() {
        let c = m.count(Element::C);
        let exotic = m.composition().elements().any(|e| e.is_exotic());
        if c > 0 && !exotic {
            let n = m.count(Element::N);
            let max_du = m.max_du().unwrap();
            assert_relative_eq!(max_du, 1.0 + 0.5 * f64::from(2 * c + n));
            assert!(max_du > 0.0);
            assert!(m.relative_du().unwrap().is_finite());
        } else {
            assert_eq!(m.du(), None, "{}", m.formula());
            assert_eq!(m.max_du(), None);
        }
    }
}

#[test]
fn test_exotic_du_absent_not_zero() {
    let molecules = census();
    let sic2 = molecules.iter().find(|m| m.formula() == "SiC2").unwrap();
    assert_eq!(sic2.du(), None);
    assert_ne!(sic2.du(), Some(0.0));

    let ch3oh = molecules.iter().find(|m| m.formula() == "CH3OH").unwrap();
    assert_eq!(ch3oh.du(), Some(0.0));
}

#[test]
fn test_kappa_from_record() {
    let mut b = CatalogBuilder::new();
    let rot = RotationalConstants::new(Some(57_000.0), Some(11_000.0), Some(9_000.0)).unwrap();
    let c3h2 = molecule("c-C3H2", 1985, &[(Element::C, 3), (Element::H, 2)]);
    b.add_molecule(c3h2.with_rotational_constants(rot)).unwrap();
    b.add_molecule(molecule("CO", 1970, &[(Element::C, 1), (Element::O, 1)]))
        .unwrap();
    let catalog = b.build();

    let kappa = catalog.molecules()[0].kappa().unwrap();
    assert_relative_eq!(kappa, (22_000.0 - 66_000.0) / 48_000.0);
    assert!((-1.0..=1.0).contains(&kappa));
    assert_eq!(catalog.molecules()[1].kappa(), None);
}

#[test]
fn test_rederive_matches_stored() {
    for m in census() {
        assert_eq!(&m.rederive(), m.derived());
    }
}
