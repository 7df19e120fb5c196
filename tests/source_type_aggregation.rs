use astromol::aggregation::dimensions::{BySourceType, ByWavelength};
use astromol::aggregation::reports::{
    du_per_source_type, mass_per_source_type, molecule_ids_per_source_type,
    molecules_per_source_type,
};
use astromol::aggregation::{aggregate, aggregate_parallel, Collect, Count};
use astromol::catalog::CatalogBuilder;
use astromol::constants::MoleculeId;
use astromol::molecules::{Element, Molecule};
use astromol::report_params::ReportParams;
use astromol::sources::SourceType;
use astromol::telescopes::Wavelength;

mod common;
use common::{add_source, assert_values_close, molecule, three_molecule_catalog};

#[test]
fn test_three_molecule_scenario() {
    let catalog = three_molecule_catalog();
    let tally = molecules_per_source_type(&catalog);

    assert_eq!(tally.count(&SourceType::DarkCloud), 2);
    assert_eq!(tally.count(&SourceType::Sfr), 2);
    assert_eq!(tally.total(), 4);

    let ids = molecule_ids_per_source_type(&catalog);
    assert_eq!(
        ids.get(&SourceType::DarkCloud),
        Some(&vec![MoleculeId(0), MoleculeId(1)])
    );
    assert_eq!(
        ids.get(&SourceType::Sfr),
        Some(&vec![MoleculeId(1), MoleculeId(2)])
    );
}

#[test]
fn test_three_sfr_sources_count_once() {
    let mut b = CatalogBuilder::new();
    let sources = ["Sgr B2", "Orion", "W51"].map(|name| add_source(&mut b, name, SourceType::Sfr));
    b.add_molecule(molecule("CO", 1970, &[(Element::C, 1), (Element::O, 1)]).with_sources(sources))
        .unwrap();
    let catalog = b.build();

    assert_eq!(molecules_per_source_type(&catalog).count(&SourceType::Sfr), 1);

    let masses = aggregate(
        &catalog,
        &BySourceType,
        &Collect(|m: &Molecule| Some(m.mass() as f64)),
    );
    assert_eq!(masses.get(&SourceType::Sfr), Some(&vec![28.0]));
}

#[test]
fn test_multi_group_membership_in_one_pass() {
    let mut b = CatalogBuilder::new();
    let sfr = add_source(&mut b, "Orion", SourceType::Sfr);
    let dark = add_source(&mut b, "TMC-1", SourceType::DarkCloud);
    b.add_molecule(
        molecule("HC3N", 1971, &[(Element::H, 1), (Element::C, 3), (Element::N, 1)])
            .with_sources([sfr, dark])
            .with_wavelengths([Wavelength::Cm, Wavelength::Mm]),
    )
    .unwrap();
    let catalog = b.build();

    let (by_type, by_band) = aggregate_parallel(&catalog, &BySourceType, &ByWavelength, &Count);
    assert_eq!(by_type.count(&SourceType::Sfr), 1);
    assert_eq!(by_type.count(&SourceType::DarkCloud), 1);
    assert_eq!(by_band.count(&Wavelength::Cm), 1);
    assert_eq!(by_band.count(&Wavelength::Mm), 1);
    assert_eq!(by_band.count(&Wavelength::Ir), 0);
}

#[test]
fn test_trim_on_real_group() {
    let mut b = CatalogBuilder::new();
    let sfr = add_source(&mut b, "Sgr B2", SourceType::Sfr);
    for n in 1..=10 {
        b.add_molecule(molecule("Cn", 2000, &[(Element::C, n)]).with_sources([sfr]))
            .unwrap();
    }
    let catalog = b.build();

    let atoms = aggregate(
        &catalog,
        &BySourceType,
        &Collect(|m: &Molecule| Some(f64::from(m.natoms()))),
    )
    .trimmed(0.1);
    assert_values_close(
        atoms.get(&SourceType::Sfr).unwrap(),
        &[2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        1e-12,
    );
}

#[test]
fn test_du_trim_switch() {
    let mut b = CatalogBuilder::new();
    let sfr = add_source(&mut b, "Sgr B2", SourceType::Sfr);
    for n in 1..=10 {
        let cnh2 = molecule("CnH2", 2000, &[(Element::C, n), (Element::H, 2)]);
        b.add_molecule(cnh2.with_sources([sfr])).unwrap();
    }
    let catalog = b.build();

    let untrimmed = du_per_source_type(&catalog, &ReportParams::default());
    assert_eq!(untrimmed.get(&SourceType::Sfr).unwrap().len(), 10);

    let params = ReportParams::builder().trim_du_reports(true).build().unwrap();
    let trimmed = du_per_source_type(&catalog, &params);
    // du = n for CnH2
    assert_values_close(
        trimmed.get(&SourceType::Sfr).unwrap(),
        &[2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        1e-12,
    );
}

#[test]
fn test_repeated_calls_are_identical() {
    let catalog = three_molecule_catalog();
    let params = ReportParams::default();

    assert_eq!(
        molecules_per_source_type(&catalog),
        molecules_per_source_type(&catalog)
    );
    assert_eq!(
        mass_per_source_type(&catalog, &params),
        mass_per_source_type(&catalog, &params)
    );
}
