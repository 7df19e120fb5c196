use approx::assert_relative_eq;
use camino::Utf8Path;

use astromol::aggregation::reports::{
    detections_per_external_galaxy, environment_detections, molecules_per_source_type,
    structural_totals,
};
use astromol::env_state::EvaluationEnv;
use astromol::fixtures::{load_catalog, load_catalog_from};
use astromol::molecules::{Detection, Environment, StructuralKind};
use astromol::sources::SourceType;
use astromol::telescopes::facility_stats::facility_detections;
use astromol::AstromolError;

#[test]
fn test_load_census_tables() {
    let catalog = load_catalog(Utf8Path::new("tests/data")).unwrap();

    assert_eq!(catalog.sources().len(), 7);
    assert_eq!(catalog.telescopes().len(), 6);
    assert_eq!(catalog.molecules().len(), 10);

    let per_type = molecules_per_source_type(&catalog);
    assert_eq!(per_type.count(&SourceType::Sfr), 5);
    assert_eq!(per_type.count(&SourceType::DarkCloud), 3);
    assert_eq!(per_type.count(&SourceType::CarbonStar), 2);
    assert_eq!(per_type.count(&SourceType::Pdr), 1);
    assert_eq!(per_type.count(&SourceType::Pn), 1);
    assert_eq!(per_type.count(&SourceType::Snr), 0);
}

#[test]
fn test_census_back_references() {
    let catalog = load_catalog(Utf8Path::new("tests/data")).unwrap();

    let sgrb2 = catalog.source_id("Sgr B2").unwrap();
    assert_eq!(catalog.source_detections(sgrb2), Ok(4));

    let nrao36 = catalog.telescope_id("NRAO 36-ft").unwrap();
    assert_eq!(catalog.telescope_detections(nrao36), Ok(4));
    // c-C3H2 (1985) came after the 36-ft was retired
    assert_eq!(
        facility_detections(&catalog, nrao36, &(1960..=2030), &EvaluationEnv::fixed(2024)),
        Ok(3)
    );
}

#[test]
fn test_census_derived_values() {
    let catalog = load_catalog(Utf8Path::new("tests/data")).unwrap();

    let methanol = catalog.find_by_formula("CH3OH").unwrap();
    assert_eq!(methanol.len(), 1);
    let m = catalog.molecule(methanol[0]).unwrap();
    assert_eq!(m.natoms(), 6);
    assert_eq!(m.mass(), 32);
    assert_relative_eq!(
        m.kappa().unwrap(),
        (2.0 * 24690.2 - 127523.4 - 23759.7) / (127523.4 - 23759.7),
        epsilon = 1e-12
    );

    let sic2 = catalog.find_by_formula("SiC2").unwrap();
    assert_eq!(catalog.molecule(sic2[0]).unwrap().du(), None);

    let anion = catalog.find_by_formula("C4H").unwrap();
    assert_eq!(catalog.molecule(anion[0]).unwrap().du(), Some(4.5));
}

#[test]
fn test_census_category_reports() {
    let catalog = load_catalog(Utf8Path::new("tests/data")).unwrap();

    let galaxies = detections_per_external_galaxy(&catalog);
    assert_eq!(galaxies.count(&"M82".to_string()), 3);
    assert_eq!(galaxies.count(&"NGC 253".to_string()), 3);
    assert_eq!(galaxies.count(&"LMC".to_string()), 2);

    let envs = environment_detections(&catalog);
    assert_eq!(envs.count(&(Environment::ExternalGalaxy, Detection::Tentative)), 1);
    assert_eq!(envs.count(&(Environment::ExoplanetAtmosphere, Detection::Confirmed)), 1);
    assert_eq!(envs.count(&(Environment::Ice, Detection::Confirmed)), 2);

    let totals = structural_totals(&catalog);
    assert_eq!(totals.count(&StructuralKind::Cyclic), 2);
    assert_eq!(totals.count(&StructuralKind::Anion), 1);
    assert_eq!(totals.count(&StructuralKind::Cation), 1);
}

#[test]
fn test_missing_table() {
    let dir = Utf8Path::new("tests/data");
    let result = load_catalog_from(
        &dir.join("sources.csv"),
        &dir.join("telescopes.csv"),
        &dir.join("no_such_table.csv"),
    );
    assert!(matches!(result, Err(AstromolError::IoError(_))));
}
