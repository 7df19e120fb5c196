//! # CSV fixture loader
//!
//! Builds a [`Catalog`] from three comma-separated tables. Names are resolved to identities
//! once, while rows are ingested; no other part of the crate ever looks a source or telescope
//! up by name.
//!
//! Tables
//! -----------------
//! * `sources.csv`: `name,type,ra,dec`
//! * `telescopes.csv`: `name,type,wavelengths,built,decommissioned`
//! * `molecules.csv`: `name,formula,year,atoms,sources,telescopes,wavelengths,neutral,cation,
//!   anion,radical,cyclic,fullerene,pah,a,b,c,mu_a,mu_b,mu_c,ice,ppd,exgal,exo,exgal_sources`
//!
//! List cells (`sources`, `telescopes`, `wavelengths`, `exgal_sources`) are `;`-separated.
//! The `atoms` cell is a `;`-separated list of `Symbol:count` pairs; when it is empty the
//! composition is parsed from `formula` instead. Empty numeric cells mean "not measured".
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use astromol::fixtures::load_catalog;
//!
//! let catalog = load_catalog(Utf8Path::new("tests/data"))?;
//! println!("{} molecules", catalog.molecules().len());
//! # Ok::<(), astromol::astromol_errors::AstromolError>(())
//! ```
use std::fs::File;
use std::io;

use camino::Utf8Path;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::astromol_errors::AstromolError;
use crate::catalog::{Catalog, CatalogBuilder};
use crate::constants::{Debye, MHz, Year};
use crate::molecules::formula::parse_formula;
use crate::molecules::{
    Composition, Detection, DipoleMoments, Element, EnvironmentDetections, MoleculeRecord,
    RotationalConstants, StructuralFlags,
};
use crate::sources::{Coordinates, Source, SourceType};
use crate::telescopes::{ActiveWindow, Telescope, TelescopeType, Wavelength};

pub const SOURCES_FILE: &str = "sources.csv";
pub const TELESCOPES_FILE: &str = "telescopes.csv";
pub const MOLECULES_FILE: &str = "molecules.csv";

#[derive(Debug, Deserialize)]
struct SourceRow {
    name: String,
    #[serde(rename = "type")]
    source_type: String,
    ra: Option<f64>,
    dec: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TelescopeRow {
    name: String,
    #[serde(rename = "type")]
    telescope_type: String,
    #[serde(default)]
    wavelengths: String,
    built: Year,
    decommissioned: Option<Year>,
}

#[derive(Debug, Deserialize)]
struct MoleculeRow {
    name: String,
    formula: String,
    year: Year,
    #[serde(default)]
    atoms: String,
    #[serde(default)]
    sources: String,
    #[serde(default)]
    telescopes: String,
    #[serde(default)]
    wavelengths: String,
    neutral: Option<bool>,
    cation: Option<bool>,
    anion: Option<bool>,
    radical: Option<bool>,
    cyclic: Option<bool>,
    fullerene: Option<bool>,
    pah: Option<bool>,
    a: Option<MHz>,
    b: Option<MHz>,
    c: Option<MHz>,
    mu_a: Option<Debye>,
    mu_b: Option<Debye>,
    mu_c: Option<Debye>,
    #[serde(default)]
    ice: String,
    #[serde(default)]
    ppd: String,
    #[serde(default)]
    exgal: String,
    #[serde(default)]
    exo: String,
    #[serde(default)]
    exgal_sources: String,
}

fn reader<R: io::Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr)
}

/// Split a `;`-separated cell, skipping empty items.
fn split_list<'a>(cell: &'a str, column: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let trailing_ok = cell.trim().is_empty();
    cell.split(';').map(str::trim).filter(move |item| {
        if item.is_empty() {
            if !trailing_ok {
                warn!(column, cell, "skipping empty list item");
            }
            return false;
        }
        true
    })
}

fn parse_atoms(cell: &str) -> Result<Composition, AstromolError> {
    let mut counts = Vec::new();
    for pair in split_list(cell, "atoms") {
        let (symbol, count) = pair
            .split_once(':')
            .ok_or_else(|| AstromolError::InvalidFormula(pair.to_string()))?;
        let element: Element = symbol.parse()?;
        let count: i64 = count
            .trim()
            .parse()
            .map_err(|_| AstromolError::InvalidFormula(pair.to_string()))?;
        counts.push((element, count));
    }
    Composition::try_from_counts(counts)
}

fn parse_wavelengths(cell: &str) -> Result<Vec<Wavelength>, AstromolError> {
    split_list(cell, "wavelengths").map(str::parse).collect()
}

/// Register every row of a sources table.
pub fn read_sources<R: io::Read>(
    rdr: R,
    builder: &mut CatalogBuilder,
) -> Result<usize, AstromolError> {
    let mut n = 0;
    for row in reader(rdr).deserialize() {
        let row: SourceRow = row?;
        let source_type: SourceType = row.source_type.parse()?;
        let mut source = Source::new(row.name, source_type);
        match (row.ra, row.dec) {
            (Some(ra), Some(dec)) => source = source.with_coordinates(Coordinates::new(ra, dec)?),
            (None, None) => {}
            _ => {
                return Err(AstromolError::InvalidCoordinates(format!(
                    "{}: ra and dec must be given together",
                    source.name
                )))
            }
        }
        builder.add_source(source)?;
        n += 1;
    }
    Ok(n)
}

/// Register every row of a telescopes table.
pub fn read_telescopes<R: io::Read>(
    rdr: R,
    builder: &mut CatalogBuilder,
) -> Result<usize, AstromolError> {
    let mut n = 0;
    for row in reader(rdr).deserialize() {
        let row: TelescopeRow = row?;
        let telescope_type: TelescopeType = row.telescope_type.parse()?;
        let window = ActiveWindow::new(row.built, row.decommissioned)?;
        let telescope = Telescope::new(row.name, telescope_type, window)
            .with_wavelengths(parse_wavelengths(&row.wavelengths)?);
        builder.add_telescope(telescope)?;
        n += 1;
    }
    Ok(n)
}

/// Register every row of a molecules table.
///
/// Sources and telescopes must already be registered: each name in the `sources` and
/// `telescopes` cells is resolved through the builder.
///
/// Errors
/// ----------
/// * [`AstromolError::SourceNameNotFound`] / [`AstromolError::TelescopeNameNotFound`] for an
///   unregistered name.
/// * Any parse error of a closed category (element, wavelength, detection flag).
pub fn read_molecules<R: io::Read>(
    rdr: R,
    builder: &mut CatalogBuilder,
) -> Result<usize, AstromolError> {
    let mut n = 0;
    for row in reader(rdr).deserialize() {
        let row: MoleculeRow = row?;
        let record = molecule_record(row, builder)?;
        builder.add_molecule(record)?;
        n += 1;
    }
    Ok(n)
}

fn molecule_record(
    row: MoleculeRow,
    builder: &CatalogBuilder,
) -> Result<MoleculeRecord, AstromolError> {
    let composition = if row.atoms.trim().is_empty() {
        parse_formula(&row.formula)?
    } else {
        parse_atoms(&row.atoms)?
    };

    let sources = split_list(&row.sources, "sources")
        .map(|name| builder.source_id(name))
        .collect::<Result<Vec<_>, _>>()?;
    let telescopes = split_list(&row.telescopes, "telescopes")
        .map(|name| builder.telescope_id(name))
        .collect::<Result<Vec<_>, _>>()?;

    let flags = StructuralFlags {
        neutral: row.neutral.unwrap_or(false),
        cation: row.cation.unwrap_or(false),
        anion: row.anion.unwrap_or(false),
        radical: row.radical.unwrap_or(false),
        cyclic: row.cyclic.unwrap_or(false),
        fullerene: row.fullerene.unwrap_or(false),
        pah: row.pah.unwrap_or(false),
    };

    let environments = EnvironmentDetections {
        ice: row.ice.parse::<Detection>()?,
        ppd: row.ppd.parse::<Detection>()?,
        exgal: row.exgal.parse::<Detection>()?,
        exo: row.exo.parse::<Detection>()?,
    };

    Ok(
        MoleculeRecord::new(row.name, row.formula, row.year, composition)
            .with_sources(sources)
            .with_telescopes(telescopes)
            .with_wavelengths(parse_wavelengths(&row.wavelengths)?)
            .with_flags(flags)
            .with_rotational_constants(RotationalConstants::new(row.a, row.b, row.c)?)
            .with_dipole_moments(DipoleMoments::new(row.mu_a, row.mu_b, row.mu_c)?)
            .with_environments(environments)
            .with_external_galaxies(split_list(&row.exgal_sources, "exgal_sources")),
    )
}

/// Load the three tables from explicit paths.
pub fn load_catalog_from(
    sources: &Utf8Path,
    telescopes: &Utf8Path,
    molecules: &Utf8Path,
) -> Result<Catalog, AstromolError> {
    let mut builder = CatalogBuilder::new();
    let n_sources = read_sources(File::open(sources)?, &mut builder)?;
    let n_telescopes = read_telescopes(File::open(telescopes)?, &mut builder)?;
    let n_molecules = read_molecules(File::open(molecules)?, &mut builder)?;
    debug!(
        n_sources,
        n_telescopes, n_molecules, "fixture tables loaded"
    );
    Ok(builder.build())
}

/// Load `sources.csv`, `telescopes.csv` and `molecules.csv` from a directory.
pub fn load_catalog(dir: &Utf8Path) -> Result<Catalog, AstromolError> {
    load_catalog_from(
        &dir.join(SOURCES_FILE),
        &dir.join(TELESCOPES_FILE),
        &dir.join(MOLECULES_FILE),
    )
}
