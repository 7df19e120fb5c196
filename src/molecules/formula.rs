//! Molecular formula parsing.
//!
//! Turns catalog-style formulas such as `CH3CH2OH`, `l-C3H+` or `NH3D+` into a [`Composition`].
//! A leading isomer or configuration prefix (`l-`, `c-`, `i-`, `E-`, ...) and a trailing charge
//! are ignored. Deuterium is counted as hydrogen. Parenthesised groups are not supported.
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::astromol_errors::AstromolError;

use super::{Composition, Element};

static ELEMENT_TOKEN: OnceCell<Regex> = OnceCell::new();

fn element_token() -> Result<&'static Regex, AstromolError> {
    ELEMENT_TOKEN
        .get_or_try_init(|| Regex::new(r"([A-Z][a-z]?)(\d*)"))
        .map_err(|e| AstromolError::InvalidFormula(e.to_string()))
}

/// Remove the isomer prefix and the charge suffix.
fn strip_decorations(formula: &str) -> &str {
    let mut core = formula.trim();
    if let Some((prefix, rest)) = core.split_once('-') {
        if !rest.is_empty()
            && prefix.len() <= 4
            && prefix.chars().all(|c| c.is_ascii_alphanumeric())
        {
            core = rest;
        }
    }
    core.trim_end_matches(['+', '-'])
}

/// Parse a molecular formula into its elemental composition.
///
/// Arguments
/// -----------------
/// * `formula`: The formula as written in the catalog.
///
/// Return
/// ----------
/// * The composition, or [`AstromolError::InvalidFormula`] if some characters are not part of an
///   element token, or [`AstromolError::UnknownElement`] for an unsupported symbol.
pub fn parse_formula(formula: &str) -> Result<Composition, AstromolError> {
    let core = strip_decorations(formula);
    if core.is_empty() {
        return Err(AstromolError::InvalidFormula(formula.to_string()));
    }

    let mut composition = Composition::new();
    let mut covered = 0;
    for caps in element_token()?.captures_iter(core) {
        let (Some(whole), Some(symbol), Some(digits)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if whole.start() != covered {
            return Err(AstromolError::InvalidFormula(formula.to_string()));
        }
        covered = whole.end();

        let element = match symbol.as_str() {
            "D" => Element::H,
            other => other.parse::<Element>()?,
        };
        let count = match digits.as_str() {
            "" => 1,
            n => n
                .parse()
                .map_err(|_| AstromolError::InvalidFormula(formula.to_string()))?,
        };
        composition = composition.with(element, count);
    }

    if covered != core.len() {
        return Err(AstromolError::InvalidFormula(formula.to_string()));
    }
    Ok(composition)
}

#[cfg(test)]
mod formula_test {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let c = parse_formula("CH3CH2OH").unwrap();
        assert_eq!(c.count(Element::C), 2);
        assert_eq!(c.count(Element::H), 6);
        assert_eq!(c.count(Element::O), 1);
    }

    #[test]
    fn test_parse_two_letter_symbols() {
        let c = parse_formula("NaCl").unwrap();
        assert_eq!(c.count(Element::Na), 1);
        assert_eq!(c.count(Element::Cl), 1);
        assert_eq!(c.count(Element::C), 0);
    }

    #[test]
    fn test_parse_ignores_prefix_and_charge() {
        assert_eq!(parse_formula("l-C3H+").unwrap(), parse_formula("C3H").unwrap());
        assert_eq!(parse_formula("c-C3H2").unwrap(), parse_formula("C3H2").unwrap());
        assert_eq!(
            parse_formula("C4H-").unwrap(),
            Composition::new().with(Element::C, 4).with(Element::H, 1)
        );
    }

    #[test]
    fn test_deuterium_counts_as_hydrogen() {
        assert_eq!(parse_formula("NH3D+").unwrap().count(Element::H), 4);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            parse_formula("(CH3)2O"),
            Err(AstromolError::InvalidFormula("(CH3)2O".into()))
        );
        assert_eq!(parse_formula(""), Err(AstromolError::InvalidFormula("".into())));
        assert_eq!(
            parse_formula("XeF2"),
            Err(AstromolError::UnknownElement("Xe".into()))
        );
    }
}
