//! # Evaluation environment
//!
//! This module defines [`EvaluationEnv`], the small piece of ambient state the facility
//! statistics need: **what year is "now"**.
//!
//! A telescope whose decommissioning year is unknown is considered active up to the evaluation
//! year. That year is resolved **at call time**, never when the catalog is built, so results
//! computed from [`EvaluationEnv::system_clock`] drift as the calendar moves. Tests and
//! reproducible reports pin it with [`EvaluationEnv::fixed`].
//!
//! ## Usage
//!
//! ```rust
//! use astromol::env_state::EvaluationEnv;
//!
//! let env = EvaluationEnv::fixed(2018);
//! assert_eq!(env.current_year().unwrap(), 2018);
//! ```
//!
//! ## See also
//!
//! - [`hifitime::Epoch::now`] – System clock read used by [`EvaluationEnv::system_clock`].
//! - [`ActiveWindow`](crate::telescopes::ActiveWindow) – Consumer of the resolved year.
use hifitime::Epoch;

use crate::{astromol_errors::AstromolError, constants::Year};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationEnv {
    fixed_year: Option<Year>,
}

impl EvaluationEnv {
    /// Resolve "now" from the system clock each time it is asked.
    pub fn system_clock() -> Self {
        EvaluationEnv { fixed_year: None }
    }

    /// Pin "now" to a given year.
    pub fn fixed(year: Year) -> Self {
        EvaluationEnv {
            fixed_year: Some(year),
        }
    }

    /// The evaluation year.
    ///
    /// Return
    /// ----------
    /// * The pinned year, or the current UTC Gregorian year read through [`hifitime`].
    ///
    /// Errors
    /// ----------
    /// * [`AstromolError::ClockError`] if the system clock cannot be read.
    pub fn current_year(&self) -> Result<Year, AstromolError> {
        match self.fixed_year {
            Some(year) => Ok(year),
            None => {
                let now = Epoch::now().map_err(|e| AstromolError::ClockError(e.to_string()))?;
                Ok(now.year())
            }
        }
    }
}

#[cfg(test)]
mod env_state_test {
    use super::*;

    #[test]
    fn test_fixed_year() {
        assert_eq!(EvaluationEnv::fixed(1999).current_year(), Ok(1999));
    }

    #[test]
    fn test_system_clock_is_recent() {
        let year = EvaluationEnv::system_clock().current_year().unwrap();
        assert!(year >= 2024);
    }
}
