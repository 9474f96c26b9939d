//! Dual-regime evaluation.
//!
//! [`TaxEngine`] validates a [`TaxInput`], runs both regime calculators and
//! recommends the cheaper regime.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use regime_core::{AgeBand, Deductions, EmploymentType, Regime, TaxInput, evaluate};
//!
//! let input = TaxInput::new(
//!     dec!(1200000),
//!     EmploymentType::Salaried,
//!     AgeBand::BelowSixty,
//!     Deductions {
//!         section_80c: dec!(150000),
//!         section_80d: dec!(25000),
//!         home_loan_interest: dec!(200000),
//!         ..Default::default()
//!     },
//! );
//!
//! let comparison = evaluate(&input).unwrap();
//!
//! assert_eq!(comparison.old.total_tax, dec!(70200));
//! assert_eq!(comparison.new.total_tax, dec!(85800));
//! assert_eq!(comparison.recommended_regime, Regime::Old);
//! assert_eq!(comparison.savings, dec!(15600));
//! ```

use tracing::{debug, warn};

use crate::calculations::regimes::{NewRegimeCalculator, OldRegimeCalculator};
use crate::calculations::rules::RuleTable;
use crate::{Comparison, Regime, RegimeResult, TaxInput, TaxInputError};

/// Evaluates tax inputs against a borrowed [`RuleTable`].
///
/// The engine holds no state besides the rules, so one instance can serve
/// any number of evaluations, from any number of threads.
#[derive(Debug, Clone)]
pub struct TaxEngine<'a> {
    rules: &'a RuleTable,
}

impl<'a> TaxEngine<'a> {
    /// Creates an engine over `rules`.
    ///
    /// The table is used as given; call [`RuleTable::validate`] first when it
    /// comes from outside the program.
    pub fn new(rules: &'a RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        self.rules
    }

    /// Computes both regimes for `input` and recommends one.
    ///
    /// # Errors
    ///
    /// Returns [`TaxInputError`] if the income is not positive or any
    /// deduction is negative. Nothing is computed in that case.
    pub fn evaluate(
        &self,
        input: &TaxInput,
    ) -> Result<Comparison, TaxInputError> {
        if let Err(error) = input.validate() {
            warn!(%error, "rejecting tax input");
            return Err(error);
        }

        let old = OldRegimeCalculator::new(&self.rules.old).calculate(input);
        let new = NewRegimeCalculator::new(&self.rules.new).calculate(input.annual_income);

        let comparison = compare(old, new);
        debug!(
            annual_income = %input.annual_income,
            old_total_tax = %comparison.old.total_tax,
            new_total_tax = %comparison.new.total_tax,
            recommended = comparison.recommended_regime.as_str(),
            "evaluated both regimes"
        );

        Ok(comparison)
    }
}

/// Builds a [`Comparison`] from the two regime results.
///
/// The old regime is recommended only when it is strictly cheaper; equal
/// liabilities resolve to the new regime.
pub fn compare(
    old: RegimeResult,
    new: RegimeResult,
) -> Comparison {
    let tax_difference = old.total_tax - new.total_tax;
    let recommended_regime = if old.total_tax < new.total_tax {
        Regime::Old
    } else {
        Regime::New
    };

    Comparison {
        old,
        new,
        tax_difference,
        savings: tax_difference.abs(),
        recommended_regime,
    }
}

/// Evaluates `input` against [`RuleTable::default`].
///
/// # Errors
///
/// See [`TaxEngine::evaluate`].
pub fn evaluate(input: &TaxInput) -> Result<Comparison, TaxInputError> {
    let rules = RuleTable::default();
    TaxEngine::new(&rules).evaluate(input)
}
