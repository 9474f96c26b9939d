use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AgeBand, Deductions, EmploymentType};

/// Errors raised when a [`TaxInput`] cannot be evaluated.
///
/// Validation happens before any arithmetic; there is never a partial result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxInputError {
    /// Annual income must be strictly positive.
    #[error("annual income must be greater than zero, got {0}")]
    InvalidIncome(Decimal),

    /// A deduction field holds a negative amount.
    #[error("deduction '{field}' must not be negative, got {amount}")]
    InvalidDeduction { field: &'static str, amount: Decimal },
}

/// A complete snapshot of everything the engine needs for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    /// Gross yearly income.
    pub annual_income: Decimal,
    pub employment_type: EmploymentType,
    pub age_band: AgeBand,
    #[serde(default)]
    pub deductions: Deductions,
}

impl TaxInput {
    pub fn new(
        annual_income: Decimal,
        employment_type: EmploymentType,
        age_band: AgeBand,
        deductions: Deductions,
    ) -> Self {
        Self {
            annual_income,
            employment_type,
            age_band,
            deductions,
        }
    }

    /// Checks that income is positive and no deduction is negative.
    ///
    /// # Errors
    ///
    /// * [`TaxInputError::InvalidIncome`] when `annual_income <= 0`.
    /// * [`TaxInputError::InvalidDeduction`] for the first negative field,
    ///   in declaration order.
    pub fn validate(&self) -> Result<(), TaxInputError> {
        if self.annual_income <= Decimal::ZERO {
            return Err(TaxInputError::InvalidIncome(self.annual_income));
        }
        for (field, amount) in self.deductions.fields() {
            if amount < Decimal::ZERO {
                return Err(TaxInputError::InvalidDeduction { field, amount });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn input(income: Decimal) -> TaxInput {
        TaxInput::new(
            income,
            EmploymentType::Salaried,
            AgeBand::BelowSixty,
            Deductions::default(),
        )
    }

    #[test]
    fn validate_accepts_positive_income() {
        assert_eq!(input(dec!(1)).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_zero_income() {
        assert_eq!(
            input(dec!(0)).validate(),
            Err(TaxInputError::InvalidIncome(dec!(0)))
        );
    }

    #[test]
    fn validate_rejects_negative_income() {
        assert_eq!(
            input(dec!(-5000)).validate(),
            Err(TaxInputError::InvalidIncome(dec!(-5000)))
        );
    }

    #[test]
    fn validate_reports_first_negative_deduction() {
        let mut tax_input = input(dec!(600000));
        tax_input.deductions.nps = dec!(-1);
        tax_input.deductions.section_80g = dec!(-2);

        assert_eq!(
            tax_input.validate(),
            Err(TaxInputError::InvalidDeduction {
                field: "nps",
                amount: dec!(-1),
            })
        );
    }

    #[test]
    fn income_is_checked_before_deductions() {
        let mut tax_input = input(dec!(0));
        tax_input.deductions.section_80c = dec!(-10);

        assert_eq!(
            tax_input.validate(),
            Err(TaxInputError::InvalidIncome(dec!(0)))
        );
    }
}
