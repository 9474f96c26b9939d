//! New-regime calculation.
//!
//! The new regime grants a flat standard deduction to everyone and ignores
//! every itemised deduction on the input.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Standard deduction (50,000) |
//! | 2    | Taxable income = max(0, income - standard deduction) |
//! | 3    | Slab tax: 5/10/15/20% on 300,000-wide slabs from 300,000, 30% above 1,500,000 |
//! | 4    | Rebate of 25,000 when taxable income <= 700,000, floored at 0 |
//! | 5    | Cess at 4% of post-rebate tax |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use regime_core::calculations::{NewRegimeCalculator, NewRegimeRules};
//!
//! let rules = NewRegimeRules::default();
//! let result = NewRegimeCalculator::new(&rules).calculate(dec!(1200000));
//!
//! assert_eq!(result.taxable_income, dec!(1150000));
//! assert_eq!(result.income_tax, dec!(82500));
//! assert_eq!(result.total_tax, dec!(85800));
//! ```

use rust_decimal::Decimal;

use super::build_result;
use crate::RegimeResult;
use crate::calculations::common::{apply_rebate, slab_tax, taxable_income};
use crate::calculations::rules::NewRegimeRules;

/// Calculator for the new regime.
#[derive(Debug, Clone)]
pub struct NewRegimeCalculator<'a> {
    rules: &'a NewRegimeRules,
}

impl<'a> NewRegimeCalculator<'a> {
    pub fn new(rules: &'a NewRegimeRules) -> Self {
        Self { rules }
    }

    /// Computes the new-regime liability for `annual_income`.
    pub fn calculate(
        &self,
        annual_income: Decimal,
    ) -> RegimeResult {
        let standard_deduction = self.rules.standard_deduction;
        let taxable_income = taxable_income(annual_income, standard_deduction);
        let tax = slab_tax(taxable_income, &self.rules.slabs);
        let tax = apply_rebate(tax, taxable_income, &self.rules.rebate);

        build_result(
            annual_income,
            standard_deduction,
            taxable_income,
            tax,
            self.rules.cess_rate,
        )
    }
}
