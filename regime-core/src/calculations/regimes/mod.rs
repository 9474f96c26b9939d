//! Per-regime calculators.

pub mod new_regime;
pub mod old_regime;

pub use new_regime::NewRegimeCalculator;
pub use old_regime::{DeductionHeadroom, HeadroomEntry, OldRegimeCalculator};

use rust_decimal::Decimal;

use crate::RegimeResult;
use crate::calculations::common::cess;

/// Assembles a [`RegimeResult`] from post-rebate income tax.
fn build_result(
    gross_income: Decimal,
    total_deductions: Decimal,
    taxable_income: Decimal,
    income_tax: Decimal,
    cess_rate: Decimal,
) -> RegimeResult {
    let cess = cess(income_tax, cess_rate);
    let total_tax = income_tax.saturating_add(cess);

    RegimeResult {
        gross_income,
        total_deductions,
        taxable_income,
        income_tax,
        cess,
        total_tax,
        net_income: gross_income - total_tax,
    }
}
