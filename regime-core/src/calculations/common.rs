//! Common utility functions for tax calculations.
//!
//! This module provides the slab, rebate and cess arithmetic shared by both
//! regimes, plus rounding for presentation.

use rust_decimal::Decimal;

use crate::calculations::rules::{Rebate, Slab};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// The engine itself never rounds; this is for presenting amounts.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use regime_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(800.004)), dec!(800.00));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use regime_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Sums `values`, clamping at [`Decimal::MAX`] instead of overflowing.
///
/// Amounts here are never negative, so only the upper bound matters.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use regime_core::calculations::common::saturating_sum;
///
/// assert_eq!(saturating_sum([dec!(1), dec!(2)]), dec!(3));
/// assert_eq!(saturating_sum([Decimal::MAX, Decimal::MAX]), Decimal::MAX);
/// ```
pub fn saturating_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |total, value| total.saturating_add(value))
}

/// Income left after deductions, floored at zero.
pub fn taxable_income(
    gross_income: Decimal,
    total_deductions: Decimal,
) -> Decimal {
    max(gross_income - total_deductions, Decimal::ZERO)
}

/// Taxes `taxable_income` slab by slab.
///
/// Every slab is evaluated on its own: it contributes
/// `min(taxable_income - start, width) * rate` when `taxable_income > start`,
/// and nothing otherwise. Slabs are not chained, so a gap or overlap between
/// two slabs is taxed exactly as written.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use regime_core::calculations::Slab;
/// use regime_core::calculations::common::slab_tax;
///
/// let slabs = [
///     Slab::bounded(dec!(300000), dec!(300000), dec!(0.05)),
///     Slab::open(dec!(600000), dec!(0.10)),
/// ];
///
/// assert_eq!(slab_tax(dec!(300000), &slabs), dec!(0));
/// assert_eq!(slab_tax(dec!(700000), &slabs), dec!(25000));
/// ```
pub fn slab_tax(
    taxable_income: Decimal,
    slabs: &[Slab],
) -> Decimal {
    saturating_sum(
        slabs
            .iter()
            .filter(|slab| taxable_income > slab.start)
            .map(|slab| {
                let portion = taxable_income - slab.start;
                let portion = match slab.width {
                    Some(width) => portion.min(width),
                    None => portion,
                };
                portion * slab.rate
            }),
    )
}

/// Subtracts the flat rebate when `taxable_income` is within its limit.
///
/// The result is floored at zero.
pub fn apply_rebate(
    tax: Decimal,
    taxable_income: Decimal,
    rebate: &Rebate,
) -> Decimal {
    if taxable_income <= rebate.income_limit {
        max(tax - rebate.amount, Decimal::ZERO)
    } else {
        tax
    }
}

/// Cess levied on tax after rebate.
pub fn cess(
    income_tax: Decimal,
    cess_rate: Decimal,
) -> Decimal {
    income_tax * cess_rate
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn new_regime_slabs() -> Vec<Slab> {
        vec![
            Slab::bounded(dec!(300000), dec!(300000), dec!(0.05)),
            Slab::bounded(dec!(600000), dec!(300000), dec!(0.10)),
            Slab::bounded(dec!(900000), dec!(300000), dec!(0.15)),
            Slab::bounded(dec!(1200000), dec!(300000), dec!(0.20)),
            Slab::open(dec!(1500000), dec!(0.30)),
        ]
    }

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(123.455));

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(800.004));

        assert_eq!(result, dec!(800.00));
    }

    // =========================================================================
    // saturating_sum tests
    // =========================================================================

    #[test]
    fn saturating_sum_of_nothing_is_zero() {
        assert_eq!(saturating_sum(Vec::new()), dec!(0));
    }

    #[test]
    fn saturating_sum_clamps_at_max() {
        let total = saturating_sum([Decimal::MAX, dec!(1), Decimal::MAX]);

        assert_eq!(total, Decimal::MAX);
    }

    // =========================================================================
    // taxable_income tests
    // =========================================================================

    #[test]
    fn taxable_income_subtracts_deductions() {
        let result = taxable_income(dec!(1200000), dec!(50000));

        assert_eq!(result, dec!(1150000));
    }

    #[test]
    fn taxable_income_floors_at_zero() {
        let result = taxable_income(dec!(40000), dec!(50000));

        assert_eq!(result, dec!(0));
    }

    // =========================================================================
    // slab_tax tests
    // =========================================================================

    #[test]
    fn slab_tax_is_zero_at_first_slab_start() {
        let result = slab_tax(dec!(300000), &new_regime_slabs());

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn slab_tax_charges_one_rupee_above_first_start() {
        let result = slab_tax(dec!(300001), &new_regime_slabs());

        assert_eq!(result, dec!(0.05));
    }

    #[test]
    fn slab_tax_partial_slab() {
        let result = slab_tax(dec!(1150000), &new_regime_slabs());

        // 15000 + 30000 + 250000 * 0.15
        assert_eq!(result, dec!(82500));
    }

    #[test]
    fn slab_tax_open_top_slab_is_uncapped() {
        let result = slab_tax(dec!(2500000), &new_regime_slabs());

        // 15000 + 30000 + 45000 + 60000 + 1000000 * 0.30
        assert_eq!(result, dec!(450000));
    }

    #[test]
    fn slab_tax_zero_width_slab_contributes_nothing() {
        let slabs = [Slab::bounded(dec!(500000), dec!(0), dec!(0.05))];

        assert_eq!(slab_tax(dec!(800000), &slabs), dec!(0));
    }

    #[test]
    fn slab_tax_overlapping_full_rate_slabs_saturate() {
        let slabs = [Slab::open(dec!(0), dec!(1)), Slab::open(dec!(0), dec!(1))];

        assert_eq!(slab_tax(Decimal::MAX, &slabs), Decimal::MAX);
    }

    // =========================================================================
    // apply_rebate tests
    // =========================================================================

    #[test]
    fn apply_rebate_at_limit() {
        let rebate = Rebate::new(dec!(700000), dec!(25000));

        assert_eq!(apply_rebate(dec!(20000), dec!(700000), &rebate), dec!(0));
    }

    #[test]
    fn apply_rebate_leaves_tax_above_limit() {
        let rebate = Rebate::new(dec!(700000), dec!(25000));

        assert_eq!(
            apply_rebate(dec!(20000.05), dec!(700001), &rebate),
            dec!(20000.05)
        );
    }

    #[test]
    fn apply_rebate_partially_offsets_larger_tax() {
        let rebate = Rebate::new(dec!(500000), dec!(12500));

        assert_eq!(apply_rebate(dec!(15000), dec!(500000), &rebate), dec!(2500));
    }

    // =========================================================================
    // cess tests
    // =========================================================================

    #[test]
    fn cess_is_exact_fraction_of_tax() {
        assert_eq!(cess(dec!(20000.10), dec!(0.04)), dec!(800.004));
    }
}
