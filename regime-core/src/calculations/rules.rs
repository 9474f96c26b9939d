//! Rate tables for both regimes.
//!
//! [`RuleTable::default`] carries the reference figures; a table loaded from
//! configuration must pass [`RuleTable::validate`] before use.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use regime_core::AgeBand;
//! use regime_core::calculations::RuleTable;
//!
//! let rules = RuleTable::default();
//! assert!(rules.validate().is_ok());
//!
//! // The first old-regime slab starts at the exemption threshold and always
//! // ends at the fixed ceiling.
//! let slabs = rules.old.slabs_for(AgeBand::Senior);
//! assert_eq!(slabs[0].start, dec!(300000));
//! assert_eq!(slabs[0].width, Some(dec!(200000)));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AgeBand, Regime};

/// Errors found while validating a [`RuleTable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleTableError {
    /// A rate or ratio lies outside `[0, 1]`.
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: String, value: Decimal },

    /// A cap, threshold or rebate amount is negative.
    #[error("{name} must not be negative, got {value}")]
    NegativeAmount { name: String, value: Decimal },

    /// A regime has no slabs at all.
    #[error("{regime} has no tax slabs")]
    EmptySlabs { regime: Regime },

    /// Slab starts are not strictly ascending, or an open slab is not last.
    #[error("{regime} slabs must ascend and only the last slab may be open")]
    UnorderedSlabs { regime: Regime },
}

/// A contiguous income range taxed at one marginal rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slab {
    /// Income above this amount falls into the slab.
    pub start: Decimal,

    /// Width of the slab; `None` for the open top slab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Decimal>,

    pub rate: Decimal,
}

impl Slab {
    pub fn bounded(
        start: Decimal,
        width: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            start,
            width: Some(width),
            rate,
        }
    }

    pub fn open(
        start: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            start,
            width: None,
            rate,
        }
    }
}

/// Flat tax credit granted when taxable income does not exceed `income_limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rebate {
    pub income_limit: Decimal,
    pub amount: Decimal,
}

impl Rebate {
    pub fn new(
        income_limit: Decimal,
        amount: Decimal,
    ) -> Self {
        Self {
            income_limit,
            amount,
        }
    }
}

/// Old-regime basic exemption limit per age band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionThresholds {
    pub below_60: Decimal,
    pub senior: Decimal,
    pub super_senior: Decimal,
}

impl ExemptionThresholds {
    pub fn for_age_band(
        &self,
        age_band: AgeBand,
    ) -> Decimal {
        match age_band {
            AgeBand::BelowSixty => self.below_60,
            AgeBand::Senior => self.senior,
            AgeBand::SuperSenior => self.super_senior,
        }
    }
}

/// Rules for the deduction-permitting old regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OldRegimeRules {
    /// Granted to salaried taxpayers only.
    pub salaried_standard_deduction: Decimal,
    pub section_80c_cap: Decimal,
    pub section_80d_cap: Decimal,
    /// 80D cap for taxpayers aged 60 or over.
    pub section_80d_senior_cap: Decimal,
    pub home_loan_interest_cap: Decimal,
    /// HRA exemption is capped at this share of annual income.
    pub hra_income_ratio: Decimal,
    /// NPS contribution is capped at this share of annual income.
    pub nps_income_ratio: Decimal,
    pub exemption_thresholds: ExemptionThresholds,
    /// Fixed upper bound of the first taxed slab, whatever the age band.
    pub first_slab_ceiling: Decimal,
    pub first_slab_rate: Decimal,
    pub upper_slabs: Vec<Slab>,
    pub rebate: Rebate,
    pub cess_rate: Decimal,
}

impl OldRegimeRules {
    /// Full slab list for `age_band`.
    ///
    /// The first slab runs from the band's exemption threshold up to
    /// [`first_slab_ceiling`](Self::first_slab_ceiling), so its width shrinks
    /// as the threshold rises (down to zero for the top band).
    pub fn slabs_for(
        &self,
        age_band: AgeBand,
    ) -> Vec<Slab> {
        let threshold = self.exemption_thresholds.for_age_band(age_band);
        let width = (self.first_slab_ceiling - threshold).max(Decimal::ZERO);

        let mut slabs = Vec::with_capacity(self.upper_slabs.len() + 1);
        slabs.push(Slab::bounded(threshold, width, self.first_slab_rate));
        slabs.extend(self.upper_slabs.iter().cloned());
        slabs
    }

    /// 80D cap for `age_band`.
    pub fn section_80d_cap_for(
        &self,
        age_band: AgeBand,
    ) -> Decimal {
        if age_band.is_senior() {
            self.section_80d_senior_cap
        } else {
            self.section_80d_cap
        }
    }
}

impl Default for OldRegimeRules {
    fn default() -> Self {
        Self {
            salaried_standard_deduction: dec!(50000),
            section_80c_cap: dec!(150000),
            section_80d_cap: dec!(25000),
            section_80d_senior_cap: dec!(50000),
            home_loan_interest_cap: dec!(200000),
            hra_income_ratio: dec!(0.5),
            nps_income_ratio: dec!(0.1),
            exemption_thresholds: ExemptionThresholds {
                below_60: dec!(250000),
                senior: dec!(300000),
                super_senior: dec!(500000),
            },
            first_slab_ceiling: dec!(500000),
            first_slab_rate: dec!(0.05),
            upper_slabs: vec![
                Slab::bounded(dec!(500000), dec!(500000), dec!(0.20)),
                Slab::open(dec!(1000000), dec!(0.30)),
            ],
            rebate: Rebate::new(dec!(500000), dec!(12500)),
            cess_rate: dec!(0.04),
        }
    }
}

/// Rules for the simplified new regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewRegimeRules {
    /// Granted to every taxpayer regardless of employment type.
    pub standard_deduction: Decimal,
    pub slabs: Vec<Slab>,
    pub rebate: Rebate,
    pub cess_rate: Decimal,
}

impl Default for NewRegimeRules {
    fn default() -> Self {
        Self {
            standard_deduction: dec!(50000),
            slabs: vec![
                Slab::bounded(dec!(300000), dec!(300000), dec!(0.05)),
                Slab::bounded(dec!(600000), dec!(300000), dec!(0.10)),
                Slab::bounded(dec!(900000), dec!(300000), dec!(0.15)),
                Slab::bounded(dec!(1200000), dec!(300000), dec!(0.20)),
                Slab::open(dec!(1500000), dec!(0.30)),
            ],
            rebate: Rebate::new(dec!(700000), dec!(25000)),
            cess_rate: dec!(0.04),
        }
    }
}

/// Both regimes' rules.
///
/// Missing fields fall back to their defaults when deserializing, so a
/// partial table overrides only what it names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTable {
    pub old: OldRegimeRules,
    pub new: NewRegimeRules,
}

impl RuleTable {
    /// Validates every rate, amount and slab list.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleTableError`] found, checking the old regime
    /// before the new one.
    pub fn validate(&self) -> Result<(), RuleTableError> {
        let old = &self.old;
        check_amount("old.salaried_standard_deduction", old.salaried_standard_deduction)?;
        check_amount("old.section_80c_cap", old.section_80c_cap)?;
        check_amount("old.section_80d_cap", old.section_80d_cap)?;
        check_amount("old.section_80d_senior_cap", old.section_80d_senior_cap)?;
        check_amount("old.home_loan_interest_cap", old.home_loan_interest_cap)?;
        check_rate("old.hra_income_ratio", old.hra_income_ratio)?;
        check_rate("old.nps_income_ratio", old.nps_income_ratio)?;
        check_amount("old.exemption_thresholds.below_60", old.exemption_thresholds.below_60)?;
        check_amount("old.exemption_thresholds.senior", old.exemption_thresholds.senior)?;
        check_amount(
            "old.exemption_thresholds.super_senior",
            old.exemption_thresholds.super_senior,
        )?;
        check_amount("old.first_slab_ceiling", old.first_slab_ceiling)?;
        check_rate("old.first_slab_rate", old.first_slab_rate)?;
        check_rebate("old.rebate", &old.rebate)?;
        check_rate("old.cess_rate", old.cess_rate)?;
        check_slabs(Regime::Old, "old.upper_slabs", &old.upper_slabs)?;
        if old.upper_slabs[0].start < old.first_slab_ceiling {
            return Err(RuleTableError::UnorderedSlabs {
                regime: Regime::Old,
            });
        }

        let new = &self.new;
        check_amount("new.standard_deduction", new.standard_deduction)?;
        check_rebate("new.rebate", &new.rebate)?;
        check_rate("new.cess_rate", new.cess_rate)?;
        check_slabs(Regime::New, "new.slabs", &new.slabs)?;

        Ok(())
    }
}

fn check_rate(
    name: &str,
    value: Decimal,
) -> Result<(), RuleTableError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RuleTableError::InvalidRate {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}

fn check_amount(
    name: &str,
    value: Decimal,
) -> Result<(), RuleTableError> {
    if value < Decimal::ZERO {
        return Err(RuleTableError::NegativeAmount {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}

fn check_rebate(
    name: &str,
    rebate: &Rebate,
) -> Result<(), RuleTableError> {
    check_amount(&format!("{name}.income_limit"), rebate.income_limit)?;
    check_amount(&format!("{name}.amount"), rebate.amount)
}

fn check_slabs(
    regime: Regime,
    name: &str,
    slabs: &[Slab],
) -> Result<(), RuleTableError> {
    if slabs.is_empty() {
        return Err(RuleTableError::EmptySlabs { regime });
    }

    for (i, slab) in slabs.iter().enumerate() {
        check_amount(&format!("{name}[{i}].start"), slab.start)?;
        check_rate(&format!("{name}[{i}].rate"), slab.rate)?;
        if let Some(width) = slab.width {
            check_amount(&format!("{name}[{i}].width"), width)?;
        }
    }

    let ascending = slabs.windows(2).all(|pair| pair[0].start < pair[1].start);
    let open_only_last = slabs[..slabs.len() - 1].iter().all(|s| s.width.is_some());
    if !ascending || !open_only_last {
        return Err(RuleTableError::UnorderedSlabs { regime });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_table_is_valid() {
        assert_eq!(RuleTable::default().validate(), Ok(()));
    }

    #[test]
    fn slabs_for_below_60_start_at_250k() {
        let slabs = OldRegimeRules::default().slabs_for(AgeBand::BelowSixty);

        assert_eq!(slabs.len(), 3);
        assert_eq!(slabs[0], Slab::bounded(dec!(250000), dec!(250000), dec!(0.05)));
        assert_eq!(slabs[1], Slab::bounded(dec!(500000), dec!(500000), dec!(0.20)));
        assert_eq!(slabs[2], Slab::open(dec!(1000000), dec!(0.30)));
    }

    #[test]
    fn slabs_for_super_senior_have_empty_first_slab() {
        let slabs = OldRegimeRules::default().slabs_for(AgeBand::SuperSenior);

        assert_eq!(slabs[0], Slab::bounded(dec!(500000), dec!(0), dec!(0.05)));
    }

    #[test]
    fn slabs_for_clamps_width_when_threshold_exceeds_ceiling() {
        let mut rules = OldRegimeRules::default();
        rules.exemption_thresholds.super_senior = dec!(600000);

        let slabs = rules.slabs_for(AgeBand::SuperSenior);

        assert_eq!(slabs[0].width, Some(dec!(0)));
    }

    #[test]
    fn section_80d_cap_depends_on_age() {
        let rules = OldRegimeRules::default();

        assert_eq!(rules.section_80d_cap_for(AgeBand::BelowSixty), dec!(25000));
        assert_eq!(rules.section_80d_cap_for(AgeBand::Senior), dec!(50000));
        assert_eq!(rules.section_80d_cap_for(AgeBand::SuperSenior), dec!(50000));
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut rules = RuleTable::default();
        rules.new.cess_rate = dec!(4);

        assert_eq!(
            rules.validate(),
            Err(RuleTableError::InvalidRate {
                name: "new.cess_rate".to_string(),
                value: dec!(4),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_cap() {
        let mut rules = RuleTable::default();
        rules.old.section_80c_cap = dec!(-1);

        assert_eq!(
            rules.validate(),
            Err(RuleTableError::NegativeAmount {
                name: "old.section_80c_cap".to_string(),
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn validate_names_the_offending_slab() {
        let mut rules = RuleTable::default();
        rules.new.slabs[2].rate = dec!(-0.15);

        assert_eq!(
            rules.validate(),
            Err(RuleTableError::InvalidRate {
                name: "new.slabs[2].rate".to_string(),
                value: dec!(-0.15),
            })
        );
    }

    #[test]
    fn validate_rejects_empty_slabs() {
        let mut rules = RuleTable::default();
        rules.new.slabs.clear();

        assert_eq!(
            rules.validate(),
            Err(RuleTableError::EmptySlabs {
                regime: Regime::New
            })
        );
    }

    #[test]
    fn validate_rejects_descending_slabs() {
        let mut rules = RuleTable::default();
        rules.new.slabs.swap(0, 1);

        assert_eq!(
            rules.validate(),
            Err(RuleTableError::UnorderedSlabs {
                regime: Regime::New
            })
        );
    }

    #[test]
    fn validate_rejects_open_slab_before_last() {
        let mut rules = RuleTable::default();
        rules.new.slabs[1].width = None;

        assert_eq!(
            rules.validate(),
            Err(RuleTableError::UnorderedSlabs {
                regime: Regime::New
            })
        );
    }

    #[test]
    fn validate_rejects_upper_slab_below_first_ceiling() {
        let mut rules = RuleTable::default();
        rules.old.upper_slabs[0].start = dec!(400000);

        assert_eq!(
            rules.validate(),
            Err(RuleTableError::UnorderedSlabs {
                regime: Regime::Old
            })
        );
    }
}
