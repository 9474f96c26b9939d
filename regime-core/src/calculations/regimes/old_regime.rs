//! Old-regime calculation.
//!
//! The old regime permits itemised deductions, each capped on its own, and
//! bases the first taxed slab on the taxpayer's age band.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Standard deduction (50,000, salaried only) |
//! | 2    | Capped deductions: 80C, 80D (age-dependent), home-loan interest, HRA (share of income), NPS (share of income); 80E and 80G uncapped |
//! | 3    | Taxable income = max(0, income - total deductions) |
//! | 4    | Exemption threshold by age band (250,000 / 300,000 / 500,000) |
//! | 5    | Slab tax: 5% from the threshold up to 500,000, 20% from 500,000 to 1,000,000, 30% above |
//! | 6    | Rebate of 12,500 when taxable income <= 500,000, floored at 0 |
//! | 7    | Cess at 4% of post-rebate tax |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use regime_core::{AgeBand, Deductions, EmploymentType, TaxInput};
//! use regime_core::calculations::{OldRegimeCalculator, OldRegimeRules};
//!
//! let input = TaxInput::new(
//!     dec!(1200000),
//!     EmploymentType::Salaried,
//!     AgeBand::BelowSixty,
//!     Deductions {
//!         section_80c: dec!(150000),
//!         section_80d: dec!(25000),
//!         home_loan_interest: dec!(200000),
//!         hra_exemption: dec!(50000),
//!         ..Default::default()
//!     },
//! );
//!
//! let rules = OldRegimeRules::default();
//! let result = OldRegimeCalculator::new(&rules).calculate(&input);
//!
//! assert_eq!(result.total_deductions, dec!(475000));
//! assert_eq!(result.taxable_income, dec!(725000));
//! assert_eq!(result.total_tax, dec!(59800));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::build_result;
use crate::calculations::common::{apply_rebate, max, saturating_sum, slab_tax, taxable_income};
use crate::calculations::rules::OldRegimeRules;
use crate::{AgeBand, DeductionSection, EmploymentType, RegimeResult, TaxInput};

/// Unused deduction room for one capped section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadroomEntry {
    pub section: DeductionSection,
    pub cap: Decimal,
    pub claimed: Decimal,
    /// Portion of the claim that counts, `min(claimed, cap)`.
    pub allowed: Decimal,
    /// `max(cap - claimed, 0)`.
    pub unused: Decimal,
}

/// Unused room under every capped old-regime deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionHeadroom {
    pub entries: Vec<HeadroomEntry>,
}

impl DeductionHeadroom {
    pub fn entry(
        &self,
        section: DeductionSection,
    ) -> Option<&HeadroomEntry> {
        self.entries.iter().find(|e| e.section == section)
    }

    pub fn total_unused(&self) -> Decimal {
        saturating_sum(self.entries.iter().map(|e| e.unused))
    }
}

/// Calculator for the old regime.
#[derive(Debug, Clone)]
pub struct OldRegimeCalculator<'a> {
    rules: &'a OldRegimeRules,
}

impl<'a> OldRegimeCalculator<'a> {
    pub fn new(rules: &'a OldRegimeRules) -> Self {
        Self { rules }
    }

    /// Computes the old-regime liability for `input`.
    ///
    /// The input is assumed valid; see [`TaxInput::validate`].
    pub fn calculate(
        &self,
        input: &TaxInput,
    ) -> RegimeResult {
        let total_deductions = self.total_deductions(input);
        let taxable_income = taxable_income(input.annual_income, total_deductions);

        let slabs = self.rules.slabs_for(input.age_band);
        let tax = slab_tax(taxable_income, &slabs);
        let tax = apply_rebate(tax, taxable_income, &self.rules.rebate);

        build_result(
            input.annual_income,
            total_deductions,
            taxable_income,
            tax,
            self.rules.cess_rate,
        )
    }

    /// Reports how much of each capped deduction is still unclaimed.
    pub fn headroom(
        &self,
        input: &TaxInput,
    ) -> DeductionHeadroom {
        let entries = DeductionSection::all()
            .iter()
            .filter_map(|&section| {
                let cap = self.cap_for(section, input.annual_income, input.age_band)?;
                let claimed = input.deductions.get(section);
                Some(HeadroomEntry {
                    section,
                    cap,
                    claimed,
                    allowed: claimed.min(cap),
                    unused: max(cap - claimed, Decimal::ZERO),
                })
            })
            .collect();

        DeductionHeadroom { entries }
    }

    /// Standard deduction for `employment_type`.
    fn standard_deduction(
        &self,
        employment_type: EmploymentType,
    ) -> Decimal {
        match employment_type {
            EmploymentType::Salaried => self.rules.salaried_standard_deduction,
            EmploymentType::SelfEmployed
            | EmploymentType::Business
            | EmploymentType::Freelancer => Decimal::ZERO,
        }
    }

    /// Cap for `section`, or `None` when the section is uncapped.
    fn cap_for(
        &self,
        section: DeductionSection,
        annual_income: Decimal,
        age_band: AgeBand,
    ) -> Option<Decimal> {
        match section {
            DeductionSection::Section80C => Some(self.rules.section_80c_cap),
            DeductionSection::Section80D => Some(self.rules.section_80d_cap_for(age_band)),
            DeductionSection::HomeLoanInterest => Some(self.rules.home_loan_interest_cap),
            DeductionSection::HraExemption => Some(annual_income * self.rules.hra_income_ratio),
            DeductionSection::Nps => Some(annual_income * self.rules.nps_income_ratio),
            DeductionSection::EducationLoanInterest | DeductionSection::Section80G => None,
        }
    }

    /// Claimed amount for `section` after its cap.
    fn allowed_deduction(
        &self,
        section: DeductionSection,
        input: &TaxInput,
    ) -> Decimal {
        let claimed = input.deductions.get(section);
        match self.cap_for(section, input.annual_income, input.age_band) {
            Some(cap) => claimed.min(cap),
            None => claimed,
        }
    }

    /// Sum of every capped deduction plus the standard deduction.
    ///
    /// Caps are independent: an over-cap claim in one section never spills
    /// into another. The total clamps at [`Decimal::MAX`]; anything at or
    /// above income leaves nothing taxable either way.
    fn total_deductions(
        &self,
        input: &TaxInput,
    ) -> Decimal {
        let itemised = DeductionSection::all()
            .iter()
            .map(|&section| self.allowed_deduction(section, input));

        saturating_sum(itemised.chain([self.standard_deduction(input.employment_type)]))
    }
}
