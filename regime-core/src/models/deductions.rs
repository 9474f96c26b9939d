use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DeductionSection;
use crate::calculations::common::saturating_sum;

/// Itemised deductions claimed by the taxpayer.
///
/// Amounts are the gross claims; caps are applied by the old-regime
/// calculator, never here. The new regime ignores every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deductions {
    pub section_80c: Decimal,
    pub section_80d: Decimal,
    pub hra_exemption: Decimal,
    pub home_loan_interest: Decimal,
    pub education_loan_interest: Decimal,
    pub nps: Decimal,
    pub section_80g: Decimal,
}

impl Deductions {
    /// Returns the claimed amount for `section`.
    pub fn get(
        &self,
        section: DeductionSection,
    ) -> Decimal {
        match section {
            DeductionSection::Section80C => self.section_80c,
            DeductionSection::Section80D => self.section_80d,
            DeductionSection::Section80G => self.section_80g,
            DeductionSection::HomeLoanInterest => self.home_loan_interest,
            DeductionSection::HraExemption => self.hra_exemption,
            DeductionSection::EducationLoanInterest => self.education_loan_interest,
            DeductionSection::Nps => self.nps,
        }
    }

    /// Replaces the claimed amount for `section`.
    pub fn set(
        &mut self,
        section: DeductionSection,
        amount: Decimal,
    ) {
        let slot = match section {
            DeductionSection::Section80C => &mut self.section_80c,
            DeductionSection::Section80D => &mut self.section_80d,
            DeductionSection::Section80G => &mut self.section_80g,
            DeductionSection::HomeLoanInterest => &mut self.home_loan_interest,
            DeductionSection::HraExemption => &mut self.hra_exemption,
            DeductionSection::EducationLoanInterest => &mut self.education_loan_interest,
            DeductionSection::Nps => &mut self.nps,
        };
        *slot = amount;
    }

    /// Field names paired with their amounts, in declaration order.
    pub fn fields(&self) -> [(&'static str, Decimal); 7] {
        [
            ("section_80c", self.section_80c),
            ("section_80d", self.section_80d),
            ("hra_exemption", self.hra_exemption),
            ("home_loan_interest", self.home_loan_interest),
            ("education_loan_interest", self.education_loan_interest),
            ("nps", self.nps),
            ("section_80g", self.section_80g),
        ]
    }

    /// Sum of the uncapped claims.
    pub fn gross_total(&self) -> Decimal {
        saturating_sum(self.fields().iter().map(|(_, amount)| *amount))
    }
}
