use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One of the two statutory rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Old,
    New,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Old => "Old Regime",
            Self::New => "New Regime",
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Tax liability under a single regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub gross_income: Decimal,

    /// Allowed deductions after caps, including the standard deduction.
    pub total_deductions: Decimal,

    /// `max(0, gross_income - total_deductions)`.
    pub taxable_income: Decimal,

    /// Slab tax after rebate, before cess.
    pub income_tax: Decimal,

    pub cess: Decimal,

    /// `income_tax + cess`.
    pub total_tax: Decimal,

    /// `gross_income - total_tax`.
    pub net_income: Decimal,
}

/// Side-by-side result of both regimes with a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub old: RegimeResult,
    pub new: RegimeResult,

    /// `old.total_tax - new.total_tax`; positive when the old regime costs more.
    pub tax_difference: Decimal,

    /// Amount the recommended regime saves over the other one. Never negative.
    pub savings: Decimal,

    pub recommended_regime: Regime,
}

impl Comparison {
    /// The result for the recommended regime.
    pub fn recommended(&self) -> &RegimeResult {
        self.result_for(self.recommended_regime)
    }

    pub fn result_for(
        &self,
        regime: Regime,
    ) -> &RegimeResult {
        match regime {
            Regime::Old => &self.old,
            Regime::New => &self.new,
        }
    }
}
