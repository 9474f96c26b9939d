//! Tax calculation modules for the old and new income-tax regimes.
//!
//! [`rules`] holds the rate tables, [`regimes`] applies them to a single
//! [`TaxInput`](crate::TaxInput), and [`engine`] runs both regimes and picks
//! the cheaper one.

pub mod common;
pub mod engine;
pub mod regimes;
pub mod rules;

pub use engine::{TaxEngine, compare, evaluate};
pub use regimes::{
    DeductionHeadroom, HeadroomEntry, NewRegimeCalculator, OldRegimeCalculator,
};
pub use rules::{
    ExemptionThresholds, NewRegimeRules, OldRegimeRules, Rebate, RuleTable, RuleTableError, Slab,
};
