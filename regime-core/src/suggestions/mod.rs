//! Deduction suggestions gathered from outside the engine.
//!
//! A [`DeductionSuggestionSource`] turns some external evidence (a bank
//! statement, a batch of receipt texts) into a [`DeductionSuggestion`], which
//! the caller merges into a [`TaxInput`] before evaluation. The engine never
//! sees the sources themselves.

pub mod bank;
pub mod receipt;

pub use bank::{BankStatement, BankSummary, Transaction, TransactionCategory, classify_description};
pub use receipt::{ReceiptBatch, ReceiptExtraction, ReceiptParser};

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DeductionSection, TaxInput};

/// Errors raised while building a suggestion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuggestionError {
    /// No amount could be found in a receipt.
    #[error("no amount found in receipt '{receipt}'")]
    NoAmount { receipt: String },

    /// A receipt did not match any deduction section.
    #[error("could not determine deduction section for receipt '{receipt}'")]
    UnknownSection { receipt: String },
}

/// Pre-filled values for a [`TaxInput`].
///
/// Only the sections present in `amounts` are touched when the suggestion is
/// applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionSuggestion {
    pub annual_income: Option<Decimal>,
    pub amounts: BTreeMap<DeductionSection, Decimal>,
}

impl DeductionSuggestion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to whatever is already suggested for `section`.
    pub fn add(
        &mut self,
        section: DeductionSection,
        amount: Decimal,
    ) {
        let total = self.amounts.entry(section).or_insert(Decimal::ZERO);
        *total = total.saturating_add(amount);
    }

    /// Suggested amount for `section`, zero when absent.
    pub fn amount(
        &self,
        section: DeductionSection,
    ) -> Decimal {
        self.amounts.get(&section).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.annual_income.is_none() && self.amounts.is_empty()
    }

    /// Folds `other` into `self`: section amounts are summed and `other`'s
    /// income, when present, replaces ours.
    pub fn merge(
        &mut self,
        other: DeductionSuggestion,
    ) {
        if other.annual_income.is_some() {
            self.annual_income = other.annual_income;
        }
        for (section, amount) in other.amounts {
            self.add(section, amount);
        }
    }

    /// Returns a copy of `input` pre-filled from this suggestion.
    ///
    /// Every suggested section overwrites the matching deduction; the income
    /// is replaced only when the suggestion carries one.
    pub fn apply_to(
        &self,
        input: &TaxInput,
    ) -> TaxInput {
        let mut filled = input.clone();
        if let Some(income) = self.annual_income {
            filled.annual_income = income;
        }
        for (section, amount) in &self.amounts {
            filled.deductions.set(*section, *amount);
        }
        filled
    }
}

/// Anything that can propose deductions.
pub trait DeductionSuggestionSource {
    /// Short description used in logs and error messages.
    fn name(&self) -> &str;

    /// Builds a suggestion from the source's evidence.
    fn suggest(&self) -> Result<DeductionSuggestion, SuggestionError>;
}

/// Merges the suggestions of every source, in order.
///
/// # Errors
///
/// Stops at the first source that fails.
pub fn collect_suggestions(
    sources: &[&dyn DeductionSuggestionSource]
) -> Result<DeductionSuggestion, SuggestionError> {
    let mut merged = DeductionSuggestion::new();
    for source in sources {
        let suggestion = source.suggest()?;
        tracing::debug!(
            source = source.name(),
            sections = suggestion.amounts.len(),
            "collected deduction suggestion"
        );
        merged.merge(suggestion);
    }
    Ok(merged)
}
