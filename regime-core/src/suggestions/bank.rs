//! Bank statement analysis.
//!
//! Statements are lists of signed transactions: credits are positive and
//! debits negative. Each transaction carries a [`TransactionCategory`] and,
//! for deductible spends, the [`DeductionSection`] it counts towards. When a
//! statement arrives without categories, [`classify_description`] fills them
//! from the narration text.
//!
//! | Category     | Contributes to                    |
//! |--------------|-----------------------------------|
//! | `income`     | suggested annual income           |
//! | `deduction`  | suggested amount for its section  |
//! | `expense`    | expense total (informational)     |
//! | `not_useful` | nothing                           |

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DeductionSuggestion, DeductionSuggestionSource, SuggestionError};
use crate::DeductionSection;
use crate::calculations::common::saturating_sum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    Income,
    Deduction,
    Expense,
    NotUseful,
}

impl TransactionCategory {
    pub fn all() -> &'static [TransactionCategory] {
        &[
            TransactionCategory::Income,
            TransactionCategory::Deduction,
            TransactionCategory::Expense,
            TransactionCategory::NotUseful,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::Income => "income",
            TransactionCategory::Deduction => "deduction",
            TransactionCategory::Expense => "expense",
            TransactionCategory::NotUseful => "not_useful",
        }
    }

    /// Case-insensitive; accepts `-` or a space in place of `_`.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::all()
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    /// Signed amount; debits are negative.
    pub amount: Decimal,
    pub category: TransactionCategory,
    pub tax_section: Option<DeductionSection>,
}

impl Transaction {
    /// Builds a transaction whose category and section come from
    /// [`classify_description`].
    pub fn classified(
        id: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        let description = description.into();
        let (category, tax_section) = classify_description(&description, amount);
        Self {
            id: id.into(),
            date,
            description,
            amount,
            category,
            tax_section,
        }
    }
}

struct ClassifierRule {
    pattern: Regex,
    category: TransactionCategory,
    section: Option<DeductionSection>,
}

fn rule(
    pattern: &str,
    category: TransactionCategory,
    section: Option<DeductionSection>,
) -> ClassifierRule {
    ClassifierRule {
        pattern: Regex::new(pattern).expect("classifier pattern is a valid regex"),
        category,
        section,
    }
}

// First match wins, so the narrower insurance and loan rules sit above 80C.
static CLASSIFIER_RULES: LazyLock<Vec<ClassifierRule>> = LazyLock::new(|| {
    use DeductionSection::*;
    use TransactionCategory::*;

    vec![
        rule(
            r"(?i)health\s+insurance|mediclaim|medical\s+insurance|doctor|hospital|pharmacy|health\s+check",
            Deduction,
            Some(Section80D),
        ),
        rule(
            r"(?i)(home|housing)\s+loan\s+interest",
            Deduction,
            Some(HomeLoanInterest),
        ),
        rule(r"(?i)education\s+loan", Deduction, Some(EducationLoanInterest)),
        rule(r"(?i)\bnps\b|national\s+pension", Deduction, Some(Nps)),
        rule(
            r"(?i)donation|\bngo\b|charit|\bpm\s*cares\b",
            Deduction,
            Some(Section80G),
        ),
        rule(
            r"(?i)\blic\b|\belss\b|\bppf\b|life\s+insurance|term\s+insurance|mutual\s+fund|\bsip\b|tuition|school\s+fees?|\bnsc\b|sukanya",
            Deduction,
            Some(Section80C),
        ),
        rule(r"(?i)salary|freelanc|income|dividend", Income, None),
        rule(
            r"(?i)swiggy|zomato|restaurant|dinner|netflix|movie|gym|clothes|gift|food",
            NotUseful,
            None,
        ),
        rule(
            r"(?i)\brent\b|grocer|\bbills?\b|petrol|fuel|\bemi\b|utilit|recharge|electricity",
            Expense,
            None,
        ),
    ]
});

/// Guesses a category and deduction section from a transaction narration.
///
/// Narrations matching no rule fall back on the amount's sign: credits are
/// treated as income and debits as not useful.
pub fn classify_description(
    description: &str,
    amount: Decimal,
) -> (TransactionCategory, Option<DeductionSection>) {
    CLASSIFIER_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(description))
        .map(|rule| (rule.category, rule.section))
        .unwrap_or_else(|| {
            if amount > Decimal::ZERO {
                (TransactionCategory::Income, None)
            } else {
                (TransactionCategory::NotUseful, None)
            }
        })
}

/// Totals across a statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSummary {
    pub transaction_count: usize,
    /// Signed sum of income amounts, so a reversed credit lowers it.
    pub total_income: Decimal,
    /// The remaining totals sum magnitudes and are never negative.
    pub total_expenses: Decimal,
    pub total_not_useful: Decimal,
    pub deductions: BTreeMap<DeductionSection, Decimal>,
}

impl BankSummary {
    pub fn total_deductions(&self) -> Decimal {
        saturating_sum(self.deductions.values().copied())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankStatement {
    name: String,
    transactions: Vec<Transaction>,
}

impl BankStatement {
    pub fn new(
        name: impl Into<String>,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            name: name.into(),
            transactions,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn summarize(&self) -> BankSummary {
        let mut summary = BankSummary {
            transaction_count: self.transactions.len(),
            ..Default::default()
        };

        for tx in &self.transactions {
            let magnitude = tx.amount.abs();
            match (tx.category, tx.tax_section) {
                (TransactionCategory::Income, _) => {
                    summary.total_income = summary.total_income.saturating_add(tx.amount);
                }
                (TransactionCategory::Deduction, Some(section)) => {
                    let total = summary.deductions.entry(section).or_insert(Decimal::ZERO);
                    *total = total.saturating_add(magnitude);
                }
                (TransactionCategory::Deduction, None) => {
                    tracing::warn!(
                        id = %tx.id,
                        description = %tx.description,
                        "deduction transaction has no tax section; ignoring"
                    );
                }
                (TransactionCategory::Expense, _) => {
                    summary.total_expenses = summary.total_expenses.saturating_add(magnitude);
                }
                (TransactionCategory::NotUseful, _) => {
                    summary.total_not_useful = summary.total_not_useful.saturating_add(magnitude);
                }
            }
        }

        summary
    }
}

impl DeductionSuggestionSource for BankStatement {
    fn name(&self) -> &str {
        &self.name
    }

    fn suggest(&self) -> Result<DeductionSuggestion, SuggestionError> {
        let summary = self.summarize();
        tracing::debug!(
            statement = %self.name,
            transactions = summary.transaction_count,
            income = %summary.total_income,
            deductions = %summary.total_deductions(),
            "summarized bank statement"
        );

        let mut suggestion = DeductionSuggestion::new();
        if summary.total_income > Decimal::ZERO {
            suggestion.annual_income = Some(summary.total_income);
        }
        for (section, amount) in summary.deductions {
            suggestion.add(section, amount);
        }
        Ok(suggestion)
    }
}
