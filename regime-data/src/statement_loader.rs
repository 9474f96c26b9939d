//! CSV loader for bank statements.
//!
//! | Column        | Required | Notes                                          |
//! |---------------|----------|------------------------------------------------|
//! | `id`          | yes      | Free-form transaction reference                |
//! | `date`        | yes      | `YYYY-MM-DD`                                   |
//! | `description` | yes      | Narration                                      |
//! | `amount`      | yes      | Signed; debits negative                        |
//! | `category`    | no       | `income`, `deduction`, `expense`, `not_useful` |
//! | `tax_section` | no       | `80C`, `80D`, `80G`, `24`, `80E`, `80CCD`, ... |
//!
//! A row with an empty `category` is run through
//! [`classify_description`], which also picks its section. An explicit
//! `tax_section` always wins over the guess and marks the row a deduction.
//! A row that names a category keeps it, along with whatever `tax_section`
//! it gives.

use std::path::Path;

use chrono::NaiveDate;
use regime_core::DeductionSection;
use regime_core::suggestions::{
    BankStatement, Transaction, TransactionCategory, classify_description,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::amount::deserialize_amount;

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    date: String,
    description: String,
    #[serde(deserialize_with = "deserialize_amount")]
    amount: Decimal,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tax_section: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StatementLoadError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("invalid date '{value}' on row {row} (expected YYYY-MM-DD)")]
    InvalidDate { value: String, row: usize },

    #[error("unrecognised category '{value}' on row {row}")]
    InvalidCategory { value: String, row: usize },

    #[error("unrecognised tax section '{value}' on row {row}")]
    InvalidSection { value: String, row: usize },

    #[error("failed to read statement file: {0}")]
    Io(#[from] std::io::Error),
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !s.trim().is_empty())
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Transaction, StatementLoadError> {
    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|_| {
        StatementLoadError::InvalidDate {
            value: row.date.clone(),
            row: row_number,
        }
    })?;

    let tax_section = non_empty(row.tax_section)
        .map(|value| {
            DeductionSection::parse(&value).ok_or(StatementLoadError::InvalidSection {
                value,
                row: row_number,
            })
        })
        .transpose()?;

    let Some(category) = non_empty(row.category) else {
        let mut transaction = Transaction::classified(row.id, date, row.description, row.amount);
        if let Some(section) = tax_section {
            transaction.category = TransactionCategory::Deduction;
            transaction.tax_section = Some(section);
        }
        return Ok(transaction);
    };

    let category =
        TransactionCategory::parse(&category).ok_or_else(|| StatementLoadError::InvalidCategory {
            value: category.clone(),
            row: row_number,
        })?;

    // A deduction row with no section still gets one from the narration.
    let tax_section = match (category, tax_section) {
        (TransactionCategory::Deduction, None) => {
            let (_, guessed) = classify_description(&row.description, row.amount);
            if guessed.is_none() {
                tracing::warn!(
                    id = %row.id,
                    row = row_number,
                    "deduction row has no tax section"
                );
            }
            guessed
        }
        (_, section) => section,
    };

    Ok(Transaction {
        id: row.id,
        date,
        description: row.description,
        amount: row.amount,
        category,
        tax_section,
    })
}

/// Parses CSV text into transactions, in file order.
///
/// # Errors
///
/// * [StatementLoadError::Parse] for structural problems or bad amounts.
/// * [StatementLoadError::InvalidDate], [StatementLoadError::InvalidCategory]
///   and [StatementLoadError::InvalidSection] for bad cells, with the
///   1-based row number.
pub fn load_from_str(input: &str) -> Result<Vec<Transaction>, StatementLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Loads a statement file, naming the statement after the file.
pub fn load_statement(path: &Path) -> Result<BankStatement, StatementLoadError> {
    let contents = std::fs::read_to_string(path)?;
    let transactions = load_from_str(&contents)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!(statement = %name, transactions = transactions.len(), "loaded bank statement");
    Ok(BankStatement::new(name, transactions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const CATEGORISED_CSV: &str = "\
id,date,description,amount,category,tax_section
1,2024-01-01,Salary Credit,70000,income,
2,2024-01-10,LIC Premium,-10000,deduction,80C
3,2024-03-10,Home Loan Interest,-12000,deduction,24
4,2024-01-15,Swiggy Orders,-2000,not_useful,
";

    const BARE_CSV: &str = "\
id,date,description,amount
1,2024-01-01,Salary Credit,70000
2,2024-01-20,Health Insurance,-7000
3,2024-02-20,Phone Bill,-1200
";

    // -----------------------------------------------------------------------
    // 1. Categorised statements keep their categories
    // -----------------------------------------------------------------------
    #[test]
    fn test_categorised_rows_are_kept() {
        let transactions = load_from_str(CATEGORISED_CSV).expect("should parse");

        assert_eq!(transactions.len(), 4);
        assert_eq!(
            transactions[1],
            Transaction {
                id: "2".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                description: "LIC Premium".to_string(),
                amount: dec!(-10000),
                category: TransactionCategory::Deduction,
                tax_section: Some(DeductionSection::Section80C),
            }
        );
        assert_eq!(
            transactions[2].tax_section,
            Some(DeductionSection::HomeLoanInterest)
        );
        assert_eq!(transactions[3].category, TransactionCategory::NotUseful);
        assert_eq!(transactions[3].tax_section, None);
    }

    // -----------------------------------------------------------------------
    // 2. Bare statements are classified
    // -----------------------------------------------------------------------
    #[test]
    fn test_missing_category_column_uses_classifier() {
        let transactions = load_from_str(BARE_CSV).expect("should parse");

        assert_eq!(transactions[0].category, TransactionCategory::Income);
        assert_eq!(transactions[1].category, TransactionCategory::Deduction);
        assert_eq!(
            transactions[1].tax_section,
            Some(DeductionSection::Section80D)
        );
        assert_eq!(transactions[2].category, TransactionCategory::Expense);
    }

    #[test]
    fn test_deduction_without_section_is_guessed() {
        let csv = "id,date,description,amount,category,tax_section\n9,2024-05-05,PPF Contribution,-12000,deduction,\n";

        let transactions = load_from_str(csv).expect("should parse");

        assert_eq!(
            transactions[0].tax_section,
            Some(DeductionSection::Section80C)
        );
    }

    #[test]
    fn test_explicit_section_survives_missing_category() {
        let csv = "\
id,date,description,amount,category,tax_section
1,2024-06-02,UPI 44120 Ramesh Trust,-3000,,80G
2,2024-06-09,Parent Health Cover,-8000,,80D
3,2024-06-15,Insurance Premium,-9000,,80CCD
";

        let transactions = load_from_str(csv).expect("should parse");

        let sections: Vec<_> = transactions
            .iter()
            .map(|tx| (tx.category, tx.tax_section))
            .collect();
        assert_eq!(
            sections,
            vec![
                (TransactionCategory::Deduction, Some(DeductionSection::Section80G)),
                (TransactionCategory::Deduction, Some(DeductionSection::Section80D)),
                (TransactionCategory::Deduction, Some(DeductionSection::Nps)),
            ]
        );
    }

    // -----------------------------------------------------------------------
    // 3. Errors
    // -----------------------------------------------------------------------
    #[test]
    fn test_invalid_date_reports_row() {
        let csv = "id,date,description,amount\n1,2024-01-01,Salary,1\n2,01/02/2024,Salary,1\n";

        match load_from_str(csv).unwrap_err() {
            StatementLoadError::InvalidDate { value, row } => {
                assert_eq!(value, "01/02/2024");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_category_reports_row() {
        let csv = "id,date,description,amount,category\n1,2024-01-01,Salary,1,salary\n";

        match load_from_str(csv).unwrap_err() {
            StatementLoadError::InvalidCategory { value, row } => {
                assert_eq!(value, "salary");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_section_reports_row() {
        let csv = "id,date,description,amount,category,tax_section\n1,2024-01-01,Gold,-1,deduction,80Z\n";

        match load_from_str(csv).unwrap_err() {
            StatementLoadError::InvalidSection { value, row } => {
                assert_eq!(value, "80Z");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidSection, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_amount_is_parse_error() {
        let csv = "id,date,description,amount\n1,2024-01-01,Salary,\n";

        assert!(matches!(
            load_from_str(csv).unwrap_err(),
            StatementLoadError::Parse(_)
        ));
    }
}
