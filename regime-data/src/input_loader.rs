//! CSV loader for batches of tax inputs.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Header
//! names are case-sensitive.
//!
//! | Column                    | Required | Type    | Notes                              |
//! |---------------------------|----------|---------|------------------------------------|
//! | `annual_income`           | yes      | amount  | e.g. `1200000` or `12,00,000`      |
//! | `employment_type`         | yes      | string  | See below                          |
//! | `age_band`                | yes      | string  | See below                          |
//! | `section_80c`             | no       | amount  | Empty or missing column means 0    |
//! | `section_80d`             | no       | amount  |                                    |
//! | `hra_exemption`           | no       | amount  |                                    |
//! | `home_loan_interest`      | no       | amount  |                                    |
//! | `education_loan_interest` | no       | amount  |                                    |
//! | `nps`                     | no       | amount  |                                    |
//! | `section_80g`             | no       | amount  |                                    |
//!
//! `employment_type` is one of `salaried`, `self_employed` (or
//! `self-employed`), `business`, `freelancer`. `age_band` is one of
//! `below_60`, `senior_60_to_80`, `super_senior_above_80`, or the short
//! forms `below60`, `60to80`, `above80`.
//!
//! ### Example
//!
//! ```csv
//! annual_income,employment_type,age_band,section_80c,section_80d
//! 1200000,salaried,below60,150000,25000
//! 650000,freelancer,60to80,,
//! ```
//!
//! Rows are only parsed here. Validation of the values happens in the
//! engine, so a row with a zero income loads fine and fails at evaluation.

use std::path::Path;

use regime_core::{AgeBand, Deductions, EmploymentType, TaxInput};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::amount::{deserialize_amount, deserialize_optional_amount};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(deserialize_with = "deserialize_amount")]
    annual_income: Decimal,
    employment_type: String,
    age_band: String,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    section_80c: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    section_80d: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    hra_exemption: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    home_loan_interest: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    education_loan_interest: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    nps: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    section_80g: Option<Decimal>,
}

/// Errors that can occur while loading tax inputs.
#[derive(Debug, thiserror::Error)]
pub enum InputLoadError {
    /// The CSV was structurally invalid or a cell could not be deserialized.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based, the header being row 0.
    #[error("unrecognised employment type '{value}' on row {row}")]
    InvalidEmploymentType { value: String, row: usize },

    #[error("unrecognised age band '{value}' on row {row}")]
    InvalidAgeBand { value: String, row: usize },

    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<TaxInput, InputLoadError> {
    let employment_type = EmploymentType::parse(&row.employment_type).ok_or_else(|| {
        InputLoadError::InvalidEmploymentType {
            value: row.employment_type.clone(),
            row: row_number,
        }
    })?;
    let age_band =
        AgeBand::parse(&row.age_band).ok_or_else(|| InputLoadError::InvalidAgeBand {
            value: row.age_band.clone(),
            row: row_number,
        })?;

    let deductions = Deductions {
        section_80c: row.section_80c.unwrap_or_default(),
        section_80d: row.section_80d.unwrap_or_default(),
        hra_exemption: row.hra_exemption.unwrap_or_default(),
        home_loan_interest: row.home_loan_interest.unwrap_or_default(),
        education_loan_interest: row.education_loan_interest.unwrap_or_default(),
        nps: row.nps.unwrap_or_default(),
        section_80g: row.section_80g.unwrap_or_default(),
    };

    Ok(TaxInput::new(
        row.annual_income,
        employment_type,
        age_band,
        deductions,
    ))
}

/// Parses CSV text row by row, in file order.
///
/// Each row gets its own result, so one unreadable row does not hide the
/// others. The row number carried by row-level errors is 1-based.
///
/// # Errors
///
/// The outer result fails only when the header record cannot be read.
/// Per-row results fail with:
///
/// * [InputLoadError::Parse] if the row is ragged or a required cell cannot
///   be deserialized.
/// * [InputLoadError::InvalidEmploymentType] / [InputLoadError::InvalidAgeBand]
///   for unrecognised enumeration values.
pub fn load_rows(input: &str) -> Result<Vec<Result<TaxInput, InputLoadError>>, InputLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());
    reader.headers()?;

    let rows: Vec<_> = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect();

    let failed = rows.iter().filter(|row| row.is_err()).count();
    tracing::debug!(rows = rows.len(), failed, "loaded tax inputs");
    Ok(rows)
}

/// Parses CSV text into tax inputs, failing on the first bad row.
///
/// # Errors
///
/// Any error [load_rows] reports, header or row.
pub fn load_from_str(input: &str) -> Result<Vec<TaxInput>, InputLoadError> {
    load_rows(input)?.into_iter().collect()
}

/// Reads `path` and delegates to [load_rows].
pub fn load_rows_from_file(path: &Path) -> Result<Vec<Result<TaxInput, InputLoadError>>, InputLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_rows(&contents)
}

/// Reads `path` and delegates to [load_from_str].
pub fn load_from_file(path: &Path) -> Result<Vec<TaxInput>, InputLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}
