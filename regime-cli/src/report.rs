//! Report rendering.
//!
//! Amounts are exact until they reach this module; here they are rounded
//! half-up to two places for display.

use std::fmt;
use std::io::Write;

use regime_core::calculations::common::round_half_up;
use regime_core::calculations::{DeductionHeadroom, RuleTable};
use regime_core::suggestions::DeductionSuggestion;
use regime_core::{Comparison, RegimeResult};
use rust_decimal::Decimal;

use crate::cli::OutputFormat;

const CSV_HEADER: [&str; 12] = [
    "label",
    "old_taxable_income",
    "old_income_tax",
    "old_cess",
    "old_total_tax",
    "new_taxable_income",
    "new_income_tax",
    "new_cess",
    "new_total_tax",
    "recommended_regime",
    "savings",
    "error",
];

/// Format decimal as currency string.
fn fmt_currency(val: Decimal) -> String {
    format!("₹{:.2}", round_half_up(val))
}

fn fmt_plain(val: Decimal) -> String {
    format!("{:.2}", round_half_up(val))
}

/// Writes comparisons, suggestions and headroom in the chosen format.
pub struct ReportRenderer<W: Write> {
    out: W,
    format: OutputFormat,
    wrote_csv_header: bool,
}

impl<W: Write> ReportRenderer<W> {
    pub fn new(
        out: W,
        format: OutputFormat,
    ) -> Self {
        Self {
            out,
            format,
            wrote_csv_header: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Renders one comparison. `label` names the row in batch output.
    pub fn comparison(
        &mut self,
        label: &str,
        comparison: &Comparison,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Table => self.comparison_table(label, comparison),
            OutputFormat::Csv => self.comparison_csv(label, comparison),
        }
    }

    fn comparison_table(
        &mut self,
        label: &str,
        comparison: &Comparison,
    ) -> anyhow::Result<()> {
        let rows: [(&str, fn(&RegimeResult) -> Decimal); 7] = [
            ("Gross income", |r| r.gross_income),
            ("Total deductions", |r| r.total_deductions),
            ("Taxable income", |r| r.taxable_income),
            ("Income tax", |r| r.income_tax),
            ("Health & education cess", |r| r.cess),
            ("Total tax", |r| r.total_tax),
            ("Net income", |r| r.net_income),
        ];

        if !label.is_empty() {
            writeln!(self.out, "== {label} ==")?;
        }
        writeln!(self.out, "{:<24} {:>16} {:>16}", "", "Old Regime", "New Regime")?;
        for (name, field) in rows {
            writeln!(
                self.out,
                "{:<24} {:>16} {:>16}",
                name,
                fmt_currency(field(&comparison.old)),
                fmt_currency(field(&comparison.new)),
            )?;
        }
        writeln!(
            self.out,
            "\nRecommended: {} (saves {})\n",
            comparison.recommended_regime,
            fmt_currency(comparison.savings),
        )?;
        Ok(())
    }

    fn comparison_csv(
        &mut self,
        label: &str,
        comparison: &Comparison,
    ) -> anyhow::Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut self.out);
        if !self.wrote_csv_header {
            writer.write_record(CSV_HEADER)?;
            self.wrote_csv_header = true;
        }

        let (old, new) = (&comparison.old, &comparison.new);
        writer.write_record([
            label.to_string(),
            fmt_plain(old.taxable_income),
            fmt_plain(old.income_tax),
            fmt_plain(old.cess),
            fmt_plain(old.total_tax),
            fmt_plain(new.taxable_income),
            fmt_plain(new.income_tax),
            fmt_plain(new.cess),
            fmt_plain(new.total_tax),
            comparison.recommended_regime.as_str().to_string(),
            fmt_plain(comparison.savings),
            String::new(),
        ])?;
        writer.flush()?;
        Ok(())
    }

    /// Notes an input that could not be evaluated.
    ///
    /// In CSV output the row keeps its label, leaves every amount empty and
    /// carries the message in the `error` column.
    pub fn failure(
        &mut self,
        label: &str,
        error: &dyn fmt::Display,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Table => {
                writeln!(self.out, "== {label} ==\nerror: {error}\n")?;
            }
            OutputFormat::Csv => {
                let mut writer = csv::WriterBuilder::new()
                    .has_headers(false)
                    .from_writer(&mut self.out);
                if !self.wrote_csv_header {
                    writer.write_record(CSV_HEADER)?;
                    self.wrote_csv_header = true;
                }

                let mut record = vec![String::new(); CSV_HEADER.len()];
                record[0] = label.to_string();
                record[CSV_HEADER.len() - 1] = error.to_string();
                writer.write_record(&record)?;
                writer.flush()?;
            }
        }
        Ok(())
    }

    pub fn suggestion(
        &mut self,
        suggestion: &DeductionSuggestion,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Table => {
                writeln!(self.out, "Suggested values")?;
                if let Some(income) = suggestion.annual_income {
                    writeln!(self.out, "  {:<32} {:>16}", "Annual income", fmt_currency(income))?;
                }
                for (section, amount) in &suggestion.amounts {
                    writeln!(self.out, "  {:<32} {:>16}", section.label(), fmt_currency(*amount))?;
                }
                writeln!(self.out)?;
            }
            OutputFormat::Csv => {
                {
                    let mut writer = csv::Writer::from_writer(&mut self.out);
                    writer.write_record(["item", "amount"])?;
                    if let Some(income) = suggestion.annual_income {
                        writer.write_record(["annual_income".to_string(), fmt_plain(income)])?;
                    }
                    for (section, amount) in &suggestion.amounts {
                        writer.write_record([section.as_str().to_string(), fmt_plain(*amount)])?;
                    }
                    writer.flush()?;
                }
                // Blank line separates the suggestion from the comparison.
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    pub fn headroom(
        &mut self,
        headroom: &DeductionHeadroom,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Table => {
                writeln!(
                    self.out,
                    "{:<32} {:>14} {:>14} {:>14}",
                    "Section", "Cap", "Claimed", "Unused"
                )?;
                for entry in &headroom.entries {
                    writeln!(
                        self.out,
                        "{:<32} {:>14} {:>14} {:>14}",
                        entry.section.label(),
                        fmt_currency(entry.cap),
                        fmt_currency(entry.claimed),
                        fmt_currency(entry.unused),
                    )?;
                }
                writeln!(
                    self.out,
                    "\nTotal unused: {}",
                    fmt_currency(headroom.total_unused())
                )?;
            }
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(&mut self.out);
                writer.write_record(["section", "cap", "claimed", "allowed", "unused"])?;
                for entry in &headroom.entries {
                    writer.write_record([
                        entry.section.as_str().to_string(),
                        fmt_plain(entry.cap),
                        fmt_plain(entry.claimed),
                        fmt_plain(entry.allowed),
                        fmt_plain(entry.unused),
                    ])?;
                }
                writer.flush()?;
            }
        }
        Ok(())
    }

    /// Rules are always TOML, whatever the format.
    pub fn rules(
        &mut self,
        rules: &RuleTable,
    ) -> anyhow::Result<()> {
        let rendered = crate::config::render_rules(rules)?;
        write!(self.out, "{rendered}")?;
        Ok(())
    }
}
