//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use regime_core::utils::parse_amount;
use regime_core::{AgeBand, Deductions, EmploymentType, TaxInput};
use rust_decimal::Decimal;

/// Compare India's old and new income-tax regimes.
///
/// Computes the tax payable under both regimes for the same income and
/// deductions and recommends the cheaper one.
#[derive(Debug, Parser)]
#[command(name = "regime", version)]
pub struct Cli {
    /// Log filter, e.g. `debug` or `regime_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Also write log records to this file (appended).
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// TOML file overriding the built-in slab and cap tables.
    #[arg(long, global = true, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Report format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare both regimes for one taxpayer.
    Compare(InputArgs),

    /// Compare both regimes for every row of a tax-inputs CSV.
    Batch {
        #[arg(long, value_name = "CSV")]
        file: PathBuf,
    },

    /// Pre-fill income and deductions from a bank statement and receipts.
    Suggest(SuggestArgs),

    /// Print the effective rule table as TOML.
    Rules,

    /// Show unused old-regime deduction room.
    Headroom(InputArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Gross annual income, e.g. `1200000` or `12,00,000`.
    #[arg(long, value_parser = parse_amount)]
    pub income: Option<Decimal>,

    #[arg(long, value_parser = parse_employment_type, default_value = "salaried")]
    pub employment: EmploymentType,

    /// below_60, senior_60_to_80 or super_senior_above_80.
    #[arg(long, value_parser = parse_age_band, default_value = "below_60")]
    pub age: AgeBand,

    #[arg(long = "section-80c", value_parser = parse_amount, default_value = "0")]
    pub section_80c: Decimal,

    #[arg(long = "section-80d", value_parser = parse_amount, default_value = "0")]
    pub section_80d: Decimal,

    #[arg(long = "hra", value_parser = parse_amount, default_value = "0")]
    pub hra_exemption: Decimal,

    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub home_loan_interest: Decimal,

    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub education_loan_interest: Decimal,

    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub nps: Decimal,

    #[arg(long = "section-80g", value_parser = parse_amount, default_value = "0")]
    pub section_80g: Decimal,
}

impl InputArgs {
    /// A missing `--income` becomes zero, which the engine rejects.
    pub fn to_tax_input(&self) -> TaxInput {
        TaxInput::new(
            self.income.unwrap_or_default(),
            self.employment,
            self.age,
            Deductions {
                section_80c: self.section_80c,
                section_80d: self.section_80d,
                hra_exemption: self.hra_exemption,
                home_loan_interest: self.home_loan_interest,
                education_loan_interest: self.education_loan_interest,
                nps: self.nps,
                section_80g: self.section_80g,
            },
        )
    }
}

#[derive(Debug, Clone, Args)]
pub struct SuggestArgs {
    /// Bank statement CSV.
    #[arg(long, value_name = "CSV")]
    pub statement: Option<PathBuf>,

    /// Receipt text file; repeat for several receipts.
    #[arg(long = "receipt", value_name = "TXT")]
    pub receipts: Vec<PathBuf>,

    #[command(flatten)]
    pub input: InputArgs,
}

fn parse_employment_type(s: &str) -> Result<EmploymentType, String> {
    EmploymentType::parse(s).ok_or_else(|| {
        let valid: Vec<_> = EmploymentType::all().iter().map(|e| e.as_str()).collect();
        format!("expected one of: {}", valid.join(", "))
    })
}

fn parse_age_band(s: &str) -> Result<AgeBand, String> {
    AgeBand::parse(s).ok_or_else(|| {
        let valid: Vec<_> = AgeBand::all().iter().map(|a| a.as_str()).collect();
        format!("expected one of: {}", valid.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compare_flags_build_tax_input() {
        let cli = Cli::parse_from([
            "regime",
            "compare",
            "--income",
            "12,00,000",
            "--age",
            "60to80",
            "--section-80c",
            "150000",
            "--hra",
            "₹50,000",
        ]);

        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        let input = args.to_tax_input();

        assert_eq!(input.annual_income, dec!(1200000));
        assert_eq!(input.employment_type, EmploymentType::Salaried);
        assert_eq!(input.age_band, AgeBand::Senior);
        assert_eq!(input.deductions.section_80c, dec!(150000));
        assert_eq!(input.deductions.hra_exemption, dec!(50000));
        assert_eq!(input.deductions.nps, dec!(0));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["regime", "rules", "--format", "csv", "--log-level", "debug"]);

        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Command::Rules));
    }

    #[test]
    fn suggest_accepts_repeated_receipts() {
        let cli = Cli::parse_from([
            "regime",
            "suggest",
            "--statement",
            "bank.csv",
            "--receipt",
            "a.txt",
            "--receipt",
            "b.txt",
        ]);

        let Command::Suggest(args) = cli.command else {
            panic!("expected suggest");
        };
        assert_eq!(args.statement, Some(PathBuf::from("bank.csv")));
        assert_eq!(args.receipts.len(), 2);
        assert_eq!(args.input.income, None);
    }

    #[test]
    fn bad_enumeration_is_rejected() {
        let result = Cli::try_parse_from(["regime", "compare", "--employment", "retired"]);

        assert!(result.is_err());
    }
}
