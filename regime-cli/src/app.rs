//! Subcommand execution.

use std::io::Write;

use anyhow::Context;
use regime_core::{TaxEngine, TaxInput};
use regime_core::calculations::{OldRegimeCalculator, RuleTable};
use regime_core::suggestions::{
    BankStatement, DeductionSuggestionSource, ReceiptBatch, collect_suggestions,
};
use regime_data::{InputLoadError, input_loader, statement_loader};
use tracing::{info, warn};

use crate::cli::{Cli, Command, InputArgs, SuggestArgs};
use crate::config;
use crate::report::ReportRenderer;

/// Runs the parsed command, writing its report to `out`.
///
/// Returns `Ok(false)` when the command completed but some of its work
/// failed (a batch row that could not be evaluated).
pub fn run<W: Write>(
    cli: &Cli,
    out: W,
) -> anyhow::Result<bool> {
    let rules = config::load_rules(cli.rules.as_deref()).context("loading rule table")?;
    let mut report = ReportRenderer::new(out, cli.format);

    match &cli.command {
        Command::Compare(args) => compare(&rules, args, &mut report).map(|_| true),
        Command::Batch { file } => {
            let rows = input_loader::load_rows_from_file(file)
                .with_context(|| format!("loading tax inputs from {}", file.display()))?;
            batch(&rules, &rows, &mut report)
        }
        Command::Suggest(args) => suggest(&rules, args, &mut report).map(|_| true),
        Command::Rules => report.rules(&rules).map(|_| true),
        Command::Headroom(args) => {
            let input = args.to_tax_input();
            input.validate()?;
            let headroom = OldRegimeCalculator::new(&rules.old).headroom(&input);
            report.headroom(&headroom).map(|_| true)
        }
    }
}

fn compare<W: Write>(
    rules: &RuleTable,
    args: &InputArgs,
    report: &mut ReportRenderer<W>,
) -> anyhow::Result<()> {
    let comparison = TaxEngine::new(rules).evaluate(&args.to_tax_input())?;
    report.comparison("", &comparison)
}

/// Evaluates every loaded row.
///
/// Rows that failed to load or to validate are reported in place and
/// skipped; the rest are still evaluated.
pub fn batch<W: Write>(
    rules: &RuleTable,
    rows: &[Result<TaxInput, InputLoadError>],
    report: &mut ReportRenderer<W>,
) -> anyhow::Result<bool> {
    let engine = TaxEngine::new(rules);
    let mut failed = 0usize;

    for (idx, row) in rows.iter().enumerate() {
        let label = format!("row {}", idx + 1);
        let outcome = match row {
            Ok(input) => engine.evaluate(input).map_err(|error| error.to_string()),
            Err(error) => Err(error.to_string()),
        };
        match outcome {
            Ok(comparison) => report.comparison(&label, &comparison)?,
            Err(error) => {
                warn!(row = idx + 1, %error, "skipping invalid row");
                report.failure(&label, &error)?;
                failed += 1;
            }
        }
    }

    info!(rows = rows.len(), failed, "batch complete");
    Ok(failed == 0)
}

fn suggest<W: Write>(
    rules: &RuleTable,
    args: &SuggestArgs,
    report: &mut ReportRenderer<W>,
) -> anyhow::Result<()> {
    let statement: Option<BankStatement> = args
        .statement
        .as_deref()
        .map(|path| {
            statement_loader::load_statement(path)
                .with_context(|| format!("loading bank statement from {}", path.display()))
        })
        .transpose()?;

    let mut receipts = ReceiptBatch::new();
    for path in &args.receipts {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading receipt {}", path.display()))?;
        receipts.push(path.display().to_string(), text);
    }

    let mut sources: Vec<&dyn DeductionSuggestionSource> = Vec::new();
    if let Some(statement) = &statement {
        sources.push(statement);
    }
    if !receipts.is_empty() {
        sources.push(&receipts);
    }
    if sources.is_empty() {
        anyhow::bail!("nothing to suggest from: pass --statement and/or --receipt");
    }

    let suggestion = collect_suggestions(&sources)?;
    let input = suggestion.apply_to(&args.input.to_tax_input());
    let comparison = TaxEngine::new(rules).evaluate(&input)?;

    report.suggestion(&suggestion)?;
    report.comparison("", &comparison)
}
