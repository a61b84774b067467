//! Avalanche Planner CLI
//!
//! Command-line interface for managing debts and running avalanche plans

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;

use avalanche_planner::calc::{summarize, MinimumPaymentRules, StrategyConfig, Strategy, DEFAULT_MONTHS_TO_SHOW};
use avalanche_planner::debt::{
    load_drafts_csv, load_records_json, DebtCategory, DebtDraft, DebtId, DebtRecord, DebtStore,
    FeeMode, JsonFileStore, UserProfile, DEFAULT_CURRENCY,
};
use avalanche_planner::format::{currency as currency_info, format_currency, format_percentage};
use avalanche_planner::{AvalancheEngine, PlannerError, ScenarioRunner};

#[derive(Debug, Parser)]
#[command(name = "avalanche", version, about = "Plan debt repayment with the avalanche method")]
struct Cli {
    /// JSON file holding stored debts and the user profile
    #[arg(long, global = true, default_value = "debts.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the avalanche allocation and print recommendations
    Plan {
        #[command(flatten)]
        input: PlanInput,

        /// Monthly funds available (defaults to the stored profile)
        #[arg(long)]
        funds: Option<f64>,

        /// Write every recommendation's monthly breakdown to this CSV file
        #[arg(long)]
        csv_out: Option<PathBuf>,
    },
    /// Print totals and rate range for the debts
    Summary {
        /// Read debts from a JSON or CSV file instead of the store
        #[arg(long)]
        debts: Option<PathBuf>,

        #[arg(long)]
        default_min_percent: Option<f64>,
    },
    /// Compare payoff time across several monthly budgets
    Sweep {
        #[command(flatten)]
        input: PlanInput,

        /// Budgets to compare (comma separated)
        #[arg(long = "levels", value_delimiter = ',', required = true)]
        levels: Vec<f64>,
    },
    /// Validate and store a new debt
    Add {
        #[arg(long)]
        creditor: String,

        #[arg(long, value_enum, default_value_t = KindArg::Revolving)]
        kind: KindArg,

        #[arg(long)]
        balance: f64,

        /// Annual interest rate in percent
        #[arg(long)]
        rate: f64,

        #[arg(long)]
        min_payment: Option<f64>,

        /// Loan term in months (installment only)
        #[arg(long)]
        term: Option<u32>,

        /// Loan fee amount (installment only)
        #[arg(long)]
        fee: Option<f64>,

        #[arg(long, value_enum)]
        fee_mode: Option<FeeModeArg>,
    },
    /// Remove a stored debt by id
    Remove { id: String },
    /// Validate every row of a CSV file and add them to the store
    ImportCsv { path: PathBuf },
    /// Store the monthly budget and preferences
    SetProfile {
        #[arg(long)]
        funds: f64,

        #[arg(long, default_value = DEFAULT_CURRENCY)]
        currency: String,

        #[arg(long, default_value_t = 2.0)]
        default_min_percent: f64,
    },
    /// Print the store as JSON
    Export,
}

#[derive(Debug, clap::Args)]
struct PlanInput {
    /// Read debts from a JSON or CSV file instead of the store
    #[arg(long)]
    debts: Option<PathBuf>,

    /// Breakdown months to show per debt
    #[arg(long, default_value_t = DEFAULT_MONTHS_TO_SHOW)]
    months: u32,

    /// Minimum payment percentage for debts without one (defaults to the stored profile)
    #[arg(long)]
    default_min_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Revolving,
    Installment,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FeeModeArg {
    Upfront,
    Monthly,
}

/// Flat breakdown row for CSV output
#[derive(Debug, Serialize)]
struct BreakdownCsvRow<'a> {
    debt_id: String,
    creditor: &'a str,
    month: u32,
    payment: f64,
    interest: f64,
    principal: f64,
    balance: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut store = JsonFileStore::new(&cli.store);

    match cli.command {
        Command::Plan { input, funds, csv_out } => run_plan(&store, &input, funds, csv_out.as_deref()),
        Command::Summary { debts, default_min_percent } => {
            run_summary(&store, debts.as_deref(), default_min_percent)
        }
        Command::Sweep { input, levels } => run_sweep(&store, &input, &levels),
        Command::Add { creditor, kind, balance, rate, min_payment, term, fee, fee_mode } => {
            let draft = DebtDraft {
                creditor_name: creditor,
                category: Some(match kind {
                    KindArg::Revolving => DebtCategory::Revolving,
                    KindArg::Installment => DebtCategory::Installment,
                }),
                balance: Some(balance),
                minimum_payment: min_payment,
                interest_rate: Some(rate),
                term_months: term,
                fee,
                fee_mode: fee_mode.map(|m| match m {
                    FeeModeArg::Upfront => FeeMode::Upfront,
                    FeeModeArg::Monthly => FeeMode::Monthly,
                }),
            };
            let record = accept_draft(draft)?;
            println!(
                "Added {} debt {} ({})",
                record.kind.category().as_str(),
                record.creditor_name,
                record.id
            );
            store.add_debt(record).context("saving debt")?;
            Ok(())
        }
        Command::Remove { id } => {
            let id = id.parse::<DebtId>().map_err(|e| anyhow!("invalid debt id {}: {}", id, e))?;
            store.delete_debt(id).context("removing debt")?;
            println!("Removed {}", id);
            Ok(())
        }
        Command::ImportCsv { path } => {
            let records = load_csv_records(&path)?;
            let mut debts = store.load_debts().context("loading stored debts")?;
            let count = records.len();
            debts.extend(records);
            store.save_debts(&debts).context("saving debts")?;
            println!("Imported {} debts from {}", count, path.display());
            Ok(())
        }
        Command::SetProfile { funds, currency, default_min_percent } => {
            if !(1.0..=10.0).contains(&default_min_percent) {
                bail!("default minimum percentage must be between 1 and 10");
            }
            let profile = UserProfile {
                available_funds: funds,
                currency,
                default_min_percent,
                last_updated: Utc::now(),
            };
            store.save_profile(profile).context("saving profile")?;
            println!("Profile saved");
            Ok(())
        }
        Command::Export => {
            println!("{}", store.export().context("exporting store")?);
            Ok(())
        }
    }
}

/// Validate a draft, printing every problem on failure
fn accept_draft(draft: DebtDraft) -> Result<DebtRecord> {
    match draft.into_record(Utc::now()) {
        Ok(record) => Ok(record),
        Err(PlannerError::Validation(errors)) => {
            for error in &errors {
                eprintln!("  - {}", error);
            }
            bail!("debt rejected with {} validation error(s)", errors.len())
        }
        Err(e) => Err(e.into()),
    }
}

fn load_csv_records(path: &Path) -> Result<Vec<DebtRecord>> {
    let drafts = load_drafts_csv(path).with_context(|| format!("reading {}", path.display()))?;
    drafts
        .into_iter()
        .enumerate()
        .map(|(i, draft)| {
            let creditor = draft.creditor_name.clone();
            accept_draft(draft).with_context(|| format!("row {} ({})", i + 1, creditor))
        })
        .collect()
}

fn load_debts(store: &JsonFileStore, path: Option<&Path>) -> Result<Vec<DebtRecord>> {
    match path {
        Some(path) if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) => {
            load_csv_records(path)
        }
        Some(path) => load_records_json(path).with_context(|| format!("reading {}", path.display())),
        None => store
            .load_debts()
            .with_context(|| format!("reading store {}", store.path().display())),
    }
}

/// Debts, stored funds, config and currency for a plan or sweep
fn resolve_plan_input(
    store: &JsonFileStore,
    input: &PlanInput,
) -> Result<(Vec<DebtRecord>, Option<f64>, StrategyConfig, String)> {
    let debts = load_debts(store, input.debts.as_deref())?;
    let profile = store.load_profile().context("reading profile")?;

    let stored_funds = profile.as_ref().map(|p| p.available_funds);
    let default_percent = input
        .default_min_percent
        .or(profile.as_ref().map(|p| p.effective_min_percent()))
        .unwrap_or(MinimumPaymentRules::default().default_percent);
    let currency = profile
        .map(|p| p.currency)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    info!(
        "Loaded {} debts (stored funds={:?}, default min {}%)",
        debts.len(),
        stored_funds,
        default_percent
    );

    Ok((debts, stored_funds, StrategyConfig::new(input.months, default_percent), currency))
}

fn run_plan(
    store: &JsonFileStore,
    input: &PlanInput,
    funds: Option<f64>,
    csv_out: Option<&Path>,
) -> Result<()> {
    let (debts, stored_funds, config, currency) = resolve_plan_input(store, input)?;
    let funds = funds
        .or(stored_funds)
        .ok_or_else(|| anyhow!("no available funds: pass --funds or run set-profile"))?;

    let strategy = AvalancheEngine::new(config).calculate(&debts, funds);
    print_strategy(&strategy, &currency);

    if let Some(path) = csv_out {
        write_breakdown_csv(path, &strategy)?;
        println!("\nBreakdown written to: {}", path.display());
    }

    Ok(())
}

fn print_strategy(strategy: &Strategy, currency: &str) {
    let money = |amount: f64| format_currency(amount, currency);

    println!("Avalanche Plan");
    println!("==============\n");
    println!("  Available funds:   {}", money(strategy.total_available_funds));
    println!("  Minimum payments:  {}", money(strategy.total_minimum_payments));
    println!("  Extra funds:       {}", money(strategy.extra_funds));
    if strategy.is_underfunded() {
        println!("  Warning: minimum payments exceed available funds");
    }
    println!();

    if strategy.recommendations.is_empty() {
        println!("No debts to plan.");
        return;
    }

    println!(
        "{:<3} {:<24} {:>8} {:>14} {:>12} {:>14} {:>12} {:>14}",
        "", "Creditor", "Rate", "Balance", "Minimum", "Recommended", "Payoff", "Int. Saved"
    );
    println!("{}", "-".repeat(108));

    for rec in &strategy.recommendations {
        println!(
            "{:<3} {:<24} {:>8} {:>14} {:>12} {:>14} {:>12} {:>14}",
            if rec.is_target_debt { "*" } else { "" },
            rec.creditor_name,
            format_percentage(rec.interest_rate),
            money(rec.current_balance),
            money(rec.minimum_payment),
            money(rec.recommended_payment),
            rec.months_to_payoff.to_string(),
            money(rec.interest_saved),
        );
    }

    if let Some(target) = strategy.target() {
        println!("\nTarget: {} (* receives all extra funds)", target.creditor_name);
        println!(
            "{:>5} {:>12} {:>12} {:>12} {:>14}",
            "Month", "Payment", "Interest", "Principal", "Balance"
        );
        for row in &target.monthly_breakdown {
            println!(
                "{:>5} {:>12} {:>12} {:>12} {:>14}",
                row.month,
                money(row.payment),
                money(row.interest),
                money(row.principal),
                money(row.balance),
            );
        }
        if target.continues_beyond_window() {
            println!("  ... continues beyond {} months", target.monthly_breakdown.len());
        }
    }

    println!("\nMonths until target debt is paid off: {}", strategy.total_months_to_debt_free);
    println!("Interest saved on target debt: {}", money(strategy.total_interest_saved));
}

fn write_breakdown_csv(path: &Path, strategy: &Strategy) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    for rec in &strategy.recommendations {
        let debt_id = rec.debt_id.to_string();
        for row in &rec.monthly_breakdown {
            writer.serialize(BreakdownCsvRow {
                debt_id: debt_id.clone(),
                creditor: &rec.creditor_name,
                month: row.month,
                payment: row.payment,
                interest: row.interest,
                principal: row.principal,
                balance: row.balance,
            })?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn run_summary(store: &JsonFileStore, debts: Option<&Path>, default_min_percent: Option<f64>) -> Result<()> {
    let debts = load_debts(store, debts)?;
    let profile = store.load_profile().context("reading profile")?;
    let percent = default_min_percent
        .or(profile.as_ref().map(|p| p.effective_min_percent()))
        .unwrap_or(MinimumPaymentRules::default().default_percent);
    let currency = profile
        .map(|p| p.currency)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let summary = summarize(&debts, &MinimumPaymentRules::with_default_percent(percent));

    println!("Summary:");
    if let Some(info) = currency_info(&currency) {
        println!("  Currency:         {} ({})", info.name, info.code);
    }
    println!("  Debts:            {}", summary.count);
    println!("  Total balance:    {}", format_currency(summary.total_balance, &currency));
    println!("  Total minimums:   {}", format_currency(summary.total_minimum, &currency));
    println!("  Highest rate:     {}", format_percentage(summary.max_rate));
    println!("  Lowest rate:      {}", format_percentage(summary.min_rate));
    Ok(())
}

fn run_sweep(store: &JsonFileStore, input: &PlanInput, levels: &[f64]) -> Result<()> {
    let (debts, _, config, currency) = resolve_plan_input(store, input)?;
    let runner = ScenarioRunner::new(config);

    println!("{:>14} {:>14} {:>16} {:>16}", "Funds", "Extra", "Target payoff", "Interest saved");
    for (funds, strategy) in runner.run_funds_sweep(&debts, levels) {
        println!(
            "{:>14} {:>14} {:>16} {:>16}",
            format_currency(funds, &currency),
            format_currency(strategy.extra_funds, &currency),
            strategy.total_months_to_debt_free.to_string(),
            format_currency(strategy.total_interest_saved, &currency),
        );
    }
    Ok(())
}
