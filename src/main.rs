// ==========================================
// 管材采购决策 - 命令行入口
// ==========================================
// evaluate: 评估一次采购
// options : 列出合同表中的可选材料 / DE / PN
// check   : 加载合同表并输出 DQ 报告
// ==========================================

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pipe_procurement::config::CONFIG_PATH_ENV;
use pipe_procurement::domain::{DqLevel, DqReport};
use pipe_procurement::{
    logging, ApiError, DecisionResult, FormOptions, PackageType, ProcurementConfig, PurchaseApi,
    PurchaseInput,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pipe-procurement")]
#[command(about = "Recommande le canal d'achat (négoce, fabricant, tarif contractuel) pour les tubes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON)
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Contract table (.xlsx/.xls/.csv/.db), overrides the configuration
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one purchase
    Evaluate {
        /// Material (must match the contract table)
        #[arg(short, long)]
        material: Option<String>,

        /// Package: couronne, barre or touret
        #[arg(short, long)]
        package: Option<PackageType>,

        /// Quantity in linear metres
        #[arg(short, long)]
        quantity: Option<u32>,

        /// Outer diameter (DE)
        #[arg(long)]
        de: Option<f64>,

        /// Nominal pressure (PN)
        #[arg(long)]
        pn: Option<f64>,

        /// Reference date for contract validity (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// List materials, DE and PN values present in the contract table
    Options,

    /// Load the contract table and print the data quality report
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Erreur: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = ProcurementConfig::load(cli.config.as_deref())
        .context("chargement de la configuration")?;
    if let Some(catalog) = cli.catalog {
        config.catalog_path = Some(catalog);
    }

    tracing::info!(version = pipe_procurement::VERSION, "{}", pipe_procurement::APP_NAME);
    let api = PurchaseApi::bootstrap(config);

    match cli.command {
        Commands::Evaluate {
            material,
            package,
            quantity,
            de,
            pn,
            as_of,
        } => {
            let input = PurchaseInput {
                material,
                package,
                quantity,
                outer_diameter: de,
                nominal_pressure: pn,
            };
            let result = match as_of {
                Some(date) => api.evaluate_at(&input, date),
                None => api.evaluate(&input),
            };
            let result = match result {
                Ok(result) => result,
                Err(ApiError::DataUnavailable(reason)) => {
                    eprintln!("Données contrats indisponibles: {}", reason);
                    return Ok(ExitCode::from(2));
                }
                Err(e) => bail!(e),
            };
            print_decision(&result, cli.json)?;
        }
        Commands::Options => {
            let options = api.options()?;
            print_options(&options, cli.json)?;
        }
        Commands::Check => {
            if let Err(e) = api.engine().catalog().snapshot() {
                eprintln!("{}", e);
                return Ok(ExitCode::from(2));
            }
            if let Some(report) = api.last_report() {
                print_report(&report, cli.json)?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_decision(result: &DecisionResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("[{}]", result.channel);
    println!("{}", result.message);
    for reason in &result.reasons {
        tracing::debug!(reason = %reason, "règle");
    }
    Ok(())
}

fn print_options(options: &FormOptions, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(options)?);
        return Ok(());
    }

    println!("Matériaux: {}", options.materials.join(", "));
    let packages: Vec<&str> = options.packages.iter().map(|p| p.as_str()).collect();
    println!("Conditionnements: {}", packages.join(", "));
    println!("DE: {}", join_numbers(&options.outer_diameters));
    println!("PN: {}", join_numbers(&options.nominal_pressures));
    Ok(())
}

fn print_report(report: &DqReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let s = &report.summary;
    println!("Source: {}", report.source);
    println!(
        "Lignes: {}, chargées: {}, bloquées: {}, avertissements: {}",
        s.total_rows, s.loaded, s.blocked, s.warning
    );
    for v in &report.violations {
        let level = match v.level {
            DqLevel::Error => "ERROR",
            DqLevel::Warning => "WARN ",
            DqLevel::Info => "INFO ",
        };
        println!("  {} ligne {:>4} [{}] {}", level, v.row_number, v.field, v.message);
    }
    Ok(())
}

fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
