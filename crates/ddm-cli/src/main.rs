mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::dividend_policy::{
    DividendTableArgs, GordonArgs, HModelArgs, LeadingPeArgs, SustainableGrowthArgs,
};
use commands::valuation::{DiscountFactorArgs, PvTableArgs, RateCurveArgs};

/// Discounted dividend and cash-flow valuation
#[derive(Parser)]
#[command(
    name = "ddm",
    version,
    about = "Discounted dividend and cash-flow valuation",
    long_about = "A CLI for present value tables and dividend discount models with decimal \
                  precision. Supports flat, explicit and geometrically interpolated rate \
                  curves, projected dividend tables with a Gordon terminal value, and the \
                  Gordon, leading P/E and H-model closed forms."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Present value table for a fixed cash-flow stream
    PvTable(PvTableArgs),
    /// Projected dividend table with a Gordon terminal value
    DividendTable(DividendTableArgs),
    /// Expand a rate curve into per-period rates
    RateCurve(RateCurveArgs),
    /// Discount factor for a single period
    DiscountFactor(DiscountFactorArgs),
    /// Gordon Growth Model value per share
    Gordon(GordonArgs),
    /// Justified leading P/E
    LeadingPe(LeadingPeArgs),
    /// Sustainable dividend growth (retention × ROE)
    SustainableGrowth(SustainableGrowthArgs),
    /// H-model two-stage dividend valuation
    HModel(HModelArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::PvTable(args) => commands::valuation::run_pv_table(args),
        Commands::DividendTable(args) => commands::dividend_policy::run_dividend_table(args),
        Commands::RateCurve(args) => commands::valuation::run_rate_curve(args),
        Commands::DiscountFactor(args) => commands::valuation::run_discount_factor(args),
        Commands::Gordon(args) => commands::dividend_policy::run_gordon(args),
        Commands::LeadingPe(args) => commands::dividend_policy::run_leading_pe(args),
        Commands::SustainableGrowth(args) => {
            commands::dividend_policy::run_sustainable_growth(args)
        }
        Commands::HModel(args) => commands::dividend_policy::run_h_model(args),
        Commands::Version => {
            println!("ddm {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
