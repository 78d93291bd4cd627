//! # Tradecalc CLI Application
//!
//! Runs the trade calculators from the terminal. Each subcommand takes the
//! same raw fields as the web form; `run` takes a JSON
//! [`CalculationRequest`] from a file or stdin.
//!
//! ```text
//! calc_cli cable --current 32 --length 20 --method C
//! calc_cli u-value --element wall --insulation mineral-wool --thickness 100 --build extension
//! calc_cli scaffold --height 20 --length 20 --width 1.3 --json
//! echo '{"calculator":"scaffold","height_m":6,"length_m":10,"width_m":1.3}' | calc_cli run
//! ```
//!
//! Exit codes: 0 success, 1 error, 2 incomplete input.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use calc_core::calculations::{
    CableForm, CalculationOutcome, CalculationRequest, Calculators, ScaffoldForm, UValueForm,
};
use calc_core::rules::Severity;
use calc_core::{CalcError, CalcResult, CalculatorSettings};

/// Trade calculators: cable sizing, U-value compliance, scaffold take-off
#[derive(Parser, Debug)]
#[command(name = "calc_cli", version)]
#[command(
    about = "Trade calculators: cable sizing, U-value compliance, scaffold take-off",
    long_about = None
)]
struct Cli {
    /// Settings file (TOML); built-in defaults otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Print a downstream export document (JSON) instead of the result
    #[arg(long, global = true, value_enum)]
    export: Option<ExportKind>,

    /// Debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportKind {
    Quote,
    Report,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Size a cable from load current or power
    Cable(CableArgs),
    /// Check an element's U-value against the regulation target
    UValue(UValueArgs),
    /// Scaffold material take-off and stability checks
    Scaffold(ScaffoldArgs),
    /// Run a JSON calculation request
    Run {
        /// Request file; stdin when omitted
        path: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CableArgs {
    /// Load current (A)
    #[arg(long)]
    current: Option<String>,
    /// Load power (kW)
    #[arg(long)]
    power: Option<String>,
    /// Cable run length (m)
    #[arg(long)]
    length: Option<String>,
    /// Installation method: B, C or E
    #[arg(long)]
    method: Option<String>,
    /// single-phase or three-phase
    #[arg(long)]
    supply: Option<String>,
    /// Lighting circuit
    #[arg(long)]
    lighting: bool,
}

impl CableArgs {
    fn into_form(self) -> CableForm {
        CableForm {
            current_a: self.current.map(Into::into),
            power_kw: self.power.map(Into::into),
            length_m: self.length.map(Into::into),
            method: self.method,
            supply: self.supply,
            is_lighting: self.lighting,
        }
    }
}

#[derive(Args, Debug)]
struct UValueArgs {
    /// wall, roof or floor
    #[arg(long)]
    element: Option<String>,
    /// Insulation material code, e.g. mineral-wool, pir
    #[arg(long)]
    insulation: Option<String>,
    /// Insulation thickness (mm)
    #[arg(long)]
    thickness: Option<String>,
    /// new-build, extension or retrofit
    #[arg(long)]
    build: Option<String>,
    /// Element area for a cost estimate (m²)
    #[arg(long)]
    area: Option<String>,
}

impl UValueArgs {
    fn into_form(self) -> UValueForm {
        UValueForm {
            element_type: self.element,
            insulation: self.insulation,
            thickness_mm: self.thickness.map(Into::into),
            build_category: self.build,
            area_m2: self.area.map(Into::into),
        }
    }
}

#[derive(Args, Debug)]
struct ScaffoldArgs {
    /// independent or putlog
    #[arg(long = "type")]
    scaffold_type: Option<String>,
    /// Height (m)
    #[arg(long)]
    height: Option<String>,
    /// Length (m)
    #[arg(long)]
    length: Option<String>,
    /// Width (m)
    #[arg(long)]
    width: Option<String>,
    /// Explicit bay count
    #[arg(long)]
    bays: Option<String>,
    /// Explicit lift count
    #[arg(long)]
    lifts: Option<String>,
}

impl ScaffoldArgs {
    fn into_form(self) -> ScaffoldForm {
        ScaffoldForm {
            scaffold_type: self.scaffold_type,
            height_m: self.height.map(Into::into),
            length_m: self.length.map(Into::into),
            width_m: self.width.map(Into::into),
            bays: self.bays.map(Into::into),
            lifts: self.lifts.map(Into::into),
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_settings(path: Option<&PathBuf>) -> CalcResult<CalculatorSettings> {
    match path {
        Some(path) => CalculatorSettings::load(path),
        None => Ok(CalculatorSettings::default()),
    }
}

fn read_request(path: Option<&PathBuf>) -> CalcResult<CalculationRequest> {
    let source = match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CalcError::file_error("read", "<stdin>", e.to_string()))?;
            buf
        }
    };
    Ok(serde_json::from_str(&source)?)
}

fn build_request(command: Command) -> CalcResult<CalculationRequest> {
    Ok(match command {
        Command::Cable(args) => CalculationRequest::Cable(args.into_form()),
        Command::UValue(args) => CalculationRequest::UValue(args.into_form()),
        Command::Scaffold(args) => CalculationRequest::Scaffold(args.into_form()),
        Command::Run { path } => read_request(path.as_ref())?,
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> CalcResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn status_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "[INFO]",
        Severity::Warning => "[WARN]",
        Severity::Critical => "[FAIL]",
    }
}

fn print_text(outcome: &CalculationOutcome) {
    let report = outcome.report();
    println!("═══════════════════════════════════════");
    println!("  {}", report.title.to_uppercase());
    println!("═══════════════════════════════════════");
    println!();
    let width = report.rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    for row in &report.rows {
        let pad = width - row.label.chars().count();
        println!("  {}:{} {}", row.label, " ".repeat(pad), row.value);
    }
    println!();
    if report.warnings.is_empty() {
        println!("Checks: [OK] no warnings");
    } else {
        println!("Checks:");
        for warning in &report.warnings {
            println!("  {} {}", status_icon(warning.severity), warning.message);
        }
    }
    println!();
    println!("═══════════════════════════════════════");
    println!("  {}", report.summary);
    println!("═══════════════════════════════════════");
}

fn run(cli: Cli) -> CalcResult<()> {
    let settings = load_settings(cli.config.as_ref())?;
    let calculators = Calculators::with_defaults(&settings)?;
    let request = build_request(cli.command)?;
    debug!(calculator = request.calc_type(), "request built");

    let outcome = calculators.run(&request)?;
    match cli.export {
        Some(ExportKind::Quote) => println!("{}", to_json(&outcome.quote())?),
        Some(ExportKind::Report) => println!("{}", to_json(&outcome.report())?),
        None if cli.json => println!("{}", to_json(&outcome)?),
        None => print_text(&outcome),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                if let Ok(body) = serde_json::to_string_pretty(&e) {
                    eprintln!("{}", body);
                }
            } else {
                eprintln!("Error [{}]: {}", e.error_code(), e);
            }
            if e.is_incomplete() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
