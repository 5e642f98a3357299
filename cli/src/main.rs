use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use cron_schema_core::{
    InputOptions, OptionOverride, OptionPreset, get_preset, preset_names, register_preset,
};
use cron_schema_validator::ValidationReport;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cron-check")]
#[command(about = "Validate cron expressions against dialect presets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate one or more cron expressions.
    Check(CheckArgs),
    /// List the registered preset names.
    Presets,
    /// Print a preset definition.
    Show(ShowArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Expressions to validate. Reads one expression per line from
    /// stdin when omitted or when a single `-` is given.
    expressions: Vec<String>,
    /// Preset to validate against (default: "default").
    #[arg(long, default_value = "default")]
    preset: String,
    /// Register a custom preset from a JSON or YAML file before
    /// checking, and validate against it.
    #[arg(long)]
    preset_file: Option<PathBuf>,
    /// Enable the seconds field.
    #[arg(long)]
    seconds: bool,
    /// Enable the years field.
    #[arg(long)]
    years: bool,
    /// Accept month and weekday aliases (jan-dec, sun-sat).
    #[arg(long)]
    aliases: bool,
    /// Accept the blank day token `?` in the day fields.
    #[arg(long)]
    blank_day: bool,
    /// Accept `L` tokens (last day of month / last weekday occurrence).
    #[arg(long)]
    last_day: bool,
    /// Accept `nW` and `LW` nearest-weekday tokens.
    #[arg(long)]
    nearest_weekday: bool,
    /// Accept `n#k` nth-weekday tokens.
    #[arg(long)]
    nth_weekday: bool,
    /// Output format (default: text).
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Preset name.
    name: String,
    /// Output format (default: json).
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Check(args) => run_check(args),
        Command::Presets => {
            for name in preset_names() {
                println!("{name}");
            }
            ExitCode::SUCCESS
        }
        Command::Show(args) => run_show(args),
    }
}

fn run_check(args: CheckArgs) -> ExitCode {
    let preset_name = match args.preset_file.as_deref() {
        Some(path) => match register_preset_file(path) {
            Ok(name) => name,
            Err(message) => {
                eprintln!("error: {message}");
                return ExitCode::FAILURE;
            }
        },
        None => args.preset.clone(),
    };

    let mut input = InputOptions::preset(&preset_name);
    input.overrides = collect_overrides(&args);

    let expressions = match gather_expressions(&args.expressions) {
        Ok(expressions) => expressions,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };
    if expressions.is_empty() {
        eprintln!("error: no expressions to check");
        return ExitCode::FAILURE;
    }

    let reports: Vec<ValidationReport> = expressions
        .iter()
        .map(|expression| ValidationReport::evaluate(expression, &input))
        .collect();
    let failures = reports.iter().filter(|report| !report.valid).count();

    match args.format {
        CliOutputFormat::Text => {
            for report in &reports {
                if report.valid {
                    println!("OK   {}", report.expression);
                } else {
                    println!("FAIL {}", report.expression);
                    for error in &report.errors {
                        println!("     {error}");
                    }
                }
            }
            if failures > 0 {
                println!("{failures} of {} expressions invalid", reports.len());
            }
        }
        CliOutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&reports).expect("reports serialize to JSON")
            );
        }
        CliOutputFormat::Yaml => {
            print!(
                "{}",
                serde_yaml::to_string(&reports).expect("reports serialize to YAML")
            );
        }
    }

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_show(args: ShowArgs) -> ExitCode {
    let preset = match get_preset(&args.name) {
        Ok(preset) => preset,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };
    match args.format {
        CliOutputFormat::Json | CliOutputFormat::Text => {
            println!(
                "{}",
                serde_json::to_string_pretty(&preset).expect("preset serializes to JSON")
            );
        }
        CliOutputFormat::Yaml => {
            print!(
                "{}",
                serde_yaml::to_string(&preset).expect("preset serializes to YAML")
            );
        }
    }
    ExitCode::SUCCESS
}

fn collect_overrides(args: &CheckArgs) -> OptionOverride {
    let mut overrides = OptionOverride::default();
    let flags = [
        (args.seconds, &mut overrides.use_seconds),
        (args.years, &mut overrides.use_years),
        (args.aliases, &mut overrides.use_aliases),
        (args.blank_day, &mut overrides.use_blank_day),
        (args.last_day, &mut overrides.use_last_day_of_month),
        (args.nearest_weekday, &mut overrides.use_nearest_weekday),
        (args.nth_weekday, &mut overrides.use_nth_weekday_of_month),
    ];
    for (enabled, slot) in flags {
        if enabled {
            *slot = Some(true);
        }
    }
    // The two `L` forms travel together on the command line.
    if args.last_day {
        overrides.use_last_day_of_week = Some(true);
    }
    overrides
}

/// Loads an `OptionPreset` from a JSON or YAML file and registers it
/// under its own `presetId`.
fn register_preset_file(path: &Path) -> Result<String, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("cannot read {}: {error}", path.display()))?;
    let preset: OptionPreset = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&raw)
            .map_err(|error| format!("cannot parse {}: {error}", path.display()))?
    } else {
        serde_yaml::from_str(&raw)
            .map_err(|error| format!("cannot parse {}: {error}", path.display()))?
    };

    let name = preset.preset_id.clone();
    register_preset(&name, preset).map_err(|error| error.to_string())?;
    Ok(name)
}

fn gather_expressions(args: &[String]) -> Result<Vec<String>, String> {
    if !args.is_empty() && args != ["-"] {
        return Ok(args.to_vec());
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| format!("cannot read stdin: {error}"))?;
    Ok(buffer
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
