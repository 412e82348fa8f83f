//! odgen CLI - daily shooting schedule generator
//!
//! Reads the scene breakdown and the shooting plan, then writes one
//! "Ordem do Dia" spreadsheet per shooting day.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use odgen_cli::{load_project, OdGenerator, Settings};
use odgen_core::DayNumber;
use odgen_render::OdSheetRenderer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "odgen")]
#[command(author, version, about = "Daily shooting schedule (Ordem do Dia) generator", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (TOML)
    #[arg(long, value_name = "FILE", env = "ODGEN_SETTINGS", global = true)]
    settings: Option<PathBuf>,

    /// Scene breakdown CSV
    #[arg(long, value_name = "FILE", env = "ODGEN_CSV", global = true)]
    csv: Option<PathBuf>,

    /// Shooting plan (PDF or extracted .txt)
    #[arg(long, value_name = "FILE", env = "ODGEN_PLAN", global = true)]
    plan: Option<PathBuf>,

    /// Project configuration JSON to write
    #[arg(long, value_name = "FILE", env = "ODGEN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output directory for the day sheets
    #[arg(short, long, value_name = "DIR", env = "ODGEN_OUTPUT", global = true)]
    output: Option<PathBuf>,

    /// Scenes per day when the plan has no day markers
    #[arg(long, value_name = "N", global = true)]
    scenes_per_day: Option<usize>,

    /// Date printed on the banner (YYYY-MM-DD, default today)
    #[arg(long, value_name = "DATE", global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the sheet of one day, or of every day
    Generate {
        /// Day number or "all"
        #[arg(value_name = "DAY|all")]
        target: DayTarget,
    },

    /// Check that the inputs exist and summarize what they contain
    Check,

    /// Write the project configuration JSON only
    Config,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DayTarget {
    All,
    Day(DayNumber),
}

impl FromStr for DayTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match s.parse() {
            Ok(day) if day > 0 => Ok(Self::Day(day)),
            _ => Err(format!("expected a day number or \"all\", got {s:?}")),
        }
    }
}

impl Cli {
    /// Settings file values, with command-line flags taking precedence
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load_or_default(self.settings.as_deref())?;
        if let Some(csv) = &self.csv {
            settings.breakdown.clone_from(csv);
        }
        if let Some(plan) = &self.plan {
            settings.plan.clone_from(plan);
        }
        if let Some(config) = &self.config {
            settings.config.clone_from(config);
        }
        if let Some(output) = &self.output {
            settings.output_dir.clone_from(output);
        }
        if let Some(scenes) = self.scenes_per_day {
            settings.scenes_per_day = scenes;
        }
        if self.date.is_some() {
            settings.shoot_date = self.date;
        }
        Ok(settings)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = cli.settings()?;

    match cli.command {
        Some(Commands::Generate { target }) => generate(settings, target),
        Some(Commands::Check) => check(&settings),
        Some(Commands::Config) => {
            let mut generator = OdGenerator::new(settings, OdSheetRenderer::new());
            let days = generator.prepare()?.config.days.len();
            println!(
                "Configuration with {days} day(s) written to {}",
                generator.settings().config.display()
            );
            Ok(())
        }
        None => {
            println!("odgen - Ordem do Dia generator");
            println!("Run with --help for usage information");
            Ok(())
        }
    }
}

fn generate(settings: Settings, target: DayTarget) -> Result<()> {
    let mut renderer = OdSheetRenderer::new();
    renderer.shoot_date = settings.shoot_date;
    let mut generator = OdGenerator::new(settings, renderer);

    let project = generator.prepare().context("Cannot load inputs")?;
    println!(
        "{}: {} day(s), {} scene(s)",
        project.config.project.title,
        project.config.days.len(),
        project.breakdown.len()
    );

    match target {
        DayTarget::Day(day) => {
            let path = generator.generate(day)?;
            println!("Day {day}: {}", path.display());
        }
        DayTarget::All => {
            let report = generator.generate_all()?;
            for (day, path) in &report.written {
                println!("Day {day}: {}", path.display());
            }
            for (day, err) in &report.failed {
                println!("Day {day}: FAILED ({err})");
            }
            println!("{}/{} day(s) generated", report.written.len(), report.total());
            if !report.is_success() {
                bail!("{} day(s) failed", report.failed.len());
            }
        }
    }
    Ok(())
}

fn check(settings: &Settings) -> Result<()> {
    let missing = settings.missing_inputs();
    for path in [&settings.breakdown, &settings.plan] {
        let status = if missing.contains(&path.as_path()) { "missing" } else { "ok" };
        println!("{:<8} {}", status, path.display());
    }
    if !missing.is_empty() {
        bail!("{} input file(s) missing", missing.len());
    }

    let project = load_project(settings)?;
    let config = &project.config;
    println!("Title:  {}", config.project.title);
    println!("Scenes: {} ({} shots)", project.breakdown.len(), project.breakdown.shot_count());
    println!("Days:   {}", config.days.len());
    for (day, plan) in &config.days {
        println!("  Day {day}: {} scene(s)", plan.scenes.len());
    }
    Ok(())
}
