//! verity CLI: evaluate declarative propositions and explain the outcome.

mod definition;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use definition::Definition;
use report::Report;

#[derive(Parser)]
#[command(name = "verity", version, about = "Evaluate propositions and explain why they hold")]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a definition against one or more numbers.
    ///
    /// Exits with status 2 when any evaluation is not satisfied.
    Evaluate {
        /// Path to the YAML definition file.
        definition: PathBuf,

        /// Numbers to evaluate.
        #[arg(required = true, allow_negative_numbers = true)]
        numbers: Vec<i64>,

        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: Format,

        /// Maximum width of an inlined operand in detailed output.
        #[arg(long)]
        width: Option<usize>,
    },

    /// Print the statement and detailed description of a definition.
    Describe {
        /// Path to the YAML definition file.
        definition: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Evaluate {
            definition,
            numbers,
            format,
            width,
        } => {
            let definition = Definition::load(&definition)?;
            let mut config = definition.render;
            if let Some(width) = width {
                config.max_line_width = width;
                config.validate()?;
            }

            let compiled = definition.compile()?;
            let report = Report::evaluate(&compiled, &numbers, config)?;

            match format {
                Format::Text => println!("{}", report.to_text(&config)),
                Format::Json => println!("{}", report.to_json()?),
            }

            Ok(if report.all_satisfied() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        Commands::Describe { definition } => {
            let definition = Definition::load(&definition)?;
            let description = definition.compile()?.description();

            println!("{}", description.statement());
            println!();
            println!("{}", description.detailed_with(&definition.render));
            Ok(ExitCode::SUCCESS)
        }
    }
}
