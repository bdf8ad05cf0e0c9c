//! Command-line interface for report-bridge
//!
//! # Usage Examples
//!
//! ## Render formats
//! ```bash
//! # Every format with its option names
//! report-bridge variants list
//!
//! # One format's options and defaults
//! report-bridge variants show csv
//!
//! # Bind options; later flags win, --clear unsets a default
//! report-bridge variants bind PDF --set StartPage=1 --set EndPage=1
//! report-bridge variants bind csv --set FieldDelimiter=';' --clear ExcelMode --output pairs
//! ```
//!
//! ## Conversion
//! ```bash
//! # Convert to the counterpart type in the other universe
//! report-bridge convert --catalog catalog.yaml --input execution_info.json
//!
//! # Convert to an explicit target, reading the value from stdin
//! echo '{"$type": "ReportServer.Warning", "Code": "rsW1"}' \
//!   | report-bridge convert --catalog catalog.yaml --target string
//! ```
//!
//! Set `RUST_LOG=debug` to see resolved type pairs and blanked properties.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mirror_core::TypeRef;
use render_variants::VariantRegistry;
use report_bridge::export::{self, OutputFormat};
use report_bridge::{mapping, BridgeConfig, UniverseOpts};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "report-bridge")]
#[command(about = "Maps report-server values to test-harness mirrors and binds render-format options")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect render formats and bind their export options
    Variants {
        #[command(subcommand)]
        command: VariantCommands,
    },

    /// Convert a JSON-encoded value between the product and harness types
    Convert {
        /// Type catalog (YAML) declaring both universes
        #[arg(long)]
        catalog: PathBuf,

        /// Configuration file (TOML)
        #[arg(long, env = "REPORT_BRIDGE_CONFIG")]
        config: Option<PathBuf>,

        /// Explicit target type, e.g. `string` or `ReportServer.Warning[]`
        #[arg(long)]
        target: Option<TypeRef>,

        /// Input file holding one JSON value; stdin when omitted or `-`
        #[arg(long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        universes: UniverseOpts,
    },
}

#[derive(Subcommand)]
enum VariantCommands {
    /// List every render format and its option names
    List,

    /// Show one format's options with their defaults
    Show {
        /// Format name (case-insensitive), e.g. PDF
        format: String,
    },

    /// Bind option overrides and print the parameter map
    Bind {
        /// Format name (case-insensitive), e.g. PDF
        format: String,

        /// Option override
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = export::parse_assignment)]
        sets: Vec<(String, String)>,

        /// Option to unset
        #[arg(long = "clear", value_name = "KEY")]
        clears: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Variants { command } => run_variants(command),
        Commands::Convert {
            catalog,
            config,
            target,
            input,
            universes,
        } => {
            let config = BridgeConfig::resolve(config.as_deref(), &universes)?;
            let converter = mapping::load_converter(&catalog, &config)?;
            let input = read_input(input)?;
            let output = mapping::convert_json(&converter, &input, target.as_ref())?;
            println!("{output}");
            Ok(())
        }
    }
}

fn run_variants(command: VariantCommands) -> anyhow::Result<()> {
    let registry = VariantRegistry::new();
    match command {
        VariantCommands::List => {
            for line in export::list_formats(&registry) {
                println!("{line}");
            }
        }
        VariantCommands::Show { format } => {
            print!("{}", export::describe_format(&registry, &format)?);
        }
        VariantCommands::Bind {
            format,
            sets,
            clears,
            output,
        } => {
            let overrides = export::build_overrides(&sets, &clears);
            let params = export::bind_format(&registry, &format, overrides)?;
            println!("{}", export::render_parameters(&params, output)?);
        }
    }
    Ok(())
}

fn read_input(input: Option<PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read input from stdin")?;
            Ok(buffer)
        }
    }
}
