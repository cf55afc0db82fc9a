//! `hrv`: inspect and round-trip health record item XML.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::RunConfig;
use hrv_model::ItemRegistry;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "hrv")]
#[command(about = "Health record item XML tool")]
struct Cli {
    /// Indent written XML by this many spaces (0 for compact)
    #[arg(long, global = true)]
    indent: Option<usize>,

    /// Prefix written XML with an XML declaration
    #[arg(long, global = true)]
    declaration: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered item types
    Types,
    /// Parse a record item file and describe it
    Inspect {
        /// XML file holding one record item
        file: PathBuf,
        /// Parse as this item type instead of detecting it from the root element
        #[arg(long)]
        type_id: Option<Uuid>,
        /// Print the whole item as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a record item file and write it back out
    Roundtrip {
        file: PathBuf,
        #[arg(long)]
        type_id: Option<Uuid>,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that a record item file survives a parse and re-serialise cycle
    Check {
        file: PathBuf,
        #[arg(long)]
        type_id: Option<Uuid>,
    },
}

/// Main entry point for the `hrv` tool.
///
/// # Environment Variables
/// - `HRV_XML_INDENT`: indentation for written XML (default: compact)
/// - `HRV_XML_DECLARATION`: `true` to write an XML declaration (default: `false`)
/// - `HRV_LOG`: tracing filter directive (default: "hrv=info")
///
/// Logs go to stderr so command output on stdout stays parseable.
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = RunConfig::from_env()?.with_overrides(cli.indent, cli.declaration)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_directive().parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(
        indent = ?config.indent(),
        declaration = config.declaration(),
        "resolved configuration"
    );

    let registry = ItemRegistry::new();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Some(Commands::Types) => commands::list_types(&registry, &mut stdout)?,
        Some(Commands::Inspect {
            file,
            type_id,
            json,
        }) => commands::inspect(&registry, &file, type_id, json, &mut stdout)?,
        Some(Commands::Roundtrip {
            file,
            type_id,
            output,
        }) => commands::roundtrip(
            &registry,
            &config,
            &file,
            type_id,
            output.as_deref(),
            &mut stdout,
        )?,
        Some(Commands::Check { file, type_id }) => {
            let report = commands::check(&registry, &file, type_id, &mut stdout)?;
            if !report.stable {
                anyhow::bail!("{} did not survive a round trip", file.display());
            }
        }
        None => {
            writeln!(stdout, "Use --help for usage information")?;
        }
    }

    Ok(())
}
