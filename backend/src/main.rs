//! fdp2babbage CLI - Build Babbage models from Fiscal DataPackages
//!
//! # Main Commands
//!
//! ```bash
//! fdp2babbage build -p datapackage.json -f fields.json          # Model JSON to stdout
//! fdp2babbage build -p datapackage.json -f fields.json -o m.json
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! fdp2babbage names dimension "Country" "country" "Country (ISO)"
//! ```

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use fdp2babbage::{fdp_to_model, load_field_translator, DataPackage, NameAllocator, NameKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "fdp2babbage")]
#[command(about = "Build Babbage OLAP models from Fiscal DataPackage descriptors", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the Babbage model of one resource
    Build {
        /// Datapackage descriptor (datapackage.json)
        #[arg(short, long)]
        package: PathBuf,

        /// Field translator JSON ({"field": {"name": ..., "type": ...}})
        #[arg(short, long)]
        fields: PathBuf,

        /// Resource to build (default: first resource of the package)
        #[arg(short, long)]
        resource: Option<String>,

        /// Fact table name (default: derived from the resource name)
        #[arg(short, long, env = "FDP_FACT_TABLE")]
        table: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the names allocated to a sequence of labels
    Names {
        /// Entity kind the names are allocated for
        #[arg(value_enum)]
        kind: KindArg,

        /// Labels, in allocation order
        #[arg(required = true)]
        labels: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Measure,
    Dimension,
    Table,
}

impl From<KindArg> for NameKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Measure => NameKind::Measure,
            KindArg::Dimension => NameKind::Dimension,
            KindArg::Table => NameKind::Table,
        }
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Build {
            package,
            fields,
            resource,
            table,
            output,
        } => cmd_build(
            &package,
            &fields,
            resource.as_deref(),
            table.as_deref(),
            output.as_deref(),
        ),

        Commands::Names { kind, labels } => cmd_names(kind.into(), &labels),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_build(
    package_path: &Path,
    fields_path: &Path,
    resource: Option<&str>,
    table: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let package = DataPackage::from_file(package_path)?;
    let translator = load_field_translator(fields_path)?;
    let target = package.target(resource, table)?;

    let model = fdp_to_model(&package, &target.table, &target.resource, &translator)?;

    let json = serde_json::to_string_pretty(&model)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_names(kind: NameKind, labels: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut allocator = NameAllocator::new(kind);
    for label in labels {
        let name = allocator.allocate(label);
        println!("{}\t{}", label, name);
    }
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Model written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
