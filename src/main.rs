use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use dtolift::codegen::{generate_for_table, GenerationMode, PhpDataGenerator};
use dtolift::config::GeneratorConfig;
use dtolift::introspect::SnapshotIntrospector;

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a data class
    Data {
        /// Table to generate from
        table: String,
    },
    /// Generate a create (or update) request class
    Request {
        /// Table to generate from
        table: String,

        /// Generate an update request, which keeps the primary key
        #[arg(long)]
        update: bool,
    },
    /// Generate a value object without validation
    Vo {
        /// Table to generate from
        table: String,

        /// Class name to use instead of the one derived from the table
        #[arg(long)]
        class_name: Option<String>,
    },
}

impl Command {
    fn table(&self) -> &str {
        match self {
            Command::Data { table } | Command::Request { table, .. } | Command::Vo { table, .. } => {
                table
            }
        }
    }

    fn mode(&self) -> GenerationMode {
        match self {
            Command::Data { .. } => GenerationMode::Data,
            Command::Request { update: false, .. } => GenerationMode::CreateRequest,
            Command::Request { update: true, .. } => GenerationMode::UpdateRequest,
            Command::Vo { class_name, .. } => GenerationMode::ValueObject {
                class_name: class_name.clone(),
            },
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dtolift")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON schema snapshot to read table definitions from
    #[arg(long, global = true, default_value = "./schema.json")]
    schema_file: PathBuf,

    /// TOML generator configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to .env file for configuration overrides
    #[arg(long, global = true, default_value = "./.env")]
    env_file: PathBuf,

    /// Project root the generated path is resolved against
    #[arg(long, global = true, default_value = ".")]
    base_dir: PathBuf,

    /// Overwrite an existing file
    #[arg(long, global = true)]
    force: bool,

    /// Print the generated class instead of writing it
    #[arg(long, global = true)]
    stdout: bool,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(e) = run() {
        error!(error = ?e, "Fatal error");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("dtolift v{}", env!("CARGO_PKG_VERSION"));
    info!(
        command = ?cli.command,
        schema_file = ?cli.schema_file,
        base_dir = ?cli.base_dir,
        "Starting code generation"
    );

    let config = GeneratorConfig::load(cli.config.as_deref(), &cli.env_file)
        .context("Failed to load generator configuration")?;
    debug!(config = ?config, "Generator config");

    let mut introspector = SnapshotIntrospector::from_file(&cli.schema_file)
        .context("Failed to load schema snapshot")?;
    let generator = PhpDataGenerator::new(config);

    let generated = generate_for_table(
        &mut introspector,
        &generator,
        cli.command.table(),
        &cli.command.mode(),
    )
    .with_context(|| format!("Failed to generate class for table '{}'", cli.command.table()))?;

    if cli.stdout {
        print!("{}", generated.source);
        return Ok(());
    }

    let path = generated
        .write_to(&cli.base_dir, cli.force)
        .context("Failed to write class file (pass --force to overwrite an existing file)")?;
    info!(class = ?generated.qualified_name, "Done");
    println!("file path: {}", path.display());

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}
