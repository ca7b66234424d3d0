//! ncm - node config migration CLI
//!
//! Migrates node config files between schema versions and dumps the bundled
//! templates.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use node_config_migrate::families::ConfigFamily;
use node_config_migrate::migration::{Migration, MigrationOptions, MigrationOutcome};
use node_config_migrate::templates;

#[derive(Debug, Parser)]
#[command(name = "ncm", version, about = "Migration CLI for node configs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Migrate an RPC node config
    Rpc {
        /// Migration path
        #[arg(short = 'p', long, value_parser = path_choices(ConfigFamily::Rpc))]
        migrate_path: String,

        #[command(flatten)]
        files: FileArgs,
    },
    /// Migrate validator node settings
    Smr {
        /// Migration path
        #[arg(short = 'p', long, value_parser = path_choices(ConfigFamily::Smr))]
        migrate_path: String,

        #[command(flatten)]
        files: FileArgs,
    },
    /// Write the bundled templates as TOML files
    DumpTemplates {
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Debug, Args)]
struct FileArgs {
    /// Source config file
    #[arg(short = 'f', long, value_parser = existing_file)]
    from_file: PathBuf,

    /// Output config file
    #[arg(short = 't', long)]
    to_file: PathBuf,

    /// Answer yes to every question
    #[arg(short = 'y', long)]
    assume_yes: bool,

    /// Print the diff without colors
    #[arg(long)]
    no_color: bool,
}

fn path_choices(family: ConfigFamily) -> PossibleValuesParser {
    PossibleValuesParser::new(family.paths().keys())
}

fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("file `{}` does not exist", value))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ncm=info,node_config_migrate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Rpc {
            migrate_path,
            files,
        } => migrate(ConfigFamily::Rpc, &migrate_path, files),
        Command::Smr {
            migrate_path,
            files,
        } => migrate(ConfigFamily::Smr, &migrate_path, files),
        Command::DumpTemplates { out_dir } => {
            for path in templates::dump_templates(&out_dir)? {
                println!("Wrote {}", path.display());
            }
            println!("Templates dumped successfully.");
            Ok(())
        }
    }
}

fn migrate(family: ConfigFamily, key: &str, files: FileArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = MigrationOptions::builder()
        .assume_yes(files.assume_yes)
        .color(!files.no_color)
        .build();
    tracing::debug!(%family, key, "starting migration");

    let outcome = Migration::new(family.paths(), options).migrate(key, &files.from_file, &files.to_file)?;
    if let MigrationOutcome::Migrated(report) = outcome {
        tracing::info!(
            destination = %report.destination.display(),
            warnings = report.warnings.len(),
            "done"
        );
    }
    Ok(())
}
