//! migration-setup - Bootstrap the migration-agent development environment

mod bootstrap;
mod config;
mod secrets;
mod usage;

use anyhow::{Context, Result};
use bootstrap::EnvState;
use clap::{Parser, Subcommand};
use config::SetupConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "migration-setup")]
#[command(about = "Set up the migration-agent development environment", long_about = None)]
#[command(version)]
struct Args {
    /// Skip Jupyter kernel registration
    #[arg(long)]
    no_kernel: bool,

    /// Path to the setup config file (default: setup.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show environment diagnostics
    Info,
    /// Remove the virtual environment
    Clean {
        /// Also remove the registered Jupyter kernelspec
        #[arg(long)]
        kernel: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config =
        SetupConfig::load(args.config.as_deref()).context("Failed to load setup config")?;

    match &args.command {
        Some(Commands::Info) => return handle_info(&config),
        Some(Commands::Clean { kernel }) => return handle_clean(&config, *kernel),
        None => {}
    }

    run_setup(&config, &args)
}

/// The linear setup flow: ensure venv, first-run installs, activation,
/// secrets check, usage block.
fn run_setup(config: &SetupConfig, args: &Args) -> Result<()> {
    let state = bootstrap::ensure_environment(config)
        .context("Failed to create the virtual environment")?;

    // Resolved on every run; later steps and printed instructions depend
    // on these paths rather than on shell activation.
    let paths = bootstrap::activate_environment(config);

    match state {
        EnvState::Created => {
            eprintln!();
            eprintln!("[1/2] Installing project dependencies (editable)...");
            if let Err(e) = bootstrap::install_dependencies(&paths) {
                eprintln!("Warning: dependency installation failed: {e:#}");
                eprintln!("Fix the problem and install manually with:");
                eprintln!("  {} install -e .", paths.pip.display());
            }

            if args.no_kernel {
                log::debug!("kernel registration skipped by flag");
            } else {
                eprintln!();
                eprintln!("[2/2] Registering Jupyter kernel...");
                if let Err(e) = bootstrap::register_kernel(&paths, config) {
                    eprintln!("Warning: kernel registration failed: {e:#}");
                }
            }
        }
        EnvState::Reused => {
            eprintln!(
                "Virtual environment already exists at {}. Reusing it.",
                config.venv_dir.display()
            );
        }
    }

    let status = secrets::check(config)?;
    print!("{}", usage::guidance(status, config));
    print!("{}", usage::usage_block(&paths, config));

    Ok(())
}

fn handle_info(config: &SetupConfig) -> Result<()> {
    print!("{}", bootstrap::get_info(config)?);
    Ok(())
}

fn handle_clean(config: &SetupConfig, kernel: bool) -> Result<()> {
    let stats = bootstrap::clean(config, kernel)?;

    if stats.venv_removed {
        let size_mb = stats.venv_size as f64 / (1024.0 * 1024.0);
        eprintln!(
            "Removed {} ({:.1} MB)",
            config.venv_dir.display(),
            size_mb
        );
    } else {
        eprintln!("No virtual environment at {}", config.venv_dir.display());
    }

    if kernel {
        if stats.kernel_removed {
            eprintln!("Removed kernelspec \"{}\"", config.kernel_name);
        } else {
            eprintln!("No kernelspec \"{}\" registered", config.kernel_name);
        }
    }

    Ok(())
}
