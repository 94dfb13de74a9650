//! Passport photo CLI - validation service and local checker.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod http;
mod output;

use commands::{check, serve, Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // A missing .env file is fine; real environment variables still apply.
    dotenv::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Check(args)) => {
            let args = check::CheckArgs::with_config(args, &config);
            match check::run(&args, &config) {
                Ok(summary) => summary.exit_code(),
                Err(e) => {
                    eprintln!("error: {e:#}");
                    ExitCode::Error
                }
            }
        }
        Some(Commands::Serve(args)) => run_serve(args, &config),
        None => run_serve(cli.serve, &config),
    };

    exit_code.into()
}

fn run_serve(args: serve::ServeArgs, config: &AppConfig) -> ExitCode {
    let args = serve::ServeArgs::with_config(args, config);
    match serve::run(&args, config) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
