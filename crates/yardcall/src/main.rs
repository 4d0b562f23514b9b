// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Yardcall - driver status and push notification service.
//!
//! This is the binary entry point for the Yardcall service.

use clap::{Parser, Subcommand};

mod serve;
mod shutdown;

/// Yardcall - driver status and push notification service.
#[derive(Parser, Debug)]
#[command(name = "yardcall", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Yardcall HTTP server and notification scheduler.
    Serve,
    /// Print the effective configuration and exit.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match yardcall_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            yardcall_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("yardcall serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("yardcall config: failed to render: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("yardcall: use --help for available commands");
        }
    }
}
