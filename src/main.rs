//! volley - interactive HTTP load generator

use std::io::BufRead;

use anyhow::Result;
use clap::Parser;

mod cli;
mod input;
mod install;
mod menu;
mod printer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    if let Some(cli::Commands::Install) = cli.command {
        return install::install_tor_proxychains();
    }

    printer::print_header();
    loop {
        if menu::show_main_menu().await {
            printer::info("Goodbye. Exiting volley.");
            break;
        }

        printer::info("Press Enter to return to main menu...");
        let mut discard = String::new();
        let _ = std::io::stdin().lock().read_line(&mut discard);
    }

    Ok(())
}
