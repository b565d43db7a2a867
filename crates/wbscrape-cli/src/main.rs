mod scrape;
mod session;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wbscrape_core::PriceFilter;

use crate::scrape::Scraper;

#[derive(Debug, Parser)]
#[command(name = "wbscrape")]
#[command(about = "Collect a storefront category's product listing into a spreadsheet")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prompt for category links and filters until `q` is entered (default).
    Session,
    /// Scrape one category and export the result.
    Scrape {
        /// Category link without filters, absolute or site-relative.
        #[arg(long)]
        url: String,
        #[arg(long, default_value_t = 1)]
        min_price: u64,
        #[arg(long, default_value_t = 1_000_000)]
        max_price: u64,
        /// Minimum discount percentage; 0 disables the filter.
        #[arg(long, default_value_t = 0)]
        discount: u64,
    },
    /// Print the flattened category catalog.
    Categories {
        /// Only show categories whose name or link contains this text.
        #[arg(long)]
        contains: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = wbscrape_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    let scraper = Scraper::from_config(&config)?;
    let mut stdout = std::io::stdout();

    match cli.command {
        None | Some(Commands::Session) => {
            session::run_session(&scraper, std::io::stdin().lock(), &mut stdout).await?;
        }
        Some(Commands::Scrape {
            url,
            min_price,
            max_price,
            discount,
        }) => {
            let filter = PriceFilter::new(min_price, max_price, discount)?;
            match scraper.run(&url, &filter, &mut stdout).await {
                Ok(summary) => summary.log(),
                Err(e) => {
                    tracing::error!(error = %e, "scrape failed");
                    eprintln!("{}", scrape::failure_message(&e));
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Some(Commands::Categories { contains }) => {
            scraper
                .print_categories(contains.as_deref(), &mut stdout)
                .await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests;
