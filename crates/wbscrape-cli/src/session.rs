//! Interactive session: prompt for a category link and filters, scrape,
//! repeat until the exit token is entered.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use wbscrape_core::{CoreError, PriceFilter};

use crate::scrape::{failure_message, Scraper};

pub(crate) const EXIT_TOKEN: &str = "q";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScrapeRequest {
    pub url: String,
    pub filter: PriceFilter,
}

#[derive(Debug, Error)]
pub(crate) enum InputError {
    #[error("{field} must be a non-negative whole number, got \"{value}\"")]
    NotANumber { field: &'static str, value: String },

    #[error(transparent)]
    InvalidFilter(#[from] CoreError),

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// Prompts for one scrape request.
///
/// Returns `Ok(None)` when the exit token is entered or input ends.
pub(crate) fn read_request<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<Option<ScrapeRequest>, InputError> {
    let Some(url) = prompt(
        input,
        out,
        &format!("Enter a category link without filters (or \"{EXIT_TOKEN}\" to quit):\n"),
    )?
    else {
        return Ok(None);
    };
    if url == EXIT_TOKEN {
        return Ok(None);
    }

    let Some(min_price) = prompt_number(input, out, "Enter the minimum price: ", "min price")? else {
        return Ok(None);
    };
    let Some(max_price) = prompt_number(input, out, "Enter the maximum price: ", "max price")? else {
        return Ok(None);
    };
    let Some(discount) = prompt_number(
        input,
        out,
        "Enter the minimum discount (0 for none): ",
        "discount",
    )?
    else {
        return Ok(None);
    };

    let filter = PriceFilter::new(min_price, max_price, discount)?;
    Ok(Some(ScrapeRequest { url, filter }))
}

/// Runs prompts and scrapes until the user exits. A failed scrape or bad
/// input restarts the loop; only a broken terminal ends it with an error.
pub(crate) async fn run_session<R: BufRead, W: Write>(
    scraper: &Scraper,
    mut input: R,
    out: &mut W,
) -> anyhow::Result<()> {
    loop {
        let request = match read_request(&mut input, out) {
            Ok(Some(request)) => request,
            Ok(None) => break,
            Err(InputError::Io(e)) => return Err(e.into()),
            Err(e) => {
                writeln!(out, "Input error: {e}. Restarting...")?;
                continue;
            }
        };

        match scraper.run(&request.url, &request.filter, out).await {
            Ok(summary) => summary.log(),
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "scrape failed");
                writeln!(out, "{}", failure_message(&e))?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
) -> Result<Option<String>, InputError> {
    write!(out, "{message}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

fn prompt_number<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
    field: &'static str,
) -> Result<Option<u64>, InputError> {
    let Some(raw) = prompt(input, out, message)? else {
        return Ok(None);
    };
    raw.parse::<u64>()
        .map(Some)
        .map_err(|_| InputError::NotANumber { field, value: raw })
}
