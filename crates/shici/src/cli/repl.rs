//! Line-oriented interactive search loop

use colored::*;
use std::io::{BufRead, Write};

use crate::cli::display::format_results;
use crate::error::Result;
use crate::services::{QueryService, SearchOptions};

/// Input that ends the loop, compared case-insensitively
pub const QUIT: &str = "q";

/// Read one query per line from `input` until `q` or end of input
pub async fn run<R, W>(
  service: &QueryService,
  options: &SearchOptions,
  mut input: R,
  output: &mut W,
) -> Result<()>
where
  R: BufRead,
  W: Write,
{
  writeln!(output, "Enter a query ({QUIT} to quit)")?;

  loop {
    write!(output, "{} ", ">".green().bold())?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
      writeln!(output)?;
      break;
    }

    let query = line.trim();
    if query.eq_ignore_ascii_case(QUIT) {
      break;
    }
    if query.is_empty() {
      continue;
    }

    match service.search(query, options).await {
      Ok(results) => writeln!(output, "{}\n", format_results(&results))?,
      Err(e) => {
        tracing::debug!(error = %e, "interactive query failed");
        writeln!(output, "{} {e}\n", "✗".red())?;
      }
    }
  }

  Ok(())
}
