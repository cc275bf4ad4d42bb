use std::io::{self, Write};

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn render(result: &CommandResult, format: OutputFormat) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            let payload = serde_json::to_string_pretty(&result.data)?;
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Text => {
            for line in &result.lines {
                writeln!(out, "{line}")?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
