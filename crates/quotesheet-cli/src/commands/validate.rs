use std::sync::Arc;

use quotesheet_core::{validate_symbol, HttpClient, Scope, SheetAccessor, Symbol, Validation};

use crate::cli::ValidateArgs;
use crate::error::CliError;

use super::{connect_sheets, load_config, quote_source, CommandResult};

pub async fn run(
    args: &ValidateArgs,
    http_client: Arc<dyn HttpClient>,
) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let config = load_config(&args.sheet)?;

    let sheets = connect_sheets(&config, Arc::clone(&http_client), Scope::ReadOnly).await?;
    let source = quote_source(&config, http_client);
    let accessor = SheetAccessor::new(&sheets, config.tab_name.as_str());

    let validation = validate_symbol(&source, &accessor, &symbol).await?;

    Ok(CommandResult {
        data: serde_json::to_value(&validation)?,
        lines: validation_lines(&validation),
        failure_count: usize::from(!validation.is_match()),
    })
}

fn validation_lines(validation: &Validation) -> Vec<String> {
    let mut lines = vec![validation.to_string()];
    match validation {
        Validation::Mismatch { fields, .. } => {
            lines.push(format!("Differing columns: {}", fields.join(", ")));
        }
        Validation::InsufficientData { reason, .. } => lines.push(reason.clone()),
        Validation::Match { .. } => {}
    }
    lines
}
