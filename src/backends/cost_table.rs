//! Pricing table backend

use anyhow::Result;
use std::io::{self, Write};

use crate::core::pricing::MODELS;
use crate::core::render::{render_cost_table, OutputFormat, RenderConfig};

/// Print the pricing table in the selected format
pub fn run_cost_table(config: RenderConfig) -> Result<()> {
    let output = match config.format {
        OutputFormat::Table => render_cost_table(MODELS),
        OutputFormat::Json if config.pretty => serde_json::to_string_pretty(MODELS)?,
        OutputFormat::Json => serde_json::to_string(MODELS)?,
        OutputFormat::Jsonl => MODELS
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n"),
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", output)?;
    Ok(())
}
