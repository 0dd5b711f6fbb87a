//! CLI module - Command-line interface definitions and handler

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::core::model::TraversalMode;
use crate::core::pricing::{DEFAULT_INPUT_MODEL, DEFAULT_OUTPUT_MODEL};
use crate::core::render::{OutputFormat, RenderConfig};
use crate::core::tokenizer::TokenEncoding;

/// tacos - estimate token counts and model costs for a directory tree.
#[derive(Parser, Debug)]
#[command(name = "tacos")]
#[command(
    author,
    version,
    about,
    long_about = r#"tacos lists a directory and reports, for every text file, its size,
token count and the estimated cost of sending it to an input model and
receiving the same number of tokens from an output model.

Files matched by .gitignore or .tacosignore are shown grayed out and are
never counted. .git and node_modules are always ignored.

Listing modes:
- default: immediate children of ROOT only
- --recursive: whole tree, with a subtotal row after each directory
- --collapse: one summary row per top-level directory

Examples:
    tacos
    tacos gpt-4o o1 --recursive
    tacos --collapse --format jsonl
    tacos --cost-table
"#
)]
pub struct Cli {
    /// Model used to price input tokens.
    #[arg(
        value_name = "INPUT_MODEL",
        default_value = DEFAULT_INPUT_MODEL,
        env = "TACOS_INPUT_MODEL",
        long_help = "Model used to price input tokens. Names are case-insensitive.\n\n\
Aliases: gpt-4-turbo, 3-large, 3-small. See --cost-table for the full list."
    )]
    pub input_model: String,

    /// Model used to price output tokens.
    #[arg(
        value_name = "OUTPUT_MODEL",
        default_value = DEFAULT_OUTPUT_MODEL,
        env = "TACOS_OUTPUT_MODEL",
        long_help = "Model used to price output tokens. Embedding models have no output\n\
rate, in which case output costs are left blank."
    )]
    pub output_model: String,

    /// List the whole tree with a subtotal row per directory.
    #[arg(short, long, conflicts_with = "collapse")]
    pub recursive: bool,

    /// Summarize each top-level directory in a single row.
    #[arg(short = 'c', long)]
    pub collapse: bool,

    /// Print the pricing table and exit.
    #[arg(long)]
    pub cost_table: bool,

    /// Directory to scan.
    #[arg(long, default_value = ".", value_name = "ROOT")]
    pub root: PathBuf,

    /// Output format (table/json/jsonl).
    #[arg(
        long,
        default_value = "table",
        value_name = "FORMAT",
        value_parser = ["table", "json", "jsonl"],
        long_help = "Select the output format.\n\n\
Supported values:\n\
- table (default): aligned, colored columns\n\
- json: a single JSON array of rows\n\
- jsonl: one JSON object per row"
    )]
    pub format: String,

    /// Token encoding (cl100k/o200k/words).
    #[arg(long, default_value = "cl100k", value_name = "ENCODING")]
    pub encoding: String,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long)]
    pub pretty: bool,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug diagnostics to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn mode(&self) -> TraversalMode {
        if self.recursive {
            TraversalMode::RecursiveExpand
        } else if self.collapse {
            TraversalMode::RecursiveCollapse
        } else {
            TraversalMode::Flat
        }
    }
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    if cli.cost_table {
        return crate::backends::cost_table::run_cost_table(render_config);
    }

    let encoding: TokenEncoding = cli.encoding.parse().map_err(anyhow::Error::msg)?;
    let mode = cli.mode();
    let root = cli.root.canonicalize().unwrap_or(cli.root);

    crate::backends::scan::run_scan(
        &root,
        &cli.input_model,
        &cli.output_model,
        encoding,
        mode,
        render_config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["tacos"]).unwrap();
        assert_eq!(cli.input_model, "o3-mini");
        assert_eq!(cli.output_model, "3-small");
        assert_eq!(cli.mode(), TraversalMode::Flat);
        assert_eq!(cli.format, "table");
    }

    #[test]
    fn test_modes() {
        let cli = Cli::try_parse_from(["tacos", "-r"]).unwrap();
        assert_eq!(cli.mode(), TraversalMode::RecursiveExpand);

        let cli = Cli::try_parse_from(["tacos", "--collapse", "gpt-4o"]).unwrap();
        assert_eq!(cli.mode(), TraversalMode::RecursiveCollapse);
        assert_eq!(cli.input_model, "gpt-4o");
    }

    #[test]
    fn test_recursive_conflicts_with_collapse() {
        assert!(Cli::try_parse_from(["tacos", "-r", "-c"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["tacos", "--format", "xml"]).is_err());
    }
}
