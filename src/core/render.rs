//! Renderer module
//!
//! Renders traversal rows as a colored table, a JSON array, or JSON Lines.
//! Styling is applied here only; rows arrive as plain data.

use colored::{ColoredString, Colorize};
use std::io::Write;

use crate::core::model::{Entry, RowType};
use crate::core::pricing::PricingModel;

const SIZE_WIDTH: usize = 10;
const NAME_WIDTH: usize = 25;
const TOKENS_WIDTH: usize = 10;
const COST_WIDTH: usize = 12;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Jsonl,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for traversal rows
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render rows to a string
    pub fn render(&self, entries: &[Entry]) -> String {
        match self.config.format {
            OutputFormat::Table => render_table(entries),
            OutputFormat::Json => self.render_json(entries),
            OutputFormat::Jsonl => self.render_jsonl(entries),
        }
    }

    /// Render to a writer, newline terminated
    pub fn render_to<W: Write>(&self, entries: &[Entry], mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "{}", self.render(entries))
    }

    fn render_jsonl(&self, entries: &[Entry]) -> String {
        entries
            .iter()
            .filter_map(|entry| {
                if self.config.pretty {
                    serde_json::to_string_pretty(entry).ok()
                } else {
                    serde_json::to_string(entry).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    fn render_json(&self, entries: &[Entry]) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string())
        }
    }
}

/// Format a byte size: `512B`, `1.5KB`, `2.0MB`
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{}B", bytes);
    }
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        return format!("{:.1}KB", kb);
    }
    format!("{:.1}MB", kb / 1024.0)
}

/// Format a token count, using `k` notation from 1000 up
pub fn format_token_count(tokens: usize) -> String {
    if tokens < 1000 {
        return tokens.to_string();
    }
    format!("{:.1}k", tokens as f64 / 1000.0)
}

/// Format a cost as dollars with four decimals
pub fn format_cost(cost: f64) -> String {
    format!("${:.4}", cost)
}

/// Group digits in threes: `128000` -> `128,000`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn pad(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

fn or_dash<T>(value: Option<T>, f: impl Fn(T) -> String) -> String {
    value.map(f).unwrap_or_else(|| "-".to_string())
}

fn display_name(entry: &Entry) -> String {
    let indent = "  ".repeat(entry.indent);
    match entry.row_type {
        RowType::Cumulative => format!("{}Σ {}/", indent, entry.name),
        _ if entry.is_directory => format!("{}{}/", indent, entry.name),
        _ => format!("{}{}", indent, entry.name),
    }
}

fn style_name(entry: &Entry, name: String) -> ColoredString {
    if entry.is_directory {
        let styled = name.bold().blue();
        if entry.is_ignored {
            styled.dimmed()
        } else {
            styled
        }
    } else if entry.is_ignored {
        name.bright_black()
    } else if entry.executable {
        name.underline()
    } else {
        name.normal()
    }
}

fn render_row(entry: &Entry) -> String {
    let size = pad(&or_dash(entry.size, format_file_size), SIZE_WIDTH);
    let name = pad(&display_name(entry), NAME_WIDTH);
    let tokens = pad(&or_dash(entry.tokens, format_token_count), TOKENS_WIDTH);
    let input_cost = pad(&or_dash(entry.input_cost, format_cost), COST_WIDTH);
    let output_cost = pad(&or_dash(entry.output_cost, format_cost), COST_WIDTH);

    match entry.row_type {
        RowType::Cumulative => format!(
            "{} {} {} {} {}",
            size.on_magenta().white(),
            name,
            tokens.on_yellow().black(),
            input_cost.on_green().black(),
            output_cost.on_green().black()
        ),
        _ if entry.is_ignored => format!(
            "{} {} {} {} {}",
            size.bright_black(),
            style_name(entry, name),
            tokens.bright_black(),
            input_cost.bright_black(),
            output_cost.bright_black()
        ),
        RowType::Collapsed => format!(
            "{} {} {} {} {}",
            size.bold(),
            style_name(entry, name),
            tokens.yellow().bold(),
            input_cost.green().bold(),
            output_cost.green().bold()
        ),
        RowType::Normal => format!(
            "{} {} {} {} {}",
            size,
            style_name(entry, name),
            tokens.yellow(),
            input_cost.green(),
            output_cost.green()
        ),
    }
}

fn render_table(entries: &[Entry]) -> String {
    let header = format!(
        "{} {} {} {} {}",
        pad("Size", SIZE_WIDTH),
        pad("Name", NAME_WIDTH),
        pad("Tokens", TOKENS_WIDTH),
        pad("Input Cost", COST_WIDTH),
        pad("Output Cost", COST_WIDTH)
    );

    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(header.bold().white().to_string());
    lines.extend(entries.iter().map(render_row));
    lines.join("\n")
}

/// Render the pricing table shown by `--cost-table`
pub fn render_cost_table(models: &[PricingModel]) -> String {
    const WIDTHS: [usize; 4] = [20, 20, 22, 15];
    let headers = ["Model", "Input Cost (/1M)", "Output Cost (/1M)", "Context Window"];

    let header = headers
        .iter()
        .zip(WIDTHS)
        .map(|(h, w)| pad(h, w).bold().white().to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let mut lines = vec![header];
    for m in models {
        let input = pad(&format!("${:.2}", m.input_rate), WIDTHS[1]);
        let output = pad(
            &m.output_rate
                .map(|r| format!("${:.2}", r))
                .unwrap_or_else(|| "N/A".to_string()),
            WIDTHS[2],
        );
        let context = pad(
            &m.context_window
                .map(|c| format!("{} tokens", format_thousands(c as u64)))
                .unwrap_or_else(|| "N/A".to_string()),
            WIDTHS[3],
        );
        lines.push(format!(
            "{} {} {} {}",
            pad(m.key, WIDTHS[0]).white(),
            input.green(),
            output.green(),
            context.cyan()
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Aggregate, Metrics};
    use crate::core::pricing::MODELS;

    fn no_color() {
        colored::control::set_override(false);
    }

    fn text_file(name: &str, tokens: usize) -> Entry {
        Entry::file(name, name, false, Some(40), 0).with_metrics(Metrics {
            tokens,
            input_cost: 0.0015,
            output_cost: Some(0.006),
        })
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0B");
        assert_eq!(format_file_size(1023), "1023B");
        assert_eq!(format_file_size(1536), "1.5KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2.0MB");
    }

    #[test]
    fn test_format_token_count() {
        assert_eq!(format_token_count(999), "999");
        assert_eq!(format_token_count(1000), "1.0k");
        assert_eq!(format_token_count(12_345), "12.3k");
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(0.00016), "$0.0002");
        assert_eq!(format_cost(1.5), "$1.5000");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(8000), "8,000");
        assert_eq!(format_thousands(128_000), "128,000");
        assert_eq!(format_thousands(1_000_000), "1,000,000");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert!("xml".parse::<OutputFormat>().unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_render_jsonl() {
        let entries = vec![text_file("a.txt", 10), Entry::directory("b", "b", false, None, 0)];
        let output = Renderer::new(OutputFormat::Jsonl).render(&entries);
        assert_eq!(output.lines().count(), 2);
        assert!(output.contains("\"name\":\"a.txt\""));
        assert!(output.contains("\"tokens\":10"));
    }

    #[test]
    fn test_render_json_pretty() {
        let config = RenderConfig::with_pretty(OutputFormat::Json, true);
        let output = Renderer::with_config(config).render(&[text_file("a.txt", 10)]);
        assert!(output.starts_with('['));
        assert!(output.contains("  "));
    }

    #[test]
    fn test_render_table_plain() {
        no_color();
        let mut agg = Aggregate::default();
        agg.add_file(
            40,
            &Metrics {
                tokens: 10,
                input_cost: 0.0015,
                output_cost: Some(0.006),
            },
        );
        let entries = vec![
            Entry::directory("src", "src", false, Some(4096), 0),
            Entry {
                indent: 1,
                ..text_file("lib.rs", 10)
            },
            Entry::summary("src", "src", RowType::Cumulative, false, 1).with_aggregate(&agg, true),
        ];
        let output = Renderer::new(OutputFormat::Table).render(&entries);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Size"));
        assert!(lines[1].contains("src/"));
        assert!(lines[1].starts_with("4.0KB"));
        assert!(lines[1].contains('-'));
        assert!(lines[2].contains("  lib.rs"));
        assert!(lines[2].contains("$0.0015"));
        assert!(lines[3].contains("Σ src/"));
        assert!(lines[3].contains("40B"));
    }

    #[test]
    fn test_render_cost_table() {
        no_color();
        let output = render_cost_table(MODELS);
        assert!(output.contains("Context Window"));
        assert!(output.contains("128,000 tokens"));
        assert!(output.contains("$120.00"));
        let ada = output.lines().find(|l| l.starts_with("ada v2")).unwrap();
        assert!(ada.contains("N/A"));
    }

    #[test]
    fn test_render_to_writer() {
        let mut buffer = Vec::new();
        Renderer::new(OutputFormat::Json)
            .render_to(&[text_file("a.txt", 1)], &mut buffer)
            .unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.ends_with("]\n"));
    }
}
