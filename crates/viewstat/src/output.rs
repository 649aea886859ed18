//! Result rendering for the terminal
//!
//! Every command prints its rows to stdout in one of three formats. JSON
//! keeps the `{x, y, z}` wire shape; table and CSV use readable headers.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use viewstat_analytics::{AnalyticsRow, PerformanceRow, total_views};

/// Widest label column in table output
const MAX_LABEL_WIDTH: usize = 40;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table (default)
    #[default]
    Table,
    /// JSON array of `{x, y, z}` objects
    Json,
    /// CSV with a header row
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("unknown format: {} (use table, json or csv)", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a `--format` value
pub fn parse_format(s: &str) -> Result<OutputFormat> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

/// Render grouped rows
///
/// `label` names the `x` column in table and CSV output.
pub fn render_rows(rows: &[AnalyticsRow], format: OutputFormat, label: &str) -> Result<String> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(rows)?,
        OutputFormat::Csv => {
            let mut out = format!("{},blogs,views\n", csv_field(&label.to_lowercase()));
            for row in rows {
                out.push_str(&format!("{},{},{}\n", csv_field(&row.x), row.y, row.z));
            }
            out
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                return Ok("(no data)\n".to_string());
            }

            let width = label_width(label, rows.iter().map(|r| r.x.as_str()));
            let rule = "-".repeat(width + 2 + 10 + 2 + 12);

            let mut out = format!("{:<width$}  {:>10}  {:>12}\n", label, "Blogs", "Views");
            out.push_str(&rule);
            out.push('\n');
            for row in rows {
                out.push_str(&format!(
                    "{:<width$}  {:>10}  {:>12}\n",
                    truncate(&row.x, width),
                    row.y,
                    row.z
                ));
            }
            out.push_str(&rule);
            out.push('\n');
            out.push_str(&format!(
                "{} rows  Total views: {}\n",
                rows.len(),
                total_views(rows)
            ));
            out
        }
    };
    Ok(out)
}

/// Render period rows with growth
pub fn render_performance(rows: &[PerformanceRow], format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(rows)?,
        OutputFormat::Csv => {
            let mut out = String::from("period,views,growth_pct\n");
            for row in rows {
                let growth = row.z.map(|g| g.to_string()).unwrap_or_default();
                out.push_str(&format!("{},{},{}\n", csv_field(&row.x), row.y, growth));
            }
            out
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                return Ok("(no data)\n".to_string());
            }

            let width = label_width("Period", rows.iter().map(|r| r.x.as_str()));
            let rule = "-".repeat(width + 2 + 12 + 2 + 10);

            let mut out = format!("{:<width$}  {:>12}  {:>10}\n", "Period", "Views", "Growth");
            out.push_str(&rule);
            out.push('\n');
            for row in rows {
                let growth = match row.z {
                    Some(g) => format!("{:+.2}%", g),
                    None => "-".to_string(),
                };
                out.push_str(&format!(
                    "{:<width$}  {:>12}  {:>10}\n",
                    truncate(&row.x, width),
                    row.y,
                    growth
                ));
            }
            out
        }
    };
    Ok(out)
}

fn label_width<'a>(header: &str, labels: impl Iterator<Item = &'a str>) -> usize {
    labels
        .map(|l| l.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH)
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Quote a CSV field when it holds a separator, quote or newline
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
#[path = "output_test.rs"]
mod output_test;
