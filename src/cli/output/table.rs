//! Table output formatting for CLI commands
//!
//! Renders packages, per-package results and gate checks using comfy-table.
//! Colors are dropped when the terminal does not support them.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use super::{format_bytes, truncate};
use crate::domain::models::{CategorizedPackage, CheckStatus, GateResult, RunReport, Tier};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format categorized packages.
    pub fn format_packages<'a>(
        &self,
        packages: impl IntoIterator<Item = &'a CategorizedPackage>,
    ) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Package", "Tier", "Weight", "Size", "Types", "Tests"]));

        for p in packages {
            table.add_row(vec![
                Cell::new(truncate(&p.package.name, 40)),
                self.tier_cell(p.tier),
                Cell::new(p.weight),
                Cell::new(format_bytes(p.package.size_bytes)),
                Cell::new(yes_no(p.package.has_type_checking)),
                Cell::new(yes_no(p.package.has_tests)),
            ]);
        }

        table.to_string()
    }

    /// Format the per-package results of a run.
    pub fn format_results(&self, report: &RunReport) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&[
            "Package", "Tier", "Status", "Errors", "Warnings", "Duration",
        ]));

        for (name, result) in &report.package_results {
            let status = match result.status {
                CheckStatus::Success => self.colored("success", Color::Green),
                CheckStatus::Failed => self.colored("failed", Color::Red),
            };
            let errors = if result.errors > 0 {
                self.colored(result.errors.to_string(), Color::Red)
            } else {
                Cell::new(result.errors)
            };
            let warnings = if result.warnings > 0 {
                self.colored(result.warnings.to_string(), Color::Yellow)
            } else {
                Cell::new(result.warnings)
            };

            table.add_row(vec![
                Cell::new(truncate(name, 40)),
                self.tier_cell(result.tier),
                status,
                errors,
                warnings,
                Cell::new(format!("{} ms", result.duration_ms)),
            ]);
        }

        table.to_string()
    }

    /// Format gate checks in evaluation order.
    pub fn format_gate(&self, gate: &GateResult) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Check", "Result", "Detail"]));

        for check in &gate.checks {
            let verdict = if check.passed {
                self.colored("pass", Color::Green)
            } else {
                self.colored("FAIL", Color::Red)
            };
            let detail = check.message.lines().next().unwrap_or_default();
            table.add_row(vec![
                Cell::new(&check.name),
                verdict,
                Cell::new(truncate(detail, 80)),
            ]);
        }

        table.to_string()
    }

    fn tier_cell(&self, tier: Tier) -> Cell {
        let color = match tier {
            Tier::Heavy => Color::Magenta,
            Tier::Medium => Color::Cyan,
            Tier::Light => Color::Blue,
        };
        self.colored(tier.as_str(), color)
    }

    fn colored(&self, text: impl Into<String>, color: Color) -> Cell {
        let cell = Cell::new(text.into());
        if self.use_colors {
            cell.fg(color)
        } else {
            cell
        }
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

const fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "-"
    }
}

fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    console::colors_enabled()
}
