pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use clap::ValueEnum;
use serde_json::Value;

/// How a calculation envelope is written to stdout. Errors are always JSON.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// The full envelope, pretty-printed
    Json,
    /// Result fields, nested sections and yearly series as tables
    Table,
    /// The primary yearly series, or field/value pairs
    Csv,
    /// The headline answer only
    Minimal,
}

impl OutputFormat {
    pub fn render(self, value: &Value) {
        match self {
            OutputFormat::Json => json::print_json(value),
            OutputFormat::Table => table::print_table(value),
            OutputFormat::Csv => csv_out::print_csv(value),
            OutputFormat::Minimal => minimal::print_minimal(value),
        }
    }
}
