mod csv;
mod json;
mod rows;
mod table;
mod yaml;

pub use csv::CsvFormatter;
pub use json::JsonFormatter;
pub use table::TableFormatter;
pub use yaml::YamlFormatter;

use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Column/row view of a result, used by the csv and table formats
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tabular {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Tabular {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }
}

/// A result that can be printed in every output format
///
/// json and yaml serialize the value itself; csv and table use [`Render::tabular`].
pub trait Render: Serialize {
    fn tabular(&self) -> Tabular;
}

pub fn render<T: Render>(value: &T, format: OutputFormat, no_headers: bool) -> Result<String> {
    match format {
        OutputFormat::Json => JsonFormatter::format(value),
        OutputFormat::Yaml => YamlFormatter::format(value),
        OutputFormat::Csv => Ok(CsvFormatter::format(&value.tabular(), no_headers)),
        OutputFormat::Table => Ok(TableFormatter::format(&value.tabular(), no_headers)),
    }
}
