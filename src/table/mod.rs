// src/table/mod.rs
pub mod date_parser;
pub mod utils;

use csv::ReaderBuilder;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{DashboardError, Result};
use utils::{clean_str, display_name, is_date_column};

pub use date_parser::{year_of, CalendarMonth, DatasetRow};

/// Literal name of the date column, quotes included, as it appears in the
/// social media share export.
pub const DATE_COLUMN: &str = "\"Date\"";

/// One data line of the CSV, keyed positionally by the shared header.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Column names from the header line, shared by every record of a table.
    headers: Arc<[String]>,
    /// Raw cells; may be shorter than `headers` when the line was short.
    cells: Vec<String>,
}

impl Record {
    /// Raw cell for `column`, or `None` if the column is unknown or the
    /// line ended before reaching it.
    pub fn get(&self, column: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.cells.get(idx).map(String::as_str)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Every header column paired with its cell, in header order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.headers
            .iter()
            .enumerate()
            .map(move |(i, h)| (h.as_str(), self.cells.get(i).map(String::as_str)))
    }

    /// Resolve a platform given either bare (`Facebook`) or as the literal
    /// header (`"Facebook"`) to the header text.
    pub fn column_for(&self, platform: &str) -> Option<&str> {
        let wanted = display_name(platform);
        if wanted.is_empty() {
            return None;
        }
        self.headers
            .iter()
            .find(|h| h.as_str() == platform || display_name(h) == wanted)
            .map(String::as_str)
    }

    /// Raw date cell; `None` when missing or blank.
    pub fn date(&self) -> Option<&str> {
        let (_, cell) = self.cells().find(|(column, _)| is_date_column(column))?;
        cell.filter(|c| !clean_str(c).is_empty())
    }

    /// Re-serialise the cells that were present, in header order.
    pub fn to_csv_line(&self) -> String {
        self.cells.join(",")
    }
}

/// Header plus records of a parsed CSV document, in file order.
#[derive(Debug, Clone)]
pub struct CsvTable {
    headers: Arc<[String]>,
    records: Vec<Record>,
}

impl CsvTable {
    /// Split `text` into a header and positional records.
    ///
    /// Quote characters are kept verbatim in headers and cells and a comma
    /// always splits, even between quotes. Blank lines are skipped.
    #[instrument(level = "debug", skip(text), fields(bytes = text.len()))]
    pub fn parse(text: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut lines = rdr.records();
        let header = match lines.next() {
            Some(record) => record?,
            None => return Err(DashboardError::MissingHeader),
        };
        let headers: Arc<[String]> = header.iter().map(str::to_string).collect();

        let mut records = Vec::new();
        for result in lines {
            let line = result?;
            if line.len() > headers.len() {
                debug!(
                    line = line.position().map(|p| p.line()),
                    fields = line.len(),
                    "dropping fields beyond the header"
                );
            }
            let cells = line
                .iter()
                .take(headers.len())
                .map(str::to_string)
                .collect();
            records.push(Record {
                headers: Arc::clone(&headers),
                cells,
            });
        }

        debug!(columns = headers.len(), records = records.len(), "parsed csv");
        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
