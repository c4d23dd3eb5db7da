//! Wide time-series tables
//!
//! A `TimeSeriesTable` holds one row per date and one column per region,
//! exactly as the OWID exports lay them out:
//!
//! ```text
//! date,World,Afghanistan,Albania,...
//! 2020-01-05,2,,,...
//! ```
//!
//! Tables are loaded once and never mutated. Filtering produces a
//! [`TableSlice`] that borrows the table and lists the selected rows.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use super::error::{DataError, DataResult};

/// Name of the date column in wide tables
pub const DATE_COLUMN: &str = "date";

/// Date format used in the CSV files and in every label we emit
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a date the way the source files spell it
pub fn date_label(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a date cell in the source format
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Header cell name with surrounding whitespace and a leading byte order mark removed
pub(crate) fn header_name(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

/// Parse a numeric cell; empty or non-numeric cells are missing values
pub(crate) fn parse_value(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok()
}

/// An immutable date × region table
#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    name: String,
    /// Date of each row, in file order
    dates: Vec<NaiveDate>,
    /// Distinct dates in first-appearance order
    unique_dates: Vec<NaiveDate>,
    /// Region column names, in header order
    regions: Vec<String>,
    region_index: HashMap<String, usize>,
    /// Column-major values: `columns[region][row]`
    columns: Vec<Vec<Option<f64>>>,
}

impl TimeSeriesTable {
    /// Load a table from a CSV file
    pub fn from_path(name: impl Into<String>, path: &Path) -> DataResult<Self> {
        let file = std::fs::File::open(path).map_err(|error| DataError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        let table = Self::from_reader(name, file)?;

        tracing::info!(
            table = %table.name,
            path = ?path,
            rows = table.len(),
            regions = table.regions.len(),
            "Loaded time-series table"
        );

        Ok(table)
    }

    /// Load a table from an in-memory CSV string (useful for testing)
    pub fn from_csv_str(name: impl Into<String>, csv_data: &str) -> DataResult<Self> {
        Self::from_reader(name, csv_data.as_bytes())
    }

    /// Load a table from any reader producing CSV
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> DataResult<Self> {
        let name = name.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let date_idx = headers
            .iter()
            .position(|h| header_name(h) == DATE_COLUMN)
            .ok_or_else(|| DataError::MissingColumn {
                table: name.clone(),
                column: DATE_COLUMN.to_string(),
            })?;

        // (csv column index, region name)
        let mut region_columns: Vec<(usize, String)> = Vec::new();
        let mut region_index = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if idx == date_idx {
                continue;
            }
            let region = header_name(header).to_string();
            if region_index.contains_key(&region) {
                tracing::warn!(table = %name, region = %region, "Duplicate region column ignored");
                continue;
            }
            region_index.insert(region.clone(), region_columns.len());
            region_columns.push((idx, region));
        }

        let mut dates = Vec::new();
        let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); region_columns.len()];
        let mut non_numeric = 0usize;

        for (row_num, result) in reader.records().enumerate() {
            let record = result?;
            // header is line 1
            let line = row_num + 2;

            let raw_date = record.get(date_idx).unwrap_or("");
            let date = parse_date(raw_date).ok_or_else(|| DataError::InvalidDate {
                table: name.clone(),
                value: raw_date.to_string(),
                line,
            })?;
            dates.push(date);

            for (slot, (col_idx, _)) in region_columns.iter().enumerate() {
                let cell = record.get(*col_idx).unwrap_or("");
                let value = parse_value(cell);
                if value.is_none() && !cell.trim().is_empty() {
                    non_numeric += 1;
                }
                columns[slot].push(value);
            }
        }

        if non_numeric > 0 {
            tracing::warn!(
                table = %name,
                cells = non_numeric,
                "Non-numeric cells treated as missing"
            );
        }

        let mut unique_dates: Vec<NaiveDate> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for date in &dates {
            if seen.insert(*date) {
                unique_dates.push(*date);
            }
        }
        if unique_dates.windows(2).any(|w| w[0] > w[1]) {
            tracing::warn!(table = %name, "Dates are not in ascending order");
        }

        Ok(Self {
            name,
            dates,
            unique_dates,
            regions: region_columns.into_iter().map(|(_, region)| region).collect(),
            region_index,
            columns,
        })
    }

    /// Table name used in logs and errors
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Region column names in header order
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Check whether a region column exists
    pub fn has_region(&self, region: &str) -> bool {
        self.region_index.contains_key(region)
    }

    /// Distinct dates in first-appearance order
    pub fn unique_dates(&self) -> &[NaiveDate] {
        &self.unique_dates
    }

    /// All values of one region column
    pub fn column(&self, region: &str) -> Option<&[Option<f64>]> {
        self.region_index
            .get(region)
            .map(|&idx| self.columns[idx].as_slice())
    }

    /// A slice covering every row
    pub fn full_slice(&self) -> TableSlice<'_> {
        TableSlice {
            table: self,
            rows: (0..self.len()).collect(),
        }
    }

    /// A slice over the rows whose date lies in `[start, end]`
    pub fn slice_between(&self, start: NaiveDate, end: NaiveDate) -> TableSlice<'_> {
        let rows = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, date)| **date >= start && **date <= end)
            .map(|(idx, _)| idx)
            .collect();

        TableSlice { table: self, rows }
    }
}

/// A borrowed subset of a table's rows
#[derive(Debug, Clone)]
pub struct TableSlice<'a> {
    table: &'a TimeSeriesTable,
    rows: Vec<usize>,
}

impl<'a> TableSlice<'a> {
    /// The table this slice borrows from
    pub fn table(&self) -> &'a TimeSeriesTable {
        self.table
    }

    /// Selected row indices, in table order
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Dates of the selected rows as `YYYY-MM-DD` labels
    pub fn date_labels(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|&r| date_label(self.table.dates[r]))
            .collect()
    }

    /// Values of one region for the selected rows
    pub fn values(&self, region: &str) -> Option<Vec<Option<f64>>> {
        let column = self.table.column(region)?;
        Some(self.rows.iter().map(|&r| column[r]).collect())
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|&r| self.table.dates[r]).min()
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|&r| self.table.dates[r]).max()
    }
}
