//! Hospital admissions table
//!
//! Long-form table with one row per (entity, day):
//!
//! ```text
//! Entity,Code,Day,Weekly new hospital admissions
//! France,FRA,2020-03-22,5207
//! ```

use chrono::NaiveDate;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::error::{DataError, DataResult};
use super::table::{header_name, parse_date, parse_value};

/// Entity column name
pub const ENTITY_COLUMN: &str = "Entity";

/// Day column name
pub const DAY_COLUMN: &str = "Day";

/// Default admissions value column
pub const DEFAULT_VALUE_COLUMN: &str = "Weekly new hospital admissions";

/// A single admissions observation
#[derive(Debug, Clone, PartialEq)]
pub struct AdmissionRow {
    pub entity: String,
    pub day: NaiveDate,
    pub value: Option<f64>,
}

/// Immutable hospital admissions table
#[derive(Debug, Clone)]
pub struct AdmissionsTable {
    value_column: String,
    rows: Vec<AdmissionRow>,
    /// Distinct entities in first-appearance order
    entities: Vec<String>,
}

impl AdmissionsTable {
    /// Load from a CSV file
    pub fn from_path(path: &Path, value_column: &str) -> DataResult<Self> {
        let file = std::fs::File::open(path).map_err(|error| DataError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        let table = Self::from_reader(file, value_column)?;

        tracing::info!(
            path = ?path,
            rows = table.rows.len(),
            entities = table.entities.len(),
            "Loaded hospital admissions table"
        );

        Ok(table)
    }

    /// Load from an in-memory CSV string
    pub fn from_csv_str(csv_data: &str, value_column: &str) -> DataResult<Self> {
        Self::from_reader(csv_data.as_bytes(), value_column)
    }

    /// Load from any CSV reader
    pub fn from_reader<R: Read>(reader: R, value_column: &str) -> DataResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| header_name(h) == column)
                .ok_or_else(|| DataError::MissingColumn {
                    table: "hospital_admissions".to_string(),
                    column: column.to_string(),
                })
        };

        let entity_idx = find(ENTITY_COLUMN)?;
        let day_idx = find(DAY_COLUMN)?;
        let value_idx = find(value_column)?;

        let mut rows = Vec::new();
        let mut entities = Vec::new();
        let mut seen = HashSet::new();

        for (row_num, result) in reader.records().enumerate() {
            let record = result?;
            let line = row_num + 2;

            let entity = record.get(entity_idx).unwrap_or("").trim().to_string();
            let raw_day = record.get(day_idx).unwrap_or("");
            let day = parse_date(raw_day).ok_or_else(|| DataError::InvalidDate {
                table: "hospital_admissions".to_string(),
                value: raw_day.to_string(),
                line,
            })?;
            let value = record.get(value_idx).and_then(parse_value);

            if seen.insert(entity.clone()) {
                entities.push(entity.clone());
            }
            rows.push(AdmissionRow { entity, day, value });
        }

        Ok(Self {
            value_column: value_column.to_string(),
            rows,
            entities,
        })
    }

    /// Name of the admissions value column
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn rows(&self) -> &[AdmissionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct entities in first-appearance order
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// All rows for one entity, in file order
    pub fn series(&self, entity: &str) -> Vec<&AdmissionRow> {
        self.rows.iter().filter(|row| row.entity == entity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Entity,Code,Day,Weekly new hospital admissions
France,FRA,2020-03-22,5207
France,FRA,2020-03-29,8129
World,OWID_WRL,2020-03-22,9000
Italy,ITA,2020-03-22,";

    #[test]
    fn test_load_admissions() {
        let table = AdmissionsTable::from_csv_str(CSV, DEFAULT_VALUE_COLUMN).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.entities(), &["France", "World", "Italy"]);
        assert_eq!(table.value_column(), DEFAULT_VALUE_COLUMN);

        let france = table.series("France");
        assert_eq!(france.len(), 2);
        assert_eq!(france[1].value, Some(8129.0));

        assert_eq!(table.series("Italy")[0].value, None);
        assert!(table.series("Spain").is_empty());
    }

    #[test]
    fn test_byte_order_mark_before_entity_header() {
        let csv = format!("\u{feff}{}", CSV);
        let table = AdmissionsTable::from_csv_str(&csv, DEFAULT_VALUE_COLUMN).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.entities(), &["France", "World", "Italy"]);
    }

    #[test]
    fn test_custom_value_column() {
        let csv = "Entity,Day,admissions\nWorld,2021-01-03,12";
        let table = AdmissionsTable::from_csv_str(csv, "admissions").unwrap();
        assert_eq!(table.rows()[0].value, Some(12.0));
    }

    #[test]
    fn test_missing_value_column() {
        let result = AdmissionsTable::from_csv_str(CSV, "Daily admissions");
        match result {
            Err(DataError::MissingColumn { column, .. }) => assert_eq!(column, "Daily admissions"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }
}
