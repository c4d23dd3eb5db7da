//! Dataset loading
//!
//! Everything the dashboards read before they start serving:
//!
//! - **table**: wide date × region tables (cases, deaths)
//! - **admissions**: long-form hospital admissions table
//! - **geo**: GeoJSON world boundaries
//! - **error**: Error types
//!
//! All loading happens once at startup; any failure aborts the process.

pub mod admissions;
pub mod error;
pub mod geo;
pub mod table;

pub use admissions::{AdmissionRow, AdmissionsTable, DEFAULT_VALUE_COLUMN};
pub use error::{DataError, DataResult};
pub use geo::{BoundaryDocument, DEFAULT_GEOJSON_URL, FEATURE_ID_KEY};
pub use table::{date_label, TableSlice, TimeSeriesTable, DATE_FORMAT};

use std::sync::Arc;

use crate::config::{DataConfig, GeoConfig};

/// The four wide tables behind the cases dashboard
#[derive(Debug, Clone)]
pub struct CasesDataset {
    pub total_cases: Arc<TimeSeriesTable>,
    pub total_deaths: Arc<TimeSeriesTable>,
    pub weekly_cases: Arc<TimeSeriesTable>,
    pub weekly_deaths: Arc<TimeSeriesTable>,
}

impl CasesDataset {
    /// Load all four tables from the configured data directory
    pub fn load(config: &DataConfig) -> DataResult<Self> {
        let load = |name: &str, file: &str| {
            TimeSeriesTable::from_path(name, &config.path_of(file)).map(Arc::new)
        };

        Ok(Self {
            total_cases: load("total_cases", &config.total_cases)?,
            total_deaths: load("total_deaths", &config.total_deaths)?,
            weekly_cases: load("weekly_cases", &config.weekly_cases)?,
            weekly_deaths: load("weekly_deaths", &config.weekly_deaths)?,
        })
    }

    /// Tables in display order, with their names
    pub fn tables(&self) -> [&TimeSeriesTable; 4] {
        [
            &self.total_cases,
            &self.total_deaths,
            &self.weekly_cases,
            &self.weekly_deaths,
        ]
    }
}

/// Load the hospital admissions table from the configured data directory
pub fn load_admissions(config: &DataConfig) -> DataResult<AdmissionsTable> {
    AdmissionsTable::from_path(
        &config.path_of(&config.hospital_admissions),
        &config.admissions_column,
    )
}

/// Load the boundary document: a local file when configured, else the URL
pub async fn load_boundaries(config: &GeoConfig) -> DataResult<BoundaryDocument> {
    match &config.path {
        Some(path) => BoundaryDocument::from_path(path),
        None => BoundaryDocument::fetch(&config.url).await,
    }
}
