//! # covidboard
//!
//! Interactive COVID-19 dashboards served over HTTP: a cases & deaths
//! dashboard (world map plus line charts) and a hospital admissions
//! dashboard. Figures are built on the server as Plotly.js JSON; the page
//! posts control changes back and redraws whatever the callbacks return.
//!
//! ## Modules
//!
//! - [`data`]: CSV and GeoJSON loaders
//! - [`filters`]: date-range and region-selection filtering
//! - [`figure`]: Plotly figure builders
//! - [`dashboard`]: layouts, callbacks and the two dashboards
//! - [`api`]: HTTP server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use covidboard::config::Config;
//! use covidboard::dashboard::cases::cases_dashboard;
//! use covidboard::data::{load_boundaries, CasesDataset};
//! use covidboard::api::{serve, AppState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default()?;
//!
//!     let data = CasesDataset::load(&config.data)?;
//!     let boundaries = Arc::new(load_boundaries(&config.geo).await?);
//!     let dashboard = cases_dashboard(&data, boundaries)?;
//!
//!     serve(AppState::new(dashboard, config.cases.clone())).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod figure;
pub mod filters;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, DataConfig, GeoConfig, LoggingConfig, ServerConfig};

pub use dashboard::{Callback, CallbackError, CallbackGraph, Component, Dashboard, DashboardError};

pub use data::{
    AdmissionsTable, BoundaryDocument, CasesDataset, DataError, DataResult, TimeSeriesTable,
};

pub use figure::{Figure, LineChartSpec};

pub use filters::{DateRange, RegionSelection, AGGREGATE_REGION};
