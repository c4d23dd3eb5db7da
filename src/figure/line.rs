//! Line chart adapters
//!
//! One trace per selected region, in selection order (aggregate last).
//! The total charts additionally carry a dashed overlay of the aggregate
//! region that does not depend on the selection.

use serde::{Deserialize, Serialize};

use super::{Axis, Figure, Layout, Legend, ScatterTrace, Title, Trace, AGGREGATE_DASH};
use crate::data::{date_label, AdmissionsTable, TableSlice};
use crate::filters::selection::is_aggregate;
use crate::filters::{RegionSelection, AGGREGATE_REGION};

/// What distinguishes the four cases/deaths line charts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineChartSpec {
    pub title: &'static str,
    pub value_label: &'static str,
    pub height: Option<u32>,
    /// Draw the dashed aggregate overlay
    pub aggregate_overlay: bool,
}

impl LineChartSpec {
    pub const TOTAL_CASES: Self = Self {
        title: "COVID-19 Cases Over Time",
        value_label: "Total Cases",
        height: None,
        aggregate_overlay: true,
    };

    pub const TOTAL_DEATHS: Self = Self {
        title: "COVID-19 Deaths Over Time",
        value_label: "Total Deaths",
        height: None,
        aggregate_overlay: true,
    };

    pub const WEEKLY_CASES: Self = Self {
        title: "COVID-19 Weekly Cases Over Time",
        value_label: "Weekly Cases",
        height: Some(300),
        aggregate_overlay: false,
    };

    pub const WEEKLY_DEATHS: Self = Self {
        title: "COVID-19 Weekly Deaths Over Time",
        value_label: "Weekly Deaths",
        height: Some(300),
        aggregate_overlay: false,
    };
}

/// The aggregate region's series over a date range
///
/// Computed by the map callback and handed to the total charts through a
/// hidden store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSeries {
    pub dates: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl AggregateSeries {
    /// Take the aggregate column of a slice; empty if the table has none
    pub fn from_slice(slice: &TableSlice<'_>) -> Self {
        match slice.values(AGGREGATE_REGION) {
            Some(values) => Self {
                dates: slice.date_labels(),
                values,
            },
            None => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Build one of the cases/deaths line charts
pub fn line_chart(
    slice: &TableSlice<'_>,
    selection: &RegionSelection,
    spec: &LineChartSpec,
    overlay: Option<&AggregateSeries>,
) -> Figure {
    let x = slice.date_labels();
    let mut data = Vec::with_capacity(selection.len() + 1);

    for region in selection.iter() {
        let Some(values) = slice.values(region) else {
            tracing::debug!(
                table = %slice.table().name(),
                region = %region,
                "Selected region has no column, skipping line"
            );
            continue;
        };

        let mut trace = ScatterTrace::lines(region, x.clone(), values);
        if is_aggregate(region) {
            trace = trace.dash(AGGREGATE_DASH);
        }
        data.push(Trace::Scatter(trace));
    }

    if spec.aggregate_overlay {
        if let Some(series) = overlay.filter(|s| !s.is_empty()) {
            let trace =
                ScatterTrace::lines(AGGREGATE_REGION, series.dates.clone(), series.values.clone())
                    .dash(AGGREGATE_DASH)
                    .hide_legend();
            data.push(Trace::Scatter(trace));
        }
    }

    Figure {
        data,
        layout: Layout {
            title: Some(Title::new(spec.title)),
            xaxis: Some(Axis::titled("date")),
            yaxis: Some(Axis::titled(spec.value_label)),
            legend: Some(Legend {
                title: Title::new("variable"),
            }),
            height: spec.height,
            ..Default::default()
        },
    }
}

/// Title of the hospital admissions chart
pub const ADMISSIONS_TITLE: &str = "Weekly Hospital Admissions for COVID-19";

/// Build the hospital admissions chart: one line per selected entity
pub fn admissions_chart(table: &AdmissionsTable, selection: &RegionSelection) -> Figure {
    let mut data = Vec::with_capacity(selection.len());

    for entity in selection.iter() {
        let rows = table.series(entity);
        if rows.is_empty() {
            tracing::debug!(entity = %entity, "No admissions rows for entity");
            continue;
        }

        let x = rows.iter().map(|r| date_label(r.day)).collect();
        let y = rows.iter().map(|r| r.value).collect();

        let mut trace = ScatterTrace::lines(entity, x, y);
        if is_aggregate(entity) {
            trace = trace.dash(AGGREGATE_DASH);
        }
        data.push(Trace::Scatter(trace));
    }

    Figure {
        data,
        layout: Layout {
            title: Some(Title::new(ADMISSIONS_TITLE)),
            xaxis: Some(Axis::titled("Day")),
            yaxis: Some(Axis::titled("Weekly Admissions")),
            legend: Some(Legend {
                title: Title::new("Entity"),
            }),
            ..Default::default()
        },
    }
}
