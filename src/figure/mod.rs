//! Chart figures
//!
//! Figures are Plotly.js figure objects (`{data, layout}`) built on the
//! server and drawn unchanged by the browser. Only the attributes the
//! dashboards use are modelled.
//!
//! - **line**: the four cases/deaths line charts and the admissions chart
//! - **choropleth**: the world map

pub mod choropleth;
pub mod line;

pub use choropleth::{choropleth, MapStyle};
pub use line::{admissions_chart, line_chart, AggregateSeries, LineChartSpec};

use serde::{Deserialize, Serialize};

/// Dash pattern for aggregate-region lines
pub const AGGREGATE_DASH: &str = "dash";

/// A complete Plotly figure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// Scatter traces, in drawing order
    pub fn scatter_traces(&self) -> impl Iterator<Item = &ScatterTrace> {
        self.data.iter().filter_map(|t| match t {
            Trace::Scatter(s) => Some(s),
            _ => None,
        })
    }
}

/// One Plotly trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Trace {
    #[serde(rename = "scatter")]
    Scatter(ScatterTrace),
    #[serde(rename = "choroplethmapbox")]
    Choropleth(ChoroplethTrace),
}

/// A line trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterTrace {
    pub name: String,
    pub x: Vec<String>,
    /// `null` gaps where a value is missing
    pub y: Vec<Option<f64>>,
    pub mode: String,
    #[serde(default)]
    pub line: LineStyle,
    #[serde(default = "default_true")]
    pub showlegend: bool,
}

fn default_true() -> bool {
    true
}

impl ScatterTrace {
    pub fn lines(name: impl Into<String>, x: Vec<String>, y: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            mode: "lines".to_string(),
            line: LineStyle::default(),
            showlegend: true,
        }
    }

    /// Builder method: set dash pattern
    pub fn dash(mut self, dash: &str) -> Self {
        self.line.dash = Some(dash.to_string());
        self
    }

    /// Builder method: hide from the legend
    pub fn hide_legend(mut self) -> Self {
        self.showlegend = false;
        self
    }

    pub fn is_dashed(&self) -> bool {
        self.line.dash.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

/// A choropleth trace drawn on a mapbox base map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethTrace {
    /// URL of the GeoJSON document (Plotly fetches it once and caches it)
    pub geojson: String,
    /// Feature property matched against `locations`
    pub featureidkey: String,
    pub locations: Vec<String>,
    pub z: Vec<Option<f64>>,
    pub colorscale: String,
    pub marker: ChoroplethMarker,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethMarker {
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Figure layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapbox: Option<Mapbox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: Title,
}

impl Axis {
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Title::new(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub r: u32,
    pub t: u32,
    pub l: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapbox {
    pub style: String,
    pub zoom: f64,
    pub center: LatLon,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}
