//! Choropleth adapter
//!
//! Reshapes a wide table slice into long form `(region, value)` and joins
//! each region to its polygon by exact match on `properties.name`. Regions
//! without a polygon simply leave that part of the map blank.

use super::{
    ChoroplethMarker, ChoroplethTrace, ColorBar, Figure, LatLon, Layout, Mapbox, Margin, Title,
    Trace,
};
use crate::data::{BoundaryDocument, TableSlice, FEATURE_ID_KEY};
use crate::filters::{RegionSelection, AGGREGATE_REGION};

/// Base map and colouring of the world map
#[derive(Debug, Clone, PartialEq)]
pub struct MapStyle {
    pub style: String,
    pub zoom: f64,
    pub center: LatLon,
    pub opacity: f64,
    pub colorscale: String,
    pub value_label: String,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            style: "carto-positron".to_string(),
            zoom: 2.0,
            center: LatLon { lat: 30.0, lon: 0.0 },
            opacity: 0.5,
            colorscale: "Viridis".to_string(),
            value_label: "Total Cases".to_string(),
        }
    }
}

/// Build the world map for a date slice and region selection
///
/// `geojson_url` is where the browser loads `boundaries` from.
pub fn choropleth(
    slice: &TableSlice<'_>,
    selection: &RegionSelection,
    boundaries: &BoundaryDocument,
    geojson_url: &str,
    style: &MapStyle,
) -> Figure {
    let (locations, z) = if selection.is_aggregate_only() {
        aggregate_scale(slice)
    } else {
        long_form(slice, selection, boundaries)
    };

    let trace = ChoroplethTrace {
        geojson: geojson_url.to_string(),
        featureidkey: FEATURE_ID_KEY.to_string(),
        locations,
        z,
        colorscale: style.colorscale.clone(),
        marker: ChoroplethMarker {
            opacity: style.opacity,
        },
        colorbar: ColorBar {
            title: Title::new(style.value_label.clone()),
        },
    };

    Figure {
        data: vec![Trace::Choropleth(trace)],
        layout: Layout {
            margin: Some(Margin::default()),
            mapbox: Some(Mapbox {
                style: style.style.clone(),
                zoom: style.zoom,
                center: style.center,
            }),
            ..Default::default()
        },
    }
}

/// Single-region colour scale over the aggregate column
fn aggregate_scale(slice: &TableSlice<'_>) -> (Vec<String>, Vec<Option<f64>>) {
    let values = slice.values(AGGREGATE_REGION).unwrap_or_default();
    let locations = vec![AGGREGATE_REGION.to_string(); values.len()];
    (locations, values)
}

/// Melt the selected columns (plus the aggregate) into `(region, value)`
/// pairs: all rows of the first region, then all rows of the next, ...
fn long_form(
    slice: &TableSlice<'_>,
    selection: &RegionSelection,
    boundaries: &BoundaryDocument,
) -> (Vec<String>, Vec<Option<f64>>) {
    let mut regions: Vec<&str> = selection.iter().collect();
    if !selection.contains_aggregate() {
        regions.push(AGGREGATE_REGION);
    }

    let mut locations = Vec::with_capacity(regions.len() * slice.len());
    let mut z = Vec::with_capacity(regions.len() * slice.len());

    for region in regions {
        let Some(values) = slice.values(region) else {
            tracing::debug!(region = %region, "Region has no column, left off the map");
            continue;
        };
        if !boundaries.contains(region) {
            tracing::debug!(region = %region, "Region has no polygon, map area stays blank");
        }

        locations.extend(std::iter::repeat(region.to_string()).take(values.len()));
        z.extend(values);
    }

    (locations, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TimeSeriesTable;
    use crate::filters::DateRange;

    const CASES: &str = "date,World,France,Germany
2020-03-01,100,10,20
2020-03-08,200,15,40";

    const GEOJSON: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"name":"France"},"geometry":null},
        {"type":"Feature","properties":{"name":"Germany"},"geometry":null}
    ]}"#;

    fn choropleth_trace(figure: &Figure) -> &ChoroplethTrace {
        match &figure.data[0] {
            Trace::Choropleth(trace) => trace,
            other => panic!("expected choropleth, got {:?}", other),
        }
    }

    #[test]
    fn test_long_form_join() {
        let table = TimeSeriesTable::from_csv_str("total_cases", CASES).unwrap();
        let geo = BoundaryDocument::from_json_str(GEOJSON).unwrap();
        let slice = table.full_slice();
        let selection = RegionSelection::new(["France", "Germany"]);

        let figure = choropleth(&slice, &selection, &geo, "/api/v1/geo", &MapStyle::default());
        let trace = choropleth_trace(&figure);

        assert_eq!(
            trace.locations,
            vec!["France", "France", "Germany", "Germany", "World", "World"]
        );
        assert_eq!(
            trace.z,
            vec![Some(10.0), Some(15.0), Some(20.0), Some(40.0), Some(100.0), Some(200.0)]
        );
        assert_eq!(trace.featureidkey, "properties.name");
        assert_eq!(trace.geojson, "/api/v1/geo");
        assert_eq!(trace.colorbar.title, Title::new("Total Cases"));
    }

    #[test]
    fn test_aggregate_only_uses_single_scale() {
        let table = TimeSeriesTable::from_csv_str("total_cases", CASES).unwrap();
        let geo = BoundaryDocument::from_json_str(GEOJSON).unwrap();
        let slice = DateRange::single(1).apply(&table);

        let figure = choropleth(
            &slice,
            &RegionSelection::aggregate(),
            &geo,
            "/api/v1/geo",
            &MapStyle::default(),
        );
        let trace = choropleth_trace(&figure);

        assert_eq!(trace.locations, vec!["World"]);
        assert_eq!(trace.z, vec![Some(200.0)]);
    }

    #[test]
    fn test_aggregate_with_countries_is_not_duplicated() {
        let table = TimeSeriesTable::from_csv_str("total_cases", CASES).unwrap();
        let geo = BoundaryDocument::from_json_str(GEOJSON).unwrap();
        let slice = DateRange::single(0).apply(&table);
        let selection = RegionSelection::new(["World", "Germany"]);

        let figure = choropleth(&slice, &selection, &geo, "/geo", &MapStyle::default());

        assert_eq!(choropleth_trace(&figure).locations, vec!["Germany", "World"]);
    }

    #[test]
    fn test_unmatched_region_is_not_an_error() {
        let table = TimeSeriesTable::from_csv_str(
            "total_cases",
            "date,World,Côte d'Ivoire\n2020-03-01,100,3",
        )
        .unwrap();
        let geo = BoundaryDocument::from_json_str(GEOJSON).unwrap();
        let selection = RegionSelection::new(["Côte d'Ivoire", "Atlantis"]);

        let style = MapStyle::default();
        let figure = choropleth(&table.full_slice(), &selection, &geo, "/geo", &style);
        let trace = choropleth_trace(&figure);

        // no polygon: still emitted, the map just stays blank there
        assert_eq!(trace.locations, vec!["Côte d'Ivoire", "World"]);
    }

    #[test]
    fn test_map_layout() {
        let table = TimeSeriesTable::from_csv_str("total_cases", CASES).unwrap();
        let geo = BoundaryDocument::from_json_str(GEOJSON).unwrap();

        let figure = choropleth(
            &table.full_slice(),
            &RegionSelection::aggregate(),
            &geo,
            "/geo",
            &MapStyle::default(),
        );
        let mapbox = figure.layout.mapbox.unwrap();

        assert_eq!(mapbox.style, "carto-positron");
        assert_eq!(mapbox.zoom, 2.0);
        assert_eq!(mapbox.center, LatLon { lat: 30.0, lon: 0.0 });
        assert_eq!(figure.layout.margin, Some(Margin::default()));
    }
}
