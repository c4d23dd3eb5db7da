//! Cases & deaths dashboard
//!
//! World map, date info, two total line charts fed by the map callback
//! through hidden stores, and two weekly line charts. Every callback reads
//! the same date slider and country dropdown.

use std::sync::Arc;

use super::callbacks::{Callback, PropValue};
use super::layout::Component;
use super::{Dashboard, DashboardResult};
use crate::data::{date_label, BoundaryDocument, CasesDataset, TimeSeriesTable};
use crate::figure::{choropleth, line_chart, AggregateSeries, LineChartSpec, MapStyle};
use crate::filters::AGGREGATE_REGION;

pub const TITLE: &str = "COVID-19 Dashboard";

/// Route the browser loads the boundary document from
pub const GEOJSON_ROUTE: &str = "/api/v1/geo";

pub const DATE_SLIDER: &str = "date-slider";
pub const COUNTRY_DROPDOWN: &str = "country-dropdown";
pub const WORLD_MAP: &str = "world-map";
pub const DATE_INFO: &str = "date-info";
pub const CASE_GRAPH: &str = "case-graph";
pub const DEATH_GRAPH: &str = "death-graph";
pub const WORLD_CASES_DATA: &str = "world-cases-data";
pub const WORLD_DEATHS_DATA: &str = "world-deaths-data";
pub const WEEKLY_CASES_GRAPH: &str = "weekly-cases-graph";
pub const WEEKLY_DEATHS_GRAPH: &str = "weekly-deaths-graph";

/// Build the cases dashboard over loaded data
pub fn cases_dashboard(
    data: &CasesDataset,
    boundaries: Arc<BoundaryDocument>,
) -> DashboardResult<Dashboard> {
    let layout = build_layout(&data.total_cases);

    let callbacks = vec![
        map_callback(data, Arc::clone(&boundaries)),
        line_callback(
            "update_case_graph",
            CASE_GRAPH,
            Arc::clone(&data.total_cases),
            LineChartSpec::TOTAL_CASES,
            Some(WORLD_CASES_DATA),
        ),
        line_callback(
            "update_death_graph",
            DEATH_GRAPH,
            Arc::clone(&data.total_deaths),
            LineChartSpec::TOTAL_DEATHS,
            Some(WORLD_DEATHS_DATA),
        ),
        line_callback(
            "update_weekly_cases_graph",
            WEEKLY_CASES_GRAPH,
            Arc::clone(&data.weekly_cases),
            LineChartSpec::WEEKLY_CASES,
            None,
        ),
        line_callback(
            "update_weekly_deaths_graph",
            WEEKLY_DEATHS_GRAPH,
            Arc::clone(&data.weekly_deaths),
            LineChartSpec::WEEKLY_DEATHS,
            None,
        ),
    ];

    Ok(Dashboard::new(TITLE, layout, callbacks)?.with_boundaries(boundaries))
}

fn build_layout(total_cases: &TimeSeriesTable) -> Component {
    let marks = total_cases
        .unique_dates()
        .iter()
        .map(|d| date_label(*d))
        .collect();

    Component::div(vec![
        Component::heading(TITLE).style("text-align: center"),
        Component::range_slider(DATE_SLIDER, marks),
        Component::div(vec![
            Component::graph(WORLD_MAP),
            Component::text(DATE_INFO).style("margin-top: 20px"),
        ])
        .style("width: 60%; display: inline-block"),
        Component::div(vec![
            Component::dropdown(
                COUNTRY_DROPDOWN,
                total_cases.regions().to_vec(),
                vec![AGGREGATE_REGION.to_string()],
            ),
            Component::graph(CASE_GRAPH),
            Component::graph(DEATH_GRAPH),
        ])
        .style("width: 39%; display: inline-block; float: right"),
        Component::store(WORLD_CASES_DATA),
        Component::store(WORLD_DEATHS_DATA),
        Component::div(vec![
            Component::graph(WEEKLY_CASES_GRAPH),
            Component::graph(WEEKLY_DEATHS_GRAPH),
        ])
        .style("width: 60%; display: inline-block; margin-top: 20px"),
    ])
}

/// World map, date info and the two aggregate stores
fn map_callback(data: &CasesDataset, boundaries: Arc<BoundaryDocument>) -> Callback {
    let total_cases = Arc::clone(&data.total_cases);
    let total_deaths = Arc::clone(&data.total_deaths);
    let style = MapStyle::default();

    Callback::new(
        "update_map",
        &[DATE_SLIDER, COUNTRY_DROPDOWN],
        &[WORLD_MAP, DATE_INFO, WORLD_CASES_DATA, WORLD_DEATHS_DATA],
        move |store| {
            let range = store.range(DATE_SLIDER)?;
            let selection = store.selection(COUNTRY_DROPDOWN)?;

            let cases = range.apply(&total_cases);
            let figure = choropleth(&cases, &selection, &boundaries, GEOJSON_ROUTE, &style);

            let date_info = match range.resolve(total_cases.unique_dates()) {
                Some((start, end)) => format!(
                    "Selected Date Range: {} to {}",
                    date_label(start),
                    date_label(end)
                ),
                None => String::new(),
            };

            let world_cases = AggregateSeries::from_slice(&cases);
            let world_deaths = AggregateSeries::from_slice(&range.apply(&total_deaths));

            Ok(vec![
                PropValue::Figure(figure),
                PropValue::Text(date_info),
                PropValue::Series(world_cases),
                PropValue::Series(world_deaths),
            ])
        },
    )
}

/// One line chart over `table`, optionally overlaid with an aggregate store
fn line_callback(
    name: &str,
    output: &str,
    table: Arc<TimeSeriesTable>,
    spec: LineChartSpec,
    overlay_store: Option<&'static str>,
) -> Callback {
    let mut inputs = vec![DATE_SLIDER, COUNTRY_DROPDOWN];
    inputs.extend(overlay_store);

    Callback::new(name, &inputs, &[output], move |store| {
        let range = store.range(DATE_SLIDER)?;
        let selection = store.selection(COUNTRY_DROPDOWN)?;
        let overlay = overlay_store.map(|id| store.series(id)).transpose()?;

        let slice = range.apply(&table);
        let figure = line_chart(&slice, &selection, &spec, overlay);

        Ok(vec![PropValue::Figure(figure)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{Figure, Trace};
    use crate::testing::{boundaries, cases_dataset};
    use serde_json::json;
    use std::collections::HashMap;

    fn dashboard() -> Dashboard {
        cases_dashboard(&cases_dataset(), Arc::new(boundaries())).unwrap()
    }

    fn figure_for<'a>(dispatch: &'a crate::dashboard::Dispatch, id: &str) -> &'a Figure {
        match dispatch.outputs.iter().find(|o| o.id == id).map(|o| &o.value) {
            Some(PropValue::Figure(figure)) => figure,
            other => panic!("no figure for {}: {:?}", id, other),
        }
    }

    fn inputs(value: serde_json::Value) -> HashMap<String, serde_json::Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_layout_controls() {
        let dashboard = dashboard();

        assert_eq!(dashboard.control_ids(), vec![DATE_SLIDER, COUNTRY_DROPDOWN]);
        match dashboard.layout().find(DATE_SLIDER) {
            Some(Component::RangeSlider { marks, value, .. }) => {
                assert_eq!(marks.len(), 4);
                assert_eq!(value.start, 0);
                assert_eq!(value.end, 3);
            }
            other => panic!("expected slider, got {:?}", other),
        }
        match dashboard.layout().find(COUNTRY_DROPDOWN) {
            Some(Component::Dropdown { options, value, .. }) => {
                assert!(options.contains(&"World".to_string()));
                assert!(options.contains(&"France".to_string()));
                assert_eq!(value, &vec!["World".to_string()]);
            }
            other => panic!("expected dropdown, got {:?}", other),
        }
        assert!(dashboard.boundaries().is_some());
    }

    #[test]
    fn test_initial_render_produces_every_output() {
        let dashboard = dashboard();
        let dispatch = dashboard.update(&HashMap::new(), &[]).unwrap();

        assert_eq!(dispatch.callbacks_run.len(), 5);
        assert_eq!(dispatch.callbacks_run[0], "update_map");

        let ids: Vec<_> = dispatch.outputs.iter().map(|o| o.id.as_str()).collect();
        for id in [
            WORLD_MAP,
            DATE_INFO,
            WORLD_CASES_DATA,
            WORLD_DEATHS_DATA,
            CASE_GRAPH,
            DEATH_GRAPH,
            WEEKLY_CASES_GRAPH,
            WEEKLY_DEATHS_GRAPH,
        ] {
            assert!(ids.contains(&id), "missing output {}", id);
        }
    }

    #[test]
    fn test_france_germany_full_range() {
        let dashboard = dashboard();
        let dispatch = dashboard
            .update(
                &inputs(json!({"date-slider": [0, 3], "country-dropdown": ["France", "Germany"]})),
                &[COUNTRY_DROPDOWN.to_string()],
            )
            .unwrap();

        let figure = figure_for(&dispatch, CASE_GRAPH);
        let traces: Vec<_> = figure.scatter_traces().collect();
        assert_eq!(traces.len(), 3);
        assert_eq!(traces[0].name, "France");
        assert_eq!(traces[1].name, "Germany");
        assert!(!traces[0].is_dashed() && !traces[1].is_dashed());
        assert_eq!(traces[2].name, "World");
        assert!(traces[2].is_dashed());

        let all_dates = vec!["2020-03-01", "2020-03-08", "2020-03-15", "2020-03-22"];
        for trace in traces {
            assert_eq!(trace.x, all_dates);
        }
    }

    #[test]
    fn test_slider_change_refreshes_chain() {
        let dashboard = dashboard();
        let dispatch = dashboard
            .update(
                &inputs(json!({"date-slider": [1, 2], "country-dropdown": ["World"]})),
                &[DATE_SLIDER.to_string()],
            )
            .unwrap();

        let date_info = dispatch
            .outputs
            .iter()
            .find(|o| o.id == DATE_INFO)
            .map(|o| o.value.clone());
        assert_eq!(
            date_info,
            Some(PropValue::Text(
                "Selected Date Range: 2020-03-08 to 2020-03-15".to_string()
            ))
        );

        let deaths = figure_for(&dispatch, DEATH_GRAPH);
        let overlay = deaths.scatter_traces().last().unwrap();
        assert!(overlay.is_dashed());
        assert_eq!(overlay.x, vec!["2020-03-08", "2020-03-15"]);

        // weekly charts resolve the indices against their own dates
        let weekly = figure_for(&dispatch, WEEKLY_CASES_GRAPH);
        let trace = weekly.scatter_traces().next().unwrap();
        assert_eq!(trace.x, vec!["2020-03-08", "2020-03-15"]);
        assert!(trace.is_dashed());
    }

    #[test]
    fn test_map_for_aggregate_selection() {
        let dashboard = dashboard();
        let dispatch = dashboard.update(&HashMap::new(), &[]).unwrap();

        match &figure_for(&dispatch, WORLD_MAP).data[0] {
            Trace::Choropleth(trace) => {
                assert!(trace.locations.iter().all(|l| l == "World"));
                assert_eq!(trace.geojson, GEOJSON_ROUTE);
            }
            other => panic!("expected choropleth, got {:?}", other),
        }
    }
}
