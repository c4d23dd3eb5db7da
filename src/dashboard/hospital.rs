//! Hospital admissions dashboard: one dropdown, one line chart.

use std::sync::Arc;

use super::callbacks::{Callback, PropValue};
use super::layout::Component;
use super::{Dashboard, DashboardResult};
use crate::data::AdmissionsTable;
use crate::figure::line::{admissions_chart, ADMISSIONS_TITLE};
use crate::filters::AGGREGATE_REGION;

pub const TITLE: &str = ADMISSIONS_TITLE;

pub const COUNTRY_DROPDOWN: &str = "country-dropdown-hospital";
pub const ADMISSIONS_GRAPH: &str = "hospital-admissions-graph";

/// Build the hospital dashboard over the admissions table
pub fn hospital_dashboard(admissions: Arc<AdmissionsTable>) -> DashboardResult<Dashboard> {
    let layout = Component::div(vec![
        Component::heading(TITLE).style("text-align: center"),
        Component::div(vec![
            Component::dropdown(
                COUNTRY_DROPDOWN,
                admissions.entities().to_vec(),
                vec![AGGREGATE_REGION.to_string()],
            ),
            Component::graph(ADMISSIONS_GRAPH),
        ])
        .style("width: 80%; margin: auto"),
    ]);

    let callback = Callback::new(
        "update_hospital_admissions_graph",
        &[COUNTRY_DROPDOWN],
        &[ADMISSIONS_GRAPH],
        move |store| {
            let selection = store.selection(COUNTRY_DROPDOWN)?;
            Ok(vec![PropValue::Figure(admissions_chart(&admissions, &selection))])
        },
    );

    Dashboard::new(TITLE, layout, vec![callback])
}
