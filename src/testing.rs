//! Small in-memory datasets shared by unit tests

use std::sync::Arc;

use crate::data::{AdmissionsTable, BoundaryDocument, CasesDataset, TimeSeriesTable};

pub const TOTALS_CSV: &str = "\
date,World,France,Germany
2020-03-01,100,10,20
2020-03-08,200,30,40
2020-03-15,400,60,90
2020-03-22,800,120,
";

pub const WEEKLY_CSV: &str = "\
date,World,France,Germany
2020-03-01,100,10,20
2020-03-08,100,20,20
2020-03-15,200,30,50
2020-03-22,400,60,
";

pub const ADMISSIONS_CSV: &str = "\
Entity,Day,Weekly new hospital admissions
France,2020-03-01,120
France,2020-03-08,340
Germany,2020-03-01,80
World,2020-03-01,900
World,2020-03-08,1500
";

pub const BOUNDARIES_JSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "France"}, "geometry": null},
    {"type": "Feature", "properties": {"name": "Germany"}, "geometry": null}
  ]
}"#;

pub fn cases_dataset() -> CasesDataset {
    let table = |name: &str, csv: &str| Arc::new(TimeSeriesTable::from_csv_str(name, csv).unwrap());

    CasesDataset {
        total_cases: table("total_cases", TOTALS_CSV),
        total_deaths: table("total_deaths", TOTALS_CSV),
        weekly_cases: table("weekly_cases", WEEKLY_CSV),
        weekly_deaths: table("weekly_deaths", WEEKLY_CSV),
    }
}

pub fn admissions() -> AdmissionsTable {
    AdmissionsTable::from_csv_str(ADMISSIONS_CSV, "Weekly new hospital admissions").unwrap()
}

pub fn boundaries() -> BoundaryDocument {
    BoundaryDocument::from_json_str(BOUNDARIES_JSON).unwrap()
}
