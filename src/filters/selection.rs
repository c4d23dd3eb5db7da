//! Region selection normalization
//!
//! The aggregate `World` pseudo-region always goes last, so that in layered
//! line charts its curve is drawn on top of the countries.

use serde::Serialize;
use std::collections::HashSet;

/// Pseudo-region holding the global total
pub const AGGREGATE_REGION: &str = "World";

/// An ordered, de-duplicated set of selected regions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegionSelection {
    regions: Vec<String>,
}

impl RegionSelection {
    /// Normalize a raw dropdown value: duplicates dropped (first occurrence
    /// wins), the aggregate region moved to the end.
    pub fn new<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut ordered: Vec<String> = Vec::new();
        let mut has_aggregate = false;

        for region in regions {
            let region = region.into();
            if region == AGGREGATE_REGION {
                has_aggregate = true;
                continue;
            }
            if seen.insert(region.clone()) {
                ordered.push(region);
            }
        }

        if has_aggregate {
            ordered.push(AGGREGATE_REGION.to_string());
        }

        Self { regions: ordered }
    }

    /// Just the aggregate region
    pub fn aggregate() -> Self {
        Self {
            regions: vec![AGGREGATE_REGION.to_string()],
        }
    }

    /// Regions in rendering order
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn contains_aggregate(&self) -> bool {
        self.regions.last().map(|r| r == AGGREGATE_REGION).unwrap_or(false)
    }

    /// True when the selection is exactly `["World"]`
    pub fn is_aggregate_only(&self) -> bool {
        self.regions.len() == 1 && self.contains_aggregate()
    }
}

/// Whether a region name is the aggregate pseudo-region
pub fn is_aggregate(region: &str) -> bool {
    region == AGGREGATE_REGION
}
