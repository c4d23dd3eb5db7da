//! World boundary document
//!
//! The choropleth joins region names against `properties.name` of a GeoJSON
//! FeatureCollection. The document is fetched once at startup, kept
//! verbatim for the browser and indexed by name for lookups.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use super::error::{DataError, DataResult};

/// Public world boundary document used by default
pub const DEFAULT_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/johan/world.geo.json/master/countries.geo.json";

/// Property of each feature that region names are matched against
pub const FEATURE_ID_KEY: &str = "properties.name";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    ty: String,
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<FeatureProperties>,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    #[serde(default)]
    name: Option<String>,
}

/// Immutable GeoJSON boundary document
#[derive(Debug, Clone)]
pub struct BoundaryDocument {
    raw: Arc<Value>,
    names: BTreeSet<String>,
    feature_count: usize,
}

impl BoundaryDocument {
    /// Build from an already parsed JSON value
    pub fn from_value(raw: Value) -> DataResult<Self> {
        let collection: FeatureCollection = serde_json::from_value(raw.clone())?;
        if collection.ty != "FeatureCollection" {
            return Err(DataError::GeoJson(format!(
                "expected a FeatureCollection, got {}",
                collection.ty
            )));
        }

        let feature_count = collection.features.len();
        let names: BTreeSet<String> = collection
            .features
            .into_iter()
            .filter_map(|f| f.properties.and_then(|p| p.name))
            .collect();

        if names.len() < feature_count {
            tracing::debug!(
                features = feature_count,
                named = names.len(),
                "Some boundary features have no usable name"
            );
        }

        Ok(Self {
            raw: Arc::new(raw),
            names,
            feature_count,
        })
    }

    /// Parse from a JSON string
    pub fn from_json_str(json: &str) -> DataResult<Self> {
        let raw: Value = serde_json::from_str(json)?;
        Self::from_value(raw)
    }

    /// Load from a local file
    pub fn from_path(path: &Path) -> DataResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|error| DataError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        let doc = Self::from_json_str(&content)?;
        tracing::info!(path = ?path, features = doc.feature_count, "Loaded boundary document");
        Ok(doc)
    }

    /// Fetch over HTTP. One attempt, no timeout, no retry.
    pub async fn fetch(url: &str) -> DataResult<Self> {
        let http_err = |error| DataError::Http {
            url: url.to_string(),
            error,
        };

        tracing::info!(url = %url, "Fetching boundary document");

        let raw: Value = reqwest::get(url)
            .await
            .map_err(http_err)?
            .error_for_status()
            .map_err(http_err)?
            .json()
            .await
            .map_err(http_err)?;

        let doc = Self::from_value(raw)?;
        tracing::info!(url = %url, features = doc.feature_count, "Fetched boundary document");
        Ok(doc)
    }

    /// The document as received
    pub fn raw(&self) -> &Arc<Value> {
        &self.raw
    }

    /// Check whether a region name has a polygon
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// All feature names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }
}
