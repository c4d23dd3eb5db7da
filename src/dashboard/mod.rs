//! Dashboards
//!
//! A [`Dashboard`] ties a layout tree to a callback graph:
//!
//! - **layout**: static component tree, rendered to HTML
//! - **callbacks**: reactive filters and the dispatcher that runs them
//! - **page**: HTML shell with the browser side of the update loop
//! - **cases** / **hospital**: the two concrete dashboards
//!
//! # Update flow
//!
//! ```text
//! browser ──{inputs, changed}──> parse_inputs ──> PropStore
//!                                                    │
//!                      CallbackGraph::dispatch <─────┘
//!                                │
//! browser <──{outputs}───────────┘
//! ```

pub mod callbacks;
pub mod cases;
pub mod hospital;
pub mod layout;
pub mod page;

pub use callbacks::{
    Callback, CallbackError, CallbackGraph, CallbackResult, Dispatch, OutputUpdate, PropStore,
    PropValue,
};
pub use layout::{Component, ControlKind};

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::data::BoundaryDocument;
use crate::filters::DateRange;

/// Errors raised while assembling or updating a dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    /// An id is not present in the layout
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    /// A value was supplied for a component the user cannot change
    #[error("Component '{0}' is not a control")]
    NotAControl(String),

    /// A callback writes a control or a layout-only component
    #[error("Component '{0}' cannot be a callback output")]
    InvalidOutput(String),

    /// A control value has the wrong shape
    #[error("Invalid value for '{id}': {error}")]
    InvalidValue { id: String, error: String },

    /// Callback graph error
    #[error("Callback error: {0}")]
    Callback(#[from] CallbackError),
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

/// A layout plus the callbacks that bring it to life
#[derive(Debug)]
pub struct Dashboard {
    title: String,
    layout: Component,
    callbacks: CallbackGraph,
    boundaries: Option<Arc<BoundaryDocument>>,
}

impl Dashboard {
    /// Assemble a dashboard, checking every callback id against the layout
    pub fn new(
        title: impl Into<String>,
        layout: Component,
        callbacks: Vec<Callback>,
    ) -> DashboardResult<Self> {
        let callbacks = CallbackGraph::build(callbacks)?;

        for callback in callbacks.callbacks() {
            for input in callback.inputs() {
                if layout.find(input).is_none() {
                    return Err(DashboardError::UnknownComponent(input.clone()));
                }
            }
            for output in callback.outputs() {
                let component = layout
                    .find(output)
                    .ok_or_else(|| DashboardError::UnknownComponent(output.clone()))?;
                if !component.accepts_output() {
                    return Err(DashboardError::InvalidOutput(output.clone()));
                }
            }
        }

        Ok(Self {
            title: title.into(),
            layout,
            callbacks,
            boundaries: None,
        })
    }

    /// Builder method: attach the boundary document served to the browser
    pub fn with_boundaries(mut self, boundaries: Arc<BoundaryDocument>) -> Self {
        self.boundaries = Some(boundaries);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn layout(&self) -> &Component {
        &self.layout
    }

    pub fn callbacks(&self) -> &CallbackGraph {
        &self.callbacks
    }

    pub fn boundaries(&self) -> Option<&Arc<BoundaryDocument>> {
        self.boundaries.as_ref()
    }

    /// Render the full HTML page
    pub fn render_page(&self) -> String {
        page::render_page(&self.title, &self.layout)
    }

    /// Ids of all user controls, in layout order
    pub fn control_ids(&self) -> Vec<String> {
        self.layout
            .descendants()
            .into_iter()
            .filter(|c| c.control_kind().is_some())
            .filter_map(|c| c.id().map(str::to_string))
            .collect()
    }

    /// Controls at their initial values
    pub fn initial_store(&self) -> PropStore {
        let mut store = PropStore::new();
        for component in self.layout.descendants() {
            if let (Some(id), Some(value)) = (component.id(), component.initial_value()) {
                store.insert(id, value);
            }
        }
        store
    }

    /// Build a store from the initial values overridden by client values
    pub fn parse_inputs(&self, inputs: &HashMap<String, Value>) -> DashboardResult<PropStore> {
        let mut store = self.initial_store();

        for (id, raw) in inputs {
            let component = self
                .layout
                .find(id)
                .ok_or_else(|| DashboardError::UnknownComponent(id.clone()))?;
            let kind = component
                .control_kind()
                .ok_or_else(|| DashboardError::NotAControl(id.clone()))?;

            let invalid = |e: serde_json::Error| DashboardError::InvalidValue {
                id: id.clone(),
                error: e.to_string(),
            };
            let value = match kind {
                ControlKind::Range => {
                    let pair: [usize; 2] = serde_json::from_value(raw.clone()).map_err(invalid)?;
                    PropValue::Range(DateRange::from(pair))
                }
                ControlKind::Selection => {
                    let values: Vec<String> =
                        serde_json::from_value(raw.clone()).map_err(invalid)?;
                    PropValue::Selection(values)
                }
            };
            store.insert(id.clone(), value);
        }

        Ok(store)
    }

    /// Run the callbacks affected by `changed`
    ///
    /// An empty `changed` list means a fresh page: every control counts as
    /// changed so every output is produced.
    pub fn update(
        &self,
        inputs: &HashMap<String, Value>,
        changed: &[String],
    ) -> DashboardResult<Dispatch> {
        let mut store = self.parse_inputs(inputs)?;

        let changed: Vec<String> = if changed.is_empty() {
            self.control_ids()
        } else {
            for id in changed {
                if self.layout.find(id).is_none() {
                    return Err(DashboardError::UnknownComponent(id.clone()));
                }
            }
            changed.to_vec()
        };

        Ok(self.callbacks.dispatch(&mut store, &changed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo_dashboard() -> Dashboard {
        let layout = Component::div(vec![
            Component::range_slider("slider", vec!["a".into(), "b".into(), "c".into()]),
            Component::dropdown(
                "dropdown",
                vec!["World".into(), "France".into()],
                vec!["World".into()],
            ),
            Component::text("range-out"),
            Component::text("selection-out"),
        ]);
        let callbacks = vec![
            Callback::new("range", &["slider"], &["range-out"], |store| {
                let range = store.range("slider")?;
                Ok(vec![PropValue::Text(format!("{}..{}", range.start, range.end))])
            }),
            Callback::new("selection", &["dropdown"], &["selection-out"], |store| {
                let selection = store.selection("dropdown")?;
                Ok(vec![PropValue::Text(selection.regions().join("|"))])
            }),
        ];
        Dashboard::new("Echo", layout, callbacks).unwrap()
    }

    fn inputs(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_initial_update_produces_everything() {
        let dashboard = echo_dashboard();
        let dispatch = dashboard.update(&HashMap::new(), &[]).unwrap();

        assert_eq!(dispatch.callbacks_run, vec!["range", "selection"]);
        assert_eq!(dispatch.outputs[0].value, PropValue::Text("0..2".to_string()));
        assert_eq!(dispatch.outputs[1].value, PropValue::Text("World".to_string()));
    }

    #[test]
    fn test_update_with_client_values() {
        let dashboard = echo_dashboard();
        let dispatch = dashboard
            .update(
                &inputs(json!({"slider": [1, 1], "dropdown": ["World", "France"]})),
                &["dropdown".to_string()],
            )
            .unwrap();

        assert_eq!(dispatch.callbacks_run, vec!["selection"]);
        assert_eq!(
            dispatch.outputs[0].value,
            PropValue::Text("France|World".to_string())
        );
    }

    #[test]
    fn test_invalid_inputs() {
        let dashboard = echo_dashboard();

        let err = dashboard.parse_inputs(&inputs(json!({"slider": ["a", "b"]}))).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidValue { .. }));

        let err = dashboard.parse_inputs(&inputs(json!({"range-out": "x"}))).unwrap_err();
        assert!(matches!(err, DashboardError::NotAControl(_)));

        let err = dashboard.parse_inputs(&inputs(json!({"ghost": [0, 1]}))).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownComponent(_)));

        let err = dashboard.update(&HashMap::new(), &["ghost".to_string()]).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownComponent(_)));
    }

    #[test]
    fn test_callback_ids_validated_against_layout() {
        let layout = Component::div(vec![Component::graph("g")]);
        let cb = Callback::new("cb", &["missing"], &["g"], |_| Ok(vec![]));
        let err = Dashboard::new("Bad", layout.clone(), vec![cb]).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownComponent(id) if id == "missing"));

        let layout = Component::div(vec![
            Component::dropdown("d", vec![], vec![]),
            Component::range_slider("s", vec![]),
        ]);
        let cb = Callback::new("cb", &["d"], &["s"], |_| Ok(vec![]));
        let err = Dashboard::new("Bad", layout, vec![cb]).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidOutput(id) if id == "s"));
    }

    #[test]
    fn test_control_ids() {
        let dashboard = echo_dashboard();
        assert_eq!(dashboard.control_ids(), vec!["slider", "dropdown"]);
    }
}
