//! Callback graph and dispatcher
//!
//! A callback watches a set of component ids and produces values for
//! another set. When controls change, every callback with a changed input
//! runs, in an order fixed when the graph is built, and its outputs count
//! as changed for the callbacks after it. That lets the map callback feed
//! the total charts through hidden stores within a single dispatch.
//!
//! ```text
//! date-slider ─┬─> update_map ──> world-cases-data ──> update_case_graph
//! dropdown ────┘                                      (also watches slider
//!                                                      and dropdown)
//! ```

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::figure::{AggregateSeries, Figure};
use crate::filters::{DateRange, RegionSelection};

/// A value held by a component
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropValue {
    /// Range slider position
    Range(DateRange),
    /// Dropdown values, as chosen (not yet normalized)
    Selection(Vec<String>),
    /// Graph figure
    Figure(Figure),
    /// Text content
    Text(String),
    /// Hidden store holding an aggregate series
    Series(AggregateSeries),
}

impl PropValue {
    fn kind(&self) -> &'static str {
        match self {
            PropValue::Range(_) => "range",
            PropValue::Selection(_) => "selection",
            PropValue::Figure(_) => "figure",
            PropValue::Text(_) => "text",
            PropValue::Series(_) => "series",
        }
    }
}

/// Errors raised while building or running callbacks
#[derive(Error, Debug, PartialEq)]
pub enum CallbackError {
    /// A callback read an id that holds no value
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A callback read an id holding a value of another kind
    #[error("Input '{id}' is a {found}, expected a {expected}")]
    TypeMismatch {
        id: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A handler returned the wrong number of values
    #[error("Callback '{callback}' returned {got} values for {expected} outputs")]
    OutputArity {
        callback: String,
        expected: usize,
        got: usize,
    },

    /// Two callbacks write the same id
    #[error("Output '{0}' is written by more than one callback")]
    DuplicateOutput(String),

    /// Callbacks feed each other in a loop
    #[error("Callback '{0}' is part of a dependency cycle")]
    Cycle(String),
}

/// Result type alias for callback operations
pub type CallbackResult<T> = Result<T, CallbackError>;

/// Current component values seen by callbacks
#[derive(Debug, Clone, Default)]
pub struct PropStore {
    values: HashMap<String, PropValue>,
}

impl PropStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, value: PropValue) {
        self.values.insert(id.into(), value);
    }

    fn require(&self, id: &str) -> CallbackResult<&PropValue> {
        self.values
            .get(id)
            .ok_or_else(|| CallbackError::MissingInput(id.to_string()))
    }

    fn mismatch(id: &str, expected: &'static str, found: &PropValue) -> CallbackError {
        CallbackError::TypeMismatch {
            id: id.to_string(),
            expected,
            found: found.kind(),
        }
    }

    /// Read a range slider value
    pub fn range(&self, id: &str) -> CallbackResult<DateRange> {
        match self.require(id)? {
            PropValue::Range(range) => Ok(*range),
            other => Err(Self::mismatch(id, "range", other)),
        }
    }

    /// Read a dropdown value, normalized
    pub fn selection(&self, id: &str) -> CallbackResult<RegionSelection> {
        match self.require(id)? {
            PropValue::Selection(values) => Ok(RegionSelection::new(values.iter().cloned())),
            other => Err(Self::mismatch(id, "selection", other)),
        }
    }

    /// Read a store holding an aggregate series
    pub fn series(&self, id: &str) -> CallbackResult<&AggregateSeries> {
        match self.require(id)? {
            PropValue::Series(series) => Ok(series),
            other => Err(Self::mismatch(id, "series", other)),
        }
    }
}

type Handler = Box<dyn Fn(&PropStore) -> CallbackResult<Vec<PropValue>> + Send + Sync>;

/// A pure function from input ids to output ids
pub struct Callback {
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    handler: Handler,
}

impl Callback {
    /// `handler` must return exactly one value per output, in order
    pub fn new<F>(name: impl Into<String>, inputs: &[&str], outputs: &[&str], handler: F) -> Self
    where
        F: Fn(&PropStore) -> CallbackResult<Vec<PropValue>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            handler: Box::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

/// One value produced during a dispatch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputUpdate {
    pub id: String,
    pub value: PropValue,
}

/// Result of a dispatch
#[derive(Debug, Clone, Default)]
pub struct Dispatch {
    /// Produced values, in execution order
    pub outputs: Vec<OutputUpdate>,
    /// Names of the callbacks that ran, in order
    pub callbacks_run: Vec<String>,
}

/// Validated set of callbacks with a fixed execution order
#[derive(Debug)]
pub struct CallbackGraph {
    callbacks: Vec<Callback>,
    /// Indices into `callbacks`, upstream first
    order: Vec<usize>,
}

impl CallbackGraph {
    /// Validate callbacks and fix their execution order
    pub fn build(callbacks: Vec<Callback>) -> CallbackResult<Self> {
        let mut writer: HashMap<&str, usize> = HashMap::new();
        for (idx, callback) in callbacks.iter().enumerate() {
            for output in &callback.outputs {
                if writer.insert(output.as_str(), idx).is_some() {
                    return Err(CallbackError::DuplicateOutput(output.clone()));
                }
            }
        }

        // edge a -> b when b reads an output of a
        let mut downstream: Vec<Vec<usize>> = vec![Vec::new(); callbacks.len()];
        let mut in_degree = vec![0usize; callbacks.len()];
        for (idx, callback) in callbacks.iter().enumerate() {
            let upstream: HashSet<usize> = callback
                .inputs
                .iter()
                .filter_map(|input| writer.get(input.as_str()).copied())
                .collect();
            for up in upstream {
                downstream[up].push(idx);
                in_degree[idx] += 1;
            }
        }

        // Kahn's algorithm; ties keep registration order
        let mut order = Vec::with_capacity(callbacks.len());
        let mut done = vec![false; callbacks.len()];
        while order.len() < callbacks.len() {
            let Some(next) = (0..callbacks.len()).find(|&i| !done[i] && in_degree[i] == 0) else {
                let stuck = (0..callbacks.len())
                    .find(|&i| !done[i])
                    .map(|i| callbacks[i].name.clone())
                    .unwrap_or_default();
                return Err(CallbackError::Cycle(stuck));
            };
            done[next] = true;
            order.push(next);
            for &down in &downstream[next] {
                in_degree[down] -= 1;
            }
        }

        Ok(Self { callbacks, order })
    }

    /// Callbacks in execution order
    pub fn callbacks(&self) -> impl Iterator<Item = &Callback> {
        self.order.iter().map(|&idx| &self.callbacks[idx])
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Run every callback affected by `changed`, writing outputs into `store`
    pub fn dispatch(&self, store: &mut PropStore, changed: &[String]) -> CallbackResult<Dispatch> {
        let mut changed: HashSet<String> = changed.iter().cloned().collect();
        let mut result = Dispatch::default();

        for callback in self.callbacks() {
            if !callback.inputs.iter().any(|input| changed.contains(input)) {
                continue;
            }

            let _span = tracing::debug_span!("callback", name = %callback.name).entered();
            let values = (callback.handler)(store)?;

            if values.len() != callback.outputs.len() {
                return Err(CallbackError::OutputArity {
                    callback: callback.name.clone(),
                    expected: callback.outputs.len(),
                    got: values.len(),
                });
            }

            for (id, value) in callback.outputs.iter().zip(values) {
                store.insert(id.clone(), value.clone());
                changed.insert(id.clone());
                result.outputs.push(OutputUpdate {
                    id: id.clone(),
                    value,
                });
            }
            result.callbacks_run.push(callback.name.clone());
        }

        tracing::debug!(
            callbacks = result.callbacks_run.len(),
            outputs = result.outputs.len(),
            "Dispatch complete"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> PropValue {
        PropValue::Text(s.to_string())
    }

    fn changed(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    /// slider -> a -> store -> b, plus c watching only the dropdown
    fn chained_graph() -> CallbackGraph {
        // registered downstream first to check ordering
        let b = Callback::new("b", &["slider", "store"], &["b-out"], |store| {
            let range = store.range("slider")?;
            let series = store.series("store")?;
            Ok(vec![PropValue::Text(format!(
                "{}-{} ({} points)",
                range.start,
                range.end,
                series.dates.len()
            ))])
        });
        let a = Callback::new("a", &["slider"], &["a-out", "store"], |store| {
            let range = store.range("slider")?;
            let series = AggregateSeries {
                dates: vec!["2020-01-01".to_string(); range.end - range.start + 1],
                values: vec![None; range.end - range.start + 1],
            };
            Ok(vec![text("a ran"), PropValue::Series(series)])
        });
        let c = Callback::new("c", &["dropdown"], &["c-out"], |store| {
            let selection = store.selection("dropdown")?;
            Ok(vec![PropValue::Text(selection.regions().join(","))])
        });

        CallbackGraph::build(vec![b, a, c]).unwrap()
    }

    fn controls() -> PropStore {
        let mut store = PropStore::new();
        store.insert("slider", PropValue::Range(DateRange::new(1, 3)));
        store.insert(
            "dropdown",
            PropValue::Selection(vec!["World".to_string(), "France".to_string()]),
        );
        store
    }

    #[test]
    fn test_topological_order() {
        let graph = chained_graph();
        let names: Vec<_> = graph.callbacks().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dispatch_runs_chain() {
        let graph = chained_graph();
        let mut store = controls();

        let dispatch = graph.dispatch(&mut store, &changed(&["slider"])).unwrap();

        assert_eq!(dispatch.callbacks_run, vec!["a", "b"]);
        let ids: Vec<_> = dispatch.outputs.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a-out", "store", "b-out"]);
        assert_eq!(dispatch.outputs[2].value, text("1-3 (3 points)"));
    }

    #[test]
    fn test_dispatch_only_affected_callbacks() {
        let graph = chained_graph();
        let mut store = controls();

        let dispatch = graph.dispatch(&mut store, &changed(&["dropdown"])).unwrap();

        assert_eq!(dispatch.callbacks_run, vec!["c"]);
        // normalized: aggregate last
        assert_eq!(dispatch.outputs[0].value, text("France,World"));
    }

    #[test]
    fn test_dispatch_nothing_changed() {
        let graph = chained_graph();
        let mut store = controls();

        let dispatch = graph.dispatch(&mut store, &[]).unwrap();
        assert!(dispatch.outputs.is_empty());
    }

    #[test]
    fn test_missing_input() {
        let graph = chained_graph();
        let mut store = PropStore::new();

        let err = graph.dispatch(&mut store, &changed(&["dropdown"])).unwrap_err();
        assert_eq!(err, CallbackError::MissingInput("dropdown".to_string()));
    }

    #[test]
    fn test_type_mismatch() {
        let mut store = PropStore::new();
        store.insert("slider", text("oops"));

        let err = store.range("slider").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Input 'slider' is a text, expected a range"
        );
    }

    #[test]
    fn test_output_arity() {
        let cb = Callback::new("bad", &["x"], &["y", "z"], |_| Ok(vec![text("only one")]));
        let graph = CallbackGraph::build(vec![cb]).unwrap();
        let mut store = PropStore::new();

        let err = graph.dispatch(&mut store, &changed(&["x"])).unwrap_err();
        assert!(matches!(err, CallbackError::OutputArity { expected: 2, got: 1, .. }));
    }

    #[test]
    fn test_duplicate_output_rejected() {
        let first = Callback::new("first", &["x"], &["y"], |_| Ok(vec![text("1")]));
        let second = Callback::new("second", &["x"], &["y"], |_| Ok(vec![text("2")]));

        let err = CallbackGraph::build(vec![first, second]).unwrap_err();
        assert_eq!(err, CallbackError::DuplicateOutput("y".to_string()));
    }

    #[test]
    fn test_cycle_rejected() {
        let ping = Callback::new("ping", &["pong-out"], &["ping-out"], |_| Ok(vec![text("ping")]));
        let pong = Callback::new("pong", &["ping-out"], &["pong-out"], |_| Ok(vec![text("pong")]));

        let err = CallbackGraph::build(vec![ping, pong]).unwrap_err();
        assert!(matches!(err, CallbackError::Cycle(_)));

        let selfish = Callback::new("selfish", &["me"], &["me"], |_| Ok(vec![text("me")]));
        let err = CallbackGraph::build(vec![selfish]).unwrap_err();
        assert_eq!(err, CallbackError::Cycle("selfish".to_string()));
    }

    #[test]
    fn test_prop_value_json() {
        let json = serde_json::to_value(PropValue::Range(DateRange::new(0, 4))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "range", "value": {"start": 0, "end": 4}})
        );
    }
}
