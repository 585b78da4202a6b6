//! Evaluation contexts.
//!
//! [`EvaluationContext`] is what calculators see of the surrounding
//! executor. [`CellContext`] is an in-memory implementation over a shared
//! [`CellStore`], one context per cell coordinate.

use crate::access::Value;
use crate::catalog::{Member, Metadata};
use crate::config::EngineConfig;
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Per-evaluation state supplied by the executor
pub trait EvaluationContext {
    /// Current member of a hierarchy, if the context has a coordinate on it
    fn current_member(&self, hierarchy: &str) -> Option<Member>;

    /// Value of a measure at the current coordinates
    fn measure_value(&self, measure: &str) -> Value;

    /// Value of the current measure with some coordinates overridden
    fn cell_value(&self, coordinates: &[Member]) -> Value;

    fn config(&self) -> &EngineConfig;

    fn metadata(&self) -> &dyn Metadata;
}

/// Cell coordinates: hierarchy name to member unique name
pub type CellKey = BTreeMap<String, String>;

/// Measure values by cell coordinates
#[derive(Debug, Default)]
pub struct CellStore {
    cells: DashMap<CellKey, HashMap<String, Value>>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(coordinates: &[Member]) -> CellKey {
        coordinates
            .iter()
            .map(|m| (m.hierarchy().to_string(), m.unique_name().to_string()))
            .collect()
    }

    /// Store a measure value at the given coordinates
    pub fn set(&self, coordinates: &[Member], measure: &str, value: impl Into<Value>) {
        self.cells
            .entry(Self::key(coordinates))
            .or_default()
            .insert(measure.to_string(), value.into());
    }

    /// Get a measure value; NULL for empty cells
    pub fn get(&self, key: &CellKey, measure: &str) -> Value {
        self.cells
            .get(key)
            .and_then(|cell| cell.get(measure).cloned())
            .unwrap_or(Value::Null)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Context positioned at one cell of a [`CellStore`]
#[derive(Clone)]
pub struct CellContext {
    metadata: Arc<dyn Metadata>,
    store: Arc<CellStore>,
    config: EngineConfig,
    coordinates: HashMap<String, Member>,
    measure: Option<String>,
}

impl CellContext {
    pub fn new(metadata: Arc<dyn Metadata>, store: Arc<CellStore>, config: EngineConfig) -> Self {
        Self {
            metadata,
            store,
            config,
            coordinates: HashMap::new(),
            measure: None,
        }
    }

    /// Position the context on a member, replacing any member of the same
    /// hierarchy
    pub fn at(mut self, member: Member) -> Self {
        self.coordinates
            .insert(member.hierarchy().to_string(), member);
        self
    }

    /// Measure read by `cell_value`
    pub fn with_measure(mut self, measure: &str) -> Self {
        self.measure = Some(measure.to_string());
        self
    }

    fn current_key(&self) -> CellKey {
        self.coordinates
            .iter()
            .map(|(h, m)| (h.clone(), m.unique_name().to_string()))
            .collect()
    }
}

impl EvaluationContext for CellContext {
    fn current_member(&self, hierarchy: &str) -> Option<Member> {
        self.coordinates.get(hierarchy).cloned()
    }

    fn measure_value(&self, measure: &str) -> Value {
        self.store.get(&self.current_key(), measure)
    }

    fn cell_value(&self, coordinates: &[Member]) -> Value {
        let Some(measure) = &self.measure else {
            return Value::Null;
        };
        let mut key = self.current_key();
        for member in coordinates {
            key.insert(
                member.hierarchy().to_string(),
                member.unique_name().to_string(),
            );
        }
        self.store.get(&key, measure)
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn metadata(&self) -> &dyn Metadata {
        self.metadata.as_ref()
    }
}
