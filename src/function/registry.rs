//! Registry of operator definitions keyed by name and syntax.

use crate::expression::Syntax;
use crate::function::signature::OperatorDef;
use crate::function::{case_match, properties};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static BUILTIN: OnceLock<FunctionRegistry> = OnceLock::new();

/// Operators grouped by upper-cased name and syntax, in registration order
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    operators: Vec<Arc<OperatorDef>>,
    by_key: HashMap<(String, Syntax), Vec<Arc<OperatorDef>>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in operator families
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(case_match::definition());
        registry.register(properties::definition());
        registry
    }

    /// The process-wide registry, built on first use
    pub fn builtin() -> &'static FunctionRegistry {
        BUILTIN.get_or_init(|| {
            let registry = Self::with_builtins();
            log::debug!(
                "initialized function registry with {} operator(s)",
                registry.operators.len()
            );
            registry
        })
    }

    pub fn register(&mut self, operator: OperatorDef) -> Arc<OperatorDef> {
        let operator = Arc::new(operator);
        let key = (operator.name.to_ascii_uppercase(), operator.syntax);
        self.by_key.entry(key).or_default().push(operator.clone());
        self.operators.push(operator.clone());
        operator
    }

    /// Get the overloads registered for a name and syntax
    pub fn candidates(&self, name: &str, syntax: Syntax) -> &[Arc<OperatorDef>] {
        self.by_key
            .get(&(name.to_ascii_uppercase(), syntax))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All operators in registration order
    pub fn operators(&self) -> &[Arc<OperatorDef>] {
        &self.operators
    }
}
