//! Validation: binding unresolved calls to registered operators.

use crate::catalog::Metadata;
use crate::config::EngineConfig;
use crate::expression::{
    find_conversion, Category, ConversionRequirement, Expression, ExpressionError,
    ExpressionResult, ResolvedCall, Syntax,
};
use crate::function::registry::FunctionRegistry;
use crate::function::signature::ResolvedFunction;

/// Capabilities a resolver strategy consults while matching arguments
pub trait Validator {
    fn metadata(&self) -> &dyn Metadata;

    fn config(&self) -> &EngineConfig;

    /// Check if `arg` can be bound to a parameter of category `to`,
    /// recording any non-identity conversion
    fn can_convert(
        &self,
        ordinal: usize,
        arg: &Expression,
        to: Category,
        conversions: &mut Vec<ConversionRequirement>,
    ) -> bool {
        let from = arg.category();
        match find_conversion(from, to) {
            Some(conversion) => {
                if !conversion.is_exact() {
                    conversions.push(ConversionRequirement {
                        ordinal,
                        from,
                        to,
                        kind: conversion.kind,
                        cost: conversion.cost,
                    });
                }
                true
            }
            None => false,
        }
    }
}

/// Validator over a function registry and a metadata source
pub struct QueryValidator<'a> {
    registry: &'a FunctionRegistry,
    metadata: &'a dyn Metadata,
    config: EngineConfig,
}

impl<'a> QueryValidator<'a> {
    /// Create a validator over the built-in operators
    pub fn new(metadata: &'a dyn Metadata, config: EngineConfig) -> Self {
        Self {
            registry: FunctionRegistry::builtin(),
            metadata,
            config,
        }
    }

    pub fn with_registry(mut self, registry: &'a FunctionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Resolve every unresolved call in the tree, innermost first
    pub fn validate(&self, expr: Expression) -> ExpressionResult<Expression> {
        match expr {
            Expression::Call(call) => {
                let args = call
                    .args
                    .into_iter()
                    .map(|arg| self.validate(arg))
                    .collect::<ExpressionResult<Vec<_>>>()?;
                self.resolve_call(&call.name, call.syntax, args)
            }
            Expression::Tuple(members) => {
                let members = members
                    .into_iter()
                    .map(|m| self.validate(m))
                    .collect::<ExpressionResult<Vec<_>>>()?;
                Ok(Expression::Tuple(members))
            }
            other => Ok(other),
        }
    }

    /// Pick the cheapest accepting overload for already validated arguments
    pub fn resolve_call(
        &self,
        name: &str,
        syntax: Syntax,
        args: Vec<Expression>,
    ) -> ExpressionResult<Expression> {
        let candidates = self.registry.candidates(name, syntax);
        if candidates.is_empty() {
            return Err(ExpressionError::UnknownFunction {
                name: name.to_string(),
            });
        }

        let mut best: Option<ResolvedFunction> = None;
        for candidate in candidates {
            if let Some(resolved) = candidate.resolve(&args, self) {
                // Earlier registrations win ties
                if best
                    .as_ref()
                    .map_or(true, |b| resolved.total_cost() < b.total_cost())
                {
                    best = Some(resolved);
                }
            }
        }

        let Some(function) = best else {
            let arguments = args
                .iter()
                .map(|arg| arg.category().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ExpressionError::NoMatchingFunction {
                name: name.to_string(),
                arguments,
            });
        };

        log::debug!(
            "resolved {} to '{}' returning {} ({} conversion(s))",
            name,
            function.operator().signature,
            function.return_category(),
            function.conversions().len()
        );
        let expr_type = function.result_type(&args)?;
        Ok(Expression::FunCall(Box::new(ResolvedCall {
            function,
            args,
            expr_type,
        })))
    }
}

impl Validator for QueryValidator<'_> {
    fn metadata(&self) -> &dyn Metadata {
        self.metadata
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }
}
