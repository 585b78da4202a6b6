//! Error types for resolution, compilation and evaluation.

use crate::expression::{Category, Expression};
use thiserror::Error;

/// Static type deduction failed for a call the resolver accepted.
///
/// This indicates a defect rather than a user error; the rendered
/// arguments are kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot deduce type of call to function '{function}' DETAILS(ARGCOUNT: {arg_count}, PARAMS: {params})")]
pub struct DeductionError {
    pub function: String,
    pub arg_count: usize,
    /// Each argument rendered as `" | " + unparse`
    pub params: String,
}

impl DeductionError {
    pub fn new(function: &str, args: &[Expression]) -> Self {
        let params = args.iter().map(|arg| format!(" | {}", arg)).collect();
        Self {
            function: function.to_string(),
            arg_count: args.len(),
            params,
        }
    }
}

/// Errors that can occur while resolving, compiling or evaluating expressions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// No operator is registered under this name and syntax
    #[error("No function matches signature '{name}'")]
    UnknownFunction { name: String },

    /// Candidates exist but none accepts the argument categories
    #[error("No function matches signature '{name}({arguments})'")]
    NoMatchingFunction { name: String, arguments: String },

    #[error(transparent)]
    Deduction(#[from] DeductionError),

    /// A call reached compilation without being validated
    #[error("Call to '{name}' has not been resolved")]
    UnresolvedCall { name: String },

    /// Runtime value does not fit the category its consumer requires
    #[error("Type mismatch in {context}: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: Category,
        actual: Category,
        context: String,
    },

    /// Strict-mode access to a property the member's level does not have
    #[error("Property '{property}' is not valid for member '{member}'")]
    InvalidProperty { property: String, member: String },
}

impl ExpressionError {
    /// Check if this error is a user-facing evaluation error
    pub fn is_evaluation(&self) -> bool {
        matches!(
            self,
            ExpressionError::TypeMismatch { .. } | ExpressionError::InvalidProperty { .. }
        )
    }
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduction_error_message() {
        let args = vec![
            Expression::measure("X"),
            Expression::integer(1),
            Expression::null(),
        ];
        let err = DeductionError::new("_CaseMatch", &args);
        assert_eq!(
            err.to_string(),
            "Cannot deduce type of call to function '_CaseMatch' DETAILS(ARGCOUNT: 3, PARAMS:  | [Measures].[X] | 1 | NULL)"
        );

        let wrapped: ExpressionError = err.into();
        assert!(!wrapped.is_evaluation());
    }

    #[test]
    fn test_error_display() {
        let err = ExpressionError::InvalidProperty {
            property: "Bonus".to_string(),
            member: "[Employee].[John]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Property 'Bonus' is not valid for member '[Employee].[John]'"
        );
        assert!(err.is_evaluation());

        let err = ExpressionError::TypeMismatch {
            expected: Category::Member,
            actual: Category::String,
            context: "Properties".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch in Properties: expected Member, got String"
        );
    }
}
