//! Operator definitions and resolved function bindings.

use crate::calc::{BoxedCalc, ExpCompiler};
use crate::expression::{
    Category, ConversionRequirement, DeductionError, ExprType, Expression, ExpressionResult,
    ResolvedCall, Syntax,
};
use crate::function::resolver;
use crate::function::validator::Validator;
use std::fmt;
use std::sync::Arc;

/// Builds the calculator node for a resolved call
pub type CompileFn = fn(&ResolvedCall, &ExpCompiler) -> ExpressionResult<BoxedCalc>;

/// Computes a return category from the arguments of an accepted call
pub type DeduceFn = fn(&[Expression], &dyn Validator) -> Category;

#[derive(Clone, Copy)]
pub enum ReturnCategory {
    Declared(Category),
    /// Decided per call once the arguments are known to match
    Deduced(DeduceFn),
}

impl fmt::Debug for ReturnCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnCategory::Declared(category) => write!(f, "Declared({})", category),
            ReturnCategory::Deduced(_) => write!(f, "Deduced"),
        }
    }
}

/// How an operator matches its arguments
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Positional matching against one of several fixed parameter patterns,
    /// selected by argument count
    Fixed {
        patterns: Vec<Vec<Category>>,
        returns: ReturnCategory,
    },
    /// `value, (match, result)+, [default]`
    Pairwise,
}

/// Which argument's static type seeds the result type of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSource {
    FirstArg,
    ThirdArg,
}

/// A registered operator: descriptive data, a resolution strategy and a
/// compile function
pub struct OperatorDef {
    pub name: String,
    /// Human readable signature, e.g. `<Member>.Properties(<String>)`
    pub signature: String,
    pub description: String,
    pub syntax: Syntax,
    pub strategy: Strategy,
    pub type_source: TypeSource,
    /// Keywords accepted in Symbol positions
    pub reserved_words: Vec<String>,
    pub compile: CompileFn,
}

impl OperatorDef {
    pub fn new(
        name: &str,
        signature: &str,
        description: &str,
        syntax: Syntax,
        strategy: Strategy,
        compile: CompileFn,
    ) -> Self {
        Self {
            name: name.to_string(),
            signature: signature.to_string(),
            description: description.to_string(),
            syntax,
            strategy,
            type_source: TypeSource::FirstArg,
            reserved_words: Vec::new(),
            compile,
        }
    }

    pub fn with_type_source(mut self, type_source: TypeSource) -> Self {
        self.type_source = type_source;
        self
    }

    pub fn with_reserved_words(mut self, words: &[&str]) -> Self {
        self.reserved_words = words.iter().map(|w| w.to_string()).collect();
        self
    }

    /// Check if a keyword is one of this operator's reserved words
    pub fn is_reserved_word(&self, word: &str) -> bool {
        self.reserved_words
            .iter()
            .any(|w| w.eq_ignore_ascii_case(word))
    }

    /// Try to bind this operator to an argument list.
    ///
    /// `None` means the arguments do not fit; it is not an error.
    pub fn resolve(
        self: &Arc<Self>,
        args: &[Expression],
        validator: &dyn Validator,
    ) -> Option<ResolvedFunction> {
        match &self.strategy {
            Strategy::Fixed { patterns, returns } => {
                resolver::resolve_fixed(self, patterns, *returns, args, validator)
            }
            Strategy::Pairwise => resolver::resolve_pairwise(self, args, validator),
        }
    }
}

impl fmt::Debug for OperatorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorDef")
            .field("name", &self.name)
            .field("syntax", &self.syntax)
            .field("strategy", &self.strategy)
            .field("type_source", &self.type_source)
            .finish()
    }
}

/// An operator bound to one invocation's concrete categories
#[derive(Debug, Clone)]
pub struct ResolvedFunction {
    operator: Arc<OperatorDef>,
    return_category: Category,
    param_categories: Vec<Category>,
    conversions: Vec<ConversionRequirement>,
}

impl ResolvedFunction {
    pub fn new(
        operator: Arc<OperatorDef>,
        return_category: Category,
        param_categories: Vec<Category>,
        conversions: Vec<ConversionRequirement>,
    ) -> Self {
        Self {
            operator,
            return_category,
            param_categories,
            conversions,
        }
    }

    pub fn operator(&self) -> &OperatorDef {
        &self.operator
    }

    pub fn name(&self) -> &str {
        &self.operator.name
    }

    pub fn syntax(&self) -> Syntax {
        self.operator.syntax
    }

    pub fn return_category(&self) -> Category {
        self.return_category
    }

    pub fn param_categories(&self) -> &[Category] {
        &self.param_categories
    }

    pub fn conversions(&self) -> &[ConversionRequirement] {
        &self.conversions
    }

    /// Conversion recorded for an argument position, if any
    pub fn conversion_for(&self, ordinal: usize) -> Option<&ConversionRequirement> {
        self.conversions.iter().find(|c| c.ordinal == ordinal)
    }

    /// Sum of conversion costs; used to rank overloads
    pub fn total_cost(&self) -> u32 {
        self.conversions.iter().map(|c| c.cost).sum()
    }

    /// Static type of a call to this function
    pub fn result_type(&self, args: &[Expression]) -> Result<ExprType, DeductionError> {
        let ordinal = match self.operator.type_source {
            TypeSource::FirstArg => 0,
            TypeSource::ThirdArg => 2,
        };
        let source = args.get(ordinal).map(Expression::expr_type);
        ExprType::cast(source.as_ref(), self.return_category)
            .ok_or_else(|| DeductionError::new(self.name(), args))
    }
}
