//! Calculator trees: the executable form of a validated expression.
//!
//! A tree is built once by [`ExpCompiler`] and evaluated any number of
//! times against different [`EvaluationContext`]s. Nodes own their children
//! and hold no mutable state, so a tree can be shared between threads.

use crate::access::Value;
use crate::expression::{Category, ExpressionResult};
use std::fmt::{self, Write};

pub mod compiler;
pub mod constant;
pub mod context;
pub mod conversion;
pub mod leaf;
pub mod typed;

// Re-export calculators
pub use compiler::ExpCompiler;
pub use constant::ConstantCalc;
pub use context::{CellContext, CellStore, EvaluationContext};
pub use conversion::ConversionCalc;
pub use leaf::{CurrentMemberCalc, MeasureCalc, TupleCalc};
pub use typed::{MemberCalc, StringCalc};

/// Trait for all calculator nodes
pub trait Calc: fmt::Debug + Send + Sync {
    /// Evaluate this node in the given context
    fn evaluate(&self, context: &dyn EvaluationContext) -> ExpressionResult<Value>;

    /// Category of the values this node produces
    fn category(&self) -> Category;

    /// Short label used by [`explain`]
    fn name(&self) -> String;

    /// Child nodes in evaluation order
    fn children(&self) -> Vec<&dyn Calc> {
        Vec::new()
    }
}

pub type BoxedCalc = Box<dyn Calc>;

/// Render a calculator tree as an indented plan
pub fn explain(calc: &dyn Calc) -> String {
    let mut out = String::new();
    explain_into(calc, 0, &mut out);
    out
}

fn explain_into(calc: &dyn Calc, depth: usize, out: &mut String) {
    let _ = writeln!(
        out,
        "{:indent$}{}: {}",
        "",
        calc.name(),
        calc.category(),
        indent = depth * 2
    );
    for child in calc.children() {
        explain_into(child, depth + 1, out);
    }
}
