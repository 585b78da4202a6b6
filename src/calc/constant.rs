use crate::access::Value;
use crate::calc::{Calc, EvaluationContext};
use crate::expression::{Category, ExpressionResult};

/// Calculator that always returns the same value
#[derive(Debug, Clone)]
pub struct ConstantCalc {
    value: Value,
    category: Category,
}

impl ConstantCalc {
    pub fn new(value: Value, category: Category) -> Self {
        Self { value, category }
    }

    /// NULL typed as `category`
    pub fn null(category: Category) -> Self {
        Self::new(Value::Null, category)
    }
}

impl Calc for ConstantCalc {
    fn evaluate(&self, _context: &dyn EvaluationContext) -> ExpressionResult<Value> {
        Ok(self.value.clone())
    }

    fn category(&self) -> Category {
        self.category
    }

    fn name(&self) -> String {
        match &self.value {
            Value::String(s) => format!("Constant(\"{}\")", s),
            value => format!("Constant({})", value),
        }
    }
}
