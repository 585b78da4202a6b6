//! Calculators inserted for conversions that change a value's shape.

use crate::access::Value;
use crate::calc::{BoxedCalc, Calc, EvaluationContext};
use crate::expression::{Category, ConversionKind, ExpressionError, ExpressionResult};

#[derive(Debug)]
pub struct ConversionCalc {
    kind: ConversionKind,
    target: Category,
    inner: BoxedCalc,
}

impl ConversionCalc {
    pub fn new(kind: ConversionKind, target: Category, inner: BoxedCalc) -> Self {
        Self {
            kind,
            target,
            inner,
        }
    }

    fn check(&self, value: Value) -> ExpressionResult<Value> {
        if value.is_compatible_with(self.target) {
            Ok(value)
        } else {
            Err(ExpressionError::TypeMismatch {
                expected: self.target,
                actual: value.category(),
                context: self.name(),
            })
        }
    }
}

impl Calc for ConversionCalc {
    fn evaluate(&self, context: &dyn EvaluationContext) -> ExpressionResult<Value> {
        let value = self.inner.evaluate(context)?;
        match (self.kind, value) {
            (_, Value::Null) => Ok(Value::Null),
            (ConversionKind::NumericToLogical, Value::Numeric(n)) => Ok(Value::Boolean(n != 0.0)),
            (ConversionKind::MemberToTuple, Value::Member(m)) => Ok(Value::Tuple(vec![m])),
            (ConversionKind::MemberValue, Value::Member(m)) => {
                self.check(context.cell_value(std::slice::from_ref(&m)))
            }
            (ConversionKind::TupleValue, Value::Tuple(members)) => {
                self.check(context.cell_value(&members))
            }
            (_, value) => self.check(value),
        }
    }

    fn category(&self) -> Category {
        self.target
    }

    fn name(&self) -> String {
        format!("{:?}", self.kind)
    }

    fn children(&self) -> Vec<&dyn Calc> {
        vec![self.inner.as_ref()]
    }
}
