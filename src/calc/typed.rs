//! Typed accessors over generic calculators.
//!
//! The compiler hands these to operators whose positions need a specific
//! shape; evaluation checks the runtime value against that shape.

use crate::access::Value;
use crate::calc::{BoxedCalc, Calc, EvaluationContext};
use crate::catalog::Member;
use crate::expression::{Category, ExpressionError, ExpressionResult};

/// Calculator producing a member, or NULL
#[derive(Debug)]
pub struct MemberCalc {
    inner: BoxedCalc,
}

impl MemberCalc {
    pub fn new(inner: BoxedCalc) -> Self {
        Self { inner }
    }

    pub fn evaluate_member(
        &self,
        context: &dyn EvaluationContext,
    ) -> ExpressionResult<Option<Member>> {
        match self.inner.evaluate(context)? {
            Value::Member(member) => Ok(Some(member)),
            Value::Null => Ok(None),
            other => Err(ExpressionError::TypeMismatch {
                expected: Category::Member,
                actual: other.category(),
                context: self.inner.name(),
            }),
        }
    }

    pub fn inner(&self) -> &dyn Calc {
        self.inner.as_ref()
    }
}

/// Calculator producing a string, or NULL
#[derive(Debug)]
pub struct StringCalc {
    inner: BoxedCalc,
}

impl StringCalc {
    pub fn new(inner: BoxedCalc) -> Self {
        Self { inner }
    }

    pub fn evaluate_string(
        &self,
        context: &dyn EvaluationContext,
    ) -> ExpressionResult<Option<String>> {
        match self.inner.evaluate(context)? {
            Value::String(s) => Ok(Some(s)),
            Value::Null => Ok(None),
            other => Err(ExpressionError::TypeMismatch {
                expected: Category::String,
                actual: other.category(),
                context: self.inner.name(),
            }),
        }
    }

    pub fn inner(&self) -> &dyn Calc {
        self.inner.as_ref()
    }
}
