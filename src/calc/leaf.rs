//! Leaf calculators that read from the evaluation context.

use crate::access::Value;
use crate::calc::{Calc, EvaluationContext, MemberCalc};
use crate::expression::{Category, ExpressionResult};

/// The context's current member of a hierarchy
#[derive(Debug)]
pub struct CurrentMemberCalc {
    hierarchy: String,
}

impl CurrentMemberCalc {
    pub fn new(hierarchy: impl Into<String>) -> Self {
        Self {
            hierarchy: hierarchy.into(),
        }
    }
}

impl Calc for CurrentMemberCalc {
    fn evaluate(&self, context: &dyn EvaluationContext) -> ExpressionResult<Value> {
        Ok(context
            .current_member(&self.hierarchy)
            .map(Value::Member)
            .unwrap_or(Value::Null))
    }

    fn category(&self) -> Category {
        Category::Member
    }

    fn name(&self) -> String {
        format!("CurrentMember([{}])", self.hierarchy)
    }
}

/// A measure's value in the current cell
#[derive(Debug)]
pub struct MeasureCalc {
    measure: String,
    category: Category,
}

impl MeasureCalc {
    pub fn new(measure: impl Into<String>, category: Category) -> Self {
        Self {
            measure: measure.into(),
            category,
        }
    }
}

impl Calc for MeasureCalc {
    fn evaluate(&self, context: &dyn EvaluationContext) -> ExpressionResult<Value> {
        Ok(context.measure_value(&self.measure))
    }

    fn category(&self) -> Category {
        self.category
    }

    fn name(&self) -> String {
        format!("Measure([{}])", self.measure)
    }
}

/// Tuple built from member calculators; NULL if any member is NULL
#[derive(Debug)]
pub struct TupleCalc {
    members: Vec<MemberCalc>,
}

impl TupleCalc {
    pub fn new(members: Vec<MemberCalc>) -> Self {
        Self { members }
    }
}

impl Calc for TupleCalc {
    fn evaluate(&self, context: &dyn EvaluationContext) -> ExpressionResult<Value> {
        let mut members = Vec::with_capacity(self.members.len());
        for calc in &self.members {
            match calc.evaluate_member(context)? {
                Some(member) => members.push(member),
                None => return Ok(Value::Null),
            }
        }
        Ok(Value::Tuple(members))
    }

    fn category(&self) -> Category {
        Category::Tuple
    }

    fn name(&self) -> String {
        "Tuple".to_string()
    }

    fn children(&self) -> Vec<&dyn Calc> {
        self.members.iter().map(MemberCalc::inner).collect()
    }
}
