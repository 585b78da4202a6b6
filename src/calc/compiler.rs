//! Compilation of validated expressions into calculator trees.

use crate::access::Value;
use crate::calc::{
    BoxedCalc, ConstantCalc, ConversionCalc, CurrentMemberCalc, MeasureCalc, MemberCalc,
    StringCalc, TupleCalc,
};
use crate::expression::{
    Category, ConversionKind, Expression, ExpressionError, ExpressionResult, ResolvedCall,
};

/// Expression compiler.
///
/// Operators compile their own calls through the `*_arg` entry points, which
/// apply the conversions recorded during resolution before shaping the
/// argument.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpCompiler;

impl ExpCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compile an expression as a generic calculator
    pub fn compile(&self, expr: &Expression) -> ExpressionResult<BoxedCalc> {
        match expr {
            Expression::Literal(lit) => Ok(Box::new(ConstantCalc::new(
                lit.value.clone(),
                lit.category,
            ))),
            Expression::Member(member) => Ok(Box::new(ConstantCalc::new(
                Value::Member(member.clone()),
                Category::Member,
            ))),
            Expression::CurrentMember { hierarchy } => {
                Ok(Box::new(CurrentMemberCalc::new(hierarchy.clone())))
            }
            Expression::Measure(measure) => Ok(Box::new(MeasureCalc::new(
                measure.name.clone(),
                measure.category,
            ))),
            Expression::Tuple(members) => {
                let members = members
                    .iter()
                    .map(|m| self.compile_member(m))
                    .collect::<ExpressionResult<Vec<_>>>()?;
                Ok(Box::new(TupleCalc::new(members)))
            }
            Expression::Call(call) => Err(ExpressionError::UnresolvedCall {
                name: call.name.clone(),
            }),
            Expression::FunCall(call) => {
                log::trace!("compiling call to {}", call.name());
                (call.function.operator().compile)(call, self)
            }
        }
    }

    /// Compile an expression whose value is used as a scalar; members and
    /// tuples are replaced by their cell values
    pub fn compile_scalar(&self, expr: &Expression) -> ExpressionResult<BoxedCalc> {
        let calc = self.compile(expr)?;
        Ok(Self::as_scalar(calc))
    }

    pub fn compile_member(&self, expr: &Expression) -> ExpressionResult<MemberCalc> {
        let calc = self.compile(expr)?;
        Self::as_member(calc)
    }

    pub fn compile_string(&self, expr: &Expression) -> ExpressionResult<StringCalc> {
        let calc = self.compile(expr)?;
        Self::as_string(calc)
    }

    /// Compile argument `ordinal` of a call, applying its recorded conversion
    pub fn compile_arg(&self, call: &ResolvedCall, ordinal: usize) -> ExpressionResult<BoxedCalc> {
        let calc = self.compile(call.arg(ordinal))?;
        Ok(match call.function.conversion_for(ordinal) {
            Some(req) if req.kind.changes_shape() => {
                Box::new(ConversionCalc::new(req.kind, req.to, calc))
            }
            _ => calc,
        })
    }

    pub fn compile_scalar_arg(
        &self,
        call: &ResolvedCall,
        ordinal: usize,
    ) -> ExpressionResult<BoxedCalc> {
        Ok(Self::as_scalar(self.compile_arg(call, ordinal)?))
    }

    pub fn compile_member_arg(
        &self,
        call: &ResolvedCall,
        ordinal: usize,
    ) -> ExpressionResult<MemberCalc> {
        Self::as_member(self.compile_arg(call, ordinal)?)
    }

    pub fn compile_string_arg(
        &self,
        call: &ResolvedCall,
        ordinal: usize,
    ) -> ExpressionResult<StringCalc> {
        Self::as_string(self.compile_arg(call, ordinal)?)
    }

    fn as_scalar(calc: BoxedCalc) -> BoxedCalc {
        match calc.category() {
            Category::Member => Box::new(ConversionCalc::new(
                ConversionKind::MemberValue,
                Category::Value,
                calc,
            )),
            Category::Tuple => Box::new(ConversionCalc::new(
                ConversionKind::TupleValue,
                Category::Value,
                calc,
            )),
            _ => calc,
        }
    }

    fn as_member(calc: BoxedCalc) -> ExpressionResult<MemberCalc> {
        match calc.category() {
            Category::Member | Category::Null => Ok(MemberCalc::new(calc)),
            actual => Err(ExpressionError::TypeMismatch {
                expected: Category::Member,
                actual,
                context: calc.name(),
            }),
        }
    }

    fn as_string(calc: BoxedCalc) -> ExpressionResult<StringCalc> {
        match calc.category() {
            Category::String | Category::Null => Ok(StringCalc::new(calc)),
            Category::Value => Ok(StringCalc::new(Box::new(ConversionCalc::new(
                ConversionKind::Unwrap,
                Category::String,
                calc,
            )))),
            actual => Err(ExpressionError::TypeMismatch {
                expected: Category::String,
                actual,
                context: calc.name(),
            }),
        }
    }
}
