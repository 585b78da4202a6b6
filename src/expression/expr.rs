//! Argument expression trees.
//!
//! The parser produces [`Expression::Call`] nodes; validation replaces them
//! with [`Expression::FunCall`] nodes bound to a resolved function.

use crate::access::Value;
use crate::catalog::Member;
use crate::expression::{Category, ExprType, Syntax};
use crate::function::ResolvedFunction;
use std::fmt;

/// Literal value in an expression
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
    pub category: Category,
}

impl Literal {
    pub fn new(value: Value) -> Self {
        let category = value.category();
        Self { value, category }
    }

    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    pub fn bool(val: bool) -> Self {
        Self::new(Value::Boolean(val))
    }

    pub fn numeric(val: f64) -> Self {
        Self::new(Value::Numeric(val))
    }

    pub fn integer(val: i64) -> Self {
        Self {
            value: Value::Numeric(val as f64),
            category: Category::Integer,
        }
    }

    pub fn string(val: impl Into<String>) -> Self {
        Self::new(Value::String(val.into()))
    }

    /// Bare keyword such as `TYPED`
    pub fn symbol(name: impl Into<String>) -> Self {
        Self {
            value: Value::String(name.into()),
            category: Category::Symbol,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, self.category) {
            (Value::String(s), Category::Symbol) => write!(f, "{}", s),
            (Value::String(s), _) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            (Value::DateTime(_), _) => write!(f, "CDate(\"{}\")", self.value),
            (value, _) => write!(f, "{}", value),
        }
    }
}

/// Read of the current cell's value for a measure
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureRef {
    pub name: String,
    pub category: Category,
}

/// Operator invocation as produced by the parser
#[derive(Debug, Clone)]
pub struct UnresolvedCall {
    pub name: String,
    pub syntax: Syntax,
    pub args: Vec<Expression>,
}

/// Operator invocation bound to a resolved function
#[derive(Debug, Clone)]
pub struct ResolvedCall {
    pub function: ResolvedFunction,
    pub args: Vec<Expression>,
    pub expr_type: ExprType,
}

impl ResolvedCall {
    pub fn name(&self) -> &str {
        self.function.name()
    }

    pub fn arg(&self, ordinal: usize) -> &Expression {
        &self.args[ordinal]
    }
}

/// Expression tree node
#[derive(Debug, Clone)]
pub enum Expression {
    Literal(Literal),
    /// A specific member from the catalog
    Member(Member),
    /// The context's current member of a hierarchy
    CurrentMember { hierarchy: String },
    Measure(MeasureRef),
    /// Tuple of member expressions
    Tuple(Vec<Expression>),
    Call(UnresolvedCall),
    FunCall(Box<ResolvedCall>),
}

impl Expression {
    pub fn literal(value: Value) -> Self {
        Expression::Literal(Literal::new(value))
    }

    pub fn null() -> Self {
        Expression::Literal(Literal::null())
    }

    pub fn boolean(val: bool) -> Self {
        Expression::Literal(Literal::bool(val))
    }

    pub fn numeric(val: f64) -> Self {
        Expression::Literal(Literal::numeric(val))
    }

    pub fn integer(val: i64) -> Self {
        Expression::Literal(Literal::integer(val))
    }

    pub fn string(val: impl Into<String>) -> Self {
        Expression::Literal(Literal::string(val))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Expression::Literal(Literal::symbol(name))
    }

    pub fn member(member: Member) -> Self {
        Expression::Member(member)
    }

    pub fn current_member(hierarchy: impl Into<String>) -> Self {
        Expression::CurrentMember {
            hierarchy: hierarchy.into(),
        }
    }

    /// Numeric measure read from the current cell
    pub fn measure(name: impl Into<String>) -> Self {
        Self::typed_measure(name, Category::Numeric)
    }

    pub fn typed_measure(name: impl Into<String>, category: Category) -> Self {
        Expression::Measure(MeasureRef {
            name: name.into(),
            category,
        })
    }

    pub fn tuple(members: Vec<Expression>) -> Self {
        Expression::Tuple(members)
    }

    pub fn call(name: impl Into<String>, syntax: Syntax, args: Vec<Expression>) -> Self {
        Expression::Call(UnresolvedCall {
            name: name.into(),
            syntax,
            args,
        })
    }

    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Self::call(name, Syntax::Function, args)
    }

    /// `receiver.name(args...)`
    pub fn method(name: impl Into<String>, receiver: Expression, args: Vec<Expression>) -> Self {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(receiver);
        all.extend(args);
        Self::call(name, Syntax::Method, all)
    }

    /// `member.Properties(name)`
    pub fn properties(member: Expression, name: Expression) -> Self {
        Self::method("Properties", member, vec![name])
    }

    /// `member.Properties(name, TYPED)`
    pub fn typed_properties(member: Expression, name: Expression) -> Self {
        Self::method("Properties", member, vec![name, Self::symbol("TYPED")])
    }

    /// `CASE value WHEN m THEN r ... [ELSE default] END`
    pub fn case(
        value: Expression,
        branches: Vec<(Expression, Expression)>,
        default: Option<Expression>,
    ) -> Self {
        let mut args = Vec::with_capacity(branches.len() * 2 + 2);
        args.push(value);
        for (matched, result) in branches {
            args.push(matched);
            args.push(result);
        }
        args.extend(default);
        Self::call("_CaseMatch", Syntax::Case, args)
    }

    /// Static category of this expression
    pub fn category(&self) -> Category {
        match self {
            Expression::Literal(lit) => lit.category,
            Expression::Member(_) | Expression::CurrentMember { .. } => Category::Member,
            Expression::Measure(measure) => measure.category,
            Expression::Tuple(_) => Category::Tuple,
            Expression::Call(_) => Category::Value,
            Expression::FunCall(call) => call.expr_type.category,
        }
    }

    /// Static type of this expression.
    ///
    /// An unresolved call has no type yet and reports the generic Value.
    pub fn expr_type(&self) -> ExprType {
        match self {
            Expression::Member(m) => ExprType::member(Some(m.hierarchy().to_string())),
            Expression::CurrentMember { hierarchy } => ExprType::member(Some(hierarchy.clone())),
            Expression::Tuple(members) => {
                let hierarchy = match members.as_slice() {
                    [only] => only.expr_type().hierarchy,
                    _ => None,
                };
                ExprType {
                    category: Category::Tuple,
                    hierarchy,
                }
            }
            Expression::FunCall(call) => call.expr_type.clone(),
            other => ExprType::of(other.category()),
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expression::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Check if this expression still contains unresolved calls
    pub fn is_resolved(&self) -> bool {
        match self {
            Expression::Call(_) => false,
            Expression::Tuple(members) => members.iter().all(Expression::is_resolved),
            Expression::FunCall(call) => call.args.iter().all(Expression::is_resolved),
            _ => true,
        }
    }

    /// Render the expression in query-language form
    pub fn unparse(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(lit) => write!(f, "{}", lit),
            Expression::Member(m) => write!(f, "{}", m.unique_name()),
            Expression::CurrentMember { hierarchy } => write!(f, "[{}].CurrentMember", hierarchy),
            Expression::Measure(measure) => write!(f, "[Measures].[{}]", measure.name),
            Expression::Tuple(members) => {
                write!(f, "(")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", m)?;
                }
                write!(f, ")")
            }
            Expression::Call(call) => call.syntax.unparse(f, &call.name, &call.args),
            Expression::FunCall(call) => {
                call.function
                    .syntax()
                    .unparse(f, call.function.name(), &call.args)
            }
        }
    }
}
