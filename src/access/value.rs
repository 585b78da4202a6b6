use crate::catalog::Member;
use crate::expression::Category;
use chrono::NaiveDateTime;
use std::fmt;

/// Display format used for DateTime values
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Values produced while evaluating a calculator tree
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Numeric(f64),
    String(String),
    DateTime(NaiveDateTime),
    Member(Member),
    Tuple(Vec<Member>),
}

impl Value {
    /// Get the category of this value
    pub fn category(&self) -> Category {
        match self {
            Value::Null => Category::Null,
            Value::Boolean(_) => Category::Logical,
            Value::Numeric(_) => Category::Numeric,
            Value::String(_) => Category::String,
            Value::DateTime(_) => Category::DateTime,
            Value::Member(_) => Category::Member,
            Value::Tuple(_) => Category::Tuple,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value can stand in a slot of the given category
    pub fn is_compatible_with(&self, category: Category) -> bool {
        match (self, category) {
            (Value::Null, _) => true, // NULL is compatible with any category
            (_, Category::Value) => !matches!(self, Value::Member(_) | Value::Tuple(_)),
            (Value::Boolean(_), Category::Logical) => true,
            (Value::Numeric(_), Category::Numeric) => true,
            (Value::Numeric(n), Category::Integer) => n.fract() == 0.0,
            (Value::String(_), Category::String | Category::Symbol) => true,
            (Value::DateTime(_), Category::DateTime) => true,
            (Value::Member(_), Category::Member) => true,
            (Value::Tuple(_), Category::Tuple) => true,
            _ => false,
        }
    }

    /// Equality used when matching a value against CASE branches.
    ///
    /// NULL equals only NULL; mismatched shapes are simply unequal.
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Numeric(a), Value::Numeric(b)) => a == b,
            (a, b) => a == b,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Numeric(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Numeric(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::Numeric(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Numeric(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::Member(m) => write!(f, "{}", m.unique_name()),
            Value::Tuple(members) => {
                write!(f, "(")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", m.unique_name())?;
                }
                write!(f, ")")
            }
        }
    }
}
