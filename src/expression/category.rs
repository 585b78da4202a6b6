//! The closed vocabulary of value categories.

use std::fmt;

/// Static category of an expression or value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Numeric,
    /// Integral numeric; widens to `Numeric`
    Integer,
    String,
    Logical,
    DateTime,
    Member,
    Tuple,
    Set,
    Hierarchy,
    Level,
    Dimension,
    /// Bare keyword argument such as `TYPED`
    Symbol,
    /// Generic scalar whose concrete category is only known at runtime
    Value,
    /// Category of the NULL literal; placeholder carrying no type information
    Null,
}

impl Category {
    /// Check if values of this category are plain scalars
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Category::Numeric
                | Category::Integer
                | Category::String
                | Category::Logical
                | Category::DateTime
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Numeric => "Numeric",
            Category::Integer => "Integer",
            Category::String => "String",
            Category::Logical => "Logical",
            Category::DateTime => "DateTime",
            Category::Member => "Member",
            Category::Tuple => "Tuple",
            Category::Set => "Set",
            Category::Hierarchy => "Hierarchy",
            Category::Level => "Level",
            Category::Dimension => "Dimension",
            Category::Symbol => "Symbol",
            Category::Value => "Value",
            Category::Null => "Null",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
