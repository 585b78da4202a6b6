//! Static types of argument expressions.

use crate::expression::Category;
use std::fmt;

/// Static type: a category plus, for member-like types, the hierarchy they
/// belong to when it is known
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprType {
    pub category: Category,
    pub hierarchy: Option<String>,
}

impl ExprType {
    pub fn of(category: Category) -> Self {
        Self {
            category,
            hierarchy: None,
        }
    }

    pub fn member(hierarchy: Option<String>) -> Self {
        Self {
            category: Category::Member,
            hierarchy,
        }
    }

    pub fn hierarchy(&self) -> Option<&str> {
        self.hierarchy.as_deref()
    }

    /// Derive a type of `category` from an optional source type.
    ///
    /// Scalars, Symbol and Value always yield a type. Member takes the
    /// source's hierarchy when there is one. Tuple, Set, Hierarchy, Level
    /// and Dimension need a source that is member-like. Null never yields a
    /// type.
    pub fn cast(source: Option<&ExprType>, category: Category) -> Option<ExprType> {
        use Category::*;

        let member_like = source.filter(|s| matches!(s.category, Member | Tuple | Set));
        match category {
            Numeric | Integer | String | Logical | DateTime | Symbol | Value => {
                Some(ExprType::of(category))
            }
            Member => Some(ExprType::member(
                member_like.and_then(|s| s.hierarchy.clone()),
            )),
            Tuple => member_like
                .filter(|s| s.category != Set)
                .map(|s| s.with_category(Tuple)),
            Set => member_like.map(|s| s.with_category(Set)),
            Hierarchy | Level | Dimension => source
                .filter(|s| s.category == category || s.category == Member)
                .filter(|s| s.hierarchy.is_some())
                .map(|s| s.with_category(category)),
            Null => None,
        }
    }

    fn with_category(&self, category: Category) -> ExprType {
        ExprType {
            category,
            hierarchy: self.hierarchy.clone(),
        }
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hierarchy {
            Some(h) => write!(f, "{}<{}>", self.category, h),
            None => write!(f, "{}", self.category),
        }
    }
}
