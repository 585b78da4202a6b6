//! Implicit conversions between categories.
//!
//! [`find_conversion`] is the single source of truth for whether an
//! expression of one category may be bound to a parameter of another. It
//! never fails; an absent conversion is just `None`.

use crate::expression::Category;

/// The kind of conversion being performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    /// No conversion needed (exact match)
    Identity,
    /// Integer to Numeric
    Widening,
    /// NULL literal bound to a typed slot
    NullToAny,
    /// Scalar bound to a generic Value slot
    ScalarToValue,
    /// Generic Value narrowed to a concrete scalar, checked at runtime
    Unwrap,
    /// Non-zero numerics are true
    NumericToLogical,
    /// Member treated as a one-member tuple
    MemberToTuple,
    /// Member replaced by the cell value at that member
    MemberValue,
    /// Tuple replaced by the cell value at that tuple
    TupleValue,
}

impl ConversionKind {
    /// Check if the runtime value changes shape, so the compiler must insert
    /// a conversion node
    pub fn changes_shape(self) -> bool {
        matches!(
            self,
            ConversionKind::Unwrap
                | ConversionKind::NumericToLogical
                | ConversionKind::MemberToTuple
                | ConversionKind::MemberValue
                | ConversionKind::TupleValue
        )
    }
}

/// A conversion with its cost for overload ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub kind: ConversionKind,
    /// Lower is better
    pub cost: u32,
}

impl Conversion {
    pub const COST_EXACT: u32 = 0;
    pub const COST_WIDENING: u32 = 1;
    pub const COST_UNWRAP: u32 = 2;
    pub const COST_EVALUATE: u32 = 3;

    fn new(kind: ConversionKind, cost: u32) -> Self {
        Self { kind, cost }
    }

    pub fn is_exact(&self) -> bool {
        self.kind == ConversionKind::Identity
    }
}

/// Find the implicit conversion from one category to another
pub fn find_conversion(from: Category, to: Category) -> Option<Conversion> {
    use Category::*;

    if from == to {
        return Some(Conversion::new(ConversionKind::Identity, Conversion::COST_EXACT));
    }

    let conversion = match (from, to) {
        (Integer, Numeric) => (ConversionKind::Widening, Conversion::COST_WIDENING),
        (Null, Symbol) => return None,
        (Null, _) => (ConversionKind::NullToAny, Conversion::COST_WIDENING),
        (f, Value) if f.is_scalar() => (ConversionKind::ScalarToValue, Conversion::COST_WIDENING),
        (Value, t) if t.is_scalar() => (ConversionKind::Unwrap, Conversion::COST_UNWRAP),
        (Numeric | Integer, Logical) => (ConversionKind::NumericToLogical, Conversion::COST_UNWRAP),
        (Member, Tuple) => (ConversionKind::MemberToTuple, Conversion::COST_UNWRAP),
        (Member, t) if t.is_scalar() || t == Value => {
            (ConversionKind::MemberValue, Conversion::COST_EVALUATE)
        }
        (Tuple, t) if t.is_scalar() || t == Value => {
            (ConversionKind::TupleValue, Conversion::COST_EVALUATE)
        }
        _ => return None,
    };

    Some(Conversion::new(conversion.0, conversion.1))
}

/// A conversion the compiler must apply to one argument of a resolved call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequirement {
    /// Argument position
    pub ordinal: usize,
    pub from: Category,
    pub to: Category,
    pub kind: ConversionKind,
    pub cost: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use Category::*;

    fn kind(from: Category, to: Category) -> Option<ConversionKind> {
        find_conversion(from, to).map(|c| c.kind)
    }

    #[test]
    fn test_identity() {
        for category in [Numeric, String, Member, Set, Symbol, Value, Null] {
            assert_eq!(kind(category, category), Some(ConversionKind::Identity));
        }
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(kind(Integer, Numeric), Some(ConversionKind::Widening));
        assert_eq!(kind(Numeric, Integer), None);
        assert_eq!(kind(String, Value), Some(ConversionKind::ScalarToValue));
        assert_eq!(kind(Value, DateTime), Some(ConversionKind::Unwrap));
        assert_eq!(kind(Numeric, Logical), Some(ConversionKind::NumericToLogical));
        assert_eq!(kind(Logical, Numeric), None);
        assert_eq!(kind(String, Numeric), None);
        assert_eq!(kind(Numeric, String), None);
    }

    #[test]
    fn test_null_converts_to_anything_but_symbol() {
        assert_eq!(kind(Null, String), Some(ConversionKind::NullToAny));
        assert_eq!(kind(Null, Member), Some(ConversionKind::NullToAny));
        assert_eq!(kind(Null, Symbol), None);
    }

    #[test]
    fn test_member_and_tuple_conversions() {
        assert_eq!(kind(Member, Numeric), Some(ConversionKind::MemberValue));
        assert_eq!(kind(Member, Value), Some(ConversionKind::MemberValue));
        assert_eq!(kind(Member, Tuple), Some(ConversionKind::MemberToTuple));
        assert_eq!(kind(Tuple, String), Some(ConversionKind::TupleValue));
        assert_eq!(kind(Tuple, Member), None);
        assert_eq!(kind(Numeric, Member), None);
        assert_eq!(kind(Member, Set), None);
        assert_eq!(kind(String, Symbol), None);
    }

    #[test]
    fn test_costs_rank_exact_first() {
        let exact = find_conversion(Numeric, Numeric).unwrap();
        let widen = find_conversion(Integer, Numeric).unwrap();
        let eval = find_conversion(Member, Numeric).unwrap();
        assert!(exact.is_exact());
        assert!(exact.cost < widen.cost && widen.cost < eval.cost);
    }

    #[test]
    fn test_shape_changes() {
        assert!(!ConversionKind::Widening.changes_shape());
        assert!(!ConversionKind::NullToAny.changes_shape());
        assert!(ConversionKind::MemberValue.changes_shape());
        assert!(ConversionKind::Unwrap.changes_shape());
    }
}
