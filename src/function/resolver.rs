//! Resolution strategies.
//!
//! Each strategy is a pure function of the argument list and the validator.
//! A failed match returns `None` so the caller can try the next candidate.

use crate::expression::{Category, Expression};
use crate::function::signature::{OperatorDef, ResolvedFunction, ReturnCategory};
use crate::function::validator::Validator;
use std::sync::Arc;

/// Match arguments positionally against the patterns of their length
pub fn resolve_fixed(
    operator: &Arc<OperatorDef>,
    patterns: &[Vec<Category>],
    returns: ReturnCategory,
    args: &[Expression],
    validator: &dyn Validator,
) -> Option<ResolvedFunction> {
    for pattern in patterns.iter().filter(|p| p.len() == args.len()) {
        let mut conversions = Vec::new();
        let matched = args.iter().zip(pattern).enumerate().all(|(ordinal, (arg, &category))| {
            validator.can_convert(ordinal, arg, category, &mut conversions)
                && (category != Category::Symbol || is_reserved_symbol(operator, arg))
        });
        if !matched {
            continue;
        }

        let return_category = match returns {
            ReturnCategory::Declared(category) => category,
            ReturnCategory::Deduced(deduce) => deduce(args, validator),
        };
        log::trace!(
            "{} matched pattern {:?}, returns {}",
            operator.name,
            pattern,
            return_category
        );
        return Some(ResolvedFunction::new(
            operator.clone(),
            return_category,
            pattern.clone(),
            conversions,
        ));
    }

    log::trace!(
        "{} rejected {} argument(s) by every pattern",
        operator.name,
        args.len()
    );
    None
}

fn is_reserved_symbol(operator: &OperatorDef, arg: &Expression) -> bool {
    match arg.as_literal() {
        Some(lit) if lit.category == Category::Symbol => {
            lit.value.as_str().is_some_and(|word| operator.is_reserved_word(word))
        }
        _ => false,
    }
}

/// Match `value, (match, result)+, [default]`.
///
/// The value category comes from the first argument; the result category is
/// the first result argument that is not a NULL placeholder. An Integer
/// value or result category widens to Numeric when another argument on the
/// same side is Numeric. Every position is checked before deciding, and a
/// single mismatch rejects the call.
pub fn resolve_pairwise(
    operator: &Arc<OperatorDef>,
    args: &[Expression],
    validator: &dyn Validator,
) -> Option<ResolvedFunction> {
    if args.len() < 3 {
        return None;
    }

    let has_default = args.len() % 2 == 0;
    let is_value_side = |ordinal: usize| {
        let is_default = has_default && ordinal == args.len() - 1;
        !is_default && (ordinal == 0 || ordinal % 2 == 1)
    };

    let value_category = widen_integer(args[0].category(), args, is_value_side);
    let Some(first_result) = args
        .iter()
        .skip(2)
        .step_by(2)
        .map(Expression::category)
        .find(|c| *c != Category::Null)
    else {
        log::trace!("{}: every result argument is NULL", operator.name);
        return None;
    };
    let return_category = widen_integer(first_result, args, |i| !is_value_side(i));

    let mut conversions = Vec::new();
    let mut params = Vec::with_capacity(args.len());
    let mut mismatches = 0;
    for (ordinal, arg) in args.iter().enumerate() {
        let target = if is_value_side(ordinal) {
            value_category
        } else {
            return_category
        };
        if !validator.can_convert(ordinal, arg, target, &mut conversions) {
            mismatches += 1;
        }
        params.push(target);
    }

    if mismatches != 0 {
        log::trace!(
            "{}: {} argument(s) do not convert (value {}, result {})",
            operator.name,
            mismatches,
            value_category,
            return_category
        );
        return None;
    }

    Some(ResolvedFunction::new(
        operator.clone(),
        return_category,
        params,
        conversions,
    ))
}

fn widen_integer(
    category: Category,
    args: &[Expression],
    same_side: impl Fn(usize) -> bool,
) -> Category {
    let any_numeric = args
        .iter()
        .enumerate()
        .any(|(ordinal, arg)| same_side(ordinal) && arg.category() == Category::Numeric);
    if category == Category::Integer && any_numeric {
        Category::Numeric
    } else {
        category
    }
}
