//! `CASE value WHEN match THEN result ... [ELSE default] END`

use crate::access::Value;
use crate::calc::{BoxedCalc, Calc, ConstantCalc, EvaluationContext, ExpCompiler};
use crate::expression::{Category, ExpressionResult, ResolvedCall, Syntax};
use crate::function::signature::{OperatorDef, Strategy, TypeSource};

pub const NAME: &str = "_CaseMatch";

pub fn definition() -> OperatorDef {
    OperatorDef::new(
        NAME,
        "Case <Expression> When <Expression> Then <Expression> [...] [Else <Expression>] End",
        "Evaluates various expressions, and returns the corresponding expression for the first which matches a particular value.",
        Syntax::Case,
        Strategy::Pairwise,
        compile,
    )
    .with_type_source(TypeSource::ThirdArg)
}

fn compile(call: &ResolvedCall, compiler: &ExpCompiler) -> ExpressionResult<BoxedCalc> {
    let arg_count = call.args.len();
    assert!(arg_count >= 3, "{} needs at least 3 arguments", NAME);

    let value = compiler.compile_scalar_arg(call, 0)?;
    let branch_count = (arg_count - 1) / 2;
    let mut matches = Vec::with_capacity(branch_count);
    let mut results = Vec::with_capacity(branch_count);
    for i in 0..branch_count {
        matches.push(compiler.compile_scalar_arg(call, 2 * i + 1)?);
        results.push(compiler.compile_arg(call, 2 * i + 2)?);
    }
    let default = if arg_count % 2 == 0 {
        compiler.compile_arg(call, arg_count - 1)?
    } else {
        Box::new(ConstantCalc::null(call.expr_type.category))
    };

    Ok(Box::new(CaseMatchCalc {
        value,
        matches,
        results,
        default,
        category: call.expr_type.category,
    }))
}

/// Returns the result of the first branch whose match equals the value
#[derive(Debug)]
pub struct CaseMatchCalc {
    value: BoxedCalc,
    matches: Vec<BoxedCalc>,
    results: Vec<BoxedCalc>,
    default: BoxedCalc,
    category: Category,
}

impl Calc for CaseMatchCalc {
    fn evaluate(&self, context: &dyn EvaluationContext) -> ExpressionResult<Value> {
        let value = self.value.evaluate(context)?;
        for (matched, result) in self.matches.iter().zip(&self.results) {
            if matched.evaluate(context)?.matches(&value) {
                return result.evaluate(context);
            }
        }
        self.default.evaluate(context)
    }

    fn category(&self) -> Category {
        self.category
    }

    fn name(&self) -> String {
        "CaseMatch".to_string()
    }

    fn children(&self) -> Vec<&dyn Calc> {
        let mut children: Vec<&dyn Calc> = vec![self.value.as_ref()];
        for (matched, result) in self.matches.iter().zip(&self.results) {
            children.push(matched.as_ref());
            children.push(result.as_ref());
        }
        children.push(self.default.as_ref());
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{CellContext, CellStore};
    use crate::catalog::sample_catalog;
    use crate::config::EngineConfig;
    use crate::expression::{ConversionKind, DeductionError, ExprType, Expression, ExpressionError};
    use crate::function::{QueryValidator, ResolvedFunction};
    use std::sync::Arc;

    fn case(value: Expression, branches: Vec<(i64, &str)>, default: Option<&str>) -> Expression {
        Expression::case(
            value,
            branches
                .into_iter()
                .map(|(m, r)| (Expression::integer(m), Expression::string(r)))
                .collect(),
            default.map(Expression::string),
        )
    }

    fn evaluate_at(expr: &Expression, x: f64) -> Value {
        let catalog = sample_catalog();
        let resolved = QueryValidator::new(&catalog, EngineConfig::new())
            .validate(expr.clone())
            .unwrap();
        let calc = ExpCompiler::new().compile(&resolved).unwrap();

        let store = Arc::new(CellStore::new());
        store.set(&[], "X", x);
        let context = CellContext::new(Arc::new(catalog), store, EngineConfig::new());
        calc.evaluate(&context).unwrap()
    }

    #[test]
    fn test_resolve_pairwise() {
        let catalog = sample_catalog();
        let validator = QueryValidator::new(&catalog, EngineConfig::new());
        let expr = validator
            .validate(case(Expression::measure("X"), vec![(1, "a"), (2, "b")], None))
            .unwrap();

        let Expression::FunCall(call) = &expr else {
            panic!("expected a resolved call");
        };
        assert_eq!(call.function.return_category(), Category::String);
        assert_eq!(
            call.function.param_categories(),
            &[
                Category::Numeric,
                Category::Numeric,
                Category::String,
                Category::Numeric,
                Category::String
            ]
        );
        let ordinals: Vec<usize> = call.function.conversions().iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, vec![1, 3]);
        assert!(call
            .function
            .conversions()
            .iter()
            .all(|c| c.kind == ConversionKind::Widening));
        assert_eq!(call.expr_type, ExprType::of(Category::String));
    }

    #[test]
    fn test_too_few_arguments() {
        let catalog = sample_catalog();
        let validator = QueryValidator::new(&catalog, EngineConfig::new());
        let expr = Expression::call(
            NAME,
            Syntax::Case,
            vec![Expression::measure("X"), Expression::integer(1)],
        );
        assert!(matches!(
            validator.validate(expr),
            Err(ExpressionError::NoMatchingFunction { .. })
        ));
    }

    #[test]
    fn test_skips_null_results_when_deducing() {
        let catalog = sample_catalog();
        let validator = QueryValidator::new(&catalog, EngineConfig::new());
        let expr = Expression::case(
            Expression::measure("X"),
            vec![
                (Expression::integer(1), Expression::null()),
                (Expression::integer(2), Expression::string("b")),
            ],
            None,
        );
        let resolved = validator.validate(expr).unwrap();
        assert_eq!(resolved.category(), Category::String);

        let all_null = Expression::case(
            Expression::measure("X"),
            vec![(Expression::integer(1), Expression::null())],
            None,
        );
        assert!(matches!(
            validator.validate(all_null),
            Err(ExpressionError::NoMatchingFunction { .. })
        ));
    }

    #[test]
    fn test_single_mismatch_rejects_call() {
        let catalog = sample_catalog();
        let validator = QueryValidator::new(&catalog, EngineConfig::new());

        // String match against a numeric value
        let expr = Expression::case(
            Expression::measure("X"),
            vec![
                (Expression::integer(1), Expression::string("a")),
                (Expression::string("two"), Expression::string("b")),
            ],
            None,
        );
        assert!(validator.validate(expr).is_err());

        // Logical default against string results
        let expr = Expression::case(
            Expression::measure("X"),
            vec![(Expression::integer(1), Expression::string("a"))],
            Some(Expression::boolean(true)),
        );
        assert!(validator.validate(expr).is_err());
    }

    #[test]
    fn test_third_argument_drives_result_type() {
        let catalog = sample_catalog();
        let john = catalog.member("[Employee].[Sales].[John]").unwrap();
        let validator = QueryValidator::new(&catalog, EngineConfig::new());

        // The resolver settles on Tuple from the second result, but the
        // static type is cast from the NULL third argument and fails
        let expr = Expression::case(
            Expression::measure("X"),
            vec![
                (Expression::integer(1), Expression::null()),
                (
                    Expression::integer(2),
                    Expression::tuple(vec![Expression::member(john)]),
                ),
            ],
            None,
        );
        let err = validator.validate(expr).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::Deduction(DeductionError {
                function: NAME.to_string(),
                arg_count: 5,
                params: " | [Measures].[X] | 1 | NULL | 2 | ([Employee].[Sales].[John])".to_string(),
            })
        );
    }

    #[test]
    fn test_first_match_wins() {
        let expr = case(
            Expression::measure("X"),
            vec![(1, "a"), (2, "b"), (2, "c")],
            Some("z"),
        );
        assert_eq!(evaluate_at(&expr, 1.0), Value::from("a"));
        assert_eq!(evaluate_at(&expr, 2.0), Value::from("b"));
        assert_eq!(evaluate_at(&expr, 9.0), Value::from("z"));
    }

    #[test]
    fn test_no_match_without_else_is_null() {
        let expr = case(Expression::measure("X"), vec![(1, "a"), (2, "b")], None);
        assert_eq!(evaluate_at(&expr, 2.0), Value::from("b"));
        assert_eq!(evaluate_at(&expr, 3.0), Value::Null);
    }

    #[test]
    fn test_empty_cell_matches_only_null() {
        let catalog = sample_catalog();
        let expr = QueryValidator::new(&catalog, EngineConfig::new())
            .validate(Expression::case(
                Expression::measure("Missing"),
                vec![
                    (Expression::integer(0), Expression::string("zero")),
                    (Expression::null(), Expression::string("empty")),
                ],
                None,
            ))
            .unwrap();
        let calc = ExpCompiler::new().compile(&expr).unwrap();
        let context = CellContext::new(
            Arc::new(catalog),
            Arc::new(CellStore::new()),
            EngineConfig::new(),
        );
        assert_eq!(calc.evaluate(&context).unwrap(), Value::from("empty"));
    }

    #[test]
    fn test_integer_result_widens_to_numeric() {
        let catalog = sample_catalog();
        let validator = QueryValidator::new(&catalog, EngineConfig::new());
        let expr = Expression::case(
            Expression::measure("X"),
            vec![(Expression::integer(1), Expression::integer(1))],
            Some(Expression::numeric(2.5)),
        );
        let resolved = validator.validate(expr.clone()).unwrap();
        let Expression::FunCall(call) = &resolved else {
            panic!("expected a resolved call");
        };
        assert_eq!(call.function.return_category(), Category::Numeric);
        assert_eq!(call.expr_type, ExprType::of(Category::Numeric));

        assert_eq!(evaluate_at(&expr, 1.0), Value::Numeric(1.0));
        assert_eq!(evaluate_at(&expr, 5.0), Value::Numeric(2.5));
    }

    #[test]
    fn test_integer_value_widens_to_numeric() {
        let catalog = sample_catalog();
        let validator = QueryValidator::new(&catalog, EngineConfig::new());
        let expr = Expression::case(
            Expression::integer(2),
            vec![(Expression::measure("X"), Expression::string("a"))],
            None,
        );
        let resolved = validator.validate(expr.clone()).unwrap();
        let Expression::FunCall(call) = &resolved else {
            panic!("expected a resolved call");
        };
        assert_eq!(
            call.function.param_categories(),
            &[Category::Numeric, Category::Numeric, Category::String]
        );
        assert_eq!(call.expr_type, ExprType::of(Category::String));

        assert_eq!(evaluate_at(&expr, 2.0), Value::from("a"));
        assert_eq!(evaluate_at(&expr, 3.0), Value::Null);
    }

    #[test]
    #[should_panic(expected = "needs at least 3 arguments")]
    fn test_compile_rejects_short_call() {
        let function = ResolvedFunction::new(
            Arc::new(definition()),
            Category::String,
            vec![Category::Numeric, Category::Numeric],
            vec![],
        );
        let call = ResolvedCall {
            function,
            args: vec![Expression::numeric(1.0), Expression::numeric(1.0)],
            expr_type: ExprType::of(Category::String),
        };
        let _ = ExpCompiler::new().compile(&Expression::FunCall(Box::new(call)));
    }
}
