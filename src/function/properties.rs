//! `<Member>.Properties(<String> [, TYPED])`

use crate::access::Value;
use crate::calc::{BoxedCalc, Calc, EvaluationContext, ExpCompiler, MemberCalc, StringCalc};
use crate::expression::{
    Category, Expression, ExpressionError, ExpressionResult, ResolvedCall, Syntax,
};
use crate::function::signature::{OperatorDef, ReturnCategory, Strategy};
use crate::function::validator::Validator;

pub const NAME: &str = "Properties";

pub fn definition() -> OperatorDef {
    OperatorDef::new(
        NAME,
        "<Member>.Properties(<String> [,TYPED])",
        "Returns the value of a member property.",
        Syntax::Method,
        Strategy::Fixed {
            patterns: vec![
                vec![Category::Member, Category::String],
                vec![Category::Member, Category::String, Category::Symbol],
            ],
            returns: ReturnCategory::Deduced(deduce_property_category),
        },
        compile,
    )
    .with_reserved_words(&["TYPED"])
}

/// Category of the named property, when the name is a literal and the
/// member's hierarchy is known; Value otherwise
fn deduce_property_category(args: &[Expression], validator: &dyn Validator) -> Category {
    let name = match args[1].as_literal() {
        Some(lit) if lit.category == Category::String => lit.value.as_str(),
        _ => None,
    };
    let Some(name) = name else {
        return Category::Value;
    };
    let Some(hierarchy) = args[0].expr_type().hierarchy else {
        log::debug!("cannot deduce type of property '{}': unknown hierarchy", name);
        return Category::Value;
    };

    let metadata = validator.metadata();
    let deepest = metadata
        .hierarchy(&hierarchy)
        .and_then(|h| h.deepest_level().map(|level| level.depth));
    let property = deepest.and_then(|depth| {
        metadata.lookup_property(&hierarchy, depth, name, validator.config().case_sensitive)
    });
    match property {
        Some(property) => property.kind.category(),
        None => {
            log::debug!(
                "property '{}' not declared on hierarchy '{}', deducing Value",
                name,
                hierarchy
            );
            Category::Value
        }
    }
}

fn compile(call: &ResolvedCall, compiler: &ExpCompiler) -> ExpressionResult<BoxedCalc> {
    assert!(
        matches!(call.args.len(), 2 | 3),
        "{} takes 2 or 3 arguments",
        NAME
    );
    // The TYPED flag only selects the pattern; it is not evaluated
    let member = compiler.compile_member_arg(call, 0)?;
    let name = compiler.compile_string_arg(call, 1)?;
    Ok(Box::new(PropertiesCalc {
        member,
        name,
        category: call.expr_type.category,
    }))
}

#[derive(Debug)]
pub struct PropertiesCalc {
    member: MemberCalc,
    name: StringCalc,
    category: Category,
}

impl Calc for PropertiesCalc {
    fn evaluate(&self, context: &dyn EvaluationContext) -> ExpressionResult<Value> {
        let member = self.member.evaluate_member(context)?;
        let name = self.name.evaluate_string(context)?;
        let (Some(member), Some(name)) = (member, name) else {
            return Ok(Value::Null);
        };

        let config = context.config();
        let value = member.property_value(&name, config.case_sensitive);
        if value.is_null()
            && config.strict_properties
            && !context
                .metadata()
                .is_valid_property(&member, &name, config.case_sensitive)
        {
            return Err(ExpressionError::InvalidProperty {
                property: name,
                member: member.unique_name().to_string(),
            });
        }
        Ok(value)
    }

    fn category(&self) -> Category {
        self.category
    }

    fn name(&self) -> String {
        NAME.to_string()
    }

    fn children(&self) -> Vec<&dyn Calc> {
        vec![self.member.inner(), self.name.inner()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{CellContext, CellStore};
    use crate::catalog::{sample_catalog, Catalog};
    use crate::config::EngineConfig;
    use crate::expression::ExprType;
    use crate::function::{QueryValidator, ResolvedFunction};
    use std::sync::Arc;

    const JOHN: &str = "[Employee].[Sales].[John]";

    fn resolve(catalog: &Catalog, config: EngineConfig, expr: Expression) -> Expression {
        QueryValidator::new(catalog, config).validate(expr).unwrap()
    }

    fn john_property(catalog: &Catalog, name: Expression) -> Expression {
        let john = catalog.member(JOHN).unwrap();
        Expression::properties(Expression::member(john), name)
    }

    fn evaluate(catalog: Catalog, config: EngineConfig, name: &str) -> ExpressionResult<Value> {
        let expr = resolve(&catalog, config, john_property(&catalog, Expression::string(name)));
        let calc = ExpCompiler::new().compile(&expr)?;
        let context = CellContext::new(Arc::new(catalog), Arc::new(CellStore::new()), config);
        calc.evaluate(&context)
    }

    #[test]
    fn test_deduces_declared_property_category() {
        let catalog = sample_catalog();
        let config = EngineConfig::new();
        let category = |name: &str| {
            resolve(&catalog, config, john_property(&catalog, Expression::string(name))).category()
        };
        assert_eq!(category("Salary"), Category::Numeric);
        assert_eq!(category("Title"), Category::String);
        assert_eq!(category("Manager"), Category::Logical);
        assert_eq!(category("Hired"), Category::DateTime);
        // Declared on an ancestor level
        assert_eq!(category("Budget"), Category::Numeric);
        assert_eq!(category("Caption"), Category::String);
        assert_eq!(category("LEVEL_NUMBER"), Category::Numeric);
        assert_eq!(category("Shoe size"), Category::Value);
    }

    #[test]
    fn test_non_literal_name_deduces_value() {
        let catalog = sample_catalog();
        let name = Expression::properties(
            Expression::current_member("Employee"),
            Expression::string("Title"),
        );
        let expr = resolve(&catalog, EngineConfig::new(), john_property(&catalog, name));
        assert_eq!(expr.category(), Category::Value);
    }

    #[test]
    fn test_deduction_honours_case_sensitivity() {
        let catalog = sample_catalog();
        let strict_case = EngineConfig::new().with_case_sensitive(true);
        let salary = john_property(&catalog, Expression::string("salary"));
        let expr = resolve(&catalog, strict_case, salary.clone());
        assert_eq!(expr.category(), Category::Value);
        let expr = resolve(&catalog, EngineConfig::new(), salary);
        assert_eq!(expr.category(), Category::Numeric);
    }

    #[test]
    fn test_typed_form_needs_reserved_word() {
        let catalog = sample_catalog();
        let john = catalog.member(JOHN).unwrap();
        let validator = QueryValidator::new(&catalog, EngineConfig::new());

        let typed = validator
            .validate(Expression::typed_properties(
                Expression::member(john.clone()),
                Expression::string("Salary"),
            ))
            .unwrap();
        assert_eq!(typed.category(), Category::Numeric);

        let lower = Expression::method(
            NAME,
            Expression::member(john.clone()),
            vec![Expression::string("Salary"), Expression::symbol("typed")],
        );
        assert!(validator.validate(lower).is_ok());

        let other = Expression::method(
            NAME,
            Expression::member(john.clone()),
            vec![Expression::string("Salary"), Expression::symbol("UNTYPED")],
        );
        assert!(validator.validate(other).is_err());

        let string_flag = Expression::method(
            NAME,
            Expression::member(john),
            vec![Expression::string("Salary"), Expression::string("TYPED")],
        );
        assert!(validator.validate(string_flag).is_err());
    }

    #[test]
    fn test_evaluates_stored_and_standard_properties() {
        let config = EngineConfig::new();
        assert_eq!(evaluate(sample_catalog(), config, "Salary").unwrap(), Value::from(52000));
        assert_eq!(
            evaluate(sample_catalog(), config, "title").unwrap(),
            Value::from("Account Manager")
        );
        assert_eq!(
            evaluate(sample_catalog(), config, "Caption").unwrap(),
            Value::from("John Smith")
        );
        assert_eq!(
            evaluate(sample_catalog(), config, "PARENT_UNIQUE_NAME").unwrap(),
            Value::from("[Employee].[Sales]")
        );
        // Declared but unset
        assert_eq!(evaluate(sample_catalog(), config, "Hired").unwrap(), Value::Null);
    }

    #[test]
    fn test_strict_mode_rejects_invalid_property() {
        let permissive = EngineConfig::new();
        let strict = EngineConfig::new().with_strict_properties(true);

        assert_eq!(evaluate(sample_catalog(), permissive, "Bonus").unwrap(), Value::Null);
        let err = evaluate(sample_catalog(), strict, "Bonus").unwrap_err();
        assert_eq!(
            err,
            ExpressionError::InvalidProperty {
                property: "Bonus".to_string(),
                member: JOHN.to_string(),
            }
        );

        // Valid but unset stays NULL in strict mode
        assert_eq!(evaluate(sample_catalog(), strict, "Hired").unwrap(), Value::Null);
    }

    #[test]
    fn test_case_sensitive_miss_behaves_like_undeclared() {
        let strict = EngineConfig::new().with_strict_properties(true);
        let sensitive = strict.with_case_sensitive(true);

        assert_eq!(evaluate(sample_catalog(), strict, "SALARY").unwrap(), Value::from(52000));
        assert!(matches!(
            evaluate(sample_catalog(), sensitive, "SALARY"),
            Err(ExpressionError::InvalidProperty { .. })
        ));
        assert_eq!(
            evaluate(sample_catalog(), sensitive.with_strict_properties(false), "SALARY").unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_null_member_yields_null() {
        let catalog = sample_catalog();
        let expr = resolve(
            &catalog,
            EngineConfig::new(),
            Expression::properties(
                Expression::current_member("Employee"),
                Expression::string("Salary"),
            ),
        );
        let calc = ExpCompiler::new().compile(&expr).unwrap();
        let context = CellContext::new(
            Arc::new(catalog),
            Arc::new(CellStore::new()),
            EngineConfig::new().with_strict_properties(true),
        );
        assert_eq!(calc.evaluate(&context).unwrap(), Value::Null);
    }

    #[test]
    #[should_panic(expected = "takes 2 or 3 arguments")]
    fn test_compile_rejects_wrong_arity() {
        let catalog = sample_catalog();
        let john = catalog.member(JOHN).unwrap();
        let function = ResolvedFunction::new(
            Arc::new(definition()),
            Category::Value,
            vec![Category::Member],
            vec![],
        );
        let call = ResolvedCall {
            function,
            args: vec![Expression::member(john)],
            expr_type: ExprType::of(Category::Value),
        };
        let _ = ExpCompiler::new().compile(&Expression::FunCall(Box::new(call)));
    }
}
