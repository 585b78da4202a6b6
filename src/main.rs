//! cubecalc - resolve, compile and evaluate member property and CASE
//! expressions from the command line

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use cubecalc::access::Value;
use cubecalc::calc::{explain, CellContext, CellStore, EvaluationContext, ExpCompiler};
use cubecalc::catalog::{Catalog, Metadata};
use cubecalc::config::EngineConfig;
use cubecalc::expression::Expression;
use cubecalc::function::{FunctionRegistry, QueryValidator};
use std::path::PathBuf;
use std::sync::Arc;

/// cubecalc - OLAP function resolution and evaluation
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered operators
    Functions,

    /// Evaluate <member>.Properties(<name>)
    Property {
        /// Catalog definition file (JSON)
        #[arg(short = 'C', long)]
        catalog: PathBuf,

        /// Unique name of the member, e.g. "[Employee].[John]"
        #[arg(short, long)]
        member: String,

        /// Property name
        #[arg(short, long)]
        name: String,

        /// Use the TYPED form
        #[arg(long)]
        typed: bool,

        #[command(flatten)]
        options: EngineOptions,
    },

    /// Evaluate CASE <value> WHEN <match> THEN <result> ... [ELSE <default>] END
    Case {
        /// Value to match
        #[arg(long)]
        value: String,

        /// Branch as MATCH=RESULT; may be repeated
        #[arg(long = "when", value_name = "MATCH=RESULT", required = true)]
        branches: Vec<String>,

        /// Default result
        #[arg(long = "else")]
        default: Option<String>,

        #[command(flatten)]
        options: EngineOptions,
    },
}

#[derive(clap::Args, Debug)]
struct EngineOptions {
    /// Engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Match property names case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Fail on properties that are not valid for the member's level
    #[arg(long)]
    strict: bool,

    /// Print the compiled calculator tree
    #[arg(long)]
    explain: bool,
}

impl EngineOptions {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        if self.case_sensitive {
            config = config.with_case_sensitive(true);
        }
        if self.strict {
            config = config.with_strict_properties(true);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::Functions => {
            for operator in FunctionRegistry::builtin().operators() {
                println!("{}", operator.signature);
                println!("    {}", operator.description);
            }
            Ok(())
        }
        Command::Property {
            catalog,
            member,
            name,
            typed,
            options,
        } => {
            let config = options.engine_config()?;
            let catalog = Arc::new(Catalog::load(&catalog)?);
            log::info!("loaded catalog with hierarchies {:?}", catalog.list_hierarchies());

            let subject = catalog
                .member(&member)
                .ok_or_else(|| anyhow!("Member '{}' not found", member))?;
            let expr = if typed {
                Expression::typed_properties(
                    Expression::member(subject.clone()),
                    Expression::string(name),
                )
            } else {
                Expression::properties(
                    Expression::member(subject.clone()),
                    Expression::string(name),
                )
            };

            let context = CellContext::new(catalog.clone(), Arc::new(CellStore::new()), config)
                .at(subject);
            run(expr, catalog.as_ref(), &context, options.explain)
        }
        Command::Case {
            value,
            branches,
            default,
            options,
        } => {
            let config = options.engine_config()?;
            let branches = branches
                .iter()
                .map(|branch| {
                    let (matched, result) = branch
                        .split_once('=')
                        .ok_or_else(|| anyhow!("Branch '{}' is not MATCH=RESULT", branch))?;
                    Ok((parse_literal(matched), parse_literal(result)))
                })
                .collect::<Result<Vec<_>>>()?;
            let expr = Expression::case(
                parse_literal(&value),
                branches,
                default.as_deref().map(parse_literal),
            );

            let catalog = Arc::new(Catalog::new());
            let context = CellContext::new(catalog.clone(), Arc::new(CellStore::new()), config);
            run(expr, catalog.as_ref(), &context, options.explain)
        }
    }
}

fn run(
    expr: Expression,
    metadata: &dyn Metadata,
    context: &dyn EvaluationContext,
    show_plan: bool,
) -> Result<()> {
    let validator = QueryValidator::new(metadata, *context.config());
    let resolved = validator
        .validate(expr)
        .context("Failed to resolve expression")?;
    println!("expression: {}", resolved);
    println!("type: {}", resolved.expr_type());

    let calc = ExpCompiler::new().compile(&resolved)?;
    if show_plan {
        print!("{}", explain(calc.as_ref()));
    }

    match calc.evaluate(context) {
        Ok(value) => {
            println!("value: {}", value);
            Ok(())
        }
        Err(e) if e.is_evaluation() => bail!("Evaluation failed: {}", e),
        Err(e) => Err(e.into()),
    }
}

/// Parse a command-line literal: NULL, TRUE/FALSE, numbers, otherwise a
/// string (surrounding double quotes are stripped)
fn parse_literal(text: &str) -> Expression {
    let text = text.trim();
    if text.eq_ignore_ascii_case("null") {
        return Expression::null();
    }
    if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") {
        return Expression::boolean(text.eq_ignore_ascii_case("true"));
    }
    if let Ok(n) = text.parse::<i64>() {
        return Expression::integer(n);
    }
    if let Ok(n) = text.parse::<f64>() {
        return Expression::numeric(n);
    }
    let unquoted = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    Expression::literal(Value::from(unquoted))
}
