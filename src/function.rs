//! Operator registration, resolution and the built-in operator families.
//!
//! An operator is an [`OperatorDef`]: descriptive data plus a resolution
//! [`Strategy`] and a compile function. Validation binds each unresolved
//! call to the cheapest accepting definition, producing a
//! [`ResolvedFunction`] that the compiler turns into a calculator.

pub mod case_match;
pub mod properties;
pub mod registry;
pub mod resolver;
pub mod signature;
pub mod validator;

pub use registry::FunctionRegistry;
pub use signature::{
    CompileFn, DeduceFn, OperatorDef, ResolvedFunction, ReturnCategory, Strategy, TypeSource,
};
pub use validator::{QueryValidator, Validator};
