//! Static side of the function core: categories, implicit conversions,
//! static types and the argument expression tree.

pub mod category;
pub mod conversion;
pub mod error;
pub mod expr;
pub mod syntax;
pub mod types;

pub use category::Category;
pub use conversion::{find_conversion, Conversion, ConversionKind, ConversionRequirement};
pub use error::{DeductionError, ExpressionError, ExpressionResult};
pub use expr::{Expression, Literal, MeasureRef, ResolvedCall, UnresolvedCall};
pub use syntax::Syntax;
pub use types::ExprType;
