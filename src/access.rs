//! Runtime values produced by calculator evaluation.
//!
//! A [`Value`] is what every calculator node hands back from `evaluate`.
//! Scalars, members and tuples share one representation so that generic
//! nodes (such as the CASE matcher) can pass results through without
//! knowing their shape.

pub mod value;

pub use value::Value;
