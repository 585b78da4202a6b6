pub mod access;
pub mod calc;
pub mod catalog;
pub mod config;
pub mod expression;
pub mod function;
