//! The evaluator: stack-frame model, expression/statement visit protocol,
//! pointer/array memory model, call protocol, and intrinsic dispatch.
//!
//! This is the part of the crate that is genuinely specific to this
//! language: everything upstream of it (`front`) only exists to hand the
//! evaluator a typed, identity-stable AST to walk.

pub mod driver;
pub mod env;
pub mod frame;
pub mod heap;
pub mod value;

pub use env::{run, Environment};
pub use value::Word;
