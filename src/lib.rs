//! `cinterp` as a library: a tree-walking interpreter for a small
//! imperative subset of C. See `src/bin` for the executable using it.

pub mod common;
pub mod error;
pub mod eval;
pub mod front;
