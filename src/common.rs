//! Common definitions shared between the front-end and the evaluator.

// Use sorted maps so that iteration order (e.g. when scanning top-level
// declarations) is deterministic.
pub use std::collections::{BTreeMap as Map, BTreeSet as Set};

/// Interned identifier text. Interning means two `Name`s with the same text
/// compare equal in O(1) and are cheap to copy around the AST.
pub type Name = internment::Intern<String>;

/// Size in bytes of a `Word`, and the uniform element size used to scale
/// pointer arithmetic (see the evaluator's binary-operator handling). This
/// dialect has no type-size table richer than "everything is one word".
pub const WORD_SIZE: i64 = 8;
