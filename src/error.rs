//! The crate-wide error type.
//!
//! Front-end diagnostics (lexing, parsing, declaration resolution) and
//! evaluator faults share one enum so both flow through the same `Result`
//! plumbing and the same CLI reporting path.

use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum Error {
    /// An unexpected character was encountered at the given byte offset.
    #[display("lex error: unexpected character {:?} at byte {}", _1, _0)]
    Lex(usize, char),

    /// A malformed token stream; `_0` is a human-readable description.
    #[display("parse error: {}", _0)]
    Parse(String),

    /// `main` was not found while initializing the evaluator.
    #[display("no 'main' function was found")]
    NoEntry,

    /// A frame or globals lookup failed for a declaration/statement the
    /// evaluator expected to have a binding. This indicates a gap in visit
    /// coverage, not a user-program error.
    #[display("missing binding during evaluation (evaluator bug)")]
    MissingBinding,

    /// A `DeclRefExpr` could not be resolved in the current frame or globals.
    #[display("unresolved reference to '{}'", _0)]
    UnresolvedRef(String),

    /// A node kind or opcode outside the supported subset.
    #[display("unsupported construct: {}", _0)]
    Unsupported(String),

    /// Integer division or modulo by zero.
    #[display("division by zero")]
    DivideByZero,

    /// The host allocator refused a request, or `FREE` was given an address
    /// that was not returned by a prior `MALLOC`.
    #[display("allocator error: {}", _0)]
    UserAllocatorError(String),

    /// Propagated failure writing to or reading from a host I/O stream.
    #[display("I/O error: {}", _0)]
    Io(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
