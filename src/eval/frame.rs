//! Per-call storage: the associative maps a single activation of a function
//! needs while its body is being visited.
//!
//! A frame never outlives the call it belongs to (see [`super::env::Environment`]'s
//! stack discipline); nothing here needs to survive a `pop`.

use crate::common::Map;
use crate::error::{Error, Result};
use crate::front::{DeclId, ExprId};

use super::value::Word;

/// Per-call activation record.
///
/// `decl_values` holds exactly the declarations in scope in this frame
/// (parameters, plus locals as their `DeclStmt`s are visited). `stmt_values`
/// caches the most recent evaluation of every expression visited along the
/// current path; loops overwrite the same key on each iteration rather than
/// accumulating history. `stmt_addrs` is only ever populated for
/// lvalue-producing expressions (array subscript, unary dereference) and is
/// consulted when an assignment's left-hand side needs a write target.
#[derive(Debug, Default)]
pub struct StackFrame {
    decl_values: Map<DeclId, Word>,
    stmt_values: Map<ExprId, Word>,
    stmt_addrs: Map<ExprId, Word>,
    return_value: Option<Word>,
}

impl StackFrame {
    pub fn new() -> Self {
        StackFrame::default()
    }

    pub fn bind_decl(&mut self, decl: DeclId, value: Word) {
        self.decl_values.insert(decl, value);
    }

    pub fn has_decl(&self, decl: DeclId) -> bool {
        self.decl_values.contains_key(&decl)
    }

    pub fn get_decl(&self, decl: DeclId) -> Result<Word> {
        self.decl_values.get(&decl).copied().ok_or(Error::MissingBinding)
    }

    pub fn bind_expr(&mut self, expr: ExprId, value: Word) {
        self.stmt_values.insert(expr, value);
    }

    pub fn has_expr(&self, expr: ExprId) -> bool {
        self.stmt_values.contains_key(&expr)
    }

    pub fn get_expr(&self, expr: ExprId) -> Result<Word> {
        self.stmt_values.get(&expr).copied().ok_or(Error::MissingBinding)
    }

    pub fn bind_addr(&mut self, expr: ExprId, addr: Word) {
        self.stmt_addrs.insert(expr, addr);
    }

    pub fn get_addr(&self, expr: ExprId) -> Result<Word> {
        self.stmt_addrs.get(&expr).copied().ok_or(Error::MissingBinding)
    }

    pub fn set_return(&mut self, value: Word) {
        self.return_value = Some(value);
    }

    /// Defaults to `Word::ZERO` for a function that falls off the end of
    /// its body without executing a `return` (see `SPEC_FULL.md` §4.6).
    pub fn get_return(&self) -> Word {
        self.return_value.unwrap_or(Word::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(i: u32) -> DeclId {
        DeclId(i)
    }
    fn expr(i: u32) -> ExprId {
        ExprId(i)
    }

    #[test]
    fn decl_roundtrip() {
        let mut f = StackFrame::new();
        assert!(!f.has_decl(decl(0)));
        f.bind_decl(decl(0), Word(42));
        assert!(f.has_decl(decl(0)));
        assert_eq!(f.get_decl(decl(0)).unwrap(), Word(42));
    }

    #[test]
    fn missing_decl_is_an_error() {
        let f = StackFrame::new();
        assert!(matches!(f.get_decl(decl(0)), Err(Error::MissingBinding)));
    }

    #[test]
    fn expr_cache_rebinds_on_reevaluation() {
        let mut f = StackFrame::new();
        f.bind_expr(expr(0), Word(1));
        f.bind_expr(expr(0), Word(2));
        assert_eq!(f.get_expr(expr(0)).unwrap(), Word(2));
    }

    #[test]
    fn addr_cache_only_for_lvalues() {
        let mut f = StackFrame::new();
        assert!(f.get_addr(expr(0)).is_err());
        f.bind_addr(expr(0), Word::from_address(0x1000));
        assert_eq!(f.get_addr(expr(0)).unwrap(), Word::from_address(0x1000));
    }

    #[test]
    fn return_slot_defaults_to_zero() {
        let f = StackFrame::new();
        assert_eq!(f.get_return(), Word::ZERO);
        let mut f = StackFrame::new();
        f.set_return(Word(7));
        assert_eq!(f.get_return(), Word(7));
    }
}
