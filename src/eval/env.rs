//! The global interpreter state: the stack of frames, the global-variable
//! map, the host heap, resolved handles to the four intrinsics and the
//! entry function, and initialization (§4.3 of the design doc).
//!
//! The traversal itself — the part that decides *when* to visit which node
//! — lives in [`super::driver`]; this module owns the state those visits
//! read and write.

use std::io::{BufRead, Write};

use crate::common::Map;
use crate::error::{Error, Result};
use crate::front::{Ast, DeclId, FuncId, Program, TopLevel, Type};

use super::frame::StackFrame;
use super::heap::Heap;
use super::value::Word;

/// One of the four externally declared functions the interpreter implements
/// natively, identified by declaration identity rather than by re-checking
/// the name on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intrinsic {
    Get,
    Print,
    Malloc,
    Free,
}

/// The interpreter's global state for one run of a translation unit.
///
/// `R` and `W` stand in for stdin/stderr so tests can feed a `GET` program
/// a canned input stream and capture what `PRINT` writes without touching
/// the real process streams.
pub struct Environment<'ast, R, W> {
    pub(super) ast: &'ast Ast,
    pub(super) stack: Vec<StackFrame>,
    pub(super) globals: Map<DeclId, Word>,
    pub(super) heap: Heap,
    pub(super) intrinsics: Map<FuncId, Intrinsic>,
    pub(super) entry: Option<FuncId>,
    pub(super) input: R,
    pub(super) output: W,
}

impl<'ast, R: BufRead, W: Write> Environment<'ast, R, W> {
    pub fn new(ast: &'ast Ast, input: R, output: W) -> Self {
        Environment {
            ast,
            stack: Vec::new(),
            globals: Map::new(),
            heap: Heap::new(),
            intrinsics: Map::new(),
            entry: None,
            input,
            output,
        }
    }

    /// The currently executing frame. The stack is non-empty for the entire
    /// duration of [`Environment::init`] and [`Environment::run_main`]; an
    /// empty stack here is an evaluator bug, not a user-program error.
    pub(super) fn top(&self) -> &StackFrame {
        self.stack.last().expect("frame stack must be non-empty during evaluation")
    }

    pub(super) fn top_mut(&mut self) -> &mut StackFrame {
        self.stack.last_mut().expect("frame stack must be non-empty during evaluation")
    }

    /// Bootstrap the interpreter state from a parsed translation unit (§4.3).
    ///
    /// Global initializers are evaluated in source order directly into
    /// `globals`, in one pass rather than the reference design's separate
    /// pre-walk-then-harvest steps (see `SPEC_FULL.md` §9, "Global
    /// initializer pre-walk duplication") — a later global's initializer
    /// may reference an earlier one because by the time it is visited, the
    /// earlier global is already in `self.globals`.
    pub fn init(&mut self, program: &Program) -> Result<()> {
        self.stack.push(StackFrame::new());
        for item in &program.top_level {
            match *item {
                TopLevel::Function(f) => {
                    let func = self.ast.func(f);
                    match func.name.as_str() {
                        "GET" => {
                            self.intrinsics.insert(f, Intrinsic::Get);
                        }
                        "PRINT" => {
                            self.intrinsics.insert(f, Intrinsic::Print);
                        }
                        "MALLOC" => {
                            self.intrinsics.insert(f, Intrinsic::Malloc);
                        }
                        "FREE" => {
                            self.intrinsics.insert(f, Intrinsic::Free);
                        }
                        "main" => {
                            self.entry = Some(f);
                        }
                        _ => {}
                    }
                }
                TopLevel::Var(d) => {
                    let decl_ty = self.ast.decl(d).ty.clone();
                    let value = if let Type::Array(_, n) = decl_ty {
                        self.heap.alloc_words(n)?
                    } else {
                        match self.ast.decl(d).init {
                            Some(e) => self.visit_expr(e)?,
                            None => Word::ZERO,
                        }
                    };
                    self.globals.insert(d, value);
                }
            }
        }
        self.stack.pop();
        self.stack.push(StackFrame::new());

        if self.entry.is_none() {
            return Err(Error::NoEntry);
        }
        Ok(())
    }

    /// Run `main`'s body to completion. Its return value is read off the
    /// frame on pop but never reported to the host (§4.6, §6): the process
    /// exit code is determined solely by whether evaluation errored.
    pub fn run_main(&mut self) -> Result<()> {
        let entry = self.entry.ok_or(Error::NoEntry)?;
        let body = self.ast.func(entry).body.ok_or(Error::MissingBinding)?;
        let depth_before = self.stack.len();
        self.visit_stmt(body)?;
        debug_assert_eq!(self.stack.len(), depth_before, "stack invariant violated");
        self.stack.pop();
        Ok(())
    }
}

/// Parse-and-run entry point used by both the CLI and the end-to-end tests:
/// evaluate `program` to completion, reading `GET` input from `input` and
/// writing `PRINT` output (and the `GET` prompt diagnostic) to `output`.
pub fn run<R: BufRead, W: Write>(program: &Program, input: R, output: W) -> Result<()> {
    let mut env = Environment::new(&program.ast, input, output);
    env.init(program)?;
    env.run_main()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front::parse;

    fn run_str(src: &str, stdin: &str) -> (Result<()>, String) {
        let program = parse(src).expect("test program should parse");
        let mut out = Vec::new();
        let result = run(&program, stdin.as_bytes(), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn no_main_is_an_error() {
        let program = parse("int helper() { return 1; }").unwrap();
        let result = run(&program, &b""[..], Vec::new());
        assert!(matches!(result, Err(Error::NoEntry)));
    }

    #[test]
    fn global_initializer_is_visible_in_main() {
        let (result, out) = run_str("int g=5;int main(){PRINT(g);}", "");
        result.unwrap();
        assert_eq!(out, "5");
    }

    #[test]
    fn later_global_can_reference_earlier_global() {
        let (result, out) = run_str("int g=5;int h=g+1;int main(){PRINT(h);}", "");
        result.unwrap();
        assert_eq!(out, "6");
    }
}
