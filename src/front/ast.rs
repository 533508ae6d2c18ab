//! The abstract syntax tree.
//!
//! Every declaration and every expression/statement node is allocated once
//! into a per-parse arena ([`Ast`]) and addressed by a small `Copy` index
//! type for the rest of the crate's lifetime. Frames cache evaluation
//! results keyed on these indices rather than on structural equality or raw
//! pointers — see the evaluator's `StackFrame` for why that distinction
//! matters (loops re-bind the same node on every iteration).

use crate::common::Name;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

arena_id!(
    /// Identity of a variable or parameter declaration.
    DeclId
);
arena_id!(
    /// Identity of an expression node.
    ExprId
);
arena_id!(
    /// Identity of a statement node.
    StmtId
);
arena_id!(
    /// Identity of a function declaration.
    FuncId
);

/// A type in the restricted dialect: `int`, `void`, a pointer to another
/// type, or a constant-size array of another type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Void,
    Pointer(Box<Type>),
    Array(Box<Type>, usize),
}

impl Type {
    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    /// The type of `*self`, if `self` is a pointer or array.
    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::Pointer(t) | Type::Array(t, _) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Neg,
    Not,
    BitNot,
    Deref,
    AddrOf,
}

/// An expression node. Children are referenced by [`ExprId`]; the arena
/// owns the actual [`ExprNode`] storage.
#[derive(Debug, Clone)]
pub enum Expr {
    IntLiteral(i64),
    CharLiteral(i64),
    /// `sizeof(type)`. The dialect has a single element size (see
    /// `common::WORD_SIZE`), so the type operand is not retained.
    SizeOf,
    Paren(ExprId),
    Cast { target: Type, sub: ExprId },
    /// `name` is kept for diagnostics; `decl` is the resolved binding.
    DeclRef { name: Name, decl: DeclId },
    Binary { op: BinOp, lhs: ExprId, rhs: ExprId },
    Unary { op: UnOp, sub: ExprId },
    Subscript { base: ExprId, index: ExprId },
    /// Calls are always direct: the callee is resolved to a [`FuncId`] by
    /// the front-end, mirroring the upstream "direct callee" contract this
    /// evaluator assumes (no function pointers, no indirect calls).
    Call { callee: FuncId, args: Vec<ExprId> },
}

/// An expression node together with its statically inferred type. The
/// evaluator consults `ty` exactly once per binary operator: to decide
/// whether pointer arithmetic's element-scaling rule applies.
#[derive(Debug, Clone)]
pub struct ExprNode {
    pub kind: Expr,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Compound(Vec<StmtId>),
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    For {
        init: Option<StmtId>,
        cond: ExprId,
        step: ExprId,
        body: StmtId,
    },
    Return(Option<ExprId>),
    /// One statement may declare several comma-separated variables.
    Decl(Vec<DeclId>),
    Expr(ExprId),
}

#[derive(Debug)]
pub struct VarDecl {
    pub name: Name,
    pub ty: Type,
    pub init: Option<ExprId>,
}

#[derive(Debug)]
pub struct FunctionDecl {
    pub name: Name,
    pub return_ty: Type,
    pub params: Vec<DeclId>,
    /// `None` for the four `extern` intrinsic declarations.
    pub body: Option<StmtId>,
}

/// The arena backing an entire translation unit. Indices into its vectors
/// are the `*Id` types above; they stay valid for as long as the `Ast` they
/// were produced from is alive.
#[derive(Debug, Default)]
pub struct Ast {
    exprs: Vec<ExprNode>,
    stmts: Vec<Stmt>,
    decls: Vec<VarDecl>,
    funcs: Vec<FunctionDecl>,
}

impl Ast {
    pub fn push_expr(&mut self, kind: Expr, ty: Type) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(ExprNode { kind, ty });
        id
    }

    pub fn push_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId(self.stmts.len() as u32);
        self.stmts.push(stmt);
        id
    }

    pub fn push_decl(&mut self, decl: VarDecl) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    pub fn push_func(&mut self, func: FunctionDecl) -> FuncId {
        let id = FuncId(self.funcs.len() as u32);
        self.funcs.push(func);
        id
    }

    pub fn expr(&self, id: ExprId) -> &ExprNode {
        &self.exprs[id.0 as usize]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.0 as usize]
    }

    pub fn decl(&self, id: DeclId) -> &VarDecl {
        &self.decls[id.0 as usize]
    }

    pub fn func(&self, id: FuncId) -> &FunctionDecl {
        &self.funcs[id.0 as usize]
    }

    /// Patch in a function body discovered on the parser's second pass,
    /// after `id` was reserved on the first pass so forward calls (mutual
    /// recursion, calls to a function defined later in the file) resolve.
    pub fn set_func_body(&mut self, id: FuncId, body: StmtId) {
        self.funcs[id.0 as usize].body = Some(body);
    }

    /// Patch in a global initializer discovered on the parser's second
    /// pass, for the same forward-reference reason as [`Ast::set_func_body`].
    pub fn set_decl_init(&mut self, id: DeclId, init: ExprId) {
        self.decls[id.0 as usize].init = Some(init);
    }
}

/// A top-level declaration, in source order. Source order matters: the
/// evaluator's init step scans these in order to pre-walk global
/// initializers and to resolve the intrinsic/entry handles.
#[derive(Debug, Clone, Copy)]
pub enum TopLevel {
    Function(FuncId),
    Var(DeclId),
}

/// A fully parsed and resolved translation unit.
#[derive(Debug, Default)]
pub struct Program {
    pub ast: Ast,
    pub top_level: Vec<TopLevel>,
}
