//! The parser.
//!
//! Two passes over the token stream. The first pass walks top-level items
//! left to right and reserves a [`FuncId`]/[`DeclId`] for every function and
//! global variable, recording where its body/initializer starts and ends in
//! the token stream but not parsing it yet. The second pass revisits those
//! ranges and parses bodies/initializers with every top-level name already
//! resolvable — so a function may call another defined later in the file,
//! and globals may be declared in any order relative to the functions that
//! use them.

use crate::common::{Map, Name};
use crate::error::Error;

use super::ast::*;
use super::lex::{Lexer, Token, TokenKind};

/// Parse a translation unit into a resolved [`Program`].
pub fn parse(input: &str) -> Result<Program, Error> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser::new(&tokens);
    parser.parse_program()
}

enum Pending {
    Function { body: Option<(usize, usize)> },
    Var { init: Option<(usize, usize)> },
}

struct Parser<'t, 'src> {
    tokens: &'t [Token<'src>],
    pos: usize,
    ast: Ast,
    funcs: Map<Name, FuncId>,
    globals: Map<Name, DeclId>,
    scopes: Vec<Map<Name, DeclId>>,
}

impl<'t, 'src> Parser<'t, 'src> {
    fn new(tokens: &'t [Token<'src>]) -> Self {
        Parser {
            tokens,
            pos: 0,
            ast: Ast::default(),
            funcs: Map::new(),
            globals: Map::new(),
            scopes: Vec::new(),
        }
    }

    // ---- token-stream helpers ----------------------------------------

    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token<'src>> {
        self.tokens.get(self.pos + offset)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn check_at(&self, offset: usize, kind: TokenKind) -> bool {
        self.peek_at(offset).is_some_and(|t| t.kind == kind)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> Token<'src> {
        let tok = self.tokens[self.pos];
        self.pos += 1;
        tok
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'src>, Error> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let found = self
                .peek()
                .map(|t| format!("{}", t.kind))
                .unwrap_or_else(|| "end of input".to_string());
            Err(Error::Parse(format!("expected {kind}, found {found}")))
        }
    }

    fn expect_ident(&mut self) -> Result<Name, Error> {
        let tok = self.expect(TokenKind::Ident)?;
        Ok(Name::from(tok.text.to_string()))
    }

    fn is_type_keyword(&self, offset: usize) -> bool {
        self.check_at(offset, TokenKind::KwInt) || self.check_at(offset, TokenKind::KwVoid)
    }

    // ---- type parsing ---------------------------------------------------

    /// `int`/`void` followed by zero or more `*`.
    fn parse_base_and_stars(&mut self) -> Result<Type, Error> {
        let mut ty = if self.eat(TokenKind::KwInt) {
            Type::Int
        } else if self.eat(TokenKind::KwVoid) {
            Type::Void
        } else {
            return Err(Error::Parse("expected a type".to_string()));
        };
        while self.eat(TokenKind::Star) {
            ty = Type::Pointer(Box::new(ty));
        }
        Ok(ty)
    }

    /// Trailing `[N]` on a declarator, applied around the already-parsed
    /// pointer/base type (so `int *c[2]` is `Array(Pointer(Int), 2)`).
    fn parse_array_suffix(&mut self, base: Type) -> Result<Type, Error> {
        if self.eat(TokenKind::LBracket) {
            let size_tok = self.expect(TokenKind::IntLit)?;
            let size: usize = size_tok
                .text
                .parse()
                .map_err(|_| Error::Parse(format!("bad array size '{}'", size_tok.text)))?;
            self.expect(TokenKind::RBracket)?;
            Ok(Type::Array(Box::new(base), size))
        } else {
            Ok(base)
        }
    }

    // ---- pass 1: top-level signature discovery ---------------------------

    fn parse_program(&mut self) -> Result<Program, Error> {
        let mut order: Vec<(Pending, FuncOrDecl)> = Vec::new();
        while !self.at_end() {
            self.eat(TokenKind::KwExtern);
            let base_ty = self.parse_base_and_stars()?;
            let name = self.expect_ident()?;
            if self.check(TokenKind::LParen) {
                let (func_id, body_range) = self.collect_function(base_ty, name)?;
                order.push((
                    Pending::Function { body: body_range },
                    FuncOrDecl::Func(func_id),
                ));
            } else {
                self.collect_var_list(base_ty, name, &mut order)?;
            }
        }

        for (pending, item) in &order {
            match (pending, item) {
                (Pending::Function { body: Some((s, e)) }, FuncOrDecl::Func(func_id)) => {
                    self.parse_function_body(*func_id, *s, *e)?;
                }
                (Pending::Var { init: Some((s, e)) }, FuncOrDecl::Decl(decl_id)) => {
                    let saved = self.pos;
                    self.pos = *s;
                    let init = self.parse_assignment()?;
                    if self.pos != *e {
                        return Err(Error::Parse(
                            "trailing tokens in global initializer".to_string(),
                        ));
                    }
                    self.ast.set_decl_init(*decl_id, init);
                    self.pos = saved;
                }
                _ => {}
            }
        }

        let top_level = order
            .into_iter()
            .map(|(_, item)| match item {
                FuncOrDecl::Func(id) => TopLevel::Function(id),
                FuncOrDecl::Decl(id) => TopLevel::Var(id),
            })
            .collect();

        Ok(Program {
            ast: std::mem::take(&mut self.ast),
            top_level,
        })
    }

    /// Parses a parameter list and either a `;` (forward/extern declaration)
    /// or a `{ ... }` body, whose token range is returned unparsed.
    fn collect_function(
        &mut self,
        return_ty: Type,
        name: Name,
    ) -> Result<(FuncId, Option<(usize, usize)>), Error> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let param_ty = self.parse_base_and_stars()?;
                let param_name = if self.check(TokenKind::Ident) {
                    Some(self.expect_ident()?)
                } else {
                    None
                };
                params.push((param_ty, param_name));
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let param_ids: Vec<DeclId> = params
            .into_iter()
            .enumerate()
            .map(|(i, (ty, name))| {
                let name = name.unwrap_or_else(|| Name::from(format!("__arg{i}")));
                self.ast.push_decl(VarDecl { name, ty, init: None })
            })
            .collect();

        let func_id = self.ast.push_func(FunctionDecl {
            name,
            return_ty,
            params: param_ids,
            body: None,
        });
        self.funcs.insert(self.ast.func(func_id).name, func_id);

        if self.eat(TokenKind::Semi) {
            return Ok((func_id, None));
        }

        self.expect(TokenKind::LBrace)?;
        let start = self.pos - 1; // include the opening brace
        self.skip_balanced_braces()?;
        let end = self.pos;
        Ok((func_id, Some((start, end))))
    }

    /// Pos is just past the consumed `{`; skip tokens until its matching `}`.
    fn skip_balanced_braces(&mut self) -> Result<(), Error> {
        let mut depth = 1usize;
        while depth > 0 {
            if self.at_end() {
                return Err(Error::Parse("unterminated block".to_string()));
            }
            match self.advance().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    fn collect_var_list(
        &mut self,
        base_ty: Type,
        first_name: Name,
        order: &mut Vec<(Pending, FuncOrDecl)>,
    ) -> Result<(), Error> {
        let mut name = first_name;
        loop {
            let ty = self.parse_array_suffix(base_ty.clone())?;
            let init_range = if self.eat(TokenKind::Assign) {
                let start = self.pos;
                self.skip_expr_tokens()?;
                Some((start, self.pos))
            } else {
                None
            };
            let decl_id = self.ast.push_decl(VarDecl { name, ty, init: None });
            self.globals.insert(name, decl_id);
            order.push((Pending::Var { init: init_range }, FuncOrDecl::Decl(decl_id)));

            if self.eat(TokenKind::Comma) {
                name = self.expect_ident()?;
                continue;
            }
            self.expect(TokenKind::Semi)?;
            break;
        }
        Ok(())
    }

    /// Skip tokens that make up an initializer expression, stopping before
    /// the `,` or `;` that ends it (tracking bracket depth so a call's
    /// argument commas aren't mistaken for the declaration's list comma).
    fn skip_expr_tokens(&mut self) -> Result<(), Error> {
        let mut depth = 0i32;
        loop {
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::LParen) | Some(TokenKind::LBracket) => {
                    depth += 1;
                    self.advance();
                }
                Some(TokenKind::RParen) | Some(TokenKind::RBracket) => {
                    depth -= 1;
                    self.advance();
                }
                Some(TokenKind::Comma) | Some(TokenKind::Semi) if depth == 0 => break,
                Some(_) => {
                    self.advance();
                }
                None => return Err(Error::Parse("unterminated initializer".to_string())),
            }
        }
        Ok(())
    }

    // ---- pass 2: bodies ---------------------------------------------------

    fn parse_function_body(&mut self, func_id: FuncId, start: usize, end: usize) -> Result<(), Error> {
        let saved = self.pos;
        self.pos = start;

        self.scopes.push(Map::new());
        for &param in &self.ast.func(func_id).params.clone() {
            let name = self.ast.decl(param).name;
            self.scopes.last_mut().unwrap().insert(name, param);
        }
        let body = self.parse_compound()?;
        self.scopes.pop();

        if self.pos != end {
            return Err(Error::Parse(
                "trailing tokens in function body".to_string(),
            ));
        }
        self.ast.set_func_body(func_id, body);
        self.pos = saved;
        Ok(())
    }

    fn resolve(&self, name: Name) -> Result<DeclId, Error> {
        for scope in self.scopes.iter().rev() {
            if let Some(id) = scope.get(&name) {
                return Ok(*id);
            }
        }
        self.globals
            .get(&name)
            .copied()
            .ok_or_else(|| Error::UnresolvedRef(name.to_string()))
    }

    // ---- statements --------------------------------------------------

    fn parse_compound(&mut self) -> Result<StmtId, Error> {
        self.expect(TokenKind::LBrace)?;
        self.scopes.push(Map::new());
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;
        self.scopes.pop();
        Ok(self.ast.push_stmt(Stmt::Compound(stmts)))
    }

    fn parse_stmt(&mut self) -> Result<StmtId, Error> {
        if self.check(TokenKind::LBrace) {
            return self.parse_compound();
        }
        if self.eat(TokenKind::KwIf) {
            self.expect(TokenKind::LParen)?;
            let cond = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            let then_branch = self.parse_stmt()?;
            let else_branch = if self.eat(TokenKind::KwElse) {
                Some(self.parse_stmt()?)
            } else {
                None
            };
            return Ok(self.ast.push_stmt(Stmt::If {
                cond,
                then_branch,
                else_branch,
            }));
        }
        if self.eat(TokenKind::KwWhile) {
            self.expect(TokenKind::LParen)?;
            let cond = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_stmt()?;
            return Ok(self.ast.push_stmt(Stmt::While { cond, body }));
        }
        if self.eat(TokenKind::KwFor) {
            self.expect(TokenKind::LParen)?;
            self.scopes.push(Map::new());
            let init = if self.is_type_keyword(0) {
                Some(self.parse_decl_stmt()?)
            } else {
                let e = self.parse_expr()?;
                self.expect(TokenKind::Semi)?;
                Some(self.ast.push_stmt(Stmt::Expr(e)))
            };
            let cond = self.parse_expr()?;
            self.expect(TokenKind::Semi)?;
            let step = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_stmt()?;
            self.scopes.pop();
            return Ok(self.ast.push_stmt(Stmt::For {
                init,
                cond,
                step,
                body,
            }));
        }
        if self.eat(TokenKind::KwReturn) {
            let value = if self.check(TokenKind::Semi) {
                None
            } else {
                Some(self.parse_expr()?)
            };
            self.expect(TokenKind::Semi)?;
            return Ok(self.ast.push_stmt(Stmt::Return(value)));
        }
        if self.is_type_keyword(0) {
            return self.parse_decl_stmt();
        }
        let e = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        Ok(self.ast.push_stmt(Stmt::Expr(e)))
    }

    fn parse_decl_stmt(&mut self) -> Result<StmtId, Error> {
        let base_ty = self.parse_base_and_stars()?;
        let mut decls = Vec::new();
        loop {
            let name = self.expect_ident()?;
            let ty = self.parse_array_suffix(base_ty.clone())?;
            let init = if self.eat(TokenKind::Assign) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            let decl_id = self.ast.push_decl(VarDecl { name, ty, init });
            self.scopes.last_mut().unwrap().insert(name, decl_id);
            decls.push(decl_id);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semi)?;
        Ok(self.ast.push_stmt(Stmt::Decl(decls)))
    }

    // ---- expressions ---------------------------------------------------

    fn parse_expr(&mut self) -> Result<ExprId, Error> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<ExprId, Error> {
        let lhs = self.parse_equality()?;
        if self.eat(TokenKind::Assign) {
            let rhs = self.parse_assignment()?;
            let ty = self.ast.expr(lhs).ty.clone();
            return Ok(self.ast.push_expr(
                Expr::Binary {
                    op: BinOp::Assign,
                    lhs,
                    rhs,
                },
                ty,
            ));
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<ExprId, Error> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = if self.eat(TokenKind::EqEq) {
                BinOp::Eq
            } else if self.eat(TokenKind::Ne) {
                BinOp::Ne
            } else {
                break;
            };
            let rhs = self.parse_relational()?;
            lhs = self.push_binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self) -> Result<ExprId, Error> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = if self.eat(TokenKind::Lt) {
                BinOp::Lt
            } else if self.eat(TokenKind::Gt) {
                BinOp::Gt
            } else if self.eat(TokenKind::Le) {
                BinOp::Le
            } else if self.eat(TokenKind::Ge) {
                BinOp::Ge
            } else {
                break;
            };
            let rhs = self.parse_additive()?;
            lhs = self.push_binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<ExprId, Error> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = if self.eat(TokenKind::Plus) {
                BinOp::Add
            } else if self.eat(TokenKind::Minus) {
                BinOp::Sub
            } else {
                break;
            };
            let rhs = self.parse_multiplicative()?;
            lhs = self.push_binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, Error> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = if self.eat(TokenKind::Star) {
                BinOp::Mul
            } else if self.eat(TokenKind::Slash) {
                BinOp::Div
            } else {
                break;
            };
            let rhs = self.parse_unary()?;
            lhs = self.push_binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn push_binary(&mut self, op: BinOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        let ty = infer_binary_type(op, &self.ast.expr(lhs).ty, &self.ast.expr(rhs).ty);
        self.ast.push_expr(Expr::Binary { op, lhs, rhs }, ty)
    }

    fn parse_unary(&mut self) -> Result<ExprId, Error> {
        if self.eat(TokenKind::Plus) {
            let sub = self.parse_unary()?;
            let ty = self.ast.expr(sub).ty.clone();
            return Ok(self.ast.push_expr(Expr::Unary { op: UnOp::Plus, sub }, ty));
        }
        if self.eat(TokenKind::Minus) {
            let sub = self.parse_unary()?;
            return Ok(self.ast.push_expr(Expr::Unary { op: UnOp::Neg, sub }, Type::Int));
        }
        if self.eat(TokenKind::Bang) {
            let sub = self.parse_unary()?;
            return Ok(self.ast.push_expr(Expr::Unary { op: UnOp::Not, sub }, Type::Int));
        }
        if self.eat(TokenKind::Tilde) {
            let sub = self.parse_unary()?;
            return Ok(self
                .ast
                .push_expr(Expr::Unary { op: UnOp::BitNot, sub }, Type::Int));
        }
        if self.eat(TokenKind::Star) {
            let sub = self.parse_unary()?;
            let ty = self
                .ast
                .expr(sub)
                .ty
                .pointee()
                .cloned()
                .unwrap_or(Type::Int);
            return Ok(self.ast.push_expr(Expr::Unary { op: UnOp::Deref, sub }, ty));
        }
        if self.eat(TokenKind::Amp) {
            let sub = self.parse_unary()?;
            let ty = Type::Pointer(Box::new(self.ast.expr(sub).ty.clone()));
            return Ok(self
                .ast
                .push_expr(Expr::Unary { op: UnOp::AddrOf, sub }, ty));
        }
        if self.eat(TokenKind::KwSizeof) {
            self.expect(TokenKind::LParen)?;
            self.parse_base_and_stars()?;
            self.expect(TokenKind::RParen)?;
            return Ok(self.ast.push_expr(Expr::SizeOf, Type::Int));
        }
        if self.check(TokenKind::LParen) && self.is_type_keyword(1) {
            self.advance();
            let target = self.parse_base_and_stars()?;
            self.expect(TokenKind::RParen)?;
            let sub = self.parse_unary()?;
            return Ok(self.ast.push_expr(Expr::Cast { target: target.clone(), sub }, target));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<ExprId, Error> {
        if self.check(TokenKind::Ident) && self.check_at(1, TokenKind::LParen) {
            let name_tok = self.advance();
            let name = Name::from(name_tok.text.to_string());
            self.advance(); // '('
            let mut args = Vec::new();
            if !self.check(TokenKind::RParen) {
                loop {
                    args.push(self.parse_assignment()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen)?;
            let func_id = *self
                .funcs
                .get(&name)
                .ok_or_else(|| Error::UnresolvedRef(name.to_string()))?;
            let ret_ty = self.ast.func(func_id).return_ty.clone();
            let id = self
                .ast
                .push_expr(Expr::Call { callee: func_id, args }, ret_ty);
            return self.parse_postfix_tail(id);
        }
        let e = self.parse_primary()?;
        self.parse_postfix_tail(e)
    }

    fn parse_postfix_tail(&mut self, mut e: ExprId) -> Result<ExprId, Error> {
        while self.eat(TokenKind::LBracket) {
            let index = self.parse_expr()?;
            self.expect(TokenKind::RBracket)?;
            let ty = self
                .ast
                .expr(e)
                .ty
                .pointee()
                .cloned()
                .unwrap_or(Type::Int);
            e = self.ast.push_expr(Expr::Subscript { base: e, index }, ty);
        }
        Ok(e)
    }

    fn parse_primary(&mut self) -> Result<ExprId, Error> {
        if self.check(TokenKind::IntLit) {
            let tok = self.advance();
            let value: i64 = tok
                .text
                .parse()
                .map_err(|_| Error::Parse(format!("bad integer literal '{}'", tok.text)))?;
            return Ok(self.ast.push_expr(Expr::IntLiteral(value), Type::Int));
        }
        if self.check(TokenKind::CharLit) {
            let tok = self.advance();
            let value = parse_char_literal(tok.text)?;
            return Ok(self.ast.push_expr(Expr::CharLiteral(value), Type::Int));
        }
        if self.eat(TokenKind::LParen) {
            let inner = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            let ty = self.ast.expr(inner).ty.clone();
            return Ok(self.ast.push_expr(Expr::Paren(inner), ty));
        }
        if self.check(TokenKind::Ident) {
            let tok = self.advance();
            let name = Name::from(tok.text.to_string());
            let decl = self.resolve(name)?;
            let ty = decay(&self.ast.decl(decl).ty);
            return Ok(self.ast.push_expr(Expr::DeclRef { name, decl }, ty));
        }
        let found = self
            .peek()
            .map(|t| format!("{}", t.kind))
            .unwrap_or_else(|| "end of input".to_string());
        Err(Error::Parse(format!("expected an expression, found {found}")))
    }
}

enum FuncOrDecl {
    Func(FuncId),
    Decl(DeclId),
}

fn decay(ty: &Type) -> Type {
    match ty {
        Type::Array(elem, _) => Type::Pointer(elem.clone()),
        other => other.clone(),
    }
}

fn infer_binary_type(op: BinOp, lhs: &Type, rhs: &Type) -> Type {
    let l = decay(lhs);
    let r = decay(rhs);
    match op {
        BinOp::Assign => l,
        BinOp::Add | BinOp::Sub => {
            if l.is_pointer() && !r.is_pointer() {
                l
            } else if !l.is_pointer() && r.is_pointer() {
                r
            } else {
                Type::Int
            }
        }
        BinOp::Mul | BinOp::Div => Type::Int,
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => Type::Int,
    }
}

fn parse_char_literal(text: &str) -> Result<i64, Error> {
    let inner = &text[1..text.len() - 1];
    let ch = if let Some(escaped) = inner.strip_prefix('\\') {
        match escaped {
            "n" => '\n',
            "t" => '\t',
            "0" => '\0',
            "r" => '\r',
            "\\" => '\\',
            "'" => '\'',
            other => {
                return Err(Error::Parse(format!("unknown escape '\\{other}'")));
            }
        }
    } else {
        inner.chars().next().ok_or_else(|| Error::Parse("empty character literal".to_string()))?
    };
    Ok(ch as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_main_with_locals() {
        let prog = parse(
            r#"
            extern int GET();
            extern void * MALLOC(int);
            extern void FREE(void *);
            extern void PRINT(int);

            int main() {
               int* a;
               a = (int*)MALLOC(sizeof(int)*2);
               *a = 10;
               *(a+1) = 20;
               PRINT(*a);
               PRINT(*(a+1));
               FREE(a);
            }
            "#,
        )
        .unwrap();
        assert_eq!(prog.top_level.len(), 5);
    }

    #[test]
    fn forward_reference_to_later_function_resolves() {
        let prog = parse(
            r#"
            int helper(int x) { return x + 1; }
            int main() { return helper(1); }
            "#,
        )
        .unwrap();
        assert_eq!(prog.top_level.len(), 2);
    }

    #[test]
    fn array_of_pointers_decl_type() {
        let prog = parse(
            r#"
            int main() {
               int* a;
               int* c[2];
               c[0] = a;
            }
            "#,
        )
        .unwrap();
        // The Decl stmt for `c` should carry Array(Pointer(Int), 2).
        let main_id = match prog.top_level[0] {
            TopLevel::Function(id) => id,
            _ => panic!("expected function"),
        };
        let body = prog.ast.func(main_id).body.unwrap();
        if let Stmt::Compound(stmts) = prog.ast.stmt(body) {
            if let Stmt::Decl(decls) = prog.ast.stmt(stmts[1]) {
                let decl = prog.ast.decl(decls[0]);
                assert_eq!(decl.ty, Type::Array(Box::new(Type::Pointer(Box::new(Type::Int))), 2));
            } else {
                panic!("expected decl stmt");
            }
        } else {
            panic!("expected compound stmt");
        }
    }

    #[test]
    fn unresolved_identifier_is_an_error() {
        assert!(parse("int main() { return y; }").is_err());
    }
}
