//! Recursive-descent parser.
//!
//! Lookahead is two tokens, buffered directly in the parser (`cur`/`peeked`)
//! rather than by cloning the lexer and replaying it — the original's
//! approach to finding out what comes after the current token. Function
//! headers and extern-def headers share an identifier lead-in, so the
//! parser needs to see one token past `cur` before it can decide which one
//! it's looking at.

use bcc_base::diag::{BccError, ErrorCode, Result};
use bcc_base::span::Location;
use bcc_base::{Arena, Interner, Symbol};

use crate::ast::{
    AssignOp, BinaryOp, CaseLabel, DeclItem, Expr, ExprKind, ExternItem, ExternVariant, Init,
    Program, RelOp, Stmt, StmtKind, Top, UnaryOp,
};
use crate::fold::fold_const;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

pub struct Parser<'a, 'i> {
    lexer: Lexer<'a, 'i>,
    arena: &'a Arena,
    cur: Token,
    peeked: Option<Token>,
    switch_depth: u32,
}

impl<'a, 'i> Parser<'a, 'i> {
    pub fn new(arena: &'a Arena, interner: &'i mut Interner, src: &'a str, file: Symbol) -> Result<Self> {
        let mut lexer = Lexer::new(arena, interner, src, file);
        let cur = lexer.next_token()?;
        Ok(Parser {
            lexer,
            arena,
            cur,
            peeked: None,
            switch_depth: 0,
        })
    }

    // --- token stream plumbing -------------------------------------------------

    fn bump(&mut self) -> Result<Token> {
        let old = self.cur;
        self.cur = match self.peeked.take() {
            Some(tok) => tok,
            None => self.lexer.next_token()?,
        };
        Ok(old)
    }

    fn peek2_kind(&mut self) -> Result<TokenKind> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        Ok(self.peeked.as_ref().unwrap().kind)
    }

    fn accept(&mut self, kind: TokenKind) -> Result<bool> {
        if self.cur.kind == kind {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind, code: ErrorCode) -> Result<Token> {
        if self.cur.kind == kind {
            self.bump()
        } else {
            Err(self.err(code, format!("expected {:?}, found {:?}", kind, self.cur.kind)))
        }
    }

    fn expect_ident(&mut self, code: ErrorCode) -> Result<(Symbol, Location)> {
        if self.cur.kind == TokenKind::Ident {
            let tok = self.bump()?;
            Ok((tok.lexeme.expect("ident token always carries a lexeme"), tok.location))
        } else {
            Err(self.err(code, format!("expected an identifier, found {:?}", self.cur.kind)))
        }
    }

    fn err(&self, code: ErrorCode, msg: impl Into<String>) -> BccError {
        BccError::new(code, self.cur.location, msg)
    }

    // --- entry point ------------------------------------------------------------

    pub fn parse_program(&mut self) -> Result<Program<'a>> {
        let mut items = Vec::new();
        while self.cur.kind != TokenKind::Eof {
            items.push(self.parse_top()?);
        }
        Ok(Program {
            items: self.arena.alloc_slice(items),
        })
    }

    fn parse_top(&mut self) -> Result<Top<'a>> {
        match self.cur.kind {
            TokenKind::Extrn => self.parse_top_extern_decl(),
            TokenKind::Auto => {
                let stmt = self.parse_auto_decl()?;
                Ok(Top::GlobalAuto(self.arena.alloc(stmt)))
            }
            TokenKind::Ident => {
                if self.peek2_kind()? == TokenKind::LParen {
                    self.parse_function_def()
                } else {
                    self.parse_extern_def()
                }
            }
            _ => Err(self.err(
                ErrorCode::StmtSyntax,
                format!("expected a top-level definition, found {:?}", self.cur.kind),
            )),
        }
    }

    fn parse_top_extern_decl(&mut self) -> Result<Top<'a>> {
        let location = self.cur.location;
        self.bump()?; // extrn
        let mut names = Vec::new();
        loop {
            let (name, _) = self.expect_ident(ErrorCode::StmtSyntax)?;
            names.push(name);
            if !self.accept(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::Semi, ErrorCode::StmtSyntax)?;
        Ok(Top::ExternDecl(self.arena.alloc_slice(names), location))
    }

    fn parse_function_def(&mut self) -> Result<Top<'a>> {
        let (name, location) = self.expect_ident(ErrorCode::StmtSyntax)?;
        self.expect(TokenKind::LParen, ErrorCode::StmtSyntax)?;
        let mut params = Vec::new();
        if self.cur.kind != TokenKind::RParen {
            loop {
                let (p, _) = self.expect_ident(ErrorCode::StmtSyntax)?;
                params.push(p);
                if !self.accept(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, ErrorCode::StmtSyntax)?;
        let body = self.parse_block()?;
        Ok(Top::Function {
            name,
            params: self.arena.alloc_slice(params),
            body: self.arena.alloc(body),
            location,
        })
    }

    fn parse_extern_def(&mut self) -> Result<Top<'a>> {
        let (name, location) = self.expect_ident(ErrorCode::StmtSyntax)?;

        if self.accept(TokenKind::Semi)? {
            return Ok(self.mk_extern_def(name, ExternVariant::Scalar, None, location));
        }

        if self.accept(TokenKind::Assign)? {
            let e = self.parse_assign()?;
            self.expect(TokenKind::Semi, ErrorCode::StmtSyntax)?;
            let init = Init::Expr(self.arena.alloc(e));
            return Ok(self.mk_extern_def(name, ExternVariant::Scalar, Some(init), location));
        }

        if self.cur.kind == TokenKind::LBrace {
            let init = self.parse_init_list()?;
            self.expect(TokenKind::Semi, ErrorCode::StmtSyntax)?;
            return Ok(self.mk_extern_def(name, ExternVariant::Blob, Some(init), location));
        }

        if self.accept(TokenKind::LBracket)? {
            let bound = if self.cur.kind != TokenKind::RBracket {
                Some(self.parse_assign()?)
            } else {
                None
            };
            let has_empty_brackets = bound.is_none();
            self.expect(TokenKind::RBracket, ErrorCode::StmtSyntax)?;
            let initializer = if self.cur.kind == TokenKind::LBrace {
                Some(self.parse_init_list()?)
            } else if self.cur.kind != TokenKind::Semi {
                Some(self.parse_comma_init_list()?)
            } else {
                None
            };
            self.expect(TokenKind::Semi, ErrorCode::StmtSyntax)?;
            let variant = ExternVariant::Vector {
                bound: bound.map(|e| &*self.arena.alloc(e)),
                has_empty_brackets,
                bound_folded: None,
            };
            return Ok(self.mk_extern_def(name, variant, initializer, location));
        }

        // Bare comma-list form: `name expr, expr, ...;` — a blob with no brackets.
        let init = self.parse_comma_init_list()?;
        self.expect(TokenKind::Semi, ErrorCode::StmtSyntax)?;
        Ok(self.mk_extern_def(name, ExternVariant::Blob, Some(init), location))
    }

    fn mk_extern_def(
        &self,
        name: Symbol,
        variant: ExternVariant<'a>,
        initializer: Option<Init<'a>>,
        location: Location,
    ) -> Top<'a> {
        let item = self.arena.alloc(ExternItem {
            name,
            variant,
            initializer,
            is_implicit_static: false,
            location,
        });
        Top::ExternDef(item)
    }

    fn parse_comma_init_list(&mut self) -> Result<Init<'a>> {
        let mut elements = Vec::new();
        loop {
            elements.push(self.parse_init_element()?);
            if !self.accept(TokenKind::Comma)? {
                break;
            }
        }
        Ok(Init::List(self.arena.alloc_slice(elements)))
    }

    fn parse_init_list(&mut self) -> Result<Init<'a>> {
        self.expect(TokenKind::LBrace, ErrorCode::StmtSyntax)?;
        let mut elements = Vec::new();
        if self.cur.kind != TokenKind::RBrace {
            loop {
                elements.push(self.parse_init_element()?);
                if !self.accept(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace, ErrorCode::StmtSyntax)?;
        Ok(Init::List(self.arena.alloc_slice(elements)))
    }

    fn parse_init_element(&mut self) -> Result<Init<'a>> {
        if self.cur.kind == TokenKind::LBrace {
            self.parse_init_list()
        } else {
            // Assignment-level, not comma-level, so list separators stay unambiguous.
            let e = self.parse_assign()?;
            Ok(Init::Expr(self.arena.alloc(e)))
        }
    }

    // --- statements --------------------------------------------------------------

    fn parse_block(&mut self) -> Result<Stmt<'a>> {
        let location = self.cur.location;
        self.expect(TokenKind::LBrace, ErrorCode::StmtSyntax)?;
        let mut stmts = Vec::new();
        while self.cur.kind != TokenKind::RBrace && self.cur.kind != TokenKind::Eof {
            let s = self.parse_stmt()?;
            stmts.push(&*self.arena.alloc(s));
        }
        self.expect(TokenKind::RBrace, ErrorCode::StmtSyntax)?;
        Ok(Stmt::new(StmtKind::Block(self.arena.alloc_slice(stmts)), location))
    }

    fn parse_stmt(&mut self) -> Result<Stmt<'a>> {
        let location = self.cur.location;
        match self.cur.kind {
            TokenKind::Semi => {
                self.bump()?;
                Ok(Stmt::new(StmtKind::Empty, location))
            }
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Auto => self.parse_auto_decl(),
            TokenKind::Extrn => self.parse_extern_decl_stmt(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                self.bump()?;
                self.expect(TokenKind::Semi, ErrorCode::StmtSyntax)?;
                Ok(Stmt::new(StmtKind::Break, location))
            }
            TokenKind::Continue => {
                self.bump()?;
                self.expect(TokenKind::Semi, ErrorCode::StmtSyntax)?;
                Ok(Stmt::new(StmtKind::Continue, location))
            }
            TokenKind::Goto => {
                self.bump()?;
                let (name, _) = self.expect_ident(ErrorCode::StmtSyntax)?;
                self.expect(TokenKind::Semi, ErrorCode::StmtSyntax)?;
                Ok(Stmt::new(StmtKind::Goto(name), location))
            }
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Case => self.parse_case(),
            TokenKind::Default => self.parse_default(),
            TokenKind::Ident if self.peek2_kind()? == TokenKind::Colon => {
                let (name, _) = self.expect_ident(ErrorCode::StmtSyntax)?;
                self.expect(TokenKind::Colon, ErrorCode::StmtSyntax)?;
                let body = self.parse_stmt()?;
                Ok(Stmt::new(StmtKind::Label(name, self.arena.alloc(body)), location))
            }
            _ => {
                let e = self.parse_expr()?;
                self.expect(TokenKind::Semi, ErrorCode::StmtSyntax)?;
                Ok(Stmt::new(StmtKind::Expr(self.arena.alloc(e)), location))
            }
        }
    }

    fn parse_auto_decl(&mut self) -> Result<Stmt<'a>> {
        let location = self.cur.location;
        self.expect(TokenKind::Auto, ErrorCode::StmtSyntax)?;
        let mut items = Vec::new();
        loop {
            let (name, item_loc) = self.expect_ident(ErrorCode::StmtSyntax)?;
            let size = if self.cur.kind == TokenKind::Number {
                let tok = self.bump()?;
                Some(&*self.arena.alloc(Expr::new(ExprKind::Num(tok.value), tok.location)))
            } else {
                None
            };
            if self.cur.kind == TokenKind::LBracket {
                return Err(self.err(
                    ErrorCode::StmtSyntax,
                    "bracketed size not allowed in an auto declaration; use a bare number",
                ));
            }
            items.push(DeclItem {
                name,
                size,
                location: item_loc,
            });
            if !self.accept(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::Semi, ErrorCode::StmtSyntax)?;
        Ok(Stmt::new(StmtKind::AutoDecl(self.arena.alloc_slice(items)), location))
    }

    fn parse_extern_decl_stmt(&mut self) -> Result<Stmt<'a>> {
        let location = self.cur.location;
        self.expect(TokenKind::Extrn, ErrorCode::StmtSyntax)?;
        let mut names = Vec::new();
        loop {
            let (name, _) = self.expect_ident(ErrorCode::StmtSyntax)?;
            names.push(name);
            if !self.accept(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::Semi, ErrorCode::StmtSyntax)?;
        Ok(Stmt::new(StmtKind::ExternDecl(self.arena.alloc_slice(names)), location))
    }

    fn parse_if(&mut self) -> Result<Stmt<'a>> {
        let location = self.cur.location;
        self.expect(TokenKind::If, ErrorCode::StmtSyntax)?;
        self.expect(TokenKind::LParen, ErrorCode::StmtSyntax)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, ErrorCode::StmtSyntax)?;
        let then_s = self.parse_stmt()?;
        let else_s = if self.accept(TokenKind::Else)? {
            Some(&*self.arena.alloc(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::new(
            StmtKind::If(self.arena.alloc(cond), self.arena.alloc(then_s), else_s),
            location,
        ))
    }

    fn parse_while(&mut self) -> Result<Stmt<'a>> {
        let location = self.cur.location;
        self.expect(TokenKind::While, ErrorCode::StmtSyntax)?;
        self.expect(TokenKind::LParen, ErrorCode::StmtSyntax)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, ErrorCode::StmtSyntax)?;
        let body = self.parse_stmt()?;
        Ok(Stmt::new(
            StmtKind::While(self.arena.alloc(cond), self.arena.alloc(body)),
            location,
        ))
    }

    fn parse_return(&mut self) -> Result<Stmt<'a>> {
        let location = self.cur.location;
        self.expect(TokenKind::Return, ErrorCode::StmtSyntax)?;
        let value = if self.accept(TokenKind::LParen)? {
            let e = if self.cur.kind != TokenKind::RParen {
                Some(self.parse_expr()?)
            } else {
                None
            };
            self.expect(TokenKind::RParen, ErrorCode::StmtSyntax)?;
            e
        } else {
            None
        };
        self.expect(TokenKind::Semi, ErrorCode::StmtSyntax)?;
        Ok(Stmt::new(StmtKind::Return(value.map(|e| &*self.arena.alloc(e))), location))
    }

    fn parse_switch(&mut self) -> Result<Stmt<'a>> {
        let location = self.cur.location;
        self.expect(TokenKind::Switch, ErrorCode::StmtSyntax)?;
        self.expect(TokenKind::LParen, ErrorCode::StmtSyntax)?;
        let e = self.parse_expr()?;
        self.expect(TokenKind::RParen, ErrorCode::StmtSyntax)?;
        self.switch_depth += 1;
        let body = self.parse_stmt();
        self.switch_depth -= 1;
        let body = body?;
        Ok(Stmt::new(
            StmtKind::Switch(self.arena.alloc(e), self.arena.alloc(body)),
            location,
        ))
    }

    fn parse_case(&mut self) -> Result<Stmt<'a>> {
        let location = self.cur.location;
        if self.switch_depth == 0 {
            return Err(self.err(ErrorCode::StmtSyntax, "case outside a switch body"));
        }
        self.expect(TokenKind::Case, ErrorCode::StmtSyntax)?;
        let label = self.parse_case_label()?;
        self.expect(TokenKind::Colon, ErrorCode::StmtSyntax)?;
        let body = self.parse_stmt()?;
        Ok(Stmt::new(StmtKind::Case(label, self.arena.alloc(body)), location))
    }

    fn parse_default(&mut self) -> Result<Stmt<'a>> {
        let location = self.cur.location;
        if self.switch_depth == 0 {
            return Err(self.err(ErrorCode::StmtSyntax, "default outside a switch body"));
        }
        self.expect(TokenKind::Default, ErrorCode::StmtSyntax)?;
        self.expect(TokenKind::Colon, ErrorCode::StmtSyntax)?;
        let body = self.parse_stmt()?;
        Ok(Stmt::new(StmtKind::Case(CaseLabel::Default, self.arena.alloc(body)), location))
    }

    fn parse_case_label(&mut self) -> Result<CaseLabel> {
        let relop = match self.cur.kind {
            TokenKind::Lt => Some(RelOp::Lt),
            TokenKind::Le => Some(RelOp::Le),
            TokenKind::Gt => Some(RelOp::Gt),
            TokenKind::Ge => Some(RelOp::Ge),
            TokenKind::Eq => Some(RelOp::Eq),
            TokenKind::Ne => Some(RelOp::Ne),
            _ => None,
        };
        if let Some(relop) = relop {
            self.bump()?;
            let val = self.parse_case_const()?;
            return Ok(CaseLabel::Value {
                lo: val,
                hi: val,
                relop: Some(relop),
            });
        }
        let lo = self.parse_case_const()?;
        if self.accept(TokenKind::Comma)? {
            let hi = self.parse_case_const()?;
            Ok(CaseLabel::Value { lo, hi, relop: None })
        } else {
            Ok(CaseLabel::Value {
                lo,
                hi: lo,
                relop: None,
            })
        }
    }

    fn parse_case_const(&mut self) -> Result<i64> {
        let location = self.cur.location;
        let e = self.parse_ternary()?;
        fold_const(&e, None)
            .ok_or_else(|| BccError::new(ErrorCode::StmtSyntax, location, "case label is not a constant expression"))
    }

    // --- expressions ---------------------------------------------------------------

    fn parse_expr(&mut self) -> Result<Expr<'a>> {
        let mut lhs = self.parse_assign()?;
        while self.cur.kind == TokenKind::Comma {
            let location = self.cur.location;
            self.bump()?;
            let rhs = self.parse_assign()?;
            lhs = Expr::new(ExprKind::Comma(self.arena.alloc(lhs), self.arena.alloc(rhs)), location);
        }
        Ok(lhs)
    }

    fn parse_assign(&mut self) -> Result<Expr<'a>> {
        let lhs = self.parse_ternary()?;
        if let Some(op) = assign_op_for(self.cur.kind) {
            let location = self.cur.location;
            if !lhs.is_lvalue() {
                return Err(BccError::new(
                    ErrorCode::NotLvalue,
                    lhs.location,
                    "left side of assignment is not an lvalue",
                ));
            }
            self.bump()?;
            let rhs = self.parse_assign()?;
            return Ok(Expr::new(
                ExprKind::Assign(op, self.arena.alloc(lhs), self.arena.alloc(rhs)),
                location,
            ));
        }
        Ok(lhs)
    }

    fn parse_ternary(&mut self) -> Result<Expr<'a>> {
        let cond = self.parse_binary(MIN_BINARY_PREC)?;
        if self.cur.kind == TokenKind::Question {
            let location = self.cur.location;
            self.bump()?;
            let then_e = self.parse_assign()?;
            self.expect(TokenKind::Colon, ErrorCode::ExprSyntax)?;
            let else_e = self.parse_ternary()?;
            return Ok(Expr::new(
                ExprKind::Ternary(
                    self.arena.alloc(cond),
                    self.arena.alloc(then_e),
                    self.arena.alloc(else_e),
                ),
                location,
            ));
        }
        Ok(cond)
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr<'a>> {
        let mut lhs = self.parse_unary()?;
        loop {
            let prec = binary_prec(self.cur.kind);
            if prec == 0 || prec < min_prec {
                break;
            }
            let op = binary_op_for(self.cur.kind).expect("prec > 0 implies a binary op token");
            let location = self.cur.location;
            self.bump()?;
            let rhs = self.parse_binary(prec + 1)?;
            lhs = Expr::new(ExprKind::Binary(op, self.arena.alloc(lhs), self.arena.alloc(rhs)), location);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr<'a>> {
        let location = self.cur.location;
        let op = match self.cur.kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Star => Some(UnaryOp::Deref),
            TokenKind::Amp => Some(UnaryOp::AddrOf),
            TokenKind::PlusPlus => Some(UnaryOp::PreInc),
            TokenKind::MinusMinus => Some(UnaryOp::PreDec),
            _ => None,
        };
        if let Some(op) = op {
            self.bump()?;
            let operand = self.parse_unary()?;
            if matches!(op, UnaryOp::AddrOf | UnaryOp::PreInc | UnaryOp::PreDec) && !operand.is_lvalue() {
                return Err(BccError::new(
                    ErrorCode::NotLvalue,
                    operand.location,
                    "operand is not an lvalue",
                ));
            }
            return Ok(Expr::new(ExprKind::UnaryPrefix(op, self.arena.alloc(operand)), location));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr<'a>> {
        let mut e = self.parse_primary()?;
        loop {
            match self.cur.kind {
                TokenKind::LBracket => {
                    self.bump()?;
                    let idx = self.parse_expr()?;
                    self.expect(TokenKind::RBracket, ErrorCode::ExprSyntax)?;
                    let loc = e.location;
                    e = Expr::new(ExprKind::Index(self.arena.alloc(e), self.arena.alloc(idx)), loc);
                }
                TokenKind::LParen => {
                    self.bump()?;
                    let mut args = Vec::new();
                    if self.cur.kind != TokenKind::RParen {
                        loop {
                            args.push(&*self.arena.alloc(self.parse_assign()?));
                            if !self.accept(TokenKind::Comma)? {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RParen, ErrorCode::ExprSyntax)?;
                    let loc = e.location;
                    e = Expr::new(ExprKind::Call(self.arena.alloc(e), self.arena.alloc_slice(args)), loc);
                }
                TokenKind::PlusPlus => {
                    if !e.is_lvalue() {
                        return Err(BccError::new(ErrorCode::NotLvalue, e.location, "operand is not an lvalue"));
                    }
                    self.bump()?;
                    let loc = e.location;
                    e = Expr::new(ExprKind::UnaryPostfix(UnaryOp::PostInc, self.arena.alloc(e)), loc);
                }
                TokenKind::MinusMinus => {
                    if !e.is_lvalue() {
                        return Err(BccError::new(ErrorCode::NotLvalue, e.location, "operand is not an lvalue"));
                    }
                    self.bump()?;
                    let loc = e.location;
                    e = Expr::new(ExprKind::UnaryPostfix(UnaryOp::PostDec, self.arena.alloc(e)), loc);
                }
                _ => break,
            }
        }
        Ok(e)
    }

    fn parse_primary(&mut self) -> Result<Expr<'a>> {
        let location = self.cur.location;
        match self.cur.kind {
            TokenKind::Number => {
                let tok = self.bump()?;
                Ok(Expr::new(ExprKind::Num(tok.value), location))
            }
            TokenKind::Char => {
                let tok = self.bump()?;
                Ok(Expr::new(ExprKind::Num(tok.value), location))
            }
            TokenKind::String => {
                let tok = self.bump()?;
                Ok(Expr::new(
                    ExprKind::Str(tok.lexeme.expect("string token always carries a lexeme")),
                    location,
                ))
            }
            TokenKind::Ident => {
                let tok = self.bump()?;
                Ok(Expr::new(
                    ExprKind::Var(tok.lexeme.expect("ident token always carries a lexeme")),
                    location,
                ))
            }
            TokenKind::LParen => {
                self.bump()?;
                let e = self.parse_expr()?;
                self.expect(TokenKind::RParen, ErrorCode::ExprSyntax)?;
                Ok(e)
            }
            _ => Err(self.err(
                ErrorCode::ExprSyntax,
                format!("expected an expression, found {:?}", self.cur.kind),
            )),
        }
    }
}

const MIN_BINARY_PREC: u8 = 2;

fn binary_prec(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::BarBar => 2,
        TokenKind::Eq | TokenKind::Ne => 3,
        TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => 4,
        TokenKind::Plus | TokenKind::Minus | TokenKind::LShift | TokenKind::RShift => 5,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 6,
        TokenKind::Bar => 7,
        TokenKind::Amp => 8,
        _ => 0,
    }
}

fn binary_op_for(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::BarBar => BinaryOp::LogicalOr,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::Ne => BinaryOp::Ne,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Le => BinaryOp::Le,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::Ge => BinaryOp::Ge,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::LShift => BinaryOp::Shl,
        TokenKind::RShift => BinaryOp::Shr,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Bar => BinaryOp::Or,
        TokenKind::Amp => BinaryOp::And,
        _ => return None,
    })
}

fn assign_op_for(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Assign => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Mod,
        TokenKind::AndEq => AssignOp::And,
        TokenKind::OrEq => AssignOp::Or,
        TokenKind::LShiftEq => AssignOp::Shl,
        TokenKind::RShiftEq => AssignOp::Shr,
        TokenKind::LtEq => AssignOp::Rel(RelOp::Lt),
        TokenKind::LeEq => AssignOp::Rel(RelOp::Le),
        TokenKind::GtEq => AssignOp::Rel(RelOp::Gt),
        TokenKind::GeEq => AssignOp::Rel(RelOp::Ge),
        TokenKind::EqEq => AssignOp::Rel(RelOp::Eq),
        TokenKind::NeEq => AssignOp::Rel(RelOp::Ne),
        _ => return None,
    })
}
