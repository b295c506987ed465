//! Two-pass semantic analysis.
//!
//! Pass one collects every top-level name so a function body can reference
//! something defined later in the file. Pass two walks each function body,
//! resolving names against the scope chain, promoting unresolved bare
//! variable references to implicit statics, and scanning `switch` bodies
//! for suspicious case-label adjacency.

use bcc_base::diag::{BccError, ErrorCode, Result};
use bcc_base::span::Location;
use bcc_base::{Arena, Interner, Symbol};
use bcc_syntax::ast::{Expr, ExprKind, ExternItem, ExternVariant, Program, Stmt, StmtKind, Top};
use bcc_syntax::fold::fold_const;
use rustc_hash::FxHashSet;

use crate::builtins::BUILTIN_NAMES;
use crate::scope::{ScopeStack, SymbolInfo, SymbolKind, SymbolPayload};

/// A non-fatal diagnostic: the analysis continues, but the driver should
/// still surface it to the user.
pub struct Warning {
    pub location: Location,
    pub message: String,
}

pub struct Analyzed<'a> {
    pub program: Program<'a>,
    pub warnings: Vec<Warning>,
}

pub struct Analyzer<'a, 'i> {
    arena: &'a Arena,
    interner: &'i mut Interner,
    scopes: ScopeStack,
    warnings: Vec<Warning>,
    implicit_statics: Vec<(Symbol, Location)>,
    seen_implicit: FxHashSet<Symbol>,
    extern_decls: FxHashSet<Symbol>,
}

impl<'a, 'i> Analyzer<'a, 'i> {
    pub fn new(arena: &'a Arena, interner: &'i mut Interner) -> Self {
        Analyzer {
            arena,
            interner,
            scopes: ScopeStack::new(),
            warnings: Vec::new(),
            implicit_statics: Vec::new(),
            seen_implicit: FxHashSet::default(),
            extern_decls: FxHashSet::default(),
        }
    }

    pub fn analyze(mut self, program: &Program<'a>) -> Result<Analyzed<'a>> {
        self.scopes.push_scope();
        self.install_builtins();
        self.pass1(program)?;
        self.pass2(program)?;
        self.scopes.pop_scope();

        let augmented = self.augment_with_implicit_statics(program);
        Ok(Analyzed {
            program: augmented,
            warnings: self.warnings,
        })
    }

    fn install_builtins(&mut self) {
        for name in BUILTIN_NAMES {
            let sym = self.interner.intern(name);
            let loc = Location::new(Symbol::EMPTY, 0, 0);
            // A duplicate here would mean two builtins share a name — a
            // programming error in BUILTIN_NAMES, not user input, so the
            // result is discarded rather than propagated.
            let _ = self.scopes.bind(
                SymbolInfo::new(SymbolKind::Func, sym, loc, SymbolPayload::Func { arity: 0 })
                    .extern_of(),
            );
        }
    }

    // --- pass 1: forward collection ---------------------------------------------

    fn pass1(&mut self, program: &Program<'a>) -> Result<()> {
        for item in program.items {
            match item {
                Top::GlobalAuto(stmt) => self.pass1_global_auto(stmt)?,
                Top::Function { name, params, location, .. } => {
                    self.scopes.bind(SymbolInfo::new(
                        SymbolKind::Func,
                        *name,
                        *location,
                        SymbolPayload::Func { arity: params.len() },
                    ))?;
                }
                Top::ExternDef(item) => self.pass1_extern_def(item)?,
                Top::ExternDecl(names, location) => {
                    for name in *names {
                        self.extern_decls.insert(*name);
                        // An explicit top-level `extrn` also occupies the
                        // global scope so later lookups succeed.
                        let _ = self.scopes.bind(
                            SymbolInfo::new(SymbolKind::Var, *name, *location, SymbolPayload::Scalar)
                                .extern_of(),
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn pass1_global_auto(&mut self, stmt: &Stmt<'a>) -> Result<()> {
        if let StmtKind::AutoDecl(items) = stmt.kind {
            for item in items {
                let bound = match item.size {
                    Some(e) => Some(self.fold_bound(e)?),
                    None => None,
                };
                let payload = match bound {
                    Some(b) => SymbolPayload::Vector { bound: Some(b) },
                    None => SymbolPayload::Scalar,
                };
                self.scopes
                    .bind(SymbolInfo::new(SymbolKind::Var, item.name, item.location, payload))?;
            }
        }
        Ok(())
    }

    fn pass1_extern_def(&mut self, item: &'a ExternItem<'a>) -> Result<()> {
        let payload = match item.variant {
            ExternVariant::Scalar => SymbolPayload::Scalar,
            ExternVariant::Blob => SymbolPayload::Scalar,
            ExternVariant::Vector { bound, .. } => {
                let folded = match bound {
                    Some(e) => Some(self.fold_bound(e)?),
                    None => None,
                };
                SymbolPayload::Vector { bound: folded }
            }
        };
        self.scopes
            .bind(SymbolInfo::new(SymbolKind::Var, item.name, item.location, payload))?;
        Ok(())
    }

    fn fold_bound(&self, e: &Expr<'a>) -> Result<i64> {
        let v = fold_const(e, None).ok_or_else(|| {
            BccError::new(ErrorCode::StmtSyntax, e.location, "vector bound is not a constant expression")
        })?;
        if v < 0 {
            return Err(BccError::new(
                ErrorCode::ExternSyntax,
                e.location,
                "vector bound may not be negative",
            ));
        }
        Ok(v)
    }

    // --- pass 2: body check ------------------------------------------------------

    fn pass2(&mut self, program: &Program<'a>) -> Result<()> {
        for item in program.items {
            if let Top::Function { params, body, .. } = item {
                self.extern_decls.clear();
                self.scopes.push_scope();
                for p in *params {
                    let _ = self
                        .scopes
                        .bind(SymbolInfo::new(SymbolKind::Var, *p, body.location, SymbolPayload::Scalar));
                }
                self.visit_stmt(body)?;
                self.scopes.pop_scope();
            }
        }
        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &Stmt<'a>) -> Result<()> {
        match stmt.kind {
            StmtKind::Empty | StmtKind::Break | StmtKind::Continue | StmtKind::Goto(_) => Ok(()),
            StmtKind::Block(items) => {
                self.scopes.push_scope();
                for s in items {
                    self.visit_stmt(s)?;
                }
                self.scopes.pop_scope();
                Ok(())
            }
            StmtKind::AutoDecl(items) => {
                for item in items {
                    self.scopes.bind(SymbolInfo::new(
                        SymbolKind::Var,
                        item.name,
                        item.location,
                        SymbolPayload::Scalar,
                    ))?;
                    if let Some(size) = item.size {
                        self.visit_expr(size)?;
                    }
                }
                Ok(())
            }
            StmtKind::ExternDecl(names) => {
                for name in names {
                    self.extern_decls.insert(*name);
                }
                Ok(())
            }
            StmtKind::If(cond, then_s, else_s) => {
                self.visit_expr(cond)?;
                self.visit_stmt(then_s)?;
                if let Some(else_s) = else_s {
                    self.visit_stmt(else_s)?;
                }
                Ok(())
            }
            StmtKind::While(cond, body) => {
                self.visit_expr(cond)?;
                self.visit_stmt(body)
            }
            StmtKind::Return(value) => {
                if let Some(e) = value {
                    self.visit_expr(e)?;
                }
                Ok(())
            }
            StmtKind::Expr(e) => self.visit_expr(e),
            StmtKind::Label(name, inner) => {
                self.scopes
                    .bind(SymbolInfo::new(SymbolKind::Label, name, stmt.location, SymbolPayload::Label))?;
                self.visit_stmt(inner)
            }
            StmtKind::Switch(e, body) => {
                self.visit_expr(e)?;
                self.scan_fallthrough(body);
                self.visit_stmt(body)
            }
            StmtKind::Case(_, inner) => self.visit_stmt(inner),
        }
    }

    /// Scans a `switch` body for two case labels with no work between them —
    /// either a case whose body is immediately another case, or two adjacent
    /// case/default statements in the same block.
    fn scan_fallthrough(&mut self, stmt: &Stmt<'a>) {
        match stmt.kind {
            StmtKind::Case(_, inner) => {
                if is_case_like(inner) {
                    self.warnings.push(Warning {
                        location: inner.location,
                        message: "case label immediately follows another with no code between".to_string(),
                    });
                }
                self.scan_fallthrough(inner);
            }
            StmtKind::Block(items) => {
                for pair in items.windows(2) {
                    if is_case_like(pair[0]) && is_case_like(pair[1]) {
                        self.warnings.push(Warning {
                            location: pair[1].location,
                            message: "case label immediately follows another with no code between".to_string(),
                        });
                    }
                }
                for s in items {
                    self.scan_fallthrough(s);
                }
            }
            StmtKind::If(_, then_s, else_s) => {
                self.scan_fallthrough(then_s);
                if let Some(else_s) = else_s {
                    self.scan_fallthrough(else_s);
                }
            }
            StmtKind::While(_, body) => self.scan_fallthrough(body),
            StmtKind::Label(_, inner) => self.scan_fallthrough(inner),
            _ => {}
        }
    }

    fn visit_expr(&mut self, e: &Expr<'a>) -> Result<()> {
        match e.kind {
            ExprKind::Num(_) | ExprKind::Str(_) => Ok(()),
            ExprKind::Var(name) => {
                self.resolve_value_name(name, e.location);
                Ok(())
            }
            ExprKind::Call(callee, args) => {
                if let ExprKind::Var(name) = callee.kind {
                    self.resolve_call_name(name, callee.location)?;
                } else {
                    self.visit_expr(callee)?;
                }
                for a in args {
                    self.visit_expr(a)?;
                }
                Ok(())
            }
            ExprKind::Index(base, idx) => {
                self.visit_expr(base)?;
                self.visit_expr(idx)
            }
            ExprKind::UnaryPrefix(_, operand) | ExprKind::UnaryPostfix(_, operand) => self.visit_expr(operand),
            ExprKind::Binary(_, lhs, rhs) | ExprKind::Assign(_, lhs, rhs) | ExprKind::Comma(lhs, rhs) => {
                self.visit_expr(lhs)?;
                self.visit_expr(rhs)
            }
            ExprKind::Ternary(cond, then_e, else_e) => {
                self.visit_expr(cond)?;
                self.visit_expr(then_e)?;
                self.visit_expr(else_e)
            }
        }
    }

    fn resolve_value_name(&mut self, name: Symbol, location: Location) {
        if self.scopes.lookup(name).is_some() || self.extern_decls.contains(&name) {
            return;
        }
        if self.seen_implicit.insert(name) {
            self.implicit_statics.push((name, location));
        }
    }

    fn resolve_call_name(&mut self, name: Symbol, location: Location) -> Result<()> {
        if self.scopes.lookup(name).is_some() || self.extern_decls.contains(&name) {
            return Ok(());
        }
        Err(BccError::new(
            ErrorCode::Undefined,
            location,
            "call to an undeclared name",
        ))
    }

    fn augment_with_implicit_statics(&self, program: &Program<'a>) -> Program<'a> {
        if self.implicit_statics.is_empty() {
            return Program { items: program.items };
        }
        let mut items: Vec<Top<'a>> = program.items.to_vec();
        for (name, location) in &self.implicit_statics {
            let item = self.arena.alloc(ExternItem {
                name: *name,
                variant: ExternVariant::Scalar,
                initializer: None,
                is_implicit_static: true,
                location: *location,
            });
            items.push(Top::ExternDef(item));
        }
        Program {
            items: self.arena.alloc_slice(items),
        }
    }
}

fn is_case_like(stmt: &Stmt) -> bool {
    matches!(stmt.kind, StmtKind::Case(_, _))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_base::Interner;
    use bcc_syntax::parser::Parser;

    fn analyze_src(src: &'static str) -> Result<Analyzed<'static>> {
        let arena: &'static Arena = Box::leak(Box::new(Arena::new()));
        let interner: &'static mut Interner = Box::leak(Box::new(Interner::new()));
        let file = interner.intern("test.b");
        let mut parser = Parser::new(arena, interner, src, file).unwrap();
        let program = parser.parse_program().unwrap();
        let analyzer = Analyzer::new(arena, interner);
        analyzer.analyze(&program)
    }

    #[test]
    fn builtin_call_resolves_without_declaration() {
        let result = analyze_src("main() { putchar('a'); }");
        assert!(result.is_ok());
    }

    #[test]
    fn undeclared_call_target_is_an_error() {
        let err = analyze_src("main() { mystery(); }").unwrap_err();
        assert_eq!(err.code, ErrorCode::Undefined);
    }

    #[test]
    fn bare_unresolved_variable_is_promoted_not_rejected() {
        let analyzed = analyze_src("main() { return(count); }").unwrap();
        let promoted = analyzed
            .program
            .items
            .iter()
            .any(|t| matches!(t, Top::ExternDef(item) if item.is_implicit_static));
        assert!(promoted);
    }

    #[test]
    fn redeclared_local_is_rejected() {
        let err = analyze_src("main() { auto x; auto x; }").unwrap_err();
        assert_eq!(err.code, ErrorCode::Redeclared);
    }

    #[test]
    fn negative_vector_bound_is_rejected() {
        let err = analyze_src("v[-1];").unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternSyntax);
    }

    #[test]
    fn stacked_case_labels_emit_fallthrough_warning() {
        let analyzed = analyze_src("main() { auto x; switch (x) { case 1: case 2: break; } }").unwrap();
        assert!(!analyzed.warnings.is_empty());
    }

    #[test]
    fn function_forward_reference_resolves_in_pass_one() {
        let result = analyze_src("main() { helper(); } helper() { return(0); }");
        assert!(result.is_ok());
    }

    #[test]
    fn local_extrn_statement_suppresses_implicit_static_promotion() {
        let analyzed = analyze_src("main() { extrn g; return(g); }").unwrap();
        let promoted = analyzed
            .program
            .items
            .iter()
            .any(|t| matches!(t, Top::ExternDef(item) if item.is_implicit_static));
        assert!(!promoted);
    }
}
