//! Statement lowering, including the switch dispatch-table scaffold that
//! lets case labels sit anywhere inside a switch body — even nested inside
//! an `if` or `while` — while emitting portable C.

use std::fmt::Write;

use bcc_syntax::ast::{CaseLabel, Expr, RelOp, Stmt, StmtKind};

use crate::context::{EmitContext, VarShape};
use crate::emit::expr::lower_expr;

fn pad(indent: usize) -> String {
    "    ".repeat(indent)
}

fn relop_c(op: RelOp) -> &'static str {
    match op {
        RelOp::Eq => "==",
        RelOp::Ne => "!=",
        RelOp::Lt => "<",
        RelOp::Le => "<=",
        RelOp::Gt => ">",
        RelOp::Ge => ">=",
    }
}

/// Entry point for lowering a function body or any standalone statement
/// outside of switch context.
pub fn lower_top_stmt(ctx: &mut EmitContext, out: &mut String, indent: usize, s: &Stmt) {
    lower_stmt(ctx, out, indent, s, None);
}

fn lower_stmt(
    ctx: &mut EmitContext,
    out: &mut String,
    indent: usize,
    s: &Stmt,
    mut sw: Option<(u32, &mut u32)>,
) {
    let p = pad(indent);
    match &s.kind {
        StmtKind::Empty => {
            writeln!(out, "{p};").unwrap();
        }
        StmtKind::Block(stmts) => {
            writeln!(out, "{p}{{").unwrap();
            for st in *stmts {
                let re = sw.as_mut().map(|t| (t.0, &mut *t.1));
                lower_stmt(ctx, out, indent + 1, st, re);
            }
            writeln!(out, "{p}}}").unwrap();
        }
        StmtKind::AutoDecl(items) => {
            for item in *items {
                let name = ctx.mangle_var(item.name);
                match item.size {
                    None => {
                        ctx.bind_local(item.name, VarShape::Scalar);
                        writeln!(out, "{p}word {name} = 0;").unwrap();
                    }
                    Some(size_expr) => {
                        let size_text = lower_expr(ctx, size_expr);
                        ctx.bind_local(item.name, VarShape::Pointer);
                        writeln!(
                            out,
                            "{p}word __{name}_store[({size_text}) + 1]; word {name} = B_ADDR(__{name}_store[0]);"
                        )
                        .unwrap();
                    }
                }
            }
        }
        StmtKind::ExternDecl(_names) => {
            // No function-local storage: these names just resolve to their
            // already-declared global spelling via `EmitContext::shape_of`.
        }
        StmtKind::If(cond, then_b, else_b) => {
            let c = lower_expr(ctx, cond);
            writeln!(out, "{p}if ({c})").unwrap();
            let re_then = sw.as_mut().map(|t| (t.0, &mut *t.1));
            lower_stmt(ctx, out, indent, then_b, re_then);
            if let Some(eb) = else_b {
                writeln!(out, "{p}else").unwrap();
                let re_else = sw.as_mut().map(|t| (t.0, &mut *t.1));
                lower_stmt(ctx, out, indent, eb, re_else);
            }
        }
        StmtKind::While(cond, body) => {
            let c = lower_expr(ctx, cond);
            writeln!(out, "{p}while ({c})").unwrap();
            let re = sw.as_mut().map(|t| (t.0, &mut *t.1));
            lower_stmt(ctx, out, indent, body, re);
        }
        StmtKind::Return(value) => match value {
            Some(e) => {
                let v = lower_expr(ctx, e);
                writeln!(out, "{p}return {v};").unwrap();
            }
            None => {
                writeln!(out, "{p}return 0;").unwrap();
            }
        },
        StmtKind::Expr(e) => {
            let v = lower_expr(ctx, e);
            writeln!(out, "{p}{v};").unwrap();
        }
        StmtKind::Break => {
            writeln!(out, "{p}break;").unwrap();
        }
        StmtKind::Continue => {
            writeln!(out, "{p}continue;").unwrap();
        }
        StmtKind::Goto(name) => {
            let mangled = ctx.mangle_var(*name);
            writeln!(out, "{p}goto {mangled};").unwrap();
        }
        StmtKind::Label(name, inner) => {
            let mangled = ctx.mangle_var(*name);
            writeln!(out, "{p}{mangled}:;").unwrap();
            lower_stmt(ctx, out, indent, inner, sw);
        }
        StmtKind::Switch(discriminant, body) => {
            lower_switch(ctx, out, indent, discriminant, body);
        }
        StmtKind::Case(_label, inner) => {
            if let Some((sid, counter)) = sw.as_mut() {
                let i = **counter;
                **counter += 1;
                writeln!(out, "{p}__bsw{sid}_case{i}:;").unwrap();
            }
            lower_stmt(ctx, out, indent, inner, sw);
        }
    }
}

fn lower_switch(ctx: &mut EmitContext, out: &mut String, indent: usize, discriminant: &Expr, body: &Stmt) {
    let sid = ctx.next_switch_id();
    let p = pad(indent);

    let mut cases = Vec::new();
    collect_cases(body, &mut cases);

    let disc_text = lower_expr(ctx, discriminant);
    writeln!(out, "{p}for (;;) {{").unwrap();
    writeln!(out, "{p}    word __sw{sid} = {disc_text};").unwrap();
    writeln!(out, "{p}    goto __bsw{sid}_dispatch;").unwrap();

    let mut counter = 0u32;
    lower_stmt(ctx, out, indent + 1, body, Some((sid, &mut counter)));

    writeln!(out, "{p}    goto __bsw{sid}_end;").unwrap();
    writeln!(out, "{p}  __bsw{sid}_dispatch: ;").unwrap();
    // Value cases are tested first, regardless of where `default` sits in
    // source order; `default`'s jump is unconditional, so emitting it any
    // earlier would make every later test unreachable dead code.
    for (i, label) in cases.iter().enumerate() {
        if let CaseLabel::Value { lo, hi, relop } = label {
            let cond = match relop {
                None if lo == hi => format!("__sw{sid} == {lo}"),
                None => format!("(__sw{sid} >= {lo} && __sw{sid} <= {hi})"),
                Some(op) => format!("(__sw{sid} {} {lo})", relop_c(*op)),
            };
            writeln!(out, "{p}    if ({cond}) goto __bsw{sid}_case{i};").unwrap();
        }
    }
    for (i, label) in cases.iter().enumerate() {
        if let CaseLabel::Default = label {
            writeln!(out, "{p}    goto __bsw{sid}_case{i};").unwrap();
        }
    }
    writeln!(out, "{p}    goto __bsw{sid}_end;").unwrap();
    writeln!(out, "{p}  __bsw{sid}_end: ;").unwrap();
    writeln!(out, "{p}    break;").unwrap();
    writeln!(out, "{p}}}").unwrap();
}

/// Collects every `case`/`default` label reachable from a switch body
/// without descending into a nested switch's own body.
fn collect_cases<'a>(stmt: &'a Stmt<'a>, out: &mut Vec<CaseLabel>) {
    match &stmt.kind {
        StmtKind::Case(label, inner) => {
            out.push(*label);
            collect_cases(inner, out);
        }
        StmtKind::Block(stmts) => {
            for st in *stmts {
                collect_cases(st, out);
            }
        }
        StmtKind::If(_, then_b, else_b) => {
            collect_cases(then_b, out);
            if let Some(eb) = else_b {
                collect_cases(eb, out);
            }
        }
        StmtKind::While(_, body) => collect_cases(body, out),
        StmtKind::Label(_, inner) => collect_cases(inner, out),
        StmtKind::Switch(_, _) => {}
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_base::span::Location;
    use bcc_base::{Arena, Interner};
    use bcc_syntax::ast::ExprKind;
    use crate::context::CompileOptions;

    fn loc(interner: &mut Interner) -> Location {
        let file = interner.intern("t.b");
        Location::new(file, 1, 1)
    }

    #[test]
    fn switch_with_point_and_default_cases_builds_dispatch_table() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let x = interner.intern("x");
        let mut ctx = EmitContext::new(&interner, CompileOptions::default());

        let xe = arena.alloc(Expr::new(ExprKind::Var(x), l));
        let ret100 = arena.alloc(Stmt::new(
            StmtKind::Return(Some(arena.alloc(Expr::new(ExprKind::Num(100), l)))),
            l,
        ));
        let case1 = arena.alloc(Stmt::new(
            StmtKind::Case(CaseLabel::Value { lo: 1, hi: 1, relop: None }, ret100),
            l,
        ));
        let retneg1 = arena.alloc(Stmt::new(
            StmtKind::Return(Some(arena.alloc(Expr::new(ExprKind::Num(-1), l)))),
            l,
        ));
        let default_case = arena.alloc(Stmt::new(StmtKind::Case(CaseLabel::Default, retneg1), l));
        let body = arena.alloc(Stmt::new(StmtKind::Block(arena.alloc_slice([&*case1, &*default_case])), l));
        let switch = Stmt::new(StmtKind::Switch(xe, body), l);

        let mut out = String::new();
        lower_top_stmt(&mut ctx, &mut out, 0, &switch);

        assert!(out.contains("__bsw1_case0:"));
        assert!(out.contains("__bsw1_case1:"));
        assert!(out.contains("if (__sw1 == 1) goto __bsw1_case0;"));
        assert!(out.contains("goto __bsw1_case1;"));
        assert!(out.contains("__bsw1_end"));
    }

    #[test]
    fn default_before_a_value_case_does_not_shadow_it_in_the_dispatch_table() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let x = interner.intern("x");
        let mut ctx = EmitContext::new(&interner, CompileOptions::default());

        let xe = arena.alloc(Expr::new(ExprKind::Var(x), l));
        let retneg1 = arena.alloc(Stmt::new(
            StmtKind::Return(Some(arena.alloc(Expr::new(ExprKind::Num(-1), l)))),
            l,
        ));
        let default_case = arena.alloc(Stmt::new(StmtKind::Case(CaseLabel::Default, retneg1), l));
        let ret100 = arena.alloc(Stmt::new(
            StmtKind::Return(Some(arena.alloc(Expr::new(ExprKind::Num(100), l)))),
            l,
        ));
        let case1 = arena.alloc(Stmt::new(
            StmtKind::Case(CaseLabel::Value { lo: 1, hi: 1, relop: None }, ret100),
            l,
        ));
        // default textually first, the value case second.
        let body = arena.alloc(Stmt::new(StmtKind::Block(arena.alloc_slice([&*default_case, &*case1])), l));
        let switch = Stmt::new(StmtKind::Switch(xe, body), l);

        let mut out = String::new();
        lower_top_stmt(&mut ctx, &mut out, 0, &switch);

        let if_pos = out.find("if (__sw1 == 1) goto __bsw1_case1;").expect("value test emitted");
        let default_goto_pos = out
            .match_indices("goto __bsw1_case0;")
            .next()
            .expect("default goto emitted")
            .0;
        assert!(
            if_pos < default_goto_pos,
            "value case test must run before default's unconditional jump, \
             regardless of source order: if@{if_pos} default@{default_goto_pos}\n{out}"
        );
    }
}
