//! Program-level emission: orchestrates storage, statement, and expression
//! lowering into one self-contained C translation unit.

pub mod expr;
pub mod storage;
pub mod stmt;

use std::fmt::Write;

use bcc_base::Symbol;
use bcc_syntax::ast::{Program, Stmt, Top};

use crate::context::{EmitContext, VarShape};
use crate::runtime;

/// Renders a whole [`Program`] to a single, self-contained C source string:
/// the embedded runtime prelude, the string pool, storage declarations and
/// init routine, function definitions, and a synthesized `main`.
pub fn emit_program_c(ctx: &mut EmitContext, program: &Program) -> String {
    // `main` gets a fixed spelling rather than the general mangling rules,
    // decided up front so every reference (including a self-recursive
    // call) agrees.
    for item in program.items {
        if let Top::Function { name, .. } = item {
            if ctx.text(*name) == "main" {
                ctx.force_mangle(*name, "__b_user_main");
            }
        }
    }

    let mut decls = String::new();
    let mut init_body = String::new();
    let mut functions = String::new();
    let mut main_params = 0usize;
    let mut saw_main = false;

    for item in program.items {
        match item {
            Top::ExternDef(ext) => {
                storage::emit_extern(ctx, ext, &mut decls, &mut init_body);
            }
            Top::ExternDecl(names, _) => {
                for n in *names {
                    let mangled = ctx.mangle_var(*n);
                    writeln!(decls, "extern word {mangled};").unwrap();
                }
            }
            Top::GlobalAuto(stmt) => {
                stmt::lower_top_stmt(ctx, &mut init_body, 1, stmt);
            }
            Top::Function { .. } => {
                // Emitted below, once every global's storage shape is known.
            }
        }
    }

    for item in program.items {
        if let Top::Function {
            name, params, body, ..
        } = item
        {
            if ctx.text(*name) == "main" {
                saw_main = true;
                main_params = params.len();
            }
            let mangled = ctx.mangle_var(*name);
            emit_function(ctx, &mut functions, &mangled, params, body);
        }
    }

    let mut output = String::new();
    output.push_str(&runtime::prelude(&ctx.options));
    ctx.strings.emit_decls(ctx.interner, &mut output);
    output.push('\n');
    output.push_str(&decls);
    output.push('\n');
    writeln!(output, "static void __b_init_file(void) {{").unwrap();
    output.push_str(&init_body);
    writeln!(output, "}}").unwrap();
    output.push('\n');
    output.push_str(&functions);
    output.push('\n');
    emit_main(&mut output, saw_main, main_params);
    output
}

fn emit_function(ctx: &mut EmitContext, out: &mut String, mangled: &str, params: &[Symbol], body: &Stmt) {
    ctx.push_scope();
    let param_names: Vec<String> = params
        .iter()
        .map(|p| {
            let n = ctx.mangle_var(*p);
            ctx.bind_local(*p, VarShape::Scalar);
            n
        })
        .collect();
    let param_list = if param_names.is_empty() {
        "void".to_string()
    } else {
        param_names
            .iter()
            .map(|n| format!("word {n}"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    writeln!(out, "word {mangled}({param_list})").unwrap();
    stmt::lower_top_stmt(ctx, out, 0, body);
    ctx.pop_scope();
}

/// A user `main` accepts 0, 1, or 2 parameters; the 2-parameter form's argv
/// is not reconstructed as a raw B vector — programs wanting individual
/// arguments use `argc()`/`argv(i)` directly instead, matching the
/// accessor-based shape the rest of the runtime already exposes.
fn emit_main(out: &mut String, saw_main: bool, main_params: usize) {
    writeln!(out, "int main(int argc, char **argv) {{").unwrap();
    writeln!(out, "    __b_setargs(argc, argv);").unwrap();
    writeln!(out, "    __b_init();").unwrap();
    writeln!(out, "    __b_init_file();").unwrap();
    if saw_main {
        let call = match main_params {
            0 => "__b_user_main()".to_string(),
            1 => "__b_user_main(b_argc())".to_string(),
            _ => "__b_user_main(b_argc(), 0)".to_string(),
        };
        writeln!(out, "    return (int){call};").unwrap();
    } else {
        writeln!(out, "    return 0;").unwrap();
    }
    writeln!(out, "}}").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_base::span::Location;
    use bcc_base::{Arena, Interner};
    use bcc_syntax::ast::{Expr, ExprKind, StmtKind};
    use crate::context::CompileOptions;

    fn loc(interner: &mut Interner) -> Location {
        let file = interner.intern("t.b");
        Location::new(file, 1, 1)
    }

    #[test]
    fn main_is_renamed_and_wired_into_synthesized_main() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let main_sym = interner.intern("main");

        let ret0 = arena.alloc(Stmt::new(
            StmtKind::Return(Some(arena.alloc(Expr::new(ExprKind::Num(0), l)))),
            l,
        ));
        let body = arena.alloc(Stmt::new(StmtKind::Block(arena.alloc_slice([&*ret0])), l));
        let items = arena.alloc_slice([Top::Function {
            name: main_sym,
            params: &[],
            body,
            location: l,
        }]);
        let program = Program { items };

        let mut ctx = EmitContext::new(&interner, CompileOptions::default());
        let out = emit_program_c(&mut ctx, &program);

        assert!(out.contains("word __b_user_main(void)"));
        assert!(out.contains("__b_user_main()"));
        assert!(out.contains("int main(int argc, char **argv)"));
    }
}
