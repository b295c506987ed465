//! Scalar/blob/vector storage emission and edge-subvector initialization.

use std::fmt::Write;

use bcc_syntax::ast::{Expr, ExprKind, ExternItem, ExternVariant, Init};
use bcc_syntax::fold::fold_const;

use crate::context::{EmitContext, VarShape};
use crate::emit::expr::lower_expr;

/// `max(len, 1)` — even an empty `{}` reserves one word.
fn nested_base_len(list: &[Init]) -> usize {
    list.len().max(1)
}

/// `nested_base_len(list) + sum(edge_words_total(child))` over list
/// children that are themselves nested lists.
fn edge_words_total(list: &[Init]) -> usize {
    let mut total = nested_base_len(list);
    for item in list {
        if let Init::List(children) = item {
            total += edge_words_total(children);
        }
    }
    total
}

/// The tail region a root initializer list needs, excluding its own base
/// length (already counted by the outer vector/blob length).
fn tail_words_for_root(list: &[Init]) -> usize {
    list.iter()
        .filter_map(|item| match item {
            Init::List(children) => Some(edge_words_total(children)),
            _ => None,
        })
        .sum()
}

/// Depth-first initializer pass: expressions assign directly, nested lists
/// get placed in the tail region with the parent slot holding their
/// address, and `cursor` tracks the next free tail index.
fn init_list(ctx: &mut EmitContext, out: &mut String, pad: &str, arr: &str, items: &[Init], base: usize, cursor: &mut usize) {
    for (j, item) in items.iter().enumerate() {
        let slot = base + j;
        match item {
            Init::Expr(e) => {
                let v = lower_expr(ctx, e);
                writeln!(out, "{pad}{arr}[{slot}] = {v};").unwrap();
            }
            Init::List(children) => {
                let child_base = *cursor;
                writeln!(out, "{pad}{arr}[{slot}] = B_ADDR({arr}[{child_base}]);").unwrap();
                *cursor += nested_base_len(children);
                init_list(ctx, out, pad, arr, children, child_base, cursor);
            }
        }
    }
}

/// Emits the storage declaration and init-routine statements for one
/// top-level external definition.
pub fn emit_extern(ctx: &mut EmitContext, item: &ExternItem, decls: &mut String, init: &mut String) {
    let name = ctx.mangle_var(item.name);
    match &item.variant {
        ExternVariant::Scalar => {
            ctx.declare_global(item.name, VarShape::Scalar);
            writeln!(decls, "word {name};").unwrap();
            let v = match &item.initializer {
                Some(Init::Expr(e)) => lower_expr(ctx, e),
                _ => "0".to_string(),
            };
            writeln!(init, "    {name} = {v};").unwrap();
        }
        ExternVariant::Blob => {
            ctx.declare_global(item.name, VarShape::Pointer);
            emit_blob(ctx, &name, item.initializer.as_ref(), decls, init);
        }
        ExternVariant::Vector {
            bound,
            has_empty_brackets,
            ..
        } => {
            ctx.declare_global(item.name, VarShape::Pointer);
            emit_vector(
                ctx,
                &name,
                *bound,
                *has_empty_brackets,
                item.initializer.as_ref(),
                decls,
                init,
            );
        }
    }
}

fn emit_blob(ctx: &mut EmitContext, name: &str, initializer: Option<&Init>, decls: &mut String, init: &mut String) {
    match initializer {
        Some(Init::Expr(e)) if matches!(e.kind, ExprKind::Str(_)) => {
            writeln!(decls, "word {name};").unwrap();
            let v = lower_expr(ctx, e);
            writeln!(init, "    {name} = {v};").unwrap();
        }
        Some(Init::Expr(e)) => {
            writeln!(decls, "static word __{name}_blob[1];").unwrap();
            writeln!(decls, "word {name};").unwrap();
            let v = lower_expr(ctx, e);
            writeln!(init, "    __{name}_blob[0] = {v};").unwrap();
            writeln!(init, "    {name} = B_ADDR(__{name}_blob[0]);").unwrap();
        }
        Some(Init::List(items)) => {
            let base_len = nested_base_len(items);
            let tail = tail_words_for_root(items);
            let total = base_len + tail;
            writeln!(decls, "static word __{name}_blob[{total}];").unwrap();
            writeln!(decls, "word {name};").unwrap();
            let mut cursor = base_len;
            let arr = format!("__{name}_blob");
            init_list(ctx, init, "    ", &arr, items, 0, &mut cursor);
            writeln!(init, "    {name} = B_ADDR(__{name}_blob[0]);").unwrap();
        }
        None => {
            writeln!(decls, "static word __{name}_blob[1];").unwrap();
            writeln!(decls, "word {name};").unwrap();
            writeln!(init, "    {name} = B_ADDR(__{name}_blob[0]);").unwrap();
        }
    }
}

fn emit_vector(
    ctx: &mut EmitContext,
    name: &str,
    bound: Option<&Expr>,
    has_empty_brackets: bool,
    initializer: Option<&Init>,
    decls: &mut String,
    init: &mut String,
) {
    let init_len = match initializer {
        Some(Init::List(items)) => items.len(),
        Some(Init::Expr(_)) => 1,
        None => 0,
    };
    let folded_bound = bound.and_then(|b| fold_const(b, ctx.options.word_width.fold_width()));
    let outer_len = if has_empty_brackets {
        init_len.max(1)
    } else {
        let from_bound = folded_bound.map(|b| (b + 1).max(0) as usize).unwrap_or(0);
        from_bound.max(init_len).max(1)
    };
    let tail = match initializer {
        Some(Init::List(items)) => tail_words_for_root(items),
        _ => 0,
    };
    let total = outer_len + tail;
    writeln!(decls, "static word __{name}_store[{total}];").unwrap();
    writeln!(decls, "word {name};").unwrap();
    match initializer {
        Some(Init::List(items)) => {
            let mut cursor = outer_len;
            let arr = format!("__{name}_store");
            init_list(ctx, init, "    ", &arr, items, 0, &mut cursor);
        }
        Some(Init::Expr(e)) => {
            let v = lower_expr(ctx, e);
            writeln!(init, "    __{name}_store[0] = {v};").unwrap();
        }
        None => {}
    }
    writeln!(init, "    {name} = B_ADDR(__{name}_store[0]);").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_base::span::Location;
    use bcc_base::{Arena, Interner};
    use bcc_syntax::ast::ExternVariant;
    use crate::context::CompileOptions;

    fn loc(interner: &mut Interner) -> Location {
        let file = interner.intern("t.b");
        Location::new(file, 1, 1)
    }

    #[test]
    fn scalar_extern_initializes_to_folded_value() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let name = interner.intern("i");
        let mut ctx = EmitContext::new(&interner, CompileOptions::default());

        let five = arena.alloc(Expr::new(ExprKind::Num(5), l));
        let item = ExternItem {
            name,
            variant: ExternVariant::Scalar,
            initializer: Some(Init::Expr(five)),
            is_implicit_static: false,
            location: l,
        };
        let mut decls = String::new();
        let mut init = String::new();
        emit_extern(&mut ctx, &item, &mut decls, &mut init);
        assert!(decls.contains("word i;"));
        assert!(init.contains("i = 5;"));
    }

    #[test]
    fn vector_with_edge_subvector_sizes_and_inits_tail() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let name = interner.intern("v");
        let mut ctx = EmitContext::new(&interner, CompileOptions::default());

        let ten = arena.alloc(Expr::new(ExprKind::Num(10), l));
        let twenty = arena.alloc(Expr::new(ExprKind::Num(20), l));
        let one = arena.alloc(Expr::new(ExprKind::Num(1), l));
        let two = arena.alloc(Expr::new(ExprKind::Num(2), l));
        let three = arena.alloc(Expr::new(ExprKind::Num(3), l));
        let edge = arena.alloc_slice([Init::Expr(one), Init::Expr(two), Init::Expr(three)]);
        let items = arena.alloc_slice([Init::Expr(ten), Init::Expr(twenty), Init::List(edge)]);

        let bound = arena.alloc(Expr::new(ExprKind::Num(2), l));
        let item = ExternItem {
            name,
            variant: ExternVariant::Vector {
                bound: Some(bound),
                has_empty_brackets: false,
                bound_folded: None,
            },
            initializer: Some(Init::List(items)),
            is_implicit_static: false,
            location: l,
        };
        let mut decls = String::new();
        let mut init = String::new();
        emit_extern(&mut ctx, &item, &mut decls, &mut init);

        // outer_len = max(bound+1, init_len) = max(3, 3) = 3; tail = edge_words_total([1,2,3]) = 3.
        assert!(decls.contains("static word __v_store[6];"));
        assert!(init.contains("__v_store[0] = 10;"));
        assert!(init.contains("__v_store[1] = 20;"));
        assert!(init.contains("__v_store[2] = B_ADDR(__v_store[3]);"));
        assert!(init.contains("__v_store[3] = 1;"));
        assert!(init.contains("__v_store[4] = 2;"));
        assert!(init.contains("__v_store[5] = 3;"));
    }
}
