//! Expression lowering: every [`ExprKind`] to the C text that evaluates it.
//!
//! Each function returns a fully-parenthesized C expression fragment, never
//! a statement — callers splice the result directly into a larger
//! expression or append a `;`.

use bcc_syntax::ast::{AssignOp, BinaryOp, Expr, ExprKind, RelOp, UnaryOp};

use crate::context::{EmitContext, PointerModel, WordWidth};

pub fn lower_expr(ctx: &mut EmitContext, e: &Expr) -> String {
    match &e.kind {
        ExprKind::Num(n) => n.to_string(),
        ExprKind::Str(sym) => {
            let id = ctx.strings.intern(*sym);
            format!("B_STR({})", crate::strings::StringPool::c_name(id))
        }
        ExprKind::Var(sym) => ctx.mangle_var(*sym),
        ExprKind::Call(callee, args) => lower_call(ctx, callee, args),
        ExprKind::Index(base, idx) => {
            let b = lower_expr(ctx, base);
            let i = lower_expr(ctx, idx);
            format!("B_INDEX({b}, {i})")
        }
        ExprKind::UnaryPrefix(op, operand) => lower_unary(ctx, *op, operand),
        ExprKind::UnaryPostfix(op, operand) => lower_unary(ctx, *op, operand),
        ExprKind::Binary(op, l, r) => lower_binary(ctx, *op, l, r),
        ExprKind::Assign(op, lhs, rhs) => lower_assign(ctx, *op, lhs, rhs),
        ExprKind::Ternary(c, t, f) => {
            let c = lower_expr(ctx, c);
            let t = lower_expr(ctx, t);
            let f = lower_expr(ctx, f);
            format!("({c} ? {t} : {f})")
        }
        ExprKind::Comma(l, r) => {
            let l = lower_expr(ctx, l);
            let r = lower_expr(ctx, r);
            format!("({l}, {r})")
        }
    }
}

/// The address of an lvalue as a plain C `word*`, for the helper functions
/// that take a pointer so the lvalue's subexpressions are evaluated once.
/// Works uniformly for a bare variable, an index, or a dereference, since
/// `B_INDEX`/`B_DEREF` already expand to a dereference expression.
fn raw_addr(ctx: &mut EmitContext, lvalue: &Expr) -> String {
    let v = lower_expr(ctx, lvalue);
    format!("(&({v}))")
}

fn lower_unary(ctx: &mut EmitContext, op: UnaryOp, operand: &Expr) -> String {
    match op {
        UnaryOp::Neg => {
            let v = lower_expr(ctx, operand);
            if ctx.options.word_width == WordWidth::Native {
                format!("(-({v}))")
            } else {
                format!("WNEG({v})")
            }
        }
        UnaryOp::Not => {
            let v = lower_expr(ctx, operand);
            format!("(!({v}))")
        }
        UnaryOp::Deref => {
            if let Some((str_expr, idx_expr)) = match_str_plus_index(operand) {
                let s = lower_expr(ctx, str_expr);
                let i = lower_expr(ctx, idx_expr);
                format!("b_char({s}, {i})")
            } else {
                let v = lower_expr(ctx, operand);
                format!("B_DEREF({v})")
            }
        }
        UnaryOp::AddrOf => {
            let v = lower_expr(ctx, operand);
            format!("B_ADDR({v})")
        }
        UnaryOp::PreInc => lower_incdec(ctx, operand, true, true),
        UnaryOp::PreDec => lower_incdec(ctx, operand, true, false),
        UnaryOp::PostInc => lower_incdec(ctx, operand, false, true),
        UnaryOp::PostDec => lower_incdec(ctx, operand, false, false),
    }
}

/// `*(str + k)` / `*(k + str)` where `str` is a string literal: B's
/// byte-addressed string idiom, kept working in word-pointer mode by
/// routing through the byte accessor instead of a whole-word dereference.
fn match_str_plus_index<'a>(e: &'a Expr<'a>) -> Option<(&'a Expr<'a>, &'a Expr<'a>)> {
    if let ExprKind::Binary(BinaryOp::Add, l, r) = &e.kind {
        if matches!(l.kind, ExprKind::Str(_)) {
            return Some((l, r));
        }
        if matches!(r.kind, ExprKind::Str(_)) {
            return Some((r, l));
        }
    }
    None
}

fn is_simple_lvalue(e: &Expr) -> bool {
    matches!(e.kind, ExprKind::Var(_))
}

fn lower_incdec(ctx: &mut EmitContext, operand: &Expr, is_pre: bool, is_inc: bool) -> String {
    let native = ctx.options.word_width == WordWidth::Native;
    if is_simple_lvalue(operand) && native {
        let v = lower_expr(ctx, operand);
        return match (is_pre, is_inc) {
            (true, true) => format!("(++{v})"),
            (true, false) => format!("(--{v})"),
            (false, true) => format!("({v}++)"),
            (false, false) => format!("({v}--)"),
        };
    }
    let addr = raw_addr(ctx, operand);
    let helper = match (is_pre, is_inc) {
        (true, true) => "b_preinc",
        (true, false) => "b_predec",
        (false, true) => "b_postinc",
        (false, false) => "b_postdec",
    };
    format!("{helper}({addr})")
}

fn lower_binary(ctx: &mut EmitContext, op: BinaryOp, l: &Expr, r: &Expr) -> String {
    let native = ctx.options.word_width == WordWidth::Native;
    let lt = lower_expr(ctx, l);
    let rt = lower_expr(ctx, r);
    match op {
        BinaryOp::Add => wrap_or_native(native, "WADD", "+", &lt, &rt),
        BinaryOp::Sub => wrap_or_native(native, "WSUB", "-", &lt, &rt),
        BinaryOp::Mul => wrap_or_native(native, "WMUL", "*", &lt, &rt),
        BinaryOp::Div => wrap_or_native(native, "WDIV", "/", &lt, &rt),
        BinaryOp::Mod => wrap_or_native(native, "WMOD", "%", &lt, &rt),
        BinaryOp::And => wrap_or_native(native, "WAND", "&", &lt, &rt),
        BinaryOp::Or => wrap_or_native(native, "WOR", "|", &lt, &rt),
        BinaryOp::Shl => wrap_or_native(native, "WSHL", "<<", &lt, &rt),
        BinaryOp::Shr => wrap_or_native(native, "WSHR", ">>", &lt, &rt),
        BinaryOp::Eq => format!("({lt} == {rt})"),
        BinaryOp::Ne => format!("({lt} != {rt})"),
        BinaryOp::Lt => format!("({lt} < {rt})"),
        BinaryOp::Le => format!("({lt} <= {rt})"),
        BinaryOp::Gt => format!("({lt} > {rt})"),
        BinaryOp::Ge => format!("({lt} >= {rt})"),
        BinaryOp::LogicalOr => format!("({lt} || {rt})"),
    }
}

fn wrap_or_native(native: bool, macro_name: &str, op: &str, l: &str, r: &str) -> String {
    if native {
        format!("({l} {op} {r})")
    } else {
        format!("{macro_name}({l}, {r})")
    }
}

fn native_compound_operator(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Add => "+",
        AssignOp::Sub => "-",
        AssignOp::Mul => "*",
        AssignOp::Div => "/",
        AssignOp::Mod => "%",
        AssignOp::And => "&",
        AssignOp::Or => "|",
        AssignOp::Shl => "<<",
        AssignOp::Shr => ">>",
        AssignOp::Assign | AssignOp::Rel(_) => unreachable!(),
    }
}

fn compound_assign_helper(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Add => "b_add_assign",
        AssignOp::Sub => "b_sub_assign",
        AssignOp::Mul => "b_mul_assign",
        AssignOp::Div => "b_div_assign",
        AssignOp::Mod => "b_mod_assign",
        AssignOp::And => "b_and_assign",
        AssignOp::Or => "b_or_assign",
        AssignOp::Shl => "b_lsh_assign",
        AssignOp::Shr => "b_rsh_assign",
        AssignOp::Assign | AssignOp::Rel(_) => unreachable!(),
    }
}

fn rel_assign_helper(relop: RelOp) -> &'static str {
    match relop {
        RelOp::Eq => "b_rel_eq_assign",
        RelOp::Ne => "b_rel_ne_assign",
        RelOp::Lt => "b_rel_lt_assign",
        RelOp::Le => "b_rel_le_assign",
        RelOp::Gt => "b_rel_gt_assign",
        RelOp::Ge => "b_rel_ge_assign",
    }
}

fn lower_assign(ctx: &mut EmitContext, op: AssignOp, lhs: &Expr, rhs: &Expr) -> String {
    match op {
        AssignOp::Assign => {
            let l = lower_expr(ctx, lhs);
            let r = lower_expr(ctx, rhs);
            format!("({l} = {r})")
        }
        AssignOp::Rel(relop) => {
            let addr = raw_addr(ctx, lhs);
            let r = lower_expr(ctx, rhs);
            format!("{}({addr}, {r})", rel_assign_helper(relop))
        }
        _ => {
            let native = ctx.options.word_width == WordWidth::Native;
            if is_simple_lvalue(lhs) && native {
                let l = lower_expr(ctx, lhs);
                let r = lower_expr(ctx, rhs);
                format!("({l} {}= {r})", native_compound_operator(op))
            } else {
                let addr = raw_addr(ctx, lhs);
                let r = lower_expr(ctx, rhs);
                format!("{}({addr}, {r})", compound_assign_helper(op))
            }
        }
    }
}

fn lower_call(ctx: &mut EmitContext, callee: &Expr, args: &[&Expr]) -> String {
    if let ExprKind::Var(sym) = callee.kind {
        let name = ctx.text(sym).to_string();
        if bcc_sema::builtins::BUILTIN_NAMES.contains(&name.as_str()) {
            return lower_builtin_call(ctx, &name, args);
        }
        if let Some(spec) = wrapped_spec(&name) {
            return lower_wrapped_call(ctx, &spec, args);
        }
    }
    let callee_text = lower_expr(ctx, callee);
    let arg_texts: Vec<String> = args.iter().map(|a| lower_expr(ctx, a)).collect();
    format!("{callee_text}({})", arg_texts.join(", "))
}

fn lower_builtin_call(ctx: &mut EmitContext, name: &str, args: &[&Expr]) -> String {
    let arg_texts: Vec<String> = args.iter().map(|a| lower_expr(ctx, a)).collect();
    if name == "callf" {
        // b_callf_dispatch(n, name, args...) — n excludes the name slot.
        let n = arg_texts.len().saturating_sub(1);
        let mut parts = vec![n.to_string()];
        parts.extend(arg_texts);
        return format!("b_callf_dispatch({})", parts.join(", "));
    }
    format!("b_{name}({})", arg_texts.join(", "))
}

#[derive(Clone, Copy)]
enum ArgKind {
    Plain,
    NativePtr,
    SizeWord,
}

#[derive(Clone, Copy)]
enum RetKind {
    Plain,
    BPtr,
}

struct WrappedSpec {
    cname: &'static str,
    fixed: &'static [ArgKind],
    format_at: Option<usize>,
    ret: RetKind,
}

/// The hardcoded set of C-standard functions B programs call directly,
/// each with its own argument-wrapping and return-wrapping rule.
fn wrapped_spec(name: &str) -> Option<WrappedSpec> {
    use ArgKind::*;
    use RetKind::*;
    let spec = match name {
        "malloc" => WrappedSpec { cname: "malloc", fixed: &[SizeWord], format_at: None, ret: BPtr },
        "realloc" => WrappedSpec {
            cname: "realloc",
            fixed: &[NativePtr, SizeWord],
            format_at: None,
            ret: BPtr,
        },
        "calloc" => WrappedSpec {
            cname: "calloc",
            fixed: &[Plain, SizeWord],
            format_at: None,
            ret: BPtr,
        },
        "strlen" => WrappedSpec {
            cname: "strlen",
            fixed: &[NativePtr],
            format_at: None,
            ret: Plain,
        },
        "memcpy" => WrappedSpec {
            cname: "memcpy",
            fixed: &[NativePtr, NativePtr, Plain],
            format_at: None,
            ret: BPtr,
        },
        "memset" => WrappedSpec {
            cname: "memset",
            fixed: &[NativePtr, Plain, Plain],
            format_at: None,
            ret: BPtr,
        },
        "memmove" => WrappedSpec {
            cname: "memmove",
            fixed: &[NativePtr, NativePtr, Plain],
            format_at: None,
            ret: BPtr,
        },
        "tcgetattr" => WrappedSpec {
            cname: "tcgetattr",
            fixed: &[Plain, NativePtr],
            format_at: None,
            ret: Plain,
        },
        "tcsetattr" => WrappedSpec {
            cname: "tcsetattr",
            fixed: &[Plain, Plain, NativePtr],
            format_at: None,
            ret: Plain,
        },
        "ioctl" => WrappedSpec {
            cname: "ioctl",
            fixed: &[Plain, Plain, NativePtr],
            format_at: None,
            ret: Plain,
        },
        "atoi" => WrappedSpec {
            cname: "atoi",
            fixed: &[NativePtr],
            format_at: None,
            ret: Plain,
        },
        "printf" => WrappedSpec { cname: "printf", fixed: &[], format_at: Some(0), ret: Plain },
        "fprintf" => WrappedSpec {
            cname: "fprintf",
            fixed: &[NativePtr],
            format_at: Some(1),
            ret: Plain,
        },
        "dprintf" => WrappedSpec {
            cname: "dprintf",
            fixed: &[Plain],
            format_at: Some(1),
            ret: Plain,
        },
        "sprintf" => WrappedSpec {
            cname: "sprintf",
            fixed: &[NativePtr],
            format_at: Some(1),
            ret: Plain,
        },
        "snprintf" => WrappedSpec {
            cname: "snprintf",
            fixed: &[NativePtr, Plain],
            format_at: Some(2),
            ret: Plain,
        },
        _ => return None,
    };
    Some(spec)
}

fn lower_wrapped_call(ctx: &mut EmitContext, spec: &WrappedSpec, args: &[&Expr]) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (i, kind) in spec.fixed.iter().enumerate() {
        if i >= args.len() {
            break;
        }
        parts.push(lower_wrapped_arg(ctx, *kind, args[i]));
    }
    if let Some(fmt_idx) = spec.format_at {
        if fmt_idx < args.len() {
            let fmt_arg = args[fmt_idx];
            let fmt_text = lower_expr(ctx, fmt_arg);
            parts.push(format!("__b_cstr({fmt_text})"));
            let rest = &args[fmt_idx + 1..];
            parts.extend(lower_format_args(ctx, fmt_arg, rest));
        }
    }
    let call = format!("{}({})", spec.cname, parts.join(", "));
    match spec.ret {
        RetKind::BPtr => format!("B_PTR({call})"),
        RetKind::Plain => call,
    }
}

fn lower_wrapped_arg(ctx: &mut EmitContext, kind: ArgKind, e: &Expr) -> String {
    let v = lower_expr(ctx, e);
    match kind {
        ArgKind::Plain => v,
        ArgKind::NativePtr => format!("B_CPTR({v})"),
        ArgKind::SizeWord => {
            if ctx.options.pointer_model == PointerModel::Word {
                format!("(({v}) * (word)sizeof(word))")
            } else {
                v
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FormatRole {
    Str,
    Char,
    Int,
    Other,
}

fn lower_format_args(ctx: &mut EmitContext, fmt_expr: &Expr, rest: &[&Expr]) -> Vec<String> {
    let roles = if let ExprKind::Str(sym) = fmt_expr.kind {
        let text = ctx.text(sym).to_string();
        parse_format_roles(&text)
    } else {
        Vec::new()
    };
    rest.iter()
        .enumerate()
        .map(|(i, a)| {
            let v = lower_expr(ctx, a);
            match roles.get(i) {
                Some(FormatRole::Str) => format!("__b_cstr({v})"),
                Some(FormatRole::Char) => format!("(char)({v})"),
                _ => v,
            }
        })
        .collect()
}

/// Walks a literal format string, tracking flags/width/precision (including
/// `*`) and length modifiers, and returns one [`FormatRole`] per variadic
/// slot the conversions consume, in order.
fn parse_format_roles(fmt: &str) -> Vec<FormatRole> {
    let bytes = fmt.as_bytes();
    let mut roles = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        i += 1;
        if i >= bytes.len() {
            break;
        }
        if bytes[i] == b'%' {
            i += 1;
            continue;
        }
        while i < bytes.len() && matches!(bytes[i], b'-' | b'+' | b' ' | b'0' | b'#') {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'*' {
            roles.push(FormatRole::Int);
            i += 1;
        } else {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            if i < bytes.len() && bytes[i] == b'*' {
                roles.push(FormatRole::Int);
                i += 1;
            } else {
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
        }
        while i < bytes.len() && matches!(bytes[i], b'h' | b'l' | b'L' | b'j' | b'z' | b't') {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let conv = bytes[i];
        i += 1;
        let role = match conv {
            b's' => FormatRole::Str,
            b'c' => FormatRole::Char,
            b'd' | b'i' | b'o' | b'x' | b'X' | b'u' | b'f' | b'e' | b'g' | b'p' => FormatRole::Int,
            _ => FormatRole::Other,
        };
        roles.push(role);
    }
    roles
}
