//! Constant-expression folding.
//!
//! Used directly by the parser to evaluate `case` labels (B's single-pass
//! heritage folds these immediately rather than deferring to a later
//! pass) and reused by `bcc-sema` to fold extern-def vector bounds. Kept
//! in `bcc-syntax` rather than `bcc-sema` specifically so the parser can
//! call it without a dependency cycle — see the Parser entry in
//! `DESIGN.md`.

use crate::ast::{BinaryOp, Expr, ExprKind, RelOp, UnaryOp};

/// The bit width to wrap arithmetic at, mirroring the emitter's `WORD_BITS`
/// switch (§4.6.1): `None` is host-native (no wrapping), `Some(16)` and
/// `Some(32)` wrap via unsigned arithmetic then reinterpret signed.
pub type FoldWidth = Option<u32>;

fn wrap(v: i64, width: FoldWidth) -> i64 {
    match width {
        None => v,
        Some(bits) => {
            let mask = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
            let u = (v as u64) & mask;
            let sign_bit = 1u64 << (bits - 1);
            if u & sign_bit != 0 {
                (u | !mask) as i64
            } else {
                u as i64
            }
        }
    }
}

/// Folds `expr` to an integer constant, or returns `None` if it isn't
/// foldable (an unresolvable name, or division/modulo by zero).
pub fn fold_const(expr: &Expr, width: FoldWidth) -> Option<i64> {
    match expr.kind {
        ExprKind::Num(n) => Some(wrap(n, width)),
        ExprKind::UnaryPrefix(UnaryOp::Neg, inner) => {
            fold_const(inner, width).map(|v| wrap(v.wrapping_neg(), width))
        }
        ExprKind::UnaryPrefix(UnaryOp::Not, inner) => {
            fold_const(inner, width).map(|v| if v == 0 { 1 } else { 0 })
        }
        ExprKind::Binary(op, lhs, rhs) => {
            let l = fold_const(lhs, width)?;
            let r = fold_const(rhs, width)?;
            fold_binary(op, l, r, width)
        }
        ExprKind::Comma(_, rhs) => fold_const(rhs, width),
        _ => None,
    }
}

fn fold_binary(op: BinaryOp, l: i64, r: i64, width: FoldWidth) -> Option<i64> {
    Some(match op {
        BinaryOp::Add => wrap(l.wrapping_add(r), width),
        BinaryOp::Sub => wrap(l.wrapping_sub(r), width),
        BinaryOp::Mul => wrap(l.wrapping_mul(r), width),
        BinaryOp::Div => {
            if r == 0 {
                return None;
            }
            wrap(l.wrapping_div(r), width)
        }
        BinaryOp::Mod => {
            if r == 0 {
                return None;
            }
            wrap(l.wrapping_rem(r), width)
        }
        BinaryOp::And => wrap(l & r, width),
        BinaryOp::Or => wrap(l | r, width),
        BinaryOp::Shl => wrap(l.wrapping_shl(r as u32), width),
        BinaryOp::Shr => wrap(l.wrapping_shr(r as u32), width),
        BinaryOp::Eq => bool_to_word(l == r),
        BinaryOp::Ne => bool_to_word(l != r),
        BinaryOp::Lt => bool_to_word(l < r),
        BinaryOp::Le => bool_to_word(l <= r),
        BinaryOp::Gt => bool_to_word(l > r),
        BinaryOp::Ge => bool_to_word(l >= r),
        BinaryOp::LogicalOr => bool_to_word(l != 0 || r != 0),
    })
}

fn bool_to_word(b: bool) -> i64 {
    if b {
        1
    } else {
        0
    }
}

/// Folds the relation `relop` applied to `lo`/`hi`/`val`, used by the case
/// dispatch table emitter rather than the parser — kept here so it's
/// defined alongside the rest of the constant machinery.
pub fn eval_relop(relop: RelOp, l: i64, r: i64) -> bool {
    match relop {
        RelOp::Eq => l == r,
        RelOp::Ne => l != r,
        RelOp::Lt => l < r,
        RelOp::Le => l <= r,
        RelOp::Gt => l > r,
        RelOp::Ge => l >= r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_base::{Arena, Interner};
    use bcc_base::span::Location;

    fn loc(interner: &mut Interner) -> Location {
        Location::new(interner.intern("a.b"), 1, 1)
    }

    #[test]
    fn folds_simple_arithmetic() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let two = arena.alloc(Expr::new(ExprKind::Num(2), l));
        let three = arena.alloc(Expr::new(ExprKind::Num(3), l));
        let expr = Expr::new(ExprKind::Binary(BinaryOp::Add, two, three), l);
        assert_eq!(fold_const(&expr, None), Some(5));
    }

    #[test]
    fn division_by_zero_yields_none() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let one = arena.alloc(Expr::new(ExprKind::Num(1), l));
        let zero = arena.alloc(Expr::new(ExprKind::Num(0), l));
        let expr = Expr::new(ExprKind::Binary(BinaryOp::Div, one, zero), l);
        assert_eq!(fold_const(&expr, None), None);
    }

    #[test]
    fn wraps_at_16_bits() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let big = arena.alloc(Expr::new(ExprKind::Num(70000), l));
        let zero = arena.alloc(Expr::new(ExprKind::Num(0), l));
        let expr = Expr::new(ExprKind::Binary(BinaryOp::Add, big, zero), l);
        // 70000 mod 2^16 = 4464
        assert_eq!(fold_const(&expr, Some(16)), Some(4464));
    }

    #[test]
    fn negative_wraps_sign_extend_at_width() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let one = arena.alloc(Expr::new(ExprKind::Num(1), l));
        let expr = Expr::new(ExprKind::UnaryPrefix(UnaryOp::Neg, one), l);
        assert_eq!(fold_const(&expr, None), Some(-1));
        assert_eq!(fold_const(&expr, Some(16)), Some(-1));
    }

    #[test]
    fn comma_folds_to_rhs() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let one = arena.alloc(Expr::new(ExprKind::Num(1), l));
        let two = arena.alloc(Expr::new(ExprKind::Num(2), l));
        let expr = Expr::new(ExprKind::Comma(one, two), l);
        assert_eq!(fold_const(&expr, None), Some(2));
    }

    #[test]
    fn unresolvable_name_is_not_foldable() {
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let name = interner.intern("x");
        let expr = Expr::new(ExprKind::Var(name), l);
        assert_eq!(fold_const(&expr, None), None);
    }
}
