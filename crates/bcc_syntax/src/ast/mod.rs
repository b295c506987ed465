//! Abstract syntax tree for B.
//!
//! Every node is arena-allocated: children are `&'a` references rather than
//! owning `Box`es, so a whole `Program` lives as long as the single [`Arena`]
//! (`bcc_base::Arena`) the parser was given. The tree is strict — no node is
//! ever shared, so there is exactly one arena-lifetime to reason about.
//!
//! [`Arena`]: bcc_base::Arena

use bcc_base::span::Location;
use bcc_base::Symbol;

/// A binary operator, covering both arithmetic/bitwise and the B-specific
/// relational-assignment family's non-assigning counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LogicalOr,
}

/// A relational operator, used both by [`BinaryOp`] and by a bounded
/// [`CaseLabel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    Deref,
    AddrOf,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

/// An assignment operator: plain `=` or one of B's `=<op>` compound forms,
/// including the relational-assignment family (`x =< y` desugars to
/// `x = (x < y)` at emission time, but is kept distinct here since lowering
/// depends on the specific relation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Shl,
    Shr,
    Rel(RelOp),
}

/// An expression node. `location` is the source position of the token that
/// opened it (per the tree-wide invariant), distinct from any operand's own
/// location.
#[derive(Debug, Clone, Copy)]
pub struct Expr<'a> {
    pub kind: ExprKind<'a>,
    pub location: Location,
}

#[derive(Debug, Clone, Copy)]
pub enum ExprKind<'a> {
    Num(i64),
    Str(Symbol),
    Var(Symbol),
    Call(&'a Expr<'a>, &'a [&'a Expr<'a>]),
    Index(&'a Expr<'a>, &'a Expr<'a>),
    /// `!x`, `-x`, `*x`, `&x`, and prefix `++x`/`--x` — distinct from
    /// [`ExprKind::UnaryPostfix`] because postfix is an rvalue snapshot of
    /// the pre-mutation value.
    UnaryPrefix(UnaryOp, &'a Expr<'a>),
    UnaryPostfix(UnaryOp, &'a Expr<'a>),
    Binary(BinaryOp, &'a Expr<'a>, &'a Expr<'a>),
    Assign(AssignOp, &'a Expr<'a>, &'a Expr<'a>),
    Ternary(&'a Expr<'a>, &'a Expr<'a>, &'a Expr<'a>),
    Comma(&'a Expr<'a>, &'a Expr<'a>),
}

impl<'a> Expr<'a> {
    pub fn new(kind: ExprKind<'a>, location: Location) -> Self {
        Expr { kind, location }
    }

    /// True for the lvalue forms the parser must check before accepting an
    /// assignment target, increment/decrement operand, or address-of
    /// operand: a bare variable, an index expression, or a dereference.
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Var(_) | ExprKind::Index(_, _) | ExprKind::UnaryPrefix(UnaryOp::Deref, _)
        )
    }
}

/// A single `case` label inside a `switch` body.
///
/// Kept as a dedicated enum rather than a sentinel `lo == hi == -1` so a
/// literal `case -1:` can never be confused with `default:` (see the
/// resolved open question on default-case encoding).
#[derive(Debug, Clone, Copy)]
pub enum CaseLabel {
    /// A point case (`lo == hi`, `relop` is `None`), a range case
    /// (`lo..=hi`, `relop` is `None`), or a bounded case (a single `relop`
    /// applied to `lo`, `hi` unused).
    Value {
        lo: i64,
        hi: i64,
        relop: Option<RelOp>,
    },
    Default,
}

/// A statement node.
#[derive(Debug, Clone, Copy)]
pub struct Stmt<'a> {
    pub kind: StmtKind<'a>,
    pub location: Location,
}

#[derive(Debug, Clone, Copy)]
pub enum StmtKind<'a> {
    Empty,
    Block(&'a [&'a Stmt<'a>]),
    AutoDecl(&'a [DeclItem<'a>]),
    /// `extrn a, b, c;` inside a function body: adds names to the
    /// function-local "treat as external" set without creating shadowable
    /// locals.
    ExternDecl(&'a [Symbol]),
    If(&'a Expr<'a>, &'a Stmt<'a>, Option<&'a Stmt<'a>>),
    While(&'a Expr<'a>, &'a Stmt<'a>),
    Return(Option<&'a Expr<'a>>),
    Expr(&'a Expr<'a>),
    Break,
    Continue,
    Goto(Symbol),
    Label(Symbol, &'a Stmt<'a>),
    Switch(&'a Expr<'a>, &'a Stmt<'a>),
    Case(CaseLabel, &'a Stmt<'a>),
}

impl<'a> Stmt<'a> {
    pub fn new(kind: StmtKind<'a>, location: Location) -> Self {
        Stmt { kind, location }
    }
}

/// One item in an `auto` declaration list: a name, and for local vectors a
/// bare (unbracketed) size expression — `auto v 10;` not `auto v[10];`.
#[derive(Debug, Clone, Copy)]
pub struct DeclItem<'a> {
    pub name: Symbol,
    pub size: Option<&'a Expr<'a>>,
    pub location: Location,
}

/// An initializer: either a single expression, or a nested list modeling
/// one of B's "edge subvectors" (see §4.6.5 of the design notes this AST is
/// built against).
#[derive(Debug, Clone, Copy)]
pub enum Init<'a> {
    Expr(&'a Expr<'a>),
    List(&'a [Init<'a>]),
}

/// The shape of an external definition's storage, chosen purely by the
/// initializer grammar the parser saw (see the resolved open question on
/// scalar-vs-blob dispatch).
#[derive(Debug, Clone, Copy)]
pub enum ExternVariant<'a> {
    Scalar,
    Blob,
    Vector {
        bound: Option<&'a Expr<'a>>,
        has_empty_brackets: bool,
        bound_folded: Option<i64>,
    },
}

/// A top-level external definition or a promoted (implicit-static) name.
#[derive(Debug, Clone, Copy)]
pub struct ExternItem<'a> {
    pub name: Symbol,
    pub variant: ExternVariant<'a>,
    pub initializer: Option<Init<'a>>,
    /// Set by the semantic pass's post-pass for names it promoted to a
    /// zero-initialized scalar because nothing declared them explicitly.
    pub is_implicit_static: bool,
    pub location: Location,
}

/// A single top-level item.
#[derive(Debug, Clone, Copy)]
pub enum Top<'a> {
    GlobalAuto(&'a Stmt<'a>),
    Function {
        name: Symbol,
        params: &'a [Symbol],
        body: &'a Stmt<'a>,
        location: Location,
    },
    ExternDef(&'a ExternItem<'a>),
    /// A bare `extrn name, ...;` at file scope: declares names defined in
    /// another compilation unit, with no storage created here.
    ExternDecl(&'a [Symbol], Location),
}

/// The whole translation unit: an ordered list of [`Top`] items.
///
/// Order is preserved because emission interleaves storage declarations
/// and the file-scoped init routine in a single forward pass over this
/// list.
pub struct Program<'a> {
    pub items: &'a [Top<'a>],
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_base::{Arena, Interner};

    fn loc(interner: &mut Interner) -> Location {
        let file = interner.intern("a.b");
        Location::new(file, 1, 1)
    }

    #[test]
    fn expr_is_lvalue_accepts_var_index_and_deref() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let name = interner.intern("x");

        let var = arena.alloc(Expr::new(ExprKind::Var(name), l));
        assert!(var.is_lvalue());

        let idx = arena.alloc(Expr::new(ExprKind::Num(0), l));
        let index_expr = Expr::new(ExprKind::Index(var, idx), l);
        assert!(index_expr.is_lvalue());

        let deref = Expr::new(ExprKind::UnaryPrefix(UnaryOp::Deref, var), l);
        assert!(deref.is_lvalue());

        let num = Expr::new(ExprKind::Num(42), l);
        assert!(!num.is_lvalue());
    }

    #[test]
    fn case_label_default_is_distinct_from_negative_one_value() {
        let default_label = CaseLabel::Default;
        let literal_neg_one = CaseLabel::Value {
            lo: -1,
            hi: -1,
            relop: None,
        };
        match (default_label, literal_neg_one) {
            (CaseLabel::Default, CaseLabel::Value { lo, hi, relop }) => {
                assert_eq!((lo, hi, relop), (-1, -1, None));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn nested_init_list_models_edge_subvector() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let one = arena.alloc(Expr::new(ExprKind::Num(1), l));
        let two = arena.alloc(Expr::new(ExprKind::Num(2), l));
        let inner = arena.alloc_slice([Init::Expr(one), Init::Expr(two)]);
        let nested = Init::List(inner);
        match nested {
            Init::List(items) => assert_eq!(items.len(), 2),
            Init::Expr(_) => unreachable!(),
        }
    }

    #[test]
    fn program_preserves_item_order() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let f_name = interner.intern("f");
        let g_name = interner.intern("g");
        let empty_body = arena.alloc(Stmt::new(StmtKind::Empty, l));
        let items = arena.alloc_slice([
            Top::Function {
                name: f_name,
                params: &[],
                body: empty_body,
                location: l,
            },
            Top::Function {
                name: g_name,
                params: &[],
                body: empty_body,
                location: l,
            },
        ]);
        let program = Program { items };
        match program.items[0] {
            Top::Function { name, .. } => assert_eq!(name, f_name),
            _ => unreachable!(),
        }
        match program.items[1] {
            Top::Function { name, .. } => assert_eq!(name, g_name),
            _ => unreachable!(),
        }
    }
}
