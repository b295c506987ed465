//! Scope stack for name resolution during semantic analysis.
//!
//! A stack of flat maps, one per nested block — pushed on entry to a
//! function body or a `{ }` block, popped on exit. Lookup walks the stack
//! top-down so an inner block's binding shadows an outer one; binding
//! rejects only a collision within the *same* frame.

use bcc_base::diag::{BccError, ErrorCode, Result};
use bcc_base::span::Location;
use bcc_base::Symbol;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Func,
    Label,
}

#[derive(Debug, Clone, Copy)]
pub enum SymbolPayload {
    Scalar,
    Vector { bound: Option<i64> },
    Func { arity: usize },
    Label,
}

/// An entry in the symbol table: `{ kind, name, defining location, is_extern,
/// payload }` per the data model.
#[derive(Debug, Clone, Copy)]
pub struct SymbolInfo {
    pub kind: SymbolKind,
    pub name: Symbol,
    pub location: Location,
    pub is_extern: bool,
    pub payload: SymbolPayload,
}

impl SymbolInfo {
    pub fn new(kind: SymbolKind, name: Symbol, location: Location, payload: SymbolPayload) -> Self {
        SymbolInfo {
            kind,
            name,
            location,
            is_extern: false,
            payload,
        }
    }

    pub fn extern_of(mut self) -> Self {
        self.is_extern = true;
        self
    }
}

#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<FxHashMap<Symbol, SymbolInfo>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Binds `entry` in the current (innermost) scope. Returns an `rd` error
    /// if that scope already has a binding for the same name — shadowing a
    /// binding from an *enclosing* scope is allowed, so this only checks the
    /// top frame.
    pub fn bind(&mut self, entry: SymbolInfo) -> Result<()> {
        let scope = self.scopes.last_mut().expect("bind called with no scope pushed");
        if let Some(existing) = scope.get(&entry.name) {
            return Err(BccError::new(
                ErrorCode::Redeclared,
                entry.location,
                format!("redeclaration in the same scope (first declared at line {})", existing.location.line),
            ));
        }
        scope.insert(entry.name, entry);
        Ok(())
    }

    pub fn lookup(&self, name: Symbol) -> Option<&SymbolInfo> {
        for scope in self.scopes.iter().rev() {
            if let Some(entry) = scope.get(&name) {
                return Some(entry);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_base::Interner;

    fn loc(interner: &mut Interner) -> Location {
        Location::new(interner.intern("a.b"), 1, 1)
    }

    #[test]
    fn lookup_walks_up_the_scope_chain() {
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let x = interner.intern("x");
        let mut scopes = ScopeStack::new();
        scopes.push_scope();
        scopes.bind(SymbolInfo::new(SymbolKind::Var, x, l, SymbolPayload::Scalar)).unwrap();
        scopes.push_scope();
        assert!(scopes.lookup(x).is_some());
        scopes.pop_scope();
        assert!(scopes.lookup(x).is_some());
        scopes.pop_scope();
        assert!(scopes.lookup(x).is_none());
    }

    #[test]
    fn shadowing_in_nested_scope_is_allowed() {
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let x = interner.intern("x");
        let mut scopes = ScopeStack::new();
        scopes.push_scope();
        scopes.bind(SymbolInfo::new(SymbolKind::Var, x, l, SymbolPayload::Scalar)).unwrap();
        scopes.push_scope();
        // A new binding of the same name in an inner scope is fine.
        scopes.bind(SymbolInfo::new(SymbolKind::Var, x, l, SymbolPayload::Scalar)).unwrap();
    }

    #[test]
    fn redeclaration_in_same_scope_is_rejected() {
        let mut interner = Interner::new();
        let l = loc(&mut interner);
        let x = interner.intern("x");
        let mut scopes = ScopeStack::new();
        scopes.push_scope();
        scopes.bind(SymbolInfo::new(SymbolKind::Var, x, l, SymbolPayload::Scalar)).unwrap();
        let err = scopes
            .bind(SymbolInfo::new(SymbolKind::Var, x, l, SymbolPayload::Scalar))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Redeclared);
    }
}
