//! Options and per-unit state threaded explicitly through emission, rather
//! than living in globals the way the original single-pass emitter did
//! (see the Emitter entry in `DESIGN.md` for the resolved open question).

use rustc_hash::FxHashMap;

use bcc_base::{Interner, Symbol};

use crate::mangle::Mangler;
use crate::strings::StringPool;

/// `B_BYTEPTR`: whether emitted pointers are raw byte addresses (the
/// modern default) or word-scaled Thompson-B addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerModel {
    Byte,
    Word,
}

/// `WORD_BITS`: host-native arithmetic, or arithmetic wrapped at a
/// narrower width the way the PDP-11 original did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordWidth {
    Native,
    Bits16,
    Bits32,
}

impl WordWidth {
    /// The `fold_const` width to fold constant vector bounds at, mirroring
    /// whatever wrapping the generated arithmetic will do at runtime.
    pub fn fold_width(self) -> Option<u32> {
        match self {
            WordWidth::Native => None,
            WordWidth::Bits16 => Some(16),
            WordWidth::Bits32 => Some(32),
        }
    }

    fn define_value(self) -> &'static str {
        match self {
            WordWidth::Native => "0",
            WordWidth::Bits16 => "16",
            WordWidth::Bits32 => "32",
        }
    }
}

/// Compiler-internal configuration, carried explicitly rather than through
/// globals or environment variables (see SPEC_FULL.md's configuration
/// section).
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub pointer_model: PointerModel,
    pub word_width: WordWidth,
    pub emit_line_directives: bool,
    pub verbose_errors: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            pointer_model: PointerModel::Byte,
            word_width: WordWidth::Native,
            emit_line_directives: true,
            verbose_errors: false,
        }
    }
}

impl CompileOptions {
    pub(crate) fn byteptr_define(&self) -> &'static str {
        match self.pointer_model {
            PointerModel::Byte => "1",
            PointerModel::Word => "0",
        }
    }

    pub(crate) fn word_bits_define(&self) -> &'static str {
        self.word_width.define_value()
    }
}

/// How a bare [`bcc_syntax::ast::ExprKind::Var`] reference should be
/// emitted: a scalar cell (its C name denotes the value) or a vector/blob
/// (its C name already denotes a pointer to the first element).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarShape {
    Scalar,
    Pointer,
}

/// Per-compilation-unit emitter state: the name mangler, the string pool,
/// and the storage-shape map needed to tell a scalar reference from a
/// vector/blob one while lowering expressions.
pub struct EmitContext<'i> {
    pub interner: &'i Interner,
    pub options: CompileOptions,
    pub mangler: Mangler,
    pub strings: StringPool,
    globals: FxHashMap<Symbol, VarShape>,
    locals: Vec<FxHashMap<Symbol, VarShape>>,
    switch_seq: u32,
    tmp_seq: u32,
}

impl<'i> EmitContext<'i> {
    pub fn new(interner: &'i Interner, options: CompileOptions) -> Self {
        EmitContext {
            interner,
            options,
            mangler: Mangler::new(),
            strings: StringPool::new(),
            globals: FxHashMap::default(),
            locals: Vec::new(),
            switch_seq: 0,
            tmp_seq: 0,
        }
    }

    pub fn declare_global(&mut self, name: Symbol, shape: VarShape) {
        self.globals.insert(name, shape);
    }

    pub fn push_scope(&mut self) {
        self.locals.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        self.locals.pop();
    }

    pub fn bind_local(&mut self, name: Symbol, shape: VarShape) {
        self.locals
            .last_mut()
            .expect("bind_local called outside a function body")
            .insert(name, shape);
    }

    pub fn shape_of(&self, name: Symbol) -> VarShape {
        for scope in self.locals.iter().rev() {
            if let Some(shape) = scope.get(&name) {
                return *shape;
            }
        }
        self.globals.get(&name).copied().unwrap_or(VarShape::Scalar)
    }

    pub fn next_switch_id(&mut self) -> u32 {
        self.switch_seq += 1;
        self.switch_seq
    }

    pub fn next_tmp(&mut self) -> u32 {
        self.tmp_seq += 1;
        self.tmp_seq
    }

    pub fn text(&self, sym: Symbol) -> &'i str {
        self.interner.resolve(sym)
    }

    /// Mangles a source identifier, keyed by the symbol's own index so the
    /// same name always resolves to the same C spelling within this unit.
    pub fn mangle_var(&mut self, sym: Symbol) -> String {
        let raw = self.interner.resolve(sym).to_string();
        self.mangler.mangle(sym.index() as u32, &raw)
    }

    /// Forces `sym` to resolve to exactly `name` rather than running it
    /// through the general mangling rules — used for `main`.
    pub fn force_mangle(&mut self, sym: Symbol, name: &str) {
        self.mangler.force(sym.index() as u32, name);
    }
}
