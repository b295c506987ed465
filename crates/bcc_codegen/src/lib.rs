#![cfg_attr(docsrs, feature(doc_cfg))]

//! # bcc_codegen
//!
//! Lowers a checked [`bcc_syntax::ast::Program`] to a self-contained C
//! translation unit.
//!
//! ## Architecture
//!
//! ```text
//! Program (bcc_syntax::ast)
//!      │
//!      ▼
//! ┌────────────────────────────────────────────┐
//! │               emit::emit_program_c           │
//! │  ┌─────────┐  ┌──────────┐  ┌────────────┐ │
//! │  │ storage │  │   stmt   │  │    expr    │ │
//! │  └─────────┘  └──────────┘  └────────────┘ │
//! └────────────────────────────────────────────┘
//!      │
//!      ▼
//! runtime prelude + string pool + globals + functions + main
//! ```
//!
//! Name mangling (`mangle`), storage shapes and per-unit counters
//! (`context`), and the string literal pool (`strings`) are shared state
//! threaded explicitly through every lowering function rather than kept in
//! globals.

pub use bcc_base::{Arena, Interner, Symbol, SymbolEq};

pub mod context;
pub mod emit;
pub mod mangle;
mod runtime;
pub mod strings;

pub use context::{CompileOptions, EmitContext, PointerModel, VarShape, WordWidth};
pub use emit::emit_program_c;
