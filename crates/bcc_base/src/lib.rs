#![cfg_attr(docsrs, feature(doc_cfg))]

//! # bcc-base
//!
//! Pure structural atoms for bcc, the B-to-C compiler: arena, interning,
//! source positions, and diagnostics.
//!
//! - [`Arena`] — bump allocation with checkpoint/rewind for AST references
//! - [`Interner`]/[`Symbol`] — string interning for O(1) equality
//! - [`Span`]/[`span::Location`] — source location tracking
//! - [`diag::BccError`]/[`diag::Result`] — two-letter-code diagnostics
//!
//! # Design Principles
//!
//! This crate has no knowledge of B's grammar or semantics. It provides only
//! generic, reusable infrastructure that `bcc-syntax`, `bcc-sema`, and
//! `bcc-codegen` build upon.
//!
//! # Example
//!
//! ```
//! use bcc_base::{Arena, Interner, Span};
//!
//! let arena = Arena::new();
//! let mut interner = Interner::new();
//!
//! let hello = interner.intern("hello");
//! let span = Span::new(0, 5);
//!
//! let allocated = arena.alloc("hello");
//! assert_eq!(*allocated, "hello");
//! let _ = (hello, span);
//! ```

pub mod arena;
pub mod diag;
pub mod intern;
pub mod span;

pub use arena::Arena;
pub use diag::{BccError, ErrorCode, Result, Verbosity};
pub use intern::{Interner, Symbol, SymbolEq};
pub use span::{Location, Span};
