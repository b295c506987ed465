#![cfg_attr(docsrs, feature(doc_cfg))]

//! # bcc-sema
//!
//! Two-pass semantic analysis over a parsed [`bcc_syntax::ast::Program`]:
//! forward name collection, body-check with scope-aware resolution,
//! implicit-static promotion for undeclared bare references, and a
//! fallthrough-adjacency scan over `switch` bodies.
//!
//! ```
//! use bcc_base::{Arena, Interner};
//! use bcc_sema::analyze::Analyzer;
//! use bcc_syntax::parser::Parser;
//!
//! let arena = Arena::new();
//! let mut interner = Interner::new();
//! let file = interner.intern("hello.b");
//! let mut parser = Parser::new(&arena, &mut interner, "main() { putchar('h'); }", file).unwrap();
//! let program = parser.parse_program().unwrap();
//! let analyzer = Analyzer::new(&arena, &mut interner);
//! let analyzed = analyzer.analyze(&program).unwrap();
//! assert!(analyzed.warnings.is_empty());
//! ```

pub mod analyze;
pub mod builtins;
pub mod scope;

pub use analyze::{Analyzed, Analyzer, Warning};
