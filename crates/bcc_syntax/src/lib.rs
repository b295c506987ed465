#![cfg_attr(docsrs, feature(doc_cfg))]

//! # bcc-syntax
//!
//! Lexer, parser, and AST for B source.
//!
//! ## Architecture
//!
//! 1. **Lexer** ([`lexer`]) tokenizes B source into a stream of [`Token`]s,
//!    interning identifiers and string literals as it goes.
//! 2. **Parser** ([`parser`]) runs recursive descent over that stream,
//!    buffering up to two tokens of lookahead, and builds an arena-allocated
//!    [`ast::Program`].
//! 3. **Fold** ([`fold`]) evaluates constant expressions — used directly by
//!    the parser for `case` labels, and reused by the semantic analyzer for
//!    extern-def vector bounds.
//!
//! ```
//! use bcc_base::{Arena, Interner};
//! use bcc_syntax::parser::Parser;
//!
//! let arena = Arena::new();
//! let mut interner = Interner::new();
//! let file = interner.intern("hello.b");
//! let mut parser = Parser::new(&arena, &mut interner, "main() { return(0); }", file).unwrap();
//! let program = parser.parse_program().unwrap();
//! assert_eq!(program.items.len(), 1);
//! ```

pub mod ast;
pub mod fold;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::Program;
pub use fold::fold_const;
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenKind};
