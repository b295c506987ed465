//! Diagnostics: the historical two-letter error codes, and both the
//! compact and verbose presentation modes.
//!
//! B's error codes predate "helpful" compiler messages: `sx`, `ex`, `lv`,
//! `rd`, `un`, `xx`, plus the delimiter-imbalance codes `()`, `[]`, `{}`,
//! `*/`, and four codes (`>s`, `>e`, `>c`, `>i`) reserved for overflowing a
//! pre-sized table — a thing this implementation's growable containers
//! never actually do, but the codes exist in the taxonomy so a port that
//! imposes size caps has somewhere to report them.
//!
//! ```
//! use bcc_base::diag::{BccError, ErrorCode};
//! use bcc_base::span::Location;
//! use bcc_base::Interner;
//!
//! let mut interner = Interner::new();
//! let file = interner.intern("a.b");
//! let err = BccError::new(ErrorCode::Undefined, Location::new(file, 4, 1), "foo");
//! assert_eq!(err.to_string(), "un a.b:4");
//! ```

use crate::intern::{Interner, Symbol};
use crate::span::Location;
use std::fmt;

/// One of B's historical two-letter (or two-symbol) error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// `sx` — statement syntax: the parser expected a statement form.
    StmtSyntax,
    /// `ex` — expression syntax: the parser expected an operand or operator.
    ExprSyntax,
    /// `lv` — assignment, address-of, or increment applied to a non-lvalue.
    NotLvalue,
    /// `rd` — redeclaration of a name already bound in the same scope.
    Redeclared,
    /// `un` — a name that does not resolve to any variable, function, or extrn.
    Undefined,
    /// `xx` — malformed external definition.
    ExternSyntax,
    /// `(` `)` — unterminated parenthesis group.
    UnmatchedParen,
    /// `[` `]` — unterminated bracket group.
    UnmatchedBracket,
    /// `{` `}` — unterminated brace group.
    UnmatchedBrace,
    /// `*/` — unterminated block comment.
    UnterminatedComment,
    /// `>s` — symbol table overflow (reserved; unused by this implementation's
    /// growable tables).
    SymbolTableOverflow,
    /// `>e` — expression table overflow (reserved).
    ExprTableOverflow,
    /// `>c` — case table overflow (reserved).
    CaseTableOverflow,
    /// `>i` — label table overflow (reserved).
    LabelTableOverflow,
}

impl ErrorCode {
    /// The historical two-character code, as printed in compact mode.
    pub fn code(self) -> &'static str {
        match self {
            ErrorCode::StmtSyntax => "sx",
            ErrorCode::ExprSyntax => "ex",
            ErrorCode::NotLvalue => "lv",
            ErrorCode::Redeclared => "rd",
            ErrorCode::Undefined => "un",
            ErrorCode::ExternSyntax => "xx",
            ErrorCode::UnmatchedParen => "()",
            ErrorCode::UnmatchedBracket => "[]",
            ErrorCode::UnmatchedBrace => "{}",
            ErrorCode::UnterminatedComment => "*/",
            ErrorCode::SymbolTableOverflow => ">s",
            ErrorCode::ExprTableOverflow => ">e",
            ErrorCode::CaseTableOverflow => ">c",
            ErrorCode::LabelTableOverflow => ">i",
        }
    }

    /// A human-readable label used in verbose mode, e.g. "expected a statement".
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::StmtSyntax => "expected a statement",
            ErrorCode::ExprSyntax => "expected an operand or operator",
            ErrorCode::NotLvalue => "expression is not an lvalue",
            ErrorCode::Redeclared => "redeclaration in the same scope",
            ErrorCode::Undefined => "undefined name",
            ErrorCode::ExternSyntax => "malformed external definition",
            ErrorCode::UnmatchedParen => "unterminated parenthesis",
            ErrorCode::UnmatchedBracket => "unterminated bracket",
            ErrorCode::UnmatchedBrace => "unterminated brace",
            ErrorCode::UnterminatedComment => "unterminated comment",
            ErrorCode::SymbolTableOverflow => "symbol table overflow",
            ErrorCode::ExprTableOverflow => "expression table overflow",
            ErrorCode::CaseTableOverflow => "case table overflow",
            ErrorCode::LabelTableOverflow => "label table overflow",
        }
    }
}

/// Whether a [`BccError`] renders as the historical two-letter compact form
/// or the verbose `file:line:col: error: ...` form with a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Compact,
    Verbose,
}

/// A single fatal diagnostic.
///
/// `BccError` always carries enough to render either presentation mode;
/// which one is used is a property of the `Display` call site (via
/// [`BccError::render`]), not of the error itself, so the same error value
/// can be logged compactly and also shown verbosely to the user.
#[derive(Debug, Clone)]
pub struct BccError {
    pub code: ErrorCode,
    pub location: Location,
    pub message: String,
    /// The source line the diagnostic points into, if available, used only
    /// by the verbose caret rendering.
    pub source_line: Option<String>,
}

impl BccError {
    pub fn new(code: ErrorCode, location: Location, message: impl Into<String>) -> Self {
        BccError {
            code,
            location,
            message: message.into(),
            source_line: None,
        }
    }

    /// Attaches the source line the diagnostic occurred on, enabling the
    /// verbose caret rendering.
    pub fn with_source_line(mut self, line: impl Into<String>) -> Self {
        self.source_line = Some(line.into());
        self
    }

    /// Renders this diagnostic against `interner` (to resolve the filename
    /// symbol) in the requested verbosity.
    pub fn render(&self, interner: &Interner, verbosity: Verbosity) -> String {
        let file = interner.resolve(self.location.file);
        match verbosity {
            Verbosity::Compact => format!("{} {}:{}", self.code.code(), file, self.location.line),
            Verbosity::Verbose => {
                let mut out = format!(
                    "{}:{}:{}: error: {}",
                    file, self.location.line, self.location.col, self.message
                );
                if let Some(src) = &self.source_line {
                    out.push('\n');
                    out.push_str(src);
                    out.push('\n');
                    let col = self.location.col.max(1) as usize;
                    out.push_str(&" ".repeat(col - 1));
                    out.push('^');
                }
                out
            }
        }
    }
}

impl fmt::Display for BccError {
    /// Falls back to the compact form with a raw filename placeholder; use
    /// [`BccError::render`] with an [`Interner`] for a real rendering.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}",
            self.code.code(),
            file_placeholder(self.location.file),
            self.location.line
        )
    }
}

fn file_placeholder(_sym: Symbol) -> &'static str {
    // Display can't resolve a Symbol without an Interner; callers that care
    // about the real filename should use `render`. Kept so `BccError`
    // still implements `std::error::Error` usably in contexts without one.
    "<file>"
}

impl std::error::Error for BccError {}

pub type Result<T> = std::result::Result<T, BccError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(interner: &mut Interner, file: &str, line: u32, col: u32) -> Location {
        Location::new(interner.intern(file), line, col)
    }

    #[test]
    fn compact_render_matches_historical_format() {
        let mut interner = Interner::new();
        let l = loc(&mut interner, "prog.b", 12, 1);
        let err = BccError::new(ErrorCode::Undefined, l, "undefined name 'foo'");
        assert_eq!(err.render(&interner, Verbosity::Compact), "un prog.b:12");
    }

    #[test]
    fn verbose_render_includes_column_and_message() {
        let mut interner = Interner::new();
        let l = loc(&mut interner, "prog.b", 3, 5);
        let err = BccError::new(ErrorCode::NotLvalue, l, "expression is not an lvalue");
        let rendered = err.render(&interner, Verbosity::Verbose);
        assert!(rendered.starts_with("prog.b:3:5: error: expression is not an lvalue"));
    }

    #[test]
    fn verbose_render_with_source_line_has_caret_under_column() {
        let mut interner = Interner::new();
        let l = loc(&mut interner, "prog.b", 1, 5);
        let err = BccError::new(ErrorCode::ExprSyntax, l, "expected an operand")
            .with_source_line("x = + ;");
        let rendered = err.render(&interner, Verbosity::Verbose);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "x = + ;");
        assert_eq!(lines[2], "    ^");
    }

    #[test]
    fn all_codes_round_trip_through_code_string() {
        let codes = [
            ErrorCode::StmtSyntax,
            ErrorCode::ExprSyntax,
            ErrorCode::NotLvalue,
            ErrorCode::Redeclared,
            ErrorCode::Undefined,
            ErrorCode::ExternSyntax,
            ErrorCode::UnmatchedParen,
            ErrorCode::UnmatchedBracket,
            ErrorCode::UnmatchedBrace,
            ErrorCode::UnterminatedComment,
            ErrorCode::SymbolTableOverflow,
            ErrorCode::ExprTableOverflow,
            ErrorCode::CaseTableOverflow,
            ErrorCode::LabelTableOverflow,
        ];
        for code in codes {
            assert!(!code.code().is_empty());
            assert!(!code.description().is_empty());
        }
    }
}
