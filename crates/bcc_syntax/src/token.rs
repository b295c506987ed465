//! Token types for the B lexer and parser.
//!
//! B's token set is small: identifiers/keywords, numbers, character and
//! string constants, and a flat list of punctuation and operators —
//! including the `=<op>` compound-assignment family that reads backwards
//! from every later C-family language (`=+` not `+=`).

use bcc_base::{Span, Symbol};
use bcc_base::span::Location;

/// The kind of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Ident,
    Number,
    String,
    /// A packed character constant, e.g. `'ab'`.
    Char,

    // Keywords
    Auto,
    Extrn,
    If,
    Else,
    While,
    Return,
    Goto,
    Switch,
    Case,
    Default,
    Break,
    Continue,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Colon,

    // Operators
    Assign,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Bar,
    BarBar,
    Bang,
    Question,
    LShift,
    RShift,
    PlusPlus,
    MinusMinus,

    // `=<op>` compound assignment family
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AndEq,
    OrEq,
    LShiftEq,
    RShiftEq,

    // Relational-assignment forms: `=<`, `=<=`, `=>`, `=>=`, `===`, `=!=`
    LtEq,
    LeEq,
    GtEq,
    GeEq,
    EqEq,
    NeEq,
}

impl TokenKind {
    /// True for the keyword set recognized by [`keyword_kind`].
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Auto
                | TokenKind::Extrn
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::Goto
                | TokenKind::Switch
                | TokenKind::Case
                | TokenKind::Default
                | TokenKind::Break
                | TokenKind::Continue
        )
    }
}

/// Maps an identifier's text to a keyword [`TokenKind`], or `None` if it's a
/// plain identifier.
pub fn keyword_kind(s: &str) -> Option<TokenKind> {
    Some(match s {
        "auto" => TokenKind::Auto,
        "extrn" => TokenKind::Extrn,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "return" => TokenKind::Return,
        "goto" => TokenKind::Goto,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        _ => return None,
    })
}

/// A single lexed token.
///
/// `lexeme` is set for identifiers and strings (arena-owned text); `value`
/// carries the packed character/number value for `Number` and `Char`
/// tokens. `span` gives the byte range in the source for lexeme slicing;
/// `location` gives the `(file, line, col)` triple diagnostics report against.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Option<Symbol>,
    pub value: i64,
    pub span: Span,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, location: Location) -> Self {
        Token {
            kind,
            lexeme: None,
            value: 0,
            span,
            location,
        }
    }

    pub fn with_lexeme(mut self, lexeme: Symbol) -> Self {
        self.lexeme = Some(lexeme);
        self
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.value = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_base::Interner;

    #[test]
    fn keyword_kind_recognizes_all_keywords() {
        let pairs = [
            ("auto", TokenKind::Auto),
            ("extrn", TokenKind::Extrn),
            ("if", TokenKind::If),
            ("else", TokenKind::Else),
            ("while", TokenKind::While),
            ("return", TokenKind::Return),
            ("goto", TokenKind::Goto),
            ("switch", TokenKind::Switch),
            ("case", TokenKind::Case),
            ("default", TokenKind::Default),
            ("break", TokenKind::Break),
            ("continue", TokenKind::Continue),
        ];
        for (text, kind) in pairs {
            assert_eq!(keyword_kind(text), Some(kind));
        }
    }

    #[test]
    fn keyword_kind_rejects_plain_identifier() {
        assert_eq!(keyword_kind("foo"), None);
        assert_eq!(keyword_kind("printf"), None);
    }

    #[test]
    fn token_with_lexeme_and_value_round_trip() {
        let mut interner = Interner::new();
        let file = interner.intern("a.b");
        let sym = interner.intern("foo");
        let token = Token::new(TokenKind::Ident, Span::new(0, 3), Location::new(file, 1, 1))
            .with_lexeme(sym)
            .with_value(0);
        assert_eq!(token.lexeme, Some(sym));
        assert_eq!(token.kind, TokenKind::Ident);
    }

    #[test]
    fn is_keyword_distinguishes_keywords_from_punctuation() {
        assert!(TokenKind::Auto.is_keyword());
        assert!(!TokenKind::LParen.is_keyword());
        assert!(!TokenKind::Ident.is_keyword());
    }
}
