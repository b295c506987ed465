//! Lexer for B source: identifiers, B-style octal-by-default numbers,
//! packed character constants, EOT-terminated strings, `*`-escapes, and
//! the `=<op>` compound-assignment operator family.
//!
//! Single-token-at-a-time, synchronous, no internal buffering beyond the
//! current byte position — the parser's one-token lookahead is layered on
//! top in `parser.rs` rather than by cloning lexer state, per the
//! redesign note on the original's clone-and-restore trick.

use bcc_base::diag::{BccError, ErrorCode, Result};
use bcc_base::span::Location;
use bcc_base::{Arena, Interner, Span, Symbol};

use crate::token::{keyword_kind, Token, TokenKind};

pub struct Lexer<'a, 'i> {
    arena: &'a Arena,
    interner: &'i mut Interner,
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    col: u32,
    file: Symbol,
}

impl<'a, 'i> Lexer<'a, 'i> {
    pub fn new(arena: &'a Arena, interner: &'i mut Interner, src: &'a str, file: Symbol) -> Self {
        Lexer {
            arena,
            interner,
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
            file,
        }
    }

    fn peek(&self) -> u8 {
        *self.bytes.get(self.pos).unwrap_or(&0)
    }

    fn peek2(&self) -> u8 {
        *self.bytes.get(self.pos + 1).unwrap_or(&0)
    }

    fn peek3(&self) -> u8 {
        *self.bytes.get(self.pos + 2).unwrap_or(&0)
    }

    fn get(&mut self) -> u8 {
        let c = self.peek();
        if c == 0 {
            return 0;
        }
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        c
    }

    fn location(&self, line: u32, col: u32) -> Location {
        Location::new(self.file, line, col)
    }

    fn error(&self, line: u32, col: u32, code: ErrorCode, msg: impl Into<String>) -> BccError {
        BccError::new(code, self.location(line, col), msg)
    }

    fn skip_ws_and_comments(&mut self) -> Result<()> {
        loop {
            while self.peek().is_ascii_whitespace() {
                self.get();
            }
            if self.peek() == b'/' && self.peek2() == b'*' {
                self.get();
                self.get();
                loop {
                    if self.peek() == 0 {
                        return Err(self.error(
                            self.line,
                            self.col,
                            ErrorCode::UnterminatedComment,
                            "unterminated /* comment",
                        ));
                    }
                    if self.peek() == b'*' && self.peek2() == b'/' {
                        self.get();
                        self.get();
                        break;
                    }
                    self.get();
                }
                continue;
            }
            if self.peek() == b'/' && self.peek2() == b'/' {
                self.get();
                self.get();
                while self.peek() != 0 && self.peek() != b'\n' {
                    self.get();
                }
                continue;
            }
            break;
        }
        Ok(())
    }

    fn parse_escape(&mut self, line: u32, col: u32) -> Result<u8> {
        let e = self.get();
        if e == 0 {
            return Err(self.error(
                line,
                col,
                ErrorCode::ExprSyntax,
                "unterminated escape sequence",
            ));
        }
        Ok(match e {
            b'0' => 0,
            b'e' => 4, // EOT
            b'(' => b'(',
            b')' => b')',
            b't' => b'\t',
            b'*' => b'*',
            b'\'' => b'\'',
            b'"' => b'"',
            b'n' => b'\n',
            other => {
                return Err(self.error(
                    line,
                    col,
                    ErrorCode::ExprSyntax,
                    format!("unknown escape sequence *{}", other as char),
                ))
            }
        })
    }

    /// Scans and returns the next token, or `Eof` at end of input.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_ws_and_comments()?;
        let (line, col) = (self.line, self.col);
        let loc = self.location(line, col);
        let start = self.pos;
        let c = self.peek();

        if c == 0 {
            return Ok(Token::new(TokenKind::Eof, Span::new(start, start), loc));
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            while self.peek().is_ascii_alphanumeric() || self.peek() == b'_' || self.peek() == b'.'
            {
                self.get();
            }
            let text = &self.src[start..self.pos];
            let kind = keyword_kind(text).unwrap_or(TokenKind::Ident);
            let span = Span::new(start, self.pos);
            let mut tok = Token::new(kind, span, loc);
            if kind == TokenKind::Ident {
                tok = tok.with_lexeme(self.interner.intern(text));
            }
            return Ok(tok);
        }

        if c.is_ascii_digit() {
            while self.peek().is_ascii_digit() {
                self.get();
            }
            let text = &self.src[start..self.pos];
            let value = if c == b'0' {
                let mut v: i64 = 0;
                for ch in text.bytes() {
                    if !(b'0'..=b'9').contains(&ch) {
                        return Err(self.error(
                            line,
                            col,
                            ErrorCode::ExprSyntax,
                            format!("bad octal digit '{}'", ch as char),
                        ));
                    }
                    v = v.wrapping_mul(8).wrapping_add((ch - b'0') as i64);
                }
                v
            } else {
                text.parse::<i64>().map_err(|_| {
                    self.error(line, col, ErrorCode::ExprSyntax, "bad number")
                })?
            };
            let span = Span::new(start, self.pos);
            return Ok(Token::new(TokenKind::Number, span, loc).with_value(value));
        }

        if c == b'"' {
            self.get();
            let mut buf = Vec::new();
            loop {
                let ch = self.get();
                if ch == 0 {
                    return Err(self.error(line, col, ErrorCode::ExprSyntax, "unterminated string"));
                }
                if ch == b'"' {
                    break;
                }
                let ch = if ch == b'*' {
                    self.parse_escape(line, col)?
                } else {
                    ch
                };
                buf.push(ch);
            }
            let text = unsafe { std::str::from_utf8_unchecked(&buf) };
            self.arena.sdup(text); // keeps the decoded bytes alive for the emitter's string pool
            let sym = self.interner.intern(text);
            let span = Span::new(start, self.pos);
            let tok = Token::new(TokenKind::String, span, loc).with_lexeme(sym);
            return Ok(tok);
        }

        if c == b'\'' {
            self.get();
            let mut chars = [0u8; 4];
            let mut count = 0usize;
            loop {
                let ch = self.get();
                if ch == 0 {
                    return Err(self.error(
                        line,
                        col,
                        ErrorCode::ExprSyntax,
                        "unterminated character constant",
                    ));
                }
                if ch == b'\'' {
                    break;
                }
                if count >= 4 {
                    return Err(self.error(
                        line,
                        col,
                        ErrorCode::ExprSyntax,
                        "character constant too long",
                    ));
                }
                let ch = if ch == b'*' {
                    self.parse_escape(line, col)?
                } else {
                    ch
                };
                chars[count] = ch;
                count += 1;
            }
            let mut val: i64 = 0;
            for i in 0..count {
                val |= (chars[i] as i64) << (8 * i);
            }
            let span = Span::new(start, self.pos);
            return Ok(Token::new(TokenKind::Char, span, loc).with_value(val));
        }

        // Two-char and `=<op>` operator family.
        if c == b'+' && self.peek2() == b'+' {
            self.get();
            self.get();
            return Ok(Token::new(TokenKind::PlusPlus, Span::new(start, self.pos), loc));
        }
        if c == b'-' && self.peek2() == b'-' {
            self.get();
            self.get();
            return Ok(Token::new(TokenKind::MinusMinus, Span::new(start, self.pos), loc));
        }

        if c == b'=' {
            let n = self.peek2();
            macro_rules! two {
                ($kind:expr) => {{
                    self.get();
                    self.get();
                    return Ok(Token::new($kind, Span::new(start, self.pos), loc));
                }};
            }
            macro_rules! three {
                ($kind:expr) => {{
                    self.get();
                    self.get();
                    self.get();
                    return Ok(Token::new($kind, Span::new(start, self.pos), loc));
                }};
            }
            match n {
                b'+' => two!(TokenKind::PlusEq),
                b'-' => two!(TokenKind::MinusEq),
                b'*' => two!(TokenKind::StarEq),
                b'/' => two!(TokenKind::SlashEq),
                b'%' => two!(TokenKind::PercentEq),
                b'&' => two!(TokenKind::AndEq),
                b'|' => two!(TokenKind::OrEq),
                b'<' => {
                    // Longest match first: =<<  then  =<=  then  =<
                    if self.peek3() == b'<' {
                        three!(TokenKind::LShiftEq)
                    } else if self.peek3() == b'=' {
                        three!(TokenKind::LeEq)
                    } else {
                        two!(TokenKind::LtEq)
                    }
                }
                b'>' => {
                    if self.peek3() == b'>' {
                        three!(TokenKind::RShiftEq)
                    } else if self.peek3() == b'=' {
                        three!(TokenKind::GeEq)
                    } else {
                        two!(TokenKind::GtEq)
                    }
                }
                b'=' if self.peek3() == b'=' => three!(TokenKind::EqEq),
                b'!' if self.peek3() == b'=' => three!(TokenKind::NeEq),
                _ => {}
            }
        }

        if c == b'<' && self.peek2() == b'<' {
            self.get();
            self.get();
            return Ok(Token::new(TokenKind::LShift, Span::new(start, self.pos), loc));
        }
        if c == b'>' && self.peek2() == b'>' {
            self.get();
            self.get();
            return Ok(Token::new(TokenKind::RShift, Span::new(start, self.pos), loc));
        }
        if c == b'|' && self.peek2() == b'|' {
            self.get();
            self.get();
            return Ok(Token::new(TokenKind::BarBar, Span::new(start, self.pos), loc));
        }
        if c == b'=' && self.peek2() == b'=' {
            self.get();
            self.get();
            return Ok(Token::new(TokenKind::Eq, Span::new(start, self.pos), loc));
        }
        if c == b'!' && self.peek2() == b'=' {
            self.get();
            self.get();
            return Ok(Token::new(TokenKind::Ne, Span::new(start, self.pos), loc));
        }
        if c == b'<' && self.peek2() == b'=' {
            self.get();
            self.get();
            return Ok(Token::new(TokenKind::Le, Span::new(start, self.pos), loc));
        }
        if c == b'>' && self.peek2() == b'=' {
            self.get();
            self.get();
            return Ok(Token::new(TokenKind::Ge, Span::new(start, self.pos), loc));
        }

        self.get();
        let kind = match c {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semi,
            b':' => TokenKind::Colon,
            b'=' => TokenKind::Assign,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'!' => TokenKind::Bang,
            b'?' => TokenKind::Question,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'&' => TokenKind::Amp,
            b'|' => TokenKind::Bar,
            other => {
                return Err(self.error(
                    line,
                    col,
                    ErrorCode::ExprSyntax,
                    format!("unexpected character '{}'", other as char),
                ))
            }
        };
        Ok(Token::new(kind, Span::new(start, self.pos), loc))
    }

    /// The raw source slice backing `span` (includes quotes for string
    /// tokens), mainly useful for diagnostics context excerpts.
    pub fn text(&self, span: Span) -> &'a str {
        &self.src[span.start..span.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(src: &str) -> Vec<TokenKind> {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let file = interner.intern("test.b");
        let mut lexer = Lexer::new(&arena, &mut interner, src, file);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().expect("lex error");
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        let kinds = lex_all("auto x; extrn y;");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Auto,
                TokenKind::Ident,
                TokenKind::Semi,
                TokenKind::Extrn,
                TokenKind::Ident,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn identifier_accepts_embedded_dot() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let file = interner.intern("test.b");
        let mut lexer = Lexer::new(&arena, &mut interner, "a.b.c", file);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Ident);
        assert_eq!(lexer.text(tok.span), "a.b.c");
    }

    #[test]
    fn octal_default_accepts_digits_eight_and_nine() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let file = interner.intern("test.b");
        let mut lexer = Lexer::new(&arena, &mut interner, "09", file);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Number);
        assert_eq!(tok.value, 9); // 011 octal == 9 decimal
    }

    #[test]
    fn decimal_number_without_leading_zero() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let file = interner.intern("test.b");
        let mut lexer = Lexer::new(&arena, &mut interner, "42", file);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.value, 42);
    }

    #[test]
    fn char_constant_packs_bytes_lsb_first() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let file = interner.intern("test.b");
        let mut lexer = Lexer::new(&arena, &mut interner, "'ab'", file);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Char);
        assert_eq!(tok.value, 'a' as i64 | (('b' as i64) << 8));
    }

    #[test]
    fn escape_e_produces_eot_byte() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let file = interner.intern("test.b");
        let mut lexer = Lexer::new(&arena, &mut interner, "'*e'", file);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.value, 4);
    }

    #[test]
    fn longest_match_on_relational_assignment() {
        let kinds = lex_all("x =<= y;");
        assert!(kinds.contains(&TokenKind::LeEq));
        assert!(!kinds.contains(&TokenKind::LtEq));
    }

    #[test]
    fn shift_assignment_operators() {
        let kinds = lex_all("x =<< 1;");
        assert!(kinds.contains(&TokenKind::LShiftEq));
    }

    #[test]
    fn block_comment_is_skipped() {
        let kinds = lex_all("/* comment */ auto x;");
        assert_eq!(kinds[0], TokenKind::Auto);
    }

    #[test]
    fn line_comment_is_skipped() {
        let kinds = lex_all("auto x; // trailing\nextrn y;");
        assert!(kinds.contains(&TokenKind::Extrn));
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let file = interner.intern("test.b");
        let mut lexer = Lexer::new(&arena, &mut interner, "/* never closed", file);
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnterminatedComment);
    }

    #[test]
    fn unknown_escape_is_an_error() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let file = interner.intern("test.b");
        let mut lexer = Lexer::new(&arena, &mut interner, "'*q'", file);
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.code, ErrorCode::ExprSyntax);
    }

    #[test]
    fn line_and_column_advance_across_newlines() {
        let arena = Arena::new();
        let mut interner = Interner::new();
        let file = interner.intern("test.b");
        let mut lexer = Lexer::new(&arena, &mut interner, "a\nb", file);
        let first = lexer.next_token().unwrap();
        assert_eq!(first.location.line, 1);
        let second = lexer.next_token().unwrap();
        assert_eq!(second.location.line, 2);
        assert_eq!(second.location.col, 1);
    }
}
