//! Lexical analysis.
//!
//! Grounded in `original_source/brewlex.py`'s token set: keywords, the
//! operator/punctuation set of spec §6, integer literals, unescaped
//! double-quoted strings, and `/* ... */` comments that may span lines.

use crate::cursor::{Cursor, EOF_CHAR};
use crate::error::{Error, Result};
use crate::span::Span;
use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    /// Original source.
    source: &'a str,
    /// Byte position where the current token starts in the original source.
    start_pos: usize,
    /// Line the current token starts on.
    start_line: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer from the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut cursor = Cursor::new(source);

        // Prime the cursor for the first iteration.
        cursor.bump();
        let start_pos = cursor.try_pos().unwrap_or(source.len());

        Self {
            cursor,
            source,
            start_pos,
            start_line: 1,
        }
    }

    /// Original source passed into the lexer.
    #[inline]
    pub fn source(&self) -> &str {
        self.source
    }

    fn start_token(&mut self) {
        self.start_pos = self.cursor.try_pos().unwrap_or_else(|| self.source.len());
        self.start_line = self.cursor.line();
    }

    fn make_token(&mut self, kind: TokenKind) -> Token {
        let start = self.start_pos;
        let end = self.cursor.peek_offset();
        debug_assert!(start <= end);
        let size = end - start;

        let token = Token {
            kind,
            span: Span::new(start, size),
            line: self.start_line,
        };

        self.cursor.bump();
        token
    }

    /// Scan the source and produce the next token. Returns `TokenKind::Eof`
    /// once, then repeatedly (callers should stop after seeing it).
    pub fn next_token(&mut self) -> Result<Token> {
        use TokenKind as T;

        loop {
            self.start_token();

            return Ok(match self.cursor.try_char() {
                Some(ch) if rules::is_whitespace(ch) => {
                    self.cursor.bump();
                    continue;
                }
                Some('/') if self.cursor.peek_char() == Some('*') => {
                    self.skip_block_comment()?;
                    continue;
                }
                Some(EOF_CHAR) if self.cursor.at_end() => self.make_token(T::Eof),
                Some('(') => self.make_token(T::LeftParen),
                Some(')') => self.make_token(T::RightParen),
                Some('{') => self.make_token(T::LeftBrace),
                Some('}') => self.make_token(T::RightBrace),
                Some(',') => self.make_token(T::Comma),
                Some('.') => self.make_token(T::Dot),
                Some('@') => self.make_token(T::At),
                Some(';') => self.make_token(T::Semi),
                Some('+') => self.make_token(T::Plus),
                Some('-') => self.make_token(T::Minus),
                Some('*') => self.make_token(T::Star),
                Some('/') => self.make_token(T::Slash),
                Some('=') if self.cursor.peek_char() == Some('=') => {
                    self.cursor.bump();
                    self.make_token(T::Eq)
                }
                Some('=') => self.make_token(T::Assign),
                Some('!') if self.cursor.peek_char() == Some('=') => {
                    self.cursor.bump();
                    self.make_token(T::NotEq)
                }
                Some('!') => self.make_token(T::Not),
                Some('>') if self.cursor.peek_char() == Some('=') => {
                    self.cursor.bump();
                    self.make_token(T::GreaterEq)
                }
                Some('>') => self.make_token(T::Greater),
                Some('<') if self.cursor.peek_char() == Some('=') => {
                    self.cursor.bump();
                    self.make_token(T::LessEq)
                }
                Some('<') => self.make_token(T::Less),
                Some('&') if self.cursor.peek_char() == Some('&') => {
                    self.cursor.bump();
                    self.make_token(T::AndAnd)
                }
                Some('|') if self.cursor.peek_char() == Some('|') => {
                    self.cursor.bump();
                    self.make_token(T::OrOr)
                }
                Some('"') => self.consume_string()?,
                Some(ch) if rules::is_digit(ch) => self.consume_number(),
                Some(ch) if rules::is_ident_start(ch) => self.consume_ident(),
                Some(ch) => {
                    return Err(Error::syntax(
                        format!("illegal character '{ch}'"),
                        Some(self.start_line),
                    ))
                }
                None => self.make_token(T::Eof),
            });
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        // Consume the opening `/*`.
        self.cursor.bump();
        self.cursor.bump();

        loop {
            match self.cursor.try_char() {
                Some('*') if self.cursor.peek_char() == Some('/') => {
                    self.cursor.bump();
                    self.cursor.bump();
                    return Ok(());
                }
                Some(_) => {
                    self.cursor.bump();
                }
                None => {
                    return Err(Error::syntax(
                        "unterminated block comment",
                        Some(self.start_line),
                    ))
                }
            }
        }
    }

    fn consume_number(&mut self) -> Token {
        while self.cursor.peek_char().is_some_and(rules::is_digit) {
            self.cursor.bump();
        }
        self.make_token(TokenKind::Number)
    }

    fn consume_ident(&mut self) -> Token {
        while self
            .cursor
            .peek_char()
            .is_some_and(rules::is_ident_continue)
        {
            self.cursor.bump();
        }

        let fragment = {
            let end = self.cursor.peek_offset();
            &self.source[self.start_pos..end]
        };

        match keyword(fragment) {
            Some(kind) => self.make_token(kind),
            None => self.make_token(TokenKind::Ident),
        }
    }

    fn consume_string(&mut self) -> Result<Token> {
        // Consume the opening quote.
        self.cursor.bump();

        loop {
            match self.cursor.try_char() {
                Some('"') => return Ok(self.make_token(TokenKind::String)),
                Some(_) => {
                    self.cursor.bump();
                }
                None => {
                    return Err(Error::syntax(
                        "unterminated string literal",
                        Some(self.start_line),
                    ))
                }
            }
        }
    }
}

fn keyword(fragment: &str) -> Option<TokenKind> {
    Some(match fragment {
        "func" => TokenKind::Func,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "return" => TokenKind::Return,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "nil" => TokenKind::Nil,
        "lambda" => TokenKind::Lambda,
        "ref" => TokenKind::Ref,
        _ => return None,
    })
}

/// Given a string token, the raw text with surrounding quotes stripped.
pub fn string_contents(token: &Token, source: &str) -> String {
    let text = token.fragment(source);
    text[1..text.len() - 1].to_string()
}

/// Functions for testing characters.
mod rules {
    #[inline(always)]
    pub fn is_whitespace(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\n' | '\r')
    }

    #[inline(always)]
    pub fn is_digit(c: char) -> bool {
        c.is_ascii_digit()
    }

    #[inline(always)]
    pub fn is_ident_start(c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_'
    }

    #[inline(always)]
    pub fn is_ident_continue(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().expect("lex");
            let done = token.kind == TokenKind::Eof;
            out.push(token.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn test_punctuation() {
        use TokenKind::*;
        assert_eq!(
            kinds("(){};,.@"),
            vec![
                LeftParen, RightParen, LeftBrace, RightBrace, Semi, Comma, Dot, At, Eof
            ]
        );
    }

    #[test]
    fn test_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("== != <= >= < > = + - * / && || !"),
            vec![
                Eq, NotEq, LessEq, GreaterEq, Less, Greater, Assign, Plus, Minus, Star, Slash,
                AndAnd, OrOr, Not, Eof
            ]
        );
    }

    #[test]
    fn test_keywords_vs_idents() {
        use TokenKind::*;
        assert_eq!(
            kinds("func if else while return true false nil lambda ref foo"),
            vec![
                Func, If, Else, While, Return, True, False, Nil, Lambda, Ref, Ident, Eof
            ]
        );
    }

    #[test]
    fn test_number() {
        let mut lexer = Lexer::new("12345");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Number);
        assert_eq!(token.fragment("12345"), "12345");
    }

    #[test]
    fn test_string_literal() {
        let source = "\"hello world\"";
        let mut lexer = Lexer::new(source);
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(string_contents(&token, source), "hello world");
    }

    #[test]
    fn test_block_comment_skipped() {
        use TokenKind::*;
        assert_eq!(kinds("/* a comment\nspanning lines */ x"), vec![Ident, Eof]);
    }

    #[test]
    fn test_line_tracking() {
        let mut lexer = Lexer::new("x\ny\nz");
        assert_eq!(lexer.next_token().unwrap().line, 1);
        assert_eq!(lexer.next_token().unwrap().line, 2);
        assert_eq!(lexer.next_token().unwrap().line, 3);
    }

    #[test]
    fn test_illegal_character() {
        let mut lexer = Lexer::new("#");
        assert!(lexer.next_token().is_err());
    }
}
