// src/parser/scanner.rs
//! Lexical scanner for Prolog source text.

use crate::engine::error::PrologError;
use crate::engine::operators::OperatorTable;
use crate::parser::token::{Token, TokenKind};

/// Turns source text into a token stream. Operator symbols come from the
/// operator table and are matched longest-first.
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    symbols: Vec<&'static str>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, ops: &OperatorTable) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            symbols: ops.scanner_symbols(),
        }
    }

    pub fn scan_tokens(mut self) -> Result<Vec<Token>, PrologError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let Some(ch) = self.current_char() else {
                tokens.push(Token::new(TokenKind::Eof, self.line));
                return Ok(tokens);
            };
            let kind = self.scan_token(ch)?;
            tokens.push(Token::new(kind, self.line));
        }
    }

    fn scan_token(&mut self, ch: char) -> Result<TokenKind, PrologError> {
        if ch.is_alphabetic() || ch == '_' {
            return Ok(self.identifier());
        }
        if ch.is_ascii_digit() {
            return self.number();
        }
        match ch {
            '\'' => self.quoted(),
            '(' => self.punct(TokenKind::LeftParen),
            ')' => self.punct(TokenKind::RightParen),
            '[' => self.punct(TokenKind::LeftBracket),
            ']' => self.punct(TokenKind::RightBracket),
            ',' => self.punct(TokenKind::Comma),
            '.' => self.punct(TokenKind::Dot),
            '|' => self.punct(TokenKind::Bar),
            '!' => {
                self.pos += 1;
                Ok(TokenKind::Atom("!".to_string()))
            }
            ':' => {
                self.pos += 1;
                if self.current_char() == Some('-') {
                    self.pos += 1;
                    Ok(TokenKind::Neck)
                } else {
                    Err(PrologError::parse(self.line, "unexpected character: ':'"))
                }
            }
            _ => self.operator(ch),
        }
    }

    fn punct(&mut self, kind: TokenKind) -> Result<TokenKind, PrologError> {
        self.pos += 1;
        Ok(kind)
    }

    /// Atoms, variables, and the alphabetic operators `is` and `mod`.
    fn identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];
        let first = text.chars().next().unwrap_or('_');
        if first == '_' || first.is_uppercase() {
            TokenKind::Variable(text.to_string())
        } else if text == "is" || text == "mod" {
            TokenKind::Op(text.to_string())
        } else {
            TokenKind::Atom(text.to_string())
        }
    }

    /// Integers and floats. A `.` only starts a fraction when a digit
    /// follows, so `3.` scans as the integer 3 and the end-of-clause dot.
    fn number(&mut self) -> Result<TokenKind, PrologError> {
        let start = self.pos;
        while self.current_char().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            self.pos += 1;
        }
        let mut is_float = false;
        if self.current_char() == Some('.')
            && self.peek_next().map(|c| c.is_ascii_digit()).unwrap_or(false)
        {
            is_float = true;
            self.pos += 1;
            while self.current_char().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                self.pos += 1;
            }
        }
        let text = &self.source[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| PrologError::parse(self.line, format!("invalid number: {}", text)))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| PrologError::parse(self.line, format!("invalid number: {}", text)))
        }
    }

    /// Single-quoted string literal.
    fn quoted(&mut self) -> Result<TokenKind, PrologError> {
        let opening_line = self.line;
        self.pos += 1;
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if ch == '\'' {
                let text = self.source[start..self.pos].to_string();
                self.pos += 1;
                return Ok(TokenKind::Str(text));
            }
            if ch == '\n' {
                self.line += 1;
            }
            self.pos += ch.len_utf8();
        }
        Err(PrologError::parse(opening_line, "unterminated string literal"))
    }

    /// Symbolic operators, longest match first.
    fn operator(&mut self, ch: char) -> Result<TokenKind, PrologError> {
        let rest = &self.source[self.pos..];
        for symbol in &self.symbols {
            if rest.starts_with(symbol) {
                self.pos += symbol.len();
                return Ok(TokenKind::Op(symbol.to_string()));
            }
        }
        Err(PrologError::parse(
            self.line,
            format!("unexpected character: '{}'", ch),
        ))
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                self.line += 1;
                self.pos += 1;
            } else if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else if ch == '%' {
                while let Some(c) = self.current_char() {
                    if c == '\n' {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
            } else {
                break;
            }
        }
    }

    fn current_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }
}
