//! Lexer for IDL sources.
//!
//! Handles tokenization including:
//! - Structural keywords (`interface`, `struct`, `enum`, `typedef`, `module`, `sequence`, `callback`, directions)
//! - Primitive type names (`int`, `string`, `void`, `boolean`, ...)
//! - Identifiers and unsigned integer literals
//! - Single-character punctuation
//! - `//` line comments and `/* */` block comments
//!
//! ## Error policy
//!
//! Lexical problems never stop the scan. An unrecognized character is reported and skipped, and an unterminated
//! block comment is reported and consumes the rest of the input, so a single pass reports every independent
//! lexical error.

pub mod tokens;

pub use tokens::{Token, TokenKind, classify_word};

use crate::ast::Span;
use crate::diagnostics::Diagnostic;
use sockidl_core::lang::punctuation;

/// Lexer for IDL source code.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    errors: Vec<Diagnostic>,
}

/// Position captured at the start of a token.
#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    ///
    /// Returns the tokens on success, or every lexical diagnostic on failure. The token stream always ends with
    /// an `Eof` token.
    pub fn tokenize(self) -> Result<Vec<Token>, Vec<Diagnostic>> {
        let (tokens, errors) = self.scan_all();
        if errors.is_empty() { Ok(tokens) } else { Err(errors) }
    }

    /// Tokenize the entire source, returning tokens and diagnostics side by side.
    ///
    /// Tooling (`sockidl lex`) uses this to show the token stream even when some characters were rejected.
    pub fn scan_all(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        while !self.is_at_end() {
            self.scan_token();
        }

        let eof = Span::new(self.current_pos, self.current_pos, self.line, self.column);
        self.tokens.push(Token::new(TokenKind::Eof, "", eof));

        (self.tokens, self.errors)
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.current_pos,
            line: self.line,
            column: self.column,
        }
    }

    fn span_from(&self, mark: Mark) -> Span {
        Span::new(mark.pos, self.current_pos, mark.line, mark.column)
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.mark();

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            ' ' | '\t' | '\r' | '\n' => {}

            '/' if self.peek() == Some('/') => self.skip_line_comment(),
            '/' if self.peek() == Some('*') => self.skip_block_comment(start),

            c if c.is_ascii_digit() => self.scan_number(start),
            c if is_ident_start(c) => self.scan_identifier(start),

            c => match punctuation::from_char(c) {
                Some(id) => self.add_token(TokenKind::Punctuation(id), start),
                None => {
                    self.errors.push(
                        Diagnostic::lexical(format!("unexpected character '{}'", c.escape_debug()), self.span_from(start))
                            .with_hint("allowed punctuation is { } ( ) [ ] < > ; , :"),
                    );
                }
            },
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: Mark) {
        let span = self.span_from(start);
        let lexeme = &self.source[span.start..span.end];
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    // ========================================================================
    // Comments
    // ========================================================================

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip `/* ... */`. Block comments do not nest.
    fn skip_block_comment(&mut self, start: Mark) {
        // consume '*'
        self.advance();
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return;
                }
                Some(_) => {}
                None => {
                    let span = Span::new(start.pos, start.pos + 2, start.line, start.column);
                    self.errors.push(
                        Diagnostic::lexical("unterminated block comment", span)
                            .with_note("the comment runs to the end of the input"),
                    );
                    return;
                }
            }
        }
    }

    // ========================================================================
    // Literals and words
    // ========================================================================

    fn scan_number(&mut self, start: Mark) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        // `12abc` is a malformed literal, not a number followed by an identifier.
        if self.peek().is_some_and(is_ident_start) {
            while self.peek().is_some_and(is_ident_continue) {
                self.advance();
            }
            let span = self.span_from(start);
            self.errors.push(Diagnostic::lexical(
                format!("invalid integer literal '{}'", &self.source[span.start..span.end]),
                span,
            ));
            return;
        }

        let span = self.span_from(start);
        let digits = &self.source[span.start..span.end];
        match digits.parse::<u64>() {
            Ok(value) => self.add_token(TokenKind::Int(value), start),
            Err(_) => self
                .errors
                .push(Diagnostic::lexical(format!("integer literal '{digits}' is too large"), span)),
        }
    }

    fn scan_identifier(&mut self, start: Mark) {
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }
        let span = self.span_from(start);
        let kind = classify_word(&self.source[span.start..span.end]);
        self.add_token(kind, start);
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<Diagnostic>> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================
