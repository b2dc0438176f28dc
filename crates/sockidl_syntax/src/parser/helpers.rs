/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords and punctuation
/// - Error recovery (`synchronize`, `skip_declaration`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    /// Return the most recently consumed token (or the first token if nothing was consumed yet).
    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        if self.is_at_end() {
            return self.peek();
        }
        self.pos += 1;
        &self.tokens[self.pos - 1]
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> Result<&Token, Diagnostic> {
        if self.check_keyword(id) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<&Token, Diagnostic> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    /// Build a syntax error at the current token, quoting what was found.
    fn error_here(&self, msg: &str) -> Diagnostic {
        Diagnostic::syntax(format!("{}, found {}", msg, self.peek().kind), self.current_span())
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Span from `start` through the most recently consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous().span)
    }

    /// Consume an optional `;` after a brace-closed construct.
    fn optional_semicolon(&mut self) {
        self.match_punct(PunctuationId::Semicolon);
    }

    // ========================================================================
    // Error recovery
    // ========================================================================

    /// Skip the rest of a malformed member.
    ///
    /// Stops after the next `;` at brace depth zero, or before a `}` that closes the enclosing body.
    /// Nested `{ ... }` groups are skipped whole.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            if self.check_punct(PunctuationId::LBrace) {
                depth += 1;
            } else if self.check_punct(PunctuationId::RBrace) {
                if depth == 0 {
                    return;
                }
                depth -= 1;
            } else if depth == 0 && self.check_punct(PunctuationId::Semicolon) {
                self.advance();
                return;
            }
            self.advance();
        }
    }

    /// Skip the rest of a malformed top-level declaration.
    ///
    /// Consumes through the `}` that balances the declaration's body (plus an optional `;`), or stops at the next
    /// `module`/`interface` keyword if no body was opened.
    fn skip_declaration(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            if depth == 0 && (self.check_keyword(KeywordId::Module) || self.check_keyword(KeywordId::Interface)) {
                return;
            }
            if self.check_punct(PunctuationId::LBrace) {
                depth += 1;
            } else if self.check_punct(PunctuationId::RBrace) {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    self.advance();
                    self.optional_semicolon();
                    return;
                }
            }
            self.advance();
        }
    }

    /// Parse a plain identifier.
    fn identifier_spanned(&mut self, what: &str) -> Result<Spanned<Ident>, Diagnostic> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let span = self.current_span();
                let name = name.clone();
                self.advance();
                Ok(Spanned::new(name, span))
            }
            TokenKind::Keyword(_) | TokenKind::Primitive(_) => Err(self
                .error_here(&format!("expected {what}"))
                .with_hint("reserved words cannot be used as names")),
            _ => Err(self.error_here(&format!("expected {what}"))),
        }
    }
}
