/// Method and parameter parsing.
///
/// ```text
/// method := 'callback'? type_spec IDENT '(' (param (',' param)*)? ')' ';'
/// param  := ('in' | 'out' | 'inout')? type_spec IDENT ('[' INT? ']')?
/// ```
impl<'a> Parser<'a> {
    // ========================================================================
    // Methods
    // ========================================================================

    fn method_decl(&mut self) -> Result<MethodDecl, Diagnostic> {
        let is_callback = self.match_keyword(KeywordId::Callback);
        let return_type = self.type_spec()?;
        let name = self.identifier_spanned("method name")?;
        self.expect_punct(PunctuationId::LParen, "expected '(' after method name")?;

        let mut params = Vec::new();
        if !self.check_punct(PunctuationId::RParen) {
            loop {
                let start = self.current_span();
                let param = self.param()?;
                params.push(Spanned::new(param, self.span_from(start)));
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }

        self.expect_punct(PunctuationId::RParen, "expected ')' after parameters")?;
        self.expect_punct(PunctuationId::Semicolon, "expected ';' after method declaration")?;

        Ok(MethodDecl {
            name,
            return_type,
            params,
            is_callback,
        })
    }

    fn param(&mut self) -> Result<Param, Diagnostic> {
        let direction = self.direction();
        let ty = self.type_spec()?;
        let name = self.identifier_spanned("parameter name")?;
        let array = self.array_suffix()?;
        Ok(Param {
            name,
            ty,
            direction,
            array,
        })
    }

    /// Optional direction keyword; parameters default to `in`.
    fn direction(&mut self) -> Direction {
        if self.match_keyword(KeywordId::In) {
            Direction::In
        } else if self.match_keyword(KeywordId::Out) {
            Direction::Out
        } else if self.match_keyword(KeywordId::Inout) {
            Direction::Inout
        } else {
            Direction::default()
        }
    }

    /// Optional `[N]` (fixed) or `[]` (dynamic) after a parameter name.
    fn array_suffix(&mut self) -> Result<Option<ArraySuffix>, Diagnostic> {
        if !self.match_punct(PunctuationId::LBracket) {
            return Ok(None);
        }
        let size = match &self.peek().kind {
            TokenKind::Int(n) => Some(*n),
            _ => None,
        };
        let suffix = match size {
            Some(n) => {
                let span = self.current_span();
                self.advance();
                let size = usize::try_from(n)
                    .ok()
                    .filter(|size| *size > 0)
                    .ok_or_else(|| Diagnostic::syntax(format!("invalid array size {n}"), span))?;
                ArraySuffix::Fixed(size)
            }
            None => ArraySuffix::Dynamic,
        };
        self.expect_punct(PunctuationId::RBracket, "expected ']' after array size")?;
        Ok(Some(suffix))
    }
}
