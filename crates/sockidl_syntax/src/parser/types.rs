/// Type-spec parsing.
///
/// A type-spec is a bare name (identifier or primitive, including `void`) or `sequence<NAME>`.
///
/// ## Notes
/// - Parsing is purely syntactic; whether a name refers to a typedef, struct, enum, or interface is decided by
///   the compiler's resolver.
/// - `sequence<sequence<T>>` is rejected here. Nesting through a typedef is caught during resolution.
impl<'a> Parser<'a> {
    // ========================================================================
    // Types
    // ========================================================================

    fn type_spec(&mut self) -> Result<Spanned<TypeRef>, Diagnostic> {
        let start = self.current_span();

        if self.match_keyword(KeywordId::Sequence) {
            self.expect_punct(PunctuationId::LAngle, "expected '<' after 'sequence'")?;
            if self.check_keyword(KeywordId::Sequence) {
                return Err(Diagnostic::syntax("nested sequence types are not supported", self.current_span())
                    .with_hint("declare a struct that holds the inner sequence"));
            }
            let element = self.bare_type("sequence element type")?;
            self.expect_punct(PunctuationId::RAngle, "expected '>' to close 'sequence<'")?;
            return Ok(Spanned::new(
                TypeRef::Sequence(Box::new(element)),
                self.span_from(start),
            ));
        }

        let ty = self.bare_type("type")?;
        Ok(Spanned::new(ty, self.span_from(start)))
    }

    /// A primitive or named type.
    fn bare_type(&mut self, what: &str) -> Result<TypeRef, Diagnostic> {
        let ty = match &self.peek().kind {
            TokenKind::Primitive(id) => TypeRef::Primitive(*id),
            TokenKind::Ident(name) => TypeRef::Named(name.clone()),
            _ => return Err(self.error_here(&format!("expected {what}"))),
        };
        self.advance();
        Ok(ty)
    }
}

