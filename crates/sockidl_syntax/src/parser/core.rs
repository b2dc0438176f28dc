/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse()` entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single "god file".

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass and recovers from errors by abandoning the construct being parsed and
///   synchronizing at the next member (`;`) or declaration (`}`) boundary.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `sockidl_syntax::lexer`, ending with `Eof`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream into a [`CompilationUnit`].
    ///
    /// ## Errors
    /// Returns every syntax [`Diagnostic`] if any construct was malformed.
    pub fn parse(self) -> Result<CompilationUnit, Vec<Diagnostic>> {
        let (unit, errors) = self.parse_recovering();
        if errors.is_empty() { Ok(unit) } else { Err(errors) }
    }

    /// Parse everything that can be parsed, returning the partial unit alongside its diagnostics.
    pub fn parse_recovering(mut self) -> (CompilationUnit, Vec<Diagnostic>) {
        let mut items = Vec::new();

        if self.tokens.is_empty() {
            return (CompilationUnit { items }, self.errors);
        }

        while !self.is_at_end() {
            let start = self.current_span();
            let item = if self.check_keyword(KeywordId::Module) {
                self.module_decl().map(Item::Module)
            } else if self.check_keyword(KeywordId::Interface) {
                self.interface_decl(None).map(Item::Interface)
            } else {
                let err = self.error_here("expected 'module' or 'interface'");
                self.errors.push(err);
                self.advance();
                continue;
            };

            match item {
                Ok(item) => items.push(Spanned::new(item, self.span_from(start))),
                Err(e) => {
                    self.errors.push(e);
                    self.skip_declaration();
                }
            }
        }

        (CompilationUnit { items }, self.errors)
    }
}
