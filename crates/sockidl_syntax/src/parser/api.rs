/// Parse a token stream into a [`CompilationUnit`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `sockidl_syntax::lexer`.
///
/// ## Errors
/// Returns `Err(Vec<Diagnostic>)` with every syntax diagnostic if any construct was malformed.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<CompilationUnit, Vec<Diagnostic>> {
    Parser::new(tokens).parse()
}
