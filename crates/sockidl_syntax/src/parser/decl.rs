/// Declaration parsing methods.
///
/// This chunk parses the brace-delimited declarations: modules, interfaces, structs, enums, and typedefs.
///
/// ## Notes
/// - A malformed member inside a module or interface body is reported, abandoned, and skipped with
///   `Parser::synchronize()`; the rest of the body is still parsed.
/// - Reaching end of input inside a body is reported once and ends the body.
impl<'a> Parser<'a> {
    // ========================================================================
    // Modules
    // ========================================================================

    fn module_decl(&mut self) -> Result<ModuleDecl, Diagnostic> {
        self.expect_keyword(KeywordId::Module, "expected 'module'")?;
        let name = self.identifier_spanned("module name")?;
        self.expect_punct(PunctuationId::LBrace, "expected '{' after module name")?;

        let mut members = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            let start = self.current_span();
            let member = if self.check_keyword(KeywordId::Interface) {
                self.interface_decl(Some(&name.node)).map(ModuleMember::Interface)
            } else if self.check_keyword(KeywordId::Struct) {
                self.struct_decl().map(ModuleMember::Struct)
            } else if self.check_keyword(KeywordId::Enum) {
                self.enum_decl().map(ModuleMember::Enum)
            } else if self.check_keyword(KeywordId::Typedef) {
                self.typedef_decl().map(ModuleMember::Typedef)
            } else {
                let err = self
                    .error_here(&format!("unexpected token in module '{}'", name.node))
                    .with_hint("a module may contain interfaces, structs, enums and typedefs");
                self.errors.push(err);
                self.advance();
                continue;
            };

            match member {
                Ok(member) => members.push(Spanned::new(member, self.span_from(start))),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        self.close_body(&format!("module '{}'", name.node))?;
        Ok(ModuleDecl { name, members })
    }

    // ========================================================================
    // Interfaces
    // ========================================================================

    fn interface_decl(&mut self, module: Option<&str>) -> Result<InterfaceDecl, Diagnostic> {
        self.expect_keyword(KeywordId::Interface, "expected 'interface'")?;
        let name = self.identifier_spanned("interface name")?;
        self.expect_punct(PunctuationId::LBrace, "expected '{' after interface name")?;

        let mut members = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            let start = self.current_span();
            let member = if self.check_keyword(KeywordId::Struct) {
                self.struct_decl().map(InterfaceMember::Struct)
            } else if self.check_keyword(KeywordId::Enum) {
                self.enum_decl().map(InterfaceMember::Enum)
            } else {
                self.method_decl().map(InterfaceMember::Method)
            };

            match member {
                Ok(member) => members.push(Spanned::new(member, self.span_from(start))),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        self.close_body(&format!("interface '{}'", name.node))?;
        Ok(InterfaceDecl {
            name,
            module: module.map(str::to_string),
            members,
        })
    }

    // ========================================================================
    // Data types
    // ========================================================================

    fn struct_decl(&mut self) -> Result<StructDecl, Diagnostic> {
        self.expect_keyword(KeywordId::Struct, "expected 'struct'")?;
        let name = self.identifier_spanned("struct name")?;
        self.expect_punct(PunctuationId::LBrace, "expected '{' after struct name")?;

        let mut fields = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            let start = self.current_span();
            match self.field_decl() {
                Ok(field) => fields.push(Spanned::new(field, self.span_from(start))),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        self.close_body(&format!("struct '{}'", name.node))?;
        Ok(StructDecl { name, fields })
    }

    fn field_decl(&mut self) -> Result<FieldDecl, Diagnostic> {
        let ty = self.type_spec()?;
        let name = self.identifier_spanned("field name")?;
        self.expect_punct(PunctuationId::Semicolon, "expected ';' after field")?;
        Ok(FieldDecl { ty, name })
    }

    fn enum_decl(&mut self) -> Result<EnumDecl, Diagnostic> {
        self.expect_keyword(KeywordId::Enum, "expected 'enum'")?;
        let name = self.identifier_spanned("enum name")?;
        self.expect_punct(PunctuationId::LBrace, "expected '{' after enum name")?;

        let mut values = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) {
            values.push(self.identifier_spanned("enum value")?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }

        self.close_body(&format!("enum '{}'", name.node))?;
        Ok(EnumDecl { name, values })
    }

    fn typedef_decl(&mut self) -> Result<TypedefDecl, Diagnostic> {
        self.expect_keyword(KeywordId::Typedef, "expected 'typedef'")?;
        let base = self.type_spec()?;
        let name = self.identifier_spanned("typedef name")?;
        self.expect_punct(PunctuationId::Semicolon, "expected ';' after typedef")?;
        Ok(TypedefDecl { name, base })
    }

    /// Consume the `}` closing a body plus an optional `;`.
    fn close_body(&mut self, what: &str) -> Result<(), Diagnostic> {
        self.expect_punct(PunctuationId::RBrace, &format!("expected '}}' to close {what}"))?;
        self.optional_semicolon();
        Ok(())
    }
}
