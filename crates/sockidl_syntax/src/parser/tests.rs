#[cfg(test)]
/// Parser unit tests.
///
/// These cover each production and the recovery behavior (one diagnostic per malformed construct, no
/// cascades).
mod tests {
    use super::*;
    use crate::lexer;
    use sockidl_core::lang::primitives::PrimitiveId;

    fn parse_str(source: &str) -> Result<CompilationUnit, Vec<Diagnostic>> {
        let tokens = lexer::lex(source).map_err(|_| vec![])?;
        parse(&tokens)
    }

    fn parse_errors(source: &str) -> Vec<Diagnostic> {
        match parse_str(source) {
            Ok(unit) => panic!("expected syntax errors, parsed {unit:?}"),
            Err(errs) => errs,
        }
    }

    #[test]
    fn test_parse_calc_interface() {
        let unit = parse_str("interface Calc { int add(in int a, in int b); };").unwrap();
        let calc = unit.interface("Calc").expect("Calc parsed");
        assert_eq!(calc.module, None);
        let methods: Vec<_> = calc.methods().collect();
        assert_eq!(methods.len(), 1);
        let add = methods[0];
        assert_eq!(add.name(), "add");
        assert_eq!(add.return_type.node, TypeRef::Primitive(PrimitiveId::I32));
        assert_eq!(add.params.len(), 2);
        assert_eq!(add.params[1].node.name.node, "b");
        assert_eq!(add.params[1].node.direction, Direction::In);
        assert!(!add.is_callback);
    }

    #[test]
    fn test_directions_and_default() {
        let unit = parse_str("interface S { void f(int a, out string b, inout long c); }").unwrap();
        let f = unit.interfaces().next().and_then(|i| i.methods().next()).expect("method");
        let directions: Vec<_> = f.params.iter().map(|p| p.node.direction).collect();
        assert_eq!(directions, vec![Direction::In, Direction::Out, Direction::Inout]);
        assert!(f.has_output_params());
        assert!(f.returns_void());
    }

    #[test]
    fn test_callback_and_sequence() {
        let unit = parse_str("interface K { callback void changed(in sequence<string> keys); };").unwrap();
        let m = unit.interfaces().next().and_then(|i| i.methods().next()).expect("method");
        assert!(m.is_callback);
        assert_eq!(
            m.params[0].node.ty.node,
            TypeRef::Sequence(Box::new(TypeRef::Primitive(PrimitiveId::String)))
        );
    }

    #[test]
    fn test_array_suffixes() {
        let unit = parse_str("interface A { void f(in int fixed[4], in Point dynamic[], in int plain); };").unwrap();
        let m = unit.interfaces().next().and_then(|i| i.methods().next()).expect("method");
        let arrays: Vec<_> = m.params.iter().map(|p| p.node.array).collect();
        assert_eq!(arrays, vec![Some(ArraySuffix::Fixed(4)), Some(ArraySuffix::Dynamic), None]);
    }

    #[test]
    fn test_module_contents_and_flattening() {
        let source = r#"
module school {
    enum Gender { MALE, FEMALE, };
    struct Address { string city; int zip; };
    typedef sequence<Address> AddressList;
    interface Registry { void add(in Address a); };
};
interface Top { void ping(); };
"#;
        let unit = parse_str(source).unwrap();
        let names: Vec<_> = unit.interfaces().map(|i| i.name().to_string()).collect();
        assert_eq!(names, vec!["Registry", "Top"]);

        let school = unit.module("school").expect("module");
        assert_eq!(school.enums().next().map(|e| e.values.len()), Some(2));
        assert_eq!(school.structs().next().map(|s| s.fields.len()), Some(2));
        let typedef = school.typedefs().next().expect("typedef");
        assert_eq!(typedef.name.node, "AddressList");
        assert_eq!(typedef.base.node.to_string(), "sequence<Address>");
        assert_eq!(unit.interface("Registry").and_then(|i| i.module.clone()), Some("school".to_string()));
    }

    #[test]
    fn test_interface_local_types() {
        let unit = parse_str("interface I { enum Mode { A, B }; struct P { int x; }; void set(in Mode m); };").unwrap();
        let iface = unit.interfaces().next().expect("interface");
        assert_eq!(iface.enums().count(), 1);
        assert_eq!(iface.structs().count(), 1);
        assert_eq!(iface.methods().count(), 1);
    }

    #[test]
    fn test_semicolons_after_braces_are_optional() {
        assert!(parse_str("module m { struct S { int a; } } interface I { }").is_ok());
    }

    #[test]
    fn test_missing_interface_name_is_single_error() {
        let errs = parse_errors("interface { }");
        assert_eq!(errs.len(), 1, "{errs:?}");
        assert!(errs[0].message.contains("expected interface name"), "{}", errs[0].message);
        assert_eq!((errs[0].line(), errs[0].column()), (1, 11));
    }

    #[test]
    fn test_unknown_top_level_tokens_are_skipped_one_at_a_time() {
        let errs = parse_errors("struct X interface I { };");
        // `struct` and `X` are each reported; the interface still parses.
        assert_eq!(errs.len(), 2, "{errs:?}");
        assert!(errs[0].message.starts_with("expected 'module' or 'interface'"));
    }

    #[test]
    fn test_bad_method_does_not_hide_later_errors() {
        let source = "interface I {\n  int (in int a);\n  void ok();\n  string bad(in int);\n};";
        let errs = parse_errors(source);
        assert_eq!(errs.len(), 2, "{errs:?}");
        assert_eq!(errs[0].line(), 2);
        assert_eq!(errs[1].line(), 4);
    }

    #[test]
    fn test_nested_sequence_is_rejected() {
        let errs = parse_errors("interface I { void f(in sequence<sequence<int>> x); };");
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("nested sequence"));
    }

    #[test]
    fn test_unexpected_module_member() {
        let errs = parse_errors("module m { void f(); };");
        assert!(errs[0].message.contains("unexpected token in module 'm'"));
    }

    #[test]
    fn test_eof_inside_interface() {
        let errs = parse_errors("interface I { void f();");
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("end of input"));
    }

    #[test]
    fn test_zero_array_size_is_rejected() {
        let errs = parse_errors("interface I { void f(in int a[0]); };");
        assert!(errs[0].message.contains("invalid array size 0"));
    }

    #[test]
    fn test_reserved_word_as_name_has_hint() {
        let errs = parse_errors("interface I { void f(in int string); };");
        assert!(!errs[0].hints.is_empty());
    }
}
