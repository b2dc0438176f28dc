//! Type-name resolution.
//!
//! Resolution order for a name, first match wins:
//! 1. a typedef of the enclosing module (its base is resolved recursively, in module scope)
//! 2. any interface declared in the unit, as a handle
//! 3. a primitive spelling
//! 4. a struct or enum declared in the interface body, then in the enclosing module
//!
//! Anything else is an undeclared name.

use std::fmt;

use crate::frontend::ast::{ArraySuffix, Param, Span, TypeRef};
use crate::frontend::diagnostics::Diagnostic;
use crate::frontend::model::{NamedKind, NamedType, SemanticType, TypeOwner};
use crate::frontend::symbols::{Scope, SymbolTable};
use sockidl_core::lang::primitives;
use sockidl_core::protocol::MAX_FIXED_ARRAY_LEN;

/// Why a type reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    Undeclared { name: String },
    /// `chain` starts and ends with the same typedef name.
    TypedefCycle { chain: Vec<String> },
    /// A sequence of sequences, spelled directly, through a typedef, or as a `[]` parameter.
    NestedSequence { via: Option<String> },
    /// `void` used as a sequence or array element.
    VoidElement,
    /// A fixed array longer than [`MAX_FIXED_ARRAY_LEN`].
    ArrayTooLarge { size: usize },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Undeclared { name } => write!(f, "type '{name}' was never declared"),
            ResolveError::TypedefCycle { chain } => write!(f, "typedef cycle: {}", chain.join(" -> ")),
            ResolveError::NestedSequence { via: Some(name) } => {
                write!(f, "nested sequence types are not supported ('{name}' is already a sequence)")
            }
            ResolveError::NestedSequence { via: None } => write!(f, "nested sequence types are not supported"),
            ResolveError::VoidElement => write!(f, "'void' cannot be used as an element type"),
            ResolveError::ArrayTooLarge { size } => {
                write!(f, "fixed array size {size} exceeds the limit of {MAX_FIXED_ARRAY_LEN}")
            }
        }
    }
}

impl ResolveError {
    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        let diag = Diagnostic::semantic(self.to_string(), span);
        match self {
            ResolveError::Undeclared { .. } => {
                diag.with_hint("declare it as a struct, enum, typedef, or interface before use")
            }
            ResolveError::NestedSequence { .. } => diag.with_hint("declare a struct that holds the inner sequence"),
            ResolveError::ArrayTooLarge { .. } => diag.with_hint("use a dynamic array `[]` or a sequence instead"),
            _ => diag,
        }
    }
}

/// Resolves [`TypeRef`]s against a [`SymbolTable`].
pub struct Resolver<'s, 'a> {
    symbols: &'s SymbolTable<'a>,
}

impl<'s, 'a> Resolver<'s, 'a> {
    pub fn new(symbols: &'s SymbolTable<'a>) -> Self {
        Self { symbols }
    }

    /// Resolve a type as written.
    pub fn resolve(&self, ty: &TypeRef, scope: Scope<'a>) -> Result<SemanticType, ResolveError> {
        self.resolve_in(ty, scope, &mut Vec::new())
    }

    /// Resolve a parameter's type including its `[N]`/`[]` suffix.
    pub fn resolve_param(&self, param: &Param, scope: Scope<'a>) -> Result<SemanticType, ResolveError> {
        let base = self.resolve(&param.ty.node, scope)?;
        let Some(suffix) = param.array else {
            return Ok(base);
        };
        if base.is_void() {
            return Err(ResolveError::VoidElement);
        }
        match suffix {
            ArraySuffix::Fixed(n) if n > MAX_FIXED_ARRAY_LEN => Err(ResolveError::ArrayTooLarge { size: n }),
            ArraySuffix::Fixed(n) => Ok(SemanticType::Array(Box::new(base), n)),
            ArraySuffix::Dynamic if base.is_sequence() => Err(ResolveError::NestedSequence {
                via: named_spelling(&param.ty.node),
            }),
            ArraySuffix::Dynamic => Ok(SemanticType::Sequence(Box::new(base))),
        }
    }

    fn resolve_in(
        &self,
        ty: &TypeRef,
        scope: Scope<'a>,
        visiting: &mut Vec<String>,
    ) -> Result<SemanticType, ResolveError> {
        match ty {
            TypeRef::Primitive(id) => Ok(SemanticType::Primitive(*id)),
            TypeRef::Named(name) => self.resolve_name(name, scope, visiting),
            TypeRef::Sequence(inner) => {
                let element = self.resolve_in(inner, scope, visiting)?;
                if element.is_void() {
                    return Err(ResolveError::VoidElement);
                }
                if element.is_sequence() {
                    return Err(ResolveError::NestedSequence {
                        via: named_spelling(inner),
                    });
                }
                Ok(SemanticType::Sequence(Box::new(element)))
            }
        }
    }

    fn resolve_name(
        &self,
        name: &str,
        scope: Scope<'a>,
        visiting: &mut Vec<String>,
    ) -> Result<SemanticType, ResolveError> {
        if let Some(module) = scope.module {
            if let Some(typedef) = self.symbols.typedef(module, name) {
                if let Some(start) = visiting.iter().position(|seen| seen == name) {
                    let mut chain = visiting[start..].to_vec();
                    chain.push(name.to_string());
                    return Err(ResolveError::TypedefCycle { chain });
                }
                visiting.push(name.to_string());
                let resolved = self.resolve_in(&typedef.base.node, Scope::module(module), visiting);
                visiting.pop();
                return resolved;
            }
        }

        if self.symbols.is_interface(name) {
            return Ok(SemanticType::Handle(name.to_string()));
        }

        if let Some(id) = primitives::from_str(name) {
            return Ok(SemanticType::Primitive(id));
        }

        if let Some(iface) = scope.interface {
            let owner = || TypeOwner::Interface(iface.name().to_string());
            if iface.structs().any(|s| s.name.node == name) {
                return Ok(named(name, NamedKind::Struct, owner()));
            }
            if iface.enums().any(|e| e.name.node == name) {
                return Ok(named(name, NamedKind::Enum, owner()));
            }
        }

        if let Some(module) = scope.module {
            let owner = || TypeOwner::Module(module.to_string());
            if self.symbols.module_struct(module, name).is_some() {
                return Ok(named(name, NamedKind::Struct, owner()));
            }
            if self.symbols.module_enum(module, name).is_some() {
                return Ok(named(name, NamedKind::Enum, owner()));
            }
        }

        Err(ResolveError::Undeclared {
            name: name.to_string(),
        })
    }
}

fn named(name: &str, kind: NamedKind, owner: TypeOwner) -> SemanticType {
    SemanticType::Named(NamedType {
        name: name.to_string(),
        kind,
        owner,
    })
}

fn named_spelling(ty: &TypeRef) -> Option<String> {
    match ty {
        TypeRef::Named(name) => Some(name.clone()),
        _ => None,
    }
}
