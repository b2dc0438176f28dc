//! Resolved view of a compilation unit.
//!
//! The checker lowers the AST into these types once every name has been resolved. Later stages (classification,
//! protocol planning, emission) read only this model and never go back to unresolved [`TypeRef`]s.
//!
//! [`TypeRef`]: crate::frontend::ast::TypeRef

use std::fmt;

use serde::{Serialize, Serializer};

use crate::frontend::ast::{Direction, Span};
use sockidl_core::lang::primitives::{self, PrimitiveId};

// ============================================================================
// Semantic types
// ============================================================================

/// Whether a named type is an enum or a struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKind {
    Enum,
    Struct,
}

/// Declaring scope of a struct or enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeOwner {
    Module(String),
    Interface(String),
}

impl fmt::Display for TypeOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeOwner::Module(name) => write!(f, "module '{name}'"),
            TypeOwner::Interface(name) => write!(f, "interface '{name}'"),
        }
    }
}

/// Reference to a declared struct or enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    pub name: String,
    pub kind: NamedKind,
    pub owner: TypeOwner,
}

/// A fully resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Primitive(PrimitiveId),
    /// Dynamic sequence (`sequence<T>` or a `[]` parameter); count-prefixed on the wire.
    Sequence(Box<SemanticType>),
    /// Fixed-size `[N]` parameter; no prefix on the wire.
    Array(Box<SemanticType>, usize),
    /// Reference to another interface, carried as an integer handle.
    Handle(String),
    Named(NamedType),
}

impl SemanticType {
    pub fn is_void(&self) -> bool {
        matches!(self, SemanticType::Primitive(PrimitiveId::Void))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, SemanticType::Sequence(_))
    }

    /// The interface this type is a handle to, if any.
    pub fn handle_target(&self) -> Option<&str> {
        match self {
            SemanticType::Handle(name) => Some(name),
            _ => None,
        }
    }

    /// Named types referenced directly or through sequences/arrays, in first-seen order.
    pub fn named_types(&self) -> Vec<&NamedType> {
        let mut out = Vec::new();
        self.collect_named(&mut out);
        out
    }

    fn collect_named<'a>(&'a self, out: &mut Vec<&'a NamedType>) {
        match self {
            SemanticType::Named(named) => {
                if !out.contains(&named) {
                    out.push(named);
                }
            }
            SemanticType::Sequence(inner) | SemanticType::Array(inner, _) => inner.collect_named(out),
            SemanticType::Primitive(_) | SemanticType::Handle(_) => {}
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Primitive(id) => write!(f, "{}", primitives::as_str(*id)),
            SemanticType::Sequence(inner) => write!(f, "sequence<{inner}>"),
            SemanticType::Array(inner, n) => write!(f, "{inner}[{n}]"),
            SemanticType::Handle(name) => write!(f, "handle<{name}>"),
            SemanticType::Named(named) => write!(f, "{}", named.name),
        }
    }
}

/// Serialized as its IDL spelling, e.g. `sequence<int>` or `handle<Sensor>`.
impl Serialize for SemanticType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub name: String,
    pub ty: SemanticType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStruct {
    pub name: String,
    pub owner: TypeOwner,
    pub fields: Vec<ResolvedField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEnum {
    pub name: String,
    pub owner: TypeOwner,
    pub values: Vec<String>,
}

/// A struct or enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Struct(ResolvedStruct),
    Enum(ResolvedEnum),
}

impl TypeDecl {
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Struct(s) => &s.name,
            TypeDecl::Enum(e) => &e.name,
        }
    }

    pub fn owner(&self) -> &TypeOwner {
        match self {
            TypeDecl::Struct(s) => &s.owner,
            TypeDecl::Enum(e) => &e.owner,
        }
    }

    /// Whether `named` refers to this declaration.
    pub fn is(&self, named: &NamedType) -> bool {
        self.name() == named.name && *self.owner() == named.owner
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParam {
    pub name: String,
    pub ty: SemanticType,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMethod {
    pub name: String,
    pub return_type: SemanticType,
    pub params: Vec<ResolvedParam>,
    pub is_callback: bool,
}

impl ResolvedMethod {
    pub fn returns_void(&self) -> bool {
        self.return_type.is_void()
    }

    pub fn has_output_params(&self) -> bool {
        self.params.iter().any(|p| p.direction.is_output())
    }

    /// Whether a call to this method is answered with a response message.
    pub fn has_response(&self) -> bool {
        !self.is_callback && (!self.returns_void() || self.has_output_params())
    }

    /// Parameters carried in the request (`in` and `inout`).
    pub fn input_params(&self) -> impl Iterator<Item = &ResolvedParam> {
        self.params.iter().filter(|p| p.direction.is_input())
    }

    /// Parameters carried back in the response (`out` and `inout`).
    pub fn output_params(&self) -> impl Iterator<Item = &ResolvedParam> {
        self.params.iter().filter(|p| p.direction.is_output())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInterface {
    pub name: String,
    pub module: Option<String>,
    pub methods: Vec<ResolvedMethod>,
    /// Structs and enums declared inside the interface body.
    pub types: Vec<TypeDecl>,
    pub span: Span,
}

impl ResolvedInterface {
    pub fn method(&self, name: &str) -> Option<&ResolvedMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn has_callbacks(&self) -> bool {
        self.methods.iter().any(|m| m.is_callback)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModule {
    pub name: String,
    /// Structs and enums declared at module level, in declaration order.
    pub types: Vec<TypeDecl>,
}

/// Every interface and type declaration of one source, fully resolved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedUnit {
    /// Flattened interface list, in source order.
    pub interfaces: Vec<ResolvedInterface>,
    pub modules: Vec<ResolvedModule>,
}

impl ResolvedUnit {
    pub fn interface(&self, name: &str) -> Option<&ResolvedInterface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn module(&self, name: &str) -> Option<&ResolvedModule> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Look up the declaration a [`NamedType`] refers to.
    pub fn type_decl(&self, named: &NamedType) -> Option<&TypeDecl> {
        let types = match &named.owner {
            TypeOwner::Module(module) => &self.module(module)?.types,
            TypeOwner::Interface(iface) => &self.interface(iface)?.types,
        };
        types.iter().find(|t| t.is(named))
    }
}
