//! Abstract syntax tree for IDL sources.
//!
//! The tree is built once by the parser and never mutated afterwards. Derived facts (resolved types, observer
//! relationships) live in separate tables owned by the compiler's semantic layer.

use std::fmt;

use sockidl_core::lang::primitives::{self, PrimitiveId};

/// Source location: byte offsets plus the 1-based line/column of `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span covering both `self` and `other`; line/column come from whichever starts first.
    pub fn merge(self, other: Span) -> Span {
        let (first, _) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        Span {
            start: first.start,
            end: self.end.max(other.end),
            line: first.line,
            column: first.column,
        }
    }

    /// Byte length of the span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

// ============================================================================
// Compilation unit
// ============================================================================

/// Everything parsed from one IDL source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    pub items: Vec<Spanned<Item>>,
}

/// Top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Module(ModuleDecl),
    Interface(InterfaceDecl),
}

impl CompilationUnit {
    /// All interfaces, top-level and module-nested, in source order.
    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceDecl> {
        self.items.iter().flat_map(|item| -> Box<dyn Iterator<Item = &InterfaceDecl> + '_> {
            match &item.node {
                Item::Interface(iface) => Box::new(std::iter::once(iface)),
                Item::Module(module) => Box::new(module.interfaces()),
            }
        })
    }

    /// All modules, in source order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleDecl> {
        self.items.iter().filter_map(|item| match &item.node {
            Item::Module(module) => Some(module),
            Item::Interface(_) => None,
        })
    }

    /// Look up a module by name.
    pub fn module(&self, name: &str) -> Option<&ModuleDecl> {
        self.modules().find(|m| m.name.node == name)
    }

    /// Look up an interface by name.
    pub fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.interfaces().find(|i| i.name.node == name)
    }
}

// ============================================================================
// Modules
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub name: Spanned<Ident>,
    pub members: Vec<Spanned<ModuleMember>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleMember {
    Interface(InterfaceDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Typedef(TypedefDecl),
}

impl ModuleDecl {
    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceDecl> {
        self.members.iter().filter_map(|m| match &m.node {
            ModuleMember::Interface(i) => Some(i),
            _ => None,
        })
    }

    pub fn structs(&self) -> impl Iterator<Item = &StructDecl> {
        self.members.iter().filter_map(|m| match &m.node {
            ModuleMember::Struct(s) => Some(s),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDecl> {
        self.members.iter().filter_map(|m| match &m.node {
            ModuleMember::Enum(e) => Some(e),
            _ => None,
        })
    }

    pub fn typedefs(&self) -> impl Iterator<Item = &TypedefDecl> {
        self.members.iter().filter_map(|m| match &m.node {
            ModuleMember::Typedef(t) => Some(t),
            _ => None,
        })
    }
}

// ============================================================================
// Interfaces
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: Spanned<Ident>,
    /// Enclosing module, if the interface was declared inside one.
    pub module: Option<Ident>,
    pub members: Vec<Spanned<InterfaceMember>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceMember {
    Struct(StructDecl),
    Enum(EnumDecl),
    Method(MethodDecl),
}

impl InterfaceDecl {
    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match &m.node {
            InterfaceMember::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn structs(&self) -> impl Iterator<Item = &StructDecl> {
        self.members.iter().filter_map(|m| match &m.node {
            InterfaceMember::Struct(s) => Some(s),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDecl> {
        self.members.iter().filter_map(|m| match &m.node {
            InterfaceMember::Enum(e) => Some(e),
            _ => None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name.node
    }
}

// ============================================================================
// Data types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: Spanned<Ident>,
    pub fields: Vec<Spanned<FieldDecl>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub ty: Spanned<TypeRef>,
    pub name: Spanned<Ident>,
}

/// Enumeration; each value's ordinal is its zero-based position.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Spanned<Ident>,
    pub values: Vec<Spanned<Ident>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDecl {
    pub name: Spanned<Ident>,
    pub base: Spanned<TypeRef>,
}

// ============================================================================
// Methods
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: Spanned<Ident>,
    pub return_type: Spanned<TypeRef>,
    pub params: Vec<Spanned<Param>>,
    /// `callback` methods are pushed from server to client and never answered.
    pub is_callback: bool,
}

impl MethodDecl {
    pub fn returns_void(&self) -> bool {
        self.return_type.node.is_void()
    }

    /// Whether any parameter travels back in a response.
    pub fn has_output_params(&self) -> bool {
        self.params.iter().any(|p| p.node.direction.is_output())
    }

    pub fn name(&self) -> &str {
        &self.name.node
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Spanned<Ident>,
    pub ty: Spanned<TypeRef>,
    pub direction: Direction,
    pub array: Option<ArraySuffix>,
}

/// Parameter passing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    In,
    Out,
    Inout,
}

impl Direction {
    /// Sent in the request.
    pub fn is_input(self) -> bool {
        matches!(self, Direction::In | Direction::Inout)
    }

    /// Returned in the response.
    pub fn is_output(self) -> bool {
        matches!(self, Direction::Out | Direction::Inout)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
            Direction::Inout => write!(f, "inout"),
        }
    }
}

/// Trailing `[N]` or `[]` on a parameter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArraySuffix {
    Fixed(usize),
    Dynamic,
}

// ============================================================================
// Type references
// ============================================================================

/// A type as written in the source, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(PrimitiveId),
    Named(Ident),
    Sequence(Box<TypeRef>),
}

impl TypeRef {
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Primitive(PrimitiveId::Void))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(id) => write!(f, "{}", primitives::as_str(*id)),
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::Sequence(inner) => write!(f, "sequence<{inner}>"),
        }
    }
}
