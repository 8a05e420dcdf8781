//! Type expressions

use crate::{naming::IdentifierNode, node::Node, reference::ReferenceNode};

/// A type as written in a type definition, a governor or a field
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Boolean,
    Integer,
    Float,
    Charstring,
    Octetstring,
    Bitstring,
    Enumerated(Vec<EnumItemNode>),
    Record(Vec<FieldNode>),
    Set(Vec<FieldNode>),
    Union(Vec<FieldNode>),
    RecordOf(TypeNode),
    SetOf(TypeNode),
    Reference(ReferenceNode),
}

/// A node containing a type
pub type TypeNode = Node<Type>;

impl Type {
    /// Returns a short human readable name for the kind of type
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Charstring => "charstring",
            Self::Octetstring => "octetstring",
            Self::Bitstring => "bitstring",
            Self::Enumerated(_) => "enumerated",
            Self::Record(_) => "record",
            Self::Set(_) => "set",
            Self::Union(_) => "union",
            Self::RecordOf(_) => "record of",
            Self::SetOf(_) => "set of",
            Self::Reference(_) => "type reference",
        }
    }
}

/// An item of an enumerated type, optionally with an explicit number
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumItem {
    name: IdentifierNode,
    number: Option<Node<i64>>,
}

/// A node containing an enumeration item
pub type EnumItemNode = Node<EnumItem>;

impl EnumItem {
    #[must_use]
    pub const fn new(name: IdentifierNode, number: Option<Node<i64>>) -> Self {
        Self { name, number }
    }

    #[must_use]
    pub const fn name(&self) -> &IdentifierNode {
        &self.name
    }

    #[must_use]
    pub const fn number(&self) -> Option<&Node<i64>> {
        self.number.as_ref()
    }
}

/// A field of a record or set, or an alternative of a union
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    name: IdentifierNode,
    ty: TypeNode,
    optional: bool,
}

/// A node containing a field
pub type FieldNode = Node<Field>;

impl Field {
    #[must_use]
    pub const fn new(name: IdentifierNode, ty: TypeNode, optional: bool) -> Self {
        Self { name, ty, optional }
    }

    #[must_use]
    pub const fn name(&self) -> &IdentifierNode {
        &self.name
    }

    #[must_use]
    pub const fn ty(&self) -> &TypeNode {
        &self.ty
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }
}
