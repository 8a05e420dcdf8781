//! Semantic types produced by lowering syntax types

use crate::ids::AssignmentId;

/// A resolved type
///
/// References to type definitions stay symbolic as [`SemType::Named`] so
/// that recursive types are representable; their structure is looked up on
/// demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemType {
    /// `boolean`
    Boolean,
    /// `integer`
    Integer,
    /// `float`
    Float,
    /// `charstring`
    Charstring,
    /// `octetstring`
    Octetstring,
    /// `bitstring`
    Bitstring,
    /// An enumeration with its items
    Enumerated(Vec<EnumItem>),
    /// A record with its fields
    Record(Vec<FieldType>),
    /// A set with its fields
    Set(Vec<FieldType>),
    /// A union with its alternatives
    Union(Vec<FieldType>),
    /// `record of` the element type
    RecordOf(Box<SemType>),
    /// `set of` the element type
    SetOf(Box<SemType>),
    /// A type definition, by identity
    Named(AssignmentId),
    /// The type could not be resolved; already reported
    Error,
}

impl SemType {
    /// Returns the builtin type name, if this is a builtin type
    #[must_use]
    pub const fn builtin_name(&self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some("boolean"),
            Self::Integer => Some("integer"),
            Self::Float => Some("float"),
            Self::Charstring => Some("charstring"),
            Self::Octetstring => Some("octetstring"),
            Self::Bitstring => Some("bitstring"),
            Self::Enumerated(_)
            | Self::Record(_)
            | Self::Set(_)
            | Self::Union(_)
            | Self::RecordOf(_)
            | Self::SetOf(_)
            | Self::Named(_)
            | Self::Error => None,
        }
    }

    /// Returns the fields of a record, set or union
    #[must_use]
    pub fn fields(&self) -> Option<&[FieldType]> {
        match self {
            Self::Record(fields) | Self::Set(fields) | Self::Union(fields) => Some(fields),
            Self::Boolean
            | Self::Integer
            | Self::Float
            | Self::Charstring
            | Self::Octetstring
            | Self::Bitstring
            | Self::Enumerated(_)
            | Self::RecordOf(_)
            | Self::SetOf(_)
            | Self::Named(_)
            | Self::Error => None,
        }
    }

    /// Returns the element type of a record of or set of
    #[must_use]
    pub fn element(&self) -> Option<&Self> {
        match self {
            Self::RecordOf(element) | Self::SetOf(element) => Some(element),
            Self::Boolean
            | Self::Integer
            | Self::Float
            | Self::Charstring
            | Self::Octetstring
            | Self::Bitstring
            | Self::Enumerated(_)
            | Self::Record(_)
            | Self::Set(_)
            | Self::Union(_)
            | Self::Named(_)
            | Self::Error => None,
        }
    }

    /// Returns whether the type could not be resolved
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns whether the type is `integer` or `float`
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

/// An enumeration item with its (possibly automatically assigned) number
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumItem {
    name: String,
    number: i64,
}

impl EnumItem {
    /// Creates an enumeration item
    #[must_use]
    pub const fn new(name: String, number: i64) -> Self {
        Self { name, number }
    }

    /// Returns the item name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the item number
    #[must_use]
    pub const fn number(&self) -> i64 {
        self.number
    }
}

/// A field of a record or set, or an alternative of a union
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldType {
    name: String,
    ty: SemType,
    optional: bool,
}

impl FieldType {
    /// Creates a field
    #[must_use]
    pub const fn new(name: String, ty: SemType, optional: bool) -> Self {
        Self { name, ty, optional }
    }

    /// Returns the field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field type
    #[must_use]
    pub const fn ty(&self) -> &SemType {
        &self.ty
    }

    /// Returns whether the field may be omitted
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }
}
