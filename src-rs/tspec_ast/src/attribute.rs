//! `with { ... }` attributes

use crate::node::Node;

/// A single attribute attached to a definition
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    /// `encode "BER"`
    Encode(Node<String>),
    /// `variant "..."`, passed through to the generated code untouched
    Variant(Node<String>),
    /// `errorbehavior(UNBOUND:ERROR, ALL:WARNING)`
    ErrorBehavior(Vec<ErrorBehaviorSettingNode>),
}

/// A node containing an attribute
pub type AttributeNode = Node<Attribute>;

/// One `ERROR_TYPE:HANDLING` pair of an `errorbehavior` attribute
///
/// Both keys are kept as written; they are validated during analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorBehaviorSetting {
    error_type: Node<String>,
    handling: Node<String>,
}

/// A node containing an error behaviour setting
pub type ErrorBehaviorSettingNode = Node<ErrorBehaviorSetting>;

impl ErrorBehaviorSetting {
    #[must_use]
    pub const fn new(error_type: Node<String>, handling: Node<String>) -> Self {
        Self {
            error_type,
            handling,
        }
    }

    #[must_use]
    pub const fn error_type(&self) -> &Node<String> {
        &self.error_type
    }

    #[must_use]
    pub const fn handling(&self) -> &Node<String> {
        &self.handling
    }
}
