//! References to definitions

use crate::{naming::IdentifierNode, node::Node};

/// A possibly module-qualified reference such as `x` or `Types.Message`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reference {
    module: Option<IdentifierNode>,
    name: IdentifierNode,
}

/// A node containing a reference
pub type ReferenceNode = Node<Reference>;

impl Reference {
    /// Creates an unqualified reference
    #[must_use]
    pub const fn unqualified(name: IdentifierNode) -> Self {
        Self { module: None, name }
    }

    /// Creates a reference qualified by a module name
    #[must_use]
    pub const fn qualified(module: IdentifierNode, name: IdentifierNode) -> Self {
        Self {
            module: Some(module),
            name,
        }
    }

    /// Returns the qualifying module, if any
    #[must_use]
    pub const fn module(&self) -> Option<&IdentifierNode> {
        self.module.as_ref()
    }

    /// Returns the referenced name
    #[must_use]
    pub const fn name(&self) -> &IdentifierNode {
        &self.name
    }
}
