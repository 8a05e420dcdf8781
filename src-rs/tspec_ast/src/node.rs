//! Spanned syntax tree nodes

use std::{fmt, ops::Deref};

use tspec_shared::span::Span;

/// A syntax element and the source range it was parsed from
///
/// Nodes dereference to their element. Equality compares spans too, so
/// trees built by hand should use the `construct` builders.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<T> {
    value: Box<T>,
    span: Span,
}

impl<T> Node<T> {
    /// Creates a node at `span`
    #[must_use]
    pub fn new(value: T, span: Span) -> Self {
        Self {
            value: Box::new(value),
            span,
        }
    }

    /// Returns the source range of the node
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns the same element placed at another span
    #[must_use]
    pub fn with_span(self, span: Span) -> Self {
        Self { span, ..self }
    }
}

impl<T> Deref for Node<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.value, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::Identifier;

    #[test]
    fn nodes_display_as_their_element() {
        let name = Node::new(Identifier::asn("my-module"), Span::new(3, 12));

        assert_eq!(name.to_string(), "my-module");
        assert_eq!(format!("{name}.x"), "my-module.x");
    }
}
