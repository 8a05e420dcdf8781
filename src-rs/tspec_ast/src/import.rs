//! Module imports

use crate::{naming::IdentifierNode, node::Node};

/// `import from M all;` or `import from M { a, b };`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Import {
    module: IdentifierNode,
    symbols: Vec<IdentifierNode>,
}

/// A node containing an import
pub type ImportNode = Node<Import>;

impl Import {
    /// Creates an import of every visible symbol of `module`
    #[must_use]
    pub const fn all(module: IdentifierNode) -> Self {
        Self {
            module,
            symbols: vec![],
        }
    }

    /// Creates an import of the listed symbols
    #[must_use]
    pub const fn symbols(module: IdentifierNode, symbols: Vec<IdentifierNode>) -> Self {
        Self { module, symbols }
    }

    #[must_use]
    pub const fn module(&self) -> &IdentifierNode {
        &self.module
    }

    /// Returns the explicit symbol list; empty means everything visible
    #[must_use]
    pub fn symbol_list(&self) -> &[IdentifierNode] {
        &self.symbols
    }

    #[must_use]
    pub fn imports_all(&self) -> bool {
        self.symbols.is_empty()
    }
}
