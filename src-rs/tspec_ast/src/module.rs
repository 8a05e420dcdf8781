//! Modules, the unit of compilation

use std::path::{Path, PathBuf};

use crate::{
    definition::DefinitionNode,
    import::ImportNode,
    naming::{Dialect, IdentifierNode},
    node::Node,
};

/// A parsed module
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    name: IdentifierNode,
    dialect: Dialect,
    file: PathBuf,
    #[cfg_attr(feature = "serde", serde(default))]
    imports: Vec<ImportNode>,
    #[cfg_attr(feature = "serde", serde(default))]
    exports: Option<ExportsNode>,
    #[cfg_attr(feature = "serde", serde(default))]
    definitions: Vec<DefinitionNode>,
}

/// A node containing a module
pub type ModuleNode = Node<Module>;

impl Module {
    #[must_use]
    pub const fn new(
        name: IdentifierNode,
        dialect: Dialect,
        file: PathBuf,
        imports: Vec<ImportNode>,
        exports: Option<ExportsNode>,
        definitions: Vec<DefinitionNode>,
    ) -> Self {
        Self {
            name,
            dialect,
            file,
            imports,
            exports,
            definitions,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &IdentifierNode {
        &self.name
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    #[must_use]
    pub fn imports(&self) -> &[ImportNode] {
        &self.imports
    }

    /// Returns the exports clause of an ASN module
    ///
    /// A missing clause exports everything.
    #[must_use]
    pub const fn exports(&self) -> Option<&ExportsNode> {
        self.exports.as_ref()
    }

    #[must_use]
    pub fn definitions(&self) -> &[DefinitionNode] {
        &self.definitions
    }
}

/// The exports clause of an ASN module
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Exports {
    /// `EXPORTS ALL;`
    All,
    /// `EXPORTS a, b;`
    List(Vec<IdentifierNode>),
}

/// A node containing an exports clause
pub type ExportsNode = Node<Exports>;
