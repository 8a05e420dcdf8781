//! Index types into the project arenas

use std::fmt;

/// Index of a module in a [`Project`](crate::Project)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(usize);

impl ModuleId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A module level definition, identified by its module and its position
/// among the module's definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentId {
    module: ModuleId,
    index: usize,
}

impl AssignmentId {
    /// Creates the id of the `index`th definition of `module`
    #[must_use]
    pub const fn new(module: ModuleId, index: usize) -> Self {
        Self { module, index }
    }

    /// Returns the module holding the definition
    #[must_use]
    pub const fn module(self) -> ModuleId {
        self.module
    }

    /// Returns the position of the definition within its module
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.module.0, self.index)
    }
}

/// Index of a lexical scope in a [`ScopeTable`](crate::scope::ScopeTable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) const fn index(self) -> usize {
        self.0
    }
}
