//! Name lookup
//!
//! Local names live in a [`ScopeTable`]: an arena of scopes, each linked to
//! its parent. Parameter and component scopes are filled before they are
//! linked; statement block scopes are linked when opened and grow as their
//! declarations are checked. When the local chain is exhausted, lookup
//! continues in the [`ModuleScope`] of the enclosing module.

use indexmap::IndexMap;
use tspec_shared::span::Span;

use crate::{
    eval::ConstValue,
    ids::{AssignmentId, ModuleId, ScopeId},
    imports::{ImportLookup, ImportTable},
    project::Sources,
    types::SemType,
};

/// What kind of local declaration a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalSymbolKind {
    /// A behaviour parameter
    Param,
    /// A local variable
    Var,
    /// A local constant
    Const,
    /// A variable of the component the behaviour runs on
    ComponentVar,
    /// A constant of the component the behaviour runs on
    ComponentConst,
}

/// A name declared inside a behaviour or a component
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSymbol {
    pub(crate) name: String,
    pub(crate) kind: LocalSymbolKind,
    pub(crate) ty: SemType,
    pub(crate) value: Option<ConstValue>,
    pub(crate) span: Span,
}

impl LocalSymbol {
    /// Creates a symbol without a constant value
    #[must_use]
    pub const fn new(name: String, kind: LocalSymbolKind, ty: SemType, span: Span) -> Self {
        Self {
            name,
            kind,
            ty,
            value: None,
            span,
        }
    }

    /// Attaches the constant value of a `const` declaration
    #[must_use]
    pub fn with_value(mut self, value: Option<ConstValue>) -> Self {
        self.value = value;
        self
    }

    /// Returns the name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns what kind of declaration the symbol is
    #[must_use]
    pub const fn kind(&self) -> LocalSymbolKind {
        self.kind
    }

    /// Returns the declared type
    #[must_use]
    pub const fn ty(&self) -> &SemType {
        &self.ty
    }

    /// Returns the value of a constant, if it was folded
    #[must_use]
    pub const fn value(&self) -> Option<&ConstValue> {
        self.value.as_ref()
    }

    /// Returns the span of the declaration
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns whether the symbol may be assigned to
    #[must_use]
    pub const fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            LocalSymbolKind::Param | LocalSymbolKind::Var | LocalSymbolKind::ComponentVar
        )
    }

    /// Returns whether the symbol belongs to a component
    #[must_use]
    pub const fn is_component_member(&self) -> bool {
        matches!(
            self.kind,
            LocalSymbolKind::ComponentVar | LocalSymbolKind::ComponentConst
        )
    }
}

/// The names declared directly in one scope
#[derive(Debug, Clone, Default)]
pub struct Scope {
    symbols: IndexMap<String, LocalSymbol>,
}

impl Scope {
    /// Creates an empty scope
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a symbol
    ///
    /// If the name is already declared in this scope, the earlier symbol
    /// is kept and returned as the error.
    pub fn insert(&mut self, symbol: LocalSymbol) -> Result<(), &LocalSymbol> {
        if self.symbols.contains_key(&symbol.name) {
            return Err(&self.symbols[&symbol.name]);
        }

        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Returns whether `name` is declared directly in this scope
    #[must_use]
    pub fn has_assignment(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Finds a symbol declared directly in this scope
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&LocalSymbol> {
        self.symbols.get(name)
    }
}

/// An arena of linked scopes
#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    scopes: Vec<(Scope, Option<ScopeId>)>,
}

impl ScopeTable {
    /// Creates an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Links a scope below `parent`, or as a root
    pub fn link(&mut self, scope: Scope, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId::new(self.scopes.len());
        self.scopes.push((scope, parent));
        id
    }

    /// Returns a linked scope for adding declarations
    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()].0
    }

    /// Returns the enclosing scope, if any
    #[must_use]
    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id.index()].1
    }

    /// Finds the innermost declaration of `name` visible from `from`
    #[must_use]
    pub fn lookup(&self, from: ScopeId, name: &str) -> Option<&LocalSymbol> {
        let mut current = Some(from);
        while let Some(id) = current {
            let (scope, parent) = &self.scopes[id.index()];
            if let Some(symbol) = scope.lookup(name) {
                return Some(symbol);
            }
            current = *parent;
        }
        None
    }

    /// Returns whether `name` is visible from `from`
    #[must_use]
    pub fn has_assignment(&self, from: ScopeId, name: &str) -> bool {
        self.lookup(from, name).is_some()
    }
}

/// Why a module level lookup failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No visible definition has the name
    NotFound,
    /// Several imported modules define the name
    Ambiguous(Vec<ModuleId>),
    /// The qualifying module is not imported
    ModuleNotImported,
    /// The module has no definition with the name
    NoSuchAssignment(ModuleId),
    /// The definition is not exported by its module
    NotExported(ModuleId),
}

/// The definitions visible at module level
///
/// Own definitions shadow imported ones. An unqualified name imported from
/// more than one module is ambiguous and must be qualified.
#[derive(Debug, Clone, Copy)]
pub struct ModuleScope<'a> {
    sources: &'a Sources,
    imports: &'a [ImportTable],
    module: ModuleId,
}

impl<'a> ModuleScope<'a> {
    pub(crate) const fn new(sources: &'a Sources, imports: &'a [ImportTable], module: ModuleId) -> Self {
        Self {
            sources,
            imports,
            module,
        }
    }

    /// Returns whether an unqualified name resolves
    #[must_use]
    pub fn has_assignment(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// Looks up an unqualified canonical name
    pub fn lookup(&self, name: &str) -> Result<AssignmentId, LookupError> {
        if let Some(index) = self.sources.module(self.module).find(name) {
            return Ok(AssignmentId::new(self.module, index));
        }

        match self.imports[self.module.index()].lookup(name) {
            ImportLookup::Unique(target) => self
                .sources
                .module(target)
                .find(name)
                .map(|index| AssignmentId::new(target, index))
                .ok_or(LookupError::NoSuchAssignment(target)),
            ImportLookup::Ambiguous(modules) => Err(LookupError::Ambiguous(modules.to_vec())),
            ImportLookup::NotImported => Err(LookupError::NotFound),
        }
    }

    /// Looks up `module.name`, both canonical
    pub fn lookup_qualified(&self, module: &str, name: &str) -> Result<AssignmentId, LookupError> {
        let target = self
            .sources
            .find(module)
            .ok_or(LookupError::ModuleNotImported)?;

        let source = self.sources.module(target);
        if target == self.module {
            return source
                .find(name)
                .map(|index| AssignmentId::new(target, index))
                .ok_or(LookupError::NoSuchAssignment(target));
        }

        if !self.imports[self.module.index()].imports_module(target) {
            return Err(LookupError::ModuleNotImported);
        }

        let index = source
            .find(name)
            .ok_or(LookupError::NoSuchAssignment(target))?;
        if !source.exports(index) {
            return Err(LookupError::NotExported(target));
        }

        Ok(AssignmentId::new(target, index))
    }
}

#[cfg(test)]
mod tests {
    use tspec_ast::construct::{ModuleBuilder, ty, value};

    use super::*;
    use crate::{chain::ReferenceChain, imports::resolve_imports, project::Project};

    #[test]
    fn inner_scopes_shadow_outer_scopes() {
        let mut table = ScopeTable::new();
        let mut outer = Scope::new();
        outer
            .insert(LocalSymbol::new("x".to_string(), LocalSymbolKind::Param, SemType::Integer, Span::new(0, 1)))
            .expect("x is new");
        let outer = table.link(outer, None);
        let inner = table.link(Scope::new(), Some(outer));
        table
            .scope_mut(inner)
            .insert(LocalSymbol::new("x".to_string(), LocalSymbolKind::Const, SemType::Boolean, Span::new(5, 6)))
            .expect("x is new in the inner scope");

        assert_eq!(table.lookup(inner, "x").map(LocalSymbol::kind), Some(LocalSymbolKind::Const));
        assert_eq!(table.lookup(outer, "x").map(LocalSymbol::kind), Some(LocalSymbolKind::Param));
        assert!(!table.has_assignment(inner, "y"));
        assert_eq!(table.parent(inner), Some(outer));
    }

    #[test]
    fn redeclaration_returns_the_first_symbol() {
        let mut scope = Scope::new();
        let first = LocalSymbol::new("v".to_string(), LocalSymbolKind::Var, SemType::Integer, Span::new(0, 1));
        scope.insert(first.clone()).expect("v is new");

        let second = LocalSymbol::new("v".to_string(), LocalSymbolKind::Var, SemType::Float, Span::new(9, 10));
        assert_eq!(scope.insert(second), Err(&first));
    }

    #[test]
    fn module_lookup_prefers_own_definitions_and_checks_qualified_access() {
        let mut project = Project::new();
        let b = project.add_module(
            ModuleBuilder::ttcn("B")
                .constant("shared", ty::integer(), value::integer(1))
                .private_constant("secret", ty::integer(), value::integer(2))
                .build(),
        );
        let c = project.add_module(
            ModuleBuilder::ttcn("C")
                .constant("shared", ty::integer(), value::integer(3))
                .build(),
        );
        project.add_module(ModuleBuilder::ttcn("D").build());
        let a = project.add_module(
            ModuleBuilder::ttcn("A")
                .import_all("B")
                .import_all("C")
                .constant("own", ty::integer(), value::integer(4))
                .build(),
        );
        let timestamp = project.next_timestamp();
        resolve_imports(&mut project, a, &mut ReferenceChain::new(), timestamp);

        let scope = ModuleScope::new(&project.sources, &project.imports, a);

        assert_eq!(scope.lookup("own"), Ok(AssignmentId::new(a, 0)));
        assert_eq!(scope.lookup("shared"), Err(LookupError::Ambiguous(vec![b, c])));
        assert_eq!(scope.lookup_qualified("C", "shared"), Ok(AssignmentId::new(c, 0)));
        assert_eq!(scope.lookup_qualified("B", "secret"), Err(LookupError::NotExported(b)));
        assert_eq!(scope.lookup_qualified("B", "absent"), Err(LookupError::NoSuchAssignment(b)));
        assert_eq!(scope.lookup_qualified("D", "anything"), Err(LookupError::ModuleNotImported));
        assert!(scope.has_assignment("own"));
        assert!(!scope.has_assignment("secret"));
    }
}
