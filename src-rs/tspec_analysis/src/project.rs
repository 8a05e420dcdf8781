//! The project registry
//!
//! A [`Project`] owns every parsed module in an arena indexed by
//! [`ModuleId`], together with the side tables analysis fills in: import
//! tables, per-definition check states and module level diagnostics. The
//! syntax trees themselves are never modified by analysis.

use std::{
    path::Path,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use indexmap::IndexMap;
use tspec_ast::{
    DefinitionKind, Dialect, Exports, Module, Visibility, definition::DefinitionNode,
    naming::canonicalize,
};

use crate::{
    diagnostics::{Diagnostic, Diagnostics},
    ids::{AssignmentId, ModuleId},
    imports::ImportTable,
    info::{AssignmentInfo, CheckState, CheckedAssignment},
    timestamp::{CompilationTimestamp, TimestampClock},
    types::SemType,
};

/// A parsed module with lookup indexes derived from its syntax tree
#[derive(Debug)]
pub(crate) struct SourceModule {
    ast: Module,
    file: Arc<Path>,
    generation: u64,
    definitions: IndexMap<String, usize>,
    duplicates: Vec<(usize, usize)>,
}

impl SourceModule {
    fn new(ast: Module, generation: u64) -> Self {
        let mut definitions = IndexMap::new();
        let mut duplicates = vec![];

        for (index, definition) in ast.definitions().iter().enumerate() {
            let name = definition.name().canonical();
            match definitions.get(&name) {
                Some(first) => duplicates.push((*first, index)),
                None => {
                    definitions.insert(name, index);
                }
            }
        }

        let file = Arc::from(ast.file());

        Self {
            ast,
            file,
            generation,
            definitions,
            duplicates,
        }
    }

    pub(crate) const fn ast(&self) -> &Module {
        &self.ast
    }

    pub(crate) const fn file(&self) -> &Arc<Path> {
        &self.file
    }

    pub(crate) const fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn name(&self) -> String {
        self.ast.name().canonical()
    }

    pub(crate) fn display_name(&self) -> String {
        self.ast.name().to_string()
    }

    pub(crate) const fn dialect(&self) -> Dialect {
        self.ast.dialect()
    }

    pub(crate) fn definition(&self, index: usize) -> &DefinitionNode {
        &self.ast.definitions()[index]
    }

    /// Returns the index of the first definition with the canonical name
    pub(crate) fn find(&self, name: &str) -> Option<usize> {
        self.definitions.get(name).copied()
    }

    /// Iterates over the first definition of every name
    pub(crate) fn named_definitions(&self) -> impl Iterator<Item = (&str, usize)> {
        self.definitions
            .iter()
            .map(|(name, index)| (name.as_str(), *index))
    }

    pub(crate) fn duplicates(&self) -> &[(usize, usize)] {
        &self.duplicates
    }

    /// Returns whether the definition is visible to importing modules
    ///
    /// TTCN modules export their public definitions; ASN modules follow
    /// their exports clause, and export everything without one.
    pub(crate) fn exports(&self, index: usize) -> bool {
        let definition = self.definition(index);

        match self.dialect() {
            Dialect::Ttcn => definition.visibility() == Visibility::Public,
            Dialect::Asn => match self.ast.exports().map(|exports| &**exports) {
                None | Some(Exports::All) => true,
                Some(Exports::List(names)) => names
                    .iter()
                    .any(|name| name.same_as(definition.name())),
            },
        }
    }
}

/// Every module of a project, by id and by canonical name
#[derive(Debug, Default)]
pub(crate) struct Sources {
    modules: Vec<SourceModule>,
    by_name: IndexMap<String, ModuleId>,
}

impl Sources {
    pub(crate) fn module(&self, module: ModuleId) -> &SourceModule {
        &self.modules[module.index()]
    }

    pub(crate) fn find(&self, name: &str) -> Option<ModuleId> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn definition(&self, id: AssignmentId) -> &DefinitionNode {
        self.module(id.module()).definition(id.index())
    }

    /// Returns `Module.name` as written
    pub(crate) fn assignment_name(&self, id: AssignmentId) -> String {
        let module = self.module(id.module());
        format!("{}.{}", module.display_name(), module.definition(id.index()).name())
    }

    pub(crate) fn len(&self) -> usize {
        self.modules.len()
    }
}

/// Check results for the definitions of one module
#[derive(Debug, Default)]
pub(crate) struct ModuleState {
    pub(crate) assignments: Vec<CheckState>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) last_checked: Option<CompilationTimestamp>,
}

impl ModuleState {
    fn new(definition_count: usize) -> Self {
        Self {
            assignments: vec![CheckState::Unchecked; definition_count],
            diagnostics: vec![],
            last_checked: None,
        }
    }
}

/// A set of modules analysed together
#[derive(Debug, Default)]
pub struct Project {
    pub(crate) sources: Sources,
    pub(crate) imports: Vec<ImportTable>,
    pub(crate) states: Vec<ModuleState>,
    clock: TimestampClock,
}

impl Project {
    /// Creates an empty project
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module, replacing any module with the same name
    ///
    /// A replaced module keeps its id. All of its check results are
    /// discarded, so modules that depend on it must be checked again before
    /// code is generated for them.
    pub fn add_module(&mut self, module: Module) -> ModuleId {
        let name = module.name().canonical();
        let definition_count = module.definitions().len();

        if let Some(id) = self.sources.find(&name) {
            let generation = self.sources.module(id).generation() + 1;
            tracing::debug!(module = %name, generation, "replacing module");

            self.sources.modules[id.index()] = SourceModule::new(module, generation);
            self.imports[id.index()].reset();
            self.states[id.index()] = ModuleState::new(definition_count);
            return id;
        }

        tracing::debug!(module = %name, "adding module");
        let id = ModuleId::new(self.sources.modules.len());
        self.sources.modules.push(SourceModule::new(module, 0));
        self.sources.by_name.insert(name, id);
        self.imports.push(ImportTable::default());
        self.states.push(ModuleState::new(definition_count));
        id
    }

    /// Looks up a module by name in either dialect's spelling
    #[must_use]
    pub fn module_id(&self, name: &str) -> Option<ModuleId> {
        self.sources.find(&canonicalize(name))
    }

    /// Iterates over the modules in the order they were added
    pub fn module_ids(&self) -> impl Iterator<Item = ModuleId> + use<> {
        (0..self.sources.len()).map(ModuleId::new)
    }

    /// Returns the modules ordered by canonical name
    #[must_use]
    pub fn module_ids_by_name(&self) -> Vec<ModuleId> {
        let mut names: Vec<_> = self.sources.by_name.iter().collect();
        names.sort_by(|(left, _), (right, _)| left.cmp(right));
        names.into_iter().map(|(_, id)| *id).collect()
    }

    /// Returns the syntax tree of a module
    #[must_use]
    pub fn module(&self, module: ModuleId) -> &Module {
        self.sources.module(module).ast()
    }

    /// Returns the module name as written
    #[must_use]
    pub fn module_name(&self, module: ModuleId) -> String {
        self.sources.module(module).display_name()
    }

    /// Returns the file a module was read from
    #[must_use]
    pub fn module_file(&self, module: ModuleId) -> &Arc<Path> {
        self.sources.module(module).file()
    }

    /// Iterates over the definitions of a module in source order
    pub fn assignment_ids(&self, module: ModuleId) -> impl Iterator<Item = AssignmentId> + use<> {
        let count = self.module(module).definitions().len();
        (0..count).map(move |index| AssignmentId::new(module, index))
    }

    /// Returns the syntax tree of a definition
    #[must_use]
    pub fn definition(&self, id: AssignmentId) -> &DefinitionNode {
        self.sources.definition(id)
    }

    /// Returns `Module.name` as written
    #[must_use]
    pub fn assignment_name(&self, id: AssignmentId) -> String {
        self.sources.assignment_name(id)
    }

    /// Finds a definition of `module` by name
    #[must_use]
    pub fn find_assignment(&self, module: ModuleId, name: &str) -> Option<AssignmentId> {
        self.sources
            .module(module)
            .find(&canonicalize(name))
            .map(|index| AssignmentId::new(module, index))
    }

    /// Returns whether an earlier definition in the same module has the same
    /// name
    #[must_use]
    pub fn is_duplicate_definition(&self, id: AssignmentId) -> bool {
        self.sources
            .module(id.module())
            .duplicates()
            .iter()
            .any(|(_, duplicate)| *duplicate == id.index())
    }

    /// Returns whether the definition kind is illegal in its module's dialect
    #[must_use]
    pub fn is_misplaced_definition(&self, id: AssignmentId) -> bool {
        self.sources.module(id.module()).dialect() == Dialect::Asn
            && !matches!(
                self.definition(id).kind(),
                DefinitionKind::Type(_) | DefinitionKind::Const { .. }
            )
    }

    /// Returns where a definition is in its check lifecycle
    #[must_use]
    pub fn check_state(&self, id: AssignmentId) -> &CheckState {
        &self.states[id.module().index()].assignments[id.index()]
    }

    /// Returns the cached result of a checked definition
    #[must_use]
    pub fn checked(&self, id: AssignmentId) -> Option<&CheckedAssignment> {
        self.check_state(id).checked()
    }

    /// Returns the timestamp of the last completed check of a module
    #[must_use]
    pub fn last_checked(&self, module: ModuleId) -> Option<CompilationTimestamp> {
        self.states[module.index()].last_checked
    }

    /// Returns the resolved imports of a module
    #[must_use]
    pub fn imports(&self, module: ModuleId) -> &ImportTable {
        &self.imports[module.index()]
    }

    /// Marks the change on an import edge as handled
    ///
    /// Returns whether the flag was set.
    pub fn clear_unhandled_change(&mut self, module: ModuleId, edge: usize) -> bool {
        self.imports[module.index()].clear_unhandled_change(edge)
    }

    /// Returns a fresh timestamp for a check pass
    pub fn next_timestamp(&self) -> CompilationTimestamp {
        self.clock.tick()
    }

    /// Returns every diagnostic of a module
    ///
    /// Import diagnostics come first, then module level diagnostics, then
    /// the diagnostics of each definition in source order.
    #[must_use]
    pub fn diagnostics(&self, module: ModuleId) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(self.imports(module).diagnostics());
        diagnostics.extend(&self.states[module.index()].diagnostics);

        for state in &self.states[module.index()].assignments {
            if let Some(checked) = state.checked() {
                diagnostics.extend(checked.diagnostics());
            }
        }

        diagnostics
    }

    /// Returns the diagnostics of every module in the order modules were
    /// added
    #[must_use]
    pub fn all_diagnostics(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for module in self.module_ids() {
            diagnostics.extend(self.diagnostics(module));
        }
        diagnostics
    }

    /// Follows type references through checked type definitions
    ///
    /// Returns `None` if a definition on the way has not been checked or
    /// the references form a cycle.
    #[must_use]
    pub fn type_structure<'a>(&'a self, ty: &'a SemType) -> Option<&'a SemType> {
        let mut current = ty;
        let mut steps = 0;

        while let SemType::Named(id) = current {
            let AssignmentInfo::Type(info) = self.checked(*id)?.info() else {
                return None;
            };

            current = info.ty();
            steps += 1;
            if steps > self.states.len() + self.definition_count() {
                return None;
            }
        }

        Some(current)
    }

    fn definition_count(&self) -> usize {
        self.states.iter().map(|state| state.assignments.len()).sum()
    }

    /// Describes a type for messages
    #[must_use]
    pub fn describe_type(&self, ty: &SemType) -> String {
        describe_type(&self.sources, ty)
    }

    pub(crate) fn parts_mut(&mut self) -> (&Sources, &[ImportTable], &mut [ModuleState]) {
        (&self.sources, &self.imports, &mut self.states)
    }
}

pub(crate) fn describe_type(sources: &Sources, ty: &SemType) -> String {
    match ty {
        SemType::Named(id) => sources.definition(*id).name().to_string(),
        SemType::RecordOf(element) => format!("record of {}", describe_type(sources, element)),
        SemType::SetOf(element) => format!("set of {}", describe_type(sources, element)),
        SemType::Enumerated(_) => "enumerated".to_string(),
        SemType::Record(_) => "record".to_string(),
        SemType::Set(_) => "set".to_string(),
        SemType::Union(_) => "union".to_string(),
        SemType::Error => "<error>".to_string(),
        SemType::Boolean
        | SemType::Integer
        | SemType::Float
        | SemType::Charstring
        | SemType::Octetstring
        | SemType::Bitstring => ty.builtin_name().unwrap_or_default().to_string(),
    }
}

/// A project shared between threads
///
/// Check passes take the write lock; code generation and other readers take
/// the read lock. A poisoned lock is recovered, since every pass leaves the
/// project consistent between definitions.
#[derive(Debug, Clone, Default)]
pub struct SharedProject(Arc<RwLock<Project>>);

impl SharedProject {
    /// Wraps a project for shared access
    #[must_use]
    pub fn new(project: Project) -> Self {
        Self(Arc::new(RwLock::new(project)))
    }

    /// Acquires shared read access
    pub fn read(&self) -> RwLockReadGuard<'_, Project> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires exclusive write access
    pub fn write(&self) -> RwLockWriteGuard<'_, Project> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use tspec_ast::construct::{ModuleBuilder, ty, value};

    use super::*;

    #[test]
    fn replacing_a_module_keeps_its_id_and_resets_results() {
        let mut project = Project::new();
        let first = project.add_module(
            ModuleBuilder::ttcn("M")
                .constant("a", ty::integer(), value::integer(1))
                .build(),
        );
        let timestamp = project.next_timestamp();
        crate::check(&mut project, first, timestamp);
        assert!(project.checked(AssignmentId::new(first, 0)).is_some());

        let second = project.add_module(
            ModuleBuilder::ttcn("M")
                .constant("a", ty::integer(), value::integer(2))
                .constant("b", ty::integer(), value::integer(3))
                .build(),
        );

        assert_eq!(first, second);
        assert!(project.checked(AssignmentId::new(first, 0)).is_none());
        assert_eq!(project.assignment_ids(first).count(), 2);
        assert_eq!(project.last_checked(first), None);
    }

    #[test]
    fn modules_are_found_by_either_spelling() {
        let mut project = Project::new();
        let id = project.add_module(ModuleBuilder::asn("Message-Types").build());

        assert_eq!(project.module_id("Message_Types"), Some(id));
        assert_eq!(project.module_id("Message-Types"), Some(id));
        assert_eq!(project.module_name(id), "Message-Types");
    }

    #[test]
    fn ttcn_exports_public_and_asn_follows_exports_clause() {
        let mut project = Project::new();
        let ttcn = project.add_module(
            ModuleBuilder::ttcn("T")
                .constant("shown", ty::integer(), value::integer(1))
                .private_constant("hidden", ty::integer(), value::integer(2))
                .build(),
        );
        let asn = project.add_module(
            ModuleBuilder::asn("A")
                .constant("one", ty::integer(), value::integer(1))
                .constant("two", ty::integer(), value::integer(2))
                .exports(&["two"])
                .build(),
        );

        let ttcn = project.sources.module(ttcn);
        assert!(ttcn.exports(0));
        assert!(!ttcn.exports(1));

        let asn = project.sources.module(asn);
        assert!(!asn.exports(0));
        assert!(asn.exports(1));
    }
}
