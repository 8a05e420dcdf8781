//! Import resolution
//!
//! Each module has an [`ImportTable`] mapping imported symbol names to the
//! modules that export them. Tables are rebuilt once per timestamp, and
//! resolution follows import edges depth first so that every module a
//! check can reach has a current table.

use std::{mem, sync::Arc};

use indexmap::IndexMap;
use tspec_ast::Dialect;
use tspec_shared::span::Span;

use crate::{
    chain::ReferenceChain,
    diagnostics::Diagnostic,
    error::StructuralError,
    ids::ModuleId,
    project::{Project, Sources},
    timestamp::CompilationTimestamp,
};

/// One `import from` clause after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    module: String,
    span: Span,
    target: Option<ModuleId>,
    unhandled_change: bool,
}

impl ImportEdge {
    /// Returns the imported module name as written
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns the span of the import declaration
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns the imported module, if the import is valid
    #[must_use]
    pub const fn target(&self) -> Option<ModuleId> {
        self.target
    }

    /// Returns whether the resolved target changed since the change was
    /// last marked as handled
    #[must_use]
    pub const fn has_unhandled_change(&self) -> bool {
        self.unhandled_change
    }
}

/// What an unqualified name refers to among the imports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportLookup<'a> {
    /// Imported from exactly one module
    Unique(ModuleId),
    /// Imported from several modules
    Ambiguous(&'a [ModuleId]),
    /// Not imported at all
    NotImported,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct EdgeHistory {
    resolution: Option<(ModuleId, u64)>,
    unhandled_change: bool,
}

/// The imports of one module
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    edges: Vec<ImportEdge>,
    singular: IndexMap<String, ModuleId>,
    plural: IndexMap<String, Vec<ModuleId>>,
    resolved_at: Option<CompilationTimestamp>,
    diagnostics: Vec<Diagnostic>,
    history: IndexMap<String, EdgeHistory>,
}

impl ImportTable {
    /// Returns the import clauses in source order
    #[must_use]
    pub fn edges(&self) -> &[ImportEdge] {
        &self.edges
    }

    /// Looks up an unqualified canonical name
    #[must_use]
    pub fn lookup(&self, name: &str) -> ImportLookup<'_> {
        if let Some(modules) = self.plural.get(name) {
            return ImportLookup::Ambiguous(modules);
        }

        self.singular
            .get(name)
            .map_or(ImportLookup::NotImported, |module| {
                ImportLookup::Unique(*module)
            })
    }

    /// Returns whether some valid import clause names `module`
    #[must_use]
    pub fn imports_module(&self, module: ModuleId) -> bool {
        self.edges.iter().any(|edge| edge.target == Some(module))
    }

    /// Returns the timestamp the table was last resolved at
    #[must_use]
    pub const fn resolved_at(&self) -> Option<CompilationTimestamp> {
        self.resolved_at
    }

    /// Returns the diagnostics raised while resolving
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns whether any import edge has an unhandled change
    #[must_use]
    pub fn has_unhandled_changes(&self) -> bool {
        self.edges.iter().any(ImportEdge::has_unhandled_change)
    }

    fn is_current_for(&self, timestamp: CompilationTimestamp) -> bool {
        self.resolved_at
            .is_some_and(|resolved_at| resolved_at.is_current_for(timestamp))
    }

    /// Forgets the resolution but keeps the history of resolved targets
    pub(crate) fn reset(&mut self) {
        let history = mem::take(&mut self.history);
        *self = Self {
            history,
            ..Self::default()
        };
    }

    pub(crate) fn clear_unhandled_change(&mut self, edge: usize) -> bool {
        let Some(edge) = self.edges.get_mut(edge) else {
            return false;
        };

        let was_set = mem::replace(&mut edge.unhandled_change, false);
        let key = tspec_ast::naming::canonicalize(&edge.module);
        if let Some(history) = self.history.get_mut(&key) {
            history.unhandled_change = false;
        }

        was_set
    }

    fn add_symbol(&mut self, name: &str, module: ModuleId) {
        if let Some(modules) = self.plural.get_mut(name) {
            if !modules.contains(&module) {
                modules.push(module);
            }
            return;
        }

        match self.singular.get(name) {
            Some(existing) if *existing == module => {}
            Some(existing) => {
                let existing = *existing;
                self.singular.shift_remove(name);
                self.plural.insert(name.to_string(), vec![existing, module]);
            }
            None => {
                self.singular.insert(name.to_string(), module);
            }
        }
    }

    fn record_resolution(&mut self, name: &str, resolution: Option<(ModuleId, u64)>) -> bool {
        let history = self.history.entry(name.to_string()).or_default();
        if history.resolution != resolution {
            history.resolution = resolution;
            history.unhandled_change = true;
        }
        history.unhandled_change
    }
}

/// Resolves the imports of `module` and of every module it reaches
///
/// Tables already resolved at `timestamp` are left alone. A cycle of
/// imports is reported once, on the edge that closes it, and that edge is
/// not followed.
pub fn resolve_imports(
    project: &mut Project,
    module: ModuleId,
    chain: &mut ReferenceChain<ModuleId>,
    timestamp: CompilationTimestamp,
) {
    if project.imports[module.index()].is_current_for(timestamp) {
        tracing::trace!(module = module.index(), "imports already resolved");
        return;
    }

    if chain.push(module).is_err() {
        return;
    }

    let targets = resolve_edges(project, module, timestamp);

    for (edge_span, target) in targets {
        if let Some(cycle) = chain.find_cycle(&target) {
            let source = project.sources.module(module);
            let cycle = cycle
                .into_iter()
                .map(|id| project.sources.module(id).display_name())
                .collect();
            let diagnostic = Diagnostic::new(
                Arc::clone(source.file()),
                StructuralError::CircularImport {
                    cycle,
                    span: edge_span,
                },
            );
            project.imports[module.index()].diagnostics.push(diagnostic);
            continue;
        }

        resolve_imports(project, target, chain, timestamp);
    }

    chain.pop();
}

/// Rebuilds the table of one module, returning the edges to follow
fn resolve_edges(
    project: &mut Project,
    module: ModuleId,
    timestamp: CompilationTimestamp,
) -> Vec<(Span, ModuleId)> {
    let Project {
        sources, imports, ..
    } = project;
    let source = sources.module(module);
    let table = &mut imports[module.index()];
    table.reset();
    table.resolved_at = Some(timestamp);

    tracing::debug!(module = %source.display_name(), "resolving imports");

    let mut first_spans: IndexMap<String, Span> = IndexMap::new();
    let mut targets = vec![];

    for import in source.ast().imports() {
        let name_node = import.module();
        let name = name_node.canonical();
        let span = name_node.span();

        let resolution = resolve_edge(sources, module, &name, span, &mut first_spans);
        let current = resolution
            .as_ref()
            .ok()
            .map(|target| (*target, sources.module(*target).generation()));
        let unhandled_change = match &resolution {
            Err(StructuralError::DuplicateImport { .. }) => false,
            Ok(_) | Err(_) => table.record_resolution(&name, current),
        };

        let mut edge = ImportEdge {
            module: name_node.to_string(),
            span,
            target: None,
            unhandled_change,
        };

        match resolution {
            Ok(target) => {
                edge.target = Some(target);
                add_symbols(table, sources, module, target, import.symbol_list(), import.imports_all());
                targets.push((span, target));
            }
            Err(error) => {
                table
                    .diagnostics
                    .push(Diagnostic::new(Arc::clone(source.file()), error));
            }
        }

        table.edges.push(edge);
    }

    targets
}

fn resolve_edge(
    sources: &Sources,
    module: ModuleId,
    name: &str,
    span: Span,
    first_spans: &mut IndexMap<String, Span>,
) -> Result<ModuleId, StructuralError> {
    let source = sources.module(module);

    if name == source.name() {
        return Err(StructuralError::SelfImport {
            module: source.display_name(),
            span,
        });
    }

    if let Some(first_span) = first_spans.get(name) {
        return Err(StructuralError::DuplicateImport {
            module: sources
                .find(name)
                .map_or_else(|| name.to_string(), |id| sources.module(id).display_name()),
            first_span: *first_span,
            duplicate_span: span,
        });
    }
    first_spans.insert(name.to_string(), span);

    let Some(target) = sources.find(name) else {
        return Err(StructuralError::MissingModule {
            module: name.to_string(),
            span,
        });
    };

    if source.dialect() == Dialect::Asn && sources.module(target).dialect() == Dialect::Ttcn {
        return Err(StructuralError::WrongModuleKind {
            importer: source.display_name(),
            module: sources.module(target).display_name(),
            span,
        });
    }

    Ok(target)
}

fn add_symbols(
    table: &mut ImportTable,
    sources: &Sources,
    module: ModuleId,
    target: ModuleId,
    symbols: &[tspec_ast::naming::IdentifierNode],
    imports_all: bool,
) {
    let source = sources.module(module);
    let exporter = sources.module(target);

    if imports_all {
        for (name, index) in exporter.named_definitions() {
            if exporter.exports(index) {
                table.add_symbol(name, target);
            }
        }
        return;
    }

    for symbol in symbols {
        let name = symbol.canonical();
        let error = match exporter.find(&name) {
            Some(index) if exporter.exports(index) => {
                table.add_symbol(&name, target);
                continue;
            }
            Some(_) => crate::error::ResolutionError::SymbolNotExported {
                module: exporter.display_name(),
                name: symbol.to_string(),
                span: symbol.span(),
            },
            None => crate::error::ResolutionError::NoSuchAssignment {
                module: exporter.display_name(),
                name: symbol.to_string(),
                span: symbol.span(),
            },
        };
        table
            .diagnostics
            .push(Diagnostic::new(Arc::clone(source.file()), error));
    }
}

#[cfg(test)]
mod tests {
    use tspec_ast::construct::{ModuleBuilder, ty, value};

    use super::*;
    use crate::error::{AnalysisError, ResolutionError};

    fn resolve(project: &mut Project, module: ModuleId) {
        let timestamp = project.next_timestamp();
        resolve_imports(project, module, &mut ReferenceChain::new(), timestamp);
    }

    fn structural_errors(project: &Project) -> Vec<StructuralError> {
        project
            .module_ids()
            .flat_map(|module| project.imports(module).diagnostics().to_vec())
            .filter_map(|diagnostic| match diagnostic.error() {
                AnalysisError::Structural(error) => Some(error.clone()),
                AnalysisError::Resolution(_) | AnalysisError::Semantic(_) => None,
            })
            .collect()
    }

    #[test]
    fn import_cycle_is_reported_once_on_closing_edge() {
        let mut project = Project::new();
        let a = project.add_module(ModuleBuilder::ttcn("A").import_all("B").build());
        project.add_module(ModuleBuilder::ttcn("B").import_all("C").build());
        let c = project.add_module(ModuleBuilder::ttcn("C").import_all("A").build());

        resolve(&mut project, a);

        let errors = structural_errors(&project);
        assert_eq!(errors.len(), 1);
        let StructuralError::CircularImport { cycle, .. } = &errors[0] else {
            panic!("expected a circular import, got {:?}", errors[0]);
        };
        assert_eq!(cycle, &["A", "B", "C", "A"]);
        assert_eq!(project.imports(c).diagnostics().len(), 1);
    }

    #[test]
    fn resolving_twice_at_same_timestamp_is_a_no_op() {
        let mut project = Project::new();
        let a = project.add_module(ModuleBuilder::ttcn("A").import_all("B").build());
        project.add_module(ModuleBuilder::ttcn("B").import_all("A").build());

        let timestamp = project.next_timestamp();
        resolve_imports(&mut project, a, &mut ReferenceChain::new(), timestamp);
        resolve_imports(&mut project, a, &mut ReferenceChain::new(), timestamp);

        assert_eq!(structural_errors(&project).len(), 1);
    }

    #[test]
    fn duplicate_import_points_at_both_clauses() {
        let mut project = Project::new();
        project.add_module(ModuleBuilder::ttcn("B").build());
        let a = project.add_module(
            ModuleBuilder::ttcn("A")
                .import_all("B")
                .import_symbols("B", &[])
                .build(),
        );

        resolve(&mut project, a);

        let edges = project.imports(a).edges();
        let errors = structural_errors(&project);
        assert_eq!(
            errors,
            [StructuralError::DuplicateImport {
                module: "B".to_string(),
                first_span: edges[0].span(),
                duplicate_span: edges[1].span(),
            }]
        );
        assert!(edges[0].target().is_some());
        assert!(edges[1].target().is_none());
    }

    #[test]
    fn self_missing_and_wrong_kind_imports_are_rejected() {
        let mut project = Project::new();
        project.add_module(ModuleBuilder::ttcn("T").build());
        let a = project.add_module(
            ModuleBuilder::asn("A")
                .import_all("A")
                .import_all("Nowhere")
                .import_all("T")
                .build(),
        );

        resolve(&mut project, a);

        let errors = structural_errors(&project);
        assert!(matches!(errors[0], StructuralError::SelfImport { .. }));
        assert!(matches!(errors[1], StructuralError::MissingModule { .. }));
        assert!(matches!(errors[2], StructuralError::WrongModuleKind { .. }));
    }

    #[test]
    fn symbols_from_two_modules_are_ambiguous() {
        let mut project = Project::new();
        let b = project.add_module(
            ModuleBuilder::ttcn("B")
                .constant("x", ty::integer(), value::integer(1))
                .build(),
        );
        let c = project.add_module(
            ModuleBuilder::ttcn("C")
                .constant("x", ty::integer(), value::integer(2))
                .constant("y", ty::integer(), value::integer(3))
                .build(),
        );
        let a = project.add_module(
            ModuleBuilder::ttcn("A")
                .import_all("B")
                .import_all("C")
                .build(),
        );

        resolve(&mut project, a);

        let table = project.imports(a);
        assert_eq!(table.lookup("x"), ImportLookup::Ambiguous(&[b, c]));
        assert_eq!(table.lookup("y"), ImportLookup::Unique(c));
        assert_eq!(table.lookup("z"), ImportLookup::NotImported);
    }

    #[test]
    fn explicit_symbols_must_exist_and_be_exported() {
        let mut project = Project::new();
        project.add_module(
            ModuleBuilder::ttcn("B")
                .private_constant("hidden", ty::integer(), value::integer(1))
                .build(),
        );
        let a = project.add_module(
            ModuleBuilder::ttcn("A")
                .import_symbols("B", &["hidden", "absent"])
                .build(),
        );

        resolve(&mut project, a);

        let errors: Vec<_> = project
            .imports(a)
            .diagnostics()
            .iter()
            .map(|diagnostic| diagnostic.error().clone())
            .collect();
        assert!(matches!(
            errors[0],
            AnalysisError::Resolution(ResolutionError::SymbolNotExported { .. })
        ));
        assert!(matches!(
            errors[1],
            AnalysisError::Resolution(ResolutionError::NoSuchAssignment { .. })
        ));
        assert_eq!(project.imports(a).lookup("hidden"), ImportLookup::NotImported);
    }

    #[test]
    fn replacing_an_imported_module_flags_the_edge() {
        let mut project = Project::new();
        project.add_module(ModuleBuilder::ttcn("B").build());
        let a = project.add_module(ModuleBuilder::ttcn("A").import_all("B").build());

        resolve(&mut project, a);
        assert!(project.imports(a).edges()[0].has_unhandled_change());
        assert!(project.clear_unhandled_change(a, 0));

        resolve(&mut project, a);
        assert!(!project.imports(a).has_unhandled_changes());

        project.add_module(ModuleBuilder::ttcn("B").build());
        resolve(&mut project, a);
        assert!(project.imports(a).edges()[0].has_unhandled_change());
    }
}
