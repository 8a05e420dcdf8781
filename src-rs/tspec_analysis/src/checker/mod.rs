//! Semantic checking of definitions
//!
//! Checking a definition produces a [`CheckedAssignment`] stamped with the
//! pass timestamp. A definition whose result must be known immediately
//! (an alias target, a constant, a template, a component) is checked on
//! demand through [`Checker::check_assignment`], with the definitions
//! currently being checked kept on a [`ReferenceChain`] to catch cycles.
//! Everything else a definition mentions is only recorded as a dependency
//! and checked afterwards from the deferred queue, which lets recursive
//! types and recursive functions refer to themselves.

mod behaviour;
mod definitions;
mod templates;
mod types;
mod values;

use std::{mem, path::Path, sync::Arc};

use indexmap::IndexMap;
use tspec_ast::{self as ast, DefinitionKind, Dialect};

use crate::{
    chain::ReferenceChain,
    diagnostics::Diagnostic,
    error::{AnalysisError, ResolutionError, SemanticError},
    ids::{AssignmentId, ModuleId, ScopeId},
    imports::{ImportTable, resolve_imports},
    info::{AssignmentInfo, CheckState, CheckedAssignment},
    pass::{CancellationToken, PassOutcome},
    project::{ModuleState, Project, Sources, describe_type},
    scope::{LocalSymbol, LookupError, ModuleScope, ScopeTable},
    timestamp::CompilationTimestamp,
    types::SemType,
};

/// State shared by every check within one pass
#[derive(Debug)]
pub struct CheckContext {
    timestamp: CompilationTimestamp,
    chain: ReferenceChain<AssignmentId>,
    dependencies: Vec<IndexMap<AssignmentId, CompilationTimestamp>>,
    deferred: Vec<AssignmentId>,
    token: CancellationToken,
    cancelled: bool,
}

impl CheckContext {
    /// Creates the context of a pass at `timestamp`
    #[must_use]
    pub fn new(timestamp: CompilationTimestamp, token: CancellationToken) -> Self {
        Self {
            timestamp,
            chain: ReferenceChain::new(),
            dependencies: vec![],
            deferred: vec![],
            token,
            cancelled: false,
        }
    }

    /// Returns the timestamp of the pass
    #[must_use]
    pub const fn timestamp(&self) -> CompilationTimestamp {
        self.timestamp
    }

    /// Polls the cancellation token
    ///
    /// Once cancellation is observed it stays observed for the rest of the
    /// pass, even if the token is reset.
    pub fn is_cancelled(&mut self) -> bool {
        if !self.cancelled && self.token.is_cancelled() {
            tracing::warn!(timestamp = ?self.timestamp, "check pass cancelled");
            self.cancelled = true;
        }
        self.cancelled
    }
}

/// The outcome of checking a definition on demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Forced {
    Ready,
    Cycle(Vec<AssignmentId>),
    Cancelled,
}

/// What the statements of a behaviour body may do
#[derive(Debug, Clone)]
pub(crate) struct BehaviourContext {
    return_type: Option<SemType>,
}

/// Per-definition checking state
#[derive(Debug)]
pub(crate) struct Frame {
    module: ModuleId,
    file: Arc<Path>,
    diagnostics: Vec<Diagnostic>,
    scopes: ScopeTable,
    scope: Option<ScopeId>,
    behaviour: Option<BehaviourContext>,
    runs_on: Option<AssignmentId>,
}

impl Frame {
    fn new(module: ModuleId, file: Arc<Path>) -> Self {
        Self {
            module,
            file,
            diagnostics: vec![],
            scopes: ScopeTable::new(),
            scope: None,
            behaviour: None,
            runs_on: None,
        }
    }

    fn report(&mut self, error: impl Into<AnalysisError>) {
        self.diagnostics
            .push(Diagnostic::new(Arc::clone(&self.file), error));
    }
}

/// What a name used in an expression refers to
#[derive(Debug, Clone)]
pub(crate) enum Resolved {
    Local(LocalSymbol),
    Assignment(AssignmentId),
}

/// Checks definitions against the resolved imports of a project
pub(crate) struct Checker<'a> {
    sources: &'a Sources,
    imports: &'a [ImportTable],
    states: &'a mut [ModuleState],
    ctx: &'a mut CheckContext,
}

impl<'a> Checker<'a> {
    const fn sources(&self) -> &'a Sources {
        self.sources
    }

    fn state_mut(&mut self, id: AssignmentId) -> &mut CheckState {
        &mut self.states[id.module().index()].assignments[id.index()]
    }

    /// Returns the cached result of a checked definition
    fn info(&self, id: AssignmentId) -> Option<&AssignmentInfo> {
        self.states[id.module().index()].assignments[id.index()]
            .checked()
            .map(CheckedAssignment::info)
    }

    fn is_current(&self, id: AssignmentId) -> bool {
        self.states[id.module().index()].assignments[id.index()]
            .checked()
            .is_some_and(|checked| checked.timestamp().is_current_for(self.ctx.timestamp))
    }

    fn check_module(&mut self, module: ModuleId) -> PassOutcome {
        let diagnostics = self.module_diagnostics(module);
        self.states[module.index()].diagnostics = diagnostics;

        let count = self.sources.module(module).ast().definitions().len();
        for index in 0..count {
            if self.ctx.is_cancelled() {
                return PassOutcome::Cancelled;
            }

            self.check_assignment(AssignmentId::new(module, index));
            self.drain_deferred();
        }

        if self.ctx.is_cancelled() {
            PassOutcome::Cancelled
        } else {
            PassOutcome::Completed
        }
    }

    /// Checks that concern the module as a whole rather than one definition
    fn module_diagnostics(&self, module: ModuleId) -> Vec<Diagnostic> {
        let source = self.sources.module(module);
        let mut diagnostics = vec![];
        let mut report = |error: AnalysisError| {
            diagnostics.push(Diagnostic::new(Arc::clone(source.file()), error));
        };

        for (first, duplicate) in source.duplicates() {
            let first = source.definition(*first).name();
            let duplicate = source.definition(*duplicate).name();
            report(
                SemanticError::DuplicateDefinition {
                    name: duplicate.to_string(),
                    first_span: first.span(),
                    duplicate_span: duplicate.span(),
                }
                .into(),
            );
        }

        if source.dialect() == Dialect::Ttcn {
            return diagnostics;
        }

        for definition in source.ast().definitions() {
            let keyword = match definition.kind() {
                DefinitionKind::Type(_) | DefinitionKind::Const { .. } => continue,
                DefinitionKind::Template { .. }
                | DefinitionKind::Behaviour(_)
                | DefinitionKind::Component { .. } => definition.kind().keyword(),
            };
            report(
                SemanticError::NotAllowedInAsn {
                    keyword,
                    span: definition.name().span(),
                }
                .into(),
            );
        }

        if let Some(ast::Exports::List(names)) = source.ast().exports().map(|exports| &**exports) {
            for name in names {
                if source.find(&name.canonical()).is_none() {
                    report(
                        ResolutionError::NoSuchAssignment {
                            module: source.display_name(),
                            name: name.to_string(),
                            span: name.span(),
                        }
                        .into(),
                    );
                }
            }
        }

        diagnostics
    }

    /// Checks a definition unless it already has a current result
    pub(crate) fn check_assignment(&mut self, id: AssignmentId) -> Forced {
        if self.ctx.is_cancelled() {
            return Forced::Cancelled;
        }

        if self.is_current(id) {
            tracing::trace!(assignment = %id, "using cached result");
            return Forced::Ready;
        }

        if let Some(cycle) = self.ctx.chain.find_cycle(&id) {
            return Forced::Cycle(cycle);
        }

        let previous = match mem::take(self.state_mut(id)) {
            CheckState::Checked(checked) => Some(checked),
            CheckState::Unchecked => None,
            CheckState::Checking { previous } => {
                tracing::error!(assignment = %id, "found a stale in-progress check");
                previous
            }
        };
        *self.state_mut(id) = CheckState::Checking { previous };

        let sources = self.sources();
        let source = sources.module(id.module());
        let definition = source.definition(id.index());
        tracing::trace!(assignment = %sources.assignment_name(id), "checking");

        if self.ctx.chain.push(id).is_err() {
            tracing::error!(assignment = %id, "definition is already being checked");
        }
        self.ctx.dependencies.push(IndexMap::new());

        let mut frame = Frame::new(id.module(), Arc::clone(source.file()));
        let info = definitions::check_definition(self, &mut frame, definition);

        let dependencies = self.ctx.dependencies.pop().unwrap_or_default();
        self.ctx.chain.pop();

        let timestamp = self.ctx.timestamp;
        let cancelled = self.ctx.cancelled;
        let state = self.state_mut(id);
        let CheckState::Checking { previous } = mem::take(state) else {
            tracing::error!(assignment = %id, "check state changed while checking");
            return Forced::Cancelled;
        };

        if cancelled {
            *state = previous.map_or(CheckState::Unchecked, CheckState::Checked);
            return Forced::Cancelled;
        }

        *state = CheckState::Checked(Box::new(CheckedAssignment {
            timestamp,
            info,
            dependencies,
            diagnostics: frame.diagnostics,
        }));
        Forced::Ready
    }

    /// Checks the definitions that were referenced lazily
    fn drain_deferred(&mut self) {
        while let Some(id) = self.ctx.deferred.pop() {
            if self.ctx.is_cancelled() {
                self.ctx.deferred.clear();
                return;
            }
            self.check_assignment(id);
        }
    }

    /// Records `id` with the timestamp its result will carry once this
    /// pass is done with it
    fn add_dependency(&mut self, id: AssignmentId) {
        let timestamp = self.states[id.module().index()].assignments[id.index()]
            .checked()
            .map(CheckedAssignment::timestamp)
            .filter(|timestamp| timestamp.is_current_for(self.ctx.timestamp))
            .unwrap_or(self.ctx.timestamp);
        if let Some(dependencies) = self.ctx.dependencies.last_mut() {
            dependencies.entry(id).or_insert(timestamp);
        }
    }

    /// Records a dependency whose check can wait
    fn depend_lazily(&mut self, id: AssignmentId) {
        self.add_dependency(id);
        if !self.is_current(id) && !self.ctx.chain.contains(&id) {
            self.ctx.deferred.push(id);
        }
    }

    /// Records a dependency and checks it now
    ///
    /// Returns whether a result is available. Cycles are reported at `span`.
    fn force(&mut self, frame: &mut Frame, id: AssignmentId, span: tspec_shared::span::Span) -> bool {
        self.add_dependency(id);

        match self.check_assignment(id) {
            Forced::Ready => true,
            Forced::Cycle(cycle) => {
                let sources = self.sources();
                frame.report(SemanticError::CircularReference {
                    cycle: cycle
                        .into_iter()
                        .map(|id| sources.assignment_name(id))
                        .collect(),
                    span,
                });
                false
            }
            Forced::Cancelled => false,
        }
    }

    fn module_scope(&self, frame: &Frame) -> ModuleScope<'a> {
        ModuleScope::new(self.sources, self.imports, frame.module)
    }

    /// Resolves a reference to a module level definition
    fn resolve_assignment(&self, frame: &mut Frame, reference: &ast::Reference) -> Option<AssignmentId> {
        self.lookup_assignment(frame, reference)
            .map_err(|error| {
                let error = self.lookup_error(error, reference);
                frame.report(error);
            })
            .ok()
    }

    fn lookup_assignment(&self, frame: &Frame, reference: &ast::Reference) -> Result<AssignmentId, LookupError> {
        let scope = self.module_scope(frame);
        let name = reference.name().canonical();
        match reference.module() {
            Some(module) => scope.lookup_qualified(&module.canonical(), &name),
            None => scope.lookup(&name),
        }
    }

    /// Resolves a name used in an expression, trying local scopes first
    fn resolve_name(&self, frame: &mut Frame, reference: &ast::Reference) -> Option<Resolved> {
        if let Some(symbol) = self.lookup_local(frame, reference) {
            return Some(Resolved::Local(symbol.clone()));
        }

        self.resolve_assignment(frame, reference)
            .map(Resolved::Assignment)
    }

    fn lookup_local<'f>(&self, frame: &'f Frame, reference: &ast::Reference) -> Option<&'f LocalSymbol> {
        if reference.module().is_some() {
            return None;
        }
        let scope = frame.scope?;
        frame.scopes.lookup(scope, &reference.name().canonical())
    }

    fn lookup_error(&self, error: LookupError, reference: &ast::Reference) -> ResolutionError {
        let name = reference.name();
        let module_name = |id: ModuleId| self.sources.module(id).display_name();

        match error {
            LookupError::NotFound => ResolutionError::NotFound {
                name: name.to_string(),
                span: name.span(),
            },
            LookupError::Ambiguous(modules) => ResolutionError::AmbiguousSymbol {
                name: name.to_string(),
                modules: modules.into_iter().map(module_name).collect(),
                span: name.span(),
            },
            LookupError::ModuleNotImported => {
                let (module, span) = reference
                    .module()
                    .map_or_else(|| (name.to_string(), name.span()), |module| (module.to_string(), module.span()));
                ResolutionError::ModuleNotImported { module, span }
            }
            LookupError::NoSuchAssignment(module) => ResolutionError::NoSuchAssignment {
                module: module_name(module),
                name: name.to_string(),
                span: name.span(),
            },
            LookupError::NotExported(module) => ResolutionError::SymbolNotExported {
                module: module_name(module),
                name: name.to_string(),
                span: name.span(),
            },
        }
    }

    fn report_wrong_kind(
        &self,
        frame: &mut Frame,
        reference: &ast::Reference,
        expected: &'static str,
        found: &'static str,
    ) {
        frame.report(ResolutionError::WrongKind {
            name: reference.name().to_string(),
            expected,
            found,
            span: reference.name().span(),
        });
    }

    fn describe(&self, ty: &SemType) -> String {
        describe_type(self.sources, ty)
    }
}

/// Describes the kind of a definition for messages
fn describe_definition(kind: &DefinitionKind) -> &'static str {
    match kind {
        DefinitionKind::Type(_) => "a type",
        DefinitionKind::Const { .. } => "a constant",
        DefinitionKind::Template { .. } => "a template",
        DefinitionKind::Behaviour(behaviour) => match behaviour.kind() {
            ast::BehaviourKind::Function => "a function",
            ast::BehaviourKind::Testcase => "a testcase",
            ast::BehaviourKind::Altstep => "an altstep",
        },
        DefinitionKind::Component { .. } => "a component",
    }
}

/// Checks one module at `ctx`'s timestamp
///
/// Imports are resolved first, then every definition of the module in
/// source order. A module already checked at the timestamp is skipped.
pub fn check_module(project: &mut Project, module: ModuleId, ctx: &mut CheckContext) -> PassOutcome {
    let timestamp = ctx.timestamp();
    if project
        .last_checked(module)
        .is_some_and(|last_checked| last_checked.is_current_for(timestamp))
    {
        tracing::trace!(module = %project.module_name(module), "module is up to date");
        return PassOutcome::Completed;
    }

    let _span = tracing::debug_span!("check_module", module = %project.module_name(module)).entered();

    resolve_imports(project, module, &mut ReferenceChain::new(), timestamp);

    let (sources, imports, states) = project.parts_mut();
    let mut checker = Checker {
        sources,
        imports,
        states,
        ctx,
    };
    let outcome = checker.check_module(module);

    if outcome == PassOutcome::Completed {
        project.states[module.index()].last_checked = Some(timestamp);
    }

    tracing::debug!(?outcome, "module checked");
    outcome
}

#[cfg(test)]
mod test;
