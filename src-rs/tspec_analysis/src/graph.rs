//! Queries over the dependencies recorded by checking
//!
//! Every checked definition records the definitions its result was
//! derived from, and the timestamp each of their results carried at the
//! time. The queries here walk those records to decide whether a
//! definition's result can still be trusted.

use indexmap::IndexSet;

use crate::{
    error::InternalError,
    ids::AssignmentId,
    info::CheckState,
    project::Project,
    timestamp::CompilationTimestamp,
};

/// Returns every definition `id` depends on, directly or not, including
/// `id` itself
#[must_use]
pub fn dependency_closure(project: &Project, id: AssignmentId) -> IndexSet<AssignmentId> {
    let mut visited = IndexSet::new();
    let mut stack = vec![id];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }

        if let Some(checked) = project.checked(current) {
            stack.extend(checked.dependencies().keys().copied());
        }
    }

    visited
}

/// Returns the oldest timestamp among a definition and its dependencies
///
/// Returns `None` if any of them has no check result.
#[must_use]
pub fn effective_timestamp(project: &Project, id: AssignmentId) -> Option<CompilationTimestamp> {
    dependency_closure(project, id)
        .into_iter()
        .map(|dependency| project.checked(dependency).map(|checked| checked.timestamp()))
        .try_fold(None, |oldest: Option<CompilationTimestamp>, timestamp| {
            let timestamp = timestamp?;
            Some(Some(oldest.map_or(timestamp, |oldest| oldest.min(timestamp))))
        })
        .flatten()
}

/// Why no code may be generated for a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocker {
    /// The definition, or one it depends on, has errors
    Erroneous(AssignmentId),
    /// The check results are missing or out of date
    Internal(InternalError),
}

/// Decides whether code may be generated for a definition
///
/// Generation requires a completed check of the module, a result for the
/// definition and each of its dependencies that is at least as recent, and
/// no errors anywhere among them. A dependency checked again after its
/// dependent makes the dependent's result stale, since it was derived from
/// the older one.
pub fn generation_status(project: &Project, id: AssignmentId) -> Result<(), Blocker> {
    let name = project.assignment_name(id);

    let Some(last_checked) = project.last_checked(id.module()) else {
        return Err(Blocker::Internal(InternalError::ModuleNotChecked(
            project.module_name(id.module()),
        )));
    };

    match project.check_state(id) {
        CheckState::Checked(_) => {}
        CheckState::Checking { .. } => {
            return Err(Blocker::Internal(InternalError::CheckInProgress(name)));
        }
        CheckState::Unchecked => return Err(Blocker::Internal(InternalError::Unchecked(name))),
    }

    if project.is_duplicate_definition(id) || project.is_misplaced_definition(id) {
        return Err(Blocker::Erroneous(id));
    }

    let closure = dependency_closure(project, id);
    for dependency in &closure {
        match project.checked(*dependency) {
            Some(checked) if checked.is_fatal() => return Err(Blocker::Erroneous(*dependency)),
            Some(_) => {}
            None => {
                return Err(Blocker::Internal(InternalError::Unchecked(
                    project.assignment_name(*dependency),
                )));
            }
        }
    }

    for dependent in &closure {
        let Some(checked) = project.checked(*dependent) else {
            continue;
        };
        let outdated = checked.dependencies().iter().any(|(dependency, seen)| {
            project
                .checked(*dependency)
                .is_none_or(|current| current.timestamp() != *seen)
        });
        if outdated {
            return Err(Blocker::Internal(InternalError::Stale { name }));
        }
    }

    match effective_timestamp(project, id) {
        Some(effective) if effective.is_current_for(last_checked) => Ok(()),
        Some(_) | None => Err(Blocker::Internal(InternalError::Stale { name })),
    }
}

#[cfg(test)]
mod tests {
    use tspec_ast::construct::{ModuleBuilder, ty, value};

    use super::*;
    use crate::{CancellationToken, check, check_project, ids::ModuleId};

    fn two_modules(base: i64) -> (Project, ModuleId, ModuleId) {
        let mut project = Project::new();
        let b = project.add_module(
            ModuleBuilder::ttcn("B")
                .constant("base", ty::integer(), value::integer(base))
                .build(),
        );
        let a = project.add_module(
            ModuleBuilder::ttcn("A")
                .import_all("B")
                .constant("derived", ty::integer(), value::add(value::reference("base"), value::integer(1)))
                .build(),
        );
        (project, a, b)
    }

    #[test]
    fn effective_timestamp_is_the_oldest_dependency() {
        let (mut project, a, b) = two_modules(1);

        let first = project.next_timestamp();
        check(&mut project, a, first);
        let second = project.next_timestamp();
        check(&mut project, b, second);

        let derived = AssignmentId::new(a, 0);
        let base = AssignmentId::new(b, 0);
        assert_eq!(project.checked(derived).map(|c| c.timestamp()), Some(first));
        assert_eq!(project.checked(base).map(|c| c.timestamp()), Some(second));
        assert!(dependency_closure(&project, derived).contains(&base));
        assert_eq!(effective_timestamp(&project, derived), Some(first));
    }

    #[test]
    fn dependencies_checked_again_make_dependents_stale() {
        let (mut project, a, b) = two_modules(1);
        let first = project.next_timestamp();
        check(&mut project, a, first);
        assert_eq!(generation_status(&project, AssignmentId::new(a, 0)), Ok(()));

        project.add_module(
            ModuleBuilder::ttcn("B")
                .constant("base", ty::integer(), value::integer(2))
                .build(),
        );
        let second = project.next_timestamp();
        check(&mut project, b, second);

        assert_eq!(generation_status(&project, AssignmentId::new(b, 0)), Ok(()));
        assert!(matches!(
            generation_status(&project, AssignmentId::new(a, 0)),
            Err(Blocker::Internal(InternalError::Stale { .. }))
        ));

        let third = project.next_timestamp();
        check(&mut project, a, third);
        assert_eq!(generation_status(&project, AssignmentId::new(a, 0)), Ok(()));
    }

    #[test]
    fn newer_results_reused_by_an_older_pass_stay_usable() {
        let (mut project, a, b) = two_modules(1);
        let first = project.next_timestamp();
        let second = project.next_timestamp();

        check(&mut project, b, second);
        check(&mut project, a, first);

        let derived = AssignmentId::new(a, 0);
        let base = AssignmentId::new(b, 0);
        assert_eq!(project.checked(base).map(|c| c.timestamp()), Some(second));
        assert_eq!(
            project.checked(derived).and_then(|c| c.dependencies().get(&base).copied()),
            Some(second)
        );
        assert_eq!(generation_status(&project, derived), Ok(()));
    }

    #[test]
    fn errors_in_dependencies_block_generation() {
        let mut project = Project::new();
        let module = project.add_module(
            ModuleBuilder::ttcn("M")
                .constant("broken", ty::integer(), value::charstring("text"))
                .constant("user", ty::integer(), value::reference("broken"))
                .constant("fine", ty::integer(), value::integer(2))
                .build(),
        );

        check_project(&mut project, &CancellationToken::new());

        let broken = AssignmentId::new(module, 0);
        assert_eq!(
            generation_status(&project, AssignmentId::new(module, 1)),
            Err(Blocker::Erroneous(broken))
        );
        assert_eq!(generation_status(&project, AssignmentId::new(module, 2)), Ok(()));
    }

    #[test]
    fn unchecked_modules_cannot_be_generated() {
        let mut project = Project::new();
        let module = project.add_module(
            ModuleBuilder::ttcn("M")
                .constant("x", ty::integer(), value::integer(1))
                .build(),
        );

        assert!(matches!(
            generation_status(&project, AssignmentId::new(module, 0)),
            Err(Blocker::Internal(InternalError::ModuleNotChecked(_)))
        ));
    }

    #[test]
    fn replaced_dependencies_make_results_unusable() {
        let mut project = Project::new();
        project.add_module(
            ModuleBuilder::ttcn("B")
                .constant("base", ty::integer(), value::integer(1))
                .build(),
        );
        let a = project.add_module(
            ModuleBuilder::ttcn("A")
                .import_all("B")
                .constant("derived", ty::integer(), value::reference("base"))
                .build(),
        );
        check_project(&mut project, &CancellationToken::new());
        assert_eq!(generation_status(&project, AssignmentId::new(a, 0)), Ok(()));

        project.add_module(
            ModuleBuilder::ttcn("B")
                .constant("base", ty::integer(), value::integer(2))
                .build(),
        );

        assert!(matches!(
            generation_status(&project, AssignmentId::new(a, 0)),
            Err(Blocker::Internal(InternalError::Unchecked(_)))
        ));
    }
}
