//! Whole-project check passes and cancellation

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    checker::{CheckContext, check_module},
    ids::ModuleId,
    project::Project,
    timestamp::CompilationTimestamp,
};

/// A flag that asks a running check pass to stop
///
/// Clones share the flag, so one clone can be handed to the pass while
/// another is kept to cancel it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that is not cancelled
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every pass holding a clone of this token to stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns whether cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How a pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass ran to the end
    Completed,
    /// Some definitions kept their previous results
    Cancelled,
}

/// The result of [`check_project`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    timestamp: CompilationTimestamp,
    outcome: PassOutcome,
    checked: Vec<ModuleId>,
}

impl PassReport {
    /// Returns the timestamp the pass ran at
    #[must_use]
    pub const fn timestamp(&self) -> CompilationTimestamp {
        self.timestamp
    }

    /// Returns how the pass ended
    #[must_use]
    pub const fn outcome(&self) -> PassOutcome {
        self.outcome
    }

    /// Returns the modules whose check completed, in the order they were
    /// checked
    #[must_use]
    pub fn checked(&self) -> &[ModuleId] {
        &self.checked
    }
}

/// Checks one module at `timestamp`
///
/// Checking again at the same timestamp does nothing.
pub fn check(project: &mut Project, module: ModuleId, timestamp: CompilationTimestamp) -> PassOutcome {
    let mut ctx = CheckContext::new(timestamp, CancellationToken::new());
    check_module(project, module, &mut ctx)
}

/// Checks every module of the project at a fresh timestamp
///
/// Modules are visited in name order. The token is polled before each
/// definition; on cancellation, definitions that were being checked keep
/// their previous results and the pass stops.
pub fn check_project(project: &mut Project, token: &CancellationToken) -> PassReport {
    let timestamp = project.next_timestamp();
    let mut ctx = CheckContext::new(timestamp, token.clone());
    let mut checked = vec![];

    tracing::debug!(?timestamp, "starting check pass");

    for module in project.module_ids_by_name() {
        let outcome = if ctx.is_cancelled() {
            PassOutcome::Cancelled
        } else {
            check_module(project, module, &mut ctx)
        };

        match outcome {
            PassOutcome::Completed => checked.push(module),
            PassOutcome::Cancelled => {
                tracing::warn!(?timestamp, modules = checked.len(), "check pass cancelled");
                return PassReport {
                    timestamp,
                    outcome: PassOutcome::Cancelled,
                    checked,
                };
            }
        }
    }

    tracing::debug!(?timestamp, modules = checked.len(), "check pass completed");

    PassReport {
        timestamp,
        outcome: PassOutcome::Completed,
        checked,
    }
}
