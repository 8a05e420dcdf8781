//! Import resolution and semantic checking for tspec modules
//!
//! A [`Project`] holds every parsed module. Checking a module resolves its
//! imports, then checks each of its definitions, following references into
//! other modules on demand. Results are cached per definition together with
//! the timestamp of the pass that produced them and the definitions they
//! depend on, so later passes only redo what is out of date.
//!
//! Errors never stop a pass. They are collected as [`Diagnostic`]s on the
//! definition or module they belong to.

pub mod attribute;
pub mod body;
pub mod chain;
mod checker;
pub mod diagnostics;
pub mod error;
pub mod eval;
pub mod graph;
pub mod ids;
pub mod imports;
pub mod info;
pub mod matching;
pub mod pass;
pub mod project;
pub mod scope;
pub mod timestamp;
pub mod types;

pub use checker::{CheckContext, check_module};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{AnalysisError, InternalError};
pub use graph::{Blocker, effective_timestamp, generation_status};
pub use ids::{AssignmentId, ModuleId};
pub use imports::resolve_imports;
pub use pass::{CancellationToken, PassOutcome, PassReport, check, check_project};
pub use project::{Project, SharedProject};
pub use timestamp::CompilationTimestamp;
pub use types::SemType;
