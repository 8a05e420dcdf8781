//! Shared utilities for the tspec toolchain
//!
//! This crate holds the pieces every other crate agrees on: source spans,
//! file locations and the error presentation traits.

pub mod error;
pub mod span;

pub use error::{AsTspecError, Context, ErrorLocation, Severity, TspecError};
pub use span::{Location, Span};
