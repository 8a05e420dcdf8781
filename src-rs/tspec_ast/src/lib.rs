#![allow(missing_docs)]
// AST nodes should be self-documenting

//! Syntax tree for tspec modules
//!
//! Parsing happens elsewhere; this crate only describes the tree a parser
//! produces. With the `serde` feature enabled the tree can be exchanged as
//! JSON.

pub mod attribute;
pub mod definition;
pub mod import;
pub mod module;
pub mod naming;
pub mod node;
pub mod reference;
pub mod statement;
pub mod template;
pub mod traverse;
pub mod types;
pub mod value;

#[cfg(any(test, feature = "construct"))]
pub mod construct;

pub use attribute::Attribute;
pub use definition::{Behaviour, BehaviourKind, Definition, DefinitionKind, Visibility};
pub use import::Import;
pub use module::{Exports, Module};
pub use naming::{Dialect, Identifier};
pub use node::Node;
pub use reference::Reference;
pub use statement::{LocalKind, Statement, Verdict};
pub use template::Template;
pub use types::Type;
pub use value::{BinaryOp, UnaryOp, Value};
