//! Template (matching) expressions

use crate::{naming::IdentifierNode, node::Node, value::ValueNode};

/// A template body
///
/// A specific value that is a bare reference may name either a constant or
/// another template; the analyzer decides which.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Template {
    Specific(ValueNode),
    /// `?`
    Any,
    /// `*`
    AnyOrOmit,
    Omit,
    /// `{ t1, t2 }` for record of and set of types
    List(Vec<TemplateNode>),
    /// `{ f1 := t1, f2 := t2 }`
    Fields(Vec<FieldTemplateNode>),
    /// `(t1, t2)`
    ValueList(Vec<TemplateNode>),
    /// `complement(t1, t2)`
    Complement(Vec<TemplateNode>),
    /// `(lower .. upper)`
    Range { lower: ValueNode, upper: ValueNode },
}

/// A node containing a template
pub type TemplateNode = Node<Template>;

impl Template {
    /// Returns the name of the matching mechanism
    #[must_use]
    pub const fn mechanism_name(&self) -> &'static str {
        match self {
            Self::Specific(_) => "specific value",
            Self::Any => "`?`",
            Self::AnyOrOmit => "`*`",
            Self::Omit => "`omit`",
            Self::List(_) => "element list",
            Self::Fields(_) => "field list",
            Self::ValueList(_) => "value list",
            Self::Complement(_) => "complement",
            Self::Range { .. } => "range",
        }
    }
}

/// `name := template` inside a field template
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldTemplate {
    name: IdentifierNode,
    template: TemplateNode,
}

/// A node containing a field template
pub type FieldTemplateNode = Node<FieldTemplate>;

impl FieldTemplate {
    #[must_use]
    pub const fn new(name: IdentifierNode, template: TemplateNode) -> Self {
        Self { name, template }
    }

    #[must_use]
    pub const fn name(&self) -> &IdentifierNode {
        &self.name
    }

    #[must_use]
    pub const fn template(&self) -> &TemplateNode {
        &self.template
    }
}
