//! Module level definitions

use crate::{
    attribute::AttributeNode,
    naming::IdentifierNode,
    node::Node,
    reference::ReferenceNode,
    statement::{LocalDefinitionNode, StatementNode},
    template::TemplateNode,
    types::TypeNode,
    value::ValueNode,
};

/// Whether a definition is visible to importing modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// A named definition with its attributes
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Definition {
    name: IdentifierNode,
    #[cfg_attr(feature = "serde", serde(default))]
    visibility: Visibility,
    kind: DefinitionKind,
    #[cfg_attr(feature = "serde", serde(default))]
    attributes: Vec<AttributeNode>,
}

/// A node containing a definition
pub type DefinitionNode = Node<Definition>;

impl Definition {
    #[must_use]
    pub const fn new(
        name: IdentifierNode,
        visibility: Visibility,
        kind: DefinitionKind,
        attributes: Vec<AttributeNode>,
    ) -> Self {
        Self {
            name,
            visibility,
            kind,
            attributes,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &IdentifierNode {
        &self.name
    }

    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub const fn kind(&self) -> &DefinitionKind {
        &self.kind
    }

    #[must_use]
    pub fn attributes(&self) -> &[AttributeNode] {
        &self.attributes
    }
}

/// The kinds of definitions
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefinitionKind {
    Type(TypeNode),
    Const {
        ty: TypeNode,
        value: ValueNode,
    },
    Template {
        ty: TypeNode,
        body: TemplateNode,
    },
    Behaviour(Node<Behaviour>),
    Component {
        members: Vec<LocalDefinitionNode>,
    },
}

impl DefinitionKind {
    /// Returns the keyword introducing this kind of definition
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Type(_) => "type",
            Self::Const { .. } => "const",
            Self::Template { .. } => "template",
            Self::Behaviour(behaviour) => behaviour.kind().keyword(),
            Self::Component { .. } => "component",
        }
    }
}

/// The flavours of executable definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviourKind {
    Function,
    Testcase,
    Altstep,
}

impl BehaviourKind {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Testcase => "testcase",
            Self::Altstep => "altstep",
        }
    }
}

/// A function, testcase or altstep
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Behaviour {
    kind: BehaviourKind,
    params: Vec<FormalParamNode>,
    return_type: Option<TypeNode>,
    runs_on: Option<ReferenceNode>,
    body: Vec<StatementNode>,
}

impl Behaviour {
    #[must_use]
    pub const fn new(
        kind: BehaviourKind,
        params: Vec<FormalParamNode>,
        return_type: Option<TypeNode>,
        runs_on: Option<ReferenceNode>,
        body: Vec<StatementNode>,
    ) -> Self {
        Self {
            kind,
            params,
            return_type,
            runs_on,
            body,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> BehaviourKind {
        self.kind
    }

    #[must_use]
    pub fn params(&self) -> &[FormalParamNode] {
        &self.params
    }

    #[must_use]
    pub const fn return_type(&self) -> Option<&TypeNode> {
        self.return_type.as_ref()
    }

    #[must_use]
    pub const fn runs_on(&self) -> Option<&ReferenceNode> {
        self.runs_on.as_ref()
    }

    #[must_use]
    pub fn body(&self) -> &[StatementNode] {
        &self.body
    }
}

/// A formal parameter
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormalParam {
    name: IdentifierNode,
    ty: TypeNode,
}

/// A node containing a formal parameter
pub type FormalParamNode = Node<FormalParam>;

impl FormalParam {
    #[must_use]
    pub const fn new(name: IdentifierNode, ty: TypeNode) -> Self {
        Self { name, ty }
    }

    #[must_use]
    pub const fn name(&self) -> &IdentifierNode {
        &self.name
    }

    #[must_use]
    pub const fn ty(&self) -> &TypeNode {
        &self.ty
    }
}
