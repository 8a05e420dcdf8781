//! Statements of function, testcase and altstep bodies

use crate::{
    naming::IdentifierNode, node::Node, reference::ReferenceNode, types::TypeNode,
    value::ValueNode,
};

/// A statement
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    /// `var integer x := 1;` or `const integer x := 1;`
    Local(LocalDefinitionNode),
    /// `x := value;`
    Assign {
        target: ReferenceNode,
        value: ValueNode,
    },
    /// An expression evaluated for its effect, usually a call
    Expr(ValueNode),
    Return(Option<ValueNode>),
    If {
        condition: ValueNode,
        then_branch: Vec<StatementNode>,
        else_branch: Vec<StatementNode>,
    },
    Block(Vec<StatementNode>),
    SetVerdict(Node<Verdict>),
}

/// A node containing a statement
pub type StatementNode = Node<Statement>;

/// Whether a local definition may be reassigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocalKind {
    Var,
    Const,
}

/// A local variable or constant, also used for component members
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalDefinition {
    kind: LocalKind,
    name: IdentifierNode,
    ty: TypeNode,
    initial: Option<ValueNode>,
}

/// A node containing a local definition
pub type LocalDefinitionNode = Node<LocalDefinition>;

impl LocalDefinition {
    #[must_use]
    pub const fn new(
        kind: LocalKind,
        name: IdentifierNode,
        ty: TypeNode,
        initial: Option<ValueNode>,
    ) -> Self {
        Self {
            kind,
            name,
            ty,
            initial,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> LocalKind {
        self.kind
    }

    #[must_use]
    pub const fn name(&self) -> &IdentifierNode {
        &self.name
    }

    #[must_use]
    pub const fn ty(&self) -> &TypeNode {
        &self.ty
    }

    #[must_use]
    pub const fn initial(&self) -> Option<&ValueNode> {
        self.initial.as_ref()
    }
}

/// Test verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    None,
    Pass,
    Inconc,
    Fail,
    Error,
}

impl Verdict {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pass => "pass",
            Self::Inconc => "inconc",
            Self::Fail => "fail",
            Self::Error => "error",
        }
    }
}
