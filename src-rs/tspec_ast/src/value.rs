//! Value expressions

use crate::{
    naming::IdentifierNode, node::Node, reference::ReferenceNode, template::TemplateNode,
};

/// A value expression
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Charstring(String),
    /// Hexadecimal digits, two per octet
    Octetstring(String),
    /// Binary digits
    Bitstring(String),
    /// `omit`, only meaningful for optional fields
    Omit,
    /// `{ a := 1, b := 2 }`
    Sequence(Vec<FieldValueNode>),
    /// `{ 1, 2, 3 }`
    List(Vec<ValueNode>),
    Reference(ReferenceNode),
    BinaryOp {
        op: Node<BinaryOp>,
        left: ValueNode,
        right: ValueNode,
    },
    UnaryOp {
        op: Node<UnaryOp>,
        operand: ValueNode,
    },
    /// `match(value, template)`
    Match {
        value: ValueNode,
        template: TemplateNode,
    },
    /// A function call
    Call {
        function: ReferenceNode,
        args: Vec<ValueNode>,
    },
}

/// A node containing a value
pub type ValueNode = Node<Value>;

impl Value {
    #[must_use]
    pub const fn binary_op(op: Node<BinaryOp>, left: ValueNode, right: ValueNode) -> Self {
        Self::BinaryOp { op, left, right }
    }

    #[must_use]
    pub const fn unary_op(op: Node<UnaryOp>, operand: ValueNode) -> Self {
        Self::UnaryOp { op, operand }
    }

    #[must_use]
    pub const fn call(function: ReferenceNode, args: Vec<ValueNode>) -> Self {
        Self::Call { function, args }
    }

    #[must_use]
    pub const fn match_template(value: ValueNode, template: TemplateNode) -> Self {
        Self::Match { value, template }
    }
}

/// `name := value` inside a sequence value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldValue {
    name: IdentifierNode,
    value: ValueNode,
}

/// A node containing a field value
pub type FieldValueNode = Node<FieldValue>;

impl FieldValue {
    #[must_use]
    pub const fn new(name: IdentifierNode, value: ValueNode) -> Self {
        Self { name, value }
    }

    #[must_use]
    pub const fn name(&self) -> &IdentifierNode {
        &self.name
    }

    #[must_use]
    pub const fn value(&self) -> &ValueNode {
        &self.value
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Rem,
    /// `&`
    Concat,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    /// Returns the operator as written in the source
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "mod",
            Self::Rem => "rem",
            Self::Concat => "&",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "not",
        }
    }
}
