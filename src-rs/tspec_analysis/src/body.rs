//! Checked statements and expressions of behaviour bodies
//!
//! Bodies are lowered into this typed form during checking so that code
//! generation never has to resolve names or infer types again.

use tspec_ast::{BinaryOp, LocalKind, UnaryOp, Verdict};

use crate::{eval::ConstValue, ids::AssignmentId, matching::TemplateValue, types::SemType};

/// A checked expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A folded value together with its type
    Constant(ConstValue, SemType),
    /// A parameter or local definition
    Local(String),
    /// A member of the component the behaviour runs on
    ComponentMember(String),
    /// A binary operation
    Binary {
        /// The operator
        op: BinaryOp,
        /// The type of the operands, which may differ from the result type
        operand_type: SemType,
        /// The left operand
        left: Box<Expr>,
        /// The right operand
        right: Box<Expr>,
    },
    /// A unary operation
    Unary {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Box<Expr>,
    },
    /// A record or set value built from non-constant fields
    Record {
        /// The record or set type
        ty: SemType,
        /// Field values in declaration order
        fields: Vec<(String, Expr)>,
    },
    /// A union value built from a non-constant alternative
    Union {
        /// The union type
        ty: SemType,
        /// The chosen alternative
        alternative: String,
        /// The value of the alternative
        value: Box<Expr>,
    },
    /// A record of or set of value built from non-constant elements
    List {
        /// The list type
        ty: SemType,
        /// The element values
        elements: Vec<Expr>,
    },
    /// An omitted optional field
    Omit,
    /// A `match()` of a value against a checked template
    Match {
        /// The value being matched
        value: Box<Expr>,
        /// The type of the matched value
        value_type: SemType,
        /// The template to match against
        template: TemplateValue,
    },
    /// A call to a function
    Call {
        /// The called function
        function: AssignmentId,
        /// The arguments in parameter order
        args: Vec<Expr>,
        /// Whether the callee runs on a component and needs it passed along
        passes_component: bool,
    },
}

impl Expr {
    /// Returns the folded value, if the expression is constant
    #[must_use]
    pub const fn as_constant(&self) -> Option<&ConstValue> {
        if let Self::Constant(value, _) = self {
            Some(value)
        } else {
            None
        }
    }
}

/// The target of an assignment statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A parameter or local variable
    Local(String),
    /// A variable of the component the behaviour runs on
    ComponentMember(String),
}

/// A checked statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A local variable, constant or timer
    Local {
        /// What kind of local it is
        kind: LocalKind,
        /// The name as written
        name: String,
        /// The declared type
        ty: SemType,
        /// The initial value, if any
        initial: Option<Expr>,
    },
    /// An assignment
    Assign {
        /// The assigned variable
        target: Target,
        /// The new value
        value: Expr,
    },
    /// An expression evaluated for its effect
    Expr(Expr),
    /// A return, with a value for functions that have a return type
    Return(Option<Expr>),
    /// A conditional
    If {
        /// The condition
        condition: Expr,
        /// Statements run when the condition holds
        then_branch: Vec<Stmt>,
        /// Statements run otherwise, empty when there is no else
        else_branch: Vec<Stmt>,
    },
    /// A nested statement block
    Block(Vec<Stmt>),
    /// A `setverdict` statement
    SetVerdict(Verdict),
}
