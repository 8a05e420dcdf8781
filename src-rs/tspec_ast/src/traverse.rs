//! Worklist driven traversal of syntax trees
//!
//! The walk is pre-order and does not recurse, so arbitrarily deep
//! expressions cannot overflow the stack.

use tspec_shared::span::Span;

use crate::{
    definition::{DefinitionKind, DefinitionNode},
    module::Module,
    reference::ReferenceNode,
    statement::{LocalDefinitionNode, Statement, StatementNode},
    template::{Template, TemplateNode},
    types::{Type, TypeNode},
    value::{Value, ValueNode},
};

/// What the visitor wants to happen after seeing a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the node's children
    Continue,
    /// Do not visit the node's children but carry on with its siblings
    SkipChildren,
    /// Stop the whole traversal
    Abort,
}

/// A borrowed reference to any traversable node
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Definition(&'a DefinitionNode),
    Type(&'a TypeNode),
    Value(&'a ValueNode),
    Template(&'a TemplateNode),
    Statement(&'a StatementNode),
    Local(&'a LocalDefinitionNode),
    Reference(&'a ReferenceNode),
}

impl NodeRef<'_> {
    /// Returns the span of the underlying node
    #[must_use]
    pub fn span(self) -> Span {
        match self {
            Self::Definition(node) => node.span(),
            Self::Type(node) => node.span(),
            Self::Value(node) => node.span(),
            Self::Template(node) => node.span(),
            Self::Statement(node) => node.span(),
            Self::Local(node) => node.span(),
            Self::Reference(node) => node.span(),
        }
    }

    /// Returns the direct children of the node in source order
    #[must_use]
    pub fn children(self) -> Vec<Self> {
        match self {
            Self::Definition(definition) => definition_children(definition),
            Self::Type(ty) => type_children(ty),
            Self::Value(value) => value_children(value),
            Self::Template(template) => template_children(template),
            Self::Statement(statement) => statement_children(statement),
            Self::Local(local) => {
                let mut children = vec![Self::Type(local.ty())];
                children.extend(local.initial().map(Self::Value));
                children
            }
            Self::Reference(_) => vec![],
        }
    }
}

fn definition_children(definition: &DefinitionNode) -> Vec<NodeRef<'_>> {
    match definition.kind() {
        DefinitionKind::Type(ty) => vec![NodeRef::Type(ty)],
        DefinitionKind::Const { ty, value } => vec![NodeRef::Type(ty), NodeRef::Value(value)],
        DefinitionKind::Template { ty, body } => {
            vec![NodeRef::Type(ty), NodeRef::Template(body)]
        }
        DefinitionKind::Behaviour(behaviour) => {
            let params = behaviour.params().iter().map(|param| NodeRef::Type(param.ty()));
            let return_type = behaviour.return_type().map(NodeRef::Type);
            let runs_on = behaviour.runs_on().map(NodeRef::Reference);
            let body = behaviour.body().iter().map(NodeRef::Statement);

            params.chain(return_type).chain(runs_on).chain(body).collect()
        }
        DefinitionKind::Component { members } => members.iter().map(NodeRef::Local).collect(),
    }
}

fn type_children(ty: &TypeNode) -> Vec<NodeRef<'_>> {
    match &**ty {
        Type::Boolean
        | Type::Integer
        | Type::Float
        | Type::Charstring
        | Type::Octetstring
        | Type::Bitstring
        | Type::Enumerated(_) => vec![],
        Type::Record(fields) | Type::Set(fields) | Type::Union(fields) => {
            fields.iter().map(|field| NodeRef::Type(field.ty())).collect()
        }
        Type::RecordOf(element) | Type::SetOf(element) => vec![NodeRef::Type(element)],
        Type::Reference(reference) => vec![NodeRef::Reference(reference)],
    }
}

fn value_children(value: &ValueNode) -> Vec<NodeRef<'_>> {
    match &**value {
        Value::Boolean(_)
        | Value::Integer(_)
        | Value::Float(_)
        | Value::Charstring(_)
        | Value::Octetstring(_)
        | Value::Bitstring(_)
        | Value::Omit => vec![],
        Value::Sequence(fields) => fields
            .iter()
            .map(|field| NodeRef::Value(field.value()))
            .collect(),
        Value::List(elements) => elements.iter().map(NodeRef::Value).collect(),
        Value::Reference(reference) => vec![NodeRef::Reference(reference)],
        Value::BinaryOp { left, right, .. } => vec![NodeRef::Value(left), NodeRef::Value(right)],
        Value::UnaryOp { operand, .. } => vec![NodeRef::Value(operand)],
        Value::Match { value, template } => {
            vec![NodeRef::Value(value), NodeRef::Template(template)]
        }
        Value::Call { function, args } => std::iter::once(NodeRef::Reference(function))
            .chain(args.iter().map(NodeRef::Value))
            .collect(),
    }
}

fn template_children(template: &TemplateNode) -> Vec<NodeRef<'_>> {
    match &**template {
        Template::Any | Template::AnyOrOmit | Template::Omit => vec![],
        Template::Specific(value) => vec![NodeRef::Value(value)],
        Template::List(templates) | Template::ValueList(templates) | Template::Complement(templates) => {
            templates.iter().map(NodeRef::Template).collect()
        }
        Template::Fields(fields) => fields
            .iter()
            .map(|field| NodeRef::Template(field.template()))
            .collect(),
        Template::Range { lower, upper } => vec![NodeRef::Value(lower), NodeRef::Value(upper)],
    }
}

fn statement_children(statement: &StatementNode) -> Vec<NodeRef<'_>> {
    match &**statement {
        Statement::Local(local) => vec![NodeRef::Local(local)],
        Statement::Assign { target, value } => {
            vec![NodeRef::Reference(target), NodeRef::Value(value)]
        }
        Statement::Expr(value) | Statement::Return(Some(value)) => vec![NodeRef::Value(value)],
        Statement::Return(None) | Statement::SetVerdict(_) => vec![],
        Statement::If {
            condition,
            then_branch,
            else_branch,
        } => std::iter::once(NodeRef::Value(condition))
            .chain(then_branch.iter().map(NodeRef::Statement))
            .chain(else_branch.iter().map(NodeRef::Statement))
            .collect(),
        Statement::Block(statements) => statements.iter().map(NodeRef::Statement).collect(),
    }
}

/// Walks the given roots in pre-order
///
/// Returns `false` if the visitor aborted the traversal.
pub fn walk<'a>(
    roots: impl IntoIterator<Item = NodeRef<'a>>,
    mut visitor: impl FnMut(NodeRef<'a>) -> Visit,
) -> bool {
    let mut worklist: Vec<NodeRef<'a>> = roots.into_iter().collect();
    worklist.reverse();

    while let Some(node) = worklist.pop() {
        match visitor(node) {
            Visit::Continue => worklist.extend(node.children().into_iter().rev()),
            Visit::SkipChildren => {}
            Visit::Abort => return false,
        }
    }

    true
}

/// Walks every definition of a module in source order
pub fn walk_module<'a>(module: &'a Module, visitor: impl FnMut(NodeRef<'a>) -> Visit) -> bool {
    walk(module.definitions().iter().map(NodeRef::Definition), visitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::{ModuleBuilder, value};

    fn sample_module() -> Module {
        ModuleBuilder::ttcn("M")
            .constant("a", crate::construct::ty::integer(), value::integer(1))
            .constant(
                "b",
                crate::construct::ty::integer(),
                value::add(value::reference("a"), value::integer(2)),
            )
            .build()
    }

    #[test]
    fn visits_in_source_order() {
        let module = sample_module();
        let mut kinds = vec![];

        let completed = walk_module(&module, |node| {
            kinds.push(match node {
                NodeRef::Definition(_) => "definition",
                NodeRef::Type(_) => "type",
                NodeRef::Value(_) => "value",
                NodeRef::Reference(_) => "reference",
                NodeRef::Template(_) | NodeRef::Statement(_) | NodeRef::Local(_) => "other",
            });
            Visit::Continue
        });

        assert!(completed);
        assert_eq!(
            kinds,
            [
                "definition",
                "type",
                "value",
                "definition",
                "type",
                "value",
                "value",
                "reference",
                "value",
            ]
        );
    }

    #[test]
    fn skip_children_and_abort() {
        let module = sample_module();

        let mut values = 0;
        let completed = walk_module(&module, |node| match node {
            NodeRef::Value(_) => {
                values += 1;
                Visit::SkipChildren
            }
            NodeRef::Definition(_)
            | NodeRef::Type(_)
            | NodeRef::Template(_)
            | NodeRef::Statement(_)
            | NodeRef::Local(_)
            | NodeRef::Reference(_) => Visit::Continue,
        });
        assert!(completed);
        assert_eq!(values, 2);

        let mut seen = 0;
        let completed = walk_module(&module, |_| {
            seen += 1;
            if seen == 3 { Visit::Abort } else { Visit::Continue }
        });
        assert!(!completed);
        assert_eq!(seen, 3);
    }
}
