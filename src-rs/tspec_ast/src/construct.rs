//! Helpers for assembling syntax trees by hand
//!
//! Spans matter for diagnostics, so [`ModuleBuilder`] hands every module level
//! node (imports, definitions, their names) a distinct span. Nodes created by
//! the free functions get an empty span at offset zero.

use std::path::PathBuf;

use tspec_shared::span::Span;

use crate::{
    attribute::{Attribute, AttributeNode},
    definition::{Behaviour, Definition, DefinitionKind, DefinitionNode, Visibility},
    import::{Import, ImportNode},
    module::{Exports, Module},
    naming::{Dialect, Identifier, IdentifierNode},
    node::Node,
    reference::{Reference, ReferenceNode},
    statement::LocalDefinitionNode,
    template::TemplateNode,
    types::TypeNode,
    value::ValueNode,
};

fn at<T>(value: T) -> Node<T> {
    Node::new(value, Span::default())
}

/// Creates a TTCN identifier node
#[must_use]
pub fn ident(name: &str) -> IdentifierNode {
    at(Identifier::ttcn(name))
}

/// Creates an unqualified reference node
#[must_use]
pub fn reference(name: &str) -> ReferenceNode {
    at(Reference::unqualified(ident(name)))
}

/// Creates a `Module.name` reference node
#[must_use]
pub fn qualified(module: &str, name: &str) -> ReferenceNode {
    at(Reference::qualified(ident(module), ident(name)))
}

/// Builds a [`Module`] with distinct spans for its module level nodes
#[derive(Debug)]
pub struct ModuleBuilder {
    name: String,
    dialect: Dialect,
    imports: Vec<ImportNode>,
    exports: Option<Node<Exports>>,
    definitions: Vec<DefinitionNode>,
    next_offset: usize,
}

impl ModuleBuilder {
    #[must_use]
    pub fn ttcn(name: &str) -> Self {
        Self::new(name, Dialect::Ttcn)
    }

    #[must_use]
    pub fn asn(name: &str) -> Self {
        Self::new(name, Dialect::Asn)
    }

    fn new(name: &str, dialect: Dialect) -> Self {
        Self {
            name: name.to_string(),
            dialect,
            imports: vec![],
            exports: None,
            definitions: vec![],
            next_offset: name.len() + 1,
        }
    }

    fn fresh_span(&mut self, length: usize) -> Span {
        let start = self.next_offset;
        self.next_offset += length + 1;
        Span::new(start, start + length)
    }

    fn name_node(&mut self, name: &str) -> IdentifierNode {
        let span = self.fresh_span(name.len());
        Node::new(Identifier::new(name.to_string(), self.dialect), span)
    }

    /// `import from module all;`
    #[must_use]
    pub fn import_all(mut self, module: &str) -> Self {
        let module = self.name_node(module);
        let span = module.span();
        self.imports.push(Node::new(Import::all(module), span));
        self
    }

    /// `import from module { symbols };`
    #[must_use]
    pub fn import_symbols(mut self, module: &str, symbols: &[&str]) -> Self {
        let module = self.name_node(module);
        let span = module.span();
        let symbols = symbols.iter().map(|symbol| self.name_node(symbol)).collect();
        self.imports
            .push(Node::new(Import::symbols(module, symbols), span));
        self
    }

    /// `EXPORTS ALL;`
    #[must_use]
    pub fn exports_all(mut self) -> Self {
        let span = self.fresh_span(3);
        self.exports = Some(Node::new(Exports::All, span));
        self
    }

    /// `EXPORTS names;`
    #[must_use]
    pub fn exports(mut self, names: &[&str]) -> Self {
        let names = names.iter().map(|name| self.name_node(name)).collect();
        let span = self.fresh_span(1);
        self.exports = Some(Node::new(Exports::List(names), span));
        self
    }

    /// Adds a fully specified definition
    #[must_use]
    pub fn definition(
        mut self,
        name: &str,
        visibility: Visibility,
        kind: DefinitionKind,
        attributes: Vec<AttributeNode>,
    ) -> Self {
        let name = self.name_node(name);
        let span = name.span();
        self.definitions.push(Node::new(
            Definition::new(name, visibility, kind, attributes),
            span,
        ));
        self
    }

    #[must_use]
    pub fn type_def(self, name: &str, ty: TypeNode) -> Self {
        self.definition(name, Visibility::Public, DefinitionKind::Type(ty), vec![])
    }

    #[must_use]
    pub fn type_def_with(self, name: &str, ty: TypeNode, attributes: Vec<AttributeNode>) -> Self {
        self.definition(name, Visibility::Public, DefinitionKind::Type(ty), attributes)
    }

    #[must_use]
    pub fn constant(self, name: &str, ty: TypeNode, value: ValueNode) -> Self {
        self.definition(
            name,
            Visibility::Public,
            DefinitionKind::Const { ty, value },
            vec![],
        )
    }

    #[must_use]
    pub fn private_constant(self, name: &str, ty: TypeNode, value: ValueNode) -> Self {
        self.definition(
            name,
            Visibility::Private,
            DefinitionKind::Const { ty, value },
            vec![],
        )
    }

    #[must_use]
    pub fn template(self, name: &str, ty: TypeNode, body: TemplateNode) -> Self {
        self.definition(
            name,
            Visibility::Public,
            DefinitionKind::Template { ty, body },
            vec![],
        )
    }

    #[must_use]
    pub fn behaviour(self, name: &str, behaviour: Behaviour) -> Self {
        self.definition(
            name,
            Visibility::Public,
            DefinitionKind::Behaviour(at(behaviour)),
            vec![],
        )
    }

    #[must_use]
    pub fn component(self, name: &str, members: Vec<LocalDefinitionNode>) -> Self {
        self.definition(
            name,
            Visibility::Public,
            DefinitionKind::Component { members },
            vec![],
        )
    }

    #[must_use]
    pub fn build(self) -> Module {
        let extension = match self.dialect {
            Dialect::Ttcn => "ttcn",
            Dialect::Asn => "asn",
        };
        let file = PathBuf::from(format!("{}.{extension}", self.name));
        let name = Node::new(
            Identifier::new(self.name.clone(), self.dialect),
            Span::new(0, self.name.len()),
        );

        Module::new(
            name,
            self.dialect,
            file,
            self.imports,
            self.exports,
            self.definitions,
        )
    }
}

pub mod ty {
    use super::{at, reference};
    use crate::{
        node::Node,
        types::{EnumItem, Field, Type, TypeNode},
    };

    #[must_use]
    pub fn boolean() -> TypeNode {
        at(Type::Boolean)
    }

    #[must_use]
    pub fn integer() -> TypeNode {
        at(Type::Integer)
    }

    #[must_use]
    pub fn float() -> TypeNode {
        at(Type::Float)
    }

    #[must_use]
    pub fn charstring() -> TypeNode {
        at(Type::Charstring)
    }

    #[must_use]
    pub fn octetstring() -> TypeNode {
        at(Type::Octetstring)
    }

    #[must_use]
    pub fn bitstring() -> TypeNode {
        at(Type::Bitstring)
    }

    /// A type reference such as `Message`
    #[must_use]
    pub fn named(name: &str) -> TypeNode {
        at(Type::Reference(reference(name)))
    }

    /// A qualified type reference such as `Types.Message`
    #[must_use]
    pub fn qualified(module: &str, name: &str) -> TypeNode {
        at(Type::Reference(super::qualified(module, name)))
    }

    /// Items with an optional explicit number
    #[must_use]
    pub fn enumerated(items: &[(&str, Option<i64>)]) -> TypeNode {
        let items = items
            .iter()
            .map(|(name, number)| at(EnumItem::new(super::ident(name), number.map(at))))
            .collect();
        at(Type::Enumerated(items))
    }

    fn fields(fields: Vec<(&str, TypeNode, bool)>) -> Vec<Node<Field>> {
        fields
            .into_iter()
            .map(|(name, ty, optional)| at(Field::new(super::ident(name), ty, optional)))
            .collect()
    }

    /// Fields as `(name, type, optional)`
    #[must_use]
    pub fn record(fields: Vec<(&str, TypeNode, bool)>) -> TypeNode {
        at(Type::Record(self::fields(fields)))
    }

    #[must_use]
    pub fn set(fields: Vec<(&str, TypeNode, bool)>) -> TypeNode {
        at(Type::Set(self::fields(fields)))
    }

    #[must_use]
    pub fn union(alternatives: Vec<(&str, TypeNode)>) -> TypeNode {
        let alternatives = alternatives
            .into_iter()
            .map(|(name, ty)| (name, ty, false))
            .collect();
        at(Type::Union(fields(alternatives)))
    }

    #[must_use]
    pub fn record_of(element: TypeNode) -> TypeNode {
        at(Type::RecordOf(element))
    }

    #[must_use]
    pub fn set_of(element: TypeNode) -> TypeNode {
        at(Type::SetOf(element))
    }
}

pub mod value {
    use super::at;
    use crate::{
        node::Node,
        template::TemplateNode,
        value::{BinaryOp, FieldValue, UnaryOp, Value, ValueNode},
    };

    #[must_use]
    pub fn boolean(value: bool) -> ValueNode {
        at(Value::Boolean(value))
    }

    #[must_use]
    pub fn integer(value: i64) -> ValueNode {
        at(Value::Integer(value))
    }

    #[must_use]
    pub fn float(value: f64) -> ValueNode {
        at(Value::Float(value))
    }

    #[must_use]
    pub fn charstring(value: &str) -> ValueNode {
        at(Value::Charstring(value.to_string()))
    }

    #[must_use]
    pub fn octetstring(hex: &str) -> ValueNode {
        at(Value::Octetstring(hex.to_string()))
    }

    #[must_use]
    pub fn bitstring(bits: &str) -> ValueNode {
        at(Value::Bitstring(bits.to_string()))
    }

    #[must_use]
    pub fn omit() -> ValueNode {
        at(Value::Omit)
    }

    #[must_use]
    pub fn reference(name: &str) -> ValueNode {
        at(Value::Reference(super::reference(name)))
    }

    #[must_use]
    pub fn qualified(module: &str, name: &str) -> ValueNode {
        at(Value::Reference(super::qualified(module, name)))
    }

    #[must_use]
    pub fn sequence(fields: Vec<(&str, ValueNode)>) -> ValueNode {
        let fields = fields
            .into_iter()
            .map(|(name, value)| at(FieldValue::new(super::ident(name), value)))
            .collect();
        at(Value::Sequence(fields))
    }

    #[must_use]
    pub fn list(elements: Vec<ValueNode>) -> ValueNode {
        at(Value::List(elements))
    }

    #[must_use]
    pub fn binary(op: BinaryOp, left: ValueNode, right: ValueNode) -> ValueNode {
        at(Value::binary_op(at(op), left, right))
    }

    #[must_use]
    pub fn add(left: ValueNode, right: ValueNode) -> ValueNode {
        binary(BinaryOp::Add, left, right)
    }

    #[must_use]
    pub fn unary(op: UnaryOp, operand: ValueNode) -> ValueNode {
        at(Value::unary_op(at(op), operand))
    }

    #[must_use]
    pub fn match_template(value: ValueNode, template: TemplateNode) -> ValueNode {
        at(Value::match_template(value, template))
    }

    #[must_use]
    pub fn call(function: &str, args: Vec<ValueNode>) -> ValueNode {
        at(Value::call(super::reference(function), args))
    }

    /// Places a value at a specific span
    #[must_use]
    pub fn spanned(value: ValueNode, start: usize, end: usize) -> ValueNode {
        value.with_span(tspec_shared::span::Span::new(start, end))
    }
}

pub mod template {
    use super::at;
    use crate::{
        template::{FieldTemplate, Template, TemplateNode},
        value::ValueNode,
    };

    #[must_use]
    pub fn any() -> TemplateNode {
        at(Template::Any)
    }

    #[must_use]
    pub fn any_or_omit() -> TemplateNode {
        at(Template::AnyOrOmit)
    }

    #[must_use]
    pub fn omit() -> TemplateNode {
        at(Template::Omit)
    }

    #[must_use]
    pub fn specific(value: ValueNode) -> TemplateNode {
        at(Template::Specific(value))
    }

    #[must_use]
    pub fn list(elements: Vec<TemplateNode>) -> TemplateNode {
        at(Template::List(elements))
    }

    #[must_use]
    pub fn fields(fields: Vec<(&str, TemplateNode)>) -> TemplateNode {
        let fields = fields
            .into_iter()
            .map(|(name, template)| at(FieldTemplate::new(super::ident(name), template)))
            .collect();
        at(Template::Fields(fields))
    }

    #[must_use]
    pub fn value_list(templates: Vec<TemplateNode>) -> TemplateNode {
        at(Template::ValueList(templates))
    }

    #[must_use]
    pub fn complement(templates: Vec<TemplateNode>) -> TemplateNode {
        at(Template::Complement(templates))
    }

    #[must_use]
    pub fn range(lower: ValueNode, upper: ValueNode) -> TemplateNode {
        at(Template::Range { lower, upper })
    }
}

pub mod stmt {
    use super::at;
    use crate::{
        statement::{LocalDefinition, LocalDefinitionNode, LocalKind, Statement, StatementNode, Verdict},
        types::TypeNode,
        value::ValueNode,
    };

    #[must_use]
    pub fn local(kind: LocalKind, name: &str, ty: TypeNode, initial: Option<ValueNode>) -> LocalDefinitionNode {
        at(LocalDefinition::new(kind, super::ident(name), ty, initial))
    }

    #[must_use]
    pub fn var(name: &str, ty: TypeNode, initial: Option<ValueNode>) -> StatementNode {
        at(Statement::Local(local(LocalKind::Var, name, ty, initial)))
    }

    #[must_use]
    pub fn constant(name: &str, ty: TypeNode, value: ValueNode) -> StatementNode {
        at(Statement::Local(local(LocalKind::Const, name, ty, Some(value))))
    }

    #[must_use]
    pub fn assign(target: &str, value: ValueNode) -> StatementNode {
        at(Statement::Assign {
            target: super::reference(target),
            value,
        })
    }

    #[must_use]
    pub fn expr(value: ValueNode) -> StatementNode {
        at(Statement::Expr(value))
    }

    #[must_use]
    pub fn ret(value: Option<ValueNode>) -> StatementNode {
        at(Statement::Return(value))
    }

    #[must_use]
    pub fn if_else(
        condition: ValueNode,
        then_branch: Vec<StatementNode>,
        else_branch: Vec<StatementNode>,
    ) -> StatementNode {
        at(Statement::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    #[must_use]
    pub fn block(statements: Vec<StatementNode>) -> StatementNode {
        at(Statement::Block(statements))
    }

    #[must_use]
    pub fn verdict(verdict: Verdict) -> StatementNode {
        at(Statement::SetVerdict(at(verdict)))
    }
}

pub mod attr {
    use super::at;
    use crate::attribute::{Attribute, AttributeNode, ErrorBehaviorSetting};

    #[must_use]
    pub fn encode(encoding: &str) -> AttributeNode {
        at(Attribute::Encode(at(encoding.to_string())))
    }

    /// Settings as `(error type, handling)` pairs
    #[must_use]
    pub fn error_behavior(settings: &[(&str, &str)]) -> AttributeNode {
        let settings = settings
            .iter()
            .map(|(error_type, handling)| {
                at(ErrorBehaviorSetting::new(
                    at((*error_type).to_string()),
                    at((*handling).to_string()),
                ))
            })
            .collect();
        at(Attribute::ErrorBehavior(settings))
    }
}

pub mod behaviour {
    use super::at;
    use crate::{
        definition::{Behaviour, BehaviourKind, FormalParam},
        statement::StatementNode,
        types::TypeNode,
    };

    /// Parameters as `(name, type)`
    #[must_use]
    pub fn new(
        kind: BehaviourKind,
        params: Vec<(&str, TypeNode)>,
        return_type: Option<TypeNode>,
        runs_on: Option<&str>,
        body: Vec<StatementNode>,
    ) -> Behaviour {
        let params = params
            .into_iter()
            .map(|(name, ty)| at(FormalParam::new(super::ident(name), ty)))
            .collect();
        Behaviour::new(
            kind,
            params,
            return_type,
            runs_on.map(super::reference),
            body,
        )
    }

    #[must_use]
    pub fn function(
        params: Vec<(&str, TypeNode)>,
        return_type: Option<TypeNode>,
        body: Vec<StatementNode>,
    ) -> Behaviour {
        new(BehaviourKind::Function, params, return_type, None, body)
    }

    #[must_use]
    pub fn testcase(runs_on: &str, body: Vec<StatementNode>) -> Behaviour {
        new(BehaviourKind::Testcase, vec![], None, Some(runs_on), body)
    }
}

/// Wraps an attribute in a node with an empty span
#[must_use]
pub fn attribute(attribute: Attribute) -> AttributeNode {
    at(attribute)
}
