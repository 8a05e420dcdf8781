//! Checking and folding of values

use indexmap::IndexMap;
use tspec_ast::{
    self as ast, BinaryOp, DefinitionKind, UnaryOp, Value,
    node::Node,
    reference::ReferenceNode,
    template::TemplateNode,
    value::{FieldValueNode, ValueNode},
};
use tspec_shared::span::Span;

use super::{
    Checker, Frame, Resolved, describe_definition, templates,
    types::{self, compatible},
};
use crate::{
    body::Expr,
    error::SemanticError,
    eval::{self, ConstValue, EvalError},
    info::AssignmentInfo,
    matching,
    types::{FieldType, SemType},
};

/// Checks a value against the type it must have
///
/// Returns `None` if an error was reported, or if the value depends on a
/// definition that is itself erroneous.
pub(super) fn check_value(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    value: &ValueNode,
    expected: &SemType,
) -> Option<Expr> {
    let span = value.span();
    let structure = types::structure(checker, frame, expected, span);
    if structure.is_error() {
        return None;
    }

    match &**value {
        Value::Boolean(boolean) => literal(checker, frame, span, expected, &structure, ConstValue::Boolean(*boolean)),
        Value::Integer(integer) => literal(checker, frame, span, expected, &structure, ConstValue::Integer(*integer)),
        Value::Float(float) => literal(checker, frame, span, expected, &structure, ConstValue::Float(*float)),
        Value::Charstring(string) => literal(
            checker,
            frame,
            span,
            expected,
            &structure,
            ConstValue::Charstring(string.clone()),
        ),
        Value::Octetstring(hex) => {
            let octets = octetstring_literal(frame, hex, span)?;
            literal(checker, frame, span, expected, &structure, octets)
        }
        Value::Bitstring(bits) => {
            let bits = bitstring_literal(frame, bits, span)?;
            literal(checker, frame, span, expected, &structure, bits)
        }
        Value::Omit => {
            frame.report(SemanticError::OmitNotAllowed {
                mechanism: "`omit`",
                span,
            });
            None
        }
        Value::Sequence(fields) => check_sequence(checker, frame, span, fields, expected, &structure),
        Value::List(elements) => check_list(checker, frame, span, elements, expected, &structure),
        Value::Reference(reference) => {
            if let Some(item) = enum_item(&structure, reference) {
                return Some(Expr::Constant(item, expected.clone()));
            }
            inferred(checker, frame, value, expected)
        }
        Value::BinaryOp { .. } | Value::UnaryOp { .. } | Value::Match { .. } | Value::Call { .. } => {
            inferred(checker, frame, value, expected)
        }
    }
}

fn inferred(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    value: &ValueNode,
    expected: &SemType,
) -> Option<Expr> {
    let (expr, found) = infer_value(checker, frame, value)?;

    if !compatible(checker, frame, expected, &found, value.span()) {
        report_mismatch(checker, frame, expected, &checker.describe(&found), value.span());
        return None;
    }

    Some(retype(expr, expected))
}

/// Gives a folded value the type it is used as
fn retype(expr: Expr, ty: &SemType) -> Expr {
    if let Expr::Constant(value, _) = expr {
        Expr::Constant(value, ty.clone())
    } else {
        expr
    }
}

fn report_mismatch(
    checker: &Checker<'_>,
    frame: &mut Frame,
    expected: &SemType,
    found: &str,
    span: Span,
) {
    frame.report(SemanticError::TypeMismatch {
        expected: checker.describe(expected),
        found: found.to_string(),
        span,
    });
}

fn literal(
    checker: &Checker<'_>,
    frame: &mut Frame,
    span: Span,
    expected: &SemType,
    structure: &SemType,
    value: ConstValue,
) -> Option<Expr> {
    let found = literal_type(&value);
    if *structure == found {
        Some(Expr::Constant(value, expected.clone()))
    } else {
        report_mismatch(
            checker,
            frame,
            expected,
            found.builtin_name().unwrap_or("value"),
            span,
        );
        None
    }
}

const fn literal_type(value: &ConstValue) -> SemType {
    match value {
        ConstValue::Boolean(_) => SemType::Boolean,
        ConstValue::Integer(_) => SemType::Integer,
        ConstValue::Float(_) => SemType::Float,
        ConstValue::Charstring(_) => SemType::Charstring,
        ConstValue::Octetstring(_) => SemType::Octetstring,
        ConstValue::Bitstring(_) => SemType::Bitstring,
        ConstValue::Enumerated { .. }
        | ConstValue::Record(_)
        | ConstValue::Union { .. }
        | ConstValue::List(_)
        | ConstValue::SetOf(_)
        | ConstValue::Omit => SemType::Error,
    }
}

fn octetstring_literal(frame: &mut Frame, hex: &str, span: Span) -> Option<ConstValue> {
    if hex.len() % 2 == 0 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(ConstValue::Octetstring(hex.to_ascii_uppercase()))
    } else {
        frame.report(SemanticError::InvalidLiteral {
            kind: "octetstring",
            literal: hex.to_string(),
            span,
        });
        None
    }
}

fn bitstring_literal(frame: &mut Frame, bits: &str, span: Span) -> Option<ConstValue> {
    if bits.chars().all(|c| c == '0' || c == '1') {
        Some(ConstValue::Bitstring(bits.to_string()))
    } else {
        frame.report(SemanticError::InvalidLiteral {
            kind: "bitstring",
            literal: bits.to_string(),
            span,
        });
        None
    }
}

/// Resolves an unqualified name to an item of the expected enumeration
fn enum_item(structure: &SemType, reference: &ast::Reference) -> Option<ConstValue> {
    if reference.module().is_some() {
        return None;
    }

    let SemType::Enumerated(items) = structure else {
        return None;
    };

    let name = reference.name().canonical();
    items
        .iter()
        .find(|item| item.name() == name)
        .map(|item| ConstValue::Enumerated {
            name: item.name().to_string(),
            number: item.number(),
        })
}

/// Returns the value a checked expression folds to, if any
pub(super) fn constant_of(expr: &Expr) -> Option<ConstValue> {
    if matches!(expr, Expr::Omit) {
        Some(ConstValue::Omit)
    } else {
        expr.as_constant().cloned()
    }
}

fn fold_record(ty: &SemType, fields: Vec<(String, Expr)>) -> Expr {
    let constant: Option<Vec<_>> = fields
        .iter()
        .map(|(name, expr)| constant_of(expr).map(|value| (name.clone(), value)))
        .collect();

    match constant {
        Some(fields) => Expr::Constant(ConstValue::Record(fields), ty.clone()),
        None => Expr::Record {
            ty: ty.clone(),
            fields,
        },
    }
}

/// Builds the constant of a record of, or of a set of if `unordered`
fn list_constant(elements: Vec<ConstValue>, unordered: bool) -> ConstValue {
    if unordered {
        ConstValue::SetOf(elements)
    } else {
        ConstValue::List(elements)
    }
}

fn fold_list(ty: &SemType, elements: Vec<Expr>, unordered: bool) -> Expr {
    let constant: Option<Vec<_>> = elements.iter().map(constant_of).collect();

    match constant {
        Some(elements) => Expr::Constant(list_constant(elements, unordered), ty.clone()),
        None => Expr::List {
            ty: ty.clone(),
            elements,
        },
    }
}

/// Checks the value of one field, where `omit` is allowed if the field is
/// optional
fn check_field_value(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    value: &ValueNode,
    field: &FieldType,
) -> Option<Expr> {
    if matches!(&**value, Value::Omit) {
        if field.is_optional() {
            return Some(Expr::Omit);
        }
        frame.report(SemanticError::OmitNotAllowed {
            mechanism: "`omit`",
            span: value.span(),
        });
        return None;
    }

    check_value(checker, frame, value, field.ty())
}

fn check_sequence(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    span: Span,
    fields: &[FieldValueNode],
    expected: &SemType,
    structure: &SemType,
) -> Option<Expr> {
    match structure {
        SemType::Record(definitions) | SemType::Set(definitions) => {
            check_record_value(checker, frame, span, fields, expected, definitions)
        }
        SemType::Union(alternatives) => {
            check_union_value(checker, frame, span, fields, expected, alternatives)
        }
        SemType::RecordOf(_) | SemType::SetOf(_) if fields.is_empty() => Some(Expr::Constant(
            list_constant(vec![], matches!(structure, SemType::SetOf(_))),
            expected.clone(),
        )),
        SemType::Boolean
        | SemType::Integer
        | SemType::Float
        | SemType::Charstring
        | SemType::Octetstring
        | SemType::Bitstring
        | SemType::Enumerated(_)
        | SemType::RecordOf(_)
        | SemType::SetOf(_)
        | SemType::Named(_)
        | SemType::Error => {
            report_mismatch(checker, frame, expected, "a field list", span);
            None
        }
    }
}

fn check_record_value(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    span: Span,
    fields: &[FieldValueNode],
    expected: &SemType,
    definitions: &[FieldType],
) -> Option<Expr> {
    let type_name = checker.describe(expected);
    let mut given: IndexMap<String, &FieldValueNode> = IndexMap::new();
    let mut valid = true;

    for field in fields {
        let name = field.name().canonical();
        if let Some(first) = given.get(&name) {
            frame.report(SemanticError::DuplicateField {
                name: field.name().to_string(),
                first_span: first.name().span(),
                duplicate_span: field.name().span(),
            });
            valid = false;
        } else if definitions.iter().any(|definition| definition.name() == name) {
            given.insert(name, field);
        } else {
            frame.report(SemanticError::UnknownField {
                field: field.name().to_string(),
                ty: type_name.clone(),
                span: field.name().span(),
            });
            valid = false;
        }
    }

    let mut checked = vec![];
    for definition in definitions {
        let Some(field) = given.get(definition.name()) else {
            frame.report(SemanticError::MissingField {
                field: definition.name().to_string(),
                ty: type_name.clone(),
                span,
            });
            valid = false;
            continue;
        };

        match check_field_value(checker, frame, field.value(), definition) {
            Some(expr) => checked.push((definition.name().to_string(), expr)),
            None => valid = false,
        }
    }

    valid.then(|| fold_record(expected, checked))
}

fn check_union_value(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    span: Span,
    fields: &[FieldValueNode],
    expected: &SemType,
    alternatives: &[FieldType],
) -> Option<Expr> {
    let [field] = fields else {
        frame.report(SemanticError::UnionNeedsOneAlternative {
            ty: checker.describe(expected),
            span,
        });
        return None;
    };

    let name = field.name().canonical();
    let Some(alternative) = alternatives.iter().find(|alternative| alternative.name() == name) else {
        frame.report(SemanticError::UnknownField {
            field: field.name().to_string(),
            ty: checker.describe(expected),
            span: field.name().span(),
        });
        return None;
    };

    let value = check_field_value(checker, frame, field.value(), alternative)?;

    Some(match value.as_constant() {
        Some(constant) => Expr::Constant(
            ConstValue::Union {
                alternative: name,
                value: Box::new(constant.clone()),
            },
            expected.clone(),
        ),
        None => Expr::Union {
            ty: expected.clone(),
            alternative: name,
            value: Box::new(value),
        },
    })
}

fn check_list(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    span: Span,
    elements: &[ValueNode],
    expected: &SemType,
    structure: &SemType,
) -> Option<Expr> {
    match structure {
        SemType::RecordOf(element) | SemType::SetOf(element) => {
            let checked: Vec<_> = elements
                .iter()
                .map(|value| check_value(checker, frame, value, element))
                .collect();
            let checked: Option<Vec<_>> = checked.into_iter().collect();
            Some(fold_list(expected, checked?, matches!(structure, SemType::SetOf(_))))
        }
        SemType::Record(definitions) | SemType::Set(definitions) => {
            if elements.len() != definitions.len() {
                frame.report(SemanticError::WrongElementCount {
                    expected: definitions.len(),
                    found: elements.len(),
                    span,
                });
                return None;
            }

            let checked: Vec<_> = elements
                .iter()
                .zip(definitions)
                .map(|(value, definition)| {
                    check_field_value(checker, frame, value, definition)
                        .map(|expr| (definition.name().to_string(), expr))
                })
                .collect();
            let checked: Option<Vec<_>> = checked.into_iter().collect();
            Some(fold_record(expected, checked?))
        }
        SemType::Boolean
        | SemType::Integer
        | SemType::Float
        | SemType::Charstring
        | SemType::Octetstring
        | SemType::Bitstring
        | SemType::Enumerated(_)
        | SemType::Union(_)
        | SemType::Named(_)
        | SemType::Error => {
            report_mismatch(checker, frame, expected, "a value list", span);
            None
        }
    }
}

/// Infers the type of a value from the value itself
pub(super) fn infer_value(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    value: &ValueNode,
) -> Option<(Expr, SemType)> {
    let span = value.span();

    match &**value {
        Value::Boolean(boolean) => Some(constant(ConstValue::Boolean(*boolean), SemType::Boolean)),
        Value::Integer(integer) => Some(constant(ConstValue::Integer(*integer), SemType::Integer)),
        Value::Float(float) => Some(constant(ConstValue::Float(*float), SemType::Float)),
        Value::Charstring(string) => Some(constant(
            ConstValue::Charstring(string.clone()),
            SemType::Charstring,
        )),
        Value::Octetstring(hex) => octetstring_literal(frame, hex, span)
            .map(|value| constant(value, SemType::Octetstring)),
        Value::Bitstring(bits) => {
            bitstring_literal(frame, bits, span).map(|value| constant(value, SemType::Bitstring))
        }
        Value::Omit | Value::Sequence(_) | Value::List(_) => {
            frame.report(SemanticError::CannotInferType { span });
            None
        }
        Value::Reference(reference) => infer_reference(checker, frame, reference),
        Value::BinaryOp { op, left, right } => infer_binary(checker, frame, span, op, left, right),
        Value::UnaryOp { op, operand } => infer_unary(checker, frame, span, op, operand),
        Value::Match { value, template } => infer_match(checker, frame, value, template),
        Value::Call { function, args } => {
            let (expr, return_type) = check_call(checker, frame, span, function, args)?;
            if let Some(return_type) = return_type {
                Some((expr, return_type))
            } else {
                frame.report(SemanticError::NoReturnValue {
                    function: function.name().to_string(),
                    span,
                });
                None
            }
        }
    }
}

fn constant(value: ConstValue, ty: SemType) -> (Expr, SemType) {
    (Expr::Constant(value, ty.clone()), ty)
}

fn infer_reference(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    reference: &ReferenceNode,
) -> Option<(Expr, SemType)> {
    match checker.resolve_name(frame, reference)? {
        Resolved::Local(symbol) => {
            let expr = if let Some(value) = symbol.value() {
                Expr::Constant(value.clone(), symbol.ty().clone())
            } else if symbol.is_component_member() {
                Expr::ComponentMember(symbol.name().to_string())
            } else {
                Expr::Local(symbol.name().to_string())
            };
            Some((expr, symbol.ty))
        }
        Resolved::Assignment(id) => {
            let kind = checker.sources().definition(id).kind();
            if !matches!(kind, DefinitionKind::Const { .. }) {
                checker.report_wrong_kind(frame, reference, "a value", describe_definition(kind));
                return None;
            }

            if !checker.force(frame, id, reference.span()) {
                return None;
            }

            let Some(AssignmentInfo::Constant { ty, value }) = checker.info(id) else {
                return None;
            };
            let value = value.clone()?;
            Some(constant(value, ty.clone()))
        }
    }
}

/// Returns whether the type of a value can be inferred without reporting
/// an error
fn is_inferable(checker: &Checker<'_>, frame: &Frame, value: &ValueNode) -> bool {
    match &**value {
        Value::Omit | Value::Sequence(_) | Value::List(_) => false,
        Value::Reference(reference) => {
            checker.lookup_local(frame, reference).is_some()
                || checker.lookup_assignment(frame, reference).is_ok()
        }
        Value::Boolean(_)
        | Value::Integer(_)
        | Value::Float(_)
        | Value::Charstring(_)
        | Value::Octetstring(_)
        | Value::Bitstring(_)
        | Value::BinaryOp { .. }
        | Value::UnaryOp { .. }
        | Value::Match { .. }
        | Value::Call { .. } => true,
    }
}

/// Checks the operands of a comparison, inferring the type from whichever
/// side allows it
fn infer_operands(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    left: &ValueNode,
    right: &ValueNode,
) -> Option<(Expr, Expr, SemType)> {
    if is_inferable(checker, frame, left) {
        let (left, ty) = infer_value(checker, frame, left)?;
        let right = check_value(checker, frame, right, &ty)?;
        Some((left, right, ty))
    } else {
        let (right, ty) = infer_value(checker, frame, right)?;
        let left = check_value(checker, frame, left, &ty)?;
        Some((left, right, ty))
    }
}

fn infer_binary(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    span: Span,
    op: &Node<BinaryOp>,
    left: &ValueNode,
    right: &ValueNode,
) -> Option<(Expr, SemType)> {
    let op = **op;

    match op {
        BinaryOp::Add
        | BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Mod
        | BinaryOp::Rem => {
            let (left, ty) = infer_value(checker, frame, left)?;
            let structure = types::structure(checker, frame, &ty, span);
            let valid = if matches!(op, BinaryOp::Mod | BinaryOp::Rem) {
                structure == SemType::Integer
            } else {
                structure.is_numeric()
            };
            if !valid {
                report_invalid_operands(checker, frame, op, &ty, span);
                return None;
            }

            let right = check_value(checker, frame, right, &ty)?;
            fold_binary(checker, frame, span, op, &ty, left, right, ty.clone())
        }
        BinaryOp::Concat => {
            let (left, ty) = infer_value(checker, frame, left)?;
            let structure = types::structure(checker, frame, &ty, span);
            if !matches!(
                structure,
                SemType::Charstring
                    | SemType::Octetstring
                    | SemType::Bitstring
                    | SemType::RecordOf(_)
                    | SemType::SetOf(_)
            ) {
                report_invalid_operands(checker, frame, op, &ty, span);
                return None;
            }

            let right = check_value(checker, frame, right, &ty)?;
            fold_binary(checker, frame, span, op, &ty, left, right, ty.clone())
        }
        BinaryOp::Eq | BinaryOp::Ne => {
            let (left, right, ty) = infer_operands(checker, frame, left, right)?;
            fold_binary(checker, frame, span, op, &ty, left, right, SemType::Boolean)
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let (left, right, ty) = infer_operands(checker, frame, left, right)?;
            let structure = types::structure(checker, frame, &ty, span);
            if !structure.is_numeric() && !matches!(structure, SemType::Enumerated(_)) {
                report_invalid_operands(checker, frame, op, &ty, span);
                return None;
            }
            fold_binary(checker, frame, span, op, &ty, left, right, SemType::Boolean)
        }
        BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => {
            let left = check_value(checker, frame, left, &SemType::Boolean);
            let right = check_value(checker, frame, right, &SemType::Boolean);
            let (left, right) = (left?, right?);
            fold_binary(
                checker,
                frame,
                span,
                op,
                &SemType::Boolean,
                left,
                right,
                SemType::Boolean,
            )
        }
    }
}

fn report_invalid_operands(
    checker: &Checker<'_>,
    frame: &mut Frame,
    op: BinaryOp,
    ty: &SemType,
    span: Span,
) {
    frame.report(SemanticError::InvalidOperands {
        op: op.symbol(),
        ty: checker.describe(ty),
        span,
    });
}

fn is_zero(value: &ConstValue) -> bool {
    match value {
        ConstValue::Integer(integer) => *integer == 0,
        ConstValue::Float(float) => *float == 0.0,
        ConstValue::Boolean(_)
        | ConstValue::Charstring(_)
        | ConstValue::Octetstring(_)
        | ConstValue::Bitstring(_)
        | ConstValue::Enumerated { .. }
        | ConstValue::Record(_)
        | ConstValue::Union { .. }
        | ConstValue::List(_)
        | ConstValue::SetOf(_)
        | ConstValue::Omit => false,
    }
}

#[expect(
    clippy::too_many_arguments,
    reason = "the operator, operands and types describe a single operation"
)]
fn fold_binary(
    checker: &Checker<'_>,
    frame: &mut Frame,
    span: Span,
    op: BinaryOp,
    operand_type: &SemType,
    left: Expr,
    right: Expr,
    result_type: SemType,
) -> Option<(Expr, SemType)> {
    if let (Some(left), Some(right)) = (left.as_constant(), right.as_constant()) {
        return match eval::binary(op, left, right) {
            Ok(value) => Some(constant(value, result_type)),
            Err(error) => {
                report_eval_error(checker, frame, error, op.symbol(), operand_type, span);
                None
            }
        };
    }

    let divides = matches!(op, BinaryOp::Div | BinaryOp::Mod | BinaryOp::Rem);
    if divides && right.as_constant().is_some_and(is_zero) {
        frame.report(SemanticError::DivisionByZero { span });
        return None;
    }

    let expr = Expr::Binary {
        op,
        operand_type: operand_type.clone(),
        left: Box::new(left),
        right: Box::new(right),
    };
    Some((expr, result_type))
}

fn report_eval_error(
    checker: &Checker<'_>,
    frame: &mut Frame,
    error: EvalError,
    op: &'static str,
    ty: &SemType,
    span: Span,
) {
    frame.report(match error {
        EvalError::DivisionByZero => SemanticError::DivisionByZero { span },
        EvalError::Overflow => SemanticError::IntegerOverflow { span },
        EvalError::Unsupported(_) => SemanticError::InvalidOperands {
            op,
            ty: checker.describe(ty),
            span,
        },
    });
}

fn infer_unary(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    span: Span,
    op: &Node<UnaryOp>,
    operand: &ValueNode,
) -> Option<(Expr, SemType)> {
    let op = **op;
    let (operand, ty) = match op {
        UnaryOp::Neg => {
            let (operand, ty) = infer_value(checker, frame, operand)?;
            if !types::structure(checker, frame, &ty, span).is_numeric() {
                frame.report(SemanticError::InvalidOperands {
                    op: op.symbol(),
                    ty: checker.describe(&ty),
                    span,
                });
                return None;
            }
            (operand, ty)
        }
        UnaryOp::Not => (
            check_value(checker, frame, operand, &SemType::Boolean)?,
            SemType::Boolean,
        ),
    };

    if let Some(value) = operand.as_constant() {
        return match eval::unary(op, value) {
            Ok(value) => Some(constant(value, ty)),
            Err(error) => {
                report_eval_error(checker, frame, error, op.symbol(), &ty, span);
                None
            }
        };
    }

    let expr = Expr::Unary {
        op,
        operand: Box::new(operand),
    };
    Some((expr, ty))
}

fn infer_match(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    value: &ValueNode,
    template: &TemplateNode,
) -> Option<(Expr, SemType)> {
    let (value, value_type) = infer_value(checker, frame, value)?;
    let template = templates::check_template(checker, frame, template, &value_type, false)?;

    let expr = match value.as_constant() {
        Some(constant) => Expr::Constant(
            ConstValue::Boolean(matching::matches(&template, constant)),
            SemType::Boolean,
        ),
        None => Expr::Match {
            value: Box::new(value),
            value_type,
            template,
        },
    };
    Some((expr, SemType::Boolean))
}

/// Checks a call to a function
///
/// Returns the call together with the function's return type, if it has
/// one.
pub(super) fn check_call(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    span: Span,
    function: &ReferenceNode,
    args: &[ValueNode],
) -> Option<(Expr, Option<SemType>)> {
    let id = match checker.resolve_name(frame, function)? {
        Resolved::Local(_) => {
            checker.report_wrong_kind(frame, function, "a function", "a local definition");
            return None;
        }
        Resolved::Assignment(id) => id,
    };

    let kind = checker.sources().definition(id).kind();
    let is_function = matches!(
        kind,
        DefinitionKind::Behaviour(behaviour) if behaviour.kind() == ast::BehaviourKind::Function
    );
    if !is_function {
        checker.report_wrong_kind(frame, function, "a function", describe_definition(kind));
        return None;
    }

    let signature = super::behaviour::signature_of(checker, id)?;
    let params = signature.params();
    if args.len() != params.len() {
        frame.report(SemanticError::WrongArgumentCount {
            function: function.name().to_string(),
            expected: params.len(),
            found: args.len(),
            span,
        });
        return None;
    }

    let checked: Vec<_> = args
        .iter()
        .zip(params)
        .map(|(arg, (_, ty))| check_value(checker, frame, arg, ty))
        .collect();
    let mut valid = checked.iter().all(Option::is_some);

    if let Some(component) = signature.runs_on() {
        if frame.runs_on != Some(component) {
            frame.report(SemanticError::RunsOnMismatch {
                function: function.name().to_string(),
                component: checker.sources().definition(component).name().to_string(),
                span,
            });
            valid = false;
        }
    }

    checker.depend_lazily(id);

    valid.then(|| {
        let call = Expr::Call {
            function: id,
            args: checked.into_iter().flatten().collect(),
            passes_component: signature.runs_on().is_some(),
        };
        (call, signature.return_type().cloned())
    })
}
