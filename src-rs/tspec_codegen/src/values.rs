//! Java expressions for values and checked expressions

use tspec_analysis::{
    InternalError, SemType,
    body::Expr,
    eval::ConstValue,
    types::FieldType,
};
use tspec_ast::{BinaryOp, UnaryOp};

use crate::{
    context::{COMPONENT_PARAM, Context, Repr, java_identifier, string_literal},
    templates::template_expr,
};

/// Renders a calculated value of type `ty`
pub fn value_expr<'a>(
    ctx: &Context<'a>,
    value: &ConstValue,
    ty: &'a SemType,
) -> Result<String, InternalError> {
    Ok(match value {
        ConstValue::Boolean(value) => value.to_string(),
        ConstValue::Integer(value) => format!("{value}L"),
        ConstValue::Float(value) => float_literal(*value),
        ConstValue::Charstring(text) | ConstValue::Octetstring(text) | ConstValue::Bitstring(text) => {
            string_literal(text)
        }
        ConstValue::Enumerated { name, .. } => {
            let id = enum_class(ctx, ty)?;
            format!("{}.{}", ctx.qualified(id), java_identifier(name))
        }
        ConstValue::Record(values) => {
            let (class, fields) = record_class(ctx, ty)?;
            let args = fields
                .iter()
                .map(|field| {
                    values
                        .iter()
                        .find(|(name, _)| name == field.name())
                        .map_or_else(|| Ok("null".to_string()), |(_, value)| value_expr(ctx, value, field.ty()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            format!("new {class}({})", args.join(", "))
        }
        ConstValue::Union { alternative, value } => {
            let (class, alternatives) = record_class(ctx, ty)?;
            let field = find_field(ctx, alternatives, alternative, ty)?;
            format!(
                "new {class}({}, {})",
                string_literal(alternative),
                value_expr(ctx, value, field.ty())?
            )
        }
        ConstValue::List(elements) | ConstValue::SetOf(elements) => {
            let element_type = list_element(ctx, ty)?;
            let elements = elements
                .iter()
                .map(|element| value_expr(ctx, element, element_type))
                .collect::<Result<Vec<_>, _>>()?;
            list_expr(ctx, ty, &elements)?
        }
        ConstValue::Omit => "null".to_string(),
    })
}

fn float_literal(value: f64) -> String {
    if value.is_nan() {
        "Double.NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Double.POSITIVE_INFINITY".to_string()
        } else {
            "Double.NEGATIVE_INFINITY".to_string()
        }
    } else {
        format!("{value:?}")
    }
}

fn shape_error(ctx: &Context<'_>, ty: &SemType, expected: &'static str) -> InternalError {
    InternalError::UnexpectedKind {
        name: ctx.project().module_name(ctx.module()),
        target: ctx.project().describe_type(ty),
        expected,
    }
}

fn enum_class(ctx: &Context<'_>, ty: &SemType) -> Result<tspec_analysis::AssignmentId, InternalError> {
    match ctx.repr(ty)? {
        Repr::Class {
            id,
            structure: SemType::Enumerated(_),
        } => Ok(id),
        Repr::Class { .. } | Repr::Builtin(_) | Repr::List { .. } => Err(shape_error(ctx, ty, "enumerated type")),
    }
}

/// Returns the class and fields of a record, set or union type
pub fn record_class<'a>(
    ctx: &Context<'a>,
    ty: &'a SemType,
) -> Result<(String, &'a [FieldType]), InternalError> {
    if let Repr::Class { id, structure } = ctx.repr(ty)?
        && let Some(fields) = structure.fields()
    {
        return Ok((ctx.qualified(id), fields));
    }
    Err(shape_error(ctx, ty, "record, set or union type"))
}

/// Finds a field by name in the fields of `ty`
pub fn find_field<'a>(
    ctx: &Context<'_>,
    fields: &'a [FieldType],
    name: &str,
    ty: &SemType,
) -> Result<&'a FieldType, InternalError> {
    fields
        .iter()
        .find(|field| field.name() == name)
        .ok_or_else(|| shape_error(ctx, ty, "type with the field"))
}

/// Returns the element type of a `record of` or `set of` type
pub fn list_element<'a>(ctx: &Context<'a>, ty: &'a SemType) -> Result<&'a SemType, InternalError> {
    match ctx.repr(ty)? {
        Repr::List { element, .. } => Ok(element),
        Repr::Class {
            structure: SemType::RecordOf(element) | SemType::SetOf(element),
            ..
        } => Ok(&**element),
        Repr::Class { .. } | Repr::Builtin(_) => Err(shape_error(ctx, ty, "record of or set of type")),
    }
}

/// Wraps rendered elements into a value of a list type
fn list_expr<'a>(ctx: &Context<'a>, ty: &'a SemType, elements: &[String]) -> Result<String, InternalError> {
    let element_type = ctx.java_type(list_element(ctx, ty)?)?;
    let list = format!("java.util.List.<{element_type}>of({})", elements.join(", "));
    Ok(match ctx.repr(ty)? {
        Repr::Class { id, .. } => format!("new {}({list})", ctx.qualified(id)),
        Repr::List { .. } | Repr::Builtin(_) => list,
    })
}

/// Renders a checked expression
pub fn expr(ctx: &Context<'_>, expression: &Expr) -> Result<String, InternalError> {
    Ok(match expression {
        Expr::Constant(value, ty) => value_expr(ctx, value, ty)?,
        Expr::Local(name) => java_identifier(name),
        Expr::ComponentMember(name) => format!("{COMPONENT_PARAM}.{}", java_identifier(name)),
        Expr::Binary {
            op,
            operand_type,
            left,
            right,
        } => binary(ctx, *op, operand_type, &expr(ctx, left)?, &expr(ctx, right)?)?,
        Expr::Unary { op, operand } => {
            let operand_text = expr(ctx, operand)?;
            match op {
                UnaryOp::Not => format!("(!{operand_text})"),
                UnaryOp::Neg if is_integer(operand) => format!("Math.negateExact({operand_text})"),
                UnaryOp::Neg => format!("(-{operand_text})"),
            }
        }
        Expr::Record { ty, fields } => {
            let (class, definitions) = record_class(ctx, ty)?;
            let args = definitions
                .iter()
                .map(|definition| {
                    fields
                        .iter()
                        .find(|(name, _)| name == definition.name())
                        .map_or_else(|| Ok("null".to_string()), |(_, value)| expr(ctx, value))
                })
                .collect::<Result<Vec<_>, _>>()?;
            format!("new {class}({})", args.join(", "))
        }
        Expr::Union {
            ty,
            alternative,
            value,
        } => {
            let (class, _) = record_class(ctx, ty)?;
            format!("new {class}({}, {})", string_literal(alternative), expr(ctx, value)?)
        }
        Expr::List { ty, elements } => {
            let elements = elements
                .iter()
                .map(|element| expr(ctx, element))
                .collect::<Result<Vec<_>, _>>()?;
            list_expr(ctx, ty, &elements)?
        }
        Expr::Omit => "null".to_string(),
        Expr::Match {
            value,
            value_type,
            template,
        } => format!(
            "{}.match({})",
            template_expr(ctx, template, value_type)?,
            expr(ctx, value)?
        ),
        Expr::Call {
            function,
            args,
            passes_component,
        } => {
            let mut rendered = Vec::with_capacity(args.len() + 1);
            if *passes_component {
                rendered.push(COMPONENT_PARAM.to_string());
            }
            for arg in args {
                rendered.push(expr(ctx, arg)?);
            }
            format!("{}({})", ctx.qualified(*function), rendered.join(", "))
        }
    })
}

/// Returns whether an expression has integer type, for choosing overflow
/// checked operations
fn is_integer(expression: &Expr) -> bool {
    match expression {
        Expr::Constant(value, _) => matches!(value, ConstValue::Integer(_)),
        Expr::Binary { op, operand_type, .. } => {
            matches!(
                op,
                BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod | BinaryOp::Rem
            ) && matches!(operand_type, SemType::Integer)
        }
        Expr::Unary { operand, .. } => is_integer(operand),
        Expr::Local(_)
        | Expr::ComponentMember(_)
        | Expr::Record { .. }
        | Expr::Union { .. }
        | Expr::List { .. }
        | Expr::Omit
        | Expr::Match { .. }
        | Expr::Call { .. } => false,
    }
}

fn binary<'a>(
    ctx: &Context<'a>,
    op: BinaryOp,
    operand_type: &'a SemType,
    left: &str,
    right: &str,
) -> Result<String, InternalError> {
    let repr = ctx.repr(operand_type)?;
    let integer = matches!(repr, Repr::Builtin("Long"));
    let symbol = op.symbol();

    Ok(match op {
        BinaryOp::Add if integer => format!("Math.addExact({left}, {right})"),
        BinaryOp::Sub if integer => format!("Math.subtractExact({left}, {right})"),
        BinaryOp::Mul if integer => format!("Math.multiplyExact({left}, {right})"),
        BinaryOp::Div if integer => format!("TspecRuntime.div({left}, {right})"),
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            format!("({left} {symbol} {right})")
        }
        BinaryOp::Mod => format!("TspecRuntime.mod({left}, {right})"),
        BinaryOp::Rem => format!("TspecRuntime.rem({left}, {right})"),
        BinaryOp::Concat => match repr {
            Repr::Builtin(_) => format!("({left} + {right})"),
            Repr::List { .. } => format!("TspecRuntime.concat({left}, {right})"),
            Repr::Class { id, .. } => format!(
                "new {}(TspecRuntime.concat({left}.elements, {right}.elements))",
                ctx.qualified(id)
            ),
        },
        BinaryOp::Eq | BinaryOp::Ne => {
            let negation = if op == BinaryOp::Ne { "!" } else { "" };
            match repr {
                Repr::List { unordered: true, .. } => format!("{negation}TspecRuntime.sameElements({left}, {right})"),
                Repr::List { unordered: false, .. } | Repr::Class { .. } | Repr::Builtin(_) => {
                    format!("{negation}java.util.Objects.equals({left}, {right})")
                }
            }
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => match repr {
            Repr::Class {
                structure: SemType::Enumerated(_),
                ..
            } => format!("({left}.number {symbol} {right}.number)"),
            Repr::Class { .. } | Repr::Builtin(_) | Repr::List { .. } => {
                format!("({left}.compareTo({right}) {symbol} 0)")
            }
        },
        BinaryOp::And => format!("({left} && {right})"),
        BinaryOp::Or => format!("({left} || {right})"),
        BinaryOp::Xor => format!("({left} ^ {right})"),
    })
}
