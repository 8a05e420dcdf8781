//! Java expressions for checked templates

use tspec_analysis::{InternalError, SemType, matching::TemplateValue};

use crate::{
    context::{Context, Repr, string_literal},
    values::{find_field, list_element, record_class, value_expr},
};

/// Renders a template matching values of type `ty`
///
/// The result has type `TspecRuntime.Template<T>` where `T` is the Java type
/// of `ty`.
pub fn template_expr<'a>(
    ctx: &Context<'a>,
    template: &TemplateValue,
    ty: &'a SemType,
) -> Result<String, InternalError> {
    let java_type = ctx.java_type(ty)?;

    Ok(match template {
        TemplateValue::Any => format!("TspecRuntime.<{java_type}>any()"),
        TemplateValue::AnyOrOmit => format!("TspecRuntime.<{java_type}>anyOrOmit()"),
        TemplateValue::Omit => format!("TspecRuntime.<{java_type}>omit()"),
        TemplateValue::Specific(value) => match ctx.repr(ty)? {
            Repr::List {
                element,
                unordered: true,
            } => format!(
                "TspecRuntime.<{}>specificSet({})",
                ctx.java_type(element)?,
                value_expr(ctx, value, ty)?
            ),
            Repr::List { unordered: false, .. } | Repr::Class { .. } | Repr::Builtin(_) => {
                format!("TspecRuntime.<{java_type}>specific({})", value_expr(ctx, value, ty)?)
            }
        },
        TemplateValue::Fields(templates) => {
            let (class, fields) = record_class(ctx, ty)?;
            let args = fields
                .iter()
                .map(|field| {
                    templates
                        .iter()
                        .find(|(name, _)| name == field.name())
                        .map_or_else(
                            || Ok(format!("TspecRuntime.<{}>anyOrOmit()", ctx.java_type(field.ty())?)),
                            |(_, template)| template_expr(ctx, template, field.ty()),
                        )
                })
                .collect::<Result<Vec<_>, _>>()?;
            format!("new {class}.Template({})", args.join(", "))
        }
        TemplateValue::Union {
            alternative,
            template,
        } => {
            let (class, alternatives) = record_class(ctx, ty)?;
            let field = find_field(ctx, alternatives, alternative, ty)?;
            format!(
                "new {class}.Template({}, {})",
                string_literal(alternative),
                template_expr(ctx, template, field.ty())?
            )
        }
        TemplateValue::List {
            elements,
            unordered,
        } => {
            let element_type = list_element(ctx, ty)?;
            let elements = elements
                .iter()
                .map(|element| template_expr(ctx, element, element_type))
                .collect::<Result<Vec<_>, _>>()?;
            let matcher = if *unordered { "setOf" } else { "recordOf" };
            let list = format!(
                "TspecRuntime.{matcher}(java.util.List.<{}>of({}))",
                ctx.template_type(element_type)?,
                elements.join(", ")
            );
            match ctx.repr(ty)? {
                Repr::Class { id, .. } => format!("new {}.Template({list})", ctx.qualified(id)),
                Repr::List { .. } | Repr::Builtin(_) => list,
            }
        }
        TemplateValue::ValueList(templates) => {
            format!("TspecRuntime.valueList({})", template_list(ctx, templates, ty)?)
        }
        TemplateValue::Complement(templates) => {
            format!("TspecRuntime.complement({})", template_list(ctx, templates, ty)?)
        }
        TemplateValue::Range { lower, upper } => format!(
            "TspecRuntime.<{java_type}>range({}, {})",
            value_expr(ctx, lower, ty)?,
            value_expr(ctx, upper, ty)?
        ),
    })
}

fn template_list<'a>(
    ctx: &Context<'a>,
    templates: &[TemplateValue],
    ty: &'a SemType,
) -> Result<String, InternalError> {
    let templates = templates
        .iter()
        .map(|template| template_expr(ctx, template, ty))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!(
        "java.util.List.<{}>of({})",
        ctx.template_type(ty)?,
        templates.join(", ")
    ))
}
