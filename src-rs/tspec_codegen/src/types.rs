//! Declarations generated for type definitions

use tspec_analysis::{
    AssignmentId, InternalError, SemType,
    info::TypeInfo,
    types::{EnumItem, FieldType},
};

use crate::{
    context::{Context, Repr, java_identifier, string_literal},
    writer::JavaWriter,
};

/// Emits the declarations of one type definition
///
/// Aliases of builtin and enumerated types have no declaration of their
/// own; their uses refer to the target type directly.
pub fn emit_type<'a>(
    ctx: &Context<'a>,
    writer: &mut JavaWriter,
    id: AssignmentId,
    info: &'a TypeInfo,
) -> Result<(), InternalError> {
    let name = ctx.member_name(id);

    match info.ty() {
        SemType::Enumerated(items) => emit_enum(writer, &name, items),
        SemType::Record(fields) | SemType::Set(fields) => emit_record(ctx, writer, &name, fields)?,
        SemType::Union(alternatives) => emit_union(writer, &name, alternatives),
        SemType::RecordOf(element) => emit_container(ctx, writer, &name, element, false)?,
        SemType::SetOf(element) => emit_container(ctx, writer, &name, element, true)?,
        SemType::Named(_) => emit_alias(ctx, writer, &name, info.ty())?,
        SemType::Boolean
        | SemType::Integer
        | SemType::Float
        | SemType::Charstring
        | SemType::Octetstring
        | SemType::Bitstring
        | SemType::Error => {
            tracing::trace!(definition = %ctx.display_name(id), "alias of a builtin type has no declaration");
        }
    }

    if ctx.config().error_behavior_tables()
        && let Some(encoding) = info.attributes().encoding()
    {
        if !writer.is_empty() {
            writer.blank();
        }
        emit_error_behavior(writer, &name, encoding, info);
    }

    Ok(())
}

fn emit_enum(writer: &mut JavaWriter, name: &str, items: &[EnumItem]) {
    writer.open(format!("public enum {name}"));
    for (index, item) in items.iter().enumerate() {
        let separator = if index + 1 == items.len() { ";" } else { "," };
        writer.line(format!("{}({}L){separator}", java_identifier(item.name()), item.number()));
    }
    writer.blank();
    writer.line("public final long number;");
    writer.blank();
    writer.open(format!("{name}(long number)"));
    writer.line("this.number = number;");
    writer.close();
    writer.close();
}

/// Emits `equals` and `hashCode` over the given Java field names
///
/// Fields of `unordered` classes are lists compared as multisets.
fn emit_equality(writer: &mut JavaWriter, name: &str, fields: &[String], unordered: bool) {
    writer.blank();
    writer.line("@Override");
    writer.open("public boolean equals(Object other)");
    writer.open("if (this == other)");
    writer.line("return true;");
    writer.close();
    writer.open(format!("if (!(other instanceof {name}))"));
    writer.line("return false;");
    writer.close();
    if fields.is_empty() {
        writer.line("return true;");
    } else {
        writer.line(format!("{name} that = ({name}) other;"));
        let comparisons = fields
            .iter()
            .map(|field| {
                if unordered {
                    format!("TspecRuntime.sameElements({field}, that.{field})")
                } else {
                    format!("java.util.Objects.equals({field}, that.{field})")
                }
            })
            .collect::<Vec<_>>()
            .join(" && ");
        writer.line(format!("return {comparisons};"));
    }
    writer.close();
    writer.blank();
    writer.line("@Override");
    writer.open("public int hashCode()");
    let hashed = if unordered {
        fields
            .iter()
            .map(|field| format!("TspecRuntime.unorderedHash({field})"))
            .collect::<Vec<_>>()
    } else {
        fields.to_vec()
    };
    writer.line(format!("return java.util.Objects.hash({});", hashed.join(", ")));
    writer.close();
}

/// Emits a constructor assigning each `(type, name)` parameter to the field
/// of the same name
fn emit_constructor(writer: &mut JavaWriter, name: &str, params: &[(String, String)]) {
    let list = params
        .iter()
        .map(|(ty, field)| format!("{ty} {field}"))
        .collect::<Vec<_>>()
        .join(", ");
    writer.open(format!("public {name}({list})"));
    for (_, field) in params {
        writer.line(format!("this.{field} = {field};"));
    }
    writer.close();
}

fn record_params<'a>(ctx: &Context<'a>, fields: &'a [FieldType]) -> Result<Vec<(String, String)>, InternalError> {
    fields
        .iter()
        .map(|field| Ok((ctx.java_type(field.ty())?, java_identifier(field.name()))))
        .collect()
}

fn emit_record<'a>(
    ctx: &Context<'a>,
    writer: &mut JavaWriter,
    name: &str,
    fields: &'a [FieldType],
) -> Result<(), InternalError> {
    let params = record_params(ctx, fields)?;
    let field_names: Vec<_> = params.iter().map(|(_, field)| field.clone()).collect();

    writer.open(format!("public static class {name}"));
    for (ty, field) in &params {
        writer.line(format!("public final {ty} {field};"));
    }
    if !params.is_empty() {
        writer.blank();
    }
    emit_constructor(writer, name, &params);
    emit_equality(writer, name, &field_names, false);

    let template_params = fields
        .iter()
        .zip(&params)
        .map(|(field, (_, java_name))| Ok((ctx.template_type(field.ty())?, java_name.clone())))
        .collect::<Result<Vec<_>, InternalError>>()?;

    writer.blank();
    writer.open(format!("public static class Template implements TspecRuntime.Template<{name}>"));
    for (ty, field) in &template_params {
        writer.line(format!("private final {ty} {field};"));
    }
    if !template_params.is_empty() {
        writer.blank();
    }
    emit_constructor(writer, "Template", &template_params);
    writer.blank();
    writer.line("@Override");
    writer.open(format!("public boolean match({name} value)"));
    let conditions: Vec<_> = std::iter::once("value != null".to_string())
        .chain(field_names.iter().map(|field| format!("{field}.match(value.{field})")))
        .collect();
    writer.line(format!("return {};", conditions.join(" && ")));
    writer.close();
    writer.close();

    writer.close();
    Ok(())
}

fn emit_union(writer: &mut JavaWriter, name: &str, alternatives: &[FieldType]) {
    let params = [
        ("String".to_string(), "alternative".to_string()),
        ("Object".to_string(), "value".to_string()),
    ];

    writer.open(format!("public static class {name}"));
    writer.line("public final String alternative;");
    writer.line("public final Object value;");
    writer.blank();
    emit_constructor(writer, name, &params);
    emit_equality(writer, name, &["alternative".to_string(), "value".to_string()], false);

    let names = alternatives
        .iter()
        .map(|alternative| string_literal(alternative.name()))
        .collect::<Vec<_>>()
        .join(", ");
    writer.blank();
    writer.line(format!("public static final java.util.List<String> ALTERNATIVES = java.util.List.of({names});"));

    writer.blank();
    writer.open(format!("public static class Template implements TspecRuntime.Template<{name}>"));
    writer.line("private final String alternative;");
    writer.line("private final TspecRuntime.Template<?> template;");
    writer.blank();
    emit_constructor(
        writer,
        "Template",
        &[
            ("String".to_string(), "alternative".to_string()),
            ("TspecRuntime.Template<?>".to_string(), "template".to_string()),
        ],
    );
    writer.blank();
    writer.line("@Override");
    writer.line("@SuppressWarnings(\"unchecked\")");
    writer.open(format!("public boolean match({name} value)"));
    writer.line("return value != null && alternative.equals(value.alternative)");
    writer.line("    && ((TspecRuntime.Template<Object>) template).match(value.value);");
    writer.close();
    writer.close();

    writer.close();
}

fn emit_container<'a>(
    ctx: &Context<'a>,
    writer: &mut JavaWriter,
    name: &str,
    element: &'a SemType,
    unordered: bool,
) -> Result<(), InternalError> {
    let list_type = format!("java.util.List<{}>", ctx.java_type(element)?);

    writer.open(format!("public static class {name}"));
    writer.line(format!("public final {list_type} elements;"));
    writer.blank();
    emit_constructor(writer, name, &[(list_type.clone(), "elements".to_string())]);
    emit_equality(writer, name, &["elements".to_string()], unordered);

    writer.blank();
    writer.open(format!("public static class Template implements TspecRuntime.Template<{name}>"));
    writer.line(format!("private final TspecRuntime.Template<{list_type}> elements;"));
    writer.blank();
    emit_constructor(
        writer,
        "Template",
        &[(format!("TspecRuntime.Template<{list_type}>"), "elements".to_string())],
    );
    writer.blank();
    writer.line("@Override");
    writer.open(format!("public boolean match({name} value)"));
    writer.line("return value != null && elements.match(value.elements);");
    writer.close();
    writer.close();

    writer.close();
    Ok(())
}

/// Emits an alias of a generated class as a subclass forwarding its
/// constructor
fn emit_alias<'a>(
    ctx: &Context<'a>,
    writer: &mut JavaWriter,
    name: &str,
    target: &'a SemType,
) -> Result<(), InternalError> {
    let Repr::Class { id, structure } = ctx.repr(target)? else {
        return Ok(());
    };

    let params = match structure {
        SemType::Record(fields) | SemType::Set(fields) => record_params(ctx, fields)?,
        SemType::Union(_) => vec![
            ("String".to_string(), "alternative".to_string()),
            ("Object".to_string(), "value".to_string()),
        ],
        SemType::RecordOf(element) | SemType::SetOf(element) => {
            vec![(format!("java.util.List<{}>", ctx.java_type(element)?), "elements".to_string())]
        }
        SemType::Enumerated(_)
        | SemType::Boolean
        | SemType::Integer
        | SemType::Float
        | SemType::Charstring
        | SemType::Octetstring
        | SemType::Bitstring
        | SemType::Named(_)
        | SemType::Error => return Ok(()),
    };

    let list = params
        .iter()
        .map(|(ty, field)| format!("{ty} {field}"))
        .collect::<Vec<_>>()
        .join(", ");
    let args = params
        .iter()
        .map(|(_, field)| field.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    writer.open(format!("public static class {name} extends {}", ctx.qualified(id)));
    writer.open(format!("public {name}({list})"));
    writer.line(format!("super({args});"));
    writer.close();
    writer.close();
    Ok(())
}

/// Emits the effective handling of every error type for an encoded type
fn emit_error_behavior(writer: &mut JavaWriter, name: &str, encoding: &str, info: &TypeInfo) {
    writer.line(format!("/** Error behaviour of {name}, encoded with {encoding}. */"));
    writer.line(format!(
        "public static final java.util.Map<String, TspecRuntime.Handling> {name}_errorBehavior = java.util.Map.ofEntries("
    ));
    let entries: Vec<_> = info.attributes().error_behavior().entries().collect();
    for (index, (error_type, handling)) in entries.iter().enumerate() {
        let separator = if index + 1 == entries.len() { "" } else { "," };
        writer.line(format!(
            "    java.util.Map.entry({}, TspecRuntime.Handling.{}){separator}",
            string_literal(error_type.key()),
            handling.key()
        ));
    }
    writer.line(");");
}
