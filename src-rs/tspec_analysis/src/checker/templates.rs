//! Checking of templates
//!
//! Templates are checked against the type they match. Every part of a
//! checked template is known, so template definitions and `match()` over
//! constants can be folded.

use std::cmp::Ordering;

use indexmap::IndexMap;
use tspec_ast::{
    self as ast, DefinitionKind, Template, Value,
    template::{FieldTemplateNode, TemplateNode},
    value::ValueNode,
};
use tspec_shared::span::Span;

use super::{Checker, Frame, types, values};
use crate::{
    error::SemanticError,
    eval::ConstValue,
    ids::AssignmentId,
    info::AssignmentInfo,
    matching::TemplateValue,
    types::{FieldType, SemType},
};

/// Checks a template against the type it matches
///
/// `may_omit` is set for the templates of optional fields, which are the
/// only places `*` and `omit` may appear.
pub(super) fn check_template(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    template: &TemplateNode,
    expected: &SemType,
    may_omit: bool,
) -> Option<TemplateValue> {
    let span = template.span();
    let structure = types::structure(checker, frame, expected, span);
    if structure.is_error() {
        return None;
    }

    match &**template {
        Template::Any => Some(TemplateValue::Any),
        Template::AnyOrOmit => omittable(frame, may_omit, template, TemplateValue::AnyOrOmit),
        Template::Omit => omittable(frame, may_omit, template, TemplateValue::Omit),
        Template::Specific(value) => check_specific(checker, frame, value, expected, &structure),
        Template::Fields(fields) => {
            check_fields(checker, frame, template, fields, expected, &structure)
        }
        Template::List(elements) => {
            check_elements(checker, frame, template, elements, expected, &structure)
        }
        Template::ValueList(templates) => {
            check_each(checker, frame, templates, expected, may_omit).map(TemplateValue::ValueList)
        }
        Template::Complement(templates) => {
            check_each(checker, frame, templates, expected, may_omit).map(TemplateValue::Complement)
        }
        Template::Range { lower, upper } => {
            check_range(checker, frame, template, lower, upper, expected, &structure)
        }
    }
}

fn omittable(
    frame: &mut Frame,
    may_omit: bool,
    template: &TemplateNode,
    checked: TemplateValue,
) -> Option<TemplateValue> {
    if may_omit {
        Some(checked)
    } else {
        frame.report(SemanticError::OmitNotAllowed {
            mechanism: template.mechanism_name(),
            span: template.span(),
        });
        None
    }
}

fn invalid_mechanism(
    checker: &Checker<'_>,
    frame: &mut Frame,
    template: &TemplateNode,
    expected: &SemType,
) -> Option<TemplateValue> {
    frame.report(SemanticError::InvalidMatchingMechanism {
        mechanism: template.mechanism_name(),
        ty: checker.describe(expected),
        span: template.span(),
    });
    None
}

fn check_each(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    templates: &[TemplateNode],
    expected: &SemType,
    may_omit: bool,
) -> Option<Vec<TemplateValue>> {
    let checked: Vec<_> = templates
        .iter()
        .map(|template| check_template(checker, frame, template, expected, may_omit))
        .collect();
    checked.into_iter().collect()
}

fn check_specific(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    value: &ValueNode,
    expected: &SemType,
    structure: &SemType,
) -> Option<TemplateValue> {
    if let Value::Reference(reference) = &**value {
        if let Some(id) = template_reference(checker, frame, reference, structure) {
            return referenced_template(checker, frame, id, value.span(), expected);
        }
    }

    let expr = values::check_value(checker, frame, value, expected)?;
    if let Some(constant) = expr.as_constant() {
        Some(TemplateValue::Specific(constant.clone()))
    } else {
        frame.report(SemanticError::NotConstant { span: value.span() });
        None
    }
}

/// Returns the template definition a specific value names, if it names one
fn template_reference(
    checker: &Checker<'_>,
    frame: &Frame,
    reference: &ast::Reference,
    structure: &SemType,
) -> Option<AssignmentId> {
    if checker.lookup_local(frame, reference).is_some() {
        return None;
    }

    if let SemType::Enumerated(items) = structure {
        let name = reference.name().canonical();
        if reference.module().is_none() && items.iter().any(|item| item.name() == name) {
            return None;
        }
    }

    let id = checker.lookup_assignment(frame, reference).ok()?;
    matches!(
        checker.sources().definition(id).kind(),
        DefinitionKind::Template { .. }
    )
    .then_some(id)
}

fn referenced_template(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    id: AssignmentId,
    span: Span,
    expected: &SemType,
) -> Option<TemplateValue> {
    if !checker.force(frame, id, span) {
        return None;
    }

    let Some(AssignmentInfo::Template { ty, template }) = checker.info(id) else {
        return None;
    };
    let (ty, template) = (ty.clone(), template.clone());

    if !types::compatible(checker, frame, expected, &ty, span) {
        frame.report(SemanticError::TypeMismatch {
            expected: checker.describe(expected),
            found: checker.describe(&ty),
            span,
        });
        return None;
    }

    template
}

fn check_fields(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    template: &TemplateNode,
    fields: &[FieldTemplateNode],
    expected: &SemType,
    structure: &SemType,
) -> Option<TemplateValue> {
    match structure {
        SemType::Record(definitions) | SemType::Set(definitions) => {
            check_record_fields(checker, frame, template.span(), fields, expected, definitions)
        }
        SemType::Union(alternatives) => {
            check_union_fields(checker, frame, template.span(), fields, expected, alternatives)
        }
        SemType::RecordOf(_) | SemType::SetOf(_) if fields.is_empty() => {
            Some(TemplateValue::List {
                elements: vec![],
                unordered: matches!(structure, SemType::SetOf(_)),
            })
        }
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
        | SemType::Error => invalid_mechanism(checker, frame, template, expected),
    }
}

fn check_record_fields(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    span: Span,
    fields: &[FieldTemplateNode],
    expected: &SemType,
    definitions: &[FieldType],
) -> Option<TemplateValue> {
    let type_name = checker.describe(expected);
    let mut given: IndexMap<String, &FieldTemplateNode> = IndexMap::new();
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

        let template = check_template(
            checker,
            frame,
            field.template(),
            definition.ty(),
            definition.is_optional(),
        );
        match template {
            Some(template) => checked.push((definition.name().to_string(), template)),
            None => valid = false,
        }
    }

    valid.then_some(TemplateValue::Fields(checked))
}

fn check_union_fields(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    span: Span,
    fields: &[FieldTemplateNode],
    expected: &SemType,
    alternatives: &[FieldType],
) -> Option<TemplateValue> {
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

    let template = check_template(checker, frame, field.template(), alternative.ty(), false)?;
    Some(TemplateValue::Union {
        alternative: name,
        template: Box::new(template),
    })
}

fn check_elements(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    template: &TemplateNode,
    elements: &[TemplateNode],
    expected: &SemType,
    structure: &SemType,
) -> Option<TemplateValue> {
    match structure {
        SemType::RecordOf(element) | SemType::SetOf(element) => {
            let elements = check_each(checker, frame, elements, element, false)?;
            Some(TemplateValue::List {
                elements,
                unordered: matches!(structure, SemType::SetOf(_)),
            })
        }
        SemType::Record(definitions) | SemType::Set(definitions) => {
            if elements.len() != definitions.len() {
                frame.report(SemanticError::WrongElementCount {
                    expected: definitions.len(),
                    found: elements.len(),
                    span: template.span(),
                });
                return None;
            }

            let checked: Vec<_> = elements
                .iter()
                .zip(definitions)
                .map(|(element, definition)| {
                    check_template(checker, frame, element, definition.ty(), definition.is_optional())
                        .map(|template| (definition.name().to_string(), template))
                })
                .collect();
            let checked: Option<Vec<_>> = checked.into_iter().collect();
            checked.map(TemplateValue::Fields)
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
        | SemType::Error => invalid_mechanism(checker, frame, template, expected),
    }
}

fn check_range(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    template: &TemplateNode,
    lower: &ValueNode,
    upper: &ValueNode,
    expected: &SemType,
    structure: &SemType,
) -> Option<TemplateValue> {
    if !structure.is_numeric() {
        return invalid_mechanism(checker, frame, template, expected);
    }

    let lower = bound(checker, frame, lower, expected);
    let upper = bound(checker, frame, upper, expected);
    let (lower, upper) = (lower?, upper?);

    if lower.ordering(&upper) == Some(Ordering::Greater) {
        frame.report(SemanticError::InvalidRange {
            span: template.span(),
        });
        return None;
    }

    Some(TemplateValue::Range { lower, upper })
}

fn bound(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    value: &ValueNode,
    expected: &SemType,
) -> Option<ConstValue> {
    let expr = values::check_value(checker, frame, value, expected)?;
    let constant = expr.as_constant().cloned();
    if constant.is_none() {
        frame.report(SemanticError::NotConstant { span: value.span() });
    }
    constant
}
