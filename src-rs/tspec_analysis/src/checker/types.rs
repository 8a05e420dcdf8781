//! Lowering of type expressions

use indexmap::{IndexMap, IndexSet};
use tspec_ast::{
    self as ast, DefinitionKind,
    reference::ReferenceNode,
    types::{EnumItemNode, FieldNode, TypeNode},
};
use tspec_shared::span::Span;

use super::{Checker, Frame, describe_definition};
use crate::{
    error::SemanticError,
    info::AssignmentInfo,
    types::{EnumItem, FieldType, SemType},
};

/// Where a type expression appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TypePosition {
    /// The body of a type definition, where a reference makes an alias
    Definition,
    /// Inside another type or a declaration
    Nested,
}

/// Lowers a type expression
///
/// An alias target must be known to detect alias cycles, so references in
/// [`TypePosition::Definition`] are checked on the spot. Other references
/// are only recorded, which allows recursive types.
pub(super) fn lower_type(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    ty: &TypeNode,
    position: TypePosition,
) -> SemType {
    match &**ty {
        ast::Type::Boolean => SemType::Boolean,
        ast::Type::Integer => SemType::Integer,
        ast::Type::Float => SemType::Float,
        ast::Type::Charstring => SemType::Charstring,
        ast::Type::Octetstring => SemType::Octetstring,
        ast::Type::Bitstring => SemType::Bitstring,
        ast::Type::Enumerated(items) => {
            if reject_nested(frame, ty, position) {
                return SemType::Error;
            }
            SemType::Enumerated(lower_enumerated(frame, items))
        }
        ast::Type::Record(fields) => {
            if reject_nested(frame, ty, position) {
                return SemType::Error;
            }
            SemType::Record(lower_fields(checker, frame, fields, false))
        }
        ast::Type::Set(fields) => {
            if reject_nested(frame, ty, position) {
                return SemType::Error;
            }
            SemType::Set(lower_fields(checker, frame, fields, false))
        }
        ast::Type::Union(alternatives) => {
            if reject_nested(frame, ty, position) {
                return SemType::Error;
            }
            SemType::Union(lower_fields(checker, frame, alternatives, true))
        }
        ast::Type::RecordOf(element) => SemType::RecordOf(Box::new(lower_type(
            checker,
            frame,
            element,
            TypePosition::Nested,
        ))),
        ast::Type::SetOf(element) => SemType::SetOf(Box::new(lower_type(
            checker,
            frame,
            element,
            TypePosition::Nested,
        ))),
        ast::Type::Reference(reference) => lower_reference(checker, frame, reference, position),
    }
}

fn reject_nested(frame: &mut Frame, ty: &TypeNode, position: TypePosition) -> bool {
    if position == TypePosition::Nested {
        frame.report(SemanticError::NestedStructuredType {
            kind: ty.kind_name(),
            span: ty.span(),
        });
        true
    } else {
        false
    }
}

/// Lowers enumeration items, numbering the ones without a number
///
/// Items without a number take the smallest non-negative number that no
/// item uses, in order of declaration.
fn lower_enumerated(frame: &mut Frame, items: &[EnumItemNode]) -> Vec<EnumItem> {
    let mut names: IndexMap<String, Span> = IndexMap::new();
    let mut numbers: IndexMap<i64, Span> = IndexMap::new();
    let mut accepted = vec![];

    for item in items {
        let name = item.name().canonical();
        if let Some(first_span) = names.get(&name) {
            frame.report(SemanticError::DuplicateEnumItem {
                name: item.name().to_string(),
                first_span: *first_span,
                duplicate_span: item.name().span(),
            });
            continue;
        }
        names.insert(name.clone(), item.name().span());

        if let Some(number) = item.number() {
            match numbers.get(&**number) {
                Some(first_span) => frame.report(SemanticError::DuplicateEnumNumber {
                    number: **number,
                    first_span: *first_span,
                    duplicate_span: number.span(),
                }),
                None => {
                    numbers.insert(**number, number.span());
                }
            }
        }

        accepted.push((name, item.number().map(|number| **number)));
    }

    let mut used: IndexSet<i64> = numbers.keys().copied().collect();
    let mut next = 0;

    accepted
        .into_iter()
        .map(|(name, number)| {
            let number = number.unwrap_or_else(|| {
                while used.contains(&next) {
                    next += 1;
                }
                used.insert(next);
                next
            });
            EnumItem::new(name, number)
        })
        .collect()
}

fn lower_fields(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    fields: &[FieldNode],
    is_union: bool,
) -> Vec<FieldType> {
    let mut seen: IndexMap<String, Span> = IndexMap::new();
    let mut lowered = vec![];

    for field in fields {
        let name = field.name().canonical();
        if let Some(first_span) = seen.get(&name) {
            frame.report(SemanticError::DuplicateField {
                name: field.name().to_string(),
                first_span: *first_span,
                duplicate_span: field.name().span(),
            });
            continue;
        }
        seen.insert(name.clone(), field.name().span());

        if is_union && field.is_optional() {
            frame.report(SemanticError::OptionalAlternative {
                name: field.name().to_string(),
                span: field.name().span(),
            });
        }

        let ty = lower_type(checker, frame, field.ty(), TypePosition::Nested);
        lowered.push(FieldType::new(name, ty, field.is_optional() && !is_union));
    }

    lowered
}

fn lower_reference(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    reference: &ReferenceNode,
    position: TypePosition,
) -> SemType {
    let Some(id) = checker.resolve_assignment(frame, reference) else {
        return SemType::Error;
    };

    let kind = checker.sources().definition(id).kind();
    if !matches!(kind, DefinitionKind::Type(_)) {
        checker.report_wrong_kind(frame, reference, "a type", describe_definition(kind));
        return SemType::Error;
    }

    match position {
        TypePosition::Definition => {
            if !checker.force(frame, id, reference.span()) {
                return SemType::Error;
            }
        }
        TypePosition::Nested => checker.depend_lazily(id),
    }

    SemType::Named(id)
}

/// Follows type references to the structure they name
///
/// Returns [`SemType::Error`] if a definition on the way is erroneous.
pub(super) fn structure(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    ty: &SemType,
    span: Span,
) -> SemType {
    let mut current = ty.clone();
    let mut visited = IndexSet::new();

    while let SemType::Named(id) = current {
        if !visited.insert(id) || !checker.force(frame, id, span) {
            return SemType::Error;
        }

        current = match checker.info(id) {
            Some(AssignmentInfo::Type(info)) => info.ty().clone(),
            Some(_) | None => return SemType::Error,
        };
    }

    current
}

/// Reduces a type to the form used for compatibility
///
/// Aliases of builtin types become the builtin type. Every structured type
/// stays the named type that declares it, so two record types with the same
/// fields are still different types.
pub(super) fn canonical(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    ty: &SemType,
    span: Span,
) -> SemType {
    match ty {
        SemType::Named(id) => {
            let mut current = *id;
            let mut visited = IndexSet::new();
            loop {
                if !visited.insert(current) || !checker.force(frame, current, span) {
                    return SemType::Error;
                }
                let target = match checker.info(current) {
                    Some(AssignmentInfo::Type(info)) => info.ty().clone(),
                    Some(_) | None => return SemType::Error,
                };
                match target {
                    SemType::Named(next) => current = next,
                    SemType::RecordOf(_) | SemType::SetOf(_) => {
                        return canonical(checker, frame, &target, span);
                    }
                    SemType::Boolean
                    | SemType::Integer
                    | SemType::Float
                    | SemType::Charstring
                    | SemType::Octetstring
                    | SemType::Bitstring
                    | SemType::Error => return target,
                    SemType::Enumerated(_)
                    | SemType::Record(_)
                    | SemType::Set(_)
                    | SemType::Union(_) => return SemType::Named(current),
                }
            }
        }
        SemType::RecordOf(element) => {
            SemType::RecordOf(Box::new(canonical(checker, frame, element, span)))
        }
        SemType::SetOf(element) => SemType::SetOf(Box::new(canonical(checker, frame, element, span))),
        SemType::Boolean
        | SemType::Integer
        | SemType::Float
        | SemType::Charstring
        | SemType::Octetstring
        | SemType::Bitstring
        | SemType::Enumerated(_)
        | SemType::Record(_)
        | SemType::Set(_)
        | SemType::Union(_)
        | SemType::Error => ty.clone(),
    }
}

/// Returns whether a value of type `found` may be used where `expected` is
/// required
///
/// Erroneous types are compatible with everything so that one mistake is
/// reported once.
pub(super) fn compatible(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    expected: &SemType,
    found: &SemType,
    span: Span,
) -> bool {
    let expected = canonical(checker, frame, expected, span);
    let found = canonical(checker, frame, found, span);
    expected.is_error() || found.is_error() || expected == found
}
