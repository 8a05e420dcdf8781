//! Dispatch on the kind of a definition

use tspec_ast::{DefinitionKind, definition::DefinitionNode};

use super::{
    Checker, Frame, behaviour, templates,
    types::{TypePosition, lower_type},
    values::check_value,
};
use crate::{
    attribute::check_attributes,
    error::SemanticError,
    info::{AssignmentInfo, TypeInfo},
};

/// Checks one module level definition
pub(super) fn check_definition(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    definition: &DefinitionNode,
) -> AssignmentInfo {
    let (attributes, warnings) = check_attributes(definition.attributes());
    for warning in warnings {
        frame.report(warning);
    }

    match definition.kind() {
        DefinitionKind::Type(ty) => AssignmentInfo::Type(TypeInfo {
            ty: lower_type(checker, frame, ty, TypePosition::Definition),
            attributes,
        }),
        DefinitionKind::Const { ty, value } => {
            let ty = lower_type(checker, frame, ty, TypePosition::Nested);
            let folded = check_value(checker, frame, value, &ty).and_then(|expr| {
                let constant = expr.as_constant().cloned();
                if constant.is_none() {
                    frame.report(SemanticError::NotConstant { span: value.span() });
                }
                constant
            });
            AssignmentInfo::Constant { ty, value: folded }
        }
        DefinitionKind::Template { ty, body } => {
            let ty = lower_type(checker, frame, ty, TypePosition::Nested);
            let template = templates::check_template(checker, frame, body, &ty, false);
            AssignmentInfo::Template { ty, template }
        }
        DefinitionKind::Behaviour(body) => {
            behaviour::check_behaviour(checker, frame, body, definition.name().span())
        }
        DefinitionKind::Component { members } => behaviour::check_component(checker, frame, members),
    }
}
