//! Checking of functions, testcases, altsteps and components

use std::sync::Arc;

use indexmap::IndexMap;
use tspec_ast::{
    self as ast, BehaviourKind, DefinitionKind, LocalKind, Statement,
    reference::ReferenceNode,
    statement::{LocalDefinitionNode, StatementNode},
    value::ValueNode,
};
use tspec_shared::span::Span;

use super::{
    BehaviourContext, Checker, Frame, Resolved, describe_definition,
    types::{TypePosition, lower_type},
    values::{check_call, check_value, infer_value},
};
use crate::{
    body::{Stmt, Target},
    error::SemanticError,
    ids::AssignmentId,
    info::{AssignmentInfo, BehaviourInfo, ComponentInfo, MemberInfo, Signature},
    scope::{LocalSymbol, LocalSymbolKind, Scope},
    types::SemType,
};

/// Returns the signature of a behaviour without checking its body
///
/// Calls only need the signature, and a function may call itself, so the
/// signature is lowered again when no current result exists. Problems in
/// the signature are reported when the behaviour itself is checked.
pub(super) fn signature_of(checker: &mut Checker<'_>, id: AssignmentId) -> Option<Signature> {
    if checker.is_current(id) {
        if let Some(AssignmentInfo::Behaviour(info)) = checker.info(id) {
            return Some(info.signature().clone());
        }
    }

    let source = checker.sources().module(id.module());
    let DefinitionKind::Behaviour(behaviour) = source.definition(id.index()).kind() else {
        return None;
    };

    let mut frame = Frame::new(id.module(), Arc::clone(source.file()));
    Some(lower_signature(checker, &mut frame, behaviour))
}

fn lower_signature(checker: &mut Checker<'_>, frame: &mut Frame, behaviour: &ast::Behaviour) -> Signature {
    let mut seen: IndexMap<String, Span> = IndexMap::new();
    let mut params = vec![];

    for param in behaviour.params() {
        let name = param.name().canonical();
        if let Some(first_span) = seen.get(&name) {
            frame.report(SemanticError::DuplicateDefinition {
                name: param.name().to_string(),
                first_span: *first_span,
                duplicate_span: param.name().span(),
            });
        } else {
            seen.insert(name.clone(), param.name().span());
        }

        let ty = lower_type(checker, frame, param.ty(), TypePosition::Nested);
        params.push((name, ty));
    }

    let return_type = behaviour.return_type().and_then(|ty| {
        if behaviour.kind() == BehaviourKind::Function {
            Some(lower_type(checker, frame, ty, TypePosition::Nested))
        } else {
            frame.report(SemanticError::ReturnTypeNotAllowed {
                keyword: behaviour.kind().keyword(),
                span: ty.span(),
            });
            None
        }
    });

    let runs_on = behaviour
        .runs_on()
        .and_then(|component| resolve_component(checker, frame, component));

    Signature {
        params,
        return_type,
        runs_on,
    }
}

fn resolve_component(
    checker: &Checker<'_>,
    frame: &mut Frame,
    reference: &ReferenceNode,
) -> Option<AssignmentId> {
    let id = checker.resolve_assignment(frame, reference)?;
    let kind = checker.sources().definition(id).kind();

    if matches!(kind, DefinitionKind::Component { .. }) {
        Some(id)
    } else {
        checker.report_wrong_kind(frame, reference, "a component", describe_definition(kind));
        None
    }
}

/// Checks a behaviour definition and lowers its body
pub(super) fn check_behaviour(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    behaviour: &ast::Behaviour,
    name_span: Span,
) -> AssignmentInfo {
    let signature = lower_signature(checker, frame, behaviour);

    let component_scope = signature.runs_on.and_then(|component| {
        let span = behaviour.runs_on().map_or(name_span, ReferenceNode::span);
        component_scope(checker, frame, component, span)
    });
    let component_scope = component_scope.map(|scope| frame.scopes.link(scope, None));

    let mut params = Scope::new();
    for (param, (name, ty)) in behaviour.params().iter().zip(&signature.params) {
        let symbol = LocalSymbol::new(name.clone(), LocalSymbolKind::Param, ty.clone(), param.name().span());
        // duplicates were reported with the signature
        let _ = params.insert(symbol);
    }
    frame.scope = Some(frame.scopes.link(params, component_scope));
    frame.behaviour = Some(BehaviourContext {
        return_type: signature.return_type.clone(),
    });
    frame.runs_on = signature.runs_on;

    let body = check_statements(checker, frame, behaviour.body());

    if signature.return_type.is_some() && !always_returns(&body) {
        frame.report(SemanticError::MissingReturnValue { span: name_span });
    }

    AssignmentInfo::Behaviour(BehaviourInfo {
        kind: behaviour.kind(),
        signature,
        body,
    })
}

fn component_scope(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    component: AssignmentId,
    span: Span,
) -> Option<Scope> {
    if !checker.force(frame, component, span) {
        return None;
    }

    let Some(AssignmentInfo::Component(info)) = checker.info(component) else {
        return None;
    };

    let mut scope = Scope::new();
    for member in info.members() {
        let (kind, value) = match member.kind() {
            LocalKind::Var => (LocalSymbolKind::ComponentVar, None),
            LocalKind::Const => (LocalSymbolKind::ComponentConst, member.initial().cloned()),
        };
        let symbol = LocalSymbol::new(member.name().to_string(), kind, member.ty().clone(), span)
            .with_value(value);
        // member names are unique once the component is checked
        let _ = scope.insert(symbol);
    }

    Some(scope)
}

/// Returns whether every path through the statements ends in a return
fn always_returns(statements: &[Stmt]) -> bool {
    statements.iter().any(|statement| match statement {
        Stmt::Return(_) => true,
        Stmt::Block(statements) => always_returns(statements),
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => always_returns(then_branch) && always_returns(else_branch),
        Stmt::Local { .. } | Stmt::Assign { .. } | Stmt::Expr(_) | Stmt::SetVerdict(_) => false,
    })
}

fn check_statements(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    statements: &[StatementNode],
) -> Vec<Stmt> {
    statements
        .iter()
        .filter_map(|statement| check_statement(checker, frame, statement))
        .collect()
}

/// Checks statements in a block scope of their own
fn check_block(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    statements: &[StatementNode],
) -> Vec<Stmt> {
    let block = frame.scopes.link(Scope::new(), frame.scope);
    let outer = frame.scope.replace(block);
    let statements = check_statements(checker, frame, statements);
    frame.scope = outer;
    statements
}

fn check_statement(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    statement: &StatementNode,
) -> Option<Stmt> {
    match &**statement {
        Statement::Local(local) => check_local(checker, frame, local),
        Statement::Assign { target, value } => check_assign(checker, frame, target, value),
        Statement::Expr(value) => {
            if let ast::Value::Call { function, args } = &**value {
                let (call, _) = check_call(checker, frame, value.span(), function, args)?;
                Some(Stmt::Expr(call))
            } else {
                let (expr, _) = infer_value(checker, frame, value)?;
                Some(Stmt::Expr(expr))
            }
        }
        Statement::Return(value) => check_return(checker, frame, statement.span(), value.as_ref()),
        Statement::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let condition = check_value(checker, frame, condition, &SemType::Boolean);
            let then_branch = check_block(checker, frame, then_branch);
            let else_branch = check_block(checker, frame, else_branch);
            Some(Stmt::If {
                condition: condition?,
                then_branch,
                else_branch,
            })
        }
        Statement::Block(statements) => Some(Stmt::Block(check_block(checker, frame, statements))),
        Statement::SetVerdict(verdict) => Some(Stmt::SetVerdict(**verdict)),
    }
}

fn declare(frame: &mut Frame, symbol: LocalSymbol) {
    let Some(scope) = frame.scope else {
        return;
    };

    let duplicate_span = symbol.span();
    let name = symbol.name().to_string();
    let first_span = frame
        .scopes
        .scope_mut(scope)
        .insert(symbol)
        .err()
        .map(LocalSymbol::span);

    if let Some(first_span) = first_span {
        frame.report(SemanticError::DuplicateDefinition {
            name,
            first_span,
            duplicate_span,
        });
    }
}

fn check_local(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    local: &LocalDefinitionNode,
) -> Option<Stmt> {
    let ty = lower_type(checker, frame, local.ty(), TypePosition::Nested);
    let initial = local
        .initial()
        .map(|value| check_value(checker, frame, value, &ty));

    let kind = local.kind();
    let symbol_kind = match kind {
        LocalKind::Var => LocalSymbolKind::Var,
        LocalKind::Const => LocalSymbolKind::Const,
    };
    let value = match (kind, &initial) {
        (LocalKind::Const, Some(Some(expr))) => expr.as_constant().cloned(),
        (LocalKind::Const, None) => {
            frame.report(SemanticError::NotConstant {
                span: local.name().span(),
            });
            None
        }
        (LocalKind::Const, Some(None)) | (LocalKind::Var, _) => None,
    };

    let name = local.name().canonical();
    let symbol = LocalSymbol::new(name.clone(), symbol_kind, ty.clone(), local.name().span())
        .with_value(value);
    declare(frame, symbol);

    let initial = match initial {
        Some(Some(expr)) => Some(expr),
        Some(None) => return None,
        None => None,
    };

    Some(Stmt::Local {
        kind,
        name,
        ty,
        initial,
    })
}

fn check_assign(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    target: &ReferenceNode,
    value: &ValueNode,
) -> Option<Stmt> {
    let symbol = match checker.resolve_name(frame, target)? {
        Resolved::Local(symbol) if symbol.is_assignable() => symbol,
        Resolved::Local(_) | Resolved::Assignment(_) => {
            frame.report(SemanticError::NotAssignable {
                name: target.name().to_string(),
                span: target.span(),
            });
            return None;
        }
    };

    let value = check_value(checker, frame, value, symbol.ty())?;
    let target = if symbol.is_component_member() {
        Target::ComponentMember(symbol.name)
    } else {
        Target::Local(symbol.name)
    };

    Some(Stmt::Assign { target, value })
}

fn check_return(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    span: Span,
    value: Option<&ValueNode>,
) -> Option<Stmt> {
    let context = frame.behaviour.clone()?;

    match (context.return_type, value) {
        (Some(ty), Some(value)) => {
            let value = check_value(checker, frame, value, &ty)?;
            Some(Stmt::Return(Some(value)))
        }
        (Some(_), None) => {
            frame.report(SemanticError::MissingReturnValue { span });
            None
        }
        (None, Some(value)) => {
            frame.report(SemanticError::UnexpectedReturnValue { span: value.span() });
            None
        }
        (None, None) => Some(Stmt::Return(None)),
    }
}

/// Checks the members of a component definition
///
/// Initial values are evaluated once when a component is created, so they
/// must be constant.
pub(super) fn check_component(
    checker: &mut Checker<'_>,
    frame: &mut Frame,
    members: &[LocalDefinitionNode],
) -> AssignmentInfo {
    let mut seen: IndexMap<String, Span> = IndexMap::new();
    let mut checked = vec![];

    for member in members {
        let name = member.name().canonical();
        if let Some(first_span) = seen.get(&name) {
            frame.report(SemanticError::DuplicateDefinition {
                name: member.name().to_string(),
                first_span: *first_span,
                duplicate_span: member.name().span(),
            });
            continue;
        }
        seen.insert(name.clone(), member.name().span());

        let ty = lower_type(checker, frame, member.ty(), TypePosition::Nested);
        let initial = match member.initial() {
            Some(value) => check_value(checker, frame, value, &ty).and_then(|expr| {
                let constant = expr.as_constant().cloned();
                if constant.is_none() {
                    frame.report(SemanticError::NotConstant { span: value.span() });
                }
                constant
            }),
            None => {
                if member.kind() == LocalKind::Const {
                    frame.report(SemanticError::NotConstant {
                        span: member.name().span(),
                    });
                }
                None
            }
        };

        checked.push(MemberInfo {
            name,
            kind: member.kind(),
            ty,
            initial,
        });
    }

    AssignmentInfo::Component(ComponentInfo { members: checked })
}
