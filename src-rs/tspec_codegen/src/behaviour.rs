//! Methods generated for functions, testcases and altsteps, and classes for
//! components

use tspec_analysis::{
    AssignmentId, InternalError,
    body::{Stmt, Target},
    info::{BehaviourInfo, ComponentInfo},
};
use tspec_ast::{BehaviourKind, LocalKind, Verdict};

use crate::{
    context::{COMPONENT_PARAM, Context, java_identifier},
    values::{expr, value_expr},
    writer::JavaWriter,
};

/// Emits a behaviour as a static method
///
/// A behaviour that runs on a component takes the component as its first
/// parameter. Testcases return their final verdict.
pub fn emit_behaviour<'a>(
    ctx: &Context<'a>,
    writer: &mut JavaWriter,
    id: AssignmentId,
    info: &'a BehaviourInfo,
) -> Result<(), InternalError> {
    let signature = info.signature();
    let testcase = info.kind() == BehaviourKind::Testcase;

    let return_type = match (testcase, signature.return_type()) {
        (true, _) => "TspecRuntime.Verdict".to_string(),
        (false, Some(ty)) => ctx.java_type(ty)?,
        (false, None) => "void".to_string(),
    };

    let mut params = vec![];
    if let Some(component) = signature.runs_on() {
        params.push(format!("{} {COMPONENT_PARAM}", ctx.qualified(component)));
    }
    for (name, ty) in signature.params() {
        params.push(format!("{} {}", ctx.java_type(ty)?, java_identifier(name)));
    }

    writer.open(format!(
        "public static {return_type} {}({})",
        ctx.member_name(id),
        params.join(", ")
    ));
    if testcase {
        writer.line("TspecRuntime.resetVerdict();");
    }

    let body = BodyContext { testcase };
    emit_statements(ctx, writer, body, info.body())?;

    if testcase && !always_returns(info.body()) {
        writer.line("return TspecRuntime.getVerdict();");
    }
    writer.close();
    Ok(())
}

/// Emits a component as a class holding its members
pub fn emit_component<'a>(
    ctx: &Context<'a>,
    writer: &mut JavaWriter,
    id: AssignmentId,
    info: &'a ComponentInfo,
) -> Result<(), InternalError> {
    writer.open(format!("public static class {}", ctx.member_name(id)));
    for member in info.members() {
        let modifier = match member.kind() {
            LocalKind::Var => "public",
            LocalKind::Const => "public final",
        };
        let initial = member
            .initial()
            .map(|value| value_expr(ctx, value, member.ty()))
            .transpose()?
            .unwrap_or_else(|| "null".to_string());
        writer.line(format!(
            "{modifier} {} {} = {initial};",
            ctx.java_type(member.ty())?,
            java_identifier(member.name())
        ));
    }
    writer.close();
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct BodyContext {
    testcase: bool,
}

/// Returns whether every path through the statements ends in a return
fn always_returns(statements: &[Stmt]) -> bool {
    statements.iter().any(|statement| match statement {
        Stmt::Return(_) => true,
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => always_returns(then_branch) && always_returns(else_branch),
        Stmt::Block(statements) => always_returns(statements),
        Stmt::Local { .. } | Stmt::Assign { .. } | Stmt::Expr(_) | Stmt::SetVerdict(_) => false,
    })
}

/// Emits statements up to the first one that always returns
///
/// Java rejects statements it can prove unreachable, so anything after that
/// point is left out.
fn emit_statements(
    ctx: &Context<'_>,
    writer: &mut JavaWriter,
    body: BodyContext,
    statements: &[Stmt],
) -> Result<(), InternalError> {
    for statement in statements {
        emit_statement(ctx, writer, body, statement)?;
        if always_returns(std::slice::from_ref(statement)) {
            break;
        }
    }
    Ok(())
}

fn emit_statement(
    ctx: &Context<'_>,
    writer: &mut JavaWriter,
    body: BodyContext,
    statement: &Stmt,
) -> Result<(), InternalError> {
    match statement {
        Stmt::Local {
            kind,
            name,
            ty,
            initial,
        } => {
            let modifier = match kind {
                LocalKind::Var => "",
                LocalKind::Const => "final ",
            };
            let initial = initial
                .as_ref()
                .map(|value| expr(ctx, value))
                .transpose()?
                .unwrap_or_else(|| "null".to_string());
            writer.line(format!(
                "{modifier}{} {} = {initial};",
                ctx.java_type(ty)?,
                java_identifier(name)
            ));
        }
        Stmt::Assign { target, value } => {
            let target = match target {
                Target::Local(name) => java_identifier(name),
                Target::ComponentMember(name) => format!("{COMPONENT_PARAM}.{}", java_identifier(name)),
            };
            writer.line(format!("{target} = {};", expr(ctx, value)?));
        }
        Stmt::Expr(value) => {
            let rendered = expr(ctx, value)?;
            if matches!(value, tspec_analysis::body::Expr::Call { .. }) {
                writer.line(format!("{rendered};"));
            } else {
                writer.line(format!("TspecRuntime.discard({rendered});"));
            }
        }
        Stmt::Return(value) => match (body.testcase, value) {
            (true, _) => writer.line("return TspecRuntime.getVerdict();"),
            (false, Some(value)) => writer.line(format!("return {};", expr(ctx, value)?)),
            (false, None) => writer.line("return;"),
        },
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            writer.open(format!("if ({})", expr(ctx, condition)?));
            emit_statements(ctx, writer, body, then_branch)?;
            if else_branch.is_empty() {
                writer.close();
            } else {
                writer.reopen("} else {");
                emit_statements(ctx, writer, body, else_branch)?;
                writer.close();
            }
        }
        Stmt::Block(statements) => {
            writer.open("");
            emit_statements(ctx, writer, body, statements)?;
            writer.close();
        }
        Stmt::SetVerdict(verdict) => {
            writer.line(format!("TspecRuntime.setVerdict(TspecRuntime.Verdict.{});", verdict_name(*verdict)));
        }
    }
    Ok(())
}

const fn verdict_name(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::None => "NONE",
        Verdict::Pass => "PASS",
        Verdict::Inconc => "INCONC",
        Verdict::Fail => "FAIL",
        Verdict::Error => "ERROR",
    }
}
