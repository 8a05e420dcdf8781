//! Java code generation for checked tspec modules
//!
//! Each module becomes one Java source file holding a single outer class.
//! Definitions appear in source order as nested classes, static fields and
//! static methods. A definition is only generated when its check results
//! are complete, current and free of errors, along with those of everything
//! it depends on; otherwise it is left out and reported in
//! [`GeneratedUnit::skipped`].
//!
//! Generated code relies on the support class produced by
//! [`generate_runtime`], which must be placed in the same package.

use tspec_analysis::{
    AssignmentId, Blocker, ModuleId, Project, SharedProject, generation_status,
    info::AssignmentInfo,
};

mod behaviour;
mod config;
mod context;
mod error;
mod runtime;
mod templates;
mod types;
mod values;
mod writer;

#[cfg(test)]
mod test;

pub use config::GeneratorConfig;
pub use error::{SkipReason, Skipped};
pub use runtime::RUNTIME_CLASS;

use crate::{context::Context, writer::JavaWriter};

/// One generated Java source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    file_name: String,
    source: String,
    skipped: Vec<Skipped>,
}

impl GeneratedUnit {
    /// Returns the file name, such as `Messages.java`
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the Java source
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the definitions that were left out
    #[must_use]
    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }
}

/// Generates the Java source of one module
///
/// The module should have been checked; definitions without usable check
/// results are skipped.
#[must_use]
pub fn generate_code(project: &Project, module: ModuleId, config: &GeneratorConfig) -> GeneratedUnit {
    let ctx = Context::new(project, module, config);
    let class = ctx.module_class(module);
    let _span = tracing::debug_span!("generate_code", module = %project.module_name(module)).entered();

    let mut writer = JavaWriter::new(config.indent(), 0);
    let mut skipped = vec![];

    writer.line(format!(
        "// Generated by tspec from {}. Do not edit.",
        project.module_file(module).display()
    ));
    if let Some(package) = config.package() {
        writer.line(format!("package {package};"));
    }
    writer.blank();
    writer.open(format!("public final class {class}"));
    writer.open(format!("private {class}()"));
    writer.close();

    for id in project.assignment_ids(module) {
        match emit_definition(&ctx, &writer, id) {
            Ok(fragment) => {
                if !fragment.is_empty() {
                    writer.blank();
                    writer.append(fragment);
                }
            }
            Err(reason) => {
                let name = project.assignment_name(id);
                match &reason {
                    SkipReason::Erroneous(culprit) => {
                        tracing::debug!(definition = %name, %culprit, "skipping erroneous definition");
                    }
                    SkipReason::Internal(error) => {
                        tracing::error!(definition = %name, %error, "cannot generate definition");
                    }
                }
                skipped.push(Skipped::new(name, reason));
            }
        }
    }

    writer.close();

    tracing::debug!(skipped = skipped.len(), "module generated");

    GeneratedUnit {
        file_name: format!("{class}.java"),
        source: writer.finish(),
        skipped,
    }
}

fn emit_definition(ctx: &Context<'_>, writer: &JavaWriter, id: AssignmentId) -> Result<JavaWriter, SkipReason> {
    let project = ctx.project();
    generation_status(project, id).map_err(|blocker| match blocker {
        Blocker::Erroneous(culprit) => SkipReason::Erroneous(project.assignment_name(culprit)),
        Blocker::Internal(error) => SkipReason::Internal(error),
    })?;

    let mut fragment = writer.fragment();
    match ctx.info(id)? {
        AssignmentInfo::Type(info) => types::emit_type(ctx, &mut fragment, id, info)?,
        AssignmentInfo::Constant { ty, value } => {
            let value = value
                .as_ref()
                .ok_or_else(|| tspec_analysis::InternalError::MissingValue(ctx.display_name(id)))?;
            fragment.line(format!(
                "public static final {} {} = {};",
                ctx.java_type(ty)?,
                ctx.member_name(id),
                values::value_expr(ctx, value, ty)?
            ));
        }
        AssignmentInfo::Template { ty, template } => {
            let template = template
                .as_ref()
                .ok_or_else(|| tspec_analysis::InternalError::MissingValue(ctx.display_name(id)))?;
            fragment.line(format!(
                "public static final {} {} = {};",
                ctx.template_type(ty)?,
                ctx.member_name(id),
                templates::template_expr(ctx, template, ty)?
            ));
        }
        AssignmentInfo::Behaviour(info) => behaviour::emit_behaviour(ctx, &mut fragment, id, info)?,
        AssignmentInfo::Component(info) => behaviour::emit_component(ctx, &mut fragment, id, info)?,
    }

    Ok(fragment)
}

/// Generates the support class used by every generated module
#[must_use]
pub fn generate_runtime(config: &GeneratorConfig) -> GeneratedUnit {
    GeneratedUnit {
        file_name: format!("{RUNTIME_CLASS}.java"),
        source: runtime::runtime_source(config),
        skipped: vec![],
    }
}

/// Generates the support class followed by every module in name order
#[must_use]
pub fn generate_project(project: &Project, config: &GeneratorConfig) -> Vec<GeneratedUnit> {
    std::iter::once(generate_runtime(config))
        .chain(
            project
                .module_ids_by_name()
                .into_iter()
                .map(|module| generate_code(project, module, config)),
        )
        .collect()
}

/// Generates one module of a shared project under its read lock
///
/// Other readers, including generation of other modules, may run at the
/// same time.
#[must_use]
pub fn generate_shared(project: &SharedProject, module: ModuleId, config: &GeneratorConfig) -> GeneratedUnit {
    generate_code(&project.read(), module, config)
}
