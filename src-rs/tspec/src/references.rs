//! Listing of the references a module makes, for debugging name resolution

use std::fmt::Write;

use tspec_ast::{
    Module,
    naming::canonicalize,
    traverse::{NodeRef, Visit, walk_module},
};
use tspec_shared::ErrorLocation;

/// Lists each definition followed by the references inside it
///
/// With `only` set, other definitions are skipped without descending into
/// them. Positions are `line:column` when the source text is available and
/// byte offsets otherwise.
pub fn listing(module: &Module, source: Option<&str>, only: Option<&str>) -> String {
    let only = only.map(canonicalize);
    let mut output = String::new();

    walk_module(module, |node| match node {
        NodeRef::Definition(definition) => {
            if only
                .as_ref()
                .is_some_and(|only| *only != definition.name().canonical())
            {
                return Visit::SkipChildren;
            }
            let _ = writeln!(output, "{}", definition.name().as_str());
            Visit::Continue
        }
        NodeRef::Reference(reference) => {
            let position = source.map_or_else(
                || format!("@{}", reference.span().start()),
                |source| {
                    let location = ErrorLocation::from_source_and_span(source, reference.span());
                    format!("{}:{}", location.line(), location.column())
                },
            );
            let name = reference.module().map_or_else(
                || reference.name().as_str().to_string(),
                |module| format!("{}.{}", module.as_str(), reference.name().as_str()),
            );
            let _ = writeln!(output, "  {position} {name}");
            Visit::Continue
        }
        NodeRef::Type(_)
        | NodeRef::Value(_)
        | NodeRef::Template(_)
        | NodeRef::Statement(_)
        | NodeRef::Local(_) => Visit::Continue,
    });

    output
}

/// Returns whether the module has a definition called `name`
pub fn has_definition(module: &Module, name: &str) -> bool {
    let name = canonicalize(name);
    module
        .definitions()
        .iter()
        .any(|definition| definition.name().canonical() == name)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use tspec_ast::construct::{ModuleBuilder, behaviour, stmt, ty, value};

    use super::*;

    fn sample() -> Module {
        ModuleBuilder::ttcn("Sample")
            .import_all("Types")
            .constant("origin", ty::qualified("Types", "Point"), value::reference("zero"))
            .behaviour(
                "step",
                behaviour::function(vec![], None, vec![stmt::expr(value::call("helper", vec![]))]),
            )
            .build()
    }

    #[test]
    fn references_are_listed_per_definition() {
        assert_eq!(
            listing(&sample(), None, None),
            indoc! {"
                origin
                  @0 Types.Point
                  @0 zero
                step
                  @0 helper
            "}
        );
    }

    #[test]
    fn other_definitions_are_skipped() {
        let module = sample();

        assert_eq!(listing(&module, None, Some("step")), "step\n  @0 helper\n");
        assert!(has_definition(&module, "origin"));
        assert!(!has_definition(&module, "missing"));
    }
}
