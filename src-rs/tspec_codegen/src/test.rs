use indoc::indoc;
use tspec_analysis::{CancellationToken, InternalError, ModuleId, Project, SharedProject, check, check_project};
use tspec_ast::{
    BehaviourKind, LocalKind, Verdict,
    construct::{ModuleBuilder, attr, behaviour, stmt, template, ty, value},
};

use crate::{GeneratorConfig, SkipReason, generate_code, generate_project, generate_runtime, generate_shared};

fn checked(builder: ModuleBuilder) -> (Project, ModuleId) {
    let mut project = Project::new();
    let module = project.add_module(builder.build());
    check_project(&mut project, &CancellationToken::new());
    (project, module)
}

/// Indents text by one level, as members of the module class are
fn nested(text: &str) -> String {
    text.lines()
        .map(|line| if line.is_empty() { "\n".to_string() } else { format!("    {line}\n") })
        .collect()
}

fn generate(builder: ModuleBuilder) -> String {
    let (project, module) = checked(builder);
    let unit = generate_code(&project, module, &GeneratorConfig::default());
    assert!(unit.skipped().is_empty());
    unit.source().to_string()
}

#[test]
fn constants_become_static_fields() {
    let (project, module) = checked(
        ModuleBuilder::ttcn("Limits")
            .constant("max", ty::integer(), value::integer(10))
            .constant(
                "greeting",
                ty::charstring(),
                value::binary(tspec_ast::BinaryOp::Concat, value::charstring("hi "), value::charstring("there")),
            ),
    );

    let unit = generate_code(&project, module, &GeneratorConfig::default());

    assert_eq!(unit.file_name(), "Limits.java");
    assert_eq!(
        unit.source(),
        indoc! {r#"
            // Generated by tspec from Limits.ttcn. Do not edit.

            public final class Limits {
                private Limits() {
                }

                public static final Long max = 10L;

                public static final String greeting = "hi there";
            }
        "#}
    );
}

#[test]
fn enumerations_keep_their_numbers() {
    let source = generate(
        ModuleBuilder::ttcn("Colours")
            .type_def("Colour", ty::enumerated(&[("red", None), ("green", Some(0))]))
            .constant("favourite", ty::named("Colour"), value::reference("green")),
    );

    assert!(source.contains(&nested(indoc! {"
            public enum Colour {
                red(1L),
                green(0L);

                public final long number;

                Colour(long number) {
                    this.number = number;
                }
            }

            public static final Colour favourite = Colour.green;
    "})));
}

#[test]
fn records_get_a_value_class_and_a_template_class() {
    let source = generate(
        ModuleBuilder::ttcn("Messages")
            .type_def(
                "Msg",
                ty::record(vec![
                    ("id", ty::integer(), false),
                    ("note", ty::charstring(), true),
                ]),
            )
            .constant(
                "first",
                ty::named("Msg"),
                value::sequence(vec![("id", value::integer(1)), ("note", value::omit())]),
            )
            .template(
                "anyMsg",
                ty::named("Msg"),
                template::fields(vec![("id", template::any()), ("note", template::any_or_omit())]),
            ),
    );

    assert!(source.contains("    public static class Msg {\n        public final Long id;\n        public final String note;\n"));
    assert!(source.contains("        public static class Template implements TspecRuntime.Template<Msg> {"));
    assert!(source.contains("return value != null && id.match(value.id) && note.match(value.note);"));
    assert!(source.contains("public static final Msg first = new Msg(1L, null);"));
    assert!(source.contains(
        "public static final TspecRuntime.Template<Msg> anyMsg = new Msg.Template(TspecRuntime.<Long>any(), TspecRuntime.<String>anyOrOmit());"
    ));
}

#[test]
fn set_of_templates_match_unordered() {
    let source = generate(
        ModuleBuilder::ttcn("Sets")
            .type_def("Ids", ty::set_of(ty::integer()))
            .template(
                "someIds",
                ty::named("Ids"),
                template::list(vec![template::any(), template::specific(value::integer(1))]),
            ),
    );

    assert!(source.contains("public final java.util.List<Long> elements;"));
    assert!(source.contains(
        "public static final TspecRuntime.Template<Ids> someIds = new Ids.Template(TspecRuntime.setOf(java.util.List.<TspecRuntime.Template<Long>>of(TspecRuntime.<Long>any(), TspecRuntime.<Long>specific(1L))));"
    ));
}

#[test]
fn set_of_equality_ignores_element_order() {
    let source = generate(
        ModuleBuilder::ttcn("Sets")
            .type_def("Ids", ty::set_of(ty::integer()))
            .type_def("Seq", ty::record_of(ty::integer()))
            .template(
                "exact",
                ty::set_of(ty::integer()),
                template::specific(value::list(vec![value::integer(1), value::integer(2)])),
            )
            .behaviour(
                "same",
                behaviour::function(
                    vec![("a", ty::set_of(ty::integer())), ("b", ty::set_of(ty::integer()))],
                    Some(ty::boolean()),
                    vec![stmt::ret(Some(value::binary(
                        tspec_ast::BinaryOp::Eq,
                        value::reference("a"),
                        value::reference("b"),
                    )))],
                ),
            ),
    );

    assert!(source.contains("return TspecRuntime.sameElements(elements, that.elements);"));
    assert!(source.contains("return java.util.Objects.hash(TspecRuntime.unorderedHash(elements));"));
    assert!(source.contains("return java.util.Objects.equals(elements, that.elements);"));
    assert!(source.contains("TspecRuntime.<Long>specificSet("));
    assert!(source.contains("return TspecRuntime.sameElements(a, b);"));
}

#[test]
fn behaviours_become_static_methods() {
    let source = generate(
        ModuleBuilder::ttcn("Tests")
            .component(
                "Tester",
                vec![stmt::local(LocalKind::Var, "count", ty::integer(), Some(value::integer(0)))],
            )
            .behaviour(
                "step",
                behaviour::new(
                    BehaviourKind::Function,
                    vec![],
                    None,
                    Some("Tester"),
                    vec![stmt::assign("count", value::add(value::reference("count"), value::integer(1)))],
                ),
            )
            .behaviour(
                "sign",
                behaviour::function(
                    vec![("n", ty::integer())],
                    Some(ty::integer()),
                    vec![stmt::if_else(
                        value::binary(tspec_ast::BinaryOp::Lt, value::reference("n"), value::integer(0)),
                        vec![stmt::ret(Some(value::integer(-1)))],
                        vec![stmt::ret(Some(value::integer(1)))],
                    )],
                ),
            )
            .behaviour(
                "tc",
                behaviour::testcase(
                    "Tester",
                    vec![
                        stmt::expr(value::call("step", vec![])),
                        stmt::verdict(Verdict::Pass),
                    ],
                ),
            ),
    );

    assert!(source.contains(&nested(indoc! {"
            public static class Tester {
                public Long count = 0L;
            }
    "})));
    assert!(source.contains(&nested(indoc! {"
            public static void step(Tester _component) {
                _component.count = Math.addExact(_component.count, 1L);
            }
    "})));
    assert!(source.contains(&nested(indoc! {"
            public static Long sign(Long n) {
                if ((n.compareTo(0L) < 0)) {
                    return -1L;
                } else {
                    return 1L;
                }
            }
    "})));
    assert!(source.contains(&nested(indoc! {"
            public static TspecRuntime.Verdict tc(Tester _component) {
                TspecRuntime.resetVerdict();
                step(_component);
                TspecRuntime.setVerdict(TspecRuntime.Verdict.PASS);
                return TspecRuntime.getVerdict();
            }
    "})));
}

#[test]
fn statements_after_a_return_are_left_out() {
    let source = generate(ModuleBuilder::ttcn("Early").behaviour(
        "f",
        behaviour::function(
            vec![],
            None,
            vec![stmt::ret(None), stmt::verdict(Verdict::Fail)],
        ),
    ));

    assert!(source.contains("return;"));
    assert!(!source.contains("Verdict.FAIL"));
}

#[test]
fn encoded_types_get_an_error_behavior_table() {
    let source = generate(ModuleBuilder::ttcn("Codec").type_def_with(
        "Octets",
        ty::octetstring(),
        vec![
            attr::encode("BER"),
            attr::error_behavior(&[("ALL", "IGNORE"), ("UNBOUND", "WARNING")]),
        ],
    ));

    assert!(source.contains("/** Error behaviour of Octets, encoded with BER. */"));
    assert!(source.contains("java.util.Map.entry(\"UNBOUND\", TspecRuntime.Handling.WARNING),"));
    assert!(source.contains("java.util.Map.entry(\"INCOMPL_ANY\", TspecRuntime.Handling.IGNORE),"));

    let (project, module) = checked(ModuleBuilder::ttcn("Codec").type_def_with(
        "Octets",
        ty::octetstring(),
        vec![attr::encode("BER")],
    ));
    let config = GeneratorConfig::default().with_error_behavior_tables(false);
    assert!(!generate_code(&project, module, &config).source().contains("errorBehavior"));
}

#[test]
fn erroneous_definitions_and_their_users_are_skipped() {
    let (project, module) = checked(
        ModuleBuilder::ttcn("Broken")
            .constant("bad", ty::integer(), value::charstring("text"))
            .constant("user", ty::integer(), value::reference("bad"))
            .constant("fine", ty::integer(), value::integer(3)),
    );

    let unit = generate_code(&project, module, &GeneratorConfig::default());

    let skipped: Vec<_> = unit.skipped().iter().map(|s| (s.name(), s.reason().clone())).collect();
    assert_eq!(
        skipped,
        [
            ("Broken.bad", SkipReason::Erroneous("Broken.bad".to_string())),
            ("Broken.user", SkipReason::Erroneous("Broken.bad".to_string())),
        ]
    );
    assert!(!unit.source().contains("bad"));
    assert!(unit.source().contains("public static final Long fine = 3L;"));
}

#[test]
fn unchecked_modules_generate_nothing() {
    let mut project = Project::new();
    let module = project.add_module(
        ModuleBuilder::ttcn("Later")
            .constant("x", ty::integer(), value::integer(1))
            .build(),
    );

    let unit = generate_code(&project, module, &GeneratorConfig::default());

    assert_eq!(unit.skipped().len(), 1);
    assert!(unit.skipped()[0].is_internal());
    assert!(matches!(
        unit.skipped()[0].reason(),
        SkipReason::Internal(InternalError::ModuleNotChecked(_))
    ));
    assert!(!unit.source().contains("public static final"));
}

#[test]
fn results_derived_from_a_replaced_module_are_not_emitted() {
    let mut project = Project::new();
    let base = project.add_module(
        ModuleBuilder::ttcn("Base")
            .constant("base", ty::integer(), value::integer(1))
            .build(),
    );
    let derived = project.add_module(
        ModuleBuilder::ttcn("Derived")
            .import_all("Base")
            .constant("derived", ty::integer(), value::reference("base"))
            .build(),
    );
    let first = project.next_timestamp();
    check(&mut project, derived, first);

    project.add_module(
        ModuleBuilder::ttcn("Base")
            .constant("base", ty::integer(), value::integer(2))
            .build(),
    );
    let second = project.next_timestamp();
    check(&mut project, base, second);

    let config = GeneratorConfig::default();
    let base_unit = generate_code(&project, base, &config);
    assert!(base_unit.skipped().is_empty());
    assert!(base_unit.source().contains("public static final Long base = 2L;"));

    let unit = generate_code(&project, derived, &config);
    assert_eq!(unit.skipped().len(), 1);
    assert_eq!(unit.skipped()[0].name(), "Derived.derived");
    assert!(matches!(
        unit.skipped()[0].reason(),
        SkipReason::Internal(InternalError::Stale { .. })
    ));
    assert!(!unit.source().contains("derived ="));
}

#[test]
fn package_and_indent_follow_the_config() {
    let (project, module) = checked(
        ModuleBuilder::ttcn("Small").constant("x", ty::boolean(), value::boolean(true)),
    );
    let config = GeneratorConfig::new().with_package("org.example").with_indent(2);

    let unit = generate_code(&project, module, &config);
    assert_eq!(
        unit.source(),
        indoc! {"
            // Generated by tspec from Small.ttcn. Do not edit.
            package org.example;

            public final class Small {
              private Small() {
              }

              public static final Boolean x = true;
            }
        "}
    );

    let runtime = generate_runtime(&config);
    assert_eq!(runtime.file_name(), "TspecRuntime.java");
    assert!(runtime.source().starts_with("package org.example;\n\npublic final class TspecRuntime {"));
}

#[test]
fn imported_definitions_are_qualified() {
    let mut project = Project::new();
    project.add_module(
        ModuleBuilder::ttcn("Types")
            .type_def("Point", ty::record(vec![("x", ty::integer(), false)]))
            .build(),
    );
    let user = project.add_module(
        ModuleBuilder::ttcn("User")
            .import_all("Types")
            .constant("origin", ty::named("Point"), value::sequence(vec![("x", value::integer(0))]))
            .build(),
    );
    check_project(&mut project, &CancellationToken::new());

    let units = generate_project(&project, &GeneratorConfig::default());
    let names: Vec<_> = units.iter().map(|unit| unit.file_name()).collect();
    assert_eq!(names, ["TspecRuntime.java", "Types.java", "User.java"]);

    let source = generate_code(&project, user, &GeneratorConfig::default()).source().to_string();
    assert!(source.contains("public static final Types.Point origin = new Types.Point(0L);"));
}

#[test]
fn modules_of_a_shared_project_generate_concurrently() {
    let mut project = Project::new();
    let first = project.add_module(
        ModuleBuilder::ttcn("First")
            .constant("a", ty::integer(), value::integer(1))
            .build(),
    );
    let second = project.add_module(
        ModuleBuilder::ttcn("Second")
            .constant("b", ty::integer(), value::integer(2))
            .build(),
    );
    let shared = SharedProject::new(project);
    check_project(&mut shared.write(), &CancellationToken::new());

    let config = GeneratorConfig::default();
    let (left, right) = std::thread::scope(|scope| {
        let left = scope.spawn(|| generate_shared(&shared, first, &config));
        let right = scope.spawn(|| generate_shared(&shared, second, &config));
        (left.join(), right.join())
    });

    let left = left.expect("first generator panicked");
    let right = right.expect("second generator panicked");
    assert!(left.source().contains("public static final Long a = 1L;"));
    assert!(right.source().contains("public static final Long b = 2L;"));
}
