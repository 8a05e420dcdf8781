use std::fmt;

use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{
    Layer,
    layer::{self, SubscriberExt},
};
use tspec_ast::{
    BehaviourKind, BinaryOp, LocalKind,
    construct::{ModuleBuilder, behaviour, stmt, template, ty, value},
};

use crate::{
    AssignmentId, CancellationToken, ModuleId, PassOutcome, PassReport, Project, check, check_project,
    error::{AnalysisError, ResolutionError, SemanticError},
    eval::ConstValue,
    info::{AssignmentInfo, CheckState},
    types::SemType,
};

fn errors(project: &Project, module: ModuleId) -> Vec<AnalysisError> {
    project
        .diagnostics(module)
        .errors()
        .map(|diagnostic| diagnostic.error().clone())
        .collect()
}

fn single_module(builder: ModuleBuilder) -> (Project, ModuleId) {
    let mut project = Project::new();
    let module = project.add_module(builder.build());
    check_project(&mut project, &CancellationToken::new());
    (project, module)
}

#[test]
fn checking_twice_at_one_timestamp_changes_nothing() {
    let mut project = Project::new();
    let module = project.add_module(
        ModuleBuilder::ttcn("M")
            .constant("x", ty::integer(), value::integer(1))
            .constant("y", ty::integer(), value::charstring("no"))
            .build(),
    );

    let timestamp = project.next_timestamp();
    assert_eq!(check(&mut project, module, timestamp), PassOutcome::Completed);
    let first = project.diagnostics(module);

    assert_eq!(check(&mut project, module, timestamp), PassOutcome::Completed);
    assert_eq!(project.diagnostics(module), first);
    assert_eq!(first.errors().count(), 1);
    assert_eq!(
        project.checked(AssignmentId::new(module, 0)).map(|c| c.timestamp()),
        Some(timestamp)
    );
}

#[test]
fn later_timestamps_recheck() {
    let mut project = Project::new();
    let module = project.add_module(
        ModuleBuilder::ttcn("M")
            .constant("x", ty::integer(), value::integer(1))
            .build(),
    );

    let first = project.next_timestamp();
    check(&mut project, module, first);
    let second = project.next_timestamp();
    check(&mut project, module, second);

    assert!(first < second);
    assert_eq!(project.last_checked(module), Some(second));
    assert_eq!(
        project.checked(AssignmentId::new(module, 0)).map(|c| c.timestamp()),
        Some(second)
    );
}

#[test]
fn alias_cycle_is_reported_once() {
    let (project, module) = single_module(
        ModuleBuilder::ttcn("M")
            .type_def("A", ty::named("B"))
            .type_def("B", ty::named("A")),
    );

    let errors = errors(&project, module);
    assert_eq!(errors.len(), 1);
    let AnalysisError::Semantic(SemanticError::CircularReference { cycle, .. }) = &errors[0] else {
        panic!("expected a circular reference, got {errors:?}");
    };
    assert_eq!(cycle, &["M.A", "M.B", "M.A"]);
}

#[test]
fn recursive_record_types_are_allowed() {
    let (project, module) = single_module(ModuleBuilder::ttcn("M").type_def(
        "Node",
        ty::record(vec![
            ("value", ty::integer(), false),
            ("next", ty::named("Node"), true),
        ]),
    ));

    assert!(project.diagnostics(module).is_empty());
}

#[test]
fn nested_structured_types_are_rejected() {
    let (project, module) = single_module(ModuleBuilder::ttcn("M").type_def(
        "Outer",
        ty::record(vec![("inner", ty::record(vec![]), false)]),
    ));

    assert!(matches!(
        errors(&project, module).as_slice(),
        [AnalysisError::Semantic(SemanticError::NestedStructuredType { .. })]
    ));
}

#[test]
fn enumeration_items_are_numbered() {
    let (project, module) = single_module(ModuleBuilder::ttcn("M").type_def(
        "Colour",
        ty::enumerated(&[("red", None), ("green", Some(0)), ("blue", None)]),
    ));

    let info = project
        .checked(AssignmentId::new(module, 0))
        .map(|checked| checked.info().clone());
    let Some(AssignmentInfo::Type(info)) = info else {
        panic!("expected a type, got {info:?}");
    };
    let SemType::Enumerated(items) = info.ty() else {
        panic!("expected an enumeration, got {:?}", info.ty());
    };
    let numbers: Vec<_> = items.iter().map(|item| (item.name(), item.number())).collect();
    assert_eq!(numbers, [("red", 1), ("green", 0), ("blue", 2)]);
}

#[test]
fn ambiguous_names_need_qualification() {
    let mut project = Project::new();
    project.add_module(
        ModuleBuilder::ttcn("B")
            .constant("x", ty::integer(), value::integer(1))
            .build(),
    );
    project.add_module(
        ModuleBuilder::ttcn("C")
            .constant("x", ty::integer(), value::integer(2))
            .build(),
    );
    let a = project.add_module(
        ModuleBuilder::ttcn("A")
            .import_all("B")
            .import_all("C")
            .constant("ambiguous", ty::integer(), value::reference("x"))
            .constant("qualified", ty::integer(), value::qualified("C", "x"))
            .build(),
    );

    check_project(&mut project, &CancellationToken::new());

    let errors = errors(&project, a);
    assert_eq!(errors.len(), 1);
    let AnalysisError::Resolution(ResolutionError::AmbiguousSymbol { modules, .. }) = &errors[0] else {
        panic!("expected an ambiguous symbol, got {errors:?}");
    };
    assert_eq!(modules, &["B", "C"]);

    let qualified = project
        .checked(AssignmentId::new(a, 1))
        .map(|checked| checked.info().clone());
    assert!(matches!(
        qualified,
        Some(AssignmentInfo::Constant {
            value: Some(crate::eval::ConstValue::Integer(2)),
            ..
        })
    ));
}

#[test]
fn constant_division_by_zero() {
    let (project, module) = single_module(ModuleBuilder::ttcn("M").constant(
        "x",
        ty::integer(),
        value::binary(BinaryOp::Div, value::integer(1), value::integer(0)),
    ));

    assert!(matches!(
        errors(&project, module).as_slice(),
        [AnalysisError::Semantic(SemanticError::DivisionByZero { .. })]
    ));
}

#[test]
fn set_of_equality_ignores_element_order() {
    let list = |elements: &[i64]| value::list(elements.iter().copied().map(value::integer).collect());
    let (project, module) = single_module(
        ModuleBuilder::ttcn("M")
            .type_def("Ints", ty::set_of(ty::integer()))
            .type_def("Seq", ty::record_of(ty::integer()))
            .constant("ints", ty::named("Ints"), list(&[1, 2, 2]))
            .constant("seq", ty::named("Seq"), list(&[1, 2]))
            .constant(
                "same",
                ty::boolean(),
                value::binary(BinaryOp::Eq, value::reference("ints"), list(&[2, 1, 2])),
            )
            .constant(
                "fewer",
                ty::boolean(),
                value::binary(BinaryOp::Eq, value::reference("ints"), list(&[1, 2])),
            )
            .constant(
                "ordered",
                ty::boolean(),
                value::binary(BinaryOp::Eq, value::reference("seq"), list(&[2, 1])),
            ),
    );

    assert!(errors(&project, module).is_empty());
    let folded = |index| {
        if let Some(AssignmentInfo::Constant { value, .. }) = project.checked(AssignmentId::new(module, index)).map(|c| c.info()) {
            value.clone()
        } else {
            None
        }
    };
    assert_eq!(folded(4), Some(ConstValue::Boolean(true)));
    assert_eq!(folded(5), Some(ConstValue::Boolean(false)));
    assert_eq!(folded(6), Some(ConstValue::Boolean(false)));
}

#[test]
fn omit_only_for_optional_fields() {
    let (project, module) = single_module(
        ModuleBuilder::ttcn("M")
            .type_def(
                "Msg",
                ty::record(vec![
                    ("id", ty::integer(), false),
                    ("note", ty::charstring(), true),
                ]),
            )
            .constant(
                "fine",
                ty::named("Msg"),
                value::sequence(vec![("id", value::integer(1)), ("note", value::omit())]),
            )
            .constant(
                "wrong",
                ty::named("Msg"),
                value::sequence(vec![("id", value::omit()), ("note", value::charstring("n"))]),
            )
            .template(
                "anything",
                ty::named("Msg"),
                template::fields(vec![("id", template::any()), ("note", template::any_or_omit())]),
            )
            .template("top", ty::integer(), template::any_or_omit()),
    );

    let errors = errors(&project, module);
    assert_eq!(errors.len(), 2, "{errors:?}");
    assert!(
        errors
            .iter()
            .all(|error| matches!(error, AnalysisError::Semantic(SemanticError::OmitNotAllowed { .. })))
    );
    assert!(project.checked(AssignmentId::new(module, 1)).is_some_and(|c| !c.is_fatal()));
    assert!(project.checked(AssignmentId::new(module, 3)).is_some_and(|c| !c.is_fatal()));
}

#[test]
fn functions_with_a_return_type_must_return() {
    let (project, module) = single_module(
        ModuleBuilder::ttcn("M")
            .behaviour(
                "both",
                behaviour::function(
                    vec![("flag", ty::boolean())],
                    Some(ty::integer()),
                    vec![stmt::if_else(
                        value::reference("flag"),
                        vec![stmt::ret(Some(value::integer(1)))],
                        vec![stmt::ret(Some(value::integer(2)))],
                    )],
                ),
            )
            .behaviour(
                "one_branch",
                behaviour::function(
                    vec![("flag", ty::boolean())],
                    Some(ty::integer()),
                    vec![stmt::if_else(
                        value::reference("flag"),
                        vec![stmt::ret(Some(value::integer(1)))],
                        vec![],
                    )],
                ),
            )
            .behaviour(
                "procedure",
                behaviour::function(vec![], None, vec![stmt::ret(Some(value::integer(1)))]),
            ),
    );

    let errors = errors(&project, module);
    assert!(matches!(
        errors.as_slice(),
        [
            AnalysisError::Semantic(SemanticError::MissingReturnValue { .. }),
            AnalysisError::Semantic(SemanticError::UnexpectedReturnValue { .. }),
        ]
    ), "{errors:?}");
    assert!(project.checked(AssignmentId::new(module, 0)).is_some_and(|c| !c.is_fatal()));
}

#[test]
fn constants_cannot_be_assigned() {
    let (project, module) = single_module(ModuleBuilder::ttcn("M").behaviour(
        "f",
        behaviour::function(
            vec![],
            None,
            vec![
                stmt::constant("limit", ty::integer(), value::integer(3)),
                stmt::var("count", ty::integer(), Some(value::integer(0))),
                stmt::assign("count", value::add(value::reference("count"), value::reference("limit"))),
                stmt::assign("limit", value::integer(4)),
            ],
        ),
    ));

    assert!(matches!(
        errors(&project, module).as_slice(),
        [AnalysisError::Semantic(SemanticError::NotAssignable { name, .. })] if name == "limit"
    ));
}

#[test]
fn runs_on_functions_need_the_same_component() {
    let (project, module) = single_module(
        ModuleBuilder::ttcn("M")
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
                    vec![stmt::assign("count", value::integer(1))],
                ),
            )
            .behaviour(
                "tc",
                behaviour::testcase("Tester", vec![stmt::expr(value::call("step", vec![]))]),
            )
            .behaviour(
                "outside",
                behaviour::function(vec![], None, vec![stmt::expr(value::call("step", vec![]))]),
            ),
    );

    let errors = errors(&project, module);
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(matches!(
        &errors[0],
        AnalysisError::Semantic(SemanticError::RunsOnMismatch { function, component, .. })
            if function == "step" && component == "Tester"
    ));
}

#[test]
fn mutually_recursive_functions_are_not_cycles() {
    let (project, module) = single_module(
        ModuleBuilder::ttcn("M")
            .behaviour(
                "even",
                behaviour::function(
                    vec![("n", ty::integer())],
                    Some(ty::boolean()),
                    vec![stmt::ret(Some(value::call("odd", vec![value::reference("n")])))],
                ),
            )
            .behaviour(
                "odd",
                behaviour::function(
                    vec![("n", ty::integer())],
                    Some(ty::boolean()),
                    vec![stmt::ret(Some(value::call("even", vec![value::reference("n")])))],
                ),
            ),
    );

    assert!(project.diagnostics(module).is_empty());
}

#[test]
fn cancelled_pass_keeps_previous_results() {
    let mut project = Project::new();
    let module = project.add_module(
        ModuleBuilder::ttcn("M")
            .constant("x", ty::integer(), value::integer(1))
            .build(),
    );

    let completed = check_project(&mut project, &CancellationToken::new());
    assert_eq!(completed.outcome(), PassOutcome::Completed);
    assert_eq!(completed.checked(), [module]);

    let token = CancellationToken::new();
    token.cancel();
    let cancelled = check_project(&mut project, &token);

    assert_eq!(cancelled.outcome(), PassOutcome::Cancelled);
    assert!(cancelled.checked().is_empty());
    assert!(completed.timestamp() < cancelled.timestamp());
    assert_eq!(project.last_checked(module), Some(completed.timestamp()));
    assert_eq!(
        project.checked(AssignmentId::new(module, 0)).map(|c| c.timestamp()),
        Some(completed.timestamp())
    );
}

/// Cancels `token` as soon as the checker starts on `assignment`
struct CancelWhenChecking {
    assignment: &'static str,
    token: CancellationToken,
}

impl<S: Subscriber> Layer<S> for CancelWhenChecking {
    fn on_event(&self, event: &Event<'_>, _ctx: layer::Context<'_, S>) {
        let mut fields = EventFields::default();
        event.record(&mut fields);
        if fields.message == "checking" && fields.assignment == self.assignment {
            self.token.cancel();
        }
    }
}

#[derive(Default)]
struct EventFields {
    message: String,
    assignment: String,
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "assignment" => self.assignment = format!("{value:?}"),
            _ => {}
        }
    }
}

/// Runs a pass that is cancelled once it starts checking `assignment`
fn check_cancelled_at(project: &mut Project, assignment: &'static str) -> PassReport {
    let token = CancellationToken::new();
    let subscriber = tracing_subscriber::registry().with(CancelWhenChecking {
        assignment,
        token: token.clone(),
    });
    tracing::subscriber::with_default(subscriber, || check_project(project, &token))
}

fn chained_constants() -> ModuleBuilder {
    ModuleBuilder::ttcn("M")
        .constant("a", ty::integer(), value::add(value::reference("b"), value::integer(1)))
        .constant("b", ty::integer(), value::add(value::reference("c"), value::integer(1)))
        .constant("c", ty::integer(), value::integer(1))
}

#[test]
fn cancelling_mid_check_restores_previous_results() {
    let mut project = Project::new();
    let module = project.add_module(chained_constants().build());
    let completed = check_project(&mut project, &CancellationToken::new());

    let cancelled = check_cancelled_at(&mut project, "M.b");

    assert_eq!(cancelled.outcome(), PassOutcome::Cancelled);
    assert!(cancelled.checked().is_empty());
    assert_eq!(project.last_checked(module), Some(completed.timestamp()));
    for id in project.assignment_ids(module) {
        let state = project.check_state(id);
        assert!(!state.is_checking());
        assert_eq!(state.checked().map(|c| c.timestamp()), Some(completed.timestamp()));
    }
    let a = project.checked(AssignmentId::new(module, 0)).map(|c| c.info().clone());
    assert!(matches!(
        a,
        Some(AssignmentInfo::Constant {
            value: Some(ConstValue::Integer(3)),
            ..
        })
    ));
}

#[test]
fn cancelling_the_first_check_leaves_definitions_unchecked() {
    let mut project = Project::new();
    let module = project.add_module(chained_constants().build());

    let cancelled = check_cancelled_at(&mut project, "M.b");

    assert_eq!(cancelled.outcome(), PassOutcome::Cancelled);
    assert_eq!(project.last_checked(module), None);
    for id in project.assignment_ids(module) {
        assert!(matches!(project.check_state(id), CheckState::Unchecked));
    }

    let report = check_project(&mut project, &CancellationToken::new());
    assert_eq!(report.outcome(), PassOutcome::Completed);
    assert!(project.assignment_ids(module).all(|id| project.checked(id).is_some()));
}
