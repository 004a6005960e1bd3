use chain_core::{executable, io_model, step, CoreEngineError, ErrorClass, Evaluator, ExecutionContext, Executable,
                 Node, Program, ProgramBuilder, ReplacingScope, StatementKind, StepDefinition};
use serde_json::{json, Value};

io_model!(Counter { f: i64 });

executable! {
    Increment {
        name: "Increment",
        input: Counter,
        output: Counter,
        invoke(self, input, _ctx) {
            Counter { f: input.f + 1 }
        }
    }
}

executable! {
    Double {
        name: "Double",
        input: Counter,
        output: Counter,
        invoke(self, input, _ctx) {
            Counter { f: input.f * 2 }
        }
    }
}

/// Paso que siempre falla.
struct Explode;

impl Executable for Explode {
    type Config = ();
    type Input = Counter;
    type Output = Counter;

    fn name(&self) -> &str {
        "Explode"
    }

    fn invoke(&self, _input: Counter, _ctx: &mut ExecutionContext<'_>) -> Result<Counter, CoreEngineError> {
        Err(CoreEngineError::custom("boom"))
    }
}

io_model!(Indexed { f: i64, pos: usize });

/// Lote propio: numera cada ítem por su posición.
struct Enumerate;

impl Executable for Enumerate {
    type Config = ();
    type Input = Counter;
    type Output = Indexed;

    fn name(&self) -> &str {
        "Enumerate"
    }

    fn invoke(&self, input: Counter, _ctx: &mut ExecutionContext<'_>) -> Result<Indexed, CoreEngineError> {
        Ok(Indexed { f: input.f, pos: 0 })
    }

    fn invoke_batch(&self, inputs: Vec<Counter>, _ctx: &mut ExecutionContext<'_>)
                    -> Result<Vec<Indexed>, CoreEngineError> {
        Ok(inputs.into_iter().enumerate().map(|(pos, c)| Indexed { f: c.f, pos }).collect())
    }
}

/// Lote que sólo procesa el primer ítem.
struct FirstOnly;

impl Executable for FirstOnly {
    type Config = ();
    type Input = Counter;
    type Output = Counter;

    fn name(&self) -> &str {
        "FirstOnly"
    }

    fn invoke(&self, input: Counter, _ctx: &mut ExecutionContext<'_>) -> Result<Counter, CoreEngineError> {
        Ok(input)
    }

    fn invoke_batch(&self, inputs: Vec<Counter>, _ctx: &mut ExecutionContext<'_>)
                    -> Result<Vec<Counter>, CoreEngineError> {
        Ok(inputs.into_iter().take(1).collect())
    }
}

/// Paso escrito directamente sobre `StepDefinition`.
struct MarkDone {
    batch_limit: usize,
}

impl StepDefinition for MarkDone {
    fn name(&self) -> &str {
        "MarkDone"
    }

    fn execute(&self, input: Value, _ctx: &mut ExecutionContext<'_>) -> Result<Value, CoreEngineError> {
        if input.get("a").is_none() {
            return Err(CoreEngineError::custom("missing a"));
        }
        Ok(json!({"done": true}))
    }

    fn execute_batch(&self, inputs: Vec<Value>, ctx: &mut ExecutionContext<'_>) -> Result<Vec<Value>, CoreEngineError> {
        inputs.into_iter().take(self.batch_limit).map(|input| self.execute(input, ctx)).collect()
    }
}

fn run(program: impl chain_core::IntoProgram, input: Value) -> Result<Value, CoreEngineError> {
    let mut evaluator = Evaluator::new(program);
    evaluator.run(input).map(|out| Value::Object(out.into_iter().collect()))
}

#[test]
fn increment_twice() {
    let out = run(step(Increment) | step(Increment), json!({"f": 1})).unwrap();
    assert_eq!(out, json!({"f": 3}));
}

#[test]
fn composition_runs_left_to_right() {
    assert_eq!(run(step(Double) | step(Increment), json!({"f": 1})).unwrap(), json!({"f": 3}));
    assert_eq!(run(step(Increment) | step(Double), json!({"f": 1})).unwrap(), json!({"f": 4}));
}

#[test]
fn compose_fn_matches_operator() {
    let a = chain_core::compose(step(Increment), step(Double));
    let b = step(Increment) | step(Double);
    assert_eq!(a.definition_hash(), b.definition_hash());
    assert_eq!(a.len(), 2);
}

#[test]
fn program_on_the_right_is_nested() {
    let inner = step(Increment) | step(Increment);
    let outer = step(Double) | inner;
    assert_eq!(outer.len(), 2);
    assert_eq!(outer.nodes()[1].kind(), StatementKind::Pipeline);
    assert_eq!(run(outer, json!({"f": 1})).unwrap(), json!({"f": 4}));
}

#[test]
fn set_key_nests_result_and_keeps_other_fields() {
    let program = step(Increment).set_key("output").unwrap();
    let out = run(program, json!({"f": 1, "other": "x"})).unwrap();
    assert_eq!(out, json!({"f": 1, "other": "x", "output": {"f": 2}}));
}

#[test]
fn get_key_presents_only_that_field() {
    let program = step(Increment).get_key("input").unwrap();
    let out = run(program, json!({"input": {"f": 5}, "f": 100})).unwrap();
    assert_eq!(out, json!({"input": {"f": 5}, "f": 6}));
}

#[test]
fn dotted_addresses_reach_nested_fields() {
    let program = step(Increment).using(Some("data.counter"), Some("data.next")).unwrap();
    let out = run(program, json!({"data": {"counter": {"f": 1}}})).unwrap();
    assert_eq!(out, json!({"data": {"counter": {"f": 1}, "next": {"f": 2}}}));
}

#[test]
fn local_scope_replaces_the_record() {
    let program = step(Increment).replace(ReplacingScope::Local);
    let out = run(program, json!({"f": 1, "noise": true})).unwrap();
    assert_eq!(out, json!({"f": 2}));
}

#[test]
fn array_input_takes_the_batch_path() {
    let program = step(Increment).using(Some("items"), Some("items")).unwrap();
    let out = run(program, json!({"items": [{"f": 1}, {"f": 10, "tag": "b"}]})).unwrap();
    assert_eq!(out, json!({"items": [{"f": 2}, {"f": 11, "tag": "b"}]}));
}

#[test]
fn malformed_addresses_fail_at_construction() {
    for bad in ["", "a..b", " a"] {
        let err = step(Increment).get_key(bad).unwrap_err();
        assert!(matches!(err, CoreEngineError::InvalidAddress { .. }), "{bad:?}");
        assert_eq!(err.class(), ErrorClass::Address);
    }
}

#[test]
fn structural_errors_raise_at_build_time() {
    let empty = Program::from_nodes(Vec::<Option<Node>>::new()).unwrap_err();
    assert_eq!(empty, CoreEngineError::EmptyProgram);

    let first_none = Program::from_nodes(vec![None, Some(step(Increment).into())]).unwrap_err();
    assert_eq!(first_none, CoreEngineError::InvalidFirstNode);

    let null_later = Program::from_nodes(vec![Some(step(Increment).into()), None]).unwrap_err();
    assert_eq!(null_later, CoreEngineError::NullNode { position: 1 });

    let try_then = Program::start(step(Increment)).try_then(None).unwrap_err();
    assert_eq!(try_then, CoreEngineError::NullNode { position: 1 });
    assert_eq!(try_then.class(), ErrorClass::Structural);

    assert_eq!(ProgramBuilder::new().build().unwrap_err(), CoreEngineError::EmptyProgram);
}

#[test]
fn literal_input_only_first() {
    let mut data = chain_core::RecordMap::new();
    data.insert("f".into(), json!(41));
    let program = ProgramBuilder::input(data.clone()).node(step(Increment)).unwrap().build().unwrap();
    assert_eq!(run(program, json!({})).unwrap(), json!({"f": 42}));

    let err = Program::builder().node(step(Increment)).unwrap().push(Some(Node::Input(data))).unwrap_err();
    assert_eq!(err, CoreEngineError::LiteralNotFirst { position: 1 });
}

#[test]
fn missing_input_field_is_a_contract_error() {
    let err = run(step(Increment), json!({"g": 1})).unwrap_err();
    assert!(matches!(err, CoreEngineError::EvaluatorFailed { .. }));
    assert_eq!(err.class(), ErrorClass::Contract);
    match err.root_cause() {
        CoreEngineError::InputContract { step, field, .. } => {
            assert_eq!(step, "Increment");
            assert_eq!(field.as_deref(), Some("f"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn step_errors_are_wrapped_once_per_layer() {
    let program = (step(Increment) | step(Explode)).named("Numbers");
    let err = Evaluator::new(program).named("Main").run(json!({"f": 1})).unwrap_err();
    let CoreEngineError::EvaluatorFailed { evaluator, source } = err else { panic!("not wrapped by evaluator") };
    assert_eq!(evaluator, "Main");
    let CoreEngineError::ProgramFailed { program, index, node, source } = *source else { panic!("not located") };
    assert_eq!((program.as_str(), index, node.as_str()), ("Numbers", 1, "Explode"));
    assert!(matches!(*source, CoreEngineError::StepFailed { ref step, .. } if step == "Explode"));
    assert_eq!(source.root_cause(), &CoreEngineError::Custom("boom".into()));
}

#[test]
fn nested_failures_are_located_at_the_innermost_program() {
    let inner = (step(Increment) | step(Explode)).named("Inner");
    let outer = step(Increment) | inner;
    let err = run(outer, json!({"f": 1})).unwrap_err();
    let CoreEngineError::EvaluatorFailed { source, .. } = err else { panic!("not wrapped") };
    assert!(matches!(*source, CoreEngineError::ProgramFailed { ref program, index: 1, .. } if program == "Inner"));
}

#[test]
fn non_mapping_input_is_rejected() {
    let err = run(step(Increment), json!([1, 2])).unwrap_err();
    assert!(matches!(err.root_cause(), CoreEngineError::InvalidInputData(_)));
}

#[test]
fn run_program_validates_both_ends() {
    let mut evaluator = Evaluator::new(step(Increment) | step(Increment));
    let out: Counter = evaluator.run_program::<Counter, Counter>(Counter { f: 1 }).unwrap();
    assert_eq!(out, Counter { f: 3 });
}

#[test]
fn run_extract_returns_one_key() {
    let mut evaluator = Evaluator::new(step(Increment).set_key("result").unwrap());
    let value = evaluator.run_extract(json!({"f": 1}), "result").unwrap();
    assert_eq!(value, json!({"f": 2}));
    let err = evaluator.run_extract(json!({"f": 1}), "missing").unwrap_err();
    assert!(matches!(err.root_cause(), CoreEngineError::KeyNotFound { .. }));
}

#[test]
fn overridden_invoke_batch_is_used() {
    let program = step(Enumerate).using(Some("items"), Some("items")).unwrap();
    let out = run(program, json!({"items": [{"f": 7}, {"f": 8}, {"f": 9}]})).unwrap();
    assert_eq!(out, json!({"items": [{"f": 7, "pos": 0}, {"f": 8, "pos": 1}, {"f": 9, "pos": 2}]}));
}

#[test]
fn short_typed_batch_is_an_output_contract_error() {
    let program = step(FirstOnly).using(Some("items"), Some("items")).unwrap();
    let err = run(program, json!({"items": [{"f": 1}, {"f": 2}]})).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Contract);
    match err.root_cause() {
        CoreEngineError::OutputContract { step, detail, .. } => {
            assert_eq!(step, "FirstOnly");
            assert_eq!(detail, "batch produced 1 results for 2 inputs");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn short_untyped_batch_never_drops_items() {
    let program = step(MarkDone { batch_limit: 1 }).using(Some("items"), Some("items")).unwrap();
    let err = run(program, json!({"items": [{"a": 1}, {"a": 2}, {"a": 3}]})).unwrap_err();
    assert!(matches!(err.root_cause(),
                     CoreEngineError::OutputContract { step, detail, .. }
                     if step == "MarkDone" && detail == "batch produced 1 results for 3 inputs"));

    let program = step(MarkDone { batch_limit: usize::MAX }).using(Some("items"), Some("items")).unwrap();
    let out = run(program, json!({"items": [{"a": 1}, {"a": 2}]})).unwrap();
    assert_eq!(out, json!({"items": [{"a": 1, "done": true}, {"a": 2, "done": true}]}));
}

#[test]
fn untyped_step_errors_are_step_failures() {
    let err = run(step(MarkDone { batch_limit: 1 }), json!({"b": 1})).unwrap_err();
    let CoreEngineError::EvaluatorFailed { source, .. } = err else { panic!("not wrapped") };
    let CoreEngineError::ProgramFailed { source, .. } = *source else { panic!("not located") };
    assert!(matches!(*source, CoreEngineError::StepFailed { ref step, .. } if step == "MarkDone"));
    assert_eq!(source.root_cause(), &CoreEngineError::Custom("missing a".into()));
}
