use chain_core::event::{DEFAULT_MAX_EVENTS_PER_RUN, DEFAULT_RETAINED_RUNS};
use chain_core::{executable, io_model, step, Evaluator, Flow, GetMemory, InMemoryEventStore, Memory,
                 MemoryGetInstruction, NullEventStore, Program, RunEventKind, StatementKind, While, BREAK};
use serde_json::json;

io_model!(Counter { f: i64 });

executable! {
    AddN {
        name: "AddN",
        input: Counter,
        output: Counter,
        fields { n: i64 },
        invoke(self, input, _ctx) {
            Counter { f: input.f + self.n }
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

#[test]
fn events_follow_node_order() {
    let mut evaluator = Evaluator::new(step(AddN::new(1)) | GetMemory::new(["x"], MemoryGetInstruction::Get));
    evaluator.run(json!({"f": 0})).unwrap();
    let events = evaluator.events().unwrap();

    let seqs: Vec<u64> = events.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, (0..events.len() as u64).collect::<Vec<_>>());

    let started: Vec<(usize, StatementKind)> = events.iter()
                                                     .filter_map(|e| match &e.kind {
                                                         RunEventKind::NodeStarted { index, kind, .. } => {
                                                             Some((*index, *kind))
                                                         }
                                                         _ => None,
                                                     })
                                                     .collect();
    assert_eq!(started, vec![(0, StatementKind::Execute), (1, StatementKind::Memory)]);
    assert_eq!(evaluator.event_variants().unwrap(), vec!["I", "S", "F", "S", "F", "C"]);
}

#[test]
fn run_started_carries_the_definition_hash() {
    let program = step(AddN::new(2)) | step(AddN::new(3));
    let expected = program.definition_hash();
    let mut evaluator = Evaluator::new(program).named("Adder");
    evaluator.run(json!({"f": 0})).unwrap();
    match &evaluator.events().unwrap()[0].kind {
        RunEventKind::RunStarted { evaluator, definition_hash, .. } => {
            assert_eq!(evaluator, "Adder");
            assert_eq!(definition_hash, &expected);
        }
        other => panic!("unexpected first event {other:?}"),
    }
}

#[test]
fn definition_hash_depends_on_order_and_addressing() {
    let a = step(AddN::new(1)) | step(Double);
    let b = step(AddN::new(1)) | step(Double);
    let swapped = step(Double) | step(AddN::new(1));
    let rebound = step(AddN::new(1)) | step(Double).set_key("doubled").unwrap();
    assert_eq!(a.definition_hash(), b.definition_hash());
    assert_ne!(a.definition_hash(), swapped.definition_hash());
    assert_ne!(a.definition_hash(), rebound.definition_hash());
    assert_eq!(a.definition_hash().len(), 64);
}

#[test]
fn output_hash_is_stable_for_equal_results() {
    let mut evaluator = Evaluator::new(Program::start(step(AddN::new(1))));
    let hash_of_last = |ev: &Evaluator| {
        ev.events()
          .unwrap()
          .into_iter()
          .find_map(|e| match e.kind {
              RunEventKind::RunCompleted { output_hash } => Some(output_hash),
              _ => None,
          })
          .unwrap()
    };
    evaluator.run(json!({"f": 1})).unwrap();
    let first_id = evaluator.last_run_id().unwrap();
    let first = hash_of_last(&evaluator);
    evaluator.run(json!({"f": 1})).unwrap();
    assert_eq!(first, hash_of_last(&evaluator));
    assert_ne!(Some(first_id), evaluator.last_run_id());
    assert_eq!(evaluator.events_for(first_id).len(), 4);
    evaluator.run(json!({"f": 2})).unwrap();
    assert_ne!(first, hash_of_last(&evaluator));
}

#[test]
fn break_is_reported_as_flow() {
    let mut evaluator = Evaluator::new(While::new(step(AddN::new(1)) | BREAK));
    let out = evaluator.run(json!({"f": 0})).unwrap();
    assert_eq!(out.get("f"), Some(&json!(1)));
    let events = evaluator.events().unwrap();
    assert!(events.iter().any(|e| matches!(e.kind, RunEventKind::NodeFinished { flow: Flow::Break, .. })));
    assert!(events.iter().any(|e| matches!(e.kind, RunEventKind::LoopBroken { iterations: 1, .. })));
}

#[test]
fn null_store_records_nothing() {
    let mut evaluator = Evaluator::new_with_stores(step(AddN::new(1)), Memory::new(), NullEventStore);
    let out = evaluator.run(json!({"f": 1})).unwrap();
    assert_eq!(out.get("f"), Some(&json!(2)));
    assert_eq!(evaluator.events(), Some(Vec::new()));
}

#[test]
fn default_store_retention_is_bounded() {
    let body = step(AddN::new(1)) | step(AddN::new(1));
    let mut evaluator = Evaluator::new(While::new(body).max_iterations(3_000));
    for _ in 0..(DEFAULT_RETAINED_RUNS + 4) {
        evaluator.run(json!({"f": 0})).unwrap();
    }
    let store = evaluator.event_store();
    assert_eq!(store.run_count(), DEFAULT_RETAINED_RUNS);
    assert!(store.event_count() <= DEFAULT_RETAINED_RUNS * (DEFAULT_MAX_EVENTS_PER_RUN + 1));

    let last = evaluator.events().unwrap();
    assert_eq!(last.len(), DEFAULT_MAX_EVENTS_PER_RUN + 1);
    assert!(matches!(last.last().map(|e| &e.kind), Some(RunEventKind::RunCompleted { .. })));
}

#[test]
fn custom_limits_keep_only_the_last_run() {
    let store = InMemoryEventStore::with_limits(1, 64);
    let mut evaluator = Evaluator::new_with_stores(step(AddN::new(1)), Memory::new(), store);
    evaluator.run(json!({"f": 0})).unwrap();
    let first = evaluator.last_run_id().unwrap();
    evaluator.run(json!({"f": 0})).unwrap();
    assert!(evaluator.events_for(first).is_empty());
    assert_eq!(evaluator.events().unwrap().len(), 4);
}
