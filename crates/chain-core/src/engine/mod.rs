//! Motor de evaluación.
//!
//! - `Evaluator`: dueño del programa, la memoria y el store de eventos.
//! - `ExecutionContext`: vista compartida por los nodos durante una corrida.
//! - `interpreter`: recorrido de nodos y despacho por variante.

pub mod context;
pub mod core;
pub(crate) mod interpreter;

pub use context::ExecutionContext;
pub use core::Evaluator;

pub use crate::event::{EventStore, InMemoryEventStore, NullEventStore, RunEvent, RunEventKind};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IoModel, Record};
    use crate::program::Program;
    use crate::step::{step, Executable};
    use crate::CoreEngineError;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        f: i64,
    }

    impl IoModel for Counter {
        const FIELDS: &'static [&'static str] = &["f"];
    }

    // Paso de ejemplo: incrementa f y cuenta invocaciones en memoria
    #[derive(Debug)]
    struct Increment;

    impl Executable for Increment {
        type Config = ();
        type Input = Counter;
        type Output = Counter;

        fn name(&self) -> &str {
            "Increment"
        }

        fn invoke(&self, input: Counter, ctx: &mut ExecutionContext<'_>) -> Result<Counter, CoreEngineError> {
            let calls = ctx.memory().get("calls")?.and_then(|v| v.as_i64()).unwrap_or(0);
            ctx.memory_mut().set("calls", json!(calls + 1))?;
            Ok(Counter { f: input.f + 1 })
        }
    }

    #[test]
    fn run_emits_start_and_completion() {
        let mut evaluator = Evaluator::new(step(Increment) | step(Increment));
        let out = evaluator.run(json!({"f": 1})).unwrap();
        assert_eq!(out.get("f"), Some(&json!(3)));

        let variants = evaluator.event_variants().expect("events for last run");
        assert_eq!(variants, vec!["I", "S", "F", "S", "F", "C"]);
    }

    #[test]
    fn steps_reach_memory_through_context() {
        let mut evaluator = Evaluator::new(step(Increment) | step(Increment) | step(Increment));
        evaluator.run(json!({"f": 0})).unwrap();
        assert_eq!(evaluator.memory().get("calls").unwrap(), Some(json!(3)));
    }

    #[test]
    fn each_run_gets_its_own_id() {
        let mut evaluator = Evaluator::new(step(Increment));
        evaluator.run(json!({"f": 0})).unwrap();
        let first = evaluator.last_run_id().unwrap();
        evaluator.run(json!({"f": 0})).unwrap();
        let second = evaluator.last_run_id().unwrap();
        assert_ne!(first, second);
        assert_eq!(evaluator.events_for(first).len(), evaluator.events_for(second).len());
    }

    #[test]
    fn failure_is_recorded_and_wrapped() {
        let mut evaluator = Evaluator::new(step(Increment)).named("Counter");
        let err = evaluator.run(json!({"g": 0})).unwrap_err();
        match &err {
            CoreEngineError::EvaluatorFailed { evaluator, source } => {
                assert_eq!(evaluator, "Counter");
                assert!(matches!(**source, CoreEngineError::ProgramFailed { index: 0, .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
        let variants = evaluator.event_variants().unwrap();
        assert_eq!(variants, vec!["I", "S", "X", "E"]);
    }

    #[test]
    fn null_event_store_keeps_nothing() {
        let program = Program::start(step(Increment));
        let mut evaluator = Evaluator::new_with_stores(program, crate::memory::Memory::new(), NullEventStore);
        let out = evaluator.run_record(Record::from_value(json!({"f": 41})).unwrap()).unwrap();
        assert_eq!(out.get("f").unwrap(), &json!(42));
        assert_eq!(evaluator.events(), Some(vec![]));
    }
}
