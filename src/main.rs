use std::cell::Cell;
use std::rc::Rc;

use chain_adapters::{ExecuteFunction, LogAction, RenameAttributeQuery};
use chain_core::{action, executable, io_model, step, Branch, Condition, CoreEngineError, Evaluator, ExecutionContext,
                 Filter, GetMemory, Memory, MemoryGetInstruction, MemorySetInstruction, Record, SetMemory, Switch,
                 While, BREAK};
use chainflow_rust::AppConfig;
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

fn main() {
    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuración inválida: {e}");
            std::process::exit(2);
        }
    };
    cfg.apply_log_level();
    if let Err(e) = run_demos(&cfg) {
        eprintln!("Demo falló: {e}");
        std::process::exit(1);
    }
}

fn run_demos(cfg: &AppConfig) -> Result<(), CoreEngineError> {
    // 1) Composición: increment | increment
    let mut evaluator = cfg.evaluator(step(Increment) | step(Increment))?;
    let out = evaluator.run(json!({"f": 1}))?;
    println!("[compose] {}", Value::Object(out.into_iter().collect()));
    println!("[compose] eventos: {:?}", evaluator.event_variants().unwrap_or_default());

    // 2) Filter: conserva sólo los textos que mencionan "food"
    let food = |r: &Record, _: &ExecutionContext<'_>| {
        r.get_opt("text").and_then(Value::as_str).is_some_and(|t| t.contains("food"))
    };
    let mut evaluator = cfg.evaluator(Filter::new(food, "texts")?)?;
    let out = evaluator.run(json!({"texts": [{"text": "food"}, {"text": "nothing"}]}))?;
    println!("[filter] {}", Value::Object(out.into_iter().collect()));

    // 3) Memoria: GET deja la clave, POP la consume
    let mut memory = Memory::with_data([("test".to_string(), json!("OK"))]);
    let mut get = cfg.evaluator(GetMemory::new(["test"], MemoryGetInstruction::Get))?;
    let mut pop = cfg.evaluator(GetMemory::new(["test"], MemoryGetInstruction::Pop))?;
    println!("[get] {:?} quedan {:?}", get.run_with(json!({}), &mut memory)?, memory.keys()?);
    println!("[pop] {:?} quedan {:?}", pop.run_with(json!({}), &mut memory)?, memory.keys()?);

    // 4) Memoria: MOVE saca el campo del record
    let mut evaluator = cfg.evaluator(SetMemory::new("test", Some("data"), MemorySetInstruction::Move)?)?;
    let out = evaluator.run(json!({"data": "OK"}))?;
    println!("[move] {:?} memoria test={:?}", out, evaluator.memory().get("test")?);

    // 5) While + Switch con rama de salida
    let calls = Rc::new(Cell::new(0u32));
    let quit = {
        let calls = Rc::clone(&calls);
        Condition::new(move |_: &Record, _: &ExecutionContext<'_>| {
            calls.set(calls.get() + 1);
            calls.get() == 2
        }).named("quit")
    };
    let body = action(LogAction::new(log::Level::Info, "iteración")) | step(Increment);
    let looped = While::new(Switch::new([Branch::new(BREAK).when(quit).exit_branch(true), Branch::new(body)]));
    let mut evaluator = cfg.evaluator(looped)?;
    let out = evaluator.run(json!({"f": 0}))?;
    println!("[while] {:?} tras {} chequeos", out, calls.get());

    // Acciones de pegamento
    let glue = action(RenameAttributeQuery::new("total<-f")?)
               | action(ExecuteFunction::map("twice", |v| json!(v.as_i64().unwrap_or(0) * 2))).using(Some("total"),
                                                                                                  Some("twice"))?;
    let mut evaluator: Evaluator = cfg.evaluator(glue)?;
    let out = evaluator.run(json!({"f": 21}))?;
    println!("[glue] {}", Value::Object(out.into_iter().collect()));
    Ok(())
}
