//! chain-core: motor de ejecución de pipelines sobre records JSON.
//!
//! Un programa es una secuencia de nodos (pasos, instrucciones de memoria,
//! sub-programas, switches y loops) que mutan un único `Record`. El
//! `Evaluator` ejecuta el programa, aporta la `Memory` y registra eventos.
pub mod constants;
pub mod control;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod memory;
pub mod model;
pub mod program;
pub mod step;

pub use control::{Branch, Break, Condition, Filter, ForEach, LoopNode, LoopState, Switch, While, BREAK};
pub use engine::{Evaluator, ExecutionContext};
pub use errors::{CoreEngineError, ErrorClass};
pub use event::{EventStore, InMemoryEventStore, NullEventStore, RunEvent, RunEventKind};
pub use memory::{DeleteMemory, DirStore, GetMemory, InMemoryStore, Memory, MemoryGetInstruction, MemoryKey,
                 MemorySetInstruction, MemoryStore, SetMemory, SharedStore};
pub use model::{Address, IoModel, KeyPath, Record, RecordMap};
pub use program::{compose, Flow, IntoProgram, Node, Program, ProgramBuilder, StatementKind};
pub use step::{action, step, Action, ActionNode, Binding, Executable, ExecuteNode, ReplacingScope, StepDefinition};
