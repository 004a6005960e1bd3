//! Condiciones evaluadas contra el record.

use std::fmt;

use serde_json::{json, Value};

use crate::engine::{interpreter, ExecutionContext};
use crate::errors::CoreEngineError;
use crate::memory::{GetMemory, MemoryGetInstruction, MemoryKey};
use crate::model::Record;
use crate::program::{Flow, Node};

type Predicate = Box<dyn Fn(&Record, &ExecutionContext<'_>) -> bool>;

/// Predicado sobre el record.
///
/// Dos formas:
/// - una función pura `Fn(&Record, &ExecutionContext) -> bool`;
/// - un programa que corre sobre una **copia** del record (opcionalmente
///   cargando claves de memoria antes) seguido de un validador sobre esa
///   copia. El record original nunca cambia. Un `Break` en ese programa es
///   un error: una condición no controla loops.
pub struct Condition {
    name: String,
    kind: ConditionKind,
}

enum ConditionKind {
    Predicate(Predicate),
    Program { body: Box<Node>, validator: Predicate, state: Vec<MemoryKey> },
}

impl Condition {
    pub fn new(predicate: impl Fn(&Record, &ExecutionContext<'_>) -> bool + 'static) -> Self {
        Self { name: "Condition".to_string(),
               kind: ConditionKind::Predicate(Box::new(predicate)) }
    }

    pub fn from_program(body: impl Into<Node>,
                        validator: impl Fn(&Record, &ExecutionContext<'_>) -> bool + 'static)
                        -> Self {
        Self { name: "Condition".to_string(),
               kind: ConditionKind::Program { body: Box::new(body.into()),
                                              validator: Box::new(validator),
                                              state: Vec::new() } }
    }

    /// Claves de memoria cargadas en la copia antes de correr el programa.
    /// Sin efecto en condiciones de función.
    pub fn with_state<K: Into<MemoryKey>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        if let ConditionKind::Program { state, .. } = &mut self.kind {
            state.extend(keys.into_iter().map(Into::into));
        }
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, record: &Record, ctx: &mut ExecutionContext<'_>) -> Result<bool, CoreEngineError> {
        match &self.kind {
            ConditionKind::Predicate(p) => Ok(p(record, &*ctx)),
            ConditionKind::Program { body, validator, state } => {
                let mut scratch = record.clone();
                if !state.is_empty() {
                    GetMemory::new(state.iter().cloned(), MemoryGetInstruction::Get).apply(&mut scratch,
                                                                                            ctx.memory_mut())?;
                }
                let mut child = ctx.child(&self.name);
                if interpreter::eval_node(body, &mut scratch, &mut child)? == Flow::Break {
                    return Err(CoreEngineError::Internal(format!("condition {} can not break", self.name)));
                }
                Ok(validator(&scratch, &child))
            }
        }
    }

    pub(crate) fn describe(&self) -> Value {
        match &self.kind {
            ConditionKind::Predicate(_) => json!({"name": self.name, "kind": "predicate"}),
            ConditionKind::Program { body, state, .. } => {
                json!({"name": self.name, "kind": "program", "body": body.describe(), "state": state})
            }
        }
    }
}

impl<F> From<F> for Condition where F: Fn(&Record, &ExecutionContext<'_>) -> bool + 'static
{
    fn from(f: F) -> Self {
        Condition::new(f)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ConditionKind::Predicate(_) => "predicate",
            ConditionKind::Program { .. } => "program",
        };
        f.debug_struct("Condition").field("name", &self.name).field("kind", &kind).finish()
    }
}
