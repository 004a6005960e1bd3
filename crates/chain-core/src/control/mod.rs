//! Nodos de control de flujo: `Switch`, `While`, `ForEach`, `Filter` y
//! `Break`, más las `Condition`s que los gobiernan.
//!
//! `Break` no es un error: es una señal (`Flow::Break`) que termina el loop
//! más cercano. Fuera de todo loop termina la corrida normalmente.

mod condition;
mod filter;
mod for_each;
mod switch;
mod while_loop;

pub use condition::Condition;
pub use filter::Filter;
pub use for_each::ForEach;
pub use switch::{Branch, Switch};
pub use while_loop::{LoopOutcome, LoopState, While};

use serde_json::{json, Value};

use crate::engine::ExecutionContext;
use crate::errors::CoreEngineError;
use crate::model::{record::kind_of, KeyPath, Record};
use crate::program::{Flow, Node};

/// Señal de salida del loop más cercano.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Break;

pub const BREAK: Break = Break;

#[derive(Debug)]
pub enum LoopNode {
    While(While),
    ForEach(ForEach),
    Filter(Filter),
    Break,
}

impl LoopNode {
    pub fn name(&self) -> &str {
        match self {
            LoopNode::While(l) => l.name(),
            LoopNode::ForEach(l) => l.name(),
            LoopNode::Filter(l) => l.name(),
            LoopNode::Break => "Break",
        }
    }

    pub(crate) fn evaluate(&self, record: &mut Record, ctx: &mut ExecutionContext<'_>) -> Result<Flow, CoreEngineError> {
        match self {
            // el Break del cuerpo se consume aquí
            LoopNode::While(l) => l.drive(record, ctx).map(|_| Flow::Continue),
            LoopNode::ForEach(l) => l.evaluate(record, ctx),
            LoopNode::Filter(l) => l.evaluate(record, ctx),
            LoopNode::Break => Ok(Flow::Break),
        }
    }

    pub(crate) fn describe(&self) -> Value {
        match self {
            LoopNode::While(l) => l.describe(),
            LoopNode::ForEach(l) => l.describe(),
            LoopNode::Filter(l) => l.describe(),
            LoopNode::Break => json!("break"),
        }
    }
}

/// `true` si evaluar `node` puede producir `Flow::Break` hacia afuera.
/// No desciende en `While` anidados (consumen su propio Break).
pub(crate) fn can_break(node: &Node) -> bool {
    match node {
        Node::Loop(LoopNode::Break) => true,
        Node::Loop(LoopNode::ForEach(l)) => can_break(l.body()),
        Node::Pipeline(p) => p.nodes().iter().any(can_break),
        Node::Switch(s) => s.branches().iter().any(|b| b.can_break()),
        _ => false,
    }
}

/// Lee la colección en `path`; debe ser una lista.
fn collection_at(record: &Record, path: &KeyPath) -> Result<Vec<Value>, CoreEngineError> {
    match record.get_path(path)? {
        Value::Array(items) => Ok(items.clone()),
        other => Err(CoreEngineError::InvalidInputData(format!("'{path}' should be a list, got {}",
                                                               kind_of(other)))),
    }
}

/// Convierte un elemento de colección en record; debe ser un mapping.
fn element_record(item: Value, path: &KeyPath, index: usize) -> Result<Record, CoreEngineError> {
    if !item.is_object() {
        return Err(CoreEngineError::InvalidInputData(format!("element #{index} of '{path}' is not a mapping, got {}",
                                                             kind_of(&item))));
    }
    Record::from_value(item)
}
