//! Loop `While`.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Condition;
use crate::engine::{interpreter, ExecutionContext};
use crate::errors::CoreEngineError;
use crate::event::RunEventKind;
use crate::model::Record;
use crate::program::{Flow, Node};

/// Estado de un loop en ejecución.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    Running,
    /// Terminó por una señal `Break` del cuerpo.
    Broken,
    /// Terminó porque la condición dejó de cumplirse o se alcanzó el máximo.
    Completed,
}

/// Resultado de conducir un loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOutcome {
    pub state: LoopState,
    pub iterations: usize,
}

/// Repite el cuerpo mientras la condición (evaluada antes de cada iteración)
/// se cumpla, hasta `max_iterations` o hasta una señal `Break`. Sin condición
/// ni máximo el loop sólo termina con `Break`.
#[derive(Debug)]
pub struct While {
    name: String,
    body: Box<Node>,
    condition: Option<Condition>,
    max_iterations: Option<usize>,
}

impl While {
    pub fn new(body: impl Into<Node>) -> Self {
        Self { name: "While".to_string(),
               body: Box::new(body.into()),
               condition: None,
               max_iterations: None }
    }

    pub fn condition(mut self, condition: impl Into<Condition>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_bounded(&self) -> bool {
        self.condition.is_some() || self.max_iterations.is_some()
    }

    pub(crate) fn drive(&self, record: &mut Record, ctx: &mut ExecutionContext<'_>) -> Result<LoopOutcome, CoreEngineError> {
        if !self.is_bounded() && !super::can_break(&self.body) {
            warn!("[{}] {}: loop has no condition, no max_iterations and no break", ctx.scope(), self.name);
        }
        let mut state = LoopState::Running;
        let mut iterations = 0usize;
        while state == LoopState::Running {
            if self.max_iterations.is_some_and(|max| iterations >= max) {
                state = LoopState::Completed;
                break;
            }
            if let Some(condition) = &self.condition {
                if !condition.evaluate(record, ctx)? {
                    state = LoopState::Completed;
                    break;
                }
            }
            let flow = {
                let mut child = ctx.child(&format!("{}[{}]", self.name, iterations));
                interpreter::eval_node(&self.body, record, &mut child)?
            };
            iterations += 1;
            if flow == Flow::Break {
                state = LoopState::Broken;
            }
        }
        debug!("[{}] {}: {:?} after {} iterations", ctx.scope(), self.name, state, iterations);
        if state == LoopState::Broken {
            let scope = ctx.scope().to_string();
            ctx.emit(RunEventKind::LoopBroken { scope,
                                                node: self.name.clone(),
                                                iterations });
        }
        Ok(LoopOutcome { state, iterations })
    }

    pub(crate) fn describe(&self) -> Value {
        json!({
            "condition": self.condition.as_ref().map(Condition::describe),
            "max_iterations": self.max_iterations,
            "body": self.body.describe(),
        })
    }
}
