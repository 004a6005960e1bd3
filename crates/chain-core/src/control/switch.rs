//! Ramificación condicional.

use log::debug;
use serde_json::{json, Value};

use super::Condition;
use crate::engine::{interpreter, ExecutionContext};
use crate::errors::CoreEngineError;
use crate::model::Record;
use crate::program::{Flow, Node};

/// Rama de un `Switch`. Sin condición actúa como rama por defecto.
#[derive(Debug)]
pub struct Branch {
    body: Node,
    condition: Option<Condition>,
    exit_branch: bool,
}

impl Branch {
    pub fn new(body: impl Into<Node>) -> Self {
        Self { body: body.into(),
               condition: None,
               exit_branch: false }
    }

    pub fn when(mut self, condition: impl Into<Condition>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Tras ejecutar la rama, emite `Break` hacia el loop que la contiene.
    pub fn exit_branch(mut self, exit: bool) -> Self {
        self.exit_branch = exit;
        self
    }

    pub fn is_default(&self) -> bool {
        self.condition.is_none()
    }

    pub(crate) fn can_break(&self) -> bool {
        self.exit_branch || super::can_break(&self.body)
    }

    fn describe(&self) -> Value {
        json!({
            "condition": self.condition.as_ref().map(Condition::describe),
            "exit_branch": self.exit_branch,
            "body": self.body.describe(),
        })
    }
}

/// Elige la primera rama cuya condición se cumple (en orden de
/// declaración). Si ninguna se cumple corre la primera rama por defecto, si
/// existe; si no, el record queda intacto.
#[derive(Debug)]
pub struct Switch {
    name: String,
    branches: Vec<Branch>,
}

impl Switch {
    pub fn new(branches: impl IntoIterator<Item = Branch>) -> Self {
        Self { name: "Switch".to_string(),
               branches: branches.into_iter().collect() }
    }

    pub fn branch(mut self, branch: Branch) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub(crate) fn evaluate(&self, record: &mut Record, ctx: &mut ExecutionContext<'_>) -> Result<Flow, CoreEngineError> {
        let mut fallback: Option<(usize, &Branch)> = None;
        let mut chosen: Option<(usize, &Branch)> = None;
        for (i, branch) in self.branches.iter().enumerate() {
            match &branch.condition {
                None => {
                    if fallback.is_none() {
                        fallback = Some((i, branch));
                    }
                }
                Some(condition) => {
                    if condition.evaluate(record, ctx)? {
                        chosen = Some((i, branch));
                        break;
                    }
                }
            }
        }
        let Some((index, branch)) = chosen.or(fallback) else {
            debug!("[{}] {}: no branch selected", ctx.scope(), self.name);
            return Ok(Flow::Continue);
        };
        debug!("[{}] {}: branch #{} selected", ctx.scope(), self.name, index);
        let flow = {
            let mut child = ctx.child(&format!("{}#{}", self.name, index));
            interpreter::eval_node(&branch.body, record, &mut child)?
        };
        if branch.exit_branch {
            Ok(Flow::Break)
        } else {
            Ok(flow)
        }
    }

    pub(crate) fn describe(&self) -> Value {
        json!({"branches": self.branches.iter().map(Branch::describe).collect::<Vec<_>>()})
    }
}
