//! Nodos de paso: un `StepDefinition` o un `Action` más su `Binding`.

use std::fmt;

use serde_json::{json, Value};

use super::{Action, Binding, ReplacingScope, StepDefinition};
use crate::engine::ExecutionContext;
use crate::errors::CoreEngineError;
use crate::model::{merge_json, Record};

/// Nodo que ejecuta un paso con contrato.
pub struct ExecuteNode {
    step: Box<dyn StepDefinition>,
    binding: Binding,
}

/// Nodo que ejecuta una acción de transformación.
pub struct ActionNode {
    action: Box<dyn Action>,
    binding: Binding,
}

/// Envuelve un paso en un nodo componible.
pub fn step(step: impl StepDefinition + 'static) -> ExecuteNode {
    ExecuteNode::new(step)
}

/// Envuelve una acción en un nodo componible.
pub fn action(action: impl Action + 'static) -> ActionNode {
    ActionNode::new(action)
}

impl ExecuteNode {
    pub fn new(step: impl StepDefinition + 'static) -> Self {
        Self::from_boxed(Box::new(step))
    }

    pub fn from_boxed(step: Box<dyn StepDefinition>) -> Self {
        let binding = Binding::default().with_scope(step.scope());
        Self { step, binding }
    }

    pub fn get_key(mut self, key: &str) -> Result<Self, CoreEngineError> {
        self.binding = self.binding.with_get(Some(key))?;
        Ok(self)
    }

    pub fn set_key(mut self, key: &str) -> Result<Self, CoreEngineError> {
        self.binding = self.binding.with_set(Some(key))?;
        Ok(self)
    }

    /// Reconfigura ambas claves de una vez (`None` = raíz / sin set_key).
    pub fn using(mut self, get_key: Option<&str>, set_key: Option<&str>) -> Result<Self, CoreEngineError> {
        self.binding = self.binding.with_get(get_key)?.with_set(set_key)?;
        Ok(self)
    }

    pub fn default_key(mut self, key: &str) -> Result<Self, CoreEngineError> {
        self.binding = self.binding.with_default_key(key)?;
        Ok(self)
    }

    pub fn replace(mut self, scope: ReplacingScope) -> Self {
        self.binding = self.binding.with_scope(scope);
        self
    }

    pub fn name(&self) -> &str {
        self.step.name()
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Lee la entrada, ejecuta y escribe el resultado.
    ///
    /// Si la dirección leída contiene una lista, el paso corre por lotes y
    /// cada resultado se fusiona sobre su ítem de origen; la lista resultante
    /// va a `set_key` (o a `default_key`).
    pub(crate) fn evaluate(&self, record: &mut Record, ctx: &mut ExecutionContext<'_>) -> Result<(), CoreEngineError> {
        match self.binding.read(record)? {
            Value::Array(items) => {
                let outputs = self.step.execute_batch(items.clone(), ctx).map_err(|e| self.failed(e))?;
                if outputs.len() != items.len() {
                    return Err(CoreEngineError::OutputContract { step: self.name().to_string(),
                                                                 field: None,
                                                                 detail: format!("batch produced {} results for {} inputs",
                                                                                 outputs.len(),
                                                                                 items.len()) });
                }
                let merged: Vec<Value> = items.iter().zip(outputs.iter()).map(|(i, o)| merge_json(i, o)).collect();
                self.binding.write_keyed(record, Value::Array(merged))
            }
            input => {
                let output = self.step.execute(input, ctx).map_err(|e| self.failed(e))?;
                self.binding.write(record, output)
            }
        }
    }

    /// Toda falla del paso sale como `StepFailed`, una sola vez.
    fn failed(&self, e: CoreEngineError) -> CoreEngineError {
        match e {
            CoreEngineError::StepFailed { .. } => e,
            other => CoreEngineError::step_failed(self.name(), other),
        }
    }

    pub(crate) fn describe(&self) -> Value {
        json!({
            "step": self.step.name(),
            "definition": self.step.definition_hash(),
            "binding": self.binding.describe(),
        })
    }
}

impl ActionNode {
    pub fn new(action: impl Action + 'static) -> Self {
        Self::from_boxed(Box::new(action))
    }

    pub fn from_boxed(action: Box<dyn Action>) -> Self {
        let binding = Binding::default().with_scope(action.scope())
                                        .with_literal_default_key(action.default_key());
        Self { action, binding }
    }

    pub fn get_key(mut self, key: &str) -> Result<Self, CoreEngineError> {
        self.binding = self.binding.with_get(Some(key))?;
        Ok(self)
    }

    pub fn set_key(mut self, key: &str) -> Result<Self, CoreEngineError> {
        self.binding = self.binding.with_set(Some(key))?;
        Ok(self)
    }

    pub fn using(mut self, get_key: Option<&str>, set_key: Option<&str>) -> Result<Self, CoreEngineError> {
        self.binding = self.binding.with_get(get_key)?.with_set(set_key)?;
        Ok(self)
    }

    pub fn default_key(mut self, key: &str) -> Result<Self, CoreEngineError> {
        self.binding = self.binding.with_default_key(key)?;
        Ok(self)
    }

    pub fn replace(mut self, scope: ReplacingScope) -> Self {
        self.binding = self.binding.with_scope(scope);
        self
    }

    pub fn name(&self) -> &str {
        self.action.name()
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub(crate) fn evaluate(&self, record: &mut Record) -> Result<(), CoreEngineError> {
        let input = self.binding.read(record)?;
        let name = self.action.name();
        match self.action.execute(input).map_err(|e| CoreEngineError::action_failed(name, e))? {
            None => Ok(()),
            Some(result) => self.binding.write(record, result),
        }
    }

    pub(crate) fn describe(&self) -> Value {
        json!({
            "action": self.action.name(),
            "config": self.action.config(),
            "binding": self.binding.describe(),
        })
    }
}

impl fmt::Debug for ExecuteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteNode").field("step", &self.name()).field("binding", &self.binding).finish()
    }
}

impl fmt::Debug for ActionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionNode").field("action", &self.name()).field("binding", &self.binding).finish()
    }
}
