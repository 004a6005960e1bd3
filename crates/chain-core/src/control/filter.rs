//! `Filter`: conserva los elementos de una colección que cumplen una condición.

use serde_json::{json, Value};

use super::Condition;
use crate::engine::ExecutionContext;
use crate::errors::CoreEngineError;
use crate::model::{KeyPath, Record};
use crate::program::Flow;

#[derive(Debug)]
pub struct Filter {
    name: String,
    condition: Condition,
    get: KeyPath,
    set: KeyPath,
}

impl Filter {
    pub fn new(condition: impl Into<Condition>, get_key: &str) -> Result<Self, CoreEngineError> {
        let get = KeyPath::parse(get_key)?;
        Ok(Self { name: "Filter".to_string(),
                  condition: condition.into(),
                  set: get.clone(),
                  get })
    }

    pub fn set_key(mut self, set_key: &str) -> Result<Self, CoreEngineError> {
        self.set = KeyPath::parse(set_key)?;
        Ok(self)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cada elemento debe ser un mapping; la condición lo ve como record.
    /// El orden relativo de los elementos conservados no cambia.
    pub(crate) fn evaluate(&self, record: &mut Record, ctx: &mut ExecutionContext<'_>) -> Result<Flow, CoreEngineError> {
        let items = super::collection_at(record, &self.get)?;
        let mut kept = Vec::new();
        for (i, item) in items.into_iter().enumerate() {
            let candidate = super::element_record(item, &self.get, i)?;
            let keep = {
                let mut child = ctx.child(&format!("{}[{}]", self.name, i));
                self.condition.evaluate(&candidate, &mut child)?
            };
            if keep {
                kept.push(candidate.into_value());
            }
        }
        record.set_path(&self.set, Value::Array(kept))?;
        Ok(Flow::Continue)
    }

    pub(crate) fn describe(&self) -> Value {
        json!({"get": self.get.to_string(), "set": self.set.to_string(), "condition": self.condition.describe()})
    }
}
