//! Loop `ForEach`: corre el cuerpo una vez por elemento de una colección.

use serde_json::{json, Value};

use crate::engine::{interpreter, ExecutionContext};
use crate::errors::CoreEngineError;
use crate::model::{KeyPath, Record};
use crate::program::{Flow, Node};

/// Cada elemento (un mapping) se convierte en un record propio; el cuerpo
/// corre sobre él y los records resultantes, en orden, se escriben en
/// `set_key` (por defecto, la misma clave leída).
#[derive(Debug)]
pub struct ForEach {
    name: String,
    body: Box<Node>,
    get: KeyPath,
    set: KeyPath,
}

impl ForEach {
    pub fn new(body: impl Into<Node>, get_key: &str) -> Result<Self, CoreEngineError> {
        let get = KeyPath::parse(get_key)?;
        Ok(Self { name: "ForEach".to_string(),
                  body: Box::new(body.into()),
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

    pub(crate) fn body(&self) -> &Node {
        &self.body
    }

    /// Un `Break` del cuerpo detiene la iteración y se propaga al loop que
    /// contiene a este `ForEach`; en ese caso `set_key` no se escribe.
    pub(crate) fn evaluate(&self, record: &mut Record, ctx: &mut ExecutionContext<'_>) -> Result<Flow, CoreEngineError> {
        let items = super::collection_at(record, &self.get)?;
        let mut results = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            let mut element = super::element_record(item, &self.get, i)?;
            let flow = {
                let mut child = ctx.child(&format!("{}[{}]", self.name, i));
                interpreter::eval_node(&self.body, &mut element, &mut child)?
            };
            if flow == Flow::Break {
                return Ok(Flow::Break);
            }
            results.push(element.into_value());
        }
        record.set_path(&self.set, Value::Array(results))?;
        Ok(Flow::Continue)
    }

    pub(crate) fn describe(&self) -> Value {
        json!({"get": self.get.to_string(), "set": self.set.to_string(), "body": self.body.describe()})
    }
}
