use chain_core::{Action, CoreEngineError, RecordMap, ReplacingScope};
use serde_json::{json, Map, Value};

use super::{expect_mapping, take_key};

/// Agrega pares clave/valor fijos (pisan los existentes).
#[derive(Debug, Clone)]
pub struct AddData {
    data: RecordMap,
}

impl AddData {
    pub fn new(data: RecordMap) -> Self {
        Self { data }
    }

    /// Desde un objeto JSON; otros valores se ignoran.
    pub fn from_value(data: Value) -> Self {
        let data = match data {
            Value::Object(map) => map.into_iter().collect(),
            _ => RecordMap::new(),
        };
        Self { data }
    }
}

impl Action for AddData {
    fn name(&self) -> &str {
        "AddData"
    }

    fn config(&self) -> Value {
        json!(self.data)
    }

    fn execute(&self, input: Value) -> Result<Option<Value>, CoreEngineError> {
        let mut map = expect_mapping(self.name(), input)?;
        for (k, v) in &self.data {
            map.insert(k.clone(), v.clone());
        }
        Ok(Some(Value::Object(map)))
    }
}

/// Fija `key = value`.
#[derive(Debug, Clone)]
pub struct SetValue {
    key: String,
    value: Value,
}

impl SetValue {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self { key: key.into(),
               value }
    }
}

impl Action for SetValue {
    fn name(&self) -> &str {
        "SetValue"
    }

    fn config(&self) -> Value {
        json!({"key": self.key, "value": self.value})
    }

    fn execute(&self, input: Value) -> Result<Option<Value>, CoreEngineError> {
        let mut map = expect_mapping(self.name(), input)?;
        map.insert(self.key.clone(), self.value.clone());
        Ok(Some(Value::Object(map)))
    }
}

/// Elimina claves puntuales o, sin claves, vacía el record.
#[derive(Debug, Clone, Default)]
pub struct Flush {
    keys: Option<Vec<String>>,
}

impl Flush {
    pub fn all() -> Self {
        Self { keys: None }
    }

    pub fn keys<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> Self {
        Self { keys: Some(keys.into_iter().map(Into::into).collect()) }
    }
}

impl Action for Flush {
    fn name(&self) -> &str {
        "Flush"
    }

    fn scope(&self) -> ReplacingScope {
        ReplacingScope::Local
    }

    fn config(&self) -> Value {
        json!({"keys": self.keys})
    }

    fn execute(&self, input: Value) -> Result<Option<Value>, CoreEngineError> {
        let Some(keys) = &self.keys else {
            return Ok(Some(json!({})));
        };
        let mut map = expect_mapping(self.name(), input)?;
        for k in keys {
            take_key(&mut map, k)?;
        }
        Ok(Some(Value::Object(map)))
    }
}

/// Sube un nivel el contenido de `key`: sus claves pasan al nivel superior y
/// `key` desaparece.
#[derive(Debug, Clone)]
pub struct UnpackValue {
    key: String,
}

impl UnpackValue {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Action for UnpackValue {
    fn name(&self) -> &str {
        "UnpackValue"
    }

    fn scope(&self) -> ReplacingScope {
        ReplacingScope::Local
    }

    fn config(&self) -> Value {
        json!({"key": self.key})
    }

    fn execute(&self, input: Value) -> Result<Option<Value>, CoreEngineError> {
        let mut map = expect_mapping(self.name(), input)?;
        let nested = match take_key(&mut map, &self.key)? {
            Value::Object(nested) => nested,
            _ => {
                return Err(CoreEngineError::InvalidInputData(format!("{}: '{}' is not a mapping",
                                                                     self.name(),
                                                                     self.key)))
            }
        };
        map.extend(nested);
        Ok(Some(Value::Object(map)))
    }
}

/// Anida la entrada completa bajo `key`.
#[derive(Debug, Clone)]
pub struct NestToKey {
    key: String,
}

impl NestToKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Action for NestToKey {
    fn name(&self) -> &str {
        "NestToKey"
    }

    fn scope(&self) -> ReplacingScope {
        ReplacingScope::Local
    }

    fn config(&self) -> Value {
        json!({"key": self.key})
    }

    fn execute(&self, input: Value) -> Result<Option<Value>, CoreEngineError> {
        let mut nested = Map::new();
        nested.insert(self.key.clone(), input);
        Ok(Some(Value::Object(nested)))
    }
}
