//! Ligadura de un paso con el record: de dónde lee y dónde escribe.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::DEFAULT_KEY;
use crate::errors::CoreEngineError;
use crate::model::{Address, KeyPath, Record};

/// Cómo se integra un resultado en el record.
///
/// - `Inplace`: merge superficial (las claves del resultado pisan).
/// - `Local`: el resultado reemplaza el record completo cuando no hay
///   `set_key`; con `set_key` sólo se escribe esa clave.
/// - `Global`: el record se vacía antes de escribir el resultado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReplacingScope {
    #[default]
    Inplace,
    Local,
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    get: Address,
    set: Option<KeyPath>,
    default_key: KeyPath,
    scope: ReplacingScope,
}

impl Default for Binding {
    fn default() -> Self {
        Self { get: Address::Root,
               set: None,
               default_key: KeyPath::single(DEFAULT_KEY),
               scope: ReplacingScope::Inplace }
    }
}

impl Binding {
    pub fn with_get(mut self, get_key: Option<&str>) -> Result<Self, CoreEngineError> {
        self.get = Address::parse(get_key)?;
        Ok(self)
    }

    pub fn with_set(mut self, set_key: Option<&str>) -> Result<Self, CoreEngineError> {
        self.set = set_key.map(KeyPath::parse).transpose()?;
        Ok(self)
    }

    pub fn with_default_key(mut self, key: &str) -> Result<Self, CoreEngineError> {
        self.default_key = KeyPath::parse(key)?;
        Ok(self)
    }

    /// Clave por defecto tomada literalmente (sin interpretar puntos).
    pub(crate) fn with_literal_default_key(mut self, key: &str) -> Self {
        self.default_key = KeyPath::single(key);
        self
    }

    pub fn with_scope(mut self, scope: ReplacingScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn get(&self) -> &Address {
        &self.get
    }

    pub fn set(&self) -> Option<&KeyPath> {
        self.set.as_ref()
    }

    pub fn default_key(&self) -> &KeyPath {
        &self.default_key
    }

    pub fn scope(&self) -> ReplacingScope {
        self.scope
    }

    pub fn read(&self, record: &Record) -> Result<Value, CoreEngineError> {
        record.read(&self.get)
    }

    /// Integra `result` en el record según `set_key`, `default_key` y scope.
    pub fn write(&self, record: &mut Record, result: Value) -> Result<(), CoreEngineError> {
        match (&self.set, result) {
            (None, Value::Object(map)) => {
                match self.scope {
                    ReplacingScope::Inplace => record.update(map),
                    ReplacingScope::Local | ReplacingScope::Global => record.replace(map),
                }
                Ok(())
            }
            (None, other) => self.write_at(record, &self.default_key, other),
            (Some(path), value) => self.write_at(record, path, value),
        }
    }

    /// Escribe siempre bajo una clave: `set_key` si existe, si no `default_key`.
    pub(crate) fn write_keyed(&self, record: &mut Record, value: Value) -> Result<(), CoreEngineError> {
        let path = self.set.as_ref().unwrap_or(&self.default_key);
        self.write_at(record, path, value)
    }

    fn write_at(&self, record: &mut Record, path: &KeyPath, value: Value) -> Result<(), CoreEngineError> {
        if self.scope == ReplacingScope::Global {
            record.flush();
        }
        record.set_path(path, value)
    }

    pub(crate) fn describe(&self) -> Value {
        json!({
            "get": self.get.to_string(),
            "set": self.set.as_ref().map(|p| p.to_string()),
            "default_key": self.default_key.to_string(),
            "scope": self.scope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(v: Value) -> Record {
        Record::from_value(v).unwrap()
    }

    #[test]
    fn inplace_merges_mapping() {
        let mut r = record(json!({"a": 1, "b": 2}));
        Binding::default().write(&mut r, json!({"b": 3, "c": 4})).unwrap();
        assert_eq!(r.to_value(), json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn local_replaces_record() {
        let mut r = record(json!({"a": 1}));
        let b = Binding::default().with_scope(ReplacingScope::Local);
        b.write(&mut r, json!({"z": 0})).unwrap();
        assert_eq!(r.to_value(), json!({"z": 0}));
    }

    #[test]
    fn scalar_goes_to_default_key() {
        let mut r = record(json!({"a": 1}));
        Binding::default().write(&mut r, json!(42)).unwrap();
        assert_eq!(r.to_value(), json!({"a": 1, "output": 42}));
    }

    #[test]
    fn global_with_set_key_flushes_first() {
        let mut r = record(json!({"a": 1}));
        let b = Binding::default().with_set(Some("res")).unwrap().with_scope(ReplacingScope::Global);
        b.write(&mut r, json!({"x": 1})).unwrap();
        assert_eq!(r.to_value(), json!({"res": {"x": 1}}));
    }

    #[test]
    fn invalid_keys_fail_at_construction() {
        assert!(Binding::default().with_get(Some("a..b")).is_err());
        assert!(Binding::default().with_set(Some("")).is_err());
    }
}
