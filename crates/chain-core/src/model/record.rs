//! `Record`: el mapping mutable que fluye por un programa.
//!
//! Conserva el orden de inserción de las claves (IndexMap). Todas las
//! mutaciones de un nodo se aplican in-place; los nodos posteriores observan
//! el estado resultante.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::address::{Address, KeyPath};
use crate::errors::CoreEngineError;

/// Mapping ordenado clave → valor.
pub type RecordMap = IndexMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    state: RecordMap,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(state: RecordMap) -> Self {
        Self { state }
    }

    /// Construye un record desde un objeto JSON. `null` se trata como record
    /// vacío; cualquier otro valor no-objeto es `InvalidInputData`.
    pub fn from_value(value: Value) -> Result<Self, CoreEngineError> {
        match value {
            Value::Object(map) => Ok(Self { state: map.into_iter().collect() }),
            Value::Null => Ok(Self::new()),
            other => Err(CoreEngineError::InvalidInputData(format!("expected mapping, got {}",
                                                                   kind_of(&other)))),
        }
    }

    pub fn get(&self, key: &str) -> Result<&Value, CoreEngineError> {
        self.state.get(key).ok_or_else(|| CoreEngineError::KeyNotFound { key: key.to_string() })
    }

    pub fn get_opt(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.state.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.state.shift_remove(key)
    }

    /// Merge superficial: las claves de `other` pisan a las existentes.
    pub fn update(&mut self, other: impl IntoIterator<Item = (String, Value)>) {
        for (k, v) in other {
            self.state.insert(k, v);
        }
    }

    /// Reemplaza el contenido completo.
    pub fn replace(&mut self, other: impl IntoIterator<Item = (String, Value)>) {
        self.state = other.into_iter().collect();
    }

    pub fn flush(&mut self) {
        self.state.clear();
    }

    /// Devuelve una copia del valor en `key`.
    pub fn extract(&self, key: &str) -> Result<Value, CoreEngineError> {
        self.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.state.keys()
    }

    pub fn as_map(&self) -> &RecordMap {
        &self.state
    }

    pub fn into_map(self) -> RecordMap {
        self.state
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.state.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.state.into_iter().collect())
    }

    /// Lee una dirección: la raíz devuelve el record completo como objeto.
    pub fn read(&self, address: &Address) -> Result<Value, CoreEngineError> {
        match address {
            Address::Root => Ok(self.to_value()),
            Address::Path(path) => self.get_path(path).cloned(),
        }
    }

    pub fn get_path(&self, path: &KeyPath) -> Result<&Value, CoreEngineError> {
        let not_found = || CoreEngineError::KeyNotFound { key: path.to_string() };
        let mut cursor = self.state.get(path.head()).ok_or_else(not_found)?;
        for seg in &path.segments()[1..] {
            cursor = match cursor {
                Value::Object(map) => map.get(seg),
                Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            }.ok_or_else(not_found)?;
        }
        Ok(cursor)
    }

    /// Escribe en un camino creando objetos intermedios cuando faltan.
    pub fn set_path(&mut self, path: &KeyPath, value: Value) -> Result<(), CoreEngineError> {
        let Some((last, parents)) = path.segments().split_last() else {
            return Err(CoreEngineError::InvalidAddress { expr: path.to_string(),
                                                         reason: "empty address".into() });
        };
        if parents.is_empty() {
            self.state.insert(last.clone(), value);
            return Ok(());
        }
        let mut cursor = self.state.entry(parents[0].clone()).or_insert_with(|| Value::Object(Map::new()));
        for seg in &parents[1..] {
            cursor = descend_or_create(cursor, seg, path)?;
        }
        match cursor {
            Value::Object(map) => {
                map.insert(last.clone(), value);
                Ok(())
            }
            Value::Array(items) => {
                let idx = array_index(last, items.len(), path)?;
                items[idx] = value;
                Ok(())
            }
            other => Err(not_container(path, other)),
        }
    }

    /// Elimina y devuelve el valor en un camino.
    pub fn remove_path(&mut self, path: &KeyPath) -> Result<Value, CoreEngineError> {
        let not_found = || CoreEngineError::KeyNotFound { key: path.to_string() };
        let Some((last, parents)) = path.segments().split_last() else {
            return Err(not_found());
        };
        if parents.is_empty() {
            return self.state.shift_remove(last).ok_or_else(not_found);
        }
        let mut cursor = self.state.get_mut(&parents[0]).ok_or_else(not_found)?;
        for seg in &parents[1..] {
            cursor = match cursor {
                Value::Object(map) => map.get_mut(seg),
                Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
                _ => None,
            }.ok_or_else(not_found)?;
        }
        match cursor {
            Value::Object(map) => map.remove(last).ok_or_else(not_found),
            Value::Array(items) => {
                let idx = array_index(last, items.len(), path)?;
                Ok(items.remove(idx))
            }
            _ => Err(not_found()),
        }
    }
}

impl From<RecordMap> for Record {
    fn from(state: RecordMap) -> Self {
        Self { state }
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        r.into_value()
    }
}

fn descend_or_create<'v>(cursor: &'v mut Value, seg: &str, path: &KeyPath) -> Result<&'v mut Value, CoreEngineError> {
    match cursor {
        Value::Object(map) => Ok(map.entry(seg.to_string()).or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => {
            let idx = array_index(seg, items.len(), path)?;
            Ok(&mut items[idx])
        }
        other => Err(not_container(path, other)),
    }
}

fn array_index(seg: &str, len: usize, path: &KeyPath) -> Result<usize, CoreEngineError> {
    match seg.parse::<usize>() {
        Ok(i) if i < len => Ok(i),
        _ => Err(CoreEngineError::KeyNotFound { key: path.to_string() }),
    }
}

fn not_container(path: &KeyPath, found: &Value) -> CoreEngineError {
    CoreEngineError::InvalidAddress { expr: path.to_string(),
                                      reason: format!("can not descend into {}", kind_of(found)) }
}

pub(crate) fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

/// Merge shallow: las claves de `b` pisan las de `a` cuando ambos son objetos.
/// Cuando alguno de los dos no es objeto, `b` tiene precedencia.
pub fn merge_json(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Object(ma), Value::Object(mb)) => {
            let mut out = ma.clone();
            for (k, v) in mb {
                out.insert(k.clone(), v.clone());
            }
            Value::Object(out)
        }
        (_, other) => other.clone(),
    }
}
