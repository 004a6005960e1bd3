//! Instrucciones de memoria componibles dentro de un programa.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Memory;
use crate::errors::CoreEngineError;
use crate::model::{KeyPath, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemoryGetInstruction {
    /// Copia el valor al record.
    #[default]
    Get,
    /// Copia el valor y lo elimina de la memoria.
    Pop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemorySetInstruction {
    /// Guarda una copia; el record no cambia.
    #[default]
    Set,
    /// Guarda y elimina el origen del record.
    Move,
}

/// Par (clave en memoria, clave en el record). Un `&str` usa el mismo nombre
/// en ambos lados; una tupla permite renombrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryKey {
    pub memory: String,
    pub record: String,
}

impl From<&str> for MemoryKey {
    fn from(key: &str) -> Self {
        Self { memory: key.to_string(),
               record: key.to_string() }
    }
}

impl From<String> for MemoryKey {
    fn from(key: String) -> Self {
        Self { record: key.clone(),
               memory: key }
    }
}

impl From<(&str, &str)> for MemoryKey {
    fn from((memory, record): (&str, &str)) -> Self {
        Self { memory: memory.to_string(),
               record: record.to_string() }
    }
}

/// Copia claves de memoria al record.
///
/// Una clave ausente toma su default configurado, o `null`; en modo
/// `strict` una clave ausente sin default es `MemoryKeyNotFound`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetMemory {
    keys: Vec<MemoryKey>,
    defaults: IndexMap<String, Value>,
    instruction: MemoryGetInstruction,
    strict: bool,
}

impl GetMemory {
    pub fn new<K: Into<MemoryKey>>(keys: impl IntoIterator<Item = K>, instruction: MemoryGetInstruction) -> Self {
        Self { keys: keys.into_iter().map(Into::into).collect(),
               defaults: IndexMap::new(),
               instruction,
               strict: false }
    }

    /// Default para una clave de memoria ausente.
    pub fn with_default(mut self, memory_key: &str, value: Value) -> Self {
        self.defaults.insert(memory_key.to_string(), value);
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn keys(&self) -> &[MemoryKey] {
        &self.keys
    }

    pub(crate) fn apply(&self, record: &mut Record, memory: &mut Memory) -> Result<(), CoreEngineError> {
        for key in &self.keys {
            let value = match memory.get(&key.memory)? {
                Some(v) => v,
                None => match self.defaults.get(&key.memory) {
                    Some(d) => d.clone(),
                    None if self.strict => {
                        return Err(CoreEngineError::MemoryKeyNotFound { key: key.memory.clone() })
                    }
                    None => Value::Null,
                },
            };
            record.set(key.record.clone(), value);
            if self.instruction == MemoryGetInstruction::Pop {
                memory.delete(&key.memory)?;
            }
        }
        Ok(())
    }

    pub(crate) fn describe(&self) -> Value {
        json!({"keys": self.keys, "defaults": self.defaults, "instruction": self.instruction, "strict": self.strict})
    }
}

/// Guarda un valor del record (o el record completo) en memoria.
#[derive(Debug, Clone, PartialEq)]
pub struct SetMemory {
    memory_key: String,
    record_key: Option<KeyPath>,
    instruction: MemorySetInstruction,
}

impl SetMemory {
    /// `record_key = None` guarda el record completo; con `Move` el record
    /// queda vacío.
    pub fn new(memory_key: &str, record_key: Option<&str>, instruction: MemorySetInstruction)
               -> Result<Self, CoreEngineError> {
        Ok(Self { memory_key: memory_key.to_string(),
                  record_key: record_key.map(KeyPath::parse).transpose()?,
                  instruction })
    }

    pub fn memory_key(&self) -> &str {
        &self.memory_key
    }

    pub(crate) fn apply(&self, record: &mut Record, memory: &mut Memory) -> Result<(), CoreEngineError> {
        match (&self.record_key, self.instruction) {
            (None, MemorySetInstruction::Set) => memory.set(&self.memory_key, record.to_value()),
            (None, MemorySetInstruction::Move) => {
                memory.set(&self.memory_key, record.to_value())?;
                record.flush();
                Ok(())
            }
            (Some(path), MemorySetInstruction::Set) => memory.set(&self.memory_key, record.get_path(path)?.clone()),
            (Some(path), MemorySetInstruction::Move) => {
                let value = record.remove_path(path)?;
                memory.set(&self.memory_key, value)
            }
        }
    }

    pub(crate) fn describe(&self) -> Value {
        json!({
            "memory_key": self.memory_key,
            "record_key": self.record_key.as_ref().map(|p| p.to_string()),
            "instruction": self.instruction,
        })
    }
}

/// Elimina claves de memoria; sin claves, vacía la memoria completa.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeleteMemory {
    keys: Option<Vec<String>>,
}

impl DeleteMemory {
    /// `None` elimina todas las claves.
    pub fn new<K: Into<String>>(keys: Option<Vec<K>>) -> Self {
        Self { keys: keys.map(|ks| ks.into_iter().map(Into::into).collect()) }
    }

    pub fn keys<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> Self {
        Self { keys: Some(keys.into_iter().map(Into::into).collect()) }
    }

    pub fn all() -> Self {
        Self { keys: None }
    }

    pub(crate) fn apply(&self, memory: &mut Memory) -> Result<(), CoreEngineError> {
        match &self.keys {
            Some(keys) => {
                for k in keys {
                    memory.delete(k)?;
                }
                Ok(())
            }
            None => {
                debug!("flushing memory");
                memory.flush()
            }
        }
    }

    pub(crate) fn describe(&self) -> Value {
        json!({ "keys": self.keys })
    }
}

/// Instrucción de memoria como nodo de programa.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryInstruction {
    Get(GetMemory),
    Set(SetMemory),
    Delete(DeleteMemory),
}

impl MemoryInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            MemoryInstruction::Get(_) => "GetMemory",
            MemoryInstruction::Set(_) => "SetMemory",
            MemoryInstruction::Delete(_) => "DeleteMemory",
        }
    }

    pub(crate) fn apply(&self, record: &mut Record, memory: &mut Memory) -> Result<(), CoreEngineError> {
        match self {
            MemoryInstruction::Get(i) => i.apply(record, memory),
            MemoryInstruction::Set(i) => i.apply(record, memory),
            MemoryInstruction::Delete(i) => i.apply(memory),
        }
    }

    pub(crate) fn describe(&self) -> Value {
        match self {
            MemoryInstruction::Get(i) => i.describe(),
            MemoryInstruction::Set(i) => i.describe(),
            MemoryInstruction::Delete(i) => i.describe(),
        }
    }
}

impl From<GetMemory> for MemoryInstruction {
    fn from(i: GetMemory) -> Self {
        MemoryInstruction::Get(i)
    }
}

impl From<SetMemory> for MemoryInstruction {
    fn from(i: SetMemory) -> Self {
        MemoryInstruction::Set(i)
    }
}

impl From<DeleteMemory> for MemoryInstruction {
    fn from(i: DeleteMemory) -> Self {
        MemoryInstruction::Delete(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(v: Value) -> Record {
        Record::from_value(v).unwrap()
    }

    #[test]
    fn pop_removes_and_later_get_uses_default() {
        let mut mem = Memory::with_data([("test".to_string(), json!("OK"))]);
        let mut r = Record::new();
        GetMemory::new(["test"], MemoryGetInstruction::Pop).apply(&mut r, &mut mem).unwrap();
        assert_eq!(r.get("test").unwrap(), &json!("OK"));
        assert!(!mem.contains("test").unwrap());

        let mut r2 = Record::new();
        GetMemory::new(["test"], MemoryGetInstruction::Get).with_default("test", json!("NONE"))
                                                           .apply(&mut r2, &mut mem)
                                                           .unwrap();
        assert_eq!(r2.get("test").unwrap(), &json!("NONE"));
    }

    #[test]
    fn strict_get_fails_on_missing_key() {
        let mut mem = Memory::new();
        let err = GetMemory::new(["nope"], MemoryGetInstruction::Get).strict()
                                                                     .apply(&mut Record::new(), &mut mem)
                                                                     .unwrap_err();
        assert_eq!(err, CoreEngineError::MemoryKeyNotFound { key: "nope".into() });
    }

    #[test]
    fn renamed_key_lands_under_record_name() {
        let mut mem = Memory::with_data([("m".to_string(), json!(1))]);
        let mut r = Record::new();
        GetMemory::new([("m", "r")], MemoryGetInstruction::Get).apply(&mut r, &mut mem).unwrap();
        assert_eq!(r.to_value(), json!({"r": 1}));
    }

    #[test]
    fn move_whole_record_flushes_it() {
        let mut mem = Memory::new();
        let mut r = record(json!({"a": 1, "b": 2}));
        SetMemory::new("snap", None, MemorySetInstruction::Move).unwrap().apply(&mut r, &mut mem).unwrap();
        assert!(r.is_empty());
        assert_eq!(mem.get("snap").unwrap(), Some(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn move_single_key_removes_it() {
        let mut mem = Memory::new();
        let mut r = record(json!({"data": {"x": 1}, "keep": true}));
        SetMemory::new("test", Some("data"), MemorySetInstruction::Move).unwrap().apply(&mut r, &mut mem).unwrap();
        assert_eq!(r.to_value(), json!({"keep": true}));
        assert_eq!(mem.get("test").unwrap(), Some(json!({"x": 1})));
    }

    #[test]
    fn delete_without_keys_flushes() {
        let mut mem = Memory::with_data([("a".to_string(), json!(1)), ("b".to_string(), json!(2))]);
        DeleteMemory::keys(["a"]).apply(&mut mem).unwrap();
        assert_eq!(mem.keys().unwrap(), vec!["b".to_string()]);
        DeleteMemory::all().apply(&mut mem).unwrap();
        assert!(mem.keys().unwrap().is_empty());
    }
}
