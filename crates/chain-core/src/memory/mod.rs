//! Memoria de la corrida: almacenamiento clave → valor que sobrevive entre
//! nodos (y entre corridas del mismo evaluador).
//!
//! Los programas acceden a ella mediante las instrucciones `GetMemory`,
//! `SetMemory` y `DeleteMemory`; los pasos también pueden usarla desde el
//! `ExecutionContext`.

mod instruction;
mod store;

use std::fmt;
use std::path::Path;

use serde_json::Value;

pub use instruction::{DeleteMemory, GetMemory, MemoryGetInstruction, MemoryInstruction, MemoryKey,
                      MemorySetInstruction, SetMemory};
pub use store::{DirStore, InMemoryStore, MemoryStore, SharedStore};

use crate::errors::CoreEngineError;

pub struct Memory {
    store: Box<dyn MemoryStore>,
}

impl Memory {
    /// Memoria vacía en proceso.
    pub fn new() -> Self {
        Self::with_store(InMemoryStore::new())
    }

    pub fn with_store(store: impl MemoryStore + 'static) -> Self {
        Self { store: Box::new(store) }
    }

    /// Memoria en proceso con datos iniciales.
    pub fn with_data(data: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self::with_store(data.into_iter().collect::<InMemoryStore>())
    }

    /// Memoria persistida en un directorio (un JSON por clave).
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self, CoreEngineError> {
        Ok(Self::with_store(DirStore::open(dir)?))
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>, CoreEngineError> {
        self.store.retrieve(key)
    }

    pub fn set(&mut self, key: &str, value: Value) -> Result<(), CoreEngineError> {
        self.store.store(key, value)
    }

    pub fn delete(&mut self, key: &str) -> Result<(), CoreEngineError> {
        self.store.remove(key)
    }

    pub fn flush(&mut self) -> Result<(), CoreEngineError> {
        self.store.clear()
    }

    pub fn contains(&self, key: &str) -> Result<bool, CoreEngineError> {
        Ok(self.get(key)?.is_some())
    }

    pub fn keys(&self) -> Result<Vec<String>, CoreEngineError> {
        self.store.keys()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory").field("store", &self.store).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn with_data_loads_every_pair() {
        let memory = Memory::with_data([("a".to_string(), json!(1)), ("b".to_string(), json!({"x": true}))]);
        assert_eq!(memory.get("a").unwrap(), Some(json!(1)));
        assert_eq!(memory.get("b").unwrap(), Some(json!({"x": true})));
        assert!(memory.contains("b").unwrap());
        assert_eq!(memory.keys().unwrap().len(), 2);
    }
}
