//! Backends de almacenamiento para `Memory`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::errors::CoreEngineError;

/// Almacenamiento clave → valor detrás de una `Memory`.
pub trait MemoryStore: std::fmt::Debug {
    fn retrieve(&self, key: &str) -> Result<Option<Value>, CoreEngineError>;
    fn store(&mut self, key: &str, value: Value) -> Result<(), CoreEngineError>;
    /// Elimina la clave; eliminar una clave ausente no es error.
    fn remove(&mut self, key: &str) -> Result<(), CoreEngineError>;
    fn clear(&mut self) -> Result<(), CoreEngineError>;
    fn keys(&self) -> Result<Vec<String>, CoreEngineError>;
}

/// Store en memoria de proceso, con orden de inserción.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    inner: IndexMap<String, Value>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromIterator<(String, Value)> for InMemoryStore {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { inner: iter.into_iter().collect() }
    }
}

impl MemoryStore for InMemoryStore {
    fn retrieve(&self, key: &str) -> Result<Option<Value>, CoreEngineError> {
        Ok(self.inner.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: Value) -> Result<(), CoreEngineError> {
        self.inner.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreEngineError> {
        self.inner.shift_remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CoreEngineError> {
        self.inner.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CoreEngineError> {
        Ok(self.inner.keys().cloned().collect())
    }
}

/// Store compartible entre evaluadores (clones apuntan al mismo mapa).
#[derive(Debug, Default, Clone)]
pub struct SharedStore {
    inner: Arc<DashMap<String, Value>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryStore for SharedStore {
    fn retrieve(&self, key: &str) -> Result<Option<Value>, CoreEngineError> {
        Ok(self.inner.get(key).map(|v| v.value().clone()))
    }

    fn store(&mut self, key: &str, value: Value) -> Result<(), CoreEngineError> {
        self.inner.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreEngineError> {
        self.inner.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CoreEngineError> {
        self.inner.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CoreEngineError> {
        let mut keys: Vec<String> = self.inner.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }
}

/// Store persistente: un archivo `<key>.json` por clave dentro de un
/// directorio. Las lecturas pasan por un cache en memoria.
#[derive(Debug)]
pub struct DirStore {
    dir: PathBuf,
    cache: IndexMap<String, Value>,
}

impl DirStore {
    /// Abre (creando si falta) el directorio de memoria.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CoreEngineError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        debug!("memory directory opened at {}", dir.display());
        Ok(Self { dir,
                  cache: IndexMap::new() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CoreEngineError> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(CoreEngineError::MemoryIo(format!("invalid memory identifier '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl MemoryStore for DirStore {
    fn retrieve(&self, key: &str) -> Result<Option<Value>, CoreEngineError> {
        if let Some(v) = self.cache.get(key) {
            return Ok(Some(v.clone()));
        }
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read(&path).map_err(|e| io_error(&path, e))?;
        let value = serde_json::from_slice(&raw).map_err(|e| CoreEngineError::MemoryIo(format!("{}: {e}",
                                                                                             path.display())))?;
        Ok(Some(value))
    }

    fn store(&mut self, key: &str, value: Value) -> Result<(), CoreEngineError> {
        let path = self.path_for(key)?;
        let raw = serde_json::to_vec(&value).map_err(|e| CoreEngineError::MemoryIo(e.to_string()))?;
        fs::write(&path, raw).map_err(|e| io_error(&path, e))?;
        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreEngineError> {
        let path = self.path_for(key)?;
        self.cache.shift_remove(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| io_error(&path, e))?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CoreEngineError> {
        self.cache.clear();
        for key in self.keys()? {
            let path = self.path_for(&key)?;
            fs::remove_file(&path).map_err(|e| io_error(&path, e))?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CoreEngineError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error(&self.dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> CoreEngineError {
    CoreEngineError::MemoryIo(format!("{}: {e}", path.display()))
}
