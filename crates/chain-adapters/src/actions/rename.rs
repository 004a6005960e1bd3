use chain_core::{Action, CoreEngineError, ReplacingScope};
use serde_json::{json, Map, Value};

use super::{expect_mapping, take_key};

const DELIMITER: char = ';';
const POINTER: &str = "<-";

/// Renombra una clave.
#[derive(Debug, Clone)]
pub struct RenameAttribute {
    old_name: String,
    new_name: String,
}

impl RenameAttribute {
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self { old_name: old_name.into(),
               new_name: new_name.into() }
    }
}

impl Action for RenameAttribute {
    fn name(&self) -> &str {
        "RenameAttribute"
    }

    fn scope(&self) -> ReplacingScope {
        ReplacingScope::Local
    }

    fn config(&self) -> Value {
        json!({"old": self.old_name, "new": self.new_name})
    }

    fn execute(&self, input: Value) -> Result<Option<Value>, CoreEngineError> {
        let mut map = expect_mapping(self.name(), input)?;
        rename(&mut map, &self.old_name, &self.new_name)?;
        Ok(Some(Value::Object(map)))
    }
}

/// Renombra varias claves con una consulta `"nuevo<-viejo;otro<-x"`.
///
/// La consulta se valida al construir; las renombres se aplican en orden.
#[derive(Debug, Clone)]
pub struct RenameAttributeQuery {
    query: String,
    pairs: Vec<(String, String)>,
}

impl RenameAttributeQuery {
    pub fn new(query: &str) -> Result<Self, CoreEngineError> {
        let mut pairs = Vec::new();
        for part in query.split(DELIMITER) {
            let sides: Vec<&str> = part.split(POINTER).map(str::trim).collect();
            match sides.as_slice() {
                [new, old] if !new.is_empty() && !old.is_empty() => {
                    pairs.push((new.to_string(), old.to_string()));
                }
                _ => return Err(CoreEngineError::InvalidQuery(part.to_string())),
            }
        }
        Ok(Self { query: query.to_string(),
                  pairs })
    }
}

impl Action for RenameAttributeQuery {
    fn name(&self) -> &str {
        "RenameAttributeQuery"
    }

    fn scope(&self) -> ReplacingScope {
        ReplacingScope::Local
    }

    fn config(&self) -> Value {
        json!({"query": self.query})
    }

    fn execute(&self, input: Value) -> Result<Option<Value>, CoreEngineError> {
        let mut map = expect_mapping(self.name(), input)?;
        for (new, old) in &self.pairs {
            rename(&mut map, old, new)?;
        }
        Ok(Some(Value::Object(map)))
    }
}

fn rename(map: &mut Map<String, Value>, old: &str, new: &str) -> Result<(), CoreEngineError> {
    let value = take_key(map, old)?;
    map.insert(new.to_string(), value);
    Ok(())
}
