//! Acciones de pegamento: transformaciones pequeñas y sin contrato que
//! preparan o reacomodan el record entre pasos.

mod data;
mod function;
mod logging;
mod rename;

pub use data::{AddData, Flush, NestToKey, SetValue, UnpackValue};
pub use function::ExecuteFunction;
pub use logging::LogAction;
pub use rename::{RenameAttribute, RenameAttributeQuery};

use chain_core::CoreEngineError;
use serde_json::{Map, Value};

/// Exige un mapping como entrada de la acción.
pub(crate) fn expect_mapping(action: &str, value: Value) -> Result<Map<String, Value>, CoreEngineError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CoreEngineError::InvalidInputData(format!("{action}: expected a mapping as input"))),
    }
}

pub(crate) fn take_key(map: &mut Map<String, Value>, key: &str) -> Result<Value, CoreEngineError> {
    map.remove(key).ok_or_else(|| CoreEngineError::KeyNotFound { key: key.to_string() })
}
