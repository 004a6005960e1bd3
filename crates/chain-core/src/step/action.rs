use serde_json::Value;

use super::ReplacingScope;
use crate::constants::DEFAULT_KEY;
use crate::errors::CoreEngineError;

/// Paso liviano de transformación, sin contratos tipados.
///
/// `execute` recibe el valor leído del record y devuelve:
/// - `None`: el record queda sin cambios;
/// - un mapping: se integra según el scope;
/// - cualquier otro valor: se escribe en `default_key`.
pub trait Action {
    fn name(&self) -> &str;

    fn default_key(&self) -> &str {
        DEFAULT_KEY
    }

    fn scope(&self) -> ReplacingScope {
        ReplacingScope::Inplace
    }

    /// Configuración visible de la acción (entra al hash de definición).
    fn config(&self) -> Value {
        Value::Null
    }

    fn execute(&self, input: Value) -> Result<Option<Value>, CoreEngineError>;
}
