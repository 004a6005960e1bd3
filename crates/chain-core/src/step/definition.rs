use serde_json::{json, Value};

use super::ReplacingScope;
use crate::engine::ExecutionContext;
use crate::errors::CoreEngineError;
use crate::hashing::hash_value;

/// Interfaz neutral de un paso ejecutable, usada por el intérprete.
///
/// Trabaja con mappings JSON. La mayoría de los pasos implementan
/// [`Executable`](super::Executable) y obtienen esta interfaz por el
/// adaptador genérico; implementarla a mano sirve para pasos dinámicos.
pub trait StepDefinition {
    /// Nombre estable, usado en errores y eventos.
    fn name(&self) -> &str;

    /// Scope de reemplazo por defecto.
    fn scope(&self) -> ReplacingScope {
        ReplacingScope::Inplace
    }

    /// Configuración determinista del paso (entra al hash de definición).
    fn base_config(&self) -> Value {
        Value::Null
    }

    fn input_fields(&self) -> &'static [&'static str] {
        &[]
    }

    fn output_fields(&self) -> &'static [&'static str] {
        &[]
    }

    /// Ejecuta sobre un mapping y devuelve el mapping de salida.
    fn execute(&self, input: Value, ctx: &mut ExecutionContext<'_>) -> Result<Value, CoreEngineError>;

    /// Ejecución sobre una colección. Por defecto, ítem a ítem en orden.
    fn execute_batch(&self, inputs: Vec<Value>, ctx: &mut ExecutionContext<'_>) -> Result<Vec<Value>, CoreEngineError> {
        inputs.into_iter().map(|input| self.execute(input, ctx)).collect()
    }

    fn definition_hash(&self) -> String {
        hash_value(&json!({
            "name": self.name(),
            "config": self.base_config(),
            "input": self.input_fields(),
            "output": self.output_fields(),
        }))
    }
}
