use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::ReplacingScope;
use crate::engine::ExecutionContext;
use crate::errors::CoreEngineError;
use crate::model::{decode_contract, encode_contract, ContractSide, IoModel};

/// Interfaz de alto nivel para definir pasos con tipos fuertes
/// (Config / Input / Output).
///
/// Implementadores escriben `invoke` con tipos concretos; un adaptador
/// (abajo) valida los contratos y expone la interfaz neutra `StepDefinition`.
pub trait Executable {
    /// Configuración serializable del paso (entra al hash de definición).
    type Config: DeserializeOwned + Serialize + Clone + Default;
    type Input: IoModel;
    type Output: IoModel;

    fn name(&self) -> &str;

    fn config(&self) -> Self::Config {
        Default::default()
    }

    fn scope(&self) -> ReplacingScope {
        ReplacingScope::Inplace
    }

    fn invoke(&self, input: Self::Input, ctx: &mut ExecutionContext<'_>) -> Result<Self::Output, CoreEngineError>;

    /// Variante por lotes; por defecto invoca ítem a ítem.
    fn invoke_batch(&self, inputs: Vec<Self::Input>, ctx: &mut ExecutionContext<'_>)
                    -> Result<Vec<Self::Output>, CoreEngineError> {
        inputs.into_iter().map(|input| self.invoke(input, ctx)).collect()
    }
}

// -------------------------------------------------------------
// Adaptador: cualquier `Executable` implementa `StepDefinition` neutro.
// -------------------------------------------------------------
impl<T> crate::step::StepDefinition for T where T: Executable + 'static
{
    fn name(&self) -> &str {
        <T as Executable>::name(self)
    }

    fn scope(&self) -> ReplacingScope {
        <T as Executable>::scope(self)
    }

    fn base_config(&self) -> Value {
        serde_json::to_value(<T as Executable>::config(self)).unwrap_or(Value::Null)
    }

    fn input_fields(&self) -> &'static [&'static str] {
        <T::Input as IoModel>::FIELDS
    }

    fn output_fields(&self) -> &'static [&'static str] {
        <T::Output as IoModel>::FIELDS
    }

    fn execute(&self, input: Value, ctx: &mut ExecutionContext<'_>) -> Result<Value, CoreEngineError> {
        let name = <T as Executable>::name(self);
        let typed = decode_contract::<T::Input>(name, ContractSide::Input, input)?;
        let out = self.invoke(typed, ctx).map_err(|e| CoreEngineError::step_failed(name, e))?;
        encode_contract(name, ContractSide::Output, &out)
    }

    fn execute_batch(&self, inputs: Vec<Value>, ctx: &mut ExecutionContext<'_>) -> Result<Vec<Value>, CoreEngineError> {
        let name = <T as Executable>::name(self);
        let typed = inputs.into_iter()
                          .map(|v| decode_contract::<T::Input>(name, ContractSide::Input, v))
                          .collect::<Result<Vec<_>, _>>()?;
        let outs = self.invoke_batch(typed, ctx).map_err(|e| CoreEngineError::step_failed(name, e))?;
        outs.iter().map(|o| encode_contract(name, ContractSide::Output, o)).collect()
    }
}
