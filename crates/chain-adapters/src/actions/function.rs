use std::fmt;

use chain_core::{Action, CoreEngineError, ReplacingScope};
use serde_json::Value;

type Function = Box<dyn Fn(Value) -> Result<Option<Value>, CoreEngineError>>;

/// Ejecuta una función arbitraria sobre la entrada.
///
/// El resultado sigue las reglas de `Action`: `None` no cambia nada, un
/// mapping se integra según el scope y otro valor va a `default_key`.
pub struct ExecuteFunction {
    name: String,
    default_key: String,
    scope: ReplacingScope,
    f: Function,
}

impl ExecuteFunction {
    pub fn new(name: impl Into<String>,
               f: impl Fn(Value) -> Result<Option<Value>, CoreEngineError> + 'static)
               -> Self {
        Self { name: name.into(),
               default_key: chain_core::constants::DEFAULT_KEY.to_string(),
               scope: ReplacingScope::Inplace,
               f: Box::new(f) }
    }

    /// Atajo para funciones que siempre producen un valor.
    pub fn map(name: impl Into<String>, f: impl Fn(Value) -> Value + 'static) -> Self {
        Self::new(name, move |v| Ok(Some(f(v))))
    }

    pub fn default_key(mut self, key: impl Into<String>) -> Self {
        self.default_key = key.into();
        self
    }

    pub fn replace(mut self, scope: ReplacingScope) -> Self {
        self.scope = scope;
        self
    }
}

impl Action for ExecuteFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_key(&self) -> &str {
        &self.default_key
    }

    fn scope(&self) -> ReplacingScope {
        self.scope
    }

    fn execute(&self, input: Value) -> Result<Option<Value>, CoreEngineError> {
        (self.f)(input)
    }
}

impl fmt::Debug for ExecuteFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteFunction").field("name", &self.name).field("scope", &self.scope).finish()
    }
}
