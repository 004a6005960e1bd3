//! Contratos de entrada/salida tipados.
//!
//! Un `IoModel` es un struct serde con la lista de campos que el contrato
//! exige. Decodificar un mapping verifica presencia de campos, tipos (vía
//! serde) y la validación semántica opcional; cualquier fallo se reporta con
//! el nombre del paso y, cuando se conoce, el campo infractor.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::record::kind_of;
use crate::errors::CoreEngineError;

/// Especificación tipada de un mapping de entrada o salida.
pub trait IoModel: Sized + Serialize + DeserializeOwned + Clone {
    /// Campos requeridos (en el orden declarado).
    const FIELDS: &'static [&'static str] = &[];

    /// Validación semántica ligera (sin efectos secundarios). Opcional.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Deserialización desde el mapping ya verificado.
    fn from_mapping(value: Value) -> Result<Self, String> {
        serde_json::from_value(value).map_err(|e| e.to_string())
    }
}

/// Modelo vacío: acepta cualquier mapping y no produce claves.
impl IoModel for () {
    fn from_mapping(_value: Value) -> Result<Self, String> {
        Ok(())
    }
}

/// Lado del contrato que se está verificando.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractSide {
    Input,
    Output,
}

impl ContractSide {
    fn error(self, step: &str, field: Option<&str>, detail: impl Into<String>) -> CoreEngineError {
        let step = step.to_string();
        let field = field.map(str::to_string);
        let detail = detail.into();
        match self {
            ContractSide::Input => CoreEngineError::InputContract { step, field, detail },
            ContractSide::Output => CoreEngineError::OutputContract { step, field, detail },
        }
    }
}

/// Decodifica un mapping en el modelo `T` verificando el contrato.
pub fn decode_contract<T: IoModel>(step: &str, side: ContractSide, value: Value) -> Result<T, CoreEngineError> {
    let map = match &value {
        Value::Object(map) => map,
        other => return Err(side.error(step, None, format!("expected mapping, got {}", kind_of(other)))),
    };
    if let Some(missing) = T::FIELDS.iter().find(|f| !map.contains_key(**f)) {
        return Err(side.error(step, Some(missing), "missing field"));
    }
    let decoded = T::from_mapping(value).map_err(|e| side.error(step, None, e))?;
    decoded.validate().map_err(|e| side.error(step, None, e))?;
    Ok(decoded)
}

/// Serializa el modelo a mapping verificando el contrato. El modelo `()`
/// produce un mapping vacío.
pub fn encode_contract<T: IoModel>(step: &str, side: ContractSide, model: &T) -> Result<Value, CoreEngineError> {
    model.validate().map_err(|e| side.error(step, None, e))?;
    let value = serde_json::to_value(model).map_err(|e| side.error(step, None, e.to_string()))?;
    match value {
        Value::Object(map) => {
            if let Some(missing) = T::FIELDS.iter().find(|f| !map.contains_key(**f)) {
                return Err(side.error(step, Some(missing), "missing field"));
            }
            Ok(Value::Object(map))
        }
        Value::Null => Ok(Value::Object(Default::default())),
        other => Err(side.error(step, None, format!("expected mapping, got {}", kind_of(&other)))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        f: i64,
    }

    impl IoModel for Counter {
        const FIELDS: &'static [&'static str] = &["f"];

        fn validate(&self) -> Result<(), String> {
            if self.f < 0 { Err("f must be non-negative".into()) } else { Ok(()) }
        }
    }

    #[test]
    fn decodes_valid_mapping() {
        let c: Counter = decode_contract("inc", ContractSide::Input, json!({"f": 3, "extra": true})).unwrap();
        assert_eq!(c, Counter { f: 3 });
    }

    #[test]
    fn missing_field_is_named() {
        let err = decode_contract::<Counter>("inc", ContractSide::Input, json!({"g": 1})).unwrap_err();
        assert_eq!(err,
                   CoreEngineError::InputContract { step: "inc".into(),
                                                    field: Some("f".into()),
                                                    detail: "missing field".into() });
    }

    #[test]
    fn wrong_type_and_validation_fail() {
        let err = decode_contract::<Counter>("inc", ContractSide::Input, json!({"f": "x"})).unwrap_err();
        assert!(matches!(err, CoreEngineError::InputContract { .. }));
        let err = encode_contract("inc", ContractSide::Output, &Counter { f: -1 }).unwrap_err();
        assert!(matches!(err, CoreEngineError::OutputContract { .. }));
    }

    #[test]
    fn unit_model_accepts_anything() {
        decode_contract::<()>("noop", ContractSide::Input, json!({"a": 1})).unwrap();
        assert_eq!(encode_contract("noop", ContractSide::Output, &()).unwrap(), json!({}));
    }
}
