//! Direccionamiento dentro de un `Record`.
//!
//! Una dirección es la raíz (todo el record) o un camino de claves separado
//! por puntos (`"data.items.0"`). Los segmentos numéricos indexan arrays. Las
//! direcciones se validan al construirse, nunca durante la ejecución.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CoreEngineError;

/// Camino de claves no vacío. Se serializa como su expresión (`"a.b"`) y al
/// deserializar pasa por [`KeyPath::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parsea una expresión `a.b.c`. Rechaza expresiones vacías, segmentos
    /// vacíos (`a..b`) y segmentos con espacios en los extremos.
    pub fn parse(expr: &str) -> Result<Self, CoreEngineError> {
        let invalid = |reason: &str| CoreEngineError::InvalidAddress { expr: expr.to_string(),
                                                                       reason: reason.to_string() };
        if expr.is_empty() {
            return Err(invalid("empty address"));
        }
        let mut segments = Vec::new();
        for seg in expr.split('.') {
            if seg.is_empty() {
                return Err(invalid("empty segment"));
            }
            if seg.trim() != seg {
                return Err(invalid("segment has surrounding whitespace"));
            }
            segments.push(seg.to_string());
        }
        Ok(Self { segments })
    }

    /// Camino de un solo segmento, sin interpretar puntos.
    pub(crate) fn single(key: &str) -> Self {
        Self { segments: vec![key.to_string()] }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Primer segmento: la clave de nivel superior del record.
    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    pub fn is_single(&self) -> bool {
        self.segments.len() == 1
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl TryFrom<String> for KeyPath {
    type Error = CoreEngineError;

    fn try_from(expr: String) -> Result<Self, Self::Error> {
        KeyPath::parse(&expr)
    }
}

impl From<KeyPath> for String {
    fn from(path: KeyPath) -> Self {
        path.to_string()
    }
}

/// Origen de lectura de un paso: el record completo o un camino.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Address {
    #[default]
    Root,
    Path(KeyPath),
}

impl Address {
    /// `None` → raíz; `Some(expr)` → camino validado.
    pub fn parse(expr: Option<&str>) -> Result<Self, CoreEngineError> {
        match expr {
            None => Ok(Address::Root),
            Some(e) => Ok(Address::Path(KeyPath::parse(e)?)),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Root => write!(f, "<root>"),
            Address::Path(p) => write!(f, "{p}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dotted_path() {
        let p = KeyPath::parse("data.items.0").unwrap();
        assert_eq!(p.segments(), &["data", "items", "0"]);
        assert_eq!(p.head(), "data");
        assert_eq!(p.to_string(), "data.items.0");
    }

    #[test]
    fn deserialization_goes_through_parse() {
        let p: KeyPath = serde_json::from_value(serde_json::json!("a.b")).unwrap();
        assert_eq!(p.segments(), &["a", "b"]);
        assert_eq!(serde_json::to_value(&p).unwrap(), serde_json::json!("a.b"));
        for bad in [serde_json::json!(""), serde_json::json!("a..b"), serde_json::json!({"segments": []})] {
            assert!(serde_json::from_value::<KeyPath>(bad).is_err());
        }
    }

    #[test]
    fn malformed_paths_rejected() {
        for bad in ["", "a..b", ".a", "a.", " a", "a. b"] {
            let err = KeyPath::parse(bad).unwrap_err();
            assert!(matches!(err, CoreEngineError::InvalidAddress { .. }), "{bad:?}");
        }
    }

    #[test]
    fn none_is_root() {
        assert_eq!(Address::parse(None).unwrap(), Address::Root);
    }
}
