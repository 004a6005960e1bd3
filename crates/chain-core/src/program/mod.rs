//! Programas: secuencias ordenadas de nodos.
//!
//! Un `Program` nunca está vacío. Se construye con el operador `|`, con
//! `Program::start(..).then(..)` o, si los nodos pueden faltar, con
//! `ProgramBuilder` / `Program::from_nodes`, que validan la estructura.

mod builder;
mod compose;
mod node;

pub use builder::ProgramBuilder;
pub use compose::compose;
pub use node::{Flow, Node, StatementKind};

use serde_json::{json, Value};

use crate::constants::{DEFAULT_PROGRAM_NAME, ENGINE_VERSION};
use crate::errors::CoreEngineError;
use crate::hashing::hash_value;

#[derive(Debug)]
pub struct Program {
    name: String,
    nodes: Vec<Node>,
}

impl Program {
    /// Programa de un nodo.
    pub fn start(first: impl Into<Node>) -> Self {
        Self { name: DEFAULT_PROGRAM_NAME.to_string(),
               nodes: vec![first.into()] }
    }

    /// Construye desde nodos opcionales validando la estructura.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Option<Node>>) -> Result<Self, CoreEngineError> {
        let mut builder = ProgramBuilder::new();
        for node in nodes {
            builder = builder.push(node)?;
        }
        builder.build()
    }

    pub fn builder() -> ProgramBuilder {
        ProgramBuilder::new()
    }

    /// Agrega un nodo al final.
    pub fn then(mut self, next: impl Into<Node>) -> Self {
        self.nodes.push(next.into());
        self
    }

    /// Variante validada de `then` para nodos que pueden faltar.
    pub fn try_then(self, next: Option<Node>) -> Result<Self, CoreEngineError> {
        let position = self.nodes.len();
        match next {
            None => Err(CoreEngineError::NullNode { position }),
            Some(n) if n.is_literal() => Err(CoreEngineError::LiteralNotFirst { position }),
            Some(n) => Ok(self.then(n)),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Siempre `false`: un programa tiene al menos un nodo.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn describe(&self) -> Value {
        json!({
            "name": self.name,
            "nodes": self.nodes.iter().map(Node::describe).collect::<Vec<_>>(),
        })
    }

    /// Hash estable de la estructura del programa y la versión del motor.
    pub fn definition_hash(&self) -> String {
        hash_value(&json!({"engine_version": ENGINE_VERSION, "program": self.describe()}))
    }
}

/// Conversión a programa: un programa queda igual, cualquier otro nodo se
/// convierte en un programa de un solo nodo.
pub trait IntoProgram {
    fn into_program(self) -> Program;
}

impl<T: Into<Node>> IntoProgram for T {
    fn into_program(self) -> Program {
        match self.into() {
            Node::Pipeline(p) => p,
            other => Program::start(other),
        }
    }
}
