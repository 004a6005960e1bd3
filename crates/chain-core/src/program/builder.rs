//! Builder validado de programas.
//!
//! A diferencia de la composición con `|` (infalible), el builder acepta
//! nodos opcionales y reporta los errores estructurales: programa vacío,
//! primer nodo nulo, nodo nulo en otra posición o input literal fuera de la
//! primera posición.

use super::{Node, Program};
use crate::constants::DEFAULT_PROGRAM_NAME;
use crate::errors::CoreEngineError;
use crate::model::RecordMap;

#[derive(Debug, Default)]
pub struct ProgramBuilder {
    name: Option<String>,
    nodes: Vec<Node>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comienza con datos literales como primer nodo.
    pub fn input(data: RecordMap) -> Self {
        Self { name: None,
               nodes: vec![Node::Input(data)] }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Agrega un nodo que puede estar ausente.
    pub fn push(mut self, node: Option<Node>) -> Result<Self, CoreEngineError> {
        let position = self.nodes.len();
        match node {
            None if position == 0 => Err(CoreEngineError::InvalidFirstNode),
            None => Err(CoreEngineError::NullNode { position }),
            Some(n) if n.is_literal() && position > 0 => Err(CoreEngineError::LiteralNotFirst { position }),
            Some(n) => {
                self.nodes.push(n);
                Ok(self)
            }
        }
    }

    pub fn node(self, node: impl Into<Node>) -> Result<Self, CoreEngineError> {
        self.push(Some(node.into()))
    }

    pub fn build(self) -> Result<Program, CoreEngineError> {
        if self.nodes.is_empty() {
            return Err(CoreEngineError::EmptyProgram);
        }
        Ok(Program { name: self.name.unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_string()),
                     nodes: self.nodes })
    }
}
