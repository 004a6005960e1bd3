//! Errores del motor de pipelines.
//!
//! Un único enum cubre errores estructurales (construcción de programas),
//! de contrato (validación de entrada/salida de un paso), de direccionamiento
//! y de ejecución. Los errores de ejecución se envuelven en capas
//! (`StepFailed` → `ProgramFailed` → `EvaluatorFailed`) conservando siempre la
//! causa original, accesible vía [`CoreEngineError::root_cause`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreEngineError {
    #[error("program has no nodes")] EmptyProgram,
    #[error("first node should be a step or a literal input")] InvalidFirstNode,
    #[error("node at position {position} can not be null")] NullNode { position: usize },
    #[error("literal input only allowed as first node (found at position {position})")]
    LiteralNotFirst { position: usize },
    #[error("invalid address '{expr}': {reason}")] InvalidAddress { expr: String, reason: String },
    #[error("invalid transformation query: '{0}'")] InvalidQuery(String),
    #[error("input contract violated in {step}{}: {detail}", field_note(.field))]
    InputContract { step: String, field: Option<String>, detail: String },
    #[error("output contract violated in {step}{}: {detail}", field_note(.field))]
    OutputContract { step: String, field: Option<String>, detail: String },
    #[error("invalid input data: {0}")] InvalidInputData(String),
    #[error("attribute '{key}' not found in record")] KeyNotFound { key: String },
    #[error("memory identifier '{key}' not found")] MemoryKeyNotFound { key: String },
    #[error("memory backend: {0}")] MemoryIo(String),
    #[error("{0}")] Custom(String),
    #[error("executable {step} failed: {source}")]
    StepFailed { step: String, source: Box<CoreEngineError> },
    #[error("action {action} failed: {source}")]
    ActionFailed { action: String, source: Box<CoreEngineError> },
    #[error("program {program} failed at node #{index} ({node}): {source}")]
    ProgramFailed { program: String, index: usize, node: String, source: Box<CoreEngineError> },
    #[error("evaluator {evaluator} failed: {source}")]
    EvaluatorFailed { evaluator: String, source: Box<CoreEngineError> },
    #[error("internal: {0}")] Internal(String),
}

fn field_note(field: &Option<String>) -> String {
    match field {
        Some(f) => format!(" (field '{f}')"),
        None => String::new(),
    }
}

/// Clasificación gruesa de un error, útil para decidir cómo reportarlo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    Structural,
    Contract,
    Address,
    Memory,
    Runtime,
}

impl CoreEngineError {
    /// Error libre lanzado por el cuerpo de un paso.
    pub fn custom(msg: impl Into<String>) -> Self {
        CoreEngineError::Custom(msg.into())
    }

    pub fn step_failed(step: impl Into<String>, source: CoreEngineError) -> Self {
        CoreEngineError::StepFailed { step: step.into(),
                                      source: Box::new(source) }
    }

    pub fn action_failed(action: impl Into<String>, source: CoreEngineError) -> Self {
        CoreEngineError::ActionFailed { action: action.into(),
                                        source: Box::new(source) }
    }

    /// Desciende por las capas de envoltura hasta la causa original.
    pub fn root_cause(&self) -> &CoreEngineError {
        match self {
            CoreEngineError::StepFailed { source, .. }
            | CoreEngineError::ActionFailed { source, .. }
            | CoreEngineError::ProgramFailed { source, .. }
            | CoreEngineError::EvaluatorFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Clase de la causa original (las envolturas no cuentan).
    pub fn class(&self) -> ErrorClass {
        match self.root_cause() {
            CoreEngineError::EmptyProgram
            | CoreEngineError::InvalidFirstNode
            | CoreEngineError::NullNode { .. }
            | CoreEngineError::LiteralNotFirst { .. } => ErrorClass::Structural,
            CoreEngineError::InputContract { .. }
            | CoreEngineError::OutputContract { .. }
            | CoreEngineError::InvalidInputData(_) => ErrorClass::Contract,
            CoreEngineError::InvalidAddress { .. }
            | CoreEngineError::InvalidQuery(_)
            | CoreEngineError::KeyNotFound { .. } => ErrorClass::Address,
            CoreEngineError::MemoryKeyNotFound { .. } | CoreEngineError::MemoryIo(_) => ErrorClass::Memory,
            _ => ErrorClass::Runtime,
        }
    }

    /// `true` si el error ya fue envuelto por un programa o un evaluador.
    pub(crate) fn is_located(&self) -> bool {
        matches!(self,
                 CoreEngineError::ProgramFailed { .. } | CoreEngineError::EvaluatorFailed { .. })
    }
}
