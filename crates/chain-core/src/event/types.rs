//! Tipos de evento de una ejecución y estructura `RunEvent`.
//!
//! Cada `Evaluator::run` emite eventos a un `EventStore` append-only bajo un
//! `run_id` propio. El enum `RunEventKind` es el contrato observable del
//! motor: permite inspeccionar qué nodos corrieron, en qué scope y con qué
//! resultado, sin acceder al record.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreEngineError;
use crate::program::{Flow, StatementKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEventKind {
    RunStarted {
        evaluator: String,
        program: String,
        definition_hash: String,
    },
    NodeStarted {
        scope: String,
        index: usize,
        node: String,
        kind: StatementKind,
    },
    NodeFinished {
        scope: String,
        index: usize,
        node: String,
        flow: Flow,
    },
    NodeFailed {
        scope: String,
        index: usize,
        node: String,
        error: CoreEngineError,
    },
    /// Un loop terminó por una señal Break.
    LoopBroken {
        scope: String,
        node: String,
        iterations: usize,
    },
    RunCompleted {
        output_hash: String,
    },
    RunFailed {
        error: CoreEngineError,
    },
}

/// Evento persistido (kind + metadatos de orden/tiempo).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64,
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>,
}

impl RunEventKind {
    /// Letra compacta por variante (útil en asserts de secuencia).
    pub fn variant(&self) -> &'static str {
        match self {
            RunEventKind::RunStarted { .. } => "I",
            RunEventKind::NodeStarted { .. } => "S",
            RunEventKind::NodeFinished { .. } => "F",
            RunEventKind::NodeFailed { .. } => "X",
            RunEventKind::LoopBroken { .. } => "B",
            RunEventKind::RunCompleted { .. } => "C",
            RunEventKind::RunFailed { .. } => "E",
        }
    }
}
