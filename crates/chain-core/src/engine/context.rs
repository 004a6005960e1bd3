//! Contexto de ejecución compartido por todos los nodos de una corrida.

use uuid::Uuid;

use crate::event::{EventStore, RunEventKind};
use crate::memory::Memory;

/// Contexto entregado a pasos, condiciones y nodos de control.
///
/// Da acceso a la `Memory` de la corrida y al `EventStore`. El `scope` es un
/// camino legible (`Evaluator/Program/loop`) que identifica dónde se emitió
/// cada evento.
pub struct ExecutionContext<'a> {
    memory: &'a mut Memory,
    events: &'a mut (dyn EventStore + 'static),
    run_id: Uuid,
    scope: String,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(memory: &'a mut Memory, events: &'a mut (dyn EventStore + 'static), run_id: Uuid,
                      scope: impl Into<String>)
                      -> Self {
        Self { memory,
               events,
               run_id,
               scope: scope.into() }
    }

    pub fn memory(&self) -> &Memory {
        &*self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut *self.memory
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Contexto hijo con el scope extendido; comparte memoria y eventos.
    pub(crate) fn child(&mut self, name: &str) -> ExecutionContext<'_> {
        ExecutionContext { memory: &mut *self.memory,
                           events: &mut *self.events,
                           run_id: self.run_id,
                           scope: format!("{}/{}", self.scope, name) }
    }

    pub(crate) fn emit(&mut self, kind: RunEventKind) {
        self.events.append_kind(self.run_id, kind);
    }
}
