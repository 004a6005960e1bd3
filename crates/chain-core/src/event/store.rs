use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use log::warn;
use uuid::Uuid;

use super::{RunEvent, RunEventKind};

/// Corridas conservadas por defecto en `InMemoryEventStore`.
pub const DEFAULT_RETAINED_RUNS: usize = 16;
/// Eventos conservados por corrida en `InMemoryEventStore`.
pub const DEFAULT_MAX_EVENTS_PER_RUN: usize = 4096;

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, run_id: Uuid, kind: RunEventKind) -> RunEvent;
    /// Lista eventos de una ejecución (orden ascendente por seq).
    fn list(&self, run_id: Uuid) -> Vec<RunEvent>;
}

#[derive(Debug, Default)]
struct RunLog {
    events: Vec<RunEvent>,
    appended: u64,
}

/// Store en memoria con retención acotada.
///
/// Conserva las últimas `retained_runs` corridas (la más vieja se descarta al
/// empezar una nueva) y hasta `max_events_per_run` eventos por corrida. Pasado
/// ese tope se descartan los eventos intermedios; `RunCompleted` y `RunFailed`
/// siempre se guardan. `seq` sigue contando los descartados, así que un hueco
/// en la secuencia indica truncamiento.
#[derive(Debug)]
pub struct InMemoryEventStore {
    runs: HashMap<Uuid, RunLog>,
    order: VecDeque<Uuid>,
    retained_runs: usize,
    max_events_per_run: usize,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_RETAINED_RUNS, DEFAULT_MAX_EVENTS_PER_RUN)
    }
}

impl InMemoryEventStore {
    /// Límites explícitos; ambos se llevan a un mínimo de 1.
    pub fn with_limits(retained_runs: usize, max_events_per_run: usize) -> Self {
        Self { runs: HashMap::new(),
               order: VecDeque::new(),
               retained_runs: retained_runs.max(1),
               max_events_per_run: max_events_per_run.max(1) }
    }

    /// Corridas actualmente conservadas.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Total de eventos conservados entre todas las corridas.
    pub fn event_count(&self) -> usize {
        self.runs.values().map(|log| log.events.len()).sum()
    }

    fn log_for(&mut self, run_id: Uuid) -> &mut RunLog {
        if !self.runs.contains_key(&run_id) {
            while self.order.len() >= self.retained_runs {
                if let Some(oldest) = self.order.pop_front() {
                    self.runs.remove(&oldest);
                }
            }
            self.order.push_back(run_id);
        }
        self.runs.entry(run_id).or_default()
    }
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, run_id: Uuid, kind: RunEventKind) -> RunEvent {
        let cap = self.max_events_per_run;
        let log = self.log_for(run_id);
        let ev = RunEvent { seq: log.appended,
                            run_id,
                            kind,
                            ts: Utc::now() };
        log.appended += 1;
        let terminal = matches!(ev.kind, RunEventKind::RunCompleted { .. } | RunEventKind::RunFailed { .. });
        if log.events.len() < cap || terminal {
            log.events.push(ev.clone());
        } else if log.events.len() == cap && log.appended == cap as u64 + 1 {
            warn!("run {run_id}: event cap of {cap} reached, dropping intermediate events");
        }
        ev
    }

    fn list(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.runs.get(&run_id).map(|log| log.events.clone()).unwrap_or_default()
    }
}

/// Store que descarta todo; para ejecuciones donde el rastro no interesa
/// (p.ej. loops con muchas iteraciones).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventStore;

impl EventStore for NullEventStore {
    fn append_kind(&mut self, run_id: Uuid, kind: RunEventKind) -> RunEvent {
        RunEvent { seq: 0,
                   run_id,
                   kind,
                   ts: Utc::now() }
    }

    fn list(&self, _run_id: Uuid) -> Vec<RunEvent> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> RunEventKind {
        RunEventKind::RunStarted { evaluator: "e".into(),
                                   program: "p".into(),
                                   definition_hash: "h".into() }
    }

    #[test]
    fn oldest_run_is_evicted() {
        let mut store = InMemoryEventStore::with_limits(2, 10);
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            store.append_kind(*id, started());
        }
        assert_eq!(store.run_count(), 2);
        assert!(store.list(ids[0]).is_empty());
        assert_eq!(store.list(ids[2]).len(), 1);
    }

    #[test]
    fn cap_keeps_terminal_event_and_counts_seq() {
        let mut store = InMemoryEventStore::with_limits(1, 3);
        let id = Uuid::new_v4();
        for _ in 0..10 {
            store.append_kind(id, started());
        }
        store.append_kind(id, RunEventKind::RunCompleted { output_hash: "x".into() });
        let events = store.list(id);
        assert_eq!(events.len(), 4);
        assert_eq!(events.iter().map(|e| e.seq).collect::<Vec<_>>(), vec![0, 1, 2, 10]);
        assert_eq!(events[3].kind.variant(), "C");
    }
}
