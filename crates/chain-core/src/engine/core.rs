//! `Evaluator`: punto de entrada para ejecutar un programa.

use log::{debug, error, info};
use serde_json::Value;
use uuid::Uuid;

use super::{interpreter, ExecutionContext};
use crate::constants::DEFAULT_EVALUATOR_NAME;
use crate::errors::CoreEngineError;
use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
use crate::hashing::hash_value;
use crate::memory::Memory;
use crate::model::{decode_contract, encode_contract, ContractSide, IoModel, Record, RecordMap};
use crate::program::{Flow, IntoProgram, Program};

/// Ejecuta un programa sobre un mapping de entrada y devuelve el record
/// final.
///
/// Es dueño de una `Memory` que persiste entre corridas (salvo que se pase
/// una externa con [`Evaluator::run_with`]) y de un `EventStore` donde cada
/// corrida deja su rastro bajo un `run_id` propio. Cualquier error que llega
/// a este borde se envuelve en `EvaluatorFailed` con el nombre del
/// evaluador.
#[derive(Debug)]
pub struct Evaluator<E = InMemoryEventStore>
    where E: EventStore + 'static
{
    name: String,
    program: Program,
    memory: Memory,
    event_store: E,
    last_run_id: Option<Uuid>,
}

impl Evaluator<InMemoryEventStore> {
    /// Evaluador con memoria vacía y eventos en memoria.
    pub fn new(program: impl IntoProgram) -> Self {
        Self::new_with_stores(program, Memory::new(), InMemoryEventStore::default())
    }
}

impl<E> Evaluator<E> where E: EventStore + 'static
{
    pub fn new_with_stores(program: impl IntoProgram, memory: Memory, event_store: E) -> Self {
        Self { name: DEFAULT_EVALUATOR_NAME.to_string(),
               program: program.into_program(),
               memory,
               event_store,
               last_run_id: None }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_memory(mut self, memory: Memory) -> Self {
        self.memory = memory;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn into_memory(self) -> Memory {
        self.memory
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// Ejecuta con la memoria propia del evaluador.
    pub fn run(&mut self, input: Value) -> Result<RecordMap, CoreEngineError> {
        let record = self.record_from(input)?;
        self.run_record(record).map(Record::into_map)
    }

    pub fn run_record(&mut self, mut record: Record) -> Result<Record, CoreEngineError> {
        let (run_id, result) = drive(&self.name, &self.program, &mut record, &mut self.memory, &mut self.event_store);
        self.last_run_id = Some(run_id);
        result.map(|_| record)
    }

    /// Ejecuta con una memoria externa (la propia no se toca).
    pub fn run_with(&mut self, input: Value, memory: &mut Memory) -> Result<RecordMap, CoreEngineError> {
        let mut record = self.record_from(input)?;
        let (run_id, result) = drive(&self.name, &self.program, &mut record, memory, &mut self.event_store);
        self.last_run_id = Some(run_id);
        result.map(|_| record.into_map())
    }

    /// Ejecuta y devuelve sólo el valor en `key` del record final.
    pub fn run_extract(&mut self, input: Value, key: &str) -> Result<Value, CoreEngineError> {
        let record = self.record_from(input)?;
        let record = self.run_record(record)?;
        record.extract(key).map_err(|e| self.wrap(e))
    }

    /// Variante tipada: la entrada y la salida de la corrida completa se
    /// validan contra los modelos `I` y `O`.
    pub fn run_program<I: IoModel, O: IoModel>(&mut self, input: I) -> Result<O, CoreEngineError> {
        let value = encode_contract(&self.name, ContractSide::Input, &input).map_err(|e| self.wrap(e))?;
        let out = self.run(value)?;
        let out = Value::Object(out.into_iter().collect());
        decode_contract(&self.name, ContractSide::Output, out).map_err(|e| self.wrap(e))
    }

    pub fn last_run_id(&self) -> Option<Uuid> {
        self.last_run_id
    }

    pub fn events_for(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.event_store.list(run_id)
    }

    /// Eventos de la última corrida.
    pub fn events(&self) -> Option<Vec<RunEvent>> {
        self.last_run_id.map(|id| self.event_store.list(id))
    }

    /// Variante compacta de eventos de la última corrida.
    pub fn event_variants(&self) -> Option<Vec<&'static str>> {
        self.events().map(|events| events.iter().map(|e| e.kind.variant()).collect())
    }

    fn record_from(&self, input: Value) -> Result<Record, CoreEngineError> {
        Record::from_value(input).map_err(|e| self.wrap(e))
    }

    fn wrap(&self, e: CoreEngineError) -> CoreEngineError {
        CoreEngineError::EvaluatorFailed { evaluator: self.name.clone(),
                                           source: Box::new(e) }
    }
}

/// Corre el programa bajo un `run_id` nuevo, emitiendo los eventos de inicio
/// y cierre.
fn drive<E: EventStore + 'static>(name: &str, program: &Program, record: &mut Record, memory: &mut Memory,
                                  events: &mut E)
                                  -> (Uuid, Result<(), CoreEngineError>) {
    let run_id = Uuid::new_v4();
    events.append_kind(run_id,
                       RunEventKind::RunStarted { evaluator: name.to_string(),
                                                  program: program.name().to_string(),
                                                  definition_hash: program.definition_hash() });
    info!("[{name}] run {run_id} started ({} nodes)", program.len());
    let result = {
        let mut ctx = ExecutionContext::new(memory, events, run_id, name);
        interpreter::eval_program(program, record, &mut ctx)
    };
    match result {
        Ok(flow) => {
            if flow == Flow::Break {
                debug!("[{name}] run {run_id} stopped by break");
            }
            let output_hash = hash_value(&record.to_value());
            info!("[{name}] run {run_id} completed");
            events.append_kind(run_id, RunEventKind::RunCompleted { output_hash });
            (run_id, Ok(()))
        }
        Err(e) => {
            error!("[{name}] run {run_id} failed: {e}");
            let wrapped = CoreEngineError::EvaluatorFailed { evaluator: name.to_string(),
                                                             source: Box::new(e) };
            events.append_kind(run_id, RunEventKind::RunFailed { error: wrapped.clone() });
            (run_id, Err(wrapped))
        }
    }
}
