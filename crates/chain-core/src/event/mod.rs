//! Definiciones de eventos y trait EventStore.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore, NullEventStore, DEFAULT_MAX_EVENTS_PER_RUN, DEFAULT_RETAINED_RUNS};
pub use types::{RunEvent, RunEventKind};
