//! chain-adapters: acciones de pegamento para programas de `chain-core`.
//!
//! Este crate provee acciones listas para componer entre pasos:
//! - datos: `AddData`, `SetValue`, `Flush`, `UnpackValue`, `NestToKey`;
//! - renombres: `RenameAttribute`, `RenameAttributeQuery` (`"nuevo<-viejo;..."`);
//! - `ExecuteFunction` para lógica ad-hoc y `LogAction` para trazas.
//!
//! Todas implementan `chain_core::Action`; se envuelven con
//! `chain_core::action(..)` para obtener un nodo componible.

pub mod actions;

pub use actions::{AddData, ExecuteFunction, Flush, LogAction, NestToKey, RenameAttribute, RenameAttributeQuery,
                  SetValue, UnpackValue};
