//! Pasos: la unidad de trabajo de un programa.
//!
//! Un paso es un `Executable` (con contratos de entrada/salida tipados) o un
//! `Action` (transformación liviana sobre el record). Este módulo define:
//! - `StepDefinition`: interfaz neutral usada por el intérprete.
//! - `Executable`: interfaz de alto nivel con tipos fuertes.
//! - `Action`: transformación sin contrato.
//! - `Binding` / `ReplacingScope`: de dónde lee y cómo escribe cada nodo.
//! - `ExecuteNode` / `ActionNode`: los nodos componibles.

mod action;
mod binding;
pub mod definition;
pub mod macros;
mod node;
pub mod typed;

pub use action::Action;
pub use binding::{Binding, ReplacingScope};
pub use definition::StepDefinition;
pub use node::{action, step, ActionNode, ExecuteNode};
pub use typed::Executable;
