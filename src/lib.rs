//! ChainFlow Rust Library
//!
//! Este crate agrupa el motor y las acciones de ChainFlow:
//! - Re-exporta `chain_core` (programas, evaluador, memoria, eventos).
//! - Re-exporta `chain_adapters` (acciones de pegamento).
//! - Expone `config` para construir memoria y evaluador desde el entorno.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod config;

pub use chain_adapters;
pub use chain_core;

pub use config::{init_dotenv, AppConfig, ConfigError};
