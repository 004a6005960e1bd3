//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) una sola vez y expone `AppConfig`, desde
//! donde se construyen la `Memory` y el `Evaluator` configurados.
use std::env;
use std::path::PathBuf;

use chain_core::constants::DEFAULT_EVALUATOR_NAME;
use chain_core::{CoreEngineError, Evaluator, IntoProgram, Memory};
use log::LevelFilter;
use once_cell::sync::Lazy;
use thiserror::Error;

pub const ENV_EVALUATOR_NAME: &str = "CHAINFLOW_EVALUATOR_NAME";
pub const ENV_MEMORY_DIR: &str = "CHAINFLOW_MEMORY_DIR";
pub const ENV_LOG_LEVEL: &str = "CHAINFLOW_LOG_LEVEL";

/// `true` si se encontró y cargó un archivo `.env`.
static DOTENV_LOADED: Lazy<bool> = Lazy::new(|| dotenvy::dotenv().is_ok());

/// Carga `.env` si existe (idempotente).
pub fn init_dotenv() -> bool {
    *DOTENV_LOADED
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// Configuración de ejecución.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Nombre con el que se reportan los errores del evaluador.
    pub evaluator_name: String,
    /// Directorio para memoria persistente; sin él la memoria vive en proceso.
    pub memory_dir: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { evaluator_name: DEFAULT_EVALUATOR_NAME.to_string(),
               memory_dir: None,
               log_level: LevelFilter::Info }
    }
}

impl AppConfig {
    /// Lee la configuración del entorno (después de cargar `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        init_dotenv();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(name) = lookup(ENV_EVALUATOR_NAME).filter(|v| !v.trim().is_empty()) {
            cfg.evaluator_name = name.trim().to_string();
        }
        cfg.memory_dir = lookup(ENV_MEMORY_DIR).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            cfg.log_level = level.trim()
                                 .parse()
                                 .map_err(|_| ConfigError::InvalidValue { var: ENV_LOG_LEVEL, value: level.clone() })?;
        }
        Ok(cfg)
    }

    /// Aplica el nivel de log como máximo global de la fachada `log`.
    pub fn apply_log_level(&self) {
        log::set_max_level(self.log_level);
    }

    /// Memoria configurada: en directorio si hay `memory_dir`, si no en proceso.
    pub fn memory(&self) -> Result<Memory, CoreEngineError> {
        match &self.memory_dir {
            Some(dir) => Memory::open_dir(dir),
            None => Ok(Memory::new()),
        }
    }

    /// Evaluador con el nombre y la memoria configurados.
    pub fn evaluator(&self, program: impl IntoProgram) -> Result<Evaluator, CoreEngineError> {
        Ok(Evaluator::new(program).named(self.evaluator_name.clone()).with_memory(self.memory()?))
    }
}
