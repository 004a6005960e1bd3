//! Constantes del motor core.

/// Versión lógica del motor. Forma parte del hash de definición de un
/// programa, de modo que un cambio de versión produce hashes distintos aunque
/// la composición no cambie.
pub const ENGINE_VERSION: &str = "C1.0";

/// Clave por defecto donde se escriben resultados que no son mappings.
pub const DEFAULT_KEY: &str = "output";

/// Nombre por defecto del evaluador.
pub const DEFAULT_EVALUATOR_NAME: &str = "Evaluator";

/// Nombre por defecto de un programa compuesto.
pub const DEFAULT_PROGRAM_NAME: &str = "Program";
