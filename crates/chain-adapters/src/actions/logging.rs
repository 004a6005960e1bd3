use chain_core::{Action, CoreEngineError};
use log::{log, Level};
use serde_json::{json, Value};

const FRAME: &str = "----------------------------------------";

/// Registra un mensaje (y opcionalmente la entrada) vía `log`. No modifica
/// el record.
#[derive(Debug, Clone)]
pub struct LogAction {
    level: Level,
    target: String,
    message: String,
    open: String,
    close: String,
    include_input: bool,
}

impl LogAction {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self { level,
               target: "chainflow".to_string(),
               message: message.into(),
               open: FRAME.to_string(),
               close: FRAME.to_string(),
               include_input: true }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn frames(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.open = open.into();
        self.close = close.into();
        self
    }

    pub fn without_input(mut self) -> Self {
        self.include_input = false;
        self
    }

    /// Texto que se registra para `input`.
    pub fn render(&self, input: &Value) -> String {
        if self.include_input {
            [self.open.as_str(), self.message.as_str(), &input.to_string(), self.close.as_str()].join("\n")
        } else {
            [self.open.as_str(), self.message.as_str(), self.close.as_str()].join("\n")
        }
    }
}

impl Action for LogAction {
    fn name(&self) -> &str {
        "Log"
    }

    fn config(&self) -> Value {
        json!({"level": self.level.as_str(), "message": self.message, "include_input": self.include_input})
    }

    fn execute(&self, input: Value) -> Result<Option<Value>, CoreEngineError> {
        log!(target: &self.target, self.level, "{}", self.render(&input));
        Ok(None)
    }
}
