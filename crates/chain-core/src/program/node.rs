use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Program;
use crate::control::{Break, Filter, ForEach, LoopNode, Switch, While};
use crate::memory::{DeleteMemory, GetMemory, MemoryInstruction, SetMemory};
use crate::model::RecordMap;
use crate::step::{ActionNode, ExecuteNode};

/// Etiqueta de despacho de un nodo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    Action,
    Memory,
    Execute,
    Pipeline,
    Switch,
    Loop,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Señal de control devuelta al evaluar un nodo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flow {
    Continue,
    /// Termina el loop más cercano (o la corrida, en el nivel superior).
    Break,
}

/// Nodo de un programa. Conjunto cerrado: el intérprete despacha por variante.
#[derive(Debug)]
pub enum Node {
    /// Datos literales que se fusionan en el record; sólo válido como primer nodo.
    Input(RecordMap),
    Execute(ExecuteNode),
    Action(ActionNode),
    Memory(MemoryInstruction),
    Pipeline(Program),
    Switch(Switch),
    Loop(LoopNode),
}

impl Node {
    pub fn kind(&self) -> StatementKind {
        match self {
            Node::Input(_) | Node::Action(_) => StatementKind::Action,
            Node::Execute(_) => StatementKind::Execute,
            Node::Memory(_) => StatementKind::Memory,
            Node::Pipeline(_) => StatementKind::Pipeline,
            Node::Switch(_) => StatementKind::Switch,
            Node::Loop(_) => StatementKind::Loop,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Input(_) => "Input",
            Node::Execute(n) => n.name(),
            Node::Action(n) => n.name(),
            Node::Memory(m) => m.name(),
            Node::Pipeline(p) => p.name(),
            Node::Switch(s) => s.name(),
            Node::Loop(l) => l.name(),
        }
    }

    pub(crate) fn is_literal(&self) -> bool {
        matches!(self, Node::Input(_))
    }

    /// Descripción estructural (entra al hash de definición).
    pub fn describe(&self) -> Value {
        let detail = match self {
            Node::Input(data) => json!(data),
            Node::Execute(n) => n.describe(),
            Node::Action(n) => n.describe(),
            Node::Memory(m) => m.describe(),
            Node::Pipeline(p) => p.describe(),
            Node::Switch(s) => s.describe(),
            Node::Loop(l) => l.describe(),
        };
        json!({"kind": self.kind(), "name": self.name(), "detail": detail})
    }
}

macro_rules! node_from {
    ($($ty:ty => |$v:ident| $node:expr),+ $(,)?) => {
        $(impl From<$ty> for Node {
            fn from($v: $ty) -> Self { $node }
        })+
    };
}

node_from! {
    ExecuteNode => |n| Node::Execute(n),
    ActionNode => |n| Node::Action(n),
    MemoryInstruction => |m| Node::Memory(m),
    GetMemory => |m| Node::Memory(m.into()),
    SetMemory => |m| Node::Memory(m.into()),
    DeleteMemory => |m| Node::Memory(m.into()),
    Program => |p| Node::Pipeline(p),
    Switch => |s| Node::Switch(s),
    LoopNode => |l| Node::Loop(l),
    While => |l| Node::Loop(LoopNode::While(l)),
    ForEach => |l| Node::Loop(LoopNode::ForEach(l)),
    Filter => |l| Node::Loop(LoopNode::Filter(l)),
    Break => |_b| Node::Loop(LoopNode::Break),
}
