//! Operador de composición `|`.
//!
//! `a | b` produce un `Program` que ejecuta `a` y luego `b`. Si `a` ya es un
//! programa, `b` se agrega al final; si `b` es un programa, queda anidado
//! como un único nodo `Pipeline`.

use std::ops::BitOr;

use super::{IntoProgram, Node, Program};
use crate::control::{Break, Filter, ForEach, LoopNode, Switch, While};
use crate::memory::{DeleteMemory, GetMemory, MemoryInstruction, SetMemory};
use crate::step::{ActionNode, ExecuteNode};

/// Forma funcional de `left | right`.
pub fn compose(left: impl IntoProgram, right: impl Into<Node>) -> Program {
    left.into_program().then(right)
}

macro_rules! impl_compose {
    ($($ty:ty),+ $(,)?) => {
        $(impl<R: Into<Node>> BitOr<R> for $ty {
            type Output = Program;
            fn bitor(self, rhs: R) -> Program { compose(self, rhs) }
        })+
    };
}

impl_compose!(Program,
              Node,
              ExecuteNode,
              ActionNode,
              MemoryInstruction,
              GetMemory,
              SetMemory,
              DeleteMemory,
              Switch,
              LoopNode,
              While,
              ForEach,
              Filter,
              Break);
