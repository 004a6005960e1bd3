//! Intérprete de programas: recorre nodos en orden y despacha por variante.

use log::{debug, error};

use super::ExecutionContext;
use crate::errors::CoreEngineError;
use crate::event::RunEventKind;
use crate::model::Record;
use crate::program::{Flow, Node, Program};

/// Evalúa los nodos de `program` en orden sobre `record`.
///
/// Devuelve `Flow::Break` en cuanto un nodo lo emite (los nodos restantes no
/// corren). Un error se envuelve una única vez en `ProgramFailed` con el
/// índice y nombre del nodo; errores ya localizados pasan sin cambios.
pub(crate) fn eval_program(program: &Program, record: &mut Record, ctx: &mut ExecutionContext<'_>)
                           -> Result<Flow, CoreEngineError> {
    for (index, node) in program.nodes().iter().enumerate() {
        let scope = ctx.scope().to_string();
        ctx.emit(RunEventKind::NodeStarted { scope: scope.clone(),
                                             index,
                                             node: node.name().to_string(),
                                             kind: node.kind() });
        match eval_node(node, record, ctx) {
            Ok(flow) => {
                debug!("[{}] #{} {} ({}) -> {:?}", scope, index, node.name(), node.kind(), flow);
                ctx.emit(RunEventKind::NodeFinished { scope,
                                                      index,
                                                      node: node.name().to_string(),
                                                      flow });
                if flow == Flow::Break {
                    return Ok(Flow::Break);
                }
            }
            Err(e) => {
                error!("[{}] #{} {} failed: {}", scope, index, node.name(), e);
                ctx.emit(RunEventKind::NodeFailed { scope,
                                                    index,
                                                    node: node.name().to_string(),
                                                    error: e.clone() });
                if e.is_located() {
                    return Err(e);
                }
                return Err(CoreEngineError::ProgramFailed { program: program.name().to_string(),
                                                            index,
                                                            node: node.name().to_string(),
                                                            source: Box::new(e) });
            }
        }
    }
    Ok(Flow::Continue)
}

/// Evalúa un único nodo.
pub(crate) fn eval_node(node: &Node, record: &mut Record, ctx: &mut ExecutionContext<'_>) -> Result<Flow, CoreEngineError> {
    match node {
        Node::Input(data) => {
            record.update(data.clone());
            Ok(Flow::Continue)
        }
        Node::Execute(n) => n.evaluate(record, ctx).map(|_| Flow::Continue),
        Node::Action(n) => n.evaluate(record).map(|_| Flow::Continue),
        Node::Memory(m) => m.apply(record, ctx.memory_mut()).map(|_| Flow::Continue),
        Node::Pipeline(p) => {
            let mut child = ctx.child(p.name());
            eval_program(p, record, &mut child)
        }
        Node::Switch(s) => s.evaluate(record, ctx),
        Node::Loop(l) => l.evaluate(record, ctx),
    }
}
