//! Structural checks over a lowered function.

use std::collections::HashSet;
use std::fmt;

use crate::ssa::model::ir::{BlockId, BlockKind, Func, ValueId};
use crate::types::Type;

#[derive(Debug, Clone)]
pub struct VerifyError {
    message: String,
}

impl VerifyError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for VerifyError {}

/// Verifies the structural invariants a lowered function must satisfy:
/// every block terminates consistently with its kind, every non-entry block
/// is reachable from at least one predecessor, and every value argument and
/// control value is defined in the function.
pub fn verify_func(func: &Func) -> Result<(), VerifyError> {
    let mut defined: HashSet<ValueId> = HashSet::new();
    for block in func.blocks() {
        for value in &block.values {
            if !defined.insert(*value) {
                return Err(err(
                    func,
                    block.id,
                    format!("value %v{} defined twice", value.0),
                ));
            }
        }
    }

    for block in func.blocks() {
        for value_id in &block.values {
            let value = func.value(*value_id);
            if value.block != block.id {
                return Err(err(
                    func,
                    block.id,
                    format!("value %v{} claims block b{}", value_id.0, value.block.0),
                ));
            }
            for arg in &value.args {
                if !defined.contains(arg) {
                    return Err(err(
                        func,
                        block.id,
                        format!("use of undefined value %v{}", arg.0),
                    ));
                }
            }
        }

        verify_terminator(func, block.id, &defined)?;

        if block.id != func.entry && block.preds.is_empty() {
            return Err(err(func, block.id, "block has no predecessors"));
        }
    }

    Ok(())
}

fn verify_terminator(
    func: &Func,
    block_id: BlockId,
    defined: &HashSet<ValueId>,
) -> Result<(), VerifyError> {
    let block = func.block(block_id);

    match block.kind {
        BlockKind::Plain => {
            if block.succs.len() != 1 {
                return Err(err(
                    func,
                    block_id,
                    format!("plain block with {} successors", block.succs.len()),
                ));
            }
            if block.control.is_some() {
                return Err(err(func, block_id, "plain block with a control value"));
            }
        }
        BlockKind::If => {
            if block.succs.len() != 2 {
                return Err(err(
                    func,
                    block_id,
                    format!("if block with {} successors", block.succs.len()),
                ));
            }
            let control = block
                .control
                .ok_or_else(|| err(func, block_id, "if block without a control value"))?;
            if !defined.contains(&control) {
                return Err(err(
                    func,
                    block_id,
                    format!("undefined control value %v{}", control.0),
                ));
            }
            if func.value(control).ty != Type::Bool {
                return Err(err(
                    func,
                    block_id,
                    format!("non-bool control value %v{}", control.0),
                ));
            }
        }
        BlockKind::Call => {
            if block.succs.len() != 1 {
                return Err(err(
                    func,
                    block_id,
                    format!("call block with {} successors", block.succs.len()),
                ));
            }
            let control = block
                .control
                .ok_or_else(|| err(func, block_id, "call block without a call value"))?;
            if !defined.contains(&control) {
                return Err(err(
                    func,
                    block_id,
                    format!("undefined call value %v{}", control.0),
                ));
            }
        }
        BlockKind::Exit => {
            if !block.succs.is_empty() {
                return Err(err(
                    func,
                    block_id,
                    format!("exit block with {} successors", block.succs.len()),
                ));
            }
        }
    }

    for succ in &block.succs {
        if !func.block(*succ).preds.contains(&block_id) {
            return Err(err(
                func,
                block_id,
                format!("edge to b{} has no matching predecessor entry", succ.0),
            ));
        }
    }

    Ok(())
}

fn err(func: &Func, block: BlockId, message: impl fmt::Display) -> VerifyError {
    VerifyError::new(format!("{}: b{}: {}", func.name, block.0, message))
}

#[cfg(test)]
#[path = "../tests/ssa/t_verify.rs"]
mod tests;
