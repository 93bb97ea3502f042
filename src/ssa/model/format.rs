//! Textual form of a lowered function.
//!
//! The format is stable so unit tests can compare whole functions against
//! expected text.

use std::fmt::Write;

use crate::ssa::model::ir::{Aux, BlockId, BlockKind, Func, ValueInfo};
use crate::ssa::model::op::Op;

pub fn format_func(func: &Func) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "fn {} {{", func.name);

    let mut first = true;
    for block in func.blocks() {
        if !first {
            out.push('\n');
        }
        first = false;

        let _ = writeln!(out, "  b{}:", block.id.0);
        for value in &block.values {
            let _ = writeln!(out, "    {}", format_value(func.value(*value)));
        }
        let _ = writeln!(out, "  {}", format_terminator(func, block.id));
    }

    out.push_str("}\n");
    out
}

fn format_value(value: &ValueInfo) -> String {
    let mut out = format!("%v{}: {} = {:?}", value.id.0, value.ty, value.op);

    match value.op {
        Op::ConstBool => {
            let _ = write!(out, " [{}]", value.aux_int != 0);
        }
        Op::Const32F => {
            let _ = write!(out, " [{}]", f32::from_bits(value.aux_int as u32));
        }
        Op::Const64F => {
            let _ = write!(out, " [{}]", f64::from_bits(value.aux_int as u64));
        }
        _ if value.aux_int != 0
            || matches!(
                value.op,
                Op::Const8 | Op::Const16 | Op::Const32 | Op::Const64
            ) =>
        {
            let _ = write!(out, " [{}]", value.aux_int);
        }
        _ => {}
    }

    if let Some(aux) = &value.aux {
        match aux {
            Aux::Name(name) => {
                let _ = write!(out, " {{{}}}", name);
            }
            Aux::Str(text) => {
                let _ = write!(out, " {{{:?}}}", text);
            }
            Aux::ArgSym { name, .. } => {
                let _ = write!(out, " {{arg:{}}}", name);
            }
            Aux::AutoSym { name, .. } => {
                let _ = write!(out, " {{auto:{}}}", name);
            }
        }
    }

    for (i, arg) in value.args.iter().enumerate() {
        if i == 0 {
            out.push(' ');
        } else {
            out.push_str(", ");
        }
        let _ = write!(out, "%v{}", arg.0);
    }

    out
}

fn format_terminator(func: &Func, block_id: BlockId) -> String {
    let block = func.block(block_id);
    match block.kind {
        BlockKind::Plain => match block.succs.as_slice() {
            [target] => format!("br b{}", target.0),
            [] => "open".to_string(),
            other => format!("br {:?}", other),
        },
        BlockKind::If => {
            let control = block.control.map(|v| v.0).unwrap_or(u32::MAX);
            match block.succs.as_slice() {
                [yes, no] => format!("cbr %v{}, b{}, b{}", control, yes.0, no.0),
                other => format!("cbr %v{}, {:?}", control, other),
            }
        }
        BlockKind::Call => {
            let control = block.control.map(|v| v.0).unwrap_or(u32::MAX);
            match block.succs.as_slice() {
                [next] => format!("call %v{}, b{}", control, next.0),
                other => format!("call %v{}, {:?}", control, other),
            }
        }
        BlockKind::Exit => match block.control {
            Some(control) => format!("exit %v{}", control.0),
            None => "exit".to_string(),
        },
    }
}
