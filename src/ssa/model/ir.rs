//! SSA function container.
//!
//! Blocks and values live in dense arenas owned by the `Func`; identity is
//! the arena id, never the contents, so evaluation order and side effects
//! survive even when two values look alike. The container stays deliberately
//! dumb: open/seal discipline, environment snapshots, and all validation
//! belong to the lowering engine.

use crate::ssa::model::op::Op;
use crate::tree::VarId;
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(pub u32);

impl ValueId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub u32);

impl BlockId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Auxiliary payload of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aux {
    /// A named symbol (call targets, variable-definition markers).
    Name(String),
    /// String constant payload.
    Str(String),
    /// Argument-slot symbol, shared across uses for later CSE.
    ArgSym { var: VarId, name: String },
    /// Stack-frame symbol of an auto variable.
    AutoSym { var: VarId, name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Falls through to its single successor.
    Plain,
    /// Two-way branch on a boolean control value.
    If,
    /// Terminated by a call; one successor continues after it.
    Call,
    /// Leaves the function (panic paths, function end).
    Exit,
}

#[derive(Debug, Clone)]
pub struct ValueInfo {
    pub id: ValueId,
    pub op: Op,
    pub ty: Type,
    pub args: Vec<ValueId>,
    pub aux: Option<Aux>,
    pub aux_int: i64,
    pub block: BlockId,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct BlockInfo {
    pub id: BlockId,
    pub kind: BlockKind,
    pub control: Option<ValueId>,
    pub values: Vec<ValueId>,
    pub succs: Vec<BlockId>,
    pub preds: Vec<BlockId>,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct Func {
    pub name: String,
    values: Vec<ValueInfo>,
    blocks: Vec<BlockInfo>,
    pub entry: BlockId,
}

impl Func {
    pub fn new(name: impl Into<String>) -> Self {
        let mut func = Self {
            name: name.into(),
            values: Vec::new(),
            blocks: Vec::new(),
            entry: BlockId(0),
        };
        let entry = func.new_block(BlockKind::Plain);
        func.entry = entry;
        func
    }

    pub fn new_block(&mut self, kind: BlockKind) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BlockInfo {
            id,
            kind,
            control: None,
            values: Vec::new(),
            succs: Vec::new(),
            preds: Vec::new(),
            line: 0,
        });
        id
    }

    pub fn block(&self, id: BlockId) -> &BlockInfo {
        &self.blocks[id.index()]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut BlockInfo {
        &mut self.blocks[id.index()]
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BlockInfo> {
        self.blocks.iter()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn value(&self, id: ValueId) -> &ValueInfo {
        &self.values[id.index()]
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn add_edge(&mut self, from: BlockId, to: BlockId) {
        self.blocks[from.index()].succs.push(to);
        self.blocks[to.index()].preds.push(from);
    }

    /// Drops blocks unreachable from the entry, renumbering the rest.
    ///
    /// Lowering deliberately materializes blocks for dead statements so label
    /// bookkeeping stays uniform; once the function is complete those blocks
    /// carry no information and would leave dangling predecessors.
    pub fn prune_unreachable(&mut self) {
        let mut reachable = vec![false; self.blocks.len()];
        reachable[self.entry.index()] = true;
        let mut stack = vec![self.entry];
        while let Some(block) = stack.pop() {
            for succ in &self.blocks[block.index()].succs {
                if !reachable[succ.index()] {
                    reachable[succ.index()] = true;
                    stack.push(*succ);
                }
            }
        }
        if reachable.iter().all(|live| *live) {
            return;
        }

        let mut remap: Vec<Option<BlockId>> = vec![None; self.blocks.len()];
        let mut next = 0u32;
        for (index, live) in reachable.iter().enumerate() {
            if *live {
                remap[index] = Some(BlockId(next));
                next += 1;
            }
        }

        let old_blocks = std::mem::take(&mut self.blocks);
        for mut block in old_blocks {
            let Some(new_id) = remap[block.id.index()] else {
                continue;
            };
            block.id = new_id;
            block.succs = block
                .succs
                .iter()
                .filter_map(|succ| remap[succ.index()])
                .collect();
            block.preds = block
                .preds
                .iter()
                .filter_map(|pred| remap[pred.index()])
                .collect();
            self.blocks.push(block);
        }
        self.entry = remap[self.entry.index()].expect("entry block is always reachable");
        for value in &mut self.values {
            if let Some(new_id) = remap[value.block.index()] {
                value.block = new_id;
            }
        }
    }

    pub fn seal_block(&mut self, id: BlockId, kind: BlockKind, control: Option<ValueId>) {
        let block = &mut self.blocks[id.index()];
        block.kind = kind;
        block.control = control;
    }

    pub fn set_aux_int(&mut self, value: ValueId, aux_int: i64) {
        self.values[value.index()].aux_int = aux_int;
    }

    fn new_value(
        &mut self,
        block: BlockId,
        line: usize,
        op: Op,
        ty: Type,
        args: Vec<ValueId>,
        aux: Option<Aux>,
        aux_int: i64,
    ) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(ValueInfo {
            id,
            op,
            ty,
            args,
            aux,
            aux_int,
            block,
            line,
        });
        self.blocks[block.index()].values.push(id);
        id
    }

    pub fn new_value0(&mut self, block: BlockId, line: usize, op: Op, ty: Type) -> ValueId {
        self.new_value(block, line, op, ty, Vec::new(), None, 0)
    }

    pub fn new_value0_aux(
        &mut self,
        block: BlockId,
        line: usize,
        op: Op,
        ty: Type,
        aux: Aux,
    ) -> ValueId {
        self.new_value(block, line, op, ty, Vec::new(), Some(aux), 0)
    }

    pub fn new_value0_int(
        &mut self,
        block: BlockId,
        line: usize,
        op: Op,
        ty: Type,
        aux_int: i64,
    ) -> ValueId {
        self.new_value(block, line, op, ty, Vec::new(), None, aux_int)
    }

    pub fn new_value1(
        &mut self,
        block: BlockId,
        line: usize,
        op: Op,
        ty: Type,
        arg: ValueId,
    ) -> ValueId {
        self.new_value(block, line, op, ty, vec![arg], None, 0)
    }

    pub fn new_value1_aux(
        &mut self,
        block: BlockId,
        line: usize,
        op: Op,
        ty: Type,
        aux: Aux,
        arg: ValueId,
    ) -> ValueId {
        self.new_value(block, line, op, ty, vec![arg], Some(aux), 0)
    }

    pub fn new_value1_int(
        &mut self,
        block: BlockId,
        line: usize,
        op: Op,
        ty: Type,
        aux_int: i64,
        arg: ValueId,
    ) -> ValueId {
        self.new_value(block, line, op, ty, vec![arg], None, aux_int)
    }

    pub fn new_value2(
        &mut self,
        block: BlockId,
        line: usize,
        op: Op,
        ty: Type,
        arg0: ValueId,
        arg1: ValueId,
    ) -> ValueId {
        self.new_value(block, line, op, ty, vec![arg0, arg1], None, 0)
    }

    pub fn new_value2_int(
        &mut self,
        block: BlockId,
        line: usize,
        op: Op,
        ty: Type,
        aux_int: i64,
        arg0: ValueId,
        arg1: ValueId,
    ) -> ValueId {
        self.new_value(block, line, op, ty, vec![arg0, arg1], None, aux_int)
    }

    pub fn new_value3(
        &mut self,
        block: BlockId,
        line: usize,
        op: Op,
        ty: Type,
        arg0: ValueId,
        arg1: ValueId,
        arg2: ValueId,
    ) -> ValueId {
        self.new_value(block, line, op, ty, vec![arg0, arg1, arg2], None, 0)
    }

    pub fn new_value3_int(
        &mut self,
        block: BlockId,
        line: usize,
        op: Op,
        ty: Type,
        aux_int: i64,
        arg0: ValueId,
        arg1: ValueId,
        arg2: ValueId,
    ) -> ValueId {
        self.new_value(block, line, op, ty, vec![arg0, arg1, arg2], None, aux_int)
    }

    // Constants live in the entry block so any block can use them.

    pub fn const_bool(&mut self, line: usize, value: bool) -> ValueId {
        let entry = self.entry;
        self.new_value(
            entry,
            line,
            Op::ConstBool,
            Type::Bool,
            Vec::new(),
            None,
            i64::from(value),
        )
    }

    pub fn const_int8(&mut self, line: usize, ty: Type, value: i8) -> ValueId {
        let entry = self.entry;
        self.new_value(
            entry,
            line,
            Op::Const8,
            ty,
            Vec::new(),
            None,
            i64::from(value),
        )
    }

    pub fn const_int16(&mut self, line: usize, ty: Type, value: i16) -> ValueId {
        let entry = self.entry;
        self.new_value(
            entry,
            line,
            Op::Const16,
            ty,
            Vec::new(),
            None,
            i64::from(value),
        )
    }

    pub fn const_int32(&mut self, line: usize, ty: Type, value: i32) -> ValueId {
        let entry = self.entry;
        self.new_value(
            entry,
            line,
            Op::Const32,
            ty,
            Vec::new(),
            None,
            i64::from(value),
        )
    }

    pub fn const_int64(&mut self, line: usize, ty: Type, value: i64) -> ValueId {
        let entry = self.entry;
        self.new_value(entry, line, Op::Const64, ty, Vec::new(), None, value)
    }

    pub fn const_float32(&mut self, line: usize, ty: Type, value: f32) -> ValueId {
        let entry = self.entry;
        self.new_value(
            entry,
            line,
            Op::Const32F,
            ty,
            Vec::new(),
            None,
            i64::from(value.to_bits()),
        )
    }

    pub fn const_float64(&mut self, line: usize, ty: Type, value: f64) -> ValueId {
        let entry = self.entry;
        self.new_value(
            entry,
            line,
            Op::Const64F,
            ty,
            Vec::new(),
            None,
            value.to_bits() as i64,
        )
    }

    pub fn const_string(&mut self, line: usize, value: impl Into<String>) -> ValueId {
        let entry = self.entry;
        self.new_value(
            entry,
            line,
            Op::ConstString,
            Type::String,
            Vec::new(),
            Some(Aux::Str(value.into())),
            0,
        )
    }

    pub fn const_nil(&mut self, line: usize, ty: Type) -> ValueId {
        let entry = self.entry;
        self.new_value(entry, line, Op::ConstNil, ty, Vec::new(), None, 0)
    }

    pub fn const_interface(&mut self, line: usize, ty: Type) -> ValueId {
        let entry = self.entry;
        self.new_value(entry, line, Op::ConstInterface, ty, Vec::new(), None, 0)
    }

    pub fn const_slice(&mut self, line: usize, ty: Type) -> ValueId {
        let entry = self.entry;
        self.new_value(entry, line, Op::ConstSlice, ty, Vec::new(), None, 0)
    }
}
