//! Lowering state and shared helpers.
//!
//! The `Lowerer` owns the function under construction and every piece of
//! bookkeeping the control-flow engine needs: the single open block, the
//! per-block variable environment and its per-block snapshots, the label
//! table, pending forward gotos, parameter slot addresses, and the line
//! number stack.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::diag::Span;
use crate::ssa::lower::{LowerError, LowerErrorKind};
use crate::ssa::model::ir::{Aux, BlockId, BlockKind, Func, ValueId};
use crate::ssa::model::op::Op;
use crate::tree::{FuncDecl, StorageClass, VarDecl, VarId};
use crate::types::Type;

/// Identity of a tracked binding in the variable environment.
///
/// Closed on purpose: everywhere variable identity matters this is matched
/// exhaustively, so a new kind of binding cannot slip in unhandled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum VarKey {
    /// A front-end variable (parameter, output parameter, or local).
    Var(VarId),
    /// The abstract memory thread.
    Memory,
    /// A lowering-internal temporary used to join values across branches.
    Temp(u32),
}

/// A named control point.
#[derive(Debug, Clone, Default)]
pub(crate) struct SsaLabel {
    pub(crate) defined_span: Option<Span>,
    pub(crate) used_span: Option<Span>,
    /// Allocated lazily by whichever of definition or use comes first; once
    /// set it never changes identity.
    pub(crate) target: Option<BlockId>,
    pub(crate) reported: bool,
}

impl SsaLabel {
    pub(crate) fn defined(&self) -> bool {
        self.defined_span.is_some()
    }

    pub(crate) fn used(&self) -> bool {
        self.used_span.is_some()
    }
}

/// A goto seen before its label; validated when the label defines.
#[derive(Debug, Clone)]
pub(crate) struct FwdGoto {
    pub(crate) label: String,
    pub(crate) span: Span,
    /// Value of the binding counter when the goto was lowered. Variables
    /// first bound after this mark were skipped by the jump.
    pub(crate) bind_mark: u32,
}

pub(crate) struct Lowerer<'a> {
    pub(crate) func: Func,
    decls: HashMap<VarId, &'a VarDecl>,

    /// The one open block, if any.
    pub(crate) cur_block: Option<BlockId>,
    /// Variable bindings of the open block.
    pub(crate) vars: HashMap<VarKey, ValueId>,
    /// Environment snapshots of sealed blocks, dense by block id.
    pub(crate) defvars: Vec<HashMap<VarKey, ValueId>>,

    pub(crate) labels: IndexMap<String, SsaLabel>,
    pub(crate) fwd_gotos: Vec<FwdGoto>,

    /// Precomputed parameter slot addresses.
    pub(crate) decl_addrs: HashMap<VarId, ValueId>,
    /// Cached symbols for output parameters, shared across uses for CSE.
    var_syms: HashMap<VarId, Aux>,

    pub(crate) start_mem: ValueId,
    pub(crate) sp: ValueId,
    pub(crate) sb: ValueId,

    /// Line number stack; the current line is the top.
    line: Vec<usize>,

    /// First-binding order of front-end variables, for goto validation.
    bound_seq: HashMap<VarId, u32>,
    bind_counter: u32,

    /// Variables already marked live in the open block.
    vardefed: HashSet<VarId>,

    next_temp: u32,
    entry_span: Span,
}

impl<'a> Lowerer<'a> {
    pub(crate) fn new(decl: &'a FuncDecl) -> Self {
        let mut decls = HashMap::new();
        for var in decl
            .params
            .iter()
            .chain(&decl.results)
            .chain(&decl.locals)
        {
            decls.insert(var.id, var);
        }

        let mut func = Func::new(decl.name.clone());
        let entry = func.entry;
        let line = decl.span.start.line;

        let start_mem = func.new_value0(entry, line, Op::InitMem, Type::Mem);
        let sp = func.new_value0(entry, line, Op::SP, Type::Ptr);
        let sb = func.new_value0(entry, line, Op::SB, Type::Ptr);

        let mut decl_addrs = HashMap::new();
        for param in &decl.params {
            let slot = func.new_value1_int(entry, line, Op::OffPtr, Type::Ptr, param.frame_offset, sp);
            decl_addrs.insert(param.id, slot);
        }

        let mut lowerer = Self {
            func,
            decls,
            cur_block: None,
            vars: HashMap::new(),
            defvars: Vec::new(),
            labels: IndexMap::new(),
            fwd_gotos: Vec::new(),
            decl_addrs,
            var_syms: HashMap::new(),
            start_mem,
            sp,
            sb,
            line: Vec::new(),
            bound_seq: HashMap::new(),
            bind_counter: 0,
            vardefed: HashSet::new(),
            next_temp: 0,
            entry_span: decl.span,
        };
        lowerer.start_block(entry);
        lowerer.bind(VarKey::Memory, start_mem);
        lowerer
    }

    /// Seals any trailing open block, then checks for leaked labels.
    pub(crate) fn finish(mut self) -> Result<Func, LowerError> {
        if self.cur_block.is_some() {
            let mem = self.mem();
            let block = self.end_block().expect("ssa lower_func lost open block");
            self.func.seal_block(block, BlockKind::Exit, Some(mem));
        }

        for (name, label) in &self.labels {
            if label.used() && !label.defined() && !label.reported {
                return Err(LowerError {
                    kind: LowerErrorKind::UndefinedLabel(name.clone()),
                    span: label.used_span.unwrap_or(self.entry_span),
                });
            }
        }

        self.func.prune_unreachable();
        Ok(self.func)
    }

    pub(crate) fn decl(&self, id: VarId) -> &'a VarDecl {
        self.decls
            .get(&id)
            .copied()
            .unwrap_or_else(|| panic!("ssa lower_func unknown variable {:?}", id))
    }

    /// Whether assignments to this variable stay pure SSA rebinds.
    pub(crate) fn can_ssa(decl: &VarDecl) -> bool {
        !decl.addressed
            && decl.heap_addr.is_none()
            && decl.ty.is_ssa_capable()
            && matches!(decl.class, StorageClass::Param | StorageClass::Auto)
    }

    // Block discipline.

    /// Opens `block` as the current block. At most one block may be open.
    pub(crate) fn start_block(&mut self, block: BlockId) {
        if let Some(open) = self.cur_block {
            panic!(
                "ssa lower_func starting block b{} while b{} has not ended",
                block.0, open.0
            );
        }
        self.cur_block = Some(block);
        self.vars.clear();
        self.vardefed.clear();
    }

    /// Seals the current block, snapshotting its environment at the block's
    /// dense index. Returns `None` when no block is open, which is how
    /// callers detect genuinely unreachable execution points.
    pub(crate) fn end_block(&mut self) -> Option<BlockId> {
        let block = self.cur_block?;
        while self.defvars.len() <= block.index() {
            self.defvars.push(HashMap::new());
        }
        self.defvars[block.index()] = std::mem::take(&mut self.vars);
        self.cur_block = None;
        self.func.block_mut(block).line = self.peek_line();
        Some(block)
    }

    // Label table.

    /// Returns the label for `name`, allocating it on first reference.
    pub(crate) fn label(&mut self, name: &str) -> &mut SsaLabel {
        self.labels.entry(name.to_string()).or_default()
    }

    /// Returns the label's target block, allocating both on first reference.
    pub(crate) fn label_target(&mut self, name: &str) -> BlockId {
        if let Some(target) = self.labels.get(name).and_then(|label| label.target) {
            return target;
        }
        let target = self.func.new_block(BlockKind::Plain);
        self.label(name).target = Some(target);
        target
    }

    /// Validates a goto against initializations it would skip: any variable
    /// first bound after `bind_mark` (the goto) and before now (the label)
    /// lies between the jump and its target.
    pub(crate) fn check_goto(
        &self,
        span: Span,
        label: &str,
        bind_mark: u32,
    ) -> Result<(), LowerError> {
        let mut skipped: Option<(u32, VarId)> = None;
        for (var, seq) in &self.bound_seq {
            if *seq > bind_mark && skipped.map_or(true, |(first, _)| *seq < first) {
                skipped = Some((*seq, *var));
            }
        }
        if let Some((_, var)) = skipped {
            return Err(LowerError {
                kind: LowerErrorKind::JumpsIntoScope {
                    label: label.to_string(),
                    var: self.decl(var).name.clone(),
                },
                span,
            });
        }
        Ok(())
    }

    // Variable environment.

    /// Rebinds `key` in the open block's environment.
    pub(crate) fn bind(&mut self, key: VarKey, value: ValueId) {
        if let VarKey::Var(id) = key {
            if !self.bound_seq.contains_key(&id) {
                self.bind_counter += 1;
                self.bound_seq.insert(id, self.bind_counter);
            }
        }
        self.vars.insert(key, value);
    }

    pub(crate) fn bind_mark(&self) -> u32 {
        self.bind_counter
    }

    /// Current value of a variable in the open block.
    ///
    /// A miss materializes the parameter's `Arg` value, or a `FwdRef`
    /// placeholder for the downstream renaming pass to resolve.
    pub(crate) fn variable(&mut self, key: VarKey, ty: Type) -> ValueId {
        if let Some(value) = self.vars.get(&key) {
            return *value;
        }
        let value = match key {
            VarKey::Var(id) => {
                let decl = self.decl(id);
                if decl.class == StorageClass::Param
                    && !decl.addressed
                    && !self.bound_seq.contains_key(&id)
                {
                    let aux = Aux::ArgSym {
                        var: id,
                        name: decl.name.clone(),
                    };
                    let offset = decl.frame_offset;
                    let arg = self.entry_new_value0_aux(Op::Arg, ty, aux);
                    self.func.set_aux_int(arg, offset);
                    arg
                } else {
                    let aux = Aux::Name(decl.name.clone());
                    self.new_value0_aux(Op::FwdRef, ty, aux)
                }
            }
            VarKey::Memory => self.new_value0_aux(Op::FwdRef, ty, Aux::Name(".mem".to_string())),
            VarKey::Temp(n) => self.new_value0_aux(Op::FwdRef, ty, Aux::Name(format!(".t{}", n))),
        };
        self.vars.insert(key, value);
        value
    }

    /// Current memory state.
    pub(crate) fn mem(&mut self) -> ValueId {
        self.variable(VarKey::Memory, Type::Mem)
    }

    /// Marks `var` live in the open block ahead of its first store there.
    pub(crate) fn var_def(&mut self, var: VarId) {
        if !self.vardefed.insert(var) {
            return;
        }
        let name = self.decl(var).name.clone();
        let mem = self.mem();
        let marker = self.new_value1_aux(Op::VarDef, Type::Mem, Aux::Name(name), mem);
        self.bind(VarKey::Memory, marker);
    }

    /// One cached symbol per output parameter so repeated address loads can
    /// be eliminated downstream.
    pub(crate) fn lookup_symbol(&mut self, var: VarId, sym: Aux) -> Aux {
        if let Some(cached) = self.var_syms.get(&var) {
            return cached.clone();
        }
        self.var_syms.insert(var, sym.clone());
        sym
    }

    pub(crate) fn new_temp(&mut self) -> VarKey {
        let key = VarKey::Temp(self.next_temp);
        self.next_temp += 1;
        key
    }

    // Line number stack.

    pub(crate) fn push_line(&mut self, line: usize) {
        self.line.push(line);
    }

    pub(crate) fn pop_line(&mut self) {
        self.line.pop();
    }

    pub(crate) fn peek_line(&self) -> usize {
        self.line.last().copied().unwrap_or(0)
    }

    pub(crate) fn err(&self, span: Span, kind: LowerErrorKind) -> LowerError {
        LowerError { kind, span }
    }

    // Value constructors targeting the open block.

    fn cur(&self) -> BlockId {
        self.cur_block
            .unwrap_or_else(|| panic!("ssa lower_func value created outside any block"))
    }

    pub(crate) fn new_value0(&mut self, op: Op, ty: Type) -> ValueId {
        let (block, line) = (self.cur(), self.peek_line());
        self.func.new_value0(block, line, op, ty)
    }

    pub(crate) fn new_value0_aux(&mut self, op: Op, ty: Type, aux: Aux) -> ValueId {
        let (block, line) = (self.cur(), self.peek_line());
        self.func.new_value0_aux(block, line, op, ty, aux)
    }

    pub(crate) fn new_value1(&mut self, op: Op, ty: Type, arg: ValueId) -> ValueId {
        let (block, line) = (self.cur(), self.peek_line());
        self.func.new_value1(block, line, op, ty, arg)
    }

    pub(crate) fn new_value1_aux(&mut self, op: Op, ty: Type, aux: Aux, arg: ValueId) -> ValueId {
        let (block, line) = (self.cur(), self.peek_line());
        self.func.new_value1_aux(block, line, op, ty, aux, arg)
    }

    pub(crate) fn new_value1_int(&mut self, op: Op, ty: Type, aux_int: i64, arg: ValueId) -> ValueId {
        let (block, line) = (self.cur(), self.peek_line());
        self.func.new_value1_int(block, line, op, ty, aux_int, arg)
    }

    pub(crate) fn new_value2(&mut self, op: Op, ty: Type, arg0: ValueId, arg1: ValueId) -> ValueId {
        let (block, line) = (self.cur(), self.peek_line());
        self.func.new_value2(block, line, op, ty, arg0, arg1)
    }

    pub(crate) fn new_value2_int(
        &mut self,
        op: Op,
        ty: Type,
        aux_int: i64,
        arg0: ValueId,
        arg1: ValueId,
    ) -> ValueId {
        let (block, line) = (self.cur(), self.peek_line());
        self.func.new_value2_int(block, line, op, ty, aux_int, arg0, arg1)
    }

    pub(crate) fn new_value3(
        &mut self,
        op: Op,
        ty: Type,
        arg0: ValueId,
        arg1: ValueId,
        arg2: ValueId,
    ) -> ValueId {
        let (block, line) = (self.cur(), self.peek_line());
        self.func.new_value3(block, line, op, ty, arg0, arg1, arg2)
    }

    pub(crate) fn new_value3_int(
        &mut self,
        op: Op,
        ty: Type,
        aux_int: i64,
        arg0: ValueId,
        arg1: ValueId,
        arg2: ValueId,
    ) -> ValueId {
        let (block, line) = (self.cur(), self.peek_line());
        self.func
            .new_value3_int(block, line, op, ty, aux_int, arg0, arg1, arg2)
    }

    // Value constructors targeting the entry block.

    pub(crate) fn entry_new_value0_aux(&mut self, op: Op, ty: Type, aux: Aux) -> ValueId {
        let (entry, line) = (self.func.entry, self.peek_line());
        self.func.new_value0_aux(entry, line, op, ty, aux)
    }

    pub(crate) fn entry_new_value1_int(
        &mut self,
        op: Op,
        ty: Type,
        aux_int: i64,
        arg: ValueId,
    ) -> ValueId {
        let (entry, line) = (self.func.entry, self.peek_line());
        self.func.new_value1_int(entry, line, op, ty, aux_int, arg)
    }

    pub(crate) fn entry_new_value2(
        &mut self,
        op: Op,
        ty: Type,
        arg0: ValueId,
        arg1: ValueId,
    ) -> ValueId {
        let (entry, line) = (self.func.entry, self.peek_line());
        self.func.new_value2(entry, line, op, ty, arg0, arg1)
    }

    // Constants.

    pub(crate) fn const_bool(&mut self, value: bool) -> ValueId {
        let line = self.peek_line();
        self.func.const_bool(line, value)
    }

    pub(crate) fn const_int8(&mut self, ty: Type, value: i8) -> ValueId {
        let line = self.peek_line();
        self.func.const_int8(line, ty, value)
    }

    pub(crate) fn const_int16(&mut self, ty: Type, value: i16) -> ValueId {
        let line = self.peek_line();
        self.func.const_int16(line, ty, value)
    }

    pub(crate) fn const_int32(&mut self, ty: Type, value: i32) -> ValueId {
        let line = self.peek_line();
        self.func.const_int32(line, ty, value)
    }

    pub(crate) fn const_int64(&mut self, ty: Type, value: i64) -> ValueId {
        let line = self.peek_line();
        self.func.const_int64(line, ty, value)
    }

    /// Integer constant sized by its type's exact byte width.
    pub(crate) fn const_int(&mut self, ty: Type, value: i64) -> ValueId {
        match ty.size_bytes() {
            1 => {
                if i64::from(value as i8) != value {
                    panic!("ssa lower_func integer constant too big: {}", value);
                }
                self.const_int8(ty, value as i8)
            }
            2 => {
                if i64::from(value as i16) != value {
                    panic!("ssa lower_func integer constant too big: {}", value);
                }
                self.const_int16(ty, value as i16)
            }
            4 => {
                if i64::from(value as i32) != value {
                    panic!("ssa lower_func integer constant too big: {}", value);
                }
                self.const_int32(ty, value as i32)
            }
            8 => self.const_int64(ty, value),
            size => panic!("ssa lower_func bad integer constant size {}", size),
        }
    }

    pub(crate) fn const_float32(&mut self, ty: Type, value: f32) -> ValueId {
        let line = self.peek_line();
        self.func.const_float32(line, ty, value)
    }

    pub(crate) fn const_float64(&mut self, ty: Type, value: f64) -> ValueId {
        let line = self.peek_line();
        self.func.const_float64(line, ty, value)
    }

    pub(crate) fn const_string(&mut self, value: impl Into<String>) -> ValueId {
        let line = self.peek_line();
        self.func.const_string(line, value)
    }

    pub(crate) fn const_nil(&mut self, ty: Type) -> ValueId {
        let line = self.peek_line();
        self.func.const_nil(line, ty)
    }
}
