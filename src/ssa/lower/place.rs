//! Address lowering.

use crate::ssa::lower::lowerer::{Lowerer, VarKey};
use crate::ssa::lower::{LowerError, LowerErrorKind};
use crate::ssa::model::ir::{Aux, BlockKind, ValueId};
use crate::ssa::model::op::Op;
use crate::tree::{Expr, ExprKind, StorageClass};
use crate::types::Type;

impl<'a> Lowerer<'a> {
    /// Computes the address of the lvalue `expr`. The returned value is
    /// guaranteed non-nil; `bounded` suppresses the nil check when the caller
    /// already knows the pointer cannot be nil.
    pub(crate) fn addr(&mut self, expr: &Expr, bounded: bool) -> Result<ValueId, LowerError> {
        match &expr.kind {
            ExprKind::Var(id) => {
                let decl = self.decl(*id);
                if let Some(heap_slot) = decl.heap_addr {
                    // Heap-escaped: indirect through the heap-address slot.
                    return Ok(self.variable(VarKey::Var(heap_slot), Type::Ptr));
                }
                match decl.class {
                    StorageClass::Extern => Err(self.err(
                        expr.span,
                        LowerErrorKind::ExternVariable(decl.name.clone()),
                    )),
                    StorageClass::Param => {
                        let slot = self.decl_addrs.get(id).copied().unwrap_or_else(|| {
                            panic!("ssa lower_func addr of undeclared param '{}'", decl.name)
                        });
                        Ok(slot)
                    }
                    StorageClass::Auto => {
                        // Regenerate the address at every use so it always
                        // lands after the variable's liveness marker.
                        let aux = Aux::AutoSym {
                            var: *id,
                            name: decl.name.clone(),
                        };
                        let sp = self.sp;
                        Ok(self.new_value1_aux(Op::Addr, Type::Ptr, aux, sp))
                    }
                    StorageClass::ParamOut => {
                        // Reuse one symbol per output parameter so repeated
                        // address loads can be CSE'd downstream.
                        let sym = Aux::ArgSym {
                            var: *id,
                            name: decl.name.clone(),
                        };
                        let aux = self.lookup_symbol(*id, sym);
                        let sp = self.sp;
                        Ok(self.new_value1_aux(Op::Addr, Type::Ptr, aux, sp))
                    }
                }
            }

            ExprKind::Index {
                base,
                index,
                bounded: proven,
            } => {
                if base.ty == Type::Slice {
                    let slice = self.expr(base)?;
                    let index_value = self.expr(index)?;
                    let index_value = self.extend_index(index_value, index.ty);
                    let len = self.new_value1(Op::SliceLen, Type::int(64), slice);
                    if !(bounded || *proven) {
                        self.bounds_check(index_value, len);
                    }
                    let data = self.new_value1(Op::SlicePtr, Type::Ptr, slice);
                    Ok(self.new_value2(Op::PtrIndex, Type::Ptr, data, index_value))
                } else if let Type::Array { len } = base.ty {
                    let base_addr = self.addr(base, bounded)?;
                    let index_value = self.expr(index)?;
                    let index_value = self.extend_index(index_value, index.ty);
                    let bound = self.const_int64(Type::int(64), len);
                    if !(bounded || *proven) {
                        self.bounds_check(index_value, bound);
                    }
                    Ok(self.new_value2(Op::PtrIndex, Type::Ptr, base_addr, index_value))
                } else {
                    panic!("ssa lower_func index address on {}", base.ty)
                }
            }

            ExprKind::Deref {
                ptr,
                bounded: proven,
            } => {
                let pointer = self.expr(ptr)?;
                if !(bounded || *proven) {
                    self.nil_check(pointer);
                }
                Ok(pointer)
            }

            ExprKind::ArgSlot { offset } => {
                // Argument slots live at fixed offsets off the stack pointer.
                let sp = self.sp;
                Ok(self.entry_new_value1_int(Op::OffPtr, Type::Ptr, *offset, sp))
            }

            ExprKind::Field {
                base,
                offset,
                through_ptr,
            } => {
                let base_addr = if *through_ptr {
                    let pointer = self.expr(base)?;
                    if !bounded {
                        self.nil_check(pointer);
                    }
                    pointer
                } else {
                    self.addr(base, bounded)?
                };
                let offset_value = self.const_int64(Type::int(64), *offset);
                Ok(self.new_value2(Op::AddPtr, Type::Ptr, base_addr, offset_value))
            }

            other => panic!("ssa lower_func unhandled address expression {:?}", other),
        }
    }

    /// Widens an index to the machine word per its signedness.
    pub(crate) fn extend_index(&mut self, index: ValueId, ty: Type) -> ValueId {
        let (signed, bits) = match ty {
            Type::Int { signed, bits } => (signed, bits),
            Type::Uintptr => return index,
            other => panic!("ssa lower_func non-integer index type {}", other),
        };
        if bits == 64 {
            return index;
        }
        let op = match (signed, bits) {
            (true, 8) => Op::SignExt8to64,
            (true, 16) => Op::SignExt16to64,
            (true, 32) => Op::SignExt32to64,
            (false, 8) => Op::ZeroExt8to64,
            (false, 16) => Op::ZeroExt16to64,
            (false, 32) => Op::ZeroExt32to64,
            _ => panic!("ssa lower_func bad index width {}", bits),
        };
        self.new_value1(op, Type::Int { signed, bits: 64 }, index)
    }

    /// Branches to a panic exit unless `index` is within `len`.
    pub(crate) fn bounds_check(&mut self, index: ValueId, len: ValueId) {
        let in_bounds = self.new_value2(Op::IsInBounds, Type::Bool, index, len);
        self.check_branch(in_bounds, Op::PanicIndexCheck);
    }

    /// Branches to a panic exit unless `pointer` is non-nil.
    pub(crate) fn nil_check(&mut self, pointer: ValueId) {
        let non_nil = self.new_value1(Op::IsNonNil, Type::Bool, pointer);
        self.check_branch(non_nil, Op::PanicNilCheck);
    }

    fn check_branch(&mut self, ok: ValueId, panic_op: Op) {
        let next_b = self.func.new_block(BlockKind::Plain);
        let panic_b = self.func.new_block(BlockKind::Plain);

        let block = self
            .end_block()
            .expect("ssa lower_func check outside any block");
        self.func.seal_block(block, BlockKind::If, Some(ok));
        self.func.add_edge(block, next_b);
        self.func.add_edge(block, panic_b);

        self.start_block(panic_b);
        let mem = self.mem();
        let panic_value = self.new_value1(panic_op, Type::Mem, mem);
        let block = self.end_block().expect("ssa lower_func lost panic block");
        self.func.seal_block(block, BlockKind::Exit, Some(panic_value));

        self.start_block(next_b);
    }
}
