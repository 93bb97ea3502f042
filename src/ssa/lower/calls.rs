//! Call lowering.
//!
//! Three call kinds share one path: normal, deferred, and asynchronous.
//! Argument marshaling arrives as ordinary assignment statements into
//! pre-offset frame slots; the call itself terminates the current block and
//! the result, if any, is read back from the frame at the start of the
//! continuation block.

use crate::diag::Span;
use crate::ssa::lower::lowerer::{Lowerer, VarKey};
use crate::ssa::lower::LowerError;
use crate::ssa::model::ir::{Aux, BlockKind, ValueId};
use crate::ssa::model::op::Op;
use crate::tree::{CallExpr, CallKind, CallTarget};
use crate::types::Type;

const PTR_SIZE: i64 = 8;

/// Offset of the method-pointer array past the itab header.
const ITAB_METHODS_OFFSET: i64 = 3 * PTR_SIZE + 8;

impl<'a> Lowerer<'a> {
    /// Lowers one call. Returns the result value for normal calls of
    /// non-void callees, `None` otherwise.
    pub(crate) fn lower_call(
        &mut self,
        span: Span,
        call: &CallExpr,
    ) -> Result<Option<ValueId>, LowerError> {
        let _ = span;
        let mut static_name: Option<String> = None;
        let mut closure: Option<ValueId> = None;
        let mut code_ptr: Option<ValueId> = None;
        let mut receiver: Option<ValueId> = None;

        match &call.target {
            CallTarget::Static { name } => {
                if call.kind == CallKind::Normal {
                    static_name = Some(name.clone());
                } else {
                    // Deferred and async calls always go through a closure;
                    // materialize the function's address as one.
                    let sb = self.sb;
                    let addr =
                        self.new_value1_aux(Op::Addr, Type::Ptr, Aux::Name(name.clone()), sb);
                    closure = Some(addr);
                }
            }
            CallTarget::Closure(callee) => {
                closure = Some(self.expr(callee)?);
            }
            CallTarget::Interface {
                recv,
                method_offset,
            } => {
                let iface = self.expr(recv)?;
                let itab = self.new_value1(Op::ITab, Type::Uintptr, iface);
                let entry_offset = method_offset + ITAB_METHODS_OFFSET;
                let entry = self.new_value1_int(Op::OffPtr, Type::Uintptr, entry_offset, itab);
                if call.kind == CallKind::Normal {
                    let mem = self.mem();
                    code_ptr = Some(self.new_value2(Op::Load, Type::Uintptr, entry, mem));
                } else {
                    closure = Some(entry);
                }
                receiver = Some(self.new_value1(Op::IData, Type::Ptr, iface));
            }
        }

        // Argument slots were already offset by the front end (+8 for
        // interface receivers, +16 for defer/go headers).
        let mut arg_size = call.arg_size;
        self.stmt_list(&call.arg_stmts)?;

        if let Some(receiver) = receiver {
            let sp = self.sp;
            let slot = self.entry_new_value1_int(Op::OffPtr, Type::Ptr, 0, sp);
            let mem = self.mem();
            let stored =
                self.new_value3_int(Op::Store, Type::Mem, PTR_SIZE, slot, receiver, mem);
            self.bind(VarKey::Memory, stored);
        }

        if call.kind != CallKind::Normal {
            // The runtime expects the frame size and the closure pointer in a
            // reserved prefix ahead of the arguments.
            let closure_value =
                closure.unwrap_or_else(|| panic!("ssa lower_func deferred call without closure"));
            let size_value = self.const_int32(Type::uint(32), arg_size as i32);
            let sp = self.sp;
            let mem = self.mem();
            let stored = self.new_value3_int(Op::Store, Type::Mem, 4, sp, size_value, mem);
            self.bind(VarKey::Memory, stored);

            let closure_slot = self.entry_new_value1_int(Op::OffPtr, Type::Ptr, PTR_SIZE, sp);
            let mem = self.mem();
            let stored =
                self.new_value3_int(Op::Store, Type::Mem, PTR_SIZE, closure_slot, closure_value, mem);
            self.bind(VarKey::Memory, stored);

            arg_size += 2 * PTR_SIZE;
        }

        let continuation = self.func.new_block(BlockKind::Plain);

        let mem = self.mem();
        let call_value = match call.kind {
            CallKind::Defer => self.new_value1(Op::DeferCall, Type::Mem, mem),
            CallKind::Go => self.new_value1(Op::GoCall, Type::Mem, mem),
            CallKind::Normal => {
                if let Some(closure_value) = closure {
                    let loaded = self.new_value2(Op::Load, Type::Uintptr, closure_value, mem);
                    self.new_value3(Op::ClosureCall, Type::Mem, loaded, closure_value, mem)
                } else if let Some(code_ptr) = code_ptr {
                    self.new_value2(Op::InterCall, Type::Mem, code_ptr, mem)
                } else if let Some(name) = static_name {
                    self.new_value1_aux(Op::StaticCall, Type::Mem, Aux::Name(name), mem)
                } else {
                    panic!("ssa lower_func call with no resolved target")
                }
            }
        };
        // Call operations carry the callee's argument frame size with them.
        self.func.set_aux_int(call_value, arg_size);
        self.bind(VarKey::Memory, call_value);

        let block = self
            .end_block()
            .expect("ssa lower_func call outside any block");
        self.func.seal_block(block, BlockKind::Call, Some(call_value));
        self.func.add_edge(block, continuation);
        self.start_block(continuation);
        self.bind(VarKey::Memory, call_value);

        // Only normal calls produce a readable result.
        match (&call.result, call.kind) {
            (Some((result_ty, result_offset)), CallKind::Normal) => {
                let sp = self.sp;
                let slot = self.entry_new_value1_int(Op::OffPtr, Type::Ptr, *result_offset, sp);
                Ok(Some(self.new_value2(Op::Load, *result_ty, slot, call_value)))
            }
            _ => Ok(None),
        }
    }
}
