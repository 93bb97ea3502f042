//! Expression lowering and zero-value materialization.

use crate::ssa::lower::lowerer::{Lowerer, VarKey};
use crate::ssa::lower::opsel;
use crate::ssa::lower::{LowerError, LowerErrorKind};
use crate::ssa::model::ir::{BlockKind, ValueId};
use crate::ssa::model::op::Op;
use crate::tree::{BinaryOp, CallKind, Expr, ExprKind, StorageClass};
use crate::types::Type;

impl<'a> Lowerer<'a> {
    /// Lowers `expr` to a single SSA value in the open block.
    pub(crate) fn expr(&mut self, expr: &Expr) -> Result<ValueId, LowerError> {
        match &expr.kind {
            ExprKind::Var(id) => {
                let decl = self.decl(*id);
                match decl.class {
                    StorageClass::Extern => Err(self.err(
                        expr.span,
                        LowerErrorKind::ExternVariable(decl.name.clone()),
                    )),
                    _ if Lowerer::can_ssa(decl) => {
                        Ok(self.variable(VarKey::Var(*id), expr.ty))
                    }
                    _ => {
                        // Memory-resident variable: read through its address.
                        let addr = self.addr(expr, false)?;
                        let mem = self.mem();
                        Ok(self.new_value2(Op::Load, expr.ty, addr, mem))
                    }
                }
            }

            ExprKind::IntLit(value) => Ok(self.const_int(expr.ty, *value)),
            ExprKind::FloatLit(value) => match expr.ty {
                Type::Float { bits: 32 } => Ok(self.const_float32(expr.ty, *value as f32)),
                Type::Float { bits: 64 } => Ok(self.const_float64(expr.ty, *value)),
                other => panic!("ssa lower_func float literal of type {}", other),
            },
            ExprKind::BoolLit(value) => Ok(self.const_bool(*value)),
            ExprKind::StringLit(value) => Ok(self.const_string(value.clone())),
            ExprKind::NilLit => Ok(self.const_nil(expr.ty)),

            ExprKind::Paren(inner) => self.expr(inner),

            ExprKind::Unary { op, operand } => {
                let value = self.expr(operand)?;
                let opcode = opsel::unop_op(*op, operand.ty).unwrap_or_else(|| {
                    panic!(
                        "ssa lower_func unhandled unary op {:?} for {}",
                        op, operand.ty
                    )
                });
                Ok(self.new_value1(opcode, expr.ty, value))
            }

            ExprKind::Binary { op, lhs, rhs } => self.binary_expr(expr, *op, lhs, rhs),

            ExprKind::Conv { operand } => self.conv_expr(expr, operand),

            ExprKind::Index { .. }
            | ExprKind::Deref { .. }
            | ExprKind::Field { .. }
            | ExprKind::ArgSlot { .. } => {
                // Place reads: compute the address, then load through memory.
                let addr = self.addr(expr, false)?;
                let mem = self.mem();
                Ok(self.new_value2(Op::Load, expr.ty, addr, mem))
            }

            ExprKind::Call(call) => {
                if call.kind != CallKind::Normal {
                    panic!("ssa lower_func deferred call in expression position");
                }
                let result = self.lower_call(expr.span, call)?;
                result.ok_or_else(|| {
                    self.err(
                        expr.span,
                        LowerErrorKind::UnsupportedExpression("call with no result used as value"),
                    )
                })
            }
        }
    }

    fn binary_expr(
        &mut self,
        expr: &Expr,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<ValueId, LowerError> {
        match op {
            BinaryOp::LogicalAnd | BinaryOp::LogicalOr => {
                // Short-circuit operators only make sense where both
                // continuations exist; that is the branch lowering's job.
                Err(self.err(
                    expr.span,
                    LowerErrorKind::UnsupportedExpression(
                        "logical operator outside branch context",
                    ),
                ))
            }
            BinaryOp::Lsh | BinaryOp::Rsh => {
                let left = self.expr(lhs)?;
                let right = self.expr(rhs)?;
                let opcode = opsel::shift_op(op, lhs.ty, rhs.ty).unwrap_or_else(|| {
                    panic!(
                        "ssa lower_func unhandled shift op {:?} for {}/{}",
                        op, lhs.ty, rhs.ty
                    )
                });
                Ok(self.new_value2(opcode, expr.ty, left, right))
            }
            BinaryOp::Lrot => {
                let left = self.expr(lhs)?;
                let right = self.expr(rhs)?;
                let opcode = opsel::rotate_op(lhs.ty).unwrap_or_else(|| {
                    panic!("ssa lower_func unhandled rotate for {}", lhs.ty)
                });
                Ok(self.new_value2(opcode, expr.ty, left, right))
            }
            _ => {
                // The table is keyed by the operand type; comparisons produce
                // bool while their opcode is chosen by what they compare.
                let left = self.expr(lhs)?;
                let right = self.expr(rhs)?;
                let opcode = opsel::binop_op(op, lhs.ty).unwrap_or_else(|| {
                    panic!(
                        "ssa lower_func unhandled binary op {:?} for {}",
                        op, lhs.ty
                    )
                });
                Ok(self.new_value2(opcode, expr.ty, left, right))
            }
        }
    }

    fn conv_expr(&mut self, expr: &Expr, operand: &Expr) -> Result<ValueId, LowerError> {
        let from = operand.ty;
        let to = expr.ty;
        let value = self.expr(operand)?;

        if matches!(from, Type::Int { .. }) && matches!(to, Type::Int { .. }) {
            let opcode = opsel::int_conversion(from, to).unwrap_or_else(|| {
                panic!("ssa lower_func unhandled conversion {} -> {}", from, to)
            });
            if opcode == Op::Copy {
                return Ok(self.new_value1(Op::Copy, to, value));
            }
            return Ok(self.new_value1(opcode, to, value));
        }

        let plan = opsel::conversion(from, to).unwrap_or_else(|| {
            panic!("ssa lower_func unhandled conversion {} -> {}", from, to)
        });

        if plan.needs_expansion() {
            // No machine form at all: expand into a compare/branch sequence.
            return match (from, to) {
                (Type::Int { signed: false, bits: 64 }, Type::Float { .. }) => {
                    Ok(self.uint64_to_float(value, to))
                }
                (Type::Float { .. }, Type::Int { signed: false, bits: 64 }) => {
                    Ok(self.float_to_uint64(value, from, to))
                }
                _ => panic!(
                    "ssa lower_func conversion {} -> {} marked invalid with no expansion",
                    from, to
                ),
            };
        }

        let mut converted = value;
        if plan.op1 != Op::Copy {
            converted = self.new_value1(plan.op1, plan.mid, converted);
        }
        if plan.op2 != Op::Copy {
            converted = self.new_value1(plan.op2, to, converted);
        }
        Ok(converted)
    }

    /// u64 -> float: a direct signed conversion works for small values; for
    /// values with the top bit set, halve with the low bit folded in (to keep
    /// rounding right), convert, and double.
    fn uint64_to_float(&mut self, value: ValueId, to: Type) -> ValueId {
        let u64t = Type::uint(64);
        let i64t = Type::int(64);
        let (cvt_op, add_op) = match to {
            Type::Float { bits: 32 } => (Op::Cvt64to32F, Op::Add32F),
            Type::Float { bits: 64 } => (Op::Cvt64to64F, Op::Add64F),
            other => panic!("ssa lower_func uint64 conversion to {}", other),
        };

        let zero = self.const_int64(i64t, 0);
        let in_range = self.new_value2(Op::Geq64, Type::Bool, value, zero);

        let direct_b = self.func.new_block(BlockKind::Plain);
        let halved_b = self.func.new_block(BlockKind::Plain);
        let after_b = self.func.new_block(BlockKind::Plain);

        let block = self
            .end_block()
            .expect("ssa lower_func conversion outside any block");
        self.func.seal_block(block, BlockKind::If, Some(in_range));
        self.func.add_edge(block, direct_b);
        self.func.add_edge(block, halved_b);

        let result = self.new_temp();

        self.start_block(direct_b);
        let converted = self.new_value1(cvt_op, to, value);
        self.bind(result, converted);
        let block = self.end_block().expect("ssa lower_func lost open block");
        self.func.add_edge(block, after_b);

        self.start_block(halved_b);
        let one = self.const_int64(u64t, 1);
        let half = self.new_value2(Op::Rsh64Ux64, u64t, value, one);
        let low_bit = self.new_value2(Op::And64, u64t, value, one);
        let folded = self.new_value2(Op::Or64, u64t, half, low_bit);
        let converted = self.new_value1(cvt_op, to, folded);
        let doubled = self.new_value2(add_op, to, converted, converted);
        self.bind(result, doubled);
        let block = self.end_block().expect("ssa lower_func lost open block");
        self.func.add_edge(block, after_b);

        self.start_block(after_b);
        self.variable(result, to)
    }

    /// float -> u64: values below 2^63 convert directly through the signed
    /// path; larger ones are rebased by -2^63 and the sign bit is OR'd back.
    fn float_to_uint64(&mut self, value: ValueId, from: Type, to: Type) -> ValueId {
        let u64t = Type::uint(64);
        let (less_op, sub_op, cvt_op) = match from {
            Type::Float { bits: 32 } => (Op::Less32F, Op::Sub32F, Op::Cvt32Fto64),
            Type::Float { bits: 64 } => (Op::Less64F, Op::Sub64F, Op::Cvt64Fto64),
            other => panic!("ssa lower_func conversion from {} to uint64", other),
        };
        let cutoff = match from {
            Type::Float { bits: 32 } => self.const_float32(from, 9223372036854775808.0),
            _ => self.const_float64(from, 9223372036854775808.0),
        };

        let in_range = self.new_value2(less_op, Type::Bool, value, cutoff);

        let direct_b = self.func.new_block(BlockKind::Plain);
        let rebased_b = self.func.new_block(BlockKind::Plain);
        let after_b = self.func.new_block(BlockKind::Plain);

        let block = self
            .end_block()
            .expect("ssa lower_func conversion outside any block");
        self.func.seal_block(block, BlockKind::If, Some(in_range));
        self.func.add_edge(block, direct_b);
        self.func.add_edge(block, rebased_b);

        let result = self.new_temp();

        self.start_block(direct_b);
        let converted = self.new_value1(cvt_op, to, value);
        self.bind(result, converted);
        let block = self.end_block().expect("ssa lower_func lost open block");
        self.func.add_edge(block, after_b);

        self.start_block(rebased_b);
        let rebased = self.new_value2(sub_op, from, value, cutoff);
        let converted = self.new_value1(cvt_op, to, rebased);
        let sign_bit = self.const_int64(u64t, i64::MIN);
        let restored = self.new_value2(Op::Or64, to, converted, sign_bit);
        self.bind(result, restored);
        let block = self.end_block().expect("ssa lower_func lost open block");
        self.func.add_edge(block, after_b);

        self.start_block(after_b);
        self.variable(result, to)
    }

    /// Builds the zero value for `ty`. Every size/kind combination outside
    /// the enumerated set is a defect in the lowering rules.
    pub(crate) fn zero_val(&mut self, ty: Type) -> ValueId {
        match ty {
            Type::Int { .. } | Type::Uintptr => match ty.size_bytes() {
                1 => self.const_int8(ty, 0),
                2 => self.const_int16(ty, 0),
                4 => self.const_int32(ty, 0),
                8 => self.const_int64(ty, 0),
                size => panic!("ssa lower_func bad sized integer type {} ({})", ty, size),
            },
            Type::Float { bits: 32 } => self.const_float32(ty, 0.0),
            Type::Float { bits: 64 } => self.const_float64(ty, 0.0),
            Type::Complex { bits: 64 } => {
                let half = self.const_float32(Type::float(32), 0.0);
                self.entry_new_value2(Op::ComplexMake, ty, half, half)
            }
            Type::Complex { bits: 128 } => {
                let half = self.const_float64(Type::float(64), 0.0);
                self.entry_new_value2(Op::ComplexMake, ty, half, half)
            }
            Type::String => self.const_string(""),
            Type::Ptr => self.const_nil(ty),
            Type::Bool => self.const_bool(false),
            Type::Interface => {
                let line = self.peek_line();
                self.func.const_interface(line, ty)
            }
            Type::Slice => {
                let line = self.peek_line();
                self.func.const_slice(line, ty)
            }
            other => panic!("ssa lower_func zero for type {} not implemented", other),
        }
    }
}
