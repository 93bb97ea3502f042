//! Opcode selection tables.
//!
//! Pure lookups from (source operator, operand type(s)) to a machine-level
//! SSA opcode. The tables are total over their declared domain: `None` means
//! the combination has no lowering rule, and the caller must treat that as a
//! defect in the tables, never substitute a neighboring opcode.

use crate::ssa::model::op::Op;
use crate::tree::{BinaryOp, UnaryOp};
use crate::types::Type;

/// Binary arithmetic, bitwise, and comparison operators keyed by the operand
/// type. Shifts and rotates have their own tables below.
pub(crate) fn binop_op(op: BinaryOp, ty: Type) -> Option<Op> {
    use Type::{Bool, Float, Int, Uintptr};

    let chosen = match (op, ty) {
        (BinaryOp::Add, Int { bits: 8, .. }) => Op::Add8,
        (BinaryOp::Add, Int { bits: 16, .. }) => Op::Add16,
        (BinaryOp::Add, Int { bits: 32, .. }) => Op::Add32,
        (BinaryOp::Add, Int { bits: 64, .. }) => Op::Add64,
        (BinaryOp::Add, Float { bits: 32 }) => Op::Add32F,
        (BinaryOp::Add, Float { bits: 64 }) => Op::Add64F,

        (BinaryOp::Sub, Int { bits: 8, .. }) => Op::Sub8,
        (BinaryOp::Sub, Int { bits: 16, .. }) => Op::Sub16,
        (BinaryOp::Sub, Int { bits: 32, .. }) => Op::Sub32,
        (BinaryOp::Sub, Int { bits: 64, .. }) => Op::Sub64,
        (BinaryOp::Sub, Float { bits: 32 }) => Op::Sub32F,
        (BinaryOp::Sub, Float { bits: 64 }) => Op::Sub64F,

        (BinaryOp::Mul, Int { bits: 8, .. }) => Op::Mul8,
        (BinaryOp::Mul, Int { bits: 16, .. }) => Op::Mul16,
        (BinaryOp::Mul, Int { bits: 32, .. }) => Op::Mul32,
        (BinaryOp::Mul, Int { bits: 64, .. }) => Op::Mul64,
        (BinaryOp::Mul, Float { bits: 32 }) => Op::Mul32F,
        (BinaryOp::Mul, Float { bits: 64 }) => Op::Mul64F,

        (BinaryOp::Div, Float { bits: 32 }) => Op::Div32F,
        (BinaryOp::Div, Float { bits: 64 }) => Op::Div64F,
        (BinaryOp::Div, Int { signed: true, bits: 8 }) => Op::Div8,
        (BinaryOp::Div, Int { signed: false, bits: 8 }) => Op::Div8u,
        (BinaryOp::Div, Int { signed: true, bits: 16 }) => Op::Div16,
        (BinaryOp::Div, Int { signed: false, bits: 16 }) => Op::Div16u,
        (BinaryOp::Div, Int { signed: true, bits: 32 }) => Op::Div32,
        (BinaryOp::Div, Int { signed: false, bits: 32 }) => Op::Div32u,
        (BinaryOp::Div, Int { signed: true, bits: 64 }) => Op::Div64,
        (BinaryOp::Div, Int { signed: false, bits: 64 }) => Op::Div64u,

        (BinaryOp::Mod, Int { signed: true, bits: 8 }) => Op::Mod8,
        (BinaryOp::Mod, Int { signed: false, bits: 8 }) => Op::Mod8u,
        (BinaryOp::Mod, Int { signed: true, bits: 16 }) => Op::Mod16,
        (BinaryOp::Mod, Int { signed: false, bits: 16 }) => Op::Mod16u,
        (BinaryOp::Mod, Int { signed: true, bits: 32 }) => Op::Mod32,
        (BinaryOp::Mod, Int { signed: false, bits: 32 }) => Op::Mod32u,
        (BinaryOp::Mod, Int { signed: true, bits: 64 }) => Op::Mod64,
        (BinaryOp::Mod, Int { signed: false, bits: 64 }) => Op::Mod64u,

        (BinaryOp::Hmul, Int { signed: true, bits: 8 }) => Op::Hmul8,
        (BinaryOp::Hmul, Int { signed: false, bits: 8 }) => Op::Hmul8u,
        (BinaryOp::Hmul, Int { signed: true, bits: 16 }) => Op::Hmul16,
        (BinaryOp::Hmul, Int { signed: false, bits: 16 }) => Op::Hmul16u,
        (BinaryOp::Hmul, Int { signed: true, bits: 32 }) => Op::Hmul32,
        (BinaryOp::Hmul, Int { signed: false, bits: 32 }) => Op::Hmul32u,

        (BinaryOp::And, Int { bits: 8, .. }) => Op::And8,
        (BinaryOp::And, Int { bits: 16, .. }) => Op::And16,
        (BinaryOp::And, Int { bits: 32, .. }) => Op::And32,
        (BinaryOp::And, Int { bits: 64, .. }) => Op::And64,

        (BinaryOp::Or, Int { bits: 8, .. }) => Op::Or8,
        (BinaryOp::Or, Int { bits: 16, .. }) => Op::Or16,
        (BinaryOp::Or, Int { bits: 32, .. }) => Op::Or32,
        (BinaryOp::Or, Int { bits: 64, .. }) => Op::Or64,

        (BinaryOp::Xor, Int { bits: 8, .. }) => Op::Xor8,
        (BinaryOp::Xor, Int { bits: 16, .. }) => Op::Xor16,
        (BinaryOp::Xor, Int { bits: 32, .. }) => Op::Xor32,
        (BinaryOp::Xor, Int { bits: 64, .. }) => Op::Xor64,

        (BinaryOp::Eq, Bool) => Op::Eq8,
        (BinaryOp::Eq, Int { bits: 8, .. }) => Op::Eq8,
        (BinaryOp::Eq, Int { bits: 16, .. }) => Op::Eq16,
        (BinaryOp::Eq, Int { bits: 32, .. }) => Op::Eq32,
        (BinaryOp::Eq, Int { bits: 64, .. }) => Op::Eq64,
        (BinaryOp::Eq, Uintptr) => Op::EqPtr,
        (BinaryOp::Eq, Float { bits: 32 }) => Op::Eq32F,
        (BinaryOp::Eq, Float { bits: 64 }) => Op::Eq64F,

        (BinaryOp::Ne, Bool) => Op::Neq8,
        (BinaryOp::Ne, Int { bits: 8, .. }) => Op::Neq8,
        (BinaryOp::Ne, Int { bits: 16, .. }) => Op::Neq16,
        (BinaryOp::Ne, Int { bits: 32, .. }) => Op::Neq32,
        (BinaryOp::Ne, Int { bits: 64, .. }) => Op::Neq64,
        (BinaryOp::Ne, Uintptr) => Op::NeqPtr,
        (BinaryOp::Ne, Float { bits: 32 }) => Op::Neq32F,
        (BinaryOp::Ne, Float { bits: 64 }) => Op::Neq64F,

        (BinaryOp::Lt, Int { signed: true, bits: 8 }) => Op::Less8,
        (BinaryOp::Lt, Int { signed: false, bits: 8 }) => Op::Less8U,
        (BinaryOp::Lt, Int { signed: true, bits: 16 }) => Op::Less16,
        (BinaryOp::Lt, Int { signed: false, bits: 16 }) => Op::Less16U,
        (BinaryOp::Lt, Int { signed: true, bits: 32 }) => Op::Less32,
        (BinaryOp::Lt, Int { signed: false, bits: 32 }) => Op::Less32U,
        (BinaryOp::Lt, Int { signed: true, bits: 64 }) => Op::Less64,
        (BinaryOp::Lt, Int { signed: false, bits: 64 }) => Op::Less64U,
        (BinaryOp::Lt, Float { bits: 32 }) => Op::Less32F,
        (BinaryOp::Lt, Float { bits: 64 }) => Op::Less64F,

        (BinaryOp::Gt, Int { signed: true, bits: 8 }) => Op::Greater8,
        (BinaryOp::Gt, Int { signed: false, bits: 8 }) => Op::Greater8U,
        (BinaryOp::Gt, Int { signed: true, bits: 16 }) => Op::Greater16,
        (BinaryOp::Gt, Int { signed: false, bits: 16 }) => Op::Greater16U,
        (BinaryOp::Gt, Int { signed: true, bits: 32 }) => Op::Greater32,
        (BinaryOp::Gt, Int { signed: false, bits: 32 }) => Op::Greater32U,
        (BinaryOp::Gt, Int { signed: true, bits: 64 }) => Op::Greater64,
        (BinaryOp::Gt, Int { signed: false, bits: 64 }) => Op::Greater64U,
        (BinaryOp::Gt, Float { bits: 32 }) => Op::Greater32F,
        (BinaryOp::Gt, Float { bits: 64 }) => Op::Greater64F,

        (BinaryOp::Le, Int { signed: true, bits: 8 }) => Op::Leq8,
        (BinaryOp::Le, Int { signed: false, bits: 8 }) => Op::Leq8U,
        (BinaryOp::Le, Int { signed: true, bits: 16 }) => Op::Leq16,
        (BinaryOp::Le, Int { signed: false, bits: 16 }) => Op::Leq16U,
        (BinaryOp::Le, Int { signed: true, bits: 32 }) => Op::Leq32,
        (BinaryOp::Le, Int { signed: false, bits: 32 }) => Op::Leq32U,
        (BinaryOp::Le, Int { signed: true, bits: 64 }) => Op::Leq64,
        (BinaryOp::Le, Int { signed: false, bits: 64 }) => Op::Leq64U,
        (BinaryOp::Le, Float { bits: 32 }) => Op::Leq32F,
        (BinaryOp::Le, Float { bits: 64 }) => Op::Leq64F,

        (BinaryOp::Ge, Int { signed: true, bits: 8 }) => Op::Geq8,
        (BinaryOp::Ge, Int { signed: false, bits: 8 }) => Op::Geq8U,
        (BinaryOp::Ge, Int { signed: true, bits: 16 }) => Op::Geq16,
        (BinaryOp::Ge, Int { signed: false, bits: 16 }) => Op::Geq16U,
        (BinaryOp::Ge, Int { signed: true, bits: 32 }) => Op::Geq32,
        (BinaryOp::Ge, Int { signed: false, bits: 32 }) => Op::Geq32U,
        (BinaryOp::Ge, Int { signed: true, bits: 64 }) => Op::Geq64,
        (BinaryOp::Ge, Int { signed: false, bits: 64 }) => Op::Geq64U,
        (BinaryOp::Ge, Float { bits: 32 }) => Op::Geq32F,
        (BinaryOp::Ge, Float { bits: 64 }) => Op::Geq64F,

        _ => return None,
    };
    Some(chosen)
}

/// Unary operators keyed by the operand type.
pub(crate) fn unop_op(op: UnaryOp, ty: Type) -> Option<Op> {
    use Type::{Bool, Complex, Float, Int};

    let chosen = match (op, ty) {
        (UnaryOp::Not, Bool) => Op::Not,

        (UnaryOp::Neg, Int { bits: 8, .. }) => Op::Neg8,
        (UnaryOp::Neg, Int { bits: 16, .. }) => Op::Neg16,
        (UnaryOp::Neg, Int { bits: 32, .. }) => Op::Neg32,
        (UnaryOp::Neg, Int { bits: 64, .. }) => Op::Neg64,
        (UnaryOp::Neg, Float { bits: 32 }) => Op::Neg32F,
        (UnaryOp::Neg, Float { bits: 64 }) => Op::Neg64F,

        (UnaryOp::Com, Int { bits: 8, .. }) => Op::Com8,
        (UnaryOp::Com, Int { bits: 16, .. }) => Op::Com16,
        (UnaryOp::Com, Int { bits: 32, .. }) => Op::Com32,
        (UnaryOp::Com, Int { bits: 64, .. }) => Op::Com64,

        (UnaryOp::Real, Complex { bits: 64 }) => Op::ComplexReal,
        (UnaryOp::Real, Complex { bits: 128 }) => Op::ComplexReal,
        (UnaryOp::Imag, Complex { bits: 64 }) => Op::ComplexImag,
        (UnaryOp::Imag, Complex { bits: 128 }) => Op::ComplexImag,

        (UnaryOp::Sqrt, Float { bits: 64 }) => Op::Sqrt,

        _ => return None,
    };
    Some(chosen)
}

/// Shifts keyed by (value type, count type). The count width is part of the
/// key because the target has distinct opcodes per count width; only unsigned
/// counts are defined.
pub(crate) fn shift_op(op: BinaryOp, ty: Type, count_ty: Type) -> Option<Op> {
    let (signed, bits) = match ty {
        Type::Int { signed, bits } => (signed, bits),
        _ => return None,
    };
    let count_bits = match count_ty {
        Type::Int {
            signed: false,
            bits,
        } => bits,
        _ => return None,
    };

    let chosen = match op {
        BinaryOp::Lsh => match (bits, count_bits) {
            (8, 8) => Op::Lsh8x8,
            (8, 16) => Op::Lsh8x16,
            (8, 32) => Op::Lsh8x32,
            (8, 64) => Op::Lsh8x64,
            (16, 8) => Op::Lsh16x8,
            (16, 16) => Op::Lsh16x16,
            (16, 32) => Op::Lsh16x32,
            (16, 64) => Op::Lsh16x64,
            (32, 8) => Op::Lsh32x8,
            (32, 16) => Op::Lsh32x16,
            (32, 32) => Op::Lsh32x32,
            (32, 64) => Op::Lsh32x64,
            (64, 8) => Op::Lsh64x8,
            (64, 16) => Op::Lsh64x16,
            (64, 32) => Op::Lsh64x32,
            (64, 64) => Op::Lsh64x64,
            _ => return None,
        },
        BinaryOp::Rsh if signed => match (bits, count_bits) {
            (8, 8) => Op::Rsh8x8,
            (8, 16) => Op::Rsh8x16,
            (8, 32) => Op::Rsh8x32,
            (8, 64) => Op::Rsh8x64,
            (16, 8) => Op::Rsh16x8,
            (16, 16) => Op::Rsh16x16,
            (16, 32) => Op::Rsh16x32,
            (16, 64) => Op::Rsh16x64,
            (32, 8) => Op::Rsh32x8,
            (32, 16) => Op::Rsh32x16,
            (32, 32) => Op::Rsh32x32,
            (32, 64) => Op::Rsh32x64,
            (64, 8) => Op::Rsh64x8,
            (64, 16) => Op::Rsh64x16,
            (64, 32) => Op::Rsh64x32,
            (64, 64) => Op::Rsh64x64,
            _ => return None,
        },
        BinaryOp::Rsh => match (bits, count_bits) {
            (8, 8) => Op::Rsh8Ux8,
            (8, 16) => Op::Rsh8Ux16,
            (8, 32) => Op::Rsh8Ux32,
            (8, 64) => Op::Rsh8Ux64,
            (16, 8) => Op::Rsh16Ux8,
            (16, 16) => Op::Rsh16Ux16,
            (16, 32) => Op::Rsh16Ux32,
            (16, 64) => Op::Rsh16Ux64,
            (32, 8) => Op::Rsh32Ux8,
            (32, 16) => Op::Rsh32Ux16,
            (32, 32) => Op::Rsh32Ux32,
            (32, 64) => Op::Rsh32Ux64,
            (64, 8) => Op::Rsh64Ux8,
            (64, 16) => Op::Rsh64Ux16,
            (64, 32) => Op::Rsh64Ux32,
            (64, 64) => Op::Rsh64Ux64,
            _ => return None,
        },
        _ => return None,
    };
    Some(chosen)
}

/// Left rotate, keyed only by the rotated value's type. Defined for unsigned
/// widths only.
pub(crate) fn rotate_op(ty: Type) -> Option<Op> {
    match ty {
        Type::Int {
            signed: false,
            bits: 8,
        } => Some(Op::Lrot8),
        Type::Int {
            signed: false,
            bits: 16,
        } => Some(Op::Lrot16),
        Type::Int {
            signed: false,
            bits: 32,
        } => Some(Op::Lrot32),
        Type::Int {
            signed: false,
            bits: 64,
        } => Some(Op::Lrot64),
        _ => None,
    }
}

/// A numeric conversion as a pair of opcodes through an intermediate type.
///
/// `Op::Invalid` in either slot marks a conversion with no direct or two-step
/// machine form; the expression lowerer must expand it into an explicit
/// compare/branch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CvtPlan {
    pub op1: Op,
    pub op2: Op,
    pub mid: Type,
}

impl CvtPlan {
    fn new(op1: Op, op2: Op, mid: Type) -> Self {
        Self { op1, op2, mid }
    }

    pub(crate) fn needs_expansion(self) -> bool {
        self.op1 == Op::Invalid || self.op2 == Op::Invalid
    }
}

/// Conversions between numeric types, keyed by (source, destination).
///
/// Some unsigned widths have no direct machine conversion and go through a
/// wider signed intermediate instead; the 64-bit unsigned cases cannot even
/// do that and are marked for branchy expansion.
pub(crate) fn conversion(from: Type, to: Type) -> Option<CvtPlan> {
    let i32t = Type::int(32);
    let i64t = Type::int(64);
    let u64t = Type::uint(64);
    let f32t = Type::float(32);
    let f64t = Type::float(64);

    let plan = match (from, to) {
        (Type::Int { signed: true, bits: 8 }, Type::Float { bits: 32 }) => {
            CvtPlan::new(Op::SignExt8to32, Op::Cvt32to32F, i32t)
        }
        (Type::Int { signed: true, bits: 16 }, Type::Float { bits: 32 }) => {
            CvtPlan::new(Op::SignExt16to32, Op::Cvt32to32F, i32t)
        }
        (Type::Int { signed: true, bits: 32 }, Type::Float { bits: 32 }) => {
            CvtPlan::new(Op::Copy, Op::Cvt32to32F, i32t)
        }
        (Type::Int { signed: true, bits: 64 }, Type::Float { bits: 32 }) => {
            CvtPlan::new(Op::Copy, Op::Cvt64to32F, i64t)
        }

        (Type::Int { signed: true, bits: 8 }, Type::Float { bits: 64 }) => {
            CvtPlan::new(Op::SignExt8to32, Op::Cvt32to64F, i32t)
        }
        (Type::Int { signed: true, bits: 16 }, Type::Float { bits: 64 }) => {
            CvtPlan::new(Op::SignExt16to32, Op::Cvt32to64F, i32t)
        }
        (Type::Int { signed: true, bits: 32 }, Type::Float { bits: 64 }) => {
            CvtPlan::new(Op::Copy, Op::Cvt32to64F, i32t)
        }
        (Type::Int { signed: true, bits: 64 }, Type::Float { bits: 64 }) => {
            CvtPlan::new(Op::Copy, Op::Cvt64to64F, i64t)
        }

        (Type::Float { bits: 32 }, Type::Int { signed: true, bits: 8 }) => {
            CvtPlan::new(Op::Cvt32Fto32, Op::Trunc32to8, i32t)
        }
        (Type::Float { bits: 32 }, Type::Int { signed: true, bits: 16 }) => {
            CvtPlan::new(Op::Cvt32Fto32, Op::Trunc32to16, i32t)
        }
        (Type::Float { bits: 32 }, Type::Int { signed: true, bits: 32 }) => {
            CvtPlan::new(Op::Cvt32Fto32, Op::Copy, i32t)
        }
        (Type::Float { bits: 32 }, Type::Int { signed: true, bits: 64 }) => {
            CvtPlan::new(Op::Cvt32Fto64, Op::Copy, i64t)
        }

        (Type::Float { bits: 64 }, Type::Int { signed: true, bits: 8 }) => {
            CvtPlan::new(Op::Cvt64Fto32, Op::Trunc32to8, i32t)
        }
        (Type::Float { bits: 64 }, Type::Int { signed: true, bits: 16 }) => {
            CvtPlan::new(Op::Cvt64Fto32, Op::Trunc32to16, i32t)
        }
        (Type::Float { bits: 64 }, Type::Int { signed: true, bits: 32 }) => {
            CvtPlan::new(Op::Cvt64Fto32, Op::Copy, i32t)
        }
        (Type::Float { bits: 64 }, Type::Int { signed: true, bits: 64 }) => {
            CvtPlan::new(Op::Cvt64Fto64, Op::Copy, i64t)
        }

        (Type::Int { signed: false, bits: 8 }, Type::Float { bits: 32 }) => {
            CvtPlan::new(Op::ZeroExt8to32, Op::Cvt32to32F, i32t)
        }
        (Type::Int { signed: false, bits: 16 }, Type::Float { bits: 32 }) => {
            CvtPlan::new(Op::ZeroExt16to32, Op::Cvt32to32F, i32t)
        }
        // go wide to dodge unsigned
        (Type::Int { signed: false, bits: 32 }, Type::Float { bits: 32 }) => {
            CvtPlan::new(Op::ZeroExt32to64, Op::Cvt64to32F, i64t)
        }
        (Type::Int { signed: false, bits: 64 }, Type::Float { bits: 32 }) => {
            CvtPlan::new(Op::Copy, Op::Invalid, u64t)
        }

        (Type::Int { signed: false, bits: 8 }, Type::Float { bits: 64 }) => {
            CvtPlan::new(Op::ZeroExt8to32, Op::Cvt32to64F, i32t)
        }
        (Type::Int { signed: false, bits: 16 }, Type::Float { bits: 64 }) => {
            CvtPlan::new(Op::ZeroExt16to32, Op::Cvt32to64F, i32t)
        }
        // go wide to dodge unsigned
        (Type::Int { signed: false, bits: 32 }, Type::Float { bits: 64 }) => {
            CvtPlan::new(Op::ZeroExt32to64, Op::Cvt64to64F, i64t)
        }
        (Type::Int { signed: false, bits: 64 }, Type::Float { bits: 64 }) => {
            CvtPlan::new(Op::Copy, Op::Invalid, u64t)
        }

        (Type::Float { bits: 32 }, Type::Int { signed: false, bits: 8 }) => {
            CvtPlan::new(Op::Cvt32Fto32, Op::Trunc32to8, i32t)
        }
        (Type::Float { bits: 32 }, Type::Int { signed: false, bits: 16 }) => {
            CvtPlan::new(Op::Cvt32Fto32, Op::Trunc32to16, i32t)
        }
        // go wide to dodge unsigned
        (Type::Float { bits: 32 }, Type::Int { signed: false, bits: 32 }) => {
            CvtPlan::new(Op::Cvt32Fto64, Op::Trunc64to32, i64t)
        }
        (Type::Float { bits: 32 }, Type::Int { signed: false, bits: 64 }) => {
            CvtPlan::new(Op::Invalid, Op::Copy, u64t)
        }

        (Type::Float { bits: 64 }, Type::Int { signed: false, bits: 8 }) => {
            CvtPlan::new(Op::Cvt64Fto32, Op::Trunc32to8, i32t)
        }
        (Type::Float { bits: 64 }, Type::Int { signed: false, bits: 16 }) => {
            CvtPlan::new(Op::Cvt64Fto32, Op::Trunc32to16, i32t)
        }
        // go wide to dodge unsigned
        (Type::Float { bits: 64 }, Type::Int { signed: false, bits: 32 }) => {
            CvtPlan::new(Op::Cvt64Fto64, Op::Trunc64to32, i64t)
        }
        (Type::Float { bits: 64 }, Type::Int { signed: false, bits: 64 }) => {
            CvtPlan::new(Op::Invalid, Op::Copy, u64t)
        }

        (Type::Float { bits: 64 }, Type::Float { bits: 32 }) => {
            CvtPlan::new(Op::Cvt64Fto32F, Op::Copy, f32t)
        }
        (Type::Float { bits: 64 }, Type::Float { bits: 64 }) => {
            CvtPlan::new(Op::Copy, Op::Copy, f64t)
        }
        (Type::Float { bits: 32 }, Type::Float { bits: 32 }) => {
            CvtPlan::new(Op::Copy, Op::Copy, f32t)
        }
        (Type::Float { bits: 32 }, Type::Float { bits: 64 }) => {
            CvtPlan::new(Op::Cvt32Fto64F, Op::Copy, f64t)
        }

        _ => return None,
    };
    Some(plan)
}

/// Integer-to-integer width change for the `Conv` expression: truncate,
/// extend per the source's signedness, or copy at equal width.
pub(crate) fn int_conversion(from: Type, to: Type) -> Option<Op> {
    let (signed, from_bits) = match from {
        Type::Int { signed, bits } => (signed, bits),
        _ => return None,
    };
    let to_bits = match to {
        Type::Int { bits, .. } => bits,
        _ => return None,
    };

    let chosen = match (from_bits, to_bits) {
        (8, 8) | (16, 16) | (32, 32) | (64, 64) => Op::Copy,
        (16, 8) => Op::Trunc16to8,
        (32, 8) => Op::Trunc32to8,
        (32, 16) => Op::Trunc32to16,
        (64, 8) => Op::Trunc64to8,
        (64, 16) => Op::Trunc64to16,
        (64, 32) => Op::Trunc64to32,
        (8, 16) if signed => Op::SignExt8to16,
        (8, 32) if signed => Op::SignExt8to32,
        (8, 64) if signed => Op::SignExt8to64,
        (16, 32) if signed => Op::SignExt16to32,
        (16, 64) if signed => Op::SignExt16to64,
        (32, 64) if signed => Op::SignExt32to64,
        (8, 16) => Op::ZeroExt8to16,
        (8, 32) => Op::ZeroExt8to32,
        (8, 64) => Op::ZeroExt8to64,
        (16, 32) => Op::ZeroExt16to32,
        (16, 64) => Op::ZeroExt16to64,
        (32, 64) => Op::ZeroExt32to64,
        _ => return None,
    };
    Some(chosen)
}
