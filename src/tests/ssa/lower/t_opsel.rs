use super::opsel::{binop_op, conversion, int_conversion, rotate_op, shift_op, unop_op};
use super::*;
use crate::tree::{BinaryOp, UnaryOp};
use crate::types::Type;

const INT_TYPES: [Type; 8] = [
    Type::Int {
        signed: true,
        bits: 8,
    },
    Type::Int {
        signed: true,
        bits: 16,
    },
    Type::Int {
        signed: true,
        bits: 32,
    },
    Type::Int {
        signed: true,
        bits: 64,
    },
    Type::Int {
        signed: false,
        bits: 8,
    },
    Type::Int {
        signed: false,
        bits: 16,
    },
    Type::Int {
        signed: false,
        bits: 32,
    },
    Type::Int {
        signed: false,
        bits: 64,
    },
];

const FLOAT_TYPES: [Type; 2] = [Type::Float { bits: 32 }, Type::Float { bits: 64 }];

#[test]
fn test_integer_arithmetic_total_over_widths() {
    let ops = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Mod,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Xor,
    ];
    for op in ops {
        for ty in INT_TYPES {
            assert!(binop_op(op, ty).is_some(), "{op:?} on {ty}");
        }
    }
}

#[test]
fn test_comparisons_total_over_widths_and_floats() {
    let ops = [
        BinaryOp::Eq,
        BinaryOp::Ne,
        BinaryOp::Lt,
        BinaryOp::Le,
        BinaryOp::Gt,
        BinaryOp::Ge,
    ];
    for op in ops {
        for ty in INT_TYPES.into_iter().chain(FLOAT_TYPES) {
            assert!(binop_op(op, ty).is_some(), "{op:?} on {ty}");
        }
    }
    assert_eq!(binop_op(BinaryOp::Eq, Type::Uintptr), Some(Op::EqPtr));
    assert_eq!(binop_op(BinaryOp::Ne, Type::Uintptr), Some(Op::NeqPtr));
    assert_eq!(binop_op(BinaryOp::Eq, Type::Bool), Some(Op::Eq8));
}

#[test]
fn test_signedness_selects_distinct_opcodes() {
    assert_eq!(
        binop_op(BinaryOp::Div, Type::int(32)),
        Some(Op::Div32)
    );
    assert_eq!(
        binop_op(BinaryOp::Div, Type::uint(32)),
        Some(Op::Div32u)
    );
    assert_eq!(
        binop_op(BinaryOp::Lt, Type::int(64)),
        Some(Op::Less64)
    );
    assert_eq!(
        binop_op(BinaryOp::Lt, Type::uint(64)),
        Some(Op::Less64U)
    );
    assert_eq!(
        binop_op(BinaryOp::Mod, Type::int(8)),
        Some(Op::Mod8)
    );
    assert_eq!(
        binop_op(BinaryOp::Mod, Type::uint(8)),
        Some(Op::Mod8u)
    );
}

#[test]
fn test_deliberately_absent_pairs_fail_identifiably() {
    // No arithmetic on bool, no 64-bit high multiply, no float bitwise.
    assert_eq!(binop_op(BinaryOp::Add, Type::Bool), None);
    assert_eq!(binop_op(BinaryOp::Hmul, Type::int(64)), None);
    assert_eq!(binop_op(BinaryOp::And, Type::float(32)), None);
    assert_eq!(binop_op(BinaryOp::Div, Type::Bool), None);

    // Rotates exist only for unsigned operands.
    assert_eq!(rotate_op(Type::int(32)), None);
    assert_eq!(rotate_op(Type::uint(32)), Some(Op::Lrot32));

    // Shift counts must be unsigned integers.
    assert_eq!(shift_op(BinaryOp::Lsh, Type::int(32), Type::int(8)), None);
    assert_eq!(shift_op(BinaryOp::Lsh, Type::int(32), Type::Bool), None);
}

#[test]
fn test_shift_table_total_over_width_matrix() {
    let counts = [
        Type::uint(8),
        Type::uint(16),
        Type::uint(32),
        Type::uint(64),
    ];
    for ty in INT_TYPES {
        for count in counts {
            assert!(
                shift_op(BinaryOp::Lsh, ty, count).is_some(),
                "Lsh {ty} by {count}"
            );
            assert!(
                shift_op(BinaryOp::Rsh, ty, count).is_some(),
                "Rsh {ty} by {count}"
            );
        }
    }
    // The shift-count width picks distinct opcodes.
    assert_eq!(
        shift_op(BinaryOp::Lsh, Type::int(32), Type::uint(8)),
        Some(Op::Lsh32x8)
    );
    assert_eq!(
        shift_op(BinaryOp::Lsh, Type::int(32), Type::uint(64)),
        Some(Op::Lsh32x64)
    );
    // Right shifts split on the shifted value's signedness.
    assert_eq!(
        shift_op(BinaryOp::Rsh, Type::int(16), Type::uint(32)),
        Some(Op::Rsh16x32)
    );
    assert_eq!(
        shift_op(BinaryOp::Rsh, Type::uint(16), Type::uint(32)),
        Some(Op::Rsh16Ux32)
    );
}

#[test]
fn test_unary_table() {
    for ty in INT_TYPES {
        assert!(unop_op(UnaryOp::Neg, ty).is_some());
        assert!(unop_op(UnaryOp::Com, ty).is_some());
    }
    assert_eq!(unop_op(UnaryOp::Not, Type::Bool), Some(Op::Not));
    assert_eq!(unop_op(UnaryOp::Not, Type::int(32)), None);
    assert_eq!(
        unop_op(UnaryOp::Real, Type::Complex { bits: 128 }),
        Some(Op::ComplexReal)
    );
    assert_eq!(
        unop_op(UnaryOp::Imag, Type::Complex { bits: 64 }),
        Some(Op::ComplexImag)
    );
    assert_eq!(unop_op(UnaryOp::Sqrt, Type::float(64)), Some(Op::Sqrt));
    assert_eq!(unop_op(UnaryOp::Sqrt, Type::float(32)), None);
}

#[test]
fn test_conversion_table_covers_numeric_pairs() {
    for int_ty in INT_TYPES {
        for float_ty in FLOAT_TYPES {
            assert!(conversion(int_ty, float_ty).is_some(), "{int_ty} -> {float_ty}");
            assert!(conversion(float_ty, int_ty).is_some(), "{float_ty} -> {int_ty}");
        }
    }
    for from in FLOAT_TYPES {
        for to in FLOAT_TYPES {
            assert!(conversion(from, to).is_some());
        }
    }
    assert!(conversion(Type::Bool, Type::float(32)).is_none());
    assert!(conversion(Type::String, Type::int(64)).is_none());
}

#[test]
fn test_conversion_plans_mark_expansion_cases() {
    // All four unsigned-64 cases have no direct or two-step form.
    assert!(conversion(Type::uint(64), Type::float(32)).unwrap().needs_expansion());
    assert!(conversion(Type::uint(64), Type::float(64)).unwrap().needs_expansion());
    assert!(conversion(Type::float(32), Type::uint(64)).unwrap().needs_expansion());
    assert!(conversion(Type::float(64), Type::uint(64)).unwrap().needs_expansion());

    // Unsigned 32-bit goes through a wider signed intermediate instead.
    let plan = conversion(Type::uint(32), Type::float(64)).unwrap();
    assert!(!plan.needs_expansion());
    assert_eq!(plan.op1, Op::ZeroExt32to64);
    assert_eq!(plan.op2, Op::Cvt64to64F);
    assert_eq!(plan.mid, Type::int(64));

    let plan = conversion(Type::int(8), Type::float(32)).unwrap();
    assert_eq!(plan.op1, Op::SignExt8to32);
    assert_eq!(plan.op2, Op::Cvt32to32F);
    assert_eq!(plan.mid, Type::int(32));
}

#[test]
fn test_int_conversion_widths() {
    assert_eq!(int_conversion(Type::int(8), Type::int(64)), Some(Op::SignExt8to64));
    assert_eq!(int_conversion(Type::uint(8), Type::int(64)), Some(Op::ZeroExt8to64));
    assert_eq!(int_conversion(Type::int(64), Type::int(16)), Some(Op::Trunc64to16));
    assert_eq!(int_conversion(Type::int(32), Type::uint(32)), Some(Op::Copy));
    assert_eq!(int_conversion(Type::Bool, Type::int(32)), None);
}
