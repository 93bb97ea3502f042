use super::*;
use crate::types::Type;

#[test]
fn test_signed_narrow_int_to_float_widens_first() {
    let i8t = Type::int(8);
    let f64t = Type::float(64);
    let decl = func_decl(
        vec![param(0, "a", i8t, 0)],
        vec![],
        vec![auto(1, "x", f64t)],
        vec![blank(assign(var(1, f64t), conv(f64t, var(0, i8t))))],
    );
    let func = lower_ok(&decl);

    assert_eq!(count_op(&func, Op::SignExt8to32), 1);
    assert_eq!(count_op(&func, Op::Cvt32to64F), 1);
}

#[test]
fn test_uint32_to_float_goes_wide_to_dodge_unsigned() {
    let u32t = Type::uint(32);
    let f32t = Type::float(32);
    let decl = func_decl(
        vec![param(0, "a", u32t, 0)],
        vec![],
        vec![auto(1, "x", f32t)],
        vec![blank(assign(var(1, f32t), conv(f32t, var(0, u32t))))],
    );
    let func = lower_ok(&decl);

    assert_eq!(count_op(&func, Op::ZeroExt32to64), 1);
    assert_eq!(count_op(&func, Op::Cvt64to32F), 1);
}

#[test]
fn test_float_to_small_int_truncates_after_conversion() {
    let f64t = Type::float(64);
    let i16t = Type::int(16);
    let decl = func_decl(
        vec![param(0, "a", f64t, 0)],
        vec![],
        vec![auto(1, "x", i16t)],
        vec![blank(assign(var(1, i16t), conv(i16t, var(0, f64t))))],
    );
    let func = lower_ok(&decl);

    assert_eq!(count_op(&func, Op::Cvt64Fto32), 1);
    assert_eq!(count_op(&func, Op::Trunc32to16), 1);
}

#[test]
fn test_int_to_int_conversions() {
    let cases = [
        (Type::int(8), Type::int(64), Op::SignExt8to64),
        (Type::uint(8), Type::uint(64), Op::ZeroExt8to64),
        (Type::int(64), Type::int(8), Op::Trunc64to8),
        (Type::int(32), Type::uint(32), Op::Copy),
    ];
    for (from, to, expected) in cases {
        let decl = func_decl(
            vec![param(0, "a", from, 0)],
            vec![],
            vec![auto(1, "x", to)],
            vec![blank(assign(var(1, to), conv(to, var(0, from))))],
        );
        let func = lower_ok(&decl);
        assert_eq!(count_op(&func, expected), 1, "{from} -> {to}");
    }
}

#[test]
fn test_uint64_to_float_expands_into_branches() {
    let u64t = Type::uint(64);
    let f64t = Type::float(64);
    let decl = func_decl(
        vec![param(0, "a", u64t, 0)],
        vec![],
        vec![auto(1, "x", f64t)],
        vec![blank(assign(var(1, f64t), conv(f64t, var(0, u64t))))],
    );
    let func = lower_ok(&decl);

    // Compare-and-branch: a direct-conversion arm and a halve-convert-double
    // arm joining in a continuation block.
    assert_eq!(func.block_count(), 4);
    let entry = func.block(func.entry);
    assert_eq!(entry.kind, BlockKind::If);
    assert_eq!(func.value(entry.control.unwrap()).op, Op::Geq64);

    let direct = func.block(entry.succs[0]);
    let halved = func.block(entry.succs[1]);
    assert_eq!(direct.succs, halved.succs);

    let halved_ops: Vec<Op> = halved
        .values
        .iter()
        .map(|value| func.value(*value).op)
        .collect();
    assert!(halved_ops.contains(&Op::Rsh64Ux64));
    assert!(halved_ops.contains(&Op::And64));
    assert!(halved_ops.contains(&Op::Or64));
    assert!(halved_ops.contains(&Op::Add64F));
    assert_eq!(count_op(&func, Op::Cvt64to64F), 2);

    // The joined result is a placeholder for the renaming pass.
    let join = func.block(direct.succs[0]);
    let join_ops: Vec<Op> = join
        .values
        .iter()
        .map(|value| func.value(*value).op)
        .collect();
    assert!(join_ops.contains(&Op::FwdRef));
}

#[test]
fn test_float_to_uint64_expands_into_branches() {
    let f32t = Type::float(32);
    let u64t = Type::uint(64);
    let decl = func_decl(
        vec![param(0, "a", f32t, 0)],
        vec![],
        vec![auto(1, "x", u64t)],
        vec![blank(assign(var(1, u64t), conv(u64t, var(0, f32t))))],
    );
    let func = lower_ok(&decl);

    assert_eq!(func.block_count(), 4);
    let entry = func.block(func.entry);
    assert_eq!(func.value(entry.control.unwrap()).op, Op::Less32F);

    let rebased = func.block(entry.succs[1]);
    let rebased_ops: Vec<Op> = rebased
        .values
        .iter()
        .map(|value| func.value(*value).op)
        .collect();
    assert!(rebased_ops.contains(&Op::Sub32F));
    assert!(rebased_ops.contains(&Op::Cvt32Fto64));
    assert!(rebased_ops.contains(&Op::Or64));

    // The sign bit restored on the rebased path.
    let has_sign_bit = func
        .blocks()
        .flat_map(|block| block.values.iter())
        .map(|value| func.value(*value))
        .any(|value| value.op == Op::Const64 && value.aux_int == i64::MIN);
    assert!(has_sign_bit);
}

#[test]
#[should_panic(expected = "unhandled conversion")]
fn test_unlisted_conversion_is_a_defect() {
    let decl = func_decl(
        vec![param(0, "a", Type::Bool, 0)],
        vec![],
        vec![auto(1, "x", Type::float(64))],
        vec![blank(assign(
            var(1, Type::float(64)),
            conv(Type::float(64), var(0, Type::Bool)),
        ))],
    );
    let _ = lower_func(&decl);
}
