use super::*;
use crate::diag::Span;
use crate::tree::{CallExpr, CallKind, CallTarget};
use crate::types::Type;

#[test]
fn test_static_call_terminates_block_and_loads_result() {
    let i64t = Type::int(64);
    let call = static_call(
        "f",
        vec![assign(arg_slot(i64t, 0), var(0, i64t))],
        8,
        Some((i64t, 8)),
    );
    let decl = func_decl(
        vec![param(0, "a", i64t, 0)],
        vec![],
        vec![auto(1, "x", i64t)],
        vec![blank(assign(var(1, i64t), call_value(i64t, call)))],
    );
    let func = lower_ok(&decl);

    assert_ir_eq(
        format_func(&func),
        indoc! {"
            fn test {
              b0:
                %v0: mem = InitMem
                %v1: ptr = SP
                %v2: ptr = SB
                %v3: ptr = OffPtr %v1
                %v4: i64 = Arg {arg:a}
                %v5: ptr = OffPtr %v1
                %v6: mem = Store [8] %v5, %v4, %v0
                %v7: mem = StaticCall [8] {f} %v6
                %v8: ptr = OffPtr [8] %v1
              call %v7, b1

              b1:
                %v9: i64 = Load %v8, %v7
              exit %v7
            }
        "},
    );
}

#[test]
fn test_call_with_no_result_used_as_value_rejected() {
    let i64t = Type::int(64);
    let call = static_call("f", vec![], 0, None);
    let decl = func_decl(
        vec![],
        vec![],
        vec![auto(0, "x", i64t)],
        vec![blank(assign(var(0, i64t), call_value(i64t, call)))],
    );
    let err = lower_func(&decl).unwrap_err();
    assert!(matches!(err.kind, LowerErrorKind::UnsupportedExpression(_)));
}

#[test]
fn test_defer_call_writes_frame_header() {
    let i64t = Type::int(64);
    let decl = func_decl(vec![param(0, "a", i64t, 0)], vec![], vec![], vec![]);
    let mut lowerer = Lowerer::new(&decl);

    let call = CallExpr {
        target: CallTarget::Static {
            name: "f".to_string(),
        },
        kind: CallKind::Defer,
        arg_stmts: vec![assign(arg_slot(i64t, 16), var(0, i64t))],
        arg_size: 8,
        result: Some((i64t, 8)),
    };
    let result = lowerer
        .lower_call(Span::default(), &call)
        .expect("failed to lower call");
    // Deferred calls never produce a readable result.
    assert!(result.is_none());

    let func = lowerer.finish().expect("failed to finish");
    assert_eq!(count_op(&func, Op::DeferCall), 1);

    let entry = func.block(func.entry);
    assert_eq!(entry.kind, BlockKind::Call);
    let call_value = func.value(entry.control.unwrap());
    assert_eq!(call_value.op, Op::DeferCall);
    // Frame grew by two pointer-widths for the argsize/closure header.
    assert_eq!(call_value.aux_int, 24);

    // The header: a 4-byte argsize store at sp and a pointer store of the
    // closure next to it, plus the argument store itself.
    let stores: Vec<&crate::ssa::model::ir::ValueInfo> = entry
        .values
        .iter()
        .map(|value| func.value(*value))
        .filter(|value| value.op == Op::Store)
        .collect();
    assert_eq!(stores.len(), 3);
    assert!(stores.iter().any(|store| store.aux_int == 4));

    // The closure is the function's address.
    let has_func_addr = entry
        .values
        .iter()
        .map(|value| func.value(*value))
        .any(|value| value.op == Op::Addr && value.aux == Some(Aux::Name("f".to_string())));
    assert!(has_func_addr);
}

#[test]
fn test_go_call_mirrors_defer_shape() {
    let decl = func_decl(vec![], vec![], vec![], vec![]);
    let mut lowerer = Lowerer::new(&decl);

    let call = CallExpr {
        target: CallTarget::Static {
            name: "f".to_string(),
        },
        kind: CallKind::Go,
        arg_stmts: vec![],
        arg_size: 0,
        result: None,
    };
    let result = lowerer
        .lower_call(Span::default(), &call)
        .expect("failed to lower call");
    assert!(result.is_none());

    let func = lowerer.finish().expect("failed to finish");
    assert_eq!(count_op(&func, Op::GoCall), 1);
    let entry = func.block(func.entry);
    assert_eq!(func.value(entry.control.unwrap()).aux_int, 16);
}

#[test]
fn test_closure_call_loads_code_pointer() {
    let i64t = Type::int(64);
    let call = CallExpr {
        target: CallTarget::Closure(Box::new(var(0, Type::Ptr))),
        kind: CallKind::Normal,
        arg_stmts: vec![],
        arg_size: 0,
        result: Some((i64t, 0)),
    };
    let decl = func_decl(
        vec![param(0, "fp", Type::Ptr, 0)],
        vec![],
        vec![auto(1, "x", i64t)],
        vec![blank(assign(var(1, i64t), call_value(i64t, call)))],
    );
    let func = lower_ok(&decl);

    assert_eq!(count_op(&func, Op::ClosureCall), 1);
    let closure_call = func
        .blocks()
        .flat_map(|block| block.values.iter())
        .map(|value| func.value(*value))
        .find(|value| value.op == Op::ClosureCall)
        .unwrap();
    // Code pointer loaded out of the closure record, closure passed along.
    assert_eq!(closure_call.args.len(), 3);
    assert_eq!(func.value(closure_call.args[0]).op, Op::Load);
}

#[test]
fn test_interface_call_dispatches_through_method_table() {
    let call = CallExpr {
        target: CallTarget::Interface {
            recv: Box::new(var(0, Type::Interface)),
            method_offset: 16,
        },
        kind: CallKind::Normal,
        arg_stmts: vec![],
        arg_size: 8,
        result: None,
    };
    let decl = func_decl(
        vec![param(0, "ifc", Type::Interface, 0)],
        vec![],
        vec![],
        vec![
            blank(empty()),
            crate::tree::Stmt {
                kind: crate::tree::StmtKind::Assign {
                    target: arg_slot(Type::int(64), 32),
                    value: Some(call_value(Type::int(64), call)),
                },
                span: Span::default(),
            },
        ],
    );
    // A no-result interface call cannot be used as a value; drive the
    // lowerer directly instead.
    let err = lower_func(&decl).unwrap_err();
    assert!(matches!(err.kind, LowerErrorKind::UnsupportedExpression(_)));

    let decl = func_decl(vec![param(0, "ifc", Type::Interface, 0)], vec![], vec![], vec![]);
    let mut lowerer = Lowerer::new(&decl);
    let call = CallExpr {
        target: CallTarget::Interface {
            recv: Box::new(var(0, Type::Interface)),
            method_offset: 16,
        },
        kind: CallKind::Normal,
        arg_stmts: vec![],
        arg_size: 8,
        result: None,
    };
    let result = lowerer
        .lower_call(Span::default(), &call)
        .expect("failed to lower call");
    assert!(result.is_none());

    let func = lowerer.finish().expect("failed to finish");
    assert_eq!(count_op(&func, Op::ITab), 1);
    assert_eq!(count_op(&func, Op::IData), 1);
    assert_eq!(count_op(&func, Op::InterCall), 1);

    // The method pointer sits at the method offset past the itab header.
    let entry_offset = func
        .blocks()
        .flat_map(|block| block.values.iter())
        .map(|value| func.value(*value))
        .filter(|value| value.op == Op::OffPtr)
        .any(|value| value.aux_int == 16 + 3 * 8 + 8);
    assert!(entry_offset);

    // The receiver's data pointer is stored into the first argument slot.
    let receiver_store = func
        .blocks()
        .flat_map(|block| block.values.iter())
        .map(|value| func.value(*value))
        .filter(|value| value.op == Op::Store)
        .any(|store| func.value(store.args[1]).op == Op::IData);
    assert!(receiver_store);
}
