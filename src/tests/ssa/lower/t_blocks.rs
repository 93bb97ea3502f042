use super::*;

#[test]
fn test_end_block_twice_returns_none() {
    let decl = func_decl(vec![], vec![], vec![], vec![]);
    let mut lowerer = Lowerer::new(&decl);

    assert!(lowerer.end_block().is_some());
    let snapshots = lowerer.defvars.len();
    let values = lowerer.func.value_count();

    // Sealing again reports "no block" and mutates nothing.
    assert!(lowerer.end_block().is_none());
    assert_eq!(lowerer.defvars.len(), snapshots);
    assert_eq!(lowerer.func.value_count(), values);
}

#[test]
#[should_panic(expected = "has not ended")]
fn test_start_block_requires_sealed_predecessor() {
    let decl = func_decl(vec![], vec![], vec![], vec![]);
    let mut lowerer = Lowerer::new(&decl);
    let block = lowerer.func.new_block(BlockKind::Plain);
    // The entry block is still open.
    lowerer.start_block(block);
}

#[test]
fn test_env_snapshot_recorded_on_seal() {
    let decl = func_decl(vec![], vec![], vec![], vec![]);
    let mut lowerer = Lowerer::new(&decl);
    let entry = lowerer.cur_block.unwrap();

    let sealed = lowerer.end_block().unwrap();
    assert_eq!(sealed, entry);
    // The entry environment holds the initial memory binding at the block's
    // dense index.
    let snapshot = &lowerer.defvars[sealed.index()];
    assert_eq!(snapshot.get(&VarKey::Memory), Some(&lowerer.start_mem));
}

#[test]
fn test_forward_goto_and_label_share_target() {
    let decl = func_decl(
        vec![],
        vec![],
        vec![],
        vec![blank(goto("done")), labeled("done", empty())],
    );
    let func = lower_ok(&decl);

    assert_eq!(func.block_count(), 2);
    let target = func.block(func.entry).succs[0];
    assert_eq!(func.block(target).preds, vec![func.entry]);
    assert_eq!(func.block(target).kind, BlockKind::Exit);
}

#[test]
fn test_backward_goto_reuses_label_target() {
    let decl = func_decl(
        vec![],
        vec![],
        vec![],
        vec![labeled("top", empty()), goto("top")],
    );
    let func = lower_ok(&decl);

    assert_eq!(func.block_count(), 2);
    let target = func.block(func.entry).succs[0];
    // The loop body jumps back to itself through the label's one block.
    assert_eq!(func.block(target).succs, vec![target]);
    assert!(func.block(target).preds.contains(&func.entry));
    assert!(func.block(target).preds.contains(&target));
}

#[test]
fn test_dead_code_is_still_lowered() {
    // The unsupported statement sits after an unconditional jump; it must
    // still be dispatched, not skipped.
    let decl = func_decl(
        vec![],
        vec![],
        vec![],
        vec![
            blank(goto("done")),
            unsupported("for statement"),
            labeled("done", empty()),
        ],
    );
    let err = lower_func(&decl).unwrap_err();
    assert!(matches!(
        err.kind,
        LowerErrorKind::UnsupportedStatement("for statement")
    ));
}

#[test]
fn test_label_defined_in_dead_code_is_reachable_by_later_goto() {
    let decl = func_decl(
        vec![],
        vec![],
        vec![],
        vec![
            blank(goto("after")),
            labeled("skip", empty()),
            goto("after"),
            labeled("after", empty()),
            goto("skip"),
        ],
    );
    let func = lower_ok(&decl);

    // The blocks provisioned for the dead fallthroughs are gone, but the
    // label's own block survives through the backward goto.
    assert_eq!(func.block_count(), 3);
    let after = func.block(func.entry).succs[0];
    let skip = func.block(after).succs[0];
    assert_ne!(after, skip);
    assert_eq!(func.block(skip).succs, vec![after]);
}

#[test]
fn test_unreferenced_blocks_are_pruned() {
    let decl = func_decl(
        vec![],
        vec![],
        vec![],
        vec![
            blank(goto("done")),
            labeled("dead", empty()),
            labeled("done", empty()),
        ],
    );
    let func = lower_ok(&decl);

    // Only the entry and the live label block remain, and every surviving
    // block has a predecessor or is the entry.
    assert_eq!(func.block_count(), 2);
    for block in func.blocks() {
        assert!(block.id == func.entry || !block.preds.is_empty());
    }
}

#[test]
fn test_goto_over_initialization_rejected() {
    let i32t = Type::int(32);
    let decl = func_decl(
        vec![],
        vec![],
        vec![auto(0, "x", i32t)],
        vec![
            blank(goto("done")),
            assign(var(0, i32t), int_lit(i32t, 1)),
            labeled("done", empty()),
        ],
    );
    let err = lower_func(&decl).unwrap_err();
    match err.kind {
        LowerErrorKind::JumpsIntoScope { label, var } => {
            assert_eq!(label, "done");
            assert_eq!(var, "x");
        }
        other => panic!("expected JumpsIntoScope, got {other:?}"),
    }
}

#[test]
fn test_forward_goto_without_skipped_initialization_accepted() {
    let i32t = Type::int(32);
    let decl = func_decl(
        vec![],
        vec![],
        vec![auto(0, "x", i32t)],
        vec![
            blank(assign(var(0, i32t), int_lit(i32t, 1))),
            goto("done"),
            labeled("done", empty()),
        ],
    );
    lower_ok(&decl);
}

#[test]
fn test_backward_goto_over_initialization_accepted() {
    let i32t = Type::int(32);
    let decl = func_decl(
        vec![],
        vec![],
        vec![auto(0, "x", i32t)],
        vec![
            labeled("top", assign(var(0, i32t), int_lit(i32t, 1))),
            assign(var(0, i32t), int_lit(i32t, 2)),
            goto("top"),
        ],
    );
    lower_ok(&decl);
}

#[test]
fn test_undefined_label_reported_at_function_end() {
    let decl = func_decl(vec![], vec![], vec![], vec![blank(goto("nowhere"))]);
    let err = lower_func(&decl).unwrap_err();
    assert!(matches!(err.kind, LowerErrorKind::UndefinedLabel(name) if name == "nowhere"));
}

#[test]
fn test_duplicate_label_rejected() {
    let decl = func_decl(
        vec![],
        vec![],
        vec![],
        vec![
            blank(empty()),
            labeled("twice", empty()),
            labeled("twice", empty()),
        ],
    );
    let err = lower_func(&decl).unwrap_err();
    assert!(matches!(err.kind, LowerErrorKind::DuplicateLabel(name) if name == "twice"));
}

#[test]
fn test_body_must_start_with_label() {
    let i32t = Type::int(32);
    let decl = func_decl(
        vec![],
        vec![],
        vec![auto(0, "x", i32t)],
        vec![assign(var(0, i32t), int_lit(i32t, 1))],
    );
    let err = lower_func(&decl).unwrap_err();
    assert!(matches!(err.kind, LowerErrorKind::MissingEntryLabel));
}

#[test]
fn test_multiple_results_rejected() {
    let i32t = Type::int(32);
    let decl = func_decl(
        vec![],
        vec![out_param(0, "r0", i32t, 0), out_param(1, "r1", i32t, 4)],
        vec![],
        vec![blank(empty())],
    );
    let err = lower_func(&decl).unwrap_err();
    assert!(matches!(err.kind, LowerErrorKind::MultipleResults));
}

#[test]
fn test_nested_block_statements_are_flattened() {
    let i32t = Type::int(32);
    let decl = func_decl(
        vec![],
        vec![],
        vec![auto(0, "x", i32t)],
        vec![
            blank(empty()),
            block(vec![
                assign(var(0, i32t), int_lit(i32t, 1)),
                block(vec![assign(var(0, i32t), int_lit(i32t, 2))]),
            ]),
        ],
    );
    let func = lower_ok(&decl);
    // Everything lands in the entry block; no new control flow.
    assert_eq!(func.block_count(), 1);
    assert_eq!(count_op(&func, Op::Const32), 2);
}
