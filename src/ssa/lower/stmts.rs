//! Statement lowering.

use crate::diag::Span;
use crate::ssa::lower::lowerer::{FwdGoto, Lowerer, VarKey};
use crate::ssa::lower::{LowerError, LowerErrorKind};
use crate::ssa::model::ir::{BlockId, BlockKind};
use crate::ssa::model::op::Op;
use crate::tree::{Expr, ExprKind, Stmt, StmtKind, StorageClass};
use crate::types::Type;

impl<'a> Lowerer<'a> {
    /// Lowers a function body. The first statement must be labeled (even if
    /// with `_`) so the entry block has an explicit control point.
    pub(crate) fn body(&mut self, body: &[Stmt]) -> Result<(), LowerError> {
        let labeled_entry = matches!(
            body.first(),
            Some(Stmt {
                kind: StmtKind::Labeled { .. },
                ..
            })
        );
        if !labeled_entry {
            let span = body.first().map_or(Span::default(), |stmt| stmt.span);
            return Err(self.err(span, LowerErrorKind::MissingEntryLabel));
        }
        self.stmt_list(body)
    }

    pub(crate) fn stmt_list(&mut self, stmts: &[Stmt]) -> Result<(), LowerError> {
        for stmt in stmts {
            self.stmt(stmt)?;
        }
        Ok(())
    }

    pub(crate) fn stmt(&mut self, stmt: &Stmt) -> Result<(), LowerError> {
        // With no open block we are about to lower dead code. It still gets a
        // block: labels and gotos inside it must be scanned, so bookkeeping
        // stays uniform instead of special-casing every caller.
        if self.cur_block.is_none() {
            let dead = self.func.new_block(BlockKind::Plain);
            self.start_block(dead);
        }

        self.push_line(stmt.span.start.line);
        let result = self.stmt_inner(stmt);
        self.pop_line();
        result
    }

    fn stmt_inner(&mut self, stmt: &Stmt) -> Result<(), LowerError> {
        match &stmt.kind {
            StmtKind::Labeled { name, stmt: inner } => {
                if name == "_" {
                    // A blank label is valid but binds nothing.
                    return self.stmt(inner);
                }
                self.define_label(stmt.span, name)?;
                self.stmt(inner)
            }

            StmtKind::Assign { target, value } => {
                self.assign_stmt(stmt.span, target, value.as_ref())
            }

            StmtKind::Goto { label } => {
                let target = self.goto_use(stmt.span, label)?;
                let block = self
                    .end_block()
                    .expect("ssa lower_func goto outside any block");
                self.func.add_edge(block, target);
                // No replacement block: the next statement provides one.
                Ok(())
            }

            StmtKind::Block(stmts) => self.stmt_list(stmts),

            StmtKind::If {
                init,
                cond,
                then_body,
                else_body,
            } => self.if_stmt(stmt.span, init.as_deref(), cond, then_body, else_body.as_deref()),

            StmtKind::Empty => Ok(()),

            StmtKind::Unsupported { kind } => {
                Err(self.err(stmt.span, LowerErrorKind::UnsupportedStatement(*kind)))
            }
        }
    }

    /// Lowers `label:` — pretend it is preceded by `goto label`.
    fn define_label(&mut self, span: Span, name: &str) -> Result<(), LowerError> {
        let already_defined = {
            let label = self.label(name);
            if label.defined() {
                label.reported = true;
                true
            } else {
                label.defined_span = Some(span);
                false
            }
        };
        if already_defined {
            return Err(self.err(span, LowerErrorKind::DuplicateLabel(name.to_string())));
        }

        // A prior goto may have allocated the target already.
        let target = self.label_target(name);

        // Forward gotos to this label are validated now, not earlier.
        let queued = std::mem::take(&mut self.fwd_gotos);
        let (pending, kept): (Vec<FwdGoto>, Vec<FwdGoto>) =
            queued.into_iter().partition(|fwd| fwd.label == name);
        self.fwd_gotos = kept;
        for fwd in pending {
            self.check_goto(fwd.span, name, fwd.bind_mark)?;
        }

        let block = self
            .end_block()
            .expect("ssa lower_func label outside any block");
        self.func.add_edge(block, target);
        self.start_block(target);
        Ok(())
    }

    /// Records a goto use of `label` and returns its target block. Backward
    /// gotos validate immediately; forward gotos queue a deferred check.
    pub(crate) fn goto_use(&mut self, span: Span, name: &str) -> Result<BlockId, LowerError> {
        let target = self.label_target(name);

        let defined = {
            let label = self.label(name);
            if !label.used() {
                label.used_span = Some(span);
            }
            label.defined()
        };

        if defined {
            self.check_goto(span, name, self.bind_mark())?;
        } else {
            let bind_mark = self.bind_mark();
            self.fwd_gotos.push(FwdGoto {
                label: name.to_string(),
                span,
                bind_mark,
            });
        }
        Ok(target)
    }

    /// Only `if cond { goto L1 } else { goto L2 }` is lowerable; anything
    /// else is a hard error, not a best-effort.
    fn if_stmt(
        &mut self,
        span: Span,
        init: Option<&Stmt>,
        cond: &Expr,
        then_body: &[Stmt],
        else_body: Option<&[Stmt]>,
    ) -> Result<(), LowerError> {
        if init.is_some() {
            return Err(self.err(span, LowerErrorKind::IfInitClause));
        }
        let (then_label, then_span) = single_goto(then_body)
            .ok_or_else(|| self.err(span, LowerErrorKind::MalformedIf))?;
        let else_body = else_body.ok_or_else(|| self.err(span, LowerErrorKind::MalformedIf))?;
        let (else_label, else_span) =
            single_goto(else_body).ok_or_else(|| self.err(span, LowerErrorKind::MalformedIf))?;

        // Each arm is a goto use of its label.
        let yes = self.goto_use(then_span, then_label)?;
        let no = self.goto_use(else_span, else_label)?;
        self.cond_branch(cond, yes, no)
    }

    fn assign_stmt(
        &mut self,
        span: Span,
        target: &Expr,
        value: Option<&Expr>,
    ) -> Result<(), LowerError> {
        let target_ty = target.ty;

        let named = match &target.kind {
            ExprKind::Var(id) => {
                let decl = self.decl(*id);
                if decl.class == StorageClass::Extern {
                    return Err(
                        self.err(span, LowerErrorKind::ExternVariable(decl.name.clone()))
                    );
                }
                if Lowerer::can_ssa(decl) {
                    // SSA-representable target: rebind, no store.
                    let new = match value {
                        Some(expr) => self.expr(expr)?,
                        None => self.zero_val(target_ty),
                    };
                    self.bind(VarKey::Var(*id), new);
                    return Ok(());
                }
                Some(*id)
            }
            _ => None,
        };

        // Memory-resident target. A missing right-hand side zeroes the
        // backing memory instead of materializing a value.
        let rhs = match value {
            Some(expr) => Some(self.expr(expr)?),
            None => None,
        };

        if let Some(id) = named {
            self.var_def(id);
        }
        let addr = self.addr(target, false)?;
        let mem = self.mem();
        let size = target_ty.size_bytes();
        let next_mem = match rhs {
            Some(rhs) => self.new_value3_int(Op::Store, Type::Mem, size, addr, rhs, mem),
            None => self.new_value2_int(Op::Zero, Type::Mem, size, addr, mem),
        };
        self.bind(VarKey::Memory, next_mem);
        Ok(())
    }
}

fn single_goto(stmts: &[Stmt]) -> Option<(&str, Span)> {
    match stmts {
        [Stmt {
            kind: StmtKind::Goto { label },
            span,
        }] => Some((label.as_str(), *span)),
        _ => None,
    }
}
