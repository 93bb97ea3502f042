//! Conditional branch lowering.

use crate::ssa::lower::lowerer::Lowerer;
use crate::ssa::lower::LowerError;
use crate::ssa::model::ir::{BlockId, BlockKind};
use crate::tree::{BinaryOp, Expr, ExprKind, UnaryOp};

impl<'a> Lowerer<'a> {
    /// Evaluates the boolean expression `cond` and branches to `yes` when it
    /// is true and `no` when it is false.
    ///
    /// This is a recursive desugaring, not a flat boolean evaluation: `&&`
    /// and `||` keep their left-to-right short-circuit order (operand
    /// evaluation can have effects), and `!` swaps the continuations without
    /// re-evaluating its operand.
    pub(crate) fn cond_branch(
        &mut self,
        cond: &Expr,
        yes: BlockId,
        no: BlockId,
    ) -> Result<(), LowerError> {
        match &cond.kind {
            ExprKind::Paren(inner) => self.cond_branch(inner, yes, no),

            ExprKind::Binary {
                op: BinaryOp::LogicalAnd,
                lhs,
                rhs,
            } => {
                // "cond.true": the left operand succeeded.
                let mid = self.func.new_block(BlockKind::Plain);
                self.cond_branch(lhs, mid, no)?;
                self.start_block(mid);
                self.cond_branch(rhs, yes, no)
            }

            ExprKind::Binary {
                op: BinaryOp::LogicalOr,
                lhs,
                rhs,
            } => {
                // "cond.false": the left operand failed.
                let mid = self.func.new_block(BlockKind::Plain);
                self.cond_branch(lhs, yes, mid)?;
                self.start_block(mid);
                self.cond_branch(rhs, yes, no)
            }

            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => self.cond_branch(operand, no, yes),

            _ => {
                let control = self.expr(cond)?;
                let block = self
                    .end_block()
                    .expect("ssa lower_func branch outside any block");
                self.func.seal_block(block, BlockKind::If, Some(control));
                self.func.add_edge(block, yes);
                self.func.add_edge(block, no);
                Ok(())
            }
        }
    }
}
