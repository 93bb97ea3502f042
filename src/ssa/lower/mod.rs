//! AST-to-SSA lowering.
//!
//! Turns one resolved, goto-structured function body into an SSA function.
//! A function either lowers completely or fails on the first error; there is
//! no partial output. Unsupported constructs and malformed-but-parseable
//! input come back as `LowerError`; violated internal invariants panic, since
//! they mean the lowering rules themselves are incomplete.

mod branching;
mod calls;
mod expr;
mod lowerer;
mod opsel;
mod place;
mod stmts;

use std::fmt;

use thiserror::Error;

use crate::diag::Span;
use crate::ssa::model::ir::Func;
use crate::tree::FuncDecl;

pub(crate) use lowerer::{Lowerer, VarKey};

#[derive(Debug, Clone)]
pub struct LowerError {
    pub kind: LowerErrorKind,
    pub span: Span,
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.span.start, self.kind)
    }
}

impl std::error::Error for LowerError {}

#[derive(Debug, Clone, Error)]
pub enum LowerErrorKind {
    #[error("unsupported statement: {0}")]
    UnsupportedStatement(&'static str),

    #[error("unsupported expression: {0}")]
    UnsupportedExpression(&'static str),

    #[error("package-level variable '{0}' is unsupported")]
    ExternVariable(String),

    #[error("multiple return values are unsupported")]
    MultipleResults,

    #[error("function body must start with a labeled statement")]
    MissingEntryLabel,

    #[error("label '{0}' already defined")]
    DuplicateLabel(String),

    #[error("label '{0}' is used but never defined")]
    UndefinedLabel(String),

    #[error("goto '{label}' jumps over the initialization of '{var}'")]
    JumpsIntoScope { label: String, var: String },

    #[error("if statement cannot have an init clause")]
    IfInitClause,

    #[error("if statement must be of the form \"if cond {{ goto L1 }} else {{ goto L2 }}\"")]
    MalformedIf,
}

/// Lowers a single function declaration to SSA.
pub fn lower_func(decl: &FuncDecl) -> Result<Func, LowerError> {
    if decl.results.len() > 1 {
        return Err(LowerError {
            kind: LowerErrorKind::MultipleResults,
            span: decl.span,
        });
    }

    let mut lowerer = Lowerer::new(decl);
    lowerer.body(&decl.body)?;
    lowerer.finish()
}

#[cfg(test)]
#[path = "../../tests/ssa/lower/mod.rs"]
mod tests;
