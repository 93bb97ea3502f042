use std::fmt::{Display, Formatter, Result};

use thiserror::Error;

use crate::ssa::lower::LowerError;
use crate::ssa::verify::VerifyError;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("ssa lowering error")]
    Lower(#[from] LowerError),

    #[error(transparent)]
    Verify(#[from] VerifyError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A whole-line span, for front ends that only track line numbers.
    pub fn line(line: usize) -> Self {
        let pos = Position {
            offset: 0,
            line,
            column: 1,
        };
        Self::new(pos, pos)
    }
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: Position {
                offset: 0,
                line: 1,
                column: 1,
            },
            end: Position {
                offset: 0,
                line: 1,
                column: 1,
            },
        }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
