//! Resolved-function input model.
//!
//! This is the in-memory handoff from the external syntax/type front end: a
//! single function declaration whose identifiers are already bound to
//! `VarDecl`s and whose expressions already carry their resolved types.
//! Nothing here parses or type-checks; the lowering engine consumes this tree
//! as-is and rejects whatever shape it has no rule for.

use crate::diag::Span;
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub u32);

impl VarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Storage class of a resolved variable, as classified by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    /// By-value input parameter with a precomputed frame slot.
    Param,
    /// Output parameter; written through memory so the caller can read it.
    ParamOut,
    /// Function-local (auto) variable in the stack frame.
    Auto,
    /// Package-level variable. Always rejected by lowering.
    Extern,
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub id: VarId,
    pub name: String,
    pub ty: Type,
    pub class: StorageClass,
    /// Byte offset of the variable's slot in the argument/stack frame.
    pub frame_offset: i64,
    /// True when the front end saw the variable's address taken.
    pub addressed: bool,
    /// For heap-escaped variables, the pointer-typed slot variable that holds
    /// the heap address.
    pub heap_addr: Option<VarId>,
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    pub params: Vec<VarDecl>,
    pub results: Vec<VarDecl>,
    /// All other variables referenced by the body (locals, heap slots).
    pub locals: Vec<VarDecl>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Labeled {
        name: String,
        stmt: Box<Stmt>,
    },
    /// `target = value`; a missing value means "assign the zero value".
    Assign {
        target: Expr,
        value: Option<Expr>,
    },
    Goto {
        label: String,
    },
    Block(Vec<Stmt>),
    /// General `if` shape as parsed; lowering only accepts
    /// `if cond { goto L1 } else { goto L2 }` with no init clause.
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },
    Empty,
    /// Any statement kind with no lowering rule (loops, range, select, send,
    /// switch, type switch, defer, go, declarations, expression statements,
    /// inc/dec, return, break, continue, fallthrough). The front end records
    /// what it saw so the rejection can name it.
    Unsupported {
        kind: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Var(VarId),
    IntLit(i64),
    FloatLit(f64),
    BoolLit(bool),
    StringLit(String),
    NilLit,
    Paren(Box<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Numeric conversion; the destination type is the node's own type.
    Conv {
        operand: Box<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
        /// True when the front end proved the index in bounds.
        bounded: bool,
    },
    Deref {
        ptr: Box<Expr>,
        /// True when the front end proved the pointer non-nil.
        bounded: bool,
    },
    Field {
        base: Box<Expr>,
        /// Byte offset of the field, computed by the front end.
        offset: i64,
        through_ptr: bool,
    },
    /// A callee frame slot at a fixed offset from the stack pointer; the
    /// front end uses these as targets of argument-marshaling assignments.
    ArgSlot {
        offset: i64,
    },
    Call(CallExpr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    Com,
    Real,
    Imag,
    Sqrt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Hmul,
    And,
    Or,
    Xor,
    Lsh,
    Rsh,
    Lrot,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LogicalAnd,
    LogicalOr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Normal,
    Defer,
    Go,
}

#[derive(Debug, Clone)]
pub enum CallTarget {
    /// Direct call of a named function symbol.
    Static { name: String },
    /// Call through a function value.
    Closure(Box<Expr>),
    /// Virtual dispatch through an interface's method table.
    Interface {
        recv: Box<Expr>,
        /// Byte offset of the method entry relative to the itab's method
        /// array (the table header size is added during lowering).
        method_offset: i64,
    },
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub target: CallTarget,
    pub kind: CallKind,
    /// Argument marshaling, pre-lowered by the front end into assignments
    /// targeting the callee's frame slots.
    pub arg_stmts: Vec<Stmt>,
    /// Total byte size of the callee's argument frame (receiver included).
    pub arg_size: i64,
    /// Result type and its frame offset, when the callee returns a value.
    pub result: Option<(Type, i64)>,
}
