use clap::Parser as ClapParser;

use silt::diag::{CompileError, Span};
use silt::ssa::lower::lower_func;
use silt::ssa::model::format::format_func;
use silt::ssa::verify::verify_func;
use silt::tree::{
    BinaryOp, Expr, ExprKind, FuncDecl, Stmt, StmtKind, StorageClass, VarDecl, VarId,
};
use silt::types::Type;

#[derive(ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Comma-separated list of things to dump: tree,ssa
    #[clap(long)]
    dump: Option<String>,
}

fn main() {
    let args = Args::parse();

    let mut dump_tree = false;
    let mut dump_ssa = false;
    if let Some(dump) = &args.dump {
        for item in dump.split(',').map(|s| s.trim().to_lowercase()) {
            match item.as_str() {
                "tree" => dump_tree = true,
                "ssa" => dump_ssa = true,
                "" => {}
                _ => {
                    eprintln!("[WARN] unknown dump flag: {item}");
                }
            }
        }
    }

    let decl = demo_func();
    if dump_tree {
        println!("Tree:");
        println!("--------------------------------");
        println!("{decl:#?}");
        println!("--------------------------------");
    }

    match compile(&decl) {
        Ok(text) => {
            if dump_ssa {
                println!("SSA:");
                println!("--------------------------------");
                print!("{text}");
                println!("--------------------------------");
            }
            match std::fs::write("output.ssa", &text) {
                Ok(_) => println!("[SUCCESS] ssa written to output.ssa"),
                Err(e) => println!("[ERROR] failed to write ssa: {e}"),
            }
        }
        Err(error) => match error {
            CompileError::Lower(e) => println!("[ERROR] {e}"),
            CompileError::Verify(e) => println!("[ERROR] invalid ssa: {e}"),
        },
    }
}

fn compile(decl: &FuncDecl) -> Result<String, CompileError> {
    let func = lower_func(decl)?;
    verify_func(&func)?;
    Ok(format_func(&func))
}

/// A hand-built input tree standing in for the external front end: adds two
/// machine words and clamps to zero when the sum wraps.
///
/// ```text
/// fn clamp_add(a: i32, b: i32) -> (out: i32)
/// _:       x = a + b
///          if x < a { goto wrapped } else { goto ok }
/// ok:      out = x
///          goto done
/// wrapped: out = 0
///          goto done
/// done:    ;
/// ```
fn demo_func() -> FuncDecl {
    let i32t = Type::int(32);
    let a = VarId(0);
    let b = VarId(1);
    let out = VarId(2);
    let x = VarId(3);

    let body = vec![
        labeled(
            1,
            "_",
            assign(
                1,
                var(x, i32t),
                binary(1, BinaryOp::Add, var(a, i32t), var(b, i32t)),
            ),
        ),
        Stmt {
            kind: StmtKind::If {
                init: None,
                cond: binary(2, BinaryOp::Lt, var(x, i32t), var(a, i32t)),
                then_body: vec![goto(2, "wrapped")],
                else_body: Some(vec![goto(2, "ok")]),
            },
            span: Span::line(2),
        },
        labeled(3, "ok", assign(3, var(out, i32t), var(x, i32t))),
        goto(4, "done"),
        labeled(5, "wrapped", zero_assign(5, var(out, i32t))),
        goto(6, "done"),
        labeled(
            7,
            "done",
            Stmt {
                kind: StmtKind::Empty,
                span: Span::line(7),
            },
        ),
    ];

    FuncDecl {
        name: "clamp_add".to_string(),
        params: vec![
            param(a, "a", i32t, 0),
            param(b, "b", i32t, 4),
        ],
        results: vec![VarDecl {
            id: out,
            name: "out".to_string(),
            ty: i32t,
            class: StorageClass::ParamOut,
            frame_offset: 8,
            addressed: false,
            heap_addr: None,
        }],
        locals: vec![VarDecl {
            id: x,
            name: "x".to_string(),
            ty: i32t,
            class: StorageClass::Auto,
            frame_offset: 0,
            addressed: false,
            heap_addr: None,
        }],
        body,
        span: Span::line(1),
    }
}

fn param(id: VarId, name: &str, ty: Type, frame_offset: i64) -> VarDecl {
    VarDecl {
        id,
        name: name.to_string(),
        ty,
        class: StorageClass::Param,
        frame_offset,
        addressed: false,
        heap_addr: None,
    }
}

fn var(id: VarId, ty: Type) -> Expr {
    Expr {
        kind: ExprKind::Var(id),
        ty,
        span: Span::default(),
    }
}

fn binary(line: usize, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let ty = match op {
        BinaryOp::Lt
        | BinaryOp::Le
        | BinaryOp::Gt
        | BinaryOp::Ge
        | BinaryOp::Eq
        | BinaryOp::Ne => Type::Bool,
        _ => lhs.ty,
    };
    Expr {
        kind: ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        ty,
        span: Span::line(line),
    }
}

fn labeled(line: usize, name: &str, stmt: Stmt) -> Stmt {
    Stmt {
        kind: StmtKind::Labeled {
            name: name.to_string(),
            stmt: Box::new(stmt),
        },
        span: Span::line(line),
    }
}

fn assign(line: usize, target: Expr, value: Expr) -> Stmt {
    Stmt {
        kind: StmtKind::Assign {
            target,
            value: Some(value),
        },
        span: Span::line(line),
    }
}

fn zero_assign(line: usize, target: Expr) -> Stmt {
    Stmt {
        kind: StmtKind::Assign {
            target,
            value: None,
        },
        span: Span::line(line),
    }
}

fn goto(line: usize, label: &str) -> Stmt {
    Stmt {
        kind: StmtKind::Goto {
            label: label.to_string(),
        },
        span: Span::line(line),
    }
}
