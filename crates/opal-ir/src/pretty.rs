//! Human-readable IR dumps
//!
//! Renders a unit tree as indented text with provenance markers. Used by
//! tests and for debugging lowering output.

use std::fmt::Write;

use crate::arena::{IrArena, NodeId, Symbol};
use crate::expr::{Expr, Stmt};
use crate::node::NodeKind;

/// Render a unit tree as indented text
pub fn dump_unit(arena: &IrArena, unit: NodeId) -> String {
    let mut out = String::new();
    write_node(arena, unit, 0, &mut out);
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn write_node(arena: &IrArena, id: NodeId, depth: usize, out: &mut String) {
    let node = arena.get(id);
    indent(out, depth);
    match &node.kind {
        NodeKind::Unit(u) => {
            write!(out, "unit {}", u.name).unwrap();
        }
        NodeKind::Class(c) => {
            write!(out, "class {}", c.name).unwrap();
        }
        NodeKind::Property(p) => {
            write!(out, "property {}", p.name).unwrap();
            if p.flags.is_const {
                out.push_str(" const");
            }
            if p.flags.is_delegated {
                out.push_str(" delegated");
            }
        }
        NodeKind::Field(f) => {
            write!(out, "field {}: {}", f.name, f.ty).unwrap();
            if f.is_static {
                out.push_str(" static");
            }
            if let Some(init) = &f.initializer {
                write!(out, " = {}", expr_to_string(arena, init)).unwrap();
            }
        }
        NodeKind::Function(f) => {
            write!(out, "fn {}(): {}", f.name, f.return_ty).unwrap();
            if let Some(external) = &f.external_name {
                write!(out, " as \"{}\"", external).unwrap();
            }
        }
        NodeKind::Constructor(c) => {
            out.push_str("constructor(");
            for (i, param) in c.params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write!(out, "{}: {}", param.name, param.ty).unwrap();
            }
            out.push(')');
        }
    }
    if node.is_synthesized() {
        out.push_str(" [synthesized]");
    }
    out.push('\n');

    match &node.kind {
        NodeKind::Function(f) => write_body(arena, &f.body, depth + 1, out),
        NodeKind::Constructor(c) => write_body(arena, &c.body, depth + 1, out),
        _ => {}
    }
    for &child in node.children() {
        write_node(arena, child, depth + 1, out);
    }
}

fn write_body(arena: &IrArena, body: &[Stmt], depth: usize, out: &mut String) {
    for stmt in body {
        write_stmt(arena, stmt, depth, out);
    }
}

fn write_stmt(arena: &IrArena, stmt: &Stmt, depth: usize, out: &mut String) {
    indent(out, depth);
    match stmt {
        Stmt::Expr(e) => {
            writeln!(out, "{}", expr_to_string(arena, e)).unwrap();
        }
        Stmt::SetField {
            field,
            receiver,
            value,
        } => {
            if let Some(recv) = receiver {
                write!(out, "{}.", expr_to_string(arena, recv)).unwrap();
            }
            writeln!(
                out,
                "{} = {}",
                symbol_name(arena, *field),
                expr_to_string(arena, value)
            ).unwrap();
        }
        Stmt::If { cond, then_branch } => {
            writeln!(out, "if {}", expr_to_string(arena, cond)).unwrap();
            write_body(arena, then_branch, depth + 1, out);
        }
        Stmt::Return(value) => match value {
            Some(e) => {
                writeln!(out, "return {}", expr_to_string(arena, e)).unwrap();
            }
            None => {
                writeln!(out, "return").unwrap();
            }
        },
        Stmt::DelegatingCall { target } => match target {
            Some(sym) => {
                writeln!(out, "super<{}>()", symbol_name(arena, *sym)).unwrap();
            }
            None => {
                writeln!(out, "super()").unwrap();
            }
        },
    }
}

fn expr_to_string(arena: &IrArena, expr: &Expr) -> String {
    match expr {
        Expr::Const(c) => c.to_string(),
        Expr::GetField { field, receiver } => match receiver {
            Some(recv) => format!(
                "{}.{}",
                expr_to_string(arena, recv),
                symbol_name(arena, *field)
            ),
            None => symbol_name(arena, *field),
        },
        Expr::GetParam { index } => format!("param{}", index),
        Expr::This => "this".to_string(),
        Expr::Not(e) => format!("!{}", expr_to_string(arena, e)),
        Expr::Binary { op, lhs, rhs } => format!(
            "{} {} {}",
            expr_to_string(arena, lhs),
            op,
            expr_to_string(arena, rhs)
        ),
        Expr::CallGetter { getter } => format!("{}()", symbol_name(arena, *getter)),
    }
}

fn symbol_name(arena: &IrArena, sym: Symbol) -> String {
    arena
        .resolve(sym)
        .name()
        .unwrap_or("<anonymous>")
        .to_string()
}
