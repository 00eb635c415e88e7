//! Infix rendering of trees. The rendered string is both the sort key used by canonicalization
//! and the path shown to the user, so it must be deterministic and unambiguous.

use crate::tree::{Operator, TreeNode};
use std::fmt::{self, Display, Write as _};

impl Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeNode::IntConstant(value) => write!(f, "{value}"),
            // Debug keeps the fractional part, so 2.0 never renders like the integer 2.
            TreeNode::FloatConstant(value) => write!(f, "{value:?}"),
            TreeNode::Variable(id) => f.write_str(id),
            TreeNode::Operator { op, children, .. } => render_operator(f, op, children),
        }
    }
}

fn render_operator(f: &mut fmt::Formatter<'_>, op: &Operator, children: &[TreeNode]) -> fmt::Result {
    match (op, children) {
        (Operator::ArrayIndex, [base, index]) => {
            render_operand(f, base, true)?;
            write!(f, "[{index}]")
        }
        (Operator::Dereference, [pointer]) => write!(f, "*({pointer})"),
        (Operator::Call(callee), args) => {
            write!(f, "{callee}(")?;
            for (n, arg) in args.iter().enumerate() {
                if n > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_char(')')
        }
        (op, children) => {
            let (separator, postfix) = match op {
                Operator::Dot => (".".to_string(), true),
                Operator::Arrow => ("->".to_string(), true),
                op => (format!(" {op} "), false),
            };
            for (n, child) in children.iter().enumerate() {
                if n > 0 {
                    f.write_str(&separator)?;
                }
                render_operand(f, child, postfix)?;
            }
            Ok(())
        }
    }
}

/// Arithmetic sub-expressions are parenthesized wherever they appear as an operand of another
/// infix or postfix operator. A dereference is parenthesized too when `postfix` is set (array base,
/// member receiver), since `*(p)[1]` would read as `*(p[1])`.
fn render_operand(f: &mut fmt::Formatter<'_>, node: &TreeNode, postfix: bool) -> fmt::Result {
    match node.operator() {
        Some(op) if op.is_arithmetic() => write!(f, "({node})"),
        Some(Operator::Dereference) if postfix => write!(f, "({node})"),
        _ => write!(f, "{node}"),
    }
}
