//! Structural comparison of the expression tree (expected) with the description tree (actual).
//!
//! Both trees must be canonical, and the expression tree normalized, so that equal access paths
//! are structurally identical. On a mismatch the comparator reports where the description goes
//! wrong, as a [Diagnostic] next to the result; the trees themselves are left untouched.

mod messages;

use pathcheck_core::ir::{ErrorList, Operator, SymbolCatalog, TreeNode};
use pathcheck_core::tools::{RunContext, Tool};
use serde::Serialize;
use tracing::debug;

pub struct CompareTrees {
    expected: TreeNode,
    actual: TreeNode,
}

impl CompareTrees {
    pub fn new(expected: TreeNode, actual: TreeNode) -> CompareTrees {
        CompareTrees { expected, actual }
    }
}

/// Where and how the description diverges from the expression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Child indices leading from the root of the expression tree to the reported node.
    pub path: Vec<usize>,
    /// Index of the postfix token that produced the reported node, when known.
    pub position: Option<usize>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Equivalence {
    pub equivalent: bool,
    pub diagnostic: Option<Diagnostic>,
}

impl Tool for CompareTrees {
    type Output = Equivalence;

    fn name(&self) -> &'static str {
        "compare_trees"
    }

    /// Never fails: a mismatch is a result, not an error.
    fn run(self, context: &RunContext) -> Result<Equivalence, ErrorList> {
        let diagnostic = if !same(&self.expected, &self.actual) {
            let bare_leaf = self.expected.is_leaf() || self.actual.is_leaf();
            Some(if bare_leaf {
                Diagnostic {
                    path: Vec::new(),
                    position: self.expected.source_pos(),
                    message: format!("expected `{}`", self.expected),
                }
            } else {
                let mut path = Vec::new();
                locate(&context.catalog, &self.expected, &self.actual, &mut path)
            })
        } else {
            None
        };
        debug!("Comparison diagnostic: {diagnostic:?}");
        Ok(Equivalence {
            equivalent: diagnostic.is_none(),
            diagnostic,
        })
    }
}

/// Structural equality. Unlike `==` it ignores source positions, which only the expression tree
/// carries.
fn same(expected: &TreeNode, actual: &TreeNode) -> bool {
    match (expected, actual) {
        (TreeNode::IntConstant(a), TreeNode::IntConstant(b)) => a == b,
        (TreeNode::FloatConstant(a), TreeNode::FloatConstant(b)) => a == b,
        (TreeNode::Variable(a), TreeNode::Variable(b)) => a == b,
        (
            TreeNode::Operator {
                op: a_op,
                children: a_children,
                ..
            },
            TreeNode::Operator {
                op: b_op,
                children: b_children,
                ..
            },
        ) => {
            a_op == b_op
                && a_children.len() == b_children.len()
                && a_children.iter().zip(b_children).all(|(a, b)| same(a, b))
        }
        _ => false,
    }
}

/// Finds the node at which two differing trees diverge and describes it. `path` is the path to
/// `expected` on entry and to the reported node on return.
fn locate(
    catalog: &SymbolCatalog,
    expected: &TreeNode,
    actual: &TreeNode,
    path: &mut Vec<usize>,
) -> Diagnostic {
    let report = |path: &[usize], message: String| Diagnostic {
        path: path.to_vec(),
        position: expected.source_pos(),
        message,
    };
    let (Some(expected_op), Some(actual_op)) = (expected.operator(), actual.operator()) else {
        return report(path, messages::wrong_kind(expected, actual));
    };
    if expected_op != actual_op {
        return report(path, messages::wrong_kind(expected, actual));
    }
    let (expected_children, actual_children) = (expected.children(), actual.children());
    if expected_children.len() != actual_children.len() {
        return report(path, messages::wrong_operand_count(expected, actual));
    }

    // Every operand is compared, so the message can say whether one or both diverge.
    let diverging: Vec<usize> = expected_children
        .iter()
        .zip(actual_children)
        .enumerate()
        .filter(|(_, (a, b))| !same(a, b))
        .map(|(n, _)| n)
        .collect();
    let binary = expected_children.len() == 2 && !matches!(expected_op, Operator::Call(_));
    match diverging.as_slice() {
        &[n] => {
            let (child, other) = (&expected_children[n], &actual_children[n]);
            let same_shape = match (child.operator(), other.operator()) {
                (Some(a), Some(b)) => a == b && child.children().len() == other.children().len(),
                _ => false,
            };
            if same_shape {
                path.push(n);
                return locate(catalog, child, other, path);
            }
            report(path, messages::wrong_operand(catalog, expected, Some(n)))
        }
        [_, _] if binary => report(path, messages::wrong_operand(catalog, expected, None)),
        &[first, ..] => report(path, messages::wrong_operand(catalog, expected, Some(first))),
        // Unreachable for trees that differ; report the whole node rather than nothing.
        [] => report(path, messages::wrong_kind(expected, actual)),
    }
}
