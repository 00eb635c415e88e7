//! Puts a tree in canonical form: chains of the same commutative operator are flattened into one
//! N-ary node, whose operands are then sorted by their rendering. Two trees that differ only in
//! the grouping or order of `+` and `*` operands become identical.

use pathcheck_core::ir::{ErrorList, TreeNode};
use pathcheck_core::tools::{RunContext, Tool};
use tracing::debug;

pub struct Canonicalize {
    tree: TreeNode,
}

impl Canonicalize {
    pub fn new(tree: TreeNode) -> Canonicalize {
        Canonicalize { tree }
    }
}

impl Tool for Canonicalize {
    type Output = TreeNode;

    fn name(&self) -> &'static str {
        "canonicalize"
    }

    fn run(self, _context: &RunContext) -> Result<TreeNode, ErrorList> {
        let tree = canonical(self.tree);
        debug!("Canonical form: {tree}");
        Ok(tree)
    }
}

fn canonical(node: TreeNode) -> TreeNode {
    let TreeNode::Operator {
        op,
        children,
        source_pos,
    } = node
    else {
        return node;
    };
    let children = children.into_iter().map(canonical);
    let children = if op.is_commutative() {
        // Children are already canonical, so a same-operator child is flat and its operands can
        // be lifted as they are.
        let mut operands = Vec::new();
        for child in children {
            match child {
                TreeNode::Operator {
                    op: ref child_op,
                    children: grandchildren,
                    ..
                } if *child_op == op => operands.extend(grandchildren),
                child => operands.push(child),
            }
        }
        operands.sort_by_cached_key(TreeNode::to_string);
        operands
    } else {
        children.collect()
    };
    TreeNode::Operator {
        op,
        children,
        source_pos,
    }
}
