/*
 *  Trees describing an access path, built from either the postfix
 *  expression or the free-text description.
 *
 *  Trees are owned values: every pipeline stage takes a tree by value
 *  and hands a (possibly rewritten) tree to the next stage.
 */

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `a[i]`
    ArrayIndex,
    /// `a * b`
    Multiply,
    /// `a->b`
    Arrow,
    /// `a.b`
    Dot,
    /// `a / b`
    Divide,
    /// `a - b`
    Subtract,
    /// `a + b`
    Add,
    /// `f(args...)`, holding the callee's name.
    Call(String),
    /// `*x`
    Dereference,
}

/// How many operands an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    // decided by the call site
    Variadic,
}

impl Operator {
    /// Looks up the operator written as `symbol` in a postfix expression. Calls are not
    /// symbols; they are parsed from `@` tokens.
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Some(match symbol {
            "[]" => Operator::ArrayIndex,
            "*" => Operator::Multiply,
            "->" => Operator::Arrow,
            "." => Operator::Dot,
            "/" => Operator::Divide,
            "-" => Operator::Subtract,
            "+" => Operator::Add,
            "#*" => Operator::Dereference,
            _ => return None,
        })
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::Dereference => Arity::Fixed(1),
            Operator::Call(_) => Arity::Variadic,
            _ => Arity::Fixed(2),
        }
    }

    /// Add and Multiply are the only operators whose operands may be reordered.
    pub fn is_commutative(&self) -> bool {
        matches!(self, Operator::Add | Operator::Multiply)
    }

    /// True for the four arithmetic operators, which render infix.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Operator::Add | Operator::Subtract | Operator::Multiply | Operator::Divide
        )
    }

    /// Human-readable name, used in diagnostics.
    pub fn description(&self) -> String {
        match self {
            Operator::ArrayIndex => "array element access".into(),
            Operator::Multiply => "multiplication".into(),
            Operator::Arrow => "member access through pointer".into(),
            Operator::Dot => "member access".into(),
            Operator::Divide => "division".into(),
            Operator::Subtract => "subtraction".into(),
            Operator::Add => "addition".into(),
            Operator::Call(callee) => format!("call to `{callee}`"),
            Operator::Dereference => "dereference".into(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::ArrayIndex => write!(f, "[]"),
            Operator::Multiply => write!(f, "*"),
            Operator::Arrow => write!(f, "->"),
            Operator::Dot => write!(f, "."),
            Operator::Divide => write!(f, "/"),
            Operator::Subtract => write!(f, "-"),
            Operator::Add => write!(f, "+"),
            Operator::Call(callee) => write!(f, "{callee}()"),
            Operator::Dereference => write!(f, "#*"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    IntConstant(i64),
    FloatConstant(f64),
    Variable(String),
    Operator {
        op: Operator,
        children: Vec<TreeNode>,
        // index of the postfix token that produced this node
        source_pos: Option<usize>,
    },
}

impl TreeNode {
    pub fn variable(id: impl Into<String>) -> TreeNode {
        TreeNode::Variable(id.into())
    }

    /// Creates an operator node that did not come from a postfix token.
    pub fn op(op: Operator, children: Vec<TreeNode>) -> TreeNode {
        TreeNode::Operator {
            op,
            children,
            source_pos: None,
        }
    }

    pub fn binary(op: Operator, lhs: TreeNode, rhs: TreeNode) -> TreeNode {
        TreeNode::op(op, vec![lhs, rhs])
    }

    pub fn call(callee: impl Into<String>, args: Vec<TreeNode>) -> TreeNode {
        TreeNode::op(Operator::Call(callee.into()), args)
    }

    /// Parses a numeric literal: a float if it contains a '.', an integer otherwise. Returns
    /// `None` if the text is not a literal or does not fit.
    pub fn literal(text: &str) -> Option<TreeNode> {
        if text.contains('.') {
            text.parse().ok().map(TreeNode::FloatConstant)
        } else {
            text.parse().ok().map(TreeNode::IntConstant)
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, TreeNode::Operator { .. })
    }

    pub fn operator(&self) -> Option<&Operator> {
        match self {
            TreeNode::Operator { op, .. } => Some(op),
            _ => None,
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Operator { children, .. } => children,
            _ => &[],
        }
    }

    pub fn source_pos(&self) -> Option<usize> {
        match self {
            TreeNode::Operator { source_pos, .. } => *source_pos,
            _ => None,
        }
    }

    pub fn variable_id(&self) -> Option<&str> {
        match self {
            TreeNode::Variable(id) => Some(id),
            _ => None,
        }
    }

    /// Short name of the node's kind, used in diagnostics.
    pub fn kind_name(&self) -> String {
        match self {
            TreeNode::IntConstant(_) => "integer constant".into(),
            TreeNode::FloatConstant(_) => "floating-point constant".into(),
            TreeNode::Variable(_) => "variable".into(),
            TreeNode::Operator { op, .. } => op.description(),
        }
    }

    /// Number of nodes on the longest root-to-leaf path. Computed without recursion so it is
    /// safe to call on trees that have not been checked against the depth limit yet.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(node.children().iter().map(|child| (child, depth + 1)));
        }
        deepest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_table() {
        for symbol in ["[]", "*", "->", ".", "/", "-", "+", "#*"] {
            let op = Operator::from_symbol(symbol).unwrap();
            assert_eq!(op.to_string(), symbol);
        }
        assert_eq!(Operator::from_symbol("%"), None);
        assert_eq!(Operator::Dereference.arity(), Arity::Fixed(1));
        assert_eq!(Operator::ArrayIndex.arity(), Arity::Fixed(2));
        assert_eq!(Operator::Call("f".into()).arity(), Arity::Variadic);
    }

    #[test]
    fn literals() {
        assert_eq!(TreeNode::literal("12"), Some(TreeNode::IntConstant(12)));
        assert_eq!(TreeNode::literal("-1"), Some(TreeNode::IntConstant(-1)));
        assert_eq!(TreeNode::literal("2.5"), Some(TreeNode::FloatConstant(2.5)));
        assert_eq!(TreeNode::literal("99999999999999999999"), None);
        assert_eq!(TreeNode::literal("x"), None);
    }

    #[test]
    fn depth() {
        let leaf = TreeNode::variable("a");
        assert_eq!(leaf.depth(), 1);
        let nested = TreeNode::binary(
            Operator::Add,
            TreeNode::IntConstant(1),
            TreeNode::op(Operator::Dereference, vec![leaf]),
        );
        assert_eq!(nested.depth(), 3);
    }
}
