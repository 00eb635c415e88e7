/*
 *  Rewrites an expression tree into the one normal form the comparator
 *  expects, and validates operand types against the symbol catalog.
 *
 *  Each node is handled top-down: first it is rewritten (pointer
 *  arithmetic under a dereference becomes indexing, a dereferenced
 *  member access becomes `->`), then checked, then its children are
 *  normalized. Rules only look at a node's immediate children, which
 *  have not been rewritten yet.
 *
 *  Errors never stop the traversal; the whole tree is checked and
 *  every problem is returned.
 */

use pathcheck_core::ir::{DataType, Error, ErrorList, Operator, SymbolCatalog, TreeNode};
use pathcheck_core::tools::{RunContext, Tool};
use tracing::debug;

pub struct SemanticNormalize {
    tree: TreeNode,
}

impl SemanticNormalize {
    pub fn new(tree: TreeNode) -> SemanticNormalize {
        SemanticNormalize { tree }
    }
}

impl Tool for SemanticNormalize {
    type Output = TreeNode;

    fn name(&self) -> &'static str {
        "semantic_normalize"
    }

    fn run(self, context: &RunContext) -> Result<TreeNode, ErrorList> {
        let mut normalizer = Normalizer {
            catalog: &context.catalog,
            errors: ErrorList::new(),
        };
        let tree = normalizer.normalize(self.tree);
        debug!(
            "Normalized to {tree} with {} errors",
            normalizer.errors.len()
        );
        normalizer.errors.into_result(tree)
    }
}

struct Normalizer<'c> {
    catalog: &'c SymbolCatalog,
    errors: ErrorList,
}

impl Normalizer<'_> {
    fn normalize(&mut self, node: TreeNode) -> TreeNode {
        let TreeNode::Operator {
            op,
            children,
            source_pos,
        } = node
        else {
            if let TreeNode::Variable(id) = &node {
                if self.catalog.lookup_variable(id).is_none() {
                    self.errors.push(Error::UnknownVariable { id: id.clone() });
                }
            }
            return node;
        };
        let (op, children) = self.rewrite(op, children);
        let children = self.check(&op, children);
        let children = self.normalize_children(&op, children);
        TreeNode::Operator {
            op,
            children,
            source_pos,
        }
    }

    /*
     *
     *  Rewrites
     *
     */

    fn rewrite(&self, op: Operator, mut children: Vec<TreeNode>) -> (Operator, Vec<TreeNode>) {
        if op != Operator::Dereference || children.len() != 1 {
            return (op, children);
        }
        match children.pop() {
            Some(TreeNode::Operator {
                op: Operator::Dot,
                children: members,
                ..
            }) => (Operator::Arrow, members),
            Some(TreeNode::Operator {
                op: inner @ (Operator::Add | Operator::Subtract),
                children: operands,
                source_pos,
            }) => match self.pointer_arithmetic(&inner, operands) {
                Ok(indexed) => (Operator::ArrayIndex, indexed),
                Err(operands) => (
                    op,
                    vec![TreeNode::Operator {
                        op: inner,
                        children: operands,
                        source_pos,
                    }],
                ),
            },
            Some(other) => (op, vec![other]),
            None => (op, children),
        }
    }

    /// Splits `base + offset` (in any operand order) or `base - offset` into `[base, index]`.
    /// Hands the operands back unchanged if they are not pointer arithmetic.
    fn pointer_arithmetic(
        &self,
        op: &Operator,
        mut operands: Vec<TreeNode>,
    ) -> Result<Vec<TreeNode>, Vec<TreeNode>> {
        let indexable: Vec<usize> = operands
            .iter()
            .enumerate()
            .filter(|(_, operand)| self.is_indexable(operand))
            .map(|(n, _)| n)
            .collect();
        match (op, indexable.as_slice()) {
            (Operator::Add, &[base]) if operands.len() > 1 => {
                let base = operands.remove(base);
                let index = match operands.len() {
                    1 => operands.remove(0),
                    _ => TreeNode::op(Operator::Add, operands),
                };
                Ok(vec![base, index])
            }
            (Operator::Subtract, [0]) => {
                let [base, offset] = <[TreeNode; 2]>::try_from(operands)?;
                let zero = TreeNode::IntConstant(0);
                let index = match offset {
                    TreeNode::IntConstant(value) => match value.checked_neg() {
                        Some(negated) => TreeNode::IntConstant(negated),
                        None => TreeNode::binary(Operator::Subtract, zero, offset),
                    },
                    offset => TreeNode::binary(Operator::Subtract, zero, offset),
                };
                Ok(vec![base, index])
            }
            _ => Err(operands),
        }
    }

    /*
     *
     *  Checks
     *
     */

    fn check(&mut self, op: &Operator, children: Vec<TreeNode>) -> Vec<TreeNode> {
        match op {
            Operator::ArrayIndex => return self.check_array_index(children),
            Operator::Dot | Operator::Arrow => {
                if let [receiver, member] = children.as_slice() {
                    self.check_member(receiver, member, *op == Operator::Arrow);
                }
            }
            Operator::Dereference => {
                for operand in &children {
                    match self.catalog.type_of(operand) {
                        None => self.errors.push(Error::UnknownOperand {
                            operand: operand.to_string(),
                        }),
                        Some(typ) if !typ.is_indexable() => self.errors.push(Error::NotAPointer {
                            operand: operand.to_string(),
                        }),
                        Some(_) => {}
                    }
                }
            }
            Operator::Call(callee) => {
                if self.catalog.lookup_function(callee).is_none() {
                    self.errors.push(Error::UnknownFunction { id: callee.clone() });
                }
            }
            Operator::Add | Operator::Subtract | Operator::Multiply | Operator::Divide => {
                for operand in &children {
                    if self.catalog.type_of(operand).is_none() {
                        self.errors.push(Error::UnknownOperand {
                            operand: operand.to_string(),
                        });
                    }
                }
            }
        }
        children
    }

    /// Puts the operands in `[array, index]` order and bounds-checks literal indices.
    fn check_array_index(&mut self, children: Vec<TreeNode>) -> Vec<TreeNode> {
        let [a, b] = match <[TreeNode; 2]>::try_from(children) {
            Ok(pair) => pair,
            Err(children) => return children,
        };
        let (a_type, b_type) = (self.catalog.type_of(&a), self.catalog.type_of(&b));
        let is_index = |typ: &Option<DataType>| typ.as_ref().is_some_and(DataType::is_int);
        let is_base = |typ: &Option<DataType>| typ.as_ref().is_some_and(DataType::is_indexable);

        let (base, index, base_type) = if is_base(&a_type) && is_index(&b_type) {
            (a, b, a_type)
        } else if is_index(&a_type) && is_base(&b_type) {
            (b, a, b_type)
        } else {
            let operand = TreeNode::binary(Operator::ArrayIndex, a.clone(), b.clone()).to_string();
            if !is_index(&a_type) && !is_index(&b_type) {
                self.errors.push(Error::MissingIntegerOperand {
                    operand: operand.clone(),
                });
            }
            if !is_base(&a_type) && !is_base(&b_type) {
                self.errors.push(Error::MissingArrayOperand { operand });
            }
            return vec![a, b];
        };

        // Pointers have no extent to check against.
        if let (TreeNode::IntConstant(value), Some(extent)) =
            (&index, base_type.as_ref().and_then(DataType::first_extent))
        {
            if usize::try_from(*value).map_or(true, |value| value >= extent) {
                self.errors.push(Error::ArrayIndexOutOfRange {
                    array: base.to_string(),
                    index: *value,
                    extent,
                });
            }
        }
        vec![base, index]
    }

    fn check_member(&mut self, receiver: &TreeNode, member: &TreeNode, through_pointer: bool) {
        let receiver_type = self.catalog.type_of(receiver);
        let owner = match (&receiver_type, through_pointer) {
            (Some(typ), false) => typ.custom_name(),
            (Some(typ), true) => typ.pointee_custom_name(),
            (None, _) => None,
        };
        let Some(owner) = owner else {
            let operand = receiver.to_string();
            self.errors.push(match through_pointer {
                false => Error::NotACustomType { operand },
                true => Error::NotAPointerToCustomType { operand },
            });
            return;
        };
        let (name, found) = match member {
            TreeNode::Variable(id) => (
                id.as_str(),
                self.catalog
                    .lookup_custom_type(owner)
                    .is_some_and(|custom| custom.member_kind(id).is_some()),
            ),
            TreeNode::Operator {
                op: Operator::Call(callee),
                ..
            } => (
                callee.as_str(),
                self.catalog
                    .lookup_custom_type(owner)
                    .is_some_and(|custom| custom.method(callee).is_some()),
            ),
            _ => ("", false),
        };
        if !found {
            self.errors.push(Error::MissingMember {
                owner: owner.into(),
                member: match name {
                    "" => member.to_string(),
                    name => name.into(),
                },
            });
        }
    }

    fn normalize_children(&mut self, op: &Operator, children: Vec<TreeNode>) -> Vec<TreeNode> {
        let member_access = matches!(op, Operator::Dot | Operator::Arrow);
        children
            .into_iter()
            .enumerate()
            .map(|(n, child)| match child {
                // A member is resolved against its owner, not the catalog; only call arguments
                // are normalized.
                TreeNode::Variable(_) if member_access && n == 1 => child,
                TreeNode::Operator {
                    op: op @ Operator::Call(_),
                    children: args,
                    source_pos,
                } if member_access && n == 1 => TreeNode::Operator {
                    op,
                    children: args.into_iter().map(|arg| self.normalize(arg)).collect(),
                    source_pos,
                },
                child => self.normalize(child),
            })
            .collect()
    }

    fn is_indexable(&self, node: &TreeNode) -> bool {
        self.catalog
            .type_of(node)
            .is_some_and(|typ| typ.is_indexable())
    }
}

#[cfg(test)]
mod tests;
