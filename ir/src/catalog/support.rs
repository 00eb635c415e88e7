/*
 *  Lookups on the symbol catalog, and the small set of typing rules the
 *  normalizer and comparator need to resolve the type of a subtree.
 */

use crate::catalog::*;
use crate::tree::{Operator, TreeNode};

impl SymbolCatalog {
    pub fn lookup_variable(&self, id: &str) -> Option<&VariableInfo> {
        self.variables.get(id)
    }

    pub fn lookup_function(&self, id: &str) -> Option<&FunctionInfo> {
        self.functions.get(id)
    }

    pub fn lookup_custom_type(&self, id: &str) -> Option<&CustomType> {
        self.custom_types.get(id)
    }

    /// True if some custom type has a field or method called `id`.
    pub fn is_member_name(&self, id: &str) -> bool {
        self.custom_types
            .values()
            .any(|custom| custom.member_kind(id).is_some())
    }

    /// True if some custom type has a method called `id`.
    pub fn is_method_name(&self, id: &str) -> bool {
        self.custom_types
            .values()
            .any(|custom| custom.method(id).is_some())
    }

    /// Resolves the type of `node`, or `None` if the fixed typing rules cannot.
    pub fn type_of(&self, node: &TreeNode) -> Option<DataType> {
        match node {
            TreeNode::IntConstant(_) => Some(DataType::Int),
            TreeNode::FloatConstant(_) => Some(DataType::Float),
            TreeNode::Variable(id) => self.lookup_variable(id).map(|var| var.typ.clone()),
            TreeNode::Operator { op, children, .. } => self.operator_type(op, children),
        }
    }

    fn operator_type(&self, op: &Operator, children: &[TreeNode]) -> Option<DataType> {
        match (op, children) {
            // Either operand order is accepted; normalization fixes the order later.
            (Operator::ArrayIndex, [a, b]) => {
                let (a, b) = (self.type_of(a), self.type_of(b));
                match (a, b) {
                    (Some(base), Some(DataType::Int)) if base.is_indexable() => base.indexed(),
                    (Some(DataType::Int), Some(base)) if base.is_indexable() => base.indexed(),
                    _ => None,
                }
            }
            // *(a.b) is a->b; it is only rewritten once normalization reaches it.
            (
                Operator::Dereference,
                [TreeNode::Operator {
                    op: Operator::Dot,
                    children: access,
                    ..
                }],
            ) => self.operator_type(&Operator::Arrow, access),
            (Operator::Dereference, [pointer]) => self.type_of(pointer)?.indexed(),
            (Operator::Dot, [receiver, member]) => {
                let owner = self.type_of(receiver)?;
                self.member_type(owner.custom_name()?, member)
            }
            (Operator::Arrow, [receiver, member]) => {
                let owner = self.type_of(receiver)?;
                self.member_type(owner.pointee_custom_name()?, member)
            }
            (Operator::Call(callee), _) => self
                .lookup_function(callee)
                .map(|func| func.return_type.clone()),
            (op, operands) if op.is_arithmetic() && !operands.is_empty() => {
                let types = operands
                    .iter()
                    .map(|operand| self.type_of(operand))
                    .collect::<Option<Vec<_>>>()?;
                arithmetic_type(op, types)
            }
            _ => None,
        }
    }

    /// Type of `member` (a field name, or a method call) inside the custom type `owner`.
    pub fn member_type(&self, owner: &str, member: &TreeNode) -> Option<DataType> {
        let custom = self.lookup_custom_type(owner)?;
        match member {
            TreeNode::Variable(id) => custom
                .field(id)
                .map(|field| field.typ.clone())
                .or_else(|| custom.method(id).map(|method| method.return_type.clone())),
            TreeNode::Operator {
                op: Operator::Call(callee),
                ..
            } => custom.method(callee).map(|method| method.return_type.clone()),
            _ => None,
        }
    }
}

/// int op int is int; any float makes it float; a single pointer/array operand makes it
/// pointer arithmetic, which keeps the pointer's type (only for + and -).
fn arithmetic_type(op: &Operator, types: Vec<DataType>) -> Option<DataType> {
    let indexable: Vec<&DataType> = types.iter().filter(|t| t.is_indexable()).collect();
    match indexable.as_slice() {
        [] if types.iter().all(DataType::is_int) => Some(DataType::Int),
        [] if types.iter().all(|t| t.is_int() || t.is_float()) => Some(DataType::Float),
        [base] if matches!(op, Operator::Add | Operator::Subtract)
            && types.iter().filter(|t| t.is_int()).count() == types.len() - 1 =>
        {
            Some((*base).clone())
        }
        _ => None,
    }
}

impl CustomType {
    pub fn field(&self, id: &str) -> Option<&VariableInfo> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn method(&self, id: &str) -> Option<&FunctionInfo> {
        self.methods.iter().find(|method| method.id == id)
    }

    /// Looks `id` up in the fields and in the methods independently.
    pub fn member_kind(&self, id: &str) -> Option<MemberKind> {
        match (self.field(id).is_some(), self.method(id).is_some()) {
            (true, true) => Some(MemberKind::Both),
            (true, false) => Some(MemberKind::Field),
            (false, true) => Some(MemberKind::Method),
            (false, false) => None,
        }
    }
}
