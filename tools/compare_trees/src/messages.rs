//! Message templates for mismatches, keyed by the operator and the diverging operand.

use pathcheck_core::ir::{MemberKind, Operator, SymbolCatalog, TreeNode};

pub(crate) fn wrong_kind(expected: &TreeNode, actual: &TreeNode) -> String {
    format!(
        "expected {} `{expected}`, found {} `{actual}`",
        expected.kind_name(),
        actual.kind_name()
    )
}

pub(crate) fn wrong_operand_count(expected: &TreeNode, actual: &TreeNode) -> String {
    let (want, got) = (expected.children().len(), actual.children().len());
    match expected.operator() {
        Some(Operator::Call(callee)) => {
            format!("wrong number of arguments to `{callee}`, expected {want}, found {got}")
        }
        Some(op) => format!("expected {want} operands of {}, found {got}", op.description()),
        None => format!("expected `{expected}`"),
    }
}

/// Message for `node` when operand `which` diverges, or every operand if `which` is `None`.
pub(crate) fn wrong_operand(
    catalog: &SymbolCatalog,
    node: &TreeNode,
    which: Option<usize>,
) -> String {
    let children = node.children();
    let Some(op) = node.operator() else {
        return format!("expected `{node}`");
    };
    match (op, which, children) {
        (Operator::ArrayIndex, Some(0), [array, _]) => format!("wrong array, expected `{array}`"),
        (Operator::ArrayIndex, Some(1), [_, index]) => format!("wrong index, expected `{index}`"),
        (Operator::ArrayIndex, None, _) => format!("wrong array and index, expected `{node}`"),
        (Operator::Dot, Some(0), [object, _]) => format!("wrong object, expected `{object}`"),
        (Operator::Arrow, Some(0), [pointer, _]) => format!("wrong pointer, expected `{pointer}`"),
        (Operator::Dot | Operator::Arrow, Some(1), [receiver, member]) => {
            let noun = match member_kind(catalog, op, receiver, member) {
                Some(MemberKind::Field) => "field",
                Some(MemberKind::Method) => "method",
                Some(MemberKind::Both) | None => "member",
            };
            format!("wrong {noun}, expected `{member}`")
        }
        (Operator::Dot | Operator::Arrow, None, _) => {
            format!("wrong object and member, expected `{node}`")
        }
        (Operator::Dereference, _, [pointer]) => format!("wrong pointer, expected `{pointer}`"),
        (Operator::Call(callee), Some(n), args) if n < args.len() => {
            format!("wrong argument {} to `{callee}`, expected `{}`", n + 1, args[n])
        }
        (Operator::Subtract | Operator::Divide, Some(0), [lhs, _]) => {
            format!("wrong left operand of {}, expected `{lhs}`", op.description())
        }
        (Operator::Subtract | Operator::Divide, Some(1), [_, rhs]) => {
            format!("wrong right operand of {}, expected `{rhs}`", op.description())
        }
        (Operator::Add | Operator::Multiply, Some(n), operands) if n < operands.len() => {
            format!(
                "wrong operand of {}, expected `{}`",
                op.description(),
                operands[n]
            )
        }
        (op, None, _) if op.is_arithmetic() => {
            format!("wrong operands of {}, expected `{node}`", op.description())
        }
        _ => format!("expected `{node}`"),
    }
}

/// Whether `member` of `receiver` names a field or a method. Fields and methods are looked up
/// separately, so a name used for both is reported as such.
fn member_kind(
    catalog: &SymbolCatalog,
    op: &Operator,
    receiver: &TreeNode,
    member: &TreeNode,
) -> Option<MemberKind> {
    let owner_type = catalog.type_of(receiver)?;
    let owner = match op {
        Operator::Arrow => owner_type.pointee_custom_name()?,
        _ => owner_type.custom_name()?,
    };
    let custom = catalog.lookup_custom_type(owner)?;
    match member {
        TreeNode::Variable(id) => custom.member_kind(id),
        TreeNode::Operator {
            op: Operator::Call(callee),
            ..
        } => custom.method(callee).map(|_| MemberKind::Method),
        _ => None,
    }
}
