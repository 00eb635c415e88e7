use super::*;

fn var(id: &str) -> TreeNode {
    TreeNode::variable(id)
}

fn int(value: i64) -> TreeNode {
    TreeNode::IntConstant(value)
}

fn index(a: TreeNode, b: TreeNode) -> TreeNode {
    TreeNode::binary(Operator::ArrayIndex, a, b)
}

fn deref(operand: TreeNode) -> TreeNode {
    TreeNode::op(Operator::Dereference, vec![operand])
}

fn normalize(tree: TreeNode) -> Result<TreeNode, ErrorList> {
    SemanticNormalize::new(tree).run(&RunContext::mock())
}

fn rendered(tree: TreeNode) -> String {
    match normalize(tree) {
        Ok(tree) => tree.to_string(),
        Err(errors) => panic!("normalization failed: {errors}"),
    }
}

#[test]
fn array_bounds() {
    let out_of_range = |index: i64| Error::ArrayIndexOutOfRange {
        array: "arr".into(),
        index,
        extent: 5,
    };
    assert_eq!(
        normalize(index(var("arr"), int(-1))).unwrap_err(),
        ErrorList::from(out_of_range(-1))
    );
    assert_eq!(rendered(index(var("arr"), int(4))), "arr[4]");
    assert_eq!(rendered(index(var("arr"), int(0))), "arr[0]");
    assert_eq!(
        normalize(index(var("arr"), int(5))).unwrap_err(),
        ErrorList::from(out_of_range(5))
    );
}

#[test]
fn inner_dimensions_are_checked() {
    assert_eq!(rendered(index(index(var("m"), int(2)), int(3))), "m[2][3]");
    assert_eq!(
        normalize(index(index(var("m"), int(1)), int(4))).unwrap_err(),
        ErrorList::from(Error::ArrayIndexOutOfRange {
            array: "m[1]".into(),
            index: 4,
            extent: 4,
        })
    );
    // Pointers have no extent.
    assert_eq!(rendered(index(var("ptr"), int(100))), "ptr[100]");
}

#[test]
fn index_comes_second() {
    assert_eq!(rendered(index(int(2), var("arr"))), "arr[2]");
    assert_eq!(rendered(index(var("i"), var("arr"))), "arr[i]");
}

#[test]
fn array_access_needs_array_and_integer() {
    assert_eq!(
        normalize(index(var("i"), int(2))).unwrap_err(),
        ErrorList::from(Error::MissingArrayOperand {
            operand: "i[2]".into()
        })
    );
    assert_eq!(
        normalize(index(var("arr"), var("f"))).unwrap_err(),
        ErrorList::from(Error::MissingIntegerOperand {
            operand: "arr[f]".into()
        })
    );
}

#[test]
fn pointer_arithmetic_becomes_indexing() {
    let sum = TreeNode::binary(Operator::Add, var("arr"), int(2));
    assert_eq!(normalize(deref(sum)), Ok(index(var("arr"), int(2))));

    let reversed = TreeNode::binary(Operator::Add, var("i"), var("ptr"));
    assert_eq!(rendered(deref(reversed)), "ptr[i]");

    let flat = TreeNode::op(Operator::Add, vec![int(1), var("i"), var("ptr")]);
    assert_eq!(rendered(deref(flat)), "ptr[1 + i]");

    let difference = TreeNode::binary(Operator::Subtract, var("ptr"), var("i"));
    assert_eq!(rendered(deref(difference)), "ptr[0 - i]");

    let literal = TreeNode::binary(Operator::Subtract, var("ptr"), int(3));
    assert_eq!(rendered(deref(literal)), "ptr[-3]");

    let before_start = TreeNode::binary(Operator::Subtract, var("arr"), int(1));
    assert_eq!(
        normalize(deref(before_start)).unwrap_err(),
        ErrorList::from(Error::ArrayIndexOutOfRange {
            array: "arr".into(),
            index: -1,
            extent: 5,
        })
    );
}

#[test]
fn dereferenced_member_becomes_arrow() {
    let member = TreeNode::binary(Operator::Dot, var("pp"), var("x"));
    assert_eq!(rendered(deref(member)), "pp->x");
}

#[test]
fn dereferenced_member_as_operand() {
    let arrow = || deref(TreeNode::binary(Operator::Dot, var("pp"), var("x")));
    assert_eq!(rendered(index(var("arr"), arrow())), "arr[pp->x]");
    assert_eq!(
        rendered(TreeNode::binary(Operator::Add, arrow(), int(1))),
        "pp->x + 1"
    );
    // The receiver still has to be a pointer.
    let on_struct = deref(TreeNode::binary(Operator::Dot, var("p"), var("x")));
    assert!(normalize(index(var("arr"), on_struct)).is_err());
}

#[test]
fn member_access() {
    assert_eq!(
        rendered(TreeNode::binary(Operator::Dot, var("p"), var("x"))),
        "p.x"
    );
    assert_eq!(
        rendered(TreeNode::binary(
            Operator::Arrow,
            var("pp"),
            TreeNode::call("norm", vec![])
        )),
        "pp->norm()"
    );
    let origin = TreeNode::binary(Operator::Dot, var("w"), var("origin"));
    assert_eq!(
        rendered(TreeNode::binary(Operator::Dot, origin, var("y"))),
        "w.origin.y"
    );
    let element = index(var("pp"), int(1));
    assert_eq!(
        rendered(TreeNode::binary(Operator::Dot, element, var("x"))),
        "pp[1].x"
    );
}

#[test]
fn member_errors() {
    assert_eq!(
        normalize(TreeNode::binary(Operator::Dot, var("p"), var("z"))).unwrap_err(),
        ErrorList::from(Error::MissingMember {
            owner: "Point".into(),
            member: "z".into()
        })
    );
    // `x` is a field, not a method.
    assert_eq!(
        normalize(TreeNode::binary(
            Operator::Dot,
            var("p"),
            TreeNode::call("x", vec![])
        ))
        .unwrap_err(),
        ErrorList::from(Error::MissingMember {
            owner: "Point".into(),
            member: "x".into()
        })
    );
    assert_eq!(
        normalize(TreeNode::binary(Operator::Dot, var("pp"), var("x"))).unwrap_err(),
        ErrorList::from(Error::NotACustomType {
            operand: "pp".into()
        })
    );
    assert_eq!(
        normalize(TreeNode::binary(Operator::Arrow, var("p"), var("x"))).unwrap_err(),
        ErrorList::from(Error::NotAPointerToCustomType {
            operand: "p".into()
        })
    );
}

#[test]
fn arithmetic_operands_must_resolve() {
    let errors = normalize(TreeNode::binary(Operator::Multiply, var("i"), var("x"))).unwrap_err();
    assert_eq!(
        errors.iter().collect::<Vec<_>>(),
        [
            &Error::UnknownOperand {
                operand: "x".into()
            },
            &Error::UnknownVariable { id: "x".into() },
        ]
    );
    assert_eq!(
        rendered(TreeNode::binary(Operator::Divide, var("f"), int(2))),
        "f / 2"
    );
}

#[test]
fn dereference_needs_a_pointer() {
    assert_eq!(rendered(deref(var("ptr"))), "*(ptr)");
    assert_eq!(
        normalize(deref(var("i"))).unwrap_err(),
        ErrorList::from(Error::NotAPointer {
            operand: "i".into()
        })
    );
    let errors = normalize(deref(var("norm"))).unwrap_err();
    assert!(errors.contains(&Error::UnknownOperand {
        operand: "norm".into()
    }));
}

#[test]
fn free_calls_must_be_functions() {
    assert_eq!(rendered(TreeNode::call("len", vec![var("i")])), "len(i)");
    assert_eq!(
        normalize(TreeNode::call("norm", vec![])).unwrap_err(),
        ErrorList::from(Error::UnknownFunction { id: "norm".into() })
    );
}

#[test]
fn errors_accumulate_across_the_tree() {
    let tree = TreeNode::binary(
        Operator::Subtract,
        index(var("arr"), int(7)),
        index(index(var("m"), int(5)), int(0)),
    );
    let errors = normalize(tree).unwrap_err();
    assert_eq!(errors.len(), 2, "{errors}");
    assert!(errors.contains(&Error::ArrayIndexOutOfRange {
        array: "m".into(),
        index: 5,
        extent: 3,
    }));
}
