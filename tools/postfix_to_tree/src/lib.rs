//! Builds a tree from a whitespace-separated postfix expression, using a stack machine.

mod token;

use pathcheck_core::ir::{Arity, Error, ErrorList, Operator, SymbolCatalog, TreeNode};
use pathcheck_core::tools::{RunContext, Tool};
use token::{Token, classify};
use tracing::{debug, trace};

pub struct PostfixToTree {
    expression: String,
}

impl PostfixToTree {
    pub fn new(expression: impl Into<String>) -> PostfixToTree {
        PostfixToTree {
            expression: expression.into(),
        }
    }
}

impl Tool for PostfixToTree {
    type Output = TreeNode;

    fn name(&self) -> &'static str {
        "postfix_to_tree"
    }

    fn run(self, context: &RunContext) -> Result<TreeNode, ErrorList> {
        let limits = &context.config.limits;
        let tokens: Vec<&str> = self.expression.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(Error::EmptyExpression.into());
        }
        if tokens.len() > limits.max_tokens {
            return Err(Error::TooManyTokens {
                count: tokens.len(),
                limit: limits.max_tokens,
            }
            .into());
        }
        debug!("Building tree from {} tokens", tokens.len());

        let mut builder = Builder::new(&context.catalog);
        for (position, token) in tokens.into_iter().enumerate() {
            builder.push_token(position, token);
        }
        let tree = builder.finish()?;
        if tree.depth() > limits.max_depth {
            return Err(Error::NestingTooDeep {
                limit: limits.max_depth,
            }
            .into());
        }
        Ok(tree)
    }
}

/// Stack machine state. Errors do not stop evaluation: an unresolved identifier still pushes a
/// leaf, so later operators see the operand count the author intended.
struct Builder<'c> {
    catalog: &'c SymbolCatalog,
    stack: Vec<TreeNode>,
    errors: ErrorList,
}

impl<'c> Builder<'c> {
    fn new(catalog: &'c SymbolCatalog) -> Self {
        Builder {
            catalog,
            stack: Vec::new(),
            errors: ErrorList::new(),
        }
    }

    fn push_token(&mut self, position: usize, token: &str) {
        trace!("Token {position}: {token:?}");
        match classify(token) {
            Token::Literal(leaf) => self.stack.push(leaf),
            Token::Identifier(id) => {
                // Member names are operands of `.` and `->`; they are checked against their owner
                // during normalization.
                if self.catalog.lookup_variable(id).is_none() && !self.catalog.is_member_name(id) {
                    self.errors.push(Error::UnknownVariable { id: id.into() });
                }
                self.stack.push(TreeNode::variable(id));
            }
            Token::Operator(op) => {
                let required = match op.arity() {
                    Arity::Fixed(required) => required,
                    Arity::Variadic => 0,
                };
                self.apply(op, required, position);
            }
            Token::Call { count, callee } => {
                if self.catalog.lookup_function(callee).is_none()
                    && !self.catalog.is_method_name(callee)
                {
                    self.errors.push(Error::UnknownFunction { id: callee.into() });
                }
                self.apply(Operator::Call(callee.into()), count, position);
            }
            Token::Unrecognized => {
                self.errors.push(Error::UnrecognizedToken {
                    token: token.into(),
                    position,
                });
                self.stack.push(TreeNode::variable(token));
            }
        }
    }

    /// Pops `required` operands, keeping their original left-to-right order, and pushes the new
    /// operator node.
    fn apply(&mut self, op: Operator, required: usize, position: usize) {
        let available = self.stack.len();
        if available < required {
            self.errors.push(Error::MissingOperand {
                op: op.clone(),
                required,
                position,
            });
        }
        let children = self.stack.split_off(available.saturating_sub(required));
        self.stack.push(TreeNode::Operator {
            op,
            children,
            source_pos: Some(position),
        });
    }

    fn finish(mut self) -> Result<TreeNode, ErrorList> {
        if self.stack.len() > 1 {
            self.errors.push(Error::ExcessOperands {
                count: self.stack.len(),
            });
        }
        match self.stack.pop() {
            Some(tree) => self.errors.into_result(tree),
            None => Err(Error::EmptyExpression.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(expression: &str) -> Result<TreeNode, ErrorList> {
        PostfixToTree::new(expression).run(&RunContext::mock())
    }

    fn var(id: &str) -> TreeNode {
        TreeNode::variable(id)
    }

    #[test]
    fn array_access() -> Result<(), ErrorList> {
        let tree = build("arr 2 []")?;
        assert_eq!(
            tree,
            TreeNode::Operator {
                op: Operator::ArrayIndex,
                children: vec![var("arr"), TreeNode::IntConstant(2)],
                source_pos: Some(2),
            }
        );
        assert_eq!(tree.to_string(), "arr[2]");
        Ok(())
    }

    #[test]
    fn operand_order_is_preserved() -> Result<(), ErrorList> {
        assert_eq!(build("i 1 -")?.to_string(), "i - 1");
        assert_eq!(build("m 1 [] 2 []")?.to_string(), "m[1][2]");
        assert_eq!(build("pp x ->")?.to_string(), "pp->x");
        assert_eq!(build("ptr 1 + #*")?.to_string(), "*(ptr + 1)");
        Ok(())
    }

    #[test]
    fn calls() -> Result<(), ErrorList> {
        assert_eq!(build("@0:len")?.to_string(), "len()");
        assert_eq!(build("i 2 @2:len")?.to_string(), "len(i, 2)");
        assert_eq!(build("p @0norm .")?.to_string(), "p.norm()");
        let call = build("i f @2:len")?;
        assert_eq!(call.source_pos(), Some(2));
        assert_eq!(call.children(), &[var("i"), var("f")]);
        Ok(())
    }

    #[test]
    fn missing_operand() {
        let errors = build("a +").unwrap_err();
        assert!(errors.contains(&Error::MissingOperand {
            op: Operator::Add,
            required: 2,
            position: 1,
        }));
        let errors = build("#*").unwrap_err();
        assert_eq!(
            errors,
            ErrorList::from(Error::MissingOperand {
                op: Operator::Dereference,
                required: 1,
                position: 0,
            })
        );
        let errors = build("i @3:len").unwrap_err();
        assert!(errors.contains(&Error::MissingOperand {
            op: Operator::Call("len".into()),
            required: 3,
            position: 1,
        }));
    }

    #[test]
    fn unknown_names() {
        let errors = build("q 1 []").unwrap_err();
        assert_eq!(errors, ErrorList::from(Error::UnknownVariable { id: "q".into() }));
        let errors = build("@0:nope").unwrap_err();
        assert_eq!(
            errors,
            ErrorList::from(Error::UnknownFunction { id: "nope".into() })
        );
    }

    #[test]
    fn errors_accumulate() {
        let errors = build("q % + r").unwrap_err();
        assert_eq!(
            errors.iter().collect::<Vec<_>>(),
            [
                &Error::UnknownVariable { id: "q".into() },
                &Error::UnrecognizedToken {
                    token: "%".into(),
                    position: 1,
                },
                &Error::UnknownVariable { id: "r".into() },
                &Error::ExcessOperands { count: 2 },
            ]
        );
    }

    #[test]
    fn excess_operands() {
        assert_eq!(
            build("arr 1 2 []").unwrap_err(),
            ErrorList::from(Error::ExcessOperands { count: 2 })
        );
    }

    #[test]
    fn empty() {
        assert_eq!(
            build("  ").unwrap_err(),
            ErrorList::from(Error::EmptyExpression)
        );
    }

    #[test]
    fn limits() {
        let mut context = RunContext::mock();
        let mut config = pathcheck_core::config::Config::mock();
        config.limits.max_tokens = 3;
        config.limits.max_depth = 3;
        context.config = config.into();

        assert_eq!(
            PostfixToTree::new("i 1 + 2 +").run(&context).unwrap_err(),
            ErrorList::from(Error::TooManyTokens { count: 5, limit: 3 })
        );
        assert!(PostfixToTree::new("ptr #* #*").run(&context).is_ok());
        assert_eq!(
            PostfixToTree::new("ptr #* #* #*").run(&context).unwrap_err(),
            ErrorList::from(Error::TooManyTokens { count: 4, limit: 3 })
        );
        config = pathcheck_core::config::Config::mock();
        config.limits.max_depth = 3;
        context.config = config.into();
        assert_eq!(
            PostfixToTree::new("ptr #* #* #*").run(&context).unwrap_err(),
            ErrorList::from(Error::NestingTooDeep { limit: 3 })
        );
    }
}
