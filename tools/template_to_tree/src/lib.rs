//! Builds a tree from a free-text access description such as
//! `field x of {2-th element of array {ps}}`.
//!
//! Brace groups are parsed first, innermost first; each is then replaced by a `{}` placeholder and
//! the remaining skeleton is matched against the phrase signatures in [templates].

mod templates;

use pathcheck_core::ir::{Error, ErrorList, TreeNode};
use pathcheck_core::tools::{RunContext, Tool};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{debug, trace};

static LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid regex"));
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

pub struct TemplateToTree {
    text: String,
}

impl TemplateToTree {
    pub fn new(text: impl Into<String>) -> TemplateToTree {
        TemplateToTree { text: text.into() }
    }
}

impl Tool for TemplateToTree {
    type Output = TreeNode;

    fn name(&self) -> &'static str {
        "template_to_tree"
    }

    fn run(self, context: &RunContext) -> Result<TreeNode, ErrorList> {
        if self.text.trim().is_empty() {
            return Err(Error::EmptyText.into());
        }
        let limit = context.config.limits.max_depth;
        let mut parser = Parser {
            limit,
            errors: ErrorList::new(),
        };
        let tree = parser.parse(&self.text, 0);
        let tree = match tree {
            Some(tree) if parser.errors.is_empty() => tree,
            _ => return Err(parser.errors),
        };
        // Chained array clauses grow the tree without any braces.
        if tree.depth() > limit {
            return Err(Error::NestingTooDeep { limit }.into());
        }
        debug!("Description parsed as {tree}");
        Ok(tree)
    }
}

struct Parser {
    limit: usize,
    errors: ErrorList,
}

impl Parser {
    /// Parses `phrase`, found at brace nesting level `level`. Returns `None` after recording an
    /// error.
    fn parse(&mut self, phrase: &str, level: usize) -> Option<TreeNode> {
        let Some(spans) = brace_spans(phrase) else {
            self.errors.push(Error::UnbalancedBraces {
                fragment: collapse(phrase),
            });
            return None;
        };
        if !spans.is_empty() && level >= self.limit {
            let error = Error::NestingTooDeep { limit: self.limit };
            if !self.errors.contains(&error) {
                self.errors.push(error);
            }
            return None;
        }

        // Keep going after a failed group so every group's errors are reported.
        let mut children = Vec::with_capacity(spans.len());
        let mut failed = false;
        for span in &spans {
            match self.parse(&phrase[span.start + 1..span.end - 1], level + 1) {
                Some(child) => children.push(child),
                None => failed = true,
            }
        }
        if failed {
            return None;
        }

        let skeleton = skeleton(phrase, &spans);
        trace!("Matching skeleton {skeleton:?} with {} children", children.len());
        if skeleton == "{}" {
            return children.pop();
        }
        if children.is_empty() {
            if LITERAL.is_match(&skeleton) {
                if let Some(literal) = TreeNode::literal(&skeleton) {
                    return Some(literal);
                }
            } else if IDENTIFIER.is_match(&skeleton) {
                return Some(TreeNode::variable(skeleton));
            }
        }
        let tree = templates::match_skeleton(&skeleton, children);
        if tree.is_none() {
            self.errors.push(Error::UnknownTemplate {
                fragment: collapse(phrase),
            });
        }
        tree
    }
}

/// Byte ranges of the outermost brace groups in `phrase`, braces included. `None` if the braces
/// do not balance.
fn brace_spans(phrase: &str) -> Option<Vec<Range<usize>>> {
    let mut spans = Vec::new();
    let mut open = 0usize;
    let mut start = 0;
    for (index, c) in phrase.char_indices() {
        match c {
            '{' => {
                if open == 0 {
                    start = index;
                }
                open += 1;
            }
            '}' => {
                open = open.checked_sub(1)?;
                if open == 0 {
                    spans.push(start..index + 1);
                }
            }
            _ => {}
        }
    }
    (open == 0).then_some(spans)
}

/// `phrase` with every span replaced by `{}` and whitespace collapsed.
fn skeleton(phrase: &str, spans: &[Range<usize>]) -> String {
    let mut skeleton = String::with_capacity(phrase.len());
    let mut end = 0;
    for span in spans {
        skeleton.push_str(&phrase[end..span.start]);
        skeleton.push_str("{}");
        end = span.end;
    }
    skeleton.push_str(&phrase[end..]);
    collapse(&skeleton)
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathcheck_core::ir::Operator;

    fn parse(text: &str) -> Result<TreeNode, ErrorList> {
        TemplateToTree::new(text).run(&RunContext::mock())
    }

    fn rendered(text: &str) -> String {
        match parse(text) {
            Ok(tree) => tree.to_string(),
            Err(errors) => panic!("{text:?} failed to parse: {errors}"),
        }
    }

    #[test]
    fn array_access() -> Result<(), ErrorList> {
        assert_eq!(
            parse("2-th element of array {arr}")?,
            TreeNode::binary(
                Operator::ArrayIndex,
                TreeNode::variable("arr"),
                TreeNode::IntConstant(2)
            )
        );
        assert_eq!(rendered("2-th element of array arr"), "arr[2]");
        assert_eq!(rendered("{i}-th element of array {arr}"), "arr[i]");
        assert_eq!(rendered("1-th element of 2-th element of array {m}"), "m[2][1]");
        assert_eq!(
            rendered("{i}-th element of {0}-th element of array m"),
            "m[0][i]"
        );
        Ok(())
    }

    #[test]
    fn members_and_pointers() {
        assert_eq!(rendered("field x of {p}"), "p.x");
        assert_eq!(rendered("field x of object pointed to by {pp}"), "pp->x");
        assert_eq!(rendered("value pointed to by {ptr}"), "*(ptr)");
        assert_eq!(
            rendered("field y of {2-th element of array {ps}}"),
            "ps[2].y"
        );
    }

    #[test]
    fn arithmetic() {
        assert_eq!(rendered("sum of {i} and 1"), "i + 1");
        assert_eq!(rendered("difference of i and -1"), "i - -1");
        assert_eq!(rendered("product of {f} and {2.5}"), "f * 2.5");
        assert_eq!(
            rendered("quotient of {sum of i and 1} and 2"),
            "(i + 1) / 2"
        );
        assert_eq!(
            rendered("value pointed to by {sum of {ptr} and {i}}"),
            "*(ptr + i)"
        );
    }

    #[test]
    fn calls() {
        assert_eq!(rendered("call of function len"), "len()");
        assert_eq!(
            rendered("call of function len with arguments {i}, 2,{arr}"),
            "len(i, 2, arr)"
        );
        assert_eq!(rendered("call of method norm of {p}"), "p.norm()");
        assert_eq!(
            rendered("call of method norm of object pointed to by pp with arguments 1"),
            "pp->norm(1)"
        );
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(rendered("  field   x of\t{ p }  "), "p.x");
        assert_eq!(rendered("{{arr}}"), "arr");
    }

    #[test]
    fn unknown_template() {
        assert_eq!(
            parse("third item of {arr}").unwrap_err(),
            ErrorList::from(Error::UnknownTemplate {
                fragment: "third item of {arr}".into()
            })
        );
        // Both failing groups are reported.
        let errors = parse("sum of {a b} and {c d}").unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn unbalanced_braces() {
        assert_eq!(
            parse("field x of {p").unwrap_err(),
            ErrorList::from(Error::UnbalancedBraces {
                fragment: "field x of {p".into()
            })
        );
        assert!(matches!(
            parse("field x of p}").unwrap_err().iter().next(),
            Some(Error::UnbalancedBraces { .. })
        ));
    }

    #[test]
    fn nesting_limit() {
        let mut context = RunContext::mock();
        let mut config = pathcheck_core::config::Config::mock();
        config.limits.max_depth = 3;
        context.config = config.into();

        let shallow = "value pointed to by {value pointed to by {ptr}}";
        assert!(TemplateToTree::new(shallow).run(&context).is_ok());
        let deep = "value pointed to by {value pointed to by {value pointed to by {{ptr}}}}";
        assert_eq!(
            TemplateToTree::new(deep).run(&context).unwrap_err(),
            ErrorList::from(Error::NestingTooDeep { limit: 3 })
        );
        let chained = "0-th element of 0-th element of 0-th element of array m";
        assert_eq!(
            TemplateToTree::new(chained).run(&context).unwrap_err(),
            ErrorList::from(Error::NestingTooDeep { limit: 3 })
        );
    }

    #[test]
    fn empty() {
        assert_eq!(parse(" \n").unwrap_err(), ErrorList::from(Error::EmptyText));
    }
}
