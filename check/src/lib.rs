//! Checks whether a postfix expression describing a memory access path and a free-text
//! description of a path denote the same access. This is normally used through the `pathcheck`
//! binary, but is exposed as a library crate as well.

pub mod cli;
mod error;
pub mod output;
mod runner;

use canonicalize::Canonicalize;
use compare_trees::{CompareTrees, Equivalence};
use load_catalog::load_catalog;
use pathcheck_core::config::Config;
use pathcheck_core::ir::{ErrorList, TreeNode};
use pathcheck_core::tools::RunContext;
use postfix_to_tree::PostfixToTree;
use runner::ToolRunner;
use semantic_normalize::SemanticNormalize;
use std::fs::read_to_string;
use std::sync::Arc;
use template_to_tree::TemplateToTree;
use tracing::{debug, warn};

pub use error::InputError;
pub use output::Outcome;

/// Checks `expression` (postfix) against `text` (description).
///
/// Both inputs are always parsed, so that problems in either are reported together. They are
/// only compared if both are valid.
pub fn check(context: &RunContext, expression: &str, text: &str) -> Outcome {
    let mut runner = ToolRunner::default();
    let expected = expression_tree(&mut runner, context, expression);
    let actual = text_tree(&mut runner, context, text);
    let outcome = match (expected, actual) {
        (Ok(expected), Ok(actual)) => {
            let path = expected.to_string();
            match runner.run(CompareTrees::new(expected, actual), context) {
                Ok(Equivalence {
                    diagnostic: Some(diagnostic),
                    ..
                }) => Outcome::Different { path, diagnostic },
                Ok(_) => Outcome::Equivalent { path },
                Err(errors) => Outcome::Rejected { errors },
            }
        }
        (expected, actual) => {
            let mut errors = ErrorList::new();
            for result in [expected, actual] {
                if let Err(stage_errors) = result {
                    errors.extend(stage_errors);
                }
            }
            Outcome::Rejected { errors }
        }
    };
    debug!("Check finished after {} tool runs", runner.runs());
    outcome
}

/// Postfix text to canonical, normalized tree.
fn expression_tree(
    runner: &mut ToolRunner,
    context: &RunContext,
    expression: &str,
) -> Result<TreeNode, ErrorList> {
    let tree = runner.run(PostfixToTree::new(expression), context)?;
    let tree = runner.run(Canonicalize::new(tree), context)?;
    let tree = runner.run(SemanticNormalize::new(tree), context)?;
    // Normalization can build new sums (pointer arithmetic indices).
    runner.run(Canonicalize::new(tree), context)
}

/// Description to canonical tree. Its shapes are already primitive, so it is not normalized.
fn text_tree(
    runner: &mut ToolRunner,
    context: &RunContext,
    text: &str,
) -> Result<TreeNode, ErrorList> {
    let tree = runner.run(TemplateToTree::new(text), context)?;
    runner.run(Canonicalize::new(tree), context)
}

/// Performs a complete check as configured: loads the catalog and the input file, checks, and
/// returns the outcome.
pub fn check_files(config: Arc<Config>) -> Result<Outcome, InputError> {
    let catalog = load_catalog(&config.catalog)?;
    let input = read_to_string(&config.input).map_err(|source| InputError::Read {
        path: config.input.clone(),
        source,
    })?;
    let mut lines = input.lines();
    let expression = lines.next().unwrap_or_default();
    let text = lines.next().unwrap_or_default();
    if lines.any(|line| !line.trim().is_empty()) {
        warn!(
            "{} has more than two lines; only the first two are checked",
            config.input.display()
        );
    }
    let context = RunContext::new(Arc::new(catalog), config);
    Ok(check(&context, expression, text))
}
