//! The result of a check, and how it is written out.

use crate::InputError;
use compare_trees::Diagnostic;
use pathcheck_core::config::{Config, OutputFormat};
use pathcheck_core::ir::ErrorList;
use serde::Serialize;
use std::fmt::{self, Display};
use std::fs::{create_dir_all, write};
use tracing::info;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The description matches; `path` is the rendered canonical expression.
    Equivalent { path: String },
    /// Both inputs are valid but describe different paths.
    Different { path: String, diagnostic: Diagnostic },
    /// An input could not be parsed or failed validation; nothing was compared.
    Rejected { errors: ErrorList },
}

impl Outcome {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Equivalent { .. } => 0,
            Outcome::Different { .. } | Outcome::Rejected { .. } => 1,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Equivalent { path } => write!(f, "correct: {path}"),
            Outcome::Different { path, diagnostic } => {
                writeln!(f, "incorrect: {}", diagnostic.message)?;
                if let Some(position) = diagnostic.position {
                    writeln!(f, "  at node {position}")?;
                }
                write!(f, "expression: {path}")
            }
            Outcome::Rejected { errors } => write!(f, "{errors}"),
        }
    }
}

/// Formats `outcome` as configured.
pub fn render(outcome: &Outcome, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(outcome.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(outcome),
    }
}

/// Writes `outcome` to the configured output file, or to standard output if there is none.
pub fn write_outcome(outcome: &Outcome, config: &Config) -> Result<(), InputError> {
    let mut rendered = render(outcome, config.format)?;
    rendered.push('\n');
    match &config.output {
        None => print!("{rendered}"),
        Some(path) => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            write(path, rendered)?;
            info!("Wrote result to {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathcheck_core::ir::Error;

    fn different() -> Outcome {
        Outcome::Different {
            path: "arr[2]".into(),
            diagnostic: Diagnostic {
                path: vec![],
                position: Some(2),
                message: "wrong index, expected `2`".into(),
            },
        }
    }

    #[test]
    fn text() {
        let equivalent = Outcome::Equivalent {
            path: "p.x".into(),
        };
        assert_eq!(equivalent.to_string(), "correct: p.x");
        assert_eq!(
            different().to_string(),
            "incorrect: wrong index, expected `2`\n  at node 2\nexpression: arr[2]"
        );
        let rejected = Outcome::Rejected {
            errors: [Error::EmptyExpression, Error::EmptyText].into_iter().collect(),
        };
        assert_eq!(
            rejected.to_string(),
            "no expression given\nno text description given"
        );
        assert_eq!(rejected.exit_code(), 1);
        assert_eq!(equivalent.exit_code(), 0);
    }

    #[test]
    fn json() -> Result<(), Box<dyn std::error::Error>> {
        let value: serde_json::Value =
            serde_json::from_str(&render(&different(), OutputFormat::Json)?)?;
        assert_eq!(
            value,
            serde_json::json!({
                "status": "different",
                "path": "arr[2]",
                "diagnostic": {
                    "path": [],
                    "position": 2,
                    "message": "wrong index, expected `2`"
                }
            })
        );
        let rejected = Outcome::Rejected {
            errors: Error::UnknownVariable { id: "q".into() }.into(),
        };
        let value: serde_json::Value =
            serde_json::from_str(&render(&rejected, OutputFormat::Json)?)?;
        assert_eq!(
            value,
            serde_json::json!({
                "status": "rejected",
                "errors": [{ "kind": "unknown_variable", "id": "q" }]
            })
        );
        Ok(())
    }

    #[cfg(not(miri))]
    #[test]
    fn writes_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = pathcheck_core::test_util::tempdir()?;
        let mut config = Config::mock();
        let path = dir.path().join("nested").join("result.txt");
        config.output = Some(path.clone());
        write_outcome(&different(), &config)?;
        assert_eq!(
            std::fs::read_to_string(path)?,
            "incorrect: wrong index, expected `2`\n  at node 2\nexpression: arr[2]\n"
        );
        Ok(())
    }
}
