//! Configuration shared by every stage of a check run. Loading (default file, user file, command
//! line overrides) is done by the `pathcheck` crate; this module only defines the shape.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Output format for the result of a check.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Bounds on input size. Every recursive pass relies on these having been enforced by the
/// builders.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Limits {
    /// Maximum depth of a tree, and maximum brace nesting in a description.
    pub max_depth: usize,

    /// Maximum number of tokens in a postfix expression.
    pub max_tokens: usize,

    #[serde(flatten)]
    pub unknown: HashMap<String, Value>,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: 64,
            max_tokens: 4096,
            unknown: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    /// File holding the postfix expression (first line) and the description (second line).
    pub input: PathBuf,

    /// Declaration document the symbol catalog is loaded from.
    pub catalog: PathBuf,

    /// Where to write the result. Standard output if absent.
    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(default)]
    pub format: OutputFormat,

    /// Filter directive for the log subscriber, e.g. "warn" or "pathcheck=debug".
    pub log_filter: String,

    #[serde(default)]
    pub limits: Limits,

    // Collects keys nobody asked for so they can be warned about.
    #[serde(flatten)]
    pub unknown: HashMap<String, Value>,
}

impl Config {
    /// Returns a config with default values, for use in tests.
    pub fn mock() -> Config {
        Config {
            input: PathBuf::new(),
            catalog: PathBuf::new(),
            output: None,
            format: OutputFormat::Text,
            log_filter: "warn".into(),
            limits: Limits::default(),
            unknown: HashMap::new(),
        }
    }
}
