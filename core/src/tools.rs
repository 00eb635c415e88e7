//! The stages (tools) a check run is made of, and the interface they share.

use crate::config::Config;
use pathcheck_ir::{ErrorList, SymbolCatalog};
use std::sync::Arc;

/// Trait implemented by each pipeline stage.
///
/// An instance of Tool represents a particular invocation of that tool: it is constructed with
/// the input it works on (a token string, a phrase, a tree) and consumed by `run`. The tool's
/// constructor does not appear in the Tool trait, because whoever builds the tool knows its
/// concrete type.
pub trait Tool {
    /// What a successful run hands to the next stage.
    type Output;

    /// This tool's name. Should be snake case, as it is used in log messages.
    fn name(&self) -> &'static str;

    /// Runs the tool logic.
    ///
    /// Returns the output, or every error found during the run. Tools accumulate errors
    /// instead of stopping at the first one, so an `Err` is never empty.
    fn run(self, context: &RunContext) -> Result<Self::Output, ErrorList>;
}

/// Context a tool is provided when it is running.
#[non_exhaustive]
pub struct RunContext {
    /// Declarations the checked expression may refer to.
    pub catalog: Arc<SymbolCatalog>,

    /// Configuration for the current run.
    pub config: Arc<Config>,
}

impl RunContext {
    /// Creates a new RunContext.
    pub fn new(catalog: Arc<SymbolCatalog>, config: Arc<Config>) -> RunContext {
        RunContext { catalog, config }
    }
}
