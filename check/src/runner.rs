use pathcheck_core::ir::ErrorList;
use pathcheck_core::tools::{RunContext, Tool};
use tracing::{debug, error, info, trace};

/// Runs tools one after another and logs the result of each run.
#[derive(Debug, Default)]
pub struct ToolRunner {
    // Number of tools run so far; also numbers the runs in log messages.
    runs: usize,
}

impl ToolRunner {
    pub fn run<T: Tool>(&mut self, tool: T, context: &RunContext) -> Result<T::Output, ErrorList> {
        self.runs += 1;
        let tool_run = format!("{} ({})", self.runs, tool.name());
        trace!("Starting tool run {tool_run}");
        match tool.run(context) {
            Ok(output) => {
                info!("Tool run {tool_run} succeeded");
                Ok(output)
            }
            Err(errors) => {
                error!("Tool run {tool_run} failed with {} error(s)", errors.len());
                for error in &errors {
                    debug!("Tool run {tool_run}: {error}");
                }
                Err(errors)
            }
        }
    }

    /// Number of tools run so far.
    pub fn runs(&self) -> usize {
        self.runs
    }
}
