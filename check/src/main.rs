use clap::Parser;
use pathcheck::cli::{Args, initialize};
use pathcheck::output::write_outcome;
use pathcheck_core::diagnostics::init_logging;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;

// Exit status for configuration and I/O problems; 1 is a failed check.
const INFRASTRUCTURE_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();
    let config = match initialize(&args) {
        Ok(Some(config)) => Arc::new(config),
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            // Logging may not be set up yet if the config itself is broken.
            init_logging("warn");
            error!("{e}");
            return ExitCode::from(INFRASTRUCTURE_FAILURE);
        }
    };
    let outcome = match pathcheck::check_files(config.clone()) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(INFRASTRUCTURE_FAILURE);
        }
    };
    if let Err(e) = write_outcome(&outcome, &config) {
        error!("{e}");
        return ExitCode::from(INFRASTRUCTURE_FAILURE);
    }
    ExitCode::from(outcome.exit_code())
}
