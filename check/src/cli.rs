//! The command-line arguments and configuration system for the `pathcheck` binary.

use crate::InputError;
use clap::Parser;
use config::FileFormat::Toml;
use directories::ProjectDirs;
use pathcheck_core::config::Config;
use pathcheck_core::diagnostics;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Checks a postfix access-path expression against a text description of the same path.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Set a configuration value; format $NAME=$VALUE.
    #[arg(long, short)]
    pub config: Vec<String>,

    /// File holding the postfix expression on its first line and the description on its second.
    // Should always be present unless using a flag like --print-config-path
    pub input: Option<PathBuf>,

    /// JSON declaration document the expression refers to.
    pub catalog: Option<PathBuf>,

    /// Write the result to this file instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Log debug messages.
    #[arg(short, long)]
    pub verbose: bool,

    /// Prints out the location of the config file.
    #[arg(long)]
    pub print_config_path: bool,
}

/// Logs a warning for every field in `unknown`.
///
/// `prefix` should be the path to this entry (e.g. a nested `limits` table would be checked with
/// a `prefix` of `limits`).
pub(crate) fn unknown_field_warning(prefix: &str, unknown: &HashMap<String, Value>) {
    let mut entries: Vec<_> = unknown.keys().collect();
    entries.sort_unstable();
    entries.into_iter().for_each(|name| match prefix {
        "" => warn!("unknown config key {name}"),
        p => warn!("unknown config key {p}.{name}"),
    });
}

/// Loads and validates the config and sets up logging; to be called by main() before anything
/// that needs the config.
///
/// Returns the config, or None if a command line flag that calls for an early exit (such as
/// --print-config-path) was provided.
pub fn initialize(args: &Args) -> Result<Option<Config>, InputError> {
    let dirs = ProjectDirs::from("", "", "pathcheck");
    let config_dir = dirs.as_ref().map(ProjectDirs::config_dir);
    if args.print_config_path {
        match config_dir {
            Some(dir) => println!("Config file location: {:?}", config_file(dir)),
            None => println!("No config file location: home directory not found"),
        }
        return Ok(None);
    }
    let config = load_config(args, config_dir)?;
    diagnostics::init_logging(&config.log_filter);
    unknown_field_warning("", &config.unknown);
    unknown_field_warning("limits", &config.limits.unknown);
    if config.input.as_os_str().is_empty() {
        return Err(InputError::MissingPath("input"));
    }
    if config.catalog.as_os_str().is_empty() {
        return Err(InputError::MissingPath("catalog"));
    }
    Ok(Some(config))
}

fn load_config(args: &Args, config_dir: Option<&Path>) -> Result<Config, InputError> {
    let mut settings = config::Config::builder().add_source(config::File::from_str(
        include_str!("../default_config.toml"),
        Toml,
    ));
    if let Some(config_dir) = config_dir {
        settings = settings.add_source(config::File::from(config_file(config_dir)).required(false));
    }
    settings =
        settings.add_source(config::File::from(PathBuf::from("pathcheck.toml")).required(false));
    for config_arg in &args.config {
        let Some((name, value)) = config_arg.split_once('=') else {
            return Err(InputError::BadOverride(config_arg.clone()));
        };
        settings = settings.set_override(name, override_value(value))?;
    }
    if args.json {
        settings = settings.set_override("format", "json")?;
    }
    if args.verbose {
        settings = settings.set_override("log_filter", "debug")?;
    }

    // Paths are set after deserialization; the config crate cannot hold a Path losslessly.
    let mut config: Config = settings.build()?.try_deserialize()?;
    if let Some(input) = &args.input {
        config.input = input.clone();
    }
    if let Some(catalog) = &args.catalog {
        config.catalog = catalog.clone();
    }
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }
    Ok(config)
}

/// Command-line values arrive as strings; numbers and booleans are converted so they deserialize
/// into typed fields.
fn override_value(raw: &str) -> config::Value {
    if let Ok(number) = raw.parse::<i64>() {
        number.into()
    } else if let Ok(flag) = raw.parse::<bool>() {
        flag.into()
    } else {
        raw.into()
    }
}

/// Returns the config file path, given the config directory.
fn config_file(config_dir: &Path) -> PathBuf {
    [config_dir, "pathcheck.toml".as_ref()].iter().collect()
}

#[cfg(test)]
mod tests {
    #[cfg(not(miri))]
    #[test]
    fn load_config_test() {
        use super::*;
        use pathcheck_core::config::OutputFormat;
        use pathcheck_core::test_util::tempdir;
        use std::{fs, io::Write as _};
        let config_dir = tempdir().unwrap();
        let load = |args: &[&str]| {
            load_config(
                &Args::parse_from([""].iter().chain(args)),
                Some(config_dir.path()),
            )
            .unwrap()
        };

        let config = load(&["a.txt", "catalog.json"]);
        assert_eq!(config.input, AsRef::<Path>::as_ref("a.txt"));
        assert_eq!(config.catalog, AsRef::<Path>::as_ref("catalog.json"));
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.limits.max_depth, 64);
        assert_eq!(config.output, None);

        fs::File::create(config_file(config_dir.path()))
            .unwrap()
            .write_all(
                br#"
                    input = "b.txt"
                    format = "json"
                    colour = "blue"
                    [limits]
                    max_depth = 10
                    max_dpth = 3
                "#,
            )
            .unwrap();
        let config = load(&[]);
        assert_eq!(config.input, AsRef::<Path>::as_ref("b.txt"));
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.limits.max_depth, 10);
        assert_eq!(config.limits.max_tokens, 4096);
        assert!(config.unknown.contains_key("colour"));
        assert!(config.limits.unknown.contains_key("max_dpth"));
        assert!(!config.unknown.contains_key("limits"));

        // Verify the --config flag overrides the user's config file, including typed values.
        let config = load(&["--config", "input=c.txt", "-c", "limits.max_tokens=5"]);
        assert_eq!(config.input, AsRef::<Path>::as_ref("c.txt"));
        assert_eq!(config.limits.max_tokens, 5);

        // Verify positional arguments override all the configuration options.
        let config = load(&["--config", "input=d.txt", "e.txt", "-o", "/tmp/out.txt"]);
        assert_eq!(config.input, AsRef::<Path>::as_ref("e.txt"));
        assert_eq!(config.output, Some(PathBuf::from("/tmp/out.txt")));

        // Verify the flags.
        fs::remove_file(config_file(config_dir.path())).unwrap();
        let config = load(&["--json", "--verbose"]);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.log_filter, "debug");

        assert!(matches!(
            load_config(
                &Args::parse_from(["", "--config", "nonsense"]),
                Some(config_dir.path())
            ),
            Err(InputError::BadOverride(_))
        ));
    }
}
