use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "gmxapi CLI - Validate typed array declarations and simulation parameters for gmxapi workflows.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build every declared array and check every parameter value in a TOML file.
    Check(CheckArgs),
    /// List simulation parameters and their registered types.
    Params(ParamsArgs),
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to a TOML file with `[arrays.<name>]` tables and a `[params]` table.
    #[arg(required = true, value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for the `params` subcommand.
#[derive(Args, Debug)]
pub struct ParamsArgs {
    /// Show only this parameter (e.g. 'nsteps').
    #[arg(value_name = "NAME")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_requires_a_file() {
        assert!(Cli::try_parse_from(["gmxapi", "check"]).is_err());

        let cli = Cli::try_parse_from(["gmxapi", "-vv", "check", "values.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Check(args) if args.file == PathBuf::from("values.toml")));
    }

    #[test]
    fn params_name_is_optional() {
        let cli = Cli::try_parse_from(["gmxapi", "params"]).unwrap();
        assert!(matches!(cli.command, Commands::Params(ParamsArgs { name: None })));

        let cli = Cli::try_parse_from(["gmxapi", "params", "dt", "--log-file", "run.log"]).unwrap();
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
        assert!(matches!(cli.command, Commands::Params(ParamsArgs { name: Some(n) }) if n == "dt"));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["gmxapi", "-q", "-v", "params"]);
        assert!(result.is_err());
    }
}
