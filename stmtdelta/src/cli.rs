use crate::transform::RemovalPolicy;
use clap::{ArgGroup, Args, Parser};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.stmtdelta.toml):
  Looked up from the input file's directory upwards.

  [stmtdelta]
  policy = \"nested-expr\"      # single | statement | nested-expr
  respect_line_markers = true # Treat `# N \"file\"` regions as read-only
  main_file = \"prog.c\"        # Name of the file being reduced

COUNTERS:
  Counter 1 is the last candidate in the file, counter 2 the one before it.
  --counter N --to-counter M removes every candidate from counter M down
  to counter N in one run.
";

/// Which statements to remove.
#[derive(Args, Debug, Default, Clone)]
pub struct SelectionArgs {
    /// First counter (1-based, counted from the last candidate).
    #[arg(long, value_name = "N")]
    pub counter: Option<usize>,

    /// Last counter of the window (defaults to --counter).
    #[arg(long, value_name = "M", requires = "counter")]
    pub to_counter: Option<usize>,

    /// Candidate policy (overrides the config file).
    #[arg(long, value_enum)]
    pub policy: Option<RemovalPolicy>,
}

/// Options for output formatting and verbosity.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputOptions {
    /// Write the transformed program here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options controlling included-file detection.
#[derive(Args, Debug, Default, Clone)]
pub struct MarkerOptions {
    /// Name of the main file when matching line markers.
    #[arg(long, value_name = "NAME")]
    pub main_file: Option<String>,

    /// Ignore line markers; every statement is editable.
    #[arg(long)]
    pub no_line_markers: bool,
}

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser, Debug)]
#[command(
    name = "stmtdelta",
    author,
    version,
    about = "stmtdelta - Remove statements from C function bodies by counter, for test-case reduction",
    long_about = None,
    after_help = CONFIG_HELP,
    group(ArgGroup::new("mode").required(true).args(["counter", "query_instances", "list_instances"]))
)]
pub struct Cli {
    /// Preprocessed C source file to transform.
    pub input: PathBuf,

    /// Print the number of available transformation instances.
    #[arg(long, conflicts_with_all = ["counter", "list_instances"])]
    pub query_instances: bool,

    /// Print every candidate with its counter.
    #[arg(long, conflicts_with = "counter")]
    pub list_instances: bool,

    /// Selection options (counter window and policy).
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output formatting options.
    #[command(flatten)]
    pub output: OutputOptions,

    /// Line-marker options.
    #[command(flatten)]
    pub markers: MarkerOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("stmtdelta").chain(args.iter().copied()))
    }

    #[test]
    fn test_counter_window() {
        let cli = parse(&["prog.c", "--counter", "2", "--to-counter", "5"]).unwrap();
        assert_eq!(cli.selection.counter, Some(2));
        assert_eq!(cli.selection.to_counter, Some(5));
        assert!(cli.selection.policy.is_none());
    }

    #[test]
    fn test_mode_required() {
        let err = parse(&["prog.c"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_query_conflicts_with_counter() {
        let err = parse(&["prog.c", "--query-instances", "--counter", "1"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_policy_names() {
        let cli = parse(&["prog.c", "--list-instances", "--policy", "statement"]).unwrap();
        assert_eq!(cli.selection.policy, Some(RemovalPolicy::Statement));
        let cli = parse(&["prog.c", "--query-instances", "--policy", "single-target"]).unwrap();
        assert_eq!(cli.selection.policy, Some(RemovalPolicy::Single));
    }

    #[test]
    fn test_output_flags() {
        let cli = parse(&["prog.c", "--counter", "1", "-o", "out.c", "-v", "--json"]).unwrap();
        assert_eq!(cli.output.output, Some(PathBuf::from("out.c")));
        assert!(cli.output.verbose);
        assert!(cli.output.json);
    }
}
