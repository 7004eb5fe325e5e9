use crate::cli::Cli;
use crate::config::Config;
use crate::logging::init_logging;
use crate::output;
use crate::source::SyntaxTree;
use crate::transform::{RemovalPolicy, RemoveStatement, SelectionWindow, TransformError};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::Path;

/// Success, including query and listing runs.
pub const EXIT_OK: i32 = 0;
/// The requested counter is larger than the number of instances.
pub const EXIT_OUT_OF_RANGE: i32 = 1;
/// Bad arguments, an invalid counter window, or unreadable input.
pub const EXIT_USAGE: i32 = 2;
/// The planned deletions could not be applied.
pub const EXIT_INTERNAL: i32 = 3;

/// Runs the pass with the given arguments.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run stmtdelta with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
/// Errors are reported on stderr and mapped to an exit code.
///
/// # Errors
///
/// Returns an error if writing help or version text to `writer` fails.
pub fn run_with_args_to<W: Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["stmtdelta".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(EXIT_OK);
            }
            _ => {
                eprint!("{e}");
                return Ok(EXIT_USAGE);
            }
        },
    };

    init_logging(cli.output.verbose);

    match execute(&cli, writer) {
        Ok(code) => Ok(code),
        Err(e) => {
            output::print_error(&format!("{e:#}"));
            Ok(EXIT_USAGE)
        }
    }
}

/// Settings after merging the config file under the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    policy: RemovalPolicy,
    line_markers: bool,
    main_file: Option<String>,
}

impl Settings {
    fn resolve(cli: &Cli, config: &Config) -> Self {
        Self {
            policy: cli
                .selection
                .policy
                .or(config.stmtdelta.policy)
                .unwrap_or_default(),
            line_markers: !cli.markers.no_line_markers
                && config.stmtdelta.respect_line_markers.unwrap_or(true),
            main_file: cli
                .markers
                .main_file
                .clone()
                .or_else(|| config.stmtdelta.main_file.clone()),
        }
    }
}

fn execute<W: Write>(cli: &Cli, writer: &mut W) -> Result<i32> {
    let config = Config::load_from_path(&cli.input);
    let settings = Settings::resolve(cli, &config);
    tracing::debug!(?settings, input = %cli.input.display(), "resolved settings");

    let source = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let tree = parse_source(&source, &settings)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;

    let pass = RemoveStatement::new(settings.policy);
    let list = pass.candidates(&tree);

    if cli.query_instances {
        output::print_instance_count(writer, settings.policy, list.len(), cli.output.json)?;
        writer.flush()?;
        return Ok(EXIT_OK);
    }

    if cli.list_instances {
        let rows = output::candidate_rows(&tree, &list);
        output::print_candidates(writer, settings.policy, &rows, cli.output.json)?;
        writer.flush()?;
        return Ok(EXIT_OK);
    }

    let Some(counter) = cli.selection.counter else {
        output::print_error("--counter is required");
        return Ok(EXIT_USAGE);
    };
    let to_counter = cli.selection.to_counter.unwrap_or(counter);
    let window = match SelectionWindow::new(counter, to_counter) {
        Ok(window) => window,
        Err(e) => {
            output::print_error(&e.to_string());
            return Ok(EXIT_USAGE);
        }
    };

    let removal = match pass.remove_from(&tree, &list, window) {
        Ok(removal) => removal,
        Err(e) => {
            output::print_error(&e.to_string());
            return Ok(removal_exit_code(&e));
        }
    };

    let destination = cli.output.output.as_deref();
    if let Some(path) = destination {
        write_program(path, &removal.text)?;
    }
    let shown = destination.map(|p| p.display().to_string());

    if cli.output.json {
        output::print_removal_json(writer, settings.policy, &removal, shown.as_deref())?;
    } else if let Some(shown) = shown.as_deref() {
        output::print_removal_summary(writer, &removal, shown)?;
    } else {
        writer.write_all(removal.text.as_bytes())?;
    }
    writer.flush()?;
    Ok(EXIT_OK)
}

fn removal_exit_code(error: &TransformError) -> i32 {
    match error {
        TransformError::OutOfRange { .. } => EXIT_OUT_OF_RANGE,
        TransformError::InternalEditFailure(_) => EXIT_INTERNAL,
    }
}

fn write_program(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(feature = "cst")]
fn parse_source(source: &str, settings: &Settings) -> Result<SyntaxTree> {
    let mut parser = crate::cst::CParser::new()?.with_line_markers(settings.line_markers);
    if let Some(name) = &settings.main_file {
        parser = parser.with_main_file(name.clone());
    }
    Ok(parser.parse(source)?)
}

#[cfg(not(feature = "cst"))]
fn parse_source(_source: &str, _settings: &Settings) -> Result<SyntaxTree> {
    Err(crate::cst::stub::CstNotAvailable.into())
}
