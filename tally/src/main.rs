use clap::{Parser, Subcommand};
use miette::{Diagnostic, MietteHandlerOpts, NamedSource, Report};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tally_interpreter::{EvaluationError, Interpreter, InterpreterConfig, IoSink};
use tally_parser::ParseError;
use thiserror::Error;

mod repl;
mod sexpr;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "The Tally sequence language interpreter",
    long_about = "Tally evaluates decimal arithmetic over lazy integer ranges with map and reduce."
)]
struct Cli {
    /// Significant digits kept by division and exponentiation
    #[arg(
        long,
        global = true,
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    precision: u64,

    /// Evaluate map bodies on the calling thread only
    #[arg(long, global = true)]
    sequential: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Tally program
    Run {
        /// Program file to run (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse Tally source files and display their AST (debug only)
    Parse {
        /// Tally source files to parse (use '-' to read from stdin)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Show detailed span information in output
        #[arg(short, long)]
        spans: bool,
    },

    /// Start an interactive session
    Repl,
}

/// Failures reported by the command-line front end
#[derive(Debug, Error, Diagnostic)]
enum CliError {
    #[error("Failed to read {path}")]
    #[diagnostic(code(tally::cli::read))]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("Failed to flush program output")]
    #[diagnostic(code(tally::cli::output))]
    Output(#[source] io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Repl(#[from] repl::ReplError),
}

fn main() {
    setup_miette_handler();
    init_tracing();

    let cli = Cli::parse();
    let config = InterpreterConfig::default()
        .with_precision(cli.precision)
        .with_parallel_map(!cli.sequential);

    let success = match cli.command {
        Some(Commands::Run { file }) => handle_run_command(&file, config),
        Some(Commands::Parse { files, spans }) => handle_parse_command(files, spans),
        Some(Commands::Repl) => handle_repl_command(config),
        None => {
            // No subcommand provided, show help
            Cli::parse_from(["tally", "--help"]);
            true
        }
    };

    if !success {
        process::exit(1);
    }
}

/// Configure miette for source-annotated error reports
fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .tab_width(4)
                .with_cause_chain()
                .build(),
        )
    }))
    .ok();
}

/// Log to stderr, only when RUST_LOG is set
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        let filter = EnvFilter::from_default_env();
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    }
}

fn handle_run_command(file: &Path, config: InterpreterConfig) -> bool {
    let (source, source_name) = match read_source(file) {
        Ok(loaded) => loaded,
        Err(error) => {
            eprintln!("{:?}", Report::new(error));
            return false;
        }
    };

    match run_source(&source, config) {
        Ok(()) => true,
        Err(error) => {
            report_with_source(error, &source_name, &source);
            false
        }
    }
}

fn run_source(source: &str, config: InterpreterConfig) -> Result<(), CliError> {
    let program = tally_parser::parse_program(source)?;
    tracing::debug!(statements = program.statements.len(), "parsed program");

    let stdout = io::stdout();
    let mut sink = IoSink::new(stdout.lock());
    let result = Interpreter::with_config(config).execute(&program, &mut sink);
    sink.flush().map_err(CliError::Output)?;

    Ok(result?)
}

fn handle_parse_command(files: Vec<PathBuf>, spans: bool) -> bool {
    let mut success = true;
    let multiple_files = files.len() > 1;

    for file_path in files {
        let (source, source_name) = match read_source(&file_path) {
            Ok(loaded) => loaded,
            Err(error) => {
                eprintln!("{:?}", Report::new(error));
                success = false;
                continue;
            }
        };

        match tally_parser::parse_program(&source) {
            Ok(program) => {
                if multiple_files {
                    println!(";; {}", source_name);
                }
                print_ast(&program, spans);
            }
            Err(error) => {
                report_with_source(CliError::from(error), &source_name, &source);
                success = false;
            }
        }
    }

    success
}

fn handle_repl_command(config: InterpreterConfig) -> bool {
    let mut session = repl::ReplSession::new(config);
    match session.run() {
        Ok(()) => true,
        Err(error) => {
            eprintln!("{:?}", Report::new(CliError::from(error)));
            false
        }
    }
}

/// Read a source file, or stdin when the path is '-'
fn read_source(file_path: &Path) -> Result<(String, String), CliError> {
    if file_path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| CliError::Read {
                path: "<stdin>".to_string(),
                source,
            })?;
        return Ok((buffer, "<stdin>".to_string()));
    }

    let source_name = file_path.display().to_string();
    let source = fs::read_to_string(file_path).map_err(|source| CliError::Read {
        path: source_name.clone(),
        source,
    })?;
    Ok((source, source_name))
}

fn report_with_source(error: CliError, source_name: &str, source: &str) {
    let report =
        Report::new(error).with_source_code(NamedSource::new(source_name, source.to_string()));
    eprintln!("{report:?}");
}

fn print_ast(ast: &tally_parser::Program, spans: bool) {
    if spans {
        // Show full AST with span information for debugging
        println!("{:#?}", ast);
    } else {
        println!("{}", sexpr::format_program_as_sexpr(ast));
    }
}
