//! REPL (Read-Eval-Print Loop) for the Tally interpreter
//!
//! Lines are parsed as programs and executed against one persistent
//! interpreter, so variables survive between lines. A line that is a bare
//! expression is evaluated and its value printed. Features:
//! - REPL commands for inspecting and resetting the session
//! - Multi-line input while parentheses, braces or strings are open
//! - History support and line editing with rustyline

use miette::{Diagnostic, NamedSource, Report};
use rustyline::{error::ReadlineError, DefaultEditor};
use tally_interpreter::{render, EvaluationError, Interpreter, InterpreterConfig};
use tally_parser::{parse_expression, parse_program, ParseError};
use thiserror::Error;

/// Errors that can occur in the REPL
#[derive(Debug, Error, Diagnostic)]
pub enum ReplError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("Readline error: {source}")]
    #[diagnostic(code(tally::repl::readline))]
    Readline {
        #[from]
        source: ReadlineError,
    },

    #[error("REPL command error: {message}")]
    #[diagnostic(code(tally::repl::command), help("Type /help for available commands"))]
    Command { message: String },
}

/// REPL configuration options
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string for input
    pub prompt: String,

    /// Enable history persistence
    pub persist_history: bool,

    /// History file path
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "tally> ".to_string(),
            persist_history: true,
            history_file: Some(".tally_history".to_string()),
        }
    }
}

/// REPL session statistics
#[derive(Debug, Clone, Default)]
pub struct ReplStats {
    /// Number of programs executed
    pub programs_executed: usize,

    /// Number of errors encountered
    pub errors_encountered: usize,

    /// Total REPL commands executed
    pub commands_executed: usize,
}

/// Result of evaluating a line in the REPL
#[derive(Debug, PartialEq)]
pub enum ReplResult {
    /// Ran a program; its print/out text went to the output buffer
    Executed,

    /// Rendered value of a bare expression
    Value(String),

    /// Executed a REPL command
    Command { message: String },

    /// Empty line
    Empty,

    /// Exit request
    Exit,
}

/// REPL session that maintains state across evaluations
pub struct ReplSession {
    interpreter: Interpreter,
    config: ReplConfig,
    stats: ReplStats,
}

impl ReplSession {
    pub fn new(interpreter_config: InterpreterConfig) -> Self {
        Self::with_config(interpreter_config, ReplConfig::default())
    }

    pub fn with_config(interpreter_config: InterpreterConfig, config: ReplConfig) -> Self {
        Self {
            interpreter: Interpreter::with_config(interpreter_config),
            config,
            stats: ReplStats::default(),
        }
    }

    /// Start the REPL main loop
    pub fn run(&mut self) -> Result<(), ReplError> {
        let mut editor = DefaultEditor::new()?;

        // Load history if configured
        if self.config.persist_history {
            if let Some(ref history_file) = self.config.history_file {
                let _ = editor.load_history(history_file); // Ignore errors for new sessions
            }
        }

        self.print_welcome();

        while let Some(line) = self.read_line(&mut editor)? {
            let mut output = String::new();
            let result = self.evaluate_line(&line, &mut output);

            // Text written before a failure is still shown
            if !output.is_empty() {
                println!("{output}");
            }

            match result {
                Ok(ReplResult::Exit) => break,
                Ok(result) => self.display_result(result),
                Err(error) => {
                    self.stats.errors_encountered += 1;
                    self.display_error(error, &line);
                }
            }
        }

        self.print_goodbye();

        if self.config.persist_history {
            if let Some(ref history_file) = self.config.history_file {
                editor.save_history(history_file)?;
            }
        }
        Ok(())
    }

    /// Read a line from the user with prompt, supporting multi-line input
    fn read_line(&self, editor: &mut DefaultEditor) -> Result<Option<String>, ReplError> {
        let mut complete_input = String::new();
        let mut line_count = 0;

        loop {
            let prompt = if line_count == 0 {
                self.config.prompt.as_str()
            } else {
                "... "
            };

            match editor.readline(prompt) {
                Ok(line) => {
                    line_count += 1;

                    if line_count == 1 && line.trim().is_empty() {
                        return Ok(Some(String::new()));
                    }

                    if !complete_input.is_empty() {
                        complete_input.push('\n');
                    }
                    complete_input.push_str(&line);

                    if is_input_complete(&complete_input) {
                        editor.add_history_entry(complete_input.as_str())?;
                        return Ok(Some(complete_input));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Cancel any partial input and start over
                    println!("^C");
                    return Ok(Some(String::new()));
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(ReplError::Readline { source: err }),
            }
        }
    }

    /// Evaluate a line of input, appending program output to `output`
    pub fn evaluate_line(
        &mut self,
        line: &str,
        output: &mut String,
    ) -> Result<ReplResult, ReplError> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Ok(ReplResult::Empty);
        }

        if trimmed.starts_with('/') {
            self.stats.commands_executed += 1;
            return self.execute_command(trimmed);
        }

        match parse_program(line) {
            Ok(program) => {
                self.interpreter.execute(&program, output)?;
                self.stats.programs_executed += 1;
                Ok(ReplResult::Executed)
            }
            Err(program_error) => match parse_expression(line) {
                Ok(expression) => {
                    let value = self.interpreter.evaluate(&expression)?;
                    Ok(ReplResult::Value(render(&value)?))
                }
                Err(_) => Err(program_error.into()),
            },
        }
    }

    fn execute_command(&mut self, command: &str) -> Result<ReplResult, ReplError> {
        match command {
            "/help" | "/h" => Ok(ReplResult::Command {
                message: help_message().to_string(),
            }),
            "/vars" | "/variables" => Ok(ReplResult::Command {
                message: self.format_variables(),
            }),
            "/clear" => {
                self.interpreter.reset();
                Ok(ReplResult::Command {
                    message: "Session cleared".to_string(),
                })
            }
            "/stats" => Ok(ReplResult::Command {
                message: self.format_stats(),
            }),
            "/quit" | "/q" | "/exit" => Ok(ReplResult::Exit),
            unknown => Err(ReplError::Command {
                message: format!("Unknown command: {unknown}"),
            }),
        }
    }

    /// Display the result of evaluation
    fn display_result(&self, result: ReplResult) {
        match result {
            ReplResult::Value(value) => println!("{value}"),
            ReplResult::Command { message } => println!("{message}"),
            ReplResult::Executed | ReplResult::Empty | ReplResult::Exit => {}
        }
    }

    /// Display an error with the offending line as source context
    fn display_error(&self, error: ReplError, source_code: &str) {
        let named_source = NamedSource::new("<repl>", source_code.to_string());
        let report = Report::new(error).with_source_code(named_source);
        eprintln!("{report:?}");
    }

    fn print_welcome(&self) {
        println!("Tally REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type /help for commands, /quit to exit");
        println!();
    }

    fn print_goodbye(&self) {
        println!("Goodbye!");
    }

    /// Format current variables for display
    fn format_variables(&self) -> String {
        let environment = self.interpreter.environment();
        if environment.is_empty() {
            return "No variables defined".to_string();
        }

        let mut lines = vec!["Variables:".to_string()];
        for name in environment.names() {
            if let Some(value) = environment.lookup(name) {
                match value.as_number() {
                    Some(number) => lines.push(format!("  {name} = {number}")),
                    None => lines.push(format!("  {name} = <{}>", value.type_name())),
                }
            }
        }
        lines.join("\n")
    }

    fn format_stats(&self) -> String {
        format!(
            r#"Session Statistics:
  Programs executed: {}
  Errors encountered: {}
  Commands executed: {}"#,
            self.stats.programs_executed,
            self.stats.errors_encountered,
            self.stats.commands_executed
        )
    }
}

fn help_message() -> &'static str {
    r#"Tally REPL Commands:
  /help, /h           Show this help message
  /vars, /variables   List all variables with their values
  /clear              Clear all variables and reset the session
  /stats              Show session statistics
  /quit, /q, /exit    Exit the REPL

Examples:
  var n = 10                        # Bind a variable
  out map({1, n}, i -> i ^ 2)       # Print a mapped range
  reduce({1, n}, 0, a b -> a + b)   # Evaluate an expression

Multi-line input continues while ( or { is open.
Use Ctrl+C to interrupt, Ctrl+D to exit."#
}

/// Check if the input has balanced brackets and no open string
fn is_input_complete(input: &str) -> bool {
    let mut brace_count = 0i32;
    let mut paren_count = 0i32;
    let mut in_string = false;

    for ch in input.chars() {
        match ch {
            '"' => in_string = !in_string,
            '{' if !in_string => brace_count += 1,
            '}' if !in_string => brace_count -= 1,
            '(' if !in_string => paren_count += 1,
            ')' if !in_string => paren_count -= 1,
            _ => {}
        }
    }

    brace_count <= 0 && paren_count <= 0 && !in_string
}
