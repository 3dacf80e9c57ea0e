pub mod config;
pub mod debug;
pub mod file_handler;
pub mod interpreter;

pub use config::{Config, DuplicatePolicy, ErrorMode, Limits, PrintMode};
pub use interpreter::debug::{Error, ErrorKind, FileOrOtherError};
pub use interpreter::lexer::tokenize;
pub use interpreter::runtime::{RunReport, SprigRuntime};

/// Runs `source` and returns everything it printed with the run report.
pub fn run_program(source: &str, config: Config) -> Result<(String, RunReport), FileOrOtherError> {
    let mut output = Vec::new();
    let report = SprigRuntime::interpret_string(source, config, &mut output, None)?;
    Ok((String::from_utf8_lossy(&output).into_owned(), report))
}
