use std::io;
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use log::info;

use sprig::config::{Config, DuplicatePolicy, ErrorMode, PrintMode};
use sprig::debug;
use sprig::file_handler;
use sprig::interpreter::debug::{DebugInfo, FileOrOtherError};
use sprig::interpreter::lexer::Lexer;
use sprig::interpreter::runtime::SprigRuntime;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Duplicates {
    KeepFirst,
    Overwrite,
    Reject,
}

impl From<Duplicates> for DuplicatePolicy {
    fn from(value: Duplicates) -> Self {
        match value {
            Duplicates::KeepFirst => DuplicatePolicy::KeepFirst,
            Duplicates::Overwrite => DuplicatePolicy::Overwrite,
            Duplicates::Reject => DuplicatePolicy::Reject,
        }
    }
}

/// sprig runs a small scripting language of typed variable declarations,
/// print calls and if / else if / else conditionals.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Source file to run.
    file: String,

    /// Print the token list before running.
    #[arg(long)]
    tokens: bool,

    /// Stop at the first diagnostic instead of collecting them.
    #[arg(long)]
    strict: bool,

    /// Make print show a variable's value instead of its name.
    #[arg(long)]
    print_values: bool,

    /// What declaring an existing name again does.
    #[arg(long, value_enum, default_value_t = Duplicates::KeepFirst)]
    duplicates: Duplicates,

    #[arg(long)]
    max_tokens: Option<usize>,

    #[arg(long)]
    max_variables: Option<usize>,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::default();
        if self.strict {
            config.error_mode = ErrorMode::Abort;
        }
        if self.print_values {
            config.print_mode = PrintMode::Value;
        }
        config.duplicate_policy = self.duplicates.into();
        if let Some(max) = self.max_tokens {
            config.limits.max_tokens = max;
        }
        if let Some(max) = self.max_variables {
            config.limits.max_variables = max;
        }
        config
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let config = args.config();

    let source = match file_handler::read_source(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read the input file '{}': {}", args.file, e);
            return ExitCode::FAILURE;
        }
    };
    let debug_info = DebugInfo::new(format!("\"{}\"", args.file));

    if args.tokens {
        let lexed = Lexer::lex_string(&source, Some(debug_info.clone()), &config.limits);
        println!("{}", debug::format_token_vec(&lexed.tokens));
    }

    let stdout = io::stdout();
    match SprigRuntime::interpret_string(&source, config, stdout.lock(), Some(debug_info)) {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                eprintln!("{}", debug::format_diagnostic(diagnostic));
            }
            info!(
                "finished with {} variable(s) and {} diagnostic(s)",
                report.symbols.len(),
                report.diagnostics.len()
            );
            ExitCode::SUCCESS
        }
        Err(FileOrOtherError::OtherError(diagnostic)) => {
            eprintln!("{}", debug::format_diagnostic(&diagnostic));
            ExitCode::FAILURE
        }
        Err(FileOrOtherError::IOError(e)) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
