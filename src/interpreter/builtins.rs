use std::io::Write;

use super::debug::RuntimeError;
use super::parser::PrintArg;
use super::symbol_table::SymbolTable;
use crate::config::PrintMode;

/// Text `print` writes for one argument.
///
/// With `PrintMode::Name` an identifier prints as its own name, whether or
/// not it was declared.
pub fn print_arg_text(
    arg: &PrintArg,
    mode: PrintMode,
    symbols: &SymbolTable,
) -> Result<String, RuntimeError> {
    match (arg, mode) {
        (PrintArg::String(s), _) => Ok(s.clone()),
        (PrintArg::Identifier(name), PrintMode::Name) => Ok(name.clone()),
        (PrintArg::Identifier(name), PrintMode::Value) => match symbols.get(name) {
            Some(variable) => Ok(variable.value.to_string()),
            None => Err(RuntimeError::UnknownVariable(name.clone())),
        },
    }
}

/// Writes each argument on its own line. Arguments that fail to resolve are
/// skipped and their errors returned.
pub fn builtin_print<W: Write>(
    output: &mut W,
    args: &[PrintArg],
    mode: PrintMode,
    symbols: &SymbolTable,
) -> std::io::Result<Vec<RuntimeError>> {
    let mut errors = vec![];
    for arg in args {
        match print_arg_text(arg, mode, symbols) {
            Ok(text) => writeln!(output, "{}", text)?,
            Err(err) => errors.push(err),
        }
    }
    output.flush()?;
    Ok(errors)
}
