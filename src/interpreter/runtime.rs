use std::io::Write;

use log::{debug, trace};

use super::builtins;
use super::debug::{DebugInfo, Error, FileOrOtherError, RuntimeError};
use super::lexer::{Lexer, SourcePosition};
use super::literal_conversions::{leading_int, ToValue};
use super::parser::{
    Comparison, Condition, Declaration, ElseClause, If, Ignored, LogicalOperatorType, Parser,
    PrintCall, Statement,
};
use super::symbol_table::{SymbolTable, Variable};
use crate::config::{Config, ErrorMode};
use crate::file_handler;

/// Observable state after a run: the symbol table and every diagnostic in
/// the order it was raised. Lexer diagnostics come first; parser and
/// execution diagnostics follow as the run reaches them.
#[derive(Debug)]
pub struct RunReport {
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Error>,
}

pub struct SprigRuntime<W: Write> {
    config: Config,
    debug_info: DebugInfo,
    symbols: SymbolTable,
    diagnostics: Vec<Error>,
    output: W,
}

impl<W: Write> SprigRuntime<W> {
    pub fn new(config: Config, output: W, debug_info: Option<DebugInfo>) -> Self {
        let symbols = SymbolTable::new(config.limits.max_variables, config.duplicate_policy);
        Self {
            config,
            debug_info: debug_info.unwrap_or_else(DebugInfo::unknown),
            symbols,
            diagnostics: Vec::new(),
            output,
        }
    }

    /// Lexes and runs `s`. Under `ErrorMode::Abort` a lexer diagnostic stops
    /// the run before any statement executes; later diagnostics stop it where
    /// they are raised.
    pub fn interpret_string(
        s: &str,
        config: Config,
        output: W,
        debug_info: Option<DebugInfo>,
    ) -> Result<RunReport, FileOrOtherError> {
        let mut instance = Self::new(config, output, debug_info);
        instance.interpret_source(s)?;
        Ok(instance.into_report())
    }

    pub fn interpret_file(
        path: &str,
        config: Config,
        output: W,
    ) -> Result<RunReport, FileOrOtherError> {
        let file_content = file_handler::read_source(path)?;
        Self::interpret_string(
            &file_content,
            config,
            output,
            Some(DebugInfo::new(format!("\"{}\"", path))),
        )
    }

    pub fn interpret_source(&mut self, s: &str) -> Result<(), FileOrOtherError> {
        let lexed = Lexer::lex_string(s, Some(self.debug_info.clone()), &self.config.limits);
        for diagnostic in lexed.diagnostics {
            self.record(diagnostic)?;
        }

        let mut parser = Parser::new(&lexed.tokens, Some(self.debug_info.clone()));
        self.run(&mut parser)
    }

    /// Runs statements from `parser` until the end of input.
    pub fn run(&mut self, parser: &mut Parser<'_>) -> Result<(), FileOrOtherError> {
        while !parser.cursor().at_end() {
            self.interpret_next_statement(parser)?;
        }
        Ok(())
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    pub fn into_report(self) -> RunReport {
        RunReport {
            symbols: self.symbols,
            diagnostics: self.diagnostics,
        }
    }

    fn interpret_next_statement(&mut self, parser: &mut Parser<'_>) -> Result<(), FileOrOtherError> {
        let statement = parser.parse_statement();
        self.collect(parser)?;
        match statement {
            Some(Statement::Declaration(d)) => self.interpret_declaration(&d),
            Some(Statement::Print(p)) => self.interpret_print(&p),
            Some(Statement::If(i)) => self.interpret_if(&i, parser),
            Some(Statement::Ignored(i)) => {
                self.interpret_ignored(&i);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Runs the statements of the block at the cursor. The block ends at the
    /// first `}` its statements leave unconsumed.
    fn interpret_block(&mut self, parser: &mut Parser<'_>) -> Result<(), FileOrOtherError> {
        if parser.enter_block() {
            while !parser.close_block() {
                self.interpret_next_statement(parser)?;
            }
        }
        self.collect(parser)
    }

    /// Runs a branch whose condition held, then steps over the rest of its
    /// chain.
    fn interpret_taken_branch(&mut self, parser: &mut Parser<'_>) -> Result<(), FileOrOtherError> {
        self.interpret_block(parser)?;
        parser.skip_else_chain();
        self.collect(parser)
    }

    fn skip_block(&mut self, parser: &mut Parser<'_>) -> Result<(), FileOrOtherError> {
        parser.skip_block();
        self.collect(parser)
    }

    fn interpret_declaration(&mut self, declaration: &Declaration) -> Result<(), FileOrOtherError> {
        let value = declaration.initializer.to_value(declaration.var_type);
        debug!(
            "declaring {} {} = {:?}",
            declaration.var_type, declaration.name, value
        );
        let variable = Variable::new(declaration.name.clone(), value);
        match self.symbols.declare(variable) {
            Ok(()) => Ok(()),
            Err(err) => self.report(declaration.position, err),
        }
    }

    fn interpret_print(&mut self, print: &PrintCall) -> Result<(), FileOrOtherError> {
        trace!("print called with {} argument(s)", print.args.len());
        let errors = builtins::builtin_print(
            &mut self.output,
            &print.args,
            self.config.print_mode,
            &self.symbols,
        )?;
        for err in errors {
            self.report(print.position, err)?;
        }
        Ok(())
    }

    fn interpret_if(&mut self, if_: &If, parser: &mut Parser<'_>) -> Result<(), FileOrOtherError> {
        let condition = self.evaluate_logical_expression(&if_.condition)?;
        debug!("condition ({}) is {}", if_.condition, condition);
        if condition {
            return self.interpret_taken_branch(parser);
        }

        self.skip_block(parser)?;
        while let Some(clause) = parser.parse_else_clause() {
            self.collect(parser)?;
            match clause {
                ElseClause::ElseIf(condition) => {
                    let taken = self.evaluate_logical_expression(&condition)?;
                    debug!("else if condition ({}) is {}", condition, taken);
                    if taken {
                        return self.interpret_taken_branch(parser);
                    }
                    self.skip_block(parser)?;
                }
                ElseClause::Else => return self.interpret_block(parser),
            }
        }
        self.collect(parser)
    }

    fn interpret_ignored(&mut self, ignored: &Ignored) {
        debug!(
            "line {}: nothing to do for {} {}",
            ignored.position.line,
            ignored.token.kind,
            ignored.token.simple_string()
        );
    }

    /// Evaluates both sides of every `&&` and `||`, left to right.
    pub fn evaluate_logical_expression(
        &mut self,
        condition: &Condition,
    ) -> Result<bool, FileOrOtherError> {
        match condition {
            Condition::Comparison(c) => self.evaluate_comparison(c),
            Condition::Group(inner) => self.evaluate_logical_expression(inner),
            Condition::Invalid => Ok(false),
            Condition::Logical(l) => {
                let left = self.evaluate_logical_expression(&l.left)?;
                let right = self.evaluate_logical_expression(&l.right)?;
                Ok(match l.op_type {
                    LogicalOperatorType::And => left && right,
                    LogicalOperatorType::Or => left || right,
                })
            }
        }
    }

    fn evaluate_comparison(&mut self, comparison: &Comparison) -> Result<bool, FileOrOtherError> {
        let variable = match self.symbols.get(&comparison.variable) {
            Some(v) => v,
            None => {
                self.report(
                    comparison.position,
                    RuntimeError::UnknownVariable(comparison.variable.clone()),
                )?;
                return Ok(false);
            }
        };

        let left = match variable.value.as_int() {
            Some(i) => i,
            None => {
                let err = RuntimeError::UnsupportedComparisonType {
                    name: variable.name.clone(),
                    var_type: variable.var_type.to_string(),
                };
                self.report(comparison.position, err)?;
                return Ok(false);
            }
        };

        let right = leading_int(&comparison.value);
        match comparison.operator.apply(left, right) {
            Some(result) => Ok(result),
            None => {
                self.report(
                    comparison.position,
                    RuntimeError::UnrecognizedOperator(comparison.operator.symbol().to_string()),
                )?;
                Ok(false)
            }
        }
    }

    fn report(
        &mut self,
        position: SourcePosition,
        error: RuntimeError,
    ) -> Result<(), FileOrOtherError> {
        let error = Error::RuntimeError(self.debug_info.locate(position), error);
        self.record(error)
    }

    fn collect(&mut self, parser: &mut Parser<'_>) -> Result<(), FileOrOtherError> {
        for diagnostic in parser.take_diagnostics() {
            self.record(diagnostic)?;
        }
        Ok(())
    }

    fn record(&mut self, diagnostic: Error) -> Result<(), FileOrOtherError> {
        debug!("diagnostic: {}", diagnostic);
        if self.config.error_mode == ErrorMode::Abort {
            return Err(FileOrOtherError::from(diagnostic));
        }
        self.diagnostics.push(diagnostic);
        Ok(())
    }
}
