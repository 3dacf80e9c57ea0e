use super::cursor::TokenCursor;
use super::debug::{DebugInfo, Error, ParserError};
use super::lexer::{DebugToken, SourcePosition, Token, TokenKind};
use log::{debug, trace};
use std::fmt;
use std::rc::Rc;

macro_rules! expect_symbol {
    ($self:expr, $symbol:expr; $context:expr) => {
        if !$self.cursor.match_token(TokenKind::Symbol, Some($symbol)) {
            return Err($self.error(ParserError::MissingToken {
                expected: format!("'{}'", $symbol),
                context: $context.to_string(),
            }));
        }
    };
}

macro_rules! expect_token {
    ($self:expr, $kind:expr, $expected:expr; $context:expr) => {
        match $self.cursor.current() {
            Some(t) if t.kind == $kind => {
                $self.cursor.advance();
                t.text.clone()
            }
            _ => {
                return Err($self.error(ParserError::MissingToken {
                    expected: $expected.to_string(),
                    context: $context.to_string(),
                }))
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Int,
    String,
    Double,
}

impl VarType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(VarType::Int),
            "string" => Some(VarType::String),
            "double" => Some(VarType::Double),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VarType::Int => "int",
            VarType::String => "string",
            VarType::Double => "double",
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Initializer lexeme, converted to the declared type when executed.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(String),
}

impl Literal {
    pub fn text(&self) -> &str {
        match self {
            Literal::String(s) | Literal::Number(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub var_type: VarType,
    pub name: String,
    pub initializer: Option<Literal>,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrintArg {
    String(String),
    Identifier(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintCall {
    pub args: Vec<PrintArg>,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOperator {
    Greater,
    Less,
    Equal,
    NotEqual,
    GreaterEqual,
    LessEqual,
    Unrecognized(String),
}

impl ComparisonOperator {
    pub fn from_text(text: &str) -> Self {
        match text {
            ">" => ComparisonOperator::Greater,
            "<" => ComparisonOperator::Less,
            "==" => ComparisonOperator::Equal,
            "!=" => ComparisonOperator::NotEqual,
            ">=" => ComparisonOperator::GreaterEqual,
            "<=" => ComparisonOperator::LessEqual,
            other => ComparisonOperator::Unrecognized(other.to_string()),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            ComparisonOperator::Greater => ">",
            ComparisonOperator::Less => "<",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::GreaterEqual => ">=",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::Unrecognized(s) => s,
        }
    }

    /// `None` for an unrecognized operator.
    pub fn apply(&self, left: i64, right: i64) -> Option<bool> {
        match self {
            ComparisonOperator::Greater => Some(left > right),
            ComparisonOperator::Less => Some(left < right),
            ComparisonOperator::Equal => Some(left == right),
            ComparisonOperator::NotEqual => Some(left != right),
            ComparisonOperator::GreaterEqual => Some(left >= right),
            ComparisonOperator::LessEqual => Some(left <= right),
            ComparisonOperator::Unrecognized(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub variable: String,
    pub operator: ComparisonOperator,
    pub value: String,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperatorType {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalOperator {
    pub op_type: LogicalOperatorType,
    pub left: Rc<Condition>,
    pub right: Rc<Condition>,
}

impl LogicalOperator {
    pub fn new(op_type: LogicalOperatorType, left: Condition, right: Condition) -> Self {
        LogicalOperator {
            op_type,
            left: Rc::new(left),
            right: Rc::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Comparison(Comparison),
    Group(Rc<Condition>),
    Logical(LogicalOperator),
    /// A term that failed to parse. It has been reported and evaluates to
    /// false.
    Invalid,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Comparison(c) => {
                write!(f, "{} {} {}", c.variable, c.operator.symbol(), c.value)
            }
            Condition::Group(inner) => write!(f, "({})", inner),
            Condition::Logical(l) => {
                let op = match l.op_type {
                    LogicalOperatorType::And => "&&",
                    LogicalOperatorType::Or => "||",
                };
                write!(f, "{} {} {}", l.left, op, l.right)
            }
            Condition::Invalid => write!(f, "<invalid>"),
        }
    }
}

/// The `if (condition)` head of a conditional.
///
/// Its blocks are not part of the node: a taken block ends at its first `}`
/// while a skipped one ends at the matching `}`, so where the statement ends
/// is only known once the condition has been evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Condition,
    pub position: SourcePosition,
}

/// What follows an `else` keyword in a chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ElseClause {
    ElseIf(Condition),
    Else,
}

/// A token at statement position that starts no supported statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Ignored {
    pub token: Token,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration(Declaration),
    Print(PrintCall),
    If(If),
    Ignored(Ignored),
}

impl From<Comparison> for Condition {
    fn from(value: Comparison) -> Self {
        Condition::Comparison(value)
    }
}

impl From<LogicalOperator> for Condition {
    fn from(value: LogicalOperator) -> Self {
        Condition::Logical(value)
    }
}

impl From<Declaration> for Statement {
    fn from(value: Declaration) -> Self {
        Statement::Declaration(value)
    }
}

impl From<PrintCall> for Statement {
    fn from(value: PrintCall) -> Self {
        Statement::Print(value)
    }
}

impl From<If> for Statement {
    fn from(value: If) -> Self {
        Statement::If(value)
    }
}

impl From<Ignored> for Statement {
    fn from(value: Ignored) -> Self {
        Statement::Ignored(value)
    }
}

/// Recognizes statements one at a time from a borrowed token sequence.
///
/// The parser never decides which branch of a conditional runs. After an
/// `If` head the caller either enters the block with `enter_block` and
/// `close_block`, dispatching statements in between, or steps over it with
/// `skip_block`. The rest of a chain is read with `parse_else_clause` or
/// stepped over with `skip_else_chain`.
pub struct Parser<'t> {
    debug_info: DebugInfo,
    cursor: TokenCursor<'t>,
    diagnostics: Vec<Error>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [DebugToken], debug_info: Option<DebugInfo>) -> Self {
        Self {
            debug_info: debug_info.unwrap_or_else(DebugInfo::unknown),
            cursor: TokenCursor::new(tokens),
            diagnostics: Vec::new(),
        }
    }

    pub fn cursor(&self) -> &TokenCursor<'t> {
        &self.cursor
    }

    /// Diagnostics raised since the last call, oldest first.
    pub fn take_diagnostics(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Recognizes one statement. A malformed statement is reported and
    /// dropped; the cursor stays wherever recognition stopped.
    pub fn parse_statement(&mut self) -> Option<Statement> {
        match self.next_statement() {
            Ok(statement) => Some(statement),
            Err(err) => {
                self.report(err);
                None
            }
        }
    }

    fn next_statement(&mut self) -> Result<Statement, Error> {
        let debug_token = match self.cursor.current_debug() {
            Some(t) => t,
            None => {
                return Err(self.error(ParserError::MissingToken {
                    expected: "a statement".into(),
                    context: "before the end of input".into(),
                }))
            }
        };
        let token = &debug_token.token;

        match token.kind {
            TokenKind::Type => self.next_declaration(),
            TokenKind::Keyword if token.text == "print" => self.next_print_call(),
            TokenKind::Keyword if token.text == "if" => self.next_if(),
            _ => {
                trace!("ignoring {} {}", token.kind, token.simple_string());
                self.cursor.advance();
                Ok(Statement::from(Ignored {
                    token: token.clone(),
                    position: debug_token.position,
                }))
            }
        }
    }

    fn next_declaration(&mut self) -> Result<Statement, Error> {
        let position = self.cursor.source_position();
        let type_name = expect_token!(self, TokenKind::Type, "a type name"; "to start a declaration");
        let var_type = match VarType::from_name(&type_name) {
            Some(t) => t,
            None => {
                return Err(self.error(ParserError::MissingToken {
                    expected: "a type name".into(),
                    context: format!("instead of \"{}\"", type_name),
                }))
            }
        };
        trace!("declaring variable of type {}", var_type);

        let name = match self.cursor.current() {
            Some(t) if t.kind == TokenKind::Identifier => {
                self.cursor.advance();
                t.text.clone()
            }
            _ => return Err(self.error(ParserError::MissingVariableName)),
        };

        let mut initializer = None;
        if self.cursor.match_token(TokenKind::Operator, Some("=")) {
            initializer = match self.cursor.current() {
                Some(t) if t.kind == TokenKind::String => Some(Literal::String(t.text.clone())),
                Some(t) if t.kind == TokenKind::Number => Some(Literal::Number(t.text.clone())),
                Some(t) => {
                    return Err(self.error(ParserError::InvalidInitialValue(t.simple_string())))
                }
                None => {
                    return Err(self.error(ParserError::InvalidInitialValue(
                        "<end of input>".into(),
                    )))
                }
            };
            self.cursor.advance();
        }

        // a missing semicolon is reported but the declaration still counts
        if !self.cursor.match_token(TokenKind::Symbol, Some(";")) {
            let err = self.error(ParserError::MissingToken {
                expected: "';'".into(),
                context: format!("after the declaration of \"{}\"", name),
            });
            self.report(err);
        }

        Ok(Statement::from(Declaration {
            var_type,
            name,
            initializer,
            position,
        }))
    }

    fn next_print_call(&mut self) -> Result<Statement, Error> {
        let position = self.cursor.source_position();
        self.cursor.advance();
        expect_symbol!(self, "("; "after \"print\"");

        let mut args = vec![];
        match self.cursor.current() {
            Some(t) if t.kind == TokenKind::String => args.push(PrintArg::String(t.text.clone())),
            Some(t) if t.kind == TokenKind::Identifier => {
                args.push(PrintArg::Identifier(t.text.clone()))
            }
            other => {
                return Err(self.error(ParserError::InvalidPrintArgument(
                    other.map_or("<end of input>".into(), |t| t.simple_string()),
                    "expected a string literal or an identifier.".into(),
                )))
            }
        }
        self.cursor.advance();

        if self.cursor.match_token(TokenKind::Symbol, Some(",")) {
            match self.cursor.current() {
                Some(t) if t.kind == TokenKind::Identifier => {
                    args.push(PrintArg::Identifier(t.text.clone()))
                }
                other => {
                    return Err(self.error(ParserError::InvalidPrintArgument(
                        other.map_or("<end of input>".into(), |t| t.simple_string()),
                        "the argument after a comma must be an identifier.".into(),
                    )))
                }
            }
            self.cursor.advance();
        }

        expect_symbol!(self, ")"; "to close the print call");
        expect_symbol!(self, ";"; "after the print call");

        Ok(Statement::from(PrintCall { args, position }))
    }

    fn next_if(&mut self) -> Result<Statement, Error> {
        let position = self.cursor.source_position();
        self.cursor.advance();
        expect_symbol!(self, "("; "after \"if\"");
        let condition = self.parse_logical_expression();
        expect_symbol!(self, ")"; "after the \"if\" condition");
        Ok(Statement::from(If {
            condition,
            position,
        }))
    }

    /// Reads `else` or `else if (condition)` when the chain goes on.
    ///
    /// `None` when there is no `else`, or when an `else if` head is
    /// malformed; the latter is reported and ends the chain.
    pub fn parse_else_clause(&mut self) -> Option<ElseClause> {
        if !self.cursor.match_token(TokenKind::Keyword, Some("else")) {
            return None;
        }
        if !self.cursor.match_token(TokenKind::Keyword, Some("if")) {
            return Some(ElseClause::Else);
        }
        match self.next_else_if() {
            Ok(condition) => Some(ElseClause::ElseIf(condition)),
            Err(err) => {
                self.report(err);
                None
            }
        }
    }

    fn next_else_if(&mut self) -> Result<Condition, Error> {
        expect_symbol!(self, "("; "after \"else if\"");
        let condition = self.parse_logical_expression();
        expect_symbol!(self, ")"; "after the \"else if\" condition");
        Ok(condition)
    }

    /// Steps over every remaining `else if (...) {...}` and `else {...}`
    /// without validating their conditions or statements.
    pub fn skip_else_chain(&mut self) {
        if let Err(err) = self.next_skipped_else_chain() {
            self.report(err);
        }
    }

    fn next_skipped_else_chain(&mut self) -> Result<(), Error> {
        while self.cursor.match_token(TokenKind::Keyword, Some("else")) {
            if self.cursor.match_token(TokenKind::Keyword, Some("if")) {
                expect_symbol!(self, "("; "after \"else if\"");
                self.skip_condition();
                expect_symbol!(self, ")"; "after the \"else if\" condition");
            }
            self.skip_block();
        }
        Ok(())
    }

    /// Advances up to, not past, the `)` closing the current condition.
    fn skip_condition(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.cursor.current() {
            if token.is(TokenKind::Symbol, Some("(")) {
                depth += 1;
            } else if token.is(TokenKind::Symbol, Some(")")) {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            self.cursor.advance();
        }
    }

    /// Consumes the `{` opening a block that is about to run. A missing `{`
    /// is reported and the block is treated as absent.
    pub fn enter_block(&mut self) -> bool {
        if self.cursor.match_token(TokenKind::Symbol, Some("{")) {
            return true;
        }
        let err = self.error(ParserError::MissingToken {
            expected: "'{'".into(),
            context: "to open the block".into(),
        });
        self.report(err);
        false
    }

    /// True once a running block is over: its `}` was consumed, or the input
    /// ran out, which is reported.
    pub fn close_block(&mut self) -> bool {
        if self.cursor.match_token(TokenKind::Symbol, Some("}")) {
            return true;
        }
        if self.cursor.at_end() {
            let err = self.error(ParserError::UnterminatedBlock);
            self.report(err);
            return true;
        }
        false
    }

    /// Steps over a `{ ... }` block without reading its statements, up to
    /// the `}` matching its opening brace.
    pub fn skip_block(&mut self) {
        if !self.cursor.match_token(TokenKind::Symbol, Some("{")) {
            let err = self.error(ParserError::MissingToken {
                expected: "'{'".into(),
                context: "to open the skipped block".into(),
            });
            self.report(err);
            return;
        }

        let mut depth = 1;
        while depth > 0 && self.cursor.current().is_some() {
            if self.cursor.match_token(TokenKind::Symbol, Some("{")) {
                depth += 1;
            } else if self.cursor.match_token(TokenKind::Symbol, Some("}")) {
                depth -= 1;
            } else {
                self.cursor.advance();
            }
        }
        trace!("skipped block, depth {} at the end", depth);

        if depth > 0 {
            let err = self.error(ParserError::UnterminatedBlock);
            self.report(err);
        }
    }

    /// `term ((&& | ||) logical_expression)*` where a term is a
    /// parenthesized logical expression or `identifier operator number`.
    ///
    /// The right-hand side of an operator is a whole logical expression, so
    /// `a && b || c` groups as `a && (b || c)`. A malformed term is reported
    /// and becomes `Condition::Invalid`, ending this level of the expression
    /// with the cursor on the offending token.
    pub fn parse_logical_expression(&mut self) -> Condition {
        let mut condition = if self.cursor.match_token(TokenKind::Symbol, Some("(")) {
            let inner = self.parse_logical_expression();
            if !self.cursor.match_token(TokenKind::Symbol, Some(")")) {
                let err = self.error(ParserError::MissingToken {
                    expected: "')'".into(),
                    context: "to close the grouped condition".into(),
                });
                self.report(err);
            }
            Condition::Group(Rc::new(inner))
        } else {
            match self.next_comparison() {
                Ok(comparison) => Condition::from(comparison),
                Err(err) => {
                    self.report(err);
                    return Condition::Invalid;
                }
            }
        };

        loop {
            let op_type = match self.cursor.current() {
                Some(t) if t.is(TokenKind::Operator, Some("&&")) => LogicalOperatorType::And,
                Some(t) if t.is(TokenKind::Operator, Some("||")) => LogicalOperatorType::Or,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_logical_expression();
            condition = Condition::from(LogicalOperator::new(op_type, condition, right));
        }

        condition
    }

    fn next_comparison(&mut self) -> Result<Comparison, Error> {
        let position = self.cursor.source_position();
        let variable = expect_token!(self, TokenKind::Identifier, "a variable name"; "in the condition");
        let operator = expect_token!(self, TokenKind::Operator, "a comparison operator"; format!("after \"{}\"", variable));
        let value = expect_token!(self, TokenKind::Number, "a numeric literal"; format!("after \"{} {}\"", variable, operator));

        Ok(Comparison {
            variable,
            operator: ComparisonOperator::from_text(&operator),
            value,
            position,
        })
    }

    fn error(&self, error: ParserError) -> Error {
        Error::ParserError(
            self.debug_info.locate(self.cursor.source_position()),
            error,
        )
    }

    fn report(&mut self, error: Error) {
        debug!("parser diagnostic: {}", error);
        self.diagnostics.push(error);
    }
}
