use super::debug::{debug_char_repr, DebugInfo, Error, FileOrOtherError, LexerError};
use crate::config::Limits;
use crate::file_handler;
use lazy_static::lazy_static;
use log::{debug, trace, warn};
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

lazy_static! {
    static ref TYPE_NAMES: HashSet<&'static str> = {
        let mut set = HashSet::new();
        set.insert("string");
        set.insert("int");
        set.insert("double");
        set
    };
}

lazy_static! {
    static ref KEYWORDS: HashSet<&'static str> = {
        let mut set = HashSet::new();
        set.insert("print");
        set.insert("if");
        set.insert("else");
        set.insert("while");
        set.insert("function");
        set.insert("true");
        set.insert("false");
        set
    };
}

lazy_static! {
    static ref TWO_CHAR_OPERATORS: HashSet<&'static str> = {
        let mut set = HashSet::new();
        set.insert("&&");
        set.insert("||");
        set.insert("==");
        set.insert("!=");
        set.insert("<=");
        set.insert(">=");
        set
    };
}

const OPERATOR_CHARS: &str = "=+-*/!<>&|";
const SYMBOL_CHARS: &str = ";(){},";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    String,
    Type,
    Keyword,
    Operator,
    Symbol,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Type => "type",
            TokenKind::Keyword => "keyword",
            TokenKind::Operator => "operator",
            TokenKind::Symbol => "symbol",
            TokenKind::Eof => "end of input",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is(&self, kind: TokenKind, text: Option<&str>) -> bool {
        self.kind == kind && text.map_or(true, |t| self.text == t)
    }

    pub fn simple_string(&self) -> String {
        match self.kind {
            TokenKind::String => format!("{:?}", self.text),
            TokenKind::Eof => "<end of input>".to_string(),
            _ => format!("\"{}\"", self.text),
        }
    }
}

/// 1-based line and column of a character in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugToken {
    pub token: Token,
    pub char_range: Range<usize>,
    pub position: SourcePosition,
}

#[derive(Debug)]
pub struct LexerResult {
    pub tokens: Vec<DebugToken>,
    pub diagnostics: Vec<Error>,
}

impl LexerResult {
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.token.kind).collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.token.text.as_str()).collect()
    }
}

trait SprigChar {
    fn is_word_start(&self) -> bool;
    fn is_word_char(&self) -> bool;
    fn is_space(&self) -> bool;
}

impl SprigChar for char {
    fn is_word_start(&self) -> bool {
        self.is_ascii_alphabetic() || *self == '_'
    }

    fn is_word_char(&self) -> bool {
        self.is_ascii_alphanumeric() || *self == '_'
    }

    fn is_space(&self) -> bool {
        matches!(self, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
    }
}

/// Tokenizes `source` with the default limits.
pub fn tokenize(source: &str) -> LexerResult {
    Lexer::lex_string(source, None, &Limits::default())
}

pub struct Lexer<'l> {
    debug_info: DebugInfo,
    limits: &'l Limits,
    string: Vec<char>,
    pointer: usize,
    position: SourcePosition,
    tokens: Vec<DebugToken>,
    diagnostics: Vec<Error>,
    dropped_tokens: usize,
}

impl<'l> Lexer<'l> {
    pub fn lex_string(
        string: &str,
        debug_info: Option<DebugInfo>,
        limits: &'l Limits,
    ) -> LexerResult {
        let instance = Self {
            debug_info: debug_info.unwrap_or_else(DebugInfo::unknown),
            limits,
            string: string.chars().collect(),
            pointer: 0,
            position: SourcePosition::default(),
            tokens: Vec::new(),
            diagnostics: Vec::new(),
            dropped_tokens: 0,
        };
        instance.get_tokens()
    }

    pub fn lex_file(path: &str, limits: &'l Limits) -> Result<LexerResult, FileOrOtherError> {
        let file_content = file_handler::read_source(path)?;
        Ok(Self::lex_string(
            &file_content,
            Some(DebugInfo::new(format!("\"{}\"", path))),
            limits,
        ))
    }

    fn get_tokens(mut self) -> LexerResult {
        while let Some(current) = self.peek() {
            if current.is_space() {
                self.next();
                continue;
            }

            let start_pointer = self.pointer;
            let start_position = self.position;

            if current == '#' {
                self.skip_comment();
            } else if current.is_word_start() {
                self.next_word(start_pointer, start_position);
            } else if current.is_ascii_digit() {
                self.next_number(start_pointer, start_position);
            } else if current == '"' {
                self.next_string_literal(start_pointer, start_position);
            } else if OPERATOR_CHARS.contains(current) {
                self.next_operator(current, start_pointer, start_position);
            } else if SYMBOL_CHARS.contains(current) {
                self.next();
                self.add_token(
                    Token::new(TokenKind::Symbol, current),
                    start_pointer,
                    start_position,
                );
            } else {
                self.next();
                self.report(
                    start_position,
                    LexerError::UnrecognizedCharacter(debug_char_repr(current)),
                );
            }
        }

        // the end-of-input token always fits: add_token keeps its slot free
        self.tokens.push(DebugToken {
            token: Token::new(TokenKind::Eof, "EOF"),
            char_range: self.pointer..self.pointer,
            position: self.position,
        });

        if self.dropped_tokens > 0 {
            warn!(
                "{}: token limit of {} reached, {} tokens dropped",
                self.debug_info.source_name, self.limits.max_tokens, self.dropped_tokens
            );
        }
        debug!(
            "lexed {} tokens from {}",
            self.tokens.len(),
            self.debug_info.source_name
        );

        LexerResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn skip_comment(&mut self) {
        while let Some(character) = self.peek() {
            if character == '\n' {
                break;
            }
            self.next();
        }
    }

    fn next_word(&mut self, start_pointer: usize, start_position: SourcePosition) {
        let word = self.take_while(|c| c.is_word_char());
        let word = self.truncate_lexeme(word, start_position);

        let kind = if TYPE_NAMES.contains(word.as_str()) {
            TokenKind::Type
        } else if KEYWORDS.contains(word.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.add_token(Token::new(kind, word), start_pointer, start_position);
    }

    fn next_number(&mut self, start_pointer: usize, start_position: SourcePosition) {
        let digits = self.take_while(|c| c.is_ascii_digit());
        let digits = self.truncate_lexeme(digits, start_position);
        self.add_token(
            Token::new(TokenKind::Number, digits),
            start_pointer,
            start_position,
        );
    }

    fn next_string_literal(&mut self, start_pointer: usize, start_position: SourcePosition) {
        self.next();

        let mut string = String::new();
        let mut terminated = false;
        while let Some(character) = self.next() {
            match character {
                '"' => {
                    terminated = true;
                    break;
                }
                '\\' => match self.next() {
                    Some('n') => string.push('\n'),
                    Some('t') => string.push('\t'),
                    Some(escaped) => string.push(escaped),
                    None => break,
                },
                _ => string.push(character),
            }
        }

        if !terminated {
            trace!(
                "unterminated string literal at line {}, column {}",
                start_position.line,
                start_position.column
            );
        }
        self.add_token(
            Token::new(TokenKind::String, string),
            start_pointer,
            start_position,
        );
    }

    fn next_operator(&mut self, first: char, start_pointer: usize, start_position: SourcePosition) {
        self.next();
        let mut operator = first.to_string();
        if let Some(second) = self.peek() {
            operator.push(second);
            if TWO_CHAR_OPERATORS.contains(operator.as_str()) {
                self.next();
            } else {
                operator.pop();
            }
        }
        self.add_token(
            Token::new(TokenKind::Operator, operator),
            start_pointer,
            start_position,
        );
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some(character) = self.peek() {
            if !predicate(character) {
                break;
            }
            taken.push(character);
            self.next();
        }
        taken
    }

    fn truncate_lexeme(&mut self, lexeme: String, position: SourcePosition) -> String {
        let max = self.limits.max_lexeme_len;
        if lexeme.chars().count() <= max {
            return lexeme;
        }
        let truncated: String = lexeme.chars().take(max).collect();
        self.report(position, LexerError::LexemeTruncated { lexeme, max });
        truncated
    }

    fn add_token(&mut self, token: Token, start_pointer: usize, position: SourcePosition) {
        if self.tokens.len() + 1 >= self.limits.max_tokens {
            self.dropped_tokens += 1;
            return;
        }
        trace!("token {:?} at {}:{}", token, position.line, position.column);
        self.tokens.push(DebugToken {
            token,
            char_range: start_pointer..self.pointer,
            position,
        });
    }

    fn report(&mut self, position: SourcePosition, error: LexerError) {
        debug!("lexer diagnostic: {}", error);
        self.diagnostics
            .push(Error::LexerError(self.debug_info.locate(position), error));
    }

    fn peek(&self) -> Option<char> {
        self.string.get(self.pointer).copied()
    }

    fn next(&mut self) -> Option<char> {
        let rv = self.string.get(self.pointer).copied();
        if let Some(character) = rv {
            self.pointer += 1;
            if character == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
        rv
    }
}
