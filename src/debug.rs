use colored::Colorize;

use crate::interpreter::debug::{Error, ErrorKind};
use crate::interpreter::lexer::{DebugToken, TokenKind};

pub fn format_token_vec(tokens: &[DebugToken]) -> String {
    let mut rv = "[".to_string();
    for t in tokens {
        rv = format!(
            "{}\n    {}:{} {:?} {:?},",
            rv, t.position.line, t.position.column, t.token.kind, t.token.text
        );
    }
    format!("{}\n]", rv)
}

pub fn format_token_vec_simplified(tokens: &[DebugToken]) -> String {
    let mut rv = "[".to_string();
    for t in tokens {
        rv = format!(
            "{}\n    {},",
            rv,
            match t.token.kind {
                TokenKind::String => format!("{:?}", t.token.text),
                TokenKind::Eof => "<eof>".to_string(),
                TokenKind::Type | TokenKind::Keyword => format!("<{}>", t.token.text),
                _ => t.token.text.clone(),
            }
        );
    }
    format!("{}\n]", rv)
}

pub fn format_diagnostic(diagnostic: &Error) -> String {
    let label = match diagnostic.kind() {
        ErrorKind::Lexical => "lexical error".red(),
        ErrorKind::Syntactic => "syntax error".red(),
        ErrorKind::Semantic => "error".yellow(),
        ErrorKind::Resource => "resource error".magenta(),
    };
    format!(
        "{} {}\n  {}",
        label.bold(),
        diagnostic.location().to_string().dimmed(),
        diagnostic.message()
    )
}
