use super::lexer::{DebugToken, SourcePosition, Token, TokenKind};

/// Forward-only read position over a borrowed token sequence.
///
/// `position` never exceeds the sequence length; advancing at the end is a
/// no-op. Lookahead is limited to the current token.
#[derive(Debug, Clone)]
pub struct TokenCursor<'t> {
    tokens: &'t [DebugToken],
    position: usize,
}

impl<'t> TokenCursor<'t> {
    pub fn new(tokens: &'t [DebugToken]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn current(&self) -> Option<&'t Token> {
        self.current_debug().map(|d| &d.token)
    }

    pub fn current_debug(&self) -> Option<&'t DebugToken> {
        self.tokens.get(self.position)
    }

    pub fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Consumes the current token if it has `kind` (and `text`, when given).
    pub fn match_token(&mut self, kind: TokenKind, text: Option<&str>) -> bool {
        if self.peek_is(kind, text) {
            self.advance();
            return true;
        }
        false
    }

    pub fn peek_is(&self, kind: TokenKind, text: Option<&str>) -> bool {
        match self.current() {
            Some(token) => token.is(kind, text),
            None => false,
        }
    }

    /// True on the end-of-input token or past the end of the sequence.
    pub fn at_end(&self) -> bool {
        match self.current() {
            Some(token) => token.kind == TokenKind::Eof,
            None => true,
        }
    }

    /// Position to blame in a diagnostic: the current token, else the last one.
    pub fn source_position(&self) -> SourcePosition {
        self.current_debug()
            .or_else(|| self.tokens.last())
            .map(|d| d.position)
            .unwrap_or_default()
    }
}
