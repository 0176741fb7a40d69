use crate::tokenizer::{Token, TokenKind};

/// Read-only position over a token slice.
///
/// Reads past the end yield an `EndOfInput` token instead of failing. Every
/// `match_*` method leaves the position untouched when it returns `None`.
#[derive(Debug)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    position: usize,
    end_of_input: Token,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            end_of_input: Token::end_of_input(),
        }
    }

    pub fn peek(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.position + offset)
            .unwrap_or(&self.end_of_input)
    }

    pub fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// True at the start of input or right after a line break.
    pub fn at_line_start(&self) -> bool {
        self.position == 0 || self.tokens[self.position - 1].kind == TokenKind::LineBreak
    }

    pub fn match_kind(&mut self, kind: TokenKind) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        if token.kind != kind {
            return None;
        }
        self.position += 1;
        Some(token)
    }

    /// Consumes two tokens only if both kinds line up.
    pub fn match_kinds(
        &mut self,
        first: TokenKind,
        second: TokenKind,
    ) -> Option<(&'a Token, &'a Token)> {
        let a = self.tokens.get(self.position)?;
        let b = self.tokens.get(self.position + 1)?;
        if a.kind != first || b.kind != second {
            return None;
        }
        self.position += 2;
        Some((a, b))
    }

    pub fn match_word(&mut self, word: &str) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        if token.kind != TokenKind::Word || token.text != word {
            return None;
        }
        self.position += 1;
        Some(token)
    }
}
