use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Number,
    String,
    LineBreak,
    Equals,
    Operator,
    LeftParen,
    RightParen,

    // Never produced by `tokens`, only synthesized by the parser cursor
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn end_of_input() -> Self {
        Self::new("", TokenKind::EndOfInput)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Default,
    Word,
    Number,
    String,
    Comment,
}

/// Splits `source` into tokens in source order.
///
/// Never fails: unknown characters are dropped and an unterminated string or
/// comment simply runs to the end of the input. A word or number still being
/// accumulated when the input ends is emitted; an unterminated string is not.
pub fn tokens(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut state = State::Default;
    let mut chars = source.chars().peekable();

    while let Some(&c) = chars.peek() {
        match state {
            State::Default => {
                chars.next();
                if let Some(kind) = single_char_kind(c) {
                    tokens.push(Token::new(c, kind));
                } else if c.is_alphabetic() {
                    text.push(c);
                    state = State::Word;
                } else if c.is_ascii_digit() {
                    text.push(c);
                    state = State::Number;
                } else if c == '"' {
                    state = State::String;
                } else if c == '\'' {
                    state = State::Comment;
                }
            }
            State::Word => {
                if c.is_alphanumeric() {
                    text.push(c);
                    chars.next();
                } else {
                    // the boundary character is left for `Default` to examine
                    tokens.push(Token::new(std::mem::take(&mut text), TokenKind::Word));
                    state = State::Default;
                }
            }
            State::Number => {
                if c.is_ascii_digit() {
                    text.push(c);
                    chars.next();
                } else {
                    tokens.push(Token::new(std::mem::take(&mut text), TokenKind::Number));
                    state = State::Default;
                }
            }
            State::String => {
                chars.next();
                if c == '"' {
                    tokens.push(Token::new(std::mem::take(&mut text), TokenKind::String));
                    state = State::Default;
                } else {
                    text.push(c);
                }
            }
            State::Comment => {
                if c == '\n' {
                    state = State::Default;
                } else {
                    chars.next();
                }
            }
        }
    }

    match state {
        State::Word => tokens.push(Token::new(text, TokenKind::Word)),
        State::Number => tokens.push(Token::new(text, TokenKind::Number)),
        _ => {}
    }

    tokens
}

fn single_char_kind(c: char) -> Option<TokenKind> {
    match c {
        '\n' => Some(TokenKind::LineBreak),
        '=' => Some(TokenKind::Equals),
        '+' | '-' | '*' | '/' | '<' | '>' => Some(TokenKind::Operator),
        '(' => Some(TokenKind::LeftParen),
        ')' => Some(TokenKind::RightParen),
        _ => None,
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Word => f.pad("word"),
            TokenKind::Number => f.pad("number"),
            TokenKind::String => f.pad("string"),
            TokenKind::LineBreak => f.pad("line break"),
            TokenKind::Equals => f.pad("="),
            TokenKind::Operator => f.pad("operator"),
            TokenKind::LeftParen => f.pad("("),
            TokenKind::RightParen => f.pad(")"),
            TokenKind::EndOfInput => f.pad("end of input"),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::LineBreak => write!(f, "{}", self.kind),
            _ => write!(f, "{:<12} {}", self.kind, self.text),
        }
    }
}
