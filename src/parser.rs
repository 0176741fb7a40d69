mod cursor;

use std::cell::RefCell;

use crate::{
    ast::{Expression, InfixOperator, Literal, Program, Statement},
    tokenizer::{Token, TokenKind},
};

pub use self::cursor::Cursor;

#[derive(Debug)]
pub struct ParseErrorWithContext {
    pub error: ParseError,
    context: ParseContext,
    pub token: Token,
}

impl std::error::Error for ParseErrorWithContext {}

impl std::fmt::Display for ParseErrorWithContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "While parsing {}",
            self.context.stack.borrow().join(" > ")
        )?;
        write!(f, "{} but found {}", self.error, self.token.kind)?;
        if !self.token.text.is_empty() && self.token.kind != TokenKind::LineBreak {
            write!(f, " \"{}\"", self.token.text)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Expected \"{0}\"")]
    Expected(TokenKind),
    #[error("Expected keyword \"{0}\"")]
    ExpectedWord(String),
    #[error("Could not parse an expression")]
    CouldNotParse,
    #[error("Unknown operator \"{0}\"")]
    UnknownOperator(String),
    #[error("Invalid number literal \"{0}\"")]
    InvalidNumber(String),
    #[error("Parentheses nested too deeply")]
    TooDeeplyNested,
}

/// Bounds the grammar-rule stack, and with it the recursion of parsing and
/// evaluating parenthesized expressions.
const MAX_DEPTH: usize = 512;

#[derive(Debug, Clone)]
struct ParseContext {
    stack: RefCell<Vec<&'static str>>,
}

impl ParseContext {
    fn new() -> Self {
        Self {
            stack: RefCell::new(Vec::new()),
        }
    }

    fn push(&self, name: &'static str) -> ParseContextGuard {
        self.stack.borrow_mut().push(name);
        ParseContextGuard::new(self)
    }

    fn pop(&self) {
        self.stack.borrow_mut().pop();
    }

    fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    fn error(&self, error: ParseError, token: &Token) -> ParseErrorWithContext {
        ParseErrorWithContext {
            error,
            context: self.clone(),
            token: token.clone(),
        }
    }
}

struct ParseContextGuard<'a> {
    context: &'a ParseContext,
}

impl<'a> ParseContextGuard<'a> {
    fn new(context: &'a ParseContext) -> Self {
        Self { context }
    }
}

impl<'a> Drop for ParseContextGuard<'a> {
    fn drop(&mut self) {
        self.context.pop();
    }
}

/// Parses a whole token stream into statements plus the label table.
///
/// Parsing stops silently at the first line that does not start a statement
/// or a label; everything before it forms the program.
pub fn program(tokens: &[Token]) -> Result<Program, ParseErrorWithContext> {
    let context = ParseContext::new();
    let mut cursor = Cursor::new(tokens);
    let mut program = Program::default();

    let _guard = context.push("program");

    loop {
        while cursor.match_kind(TokenKind::LineBreak).is_some() {}

        if cursor.at_line_start() {
            if let Some(label) = label_declaration(&mut cursor) {
                program.labels.insert(label, program.statements.len());
                continue;
            }
        }

        match statement(&context, &mut cursor)? {
            Some(stmt) => program.statements.push(stmt),
            None => break,
        }
    }

    #[cfg(feature = "disassemble")]
    eprint!("{}", program);

    Ok(program)
}

/// A word standing alone on its line.
fn label_declaration(cursor: &mut Cursor) -> Option<String> {
    if cursor.peek(0).kind != TokenKind::Word {
        return None;
    }
    if !matches!(
        cursor.peek(1).kind,
        TokenKind::LineBreak | TokenKind::EndOfInput
    ) {
        return None;
    }
    let name = cursor.peek(0).text.clone();
    cursor.advance();
    Some(name)
}

fn statement(
    context: &ParseContext,
    cursor: &mut Cursor,
) -> Result<Option<Statement>, ParseErrorWithContext> {
    let _guard = context.push("statement");
    if let Some((name, _)) = cursor.match_kinds(TokenKind::Word, TokenKind::Equals) {
        Ok(Some(assignment(context, cursor, name.text.clone())?))
    } else if cursor.match_word("print").is_some() {
        Ok(Some(print_statement(context, cursor)?))
    } else if cursor.match_word("if").is_some() {
        Ok(Some(if_statement(context, cursor)?))
    } else {
        Ok(None)
    }
}

fn assignment(
    context: &ParseContext,
    cursor: &mut Cursor,
    name: String,
) -> Result<Statement, ParseErrorWithContext> {
    let _guard = context.push("assignment");
    let value = expression(context, cursor)?;
    Ok(Statement::Assign(name, value))
}

fn print_statement(
    context: &ParseContext,
    cursor: &mut Cursor,
) -> Result<Statement, ParseErrorWithContext> {
    let _guard = context.push("print_statement");
    Ok(Statement::Print(expression(context, cursor)?))
}

fn if_statement(
    context: &ParseContext,
    cursor: &mut Cursor,
) -> Result<Statement, ParseErrorWithContext> {
    let _guard = context.push("if_statement");
    let condition = expression(context, cursor)?;
    consume_word(context, cursor, "then")?;
    let label = consume(context, cursor, TokenKind::Word)?;
    Ok(Statement::IfGoto(condition, label.text.clone()))
}

/// All operators share one precedence level and fold left to right.
fn expression(
    context: &ParseContext,
    cursor: &mut Cursor,
) -> Result<Expression, ParseErrorWithContext> {
    let _guard = context.push("expression");
    let first = atomic(context, cursor)?;
    let mut rest = Vec::new();

    while let Some(token) = cursor
        .match_kind(TokenKind::Operator)
        .or_else(|| cursor.match_kind(TokenKind::Equals))
    {
        let op = InfixOperator::from_symbol(&token.text)
            .ok_or_else(|| context.error(ParseError::UnknownOperator(token.text.clone()), token))?;
        rest.push((op, atomic(context, cursor)?));
    }

    if rest.is_empty() {
        Ok(first)
    } else {
        Ok(Expression::Binary(Box::new(first), rest))
    }
}

fn atomic(
    context: &ParseContext,
    cursor: &mut Cursor,
) -> Result<Expression, ParseErrorWithContext> {
    let _guard = context.push("atomic");

    if let Some(token) = cursor.match_kind(TokenKind::Word) {
        Ok(Expression::Variable(token.text.clone()))
    } else if let Some(token) = cursor.match_kind(TokenKind::Number) {
        let n = token
            .text
            .parse()
            .map_err(|_| context.error(ParseError::InvalidNumber(token.text.clone()), token))?;
        Ok(Expression::Literal(Literal::Number(n)))
    } else if let Some(token) = cursor.match_kind(TokenKind::String) {
        Ok(Expression::Literal(Literal::String(token.text.clone())))
    } else if let Some(token) = cursor.match_kind(TokenKind::LeftParen) {
        if context.depth() >= MAX_DEPTH {
            return Err(context.error(ParseError::TooDeeplyNested, token));
        }
        let expr = expression(context, cursor)?;
        consume(context, cursor, TokenKind::RightParen)?;
        Ok(expr)
    } else {
        Err(context.error(ParseError::CouldNotParse, cursor.peek(0)))
    }
}

fn consume<'a>(
    context: &ParseContext,
    cursor: &mut Cursor<'a>,
    kind: TokenKind,
) -> Result<&'a Token, ParseErrorWithContext> {
    cursor
        .match_kind(kind)
        .ok_or_else(|| context.error(ParseError::Expected(kind), cursor.peek(0)))
}

fn consume_word<'a>(
    context: &ParseContext,
    cursor: &mut Cursor<'a>,
    word: &str,
) -> Result<&'a Token, ParseErrorWithContext> {
    cursor
        .match_word(word)
        .ok_or_else(|| context.error(ParseError::ExpectedWord(word.to_string()), cursor.peek(0)))
}
