pub mod ast;
pub mod interpreter;
pub mod parser;
pub mod tokenizer;

use std::{cell::RefCell, rc::Rc};

use crate::{
    interpreter::{ExecutionError, Interpreter},
    parser::ParseErrorWithContext,
};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Parse(#[from] ParseErrorWithContext),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Tokenizes, parses and runs `source`, writing printed lines to `stdout`.
pub fn run(source: &str, stdout: Rc<RefCell<dyn std::io::Write>>) -> Result<(), RunError> {
    let tokens = tokenizer::tokens(source);
    let program = parser::program(&tokens)?;
    Interpreter::new(stdout).interpret(&program)?;
    Ok(())
}
