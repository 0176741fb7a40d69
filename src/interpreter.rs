mod environment;
mod value;

use std::{cell::RefCell, fmt::Debug, rc::Rc};

use crate::ast::{Expression, Program, Statement};

pub use self::{environment::Environment, value::Value};

pub struct Interpreter {
    environment: Environment,
    program_counter: usize,
    stdout: Rc<RefCell<dyn std::io::Write>>,
}

impl Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("program_counter", &self.program_counter)
            .field("environment", &self.environment)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("Error executing statement {program_counter}: {current_statement} - {kind}")]
    Execution {
        kind: ExecutionErrorKind,
        program_counter: usize,
        current_statement: Statement,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ExecutionErrorKind {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Not a number: \"{0}\"")]
    NotANumber(String),
}

impl Interpreter {
    pub fn new(stdout: Rc<RefCell<dyn std::io::Write>>) -> Self {
        Self {
            environment: Environment::new(),
            program_counter: 0,
            stdout,
        }
    }

    /// Runs `program` from its first statement until the program counter
    /// moves past the last one. A program that keeps jumping backwards never
    /// returns.
    pub fn interpret(&mut self, program: &Program) -> Result<(), ExecutionError> {
        self.program_counter = 0;

        while let Some(stmt) = program.statements.get(self.program_counter) {
            let current = self.program_counter;
            self.program_counter += 1;

            #[cfg(feature = "trace")]
            eprintln!("[{:4}] {}", current, stmt);

            if let Err(kind) = self.execute(stmt, program) {
                return Err(ExecutionError::Execution {
                    kind,
                    program_counter: current,
                    current_statement: stmt.clone(),
                });
            }
        }

        Ok(())
    }

    fn execute(&mut self, stmt: &Statement, program: &Program) -> Result<(), ExecutionErrorKind> {
        match stmt {
            Statement::Print(expression) => {
                let value = self.evaluate(expression)?;
                writeln!(self.stdout.borrow_mut(), "{}", value)?;
            }
            Statement::Assign(name, expression) => {
                let value = self.evaluate(expression)?;
                self.environment.assign(name, value);
            }
            Statement::IfGoto(condition, label) => {
                // jumps to undeclared labels fall through without evaluating
                if let Some(&target) = program.labels.get(label) {
                    if self.evaluate(condition)?.to_number()? != 0.0 {
                        self.program_counter = target;

                        #[cfg(feature = "trace")]
                        eprintln!("       -> {} {:?}", label, self.environment);
                    }
                }
            }
        }

        Ok(())
    }

    pub fn evaluate(&self, expression: &Expression) -> Result<Value, ExecutionErrorKind> {
        match expression {
            Expression::Literal(literal) => Ok(Value::from(literal)),
            Expression::Variable(name) => Ok(self.environment.get(name)),
            Expression::Binary(first, rest) => {
                let mut acc = self.evaluate(first)?;
                for (op, operand) in rest {
                    let right = self.evaluate(operand)?;
                    acc = acc.binary(*op, &right)?;
                }
                Ok(acc)
            }
        }
    }
}
