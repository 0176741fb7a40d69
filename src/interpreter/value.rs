use std::fmt::Display;

use crate::ast::{InfixOperator, Literal};

use super::ExecutionErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn to_number(&self) -> Result<f64, ExecutionErrorKind> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ExecutionErrorKind::NotANumber(s.clone())),
        }
    }

    fn from_bool(b: bool) -> Self {
        Value::Number(if b { 1.0 } else { 0.0 })
    }

    /// Applies `op` with the left operand deciding between numeric and text
    /// semantics. `-`, `*` and `/` are always numeric.
    pub fn binary(&self, op: InfixOperator, right: &Value) -> Result<Value, ExecutionErrorKind> {
        let numeric = matches!(self, Value::Number(_));
        let value = match op {
            InfixOperator::Equal if numeric => {
                Value::from_bool(self.to_number()? == right.to_number()?)
            }
            InfixOperator::Equal => Value::from_bool(self.to_string() == right.to_string()),
            InfixOperator::Plus if numeric => Value::Number(self.to_number()? + right.to_number()?),
            InfixOperator::Plus => Value::Text(format!("{}{}", self, right)),
            InfixOperator::Minus => Value::Number(self.to_number()? - right.to_number()?),
            InfixOperator::Multiply => Value::Number(self.to_number()? * right.to_number()?),
            InfixOperator::Divide => Value::Number(self.to_number()? / right.to_number()?),
            InfixOperator::LessThan if numeric => {
                Value::from_bool(self.to_number()? < right.to_number()?)
            }
            InfixOperator::LessThan => Value::from_bool(self.to_string() < right.to_string()),
            InfixOperator::GreaterThan if numeric => {
                Value::from_bool(self.to_number()? > right.to_number()?)
            }
            InfixOperator::GreaterThan => Value::from_bool(self.to_string() > right.to_string()),
        };
        Ok(value)
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::Text(s.clone()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // `Debug` keeps the fractional part on whole numbers: 5.0, not 5
            Value::Number(n) => write!(f, "{:?}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}
