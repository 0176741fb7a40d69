use std::fmt::Display;

use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub labels: FxHashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Print(Expression),
    Assign(String, Expression),
    IfGoto(Expression, String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Variable(String),
    /// `first op operand op operand ...`, folded left to right. Kept flat so
    /// long lines do not turn into deep trees.
    Binary(Box<Expression>, Vec<(InfixOperator, Expression)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    Equal,
    Plus,
    Minus,
    Multiply,
    Divide,
    LessThan,
    GreaterThan,
}

impl InfixOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(InfixOperator::Equal),
            "+" => Some(InfixOperator::Plus),
            "-" => Some(InfixOperator::Minus),
            "*" => Some(InfixOperator::Multiply),
            "/" => Some(InfixOperator::Divide),
            "<" => Some(InfixOperator::LessThan),
            ">" => Some(InfixOperator::GreaterThan),
            _ => None,
        }
    }
}

impl Expression {
    pub fn binary(left: Expression, op: InfixOperator, right: Expression) -> Self {
        Expression::Binary(Box::new(left), vec![(op, right)])
    }
}

impl Program {
    /// Labels declared at `index`, sorted so listings are stable.
    pub fn labels_at(&self, index: usize) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .labels
            .iter()
            .filter(|(_, at)| **at == index)
            .map(|(name, _)| name.as_str())
            .collect();
        labels.sort_unstable();
        labels
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, statement) in self.statements.iter().enumerate() {
            for label in self.labels_at(index) {
                writeln!(f, "{}", label)?;
            }
            writeln!(f, "{}", statement)?;
        }
        for label in self.labels_at(self.statements.len()) {
            writeln!(f, "{}", label)?;
        }
        Ok(())
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Print(expr) => write!(f, "print {}", expr),
            Statement::Assign(name, expr) => write!(f, "{} = {}", name, expr),
            Statement::IfGoto(condition, label) => {
                write!(f, "if {} then {}", condition, label)
            }
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Literal(literal) => write!(f, "{}", literal),
            Expression::Variable(name) => write!(f, "{}", name),
            Expression::Binary(first, rest) => {
                write!(f, "({}", first)?;
                for (op, operand) in rest {
                    write!(f, " {} {}", op, operand)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InfixOperator::Equal => write!(f, "="),
            InfixOperator::Plus => write!(f, "+"),
            InfixOperator::Minus => write!(f, "-"),
            InfixOperator::Multiply => write!(f, "*"),
            InfixOperator::Divide => write!(f, "/"),
            InfixOperator::LessThan => write!(f, "<"),
            InfixOperator::GreaterThan => write!(f, ">"),
        }
    }
}
