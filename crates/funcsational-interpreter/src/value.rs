//! Value types for the funcsational interpreter.

use std::fmt;

use funcsational_syntax::instruction::Literal;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A numeric value; the language has a single floating-point number type
    Num(f64),
    /// A UTF-8 encoded string value
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Number(n) => Value::Num(*n),
            Literal::Text(s) => Value::Str(s.clone()),
        }
    }
}
