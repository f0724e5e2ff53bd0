//! Instruction definitions for funcsational function bodies.
//!
//! A function body is a flat, ordered sequence of [`Instruction`] values.
//! There is no nesting in the data: a call's arguments are simply the
//! instructions that follow it, and the evaluator reconstructs the call
//! structure by consuming as many following instructions as the callee's
//! declared arity requires.
//!
//! # Instruction Categories
//!
//! - **Literals**: numbers (`3.14`) and strings (`"hi"`)
//! - **References**: `<name>` to a variable or parameter, `{name}` to a
//!   function or builtin
//! - **Operators**: the fixed one- and two-character operator set
//! - **Terminator**: `;`, separating statements and bounding call arguments

/// A literal value fixed at tokenize time.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A numeric literal, always floating point
    ///
    /// Examples: `42`, `3.14`
    Number(f64),
    /// A string literal with escape collapse already applied
    ///
    /// Examples: `"hello"`, `""`
    Text(String),
}

/// The enumerated operator set.
///
/// Operators are recognized lexically but carry no evaluation semantics:
/// the evaluator passes over them without touching program state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// Addition `+`
    Add,
    /// Subtraction `-`
    Sub,
    /// Multiplication `*`
    Mul,
    /// Division `/`
    Div,
    /// Modulus `%`
    Mod,
    /// Power `**`
    Pow,
    /// Bitwise and `&`
    BitAnd,
    /// Bitwise or `|`
    BitOr,
    /// Bitwise xor `^`
    BitXor,
    /// Negation `!`
    Not,
    /// Increment `++`
    Incr,
    /// Decrement `--`
    Decr,
    /// Equality compare `==`
    Eq,
    /// Inequality compare `!=`
    Ne,
    /// Logical and `&&`
    And,
    /// Logical or `||`
    Or,
    /// Assignment `=`
    Assign,
    /// Compound assignment `+=`
    AddAssign,
    /// Compound assignment `-=`
    SubAssign,
    /// Compound assignment `*=`
    MulAssign,
    /// Compound assignment `/=`
    DivAssign,
    /// Compound assignment `%=`
    ModAssign,
    /// Compound assignment `&=`
    AndAssign,
    /// Compound assignment `|=`
    OrAssign,
    /// Compound assignment `^=`
    XorAssign,
}

/// Characters that may begin (or extend) an operator token.
pub fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%' | '^' | '=' | '!' | '|' | '&')
}

/// Characters allowed in function, parameter and variable names.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl OperatorKind {
    /// Maps one- or two-character operator text to its kind.
    ///
    /// Returns `None` for text outside the enumerated set (e.g. `=!`),
    /// which the tokenizer reports as an unrecognized operator.
    pub fn from_symbol(text: &str) -> Option<OperatorKind> {
        let kind = match text {
            "+" => OperatorKind::Add,
            "-" => OperatorKind::Sub,
            "*" => OperatorKind::Mul,
            "/" => OperatorKind::Div,
            "%" => OperatorKind::Mod,
            "**" => OperatorKind::Pow,
            "&" => OperatorKind::BitAnd,
            "|" => OperatorKind::BitOr,
            "^" => OperatorKind::BitXor,
            "!" => OperatorKind::Not,
            "++" => OperatorKind::Incr,
            "--" => OperatorKind::Decr,
            "==" => OperatorKind::Eq,
            "!=" => OperatorKind::Ne,
            "&&" => OperatorKind::And,
            "||" => OperatorKind::Or,
            "=" => OperatorKind::Assign,
            "+=" => OperatorKind::AddAssign,
            "-=" => OperatorKind::SubAssign,
            "*=" => OperatorKind::MulAssign,
            "/=" => OperatorKind::DivAssign,
            "%=" => OperatorKind::ModAssign,
            "&=" => OperatorKind::AndAssign,
            "|=" => OperatorKind::OrAssign,
            "^=" => OperatorKind::XorAssign,
            _ => return None,
        };
        Some(kind)
    }

    /// The source text of this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            OperatorKind::Add => "+",
            OperatorKind::Sub => "-",
            OperatorKind::Mul => "*",
            OperatorKind::Div => "/",
            OperatorKind::Mod => "%",
            OperatorKind::Pow => "**",
            OperatorKind::BitAnd => "&",
            OperatorKind::BitOr => "|",
            OperatorKind::BitXor => "^",
            OperatorKind::Not => "!",
            OperatorKind::Incr => "++",
            OperatorKind::Decr => "--",
            OperatorKind::Eq => "==",
            OperatorKind::Ne => "!=",
            OperatorKind::And => "&&",
            OperatorKind::Or => "||",
            OperatorKind::Assign => "=",
            OperatorKind::AddAssign => "+=",
            OperatorKind::SubAssign => "-=",
            OperatorKind::MulAssign => "*=",
            OperatorKind::DivAssign => "/=",
            OperatorKind::ModAssign => "%=",
            OperatorKind::AndAssign => "&=",
            OperatorKind::OrAssign => "|=",
            OperatorKind::XorAssign => "^=",
        }
    }
}

/// One element of a function body's flat instruction sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// A literal value, fixed at tokenize time
    Literal(Literal),
    /// `<name>` where `name` is not a parameter of the enclosing function;
    /// resolved against the activation's variable scope at evaluation time
    Variable(String),
    /// `<name>` where `name` is a parameter of the enclosing function;
    /// resolved positionally against the caller-supplied argument array
    Argument(String),
    /// `{name}`: a call to a function or builtin. Arguments are not carried
    /// here; the callee's declared arity decides how many of the following
    /// instructions belong to this call.
    Call {
        /// Name of the callee
        name: String,
        /// Whether the callee is a builtin rather than a defined function
        builtin: bool,
    },
    /// An operator token; recognized but evaluated as a no-op
    Operator(OperatorKind),
    /// `;`: statement separator, also the end-of-arguments sentinel
    Terminator,
}
