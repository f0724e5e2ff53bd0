//! Funcsational body tokenizer: converts one function body into its flat
//! instruction sequence.
//!
//! The scanner walks the body text left to right, each rule consuming a
//! contiguous run of characters: `"..."` string literals with backslash
//! collapse, `{name}` call references validated against the known name sets,
//! `<name>` variable references, digit-initiated numeric literals, one- and
//! two-character operators, and `;` terminators. Anything else is stray text
//! and rejected. Positions are tracked in absolute source coordinates so
//! diagnostics point into the original file rather than into the extracted
//! body.

use std::collections::HashSet;

use funcsational_syntax::error::{lexical_at, Error, ErrorKind, Result};
use funcsational_syntax::function::RawFunction;
use funcsational_syntax::instruction::{
    is_name_char, is_operator_char, Instruction, Literal, OperatorKind,
};

/// Scanner over a single raw function body.
pub struct Tokenizer<'a> {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    params: &'a [String],
    functions: &'a HashSet<String>,
    builtins: &'a HashSet<String>,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer for one function record.
    ///
    /// `functions` holds every defined function name (including the record's
    /// own, so self-recursion validates) and `builtins` the builtin names;
    /// `{name}` references are checked against their union.
    pub fn new(
        record: &'a RawFunction,
        functions: &'a HashSet<String>,
        builtins: &'a HashSet<String>,
    ) -> Self {
        Self {
            src: record.body.chars().collect(),
            pos: 0,
            line: record.body_line,
            col: record.body_col,
            params: &record.params,
            functions,
            builtins,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Tokenize the whole body into a flat instruction sequence.
    pub fn tokenize(mut self) -> Result<Vec<Instruction>> {
        let mut instructions = Vec::new();
        loop {
            self.skip_whitespace();
            let line = self.line;
            let col = self.col;
            let instr = match self.peek() {
                None => break,
                Some('"') => {
                    self.advance();
                    self.read_string(line, col)?
                }
                Some('{') => self.read_call()?,
                Some('<') => self.read_variable()?,
                Some(';') => {
                    self.advance();
                    Instruction::Terminator
                }
                Some(c) if c.is_ascii_digit() => self.read_number()?,
                Some(c) if is_operator_char(c) => self.read_operator()?,
                Some(_) => return Err(self.stray_error()),
            };
            instructions.push(instr);
        }
        Ok(instructions)
    }

    /// Reads a string literal; the opening quote is already consumed.
    ///
    /// A `"` terminates the literal only when the character immediately
    /// before it is not a backslash. The captured text is then collapsed by
    /// backslash pairing: every pair yields one literal backslash, and an
    /// odd trailing backslash escapes the character that follows it.
    fn read_string(&mut self, start_line: usize, start_col: usize) -> Result<Instruction> {
        let mut raw = String::new();
        let mut prev: Option<char> = None;
        loop {
            match self.advance() {
                None => {
                    return lexical_at(
                        self.line,
                        self.col,
                        format!("unterminated string literal starting at {}:{}", start_line, start_col),
                    );
                }
                Some('"') if prev != Some('\\') => break,
                Some(c) => {
                    raw.push(c);
                    prev = Some(c);
                }
            }
        }
        Ok(Instruction::Literal(Literal::Text(collapse_escapes(&raw))))
    }

    fn read_call(&mut self) -> Result<Instruction> {
        let start_line = self.line;
        let start_col = self.col;
        self.advance(); // '{'
        let name = self.read_delimited_name('}', "call reference")?;
        if name.is_empty() {
            return lexical_at(start_line, start_col, "expected a function name in call reference");
        }
        if self.functions.contains(&name) {
            Ok(Instruction::Call { name, builtin: false })
        } else if self.builtins.contains(&name) {
            Ok(Instruction::Call { name, builtin: true })
        } else {
            lexical_at(start_line, start_col, format!("unknown function '{}'", name))
        }
    }

    fn read_variable(&mut self) -> Result<Instruction> {
        let start_line = self.line;
        let start_col = self.col;
        self.advance(); // '<'
        let name = self.read_delimited_name('>', "variable reference")?;
        if name.is_empty() {
            return lexical_at(start_line, start_col, "expected a variable name in variable reference");
        }
        // A reference to one of the enclosing function's parameters binds
        // positionally to the caller-supplied arguments; everything else
        // goes through the activation's variable scope.
        if self.params.iter().any(|p| p == &name) {
            Ok(Instruction::Argument(name))
        } else {
            Ok(Instruction::Variable(name))
        }
    }

    fn read_delimited_name(&mut self, close: char, what: &str) -> Result<String> {
        let mut s = String::new();
        loop {
            let line = self.line;
            let col = self.col;
            match self.advance() {
                None => {
                    return lexical_at(line, col, format!("missing closing '{}' in {}", close, what));
                }
                Some(c) if c == close => return Ok(s),
                Some(c) if is_name_char(c) => s.push(c),
                Some(c) => {
                    return lexical_at(
                        line,
                        col,
                        format!("unexpected character '{}' in {}", c, what),
                    );
                }
            }
        }
    }

    fn read_number(&mut self) -> Result<Instruction> {
        let start_line = self.line;
        let start_col = self.col;
        let mut text = String::new();
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else if c == '.' {
                if seen_dot {
                    return lexical_at(self.line, self.col, "unexpected second '.' in numeric literal");
                }
                seen_dot = true;
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let value: f64 = text.parse().map_err(|_| {
            Error::with_span(
                ErrorKind::Lexical,
                format!("invalid numeric literal '{}'", text),
                start_line,
                start_col,
            )
        })?;
        Ok(Instruction::Literal(Literal::Number(value)))
    }

    fn read_operator(&mut self) -> Result<Instruction> {
        let line = self.line;
        let col = self.col;
        let mut text = String::new();
        if let Some(c) = self.advance() {
            text.push(c);
        }
        if let Some(n) = self.peek() {
            if is_operator_char(n) {
                text.push(n);
                self.advance();
            }
        }
        match OperatorKind::from_symbol(&text) {
            Some(kind) => Ok(Instruction::Operator(kind)),
            None => lexical_at(line, col, format!("unrecognized operator '{}'", text)),
        }
    }

    /// Collects the run of characters that start no token and reports it.
    fn stray_error(&mut self) -> Error {
        let line = self.line;
        let col = self.col;
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || starts_token(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        Error::with_span(
            ErrorKind::Lexical,
            format!("stray text '{}' in function body", text),
            line,
            col,
        )
    }
}

fn starts_token(c: char) -> bool {
    c == '"' || c == '{' || c == '<' || c == ';' || c.is_ascii_digit() || is_operator_char(c)
}

fn collapse_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut run = 1usize;
        while chars.peek() == Some(&'\\') {
            chars.next();
            run += 1;
        }
        for _ in 0..run / 2 {
            out.push('\\');
        }
        if run % 2 == 1 {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use funcsational_splitter::Splitter;
    use funcsational_syntax::error::Error;

    fn known_functions() -> HashSet<String> {
        ["f", "greet"].iter().map(|s| s.to_string()).collect()
    }

    fn known_builtins() -> HashSet<String> {
        std::iter::once("print".to_string()).collect()
    }

    fn record(body: &str, params: &[&str]) -> RawFunction {
        RawFunction {
            name: "f".to_string(),
            params: params.iter().map(|s| s.to_string()).collect(),
            body: body.to_string(),
            line: 1,
            body_line: 1,
            body_col: 1,
        }
    }

    fn tokenize_body(body: &str) -> Result<Vec<Instruction>> {
        let rec = record(body, &[]);
        let functions = known_functions();
        let builtins = known_builtins();
        Tokenizer::new(&rec, &functions, &builtins).tokenize()
    }

    fn tokenize_ok(body: &str) -> Vec<Instruction> {
        tokenize_body(body).expect("tokenize should succeed")
    }

    fn tokenize_err(body: &str) -> Error {
        tokenize_body(body).expect_err("tokenize should fail")
    }

    #[test]
    fn tokenizes_string_literal() {
        assert_eq!(
            tokenize_ok("\"hi\""),
            vec![Instruction::Literal(Literal::Text("hi".to_string()))]
        );
        assert_eq!(
            tokenize_ok("\"\""),
            vec![Instruction::Literal(Literal::Text(String::new()))]
        );
    }

    #[test]
    fn collapses_backslash_pairs() {
        // "a\\"b" -> a\"b : the pair collapses and the quote stays literal.
        assert_eq!(
            tokenize_ok(r#""a\\"b""#),
            vec![Instruction::Literal(Literal::Text(r#"a\"b"#.to_string()))]
        );
        // "a\"b" -> a"b : an odd backslash escapes the quote.
        assert_eq!(
            tokenize_ok(r#""a\"b""#),
            vec![Instruction::Literal(Literal::Text(r#"a"b"#.to_string()))]
        );
        // Four backslashes collapse to two.
        assert_eq!(
            tokenize_ok(r#""a\\\\b""#),
            vec![Instruction::Literal(Literal::Text(r#"a\\b"#.to_string()))]
        );
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = tokenize_err("\"abc");
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert!(err.msg.contains("unterminated"));
    }

    #[test]
    fn tokenizes_numbers() {
        assert_eq!(
            tokenize_ok("3.14"),
            vec![Instruction::Literal(Literal::Number(3.14))]
        );
        assert_eq!(
            tokenize_ok("42"),
            vec![Instruction::Literal(Literal::Number(42.0))]
        );
    }

    #[test]
    fn rejects_second_decimal_point() {
        let err = tokenize_err("1.2.3");
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert_eq!(err.line, Some(1));
        assert_eq!(err.col, Some(4));
        assert!(err.msg.contains("second '.'"));
    }

    #[test]
    fn classifies_call_references() {
        assert_eq!(
            tokenize_ok("{greet}"),
            vec![Instruction::Call { name: "greet".to_string(), builtin: false }]
        );
        assert_eq!(
            tokenize_ok("{print}"),
            vec![Instruction::Call { name: "print".to_string(), builtin: true }]
        );
    }

    #[test]
    fn rejects_unknown_call_target() {
        let err = tokenize_err("{missing}");
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert!(err.msg.contains("missing"));
    }

    #[test]
    fn rejects_malformed_call_reference() {
        assert!(tokenize_err("{print").msg.contains("missing closing '}'"));
        assert!(tokenize_err("{pr int}").msg.contains("unexpected character ' '"));
        assert!(tokenize_err("{}").msg.contains("expected a function name"));
    }

    #[test]
    fn classifies_parameter_and_variable_references() {
        let rec = record("<x> <y>", &["x"]);
        let functions = known_functions();
        let builtins = known_builtins();
        let instrs = Tokenizer::new(&rec, &functions, &builtins)
            .tokenize()
            .expect("tokenize should succeed");
        assert_eq!(
            instrs,
            vec![
                Instruction::Argument("x".to_string()),
                Instruction::Variable("y".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_malformed_variable_reference() {
        assert!(tokenize_err("<x").msg.contains("missing closing '>'"));
    }

    #[test]
    fn tokenizes_operators() {
        use OperatorKind::*;
        let instrs = tokenize_ok("+ ** ++ == != && || += ^ ;");
        assert_eq!(
            instrs,
            vec![
                Instruction::Operator(Add),
                Instruction::Operator(Pow),
                Instruction::Operator(Incr),
                Instruction::Operator(Eq),
                Instruction::Operator(Ne),
                Instruction::Operator(And),
                Instruction::Operator(Or),
                Instruction::Operator(AddAssign),
                Instruction::Operator(BitXor),
                Instruction::Terminator,
            ]
        );
    }

    #[test]
    fn rejects_unrecognized_operator() {
        let err = tokenize_err("=!");
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert!(err.msg.contains("'=!'"));
    }

    #[test]
    fn rejects_stray_text() {
        let err = tokenize_err("hello");
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert!(err.msg.contains("stray text 'hello'"));
    }

    #[test]
    fn reports_absolute_positions_through_the_splitter() {
        // The second '.' sits on line 2, column 6 of the full source.
        let funcs = Splitter::new("f()(\n  1.2.3\n)")
            .split()
            .expect("split should succeed");
        let functions: HashSet<String> = std::iter::once("f".to_string()).collect();
        let builtins = known_builtins();
        let err = Tokenizer::new(&funcs[0], &functions, &builtins)
            .tokenize()
            .expect_err("tokenize should fail");
        assert_eq!(err.line, Some(2));
        assert_eq!(err.col, Some(6));
    }

    #[test]
    fn reports_first_line_positions_with_header_offset() {
        // Body starts at column 5; the second '.' is at column 8.
        let funcs = Splitter::new("f()(1.2.3)").split().expect("split should succeed");
        let functions: HashSet<String> = std::iter::once("f".to_string()).collect();
        let builtins = known_builtins();
        let err = Tokenizer::new(&funcs[0], &functions, &builtins)
            .tokenize()
            .expect_err("tokenize should fail");
        assert_eq!(err.line, Some(1));
        assert_eq!(err.col, Some(8));
    }

    #[test]
    fn tokenizes_mixed_body() {
        let instrs = tokenize_ok(" {print}\"hi\" ; 7 ");
        assert_eq!(
            instrs,
            vec![
                Instruction::Call { name: "print".to_string(), builtin: true },
                Instruction::Literal(Literal::Text("hi".to_string())),
                Instruction::Terminator,
                Instruction::Literal(Literal::Number(7.0)),
            ]
        );
    }
}
