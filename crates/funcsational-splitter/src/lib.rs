//! Funcsational source splitter: scans raw text into function records.
//!
//! A program is a sequence of `name(params)(body)` definitions. The splitter
//! walks the text character by character through three phases (function
//! name, parameter list, body), tracking parenthesis nesting inside the body
//! so nested parentheses are captured verbatim. Bodies are left as plain
//! text; the tokenizer turns them into instructions later.

use funcsational_syntax::error::{structural_at, Result};
use funcsational_syntax::function::RawFunction;
use funcsational_syntax::instruction::is_name_char;

/// Name of the implicit entry function a bare script is wrapped into.
pub const IMPLICIT_ENTRY: &str = "f";

/// Decides whether the text contains a top-level definition: after leading
/// whitespace, a non-empty run of name characters immediately followed by
/// `(`. Anything else is treated as a bare script and wrapped into an
/// implicit zero-parameter entry function.
pub fn contains_definition(input: &str) -> bool {
    let mut saw_name = false;
    for c in input.chars() {
        if !saw_name && c.is_whitespace() {
            continue;
        }
        if is_name_char(c) {
            saw_name = true;
            continue;
        }
        return saw_name && c == '(';
    }
    false
}

/// Streaming character scanner that produces raw function records.
pub struct Splitter {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Splitter {
    /// Create a new splitter over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
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

    /// Split the entire source into raw function records.
    ///
    /// If the text contains no top-level definition, the whole text becomes
    /// the body of an implicit zero-parameter entry function.
    pub fn split(mut self) -> Result<Vec<RawFunction>> {
        let source: String = self.src.iter().collect();
        if !contains_definition(&source) {
            return Ok(vec![RawFunction {
                name: IMPLICIT_ENTRY.to_string(),
                params: Vec::new(),
                body: source,
                line: 1,
                body_line: 1,
                body_col: 1,
            }]);
        }

        let mut funcs = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek().is_none() {
                break;
            }
            funcs.push(self.read_definition()?);
        }
        Ok(funcs)
    }

    fn read_definition(&mut self) -> Result<RawFunction> {
        let start_line = self.line;
        let name = self.read_name()?;

        match self.peek() {
            Some('(') => {
                self.advance();
            }
            Some(c) => {
                return structural_at(
                    self.line,
                    self.col,
                    format!("unexpected character '{}' after function name '{}'", c, name),
                );
            }
            None => {
                return structural_at(
                    self.line,
                    self.col,
                    format!("unexpected end of input after function name '{}'", name),
                );
            }
        }

        let params = self.read_params()?;

        // Only whitespace may separate the parameter list from the body.
        self.skip_whitespace();
        match self.peek() {
            Some('(') => {
                self.advance();
            }
            Some(c) => {
                return structural_at(
                    self.line,
                    self.col,
                    format!("expected '(' to open the body of '{}', found '{}'", name, c),
                );
            }
            None => {
                return structural_at(
                    self.line,
                    self.col,
                    format!("unexpected end of input before the body of '{}'", name),
                );
            }
        }

        let body_line = self.line;
        let body_col = self.col;
        let body = self.read_body(&name)?;

        Ok(RawFunction {
            name,
            params,
            body,
            line: start_line,
            body_line,
            body_col,
        })
    }

    fn read_name(&mut self) -> Result<String> {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if is_name_char(c) {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if s.is_empty() {
            return match self.peek() {
                Some(c) => structural_at(
                    self.line,
                    self.col,
                    format!("expected a function name, found '{}'", c),
                ),
                None => structural_at(self.line, self.col, "expected a function name"),
            };
        }
        Ok(s)
    }

    fn read_params(&mut self) -> Result<Vec<String>> {
        let mut params = Vec::new();
        let mut pending = String::new();
        loop {
            let line = self.line;
            let col = self.col;
            match self.peek() {
                None => {
                    return structural_at(line, col, "unexpected end of input in parameter list");
                }
                Some(')') => {
                    self.advance();
                    if !pending.is_empty() {
                        params.push(pending);
                    } else if !params.is_empty() {
                        return structural_at(line, col, "expected a parameter name before ')'");
                    }
                    return Ok(params);
                }
                Some(',') => {
                    self.advance();
                    if pending.is_empty() {
                        return structural_at(line, col, "expected a parameter name before ','");
                    }
                    params.push(std::mem::take(&mut pending));
                }
                Some(c) if is_name_char(c) => {
                    pending.push(c);
                    self.advance();
                }
                Some(c) => {
                    return structural_at(
                        line,
                        col,
                        format!("unexpected character '{}' in parameter list", c),
                    );
                }
            }
        }
    }

    /// Reads the body up to the `)` that closes it at nesting depth zero.
    /// The closing parenthesis is consumed but not captured.
    fn read_body(&mut self, name: &str) -> Result<String> {
        let mut depth = 0usize;
        let mut body = String::new();
        while let Some(c) = self.advance() {
            match c {
                '(' => {
                    depth += 1;
                    body.push(c);
                }
                ')' => {
                    if depth == 0 {
                        return Ok(body);
                    }
                    depth -= 1;
                    body.push(c);
                }
                other => body.push(other),
            }
        }
        structural_at(
            self.line,
            self.col,
            format!("unexpected end of input in the body of '{}'", name),
        )
    }
}
