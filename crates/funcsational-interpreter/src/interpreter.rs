//! The evaluator: executes flat instruction sequences, reconstructing call
//! structure at evaluation time from each callee's declared arity.

use funcsational_syntax::error::{runtime, Result};
use funcsational_syntax::function::FunctionDef;
use funcsational_syntax::instruction::Instruction;

use crate::program::{Program, ENTRY_POINT};
use crate::scope::Scope;
use crate::value::Value;

/// Evaluation context of a single activation: the function being run, the
/// caller-supplied arguments bound to its parameters, and its variable
/// scope. The argument array is exclusively owned by this activation.
struct Frame<'a> {
    def: &'a FunctionDef,
    args: &'a [Value],
    scope: &'a Scope,
}

/// Tree-walking evaluator over an assembled [`Program`].
///
/// A call instruction does not carry its arguments; instead the evaluator
/// consumes as many following instructions as the callee's declared arity
/// requires, each argument evaluated recursively and possibly consuming
/// further instructions of its own. The position returned from every step is
/// therefore "just past the full consumption range", not a fixed offset.
pub struct Evaluator<'a> {
    program: &'a Program,
    trace: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            trace: false,
        }
    }

    /// Enables a `running <name>` stderr trace for each user-function
    /// activation.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Runs the entry function with an empty argument array and scope.
    pub fn run(&self) -> Result<Option<Value>> {
        self.run_with_scope(Scope::new())
    }

    /// Runs the entry function with a pre-seeded variable scope for its
    /// activation.
    pub fn run_with_scope(&self, scope: Scope) -> Result<Option<Value>> {
        match self.program.entry() {
            Some(entry) => self.call(entry, &[], scope),
            None => runtime(format!("could not find entry point '{}'", ENTRY_POINT)),
        }
    }

    /// Runs one activation: walks the function's top-level instruction list,
    /// resuming after each consumption range. The activation's result is the
    /// value of its final instruction (`None` if it produced nothing).
    fn call(&self, def: &FunctionDef, args: &[Value], scope: Scope) -> Result<Option<Value>> {
        if self.trace {
            eprintln!("running {}", def.name);
        }
        let frame = Frame {
            def,
            args,
            scope: &scope,
        };
        let mut pos = 0;
        let mut last = None;
        while pos < def.instructions.len() {
            let (value, next) = self.eval_at(&frame, pos)?;
            last = value;
            pos = next;
        }
        Ok(last)
    }

    /// Evaluates the instruction at `pos`, returning its value (`None` for
    /// operators and terminators) and the position just past everything it
    /// consumed.
    fn eval_at(&self, frame: &Frame<'_>, pos: usize) -> Result<(Option<Value>, usize)> {
        match &frame.def.instructions[pos] {
            Instruction::Literal(lit) => Ok((Some(Value::from(lit)), pos + 1)),
            Instruction::Argument(name) => {
                let index = match frame.def.params.iter().position(|p| p == name) {
                    Some(i) => i,
                    None => {
                        return runtime(format!(
                            "'{}' is not a parameter of '{}'",
                            name, frame.def.name
                        ));
                    }
                };
                match frame.args.get(index) {
                    Some(v) => Ok((Some(v.clone()), pos + 1)),
                    None => runtime(format!(
                        "no argument supplied for parameter '{}' of '{}'",
                        name, frame.def.name
                    )),
                }
            }
            Instruction::Variable(name) => match frame.scope.get(name) {
                Some(v) => Ok((Some(v.clone()), pos + 1)),
                None => runtime(format!("unresolved variable '{}'", name)),
            },
            // Operators carry no evaluation semantics; terminators only
            // separate statements. Both pass through untouched.
            Instruction::Operator(_) | Instruction::Terminator => Ok((None, pos + 1)),
            Instruction::Call { name, builtin } => self.eval_call(frame, pos, name, *builtin),
        }
    }

    fn eval_call(
        &self,
        frame: &Frame<'_>,
        pos: usize,
        name: &str,
        builtin: bool,
    ) -> Result<(Option<Value>, usize)> {
        // The tokenizer already rejected unknown call targets; this lookup
        // failing means the program value was assembled by hand.
        let arity = match self.program.arity(name) {
            Some(n) => n,
            None => return runtime(format!("unknown function '{}'", name)),
        };

        let mut call_args = Vec::with_capacity(arity);
        let mut cursor = pos + 1;
        for i in 0..arity {
            match frame.def.instructions.get(cursor) {
                None | Some(Instruction::Terminator) => {
                    return runtime(format!(
                        "insufficient arguments to '{}': expected {}, got {}",
                        name, arity, i
                    ));
                }
                Some(_) => {}
            }
            let (value, next) = self.eval_at(frame, cursor)?;
            match value {
                Some(v) => call_args.push(v),
                None => {
                    return runtime(format!("argument {} to '{}' produced no value", i + 1, name));
                }
            }
            cursor = next;
        }

        let result = if builtin {
            match self.program.builtin(name) {
                Some(b) => Some((b.func)(&call_args)?),
                None => return runtime(format!("unknown builtin '{}'", name)),
            }
        } else {
            match self.program.function(name) {
                Some(def) => self.call(def, &call_args, Scope::new())?,
                None => return runtime(format!("unknown function '{}'", name)),
            }
        };
        Ok((result, cursor))
    }
}
