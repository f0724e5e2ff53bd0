//! The assembled program: every function definition plus the builtin table.

use std::collections::HashMap;

use funcsational_syntax::error::{runtime, Result};
use funcsational_syntax::function::FunctionDef;

use crate::builtins::{Builtin, Builtins};

/// Name of the distinguished entry-point function.
pub const ENTRY_POINT: &str = "f";

/// An immutable program value, keyed by name across functions and builtins
/// combined. Constructed once after tokenizing and passed by reference into
/// the evaluator; nothing mutates it afterwards.
pub struct Program {
    functions: HashMap<String, FunctionDef>,
    builtins: Builtins,
}

impl Program {
    /// Assembles a program, rejecting duplicate function names and names
    /// that collide with a builtin.
    pub fn new(functions: Vec<FunctionDef>, builtins: Builtins) -> Result<Program> {
        let mut map = HashMap::with_capacity(functions.len());
        for func in functions {
            if builtins.contains(&func.name) {
                return runtime(format!(
                    "function '{}' collides with the builtin of the same name",
                    func.name
                ));
            }
            if map.contains_key(&func.name) {
                return runtime(format!("function '{}' is defined more than once", func.name));
            }
            map.insert(func.name.clone(), func);
        }
        Ok(Program {
            functions: map,
            builtins,
        })
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    pub fn builtin(&self, name: &str) -> Option<&Builtin> {
        self.builtins.get(name)
    }

    /// Declared arity of a function or builtin, whichever owns the name.
    pub fn arity(&self, name: &str) -> Option<usize> {
        self.functions
            .get(name)
            .map(FunctionDef::arity)
            .or_else(|| self.builtins.get(name).map(|b| b.arity))
    }

    /// The entry-point definition, if the program has one.
    pub fn entry(&self) -> Option<&FunctionDef> {
        self.functions.get(ENTRY_POINT)
    }

    /// Sorted names of all defined functions.
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }
}
