//! Builtin function table.
//!
//! Builtins are native functions exposed to programs under fixed names.
//! Each carries an explicitly declared arity next to its implementation;
//! the evaluator never infers argument counts from the native signature.

use std::collections::{HashMap, HashSet};

use funcsational_syntax::error::{runtime, Result};

use crate::value::Value;

/// Signature of a native builtin implementation: an ordered argument list
/// in, a single value out.
pub type BuiltinFn = fn(&[Value]) -> Result<Value>;

/// A natively implemented function with a declared arity.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub func: BuiltinFn,
}

/// Registry of builtins, keyed by name. Assembled once at startup and
/// immutable once handed to a `Program`.
#[derive(Clone, Default)]
pub struct Builtins {
    table: HashMap<String, Builtin>,
}

impl Builtins {
    /// An empty registry, for embedders that supply their own table.
    pub fn empty() -> Self {
        Self { table: HashMap::new() }
    }

    /// The baseline registry: `print`, arity 1.
    pub fn standard() -> Self {
        let mut builtins = Builtins::empty();
        builtins.register(Builtin {
            name: "print",
            arity: 1,
            func: builtin_print,
        });
        builtins
    }

    pub fn register(&mut self, builtin: Builtin) {
        self.table.insert(builtin.name.to_string(), builtin);
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.table.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// The set of builtin names, as the tokenizer consumes it.
    pub fn name_set(&self) -> HashSet<String> {
        self.table.keys().cloned().collect()
    }
}

/// Writes the argument's textual representation on its own line and returns
/// the argument.
fn builtin_print(args: &[Value]) -> Result<Value> {
    match args.first() {
        Some(value) => {
            println!("{}", value);
            Ok(value.clone())
        }
        None => runtime("print expects exactly 1 argument"),
    }
}
