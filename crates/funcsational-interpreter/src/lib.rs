//! Funcsational interpreter: evaluates flat instruction sequences with an
//! arity-driven tree-walking evaluator.
//!
//! This crate provides the runtime half of the toolchain: values, the
//! per-activation variable scope, the builtin table, the immutable program
//! value, and the evaluator itself.

pub mod builtins;
pub mod interpreter;
pub mod program;
pub mod scope;
pub mod value;

pub use builtins::{Builtin, BuiltinFn, Builtins};
pub use interpreter::Evaluator;
pub use program::{Program, ENTRY_POINT};
pub use scope::Scope;
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use funcsational_splitter::Splitter;
    use funcsational_syntax::function::FunctionDef;
    use funcsational_syntax::instruction::Instruction;
    use funcsational_tokenizer::Tokenizer;

    fn compile(input: &str) -> Result<Program, String> {
        let builtins = Builtins::standard();
        let raw = Splitter::new(input)
            .split()
            .map_err(|e| format!("{}: {}", e.kind.label(), e))?;
        let function_names: HashSet<String> = raw.iter().map(|r| r.name.clone()).collect();
        let builtin_names = builtins.name_set();
        let mut funcs = Vec::new();
        for record in &raw {
            let instructions = Tokenizer::new(record, &function_names, &builtin_names)
                .tokenize()
                .map_err(|e| format!("{}: {}", e.kind.label(), e))?;
            funcs.push(FunctionDef {
                name: record.name.clone(),
                params: record.params.clone(),
                instructions,
                line: record.line,
            });
        }
        Program::new(funcs, builtins).map_err(|e| format!("{}: {}", e.kind.label(), e))
    }

    fn run_program(input: &str) -> Result<Option<Value>, String> {
        let program = compile(input)?;
        Evaluator::new(&program)
            .run()
            .map_err(|e| format!("{}: {}", e.kind.label(), e))
    }

    fn expect_value(input: &str, expected: Value) {
        match run_program(input) {
            Ok(Some(actual)) => assert_eq!(actual, expected, "Program: {}", input),
            Ok(None) => panic!("Expected value but got none for: {}", input),
            Err(e) => panic!("Program failed: {}\nInput: {}", e, input),
        }
    }

    fn expect_none(input: &str) {
        match run_program(input) {
            Ok(result) => assert!(result.is_none(), "Expected no value for: {}", input),
            Err(e) => panic!("Program failed: {}\nInput: {}", e, input),
        }
    }

    fn expect_error(input: &str, needle: &str) {
        match run_program(input) {
            Ok(_) => panic!("Expected error but program succeeded: {}", input),
            Err(e) => assert!(
                e.contains(needle),
                "Expected error containing '{}', got '{}'\nInput: {}",
                needle,
                e,
                input
            ),
        }
    }

    #[test]
    fn test_literal_results() {
        expect_value("f()(42)", Value::Num(42.0));
        expect_value("f()(3.14)", Value::Num(3.14));
        expect_value("f()(\"hello\")", Value::Str("hello".to_string()));
    }

    #[test]
    fn test_implicit_entry_wrapping() {
        expect_value("42", Value::Num(42.0));
        expect_value("{print}\"hi\"", Value::Str("hi".to_string()));
    }

    #[test]
    fn test_print_returns_its_argument() {
        expect_value("f()({print}\"hi\")", Value::Str("hi".to_string()));
        expect_value("f()({print}7)", Value::Num(7.0));
    }

    #[test]
    fn test_user_function_argument_binding() {
        expect_value(
            "greet(msg)(<msg>)\nf()({greet}\"yo\")",
            Value::Str("yo".to_string()),
        );
    }

    #[test]
    fn test_nested_calls_partition_the_instruction_range() {
        // The inner call consumes "1" and "2"; its result and "3" feed the
        // outer call, so the whole body evaluates to "3".
        expect_value(
            "second(a,b)(<b>)\nf()({second}{second}\"1\"\"2\"\"3\")",
            Value::Str("3".to_string()),
        );
    }

    #[test]
    fn test_nested_print_runs_inside_out() {
        // print returns its argument, so chaining consumes one literal.
        expect_value("f()({print}{print}\"twice\")", Value::Str("twice".to_string()));
    }

    #[test]
    fn test_insufficient_arguments() {
        expect_error("f()({print};)", "insufficient arguments");
        expect_error("f()({print})", "insufficient arguments");
        expect_error(
            "second(a,b)(<b>)\nf()({second}\"only\";)",
            "insufficient arguments",
        );
    }

    #[test]
    fn test_operator_in_argument_position() {
        expect_error("f()({print}+)", "produced no value");
    }

    #[test]
    fn test_operators_and_terminators_are_no_ops() {
        // The walk passes over operators; the result is the last
        // value-producing instruction.
        expect_value("f()(1 + 2)", Value::Num(2.0));
        expect_value("f()(1 ++ 2 ** 3)", Value::Num(3.0));
        // A trailing terminator produces nothing.
        expect_none("f()(1 + 2 ;)");
        expect_none("f()()");
    }

    #[test]
    fn test_unresolved_variable() {
        expect_error("f()(<nope>)", "unresolved variable 'nope'");
    }

    #[test]
    fn test_seeded_scope_resolves_variables() {
        let program = compile("f()(<greeting>)").expect("compile should succeed");
        let mut scope = Scope::new();
        scope.set("greeting", Value::Str("hello".to_string()));
        let result = Evaluator::new(&program)
            .run_with_scope(scope)
            .expect("run should succeed");
        assert_eq!(result, Some(Value::Str("hello".to_string())));
    }

    #[test]
    fn test_entry_invoked_with_empty_argument_array() {
        // Entry may declare parameters, but it is always invoked with no
        // arguments; touching a parameter then fails.
        expect_value("f(x)(42)", Value::Num(42.0));
        expect_error("f(x)(<x>)", "no argument supplied");
    }

    #[test]
    fn test_missing_entry_point() {
        expect_error("g()(1)", "entry point");
    }

    #[test]
    fn test_duplicate_function_name() {
        expect_error("f()(1)f()(2)", "more than once");
    }

    #[test]
    fn test_builtin_name_collision() {
        expect_error("print(x)(<x>)\nf()(1)", "builtin");
    }

    #[test]
    fn test_unknown_callee_is_defended_against() {
        // Cannot be produced by the tokenizer; assemble the program by hand.
        let func = FunctionDef {
            name: "f".to_string(),
            params: Vec::new(),
            instructions: vec![Instruction::Call {
                name: "ghost".to_string(),
                builtin: false,
            }],
            line: 1,
        };
        let program = Program::new(vec![func], Builtins::standard()).expect("program is valid");
        let err = Evaluator::new(&program).run().expect_err("run should fail");
        assert!(err.msg.contains("unknown function 'ghost'"));
    }

    #[test]
    fn test_self_recursion_is_valid_syntax() {
        // A function may reference itself; the terminator then bounds its
        // argument list at run time.
        expect_error("f(x)({f};)", "insufficient arguments");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(format!("{}", Value::Num(3.0)), "3");
        assert_eq!(format!("{}", Value::Num(3.14)), "3.14");
        assert_eq!(format!("{}", Value::Str("hi".to_string())), "hi");
    }
}
