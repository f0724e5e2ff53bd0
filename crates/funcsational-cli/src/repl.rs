use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use owo_colors::OwoColorize;

use funcsational_interpreter::{Builtins, Evaluator, Program, ENTRY_POINT};
use funcsational_splitter::{contains_definition, Splitter};
use funcsational_syntax::error::Result;
use funcsational_syntax::function::{FunctionDef, RawFunction};
use funcsational_tokenizer::Tokenizer;

use crate::render_error;

pub fn start_repl() {
    println!(
        "{}",
        "funcsational REPL. Type :help for help, :quit to exit."
            .bold()
            .green()
    );

    // Raw definitions accumulated over the session. Tokenizing is deferred
    // to run time so definitions may reference each other in any order.
    let mut session: HashMap<String, RawFunction> = HashMap::new();

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() {
            "fnc> ".cyan().to_string()
        } else {
            "...> ".cyan().to_string()
        };
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = match io::stdin().read_line(&mut line) {
            Ok(n) => n,
            Err(_) => {
                println!("<input error>");
                break;
            }
        };
        if n == 0 {
            // EOF
            println!("\nGoodbye.");
            break;
        }
        let trimmed = line.trim_end();

        if buffer.is_empty() && trimmed.starts_with(':') {
            match trimmed {
                ":quit" | ":q" | ":exit" => {
                    println!("Goodbye.");
                    break;
                }
                ":help" | ":h" => {
                    println!(
                        "{}\n  {}  {}\n  {}  {}\n  {}  {}\n  {}  {}",
                        "Commands:".bold(),
                        ":help".yellow(),
                        "Show this help",
                        ":quit".yellow(),
                        "Exit the REPL",
                        ":funcs".yellow(),
                        "List session function definitions",
                        ":reset".yellow(),
                        "Forget all session definitions"
                    );
                    println!(
                        "Type name(params)(body) definitions to remember them, or a bare body\n\
                         to run it as the entry function. Multi-line input is supported."
                    );
                    continue;
                }
                ":funcs" => {
                    print_funcs(&session);
                    continue;
                }
                ":reset" => {
                    session.clear();
                    println!("{}", "Session reset.".yellow());
                    continue;
                }
                _ => {
                    println!("{}", "Unknown command. Type :help.".red());
                    continue;
                }
            }
        }

        buffer.push_str(&line);

        if !is_complete(&buffer) {
            continue;
        }

        submit(&buffer, &mut session);
        buffer.clear();
    }
}

fn submit(input: &str, session: &mut HashMap<String, RawFunction>) {
    if contains_definition(input) {
        match Splitter::new(input).split() {
            Ok(records) => {
                let mut names = Vec::with_capacity(records.len());
                for record in records {
                    names.push(record.name.clone());
                    session.insert(record.name.clone(), record);
                }
                println!("{}", format!("defined {}", names.join(", ")).yellow());
            }
            Err(e) => render_error(input, &e),
        }
        return;
    }

    // Bare script: it becomes the entry function, replacing any session
    // definition of the same name for this run only.
    let wrapped = match Splitter::new(input).split() {
        Ok(w) => w,
        Err(e) => {
            render_error(input, &e);
            return;
        }
    };
    let mut records: Vec<RawFunction> = session
        .values()
        .filter(|r| r.name != ENTRY_POINT)
        .cloned()
        .collect();
    records.extend(wrapped);

    let program = match assemble_records(&records) {
        Ok(p) => p,
        Err(e) => {
            render_error(input, &e);
            return;
        }
    };
    match Evaluator::new(&program).run() {
        Ok(Some(value)) => println!("{}", value.to_string().bright_blue()),
        Ok(None) => {}
        Err(e) => render_error(input, &e),
    }
}

fn assemble_records(records: &[RawFunction]) -> Result<Program> {
    let builtins = Builtins::standard();
    let function_names: HashSet<String> = records.iter().map(|r| r.name.clone()).collect();
    let builtin_names = builtins.name_set();
    let mut funcs = Vec::with_capacity(records.len());
    for record in records {
        let instructions = Tokenizer::new(record, &function_names, &builtin_names).tokenize()?;
        funcs.push(FunctionDef {
            name: record.name.clone(),
            params: record.params.clone(),
            instructions,
            line: record.line,
        });
    }
    Program::new(funcs, builtins)
}

fn print_funcs(session: &HashMap<String, RawFunction>) {
    if session.is_empty() {
        println!("{}", "<no functions>".dimmed());
        return;
    }
    let mut entries: Vec<_> = session.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (name, record) in entries {
        println!("{}({})", name.yellow(), record.params.join(","));
    }
}

/// Heuristic completeness check for multi-line input: parentheses balanced
/// outside string literals.
fn is_complete(input: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut prev = '\0';
    for c in input.chars() {
        if in_string {
            if c == '"' && prev != '\\' {
                in_string = false;
            }
        } else {
            match c {
                '"' => in_string = true,
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
        }
        prev = c;
    }
    depth <= 0 && !in_string
}
