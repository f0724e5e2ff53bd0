mod repl;

use std::collections::HashSet;
use std::fs;

use owo_colors::OwoColorize;

use funcsational_interpreter::{Builtins, Evaluator, Program};
use funcsational_splitter::Splitter;
use funcsational_syntax::error::{Error, Result};
use funcsational_syntax::function::FunctionDef;
use funcsational_tokenizer::Tokenizer;

struct Options {
    /// Treat the source argument as inline program text instead of a path
    inline: bool,
    /// Dump discovered functions, instruction lists and a call trace
    verbose: bool,
    /// Source path (or inline text when `inline` is set)
    source: Option<String>,
}

fn parse_options(args: &[String]) -> Options {
    let mut opts = Options {
        inline: false,
        verbose: false,
        source: None,
    };
    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--code" => opts.inline = true,
            "-v" | "--verbose" => opts.verbose = true,
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-s" | "--src" => {
                if i + 1 < args.len() {
                    i += 1;
                    opts.source = Some(args[i].clone());
                } else {
                    eprintln!(
                        "{}: {}",
                        "error".red().bold(),
                        "'-s' expects a source argument".red()
                    );
                    std::process::exit(2);
                }
            }
            s if s.starts_with('-') => {
                eprintln!(
                    "{}: {}",
                    "error".red().bold(),
                    format!("unknown option '{}'", s).red()
                );
                std::process::exit(2);
            }
            s => opts.source = Some(s.to_string()),
        }
        i += 1;
    }
    opts
}

fn print_usage() {
    println!("Usage: funcsational [options] <file>");
    println!();
    println!("Options:");
    println!("  -c, --code        treat the source argument as inline program text");
    println!("  -v, --verbose     dump discovered functions, instructions and a call trace");
    println!("  -s, --src <file>  source file (same as the bare positional argument)");
    println!("  -h, --help        show this help");
    println!();
    println!("With no source argument, an interactive session is started.");
}

/// Splits and tokenizes the source, then assembles the immutable program
/// value the evaluator runs against.
fn assemble(src: &str, verbose: bool) -> Result<Program> {
    let builtins = Builtins::standard();
    let raw = Splitter::new(src).split()?;
    if verbose {
        for record in &raw {
            eprintln!(
                "{}",
                format!(
                    "found function {}({}) at line {}",
                    record.name,
                    record.params.join(","),
                    record.line
                )
                .bright_black()
            );
        }
    }

    let function_names: HashSet<String> = raw.iter().map(|r| r.name.clone()).collect();
    let builtin_names = builtins.name_set();
    let mut funcs = Vec::with_capacity(raw.len());
    for record in &raw {
        let instructions = Tokenizer::new(record, &function_names, &builtin_names).tokenize()?;
        if verbose {
            eprintln!("{}", format!("{} -> {:?}", record.name, instructions).bright_black());
        }
        funcs.push(FunctionDef {
            name: record.name.clone(),
            params: record.params.clone(),
            instructions,
            line: record.line,
        });
    }
    Program::new(funcs, builtins)
}

/// Renders a diagnostic: summary line, locus, source excerpt with tabs
/// expanded to two spaces, and a caret aligned under the failing column
/// (tabs counted as two caret columns).
pub(crate) fn render_error(source: &str, err: &Error) {
    eprintln!("{}: {}", err.kind.label().red().bold(), err.msg.red());
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = source.lines().nth(line - 1) {
            let gutter = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", gutter.bright_black(), src_line.replace('\t', "  "));

            let mut marker = String::new();
            marker.push_str(&" ".repeat(gutter.len()));
            for c in src_line.chars().take(col - 1) {
                marker.push_str(if c == '\t' { "  " } else { " " });
            }
            marker.push('^');
            eprintln!("{}{}", marker.red(), " error here".red());
            eprintln!("     |");
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let opts = parse_options(&args);

    let source_arg = match opts.source {
        Some(s) => s,
        None => {
            repl::start_repl();
            return;
        }
    };

    let src = if opts.inline {
        source_arg
    } else {
        let path = std::path::PathBuf::from(&source_arg);
        if !path.exists() {
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                format!("File not found: {}", source_arg).red()
            );
            std::process::exit(1);
        }
        match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!(
                    "{}: {}",
                    "error".red().bold(),
                    format!("Failed to read {}: {}", path.display(), e).red()
                );
                std::process::exit(1);
            }
        }
    };

    if opts.verbose {
        eprintln!("{}", src.bright_black());
    }

    let program = match assemble(&src, opts.verbose) {
        Ok(p) => p,
        Err(e) => {
            render_error(&src, &e);
            std::process::exit(1);
        }
    };

    let evaluator = Evaluator::new(&program).with_trace(opts.verbose);
    if let Err(e) = evaluator.run() {
        render_error(&src, &e);
        std::process::exit(1);
    }
}
