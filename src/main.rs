use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use quill::lexer::format_tokens;
use quill::{Expression, FrontendPipeline, Lexer, Parser as QuillParser, Reader, SourceState};
use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "quill")]
#[command(author, version, about = "Front end of the Quill scripting language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a source file
    Tokens {
        /// The source file (`-` for stdin)
        input: PathBuf,
    },

    /// Parse a source file and print the tree
    Parse {
        /// The source file (`-` for stdin)
        input: PathBuf,

        /// Print the debug rendering instead of source form
        #[arg(long, conflicts_with = "json")]
        inspect: bool,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a source file for errors
    Check {
        /// The source file (`-` for stdin)
        input: PathBuf,
    },

    /// Start an interactive REPL
    Repl,
}

fn main() -> Result<()> {
    // Initialize logger before parsing CLI args
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let result = match cli.command {
        Commands::Tokens { input } => tokens(&input),
        Commands::Parse {
            input,
            inspect,
            json,
        } => parse(&input, inspect, json),
        Commands::Check { input } => check(&input),
        Commands::Repl => repl(),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn is_stdin(input: &Path) -> bool {
    input.as_os_str() == "-"
}

fn open_input(input: &Path) -> Result<Box<dyn Read>> {
    if is_stdin(input) {
        return Ok(Box::new(io::stdin()));
    }
    let file =
        File::open(input).with_context(|| format!("Failed to open source file: {:?}", input))?;
    Ok(Box::new(file))
}

fn load_source(input: &Path) -> Result<SourceState> {
    if is_stdin(input) {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read standard input")?;
        return Ok(SourceState::new_from_string("<stdin>", source));
    }
    Ok(SourceState::new(input)?)
}

/// Lex and parse `input`, reporting diagnostics on failure
fn front_end(input: &Path) -> Result<Expression> {
    let state = load_source(input)?;
    let mut pipeline = FrontendPipeline::new(state);

    match pipeline.parse() {
        Some(program) => Ok(program),
        None => {
            pipeline.report_errors()?;
            anyhow::bail!("Parsing failed");
        }
    }
}

fn tokens(input: &Path) -> Result<()> {
    // streamed straight from the reader, the source is never held whole
    let mut lexer = Lexer::new(Reader::from_read(open_input(input)?));
    let tokens: Vec<_> = lexer.by_ref().collect();
    println!("{}", format_tokens(&tokens));

    let errors = lexer.take_errors();
    for error in &errors {
        eprintln!(
            "{}: line {}: {} near '{}'",
            "lexical error".red().bold(),
            error.line,
            error,
            error.context
        );
    }
    if !errors.is_empty() {
        anyhow::bail!("{} lexical error(s) found", errors.len());
    }
    Ok(())
}

fn parse(input: &Path, inspect: bool, json: bool) -> Result<()> {
    let program = front_end(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&program)?);
    } else if inspect {
        println!("{}", program.inspect());
    } else {
        println!("{}", program);
    }
    Ok(())
}

fn check(input: &Path) -> Result<()> {
    log::info!("Checking {:?}", input);
    front_end(input)?;
    println!("{}: No errors found", "success".green().bold());
    Ok(())
}

fn repl() -> Result<()> {
    println!("{}", "Quill REPL".blue().bold());
    println!("Type ':quit' or ':q' to exit, ':help' for help\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    let mut line_number = 1;

    loop {
        print!("quill:{:03}> ", line_number);
        stdout.flush()?;

        let Some(input) = lines.next() else {
            println!();
            break;
        };
        let input = input?;

        match input.trim() {
            ":quit" | ":q" => {
                println!("Goodbye!");
                break;
            }
            ":help" | ":h" => {
                println!("REPL commands:");
                println!("  :quit, :q    Exit the REPL");
                println!("  :help, :h    Show this help message");
                println!("\nEnter Quill expressions to see how they parse.");
                continue;
            }
            "" => continue,
            _ => {}
        }

        let mut parser = QuillParser::from_string(input);
        let result = parser.parse();
        for error in parser.errors() {
            eprintln!("{}: {}", "error".red(), error);
        }
        if let Ok(program) = result {
            if !parser.has_errors() {
                for item in program.items() {
                    println!("{}: {}", "parsed".green(), item.inspect());
                }
            }
        }

        line_number += 1;
    }

    Ok(())
}
