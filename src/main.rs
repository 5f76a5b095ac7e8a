use calc_interp::Interpreter;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "calc_interp", version, about = "Evaluate assignment and calculation statements")]
struct Cli {
    /// Read statements from this file instead of stdin
    file: Option<PathBuf>,

    /// Evaluate each statement as soon as it is read and print its value
    #[arg(short, long)]
    interactive: bool,

    /// With --interactive, also print the parsed expression tree
    #[arg(short, long)]
    tree: bool,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let input: Box<dyn BufRead> = match &cli.file {
        Some(path) => match std::fs::File::open(path) {
            Ok(file) => Box::new(std::io::BufReader::new(file)),
            Err(e) => {
                eprintln!("Error: {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Box::new(std::io::stdin().lock()),
    };

    let mut interpreter = Interpreter::new();
    let result = if cli.interactive {
        interactive(input, &mut interpreter, cli.tree)
    } else {
        batch(input, &mut interpreter)
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    println!("{}", interpreter.environment());
}

fn batch(input: Box<dyn BufRead>, interpreter: &mut Interpreter) -> Result<(), Box<dyn std::error::Error>> {
    print!("Enter expressions: ");
    std::io::stdout().flush()?;

    for line in input.lines() {
        let line = line?;
        if line.is_empty() {
            break;
        }
        interpreter.submit_statement(line);
    }

    interpreter.evaluate_all();
    Ok(())
}

fn interactive(input: Box<dyn BufRead>, interpreter: &mut Interpreter, show_tree: bool) -> Result<(), Box<dyn std::error::Error>> {
    print!("> ");
    std::io::stdout().flush()?;

    for line in input.lines() {
        let line = line?;
        if line.is_empty() {
            break;
        }

        match interpreter.parse_one(&line) {
            Some(tree) => {
                if show_tree {
                    println!("{tree}");
                }
                println!("{}", interpreter.run(&tree));
            },
            None => println!("Error, {}", calc_interp::CalcError::unparsable(line)),
        }

        print!("> ");
        std::io::stdout().flush()?;
    }
    Ok(())
}
