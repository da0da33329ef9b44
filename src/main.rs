use clap::Parser as ClapParser;
use csql::{
    Options,
    cli::{self, CliError, RunOptions, RunResult},
    output,
};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "csql")]
#[command(about = "csql - filter, project, group and order CSV data with a line-and-comma query language")]
#[command(version)]
struct Cli {
    /// The query, one step per line
    query: String,

    /// Input file (reads from stdin if not provided)
    #[arg(short, long)]
    input: Option<String>,

    /// Field separator for input and output
    #[arg(short, long, default_value_t = ',')]
    sep: char,

    /// Number of leading rows to skip
    #[arg(long, default_value_t = 0)]
    skip: usize,

    /// Print the type of every result column to stderr
    #[arg(long)]
    types: bool,

    /// Print the parsed steps to stderr
    #[arg(long)]
    ops: bool,

    /// Only validate syntax, don't execute
    #[arg(long)]
    syntax_only: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let input = match cli.input {
        Some(path) => Some(cli::decode_input(std::fs::read(&path)?, &path)?),
        None if cli.syntax_only => None,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Some(cli::decode_input(buffer, "stdin")?)
        }
        None => return Err(CliError::NoInput),
    };

    let options = RunOptions {
        query: cli.query,
        input,
        options: Options {
            skip: cli.skip,
            separator: cli.sep,
            print_ops: cli.ops,
            print_types: cli.types,
        },
        syntax_only: cli.syntax_only,
    };

    match cli::execute_run(&options)? {
        RunResult::SyntaxValid(query) => {
            if options.options.print_ops {
                eprint!("{}", output::format_ops(&query));
            }
            println!("Syntax is valid");
        }
        RunResult::Success { query, result } => {
            if options.options.print_ops {
                eprint!("{}", output::format_ops(&query));
            }
            if options.options.print_types {
                eprintln!("{}", output::format_types(&result.column_types));
            }
            // execute_run has already rejected a non-ASCII separator
            let delimiter = options.options.delimiter().unwrap_or(b',');
            cli::write_rows(io::stdout().lock(), &result.rows, delimiter)?;
        }
    }
    Ok(())
}
