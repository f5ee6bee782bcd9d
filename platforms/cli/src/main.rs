use clap::Parser;
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tmsim::analyzer::{describe, validate};
use tmsim::types::DEFAULT_WINDOW_SIZE;
use tmsim::{parse_definition, Catalog, Definition, DefinitionLoader, Mode, Outcome, TuringMachine};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Runs a single-tape Turing machine from a definition file, a preset or stdin.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tmsim-cli machines/palindrome.tm --input abba
  tmsim-cli --preset binary_increment --debug
  cat machines/copy_string.tm | tmsim-cli --json")]
struct Cli {
    /// Path to a machine definition file (.tm).
    /// Definition text can also be piped via stdin.
    program_file: Option<PathBuf>,

    /// Run a built-in preset instead of a file
    #[clap(short, long, conflicts_with = "program_file")]
    preset: Option<String>,

    /// Input placed on the tape, replacing the definition's [INPUT]
    #[clap(short, long)]
    input: Option<String>,

    /// Step ceiling before the run is stopped with a timeout
    #[clap(short, long)]
    max_steps: Option<usize>,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Number of tape cells shown per step with --debug
    #[clap(short, long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window: usize,

    /// Print the final report as JSON
    #[clap(long)]
    json: bool,

    /// Only check the definition's structure and report problems
    #[clap(long)]
    check: bool,

    /// List the built-in presets
    #[clap(short, long)]
    list: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn Error>> {
    if cli.list {
        list_presets();
        return Ok(ExitCode::SUCCESS);
    }

    if cli.check {
        return check(cli);
    }

    let Definition {
        mut machine, input, ..
    } = load_definition(cli)?;
    let input = cli.input.clone().unwrap_or(input);
    info!(machine = machine.name(), input = %input, "starting run");
    machine.load_tape(&input);

    let outcome = if cli.debug {
        if let Some(max_steps) = cli.max_steps.filter(|&n| n > 0) {
            machine.set_max_steps(max_steps);
        }
        print_step(&machine, cli.window);
        while machine.step() {
            print_step(&machine, cli.window);
        }
        print_step(&machine, cli.window);
        machine.status().outcome().unwrap_or(Outcome::Halted)
    } else {
        machine.run(cli.max_steps)
    };
    debug!(%outcome, steps = machine.step_count(), "run finished");

    if cli.json {
        println!("{}", machine.report().to_json()?);
    } else {
        println!("{}: {}", machine.name(), machine.result_string());
        println!("Steps: {}", machine.step_count());
        println!("State: {}", machine.state());
        println!(
            "Tape: {}",
            machine.tape().map(|tape| tape.content()).unwrap_or_default()
        );
    }

    Ok(match outcome {
        Outcome::Accepted | Outcome::Halted => ExitCode::SUCCESS,
        Outcome::Rejected => ExitCode::from(2),
        Outcome::Timeout => ExitCode::from(3),
    })
}

/// Loads the definition from a file, a preset, or stdin, in that order.
fn load_definition(cli: &Cli) -> Result<Definition, Box<dyn Error>> {
    if let Some(path) = &cli.program_file {
        Ok(DefinitionLoader::load_definition(path)?)
    } else if let Some(key) = &cli.preset {
        let preset = Catalog::get(key)?;
        Ok(parse_definition(preset.source(), Mode::Strict)?)
    } else {
        Ok(DefinitionLoader::load_definition_from_string(&read_stdin()?)?)
    }
}

/// Runs the structural validation pass over the definition text.
fn check(cli: &Cli) -> Result<ExitCode, Box<dyn Error>> {
    let source = if let Some(path) = &cli.program_file {
        fs::read_to_string(path)
            .map_err(|e| format!("Failed to read file '{}': {}", path.display(), e))?
    } else if let Some(key) = &cli.preset {
        Catalog::get(key)?.source().to_string()
    } else {
        read_stdin()?
    };

    let issues = validate(&source);
    if issues.is_empty() {
        println!("OK");
        return Ok(ExitCode::SUCCESS);
    }

    for line in describe(&issues) {
        println!("{}", line);
    }
    Ok(ExitCode::FAILURE)
}

fn read_stdin() -> Result<String, Box<dyn Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Err("no definition given: pass a FILE, use --preset, or pipe a definition on stdin".into());
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("Failed to read from stdin: {}", e))?;
    Ok(buffer)
}

fn list_presets() {
    for preset in Catalog::presets() {
        println!(
            "{:<24} {:<24} {:<12} input: {}",
            preset.key, preset.name, preset.category, preset.default_input
        );
    }
}

/// Prints the step counter and state, then a tape window with a caret under the head.
fn print_step(machine: &TuringMachine, window: usize) {
    let Some(tape) = machine.tape() else {
        return;
    };

    let view = tape.visible_window(window);
    let cells: String = view.cells.iter().collect();
    println!(
        "Step: {}, State: {}, Head: {}",
        machine.step_count(),
        machine.state(),
        tape.head()
    );
    println!("  {}", cells);
    println!("  {:>width$}", "^", width = view.head + 1);
}
