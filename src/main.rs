use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{bail, IntoDiagnostic, Result};

use mailman::{assemble, Image, RunError, Simulator};

/// Mailman is an assembler & simulator toolchain for the Little Man Computer.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a `.asm` file to run
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble and run an `.asm` file, wiring input and output to the terminal
    Run {
        /// `.asm` file to run
        name: PathBuf,
        /// Abort after this many executed instructions
        #[arg(short, long)]
        limit: Option<u64>,
    },
    /// Check an `.asm` file without running it
    Check {
        /// File to check
        name: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .context_lines(mailman::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    match args.command {
        Some(Command::Run { name, limit }) => run(&name, limit),
        Some(Command::Check { name }) => {
            file_message(MsgColor::Green, "Checking", &name);
            let image = read_and_assemble(&name)?;
            message(
                MsgColor::Green,
                "Success",
                &format!("assembled {} mailboxes", image.len()),
            );
            Ok(())
        }
        None => match args.path {
            Some(path) => run(&path, None),
            None => {
                println!("\n~ mailman v{VERSION} ~");
                println!("{SHORT_INFO}");
                Ok(())
            }
        },
    }
}

fn run(name: &Path, limit: Option<u64>) -> Result<()> {
    file_message(MsgColor::Green, "Assembling", name);
    let image = read_and_assemble(name)?;

    let mut sim = Simulator::new();
    sim.load(image.words()).into_diagnostic()?;

    message(MsgColor::Green, "Running", "assembled program");
    let stdin = io::stdin();
    let mut steps: u64 = 0;
    while !sim.halted() {
        if let Some(limit) = limit {
            if steps >= limit {
                bail!("Execution aborted after {limit} steps without halting");
            }
        }
        if let Some(value) = sim.step().into_diagnostic()? {
            println!("{value}");
        }
        steps += 1;
        while sim.awaiting_input() {
            let value = prompt_input(&stdin)?;
            match sim.provide_input(value) {
                Ok(()) => {}
                // Out-of-range values are re-prompted, like unparseable ones.
                Err(RunError::InputOutOfRange(value)) => {
                    eprintln!("{value} does not fit in a mailbox; enter 0-999.");
                }
                Err(err) => return Err(err).into_diagnostic(),
            }
        }
    }
    message(MsgColor::Cyan, "Halted", "execution finished");
    Ok(())
}

fn read_and_assemble(name: &Path) -> Result<Image> {
    match name.extension() {
        Some(ext) if ext == "asm" => {}
        _ => bail!("Expected an `.asm` file. Exiting..."),
    }
    let src = fs::read_to_string(name).into_diagnostic()?;
    assemble(&src)
}

/// Prompt on stderr and read one integer line, re-prompting until one
/// parses. Program output alone lands on stdout.
fn prompt_input(stdin: &io::Stdin) -> Result<i64> {
    loop {
        eprint!("{} ", "INPUT>".bold());
        io::stderr().flush().into_diagnostic()?;
        let mut line = String::new();
        let read = stdin.lock().read_line(&mut line).into_diagnostic()?;
        if read == 0 {
            bail!("Input stream closed while the program was awaiting input");
        }
        match line.trim().parse::<i64>() {
            Ok(value) => return Ok(value),
            Err(_) => eprintln!("Enter an integer between 0 and 999."),
        }
    }
}

enum MsgColor {
    Green,
    Cyan,
}

fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

fn message(color: MsgColor, left: &str, right: &str) {
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
    };
    println!("{left:>12} {right}");
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

const SHORT_INFO: &str = r"
Welcome to mailman, an assembler & simulator toolchain for the
Little Man Computer (LMC).
Please use `-h` or `--help` to access the usage instructions.
";
