//! Host for a `ModList`: runs commands, then reads the list back.
//!
//! Each command goes through a fresh handle, the way `echo "add 3" >` on a
//! control file would, and the final read mirrors `cat`.
//!
//! ```text
//! modlist "add 1" "add 2" "remove 1"
//! printf 'add 5\nadd 6\n' | modlist --read-mode paginated
//! ```

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use nexus_modlist::{Config, DefaultValue, ModList, ReadMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "modlist", about = "Drive a modlist service from the command line")]
struct Args {
    /// Commands to run; when none are given, one command per stdin line
    commands: Vec<String>,

    /// Reject commands of this many bytes or more
    #[arg(long, default_value_t = nexus_modlist::config::DEFAULT_MAX_COMMAND_LEN)]
    max_command_len: usize,

    /// Size of the serialized answer buffer
    #[arg(long, default_value_t = nexus_modlist::config::DEFAULT_ANSWER_BUFFER_LEN)]
    answer_buffer: usize,

    /// Maximum number of values held
    #[arg(long)]
    capacity: Option<usize>,

    /// How the final read serializes the list [default: build-time choice]
    #[arg(long, value_enum)]
    read_mode: Option<ReadModeArg>,

    /// Skip the final read
    #[arg(long)]
    no_dump: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReadModeArg {
    /// One dump, NUL-terminated
    Bulk,
    /// One record per step
    Paginated,
}

impl From<ReadModeArg> for ReadMode {
    fn from(arg: ReadModeArg) -> Self {
        match arg {
            ReadModeArg::Bulk => ReadMode::Bulk,
            ReadModeArg::Paginated => ReadMode::Paginated,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mode = args.read_mode.map_or(ReadMode::DEFAULT, ReadMode::from);
    let config = Config::default()
        .with_max_command_len(args.max_command_len)
        .with_answer_buffer_len(args.answer_buffer)
        .with_node_capacity(args.capacity)
        .with_read_mode(mode);

    let list: ModList<DefaultValue> = ModList::new(config);
    let mut failed = false;

    let mut run = |line: &str| {
        let command = format!("{line}\n");
        if let Err(err) = list.open().write(command.as_str()) {
            eprintln!("error: {err} (errno {})", err.errno());
            failed = true;
        }
    };

    if args.commands.is_empty() {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => run(&line),
                Err(err) => {
                    eprintln!("error: reading stdin: {err}");
                    return ExitCode::FAILURE;
                }
            }
        }
    } else {
        args.commands.iter().for_each(|c| run(c));
    }

    if !args.no_dump {
        let mut file = list.open();
        let mut out = Vec::new();
        loop {
            match file.read(&mut out) {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    eprintln!("error: {err} (errno {})", err.errno());
                    return ExitCode::FAILURE;
                }
            }
        }
        // Drop the terminator of a bulk answer
        if out.last() == Some(&0) {
            out.pop();
        }
        if let Err(err) = io::stdout().lock().write_all(&out) {
            eprintln!("error: writing stdout: {err}");
            return ExitCode::FAILURE;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
