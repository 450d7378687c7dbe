use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{eyre, Result, WrapErr};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use ls8::{Processor, Ram};

/// Runs a program on the LS-8 8-bit computer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Program file, one binary byte per line
    #[arg()]
    program: PathBuf,

    #[arg(short, long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Log the machine state before every instruction
    #[arg(short, long)]
    trace: bool,

    /// Print the loaded memory before running
    #[arg(long)]
    dump: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    let args = Args::parse();

    let level = if args.trace {
        LevelFilter::Trace
    } else {
        args.log_level.into()
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .map_err(|err| eyre!("failed to install logger: {}", err))?;

    let memory = Ram::from_file(&args.program)
        .wrap_err_with(|| format!("Failed to load `{}`", args.program.display()))?;
    if args.dump {
        print!("{}", memory.dump());
    }

    let mut cpu = Processor::new(memory);
    cpu.trace = args.trace;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cpu.execute_until_halt(&mut out)
        .wrap_err_with(|| format!("Machine fault at 0x{:02X}", cpu.pc))?;

    Ok(())
}
