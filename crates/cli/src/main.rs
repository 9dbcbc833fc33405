//! MSIM core CLI driver.
//!
//! A minimal concrete realization of the out-of-scope interactive shell
//! (§1): loads a flat raw binary at the configured RAM base, sets `pc`, and
//! loops calling `step` until a host error or an explicit step count is
//! exhausted.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use msim_core::config::Config;
use msim_core::memory::PhysicalMemory;
use msim_core::sim::loader;
use msim_core::Simulator;

#[derive(Parser, Debug)]
#[command(name = "msim", author, version, about = "RV32IMA instruction-level simulator core")]
struct Cli {
    /// Flat raw binary image to load at the configured RAM base.
    binary: PathBuf,

    /// Path to a JSON configuration file; falls back to built-in defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run until a host error (the default if no subcommand is given).
    Run,
    /// Run exactly `count` steps on hart 0, then dump state.
    Step { count: u64 },
    /// Load the image and immediately dump initial state without stepping.
    Dump,
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("error reading config {}: {e}", path.display());
                process::exit(1);
            });
            serde_json::from_str(&text).unwrap_or_else(|e| {
                eprintln!("error parsing config {}: {e}", path.display());
                process::exit(1);
            })
        }
        None => Config::default(),
    };

    if let Err(e) = config.validate() {
        eprintln!("invalid configuration: {e}");
        process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut pm = PhysicalMemory::new();
    pm.add_ram("RAM", config.system.ram_base, config.memory.ram_size);

    let load_addr = config.system.ram_base + config.system.kernel_offset;
    match loader::load_flat_binary(&mut pm, &cli.binary, load_addr) {
        Ok(n) => println!("loaded {n} bytes at {load_addr:#x}"),
        Err(e) => {
            eprintln!("error loading {}: {e}", cli.binary.display());
            process::exit(1);
        }
    }

    let mut sim = Simulator::new(config.system.num_harts, pm);
    sim.init(0, load_addr as u32).unwrap_or_else(|e| {
        eprintln!("fatal: {e}");
        process::exit(1);
    });

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Dump => println!("{}", sim.hart(0).unwrap().dump_state()),
        Commands::Step { count } => {
            for _ in 0..count {
                if let Err(e) = sim.step(0) {
                    eprintln!("\nfatal trap: {e}");
                    println!("{}", sim.hart(0).unwrap().dump_state());
                    process::exit(1);
                }
            }
            println!("{}", sim.hart(0).unwrap().dump_state());
        }
        Commands::Run => loop {
            if let Err(e) = sim.step(0) {
                eprintln!("\nfatal trap: {e}");
                println!("{}", sim.hart(0).unwrap().dump_state());
                process::exit(1);
            }
        },
    }
}
