use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;
use clap::{Parser, ValueEnum};
use log::debug;
use hiercache::config::{CacheLevelConfig, ComplianceLevel, LayeredCacheConfig, ReplacementPolicyConfig};
use hiercache::io::load_trace;
use hiercache::report::{render, OutputFormat};
use hiercache::simulator::Simulator;

#[derive(Parser, Debug)]
#[command(about = String::from("Multi-level cache simulator. The positional arguments describe L1, lower levels are added with --level"))]
struct Args {
    /// Number of sets in L1
    nsets: u32,
    /// Block size of L1 in bytes
    bsize: u32,
    /// Associativity of L1
    assoc: u32,
    /// L1 replacement policy: r (random), l (lru) or f (fifo)
    subst: ReplacementPolicyConfig,
    /// 0 for freeform output, 1 for the standardized one-line format
    #[arg(value_parser = clap::value_parser!(u8).range(0..=1))]
    flag_out: u8,
    /// The trace file
    input: PathBuf,

    /// A lower level, as L<level>:<nsets>:<bsize>:<assoc>:<policy>. Can be repeated
    #[arg(short, long = "level", value_name = "SPEC")]
    levels: Vec<CacheLevelConfig>,

    /// Seed for random replacement, runs with the same seed are reproducible
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the results as JSON, overriding flag_out
    #[arg(long)]
    json: bool,

    #[arg(long, value_enum, default_value_t = Compliance::Strict)]
    compliance: Compliance,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long)]
    debug: bool,
}

/// Relaxed reads `.txt` traces as base 10 text, the others treat every trace as binary
#[derive(Debug, Copy, Clone, ValueEnum)]
enum Compliance {
    Relaxed,
    Strict,
    VeryStrict,
}

impl From<Compliance> for ComplianceLevel {
    fn from(value: Compliance) -> Self {
        match value {
            Compliance::Relaxed => ComplianceLevel::Relaxed,
            Compliance::Strict => ComplianceLevel::Strict,
            Compliance::VeryStrict => ComplianceLevel::VeryStrict,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let start = Instant::now();
    let args = Args::parse();
    let default_filter = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let mut config = LayeredCacheConfig::new();
    config.push(CacheLevelConfig::new(1, args.nsets, args.bsize, args.assoc, args.subst));
    for level in &args.levels {
        config.push(*level);
    }
    debug!("Parsed input configuration: {config:?}");
    let simulator = Simulator::new(&config, args.seed).map_err(|e| format!("Invalid cache configuration: {e}"))?;
    let addresses = load_trace(&args.input, args.compliance.into()).map_err(|e| format!("Couldn't load the trace: {e}"))?;

    let report = simulator.run(&addresses);
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::from_flag(args.flag_out).unwrap_or(OutputFormat::Freeform)
    };
    println!("{}", render(&report.result, format)?);

    if args.performance {
        let total_time = start.elapsed();
        println!("Simulation time: {}s", report.simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes trace loading, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        let formatted = (1..)
            .zip(&report.uninitialised_lines)
            .map(|(level, count)| format!("L{level}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        debug!("Uninitialised cache lines by level: ({formatted})");
        debug!("Total uninitialised cache lines: {}", report.uninitialised_lines.iter().sum::<u64>());
    }
    Ok(())
}
