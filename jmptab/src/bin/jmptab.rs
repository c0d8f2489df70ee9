use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use jmptab::{codegen::CodeGenerator, BuildError, Builder};
use rand::{rngs::SmallRng, SeedableRng};

#[derive(Parser, Debug)]
#[command(about = "Build jump tables for key sets and report how construction went", long_about = None)]
struct Args {
    /// A file containing key sets: one key per line, sets separated by blank lines.
    input: PathBuf,
    /// The attempt budget of each construction.
    #[arg(short, long, default_value_t = 100)]
    attempts: usize,
    /// Seed of the random source.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Give up on a key set after this many milliseconds.
    #[arg(short, long)]
    deadline_ms: Option<u64>,
    /// Print the generated code of every table that was built.
    #[arg(short, long)]
    codegen: bool,
}

/// Split the input into key sets.
fn key_sets(input: &str) -> Vec<Vec<&str>> {
    let mut sets = vec![];
    let mut current = vec![];
    for line in input.lines() {
        if line.is_empty() {
            if !current.is_empty() {
                sets.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        sets.push(current);
    }
    sets
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init()?;

    let args = Args::parse();
    ensure!(args.attempts > 0, "the attempt budget must be positive");

    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let sets = key_sets(&input);
    ensure!(!sets.is_empty(), "{} contains no keys", args.input.display());

    let rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let mut builder = Builder::with_rng(rng).attempts(args.attempts);
    if let Some(ms) = args.deadline_ms {
        builder = builder.deadline(Duration::from_millis(ms));
    }

    let mut built = 0usize;
    let mut seed_exhausted = 0usize;
    let mut placement_exhausted = 0usize;
    let mut deadline_exceeded = 0usize;

    let start = Instant::now();
    for keys in &sets {
        let entries = keys.iter().map(|&key| (key, ())).collect();
        match builder.build_table(entries) {
            Ok(table) => {
                built += 1;
                if args.codegen {
                    println!("{}", CodeGenerator::new().generate(&table));
                }
            }
            Err(BuildError::SeedExhausted { .. }) => seed_exhausted += 1,
            Err(BuildError::PlacementExhausted { .. }) => placement_exhausted += 1,
            Err(BuildError::DeadlineExceeded { .. }) => deadline_exceeded += 1,
            Err(err) => return Err(err.into()),
        }
    }
    let elapsed = start.elapsed();

    #[allow(clippy::cast_precision_loss, reason = "percentages")]
    let rate = 100.0 * built as f64 / sets.len() as f64;
    println!("Success rate: {rate:.1}% ({built}/{})", sets.len());
    println!("No collision-free seed: {seed_exhausted}");
    println!("No valid shifts: {placement_exhausted}");
    if args.deadline_ms.is_some() {
        println!("Deadline exceeded: {deadline_exceeded}");
    }
    println!("Total time: {elapsed:?}");
    Ok(())
}
