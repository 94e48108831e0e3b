use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
    process::exit,
};

use busslot::{
    generator::{DEFAULT_SEED, GeneratorError},
    instance::{DualInstance, SingleInstance},
    options::init_logging,
};
use clap::{Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::{error, info};

#[derive(Parser)]
#[command(version, about = "Generates random bus maintenance instances")]
struct Arguments {
    #[command(subcommand)]
    variant: Variant,

    /// Seed of the random number generator
    #[arg(long, global = true, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output file [default: stdout]
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Variant {
    /// Instance for busslot-single
    Single {
        #[arg(short = 'n', long, default_value_t = 3)]
        slots: u32,
        #[arg(short = 'm', long, default_value_t = 10)]
        buses: u32,
        #[arg(long, default_value_t = 1.0)]
        kd: f64,
        #[arg(long, default_value_t = 1.0)]
        kp: f64,
    },
    /// Instance for busslot-dual
    Dual {
        #[arg(short = 'n', long, default_value_t = 3)]
        slots: u32,
        #[arg(short = 'm', long, default_value_t = 10)]
        buses: u32,
        #[arg(short = 'u', long, default_value_t = 100)]
        workshops: u32,
    },
}

#[derive(Debug, Error)]
enum GenerateError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("Failed to write instance: {0}")]
    Io(#[from] std::io::Error),
}

fn generate(args: &Arguments) -> Result<(), GenerateError> {
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    match args.variant {
        Variant::Single {
            slots,
            buses,
            kd,
            kp,
        } => SingleInstance::random(slots, buses, kd, kp, &mut rng)?.write_instance(&mut writer)?,
        Variant::Dual {
            slots,
            buses,
            workshops,
        } => DualInstance::random(slots, buses, workshops, &mut rng)?.write_instance(&mut writer)?,
    }

    writer.flush()?;

    if let Some(path) = &args.output {
        info!("Instance written to {path:?} (seed {})", args.seed);
    }

    Ok(())
}

fn main() {
    let args = Arguments::parse();
    init_logging(args.quiet, false);

    if let Err(e) = generate(&args) {
        error!("{e}");
        exit(1)
    }
}
