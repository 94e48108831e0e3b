use std::path::PathBuf;

use clap::Parser;

use crate::{
    instance::AssignmentProblem,
    solver::{DEFAULT_SOLVER, Glpsol},
};

#[derive(Parser, Debug)]
#[command(version, about = "Generates GLPK data for a bus maintenance assignment and solves it")]
pub struct Arguments {
    /// Instance description
    pub input_file: PathBuf,

    /// Where the generated GLPK data file is written
    pub output_file: PathBuf,

    /// Model file passed to the solver [default depends on the problem variant]
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Solver executable
    #[arg(short, long, env = "BUSSLOT_SOLVER", default_value = DEFAULT_SOLVER)]
    pub solver: PathBuf,

    #[arg(short, long)]
    pub quiet: bool,

    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Treat suspicious but well-formed instances as errors
    #[arg(short, long)]
    pub paranoid: bool,
}

impl Arguments {
    pub fn glpsol<P: AssignmentProblem>(&self) -> Glpsol {
        let model = self
            .model
            .clone()
            .unwrap_or_else(|| PathBuf::from(P::DEFAULT_MODEL));
        Glpsol::new(&self.solver, model)
    }

    pub fn init_logging(&self) {
        init_logging(self.quiet, self.verbose);
    }
}

/// Most verbose level logged; quiet runs still report the fatal error.
pub fn log_level(quiet: bool, verbose: bool) -> tracing::Level {
    if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    }
}

/// Diagnostics go to stderr, stdout is reserved for results.
pub fn init_logging(quiet: bool, verbose: bool) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level(quiet, verbose))
        .without_time()
        .init();
}
