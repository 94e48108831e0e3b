use std::{
    io::Write,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    instance::AssignmentProblem,
    io::{
        data_writer::write_data_file, instance_reader::InstanceReaderError,
        summary_writer::SummaryWriter,
    },
    options::Arguments,
    solver::{Glpsol, SolverError},
};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to read instance {path:?}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: InstanceReaderError,
    },

    #[error("Failed to write data file {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("Failed to print solution: {0}")]
    Summary(#[source] std::io::Error),
}

impl PipelineError {
    /// Process exit code for this error; every fatal error maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Input { .. }
            | PipelineError::Output { .. }
            | PipelineError::Solver(_)
            | PipelineError::Summary(_) => 1,
        }
    }
}

/// Reads the instance at `input`, writes its data section to `output`, runs the solver and
/// extracts the solution from its report. Stops at the first failing stage; in particular the
/// data file is not created if the instance is malformed and the solver is not started if the
/// data file could not be written.
pub fn solve<P: AssignmentProblem>(
    input: &Path,
    output: &Path,
    solver: &Glpsol,
    paranoid: bool,
) -> Result<P::Solution, PipelineError> {
    let instance = P::read(input, paranoid).map_err(|source| PipelineError::Input {
        path: input.to_path_buf(),
        source,
    })?;
    info!(
        "Read {} instance with {} buses and {} slots",
        P::NAME,
        instance.num_buses(),
        instance.num_slots()
    );

    write_data_file(output, &instance).map_err(|source| PipelineError::Output {
        path: output.to_path_buf(),
        source,
    })?;
    info!("Wrote data file {output:?}");

    let report = solver.solve(output)?;
    debug!("Solver finished");

    Ok(instance.extract_solution(&report))
}

/// Runs the whole pipeline as configured on the command line and prints the summary.
pub fn solve_and_print<P: AssignmentProblem>(
    args: &Arguments,
    writer: &mut impl Write,
) -> Result<P::Solution, PipelineError> {
    let solver = args.glpsol::<P>();
    let solution = solve::<P>(&args.input_file, &args.output_file, &solver, args.paranoid)?;

    solution
        .write_summary(writer)
        .and_then(|_| writer.flush())
        .map_err(PipelineError::Summary)?;

    Ok(solution)
}
