use std::{
    ffi::OsStr,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::ExitStatus,
};

use thiserror::Error;
use tracing::{debug, trace};

pub const DEFAULT_SOLVER: &str = "glpsol";

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Model file {path:?} not found")]
    ModelNotFound { path: PathBuf },

    #[error("Solver {executable:?} not found; is GLPK installed and on the PATH?")]
    NotFound { executable: PathBuf },

    #[error("Failed to start solver {executable:?}: {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Solver exited with {status}:\n{stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Runs `glpsol --model <model> --data <data>` as a child process.
#[derive(Debug, Clone)]
pub struct Glpsol {
    executable: PathBuf,
    model: PathBuf,
}

impl Glpsol {
    pub fn new(executable: impl Into<PathBuf>, model: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            model: model.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn model(&self) -> &Path {
        &self.model
    }

    /// Solves the model against `data` and returns the solver's stdout.
    /// Blocks until the solver exits; both output streams are captured, not forwarded.
    pub fn solve(&self, data: &Path) -> Result<String, SolverError> {
        if !self.model.exists() {
            return Err(SolverError::ModelNotFound {
                path: self.model.clone(),
            });
        }

        debug!(
            "Run {:?} --model {:?} --data {data:?}",
            self.executable, self.model
        );

        let args = [
            OsStr::new("--model"),
            self.model.as_os_str(),
            OsStr::new("--data"),
            data.as_os_str(),
        ];

        // a `Path` would make duct run bare names from the working directory; as a string
        // they are looked up on the PATH
        let output = duct::cmd(self.executable.as_os_str(), args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => SolverError::NotFound {
                    executable: self.executable.clone(),
                },
                _ => SolverError::Spawn {
                    executable: self.executable.clone(),
                    source,
                },
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(SolverError::Failed {
                status: output.status,
                stderr,
            });
        }

        trace!("Solver stderr: {stderr}");

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("Solver report has {} lines", stdout.lines().count());
        Ok(stdout)
    }
}
