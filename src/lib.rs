pub mod instance;
pub mod io;
pub mod options;
pub mod pipeline;
pub mod solution;
pub mod solver;

#[cfg(feature = "generator")]
pub mod generator;
