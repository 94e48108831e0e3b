use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use tracing::debug;

use crate::{
    io::{instance_reader::InstanceReaderError, summary_writer::SummaryWriter},
    solution::{DualSolution, ProblemSize, SingleSolution},
};

pub type BusId = u32;
pub type SlotId = u32;
pub type WorkshopId = u32;

/// Each bus is either sent to one maintenance slot or left unassigned.
/// Assigning costs `assigned_cost` per unit of distance, skipping costs
/// `unassigned_cost` per passenger.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleInstance {
    pub num_slots: u32,
    pub num_buses: u32,
    pub assigned_cost: f64,
    pub unassigned_cost: f64,
    pub distances: Vec<f64>,
    pub passengers: Vec<i64>,
}

/// Each bus is sent to a (slot, workshop) pair that has capacity. Buses sharing
/// a slot cost the passengers they have in common.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualInstance {
    pub num_slots: u32,
    pub num_buses: u32,
    pub num_workshops: u32,
    /// `shared_passengers[i][j]` belongs to buses `i + 1` and `j + 1`
    pub shared_passengers: Vec<Vec<i64>>,
    /// `available_slots[s][t]` is 1 iff workshop `t + 1` has capacity at slot `s + 1`
    pub available_slots: Vec<Vec<i64>>,
}

impl SingleInstance {
    pub fn buses(&self) -> impl Iterator<Item = BusId> + use<> {
        1..=self.num_buses
    }
}

/// One variant of the bus-to-slot assignment problem, as seen by the pipeline:
/// read the instance, render it as solver data, and interpret the solver report.
pub trait AssignmentProblem: Sized {
    type Solution: SummaryWriter;

    /// Human readable name used in log messages
    const NAME: &'static str;

    /// Model file used when none is given on the command line
    const DEFAULT_MODEL: &'static str;

    fn num_buses(&self) -> u32;
    fn num_slots(&self) -> u32;

    /// Parses an instance; in paranoid mode warnings are reported as errors.
    fn read_from(reader: impl BufRead, paranoid: bool) -> Result<Self, InstanceReaderError>;

    /// Renders the data section consumed by the model file.
    fn write_data(&self, writer: &mut impl Write) -> std::io::Result<()>;

    /// Extracts the solution from the solver's report. Missing patterns never fail.
    fn extract_solution(&self, report: &str) -> Self::Solution;

    fn read(path: &Path, paranoid: bool) -> Result<Self, InstanceReaderError> {
        debug!("Read {} instance from {path:?}", Self::NAME);
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file), paranoid)
    }

    /// Problem size assumed when the report does not state it.
    fn fallback_size(&self) -> ProblemSize {
        ProblemSize::fallback(self.num_buses(), self.num_slots())
    }
}

impl AssignmentProblem for SingleInstance {
    type Solution = SingleSolution;

    const NAME: &'static str = "single-resource";
    const DEFAULT_MODEL: &'static str = "models/single.mod";

    fn num_buses(&self) -> u32 {
        self.num_buses
    }

    fn num_slots(&self) -> u32 {
        self.num_slots
    }

    fn read_from(reader: impl BufRead, paranoid: bool) -> Result<Self, InstanceReaderError> {
        SingleInstance::read_from(reader, paranoid)
    }

    fn write_data(&self, writer: &mut impl Write) -> std::io::Result<()> {
        SingleInstance::write_data(self, writer)
    }

    fn extract_solution(&self, report: &str) -> SingleSolution {
        SingleSolution::from_report(report, self)
    }
}

impl AssignmentProblem for DualInstance {
    type Solution = DualSolution;

    const NAME: &'static str = "dual-resource";
    const DEFAULT_MODEL: &'static str = "models/dual.mod";

    fn num_buses(&self) -> u32 {
        self.num_buses
    }

    fn num_slots(&self) -> u32 {
        self.num_slots
    }

    fn read_from(reader: impl BufRead, paranoid: bool) -> Result<Self, InstanceReaderError> {
        DualInstance::read_from(reader, paranoid)
    }

    fn write_data(&self, writer: &mut impl Write) -> std::io::Result<()> {
        DualInstance::write_data(self, writer)
    }

    fn extract_solution(&self, report: &str) -> DualSolution {
        DualSolution::from_report(report, self)
    }
}
