use std::collections::BTreeMap;

use crate::instance::{BusId, SlotId, WorkshopId};

/// Number of constraints (rows) and variables (columns) of the generated problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemSize {
    pub constraints: u64,
    pub variables: u64,
}

impl ProblemSize {
    /// One constraint per bus and per slot, one variable per (bus, slot) pair.
    pub fn fallback(num_buses: u32, num_slots: u32) -> Self {
        Self {
            constraints: num_buses as u64 + num_slots as u64,
            variables: num_buses as u64 * num_slots as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Placement {
    pub slot: SlotId,
    pub workshop: WorkshopId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleSolution {
    pub objective: Option<f64>,
    pub size: ProblemSize,
    pub assignments: BTreeMap<BusId, SlotId>,
    /// Buses without any assignment, ascending
    pub unassigned: Vec<BusId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DualSolution {
    pub objective: Option<f64>,
    pub size: ProblemSize,
    pub assignments: BTreeMap<BusId, Placement>,
}

impl SingleSolution {
    pub fn slot_of(&self, bus: BusId) -> Option<SlotId> {
        self.assignments.get(&bus).copied()
    }
}

impl DualSolution {
    pub fn placement_of(&self, bus: BusId) -> Option<Placement> {
        self.assignments.get(&bus).copied()
    }

    /// The model only reports placements for feasible instances; an empty report
    /// means there are not enough (slot, workshop) pairs for every bus.
    pub fn is_infeasible(&self) -> bool {
        self.assignments.is_empty()
    }
}
