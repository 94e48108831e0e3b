use std::io::Write;

use crate::solution::{DualSolution, ProblemSize, SingleSolution};

pub const INFEASIBLE_NOTICE: &str = "Not enough slots for every bus, the problem is infeasible";

/// Human readable rendering of a solution, meant for a terminal.
pub trait SummaryWriter {
    fn write_summary(&self, writer: &mut impl Write) -> std::io::Result<()>;
}

fn write_header(
    writer: &mut impl Write,
    objective: Option<f64>,
    size: &ProblemSize,
) -> std::io::Result<()> {
    if let Some(objective) = objective {
        write!(writer, "Optimal value: {objective:.2}, ")?;
    }
    writeln!(
        writer,
        "Variables: {}, Constraints: {}",
        size.variables, size.constraints
    )?;
    writeln!(writer, "Assignments:")
}

impl SummaryWriter for SingleSolution {
    fn write_summary(&self, writer: &mut impl Write) -> std::io::Result<()> {
        write_header(writer, self.objective, &self.size)?;

        for (bus, slot) in &self.assignments {
            writeln!(writer, "Bus a{bus} -> Slot s{slot}")?;
        }

        for bus in &self.unassigned {
            writeln!(writer, "Bus a{bus} -> unassigned")?;
        }

        Ok(())
    }
}

impl SummaryWriter for DualSolution {
    fn write_summary(&self, writer: &mut impl Write) -> std::io::Result<()> {
        write_header(writer, self.objective, &self.size)?;

        if self.is_infeasible() {
            writeln!(writer, "{INFEASIBLE_NOTICE}")?;
        }

        for (bus, placement) in &self.assignments {
            writeln!(
                writer,
                "Bus a{bus} -> Slot s{}, Workshop t{}",
                placement.slot, placement.workshop
            )?;
        }

        Ok(())
    }
}
