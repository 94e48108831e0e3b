use std::io::Write;

use itertools::Itertools;

use crate::instance::{DualInstance, SingleInstance};

impl SingleInstance {
    /// Writes the instance in the same format [`SingleInstance::read_from`] accepts.
    pub fn write_instance(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "{} {}", self.num_slots, self.num_buses)?;
        writeln!(writer, "{} {}", self.assigned_cost, self.unassigned_cost)?;
        writeln!(writer, "{}", self.distances.iter().join(" "))?;
        writeln!(writer, "{}", self.passengers.iter().join(" "))
    }
}

impl DualInstance {
    /// Writes the instance in the same format [`DualInstance::read_from`] accepts.
    pub fn write_instance(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(
            writer,
            "{} {} {}",
            self.num_slots, self.num_buses, self.num_workshops
        )?;
        for row in self.shared_passengers.iter().chain(&self.available_slots) {
            writeln!(writer, "{}", row.iter().join(" "))?;
        }
        Ok(())
    }
}
