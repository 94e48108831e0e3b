use std::{
    fmt::Display,
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use itertools::Itertools;
use tracing::debug;

use crate::instance::{AssignmentProblem, DualInstance, SingleInstance};

/// Writes the data section of `instance` to `path`, creating missing parent directories.
/// The file is fully flushed before this function returns successfully.
pub fn write_data_file(path: &Path, instance: &impl AssignmentProblem) -> std::io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty())
        && !dir.exists()
    {
        debug!("Create output directory {dir:?}");
        fs::create_dir_all(dir)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    instance.write_data(&mut writer)?;
    writer.flush()
}

/// `set NAME := 1 2 ... count;`
fn write_index_set(writer: &mut impl Write, name: &str, count: u32) -> std::io::Result<()> {
    writeln!(writer, "set {name} := {};", (1..=count).join(" "))
}

fn write_scalar_param(
    writer: &mut impl Write,
    name: &str,
    value: impl Display,
) -> std::io::Result<()> {
    writeln!(writer, "param {name} := {value};")
}

/// One `key value` line per entry, keys starting at 1.
fn write_vector_param<T: Display>(
    writer: &mut impl Write,
    name: &str,
    values: &[T],
) -> std::io::Result<()> {
    writeln!(writer, "param {name} :=")?;
    for (i, value) in values.iter().enumerate() {
        writeln!(writer, "{} {value}", i + 1)?;
    }
    writeln!(writer, ";")
}

/// One `[i, j] value` line per entry in row-major order, keys starting at 1.
/// Zero entries are written as well.
fn write_matrix_param<T: Display>(
    writer: &mut impl Write,
    name: &str,
    rows: &[Vec<T>],
) -> std::io::Result<()> {
    writeln!(writer, "param {name} :=")?;
    for (i, row) in rows.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            writeln!(writer, "[{}, {}] {value}", i + 1, j + 1)?;
        }
    }
    writeln!(writer, ";")
}

impl SingleInstance {
    pub fn write_data(&self, writer: &mut impl Write) -> std::io::Result<()> {
        write_index_set(writer, "BUSES", self.num_buses)?;
        write_index_set(writer, "SLOTS", self.num_slots)?;
        writeln!(writer)?;

        write_scalar_param(writer, "kd", self.assigned_cost)?;
        write_scalar_param(writer, "kp", self.unassigned_cost)?;
        writeln!(writer)?;

        write_vector_param(writer, "Distance", &self.distances)?;
        writeln!(writer)?;
        write_vector_param(writer, "Passengers", &self.passengers)?;
        writeln!(writer)?;

        writeln!(writer, "end;")
    }
}

impl DualInstance {
    pub fn write_data(&self, writer: &mut impl Write) -> std::io::Result<()> {
        write_index_set(writer, "BUSES", self.num_buses)?;
        write_index_set(writer, "SLOTS", self.num_slots)?;
        write_index_set(writer, "WORKSHOPS", self.num_workshops)?;
        writeln!(writer)?;

        write_matrix_param(writer, "Shared_passengers", &self.shared_passengers)?;
        writeln!(writer)?;
        write_matrix_param(writer, "Available_slots", &self.available_slots)
    }
}
