use std::{
    io::{BufRead, Lines},
    iter::Enumerate,
    str::FromStr,
};

use thiserror::Error;
use tracing::{debug, warn};

use crate::instance::{BusId, DualInstance, SingleInstance, SlotId, WorkshopId};

#[derive(Debug, Error)]
pub enum InstanceReaderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Input ends early; expected a line with {expected}")]
    UnexpectedEnd { expected: String },

    #[error("Line {} should contain {expected}, but has {found} tokens", lineno + 1)]
    WidthMismatch {
        lineno: usize,
        expected: String,
        found: usize,
    },

    #[error("Line {} contains `{token}`, which is not a valid {kind}", lineno + 1)]
    InvalidNumber {
        lineno: usize,
        token: String,
        kind: &'static str,
    },

    #[error("Header declares {value} {name}, but at least one is required")]
    InvalidDimension { name: &'static str, value: u32 },

    #[error("Warning while reading instance (paranoid mode): {0}")]
    Warning(#[from] InstanceWarning),
}

#[derive(Debug, Error, PartialEq)]
pub enum InstanceWarning {
    #[error("Line {} follows the last expected row and is ignored", lineno + 1)]
    TrailingLine { lineno: usize },

    #[error("Buses {bus_a} and {bus_b} share {forward} passengers one way but {backward} the other")]
    AsymmetricSharedPassengers {
        bus_a: BusId,
        bus_b: BusId,
        forward: i64,
        backward: i64,
    },

    #[error("Availability of workshop {workshop} at slot {slot} is {value}; expected 0 or 1")]
    NonBinaryAvailability {
        slot: SlotId,
        workshop: WorkshopId,
        value: i64,
    },
}

/// A number as it may appear in an instance file.
trait Token: FromStr {
    const KIND: &'static str;
    const KIND_PLURAL: &'static str;

    fn parse_token(lineno: usize, token: &str) -> Result<Self, InstanceReaderError> {
        token
            .parse()
            .ok()
            .filter(Self::is_acceptable)
            .ok_or_else(|| InstanceReaderError::InvalidNumber {
                lineno,
                token: token.to_string(),
                kind: Self::KIND,
            })
    }

    fn is_acceptable(&self) -> bool {
        true
    }
}

impl Token for u32 {
    const KIND: &'static str = "count";
    const KIND_PLURAL: &'static str = "counts";
}

impl Token for i64 {
    const KIND: &'static str = "integer";
    const KIND_PLURAL: &'static str = "integers";
}

impl Token for f64 {
    const KIND: &'static str = "real";
    const KIND_PLURAL: &'static str = "reals";

    // `inf` and `NaN` parse, but the solver cannot read them back
    fn is_acceptable(&self) -> bool {
        self.is_finite()
    }
}

/// Hands out the non-empty lines of an instance file as rows of numbers with a fixed width.
struct RowReader<R: BufRead> {
    lines: Enumerate<Lines<R>>,
}

impl<R: BufRead> RowReader<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines().enumerate(),
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>, InstanceReaderError> {
        for (lineno, line) in self.lines.by_ref() {
            let line = line?;
            if !line.trim().is_empty() {
                return Ok(Some((lineno, line)));
            }
        }
        Ok(None)
    }

    fn row<T: Token>(&mut self, width: usize, what: &str) -> Result<Vec<T>, InstanceReaderError> {
        let expected = || {
            let kind = if width == 1 { T::KIND } else { T::KIND_PLURAL };
            format!("{width} {kind} ({what})")
        };

        let Some((lineno, line)) = self.next_line()? else {
            return Err(InstanceReaderError::UnexpectedEnd {
                expected: expected(),
            });
        };

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != width {
            return Err(InstanceReaderError::WidthMismatch {
                lineno,
                expected: expected(),
                found: tokens.len(),
            });
        }

        tokens
            .into_iter()
            .map(|token| T::parse_token(lineno, token))
            .collect()
    }

    fn trailing_lines(mut self) -> Result<Vec<InstanceWarning>, InstanceReaderError> {
        let mut warnings = Vec::new();
        while let Some((lineno, _)) = self.next_line()? {
            warnings.push(InstanceWarning::TrailingLine { lineno });
        }
        Ok(warnings)
    }
}

fn ensure_positive(name: &'static str, value: u32) -> Result<(), InstanceReaderError> {
    if value == 0 {
        return Err(InstanceReaderError::InvalidDimension { name, value });
    }
    Ok(())
}

/// Logs all warnings; in paranoid mode the first one becomes an error.
fn report_warnings(
    mut warnings: Vec<InstanceWarning>,
    paranoid: bool,
) -> Result<(), InstanceReaderError> {
    for w in &warnings {
        warn!("{w}");
    }

    if paranoid && !warnings.is_empty() {
        return Err(InstanceReaderError::Warning(warnings.remove(0)));
    }

    Ok(())
}

impl SingleInstance {
    pub fn read_from(reader: impl BufRead, paranoid: bool) -> Result<Self, InstanceReaderError> {
        let (instance, warnings) = Self::parse(reader)?;
        report_warnings(warnings, paranoid)?;
        Ok(instance)
    }

    /// Parses the four rows `n m`, `kd kp`, the distances and the passengers.
    pub fn parse(
        reader: impl BufRead,
    ) -> Result<(Self, Vec<InstanceWarning>), InstanceReaderError> {
        let mut rows = RowReader::new(reader);

        let header = rows.row::<u32>(2, "number of slots and buses")?;
        let (num_slots, num_buses) = (header[0], header[1]);
        ensure_positive("slots", num_slots)?;
        ensure_positive("buses", num_buses)?;

        let costs = rows.row::<f64>(2, "assigned and unassigned cost")?;
        let distances = rows.row::<f64>(num_buses as usize, "distance of each bus")?;
        let passengers = rows.row::<i64>(num_buses as usize, "passengers of each bus")?;

        let warnings = rows.trailing_lines()?;

        debug!("Parsed single-resource instance with {num_buses} buses and {num_slots} slots");

        Ok((
            Self {
                num_slots,
                num_buses,
                assigned_cost: costs[0],
                unassigned_cost: costs[1],
                distances,
                passengers,
            },
            warnings,
        ))
    }
}

impl DualInstance {
    pub fn read_from(reader: impl BufRead, paranoid: bool) -> Result<Self, InstanceReaderError> {
        let (instance, warnings) = Self::parse(reader)?;
        report_warnings(warnings, paranoid)?;
        Ok(instance)
    }

    /// Parses the header `n m u`, then `m` rows of shared passengers and `n` rows of
    /// workshop availability.
    pub fn parse(
        reader: impl BufRead,
    ) -> Result<(Self, Vec<InstanceWarning>), InstanceReaderError> {
        let mut rows = RowReader::new(reader);

        let header = rows.row::<u32>(3, "number of slots, buses and workshops")?;
        let (num_slots, num_buses, num_workshops) = (header[0], header[1], header[2]);
        ensure_positive("slots", num_slots)?;
        ensure_positive("buses", num_buses)?;
        ensure_positive("workshops", num_workshops)?;

        let shared_passengers = (1..=num_buses)
            .map(|bus| {
                rows.row::<i64>(
                    num_buses as usize,
                    &format!("passengers bus {bus} shares with each bus"),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let available_slots = (1..=num_slots)
            .map(|slot| {
                rows.row::<i64>(
                    num_workshops as usize,
                    &format!("availability of each workshop at slot {slot}"),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut warnings = rows.trailing_lines()?;

        let instance = Self {
            num_slots,
            num_buses,
            num_workshops,
            shared_passengers,
            available_slots,
        };
        warnings.extend(instance.lint());

        debug!(
            "Parsed dual-resource instance with {num_buses} buses, {num_slots} slots and {num_workshops} workshops"
        );

        Ok((instance, warnings))
    }

    /// Properties the model relies on but the file format cannot enforce.
    fn lint(&self) -> Vec<InstanceWarning> {
        let mut warnings = Vec::new();

        for (i, row) in self.shared_passengers.iter().enumerate() {
            for (j, &forward) in row.iter().enumerate().skip(i + 1) {
                let backward = self.shared_passengers[j][i];
                if forward != backward {
                    warnings.push(InstanceWarning::AsymmetricSharedPassengers {
                        bus_a: i as BusId + 1,
                        bus_b: j as BusId + 1,
                        forward,
                        backward,
                    });
                }
            }
        }

        for (s, row) in self.available_slots.iter().enumerate() {
            for (t, &value) in row.iter().enumerate() {
                if value != 0 && value != 1 {
                    warnings.push(InstanceWarning::NonBinaryAvailability {
                        slot: s as SlotId + 1,
                        workshop: t as WorkshopId + 1,
                        value,
                    });
                }
            }
        }

        warnings
    }
}
