//! Random instances for experiments. All generators are deterministic for a given rng state,
//! so a fixed seed reproduces the same instance.

use rand::{Rng, seq::index};
use thiserror::Error;

use crate::instance::{DualInstance, SingleInstance};

pub const DEFAULT_SEED: u64 = 42;

const MAX_SHARED_PASSENGERS: i64 = 10;
const EXTRA_AVAILABILITY: f64 = 0.3;
const MAX_PASSENGERS: i64 = 60;

#[derive(Debug, Error, PartialEq)]
pub enum GeneratorError {
    #[error("Number of {name} must be positive")]
    InvalidDimension { name: &'static str },

    #[error("{buses} buses do not fit into {slots} slots with {workshops} workshops each")]
    NotEnoughCapacity {
        buses: u32,
        slots: u32,
        workshops: u32,
    },

    #[error("Cost {value} is not a finite number")]
    InvalidCost { value: f64 },
}

fn ensure_positive(name: &'static str, value: u32) -> Result<(), GeneratorError> {
    if value == 0 {
        return Err(GeneratorError::InvalidDimension { name });
    }
    Ok(())
}

impl DualInstance {
    /// Symmetric shared passengers with an empty diagonal. At least `num_buses` (slot, workshop)
    /// pairs are available, further pairs become available with probability 0.3, and every slot
    /// has at least one available workshop.
    pub fn random(
        num_slots: u32,
        num_buses: u32,
        num_workshops: u32,
        rng: &mut impl Rng,
    ) -> Result<Self, GeneratorError> {
        ensure_positive("slots", num_slots)?;
        ensure_positive("buses", num_buses)?;
        ensure_positive("workshops", num_workshops)?;

        let (n, m, u) = (num_slots as usize, num_buses as usize, num_workshops as usize);
        if m > n * u {
            return Err(GeneratorError::NotEnoughCapacity {
                buses: num_buses,
                slots: num_slots,
                workshops: num_workshops,
            });
        }

        let mut shared_passengers = vec![vec![0; m]; m];
        for i in 0..m {
            for j in i + 1..m {
                let value = rng.random_range(0..=MAX_SHARED_PASSENGERS);
                shared_passengers[i][j] = value;
                shared_passengers[j][i] = value;
            }
        }

        let mut available_slots = vec![vec![0; u]; n];
        for pos in index::sample(rng, n * u, m) {
            available_slots[pos / u][pos % u] = 1;
        }

        for cell in available_slots.iter_mut().flatten() {
            if *cell == 0 && rng.random_bool(EXTRA_AVAILABILITY) {
                *cell = 1;
            }
        }

        for row in &mut available_slots {
            if row.iter().all(|&v| v == 0) {
                row[rng.random_range(0..u)] = 1;
            }
        }

        Ok(Self {
            num_slots,
            num_buses,
            num_workshops,
            shared_passengers,
            available_slots,
        })
    }
}

impl SingleInstance {
    /// Distances between 1 and 100 with two decimals and up to 60 passengers per bus.
    pub fn random(
        num_slots: u32,
        num_buses: u32,
        assigned_cost: f64,
        unassigned_cost: f64,
        rng: &mut impl Rng,
    ) -> Result<Self, GeneratorError> {
        ensure_positive("slots", num_slots)?;
        ensure_positive("buses", num_buses)?;
        for value in [assigned_cost, unassigned_cost] {
            if !value.is_finite() {
                return Err(GeneratorError::InvalidCost { value });
            }
        }

        let distances = (0..num_buses)
            .map(|_| (rng.random_range(1.0..100.0_f64) * 100.0).round() / 100.0)
            .collect();
        let passengers = (0..num_buses)
            .map(|_| rng.random_range(0..=MAX_PASSENGERS))
            .collect();

        Ok(Self {
            num_slots,
            num_buses,
            assigned_cost,
            unassigned_cost,
            distances,
            passengers,
        })
    }
}
