// src/simulation/measurement.rs

//! Born-rule measurement with state collapse.
//!
//! Measurement is the only non-deterministic part of the core: everything
//! else is a pure function of register size, topology, step count and gate
//! order. The random source is owned by the caller (one generator per
//! session), so independent sessions sample without contention and seeded
//! tests reproduce exactly.

use crate::core::{AMPLITUDE_TOLERANCE, Outcome, QuantumState, SimError};
use crate::simulation::engine::SimulationEngine;
use crate::simulation::results::MeasurementOutcomes;
use num_traits::Zero;
use rand::RngExt;
use rand::rngs::StdRng;

/// Marginal probability that `qubit` reads 1: the summed squared magnitude
/// of every basis amplitude whose corresponding bit is set.
///
/// Evaluated against the current state, which may already be partially
/// collapsed by earlier measurements in the same call.
pub fn marginal_one_probability(state: &QuantumState, qubit: usize) -> f64 {
    state
        .vector()
        .iter()
        .enumerate()
        .filter(|(i, _)| QuantumState::qubit_bit(*i, qubit))
        .map(|(_, amp)| amp.norm_sqr())
        .sum()
}

/// Measures the requested qubits in the given order, collapsing the state
/// after each outcome.
///
/// Per qubit: compute the marginal probability of reading 1, draw a uniform
/// sample in [0, 1), zero out the amplitudes inconsistent with the observed
/// outcome and renormalize the survivors. Outcomes are recorded in request
/// order. An empty `indices` slice is resolved by the session layer to "all
/// qubits ascending" before reaching this function.
///
/// Fails with `DegenerateState` if the surviving probability mass is ≈ 0;
/// under correct unitary evolution that cannot happen, so it is reported as
/// an internal-consistency failure rather than a user error.
pub(crate) fn measure(
    engine: &mut SimulationEngine,
    indices: &[usize],
    rng: &mut StdRng,
) -> Result<MeasurementOutcomes, SimError> {
    let mut outcomes = MeasurementOutcomes::new();
    for &qubit in indices {
        let outcome = measure_one(engine.state_mut(), qubit, rng)?;
        outcomes.record(qubit, outcome);
    }
    Ok(outcomes)
}

/// Measures a single qubit and collapses the state in place.
fn measure_one(
    state: &mut QuantumState,
    qubit: usize,
    rng: &mut StdRng,
) -> Result<Outcome, SimError> {
    let prob_one = marginal_one_probability(state, qubit);
    let sample: f64 = rng.random();
    let observed_one = sample < prob_one;

    collapse(state, qubit, observed_one)?;
    Ok(Outcome::from_bit(observed_one))
}

/// Zeroes amplitudes inconsistent with the observed bit and renormalizes
/// the survivors so total probability returns to 1.
fn collapse(state: &mut QuantumState, qubit: usize, observed_one: bool) -> Result<(), SimError> {
    let mut surviving_mass = 0.0;
    for (i, amp) in state.vector_mut().iter_mut().enumerate() {
        if QuantumState::qubit_bit(i, qubit) == observed_one {
            surviving_mass += amp.norm_sqr();
        } else {
            *amp = Zero::zero();
        }
    }

    if surviving_mass < AMPLITUDE_TOLERANCE {
        return Err(SimError::DegenerateState {
            message: format!(
                "collapse of qubit {} to {} left no probability mass",
                qubit,
                if observed_one { 1 } else { 0 }
            ),
        });
    }

    let inv_norm = 1.0 / surviving_mass.sqrt();
    for amp in state.vector_mut().iter_mut() {
        *amp *= inv_norm;
    }
    Ok(())
}
